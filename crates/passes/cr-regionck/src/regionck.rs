//! Pipeline driver: annotate, generate constraints, infer regions, compute
//! in-scope loans.

use cr_ast::Function;
use cr_cfg::{Cfg, Liveness, NodeId};
use cr_intern::Interner;
use tracing::debug;

use crate::{
    annotate::CfgAnnotator,
    config::RegionckConfig,
    constraint::{OutlivesConstraint, solve},
    declarations::Declarations,
    error::RegionckResult,
    facts::NodeAnnotation,
    generate::ConstraintGenerator,
    in_scope::InScopeLoansComputation,
    loans::Loan,
    region::RegionArena,
};

/// Region check of one function.
///
/// Construction annotates the CFG. The remaining phases are chainable and
/// meant to run in order:
///
/// ```ignore
/// let mut regionck = Regionck::new(&function, &cfg, &liveness, &interner, config)?;
/// regionck.build_constraints()?.infer().borrow_check();
/// ```
#[derive(Debug)]
pub struct Regionck<'a> {
    function: &'a Function,
    cfg: &'a Cfg,
    interner: &'a Interner,
    config: RegionckConfig,
    regions: RegionArena,
    constraints: Vec<OutlivesConstraint>,
    loans: Vec<Loan>,
    declarations: Declarations,
    annotations: Vec<NodeAnnotation>,
    inference_passes: usize,
    in_scope_iterations: usize,
}

impl<'a> Regionck<'a> {
    /// Annotates `function` over its `cfg`.
    pub fn new(
        function: &'a Function,
        cfg: &'a Cfg,
        liveness: &Liveness,
        interner: &'a Interner,
        config: RegionckConfig,
    ) -> RegionckResult<Self> {
        debug!(function = interner.resolve(function.name), nodes = cfg.len(), "annotating");
        let annotated = CfgAnnotator::new(function, cfg, liveness, interner).annotate()?;

        Ok(Self {
            function,
            cfg,
            interner,
            config,
            regions: annotated.regions,
            constraints: Vec::new(),
            loans: annotated.loans,
            declarations: annotated.declarations,
            annotations: annotated.annotations,
            inference_passes: 0,
            in_scope_iterations: 0,
        })
    }

    /// Runs every phase.
    pub fn check(
        function: &'a Function,
        cfg: &'a Cfg,
        liveness: &Liveness,
        interner: &'a Interner,
        config: RegionckConfig,
    ) -> RegionckResult<Self> {
        let mut regionck = Self::new(function, cfg, liveness, interner, config)?;
        regionck.build_constraints()?.infer().borrow_check();
        Ok(regionck)
    }

    /// Replaces the constraint list with one generated from the annotations.
    pub fn build_constraints(&mut self) -> RegionckResult<&mut Self> {
        let generator = ConstraintGenerator {
            cfg: self.cfg,
            interner: self.interner,
            config: &self.config,
            regions: &self.regions,
            loans: &self.loans,
            declarations: &self.declarations,
            annotations: &self.annotations,
        };
        self.constraints = generator.generate()?;
        Ok(self)
    }

    /// Grows regions until every constraint holds.
    pub fn infer(&mut self) -> &mut Self {
        self.inference_passes = solve(&mut self.regions, &self.constraints);
        debug!(passes = self.inference_passes, "inferred regions");
        self
    }

    /// Computes the loans in scope at every node.
    pub fn borrow_check(&mut self) -> &mut Self {
        let result = InScopeLoansComputation {
            cfg: self.cfg,
            config: &self.config,
            regions: &self.regions,
            loans: &self.loans,
            annotations: &self.annotations,
        }
        .compute();

        for (annotation, loans) in self.annotations.iter_mut().zip(result.in_scope) {
            annotation.in_scope_loans = loans;
        }
        self.in_scope_iterations = result.iterations;
        self
    }

    /// The checked function.
    #[must_use]
    pub fn function(&self) -> &'a Function {
        self.function
    }

    /// The analysed graph.
    #[must_use]
    pub fn cfg(&self) -> &'a Cfg {
        self.cfg
    }

    /// Names of variables, fields and callees.
    #[must_use]
    pub fn interner(&self) -> &'a Interner {
        self.interner
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &RegionckConfig {
        &self.config
    }

    /// Region variables; `'static` first.
    #[must_use]
    pub fn regions(&self) -> &RegionArena {
        &self.regions
    }

    /// Generated constraints, empty before [`Self::build_constraints`].
    #[must_use]
    pub fn constraints(&self) -> &[OutlivesConstraint] {
        &self.constraints
    }

    /// Loans in creation order; a loan's id is its index.
    #[must_use]
    pub fn loans(&self) -> &[Loan] {
        &self.loans
    }

    /// Declared variable types.
    #[must_use]
    pub fn declarations(&self) -> &Declarations {
        &self.declarations
    }

    /// Facts recorded for `node`.
    #[must_use]
    pub fn annotation(&self, node: NodeId) -> Option<&NodeAnnotation> {
        self.annotations.get(node.index())
    }

    /// Facts of every node, indexed by node id.
    #[must_use]
    pub fn annotations(&self) -> &[NodeAnnotation] {
        &self.annotations
    }

    /// Passes the last [`Self::infer`] needed, the unchanged one included.
    #[must_use]
    pub fn inference_passes(&self) -> usize {
        self.inference_passes
    }

    /// Nodes processed by the last [`Self::borrow_check`].
    #[must_use]
    pub fn in_scope_iterations(&self) -> usize {
        self.in_scope_iterations
    }

    /// Renders regions with their points, then the constraints.
    ///
    /// ```text
    /// Regions:
    ///     'static: {0, 1, 2}
    ///     '1: {1}
    ///
    /// Constraints:
    ///     'static live at 0
    ///     '1: 'static @ 0
    /// ```
    #[must_use]
    pub fn aggregate_info(&self) -> String {
        let mut out = String::from("Regions:\n");
        for region in self.regions.iter() {
            let points = region
                .sorted_points()
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            out.push_str(&format!("\t'{}: {{{points}}}\n", region.name));
        }

        out.push_str("\nConstraints:\n");
        for constraint in &self.constraints {
            out.push_str(&format!("\t{}\n", constraint.display(&self.regions)));
        }
        out
    }
}
