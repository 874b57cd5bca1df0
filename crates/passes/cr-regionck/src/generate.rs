//! Constraint generation from annotated nodes.

use cr_cfg::{Cfg, NodeId};
use cr_intern::Interner;
use rustc_hash::FxHashSet;
use tracing::debug;

use crate::{
    config::RegionckConfig,
    constraint::{ConstraintKind, OutlivesConstraint},
    declarations::Declarations,
    error::RegionckResult,
    facts::{AssignmentSource, NodeAnnotation},
    loans::Loan,
    path::Path,
    region::{RegionArena, RegionVid},
    ty::Ty,
};

/// How a subtyping relation propagates through a reference level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Variance {
    Covariant,
    Invariant,
}

/// Derives outlives and liveness constraints from the per-node facts.
pub(crate) struct ConstraintGenerator<'a> {
    pub cfg: &'a Cfg,
    pub interner: &'a Interner,
    pub config: &'a RegionckConfig,
    pub regions: &'a RegionArena,
    pub loans: &'a [Loan],
    pub declarations: &'a Declarations,
    pub annotations: &'a [NodeAnnotation],
}

impl ConstraintGenerator<'_> {
    /// Generates the constraint list. Duplicates and `'a: 'a` are dropped;
    /// the order is deterministic.
    pub(crate) fn generate(&self) -> RegionckResult<Vec<OutlivesConstraint>> {
        let mut out = ConstraintSink::default();
        let start = self.cfg.start();

        if self.config.static_covers_all_points {
            for node in self.cfg.nodes() {
                out.push(OutlivesConstraint::live(RegionVid::STATIC, node.id));
            }
        }

        for var in self.regions.iter().filter(|var| var.is_param()) {
            out.push(OutlivesConstraint::outlives(
                var.id,
                RegionVid::STATIC,
                start,
            ));
        }

        for node in self.cfg.nodes() {
            let point = node.id;
            let annotation = &self.annotations[point.index()];

            let mut live: Vec<RegionVid> = annotation
                .live_in()
                .iter()
                .flat_map(|name| self.declarations.get_by_name(*name))
                .flat_map(Ty::regions)
                .collect();
            live.sort_unstable();
            live.dedup();
            for region in live {
                out.push(OutlivesConstraint::live(region, point));
            }

            for assignment in annotation.assignments() {
                let Some(dest_region) = assignment.dest_ty.region() else {
                    continue;
                };
                match &assignment.source {
                    AssignmentSource::Borrow(loan) => {
                        let loan = &self.loans[loan.index()];
                        out.push(OutlivesConstraint::outlives(
                            loan.region,
                            dest_region,
                            point,
                        ));
                        if let Some(dest_pointee) = assignment.dest_ty.pointee() {
                            relate(
                                &mut out,
                                &loan.loaned_ty,
                                dest_pointee,
                                pointee_variance(&assignment.dest_ty, Variance::Covariant),
                                point,
                            );
                        }
                    }
                    AssignmentSource::Path { ty, .. } => {
                        relate(&mut out, ty, &assignment.dest_ty, Variance::Covariant, point);
                    }
                    AssignmentSource::Call { args } => {
                        for (_, ty) in args {
                            for region in ty.regions() {
                                out.push(OutlivesConstraint::outlives(region, dest_region, point));
                            }
                        }
                    }
                }
            }

            for &loan in annotation.loans() {
                self.reborrow_constraints(&mut out, &self.loans[loan.index()])?;
            }

            for (_, ty) in annotation.returns() {
                if let Some(region) = ty.region() {
                    out.push(OutlivesConstraint::outlives(
                        region,
                        RegionVid::STATIC,
                        point,
                    ));
                }
            }
        }

        debug!(constraints = out.constraints.len(), "generated constraints");
        Ok(out.constraints)
    }

    /// For each dereference in the loaned path, the dereferenced reference
    /// must outlive the loan. Stops at the first shared reference: data
    /// behind it stays valid for that reference's region regardless of what
    /// lies further out.
    fn reborrow_constraints(&self, out: &mut ConstraintSink, loan: &Loan) -> RegionckResult<()> {
        for prefix in loan.loaned_path.prefixes() {
            let Path::Deref(base) = prefix else {
                continue;
            };
            let base_ty = base.retrieve_ty(self.declarations, self.interner, loan.span)?;
            if let Some(region) = base_ty.region() {
                out.push(OutlivesConstraint::outlives(region, loan.region, loan.origin));
            }
            if base_ty.borrow_kind().is_some_and(|kind| !kind.is_mutable()) {
                break;
            }
        }
        Ok(())
    }
}

fn pointee_variance(reference: &Ty, outer: Variance) -> Variance {
    match reference.borrow_kind() {
        Some(kind) if kind.is_mutable() => Variance::Invariant,
        _ => outer,
    }
}

/// Relates `sub <: sup` level by level.
fn relate(out: &mut ConstraintSink, sub: &Ty, sup: &Ty, variance: Variance, point: NodeId) {
    let (Some(sub_pointee), Some(sup_pointee)) = (sub.pointee(), sup.pointee()) else {
        return;
    };
    if let (Some(sub_region), Some(sup_region)) = (sub.region(), sup.region()) {
        out.push(OutlivesConstraint::outlives(sub_region, sup_region, point));
        if variance == Variance::Invariant {
            out.push(OutlivesConstraint::outlives(sup_region, sub_region, point));
        }
    }
    relate(
        out,
        sub_pointee,
        sup_pointee,
        pointee_variance(sup, variance),
        point,
    );
}

#[derive(Default)]
struct ConstraintSink {
    constraints: Vec<OutlivesConstraint>,
    seen: FxHashSet<OutlivesConstraint>,
}

impl ConstraintSink {
    fn push(&mut self, constraint: OutlivesConstraint) {
        if let ConstraintKind::Outlives { longer, shorter } = constraint.kind {
            if longer == shorter {
                return;
            }
        }
        if self.seen.insert(constraint) {
            self.constraints.push(constraint);
        }
    }
}
