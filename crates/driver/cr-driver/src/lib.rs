//! Driver for the Coral region checker.
//!
//! Reads a function in its serialized fixture form (see [`fixture`]), lowers
//! it into the syntax tree and CFG the checker consumes, runs every phase and
//! condenses the outcome into a [`CheckReport`].

pub mod error;
pub mod fixture;
pub mod lower;

pub use error::{DriverError, DriverResult};
pub use fixture::FunctionFixture;
pub use lower::{LoweredFunction, lower_fixture};

use cr_regionck::{Regionck, RegionckConfig, StatementAction};
use cr_span::FileId;
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info};

/// Result of checking one function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    /// Function name
    pub function: String,
    /// Regions with their inferred points
    pub regions: Vec<RegionSummary>,
    /// Every loan created in the function
    pub loans: Vec<LoanSummary>,
    /// Per-node facts
    pub nodes: Vec<NodeSummary>,
    /// Full passes the solver needed
    pub inference_passes: usize,
    /// Textual dump of regions and constraints
    pub dump: String,
}

/// A region and the CFG nodes it contains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionSummary {
    /// Display name, `'static` or `'<n>`
    pub name: String,
    /// Contained node ids, ascending
    pub points: Vec<u32>,
}

/// A loan in display form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoanSummary {
    /// `L<n>`
    pub id: String,
    /// Borrowed place
    pub path: String,
    /// `shared` or `mutable`
    pub kind: String,
    /// Node containing the borrow
    pub origin: u32,
    /// Region of the loan
    pub region: String,
}

/// Facts computed for one CFG node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeSummary {
    /// Node id
    pub id: u32,
    /// Loans in scope on entry
    pub in_scope_loans: Vec<String>,
    /// Copies as `dest = src`
    pub copies: Vec<String>,
    /// Moves as `dest = src`
    pub moves: Vec<String>,
}

impl CheckReport {
    /// Condenses a finished check.
    pub fn new(regionck: &Regionck<'_>) -> Self {
        let interner = regionck.interner();
        let describe = |action: &StatementAction| {
            format!(
                "{} = {}",
                action.dest_path.display(interner),
                action.src_path.display(interner)
            )
        };

        Self {
            function: interner.resolve(regionck.function().name).to_string(),
            regions: regionck
                .regions()
                .iter()
                .map(|region| RegionSummary {
                    name: format!("'{}", region.name),
                    points: region.sorted_points().into_iter().map(|point| point.0).collect(),
                })
                .collect(),
            loans: regionck
                .loans()
                .iter()
                .map(|loan| LoanSummary {
                    id: loan.id.to_string(),
                    path: loan.loaned_path.display(interner).to_string(),
                    kind: loan.borrow_kind().to_string(),
                    origin: loan.origin.0,
                    region: loan.region.to_string(),
                })
                .collect(),
            nodes: regionck
                .cfg()
                .nodes()
                .iter()
                .zip(regionck.annotations())
                .map(|(node, annotation)| NodeSummary {
                    id: node.id.0,
                    in_scope_loans: annotation
                        .in_scope_loans()
                        .iter()
                        .map(ToString::to_string)
                        .collect(),
                    copies: annotation.copies().iter().map(describe).collect(),
                    moves: annotation.moves().iter().map(describe).collect(),
                })
                .collect(),
            inference_passes: regionck.inference_passes(),
            dump: regionck.aggregate_info(),
        }
    }

    /// Loans in scope on entry to `node`, empty for unknown nodes.
    #[must_use]
    pub fn in_scope_at(&self, node: u32) -> &[String] {
        self.nodes
            .iter()
            .find(|summary| summary.id == node)
            .map(|summary| summary.in_scope_loans.as_slice())
            .unwrap_or_default()
    }
}

/// Checks an already lowered function.
pub fn check_lowered(
    lowered: &LoweredFunction,
    config: RegionckConfig,
) -> DriverResult<CheckReport> {
    let regionck = Regionck::check(
        &lowered.function,
        &lowered.cfg,
        &lowered.liveness,
        &lowered.interner,
        config,
    )?;
    let report = CheckReport::new(&regionck);
    info!(
        function = %report.function,
        regions = report.regions.len(),
        loans = report.loans.len(),
        passes = report.inference_passes,
        "checked function"
    );
    Ok(report)
}

/// Parses, lowers and checks a JSON fixture.
pub fn check_fixture(json: &str, config: RegionckConfig) -> DriverResult<CheckReport> {
    let fixture: FunctionFixture = serde_json::from_str(json)?;
    debug!(function = %fixture.name, nodes = fixture.nodes.len(), "parsed fixture");
    let lowered = lower_fixture(&fixture, FileId(0))?;
    check_lowered(&lowered, config)
}

/// Reads and checks the JSON fixture at `path`.
pub fn check_file(path: &Path, config: RegionckConfig) -> DriverResult<CheckReport> {
    let json = std::fs::read_to_string(path).map_err(|source| DriverError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    check_fixture(&json, config)
}
