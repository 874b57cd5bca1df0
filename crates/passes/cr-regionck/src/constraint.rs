//! Outlives constraints and the fixpoint solver.

use cr_cfg::NodeId;
use std::fmt;
use tracing::trace;

use crate::region::{RegionArena, RegionVid};

/// What a constraint requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintKind {
    /// `'longer: 'shorter`: every point of `shorter` is in `longer`
    Outlives {
        /// Region that must grow
        longer: RegionVid,
        /// Region whose points are copied
        shorter: RegionVid,
    },
    /// `region` contains the constraint's point
    Live {
        /// Region that must contain the point
        region: RegionVid,
    },
}

/// A constraint together with the CFG node that gave rise to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OutlivesConstraint {
    /// Requirement
    pub kind: ConstraintKind,
    /// Originating node
    pub point: NodeId,
}

impl OutlivesConstraint {
    /// `'longer: 'shorter` arising at `point`.
    #[must_use]
    pub fn outlives(longer: RegionVid, shorter: RegionVid, point: NodeId) -> Self {
        Self {
            kind: ConstraintKind::Outlives { longer, shorter },
            point,
        }
    }

    /// `region` live at `point`.
    #[must_use]
    pub fn live(region: RegionVid, point: NodeId) -> Self {
        Self {
            kind: ConstraintKind::Live { region },
            point,
        }
    }

    /// Grows the constrained region; returns whether any region changed.
    pub fn apply(&self, regions: &mut RegionArena) -> bool {
        match self.kind {
            ConstraintKind::Outlives { longer, shorter } => regions.union_points(longer, shorter),
            ConstraintKind::Live { region } => regions.add_point(region, self.point),
        }
    }

    /// Renders the constraint with region names.
    #[must_use]
    pub fn display<'a>(&'a self, regions: &'a RegionArena) -> ConstraintDisplay<'a> {
        ConstraintDisplay {
            constraint: self,
            regions,
        }
    }
}

/// [`OutlivesConstraint`] rendered as `'a: 'b @ n` or `'a live at n`.
pub struct ConstraintDisplay<'a> {
    constraint: &'a OutlivesConstraint,
    regions: &'a RegionArena,
}

impl ConstraintDisplay<'_> {
    fn name(&self, region: RegionVid) -> &str {
        self.regions
            .get(region)
            .map_or("<unknown>", |var| var.name.as_str())
    }
}

impl fmt::Display for ConstraintDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let point = self.constraint.point;
        match self.constraint.kind {
            ConstraintKind::Outlives { longer, shorter } => write!(
                f,
                "'{}: '{} @ {point}",
                self.name(longer),
                self.name(shorter)
            ),
            ConstraintKind::Live { region } => {
                write!(f, "'{} live at {point}", self.name(region))
            }
        }
    }
}

/// Applies `constraints` in full passes until a pass changes nothing.
///
/// Regions only grow and the point set is finite, so this always
/// terminates. Returns the number of passes, the final unchanged one
/// included.
pub fn solve(regions: &mut RegionArena, constraints: &[OutlivesConstraint]) -> usize {
    let mut passes = 0;
    loop {
        passes += 1;
        let mut changed = false;
        for constraint in constraints {
            if constraint.apply(regions) {
                trace!(constraint = %constraint.display(regions), "region grew");
                changed = true;
            }
        }
        if !changed {
            return passes;
        }
    }
}
