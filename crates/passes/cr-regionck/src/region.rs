//! Region (lifetime) variables.

use cr_ast::{DeclId, ExprId};
use cr_cfg::NodeId;
use rustc_hash::FxHashSet;
use std::{fmt, ops::Index};
use tracing::trace;

/// Region variable identifier: the index into the [`RegionArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RegionVid(pub u32);

impl RegionVid {
    /// The universal `'static` region, always the first allocated.
    pub const STATIC: Self = Self(0);

    fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for RegionVid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}", self.0)
    }
}

/// Whether a region is fixed by the signature or inferred from the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionKind {
    /// Valid for the whole enclosing scope (`'static`)
    Universal,
    /// Inferred from constraints
    Existential,
}

/// The syntax that introduced a region variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefiningSite {
    /// A reference level of a parameter's type
    Param(DeclId),
    /// A reference level of a local's declared type
    Decl(DeclId),
    /// An address-of expression
    Borrow(ExprId),
}

/// A region variable and the CFG points it has been inferred to contain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionVariable {
    /// Identifier
    pub id: RegionVid,
    /// Universal or existential
    pub kind: RegionKind,
    /// Human-readable name, the numeric id unless given one
    pub name: String,
    /// Introducing syntax; `None` only for `'static`
    pub defining_site: Option<DefiningSite>,
    points: FxHashSet<NodeId>,
}

impl RegionVariable {
    /// Points accumulated so far.
    #[must_use]
    pub fn points(&self) -> &FxHashSet<NodeId> {
        &self.points
    }

    /// Points in ascending order.
    #[must_use]
    pub fn sorted_points(&self) -> Vec<NodeId> {
        let mut points: Vec<_> = self.points.iter().copied().collect();
        points.sort_unstable();
        points
    }

    /// Returns `true` if the region contains `point`.
    #[must_use]
    pub fn contains(&self, point: NodeId) -> bool {
        self.points.contains(&point)
    }

    /// Returns `true` for parameter regions.
    #[must_use]
    pub fn is_param(&self) -> bool {
        matches!(self.defining_site, Some(DefiningSite::Param(_)))
    }
}

/// Owner of every region variable of one function analysis.
///
/// Ids are dense indices, so a fresh arena always restarts at `'static`
/// and independent analyses never share region ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionArena {
    vars: Vec<RegionVariable>,
}

impl RegionArena {
    /// Creates an arena holding only `'static`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            vars: vec![RegionVariable {
                id: RegionVid::STATIC,
                kind: RegionKind::Universal,
                name: "static".to_string(),
                defining_site: None,
                points: FxHashSet::default(),
            }],
        }
    }

    /// Allocates a fresh region variable.
    pub fn fresh(
        &mut self,
        kind: RegionKind,
        name: Option<String>,
        defining_site: Option<DefiningSite>,
    ) -> RegionVid {
        let id = RegionVid(self.vars.len() as u32);
        let name = name.unwrap_or_else(|| id.0.to_string());
        trace!(region = %id, %name, ?defining_site, "allocated region variable");
        self.vars.push(RegionVariable {
            id,
            kind,
            name,
            defining_site,
            points: FxHashSet::default(),
        });
        id
    }

    /// Looks up a region variable.
    #[must_use]
    pub fn get(&self, id: RegionVid) -> Option<&RegionVariable> {
        self.vars.get(id.index())
    }

    /// All region variables in id order.
    pub fn iter(&self) -> impl Iterator<Item = &RegionVariable> {
        self.vars.iter()
    }

    /// Number of region variables, `'static` included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Always `false`: `'static` is never removed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Adds `point` to `region`; returns whether the region grew.
    pub fn add_point(&mut self, region: RegionVid, point: NodeId) -> bool {
        self.vars
            .get_mut(region.index())
            .is_some_and(|var| var.points.insert(point))
    }

    /// Adds every point of `shorter` to `longer`; returns whether `longer` grew.
    pub fn union_points(&mut self, longer: RegionVid, shorter: RegionVid) -> bool {
        if longer == shorter {
            return false;
        }
        let Some(incoming) = self.get(shorter).map(|var| var.sorted_points()) else {
            return false;
        };
        let Some(target) = self.vars.get_mut(longer.index()) else {
            return false;
        };
        let before = target.points.len();
        target.points.extend(incoming);
        target.points.len() != before
    }
}

impl Default for RegionArena {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<RegionVid> for RegionArena {
    type Output = RegionVariable;

    fn index(&self, id: RegionVid) -> &RegionVariable {
        &self.vars[id.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_is_first() {
        let mut arena = RegionArena::new();
        let fresh = arena.fresh(RegionKind::Existential, None, None);

        assert_eq!(arena[RegionVid::STATIC].name, "static");
        assert_eq!(arena[RegionVid::STATIC].kind, RegionKind::Universal);
        assert_eq!(fresh, RegionVid(1));
        assert_eq!(arena[fresh].name, "1");
    }

    #[test]
    fn test_union_reports_growth_once() {
        let mut arena = RegionArena::new();
        let longer = arena.fresh(RegionKind::Existential, None, None);
        let shorter = arena.fresh(RegionKind::Existential, None, None);
        arena.add_point(shorter, NodeId(4));

        assert!(arena.union_points(longer, shorter));
        assert!(!arena.union_points(longer, shorter));
        assert!(arena[longer].contains(NodeId(4)));
        assert!(!arena.union_points(longer, longer));
    }
}
