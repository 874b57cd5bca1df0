//! Precomputed liveness sets.

use cr_intern::Symbol;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::NodeId;

/// Per-node live variable names, as computed by the front end.
///
/// Nodes without an entry have empty sets.
#[derive(Debug, Clone, Default)]
pub struct Liveness {
    live_in: FxHashMap<NodeId, FxHashSet<Symbol>>,
    live_out: FxHashMap<NodeId, FxHashSet<Symbol>>,
}

impl Liveness {
    /// Creates an empty liveness table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the names live on entry to `node`.
    pub fn set_live_in(&mut self, node: NodeId, names: impl IntoIterator<Item = Symbol>) {
        self.live_in.insert(node, names.into_iter().collect());
    }

    /// Replaces the names live on exit from `node`.
    pub fn set_live_out(&mut self, node: NodeId, names: impl IntoIterator<Item = Symbol>) {
        self.live_out.insert(node, names.into_iter().collect());
    }

    /// Names live on entry to `node`.
    #[must_use]
    pub fn live_in(&self, node: NodeId) -> Option<&FxHashSet<Symbol>> {
        self.live_in.get(&node)
    }

    /// Names live on exit from `node`.
    #[must_use]
    pub fn live_out(&self, node: NodeId) -> Option<&FxHashSet<Symbol>> {
        self.live_out.get(&node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cr_intern::Interner;

    #[test]
    fn test_missing_entries_are_absent() {
        let mut interner = Interner::new();
        let ptr = interner.intern("p");
        let mut liveness = Liveness::new();
        liveness.set_live_in(NodeId(2), [ptr]);

        assert!(liveness.live_in(NodeId(2)).is_some_and(|set| set.contains(&ptr)));
        assert!(liveness.live_in(NodeId(3)).is_none());
        assert!(liveness.live_out(NodeId(2)).is_none());
    }
}
