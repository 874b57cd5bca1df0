//! Control-flow graph over a [`cr_ast::Function`] body.
//!
//! Building the graph from the syntax tree and computing liveness are done by
//! the front end; this crate only fixes the shape both are handed over in.
//! Nodes point back into the function's [`cr_ast::Body`] arenas.

mod error;
mod liveness;

pub use error::{CfgError, CfgResult};
pub use liveness::Liveness;

use cr_ast::{ExprId, StmtId};
use cr_span::FileSpan;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a CFG node; also the "program point" regions are made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Position of the node in [`Cfg::nodes`].
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a CFG node executes.
#[derive(Debug, Clone, PartialEq)]
pub enum CfgNodeKind {
    /// Function entry
    Start,
    /// Function exit
    End,
    /// Straight-line statements, executed in order
    InstList {
        /// Statements of the node
        stmts: Vec<StmtId>,
    },
    /// Two-way branch on `cond`
    If {
        /// Branch condition
        cond: ExprId,
    },
    /// Loop header evaluating `cond`
    Loop {
        /// Loop condition
        cond: ExprId,
    },
    /// `return` with an optional value
    Return {
        /// Returned expression
        value: Option<ExprId>,
        /// Location of the `return` statement
        span: FileSpan,
    },
    /// Multi-way branch
    Switch {
        /// Switched-on expression
        discriminant: ExprId,
        /// Location of the `switch` statement
        span: FileSpan,
    },
    /// `break`, `continue` or `goto`: control transfer only
    Jump,
}

impl CfgNodeKind {
    /// Short name of the node kind, for diagnostics.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::End => "end",
            Self::InstList { .. } => "inst_list",
            Self::If { .. } => "if",
            Self::Loop { .. } => "loop",
            Self::Return { .. } => "return",
            Self::Switch { .. } => "switch",
            Self::Jump => "jump",
        }
    }
}

/// A node together with its edges.
#[derive(Debug, Clone, PartialEq)]
pub struct CfgNode {
    /// Node identifier
    pub id: NodeId,
    /// Node payload
    pub kind: CfgNodeKind,
    successors: Vec<NodeId>,
    predecessors: Vec<NodeId>,
}

impl CfgNode {
    /// Nodes control may flow to next.
    #[must_use]
    pub fn successors(&self) -> &[NodeId] {
        &self.successors
    }

    /// Nodes control may arrive from.
    #[must_use]
    pub fn predecessors(&self) -> &[NodeId] {
        &self.predecessors
    }
}

/// Control-flow graph of one function.
#[derive(Debug, Clone)]
pub struct Cfg {
    nodes: Vec<CfgNode>,
    start: NodeId,
    end: Option<NodeId>,
}

impl Cfg {
    /// All nodes, indexed by [`NodeId::index`].
    #[must_use]
    pub fn nodes(&self) -> &[CfgNode] {
        &self.nodes
    }

    /// Looks up a node.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&CfgNode> {
        self.nodes.get(id.index())
    }

    /// Entry node.
    #[must_use]
    pub fn start(&self) -> NodeId {
        self.start
    }

    /// Exit node, if the front end designated one.
    #[must_use]
    pub fn end(&self) -> Option<NodeId> {
        self.end
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Successors of `id`; empty for unknown nodes.
    #[must_use]
    pub fn successors(&self, id: NodeId) -> &[NodeId] {
        match self.get(id) {
            Some(node) => &node.successors,
            None => &[],
        }
    }

    /// Predecessors of `id`; empty for unknown nodes.
    #[must_use]
    pub fn predecessors(&self, id: NodeId) -> &[NodeId] {
        match self.get(id) {
            Some(node) => &node.predecessors,
            None => &[],
        }
    }

    /// Nodes reachable from the start node, in reverse postorder.
    ///
    /// Forward dataflow problems converge fastest when seeded in this order.
    #[must_use]
    pub fn reverse_postorder(&self) -> Vec<NodeId> {
        let mut visited = FxHashSet::default();
        let mut postorder = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![(self.start, 0_usize)];
        visited.insert(self.start);

        while let Some((node, next_succ)) = stack.pop() {
            let succs = self.successors(node);
            if let Some(&succ) = succs.get(next_succ) {
                stack.push((node, next_succ + 1));
                if visited.insert(succ) {
                    stack.push((succ, 0));
                }
            } else {
                postorder.push(node);
            }
        }

        postorder.reverse();
        postorder
    }
}

/// Incremental constructor for [`Cfg`].
#[derive(Debug, Default)]
pub struct CfgBuilder {
    kinds: Vec<CfgNodeKind>,
    edges: Vec<(NodeId, NodeId)>,
    start: Option<NodeId>,
    end: Option<NodeId>,
}

impl CfgBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node and returns its id.
    pub fn add_node(&mut self, kind: CfgNodeKind) -> NodeId {
        let id = NodeId(self.kinds.len() as u32);
        match kind {
            CfgNodeKind::Start if self.start.is_none() => self.start = Some(id),
            CfgNodeKind::End if self.end.is_none() => self.end = Some(id),
            _ => {}
        }
        self.kinds.push(kind);
        id
    }

    /// Adds a `from -> to` edge. Duplicate edges are ignored.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId) -> &mut Self {
        if !self.edges.contains(&(from, to)) {
            self.edges.push((from, to));
        }
        self
    }

    /// Chains `nodes` with consecutive edges.
    pub fn add_path(&mut self, nodes: &[NodeId]) -> &mut Self {
        for pair in nodes.windows(2) {
            self.add_edge(pair[0], pair[1]);
        }
        self
    }

    /// Overrides the entry node. By default the first `Start` node is used.
    pub fn set_start(&mut self, start: NodeId) -> &mut Self {
        self.start = Some(start);
        self
    }

    /// Validates and freezes the graph.
    ///
    /// # Errors
    ///
    /// Fails if no start node was designated or if the start node or an edge
    /// endpoint lies outside the graph.
    pub fn build(self) -> CfgResult<Cfg> {
        let count = self.kinds.len();
        let start = self.start.ok_or(CfgError::MissingStart)?;
        if start.index() >= count {
            return Err(CfgError::InvalidStart(start));
        }

        let mut nodes: Vec<CfgNode> = self
            .kinds
            .into_iter()
            .enumerate()
            .map(|(idx, kind)| CfgNode {
                id: NodeId(idx as u32),
                kind,
                successors: Vec::new(),
                predecessors: Vec::new(),
            })
            .collect();

        for (from, to) in self.edges {
            if from.index() >= count || to.index() >= count {
                return Err(CfgError::InvalidEdge { from, to });
            }
            nodes[from.index()].successors.push(to);
            nodes[to.index()].predecessors.push(from);
        }

        Ok(Cfg {
            nodes,
            start,
            end: self.end,
        })
    }
}
