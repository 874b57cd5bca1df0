//! Serialized form of a typed function, its CFG and its liveness facts.
//!
//! ```json
//! {
//!   "name": "f",
//!   "params": [{ "name": "p", "ty": { "kind": "pointer", "pointee": { "kind": "builtin", "name": "int" } } }],
//!   "start": 0,
//!   "nodes": [
//!     { "id": 0, "kind": "start", "succ": [1] },
//!     { "id": 1, "kind": "inst_list", "succ": [2], "live_in": ["p"],
//!       "stmts": [{ "kind": "expr", "expr": { "kind": "deref", "operand": { "kind": "var", "name": "p" } } }] },
//!     { "id": 2, "kind": "end" }
//!   ]
//! }
//! ```

use cr_ast::{BinaryOp, BuiltinKind, Qualifiers, TagKind, UnaryOp};
use cr_span::Span;
use serde::{Deserialize, Serialize};

/// A whole function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionFixture {
    /// Function name
    pub name: String,
    /// Parameters in order
    #[serde(default)]
    pub params: Vec<ParamFixture>,
    /// Return type, absent for `void`
    #[serde(default)]
    pub return_ty: Option<TypeFixture>,
    /// Entry node id
    #[serde(default)]
    pub start: u32,
    /// CFG nodes; ids must be `0..nodes.len()`
    pub nodes: Vec<NodeFixture>,
}

/// A function parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamFixture {
    /// Parameter name
    pub name: String,
    /// Declared type
    pub ty: TypeFixture,
}

/// A CFG node with its outgoing edges and liveness facts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeFixture {
    /// Node id
    pub id: u32,
    /// Node payload
    #[serde(flatten)]
    pub kind: NodeKindFixture,
    /// Successor ids
    #[serde(default)]
    pub succ: Vec<u32>,
    /// Variables live on entry
    #[serde(default)]
    pub live_in: Vec<String>,
    /// Variables live on exit
    #[serde(default)]
    pub live_out: Vec<String>,
    /// Source range of the node's statements
    #[serde(default)]
    pub span: Option<Span>,
}

/// Node payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeKindFixture {
    /// Function entry
    Start,
    /// Function exit
    End,
    /// Straight-line statements
    InstList {
        /// Statements in order
        stmts: Vec<StmtFixture>,
    },
    /// Two-way branch
    If {
        /// Condition
        cond: ExprFixture,
    },
    /// Loop header
    Loop {
        /// Condition
        cond: ExprFixture,
    },
    /// `return`
    Return {
        /// Returned value
        #[serde(default)]
        value: Option<ExprFixture>,
    },
    /// Multi-way branch
    Switch {
        /// Switched-on value
        discriminant: ExprFixture,
    },
    /// `break`, `continue` or `goto`
    Jump,
}

/// Statement inside an instruction list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StmtFixture {
    /// Local declaration
    Decl {
        /// Variable name
        name: String,
        /// Declared type
        ty: TypeFixture,
        /// Initializer
        #[serde(default)]
        init: Option<ExprFixture>,
    },
    /// Expression statement
    Expr {
        /// Evaluated expression
        expr: ExprFixture,
    },
    /// Label
    Label {
        /// Label name
        name: String,
    },
}

/// Expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExprFixture {
    /// Integer literal
    Int {
        /// Value
        value: i64,
    },
    /// Floating-point literal
    Float {
        /// Value
        value: f64,
    },
    /// Boolean literal
    Bool {
        /// Value
        value: bool,
    },
    /// Character literal
    Char {
        /// Value
        value: char,
    },
    /// Variable use
    Var {
        /// Variable name
        name: String,
    },
    /// `left = right`
    Assign {
        /// Destination
        left: Box<ExprFixture>,
        /// Value
        right: Box<ExprFixture>,
    },
    /// Other binary operation
    Binary {
        /// Operator
        op: BinaryOp,
        /// Left operand
        left: Box<ExprFixture>,
        /// Right operand
        right: Box<ExprFixture>,
    },
    /// `&operand`
    AddrOf {
        /// Borrowed place
        operand: Box<ExprFixture>,
    },
    /// `*operand`
    Deref {
        /// Dereferenced pointer
        operand: Box<ExprFixture>,
    },
    /// Other unary operation
    Unary {
        /// Operator
        op: UnaryOp,
        /// Operand
        operand: Box<ExprFixture>,
    },
    /// Call of a named function
    Call {
        /// Callee name
        callee: String,
        /// Arguments
        #[serde(default)]
        args: Vec<ExprFixture>,
        /// Result type, absent for `void`
        #[serde(default)]
        ty: Option<TypeFixture>,
    },
    /// `(inner)`
    Paren {
        /// Wrapped expression
        inner: Box<ExprFixture>,
    },
    /// `base.field` or `base->field`
    Member {
        /// Accessed expression
        base: Box<ExprFixture>,
        /// Field name
        field: String,
        /// `->` instead of `.`
        #[serde(default)]
        arrow: bool,
    },
}

/// Surface type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeFixture {
    /// Builtin scalar
    Builtin {
        /// Scalar kind
        name: BuiltinKind,
    },
    /// Pointer
    Pointer {
        /// Pointed-to type
        pointee: Box<TypeFixture>,
    },
    /// Qualified type
    Qualified {
        /// Qualifiers
        qualifiers: Qualifiers,
        /// Unqualified type
        inner: Box<TypeFixture>,
    },
    /// Typedef
    Typedef {
        /// Alias name
        name: String,
        /// Aliased type
        underlying: Box<TypeFixture>,
    },
    /// `struct`/`union`/`enum` type
    Elaborated {
        /// Tag keyword
        keyword: TagKind,
        /// Tag name
        name: String,
    },
}
