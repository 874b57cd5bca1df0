//! Expressions and statements.

use cr_intern::Symbol;
use cr_span::FileSpan;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{DeclId, ExprId, TypeRefId};

/// Literal value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Literal {
    /// Integer literal
    Int(i64),
    /// Floating-point literal
    Float(f64),
    /// Boolean literal
    Bool(bool),
    /// Character literal
    Char(char),
}

/// Binary operator.
///
/// Compound assignments (`+=`, ...) are expected to have been rewritten into
/// plain assignments by the front end's normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOp {
    /// `=`
    Assign,
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Rem,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `&&`
    And,
    /// `||`
    Or,
    /// `&`
    BitAnd,
    /// `|`
    BitOr,
    /// `^`
    BitXor,
    /// `<<`
    Shl,
    /// `>>`
    Shr,
}

impl BinaryOp {
    /// Returns `true` for `=`.
    #[must_use]
    pub fn is_assignment(self) -> bool {
        matches!(self, Self::Assign)
    }

    /// Operator as written in source.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Assign => "=",
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Rem => "%",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::And => "&&",
            Self::Or => "||",
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::BitXor => "^",
            Self::Shl => "<<",
            Self::Shr => ">>",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unary operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryOp {
    /// `&operand`, takes a borrow
    AddrOf,
    /// `*operand`
    Deref,
    /// `-operand`
    Neg,
    /// `+operand`
    Plus,
    /// `!operand`
    Not,
    /// `~operand`
    BitNot,
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::AddrOf => "&",
            Self::Deref => "*",
            Self::Neg => "-",
            Self::Plus => "+",
            Self::Not => "!",
            Self::BitNot => "~",
        })
    }
}

/// Expression node
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Literal constant
    Literal {
        /// Value
        value: Literal,
        /// Source location
        span: FileSpan,
    },

    /// Binary operation, including plain assignment
    Binary {
        /// Operator
        op: BinaryOp,
        /// Left operand (the destination for assignments)
        left: ExprId,
        /// Right operand
        right: ExprId,
        /// Source location
        span: FileSpan,
    },

    /// Unary operation, including `&` and `*`
    Unary {
        /// Operator
        op: UnaryOp,
        /// Operand
        operand: ExprId,
        /// Source location
        span: FileSpan,
    },

    /// Call of a named function
    Call {
        /// Callee name
        callee: Symbol,
        /// Arguments
        args: Vec<ExprId>,
        /// Result type, `None` for `void`
        ty: Option<TypeRefId>,
        /// Source location
        span: FileSpan,
    },

    /// Use of a declared variable
    VarRef {
        /// The declaration this name resolved to
        decl: DeclId,
        /// Source location
        span: FileSpan,
    },

    /// Parenthesized expression
    Paren {
        /// Wrapped expression
        inner: ExprId,
        /// Source location
        span: FileSpan,
    },

    /// Field access `base.field` or `base->field`
    MemberAccess {
        /// Accessed expression
        base: ExprId,
        /// Field name
        field: Symbol,
        /// `true` for `->`
        arrow: bool,
        /// Source location
        span: FileSpan,
    },
}

impl Expr {
    /// Returns the source location of this expression.
    #[must_use]
    pub fn span(&self) -> FileSpan {
        match self {
            Self::Literal { span, .. }
            | Self::Binary { span, .. }
            | Self::Unary { span, .. }
            | Self::Call { span, .. }
            | Self::VarRef { span, .. }
            | Self::Paren { span, .. }
            | Self::MemberAccess { span, .. } => *span,
        }
    }

    /// Short name of the node kind, for diagnostics.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Literal { .. } => "literal",
            Self::Binary { .. } => "binary operation",
            Self::Unary { .. } => "unary operation",
            Self::Call { .. } => "call",
            Self::VarRef { .. } => "variable reference",
            Self::Paren { .. } => "parenthesized expression",
            Self::MemberAccess { .. } => "member access",
        }
    }

    /// Returns `true` for a bare variable reference.
    #[must_use]
    pub fn is_var_ref(&self) -> bool {
        matches!(self, Self::VarRef { .. })
    }

    /// Returns `true` for a single `*operand`.
    #[must_use]
    pub fn is_deref(&self) -> bool {
        matches!(
            self,
            Self::Unary {
                op: UnaryOp::Deref,
                ..
            }
        )
    }
}

/// Statement node, as referenced from CFG instruction lists
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// Local variable declaration
    Decl(DeclId),
    /// Expression evaluated for its effect
    Expr(ExprId),
    /// Label or other wrapper statement without effect on memory
    Label {
        /// Label name
        name: Symbol,
        /// Source location
        span: FileSpan,
    },
}
