//! Typed syntax tree consumed by the Coral region checker.
//!
//! The tree is produced by an external front end (parsing, name resolution,
//! typing and normalization all happen before this point). Every category of
//! node is a closed enum so that consumers dispatch with exhaustive matches.
//!
//! All nodes of one function live in the arenas of its [`Body`]; they are
//! referred to by index ([`ExprId`], [`StmtId`], [`DeclId`], [`TypeRefId`]).

mod expr;
mod types;

pub use expr::{BinaryOp, Expr, Literal, Stmt, UnaryOp};
pub use types::{BuiltinKind, Qualifiers, TagKind, TypeRef};

use cr_intern::Symbol;
use cr_span::FileSpan;
use la_arena::{Arena, Idx};

/// Expression node ID
pub type ExprId = Idx<Expr>;
/// Statement node ID
pub type StmtId = Idx<Stmt>;
/// Variable declaration ID
pub type DeclId = Idx<VarDecl>;
/// Surface type node ID
pub type TypeRefId = Idx<TypeRef>;

/// A declared variable: either a function parameter or a local.
#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    /// Declared name
    pub name: Symbol,
    /// Declared surface type
    pub ty: TypeRefId,
    /// Initializer expression, if any (always `None` for parameters)
    pub init: Option<ExprId>,
    /// Whether this declaration is a function parameter
    pub is_param: bool,
    /// Source location
    pub span: FileSpan,
}

/// A function whose body is to be region-checked.
#[derive(Debug, Clone)]
pub struct Function {
    /// Function name
    pub name: Symbol,
    /// Parameters, in declaration order
    pub params: Vec<DeclId>,
    /// Declared return type, `None` for `void`
    pub return_ty: Option<TypeRefId>,
    /// Node storage
    pub body: Body,
    /// Source location of the whole definition
    pub span: FileSpan,
}

impl Function {
    /// Creates a function with an empty body and no parameters.
    #[must_use]
    pub fn new(name: Symbol, span: FileSpan) -> Self {
        Self {
            name,
            params: Vec::new(),
            return_ty: None,
            body: Body::new(),
            span,
        }
    }

    /// Declares a new parameter and appends it to the signature.
    pub fn add_param(&mut self, name: Symbol, ty: TypeRefId, span: FileSpan) -> DeclId {
        let decl = self.body.alloc_decl(VarDecl {
            name,
            ty,
            init: None,
            is_param: true,
            span,
        });
        self.params.push(decl);
        decl
    }

    /// Iterates over parameter declarations in order.
    pub fn param_decls(&self) -> impl Iterator<Item = (DeclId, &VarDecl)> + '_ {
        self.params.iter().map(|&id| (id, &self.body.decls[id]))
    }
}

/// Arena storage for every node of one function.
#[derive(Debug, Clone, Default)]
pub struct Body {
    /// Expressions
    pub exprs: Arena<Expr>,
    /// Statements
    pub stmts: Arena<Stmt>,
    /// Variable declarations (parameters and locals)
    pub decls: Arena<VarDecl>,
    /// Surface types
    pub types: Arena<TypeRef>,
}

impl Body {
    /// Creates an empty body.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates an expression.
    pub fn alloc_expr(&mut self, expr: Expr) -> ExprId {
        self.exprs.alloc(expr)
    }

    /// Allocates a statement.
    pub fn alloc_stmt(&mut self, stmt: Stmt) -> StmtId {
        self.stmts.alloc(stmt)
    }

    /// Allocates a declaration.
    pub fn alloc_decl(&mut self, decl: VarDecl) -> DeclId {
        self.decls.alloc(decl)
    }

    /// Allocates a surface type.
    pub fn alloc_type(&mut self, ty: TypeRef) -> TypeRefId {
        self.types.alloc(ty)
    }

    /// Allocates a builtin type.
    pub fn builtin(&mut self, kind: BuiltinKind) -> TypeRefId {
        self.alloc_type(TypeRef::Builtin(kind))
    }

    /// Allocates a pointer to `pointee`.
    pub fn pointer(&mut self, pointee: TypeRefId) -> TypeRefId {
        self.alloc_type(TypeRef::Pointer { pointee })
    }

    /// Wraps `inner` in `qualifiers`.
    pub fn qualified(&mut self, qualifiers: Qualifiers, inner: TypeRefId) -> TypeRefId {
        self.alloc_type(TypeRef::Qualified { qualifiers, inner })
    }

    /// Declares a local variable with an optional initializer and returns the
    /// declaration together with its `Decl` statement.
    pub fn local(
        &mut self,
        name: Symbol,
        ty: TypeRefId,
        init: Option<ExprId>,
        span: FileSpan,
    ) -> (DeclId, StmtId) {
        let decl = self.alloc_decl(VarDecl {
            name,
            ty,
            init,
            is_param: false,
            span,
        });
        (decl, self.alloc_stmt(Stmt::Decl(decl)))
    }

    /// Allocates a reference to `decl`.
    pub fn var_ref(&mut self, decl: DeclId, span: FileSpan) -> ExprId {
        self.alloc_expr(Expr::VarRef { decl, span })
    }

    /// Allocates `left = right`.
    pub fn assign(&mut self, left: ExprId, right: ExprId, span: FileSpan) -> ExprId {
        self.alloc_expr(Expr::Binary {
            op: BinaryOp::Assign,
            left,
            right,
            span,
        })
    }

    /// Allocates a unary expression.
    pub fn unary(&mut self, op: UnaryOp, operand: ExprId, span: FileSpan) -> ExprId {
        self.alloc_expr(Expr::Unary { op, operand, span })
    }

    /// Allocates an integer literal.
    pub fn int(&mut self, value: i64, span: FileSpan) -> ExprId {
        self.alloc_expr(Expr::Literal {
            value: Literal::Int(value),
            span,
        })
    }

    /// Allocates an expression statement.
    pub fn expr_stmt(&mut self, expr: ExprId) -> StmtId {
        self.alloc_stmt(Stmt::Expr(expr))
    }
}
