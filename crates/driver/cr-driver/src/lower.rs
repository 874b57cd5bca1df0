//! Lowering of fixtures into the syntax tree, CFG and liveness facts.

use cr_ast::{
    BinaryOp, DeclId, Expr, ExprId, Function, Literal, Stmt, StmtId, TypeRef, TypeRefId, UnaryOp,
};
use cr_cfg::{Cfg, CfgBuilder, CfgNodeKind, Liveness, NodeId};
use cr_intern::{Interner, Symbol};
use cr_span::{FileId, FileSpan};
use rustc_hash::FxHashMap;

use crate::{
    error::{DriverError, DriverResult},
    fixture::{ExprFixture, FunctionFixture, NodeFixture, NodeKindFixture, StmtFixture, TypeFixture},
};

/// A function ready to be region-checked.
#[derive(Debug)]
pub struct LoweredFunction {
    /// Names used by the function
    pub interner: Interner,
    /// Syntax tree
    pub function: Function,
    /// Control-flow graph
    pub cfg: Cfg,
    /// Per-node liveness
    pub liveness: Liveness,
}

/// Lowers `fixture`, attributing every span to `file`.
///
/// Nodes are lowered in ascending id order. A name resolves to the most
/// recent declaration lowered before the use, parameters first.
pub fn lower_fixture(fixture: &FunctionFixture, file: FileId) -> DriverResult<LoweredFunction> {
    let mut nodes: Vec<&NodeFixture> = fixture.nodes.iter().collect();
    nodes.sort_by_key(|node| node.id);
    if let Some((_, node)) = nodes
        .iter()
        .enumerate()
        .find(|(index, node)| node.id as usize != *index)
    {
        return Err(DriverError::NodeIds {
            count: nodes.len(),
            found: node.id,
        });
    }

    let mut interner = Interner::new();
    let name = interner.intern(&fixture.name);
    let mut lowerer = Lowerer {
        interner,
        function: Function::new(name, FileSpan::detached(file)),
        scope: FxHashMap::default(),
        file,
        node: 0,
        span: FileSpan::detached(file),
    };

    for param in &fixture.params {
        let ty = lowerer.lower_type(&param.ty);
        let name = lowerer.interner.intern(&param.name);
        let decl = lowerer.function.add_param(name, ty, lowerer.span);
        lowerer.scope.insert(name, decl);
    }
    lowerer.function.return_ty = fixture.return_ty.as_ref().map(|ty| lowerer.lower_type(ty));

    let mut builder = CfgBuilder::new();
    let mut liveness = Liveness::new();
    for node in &nodes {
        let kind = lowerer.lower_node(node)?;
        let id = builder.add_node(kind);
        let live_in: Vec<Symbol> = node.live_in.iter().map(|name| lowerer.interner.intern(name)).collect();
        let live_out: Vec<Symbol> = node.live_out.iter().map(|name| lowerer.interner.intern(name)).collect();
        liveness.set_live_in(id, live_in);
        liveness.set_live_out(id, live_out);
    }
    for node in &nodes {
        for &succ in &node.succ {
            builder.add_edge(NodeId(node.id), NodeId(succ));
        }
    }
    builder.set_start(NodeId(fixture.start));

    Ok(LoweredFunction {
        interner: lowerer.interner,
        function: lowerer.function,
        cfg: builder.build()?,
        liveness,
    })
}

struct Lowerer {
    interner: Interner,
    function: Function,
    scope: FxHashMap<Symbol, DeclId>,
    file: FileId,
    node: u32,
    span: FileSpan,
}

impl Lowerer {
    fn lower_node(&mut self, node: &NodeFixture) -> DriverResult<CfgNodeKind> {
        self.node = node.id;
        self.span = node
            .span
            .map_or_else(|| FileSpan::detached(self.file), |span| FileSpan::new(self.file, span));

        Ok(match &node.kind {
            NodeKindFixture::Start => CfgNodeKind::Start,
            NodeKindFixture::End => CfgNodeKind::End,
            NodeKindFixture::Jump => CfgNodeKind::Jump,
            NodeKindFixture::InstList { stmts } => CfgNodeKind::InstList {
                stmts: stmts
                    .iter()
                    .map(|stmt| self.lower_stmt(stmt))
                    .collect::<DriverResult<_>>()?,
            },
            NodeKindFixture::If { cond } => CfgNodeKind::If {
                cond: self.lower_expr(cond)?,
            },
            NodeKindFixture::Loop { cond } => CfgNodeKind::Loop {
                cond: self.lower_expr(cond)?,
            },
            NodeKindFixture::Return { value } => CfgNodeKind::Return {
                value: value.as_ref().map(|value| self.lower_expr(value)).transpose()?,
                span: self.span,
            },
            NodeKindFixture::Switch { discriminant } => CfgNodeKind::Switch {
                discriminant: self.lower_expr(discriminant)?,
                span: self.span,
            },
        })
    }

    fn lower_stmt(&mut self, stmt: &StmtFixture) -> DriverResult<StmtId> {
        Ok(match stmt {
            StmtFixture::Decl { name, ty, init } => {
                let ty = self.lower_type(ty);
                let init = init.as_ref().map(|init| self.lower_expr(init)).transpose()?;
                let name = self.interner.intern(name);
                let (decl, stmt) = self.function.body.local(name, ty, init, self.span);
                self.scope.insert(name, decl);
                stmt
            }
            StmtFixture::Expr { expr } => {
                let expr = self.lower_expr(expr)?;
                self.function.body.expr_stmt(expr)
            }
            StmtFixture::Label { name } => {
                let name = self.interner.intern(name);
                self.function.body.alloc_stmt(Stmt::Label {
                    name,
                    span: self.span,
                })
            }
        })
    }

    fn lower_expr(&mut self, expr: &ExprFixture) -> DriverResult<ExprId> {
        let span = self.span;
        let lowered = match expr {
            ExprFixture::Int { value } => Expr::Literal {
                value: Literal::Int(*value),
                span,
            },
            ExprFixture::Float { value } => Expr::Literal {
                value: Literal::Float(*value),
                span,
            },
            ExprFixture::Bool { value } => Expr::Literal {
                value: Literal::Bool(*value),
                span,
            },
            ExprFixture::Char { value } => Expr::Literal {
                value: Literal::Char(*value),
                span,
            },
            ExprFixture::Var { name } => Expr::VarRef {
                decl: self.resolve(name)?,
                span,
            },
            ExprFixture::Assign { left, right } => Expr::Binary {
                op: BinaryOp::Assign,
                left: self.lower_expr(left)?,
                right: self.lower_expr(right)?,
                span,
            },
            ExprFixture::Binary { op, left, right } => Expr::Binary {
                op: *op,
                left: self.lower_expr(left)?,
                right: self.lower_expr(right)?,
                span,
            },
            ExprFixture::AddrOf { operand } => Expr::Unary {
                op: UnaryOp::AddrOf,
                operand: self.lower_expr(operand)?,
                span,
            },
            ExprFixture::Deref { operand } => Expr::Unary {
                op: UnaryOp::Deref,
                operand: self.lower_expr(operand)?,
                span,
            },
            ExprFixture::Unary { op, operand } => Expr::Unary {
                op: *op,
                operand: self.lower_expr(operand)?,
                span,
            },
            ExprFixture::Call { callee, args, ty } => Expr::Call {
                callee: self.interner.intern(callee),
                args: args
                    .iter()
                    .map(|arg| self.lower_expr(arg))
                    .collect::<DriverResult<_>>()?,
                ty: ty.as_ref().map(|ty| self.lower_type(ty)),
                span,
            },
            ExprFixture::Paren { inner } => Expr::Paren {
                inner: self.lower_expr(inner)?,
                span,
            },
            ExprFixture::Member { base, field, arrow } => Expr::MemberAccess {
                base: self.lower_expr(base)?,
                field: self.interner.intern(field),
                arrow: *arrow,
                span,
            },
        };
        Ok(self.function.body.alloc_expr(lowered))
    }

    fn lower_type(&mut self, ty: &TypeFixture) -> TypeRefId {
        let lowered = match ty {
            TypeFixture::Builtin { name } => TypeRef::Builtin(*name),
            TypeFixture::Pointer { pointee } => TypeRef::Pointer {
                pointee: self.lower_type(pointee),
            },
            TypeFixture::Qualified { qualifiers, inner } => TypeRef::Qualified {
                qualifiers: *qualifiers,
                inner: self.lower_type(inner),
            },
            TypeFixture::Typedef { name, underlying } => TypeRef::Typedef {
                name: self.interner.intern(name),
                underlying: self.lower_type(underlying),
            },
            TypeFixture::Elaborated { keyword, name } => TypeRef::Elaborated {
                keyword: *keyword,
                name: self.interner.intern(name),
            },
        };
        self.function.body.alloc_type(lowered)
    }

    fn resolve(&self, name: &str) -> DriverResult<DeclId> {
        self.interner
            .get(name)
            .and_then(|symbol| self.scope.get(&symbol).copied())
            .ok_or_else(|| DriverError::UnresolvedName {
                name: name.to_string(),
                node: self.node,
            })
    }
}
