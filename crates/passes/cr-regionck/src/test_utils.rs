//! Hand-built functions for unit tests.

use cr_ast::{BuiltinKind, DeclId, ExprId, Function, Qualifiers, StmtId, TypeRefId, UnaryOp};
use cr_cfg::{Cfg, CfgBuilder, CfgNodeKind, Liveness, NodeId};
use cr_intern::{Interner, Symbol};
use cr_span::{FileId, FileSpan};
use rustc_hash::FxHashMap;

use crate::{RegionckConfig, RegionckResult, regionck::Regionck};

pub(crate) fn span() -> FileSpan {
    FileSpan::detached(FileId(0))
}

/// A function under construction, with names resolved to their latest
/// declaration.
pub(crate) struct TestFunction {
    pub interner: Interner,
    pub function: Function,
    pub builder: CfgBuilder,
    pub liveness: Liveness,
    scope: FxHashMap<Symbol, DeclId>,
}

impl TestFunction {
    pub fn new() -> Self {
        let mut interner = Interner::new();
        let name = interner.intern("f");
        Self {
            interner,
            function: Function::new(name, span()),
            builder: CfgBuilder::new(),
            liveness: Liveness::new(),
            scope: FxHashMap::default(),
        }
    }

    pub fn int(&mut self) -> TypeRefId {
        self.function.body.builtin(BuiltinKind::Int)
    }

    pub fn const_int(&mut self) -> TypeRefId {
        let int = self.int();
        self.function.body.qualified(Qualifiers::CONST, int)
    }

    pub fn ptr(&mut self, pointee: TypeRefId) -> TypeRefId {
        self.function.body.pointer(pointee)
    }

    pub fn param(&mut self, name: &str, ty: TypeRefId) -> DeclId {
        let name = self.interner.intern(name);
        let decl = self.function.add_param(name, ty, span());
        self.scope.insert(name, decl);
        decl
    }

    pub fn local(&mut self, name: &str, ty: TypeRefId, init: Option<ExprId>) -> StmtId {
        let name = self.interner.intern(name);
        let (decl, stmt) = self.function.body.local(name, ty, init, span());
        self.scope.insert(name, decl);
        stmt
    }

    pub fn var(&mut self, name: &str) -> ExprId {
        let decl = self.scope[&self.interner.intern(name)];
        self.function.body.var_ref(decl, span())
    }

    pub fn deref(&mut self, operand: ExprId) -> ExprId {
        self.function.body.unary(UnaryOp::Deref, operand, span())
    }

    pub fn addr_of(&mut self, operand: ExprId) -> ExprId {
        self.function.body.unary(UnaryOp::AddrOf, operand, span())
    }

    pub fn lit(&mut self, value: i64) -> ExprId {
        self.function.body.int(value, span())
    }

    pub fn assign(&mut self, left: ExprId, right: ExprId) -> StmtId {
        let expr = self.function.body.assign(left, right, span());
        self.function.body.expr_stmt(expr)
    }

    pub fn stmt(&mut self, expr: ExprId) -> StmtId {
        self.function.body.expr_stmt(expr)
    }

    pub fn node(&mut self, kind: CfgNodeKind) -> NodeId {
        self.builder.add_node(kind)
    }

    pub fn inst(&mut self, stmts: Vec<StmtId>) -> NodeId {
        self.node(CfgNodeKind::InstList { stmts })
    }

    pub fn live_in(&mut self, node: NodeId, names: &[&str]) {
        let names: Vec<Symbol> = names.iter().map(|name| self.interner.intern(name)).collect();
        self.liveness.set_live_in(node, names);
    }

    pub fn finish(self) -> Built {
        Built {
            interner: self.interner,
            function: self.function,
            cfg: self.builder.build().unwrap(),
            liveness: self.liveness,
        }
    }
}

pub(crate) struct Built {
    pub interner: Interner,
    pub function: Function,
    pub cfg: Cfg,
    pub liveness: Liveness,
}

impl Built {
    pub fn annotate(&self) -> RegionckResult<Regionck<'_>> {
        Regionck::new(
            &self.function,
            &self.cfg,
            &self.liveness,
            &self.interner,
            RegionckConfig::default(),
        )
    }

    pub fn check_with(&self, config: RegionckConfig) -> RegionckResult<Regionck<'_>> {
        Regionck::check(
            &self.function,
            &self.cfg,
            &self.liveness,
            &self.interner,
            config,
        )
    }

    pub fn check(&self) -> RegionckResult<Regionck<'_>> {
        self.check_with(RegionckConfig::default())
    }

    pub fn decl(&self, name: &str) -> DeclId {
        let name = self.interner.get(name).unwrap();
        self.function
            .body
            .decls
            .iter()
            .filter(|(_, decl)| decl.name == name)
            .map(|(id, _)| id)
            .last()
            .unwrap()
    }
}
