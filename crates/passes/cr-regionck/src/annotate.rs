//! CFG annotation: declaration types, regions, loans, accesses, copies and
//! moves for every node.

use cr_ast::{DeclId, Expr, ExprId, Function, Stmt, StmtId, UnaryOp};
use cr_cfg::{Cfg, CfgNode, CfgNodeKind, Liveness, NodeId};
use cr_intern::Interner;
use cr_span::FileSpan;
use tracing::{debug, trace};

use crate::{
    declarations::Declarations,
    deconstruct::{RegionAlloc, deconstruct_type},
    error::{Precondition, RegionckError, RegionckResult, TypeErrorKind, Unsupported},
    facts::{
        Access, AccessDepth, AccessMutability, Assignment, AssignmentSource, NodeAnnotation,
        StatementAction, StatementActionKind,
    },
    loans::{Loan, LoanId},
    path::Path,
    region::{DefiningSite, RegionArena, RegionKind},
    ty::{BorrowKind, Ty},
};

/// Everything produced by annotating one function.
#[derive(Debug)]
pub(crate) struct Annotated {
    pub regions: RegionArena,
    pub loans: Vec<Loan>,
    pub declarations: Declarations,
    pub annotations: Vec<NodeAnnotation>,
}

/// The place an expression's value is stored into.
struct Destination<'d> {
    path: &'d Path,
    ty: &'d Ty,
}

/// Walks every CFG node and records the facts the constraint generator and
/// the in-scope computation consume.
pub(crate) struct CfgAnnotator<'a> {
    function: &'a Function,
    cfg: &'a Cfg,
    interner: &'a Interner,
    regions: RegionArena,
    loans: Vec<Loan>,
    declarations: Declarations,
    annotations: Vec<NodeAnnotation>,
}

impl<'a> CfgAnnotator<'a> {
    pub(crate) fn new(
        function: &'a Function,
        cfg: &'a Cfg,
        liveness: &Liveness,
        interner: &'a Interner,
    ) -> Self {
        let annotations = cfg
            .nodes()
            .iter()
            .map(|node| NodeAnnotation {
                live_in: liveness.live_in(node.id).cloned().unwrap_or_default(),
                live_out: liveness.live_out(node.id).cloned().unwrap_or_default(),
                ..NodeAnnotation::default()
            })
            .collect();

        Self {
            function,
            cfg,
            interner,
            regions: RegionArena::new(),
            loans: Vec::new(),
            declarations: Declarations::new(),
            annotations,
        }
    }

    /// Annotates the whole function.
    ///
    /// Declarations are registered in a first sweep over the nodes so that a
    /// use never depends on the order in which nodes are visited.
    pub(crate) fn annotate(mut self) -> RegionckResult<Annotated> {
        self.register_params()?;
        if let Some(return_ty) = self.function.return_ty {
            deconstruct_type(
                &self.function.body,
                self.interner,
                return_ty,
                &mut RegionAlloc::Disabled,
                self.function.span,
            )?;
        }

        let cfg = self.cfg;
        for node in cfg.nodes() {
            if let CfgNodeKind::InstList { stmts } = &node.kind {
                for &stmt in stmts {
                    if let Stmt::Decl(decl) = self.function.body.stmts[stmt] {
                        self.register_decl(decl, DefiningSite::Decl(decl))?;
                    }
                }
            }
        }

        for node in cfg.nodes() {
            self.annotate_node(node)?;
        }

        debug!(
            regions = self.regions.len(),
            loans = self.loans.len(),
            declarations = self.declarations.len(),
            "annotated cfg"
        );

        Ok(Annotated {
            regions: self.regions,
            loans: self.loans,
            declarations: self.declarations,
            annotations: self.annotations,
        })
    }

    fn register_params(&mut self) -> RegionckResult<()> {
        for &param in &self.function.params {
            self.register_decl(param, DefiningSite::Param(param))?;
        }
        Ok(())
    }

    fn register_decl(&mut self, decl: DeclId, site: DefiningSite) -> RegionckResult<()> {
        let var = &self.function.body.decls[decl];
        let ty = deconstruct_type(
            &self.function.body,
            self.interner,
            var.ty,
            &mut RegionAlloc::Fresh {
                regions: &mut self.regions,
                site,
            },
            var.span,
        )?;
        trace!(name = self.interner.resolve(var.name), %ty, "registered declaration");
        self.declarations.insert(decl, var.name, ty);
        Ok(())
    }

    fn annotate_node(&mut self, node: &CfgNode) -> RegionckResult<()> {
        let id = node.id;
        match &node.kind {
            CfgNodeKind::Start | CfgNodeKind::End | CfgNodeKind::Jump => Ok(()),
            CfgNodeKind::InstList { stmts } => stmts
                .iter()
                .try_for_each(|&stmt| self.annotate_stmt(id, stmt)),
            CfgNodeKind::If { cond } | CfgNodeKind::Loop { cond } => {
                self.annotate_expr(id, *cond, None)
            }
            CfgNodeKind::Return { value, .. } => match value {
                Some(value) => self.annotate_return(id, *value),
                None => Ok(()),
            },
            CfgNodeKind::Switch { span, .. } => Err(RegionckError::unsupported(
                Unsupported::SwitchStatement,
                *span,
            )),
        }
    }

    fn annotate_stmt(&mut self, node: NodeId, stmt: StmtId) -> RegionckResult<()> {
        let function = self.function;
        match &function.body.stmts[stmt] {
            Stmt::Decl(decl) => self.annotate_decl(node, *decl),
            Stmt::Expr(expr) => self.annotate_expr(node, *expr, None),
            Stmt::Label { .. } => Ok(()),
        }
    }

    fn annotate_decl(&mut self, node: NodeId, decl: DeclId) -> RegionckResult<()> {
        let function = self.function;
        let var = &function.body.decls[decl];
        let Some(init) = var.init else {
            return Ok(());
        };
        let dest_path = Path::var(decl, var.name);
        let dest_ty = dest_path.retrieve_ty(&self.declarations, self.interner, var.span)?;
        self.push_access(
            node,
            Access::new(
                dest_path.clone(),
                AccessMutability::Write,
                AccessDepth::Shallow,
            ),
        );
        self.annotate_assigned_value(node, &dest_path, &dest_ty, init)
    }

    fn annotate_return(&mut self, node: NodeId, value: ExprId) -> RegionckResult<()> {
        self.annotate_expr(node, value, None)?;
        let function = self.function;
        let expr = &function.body.exprs[value];
        if expr.is_var_ref() || expr.is_deref() {
            if let Some(path) = self.parse_lvalue(value)? {
                let ty = path.retrieve_ty(&self.declarations, self.interner, expr.span())?;
                if ty.is_ref() {
                    self.annotation_mut(node).returns.push((path, ty));
                }
            }
        }
        Ok(())
    }

    fn annotate_expr(
        &mut self,
        node: NodeId,
        expr_id: ExprId,
        dest: Option<&Destination<'_>>,
    ) -> RegionckResult<()> {
        let function = self.function;
        match &function.body.exprs[expr_id] {
            Expr::Literal { .. } => Ok(()),
            Expr::Binary {
                op, left, right, ..
            } => {
                if op.is_assignment() {
                    self.annotate_assignment(node, *left, *right)
                } else {
                    self.annotate_expr(node, *left, dest)?;
                    self.annotate_expr(node, *right, dest)
                }
            }
            Expr::Unary {
                op: UnaryOp::AddrOf,
                operand,
                span,
            } => self.annotate_borrow(node, expr_id, *operand, dest, *span),
            Expr::Unary {
                op: UnaryOp::Deref,
                span,
                ..
            } => {
                let span = *span;
                if let Some(path) = self.parse_lvalue(expr_id)? {
                    path.retrieve_ty(&self.declarations, self.interner, span)?;
                    self.push_access(
                        node,
                        Access::new(path, AccessMutability::Read, AccessDepth::Deep),
                    );
                }
                Ok(())
            }
            Expr::Unary { operand, .. } => self.annotate_expr(node, *operand, dest),
            Expr::Call { args, span, .. } => self.annotate_call(node, args, dest, *span),
            Expr::VarRef { span, .. } => {
                let span = *span;
                if let Some(path) = self.parse_lvalue(expr_id)? {
                    let ty = path.retrieve_ty(&self.declarations, self.interner, span)?;
                    let mutability = if ty.is_copyable() {
                        AccessMutability::Read
                    } else {
                        AccessMutability::Write
                    };
                    self.push_access(node, Access::new(path, mutability, AccessDepth::Deep));
                }
                Ok(())
            }
            Expr::Paren { span, .. } => Err(RegionckError::unsupported(
                Unsupported::ParenthesizedExpression,
                *span,
            )),
            Expr::MemberAccess { field, span, .. } => Err(RegionckError::unsupported(
                Unsupported::MemberType {
                    field: self.interner.resolve(*field).to_string(),
                },
                *span,
            )),
        }
    }

    fn annotate_assignment(
        &mut self,
        node: NodeId,
        left: ExprId,
        right: ExprId,
    ) -> RegionckResult<()> {
        let span = self.function.body.exprs[left].span();
        let dest_path = self.parse_lvalue(left)?.ok_or_else(|| {
            RegionckError::unsupported(
                Unsupported::Lvalue {
                    expression: "literal".to_string(),
                },
                span,
            )
        })?;
        let dest_ty = dest_path.retrieve_ty(&self.declarations, self.interner, span)?;
        self.push_access(
            node,
            Access::new(
                dest_path.clone(),
                AccessMutability::Write,
                AccessDepth::Shallow,
            ),
        );
        self.annotate_assigned_value(node, &dest_path, &dest_ty, right)
    }

    /// Annotates the right-hand side of `dest = value` (or an initializer)
    /// and classifies path-to-path assignments as copies or moves.
    fn annotate_assigned_value(
        &mut self,
        node: NodeId,
        dest_path: &Path,
        dest_ty: &Ty,
        value: ExprId,
    ) -> RegionckResult<()> {
        let dest = Destination {
            path: dest_path,
            ty: dest_ty,
        };
        self.annotate_expr(node, value, Some(&dest))?;

        let function = self.function;
        let expr = &function.body.exprs[value];
        if !(expr.is_var_ref() || expr.is_deref()) {
            return Ok(());
        }
        let span = expr.span();
        let Some(src_path) = self.parse_lvalue(value)? else {
            return Ok(());
        };
        let src_ty = src_path.retrieve_ty(&self.declarations, self.interner, span)?;

        let action = StatementAction::classify(
            dest_path.clone(),
            dest_ty.clone(),
            src_path.clone(),
            src_ty.clone(),
        )
        .map_err(|kind| RegionckError::type_error(kind, span))?;

        let annotation = self.annotation_mut(node);
        if dest_ty.is_ref() {
            annotation.assignments.push(Assignment {
                dest: dest_path.clone(),
                dest_ty: dest_ty.clone(),
                source: AssignmentSource::Path {
                    path: src_path,
                    ty: src_ty,
                },
            });
        }
        match action.kind {
            StatementActionKind::Copy => annotation.copies.push(action),
            StatementActionKind::Move => annotation.moves.push(action),
        }
        Ok(())
    }

    fn annotate_borrow(
        &mut self,
        node: NodeId,
        expr: ExprId,
        operand: ExprId,
        dest: Option<&Destination<'_>>,
        span: FileSpan,
    ) -> RegionckResult<()> {
        let loaned_path = self.parse_lvalue(operand)?.ok_or_else(|| {
            RegionckError::unsupported(
                Unsupported::Lvalue {
                    expression: "literal".to_string(),
                },
                span,
            )
        })?;
        let region = self.regions.fresh(
            RegionKind::Existential,
            None,
            Some(DefiningSite::Borrow(expr)),
        );
        let loaned_ty = loaned_path.retrieve_ty(&self.declarations, self.interner, span)?;

        let dest = dest.ok_or_else(|| {
            RegionckError::precondition(Precondition::BorrowWithoutDestination, span)
        })?;
        let id = LoanId(self.loans.len() as u32);
        let loan = Loan::new(
            id,
            region,
            dest.ty.clone(),
            loaned_ty,
            loaned_path.clone(),
            node,
            expr,
            span,
        )
        .ok_or_else(|| {
            RegionckError::type_error(
                TypeErrorKind::BorrowIntoNonReference {
                    ty: dest.ty.clone(),
                },
                span,
            )
        })?;
        trace!(
            loan = %id,
            %region,
            kind = %loan.borrow_kind(),
            path = %loaned_path.display(self.interner),
            "created loan"
        );

        let mutability = match loan.borrow_kind() {
            BorrowKind::Mutable => AccessMutability::Write,
            BorrowKind::Shared => AccessMutability::Read,
        };
        self.loans.push(loan);

        let annotation = self.annotation_mut(node);
        annotation.loans.push(id);
        annotation.assignments.push(Assignment {
            dest: dest.path.clone(),
            dest_ty: dest.ty.clone(),
            source: AssignmentSource::Borrow(id),
        });
        self.push_access(
            node,
            Access::new(loaned_path, mutability, AccessDepth::Deep),
        );
        Ok(())
    }

    fn annotate_call(
        &mut self,
        node: NodeId,
        args: &[ExprId],
        dest: Option<&Destination<'_>>,
        span: FileSpan,
    ) -> RegionckResult<()> {
        let mut ref_args = Vec::new();
        for &arg in args {
            let Some(path) = self.parse_lvalue(arg)? else {
                continue;
            };
            if dest.is_some_and(|dest| dest.ty.is_ref()) {
                let ty = path.retrieve_ty(&self.declarations, self.interner, span)?;
                if ty.is_ref() {
                    ref_args.push((path.clone(), ty));
                }
            }
            self.push_access(
                node,
                Access::new(path, AccessMutability::Read, AccessDepth::Deep),
            );
        }

        if let Some(dest) = dest.filter(|dest| dest.ty.is_ref()) {
            self.annotation_mut(node).assignments.push(Assignment {
                dest: dest.path.clone(),
                dest_ty: dest.ty.clone(),
                source: AssignmentSource::Call { args: ref_args },
            });
        }
        Ok(())
    }

    /// Converts an lvalue expression to a [`Path`]; `None` for literals.
    fn parse_lvalue(&self, expr: ExprId) -> RegionckResult<Option<Path>> {
        let body = &self.function.body;
        match &body.exprs[expr] {
            Expr::Literal { .. } => Ok(None),
            Expr::VarRef { decl, .. } => Ok(Some(Path::var(*decl, body.decls[*decl].name))),
            Expr::Unary {
                op: UnaryOp::Deref,
                operand,
                span,
            } => {
                let base = self.parse_lvalue(*operand)?.ok_or_else(|| {
                    RegionckError::unsupported(
                        Unsupported::Lvalue {
                            expression: "dereferenced literal".to_string(),
                        },
                        *span,
                    )
                })?;
                Ok(Some(base.deref()))
            }
            Expr::MemberAccess {
                base,
                field,
                arrow,
                span,
            } => {
                let base = self.parse_lvalue(*base)?.ok_or_else(|| {
                    RegionckError::unsupported(
                        Unsupported::Lvalue {
                            expression: "member of a literal".to_string(),
                        },
                        *span,
                    )
                })?;
                let base = if *arrow { base.deref() } else { base };
                Ok(Some(base.member(*field)))
            }
            Expr::Paren { inner, .. } => self.parse_lvalue(*inner),
            Expr::Unary { op, span, .. } => Err(RegionckError::unsupported(
                Unsupported::Lvalue {
                    expression: format!("unary `{op}` expression"),
                },
                *span,
            )),
            other @ (Expr::Binary { .. } | Expr::Call { .. }) => Err(RegionckError::unsupported(
                Unsupported::Lvalue {
                    expression: other.kind_name().to_string(),
                },
                other.span(),
            )),
        }
    }

    fn push_access(&mut self, node: NodeId, access: Access) {
        self.annotation_mut(node).accesses.push(access);
    }

    fn annotation_mut(&mut self, node: NodeId) -> &mut NodeAnnotation {
        &mut self.annotations[node.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        region::RegionVid,
        test_utils::{TestFunction, span},
    };
    use cr_ast::BuiltinKind;

    fn int_ty(is_const: bool) -> Ty {
        Ty::Builtin {
            kind: BuiltinKind::Int,
            is_const,
        }
    }

    #[test]
    fn test_param_types_get_regions() {
        let mut t = TestFunction::new();
        let int = t.int();
        let int_ptr = t.ptr(int);
        let const_int = t.const_int();
        let const_int_ptr = t.ptr(const_int);
        t.param("p", int_ptr);
        t.param("q", const_int_ptr);
        let start = t.node(CfgNodeKind::Start);
        let end = t.node(CfgNodeKind::End);
        t.builder.add_edge(start, end);
        let built = t.finish();

        let regionck = built.annotate().unwrap();
        let declarations = regionck.declarations();

        assert_eq!(
            declarations.get(built.decl("p")),
            Some(&Ty::Ref {
                borrow_kind: BorrowKind::Mutable,
                pointee: Box::new(int_ty(false)),
                region: Some(RegionVid(1)),
                is_const: false,
                is_restrict: false,
            })
        );
        assert_eq!(
            declarations.get(built.decl("q")),
            Some(&Ty::Ref {
                borrow_kind: BorrowKind::Shared,
                pointee: Box::new(int_ty(true)),
                region: Some(RegionVid(2)),
                is_const: false,
                is_restrict: false,
            })
        );

        let p_region = &regionck.regions()[RegionVid(1)];
        assert_eq!(p_region.kind, RegionKind::Existential);
        assert_eq!(
            p_region.defining_site,
            Some(DefiningSite::Param(built.decl("p")))
        );
        assert_eq!(regionck.regions()[RegionVid::STATIC].kind, RegionKind::Universal);
    }

    #[test]
    fn test_borrow_creates_loan_and_deep_write() {
        let mut t = TestFunction::new();
        let int = t.int();
        let int_ptr = t.ptr(int);
        let one = t.lit(1);
        let decl_a = t.local("a", int, Some(one));
        let a = t.var("a");
        let borrow = t.addr_of(a);
        let decl_p = t.local("p", int_ptr, Some(borrow));
        let start = t.node(CfgNodeKind::Start);
        let node = t.inst(vec![decl_a, decl_p]);
        t.builder.add_edge(start, node);
        let built = t.finish();

        let regionck = built.annotate().unwrap();
        let a_path = Path::var(built.decl("a"), built.interner.get("a").unwrap());
        let p_path = Path::var(built.decl("p"), built.interner.get("p").unwrap());

        assert_eq!(regionck.loans().len(), 1);
        let loan = &regionck.loans()[0];
        assert_eq!(loan.loaned_path, a_path);
        assert_eq!(loan.borrow_kind(), BorrowKind::Mutable);
        assert_eq!(loan.origin, node);
        assert_eq!(loan.region, RegionVid(2));

        let annotation = regionck.annotation(node).unwrap();
        assert_eq!(annotation.loans(), &[LoanId(0)]);
        assert!(annotation.accesses().contains(&Access::new(
            a_path,
            AccessMutability::Write,
            AccessDepth::Deep
        )));
        assert!(annotation.accesses().contains(&Access::new(
            p_path.clone(),
            AccessMutability::Write,
            AccessDepth::Shallow
        )));
        assert_eq!(
            annotation.assignments()[0].source,
            AssignmentSource::Borrow(LoanId(0))
        );
        assert_eq!(annotation.assignments()[0].dest, p_path);
    }

    #[test]
    fn test_initializers_copy_and_move() {
        let mut t = TestFunction::new();
        let int = t.int();
        let int_ptr = t.ptr(int);
        let one = t.lit(1);
        let decl_a = t.local("a", int, Some(one));
        let a = t.var("a");
        let decl_c = t.local("c", int, Some(a));
        let a = t.var("a");
        let borrow = t.addr_of(a);
        let decl_p = t.local("p", int_ptr, Some(borrow));
        let p = t.var("p");
        let decl_q = t.local("q", int_ptr, Some(p));
        let start = t.node(CfgNodeKind::Start);
        let node = t.inst(vec![decl_a, decl_c, decl_p, decl_q]);
        t.builder.add_edge(start, node);
        let built = t.finish();

        let regionck = built.annotate().unwrap();
        let annotation = regionck.annotation(node).unwrap();

        assert_eq!(annotation.copies().len(), 1);
        assert_eq!(annotation.copies()[0].kind, StatementActionKind::Copy);
        assert_eq!(
            annotation.copies()[0].dest_path,
            Path::var(built.decl("c"), built.interner.get("c").unwrap())
        );
        assert_eq!(annotation.moves().len(), 1);
        assert_eq!(annotation.moves()[0].kind, StatementActionKind::Move);
        assert!(annotation.moves()[0].src_ty.is_ref());
        assert!(annotation.accesses().contains(&Access::new(
            Path::var(built.decl("p"), built.interner.get("p").unwrap()),
            AccessMutability::Write,
            AccessDepth::Deep
        )));
    }

    #[test]
    fn test_mixed_copyability_is_rejected() {
        let mut t = TestFunction::new();
        let int = t.int();
        let int_ptr = t.ptr(int);
        t.param("p", int_ptr);
        let p = t.var("p");
        let decl_x = t.local("x", int, Some(p));
        let start = t.node(CfgNodeKind::Start);
        let node = t.inst(vec![decl_x]);
        t.builder.add_edge(start, node);
        let built = t.finish();

        let err = built.annotate().unwrap_err();
        assert!(matches!(
            err,
            RegionckError::TypeError {
                kind: TypeErrorKind::CopyabilityMismatch { .. },
                ..
            }
        ));
        assert_eq!(
            err.to_string(),
            "type error at file#0@0..0: cannot assign `int *` to `int`: \
             copyable and non-copyable types do not mix"
        );
    }

    #[test]
    fn test_borrow_into_non_reference() {
        let mut t = TestFunction::new();
        let int = t.int();
        let decl_a = t.local("a", int, None);
        let a = t.var("a");
        let borrow = t.addr_of(a);
        let decl_x = t.local("x", int, Some(borrow));
        let start = t.node(CfgNodeKind::Start);
        let node = t.inst(vec![decl_a, decl_x]);
        t.builder.add_edge(start, node);
        let built = t.finish();

        assert!(matches!(
            built.annotate().unwrap_err(),
            RegionckError::TypeError {
                kind: TypeErrorKind::BorrowIntoNonReference { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_borrow_without_destination() {
        let mut t = TestFunction::new();
        let int = t.int();
        let decl_a = t.local("a", int, None);
        let a = t.var("a");
        let borrow = t.addr_of(a);
        let bare = t.stmt(borrow);
        let start = t.node(CfgNodeKind::Start);
        let node = t.inst(vec![decl_a, bare]);
        t.builder.add_edge(start, node);
        let built = t.finish();

        assert_eq!(
            built.annotate().unwrap_err(),
            RegionckError::PreconditionViolation {
                violation: Precondition::BorrowWithoutDestination,
                span: span(),
            }
        );
    }

    #[test]
    fn test_unsupported_constructs() {
        let mut t = TestFunction::new();
        let zero = t.lit(0);
        let start = t.node(CfgNodeKind::Start);
        let switch = t.node(CfgNodeKind::Switch {
            discriminant: zero,
            span: span(),
        });
        t.builder.add_edge(start, switch);
        let built = t.finish();
        assert!(matches!(
            built.annotate().unwrap_err(),
            RegionckError::UnsupportedConstruct {
                construct: Unsupported::SwitchStatement,
                ..
            }
        ));

        let mut t = TestFunction::new();
        let int = t.int();
        let one = t.lit(1);
        let decl_a = t.local("a", int, Some(one));
        let a = t.var("a");
        let paren = t.function.body.alloc_expr(Expr::Paren {
            inner: a,
            span: span(),
        });
        let decl_b = t.local("b", int, Some(paren));
        let start = t.node(CfgNodeKind::Start);
        let node = t.inst(vec![decl_a, decl_b]);
        t.builder.add_edge(start, node);
        let built = t.finish();
        assert!(matches!(
            built.annotate().unwrap_err(),
            RegionckError::UnsupportedConstruct {
                construct: Unsupported::ParenthesizedExpression,
                ..
            }
        ));
    }

    #[test]
    fn test_return_of_reference_is_recorded() {
        let mut t = TestFunction::new();
        let int = t.int();
        let int_ptr = t.ptr(int);
        t.param("p", int_ptr);
        let p = t.var("p");
        let deref_p = t.deref(p);
        let read = t.stmt(deref_p);
        let p = t.var("p");
        let start = t.node(CfgNodeKind::Start);
        let node = t.inst(vec![read]);
        let ret = t.node(CfgNodeKind::Return {
            value: Some(p),
            span: span(),
        });
        t.builder.add_path(&[start, node, ret]);
        let built = t.finish();

        let regionck = built.annotate().unwrap();
        let p_path = Path::var(built.decl("p"), built.interner.get("p").unwrap());

        assert_eq!(
            regionck.annotation(node).unwrap().accesses(),
            &[Access::new(
                p_path.clone().deref(),
                AccessMutability::Read,
                AccessDepth::Deep
            )]
        );
        let returns = regionck.annotation(ret).unwrap().returns();
        assert_eq!(returns.len(), 1);
        assert_eq!(returns[0].0, p_path);
    }
}
