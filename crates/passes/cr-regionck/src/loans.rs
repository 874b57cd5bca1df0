//! Loans created by address-of expressions.

use cr_ast::ExprId;
use cr_cfg::NodeId;
use cr_span::FileSpan;
use std::fmt;

use crate::{
    path::Path,
    region::RegionVid,
    ty::{BorrowKind, Ty},
};

/// Loan identifier: the index into the loan list of a function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoanId(pub u32);

impl LoanId {
    /// Index into the loan list.
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for LoanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

/// A borrow `&place` and the region it must stay valid for.
#[derive(Debug, Clone, PartialEq)]
pub struct Loan {
    /// Identifier
    pub id: LoanId,
    /// Fresh region allocated at the borrow
    pub region: RegionVid,
    /// Reference type of the destination; decides the borrow kind
    pub declared_ref_ty: Ty,
    /// Type of the borrowed place
    pub loaned_ty: Ty,
    /// The borrowed place
    pub loaned_path: Path,
    /// Node containing the borrow
    pub origin: NodeId,
    /// The address-of expression
    pub expr: ExprId,
    /// Location of the address-of expression
    pub span: FileSpan,
    borrow_kind: BorrowKind,
}

impl Loan {
    /// Creates a loan; `None` if `declared_ref_ty` is not a reference.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn new(
        id: LoanId,
        region: RegionVid,
        declared_ref_ty: Ty,
        loaned_ty: Ty,
        loaned_path: Path,
        origin: NodeId,
        expr: ExprId,
        span: FileSpan,
    ) -> Option<Self> {
        let borrow_kind = declared_ref_ty.borrow_kind()?;
        Some(Self {
            id,
            region,
            declared_ref_ty,
            loaned_ty,
            loaned_path,
            origin,
            expr,
            span,
            borrow_kind,
        })
    }

    /// Shared or mutable, as decided by the destination's reference type.
    #[must_use]
    pub fn borrow_kind(&self) -> BorrowKind {
        self.borrow_kind
    }
}
