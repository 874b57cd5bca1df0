//! Per-node facts recorded by the annotator.

use cr_intern::Symbol;
use rustc_hash::FxHashSet;

use crate::{
    error::TypeErrorKind,
    loans::{Loan, LoanId},
    path::Path,
    ty::Ty,
};

/// Whether an access reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessMutability {
    /// Read
    Read,
    /// Write, or a move out of the place
    Write,
}

/// How much of the place an access touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessDepth {
    /// The place itself, not memory reachable through it
    Shallow,
    /// The place and everything reachable through it
    Deep,
}

/// A read or write of a path at a CFG node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Access {
    /// Accessed place
    pub path: Path,
    /// Read or write
    pub mutability: AccessMutability,
    /// Shallow or deep
    pub depth: AccessDepth,
}

impl Access {
    /// Creates an access.
    #[must_use]
    pub fn new(path: Path, mutability: AccessMutability, depth: AccessDepth) -> Self {
        Self {
            path,
            mutability,
            depth,
        }
    }

    /// Returns `true` for a shallow write, the kind of access that kills
    /// loans of paths built on it.
    #[must_use]
    pub fn is_shallow_write(&self) -> bool {
        self.mutability == AccessMutability::Write && self.depth == AccessDepth::Shallow
    }

    /// Returns `true` if this access would invalidate `loan` while it is in
    /// scope.
    ///
    /// Deep accesses conflict with loans of any overlapping path. Shallow
    /// accesses only conflict with loans of the place itself or of a place it
    /// is built on. Reads are compatible with shared loans.
    #[must_use]
    pub fn conflicts_with(&self, loan: &Loan) -> bool {
        let overlaps = match self.depth {
            AccessDepth::Deep => self.path.overlaps(&loan.loaned_path),
            AccessDepth::Shallow => loan.loaned_path.is_prefix_of(&self.path),
        };
        overlaps
            && (self.mutability == AccessMutability::Write || loan.borrow_kind().is_mutable())
    }
}

/// Copy or move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementActionKind {
    /// Both sides copyable
    Copy,
    /// Neither side copyable
    Move,
}

/// A path-to-path assignment classified as a copy or a move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementAction {
    /// Copy or move
    pub kind: StatementActionKind,
    /// Assigned place
    pub dest_path: Path,
    /// Type of the assigned place
    pub dest_ty: Ty,
    /// Read place
    pub src_path: Path,
    /// Type of the read place
    pub src_ty: Ty,
}

impl StatementAction {
    /// Classifies `dest = src`; mixing copyable and non-copyable types is an
    /// error.
    pub fn classify(
        dest_path: Path,
        dest_ty: Ty,
        src_path: Path,
        src_ty: Ty,
    ) -> Result<Self, TypeErrorKind> {
        let kind = match (dest_ty.is_copyable(), src_ty.is_copyable()) {
            (true, true) => StatementActionKind::Copy,
            (false, false) => StatementActionKind::Move,
            _ => {
                return Err(TypeErrorKind::CopyabilityMismatch {
                    dest: dest_ty,
                    src: src_ty,
                });
            }
        };
        Ok(Self {
            kind,
            dest_path,
            dest_ty,
            src_path,
            src_ty,
        })
    }
}

/// Where the value of an assignment comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignmentSource {
    /// `&place`
    Borrow(LoanId),
    /// Another place
    Path {
        /// Read place
        path: Path,
        /// Its type
        ty: Ty,
    },
    /// Result of a call; the arguments that are places
    Call {
        /// Place arguments and their types
        args: Vec<(Path, Ty)>,
    },
}

/// An assignment into a reference-typed place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    /// Assigned place
    pub dest: Path,
    /// Its type
    pub dest_ty: Ty,
    /// Assigned value
    pub source: AssignmentSource,
}

/// Everything the annotator records for one CFG node.
#[derive(Debug, Clone, Default)]
pub struct NodeAnnotation {
    pub(crate) live_in: FxHashSet<Symbol>,
    pub(crate) live_out: FxHashSet<Symbol>,
    pub(crate) accesses: Vec<Access>,
    pub(crate) loans: Vec<LoanId>,
    pub(crate) in_scope_loans: Vec<LoanId>,
    pub(crate) copies: Vec<StatementAction>,
    pub(crate) moves: Vec<StatementAction>,
    pub(crate) assignments: Vec<Assignment>,
    pub(crate) returns: Vec<(Path, Ty)>,
}

impl NodeAnnotation {
    /// Variables live on entry.
    #[must_use]
    pub fn live_in(&self) -> &FxHashSet<Symbol> {
        &self.live_in
    }

    /// Variables live on exit.
    #[must_use]
    pub fn live_out(&self) -> &FxHashSet<Symbol> {
        &self.live_out
    }

    /// Accesses, in evaluation order.
    #[must_use]
    pub fn accesses(&self) -> &[Access] {
        &self.accesses
    }

    /// Loans created here.
    #[must_use]
    pub fn loans(&self) -> &[LoanId] {
        &self.loans
    }

    /// Loans in scope on entry, ascending; empty until computed.
    #[must_use]
    pub fn in_scope_loans(&self) -> &[LoanId] {
        &self.in_scope_loans
    }

    /// Copies between places.
    #[must_use]
    pub fn copies(&self) -> &[StatementAction] {
        &self.copies
    }

    /// Moves between places.
    #[must_use]
    pub fn moves(&self) -> &[StatementAction] {
        &self.moves
    }

    /// Assignments into reference-typed places.
    #[must_use]
    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    /// Reference-typed places returned from the function.
    #[must_use]
    pub fn returns(&self) -> &[(Path, Ty)] {
        &self.returns
    }
}
