//! Region inference for C functions under Rust-like ownership rules.
//!
//! Pointers are treated as references: a pointer to `const` data is a shared
//! borrow, any other pointer a mutable one. For a function and its CFG the
//! checker
//!
//! 1. annotates every node with accesses, loans, copies and moves
//!    ([`Regionck::new`]),
//! 2. derives outlives constraints from assignments, liveness, reborrows and
//!    returns ([`Regionck::build_constraints`]),
//! 3. grows every region to the least fixpoint of those constraints
//!    ([`Regionck::infer`]),
//! 4. computes which loans are in scope at each node
//!    ([`Regionck::borrow_check`]).
//!
//! Detecting conflicting accesses is left to a later pass; the in-scope
//! loans and per-node accesses are the data it needs
//! ([`Access::conflicts_with`]).

mod annotate;
mod config;
mod constraint;
mod declarations;
mod deconstruct;
mod error;
mod facts;
mod generate;
mod in_scope;
mod loans;
mod path;
mod region;
mod regionck;
mod ty;

pub use config::{ConfigError, JoinPolicy, RegionckConfig};
pub use constraint::{ConstraintDisplay, ConstraintKind, OutlivesConstraint, solve};
pub use declarations::Declarations;
pub use error::{Precondition, RegionckError, RegionckResult, TypeErrorKind, Unsupported};
pub use facts::{
    Access, AccessDepth, AccessMutability, Assignment, AssignmentSource, NodeAnnotation,
    StatementAction, StatementActionKind,
};
pub use loans::{Loan, LoanId};
pub use path::{Path, PathDisplay};
pub use region::{DefiningSite, RegionArena, RegionKind, RegionVariable, RegionVid};
pub use regionck::Regionck;
pub use ty::{BorrowKind, Ty};

#[cfg(test)]
mod test_utils;
