//! Ownership-aware types.
//!
//! Pointers become references: a pointer to `const` data is a shared
//! borrow, any other pointer is a mutable borrow. Every reference level
//! may carry a region variable.

use cr_ast::BuiltinKind;
use std::fmt;

use crate::region::RegionVid;

/// How a reference borrows its pointee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BorrowKind {
    /// Read-only, may alias
    Shared,
    /// Exclusive, may write
    Mutable,
}

impl BorrowKind {
    /// Returns `true` for [`BorrowKind::Mutable`].
    #[must_use]
    pub fn is_mutable(self) -> bool {
        matches!(self, Self::Mutable)
    }
}

impl fmt::Display for BorrowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Shared => "shared",
            Self::Mutable => "mutable",
        })
    }
}

/// Type of a place or value as seen by the region checker.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Ty {
    /// Builtin scalar, always copyable
    Builtin {
        /// Scalar kind
        kind: BuiltinKind,
        /// `const`-qualified
        is_const: bool,
    },
    /// Reference (a C pointer), never copyable
    Ref {
        /// Shared when the pointee is `const`
        borrow_kind: BorrowKind,
        /// Referenced type
        pointee: Box<Ty>,
        /// Region of this reference level, if one was allocated
        region: Option<RegionVid>,
        /// The reference itself is `const`
        is_const: bool,
        /// The reference is `restrict`-qualified
        is_restrict: bool,
    },
}

impl Ty {
    /// Returns `true` if values of this type are copied rather than moved.
    #[must_use]
    pub fn is_copyable(&self) -> bool {
        matches!(self, Self::Builtin { .. })
    }

    /// Returns `true` for references.
    #[must_use]
    pub fn is_ref(&self) -> bool {
        matches!(self, Self::Ref { .. })
    }

    /// Returns `true` if the outermost level is `const`.
    #[must_use]
    pub fn is_const(&self) -> bool {
        match self {
            Self::Builtin { is_const, .. } | Self::Ref { is_const, .. } => *is_const,
        }
    }

    /// Borrow kind of the outermost reference.
    #[must_use]
    pub fn borrow_kind(&self) -> Option<BorrowKind> {
        match self {
            Self::Builtin { .. } => None,
            Self::Ref { borrow_kind, .. } => Some(*borrow_kind),
        }
    }

    /// Region of the outermost reference.
    #[must_use]
    pub fn region(&self) -> Option<RegionVid> {
        match self {
            Self::Builtin { .. } => None,
            Self::Ref { region, .. } => *region,
        }
    }

    /// Pointee of the outermost reference.
    #[must_use]
    pub fn pointee(&self) -> Option<&Ty> {
        match self {
            Self::Builtin { .. } => None,
            Self::Ref { pointee, .. } => Some(pointee),
        }
    }

    /// Every region appearing in the type, outermost first.
    #[must_use]
    pub fn regions(&self) -> Vec<RegionVid> {
        let mut regions = Vec::new();
        let mut current = self;
        while let Self::Ref {
            pointee, region, ..
        } = current
        {
            regions.extend(*region);
            current = pointee;
        }
        regions
    }
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Builtin { kind, is_const } => {
                if *is_const {
                    f.write_str("const ")?;
                }
                write!(f, "{kind}")
            }
            Self::Ref {
                pointee,
                is_const,
                is_restrict,
                ..
            } => {
                write!(f, "{pointee} *")?;
                if *is_const {
                    f.write_str(" const")?;
                }
                if *is_restrict {
                    f.write_str(" restrict")?;
                }
                Ok(())
            }
        }
    }
}
