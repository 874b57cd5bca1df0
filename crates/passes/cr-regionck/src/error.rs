//! Region checking error types.
//!
//! Every error aborts the analysis of the whole function: a partially
//! annotated CFG cannot be fed to the constraint solver soundly, so there is
//! no recovery mode.

use cr_ast::TagKind;
use cr_span::FileSpan;
use thiserror::Error;

use crate::ty::Ty;

/// Result type for region checking operations.
pub type RegionckResult<T> = Result<T, RegionckError>;

/// Errors that stop region checking of a function.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegionckError {
    /// The function uses a construct the checker does not model.
    #[error("unsupported construct at {span}: {construct}")]
    UnsupportedConstruct {
        /// What was encountered
        construct: Unsupported,
        /// Where it was encountered
        span: FileSpan,
    },

    /// The function is ill-typed with respect to ownership.
    #[error("type error at {span}: {kind}")]
    TypeError {
        /// The specific mismatch
        kind: TypeErrorKind,
        /// Where it was detected
        span: FileSpan,
    },

    /// The input tree violates an assumption the normalizer should have
    /// established.
    #[error("precondition violated at {span}: {violation}")]
    PreconditionViolation {
        /// The violated assumption
        violation: Precondition,
        /// Offending construct
        span: FileSpan,
    },
}

impl RegionckError {
    /// Returns the location of the construct that caused the error.
    #[must_use]
    pub fn span(&self) -> FileSpan {
        match self {
            Self::UnsupportedConstruct { span, .. }
            | Self::TypeError { span, .. }
            | Self::PreconditionViolation { span, .. } => *span,
        }
    }

    pub(crate) fn unsupported(construct: Unsupported, span: FileSpan) -> Self {
        Self::UnsupportedConstruct { construct, span }
    }

    pub(crate) fn type_error(kind: TypeErrorKind, span: FileSpan) -> Self {
        Self::TypeError { kind, span }
    }

    pub(crate) fn precondition(violation: Precondition, span: FileSpan) -> Self {
        Self::PreconditionViolation { violation, span }
    }
}

/// Constructs outside the modeled subset.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Unsupported {
    /// `switch` control flow.
    #[error("`switch` statements are not supported")]
    SwitchStatement,

    /// `struct`/`union`/`enum` types.
    #[error("elaborated type `{keyword} {name}` is not supported")]
    ElaboratedType {
        /// Tag keyword
        keyword: TagKind,
        /// Tag name
        name: String,
    },

    /// Parenthesized expression in value position.
    #[error("parenthesized expressions are not supported here")]
    ParenthesizedExpression,

    /// An expression that does not denote a place.
    #[error("{expression} cannot be used as an lvalue")]
    Lvalue {
        /// Kind of the offending expression
        expression: String,
    },

    /// Field of an aggregate, whose type cannot be resolved.
    #[error("member `{field}` of an aggregate cannot be typed")]
    MemberType {
        /// Field name
        field: String,
    },
}

/// Ownership-related type errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TypeErrorKind {
    /// `restrict` pointer whose pointee is `const`.
    #[error("cannot have a restrict pointer to a const type")]
    ConstRestrictPointer,

    /// `restrict` applied to something that is not a pointer.
    #[error("restrict qualifier requires a pointer type")]
    RestrictOnNonPointer,

    /// Copyable value assigned from a non-copyable one, or the reverse.
    #[error("cannot assign `{src}` to `{dest}`: copyable and non-copyable types do not mix")]
    CopyabilityMismatch {
        /// Destination type
        dest: Ty,
        /// Source type
        src: Ty,
    },

    /// `&place` flowing into a destination that is not a reference.
    #[error("cannot borrow into non-reference type `{ty}`")]
    BorrowIntoNonReference {
        /// Destination type
        ty: Ty,
    },

    /// `*place` where `place` is not a reference.
    #[error("cannot dereference non-reference type `{ty}`")]
    DerefOfNonReference {
        /// Type of the dereferenced place
        ty: Ty,
    },

    /// A variable whose declaration was never registered.
    #[error("`{name}` has no registered declaration")]
    UnknownDeclaration {
        /// Variable name
        name: String,
    },
}

/// Assumptions on the normalized input tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Precondition {
    /// `&place` outside any assignment or initializer.
    #[error("address-of expression has no enclosing assignment to take its borrow kind from")]
    BorrowWithoutDestination,
}
