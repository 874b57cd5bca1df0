//! Places named by lvalue expressions.

use cr_ast::DeclId;
use cr_intern::{Interner, Symbol};
use cr_span::FileSpan;
use std::fmt;

use crate::{
    declarations::Declarations,
    error::{RegionckError, RegionckResult, TypeErrorKind, Unsupported},
    ty::Ty,
};

/// A memory location: a variable, optionally dereferenced or projected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Path {
    /// A declared variable
    VarRef {
        /// Declaration the name resolved to
        decl: DeclId,
        /// Variable name
        name: Symbol,
    },
    /// `*base`
    Deref(Box<Path>),
    /// `base.field`; `base->field` is `(*base).field`
    MemberAccess {
        /// Projected place
        base: Box<Path>,
        /// Field name
        field: Symbol,
    },
}

impl Path {
    /// Path naming a variable.
    #[must_use]
    pub fn var(decl: DeclId, name: Symbol) -> Self {
        Self::VarRef { decl, name }
    }

    /// Dereferences this path.
    #[must_use]
    pub fn deref(self) -> Self {
        Self::Deref(Box::new(self))
    }

    /// Projects a field out of this path.
    #[must_use]
    pub fn member(self, field: Symbol) -> Self {
        Self::MemberAccess {
            base: Box::new(self),
            field,
        }
    }

    /// The path this one is built on, `None` for a variable.
    #[must_use]
    pub fn base(&self) -> Option<&Path> {
        match self {
            Self::VarRef { .. } => None,
            Self::Deref(base) | Self::MemberAccess { base, .. } => Some(base),
        }
    }

    /// Declaration at the root of the path.
    #[must_use]
    pub fn base_decl(&self) -> DeclId {
        match self {
            Self::VarRef { decl, .. } => *decl,
            Self::Deref(base) | Self::MemberAccess { base, .. } => base.base_decl(),
        }
    }

    /// The path itself followed by each of its bases, innermost last.
    pub fn prefixes(&self) -> impl Iterator<Item = &Path> {
        std::iter::successors(Some(self), |path| path.base())
    }

    /// Returns `true` if `self` is `other` or one of its bases.
    #[must_use]
    pub fn is_prefix_of(&self, other: &Path) -> bool {
        other.prefixes().any(|prefix| prefix == self)
    }

    /// Returns `true` if either path is a prefix of the other.
    #[must_use]
    pub fn overlaps(&self, other: &Path) -> bool {
        self.is_prefix_of(other) || other.is_prefix_of(self)
    }

    /// Resolves the type of the place against the declaration table.
    pub fn retrieve_ty(
        &self,
        declarations: &Declarations,
        interner: &Interner,
        span: FileSpan,
    ) -> RegionckResult<Ty> {
        match self {
            Self::VarRef { decl, name } => declarations.get(*decl).cloned().ok_or_else(|| {
                RegionckError::type_error(
                    TypeErrorKind::UnknownDeclaration {
                        name: interner.resolve(*name).to_string(),
                    },
                    span,
                )
            }),
            Self::Deref(base) => match base.retrieve_ty(declarations, interner, span)? {
                Ty::Ref { pointee, .. } => Ok(*pointee),
                ty @ Ty::Builtin { .. } => Err(RegionckError::type_error(
                    TypeErrorKind::DerefOfNonReference { ty },
                    span,
                )),
            },
            Self::MemberAccess { field, .. } => Err(RegionckError::unsupported(
                Unsupported::MemberType {
                    field: interner.resolve(*field).to_string(),
                },
                span,
            )),
        }
    }

    /// Renders the path in C syntax.
    #[must_use]
    pub fn display<'a>(&'a self, interner: &'a Interner) -> PathDisplay<'a> {
        PathDisplay {
            path: self,
            interner,
        }
    }
}

/// [`Path`] rendered with resolved names.
pub struct PathDisplay<'a> {
    path: &'a Path,
    interner: &'a Interner,
}

impl fmt::Display for PathDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.path {
            Path::VarRef { name, .. } => f.write_str(self.interner.resolve(*name)),
            Path::Deref(base) => write!(f, "*{}", base.display(self.interner)),
            Path::MemberAccess { base, field } => {
                let field = self.interner.resolve(*field);
                match base.as_ref() {
                    Path::Deref(inner) => write!(f, "{}->{field}", inner.display(self.interner)),
                    _ => write!(f, "{}.{field}", base.display(self.interner)),
                }
            }
        }
    }
}
