//! Surface types as written in source.

use cr_intern::{Interner, Symbol};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Body, TypeRefId};

/// Builtin scalar type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuiltinKind {
    /// `void`
    Void,
    /// `_Bool`
    Bool,
    /// `char`
    Char,
    /// `signed char`
    SignedChar,
    /// `unsigned char`
    UnsignedChar,
    /// `short`
    Short,
    /// `unsigned short`
    UnsignedShort,
    /// `int`
    Int,
    /// `unsigned int`
    UnsignedInt,
    /// `long`
    Long,
    /// `unsigned long`
    UnsignedLong,
    /// `long long`
    LongLong,
    /// `unsigned long long`
    UnsignedLongLong,
    /// `float`
    Float,
    /// `double`
    Double,
    /// `long double`
    LongDouble,
}

impl BuiltinKind {
    /// Spelling of the type in source.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Void => "void",
            Self::Bool => "_Bool",
            Self::Char => "char",
            Self::SignedChar => "signed char",
            Self::UnsignedChar => "unsigned char",
            Self::Short => "short",
            Self::UnsignedShort => "unsigned short",
            Self::Int => "int",
            Self::UnsignedInt => "unsigned int",
            Self::Long => "long",
            Self::UnsignedLong => "unsigned long",
            Self::LongLong => "long long",
            Self::UnsignedLongLong => "unsigned long long",
            Self::Float => "float",
            Self::Double => "double",
            Self::LongDouble => "long double",
        }
    }
}

impl fmt::Display for BuiltinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type qualifiers attached by a `Qualified` wrapper.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Qualifiers {
    /// `const`
    pub is_const: bool,
    /// `restrict`
    pub is_restrict: bool,
    /// `volatile`
    pub is_volatile: bool,
}

impl Qualifiers {
    /// No qualifiers.
    pub const NONE: Self = Self {
        is_const: false,
        is_restrict: false,
        is_volatile: false,
    };

    /// Only `const`.
    pub const CONST: Self = Self {
        is_const: true,
        is_restrict: false,
        is_volatile: false,
    };

    /// Only `restrict`.
    pub const RESTRICT: Self = Self {
        is_const: false,
        is_restrict: true,
        is_volatile: false,
    };

    /// Union of two qualifier sets.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            is_const: self.is_const || other.is_const,
            is_restrict: self.is_restrict || other.is_restrict,
            is_volatile: self.is_volatile || other.is_volatile,
        }
    }
}

/// Keyword of an elaborated (tagged) type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagKind {
    /// `struct`
    Struct,
    /// `union`
    Union,
    /// `enum`
    Enum,
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Struct => "struct",
            Self::Union => "union",
            Self::Enum => "enum",
        })
    }
}

/// Surface type node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    /// Qualifiers applied to an unqualified type
    Qualified {
        /// Applied qualifiers
        qualifiers: Qualifiers,
        /// The unqualified type
        inner: TypeRefId,
    },

    /// Builtin scalar
    Builtin(BuiltinKind),

    /// Pointer to `pointee`
    Pointer {
        /// Pointed-to type
        pointee: TypeRefId,
    },

    /// Named alias of another type
    Typedef {
        /// Alias name
        name: Symbol,
        /// Aliased type
        underlying: TypeRefId,
    },

    /// `struct`/`union`/`enum` type
    Elaborated {
        /// Tag keyword
        keyword: TagKind,
        /// Tag name
        name: Symbol,
    },
}

impl Body {
    /// Renders a surface type in canonical spelling.
    ///
    /// Typedefs are resolved transparently and qualifiers on a wrapper are
    /// folded into the type it wraps, so `const my_int` with
    /// `typedef int my_int` renders as `const int`. Pointer qualifiers follow
    /// the star: `const char * const`.
    #[must_use]
    pub fn describe_type(&self, ty: TypeRefId, interner: &Interner) -> String {
        self.describe_qualified(ty, Qualifiers::NONE, interner)
    }

    fn describe_qualified(&self, ty: TypeRefId, quals: Qualifiers, interner: &Interner) -> String {
        match &self.types[ty] {
            TypeRef::Qualified { qualifiers, inner } => {
                self.describe_qualified(*inner, quals.merge(*qualifiers), interner)
            }
            TypeRef::Typedef { underlying, .. } => {
                self.describe_qualified(*underlying, quals, interner)
            }
            TypeRef::Builtin(kind) => {
                if quals.is_const {
                    format!("const {kind}")
                } else {
                    kind.to_string()
                }
            }
            TypeRef::Pointer { pointee } => {
                let mut out = format!(
                    "{} *",
                    self.describe_qualified(*pointee, Qualifiers::NONE, interner)
                );
                if quals.is_const {
                    out.push_str(" const");
                }
                if quals.is_restrict {
                    out.push_str(" restrict");
                }
                out
            }
            TypeRef::Elaborated { keyword, name } => {
                let tag = interner.try_resolve(*name).unwrap_or("<anonymous>");
                if quals.is_const {
                    format!("const {keyword} {tag}")
                } else {
                    format!("{keyword} {tag}")
                }
            }
        }
    }
}
