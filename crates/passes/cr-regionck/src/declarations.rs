//! Types of declared variables.

use cr_ast::DeclId;
use cr_intern::Symbol;
use rustc_hash::FxHashMap;

use crate::ty::Ty;

/// Declaration table of one function, filled while annotating.
///
/// Paths resolve through the declaration id. Liveness facts only carry
/// names, so the table is also keyed by name. A reused name maps to every
/// declaration carrying it, since a name alone cannot tell them apart.
#[derive(Debug, Clone, Default)]
pub struct Declarations {
    by_decl: FxHashMap<DeclId, Ty>,
    by_name: FxHashMap<Symbol, Vec<Ty>>,
}

impl Declarations {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the type of a declaration.
    pub fn insert(&mut self, decl: DeclId, name: Symbol, ty: Ty) {
        self.by_name.entry(name).or_default().push(ty.clone());
        self.by_decl.insert(decl, ty);
    }

    /// Type of a declaration.
    #[must_use]
    pub fn get(&self, decl: DeclId) -> Option<&Ty> {
        self.by_decl.get(&decl)
    }

    /// Types of every declaration of `name`, in registration order.
    #[must_use]
    pub fn get_by_name(&self, name: Symbol) -> &[Ty] {
        self.by_name.get(&name).map(Vec::as_slice).unwrap_or_default()
    }

    /// Returns `true` if `decl` has been registered.
    #[must_use]
    pub fn contains(&self, decl: DeclId) -> bool {
        self.by_decl.contains_key(&decl)
    }

    /// Number of registered declarations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_decl.len()
    }

    /// Returns `true` if nothing has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_decl.is_empty()
    }
}
