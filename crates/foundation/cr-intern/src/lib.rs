//! String interning for variable, field and callee names.
//!
//! Names are compared far more often than they are printed (declaration
//! lookups, liveness keys), so the tree stores [`Symbol`]s and keeps the
//! strings in one [`Interner`] per analyzed function.

pub use lasso::Spur as Symbol;
use lasso::Rodeo;
use std::fmt;

/// Single-threaded string interner.
///
/// Each function analysis owns its own interner; nothing is shared across
/// concurrently checked functions.
pub struct Interner {
    rodeo: Rodeo,
}

impl Interner {
    /// Creates an empty interner.
    #[must_use]
    pub fn new() -> Self {
        Self { rodeo: Rodeo::new() }
    }

    /// Number of distinct names interned so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rodeo.len()
    }

    /// Returns `true` if nothing has been interned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rodeo.is_empty()
    }

    /// Interns `name`, returning the existing symbol if already present.
    pub fn intern(&mut self, name: &str) -> Symbol {
        self.rodeo.get_or_intern(name)
    }

    /// Looks up a name without interning it.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Symbol> {
        self.rodeo.get(name)
    }

    /// Resolves a symbol produced by this interner.
    #[must_use]
    pub fn resolve(&self, symbol: Symbol) -> &str {
        self.rodeo.resolve(&symbol)
    }

    /// Resolves a symbol that may come from another interner.
    #[must_use]
    pub fn try_resolve(&self, symbol: Symbol) -> Option<&str> {
        self.rodeo.try_resolve(&symbol)
    }
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Interner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interner").field("len", &self.len()).finish()
    }
}
