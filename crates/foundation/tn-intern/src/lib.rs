//! String interning for names and labels

pub use lasso::Spur as Symbol;
use lasso::ThreadedRodeo;
use std::fmt;
use std::sync::Arc;

/// Shared string interner
///
/// Cloning is cheap; all clones intern into the same table, so a `Symbol`
/// produced through one clone resolves through any other.
#[derive(Clone)]
pub struct Interner {
    inner: Arc<ThreadedRodeo>,
}

impl Interner {
    /// Create an empty interner
    pub fn new() -> Self {
        Self {
            inner: Arc::new(ThreadedRodeo::new()),
        }
    }

    /// Intern `s`, returning the existing symbol if it was seen before
    pub fn intern(&self, s: &str) -> Symbol {
        self.inner.get_or_intern(s)
    }

    /// Look up the text of a symbol
    ///
    /// Panics if `sym` came from an unrelated interner.
    pub fn resolve(&self, sym: &Symbol) -> &str {
        self.inner.resolve(sym)
    }
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Interner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interner")
            .field("len", &self.inner.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_symbols() {
        let interner = Interner::new();
        let other = interner.clone();

        let x = interner.intern("x");
        assert_eq!(other.intern("x"), x);
        assert_eq!(other.resolve(&x), "x");
        assert_ne!(interner.intern("y"), x);
    }
}
