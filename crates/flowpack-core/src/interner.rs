//! Name interning for flow bookkeeping.
//!
//! Flow State Table slots are keyed by `(component, name)`; the name part is
//! a [`Symbol`] so keys stay two integers and never collide on separators.

use indexmap::IndexSet;

/// Interned name. Symbols compare in first-seen order.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Symbol(u32);

impl Symbol {
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

#[derive(Debug, Clone, Default)]
pub struct Interner {
    names: IndexSet<String>,
}

impl Interner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, name: &str) -> Symbol {
        if let Some(index) = self.names.get_index_of(name) {
            return Symbol(index as u32);
        }
        let (index, _) = self.names.insert_full(name.to_owned());
        Symbol(index as u32)
    }

    /// Lookup without interning; read-only passes must not grow the table.
    pub fn get(&self, name: &str) -> Option<Symbol> {
        self.names.get_index_of(name).map(|index| Symbol(index as u32))
    }

    /// Name of `sym`. Symbols from another interner resolve to `""`.
    pub fn resolve(&self, sym: Symbol) -> &str {
        self.try_resolve(sym).unwrap_or_default()
    }

    pub fn try_resolve(&self, sym: Symbol) -> Option<&str> {
        self.names.get_index(sym.0 as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
