//! Definitions for our grammar symbol type.
//!
//! A symbol is an index into the symbol arena of the grammar it was
//! grabbed from, and is only meaningful together with that grammar.
//! Best to be careful not to mix symbols between different grammars.

use std::num::NonZeroU32;

/// Our common grammar symbol type.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Hash, Eq, Ord, PartialEq, PartialOrd)]
pub struct Symbol {
    n: NonZeroU32,
}

impl Symbol {
    /// Constructs the `Symbol` from its numeric value.
    ///
    /// # Panics
    ///
    /// Panics if the numeric value is `u32::MAX`.
    pub fn from_raw(n: u32) -> Self {
        Symbol {
            n: NonZeroU32::new(n + 1).expect("symbol arena index overflow"),
        }
    }

    /// Returns the symbol's numeric value.
    pub fn usize(self) -> usize {
        self.n.get() as usize - 1
    }
}

impl From<Symbol> for u32 {
    fn from(sym: Symbol) -> u32 {
        sym.n.get() - 1
    }
}
