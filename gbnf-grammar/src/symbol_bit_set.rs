//! Per-pass symbol markings in the form of a bit vector.
//!
//! Each pass that needs to classify symbols (reachability in the writer,
//! touched marks in the EBNF rewrite) owns one of these instead of scribbling
//! on a shared field of the symbol records.

use bit_vec::BitVec;
use std::ops;

use gbnf_symbol::Symbol;

/// A set of symbols in the form of a bit vector.
#[derive(Clone, Debug, Default)]
pub struct SymbolBitSet {
    bit_vec: BitVec,
}

impl SymbolBitSet {
    /// Constructs an empty `SymbolBitSet`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Constructs a cleared set covering `len` symbols.
    pub fn with_len(len: usize) -> Self {
        SymbolBitSet {
            bit_vec: BitVec::from_elem(len, false),
        }
    }

    /// Sets one symbol's membership, growing the set as needed so that
    /// symbols allocated after the set was created can be marked too.
    pub fn set(&mut self, sym: Symbol, value: bool) {
        let at = sym.usize();
        if at >= self.bit_vec.len() {
            self.bit_vec.grow(at + 1 - self.bit_vec.len(), false);
        }
        self.bit_vec.set(at, value);
    }

    /// Returns the number of symbols the set covers.
    pub fn len(&self) -> usize {
        self.bit_vec.len()
    }

    /// Checks whether the set covers no symbols.
    pub fn is_empty(&self) -> bool {
        self.bit_vec.is_empty()
    }
}

static TRUE: bool = true;
static FALSE: bool = false;

impl ops::Index<Symbol> for SymbolBitSet {
    type Output = bool;

    fn index(&self, sym: Symbol) -> &Self::Output {
        if self.bit_vec.get(sym.usize()).unwrap_or(false) {
            &TRUE
        } else {
            &FALSE
        }
    }
}
