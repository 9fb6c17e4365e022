//! The in-memory grammar model: arenas of symbol, production and element
//! records linked by optional index handles, plus the two distinguished
//! symbols every tool cares about (the start symbol and the empty
//! pseudo-symbol).
//!
//! Transformations unlink records but never reclaim them; everything is
//! released together when the `Grammar` is dropped.

#![deny(unsafe_code)]

pub mod compare;
pub mod diagnostic;
pub mod grammar;
pub mod symbol_bit_set;

pub use crate::diagnostic::{Diagnostic, DiagnosticSink};
pub use crate::grammar::{
    ElementData, ElementId, Elements, Grammar, ProductionData, ProductionId, Productions,
    RuleBuilder, SymbolData,
};
pub use crate::symbol_bit_set::SymbolBitSet;

pub use gbnf_symbol::Symbol;

/// Comment leader recognized by the reader and emitted by the writer.
pub const COMMENT: u8 = b'#';

/// The separator emitted between a rule's left- and right-hand sides.
/// The reader also accepts `:`, `=` and `:=` on input.
pub const RULE_SEPARATOR: &str = "::=";
