//! Toolkit for manipulating context-free grammars in a BNF/EBNF-like
//! notation: a reader, three semantics-preserving transformations and a
//! canonical writer, all working on one mutable [`Grammar`] value.

pub use gbnf_grammar::*;
pub use gbnf_symbol::{StringPool, Symbol, NAME_LIMIT, POOL_CAPACITY};

pub use gbnf_deebnf::de_ebnf;
pub use gbnf_deempty::de_empty;
pub use gbnf_load::read_grammar;
pub use gbnf_squeeze::squeeze;
pub use gbnf_write::write_grammar;
