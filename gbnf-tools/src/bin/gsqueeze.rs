//! Squeezes redundant rules and symbols out of a grammar.

use gbnf::{DiagnosticSink, Grammar};

fn squeeze(grammar: &mut Grammar, _diagnostics: &mut DiagnosticSink) {
    gbnf::squeeze(grammar);
}

fn main() {
    gbnf_tools::main_with(Some(squeeze));
}
