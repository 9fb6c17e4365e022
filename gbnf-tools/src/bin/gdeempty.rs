//! Eliminates the empty pseudo-symbol from a grammar.

fn main() {
    gbnf_tools::main_with(Some(gbnf::de_empty));
}
