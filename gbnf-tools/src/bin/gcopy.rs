//! Copies a grammar: read it, write it back in canonical form.

fn main() {
    gbnf_tools::main_with(None);
}
