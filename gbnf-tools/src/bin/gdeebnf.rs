//! Converts a grammar from Wirth-style EBNF to pure BNF.

fn main() {
    gbnf_tools::main_with(Some(gbnf::de_ebnf));
}
