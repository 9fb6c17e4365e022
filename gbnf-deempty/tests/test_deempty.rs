use gbnf_deempty::de_empty;
use gbnf_grammar::{DiagnosticSink, Grammar};
use gbnf_load::read_grammar;

fn transformed(input: &str) -> (Grammar, DiagnosticSink) {
    let mut diagnostics = DiagnosticSink::new();
    let mut grammar = read_grammar(input.as_bytes(), &mut diagnostics);
    assert!(diagnostics.is_empty(), "clean input expected");
    de_empty(&mut grammar, &mut diagnostics);
    (grammar, diagnostics)
}

fn bodies(grammar: &Grammar, name: &[u8]) -> Vec<Vec<Vec<u8>>> {
    let sym = grammar.lookup(name).expect("symbol should exist");
    grammar
        .rules(sym)
        .map(|p| {
            grammar
                .body(p)
                .map(|e| grammar.name_of(grammar[e].target).to_vec())
                .collect()
        })
        .collect()
}

#[test]
fn test_possibly_empty_element_fans_out() {
    let (grammar, _) = transformed(
        "> <S>\n\
         / <empty>\n\
         <S> ::= <A> <B>\n\
         <A> ::= 'a' | <empty>\n\
         <B> ::= 'b'\n",
    );
    // the second alternative of <S> drops the possibly-empty <A>
    assert_eq!(
        bodies(&grammar, b"<S>"),
        vec![vec![b"<A>".to_vec(), b"<B>".to_vec()], vec![b"<B>".to_vec()]]
    );
    assert_eq!(bodies(&grammar, b"<A>"), vec![vec![b"'a'".to_vec()]]);
    assert_eq!(bodies(&grammar, b"<B>"), vec![vec![b"'b'".to_vec()]]);
    // the start symbol cannot be empty, so the empty symbol is gone
    assert_eq!(grammar.empty_symbol(), None);
}

#[test]
fn test_no_empty_references_remain() {
    let (grammar, _) = transformed(
        "> <S>\n\
         / <empty>\n\
         <S> ::= <A> <B> <C>\n\
         <A> ::= 'a' | <empty>\n\
         <B> ::= <empty>\n\
         <C> ::= 'c'\n",
    );
    assert_eq!(grammar.empty_symbol(), None);
    let empty = grammar.lookup(b"<empty>").expect("still interned");
    for name in [b"<S>".to_vec(), b"<A>".to_vec(), b"<C>".to_vec()] {
        let sym = grammar.lookup(&name).unwrap();
        for production in grammar.rules(sym) {
            for element in grammar.body(production) {
                assert_ne!(grammar[element].target, empty);
            }
        }
    }
    // <B> derived only the empty string; its references vanished with it
    assert_eq!(
        bodies(&grammar, b"<S>"),
        vec![
            vec![b"<A>".to_vec(), b"<C>".to_vec()],
            vec![b"<C>".to_vec()]
        ]
    );
    // a definitely-empty symbol keeps its rules and simply goes unreferenced
    assert_eq!(bodies(&grammar, b"<B>"), vec![vec![b"<empty>".to_vec()]]);
}

#[test]
fn test_nullable_start_keeps_one_empty_alternative() {
    let (grammar, _) = transformed(
        "> <S>\n\
         / <empty>\n\
         <S> ::= 'a' | <empty>\n",
    );
    // preserved, with the empty alternative re-added at the tail
    assert_eq!(
        bodies(&grammar, b"<S>"),
        vec![vec![b"'a'".to_vec()], vec![b"<empty>".to_vec()]]
    );
    assert!(grammar.empty_symbol().is_some());
    assert!(grammar.start_symbol().is_some());
}

#[test]
fn test_empty_language_clears_both_distinguished_symbols() {
    let (grammar, _) = transformed(
        "> <S>\n\
         / <empty>\n\
         <S> ::= <empty> | <empty> <empty>\n",
    );
    assert_eq!(grammar.start_symbol(), None);
    assert_eq!(grammar.empty_symbol(), None);
}

#[test]
fn test_duplicate_variants_are_not_inserted() {
    let (grammar, _) = transformed(
        "> <S>\n\
         / <empty>\n\
         <S> ::= <A> <B> | <B>\n\
         <A> ::= 'a' | <empty>\n\
         <B> ::= 'b'\n",
    );
    // dropping <A> from the first alternative would duplicate the second
    assert_eq!(
        bodies(&grammar, b"<S>"),
        vec![vec![b"<A>".to_vec(), b"<B>".to_vec()], vec![b"<B>".to_vec()]]
    );
}

#[test]
fn test_requires_empty_symbol() {
    let mut diagnostics = DiagnosticSink::new();
    let mut grammar = read_grammar(b"> <S>\n<S> ::= 'a'\n", &mut diagnostics);
    assert!(diagnostics.is_empty());
    de_empty(&mut grammar, &mut diagnostics);
    assert!(diagnostics.contains("EMPTY SYMBOL MUST BE DEFINED"));
    // and the grammar is untouched
    assert_eq!(bodies(&grammar, b"<S>"), vec![vec![b"'a'".to_vec()]]);
}

#[test]
fn test_chained_nullability_reaches_fixed_point() {
    let (grammar, _) = transformed(
        "> <S>\n\
         / <e>\n\
         <S> ::= <A> 'x'\n\
         <A> ::= <B> <B>\n\
         <B> ::= <C>\n\
         <C> ::= <e>\n",
    );
    // <C>, <B> and <A> are all definitely empty, discovered over several
    // passes; every reference to them disappears
    assert_eq!(bodies(&grammar, b"<S>"), vec![vec![b"'x'".to_vec()]]);
}
