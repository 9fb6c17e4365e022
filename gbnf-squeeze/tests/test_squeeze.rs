use gbnf_grammar::{DiagnosticSink, Grammar};
use gbnf_load::read_grammar;
use gbnf_squeeze::squeeze;

fn squeezed(input: &str) -> Grammar {
    let mut diagnostics = DiagnosticSink::new();
    let mut grammar = read_grammar(input.as_bytes(), &mut diagnostics);
    assert!(diagnostics.is_empty(), "clean input expected");
    squeeze(&mut grammar);
    grammar
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
fn test_inline_and_dedup() {
    let grammar = squeezed(
        "> <S>\n\
         <S> ::= <A> | <A>\n\
         <A> ::= 'x'\n",
    );
    assert_eq!(bodies(&grammar, b"<S>"), vec![vec![b"'x'".to_vec()]]);
    // <A> keeps its rule; it is merely unreferenced now
    assert_eq!(bodies(&grammar, b"<A>"), vec![vec![b"'x'".to_vec()]]);
}

#[test]
fn test_no_duplicate_alternatives_remain() {
    let grammar = squeezed(
        "> <S>\n\
         <S> ::= 'a' <B> | 'c' | 'a' <B> | 'c' | 'c'\n\
         <B> ::= 'b' | 'b'\n",
    );
    for name in [b"<S>".as_ref(), b"<B>"] {
        let sym = grammar.lookup(name).unwrap();
        let rules: Vec<_> = grammar.rules(sym).collect();
        for (i, &p) in rules.iter().enumerate() {
            for &q in &rules[i + 1..] {
                assert!(!grammar.same_rule(p, q));
            }
        }
    }
    assert_eq!(bodies(&grammar, b"<S>").len(), 2);
}

#[test]
fn test_multi_element_splice() {
    let grammar = squeezed(
        "> <S>\n\
         <S> ::= 'x' <A> 'y'\n\
         <A> ::= 'a' 'b' 'c'\n",
    );
    assert_eq!(
        bodies(&grammar, b"<S>"),
        vec![vec![
            b"'x'".to_vec(),
            b"'a'".to_vec(),
            b"'b'".to_vec(),
            b"'c'".to_vec(),
            b"'y'".to_vec()
        ]]
    );
}

#[test]
fn test_singleton_chain_collapses() {
    let grammar = squeezed(
        "> <S>\n\
         <S> ::= <A>\n\
         <A> ::= <B>\n\
         <B> ::= 'b'\n",
    );
    assert_eq!(bodies(&grammar, b"<S>"), vec![vec![b"'b'".to_vec()]]);
}

#[test]
fn test_splice_exposes_duplicates() {
    let grammar = squeezed(
        "> <S>\n\
         <S> ::= <A> | <B>\n\
         <A> ::= 'x'\n\
         <B> ::= 'x'\n",
    );
    // both alternatives inline to 'x'; the second pass deduplicates them
    assert_eq!(bodies(&grammar, b"<S>"), vec![vec![b"'x'".to_vec()]]);
}

#[test]
fn test_self_recursive_singleton_is_left_alone() {
    let grammar = squeezed(
        "> <S>\n\
         <S> ::= <A> 'z'\n\
         <A> ::= <A> 'b'\n",
    );
    // inlining <A> could never eliminate the reference; the grammar is
    // left as is (and the pass terminates)
    assert_eq!(
        bodies(&grammar, b"<S>"),
        vec![vec![b"<A>".to_vec(), b"'z'".to_vec()]]
    );
    assert_eq!(
        bodies(&grammar, b"<A>"),
        vec![vec![b"<A>".to_vec(), b"'b'".to_vec()]]
    );
}

#[test]
fn test_multiple_rules_are_not_inlined() {
    let grammar = squeezed(
        "> <S>\n\
         <S> ::= <A>\n\
         <A> ::= 'a' | 'b'\n",
    );
    assert_eq!(bodies(&grammar, b"<S>"), vec![vec![b"<A>".to_vec()]]);
}
