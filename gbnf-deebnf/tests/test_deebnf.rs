use gbnf_deebnf::de_ebnf;
use gbnf_grammar::{DiagnosticSink, Grammar};
use gbnf_load::read_grammar;

fn transformed(input: &str) -> (Grammar, DiagnosticSink) {
    let mut diagnostics = DiagnosticSink::new();
    let mut grammar = read_grammar(input.as_bytes(), &mut diagnostics);
    assert!(diagnostics.is_empty(), "clean input expected");
    de_ebnf(&mut grammar, &mut diagnostics);
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
fn test_optional_group() {
    let (grammar, diagnostics) = transformed(
        "> <S>\n\
         / <empty>\n\
         <S> ::= <a> [ <b> ] <c>\n",
    );
    assert!(diagnostics.is_empty());
    assert_eq!(
        bodies(&grammar, b"<S>"),
        vec![vec![b"<a>".to_vec(), b"<S-a>".to_vec(), b"<c>".to_vec()]]
    );
    assert_eq!(
        bodies(&grammar, b"<S-a>"),
        vec![vec![b"<b>".to_vec()], vec![b"<empty>".to_vec()]]
    );
}

#[test]
fn test_repetition_group_iterates() {
    let (grammar, diagnostics) = transformed(
        "> <S>\n\
         / <empty>\n\
         <S> ::= { <a> }\n",
    );
    assert!(diagnostics.is_empty());
    assert_eq!(bodies(&grammar, b"<S>"), vec![vec![b"<S-a>".to_vec()]]);
    assert_eq!(
        bodies(&grammar, b"<S-a>"),
        vec![
            vec![b"<a>".to_vec(), b"<S-a>".to_vec()],
            vec![b"<empty>".to_vec()]
        ]
    );
}

#[test]
fn test_group_with_alternatives() {
    let (grammar, diagnostics) = transformed(
        "> <S>\n\
         / <empty>\n\
         <S> ::= <a> ( <b> | <c> ) <d>\n",
    );
    assert!(diagnostics.is_empty());
    // the group spans an alternative boundary; both branches move under
    // the invented symbol and <S> keeps a single rule
    assert_eq!(
        bodies(&grammar, b"<S>"),
        vec![vec![b"<a>".to_vec(), b"<S-a>".to_vec(), b"<d>".to_vec()]]
    );
    assert_eq!(
        bodies(&grammar, b"<S-a>"),
        vec![vec![b"<b>".to_vec()], vec![b"<c>".to_vec()]]
    );
}

#[test]
fn test_nested_groups() {
    let (grammar, diagnostics) = transformed(
        "> <S>\n\
         / <empty>\n\
         <S> ::= { <a> { <b> } }\n",
    );
    assert!(diagnostics.is_empty());
    assert_eq!(bodies(&grammar, b"<S>"), vec![vec![b"<S-a>".to_vec()]]);
    // the outer group was processed first; the inner one was invented
    // while processing <S-a>, so it took the -a suffix of that name
    assert_eq!(
        bodies(&grammar, b"<S-a>"),
        vec![
            vec![b"<a>".to_vec(), b"<S-a-a>".to_vec(), b"<S-a>".to_vec()],
            vec![b"<empty>".to_vec()]
        ]
    );
    assert_eq!(
        bodies(&grammar, b"<S-a-a>"),
        vec![
            vec![b"<b>".to_vec(), b"<S-a-a>".to_vec()],
            vec![b"<empty>".to_vec()]
        ]
    );
}

#[test]
fn test_fresh_names_count_up_and_respect_quotes() {
    let (grammar, _) = transformed(
        "> <S>\n\
         / <empty>\n\
         <S> ::= ( <a> ) ( <b> ) 'q'\n\
         'q' ::= ( <c> )\n",
    );
    assert_eq!(
        bodies(&grammar, b"<S>"),
        vec![vec![b"<S-a>".to_vec(), b"<S-b>".to_vec(), b"'q'".to_vec()]]
    );
    // the suffix lands before the closing quote
    assert_eq!(bodies(&grammar, b"'q'"), vec![vec![b"'q-a'".to_vec()]]);
    assert_eq!(bodies(&grammar, b"'q-a'"), vec![vec![b"<c>".to_vec()]]);
}

#[test]
fn test_no_metacharacters_survive() {
    let (grammar, _) = transformed(
        "> <S>\n\
         / <empty>\n\
         <S> ::= [ <a> ] { <b> } ( <c> )\n",
    );
    for name in [b"(".as_ref(), b")", b"[", b"]", b"{", b"}"] {
        assert_eq!(grammar.lookup(name), None);
    }
    for sym in grammar.symbols() {
        for production in grammar.rules(sym) {
            for element in grammar.body(production) {
                let target = grammar[element].target;
                let name = grammar.name_of(target);
                assert!(
                    !matches!(name, b"(" | b")" | b"[" | b"]" | b"{" | b"}"),
                    "metacharacter {:?} survived",
                    String::from_utf8_lossy(name)
                );
            }
        }
    }
}

#[test]
fn test_unexpected_close_is_deleted() {
    let (grammar, diagnostics) = transformed(
        "> <S>\n\
         / <empty>\n\
         <S> ::= <a> ] <b>\n",
    );
    assert!(diagnostics.contains("UNEXPECTED ]"));
    assert_eq!(
        bodies(&grammar, b"<S>"),
        vec![vec![b"<a>".to_vec(), b"<b>".to_vec()]]
    );
}

#[test]
fn test_missing_close_runs_to_end_of_rule() {
    let (grammar, diagnostics) = transformed(
        "> <S>\n\
         / <empty>\n\
         <S> ::= <a> ( <b> <c>\n",
    );
    assert!(diagnostics.contains("MISSING )"));
    assert_eq!(
        bodies(&grammar, b"<S>"),
        vec![vec![b"<a>".to_vec(), b"<S-a>".to_vec()]]
    );
    assert_eq!(
        bodies(&grammar, b"<S-a>"),
        vec![vec![b"<b>".to_vec(), b"<c>".to_vec()]]
    );
}

#[test]
fn test_empty_group_is_repaired() {
    let (grammar, diagnostics) = transformed(
        "> <S>\n\
         / <empty>\n\
         <S> ::= <a> ( ) <b>\n",
    );
    assert!(diagnostics.contains("EMPTY BRACKETED RULE"));
    assert_eq!(
        bodies(&grammar, b"<S>"),
        vec![vec![b"<a>".to_vec(), b"<S-a>".to_vec(), b"<b>".to_vec()]]
    );
    assert_eq!(bodies(&grammar, b"<S-a>"), vec![vec![b"<empty>".to_vec()]]);
}

#[test]
fn test_nonterminal_brace_is_reported() {
    let mut diagnostics = DiagnosticSink::new();
    let mut grammar = read_grammar(
        b"> <S>\n/ <empty>\n<S> ::= ( <a> )\n( ::= <x>\n",
        &mut diagnostics,
    );
    assert!(diagnostics.is_empty());
    de_ebnf(&mut grammar, &mut diagnostics);
    assert!(diagnostics.contains("BRACE SHOULD BE NONTERMINAL"));
}
