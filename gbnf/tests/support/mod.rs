use gbnf::{read_grammar, write_grammar, DiagnosticSink, Grammar};

/// Runs one tool pipeline over `input`: read, optionally transform, write.
/// Returns the canonical output and the collected diagnostics.
pub fn pipeline(
    input: &str,
    transform: Option<fn(&mut Grammar, &mut DiagnosticSink)>,
) -> (String, DiagnosticSink) {
    let mut diagnostics = DiagnosticSink::new();
    let mut grammar = read_grammar(input.as_bytes(), &mut diagnostics);
    if let Some(transform) = transform {
        transform(&mut grammar, &mut diagnostics);
    }
    let mut out = Vec::new();
    write_grammar(&grammar, &mut out).unwrap();
    (String::from_utf8(out).unwrap(), diagnostics)
}
