//! The grammar reader.
//!
//! Input is a byte slice in a BNF-like notation. Lines are classified by
//! their first non-blank character: `>` declares the distinguished symbol,
//! `/` declares the empty pseudo-symbol, `#` opens a comment, anything else
//! starts a production rule `LHS ::= RHS1 | RHS2 | ...`. A line beginning
//! with blank space continues the rule above it.
//!
//! The reader is driven by a single byte of look-ahead and never fails:
//! malformed input is repaired locally and reported through the
//! diagnostic sink.

#![deny(unsafe_code)]

use log::debug;

use gbnf_grammar::{DiagnosticSink, ElementId, Grammar, ProductionId, COMMENT};
use gbnf_symbol::{Symbol, NAME_LIMIT};

/// Reads a grammar from `input`, reporting problems to `diagnostics`.
pub fn read_grammar(input: &[u8], diagnostics: &mut DiagnosticSink) -> Grammar {
    Reader::new(input, diagnostics).read()
}

struct Reader<'a, 'd> {
    input: &'a [u8],
    pos: usize,
    /// The look-ahead byte; `None` once the input is exhausted.
    ch: Option<u8>,
    line: u32,
    /// Set by `nonblank` at the end of an alternative, reset when understood.
    endlist: bool,
    /// Set by `nonblank` at the end of a rule, reset when understood.
    endrule: bool,
    grammar: Grammar,
    diagnostics: &'d mut DiagnosticSink,
}

impl<'a, 'd> Reader<'a, 'd> {
    fn new(input: &'a [u8], diagnostics: &'d mut DiagnosticSink) -> Self {
        Reader {
            input,
            pos: 0,
            ch: None,
            line: 1,
            endlist: false,
            endrule: false,
            grammar: Grammar::new(),
            diagnostics,
        }
    }

    fn read(mut self) -> Grammar {
        self.bump();
        while let Some(ch) = self.ch {
            match ch {
                b'\n' => self.newline(),
                b' ' | b'\t' => self.bump(),
                b'>' => self.start_directive(),
                b'/' => self.empty_directive(),
                COMMENT => self.skip_line(),
                first => self.rule(first),
            }
        }

        match self.grammar.start_symbol() {
            None => self
                .diagnostics
                .emit("DISTINGUISHED SYMBOL NOT GIVEN", None),
            Some(start) if self.grammar.is_terminal(start) => self
                .diagnostics
                .emit("DISTINGUISHED SYMBOL IS TERMINAL", self.grammar[start].line),
            Some(_) => {}
        }
        if let Some(empty) = self.grammar.empty_symbol() {
            if let Some(rule) = self.grammar[empty].rules {
                self.diagnostics
                    .emit("EMPTY SYMBOL IS NONTERMINAL", self.grammar[rule].line);
            }
        }
        debug!(
            "read {} symbols over {} lines",
            self.grammar.num_syms(),
            self.line
        );
        self.grammar
    }

    /// `> <symbol>` names the symbol derivations start from.
    fn start_directive(&mut self) {
        if self.grammar.start_symbol().is_some() {
            self.diagnostics
                .emit("EXTRA DISTINGUISHED SYMBOL", Some(self.line));
        } else {
            self.bump();
            self.skip_white();
            match self.ch {
                Some(b'\n') | None => self
                    .diagnostics
                    .emit("NO DISTINGUISHED SYMBOL", Some(self.line)),
                Some(first) => {
                    let start = self.symbol(first);
                    self.grammar.set_start_symbol(Some(start));
                }
            }
        }
        self.skip_line();
    }

    /// `/ <symbol>` names the empty pseudo-symbol.
    fn empty_directive(&mut self) {
        if self.grammar.empty_symbol().is_some() {
            self.diagnostics.emit("EXTRA EMPTY SYMBOL", Some(self.line));
        } else {
            self.bump();
            self.skip_white();
            match self.ch {
                Some(b'\n') | None => {
                    self.diagnostics.emit("NO EMPTY SYMBOL", Some(self.line))
                }
                Some(first) => {
                    let empty = self.symbol(first);
                    self.grammar.set_empty_symbol(Some(empty));
                }
            }
        }
        self.skip_line();
    }

    /// `LHS ::= ...`: everything that is not a directive or comment.
    fn rule(&mut self, first: u8) {
        let lhs = self.symbol(first);
        self.skip_white();
        if self.rule_separator() {
            let rules = self.production_list();
            self.grammar.append_rules(lhs, rules);
        } else {
            self.diagnostics
                .emit("MISSING ::= OR EQUIVALENT", Some(self.line));
            self.skip_line();
        }
    }

    /// Consumes one of `:`, `=`, `:=`, `::=`.
    fn rule_separator(&mut self) -> bool {
        match self.ch {
            Some(b':') => {
                self.bump();
                if self.ch == Some(b':') {
                    self.bump();
                    if self.ch == Some(b'=') {
                        self.bump();
                    }
                } else if self.ch == Some(b'=') {
                    self.bump();
                }
                true
            }
            Some(b'=') => {
                self.bump();
                true
            }
            _ => false,
        }
    }

    /// Reads the list of alternatives on the right-hand side of a rule.
    fn production_list(&mut self) -> Option<ProductionId> {
        let mut head = None;
        let mut tail: Option<ProductionId> = None;
        loop {
            let production = self.grammar.new_production(Some(self.line));
            self.nonblank();
            if !self.endlist {
                let body = self.symbol_list();
                self.grammar[production].body = body;
            } else {
                // `|` immediately followed by `|` or the end of the rule
                let line = self.grammar[production].line;
                self.diagnostics.emit("EMPTY PRODUCTION RULE", line);
                if let Some(empty) = self.grammar.empty_symbol() {
                    let element = self.grammar.new_element(empty, Some(self.line));
                    self.grammar[production].body = Some(element);
                }
                self.endlist = false;
            }
            match tail {
                None => head = Some(production),
                Some(prev) => self.grammar[prev].next = Some(production),
            }
            tail = Some(production);
            if self.endrule {
                break;
            }
        }
        self.endrule = false;
        self.endlist = false;
        head
    }

    /// Reads the elements of one alternative.
    fn symbol_list(&mut self) -> Option<ElementId> {
        let mut head = None;
        let mut tail: Option<ElementId> = None;
        loop {
            self.nonblank();
            if self.endlist {
                self.endlist = false;
                break;
            }
            let line = self.line;
            let Some(first) = self.ch else { break };
            let target = self.symbol(first);
            let element = self.grammar.new_element(target, Some(line));
            match tail {
                None => head = Some(element),
                Some(prev) => self.grammar[prev].next = Some(element),
            }
            tail = Some(element);
        }
        head
    }

    /// Lexes one symbol token starting at `first` (the current look-ahead,
    /// known to be non-blank) and interns it. The stored name keeps its
    /// delimiters, so `<x>`, `'x'` and `x` stay three distinct symbols.
    fn symbol(&mut self, first: u8) -> Symbol {
        let mut name = Vec::new();
        self.extend_name(&mut name, first);

        if first == b'<' {
            self.bump();
            match self.ch {
                Some(c) if c.is_ascii_alphanumeric() => {
                    // definitely an angle-quoted symbol
                    let mut c = c;
                    let mut closed = false;
                    loop {
                        self.extend_name(&mut name, c);
                        if c == b'>' {
                            closed = true;
                            break;
                        }
                        self.bump();
                        match self.ch {
                            Some(b'\n') | None => break,
                            Some(next) => c = next,
                        }
                    }
                    if closed {
                        self.bump();
                    } else {
                        self.diagnostics
                            .emit("MISSING CLOSING > MARK", Some(self.line));
                        // fake it
                        self.extend_name(&mut name, b'>');
                    }
                }
                _ => {
                    // the `<` begins an ordinary blank-delimited token
                    self.finish_bare(&mut name);
                }
            }
        } else if first == b'"' || first == b'\'' {
            self.bump();
            while let Some(c) = self.ch {
                if c == first || c == b'\n' {
                    break;
                }
                self.extend_name(&mut name, c);
                self.bump();
            }
            if self.ch == Some(first) {
                self.extend_name(&mut name, first);
                self.bump();
            } else {
                self.diagnostics
                    .emit("MISSING CLOSING QUOTE", Some(self.line));
                // fake it
                self.extend_name(&mut name, first);
            }
        } else {
            self.bump();
            self.finish_bare(&mut name);
        }

        let line = self.line;
        self.grammar
            .lookup_or_define(&name, Some(line), self.diagnostics)
    }

    /// Consumes the rest of a blank-delimited token.
    fn finish_bare(&mut self, name: &mut Vec<u8>) {
        while let Some(c) = self.ch {
            if c == b' ' || c == b'\t' || c == b'\n' {
                break;
            }
            self.extend_name(name, c);
            self.bump();
        }
    }

    fn extend_name(&mut self, name: &mut Vec<u8>, ch: u8) {
        if name.len() >= NAME_LIMIT {
            self.diagnostics.emit("SYMBOL TOO LONG", Some(self.line));
        } else {
            name.push(ch);
        }
    }

    /// Scans for a non-blank look-ahead, understanding `|`, line
    /// continuation and the two end conditions.
    fn nonblank(&mut self) {
        loop {
            match self.ch {
                Some(b'|') => {
                    self.endlist = true;
                    self.bump();
                    return;
                }
                None => {
                    self.endrule = true;
                    self.endlist = true;
                    return;
                }
                Some(b'\n') => {
                    self.newline();
                    match self.ch {
                        Some(b' ') | Some(b'\t') => {} // continuation line
                        _ => {
                            self.endrule = true;
                            self.endlist = true;
                            return;
                        }
                    }
                }
                Some(b' ') | Some(b'\t') => self.bump(),
                Some(_) => return,
            }
        }
    }

    fn skip_white(&mut self) {
        while let Some(b' ') | Some(b'\t') = self.ch {
            self.bump();
        }
    }

    fn skip_line(&mut self) {
        while let Some(c) = self.ch {
            if c == b'\n' {
                break;
            }
            self.bump();
        }
        if self.ch == Some(b'\n') {
            self.newline();
        }
    }

    /// Advances past a newline, called with the look-ahead at `\n`.
    fn newline(&mut self) {
        self.line += 1;
        self.bump();
    }

    fn bump(&mut self) {
        self.ch = self.input.get(self.pos).copied();
        self.pos += 1;
    }
}
