//! The canonical grammar writer.
//!
//! The distinguished symbol comes first, then the empty symbol when one is
//! declared:
//!
//! ```text
//! > <distinguished>
//! / <empty>
//! ```
//!
//! Rule groups follow in reachability order, one nonterminal per group.
//! Alternatives share the left-hand side, separated by a vertical bar
//! aligned under the rule separator, and long right-hand sides soft-wrap at
//! column 80 onto the continuation column:
//!
//! ```text
//! <nonterminal> ::= <a> 'b'
//!                |  <c> 'd'
//! ```
//!
//! Start and follow sets, when attached, are rendered as comments after
//! their group. The trailing sections list reached terminals, then
//! never-reached nonterminals and terminals.

#![deny(unsafe_code)]

use std::io::{self, Write};

use gbnf_grammar::{Grammar, ProductionId, SymbolBitSet, COMMENT, RULE_SEPARATOR};
use gbnf_symbol::Symbol;

/// Right margin for soft wrapping.
const MARGIN: usize = 80;

/// Writes the grammar to `out` in canonical form.
pub fn write_grammar<W: Write>(grammar: &Grammar, out: W) -> io::Result<()> {
    Printer::new(grammar, out).write()
}

struct Printer<'a, W: Write> {
    grammar: &'a Grammar,
    out: W,
    /// Last column filled on the current line.
    column: usize,
    /// Column for the vertical bar of the current group.
    bar_column: usize,
    /// Column for continuation of a wrapped right-hand side.
    cont_column: usize,
    reached: SymbolBitSet,
}

impl<'a, W: Write> Printer<'a, W> {
    fn new(grammar: &'a Grammar, out: W) -> Self {
        Printer {
            grammar,
            out,
            column: 0,
            bar_column: 0,
            cont_column: 0,
            reached: SymbolBitSet::with_len(grammar.num_syms()),
        }
    }

    fn write(mut self) -> io::Result<()> {
        let grammar = self.grammar;

        match grammar.start_symbol() {
            Some(start) => {
                self.put_str("> ")?;
                self.put_symbol(start)?;
            }
            None => {
                self.put_char(COMMENT)?;
                self.put_str(" no distinguished symbol!")?;
            }
        }
        if let Some(empty) = grammar.empty_symbol() {
            self.put_line()?;
            self.put_str("/ ")?;
            self.put_symbol(empty)?;
        }

        if let Some(start) = grammar.start_symbol() {
            self.put_line()?;
            self.reachable(start)?;
        }

        let mut header = false;
        for sym in grammar.symbols() {
            if grammar.is_terminal(sym) && self.reached[sym] {
                if !header {
                    self.put_line()?;
                    self.put_line()?;
                    self.put_char(COMMENT)?;
                    self.put_str(" terminals:  ")?;
                    self.cont_column = self.column + 1;
                    header = true;
                }
                self.space_or_break(sym, self.cont_column, COMMENT)?;
                self.put_symbol(sym)?;
            }
        }

        header = false;
        for sym in grammar.symbols() {
            if grammar.is_nonterminal(sym) && !self.reached[sym] {
                if !header {
                    self.put_line()?;
                    self.put_line()?;
                    self.put_char(COMMENT)?;
                    self.put_str(" unused productions")?;
                    header = true;
                }
                self.group(sym)?;
            }
        }

        header = false;
        for sym in grammar.symbols() {
            if grammar.is_terminal(sym) && !self.reached[sym] {
                if !header {
                    self.put_line()?;
                    self.put_line()?;
                    self.put_char(COMMENT)?;
                    self.put_str(" unused terminals: ")?;
                    self.cont_column = self.column + 1;
                    header = true;
                }
                self.space_or_break(sym, self.cont_column, COMMENT)?;
                self.put_symbol(sym)?;
            }
        }
        self.put_line()
    }

    /// Emits every group reachable from `sym`, depth first, each
    /// nonterminal on first visit.
    fn reachable(&mut self, sym: Symbol) -> io::Result<()> {
        let grammar = self.grammar;

        if grammar.is_nonterminal(sym) {
            self.group(sym)?;
        }
        self.reached.set(sym, true);

        let mut rule = grammar[sym].rules;
        while let Some(production) = rule {
            let mut elem = grammar[production].body;
            while let Some(element) = elem {
                let target = grammar[element].target;
                if !self.reached[target] {
                    self.reachable(target)?;
                }
                elem = grammar[element].next;
            }
            rule = grammar[production].next;
        }
        Ok(())
    }

    /// Emits all rules with `sym` on the left-hand side.
    fn group(&mut self, sym: Symbol) -> io::Result<()> {
        let grammar = self.grammar;

        self.put_line()?;
        self.put_symbol(sym)?;
        self.put_char(b' ')?;
        // remember the indents for further alternatives and continuations
        self.bar_column = self.column + 1;
        self.put_str(RULE_SEPARATOR)?;
        self.cont_column = self.column + 1;

        let mut rules = grammar.rules(sym);
        if let Some(first) = rules.next() {
            self.production(first)?;
        }
        for production in rules {
            self.put_line()?;
            self.spaces(self.bar_column)?;
            self.put_str("| ")?;
            self.production(production)?;
        }

        if grammar[sym].starter.is_some() {
            self.put_line()?;
            self.put_char(COMMENT)?;
            self.put_str(" start set:  ")?;
            self.cont_column = self.column + 1;
            for element in grammar.elements_from(grammar[sym].starter) {
                let target = grammar[element].target;
                self.space_or_break(target, self.cont_column, COMMENT)?;
                self.put_symbol(target)?;
            }
        }
        if grammar[sym].follows.is_some() {
            self.put_line()?;
            self.put_char(COMMENT)?;
            self.put_str(" follow set: ")?;
            self.cont_column = self.column + 1;
            for element in grammar.elements_from(grammar[sym].follows) {
                let target = grammar[element].target;
                self.space_or_break(target, self.cont_column, COMMENT)?;
                self.put_symbol(target)?;
            }
        }
        if grammar[sym].starter.is_some() || grammar[sym].follows.is_some() {
            // a blank line separates the sets from the next group
            self.put_line()?;
        }
        Ok(())
    }

    /// Emits the right-hand side of one production.
    fn production(&mut self, production: ProductionId) -> io::Result<()> {
        let grammar = self.grammar;
        for element in grammar.body(production) {
            let target = grammar[element].target;
            self.space_or_break(target, self.cont_column, b' ')?;
            self.put_symbol(target)?;
        }
        Ok(())
    }

    /// Puts out a single space, or, when `sym` would run past the margin,
    /// a line break indented to column `cont` and opened with `lead`.
    fn space_or_break(&mut self, sym: Symbol, cont: usize, lead: u8) -> io::Result<()> {
        let len = self.grammar.name_of(sym).len();
        if self.column + 1 + len > MARGIN {
            self.put_line()?;
            if cont > 1 {
                self.put_char(lead)?;
            }
            self.spaces(cont)?;
        } else {
            self.put_char(b' ')?;
        }
        Ok(())
    }

    fn put_symbol(&mut self, sym: Symbol) -> io::Result<()> {
        let name = self.grammar.name_of(sym);
        self.out.write_all(name)?;
        self.column += name.len();
        Ok(())
    }

    fn spaces(&mut self, until: usize) -> io::Result<()> {
        while self.column < until {
            self.put_char(b' ')?;
        }
        Ok(())
    }

    fn put_str(&mut self, s: &str) -> io::Result<()> {
        self.out.write_all(s.as_bytes())?;
        self.column += s.len();
        Ok(())
    }

    fn put_char(&mut self, ch: u8) -> io::Result<()> {
        self.out.write_all(&[ch])?;
        self.column += 1;
        Ok(())
    }

    fn put_line(&mut self) -> io::Result<()> {
        self.out.write_all(b"\n")?;
        self.column = 0;
        Ok(())
    }
}
