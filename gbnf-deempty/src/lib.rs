//! Removal of the empty pseudo-symbol from a grammar. In this context,
//!
//! ```text
//! / <empty>
//! <a> ::= <b> <empty> <c>
//! <b> ::= <d> | <empty>
//! ```
//!
//! is rewritten as the equivalent
//!
//! ```text
//! <a> ::= <b> <c>
//!      |  <c>
//! <b> ::= <d>
//! ```
//!
//! The pass classifies every symbol and production as definitely empty,
//! possibly empty or non-empty, iterating to a fixed point, then rewrites
//! the rules from the markup: definitely-empty productions and elements are
//! dropped, and each possibly-empty element fans its production out into a
//! variant without it.

#![deny(unsafe_code)]

use log::debug;

use gbnf_grammar::{DiagnosticSink, ElementId, Grammar, ProductionId};
use gbnf_symbol::Symbol;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Emptiness {
    /// Known to be equivalent to the empty symbol.
    IsEmpty,
    /// May derive the empty string, marks optional syntactic elements.
    CanBeEmpty,
    /// Some part is known to produce something.
    NonEmpty,
}

use Emptiness::*;

/// Per-pass classification of symbols and productions.
///
/// Productions end up
/// - `IsEmpty` when every element's symbol is `IsEmpty`,
/// - `CanBeEmpty` when every element's symbol is `IsEmpty` or `CanBeEmpty`,
/// - `NonEmpty` when some element is known `NonEmpty`.
///
/// Nonterminals end up
/// - `IsEmpty` when all their rules are `IsEmpty`,
/// - `CanBeEmpty` when rules mix emptiness or any rule is `CanBeEmpty`,
/// - `NonEmpty` when all their rules are `NonEmpty`.
struct Marks {
    symbols: Vec<Emptiness>,
    productions: Vec<Emptiness>,
}

impl Marks {
    fn init(grammar: &Grammar, empty: Symbol) -> Self {
        let mut marks = Marks {
            symbols: vec![NonEmpty; grammar.num_syms()],
            productions: vec![IsEmpty; grammar.num_productions()],
        };
        for sym in grammar.symbols() {
            if grammar.is_nonterminal(sym) {
                // nonterminals and their rules are empty until proven not
                marks.symbols[sym.usize()] = IsEmpty;
            }
        }
        // the distinguished empty symbol is the exceptional terminal
        marks.symbols[empty.usize()] = IsEmpty;
        marks
    }

    fn symbol(&self, sym: Symbol) -> Emptiness {
        self.symbols[sym.usize()]
    }

    fn production(&self, production: ProductionId) -> Emptiness {
        self.productions[production.usize()]
    }

    fn set_production(&mut self, production: ProductionId, value: Emptiness) {
        let at = production.usize();
        if at >= self.productions.len() {
            self.productions.resize(at + 1, IsEmpty);
        }
        self.productions[at] = value;
    }

    /// Re-derives the classification of nonterminal `sym` from its rules.
    /// Returns whether anything changed.
    fn check_symbol(
        &mut self,
        grammar: &Grammar,
        sym: Symbol,
        diagnostics: &mut DiagnosticSink,
    ) -> bool {
        let mut change = false;
        let mut any_empty = false;
        let mut any_nonempty = false;
        let mut any_can_be = false;

        for production in grammar.rules(sym) {
            // classifications only ever escalate, so start from the current one
            let mut state = self.production(production);
            for element in grammar.body(production) {
                match self.symbol(grammar[element].target) {
                    // locked in as non-empty by any non-empty element
                    NonEmpty => state = NonEmpty,
                    CanBeEmpty => {
                        if state == IsEmpty {
                            state = CanBeEmpty;
                        }
                    }
                    IsEmpty => {}
                }
            }
            if self.production(production) != state {
                self.set_production(production, state);
                change = true;
            }
            match state {
                IsEmpty => any_empty = true,
                CanBeEmpty => any_can_be = true,
                NonEmpty => any_nonempty = true,
            }
        }

        let conclusion = if (any_empty && any_nonempty) || any_can_be {
            CanBeEmpty
        } else if any_empty {
            IsEmpty
        } else if any_nonempty {
            NonEmpty
        } else {
            // a nonterminal with no productions cannot happen
            diagnostics.emit("ASSERTION FAILURE IN CHECKEMPTY", None);
            return change;
        };
        if self.symbol(sym) != conclusion {
            self.symbols[sym.usize()] = conclusion;
            change = true;
        }
        change
    }
}

/// Eliminates references to the empty pseudo-symbol. Requires the empty
/// symbol to be declared; otherwise a diagnostic is emitted and the grammar
/// is left alone.
pub fn de_empty(grammar: &mut Grammar, diagnostics: &mut DiagnosticSink) {
    let Some(empty) = grammar.empty_symbol() else {
        diagnostics.emit("EMPTY SYMBOL MUST BE DEFINED", None);
        return;
    };

    let mut marks = Marks::init(grammar, empty);
    let symbols: Vec<Symbol> = grammar.symbols().collect();

    // keep trying until no change is made to the markup
    let mut passes = 0;
    loop {
        let mut change = false;
        for &sym in &symbols {
            if grammar.is_nonterminal(sym) {
                change |= marks.check_symbol(grammar, sym, diagnostics);
            }
        }
        passes += 1;
        if !change {
            break;
        }
    }
    debug!("emptiness markup settled after {} passes", passes);

    // use the markup to rewrite rules accounting for emptiness
    for &sym in &symbols {
        if grammar.is_nonterminal(sym) {
            clean_symbol(grammar, &mut marks, sym);
        }
    }

    // finally, deal with a possibly empty distinguished symbol
    if let Some(start) = grammar.start_symbol() {
        match marks.symbol(start) {
            IsEmpty => {
                // the language was just the empty string
                grammar.set_start_symbol(None);
                grammar.set_empty_symbol(None);
            }
            CanBeEmpty => {
                // we eliminated a bit too much, put one alternative back
                grammar.add_rule(start, &[empty]);
            }
            NonEmpty => grammar.set_empty_symbol(None),
        }
    }
}

/// Rewrites the rules of nonterminal `sym` from the markup.
fn clean_symbol(grammar: &mut Grammar, marks: &mut Marks, sym: Symbol) {
    if marks.symbol(sym) == IsEmpty {
        return;
    }

    let mut prev: Option<ProductionId> = None;
    let mut cursor = grammar[sym].rules;
    while let Some(production) = cursor {
        if marks.production(production) == IsEmpty {
            // unlink this production instead of moving on
            let next = grammar[production].next;
            match prev {
                None => grammar[sym].rules = next,
                Some(p) => grammar[p].next = next,
            }
            cursor = next;
        } else {
            let mut elem_prev: Option<ElementId> = None;
            let mut elem_cursor = grammar[production].body;
            while let Some(element) = elem_cursor {
                match marks.symbol(grammar[element].target) {
                    IsEmpty => {
                        // unlink the element, don't move on
                        let next = grammar[element].next;
                        match elem_prev {
                            None => grammar[production].body = next,
                            Some(e) => grammar[e].next = next,
                        }
                        elem_cursor = next;
                    }
                    CanBeEmpty => {
                        dup_minus(grammar, marks, sym, production, element);
                        elem_prev = Some(element);
                        elem_cursor = grammar[element].next;
                    }
                    NonEmpty => {
                        elem_prev = Some(element);
                        elem_cursor = grammar[element].next;
                    }
                }
            }
            prev = Some(production);
            cursor = grammar[production].next;
        }
    }
}

/// Duplicates production `p` minus element `skip` under `sym`. The copy is
/// discarded when it comes out empty or duplicates an existing alternative;
/// otherwise it becomes `p`'s immediate successor, with `p`'s
/// classification, so the enclosing walk encounters it next.
fn dup_minus(
    grammar: &mut Grammar,
    marks: &mut Marks,
    sym: Symbol,
    p: ProductionId,
    skip: ElementId,
) {
    let copy = grammar.new_production(None);
    let mut tail: Option<ElementId> = None;
    let mut cursor = grammar[p].body;
    while let Some(element) = cursor {
        if element != skip {
            let new_element = grammar.new_element(grammar[element].target, None);
            match tail {
                None => grammar[copy].body = Some(new_element),
                Some(prev) => grammar[prev].next = Some(new_element),
            }
            tail = Some(new_element);
        }
        cursor = grammar[element].next;
    }

    // avoid inserting duplicates of existing rules
    let duplicate = {
        let g: &Grammar = grammar;
        g.rules(sym).any(|existing| g.same_rule(copy, existing))
    };
    if duplicate {
        grammar[copy].body = None;
    }

    if grammar[copy].body.is_some() {
        grammar[copy].next = grammar[p].next;
        marks.set_production(copy, marks.production(p));
        grammar[p].next = Some(copy);
    }
}
