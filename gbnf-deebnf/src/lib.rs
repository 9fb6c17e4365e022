//! Conversion of Wirth-style EBNF to pure BNF.
//!
//! ```text
//! <a> ::= <b> [ <c> ] <d> { <e> } <f>
//! ```
//!
//! is replaced with
//!
//! ```text
//! <a> ::= <b> <a-a> <d> <a-b> <f>
//! <a-a> ::= <c> | <empty>
//! <a-b> ::= <e> <a-b> | <empty>
//! ```
//!
//! The reader parses the metasymbols `( ) [ ] { }` as ordinary terminals;
//! this pass hides them from the symbol list, then walks every rule looking
//! for opening brackets, extracting each bracketed body under a freshly
//! invented nonterminal with the rule set the bracket shape calls for.

#![deny(unsafe_code)]

use log::debug;

use gbnf_grammar::{DiagnosticSink, ElementId, Grammar, ProductionId, SymbolBitSet};
use gbnf_symbol::Symbol;

/// The six metacharacter handles, when the input mentioned them at all.
struct Metachars {
    lparen: Option<Symbol>,
    rparen: Option<Symbol>,
    lsquare: Option<Symbol>,
    rsquare: Option<Symbol>,
    lcurly: Option<Symbol>,
    rcurly: Option<Symbol>,
}

impl Metachars {
    /// Pulls the bracket symbols out of the symbol list so no later pass
    /// mistakes them for ordinary terminals.
    fn strip(grammar: &mut Grammar, diagnostics: &mut DiagnosticSink) -> Self {
        Metachars {
            lparen: take_metachar(grammar, b"(", diagnostics),
            rparen: take_metachar(grammar, b")", diagnostics),
            lsquare: take_metachar(grammar, b"[", diagnostics),
            rsquare: take_metachar(grammar, b"]", diagnostics),
            lcurly: take_metachar(grammar, b"{", diagnostics),
            rcurly: take_metachar(grammar, b"}", diagnostics),
        }
    }
}

fn take_metachar(
    grammar: &mut Grammar,
    name: &[u8],
    diagnostics: &mut DiagnosticSink,
) -> Option<Symbol> {
    let sym = grammar.remove_from_order(name)?;
    if let Some(rule) = grammar[sym].rules {
        let line = grammar[rule].line;
        diagnostics.emit("BRACE SHOULD BE NONTERMINAL", line);
    }
    Some(sym)
}

/// Either end of a link slot holding an `Option<ElementId>`: a production's
/// body head, or some element's `next`. Stands in for the pointer-to-pointer
/// editing the rewrite needs.
#[derive(Clone, Copy)]
enum Slot {
    Body(ProductionId),
    After(ElementId),
}

impl Slot {
    fn set(self, grammar: &mut Grammar, value: Option<ElementId>) {
        match self {
            Slot::Body(production) => grammar[production].body = value,
            Slot::After(element) => grammar[element].next = value,
        }
    }
}

/// Removes Wirth-style EBNF features from the grammar.
pub fn de_ebnf(grammar: &mut Grammar, diagnostics: &mut DiagnosticSink) {
    let metachars = Metachars::strip(grammar, diagnostics);

    // prevent duplicate processing; invented symbols join the tail of the
    // symbol list and are reached by this same walk after their inventor
    let mut touched = SymbolBitSet::with_len(grammar.num_syms());
    let mut at = 0;
    while at < grammar.order_len() {
        let sym = grammar.order_at(at);
        if !touched[sym] {
            process(grammar, &metachars, &mut touched, sym, diagnostics);
        }
        at += 1;
    }
}

/// Rewrites every bracketed group in the rules of `sym`.
fn process(
    grammar: &mut Grammar,
    metachars: &Metachars,
    touched: &mut SymbolBitSet,
    sym: Symbol,
    diagnostics: &mut DiagnosticSink,
) {
    // added symbols start with the -a suffix if possible
    let mut counter = 0u32;

    let mut cursor = grammar[sym].rules;
    while let Some(production) = cursor {
        let mut prev: Option<ElementId> = None;
        let mut elem = grammar[production].body;
        while let Some(element) = elem {
            let target = Some(grammar[element].target);
            if target == metachars.rparen || target == metachars.rsquare
                || target == metachars.rcurly
            {
                let close = if target == metachars.rparen {
                    ')'
                } else if target == metachars.rsquare {
                    ']'
                } else {
                    '}'
                };
                diagnostics.emit(format!("UNEXPECTED {}", close), grammar[element].line);
                // clip it from the rule
                let next = grammar[element].next;
                match prev {
                    None => grammar[production].body = next,
                    Some(p) => grammar[p].next = next,
                }
                elem = next;
            } else if target == metachars.lparen {
                let group = extract_until(
                    grammar,
                    sym,
                    production,
                    element,
                    metachars.rparen,
                    ')',
                    &mut counter,
                    diagnostics,
                );
                process(grammar, metachars, touched, group, diagnostics);
                prev = Some(element);
                elem = grammar[element].next;
            } else if target == metachars.lsquare {
                let group = extract_until(
                    grammar,
                    sym,
                    production,
                    element,
                    metachars.rsquare,
                    ']',
                    &mut counter,
                    diagnostics,
                );
                process(grammar, metachars, touched, group, diagnostics);
                // an optional group may derive nothing
                add_empty_rule(grammar, group, diagnostics);
                prev = Some(element);
                elem = grammar[element].next;
            } else if target == metachars.lcurly {
                let group = extract_until(
                    grammar,
                    sym,
                    production,
                    element,
                    metachars.rcurly,
                    '}',
                    &mut counter,
                    diagnostics,
                );
                process(grammar, metachars, touched, group, diagnostics);
                make_iterative(grammar, group, diagnostics);
                prev = Some(element);
                elem = grammar[element].next;
            } else {
                prev = Some(element);
                elem = grammar[element].next;
            }
        }
        cursor = grammar[production].next;
    }
    touched.set(sym, true);
}

/// Extracts the bracketed body following `element` into a fresh nonterminal.
///
/// The fresh symbol takes over from `element.next` up to the balancing close
/// bracket; `element` is retargeted at it and the rest of the enclosing body
/// re-attached behind. Alternative separators inside the brackets are
/// honored by pulling the enclosing production's successors into the fresh
/// symbol's rule list, since `( A | B )` spans alternative boundaries of the
/// production it sits in. Returns the fresh symbol, never `None`.
fn extract_until(
    grammar: &mut Grammar,
    sym: Symbol,
    p: ProductionId,
    element: ElementId,
    close: Option<Symbol>,
    close_char: char,
    counter: &mut u32,
    diagnostics: &mut DiagnosticSink,
) -> Symbol {
    // we were called with the open bracket as the current element
    let open = grammar[element].target;
    let line = grammar[element].line;

    let fresh = invent_symbol(grammar, sym, counter, diagnostics);
    grammar[fresh].line = line;

    // the first new rule begins after the opening bracket
    let mut rule = grammar.new_production(line);
    grammar[rule].body = grammar[element].next;
    grammar[fresh].rules = Some(rule);
    // replace the open bracket with the fresh symbol
    grammar[element].target = fresh;

    // look for the balancing close bracket, accounting for nesting
    let mut nest = 0u32;
    let mut slot = Slot::Body(rule);
    let mut walker = grammar[rule].body;
    let close_elem = loop {
        match walker {
            None => {
                // end of a rule: a missing close bracket, or bracketed
                // alternatives spilling into the next production
                if grammar[rule].body.is_none() {
                    let line = grammar[rule].line;
                    diagnostics.emit("EMPTY BRACKETED RULE", line);
                    if let Some(empty) = grammar.empty_symbol() {
                        let repair = grammar.new_element(empty, line);
                        grammar[rule].body = Some(repair);
                    }
                }
                match grammar[p].next {
                    None => break None,
                    Some(stolen) => {
                        // swipe a rule from p's list and hang it under the
                        // fresh symbol, continuing the scan inside it
                        grammar[rule].next = Some(stolen);
                        grammar[p].next = grammar[stolen].next;
                        grammar[stolen].next = None;
                        rule = stolen;
                        slot = Slot::Body(rule);
                        walker = grammar[rule].body;
                    }
                }
            }
            Some(at) => {
                let target = grammar[at].target;
                if Some(target) == close {
                    if nest == 0 {
                        break Some(at);
                    }
                    nest -= 1;
                } else if target == open {
                    nest += 1;
                }
                slot = Slot::After(at);
                walker = grammar[at].next;
            }
        }
    };

    match close_elem {
        Some(closer) => {
            // the body ends before the close bracket; the enclosing rule
            // resumes after it
            slot.set(grammar, None);
            grammar[element].next = grammar[closer].next;
            if grammar[rule].body.is_none() {
                // final rule of the set was empty
                diagnostics.emit("EMPTY BRACKETED RULE", grammar[closer].line);
                if let Some(empty) = grammar.empty_symbol() {
                    let line = grammar[rule].line;
                    let repair = grammar.new_element(empty, line);
                    grammar[rule].body = Some(repair);
                }
            }
        }
        None => {
            // unbalanced input: treat end of rule as the close bracket
            grammar[element].next = None;
            let line = grammar[rule].line;
            diagnostics.emit(format!("MISSING {}", close_char), line);
        }
    }
    fresh
}

/// Invents a new symbol with a unique name derived from `sym`'s name.
/// As initialized it is a terminal; hang rules from it and it becomes
/// nonterminal.
fn invent_symbol(
    grammar: &mut Grammar,
    sym: Symbol,
    counter: &mut u32,
    diagnostics: &mut DiagnosticSink,
) -> Symbol {
    let base = grammar.name_of(sym).to_vec();
    let len = base.len();
    // a suffix goes before the closing delimiter of a quoted name, so that
    // <x> becomes <x-a> and 'x' becomes 'x-a'
    let (quote, stem) = if len >= 2
        && ((base[0] == b'<' && base[len - 1] == b'>')
            || (base[0] == b'"' && base[len - 1] == b'"')
            || (base[0] == b'\'' && base[len - 1] == b'\''))
    {
        (Some(base[len - 1]), &base[..len - 1])
    } else {
        (None, &base[..])
    };

    // try name extensions until one is genuinely new
    let name = loop {
        let mut ext = *counter;
        *counter += 1;

        let mut candidate = stem.to_vec();
        candidate.push(b'-');
        let at = candidate.len();
        loop {
            candidate.insert(at, b'a' + (ext % 26) as u8);
            ext /= 26;
            if ext == 0 {
                break;
            }
        }
        if let Some(quote) = quote {
            candidate.push(quote);
        }
        if grammar.lookup(&candidate).is_none() {
            break candidate;
        }
    };
    debug!("invented symbol {}", String::from_utf8_lossy(&name));
    grammar.define(&name, None, diagnostics)
}

/// Adds the alternative `| <empty>` at the tail of `sym`'s rule list.
fn add_empty_rule(grammar: &mut Grammar, sym: Symbol, diagnostics: &mut DiagnosticSink) {
    let line = grammar[sym].rules.and_then(|rule| grammar[rule].line);
    let Some(empty) = grammar.empty_symbol() else {
        diagnostics.emit("EMPTY SYMBOL MUST BE DEFINED", line);
        return;
    };
    let element = grammar.new_element(empty, line);
    let production = grammar.new_production(line);
    grammar[production].body = Some(element);
    grammar.append_rules(sym, Some(production));
}

/// Makes nonterminal `sym` iterate: each of its rules gets a self-reference
/// appended, and a final `| <empty>` alternative terminates the iteration.
fn make_iterative(grammar: &mut Grammar, sym: Symbol, diagnostics: &mut DiagnosticSink) {
    let mut cursor = grammar[sym].rules;
    while let Some(production) = cursor {
        // best guess at a source line for the appended element
        let mut line = grammar[production].line;
        let mut tail: Option<ElementId> = None;
        let mut elem = grammar[production].body;
        while let Some(element) = elem {
            line = grammar[element].line;
            tail = Some(element);
            elem = grammar[element].next;
        }
        let self_ref = grammar.new_element(sym, line);
        match tail {
            None => grammar[production].body = Some(self_ref),
            Some(last) => grammar[last].next = Some(self_ref),
        }
        cursor = grammar[production].next;
    }
    add_empty_rule(grammar, sym, diagnostics);
}
