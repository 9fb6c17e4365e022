//! Redundancy removal.
//!
//! Two simplifications run alternately until neither finds work:
//! duplicate alternatives of one symbol are unlinked, and references to
//! nonterminals with exactly one rule are replaced by that rule's body.
//! Each can expose fresh work for the other, hence the outer fixed point.
//!
//! Inlining skips a singleton whose rule mentions its own head: splicing
//! such a rule re-introduces the reference it expands, so it could recur
//! without ever converging, and eliminating the reference is impossible
//! anyway.
//!
//! Symbols left unreferenced keep their rules; the writer lists them under
//! its unused sections.

#![deny(unsafe_code)]

use log::debug;

use gbnf_grammar::{ElementId, Grammar, ProductionId};
use gbnf_symbol::Symbol;

/// Squeezes out redundant rules and symbols.
pub fn squeeze(grammar: &mut Grammar) {
    let mut passes = 0;
    loop {
        let mut change = false;
        squeeze_rules(grammar, &mut change);
        squeeze_symbols(grammar, &mut change);
        passes += 1;
        if !change {
            break;
        }
    }
    debug!("squeeze settled after {} passes", passes);
}

/// Unlinks every alternative that repeats an earlier one of the same symbol.
fn squeeze_rules(grammar: &mut Grammar, change: &mut bool) {
    let symbols: Vec<Symbol> = grammar.symbols().collect();
    for sym in symbols {
        let mut cursor = grammar[sym].rules;
        while let Some(production) = cursor {
            // scan the remainder of the list for duplicates of this rule
            let mut prev = production;
            let mut rest = grammar[production].next;
            while let Some(candidate) = rest {
                if grammar.same_rule(production, candidate) {
                    grammar[prev].next = grammar[candidate].next;
                    *change = true;
                } else {
                    prev = candidate;
                }
                rest = grammar[prev].next;
            }
            cursor = grammar[production].next;
        }
    }
}

/// Replaces references to single-rule nonterminals by the rule's body.
fn squeeze_symbols(grammar: &mut Grammar, change: &mut bool) {
    let symbols: Vec<Symbol> = grammar.symbols().collect();
    for sym in symbols {
        let mut cursor = grammar[sym].rules;
        while let Some(production) = cursor {
            let mut elem = grammar[production].body;
            while let Some(element) = elem {
                elem = match try_splice(grammar, element, change) {
                    // resume past the spliced region
                    Some(last) => grammar[last].next,
                    None => grammar[element].next,
                };
            }
            cursor = grammar[production].next;
        }
    }
}

/// Splices the body of `element`'s target in place of `element`, when the
/// target has exactly one well-formed rule that does not mention the target
/// itself. Returns the last element of the spliced region.
fn try_splice(grammar: &mut Grammar, element: ElementId, change: &mut bool) -> Option<ElementId> {
    let target = grammar[element].target;
    let rule = grammar.single_rule(target)?;
    let first = grammar[rule].body?;
    if mentions(grammar, rule, target) {
        return None;
    }

    // the rule's first element overwrites this one
    grammar[element].target = grammar[first].target;
    *change = true;

    // now copy the rest of the rule
    let mut source = grammar[first].next;
    let mut at = element;
    while let Some(from) = source {
        let copy = grammar.new_element(grammar[from].target, None);
        grammar[copy].next = grammar[at].next;
        grammar[at].next = Some(copy);
        at = copy;
        source = grammar[from].next;
    }
    Some(at)
}

/// Checks whether a rule's body references `sym`.
fn mentions(grammar: &Grammar, rule: ProductionId, sym: Symbol) -> bool {
    grammar
        .body(rule)
        .any(|element| grammar[element].target == sym)
}
