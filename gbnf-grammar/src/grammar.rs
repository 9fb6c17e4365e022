//! Definitions of the grammar type and its records.

use std::num::NonZeroU32;
use std::ops;

use gbnf_symbol::{StringId, StringPool, Symbol};

use crate::diagnostic::DiagnosticSink;

/// Handle on one production record.
#[derive(Clone, Copy, Debug, Hash, Eq, Ord, PartialEq, PartialOrd)]
pub struct ProductionId {
    n: NonZeroU32,
}

impl ProductionId {
    fn from_raw(n: u32) -> Self {
        ProductionId {
            n: NonZeroU32::new(n + 1).expect("production arena index overflow"),
        }
    }

    /// Returns the handle's numeric value, usable as a map key.
    pub fn usize(self) -> usize {
        self.n.get() as usize - 1
    }
}

/// Handle on one element record.
#[derive(Clone, Copy, Debug, Hash, Eq, Ord, PartialEq, PartialOrd)]
pub struct ElementId {
    n: NonZeroU32,
}

impl ElementId {
    fn from_raw(n: u32) -> Self {
        ElementId {
            n: NonZeroU32::new(n + 1).expect("element arena index overflow"),
        }
    }

    /// Returns the handle's numeric value, usable as a map key.
    pub fn usize(self) -> usize {
        self.n.get() as usize - 1
    }
}

/// A named grammar symbol. Terminal iff `rules` is `None`.
#[derive(Clone, Debug)]
pub struct SymbolData {
    /// The symbol's name in the string pool.
    pub name: StringId,
    /// Head of the linked list of productions.
    pub rules: Option<ProductionId>,
    /// Head of the start-set element list, if one was attached.
    /// Opaque to the transformations; only preserved and rendered.
    pub starter: Option<ElementId>,
    /// Head of the follow-set element list, if one was attached.
    pub follows: Option<ElementId>,
    /// Source line where the symbol was first seen; `None` if synthetic.
    pub line: Option<u32>,
}

/// One alternative of one nonterminal.
#[derive(Clone, Debug)]
pub struct ProductionData {
    /// The next alternative of the same symbol.
    pub next: Option<ProductionId>,
    /// Head of the linked element list forming the body.
    pub body: Option<ElementId>,
    /// Head of the start-set element list, if one was attached.
    pub starter: Option<ElementId>,
    /// Head of the follow-set element list, if one was attached.
    pub ender: Option<ElementId>,
    /// Source line where the production starts; `None` if synthetic.
    pub line: Option<u32>,
}

/// One occurrence of a symbol inside a production body.
#[derive(Clone, Debug)]
pub struct ElementData {
    /// The next element of the body.
    pub next: Option<ElementId>,
    /// The referenced symbol.
    pub target: Symbol,
    /// Source line of the occurrence; `None` if synthetic.
    pub line: Option<u32>,
}

/// The grammar: record arenas, the insertion-ordered symbol list, and the
/// two distinguished symbols.
#[derive(Clone, Debug, Default)]
pub struct Grammar {
    pool: StringPool,
    symbols: Vec<SymbolData>,
    productions: Vec<ProductionData>,
    elements: Vec<ElementData>,
    order: Vec<Symbol>,
    start: Option<Symbol>,
    empty: Option<Symbol>,
}

impl Grammar {
    /// Creates an empty grammar.
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks `name` up in the symbol list.
    pub fn lookup(&self, name: &[u8]) -> Option<Symbol> {
        self.order
            .iter()
            .copied()
            .find(|&sym| self.pool.matches(self.symbols[sym.usize()].name, name))
    }

    /// Defines a new symbol named `name` at the tail of the symbol list.
    /// The caller must have checked that the name is not already present.
    /// Pool overflow is reported through `diagnostics` and leaves the
    /// symbol with a truncated name.
    pub fn define(
        &mut self,
        name: &[u8],
        line: Option<u32>,
        diagnostics: &mut DiagnosticSink,
    ) -> Symbol {
        let (name, truncated) = self.pool.store(name);
        if truncated {
            diagnostics.emit("STRING POOL OVERFLOW", line);
        }
        let sym = Symbol::from_raw(self.symbols.len() as u32);
        self.symbols.push(SymbolData {
            name,
            rules: None,
            starter: None,
            follows: None,
            line,
        });
        self.order.push(sym);
        sym
    }

    /// Looks `name` up and defines it if required.
    pub fn lookup_or_define(
        &mut self,
        name: &[u8],
        line: Option<u32>,
        diagnostics: &mut DiagnosticSink,
    ) -> Symbol {
        match self.lookup(name) {
            Some(sym) => sym,
            None => self.define(name, line, diagnostics),
        }
    }

    /// Unlinks the symbol named `name` from the symbol list, hiding it from
    /// lookup and from every list walk. The record itself stays alive, so
    /// existing elements may keep referencing it.
    pub fn remove_from_order(&mut self, name: &[u8]) -> Option<Symbol> {
        let at = self
            .order
            .iter()
            .position(|&sym| self.pool.matches(self.symbols[sym.usize()].name, name))?;
        Some(self.order.remove(at))
    }

    /// Resolves a symbol's name.
    pub fn name_of(&self, sym: Symbol) -> &[u8] {
        self.pool.get(self.symbols[sym.usize()].name)
    }

    /// Returns the number of symbol records, including any hidden from the
    /// symbol list. Suitable for sizing per-symbol maps.
    pub fn num_syms(&self) -> usize {
        self.symbols.len()
    }

    /// Returns the number of production records, linked or not.
    pub fn num_productions(&self) -> usize {
        self.productions.len()
    }

    /// Iterates over the symbol list in insertion order.
    pub fn symbols(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.order.iter().copied()
    }

    /// Returns the length of the symbol list.
    pub fn order_len(&self) -> usize {
        self.order.len()
    }

    /// Returns the symbol at the given position of the symbol list.
    pub fn order_at(&self, at: usize) -> Symbol {
        self.order[at]
    }

    /// The distinguished symbol derivations begin from, if declared.
    pub fn start_symbol(&self) -> Option<Symbol> {
        self.start
    }

    /// Declares or clears the distinguished symbol.
    pub fn set_start_symbol(&mut self, start: Option<Symbol>) {
        self.start = start;
    }

    /// The empty pseudo-symbol, if declared.
    pub fn empty_symbol(&self) -> Option<Symbol> {
        self.empty
    }

    /// Declares or clears the empty pseudo-symbol.
    pub fn set_empty_symbol(&mut self, empty: Option<Symbol>) {
        self.empty = empty;
    }

    /// Checks whether a symbol is terminal (has no rules).
    pub fn is_terminal(&self, sym: Symbol) -> bool {
        self.symbols[sym.usize()].rules.is_none()
    }

    /// Checks whether a symbol is nonterminal (has rules).
    pub fn is_nonterminal(&self, sym: Symbol) -> bool {
        self.symbols[sym.usize()].rules.is_some()
    }

    /// Allocates a fresh, unlinked production record.
    pub fn new_production(&mut self, line: Option<u32>) -> ProductionId {
        let id = ProductionId::from_raw(self.productions.len() as u32);
        self.productions.push(ProductionData {
            next: None,
            body: None,
            starter: None,
            ender: None,
            line,
        });
        id
    }

    /// Allocates a fresh, unlinked element record referencing `target`.
    pub fn new_element(&mut self, target: Symbol, line: Option<u32>) -> ElementId {
        let id = ElementId::from_raw(self.elements.len() as u32);
        self.elements.push(ElementData {
            next: None,
            target,
            line,
        });
        id
    }

    /// Appends a production list at the tail of a symbol's rule list.
    pub fn append_rules(&mut self, sym: Symbol, head: Option<ProductionId>) {
        let Some(head) = head else { return };
        match self[sym].rules {
            None => self[sym].rules = Some(head),
            Some(first) => {
                let mut tail = first;
                while let Some(next) = self[tail].next {
                    tail = next;
                }
                self[tail].next = Some(head);
            }
        }
    }

    /// Builds a production with the given body symbols and appends it to
    /// `lhs`'s rule list. Records are marked synthetic (no source line).
    pub fn add_rule(&mut self, lhs: Symbol, rhs: &[Symbol]) -> ProductionId {
        let production = self.new_production(None);
        let mut tail: Option<ElementId> = None;
        for &target in rhs {
            let element = self.new_element(target, None);
            match tail {
                None => self[production].body = Some(element),
                Some(prev) => self[prev].next = Some(element),
            }
            tail = Some(element);
        }
        self.append_rules(lhs, Some(production));
        production
    }

    /// Starts building rules for `lhs`.
    pub fn rule(&mut self, lhs: Symbol) -> RuleBuilder<'_> {
        RuleBuilder { grammar: self, lhs }
    }

    /// Iterates over a symbol's alternatives.
    pub fn rules(&self, sym: Symbol) -> Productions<'_> {
        Productions {
            grammar: self,
            cursor: self[sym].rules,
        }
    }

    /// Returns the symbol's rule when it has exactly one.
    pub fn single_rule(&self, sym: Symbol) -> Option<ProductionId> {
        match self[sym].rules {
            Some(rule) if self[rule].next.is_none() => Some(rule),
            _ => None,
        }
    }

    /// Iterates over the elements of a production body.
    pub fn body(&self, production: ProductionId) -> Elements<'_> {
        Elements {
            grammar: self,
            cursor: self[production].body,
        }
    }

    /// Iterates over an element list given its head, for walking the
    /// start/follow set lists hanging off symbols and productions.
    pub fn elements_from(&self, head: Option<ElementId>) -> Elements<'_> {
        Elements {
            grammar: self,
            cursor: head,
        }
    }
}

impl ops::Index<Symbol> for Grammar {
    type Output = SymbolData;

    fn index(&self, sym: Symbol) -> &SymbolData {
        &self.symbols[sym.usize()]
    }
}

impl ops::IndexMut<Symbol> for Grammar {
    fn index_mut(&mut self, sym: Symbol) -> &mut SymbolData {
        &mut self.symbols[sym.usize()]
    }
}

impl ops::Index<ProductionId> for Grammar {
    type Output = ProductionData;

    fn index(&self, production: ProductionId) -> &ProductionData {
        &self.productions[production.usize()]
    }
}

impl ops::IndexMut<ProductionId> for Grammar {
    fn index_mut(&mut self, production: ProductionId) -> &mut ProductionData {
        &mut self.productions[production.usize()]
    }
}

impl ops::Index<ElementId> for Grammar {
    type Output = ElementData;

    fn index(&self, element: ElementId) -> &ElementData {
        &self.elements[element.usize()]
    }
}

impl ops::IndexMut<ElementId> for Grammar {
    fn index_mut(&mut self, element: ElementId) -> &mut ElementData {
        &mut self.elements[element.usize()]
    }
}

/// Grammar rules can be built with the builder pattern.
pub struct RuleBuilder<'a> {
    grammar: &'a mut Grammar,
    lhs: Symbol,
}

impl<'a> RuleBuilder<'a> {
    /// Switches to building rules for another LHS.
    pub fn rule(self, lhs: Symbol) -> RuleBuilder<'a> {
        RuleBuilder {
            grammar: self.grammar,
            lhs,
        }
    }

    /// Appends one alternative with the given body.
    pub fn rhs(self, syms: impl AsRef<[Symbol]>) -> Self {
        self.grammar.add_rule(self.lhs, syms.as_ref());
        self
    }
}

/// An iterator over a symbol's alternatives.
pub struct Productions<'a> {
    grammar: &'a Grammar,
    cursor: Option<ProductionId>,
}

impl<'a> Iterator for Productions<'a> {
    type Item = ProductionId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.cursor?;
        self.cursor = self.grammar[current].next;
        Some(current)
    }
}

/// An iterator over the elements of a production body.
pub struct Elements<'a> {
    grammar: &'a Grammar,
    cursor: Option<ElementId>,
}

impl<'a> Iterator for Elements<'a> {
    type Item = ElementId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.cursor?;
        self.cursor = self.grammar[current].next;
        Some(current)
    }
}
