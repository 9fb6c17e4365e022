//! Structural comparison of production rules.

use crate::grammar::{Grammar, ProductionId};

impl Grammar {
    /// Compares two production bodies element by element. Because names are
    /// interned, comparing target handles is enough; two rules are the same
    /// iff they have the same length and identical targets throughout.
    pub fn same_rule(&self, p: ProductionId, q: ProductionId) -> bool {
        let mut pe = self[p].body;
        let mut qe = self[q].body;
        while let (Some(a), Some(b)) = (pe, qe) {
            if self[a].target != self[b].target {
                return false;
            }
            pe = self[a].next;
            qe = self[b].next;
        }
        pe.is_none() && qe.is_none()
    }
}
