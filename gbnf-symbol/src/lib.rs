//! Symbol handles for grammar records, together with the bounded string pool
//! that holds their names. Symbols are distinguished by their IDs; names are
//! interned, so the same byte sequence always maps back to one handle.

pub mod pool;
mod repr;

pub use self::pool::{StringId, StringPool, NAME_LIMIT, POOL_CAPACITY};
pub use self::repr::Symbol;
