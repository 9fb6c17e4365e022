//! The string pool. Symbol names live here as length-prefixed byte runs:
//! one byte holding the name length, then the raw name bytes.
//!
//! The pool has a hard capacity. Bytes that do not fit are dropped, never
//! stored elsewhere; the caller is expected to report the overflow and
//! carry on with the truncated name.

/// Limit on the total number of name bytes held by one pool.
pub const POOL_CAPACITY: usize = 10_000;

/// Limit on the number of bytes in any one symbol name.
pub const NAME_LIMIT: usize = 50;

/// Handle on one stored name.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct StringId {
    offset: u32,
}

/// A bounded arena of length-prefixed symbol names.
#[derive(Clone, Debug, Default)]
pub struct StringPool {
    bytes: Vec<u8>,
}

impl StringPool {
    /// Creates an empty pool.
    pub fn new() -> Self {
        StringPool { bytes: Vec::new() }
    }

    /// Copies `name` into the pool at the high-water mark and returns its
    /// handle. The second value reports whether any byte was dropped
    /// because the pool was full; the handle stays valid either way and
    /// resolves to whatever prefix actually fit.
    pub fn store(&mut self, name: &[u8]) -> (StringId, bool) {
        let id = StringId {
            offset: self.bytes.len() as u32,
        };
        let len = name.len().min(u8::MAX as usize);
        let mut truncated = len < name.len();
        if self.bytes.len() < POOL_CAPACITY {
            self.bytes.push(len as u8);
        } else {
            return (id, true);
        }
        for &byte in &name[..len] {
            if self.bytes.len() >= POOL_CAPACITY {
                truncated = true;
                break;
            }
            self.bytes.push(byte);
        }
        (id, truncated)
    }

    /// Resolves a handle to the stored name, without its length prefix.
    /// A name cut short by pool overflow resolves to the bytes that fit.
    pub fn get(&self, id: StringId) -> &[u8] {
        let at = id.offset as usize;
        match self.bytes.get(at) {
            None => &[],
            Some(&len) => {
                let start = at + 1;
                let end = (start + len as usize).min(self.bytes.len());
                &self.bytes[start..end]
            }
        }
    }

    /// Compares a stored name against `name`. The length prefix gives a
    /// fast mismatch on names of different lengths.
    pub fn matches(&self, id: StringId, name: &[u8]) -> bool {
        let at = id.offset as usize;
        match self.bytes.get(at) {
            None => false,
            Some(&len) if len as usize != name.len() => false,
            Some(_) => self.get(id) == name,
        }
    }

    /// Returns the number of pool bytes in use.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Checks whether the pool holds no names.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
