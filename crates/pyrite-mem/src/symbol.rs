//! Symbol type for interned strings.
//!
//! # Examples
//!
//! ```
//! use pyrite_mem::Symbol;
//!
//! let a = Symbol::new(7);
//! let b = Symbol::new(7);
//! assert_eq!(a, b);
//! assert_eq!(a.as_u32(), 7);
//! ```

use std::fmt;

/// A 32-bit handle to a string owned by a [`StringInterner`](crate::StringInterner).
///
/// Symbols are only meaningful together with the interner that produced
/// them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(u32);

impl Symbol {
    /// Creates a symbol from a raw id.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw id.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Returns the raw id as an index.
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.0)
    }
}

impl From<u32> for Symbol {
    fn from(id: u32) -> Self {
        Self(id)
    }
}
