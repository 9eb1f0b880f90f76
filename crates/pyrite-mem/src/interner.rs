//! String interning with id-based references.
//!
//! The interner keeps a bidirectional mapping:
//! - `strings`: symbol id → shared string
//! - `symbols`: string → symbol id
//!
//! Reserved words can be pre-interned so that they always receive the ids
//! `0..n` in the order given, which lets the parser recognise keywords by
//! comparing symbols against constants.
//!
//! # Examples
//!
//! ```
//! use pyrite_mem::StringInterner;
//!
//! let mut interner = StringInterner::with_pre_interned(&["def", "if"]);
//! assert_eq!(interner.intern("if").as_u32(), 1);
//!
//! let x = interner.intern("x");
//! assert_eq!(interner.resolve(x), Some("x"));
//! assert!(!interner.is_reserved(x));
//! ```

use crate::symbol::Symbol;
use hashbrown::HashMap;
use std::rc::Rc;

/// Deduplicating string store handing out [`Symbol`]s.
#[derive(Debug, Clone, Default)]
pub struct StringInterner {
    /// Symbol id → string
    strings: Vec<Rc<str>>,

    /// String → symbol
    symbols: HashMap<Rc<str>, Symbol>,

    /// Number of leading ids reserved by `with_pre_interned`
    reserved: u32,
}

impl StringInterner {
    /// Creates an empty interner.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an interner whose first ids are the given words, in order.
    #[must_use]
    pub fn with_pre_interned(words: &[&str]) -> Self {
        let mut interner = Self::new();
        for word in words {
            interner.intern(word);
        }
        interner.reserved = interner.strings.len() as u32;
        interner
    }

    /// Interns `s`, returning the existing symbol when already present.
    pub fn intern(&mut self, s: &str) -> Symbol {
        if let Some(&sym) = self.symbols.get(s) {
            return sym;
        }

        let sym = Symbol::new(self.strings.len() as u32);
        let shared: Rc<str> = Rc::from(s);
        self.strings.push(Rc::clone(&shared));
        self.symbols.insert(shared, sym);
        sym
    }

    /// Looks up `s` without interning it.
    #[must_use]
    pub fn get(&self, s: &str) -> Option<Symbol> {
        self.symbols.get(s).copied()
    }

    /// Resolves a symbol to its string.
    #[must_use]
    pub fn resolve(&self, sym: Symbol) -> Option<&str> {
        self.strings.get(sym.as_usize()).map(|s| &**s)
    }

    /// Resolves a symbol to a shared handle on its string.
    ///
    /// Runtime string values are built from this so that a literal evaluated
    /// in a loop never copies its contents.
    #[must_use]
    pub fn resolve_shared(&self, sym: Symbol) -> Option<Rc<str>> {
        self.strings.get(sym.as_usize()).cloned()
    }

    /// Returns true if `sym` is one of the pre-interned words.
    #[must_use]
    pub const fn is_reserved(&self, sym: Symbol) -> bool {
        sym.as_u32() < self.reserved
    }

    /// Returns the number of interned strings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Returns true if nothing is interned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORDS: &[&str] = &["def", "if", "elif", "else", "while", "return"];

    #[test]
    fn test_interner_creation() {
        let interner = StringInterner::new();
        assert!(interner.is_empty());

        let interner = StringInterner::with_pre_interned(WORDS);
        assert_eq!(interner.len(), WORDS.len());
    }

    #[test]
    fn test_reserved_ids() {
        let mut interner = StringInterner::with_pre_interned(WORDS);

        for (i, word) in WORDS.iter().enumerate() {
            let sym = interner.intern(word);
            assert_eq!(sym.as_usize(), i);
            assert!(interner.is_reserved(sym));
        }

        let ident = interner.intern("counter");
        assert_eq!(ident.as_usize(), WORDS.len());
        assert!(!interner.is_reserved(ident));
    }

    #[test]
    fn test_identifier_interning() {
        let mut interner = StringInterner::new();

        let sym1 = interner.intern("total");
        let sym2 = interner.intern("total");
        let sym3 = interner.intern("count");

        assert_eq!(sym1, sym2);
        assert_ne!(sym1, sym3);
        assert_eq!(interner.len(), 2);
    }

    #[test]
    fn test_symbol_resolution() {
        let mut interner = StringInterner::new();
        let sym = interner.intern("make_adder");

        assert_eq!(interner.resolve(sym), Some("make_adder"));
        assert_eq!(interner.resolve(Symbol::new(99)), None);
        assert_eq!(interner.get("make_adder"), Some(sym));
        assert_eq!(interner.get("missing"), None);
    }

    #[test]
    fn test_resolve_shared_points_at_one_allocation() {
        let mut interner = StringInterner::new();
        let sym = interner.intern("Hello, world");

        let a = interner.resolve_shared(sym).unwrap();
        let b = interner.resolve_shared(sym).unwrap();
        assert!(Rc::ptr_eq(&a, &b));
        assert_eq!(&*a, "Hello, world");
    }

    #[test]
    fn test_clone_keeps_ids() {
        let mut interner = StringInterner::with_pre_interned(WORDS);
        let x = interner.intern("x");
        let copy = interner.clone();

        assert_eq!(copy.resolve(x), Some("x"));
        assert_eq!(copy.get("while"), interner.get("while"));
    }

    #[test]
    fn test_empty_and_unicode_strings() {
        let mut interner = StringInterner::new();

        let empty = interner.intern("");
        let wide = interner.intern("变量");
        assert_eq!(interner.resolve(empty), Some(""));
        assert_eq!(interner.resolve(wide), Some("变量"));
    }
}
