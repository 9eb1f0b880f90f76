//! Reserved words and builtin names.
//!
//! Keywords are lexed as ordinary names. They are pre-interned in this order,
//! followed by the builtin names, so each word's symbol id equals its index
//! in [`PRE_INTERNED`] and later phases can match on the constants below.

use pyrite_mem::Symbol;

/// All keywords in id order.
pub const KEYWORDS: &[&str] = &["def", "if", "elif", "else", "while", "return"];

/// Every pre-interned word: the keywords, then the builtins.
pub const PRE_INTERNED: &[&str] = &["def", "if", "elif", "else", "while", "return", "print"];

/// Number of keywords.
pub const KEYWORD_COUNT: u32 = KEYWORDS.len() as u32;

/// `def`
pub const DEF: Symbol = Symbol::new(0);
/// `if`
pub const IF: Symbol = Symbol::new(1);
/// `elif`
pub const ELIF: Symbol = Symbol::new(2);
/// `else`
pub const ELSE: Symbol = Symbol::new(3);
/// `while`
pub const WHILE: Symbol = Symbol::new(4);
/// `return`
pub const RETURN: Symbol = Symbol::new(5);

/// `print`, the builtin output function
pub const PRINT: Symbol = Symbol::new(6);

/// Returns true if `sym` names a keyword.
#[must_use]
pub const fn is_keyword(sym: Symbol) -> bool {
    sym.as_u32() < KEYWORD_COUNT
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyrite_mem::StringInterner;

    #[test]
    fn test_constants_match_interner_ids() {
        let interner = StringInterner::with_pre_interned(PRE_INTERNED);

        assert_eq!(interner.get("def"), Some(DEF));
        assert_eq!(interner.get("if"), Some(IF));
        assert_eq!(interner.get("elif"), Some(ELIF));
        assert_eq!(interner.get("else"), Some(ELSE));
        assert_eq!(interner.get("while"), Some(WHILE));
        assert_eq!(interner.get("return"), Some(RETURN));
        assert_eq!(interner.get("print"), Some(PRINT));
    }

    #[test]
    fn test_keywords_lead_pre_interned() {
        assert_eq!(&PRE_INTERNED[..KEYWORDS.len()], KEYWORDS);
        assert!(!is_keyword(PRINT));
    }

    #[test]
    fn test_no_duplicates() {
        let unique: std::collections::HashSet<_> = KEYWORDS.iter().collect();
        assert_eq!(unique.len(), KEYWORDS.len());
        assert!(!is_keyword(Symbol::new(KEYWORD_COUNT)));
    }
}
