//! Lexical analysis for Pyrite source.
//!
//! Besides ordinary tokens the lexer synthesizes the layout tokens the parser
//! relies on:
//!
//! - `Newline` at the end of every logical line that produced tokens
//! - `Indent` when a line is indented deeper than the enclosing block
//! - one `Dedent` per block closed when indentation decreases
//!
//! Blank lines and comment-only lines never affect layout, and newlines
//! inside parentheses are ignored so argument lists may span several lines.
//! At end of input a final `Newline` is added if the last line lacked one,
//! followed by the pending `Dedent`s and `EOF`.
//!
//! # Examples
//!
//! ```
//! use pyrite_syntax::lexer::Lexer;
//! use pyrite_syntax::token::TokenKind;
//!
//! let (tokens, _interner) = Lexer::new("if x:\n    y = 1\n").lex_with_interner().unwrap();
//! let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
//!
//! assert!(matches!(kinds[3], TokenKind::Newline));
//! assert!(matches!(kinds[4], TokenKind::Indent));
//! assert!(matches!(kinds[kinds.len() - 2], TokenKind::Dedent));
//! assert!(matches!(kinds[kinds.len() - 1], TokenKind::EOF));
//! ```

use crate::error::{LexError, LexResult};
use crate::keywords;
use crate::span::Span;
use crate::token::{Token, TokenKind};
use pyrite_mem::StringInterner;
use std::iter::Peekable;
use std::str::Chars;

/// Single-pass tokenizer with an indentation stack.
pub struct Lexer<'input> {
    /// The source being tokenized
    input: &'input str,

    /// Remaining characters
    chars: Peekable<Chars<'input>>,

    /// Current byte offset in the source
    position: usize,

    /// Current line number (1-indexed)
    line: usize,

    /// Current column number in characters (1-indexed)
    column: usize,

    /// Accumulated tokens
    tokens: Vec<Token>,

    /// Widths of the open blocks; the bottom entry is always 0
    indents: Vec<usize>,

    /// Indentation character fixed by the first indented line
    indent_char: Option<char>,

    /// Open parentheses; while nonzero, line breaks are insignificant
    paren_depth: usize,

    /// True when the next character begins a physical line
    at_line_start: bool,

    /// Identifiers, numeric literal text and string contents
    interner: StringInterner,
}

impl<'input> Lexer<'input> {
    /// Creates a lexer over `input` with the keywords pre-interned.
    #[must_use]
    pub fn new(input: &'input str) -> Self {
        Self {
            input,
            chars: input.chars().peekable(),
            position: 0,
            line: 1,
            column: 1,
            tokens: Vec::new(),
            indents: vec![0],
            indent_char: None,
            paren_depth: 0,
            at_line_start: true,
            interner: StringInterner::with_pre_interned(keywords::PRE_INTERNED),
        }
    }

    /// Tokenizes the whole input, discarding the interner.
    ///
    /// # Errors
    ///
    /// Returns the first [`LexError`] encountered.
    pub fn lex(self) -> LexResult<Vec<Token>> {
        self.lex_with_interner().map(|(tokens, _)| tokens)
    }

    /// Tokenizes the whole input and returns the tokens with the interner
    /// their symbols refer to.
    ///
    /// # Errors
    ///
    /// Returns the first [`LexError`] encountered.
    pub fn lex_with_interner(mut self) -> LexResult<(Vec<Token>, StringInterner)> {
        self.run()?;
        pyrite_log::debug!(
            "lexed {} bytes into {} tokens",
            self.input.len(),
            self.tokens.len()
        );
        Ok((self.tokens, self.interner))
    }

    fn run(&mut self) -> LexResult<()> {
        loop {
            if self.at_line_start {
                if !self.begin_line()? {
                    continue;
                }
                self.at_line_start = false;
            }

            self.skip_inline_whitespace();

            match self.peek() {
                None => break,
                Some('\n') => {
                    let span = self.char_span();
                    self.bump();
                    if self.paren_depth == 0 {
                        self.push(TokenKind::Newline, span);
                        self.at_line_start = true;
                    }
                }
                Some('#') => self.skip_comment(),
                Some(_) => {
                    let token = self.next_token()?;
                    self.tokens.push(token);
                }
            }
        }

        self.finish();
        Ok(())
    }

    /// Measures the indentation of a new physical line and emits layout
    /// tokens for it.
    ///
    /// Returns `false` when the line is blank or comment-only (it has been
    /// consumed) and `true` when the line holds tokens or input has ended.
    fn begin_line(&mut self) -> LexResult<bool> {
        let start = self.position;
        let start_line = self.line;
        let mut width = 0;
        let mut spaces = false;
        let mut tabs = false;

        while let Some(ch @ (' ' | '\t')) = self.peek() {
            if ch == ' ' {
                spaces = true;
            } else {
                tabs = true;
            }
            width += 1;
            self.bump();
        }

        match self.peek() {
            None => return Ok(true),
            Some('\n') => {
                self.bump();
                return Ok(false);
            }
            Some('\r') if self.peek2() == Some('\n') => {
                self.bump();
                self.bump();
                return Ok(false);
            }
            Some('#') => {
                self.skip_comment();
                if self.peek() == Some('\n') {
                    self.bump();
                }
                return Ok(false);
            }
            Some(_) => {}
        }

        let indent_span = Span::new(start, self.position, start_line, 1, self.line, self.column);
        if spaces && tabs {
            return Err(LexError::MixedIndentation { span: indent_span });
        }
        if width > 0 {
            let ch = if tabs { '\t' } else { ' ' };
            match self.indent_char {
                None => self.indent_char = Some(ch),
                Some(established) if established != ch => {
                    return Err(LexError::MixedIndentation { span: indent_span });
                }
                Some(_) => {}
            }
        }

        let here = Span::point(self.position, self.line, self.column);
        let current = self.indents.last().copied().unwrap_or(0);
        if width > current {
            self.indents.push(width);
            self.push(TokenKind::Indent, here);
        } else if width < current {
            while self.indents.last().is_some_and(|&top| top > width) {
                self.indents.pop();
                self.push(TokenKind::Dedent, here);
            }
            if self.indents.last().copied().unwrap_or(0) != width {
                return Err(LexError::InconsistentDedent { width, span: here });
            }
        }

        Ok(true)
    }

    /// Emits the closing layout tokens.
    fn finish(&mut self) {
        let here = Span::point(self.position, self.line, self.column);
        if self
            .tokens
            .last()
            .is_some_and(|t| !matches!(t.kind, TokenKind::Newline | TokenKind::Dedent))
        {
            self.push(TokenKind::Newline, here);
        }
        while self.indents.len() > 1 {
            self.indents.pop();
            self.push(TokenKind::Dedent, here);
        }
        self.push(TokenKind::EOF, here);
    }

    fn push(&mut self, kind: TokenKind, span: Span) {
        self.tokens.push(Token::new(kind, span));
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn peek2(&self) -> Option<char> {
        let mut iter = self.chars.clone();
        iter.next();
        iter.next()
    }

    /// Consumes one character, keeping position, line and column current.
    fn bump(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        self.position += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    /// Span of the next character.
    fn char_span(&self) -> Span {
        Span::new(
            self.position,
            self.position + 1,
            self.line,
            self.column,
            self.line,
            self.column + 1,
        )
    }

    fn span_from(&self, start: usize, start_line: usize, start_col: usize) -> Span {
        Span::new(start, self.position, start_line, start_col, self.line, self.column)
    }

    fn skip_inline_whitespace(&mut self) {
        while let Some(' ' | '\t' | '\r') = self.peek() {
            self.bump();
        }
    }

    /// Skips to the end of the line, leaving the newline unread.
    fn skip_comment(&mut self) {
        while let Some(ch) = self.peek() {
            if ch == '\n' {
                break;
            }
            self.bump();
        }
    }

    fn next_token(&mut self) -> LexResult<Token> {
        let start = self.position;
        let start_line = self.line;
        let start_col = self.column;

        let Some(ch) = self.bump() else {
            return Ok(Token::new(
                TokenKind::EOF,
                Span::point(start, start_line, start_col),
            ));
        };

        let kind = match ch {
            'a'..='z' | 'A'..='Z' | '_' => self.read_identifier(start),
            '0'..='9' => self.read_number(start, start_line, start_col)?,
            '"' | '\'' => self.read_string(ch, start, start_line, start_col)?,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            ':' => TokenKind::Colon,
            ',' => TokenKind::Comma,
            '=' => self.with_eq(TokenKind::EqEq, TokenKind::Eq),
            '<' => self.with_eq(TokenKind::LtEq, TokenKind::Lt),
            '>' => self.with_eq(TokenKind::GtEq, TokenKind::Gt),
            '!' => {
                if self.peek() != Some('=') {
                    return Err(LexError::UnknownChar {
                        ch,
                        span: self.span_from(start, start_line, start_col),
                    });
                }
                self.bump();
                TokenKind::BangEq
            }
            '(' => {
                self.paren_depth += 1;
                TokenKind::LParen
            }
            ')' => {
                if self.paren_depth == 0 {
                    return Err(LexError::UnbalancedParen {
                        span: self.span_from(start, start_line, start_col),
                    });
                }
                self.paren_depth -= 1;
                TokenKind::RParen
            }
            other => {
                return Err(LexError::UnknownChar {
                    ch: other,
                    span: self.span_from(start, start_line, start_col),
                });
            }
        };

        Ok(Token::new(kind, self.span_from(start, start_line, start_col)))
    }

    /// Picks the two-character form when the next character is `=`.
    fn with_eq(&mut self, double: TokenKind, single: TokenKind) -> TokenKind {
        if self.peek() == Some('=') {
            self.bump();
            double
        } else {
            single
        }
    }

    fn read_identifier(&mut self, start: usize) -> TokenKind {
        while let Some('a'..='z' | 'A'..='Z' | '0'..='9' | '_') = self.peek() {
            self.bump();
        }
        let text = &self.input[start..self.position];
        TokenKind::Name(self.interner.intern(text))
    }

    /// Reads `digits` or `digits.digits`.
    ///
    /// A trailing letter makes the whole run invalid (`12abc`), and integer
    /// literals must fit in an `i64`.
    fn read_number(
        &mut self,
        start: usize,
        start_line: usize,
        start_col: usize,
    ) -> LexResult<TokenKind> {
        self.eat_digits();

        let mut is_float = false;
        if self.peek() == Some('.') && self.peek2().is_some_and(|c| c.is_ascii_digit()) {
            is_float = true;
            self.bump();
            self.eat_digits();
        }

        let mut malformed = false;
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                malformed = true;
                self.bump();
            } else {
                break;
            }
        }

        let text = &self.input[start..self.position];
        if malformed || (!is_float && text.parse::<i64>().is_err()) {
            return Err(LexError::InvalidNumeric {
                literal: text.to_string(),
                span: self.span_from(start, start_line, start_col),
            });
        }

        Ok(TokenKind::Number(self.interner.intern(text)))
    }

    fn eat_digits(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
        }
    }

    /// Reads a quoted literal, decoding escapes.
    ///
    /// Unknown escapes are kept as written, backslash included.
    fn read_string(
        &mut self,
        quote: char,
        start: usize,
        start_line: usize,
        start_col: usize,
    ) -> LexResult<TokenKind> {
        let open = Span::new(start, start + 1, start_line, start_col, start_line, start_col + 1);
        let mut value = String::new();

        loop {
            match self.peek() {
                None | Some('\n') => {
                    return Err(LexError::UnterminatedString { start: open });
                }
                Some(c) if c == quote => {
                    self.bump();
                    break;
                }
                Some('\\') => {
                    self.bump();
                    match self.peek() {
                        None | Some('\n') => {
                            return Err(LexError::UnterminatedString { start: open });
                        }
                        Some(escaped) => {
                            self.bump();
                            match escaped {
                                'n' => value.push('\n'),
                                't' => value.push('\t'),
                                'r' => value.push('\r'),
                                '0' => value.push('\0'),
                                '\\' | '\'' | '"' => value.push(escaped),
                                other => {
                                    value.push('\\');
                                    value.push(other);
                                }
                            }
                        }
                    }
                }
                Some(c) => {
                    self.bump();
                    value.push(c);
                }
            }
        }

        Ok(TokenKind::Str(self.interner.intern(&value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keywords::{DEF, IF, RETURN};

    fn lex(source: &str) -> (Vec<Token>, StringInterner) {
        Lexer::new(source).lex_with_interner().unwrap()
    }

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex(source).0.into_iter().map(|t| t.kind).collect()
    }

    fn lex_err(source: &str) -> LexError {
        Lexer::new(source).lex().unwrap_err()
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(kinds(""), vec![TokenKind::EOF]);
        assert_eq!(kinds("\n\n   \n# only a comment\n"), vec![TokenKind::EOF]);
    }

    #[test]
    fn test_simple_assignment() {
        let (tokens, interner) = lex("total = 42\n");

        assert_eq!(tokens.len(), 5);
        let TokenKind::Name(name) = tokens[0].kind else {
            panic!("expected name, got {:?}", tokens[0].kind);
        };
        assert_eq!(interner.resolve(name), Some("total"));
        assert_eq!(tokens[1].kind, TokenKind::Eq);
        let TokenKind::Number(text) = tokens[2].kind else {
            panic!("expected number");
        };
        assert_eq!(interner.resolve(text), Some("42"));
        assert_eq!(tokens[3].kind, TokenKind::Newline);
        assert_eq!(tokens[4].kind, TokenKind::EOF);
    }

    #[test]
    fn test_positions_are_one_based() {
        let (tokens, _) = lex("a = 1\nbb = 22\n");

        assert_eq!((tokens[0].line(), tokens[0].column()), (1, 1));
        assert_eq!((tokens[2].line(), tokens[2].column()), (1, 5));
        assert_eq!((tokens[4].line(), tokens[4].column()), (2, 1));
        assert_eq!((tokens[6].line(), tokens[6].column()), (2, 6));
        assert_eq!(tokens[6].span.end_col, 8);
    }

    #[test]
    fn test_keywords_use_reserved_symbols() {
        let k = kinds("def if return");
        assert_eq!(k[0], TokenKind::Name(DEF));
        assert_eq!(k[1], TokenKind::Name(IF));
        assert_eq!(k[2], TokenKind::Name(RETURN));
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            kinds("+ - * / == != < <= > >= = ( ) : ,")[..15],
            [
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Star,
                TokenKind::Slash,
                TokenKind::EqEq,
                TokenKind::BangEq,
                TokenKind::Lt,
                TokenKind::LtEq,
                TokenKind::Gt,
                TokenKind::GtEq,
                TokenKind::Eq,
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::Colon,
                TokenKind::Comma,
            ]
        );
    }

    #[test]
    fn test_numbers() {
        let (tokens, interner) = lex("7 3.25 0");
        let texts: Vec<_> = tokens
            .iter()
            .filter_map(|t| match t.kind {
                TokenKind::Number(sym) => interner.resolve(sym),
                _ => None,
            })
            .collect();
        assert_eq!(texts, vec!["7", "3.25", "0"]);
    }

    #[test]
    fn test_invalid_numbers() {
        assert!(matches!(
            lex_err("x = 12abc"),
            LexError::InvalidNumeric { ref literal, .. } if literal == "12abc"
        ));
        assert!(matches!(
            lex_err("x = 99999999999999999999"),
            LexError::InvalidNumeric { .. }
        ));
    }

    #[test]
    fn test_strings_and_escapes() {
        let (tokens, interner) = lex(r#"print("a\tb\n", 'it\'s', "c:\q")"#);
        let strings: Vec<_> = tokens
            .iter()
            .filter_map(|t| match t.kind {
                TokenKind::Str(sym) => interner.resolve(sym),
                _ => None,
            })
            .collect();
        assert_eq!(strings, vec!["a\tb\n", "it's", "c:\\q"]);
    }

    #[test]
    fn test_unterminated_string() {
        let err = lex_err("x = \"abc\ny = 1\n");
        let LexError::UnterminatedString { start } = err else {
            panic!("expected unterminated string, got {err:?}");
        };
        assert_eq!((start.start_line, start.start_col), (1, 5));

        assert!(matches!(
            lex_err("'abc"),
            LexError::UnterminatedString { .. }
        ));
    }

    #[test]
    fn test_comments() {
        assert_eq!(
            kinds("x = 1 # trailing\n"),
            kinds("x = 1\n"),
        );
    }

    #[test]
    fn test_indent_and_dedent() {
        let k = kinds("if a:\n    b = 1\n    if c:\n        d = 2\ne = 3\n");
        let indents = k.iter().filter(|k| **k == TokenKind::Indent).count();
        let dedents = k.iter().filter(|k| **k == TokenKind::Dedent).count();
        assert_eq!(indents, 2);
        assert_eq!(dedents, 2);

        let first_dedent = k.iter().position(|k| *k == TokenKind::Dedent).unwrap();
        assert_eq!(k[first_dedent + 1], TokenKind::Dedent);
        assert!(matches!(k[first_dedent + 2], TokenKind::Name(_)));
    }

    #[test]
    fn test_blank_and_comment_lines_keep_layout() {
        let with_noise = kinds("if a:\n    b = 1\n\n  # note\n    c = 2\n");
        let without = kinds("if a:\n    b = 1\n    c = 2\n");
        assert_eq!(with_noise, without);
    }

    #[test]
    fn test_missing_final_newline() {
        let k = kinds("if a:\n    b = 1");
        assert_eq!(
            k[k.len() - 3..],
            [TokenKind::Newline, TokenKind::Dedent, TokenKind::EOF]
        );
    }

    #[test]
    fn test_inconsistent_dedent() {
        let err = lex_err("if a:\n        b = 1\n    c = 2\n");
        let LexError::InconsistentDedent { width, span } = err else {
            panic!("expected inconsistent dedent, got {err:?}");
        };
        assert_eq!(width, 4);
        assert_eq!((span.start_line, span.start_col), (3, 5));
    }

    #[test]
    fn test_mixed_indentation() {
        assert!(matches!(
            lex_err("if a:\n \tb = 1\n"),
            LexError::MixedIndentation { .. }
        ));
        assert!(matches!(
            lex_err("if a:\n    b = 1\nif c:\n\td = 2\n"),
            LexError::MixedIndentation { .. }
        ));
    }

    #[test]
    fn test_parentheses_join_lines() {
        let k = kinds("print(1,\n      2)\n");
        let newlines = k.iter().filter(|k| **k == TokenKind::Newline).count();
        assert_eq!(newlines, 1);
        assert!(!k.contains(&TokenKind::Indent));
    }

    #[test]
    fn test_unbalanced_paren() {
        let err = lex_err("x = 1)\n");
        assert!(matches!(err, LexError::UnbalancedParen { span } if span.start_col == 6));
    }

    #[test]
    fn test_unknown_char() {
        let err = lex_err("x = 3 $ 4");
        assert!(matches!(err, LexError::UnknownChar { ch: '$', span } if span.start_col == 7));
        assert!(matches!(lex_err("!x"), LexError::UnknownChar { ch: '!', .. }));
    }

    #[test]
    fn test_crlf_line_endings() {
        assert_eq!(kinds("x = 1\r\ny = 2\r\n"), kinds("x = 1\ny = 2\n"));
    }
}
