//! Recursive descent parser.
//!
//! Statements are parsed by looking at their first token (and, for
//! assignments, the second). Expressions use precedence climbing over the
//! binary operator precedences defined on [`TokenKind`], with a prefix level
//! for unary minus beneath them. Parsing stops at the first error.

use crate::ast::{
    BinaryOp, ElifClause, Expr, FunctionDef, Number, Param, Program, Stmt, UnaryOp,
};
use crate::error::{ParseError, ParseResult};
use crate::keywords::{self, DEF, ELIF, ELSE, IF, RETURN, WHILE};
use crate::span::{Span, Spanned};
use crate::token::{Token, TokenKind};
use pyrite_mem::{StringInterner, Symbol};
use std::rc::Rc;

/// Lowest binary operator precedence.
const MIN_PRECEDENCE: u8 = 1;

/// Deepest nesting the parser accepts. Parentheses, unary minus, argument
/// lists, blocks and each operator folded into a chain all count one level.
pub const MAX_NESTING_DEPTH: usize = 1000;

/// Parser over a lexed token stream.
pub struct Parser {
    /// Token stream, always terminated by `EOF`
    tokens: Vec<Token>,

    /// Index of the current token
    pos: usize,

    /// Span of the most recently consumed token
    prev_span: Span,

    /// Interner the token symbols belong to
    interner: StringInterner,

    /// Current nesting, checked against [`MAX_NESTING_DEPTH`]
    depth: usize,
}

impl Parser {
    /// Creates a parser. An `EOF` token is appended if the stream lacks one.
    #[must_use]
    pub fn new(mut tokens: Vec<Token>, interner: StringInterner) -> Self {
        if !tokens.last().is_some_and(|t| t.kind == TokenKind::EOF) {
            let end = tokens.last().map_or(Span::point(0, 1, 1), |t| {
                Span::point(t.span.end, t.span.end_line, t.span.end_col)
            });
            tokens.push(Token::new(TokenKind::EOF, end));
        }

        Self {
            tokens,
            pos: 0,
            prev_span: Span::point(0, 1, 1),
            interner,
            depth: 0,
        }
    }

    /// Parses a whole program.
    ///
    /// # Errors
    ///
    /// Returns the first [`ParseError`] encountered.
    pub fn parse_program(mut self) -> ParseResult<Program> {
        let start = self.peek().span;
        let mut body = Vec::new();

        while !self.check(&TokenKind::EOF) {
            body.push(self.parse_statement()?);
        }

        let span = Span::merge(start, self.peek().span);
        pyrite_log::debug!("parsed {} top-level statements", body.len());

        Ok(Program {
            body,
            interner: self.interner,
            span,
        })
    }

    /// Parses one expression.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] if the tokens do not start with an expression.
    pub fn parse_expression(&mut self) -> ParseResult<Expr> {
        self.parse_expr(MIN_PRECEDENCE)
    }

    /// Returns the interner, for callers that parse fragments.
    #[must_use]
    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    // ===== Token cursor =====

    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_next(&self) -> &Token {
        &self.tokens[(self.pos + 1).min(self.tokens.len() - 1)]
    }

    /// Consumes the current token. `EOF` is never consumed.
    fn bump(&mut self) -> Token {
        let token = *self.peek();
        if token.kind != TokenKind::EOF {
            self.pos += 1;
            self.prev_span = token.span;
        }
        token
    }

    fn check(&self, kind: &TokenKind) -> bool {
        self.peek().kind == *kind
    }

    fn check_keyword(&self, keyword: Symbol) -> bool {
        self.peek().kind == TokenKind::Name(keyword)
    }

    fn expect(&mut self, kind: TokenKind) -> ParseResult<Token> {
        if self.check(&kind) {
            Ok(self.bump())
        } else {
            let expected = describe_kind(&kind);
            Err(self.unexpected(&[expected.as_str()]))
        }
    }

    fn expect_identifier(&mut self) -> ParseResult<(Symbol, Span)> {
        let token = *self.peek();
        match token.kind {
            TokenKind::Name(sym) if !keywords::is_keyword(sym) => {
                self.bump();
                Ok((sym, token.span))
            }
            _ => Err(ParseError::ExpectedIdentifier {
                found: self.describe(&token),
                span: token.span,
            }),
        }
    }

    fn unexpected(&self, expected: &[&str]) -> ParseError {
        let token = self.peek();
        ParseError::UnexpectedToken {
            expected: expected.iter().map(|s| (*s).to_string()).collect(),
            found: self.describe(token),
            span: token.span,
        }
    }

    /// Opens one nesting level.
    fn enter(&mut self, construct: &'static str) -> ParseResult<()> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(ParseError::NestedTooDeeply {
                construct,
                limit: MAX_NESTING_DEPTH,
                span: self.peek().span,
            });
        }
        self.depth += 1;
        Ok(())
    }

    fn leave(&mut self, levels: usize) {
        self.depth = self.depth.saturating_sub(levels);
    }

    /// Renders a token for error messages.
    fn describe(&self, token: &Token) -> String {
        match token.kind {
            TokenKind::Name(sym) | TokenKind::Number(sym) => {
                format!("'{}'", self.interner.resolve(sym).unwrap_or("?"))
            }
            ref kind => describe_kind(kind),
        }
    }

    // ===== Statements =====

    fn parse_statement(&mut self) -> ParseResult<Stmt> {
        pyrite_mem::stack::guarded(|| self.parse_statement_inner())
    }

    fn parse_statement_inner(&mut self) -> ParseResult<Stmt> {
        let kind = self.peek().kind;
        match kind {
            TokenKind::Name(IF) => self.parse_if(),
            TokenKind::Name(WHILE) => self.parse_while(),
            TokenKind::Name(DEF) => self.parse_function_def(),
            TokenKind::Name(RETURN) => self.parse_return(),
            TokenKind::Name(ELIF | ELSE) | TokenKind::Indent | TokenKind::Dedent => {
                Err(self.unexpected(&["statement"]))
            }
            TokenKind::Name(target)
                if !keywords::is_keyword(target) && self.peek_next().kind == TokenKind::Eq =>
            {
                self.parse_assignment(target)
            }
            _ => {
                let expr = self.parse_expression()?;
                let span = Span::merge(expr.span(), self.prev_span);
                self.expect_line_end()?;
                Ok(Stmt::Expr { expr, span })
            }
        }
    }

    fn parse_assignment(&mut self, target: Symbol) -> ParseResult<Stmt> {
        let target_span = self.bump().span;
        self.expect(TokenKind::Eq)?;
        let value = self.parse_expression()?;
        let span = Span::merge(target_span, self.prev_span);
        self.expect_line_end()?;

        Ok(Stmt::Assign {
            target,
            target_span,
            value,
            span,
        })
    }

    fn parse_if(&mut self) -> ParseResult<Stmt> {
        let start = self.bump().span;
        let condition = self.parse_expression()?;
        let then_body = self.parse_block()?;

        let mut elifs = Vec::new();
        while self.check_keyword(ELIF) {
            let elif_start = self.bump().span;
            let condition = self.parse_expression()?;
            let body = self.parse_block()?;
            elifs.push(ElifClause {
                condition,
                body,
                span: Span::merge(elif_start, self.prev_span),
            });
        }

        let else_body = if self.check_keyword(ELSE) {
            self.bump();
            Some(self.parse_block()?)
        } else {
            None
        };

        Ok(Stmt::If {
            condition,
            then_body,
            elifs,
            else_body,
            span: Span::merge(start, self.prev_span),
        })
    }

    fn parse_while(&mut self) -> ParseResult<Stmt> {
        let start = self.bump().span;
        let condition = self.parse_expression()?;
        let body = self.parse_block()?;

        Ok(Stmt::While {
            condition,
            body,
            span: Span::merge(start, self.prev_span),
        })
    }

    fn parse_function_def(&mut self) -> ParseResult<Stmt> {
        let start = self.bump().span;
        let (name, name_span) = self.expect_identifier()?;
        self.expect(TokenKind::LParen)?;

        let mut params = Vec::new();
        if !self.check(&TokenKind::RParen) {
            loop {
                let (name, span) = self.expect_identifier()?;
                params.push(Param { name, span });
                if self.check(&TokenKind::Comma) {
                    self.bump();
                } else {
                    break;
                }
            }
        }
        if !self.check(&TokenKind::RParen) {
            return Err(self.unexpected(&["','", "')'"]));
        }
        self.bump();

        let body = self.parse_block()?;

        Ok(Stmt::FunctionDef(Rc::new(FunctionDef {
            name,
            name_span,
            params,
            body,
            span: Span::merge(start, self.prev_span),
        })))
    }

    fn parse_return(&mut self) -> ParseResult<Stmt> {
        let start = self.bump().span;
        let value = if self.check(&TokenKind::Newline) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        let span = Span::merge(start, self.prev_span);
        self.expect_line_end()?;

        Ok(Stmt::Return { value, span })
    }

    /// Parses `':' NEWLINE INDENT statement+ DEDENT`.
    ///
    /// On return `prev_span` is the end of the block's last statement, not
    /// the zero-width `Dedent`.
    fn parse_block(&mut self) -> ParseResult<Vec<Stmt>> {
        self.expect(TokenKind::Colon)?;
        self.expect(TokenKind::Newline)?;
        self.expect(TokenKind::Indent)?;
        self.enter("block")?;

        let mut body = Vec::new();
        while !self.check(&TokenKind::Dedent) && !self.check(&TokenKind::EOF) {
            body.push(self.parse_statement()?);
        }
        let end = body.last().map_or(self.prev_span, Spanned::span);
        self.expect(TokenKind::Dedent)?;
        self.prev_span = end;
        self.leave(1);

        Ok(body)
    }

    fn expect_line_end(&mut self) -> ParseResult<()> {
        if self.check(&TokenKind::Newline) {
            self.bump();
            Ok(())
        } else {
            Err(self.unexpected(&["newline"]))
        }
    }

    // ===== Expressions =====

    /// Precedence climbing: parses operands one level up, then folds in
    /// operators binding at least as tightly as `precedence`.
    fn parse_expr(&mut self, precedence: u8) -> ParseResult<Expr> {
        pyrite_mem::stack::guarded(|| self.parse_expr_inner(precedence))
    }

    fn parse_expr_inner(&mut self, precedence: u8) -> ParseResult<Expr> {
        let mut left = self.parse_unary()?;
        let mut folds = 0;

        loop {
            let token = *self.peek();
            let Some(token_prec) = token.kind.precedence() else {
                break;
            };
            if token_prec < precedence {
                break;
            }
            let Some(op) = BinaryOp::from_token(&token.kind) else {
                break;
            };
            self.enter("expression")?;
            folds += 1;
            self.bump();

            let right = self.parse_expr(token_prec + 1)?;
            left = Expr::binary(left, op, token.span, right);
        }

        self.leave(folds);
        Ok(left)
    }

    fn parse_unary(&mut self) -> ParseResult<Expr> {
        if self.check(&TokenKind::Minus) {
            self.enter("expression")?;
            let start = self.bump().span;
            let operand = pyrite_mem::stack::guarded(|| self.parse_unary())?;
            self.leave(1);
            let span = Span::merge(start, operand.span());
            return Ok(Expr::Unary {
                op: UnaryOp::Neg,
                operand: Box::new(operand),
                span,
            });
        }
        self.parse_factor()
    }

    fn parse_factor(&mut self) -> ParseResult<Expr> {
        let token = *self.peek();
        match token.kind {
            TokenKind::Number(text) => {
                self.bump();
                let value = self.number_value(text, token.span)?;
                Ok(Expr::Number {
                    value,
                    span: token.span,
                })
            }
            TokenKind::Str(value) => {
                self.bump();
                Ok(Expr::Str {
                    value,
                    span: token.span,
                })
            }
            TokenKind::Name(name) if !keywords::is_keyword(name) => {
                self.bump();
                if self.check(&TokenKind::LParen) {
                    self.parse_call(name, token.span)
                } else {
                    Ok(Expr::Identifier {
                        name,
                        span: token.span,
                    })
                }
            }
            TokenKind::LParen => {
                self.enter("expression")?;
                self.bump();
                let inner = self.parse_expression()?;
                self.expect(TokenKind::RParen)?;
                self.leave(1);
                Ok(inner)
            }
            _ => Err(ParseError::ExpectedExpression {
                found: self.describe(&token),
                span: token.span,
            }),
        }
    }

    fn parse_call(&mut self, callee: Symbol, callee_span: Span) -> ParseResult<Expr> {
        self.expect(TokenKind::LParen)?;
        self.enter("expression")?;

        let mut args = Vec::new();
        if !self.check(&TokenKind::RParen) {
            loop {
                args.push(self.parse_expression()?);
                if self.check(&TokenKind::Comma) {
                    self.bump();
                } else {
                    break;
                }
            }
        }
        if !self.check(&TokenKind::RParen) {
            return Err(self.unexpected(&["','", "')'"]));
        }
        let close = self.bump().span;
        self.leave(1);

        Ok(Expr::Call {
            callee,
            callee_span,
            args,
            span: Span::merge(callee_span, close),
        })
    }

    /// Converts numeric literal text; a `.` marks a float.
    fn number_value(&self, text: Symbol, span: Span) -> ParseResult<Number> {
        let literal = self.interner.resolve(text).unwrap_or_default();
        let invalid = || ParseError::InvalidNumeric {
            literal: literal.to_string(),
            span,
        };

        if literal.contains('.') {
            literal.parse::<f64>().map(Number::Float).map_err(|_| invalid())
        } else {
            literal.parse::<i64>().map(Number::Int).map_err(|_| invalid())
        }
    }
}

/// Renders a token kind the way error messages quote it.
fn describe_kind(kind: &TokenKind) -> String {
    if kind.is_operator() {
        format!("'{kind}'")
    } else {
        kind.to_string()
    }
}
