//! akbarc-par - Recursive-descent parser for AkbarLang.
//!
//! Consumes the token stream produced by `akbarc-lex` and builds a
//! [`Program`]. Pure recursive descent with one token of lookahead (two
//! for distinguishing assignment from a plain identifier expression);
//! operator precedence is encoded by the climbing order of the grammar
//! rules in the `expr` module.
//!
//! The parser fails fast: the first unexpected token aborts with a
//! [`ParseError`] naming what was expected.

pub mod ast;
mod expr;
mod stmt;

pub use ast::*;

use akbarc_lex::{Token, TokenKind};
use akbarc_util::Span;
use thiserror::Error;

/// A syntax error. The parser stops at the first one.
#[derive(Clone, Debug, Error, PartialEq)]
#[error("syntax error at line {line}, column {column}: {message}")]
pub struct ParseError {
    pub line: u32,
    pub column: u32,
    pub message: String,
}

impl ParseError {
    fn new(span: Span, message: impl Into<String>) -> Self {
        Self {
            line: span.line,
            column: span.column,
            message: message.into(),
        }
    }
}

/// Parses a complete token stream into a program.
pub fn parse(tokens: Vec<Token>) -> Result<Program, ParseError> {
    Parser::new(tokens).parse()
}

/// Recursive-descent parser over a token vector.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    /// Creates a parser. The token vector must be Eof-terminated, as
    /// produced by `akbarc_lex::lex`.
    pub fn new(tokens: Vec<Token>) -> Self {
        debug_assert!(matches!(
            tokens.last().map(|t| &t.kind),
            Some(TokenKind::Eof)
        ));
        Self { tokens, pos: 0 }
    }

    /// Parses the whole stream into a program.
    pub fn parse(mut self) -> Result<Program, ParseError> {
        let mut statements = Vec::new();
        while !self.at_eof() {
            statements.push(self.parse_statement()?);
        }
        Ok(Program { statements })
    }

    // Token stream plumbing ------------------------------------------------

    pub(crate) fn peek(&self) -> &Token {
        // The stream is Eof-terminated and the parser never advances past
        // Eof, so indexing is in bounds.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    pub(crate) fn peek_kind(&self) -> &TokenKind {
        &self.peek().kind
    }

    /// Second token of lookahead, used only to recognize `IDENT =`.
    pub(crate) fn peek_next_kind(&self) -> &TokenKind {
        let idx = (self.pos + 1).min(self.tokens.len() - 1);
        &self.tokens[idx].kind
    }

    pub(crate) fn at_eof(&self) -> bool {
        matches!(self.peek_kind(), TokenKind::Eof)
    }

    /// Consumes and returns the current token.
    pub(crate) fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if !self.at_eof() {
            self.pos += 1;
        }
        token
    }

    /// Consumes the current token if it equals `kind`.
    pub(crate) fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek_kind() == kind {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consumes the current token if it equals `kind`, or fails naming it.
    pub(crate) fn expect(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        if self.peek_kind() == &kind {
            Ok(self.advance())
        } else {
            Err(self.error_expected(&kind.to_string()))
        }
    }

    /// Consumes an identifier token and returns its name and span.
    pub(crate) fn expect_ident(&mut self) -> Result<(String, Span), ParseError> {
        match self.peek_kind() {
            TokenKind::Ident(_) => {
                let token = self.advance();
                match token.kind {
                    TokenKind::Ident(name) => Ok((name, token.span)),
                    _ => unreachable!("peeked an identifier"),
                }
            },
            _ => Err(self.error_expected("identifier")),
        }
    }

    /// Builds a fail-fast error at the current token.
    pub(crate) fn error_expected(&self, expected: &str) -> ParseError {
        let token = self.peek();
        ParseError::new(
            token.span,
            format!("expected {}, found {}", expected, token.kind),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use akbarc_lex::lex;

    fn parse_source(source: &str) -> Result<Program, ParseError> {
        parse(lex(source).expect("lexing failed"))
    }

    #[test]
    fn test_empty_program() {
        let program = parse_source("").unwrap();
        assert!(program.statements.is_empty());
    }

    #[test]
    fn test_stray_semicolon_is_an_empty_statement() {
        // Required by surface programs that terminate an `if` with `};`.
        let program = parse_source("benvis(1); ;").unwrap();
        assert_eq!(program.statements.len(), 2);
        assert!(matches!(
            &program.statements[1],
            Stmt::Block(b) if b.statements.is_empty()
        ));
    }

    #[test]
    fn test_error_names_expected_token() {
        let e = parse_source("sahih x").unwrap_err();
        assert!(e.message.contains("expected `;`"), "message: {}", e.message);
        assert_eq!(e.line, 1);
    }

    #[test]
    fn test_error_position_spans_lines() {
        let e = parse_source("benvis(1);\nbenvis(;").unwrap_err();
        assert_eq!(e.line, 2);
        assert!(e.message.contains("expected expression"));
    }
}
