//! Expression parsing.
//!
//! Precedence ascends through the grammar rules; all binary operators are
//! left-associative:
//!
//! | Level | Operators | Rule |
//! |-------|--------------------|------------|
//! | 1 | `va`, `ya` | logical |
//! | 2 | `==`, `!=` | equality |
//! | 3 | `<`, `>`, `<=`, `>=` | comparison |
//! | 4 | `+`, `-` | term |
//! | 5 | `*`, `/` | factor |
//! | 6 | unary `-` | unary |
//!
//! Assignment sits above all of these and is only recognized when an
//! identifier is directly followed by `=` (one extra token of lookahead);
//! `(x) = 1` is a syntax error.

use akbarc_lex::TokenKind;
use akbarc_util::Span;

use crate::ast::*;
use crate::{ParseError, Parser};

impl Parser {
    /// `expression := IDENT '=' expression | logical`
    pub(crate) fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        if matches!(self.peek_kind(), TokenKind::Ident(_))
            && matches!(self.peek_next_kind(), TokenKind::Assign)
        {
            let (name, span) = self.expect_ident()?;
            self.advance(); // '='
            let value = Box::new(self.parse_expression()?);
            return Ok(Expr::Assign(AssignExpr { name, value, span }));
        }
        self.parse_logical()
    }

    /// `logical := equality ( ('va'|'ya') equality )*`
    fn parse_logical(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_equality()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Va => BinOp::And,
                TokenKind::Ya => BinOp::Or,
                _ => return Ok(lhs),
            };
            let span = self.advance().span;
            let rhs = self.parse_equality()?;
            lhs = binary(op, lhs, rhs, span);
        }
    }

    /// `equality := comparison ( ('=='|'!=') comparison )*`
    fn parse_equality(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_comparison()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::EqEq => BinOp::Eq,
                TokenKind::NotEq => BinOp::Ne,
                _ => return Ok(lhs),
            };
            let span = self.advance().span;
            let rhs = self.parse_comparison()?;
            lhs = binary(op, lhs, rhs, span);
        }
    }

    /// `comparison := term ( ('<'|'>'|'<='|'>=') term )*`
    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_term()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Lt => BinOp::Lt,
                TokenKind::Gt => BinOp::Gt,
                TokenKind::LtEq => BinOp::Le,
                TokenKind::GtEq => BinOp::Ge,
                _ => return Ok(lhs),
            };
            let span = self.advance().span;
            let rhs = self.parse_term()?;
            lhs = binary(op, lhs, rhs, span);
        }
    }

    /// `term := factor ( ('+'|'-') factor )*`
    fn parse_term(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_factor()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => return Ok(lhs),
            };
            let span = self.advance().span;
            let rhs = self.parse_factor()?;
            lhs = binary(op, lhs, rhs, span);
        }
    }

    /// `factor := unary ( ('*'|'/') unary )*`
    fn parse_factor(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_unary()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Star => BinOp::Mul,
                TokenKind::Slash => BinOp::Div,
                _ => return Ok(lhs),
            };
            let span = self.advance().span;
            let rhs = self.parse_unary()?;
            lhs = binary(op, lhs, rhs, span);
        }
    }

    /// `unary := '-' unary | primary`
    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        if matches!(self.peek_kind(), TokenKind::Minus) {
            let span = self.advance().span;
            let operand = Box::new(self.parse_unary()?);
            return Ok(Expr::Unary(UnaryExpr {
                op: UnOp::Neg,
                operand,
                span,
            }));
        }
        self.parse_primary()
    }

    /// `primary := INT | FLOAT | STRING | CHAR | IDENT | '(' expression ')'`
    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        match self.peek_kind() {
            TokenKind::Int(_)
            | TokenKind::Float(_)
            | TokenKind::Str(_)
            | TokenKind::Char(_) => {
                let token = self.advance();
                let value = match token.kind {
                    TokenKind::Int(v) => LitValue::Int(v),
                    TokenKind::Float(v) => LitValue::Float(v),
                    TokenKind::Str(v) => LitValue::Str(v),
                    TokenKind::Char(v) => LitValue::Char(v),
                    _ => unreachable!("peeked a literal"),
                };
                Ok(Expr::Literal(LiteralExpr {
                    value,
                    span: token.span,
                }))
            },
            TokenKind::Ident(_) => {
                let (name, span) = self.expect_ident()?;
                Ok(Expr::Var(VarExpr { name, span }))
            },
            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect(TokenKind::RParen)?;
                Ok(expr)
            },
            _ => Err(self.error_expected("expression")),
        }
    }
}

fn binary(op: BinOp, lhs: Expr, rhs: Expr, span: Span) -> Expr {
    Expr::Binary(BinaryExpr {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
        span,
    })
}
