//! Statement parsing.
//!
//! ```text
//! statement := varDecl | input | output | if | for | while | block | exprStmt
//! ```
//!
//! A lone `;` in statement position is accepted as an empty statement
//! (an empty block) rather than rejected; surface programs commonly
//! terminate an `if` statement with `};`.

use akbarc_lex::TokenKind;

use crate::ast::*;
use crate::{ParseError, Parser};

impl Parser {
    /// Parses one statement, dispatching on the current token.
    pub(crate) fn parse_statement(&mut self) -> Result<Stmt, ParseError> {
        match self.peek_kind() {
            TokenKind::Sahih | TokenKind::Ashar | TokenKind::Harf => {
                Ok(Stmt::VarDecl(self.parse_var_decl()?))
            },
            TokenKind::Begir => self.parse_input(),
            TokenKind::Benvis => self.parse_output(),
            TokenKind::Age => self.parse_if(),
            TokenKind::Baraye => self.parse_for(),
            TokenKind::Vaghti => self.parse_while(),
            TokenKind::LBrace => self.parse_block(),
            TokenKind::Semicolon => {
                let token = self.advance();
                Ok(Stmt::Block(Block {
                    statements: Vec::new(),
                    span: token.span,
                }))
            },
            _ => self.parse_expr_stmt(),
        }
    }

    /// `('sahih'|'ashar'|'harf') IDENT ('=' expression)? ';'`
    fn parse_var_decl(&mut self) -> Result<VarDecl, ParseError> {
        let keyword = self.advance();
        let ty = match keyword.kind {
            TokenKind::Sahih => VarType::Int,
            TokenKind::Ashar => VarType::Float,
            TokenKind::Harf => VarType::Char,
            _ => unreachable!("caller checked for a declaration keyword"),
        };
        let (name, _) = self.expect_ident()?;
        let init = if self.eat(&TokenKind::Assign) {
            Some(self.parse_expression()?)
        } else {
            None
        };
        self.expect(TokenKind::Semicolon)?;
        Ok(VarDecl {
            ty,
            name,
            init,
            span: keyword.span,
        })
    }

    /// `'begir' '(' IDENT ')' ';'`
    fn parse_input(&mut self) -> Result<Stmt, ParseError> {
        let keyword = self.advance();
        self.expect(TokenKind::LParen)?;
        let (name, _) = self.expect_ident()?;
        self.expect(TokenKind::RParen)?;
        self.expect(TokenKind::Semicolon)?;
        Ok(Stmt::Input(InputStmt {
            name,
            span: keyword.span,
        }))
    }

    /// `'benvis' '(' expression ')' ';'`
    fn parse_output(&mut self) -> Result<Stmt, ParseError> {
        let keyword = self.advance();
        self.expect(TokenKind::LParen)?;
        let value = self.parse_expression()?;
        self.expect(TokenKind::RParen)?;
        self.expect(TokenKind::Semicolon)?;
        Ok(Stmt::Output(OutputStmt {
            value,
            span: keyword.span,
        }))
    }

    /// `'age' '(' expression ')' statement` with an optional alternative
    /// introduced by `vali` (chains as else-if when followed by `age`) or
    /// `vagarna`. A dangling alternative binds to the nearest `age`.
    fn parse_if(&mut self) -> Result<Stmt, ParseError> {
        let keyword = self.advance();
        self.expect(TokenKind::LParen)?;
        let condition = self.parse_expression()?;
        self.expect(TokenKind::RParen)?;
        let then_branch = Box::new(self.parse_statement()?);

        let else_branch = match self.peek_kind() {
            TokenKind::Vali => {
                self.advance();
                if matches!(self.peek_kind(), TokenKind::Age) {
                    Some(Box::new(self.parse_if()?))
                } else {
                    Some(Box::new(self.parse_statement()?))
                }
            },
            TokenKind::Vagarna => {
                self.advance();
                Some(Box::new(self.parse_statement()?))
            },
            _ => None,
        };

        Ok(Stmt::If(IfStmt {
            condition,
            then_branch,
            else_branch,
            span: keyword.span,
        }))
    }

    /// `'baraye' '(' (varDecl | exprStmt) expression ';' expression ')' statement`
    ///
    /// The reserved `ta` connective is tolerated (and discarded) at the
    /// clause boundaries of the header.
    fn parse_for(&mut self) -> Result<Stmt, ParseError> {
        let keyword = self.advance();
        self.expect(TokenKind::LParen)?;

        let init = if self.peek_kind().is_decl_keyword() {
            ForInit::Decl(self.parse_var_decl()?)
        } else {
            let expr = self.parse_expression()?;
            let span = expr.span();
            self.expect(TokenKind::Semicolon)?;
            ForInit::Expr(ExprStmt { expr, span })
        };

        self.skip_ta();
        let condition = self.parse_expression()?;
        self.skip_ta();
        self.expect(TokenKind::Semicolon)?;
        let increment = self.parse_expression()?;
        self.skip_ta();
        self.expect(TokenKind::RParen)?;
        let body = Box::new(self.parse_statement()?);

        Ok(Stmt::For(ForStmt {
            init,
            condition,
            increment,
            body,
            span: keyword.span,
        }))
    }

    /// `'vaghti' '(' expression ')' statement`
    fn parse_while(&mut self) -> Result<Stmt, ParseError> {
        let keyword = self.advance();
        self.expect(TokenKind::LParen)?;
        let condition = self.parse_expression()?;
        self.expect(TokenKind::RParen)?;
        let body = Box::new(self.parse_statement()?);
        Ok(Stmt::While(WhileStmt {
            condition,
            body,
            span: keyword.span,
        }))
    }

    /// `'{' statement* '}'`
    fn parse_block(&mut self) -> Result<Stmt, ParseError> {
        let open = self.advance();
        let mut statements = Vec::new();
        while !matches!(self.peek_kind(), TokenKind::RBrace | TokenKind::Eof) {
            statements.push(self.parse_statement()?);
        }
        self.expect(TokenKind::RBrace)?;
        Ok(Stmt::Block(Block {
            statements,
            span: open.span,
        }))
    }

    /// `expression ';'`
    fn parse_expr_stmt(&mut self) -> Result<Stmt, ParseError> {
        let expr = self.parse_expression()?;
        let span = expr.span();
        self.expect(TokenKind::Semicolon)?;
        Ok(Stmt::Expr(ExprStmt { expr, span }))
    }

    fn skip_ta(&mut self) {
        while self.eat(&TokenKind::Ta) {}
    }
}
