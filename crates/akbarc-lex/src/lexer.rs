//! Core lexer implementation.
//!
//! One method per lexeme class, dispatched from [`Lexer::next_token`].

use akbarc_util::Span;

use crate::cursor::Cursor;
use crate::{keyword, LexError, LexErrorKind, Token, TokenKind};

/// Lexer for AkbarLang source text.
pub struct Lexer<'a> {
    /// Character cursor for source traversal.
    cursor: Cursor<'a>,

    /// Starting byte offset of the current token.
    token_start: usize,

    /// Line where the current token starts (1-based).
    token_start_line: u32,

    /// Column where the current token starts (1-based).
    token_start_column: u32,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given source.
    pub fn new(source: &'a str) -> Self {
        Self {
            cursor: Cursor::new(source),
            token_start: 0,
            token_start_line: 1,
            token_start_column: 1,
        }
    }

    /// Returns the next token, or [`TokenKind::Eof`] at the end.
    ///
    /// Skips whitespace and `#` line comments, then dispatches on the
    /// current character.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace_and_comments();

        self.token_start = self.cursor.position();
        self.token_start_line = self.cursor.line();
        self.token_start_column = self.cursor.column();

        if self.cursor.is_at_end() {
            return Ok(self.token(TokenKind::Eof));
        }

        match self.cursor.current_char() {
            '(' => {
                self.cursor.advance();
                Ok(self.token(TokenKind::LParen))
            },
            ')' => {
                self.cursor.advance();
                Ok(self.token(TokenKind::RParen))
            },
            '{' => {
                self.cursor.advance();
                Ok(self.token(TokenKind::LBrace))
            },
            '}' => {
                self.cursor.advance();
                Ok(self.token(TokenKind::RBrace))
            },
            ';' => {
                self.cursor.advance();
                Ok(self.token(TokenKind::Semicolon))
            },
            ',' => {
                self.cursor.advance();
                Ok(self.token(TokenKind::Comma))
            },
            '+' => {
                self.cursor.advance();
                Ok(self.token(TokenKind::Plus))
            },
            '-' => {
                self.cursor.advance();
                Ok(self.token(TokenKind::Minus))
            },
            '*' => {
                self.cursor.advance();
                Ok(self.token(TokenKind::Star))
            },
            '/' => {
                self.cursor.advance();
                Ok(self.token(TokenKind::Slash))
            },
            '=' => {
                self.cursor.advance();
                if self.cursor.match_char('=') {
                    Ok(self.token(TokenKind::EqEq))
                } else {
                    Ok(self.token(TokenKind::Assign))
                }
            },
            '<' => {
                self.cursor.advance();
                if self.cursor.match_char('=') {
                    Ok(self.token(TokenKind::LtEq))
                } else {
                    Ok(self.token(TokenKind::Lt))
                }
            },
            '>' => {
                self.cursor.advance();
                if self.cursor.match_char('=') {
                    Ok(self.token(TokenKind::GtEq))
                } else {
                    Ok(self.token(TokenKind::Gt))
                }
            },
            '!' => {
                self.cursor.advance();
                if self.cursor.match_char('=') {
                    Ok(self.token(TokenKind::NotEq))
                } else {
                    // The language has no logical not.
                    Err(self.error(LexErrorKind::UnexpectedChar('!')))
                }
            },
            '"' => self.lex_string(),
            '\'' => self.lex_char(),
            c if c.is_ascii_digit() => self.lex_number(),
            c if is_ident_start(c) => Ok(self.lex_identifier()),
            c => {
                self.cursor.advance();
                Err(self.error(LexErrorKind::UnexpectedChar(c)))
            },
        }
    }

    /// Skips whitespace and `#` line comments. Newlines advance the line
    /// counter through the cursor.
    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.cursor.current_char() {
                ' ' | '\t' | '\r' | '\n' => self.cursor.advance(),
                '#' => {
                    while !self.cursor.is_at_end() && self.cursor.current_char() != '\n' {
                        self.cursor.advance();
                    }
                },
                _ => return,
            }
        }
    }

    /// Lexes a number literal.
    ///
    /// A maximal digit run is an integer; a digit run followed by `.` and
    /// at least one more digit is a float. The value is parsed here.
    fn lex_number(&mut self) -> Result<Token, LexError> {
        while self.cursor.current_char().is_ascii_digit() {
            self.cursor.advance();
        }

        let is_float =
            self.cursor.current_char() == '.' && self.cursor.peek_char(1).is_ascii_digit();
        if is_float {
            self.cursor.advance(); // '.'
            while self.cursor.current_char().is_ascii_digit() {
                self.cursor.advance();
            }
        }

        let text = self.cursor.slice_from(self.token_start);
        if is_float {
            // digits '.' digits always parses
            let value: f64 = text.parse().unwrap_or(0.0);
            Ok(self.token(TokenKind::Float(value)))
        } else {
            match text.parse::<i64>() {
                Ok(value) => Ok(self.token(TokenKind::Int(value))),
                Err(_) => Err(self.error(LexErrorKind::IntOutOfRange(text.to_string()))),
            }
        }
    }

    /// Lexes a string literal. Interior newlines are permitted; the
    /// captured value excludes the quotes.
    fn lex_string(&mut self) -> Result<Token, LexError> {
        self.cursor.advance(); // opening '"'
        let content_start = self.cursor.position();

        while !self.cursor.is_at_end() && self.cursor.current_char() != '"' {
            self.cursor.advance();
        }
        if self.cursor.is_at_end() {
            return Err(self.error(LexErrorKind::UnterminatedString));
        }

        let value = self.cursor.slice_from(content_start).to_string();
        self.cursor.advance(); // closing '"'
        Ok(self.token(TokenKind::Str(value)))
    }

    /// Lexes a character literal: exactly one character between quotes.
    fn lex_char(&mut self) -> Result<Token, LexError> {
        self.cursor.advance(); // opening '\''

        if self.cursor.is_at_end() {
            return Err(self.error(LexErrorKind::UnterminatedChar));
        }
        if self.cursor.current_char() == '\'' {
            self.cursor.advance();
            return Err(self.error(LexErrorKind::InvalidCharLiteral));
        }

        let value = self.cursor.current_char();
        self.cursor.advance();

        if self.cursor.is_at_end() {
            return Err(self.error(LexErrorKind::UnterminatedChar));
        }
        if self.cursor.current_char() != '\'' {
            return Err(self.error(LexErrorKind::InvalidCharLiteral));
        }
        self.cursor.advance(); // closing '\''
        Ok(self.token(TokenKind::Char(value)))
    }

    /// Lexes a maximal identifier run and resolves it against the keyword
    /// table. This yields the longest matching keyword for the `va`/`ya`
    /// prefix family without special cases.
    fn lex_identifier(&mut self) -> Token {
        while is_ident_continue(self.cursor.current_char()) {
            self.cursor.advance();
        }
        let text = self.cursor.slice_from(self.token_start);
        match keyword(text) {
            Some(kind) => self.token(kind),
            None => self.token(TokenKind::Ident(text.to_string())),
        }
    }

    fn token(&self, kind: TokenKind) -> Token {
        Token::new(
            kind,
            Span::new(
                self.token_start,
                self.cursor.position(),
                self.token_start_line,
                self.token_start_column,
            ),
        )
    }

    fn error(&self, kind: LexErrorKind) -> LexError {
        LexError {
            line: self.token_start_line,
            column: self.token_start_column,
            kind,
        }
    }
}

/// ASCII letters and underscore start an identifier.
fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

/// ASCII letters, digits and underscore continue one.
fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lex;

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex(source).unwrap().into_iter().map(|t| t.kind).collect()
    }

    fn err(source: &str) -> LexError {
        lex(source).unwrap_err()
    }

    #[test]
    fn test_punctuation_and_operators() {
        assert_eq!(
            kinds("( ) { } ; , + - * /"),
            vec![
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::LBrace,
                TokenKind::RBrace,
                TokenKind::Semicolon,
                TokenKind::Comma,
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Star,
                TokenKind::Slash,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_two_char_operators() {
        assert_eq!(
            kinds("= == != < <= > >="),
            vec![
                TokenKind::Assign,
                TokenKind::EqEq,
                TokenKind::NotEq,
                TokenKind::Lt,
                TokenKind::LtEq,
                TokenKind::Gt,
                TokenKind::GtEq,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_adjacent_equals() {
        // `===` lexes greedily as `==` then `=`.
        assert_eq!(
            kinds("==="),
            vec![TokenKind::EqEq, TokenKind::Assign, TokenKind::Eof]
        );
    }

    #[test]
    fn test_lone_bang_is_an_error() {
        let e = err("!x");
        assert_eq!(e.kind, LexErrorKind::UnexpectedChar('!'));
        assert_eq!((e.line, e.column), (1, 1));
    }

    #[test]
    fn test_integer_literal() {
        assert_eq!(kinds("42"), vec![TokenKind::Int(42), TokenKind::Eof]);
        assert_eq!(kinds("0"), vec![TokenKind::Int(0), TokenKind::Eof]);
    }

    #[test]
    fn test_float_literal() {
        assert_eq!(kinds("3.14"), vec![TokenKind::Float(3.14), TokenKind::Eof]);
    }

    #[test]
    fn test_dot_without_following_digit_is_not_a_float() {
        // `5.` is an integer followed by an unexpected `.`.
        let e = err("5.");
        assert_eq!(e.kind, LexErrorKind::UnexpectedChar('.'));
    }

    #[test]
    fn test_integer_out_of_range() {
        let e = err("99999999999999999999");
        assert!(matches!(e.kind, LexErrorKind::IntOutOfRange(_)));
    }

    #[test]
    fn test_string_literal() {
        assert_eq!(
            kinds("\"Hello, World!\""),
            vec![TokenKind::Str("Hello, World!".into()), TokenKind::Eof]
        );
    }

    #[test]
    fn test_string_with_interior_newline() {
        let tokens = lex("\"a\nb\" x").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Str("a\nb".into()));
        // The identifier after the literal sits on line 2.
        assert_eq!(tokens[1].span.line, 2);
        assert_eq!(tokens[1].span.column, 4);
    }

    #[test]
    fn test_unterminated_string() {
        assert_eq!(err("\"abc").kind, LexErrorKind::UnterminatedString);
    }

    #[test]
    fn test_char_literal() {
        assert_eq!(kinds("'a'"), vec![TokenKind::Char('a'), TokenKind::Eof]);
    }

    #[test]
    fn test_bad_char_literals() {
        assert_eq!(err("''").kind, LexErrorKind::InvalidCharLiteral);
        assert_eq!(err("'ab'").kind, LexErrorKind::InvalidCharLiteral);
        assert_eq!(err("'a").kind, LexErrorKind::UnterminatedChar);
        assert_eq!(err("'").kind, LexErrorKind::UnterminatedChar);
    }

    #[test]
    fn test_line_comment_produces_no_token() {
        assert_eq!(
            kinds("# a comment\nsahih # trailing\n"),
            vec![TokenKind::Sahih, TokenKind::Eof]
        );
    }

    #[test]
    fn test_comment_at_end_without_newline() {
        assert_eq!(kinds("# just a comment"), vec![TokenKind::Eof]);
    }

    #[test]
    fn test_identifier_with_digits_and_underscore() {
        assert_eq!(
            kinds("_tmp x2 foo_bar"),
            vec![
                TokenKind::Ident("_tmp".into()),
                TokenKind::Ident("x2".into()),
                TokenKind::Ident("foo_bar".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_token_positions() {
        let tokens = lex("sahih x =\n  5;").unwrap();
        let spans: Vec<(u32, u32)> = tokens.iter().map(|t| (t.span.line, t.span.column)).collect();
        assert_eq!(
            spans,
            vec![(1, 1), (1, 7), (1, 9), (2, 3), (2, 4), (2, 5)]
        );
    }

    #[test]
    fn test_crlf_is_whitespace() {
        let tokens = lex("sahih\r\nx").unwrap();
        assert_eq!(tokens[1].span.line, 2);
        assert_eq!(tokens[1].span.column, 1);
    }

    #[test]
    fn test_unexpected_character_position() {
        let e = err("sahih x;\n  @");
        assert_eq!(e.kind, LexErrorKind::UnexpectedChar('@'));
        assert_eq!((e.line, e.column), (2, 3));
    }

    #[test]
    fn test_full_statement() {
        assert_eq!(
            kinds("baraye (sahih i = 1; i <= n; i = i + 1) { f = f * i; }"),
            vec![
                TokenKind::Baraye,
                TokenKind::LParen,
                TokenKind::Sahih,
                TokenKind::Ident("i".into()),
                TokenKind::Assign,
                TokenKind::Int(1),
                TokenKind::Semicolon,
                TokenKind::Ident("i".into()),
                TokenKind::LtEq,
                TokenKind::Ident("n".into()),
                TokenKind::Semicolon,
                TokenKind::Ident("i".into()),
                TokenKind::Assign,
                TokenKind::Ident("i".into()),
                TokenKind::Plus,
                TokenKind::Int(1),
                TokenKind::RParen,
                TokenKind::LBrace,
                TokenKind::Ident("f".into()),
                TokenKind::Assign,
                TokenKind::Ident("f".into()),
                TokenKind::Star,
                TokenKind::Ident("i".into()),
                TokenKind::Semicolon,
                TokenKind::RBrace,
                TokenKind::Eof,
            ]
        );
    }
}
