//! akbarc-lex - Lexical analyzer for AkbarLang.
//!
//! Transforms source text into a token stream terminated by a single
//! [`TokenKind::Eof`]. Whitespace separates tokens and is discarded; a `#`
//! starts a line comment. Keywords are Farsi transliterations (`sahih`,
//! `benvis`, `vaghti`, ...) and are recognized by lexing a maximal
//! identifier run and consulting the keyword table, which also resolves
//! the `vali`/`va`/`vagarna`/`vaghti` and `ya` prefix family to the
//! longest matching word.
//!
//! The lexer fails fast: the first malformed lexeme aborts tokenization
//! with a [`LexError`] carrying the line and column of the offending
//! character.

pub mod cursor;
mod lexer;

pub use cursor::Cursor;
pub use lexer::Lexer;

use akbarc_util::Span;
use std::fmt;
use thiserror::Error;

/// The closed set of token kinds.
///
/// Literal variants carry their parsed value; identifiers carry their
/// lexeme.
#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    // Keywords
    /// "sahih" - integer declaration
    Sahih,
    /// "ashar" - floating-point declaration
    Ashar,
    /// "harf" - character declaration
    Harf,
    /// "begir" - read from stdin
    Begir,
    /// "benvis" - write to stdout
    Benvis,
    /// "age" - if
    Age,
    /// "vali" - else (introduces an else branch; `vali age` is else-if)
    Vali,
    /// "vagarna" - alternative else keyword
    Vagarna,
    /// "baraye" - counted loop
    Baraye,
    /// "vaghti" - conditional loop
    Vaghti,
    /// "ta" - loop upper-bound connective (reserved)
    Ta,
    /// "va" - logical AND
    Va,
    /// "ya" - logical OR
    Ya,

    // Punctuation
    LParen,
    RParen,
    LBrace,
    RBrace,
    Semicolon,
    Comma,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    /// `=`
    Assign,
    /// `==`
    EqEq,
    /// `!=`
    NotEq,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `<=`
    LtEq,
    /// `>=`
    GtEq,

    // Literals
    Int(i64),
    Float(f64),
    Str(String),
    Char(char),

    /// Identifier carrying its lexeme.
    Ident(String),

    /// End of input. Exactly one per token stream, always last.
    Eof,
}

impl TokenKind {
    /// Returns true for the three declaration keywords.
    pub fn is_decl_keyword(&self) -> bool {
        matches!(self, TokenKind::Sahih | TokenKind::Ashar | TokenKind::Harf)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Sahih => write!(f, "`sahih`"),
            TokenKind::Ashar => write!(f, "`ashar`"),
            TokenKind::Harf => write!(f, "`harf`"),
            TokenKind::Begir => write!(f, "`begir`"),
            TokenKind::Benvis => write!(f, "`benvis`"),
            TokenKind::Age => write!(f, "`age`"),
            TokenKind::Vali => write!(f, "`vali`"),
            TokenKind::Vagarna => write!(f, "`vagarna`"),
            TokenKind::Baraye => write!(f, "`baraye`"),
            TokenKind::Vaghti => write!(f, "`vaghti`"),
            TokenKind::Ta => write!(f, "`ta`"),
            TokenKind::Va => write!(f, "`va`"),
            TokenKind::Ya => write!(f, "`ya`"),
            TokenKind::LParen => write!(f, "`(`"),
            TokenKind::RParen => write!(f, "`)`"),
            TokenKind::LBrace => write!(f, "`{{`"),
            TokenKind::RBrace => write!(f, "`}}`"),
            TokenKind::Semicolon => write!(f, "`;`"),
            TokenKind::Comma => write!(f, "`,`"),
            TokenKind::Plus => write!(f, "`+`"),
            TokenKind::Minus => write!(f, "`-`"),
            TokenKind::Star => write!(f, "`*`"),
            TokenKind::Slash => write!(f, "`/`"),
            TokenKind::Assign => write!(f, "`=`"),
            TokenKind::EqEq => write!(f, "`==`"),
            TokenKind::NotEq => write!(f, "`!=`"),
            TokenKind::Lt => write!(f, "`<`"),
            TokenKind::Gt => write!(f, "`>`"),
            TokenKind::LtEq => write!(f, "`<=`"),
            TokenKind::GtEq => write!(f, "`>=`"),
            TokenKind::Int(v) => write!(f, "integer literal `{}`", v),
            TokenKind::Float(v) => write!(f, "number literal `{}`", v),
            TokenKind::Str(_) => write!(f, "string literal"),
            TokenKind::Char(c) => write!(f, "character literal `'{}'`", c),
            TokenKind::Ident(name) => write!(f, "identifier `{}`", name),
            TokenKind::Eof => write!(f, "end of input"),
        }
    }
}

/// A token with its source position.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Looks up the keyword table. Returns `None` for ordinary identifiers.
pub fn keyword(ident: &str) -> Option<TokenKind> {
    match ident {
        "sahih" => Some(TokenKind::Sahih),
        "ashar" => Some(TokenKind::Ashar),
        "harf" => Some(TokenKind::Harf),
        "begir" => Some(TokenKind::Begir),
        "benvis" => Some(TokenKind::Benvis),
        "age" => Some(TokenKind::Age),
        "vali" => Some(TokenKind::Vali),
        "vagarna" => Some(TokenKind::Vagarna),
        "baraye" => Some(TokenKind::Baraye),
        "vaghti" => Some(TokenKind::Vaghti),
        "ta" => Some(TokenKind::Ta),
        "va" => Some(TokenKind::Va),
        "ya" => Some(TokenKind::Ya),
        _ => None,
    }
}

/// A lexical error. The lexer stops at the first one.
#[derive(Clone, Debug, Error, PartialEq)]
#[error("lexical error at line {line}, column {column}: {kind}")]
pub struct LexError {
    pub line: u32,
    pub column: u32,
    pub kind: LexErrorKind,
}

/// What went wrong while lexing.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum LexErrorKind {
    #[error("unexpected character `{0}`")]
    UnexpectedChar(char),

    #[error("unterminated string literal")]
    UnterminatedString,

    #[error("unterminated character literal")]
    UnterminatedChar,

    #[error("character literal must contain exactly one character")]
    InvalidCharLiteral,

    #[error("integer literal `{0}` is out of range")]
    IntOutOfRange(String),
}

/// Tokenizes `source` completely.
///
/// On success the returned vector ends with exactly one
/// [`TokenKind::Eof`] token and contains no whitespace or comment tokens.
pub fn lex(source: &str) -> Result<Vec<Token>, LexError> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token()?;
        let done = token.kind == TokenKind::Eof;
        tokens.push(token);
        if done {
            return Ok(tokens);
        }
    }
}
