//! AST node definitions.
//!
//! The tree is strictly parent-less with downward ownership. Every node
//! carries the span of its defining token for diagnostics.

use akbarc_util::Span;

/// Declared type tag of a variable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VarType {
    Int,
    Float,
    Char,
}

impl std::fmt::Display for VarType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VarType::Int => write!(f, "sahih"),
            VarType::Float => write!(f, "ashar"),
            VarType::Char => write!(f, "harf"),
        }
    }
}

/// AST root - an ordered list of statements forming the implicit main body.
#[derive(Clone, Debug, PartialEq)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

/// Statement variants.
#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    /// Variable declaration with optional initializer
    VarDecl(VarDecl),

    /// Read-from-stdin statement (`begir`)
    Input(InputStmt),

    /// Write-to-stdout statement (`benvis`)
    Output(OutputStmt),

    /// Conditional (`age` / `vali` / `vagarna`)
    If(IfStmt),

    /// Counted loop (`baraye`)
    For(ForStmt),

    /// Conditional loop (`vaghti`)
    While(WhileStmt),

    /// Brace-delimited statement list
    Block(Block),

    /// Expression statement
    Expr(ExprStmt),
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::VarDecl(s) => s.span,
            Stmt::Input(s) => s.span,
            Stmt::Output(s) => s.span,
            Stmt::If(s) => s.span,
            Stmt::For(s) => s.span,
            Stmt::While(s) => s.span,
            Stmt::Block(s) => s.span,
            Stmt::Expr(s) => s.span,
        }
    }
}

/// Variable declaration
#[derive(Clone, Debug, PartialEq)]
pub struct VarDecl {
    pub ty: VarType,
    pub name: String,
    pub init: Option<Expr>,
    pub span: Span,
}

/// Input statement
#[derive(Clone, Debug, PartialEq)]
pub struct InputStmt {
    pub name: String,
    pub span: Span,
}

/// Output statement
#[derive(Clone, Debug, PartialEq)]
pub struct OutputStmt {
    pub value: Expr,
    pub span: Span,
}

/// Conditional statement. An else-if chain is a nested `If` in
/// `else_branch`.
#[derive(Clone, Debug, PartialEq)]
pub struct IfStmt {
    pub condition: Expr,
    pub then_branch: Box<Stmt>,
    pub else_branch: Option<Box<Stmt>>,
    pub span: Span,
}

/// The initializer clause of a counted loop: either a declaration or an
/// expression statement, both including their terminating `;` in the
/// concrete syntax.
#[derive(Clone, Debug, PartialEq)]
pub enum ForInit {
    Decl(VarDecl),
    Expr(ExprStmt),
}

/// Counted loop
#[derive(Clone, Debug, PartialEq)]
pub struct ForStmt {
    pub init: ForInit,
    pub condition: Expr,
    pub increment: Expr,
    pub body: Box<Stmt>,
    pub span: Span,
}

/// Conditional loop
#[derive(Clone, Debug, PartialEq)]
pub struct WhileStmt {
    pub condition: Expr,
    pub body: Box<Stmt>,
    pub span: Span,
}

/// Statement list in braces. Blocks do not open a scope; the language has
/// a single flat one.
#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    pub statements: Vec<Stmt>,
    pub span: Span,
}

/// Expression statement
#[derive(Clone, Debug, PartialEq)]
pub struct ExprStmt {
    pub expr: Expr,
    pub span: Span,
}

/// Expression variants.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Assign(AssignExpr),
    Binary(BinaryExpr),
    Unary(UnaryExpr),
    Var(VarExpr),
    Literal(LiteralExpr),
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Assign(e) => e.span,
            Expr::Binary(e) => e.span,
            Expr::Unary(e) => e.span,
            Expr::Var(e) => e.span,
            Expr::Literal(e) => e.span,
        }
    }
}

/// Assignment to a named variable. Its value is the assigned name.
#[derive(Clone, Debug, PartialEq)]
pub struct AssignExpr {
    pub name: String,
    pub value: Box<Expr>,
    pub span: Span,
}

/// Binary operators, lowest-precedence first in the grammar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    /// `va`
    And,
    /// `ya`
    Or,
}

impl BinOp {
    /// Returns true for `+ - * /`.
    pub fn is_arithmetic(&self) -> bool {
        matches!(self, BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div)
    }

    /// Returns true for `< > <= >=`.
    pub fn is_ordering(&self) -> bool {
        matches!(self, BinOp::Lt | BinOp::Gt | BinOp::Le | BinOp::Ge)
    }

    /// Returns true for `==` and `!=`.
    pub fn is_equality(&self) -> bool {
        matches!(self, BinOp::Eq | BinOp::Ne)
    }

    /// Returns true for `va` and `ya`.
    pub fn is_logical(&self) -> bool {
        matches!(self, BinOp::And | BinOp::Or)
    }

    /// Surface spelling, for diagnostics.
    pub fn symbol(&self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Lt => "<",
            BinOp::Gt => ">",
            BinOp::Le => "<=",
            BinOp::Ge => ">=",
            BinOp::And => "va",
            BinOp::Or => "ya",
        }
    }
}

/// Unary operators. Arithmetic negation is the only one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnOp {
    Neg,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BinaryExpr {
    pub op: BinOp,
    pub lhs: Box<Expr>,
    pub rhs: Box<Expr>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct UnaryExpr {
    pub op: UnOp,
    pub operand: Box<Expr>,
    pub span: Span,
}

/// Reference to a named variable.
#[derive(Clone, Debug, PartialEq)]
pub struct VarExpr {
    pub name: String,
    pub span: Span,
}

/// Literal value with its category tag carried by the variant.
#[derive(Clone, Debug, PartialEq)]
pub enum LitValue {
    Int(i64),
    Float(f64),
    Str(String),
    Char(char),
}

#[derive(Clone, Debug, PartialEq)]
pub struct LiteralExpr {
    pub value: LitValue,
    pub span: Span,
}
