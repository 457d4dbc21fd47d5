//! IR instruction definitions.
//!
//! The IR is a flat ordered list of three-address-style instructions.
//! Operands are plain strings: variable names, temporary names (`t0`,
//! `t1`, ...), literals already rendered in C++ syntax, or label names
//! (`L0`, `L1`, ...). Jumps reference labels by name, never by index.

use akbarc_par::VarType;
use std::fmt;

/// C++ spelling of a declared type.
pub fn cpp_type_name(ty: VarType) -> &'static str {
    match ty {
        VarType::Int => "int",
        VarType::Float => "double",
        VarType::Char => "char",
    }
}

/// Returns true for temporary names of the form `t<N>`.
pub fn is_temp_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next() == Some('t') && {
        let rest = chars.as_str();
        !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit())
    }
}

/// Binary opcodes. Arithmetic, comparison and logical groups behave
/// differently under folding and type inference, so the groups have
/// predicates below.
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
    And,
    Or,
}

impl BinOp {
    pub fn from_ast(op: akbarc_par::BinOp) -> Self {
        match op {
            akbarc_par::BinOp::Add => BinOp::Add,
            akbarc_par::BinOp::Sub => BinOp::Sub,
            akbarc_par::BinOp::Mul => BinOp::Mul,
            akbarc_par::BinOp::Div => BinOp::Div,
            akbarc_par::BinOp::Eq => BinOp::Eq,
            akbarc_par::BinOp::Ne => BinOp::Ne,
            akbarc_par::BinOp::Lt => BinOp::Lt,
            akbarc_par::BinOp::Gt => BinOp::Gt,
            akbarc_par::BinOp::Le => BinOp::Le,
            akbarc_par::BinOp::Ge => BinOp::Ge,
            akbarc_par::BinOp::And => BinOp::And,
            akbarc_par::BinOp::Or => BinOp::Or,
        }
    }

    pub fn is_arithmetic(&self) -> bool {
        matches!(self, BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div)
    }

    /// Comparisons produce 0 or 1.
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinOp::Eq | BinOp::Ne | BinOp::Lt | BinOp::Gt | BinOp::Le | BinOp::Ge
        )
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, BinOp::And | BinOp::Or)
    }

    /// Opcode mnemonic for dumps.
    pub fn opcode(&self) -> &'static str {
        match self {
            BinOp::Add => "ADD",
            BinOp::Sub => "SUB",
            BinOp::Mul => "MUL",
            BinOp::Div => "DIV",
            BinOp::Eq => "EQ",
            BinOp::Ne => "NEQ",
            BinOp::Lt => "LT",
            BinOp::Gt => "GT",
            BinOp::Le => "LE",
            BinOp::Ge => "GE",
            BinOp::And => "AND",
            BinOp::Or => "OR",
        }
    }

    /// The C++ operator this lowers to.
    pub fn cpp_symbol(&self) -> &'static str {
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
            BinOp::And => "&&",
            BinOp::Or => "||",
        }
    }
}

/// One IR instruction.
#[derive(Clone, Debug, PartialEq)]
pub enum Instr {
    /// Request a `#include <header>` in the emitted preamble.
    Include { header: String },

    /// Begin of the main body. Exactly one, before all statement-level
    /// instructions.
    MainBegin,

    /// End of the main body. Exactly one, after them.
    MainEnd,

    /// Declare a variable.
    Declare { ty: VarType, name: String },

    /// Declare and initialize.
    DeclareInit {
        ty: VarType,
        name: String,
        value: String,
    },

    /// Store a value operand into a named variable.
    Assign { name: String, value: String },

    /// Materialize a literal into a temporary.
    Load { dest: String, value: String },

    /// Arithmetic, comparison or logical operation.
    Binary {
        op: BinOp,
        dest: String,
        lhs: String,
        rhs: String,
    },

    /// Arithmetic negation.
    Neg { dest: String, operand: String },

    /// Read from stdin into a named variable.
    Input { name: String },

    /// Write a value operand to stdout.
    Output { value: String },

    /// Jump target.
    Label { name: String },

    /// Unconditional jump.
    Jump { target: String },

    /// Jump when the condition operand is false.
    JumpIfFalse { cond: String, target: String },

    /// Emit `{`.
    ScopeBegin,

    /// Emit `}`.
    ScopeEnd,

    /// Emit a C++ `for (init; cond; incr) {` header. The three clauses
    /// are C++ source fragments rendered from the loop's AST fields.
    ForLoopStart {
        init: String,
        cond: String,
        incr: String,
    },

    /// Close the corresponding `for`.
    ForLoopEnd,
}

impl Instr {
    /// Destination of a value-producing instruction.
    pub fn dest(&self) -> Option<&str> {
        match self {
            Instr::Load { dest, .. }
            | Instr::Binary { dest, .. }
            | Instr::Neg { dest, .. } => Some(dest),
            _ => None,
        }
    }

    /// Structural instructions frame the output and are never removed by
    /// optimization passes, so brace nesting stays balanced.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Instr::Include { .. }
                | Instr::MainBegin
                | Instr::MainEnd
                | Instr::ScopeBegin
                | Instr::ScopeEnd
                | Instr::ForLoopStart { .. }
                | Instr::ForLoopEnd
        )
    }
}

impl fmt::Display for Instr {
    /// Textual dump form: `OPCODE operand, operand`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instr::Include { header } => write!(f, "INCLUDE {}", header),
            Instr::MainBegin => write!(f, "MAIN_BEGIN"),
            Instr::MainEnd => write!(f, "MAIN_END"),
            Instr::Declare { ty, name } => {
                write!(f, "DECLARE {}, {}", cpp_type_name(*ty), name)
            },
            Instr::DeclareInit { ty, name, value } => {
                write!(f, "DECLARE_INIT {}, {}, {}", cpp_type_name(*ty), name, value)
            },
            Instr::Assign { name, value } => write!(f, "ASSIGN {}, {}", name, value),
            Instr::Load { dest, value } => write!(f, "LOAD {}, {}", dest, value),
            Instr::Binary { op, dest, lhs, rhs } => {
                write!(f, "{} {}, {}, {}", op.opcode(), dest, lhs, rhs)
            },
            Instr::Neg { dest, operand } => write!(f, "NEG {}, {}", dest, operand),
            Instr::Input { name } => write!(f, "INPUT {}", name),
            Instr::Output { value } => write!(f, "OUTPUT {}", value),
            Instr::Label { name } => write!(f, "LABEL {}", name),
            Instr::Jump { target } => write!(f, "JUMP {}", target),
            Instr::JumpIfFalse { cond, target } => {
                write!(f, "JUMP_IF_FALSE {}, {}", cond, target)
            },
            Instr::ScopeBegin => write!(f, "SCOPE_BEGIN"),
            Instr::ScopeEnd => write!(f, "SCOPE_END"),
            Instr::ForLoopStart { init, cond, incr } => {
                write!(f, "FOR_LOOP_START {}; {}; {}", init, cond, incr)
            },
            Instr::ForLoopEnd => write!(f, "FOR_LOOP_END"),
        }
    }
}

/// Renders a float the way emitted C++ expects it: always with a decimal
/// point or exponent, so it cannot be mistaken for an integer literal.
pub fn render_float(value: f64) -> String {
    // Debug formatting of finite f64 always includes `.` or `e`.
    format!("{:?}", value)
}
