//! Type scan over the IR.
//!
//! The emitter hoists all declarations to the top of `main`, so it first
//! needs a C++ type for every program variable and temporary. Variables
//! take their declared type from `DECLARE`/`DECLARE_INIT` (names that
//! only appear in `INPUT` default to `int`). Temporary types are
//! inferred in linear order: a literal load types by its rendering, an
//! arithmetic or negation result widens to `double` when either operand
//! resolves to `double`, and comparison or logical results are always
//! `int` (0 or 1).

use akbarc_ir::{is_temp_name, Instr};
use akbarc_par::VarType;
use indexmap::IndexMap;

/// The C++ types the emitter can declare.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CppType {
    Int,
    Char,
    Double,
    StdString,
}

impl CppType {
    pub fn name(&self) -> &'static str {
        match self {
            CppType::Int => "int",
            CppType::Char => "char",
            CppType::Double => "double",
            CppType::StdString => "std::string",
        }
    }

    fn from_decl(ty: VarType) -> Self {
        match ty {
            VarType::Int => CppType::Int,
            VarType::Float => CppType::Double,
            VarType::Char => CppType::Char,
        }
    }

    /// Precedence when a name would be typed more than once: string and
    /// double beat the numeric defaults.
    fn rank(&self) -> u8 {
        match self {
            CppType::Int => 0,
            CppType::Char => 1,
            CppType::Double => 2,
            CppType::StdString => 3,
        }
    }
}

/// Inferred declaration maps, in first-seen order.
#[derive(Debug, Default)]
pub struct TypeMap {
    pub vars: IndexMap<String, CppType>,
    pub temps: IndexMap<String, CppType>,
}

impl TypeMap {
    /// Scans the whole list. Variables are collected first so temporary
    /// inference can resolve variable operands.
    pub fn scan(ir: &[Instr]) -> Self {
        let mut map = TypeMap::default();

        for instr in ir {
            match instr {
                Instr::Declare { ty, name } | Instr::DeclareInit { ty, name, .. } => {
                    map.vars
                        .entry(name.clone())
                        .or_insert_with(|| CppType::from_decl(*ty));
                },
                Instr::Input { name } => {
                    map.vars.entry(name.clone()).or_insert(CppType::Int);
                },
                _ => {},
            }
        }

        for instr in ir {
            match instr {
                Instr::Load { dest, value } if is_temp_name(dest) => {
                    let ty = literal_type(value);
                    map.set_temp(dest, ty);
                },
                Instr::Binary { op, dest, lhs, rhs } if is_temp_name(dest) => {
                    let ty = if op.is_arithmetic() {
                        if map.operand_type(lhs) == CppType::Double
                            || map.operand_type(rhs) == CppType::Double
                        {
                            CppType::Double
                        } else {
                            CppType::Int
                        }
                    } else {
                        CppType::Int
                    };
                    map.set_temp(dest, ty);
                },
                Instr::Neg { dest, operand } if is_temp_name(dest) => {
                    let ty = match map.operand_type(operand) {
                        CppType::Double => CppType::Double,
                        _ => CppType::Int,
                    };
                    map.set_temp(dest, ty);
                },
                _ => {},
            }
        }

        map
    }

    fn set_temp(&mut self, name: &str, ty: CppType) {
        match self.temps.get_mut(name) {
            Some(existing) => {
                if ty.rank() > existing.rank() {
                    *existing = ty;
                }
            },
            None => {
                self.temps.insert(name.to_string(), ty);
            },
        }
    }

    /// Resolves an operand to its C++ type: temporaries and variables by
    /// lookup, literals by shape. Unknown names default to `int`.
    pub fn operand_type(&self, operand: &str) -> CppType {
        if is_temp_name(operand) {
            if let Some(&ty) = self.temps.get(operand) {
                return ty;
            }
        }
        if let Some(&ty) = self.vars.get(operand) {
            return ty;
        }
        if operand
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        {
            return CppType::Int;
        }
        literal_type(operand)
    }
}

/// Classifies a rendered literal operand.
fn literal_type(operand: &str) -> CppType {
    if operand.starts_with('"') {
        CppType::StdString
    } else if operand.starts_with('\'') {
        CppType::Char
    } else if operand.contains('.') || operand.contains('e') {
        CppType::Double
    } else {
        CppType::Int
    }
}
