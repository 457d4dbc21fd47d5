//! akbarc-gen - C++ code emitter.
//!
//! Consumes the (optimized) IR list and returns one UTF-8 string holding
//! a standalone C++11 translation unit. Two passes: a type scan
//! ([`types::TypeMap`]) that decides the hoisted declaration block, then
//! a linear walk translating each instruction into one line at the
//! running indentation level. The emitter is total: every instruction
//! variant has a rendering, and IR that satisfies the stage invariants
//! cannot make it fail.

pub mod types;

use akbarc_ir::Instr;
pub use types::{CppType, TypeMap};

const INDENT: &str = "  ";

/// Emits the final C++ source for an IR list.
pub fn emit(ir: &[Instr]) -> String {
    let types = TypeMap::scan(ir);
    let mut out = String::new();

    // Fixed preamble; INCLUDE and MAIN_BEGIN/MAIN_END are implied by it.
    out.push_str("#include <iostream>\n");
    out.push_str("#include <string>\n");
    out.push('\n');
    out.push_str("int main() {\n");

    if !types.vars.is_empty() || !types.temps.is_empty() {
        for (name, ty) in &types.vars {
            push_line(&mut out, 1, &format!("{} {};", ty.name(), name));
        }
        for (name, ty) in &types.temps {
            push_line(&mut out, 1, &format!("{} {};", ty.name(), name));
        }
        out.push('\n');
    }

    let mut level: usize = 1;
    for instr in ir {
        match instr {
            // Handled by the preamble and the declaration block.
            Instr::Include { .. } | Instr::MainBegin | Instr::MainEnd => {},
            Instr::Declare { .. } => {},
            Instr::DeclareInit { name, value, .. } | Instr::Assign { name, value } => {
                push_line(&mut out, level, &format!("{} = {};", name, value));
            },
            Instr::Load { dest, value } => {
                push_line(&mut out, level, &format!("{} = {};", dest, value));
            },
            Instr::Binary { op, dest, lhs, rhs } => {
                push_line(
                    &mut out,
                    level,
                    &format!("{} = {} {} {};", dest, lhs, op.cpp_symbol(), rhs),
                );
            },
            Instr::Neg { dest, operand } => {
                push_line(&mut out, level, &format!("{} = -{};", dest, operand));
            },
            Instr::Input { name } => {
                push_line(&mut out, level, &format!("std::cin >> {};", name));
            },
            Instr::Output { value } => {
                push_line(
                    &mut out,
                    level,
                    &format!("std::cout << {} << std::endl;", value),
                );
            },
            // The null statement keeps a label legal right before `}`.
            Instr::Label { name } => {
                push_line(&mut out, level, &format!("{}:;", name));
            },
            Instr::Jump { target } => {
                push_line(&mut out, level, &format!("goto {};", target));
            },
            Instr::JumpIfFalse { cond, target } => {
                push_line(&mut out, level, &format!("if (!({})) goto {};", cond, target));
            },
            Instr::ScopeBegin => {
                push_line(&mut out, level, "{");
                level += 1;
            },
            Instr::ScopeEnd => {
                level = level.saturating_sub(1).max(1);
                push_line(&mut out, level, "}");
            },
            Instr::ForLoopStart { init, cond, incr } => {
                push_line(
                    &mut out,
                    level,
                    &format!("for ({}; {}; {}) {{", init, cond, incr),
                );
                level += 1;
            },
            Instr::ForLoopEnd => {
                level = level.saturating_sub(1).max(1);
                push_line(&mut out, level, "}");
            },
        }
    }

    push_line(&mut out, 1, "return 0;");
    out.push_str("}\n");
    out
}

fn push_line(out: &mut String, level: usize, line: &str) {
    for _ in 0..level {
        out.push_str(INDENT);
    }
    out.push_str(line);
    out.push('\n');
}
