//! Pass 2 — dead-code removal.
//!
//! Two facts are collected up front: the set of names referenced by any
//! instruction (including identifiers inside `FOR_LOOP_START` fragments),
//! and the set of labels referenced by jumps. Then one linear sweep with
//! a reachability flag drops `DECLARE`s of never-referenced variables and
//! plain instructions sitting after an unconditional jump.
//!
//! Structural instructions are exempt from the sweep so brace nesting
//! stays balanced, and a `DECLARE` is only dropped when nothing else in
//! the list mentions the name — otherwise the emitted C++ would lose a
//! needed declaration.

use rustc_hash::FxHashSet;

use crate::ir::Instr;

/// Runs the dead-code pass.
pub fn remove_dead_code(ir: Vec<Instr>) -> Vec<Instr> {
    let used = collect_used_names(&ir);
    let referenced = collect_referenced_labels(&ir);

    let mut out = Vec::with_capacity(ir.len());
    let mut reachable = true;

    for instr in ir {
        match &instr {
            Instr::Label { name } => {
                if referenced.contains(name.as_str()) {
                    reachable = true;
                }
                out.push(instr);
            },
            _ if instr.is_structural() => out.push(instr),
            Instr::Declare { name, .. } => {
                if reachable && used.contains(name.as_str()) {
                    out.push(instr);
                }
            },
            Instr::Jump { .. } => {
                if reachable {
                    out.push(instr);
                    reachable = false;
                }
            },
            _ => {
                if reachable {
                    out.push(instr);
                }
            },
        }
    }

    out
}

/// Every name mentioned by any instruction, in any operand position.
fn collect_used_names(ir: &[Instr]) -> FxHashSet<String> {
    let mut used = FxHashSet::default();
    let mut add = |operand: &str, set: &mut FxHashSet<String>| {
        if super::is_name(operand) {
            set.insert(operand.to_string());
        }
    };

    for instr in ir {
        match instr {
            Instr::DeclareInit { name, value, .. } => {
                add(name, &mut used);
                add(value, &mut used);
            },
            Instr::Assign { name, value } => {
                add(name, &mut used);
                add(value, &mut used);
            },
            Instr::Binary { dest, lhs, rhs, .. } => {
                add(dest, &mut used);
                add(lhs, &mut used);
                add(rhs, &mut used);
            },
            Instr::Neg { dest, operand } => {
                add(dest, &mut used);
                add(operand, &mut used);
            },
            Instr::Load { dest, .. } => add(dest, &mut used),
            Instr::Input { name } => add(name, &mut used),
            Instr::Output { value } => add(value, &mut used),
            Instr::JumpIfFalse { cond, .. } => add(cond, &mut used),
            Instr::ForLoopStart { init, cond, incr } => {
                for fragment in [init, cond, incr] {
                    for ident in fragment_idents(fragment) {
                        used.insert(ident);
                    }
                }
            },
            _ => {},
        }
    }

    used
}

fn collect_referenced_labels(ir: &[Instr]) -> FxHashSet<String> {
    let mut referenced = FxHashSet::default();
    for instr in ir {
        match instr {
            Instr::Jump { target } | Instr::JumpIfFalse { target, .. } => {
                referenced.insert(target.clone());
            },
            _ => {},
        }
    }
    referenced
}

/// Extracts the identifiers occurring in a C++ fragment, so variables
/// referenced only from a `for` header still count as used.
fn fragment_idents(fragment: &str) -> Vec<String> {
    let mut idents = Vec::new();
    let mut chars = fragment.chars().peekable();
    while let Some(&c) = chars.peek() {
        if c.is_ascii_alphabetic() || c == '_' {
            let mut ident = String::new();
            while let Some(&c) = chars.peek() {
                if c.is_ascii_alphanumeric() || c == '_' {
                    ident.push(c);
                    chars.next();
                } else {
                    break;
                }
            }
            idents.push(ident);
        } else if c.is_ascii_digit() {
            // Swallow the whole numeric run so `1e5` does not surface a
            // phantom identifier.
            while let Some(&c) = chars.peek() {
                if c.is_ascii_alphanumeric() || c == '.' {
                    chars.next();
                } else {
                    break;
                }
            }
        } else {
            chars.next();
        }
    }
    idents
}
