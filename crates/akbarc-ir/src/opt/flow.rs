//! Pass 3 — control-flow simplification.
//!
//! Three rewrites repeat until nothing changes:
//!
//! 1. Jump threading: a jump whose target label is immediately followed
//!    by another unconditional jump is retargeted at the final label of
//!    the chain (a visited set guards against jump cycles).
//! 2. A `JUMP L` immediately followed by `LABEL L` is dropped.
//! 3. Labels referenced by no jump are dropped.
//!
//! Running to a fixpoint keeps the pass idempotent even for chains that
//! only become visible after an earlier rewrite.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::ir::Instr;

/// Runs the control-flow pass.
pub fn simplify_control_flow(mut ir: Vec<Instr>) -> Vec<Instr> {
    loop {
        let mut changed = false;

        changed |= thread_jumps(&mut ir);

        // Drop `JUMP L` directly followed by `LABEL L`.
        let mut next = Vec::with_capacity(ir.len());
        for (idx, instr) in ir.iter().enumerate() {
            if let Instr::Jump { target } = instr {
                if matches!(ir.get(idx + 1), Some(Instr::Label { name }) if name == target) {
                    changed = true;
                    continue;
                }
            }
            next.push(instr.clone());
        }
        ir = next;

        // Drop labels nothing jumps to.
        let referenced = referenced_labels(&ir);
        let before = ir.len();
        ir.retain(|instr| match instr {
            Instr::Label { name } => referenced.contains(name.as_str()),
            _ => true,
        });
        changed |= ir.len() != before;

        if !changed {
            return ir;
        }
    }
}

/// Retargets jumps that land on another unconditional jump. Returns true
/// if any target changed.
fn thread_jumps(ir: &mut [Instr]) -> bool {
    let label_index: FxHashMap<String, usize> = ir
        .iter()
        .enumerate()
        .filter_map(|(idx, instr)| match instr {
            Instr::Label { name } => Some((name.clone(), idx)),
            _ => None,
        })
        .collect();

    let resolve = |start: &str| -> String {
        let mut current = start.to_string();
        let mut visited: FxHashSet<String> = FxHashSet::default();
        while visited.insert(current.clone()) {
            let Some(&idx) = label_index.get(&current) else {
                break;
            };
            match ir.get(idx + 1) {
                Some(Instr::Jump { target }) => current = target.clone(),
                _ => break,
            }
        }
        current
    };

    let mut changed = false;
    let retargets: Vec<(usize, String)> = ir
        .iter()
        .enumerate()
        .filter_map(|(idx, instr)| {
            let target = match instr {
                Instr::Jump { target } => target,
                Instr::JumpIfFalse { target, .. } => target,
                _ => return None,
            };
            let resolved = resolve(target);
            (&resolved != target).then_some((idx, resolved))
        })
        .collect();

    for (idx, resolved) in retargets {
        changed = true;
        match &mut ir[idx] {
            Instr::Jump { target } | Instr::JumpIfFalse { target, .. } => *target = resolved,
            _ => unreachable!("retarget index points at a jump"),
        }
    }
    changed
}

fn referenced_labels(ir: &[Instr]) -> FxHashSet<String> {
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
