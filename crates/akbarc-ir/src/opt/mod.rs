//! IR optimization passes.
//!
//! Three passes run in order over the linear list, each producing a new
//! list: constant folding, dead-code removal, control-flow
//! simplification. All three are conservative — they never change the
//! observable input/output behavior of a valid program — and the whole
//! sequence is idempotent: optimizing twice emits the same C++ as
//! optimizing once.

mod dce;
mod flow;
mod fold;

pub use dce::remove_dead_code;
pub use flow::simplify_control_flow;
pub use fold::fold_constants;

use crate::ir::Instr;

/// Runs the pass sequence until the list stops changing. A flow rewrite
/// can expose another fold (a dropped label was a merge point), so a
/// single round is not a fixed point for arbitrary input.
pub fn optimize(mut ir: Vec<Instr>) -> Vec<Instr> {
    loop {
        let next = simplify_control_flow(remove_dead_code(fold_constants(ir.clone())));
        if next == ir {
            return ir;
        }
        ir = next;
    }
}

/// Returns true when `operand` is an identifier (variable or temporary)
/// rather than a rendered literal.
fn is_name(operand: &str) -> bool {
    operand
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use akbarc_lex::lex;
    use akbarc_par::parse;

    fn optimized(source: &str) -> Vec<Instr> {
        optimize(crate::lower(&parse(lex(source).unwrap()).unwrap()))
    }

    #[test]
    fn test_optimize_is_idempotent() {
        for source in [
            "benvis(\"Hello, World!\");",
            "sahih x = 2 + 3 * 4; benvis(x);",
            "sahih a = 10; age (a > 5) { benvis(\"big\"); } vagarna { benvis(\"small\"); }",
            "sahih n = 3; vaghti (n > 0) { benvis(n); n = n - 1; }",
            "sahih n; begir(n); sahih f = 1; baraye (sahih i = 1; i <= n; i = i + 1) { f = f * i; } benvis(f);",
            "age (1) age (2) age (3) benvis(1); vali benvis(2); vali benvis(3); vali benvis(4);",
        ] {
            let once = optimized(source);
            let twice = optimize(once.clone());
            assert_eq!(once, twice, "optimizer not idempotent for: {}", source);
        }
    }

    #[test]
    fn test_operand_name_detection() {
        assert!(is_name("x"));
        assert!(is_name("t0"));
        assert!(is_name("_v"));
        assert!(!is_name("42"));
        assert!(!is_name("-1"));
        assert!(!is_name("1.5"));
        assert!(!is_name("\"s\""));
        assert!(!is_name("'c'"));
    }
}
