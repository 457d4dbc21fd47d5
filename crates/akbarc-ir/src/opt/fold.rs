//! Pass 1 — constant folding.
//!
//! Walks the list once with a map from name to known compile-time value.
//! Arithmetic, comparison and negation instructions whose operands are
//! all known evaluate now and become `LOAD dest, <result>`; `LOAD` of a
//! numeric literal records its value; `ASSIGN name, v` propagates a known
//! `v` into `name` and invalidates `name` otherwise.
//!
//! Soundness: non-temporary entries are forgotten at every label and loop
//! boundary (control may re-enter with different values) and on `INPUT`.
//! Temporaries are single-assignment and survive. Folds that would
//! overflow an integer, divide an integer by zero, or produce a
//! non-finite float are skipped — the computation stays in the emitted
//! program.

use rustc_hash::FxHashMap;

use crate::ir::{is_temp_name, render_float, BinOp, Instr};

/// A known compile-time value.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Value {
    Int(i64),
    Float(f64),
}

impl Value {
    fn as_f64(self) -> f64 {
        match self {
            Value::Int(v) => v as f64,
            Value::Float(v) => v,
        }
    }

    fn render(self) -> String {
        match self {
            Value::Int(v) => v.to_string(),
            Value::Float(v) => render_float(v),
        }
    }
}

/// Runs the folding pass.
pub fn fold_constants(ir: Vec<Instr>) -> Vec<Instr> {
    let mut known: FxHashMap<String, Value> = FxHashMap::default();
    let mut out = Vec::with_capacity(ir.len());

    for instr in ir {
        match instr {
            Instr::Load { dest, value } => {
                if let Some(v) = parse_literal(&value) {
                    known.insert(dest.clone(), v);
                }
                out.push(Instr::Load { dest, value });
            },
            Instr::Binary { op, dest, lhs, rhs } => {
                let folded = resolve(&known, &lhs)
                    .zip(resolve(&known, &rhs))
                    .and_then(|(l, r)| eval_binary(op, l, r));
                match folded {
                    Some(v) => {
                        known.insert(dest.clone(), v);
                        out.push(Instr::Load {
                            dest,
                            value: v.render(),
                        });
                    },
                    None => out.push(Instr::Binary { op, dest, lhs, rhs }),
                }
            },
            Instr::Neg { dest, operand } => {
                match resolve(&known, &operand).and_then(eval_neg) {
                    Some(v) => {
                        known.insert(dest.clone(), v);
                        out.push(Instr::Load {
                            dest,
                            value: v.render(),
                        });
                    },
                    None => out.push(Instr::Neg { dest, operand }),
                }
            },
            Instr::Assign { name, value } => {
                match resolve(&known, &value) {
                    Some(v) => known.insert(name.clone(), v),
                    None => known.remove(&name),
                };
                out.push(Instr::Assign { name, value });
            },
            Instr::DeclareInit { ty, name, value } => {
                match resolve(&known, &value) {
                    Some(v) => known.insert(name.clone(), v),
                    None => known.remove(&name),
                };
                out.push(Instr::DeclareInit { ty, name, value });
            },
            Instr::Input { name } => {
                known.remove(&name);
                out.push(Instr::Input { name });
            },
            Instr::Label { .. } | Instr::ForLoopStart { .. } | Instr::ForLoopEnd => {
                // Control can reach here again: forget everything a later
                // iteration or another path may have changed.
                known.retain(|name, _| is_temp_name(name));
                out.push(instr);
            },
            other => out.push(other),
        }
    }

    out
}

/// Parses a rendered numeric literal. Strings and characters are not
/// compile-time values here.
fn parse_literal(operand: &str) -> Option<Value> {
    if let Ok(v) = operand.parse::<i64>() {
        return Some(Value::Int(v));
    }
    operand.parse::<f64>().ok().map(Value::Float)
}

fn resolve(known: &FxHashMap<String, Value>, operand: &str) -> Option<Value> {
    if super::is_name(operand) {
        known.get(operand).copied()
    } else {
        parse_literal(operand)
    }
}

fn eval_binary(op: BinOp, lhs: Value, rhs: Value) -> Option<Value> {
    if op.is_logical() {
        return None;
    }

    if let (Value::Int(a), Value::Int(b)) = (lhs, rhs) {
        return match op {
            BinOp::Add => a.checked_add(b).map(Value::Int),
            BinOp::Sub => a.checked_sub(b).map(Value::Int),
            BinOp::Mul => a.checked_mul(b).map(Value::Int),
            BinOp::Div => a.checked_div(b).map(Value::Int),
            BinOp::Eq => Some(bool_value(a == b)),
            BinOp::Ne => Some(bool_value(a != b)),
            BinOp::Lt => Some(bool_value(a < b)),
            BinOp::Gt => Some(bool_value(a > b)),
            BinOp::Le => Some(bool_value(a <= b)),
            BinOp::Ge => Some(bool_value(a >= b)),
            BinOp::And | BinOp::Or => None,
        };
    }

    let (a, b) = (lhs.as_f64(), rhs.as_f64());
    match op {
        BinOp::Add => finite(a + b),
        BinOp::Sub => finite(a - b),
        BinOp::Mul => finite(a * b),
        BinOp::Div => finite(a / b),
        BinOp::Eq => Some(bool_value(a == b)),
        BinOp::Ne => Some(bool_value(a != b)),
        BinOp::Lt => Some(bool_value(a < b)),
        BinOp::Gt => Some(bool_value(a > b)),
        BinOp::Le => Some(bool_value(a <= b)),
        BinOp::Ge => Some(bool_value(a >= b)),
        BinOp::And | BinOp::Or => None,
    }
}

fn eval_neg(operand: Value) -> Option<Value> {
    match operand {
        Value::Int(v) => v.checked_neg().map(Value::Int),
        Value::Float(v) => finite(-v),
    }
}

/// Comparisons produce 1 for true and 0 for false.
fn bool_value(b: bool) -> Value {
    Value::Int(if b { 1 } else { 0 })
}

fn finite(v: f64) -> Option<Value> {
    v.is_finite().then_some(Value::Float(v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lower;
    use akbarc_lex::lex;
    use akbarc_par::parse;

    fn folded(source: &str) -> Vec<String> {
        fold_constants(lower(&parse(lex(source).unwrap()).unwrap()))
            .iter()
            .map(|i| i.to_string())
            .collect()
    }

    #[test]
    fn test_arithmetic_chain_folds() {
        // 2 + 3 * 4 collapses to 14 through the temporaries.
        let text = folded("sahih x = 2 + 3 * 4;");
        assert!(text.contains(&"LOAD t3, 12".to_string()));
        assert!(text.contains(&"LOAD t4, 14".to_string()));
        assert!(!text.iter().any(|l| l.starts_with("MUL") || l.starts_with("ADD")));
    }

    #[test]
    fn test_comparison_folds_to_zero_or_one() {
        let text = folded("sahih x = 3 < 2; sahih y = 2 < 3;");
        assert!(text.contains(&"LOAD t2, 0".to_string()));
        assert!(text.contains(&"LOAD t5, 1".to_string()));
    }

    #[test]
    fn test_negation_folds() {
        let text = folded("sahih x = -5;");
        assert!(text.contains(&"LOAD t1, -5".to_string()));
    }

    #[test]
    fn test_float_arithmetic_folds_with_decimal_point() {
        let text = folded("ashar x = 1.5 + 1; benvis(x + 0.5);");
        assert!(text.contains(&"LOAD t2, 2.5".to_string()));
        assert!(text.contains(&"LOAD t4, 3.0".to_string()));
    }

    #[test]
    fn test_value_propagates_through_variables() {
        // x is known after DECLARE_INIT, so x + 1 folds.
        let text = folded("sahih x = 2; benvis(x + 1);");
        assert!(text.contains(&"LOAD t2, 3".to_string()));
    }

    #[test]
    fn test_input_invalidates() {
        let text = folded("sahih x = 2; begir(x); benvis(x + 1);");
        assert!(text.iter().any(|l| l.starts_with("ADD ")));
    }

    #[test]
    fn test_unknown_assignment_invalidates() {
        let text = folded("sahih x = 2; sahih y; begir(y); x = y; benvis(x + 1);");
        assert!(text.iter().any(|l| l.starts_with("ADD ")));
    }

    #[test]
    fn test_no_fold_across_loop_boundary() {
        // n changes inside the loop; the condition must not fold even
        // though n is known on entry.
        let text = folded("sahih n = 3; vaghti (n > 0) { benvis(n); n = n - 1; }");
        assert!(text.iter().any(|l| l.starts_with("GT ")));
        assert!(text.iter().any(|l| l.starts_with("SUB ")));
    }

    #[test]
    fn test_no_fold_across_for_boundary() {
        let text = folded(
            "sahih s = 0; baraye (sahih i = 0; i < 3; i = i + 1) { s = s + 1; } benvis(s);",
        );
        // s is reassigned in the loop; s + 1 inside and s after the loop
        // stay symbolic.
        assert!(text.iter().any(|l| l.starts_with("ADD ")));
    }

    #[test]
    fn test_straight_line_fold_inside_loop_body() {
        // Constants established inside the body in the same iteration
        // still fold.
        let text = folded("sahih n = 1; vaghti (n) { sahih k = 2 + 2; benvis(k); n = 0; }");
        assert!(text.contains(&"LOAD t3, 4".to_string()));
    }

    #[test]
    fn test_integer_division_truncates() {
        let text = folded("sahih x = 7 / 2;");
        assert!(text.contains(&"LOAD t2, 3".to_string()));
    }

    #[test]
    fn test_division_by_zero_is_left_alone() {
        let int_div = folded("sahih x = 1 / 0;");
        assert!(int_div.iter().any(|l| l.starts_with("DIV ")));
        let float_div = folded("ashar x = 1.0 / 0.0;");
        assert!(float_div.iter().any(|l| l.starts_with("DIV ")));
    }

    #[test]
    fn test_logical_ops_are_not_folded() {
        let text = folded("sahih x = 1 va 0;");
        assert!(text.iter().any(|l| l.starts_with("AND ")));
    }

    #[test]
    fn test_string_loads_are_not_values() {
        let text = folded("benvis(\"hi\");");
        assert!(text.contains(&"LOAD t0, \"hi\"".to_string()));
    }
}
