//! AST-to-IR lowering.
//!
//! A pure structural walk. Every expression lowers to an instruction
//! sequence followed by a *place* — a variable name, a temporary, or
//! nothing new for literals-by-way-of-`LOAD` — which the parent
//! expression consumes. Temporary and label counters are local to one
//! run and never reused, so the pipeline stays deterministic.

use akbarc_par::{
    Block, Expr, ForInit, LitValue, Program, Stmt, UnOp, VarDecl,
};

use crate::ir::{cpp_type_name, render_float, BinOp, Instr};

/// Lowers a semantically valid program into a fresh IR list.
pub fn lower(program: &Program) -> Vec<Instr> {
    Lowering::new().run(program)
}

/// Lowering state: the output list and the two monotonic counters.
struct Lowering {
    instrs: Vec<Instr>,
    next_temp: u32,
    next_label: u32,
}

impl Lowering {
    fn new() -> Self {
        Self {
            instrs: Vec::new(),
            next_temp: 0,
            next_label: 0,
        }
    }

    fn run(mut self, program: &Program) -> Vec<Instr> {
        self.emit(Instr::Include {
            header: "iostream".into(),
        });
        self.emit(Instr::Include {
            header: "string".into(),
        });
        self.emit(Instr::MainBegin);
        for stmt in &program.statements {
            self.lower_stmt(stmt);
        }
        self.emit(Instr::MainEnd);
        self.instrs
    }

    fn emit(&mut self, instr: Instr) {
        self.instrs.push(instr);
    }

    fn fresh_temp(&mut self) -> String {
        let name = format!("t{}", self.next_temp);
        self.next_temp += 1;
        name
    }

    fn fresh_label(&mut self) -> String {
        let name = format!("L{}", self.next_label);
        self.next_label += 1;
        name
    }

    fn lower_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::VarDecl(decl) => self.lower_var_decl(decl),
            Stmt::Input(input) => self.emit(Instr::Input {
                name: input.name.clone(),
            }),
            Stmt::Output(output) => {
                let value = self.lower_expr(&output.value);
                self.emit(Instr::Output { value });
            },
            Stmt::If(if_stmt) => {
                let cond = self.lower_expr(&if_stmt.condition);
                let else_label = self.fresh_label();
                let end_label = self.fresh_label();
                self.emit(Instr::JumpIfFalse {
                    cond,
                    target: else_label.clone(),
                });
                self.lower_stmt(&if_stmt.then_branch);
                self.emit(Instr::Jump {
                    target: end_label.clone(),
                });
                self.emit(Instr::Label { name: else_label });
                if let Some(else_branch) = &if_stmt.else_branch {
                    self.lower_stmt(else_branch);
                }
                self.emit(Instr::Label { name: end_label });
            },
            Stmt::While(while_stmt) => {
                let top_label = self.fresh_label();
                let end_label = self.fresh_label();
                self.emit(Instr::Label {
                    name: top_label.clone(),
                });
                let cond = self.lower_expr(&while_stmt.condition);
                self.emit(Instr::JumpIfFalse {
                    cond,
                    target: end_label.clone(),
                });
                self.lower_stmt(&while_stmt.body);
                self.emit(Instr::Jump { target: top_label });
                self.emit(Instr::Label { name: end_label });
            },
            Stmt::For(for_stmt) => {
                // The loop header lowers to C++ fragments taken from the
                // node's own clauses; the emitter prints them verbatim.
                let init = match &for_stmt.init {
                    ForInit::Decl(decl) => decl_cpp(decl),
                    ForInit::Expr(init) => expr_cpp(&init.expr),
                };
                let cond = expr_cpp(&for_stmt.condition);
                let incr = expr_cpp(&for_stmt.increment);
                self.emit(Instr::ForLoopStart { init, cond, incr });
                // Body statements are lowered directly, without an extra
                // scope wrapper around a block body.
                match for_stmt.body.as_ref() {
                    Stmt::Block(block) => self.lower_block_statements(block),
                    other => self.lower_stmt(other),
                }
                self.emit(Instr::ForLoopEnd);
            },
            Stmt::Block(block) => {
                self.emit(Instr::ScopeBegin);
                self.lower_block_statements(block);
                self.emit(Instr::ScopeEnd);
            },
            Stmt::Expr(expr_stmt) => {
                self.lower_expr(&expr_stmt.expr);
            },
        }
    }

    fn lower_block_statements(&mut self, block: &Block) {
        for stmt in &block.statements {
            self.lower_stmt(stmt);
        }
    }

    fn lower_var_decl(&mut self, decl: &VarDecl) {
        match &decl.init {
            Some(init) => {
                let value = self.lower_expr(init);
                self.emit(Instr::DeclareInit {
                    ty: decl.ty,
                    name: decl.name.clone(),
                    value,
                });
            },
            None => self.emit(Instr::Declare {
                ty: decl.ty,
                name: decl.name.clone(),
            }),
        }
    }

    /// Lowers an expression and returns its place.
    fn lower_expr(&mut self, expr: &Expr) -> String {
        match expr {
            Expr::Literal(lit) => {
                let dest = self.fresh_temp();
                self.emit(Instr::Load {
                    dest: dest.clone(),
                    value: render_literal(&lit.value),
                });
                dest
            },
            Expr::Var(var) => var.name.clone(),
            Expr::Assign(assign) => {
                let value = self.lower_expr(&assign.value);
                self.emit(Instr::Assign {
                    name: assign.name.clone(),
                    value,
                });
                assign.name.clone()
            },
            Expr::Unary(unary) => {
                let operand = self.lower_expr(&unary.operand);
                let dest = self.fresh_temp();
                match unary.op {
                    UnOp::Neg => self.emit(Instr::Neg {
                        dest: dest.clone(),
                        operand,
                    }),
                }
                dest
            },
            Expr::Binary(binary) => {
                let lhs = self.lower_expr(&binary.lhs);
                let rhs = self.lower_expr(&binary.rhs);
                let dest = self.fresh_temp();
                self.emit(Instr::Binary {
                    op: BinOp::from_ast(binary.op),
                    dest: dest.clone(),
                    lhs,
                    rhs,
                });
                dest
            },
        }
    }
}

/// Renders a literal in C++ syntax.
pub fn render_literal(value: &LitValue) -> String {
    match value {
        LitValue::Int(v) => v.to_string(),
        LitValue::Float(v) => render_float(*v),
        LitValue::Str(v) => format!("\"{}\"", v),
        LitValue::Char(v) => format!("'{}'", v),
    }
}

/// Renders a declaration clause of a `for` header, e.g. `int i = 1`.
fn decl_cpp(decl: &VarDecl) -> String {
    match &decl.init {
        Some(init) => format!(
            "{} {} = {}",
            cpp_type_name(decl.ty),
            decl.name,
            expr_cpp(init)
        ),
        None => format!("{} {}", cpp_type_name(decl.ty), decl.name),
    }
}

/// Renders an expression as a C++ source fragment, parenthesizing only
/// where C++ precedence would otherwise regroup it.
pub fn expr_cpp(expr: &Expr) -> String {
    match expr {
        Expr::Literal(lit) => render_literal(&lit.value),
        Expr::Var(var) => var.name.clone(),
        Expr::Assign(assign) => {
            format!("{} = {}", assign.name, expr_cpp(&assign.value))
        },
        Expr::Unary(unary) => format!("-{}", subexpr_cpp(&unary.operand, u8::MAX, false)),
        Expr::Binary(binary) => {
            let prec = ast_prec(binary.op);
            format!(
                "{} {} {}",
                subexpr_cpp(&binary.lhs, prec, true),
                BinOp::from_ast(binary.op).cpp_symbol(),
                subexpr_cpp(&binary.rhs, prec, false)
            )
        },
    }
}

/// Grammar precedence levels, lowest first.
fn ast_prec(op: akbarc_par::BinOp) -> u8 {
    use akbarc_par::BinOp as Op;
    match op {
        Op::And | Op::Or => 1,
        Op::Eq | Op::Ne => 2,
        Op::Lt | Op::Gt | Op::Le | Op::Ge => 3,
        Op::Add | Op::Sub => 4,
        Op::Mul | Op::Div => 5,
    }
}

fn subexpr_cpp(expr: &Expr, parent_prec: u8, is_left: bool) -> String {
    let rendered = expr_cpp(expr);
    let needs_parens = match expr {
        Expr::Binary(binary) => {
            let prec = ast_prec(binary.op);
            // Left-associative operators regroup a same-precedence child
            // on the right.
            prec < parent_prec || (prec == parent_prec && !is_left)
        },
        Expr::Assign(_) => true,
        _ => false,
    };
    if needs_parens {
        format!("({})", rendered)
    } else {
        rendered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use akbarc_lex::lex;
    use akbarc_par::parse;
    use rustc_hash::FxHashSet;

    fn lower_source(source: &str) -> Vec<Instr> {
        lower(&parse(lex(source).unwrap()).unwrap())
    }

    fn dump(ir: &[Instr]) -> Vec<String> {
        ir.iter().map(|i| i.to_string()).collect()
    }

    #[test]
    fn test_bookends() {
        let ir = lower_source("");
        assert_eq!(
            dump(&ir),
            vec!["INCLUDE iostream", "INCLUDE string", "MAIN_BEGIN", "MAIN_END"]
        );
    }

    #[test]
    fn test_output_of_string_literal() {
        let ir = lower_source("benvis(\"Hello, World!\");");
        assert_eq!(
            dump(&ir)[3..5],
            ["LOAD t0, \"Hello, World!\"", "OUTPUT t0"]
        );
    }

    #[test]
    fn test_expression_lowering_order() {
        // 2 + 3 * 4 lowers operands depth-first, left to right.
        let ir = lower_source("sahih x = 2 + 3 * 4;");
        assert_eq!(
            dump(&ir)[3..9],
            [
                "LOAD t0, 2",
                "LOAD t1, 3",
                "LOAD t2, 4",
                "MUL t3, t1, t2",
                "ADD t4, t0, t3",
                "DECLARE_INIT int, x, t4",
            ]
        );
    }

    #[test]
    fn test_var_ref_produces_no_instruction() {
        let ir = lower_source("sahih x = 1; sahih y = x;");
        assert_eq!(
            dump(&ir)[3..6],
            [
                "LOAD t0, 1",
                "DECLARE_INIT int, x, t0",
                "DECLARE_INIT int, y, x",
            ]
        );
    }

    #[test]
    fn test_assignment_place_is_the_name() {
        let ir = lower_source("sahih x; sahih y = x = 5;");
        assert_eq!(
            dump(&ir)[3..7],
            [
                "DECLARE int, x",
                "LOAD t0, 5",
                "ASSIGN x, t0",
                "DECLARE_INIT int, y, x",
            ]
        );
    }

    #[test]
    fn test_if_else_shape() {
        let ir = lower_source("sahih a = 1; age (a) benvis(1); vagarna benvis(2);");
        let text = dump(&ir);
        assert_eq!(
            text[5..],
            [
                "JUMP_IF_FALSE a, L0",
                "LOAD t1, 1",
                "OUTPUT t1",
                "JUMP L1",
                "LABEL L0",
                "LOAD t2, 2",
                "OUTPUT t2",
                "LABEL L1",
                "MAIN_END",
            ]
        );
    }

    #[test]
    fn test_while_shape() {
        let ir = lower_source("sahih n = 3; vaghti (n > 0) n = n - 1;");
        let text = dump(&ir);
        assert_eq!(
            text[5..],
            [
                "LABEL L0",
                "LOAD t1, 0",
                "GT t2, n, t1",
                "JUMP_IF_FALSE t2, L1",
                "LOAD t3, 1",
                "SUB t4, n, t3",
                "ASSIGN n, t4",
                "JUMP L0",
                "LABEL L1",
                "MAIN_END",
            ]
        );
    }

    #[test]
    fn test_for_header_comes_from_the_ast() {
        let ir = lower_source(
            "sahih m = 4; baraye (sahih i = 2; i <= m; i = i + 2) benvis(i);",
        );
        let header = ir
            .iter()
            .find_map(|instr| match instr {
                Instr::ForLoopStart { init, cond, incr } => {
                    Some((init.clone(), cond.clone(), incr.clone()))
                },
                _ => None,
            })
            .expect("missing FOR_LOOP_START");
        assert_eq!(header.0, "int i = 2");
        assert_eq!(header.1, "i <= m");
        assert_eq!(header.2, "i = i + 2");
    }

    #[test]
    fn test_for_block_body_has_no_extra_scope() {
        let ir = lower_source("baraye (sahih i = 0; i < 2; i = i + 1) { benvis(i); }");
        assert!(!ir.iter().any(|i| matches!(i, Instr::ScopeBegin)));
        assert!(ir.iter().any(|i| matches!(i, Instr::ForLoopEnd)));
    }

    #[test]
    fn test_block_scope_wrapping() {
        let ir = lower_source("{ benvis(1); }");
        let text = dump(&ir);
        assert_eq!(text[3], "SCOPE_BEGIN");
        assert_eq!(text[6], "SCOPE_END");
    }

    #[test]
    fn test_temps_are_defined_before_use() {
        // Every temporary operand must be the destination of an earlier
        // instruction, in linear order.
        let ir = lower_source(
            "sahih n = 2; vaghti (n > 0) { benvis(n * n + 1); n = n - 1; }",
        );
        let mut defined: FxHashSet<String> = FxHashSet::default();
        for instr in &ir {
            let operands: Vec<&str> = match instr {
                Instr::DeclareInit { value, .. } => vec![value],
                Instr::Assign { value, .. } => vec![value],
                Instr::Binary { lhs, rhs, .. } => vec![lhs, rhs],
                Instr::Neg { operand, .. } => vec![operand],
                Instr::Output { value } => vec![value],
                Instr::JumpIfFalse { cond, .. } => vec![cond],
                _ => vec![],
            };
            for operand in operands {
                if crate::ir::is_temp_name(operand) {
                    assert!(defined.contains(operand), "use of undefined {}", operand);
                }
            }
            if let Some(dest) = instr.dest() {
                assert!(defined.insert(dest.to_string()), "redefined {}", dest);
            }
        }
    }

    #[test]
    fn test_float_literal_keeps_decimal_point() {
        let ir = lower_source("ashar x = 2.0;");
        assert_eq!(dump(&ir)[3], "LOAD t0, 2.0");
    }

    #[test]
    fn test_char_literal_rendering() {
        let ir = lower_source("harf c = 'a';");
        assert_eq!(dump(&ir)[3], "LOAD t0, 'a'");
    }

    #[test]
    fn test_fragment_parenthesization() {
        // (i + 1) * 2 must keep its parentheses in the rendered header.
        let ir = lower_source(
            "sahih i = 0; baraye (i = 0; i < 9; i = (i + 1) * 2) benvis(i);",
        );
        let incr = ir.iter().find_map(|instr| match instr {
            Instr::ForLoopStart { incr, .. } => Some(incr.clone()),
            _ => None,
        });
        assert_eq!(incr.as_deref(), Some("i = (i + 1) * 2"));
    }

    #[test]
    fn test_fragment_left_assoc_needs_no_parens() {
        let ir = lower_source(
            "sahih i = 0; baraye (i = 0; i < 9; i = i + 1 + 1) benvis(i);",
        );
        let incr = ir.iter().find_map(|instr| match instr {
            Instr::ForLoopStart { incr, .. } => Some(incr.clone()),
            _ => None,
        });
        assert_eq!(incr.as_deref(), Some("i = i + 1 + 1"));
    }

    #[test]
    fn test_fragment_right_nested_sub_keeps_parens() {
        let ir = lower_source(
            "sahih i = 9; baraye (i = 9; i > 0; i = i - (2 - 1)) benvis(i);",
        );
        let incr = ir.iter().find_map(|instr| match instr {
            Instr::ForLoopStart { incr, .. } => Some(incr.clone()),
            _ => None,
        });
        assert_eq!(incr.as_deref(), Some("i = i - (2 - 1)"));
    }
}
