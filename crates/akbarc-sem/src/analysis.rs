//! The analysis walk.

use akbarc_par::{BinOp, Expr, ForInit, LitValue, Program, Stmt, UnOp, VarDecl};
use akbarc_util::{Handler, Span};

use crate::table::SymbolTable;
use crate::types::{compatible_with_decl, equality_compatible, Ty};
use crate::SemanticErrors;

/// Semantic analyzer. One instance analyzes one program.
pub struct Analyzer {
    table: SymbolTable,
    handler: Handler,
}

impl Analyzer {
    pub fn new() -> Self {
        Self {
            table: SymbolTable::new(),
            handler: Handler::new(),
        }
    }

    /// Runs the walk. Returns the completed symbol table, or the batch of
    /// every recorded finding.
    pub fn analyze(mut self, program: &Program) -> Result<SymbolTable, SemanticErrors> {
        for stmt in &program.statements {
            self.check_stmt(stmt);
        }
        if self.handler.has_errors() {
            Err(SemanticErrors::new(self.handler.into_diagnostics()))
        } else {
            Ok(self.table)
        }
    }

    fn error(&mut self, message: String, span: Span) {
        self.handler.error(message, span);
    }

    fn check_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::VarDecl(decl) => self.check_var_decl(decl),
            Stmt::Input(input) => {
                if self.table.get(&input.name).is_none() {
                    self.error(
                        format!("undeclared variable `{}`", input.name),
                        input.span,
                    );
                } else {
                    self.table.mark_initialized(&input.name);
                }
            },
            Stmt::Output(output) => {
                // Any type may be printed, including bare string literals.
                self.check_expr(&output.value);
            },
            Stmt::If(if_stmt) => {
                // Conditions are deliberately permissive: integers and
                // characters are implicitly boolean-valued.
                self.check_expr(&if_stmt.condition);
                self.check_stmt(&if_stmt.then_branch);
                if let Some(else_branch) = &if_stmt.else_branch {
                    self.check_stmt(else_branch);
                }
            },
            Stmt::For(for_stmt) => {
                match &for_stmt.init {
                    ForInit::Decl(decl) => self.check_var_decl(decl),
                    ForInit::Expr(init) => {
                        self.check_expr(&init.expr);
                    },
                }
                self.check_expr(&for_stmt.condition);
                self.check_expr(&for_stmt.increment);
                self.check_stmt(&for_stmt.body);
            },
            Stmt::While(while_stmt) => {
                self.check_expr(&while_stmt.condition);
                self.check_stmt(&while_stmt.body);
            },
            Stmt::Block(block) => {
                for stmt in &block.statements {
                    self.check_stmt(stmt);
                }
            },
            Stmt::Expr(expr_stmt) => {
                self.check_expr(&expr_stmt.expr);
            },
        }
    }

    fn check_var_decl(&mut self, decl: &VarDecl) {
        let init_ty = decl.init.as_ref().and_then(|init| self.check_expr(init));

        if !self
            .table
            .declare(&decl.name, decl.ty, decl.init.is_some(), decl.span)
        {
            self.error(
                format!("variable `{}` is already declared", decl.name),
                decl.span,
            );
            return;
        }

        if let Some(found) = init_ty {
            if !compatible_with_decl(decl.ty, found) {
                self.error(
                    format!(
                        "cannot initialize `{}` variable `{}` with a {} value",
                        decl.ty,
                        decl.name,
                        found.name()
                    ),
                    decl.span,
                );
            }
        }
    }

    /// Checks one expression and infers its type. `None` means a finding
    /// was already recorded below this node; the caller skips its own
    /// check to avoid cascading noise.
    fn check_expr(&mut self, expr: &Expr) -> Option<Ty> {
        match expr {
            Expr::Literal(lit) => Some(match lit.value {
                LitValue::Int(_) => Ty::Int,
                LitValue::Float(_) => Ty::Float,
                LitValue::Str(_) => Ty::Str,
                LitValue::Char(_) => Ty::Char,
            }),
            Expr::Var(var) => {
                let info = self.table.get(&var.name).map(|i| (i.ty, i.initialized));
                match info {
                    None => {
                        self.error(format!("undeclared variable `{}`", var.name), var.span);
                        None
                    },
                    Some((ty, initialized)) => {
                        if !initialized {
                            self.error(
                                format!("variable `{}` is used before being initialized", var.name),
                                var.span,
                            );
                        }
                        Some(Ty::from_decl(ty))
                    },
                }
            },
            Expr::Assign(assign) => {
                let value_ty = self.check_expr(&assign.value);
                let decl_ty = self.table.get(&assign.name).map(|i| i.ty);
                match decl_ty {
                    None => {
                        self.error(
                            format!("undeclared variable `{}`", assign.name),
                            assign.span,
                        );
                        None
                    },
                    Some(decl_ty) => {
                        if let Some(found) = value_ty {
                            if !compatible_with_decl(decl_ty, found) {
                                self.error(
                                    format!(
                                        "cannot assign a {} value to `{}` variable `{}`",
                                        found.name(),
                                        decl_ty,
                                        assign.name
                                    ),
                                    assign.span,
                                );
                            }
                        }
                        self.table.mark_initialized(&assign.name);
                        Some(Ty::from_decl(decl_ty))
                    },
                }
            },
            Expr::Unary(unary) => {
                let ty = self.check_expr(&unary.operand)?;
                match unary.op {
                    UnOp::Neg => {
                        if !ty.is_numeric() {
                            self.error(
                                format!("unary `-` requires a numeric operand, found {}", ty.name()),
                                unary.span,
                            );
                            return None;
                        }
                        Some(ty)
                    },
                }
            },
            Expr::Binary(binary) => {
                let lhs = self.check_expr(&binary.lhs);
                let rhs = self.check_expr(&binary.rhs);
                let (lhs, rhs) = (lhs?, rhs?);
                self.check_binary(binary.op, lhs, rhs, binary.span)
            },
        }
    }

    fn check_binary(&mut self, op: BinOp, lhs: Ty, rhs: Ty, span: Span) -> Option<Ty> {
        if op.is_arithmetic() || op.is_ordering() {
            for side in [lhs, rhs] {
                if !side.is_numeric() {
                    self.error(
                        format!(
                            "operator `{}` requires numeric operands, found {}",
                            op.symbol(),
                            side.name()
                        ),
                        span,
                    );
                    return None;
                }
            }
            return Some(if op.is_ordering() {
                Ty::Int
            } else if lhs == Ty::Float || rhs == Ty::Float {
                Ty::Float
            } else {
                Ty::Int
            });
        }

        if op.is_equality() {
            if !equality_compatible(lhs, rhs) {
                self.error(
                    format!(
                        "operator `{}` cannot compare {} and {} values",
                        op.symbol(),
                        lhs.name(),
                        rhs.name()
                    ),
                    span,
                );
                return None;
            }
            return Some(Ty::Int);
        }

        // Logical va/ya: integers and characters are boolean-valued,
        // strings are not.
        debug_assert!(op.is_logical());
        for side in [lhs, rhs] {
            if side == Ty::Str {
                self.error(
                    format!(
                        "operator `{}` requires boolean-valued operands, found string",
                        op.symbol()
                    ),
                    span,
                );
                return None;
            }
        }
        Some(Ty::Int)
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze;
    use akbarc_lex::lex;
    use akbarc_par::parse;

    fn analyze_source(source: &str) -> Result<SymbolTable, SemanticErrors> {
        analyze(&parse(lex(source).unwrap()).unwrap())
    }

    fn messages(source: &str) -> Vec<String> {
        analyze_source(source)
            .unwrap_err()
            .diagnostics
            .into_iter()
            .map(|d| d.message)
            .collect()
    }

    #[test]
    fn test_well_typed_program() {
        let table = analyze_source(
            "sahih n = 3;\n\
             vaghti (n > 0) { benvis(n); n = n - 1; }",
        )
        .unwrap();
        assert_eq!(table.len(), 1);
        assert!(table.get("n").unwrap().initialized);
    }

    #[test]
    fn test_every_declared_name_appears_once() {
        let table =
            analyze_source("sahih a = 1; ashar b = 2.0; harf c = 'x'; benvis(a);").unwrap();
        let names: Vec<_> = table.names().collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_duplicate_declaration() {
        let msgs = messages("sahih x = 1; sahih x = 2;");
        assert_eq!(msgs, vec!["variable `x` is already declared"]);
    }

    #[test]
    fn test_undeclared_reference() {
        let msgs = messages("benvis(x);");
        assert_eq!(msgs, vec!["undeclared variable `x`"]);
    }

    #[test]
    fn test_use_before_initialization() {
        let msgs = messages("sahih x; benvis(x);");
        assert_eq!(msgs, vec!["variable `x` is used before being initialized"]);
    }

    #[test]
    fn test_assignment_initializes() {
        assert!(analyze_source("sahih x; x = 1; benvis(x);").is_ok());
    }

    #[test]
    fn test_input_initializes() {
        assert!(analyze_source("sahih x; begir(x); benvis(x);").is_ok());
    }

    #[test]
    fn test_errors_are_batched_in_source_order() {
        // Undeclared use on line 1, duplicate declaration on line 3.
        let errors = analyze_source("benvis(x);\nsahih x = 1;\nsahih x = 2;").unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.diagnostics[0].message, "undeclared variable `x`");
        assert_eq!(errors.diagnostics[0].span.line, 1);
        assert_eq!(
            errors.diagnostics[1].message,
            "variable `x` is already declared"
        );
        assert_eq!(errors.diagnostics[1].span.line, 3);
    }

    #[test]
    fn test_int_widens_to_float_declaration() {
        assert!(analyze_source("ashar x = 1; benvis(x);").is_ok());
    }

    #[test]
    fn test_float_does_not_narrow_to_int() {
        let msgs = messages("sahih x = 1.5;");
        assert_eq!(
            msgs,
            vec!["cannot initialize `sahih` variable `x` with a floating-point value"]
        );
    }

    #[test]
    fn test_char_is_not_numeric_in_declarations() {
        assert!(analyze_source("sahih x = 'a';").is_err());
        assert!(analyze_source("harf c = 1;").is_err());
        assert!(analyze_source("harf c = 'a';").is_ok());
    }

    #[test]
    fn test_string_cannot_be_stored() {
        let msgs = messages("sahih x = \"hi\";");
        assert_eq!(
            msgs,
            vec!["cannot initialize `sahih` variable `x` with a string value"]
        );
        assert!(analyze_source("benvis(\"hi\");").is_ok());
    }

    #[test]
    fn test_arithmetic_requires_numeric_operands() {
        let msgs = messages("sahih x = 1 + \"a\";");
        assert!(msgs[0].contains("operator `+` requires numeric operands"));
    }

    #[test]
    fn test_arithmetic_result_widens() {
        // 1 + 2.0 is floating-point and cannot initialize an integer.
        assert!(analyze_source("sahih x = 1 + 2.0;").is_err());
        assert!(analyze_source("ashar x = 1 + 2.0;").is_ok());
    }

    #[test]
    fn test_comparison_yields_integer() {
        assert!(analyze_source("sahih x = 1 < 2;").is_ok());
        assert!(analyze_source("sahih x = 1.5 < 2.5;").is_ok());
    }

    #[test]
    fn test_equality_needs_compatible_operands() {
        assert!(analyze_source("sahih x = 1 == 2.0;").is_ok());
        let msgs = messages("sahih x = 'a' == 1;");
        assert!(msgs[0].contains("cannot compare character and integer"));
    }

    #[test]
    fn test_conditions_are_permissive() {
        assert!(analyze_source("harf c = 'y'; age (c) benvis(c);").is_ok());
        assert!(analyze_source("sahih n = 1; vaghti (n) n = 0;").is_ok());
    }

    #[test]
    fn test_unary_minus_requires_numeric() {
        assert!(analyze_source("sahih x = -'a';").is_err());
        assert!(analyze_source("ashar x = -1.5;").is_ok());
    }

    #[test]
    fn test_cascade_is_suppressed() {
        // The undeclared `y` is reported once, not again for the `+`.
        let msgs = messages("sahih x = y + 1;");
        assert_eq!(msgs, vec!["undeclared variable `y`"]);
    }

    #[test]
    fn test_for_loop_counter_joins_flat_scope() {
        // The counter lives in the single flat scope, so redeclaring it
        // afterwards is an error.
        let msgs = messages(
            "baraye (sahih i = 0; i < 3; i = i + 1) benvis(i);\nsahih i = 9;",
        );
        assert_eq!(msgs, vec!["variable `i` is already declared"]);
    }
}
