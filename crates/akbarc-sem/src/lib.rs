//! akbarc-sem - Semantic analyzer for AkbarLang.
//!
//! Walks the AST, builds the flat symbol table, and checks declarations,
//! references, assignments and operator typing. Unlike the fail-fast
//! earlier phases, this one collects every finding and reports them as a
//! single [`SemanticErrors`] batch, so one compile surfaces all problems.

mod analysis;
mod table;
mod types;

pub use analysis::Analyzer;
pub use table::{SymbolInfo, SymbolTable};
pub use types::{compatible_with_decl, equality_compatible, Ty};

use akbarc_par::Program;
use akbarc_util::Diagnostic;
use std::fmt;

/// The batched findings of one analysis run. Always non-empty.
#[derive(Clone, Debug, PartialEq)]
pub struct SemanticErrors {
    pub diagnostics: Vec<Diagnostic>,
}

impl SemanticErrors {
    pub fn new(diagnostics: Vec<Diagnostic>) -> Self {
        debug_assert!(!diagnostics.is_empty());
        Self { diagnostics }
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

impl fmt::Display for SemanticErrors {
    /// One line per finding:
    /// `semantic error at line L, column C: <message>`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, diag) in self.diagnostics.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "semantic error {}", diag)?;
        }
        Ok(())
    }
}

impl std::error::Error for SemanticErrors {}

/// Analyzes a program. On success the returned symbol table contains
/// every declared name exactly once; on failure every finding is in the
/// batch, in source order.
pub fn analyze(program: &Program) -> Result<SymbolTable, SemanticErrors> {
    Analyzer::new().analyze(program)
}
