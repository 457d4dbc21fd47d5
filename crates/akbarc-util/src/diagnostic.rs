//! Diagnostic accumulation.
//!
//! The semantic analyzer reports every finding before failing, so it
//! pushes [`Diagnostic`]s into a [`Handler`] and checks
//! [`Handler::has_errors`] once the walk is done. Fail-fast phases do not
//! use this machinery.

use crate::Span;
use std::fmt;

/// Diagnostic severity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    /// Prevents compilation.
    Error,
    /// Does not prevent compilation.
    Warning,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Error => write!(f, "error"),
            Level::Warning => write!(f, "warning"),
        }
    }
}

/// A single finding with severity and location.
#[derive(Clone, Debug, PartialEq)]
pub struct Diagnostic {
    /// Severity level.
    pub level: Level,
    /// Main message.
    pub message: String,
    /// Source location the message points at.
    pub span: Span,
}

impl Diagnostic {
    /// Creates a new diagnostic.
    pub fn new(level: Level, message: impl Into<String>, span: Span) -> Self {
        Self {
            level,
            message: message.into(),
            span,
        }
    }

    /// Creates an error diagnostic.
    pub fn error(message: impl Into<String>, span: Span) -> Self {
        Self::new(Level::Error, message, span)
    }

    /// Creates a warning diagnostic.
    pub fn warning(message: impl Into<String>, span: Span) -> Self {
        Self::new(Level::Warning, message, span)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "at {}: {}", self.span, self.message)
    }
}

/// Collects diagnostics over one compilation phase.
#[derive(Debug, Default)]
pub struct Handler {
    diagnostics: Vec<Diagnostic>,
}

impl Handler {
    /// Creates an empty handler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an error.
    pub fn error(&mut self, message: impl Into<String>, span: Span) {
        self.diagnostics.push(Diagnostic::error(message, span));
    }

    /// Records a warning.
    pub fn warning(&mut self, message: impl Into<String>, span: Span) {
        self.diagnostics.push(Diagnostic::warning(message, span));
    }

    /// Returns true if any error-level diagnostic was recorded.
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.level == Level::Error)
    }

    /// Number of recorded diagnostics.
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Returns true if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Read-only view of the recorded diagnostics, in emission order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Consumes the handler and yields the recorded diagnostics.
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handler_collects_in_order() {
        let mut handler = Handler::new();
        handler.error("first", Span::new(0, 1, 1, 1));
        handler.error("second", Span::new(2, 3, 2, 1));

        assert_eq!(handler.len(), 2);
        assert!(handler.has_errors());
        assert_eq!(handler.diagnostics()[0].message, "first");
        assert_eq!(handler.diagnostics()[1].message, "second");
    }

    #[test]
    fn test_warnings_are_not_errors() {
        let mut handler = Handler::new();
        handler.warning("just a warning", Span::DUMMY);

        assert!(!handler.has_errors());
        assert_eq!(handler.len(), 1);
    }

    #[test]
    fn test_diagnostic_display() {
        let diag = Diagnostic::error("undeclared variable `x`", Span::new(0, 1, 3, 8));
        assert_eq!(
            diag.to_string(),
            "at line 3, column 8: undeclared variable `x`"
        );
    }
}
