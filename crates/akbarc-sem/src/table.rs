//! Symbol table.
//!
//! The language has a single flat scope: block statements do not nest
//! bindings, and a name may be declared at most once. The table preserves
//! declaration order.

use akbarc_par::VarType;
use akbarc_util::Span;
use indexmap::IndexMap;

/// What the analyzer knows about one declared name.
#[derive(Clone, Debug, PartialEq)]
pub struct SymbolInfo {
    /// Declared type tag.
    pub ty: VarType,

    /// True once the name has been given a value by an initializer,
    /// an assignment, or an input statement.
    pub initialized: bool,

    /// Where the declaration happened.
    pub decl_span: Span,
}

/// Flat name-to-info mapping in declaration order.
#[derive(Debug, Default)]
pub struct SymbolTable {
    symbols: IndexMap<String, SymbolInfo>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a name. Returns false if it was already present, leaving
    /// the original entry untouched.
    pub fn declare(&mut self, name: &str, ty: VarType, initialized: bool, span: Span) -> bool {
        if self.symbols.contains_key(name) {
            return false;
        }
        self.symbols.insert(
            name.to_string(),
            SymbolInfo {
                ty,
                initialized,
                decl_span: span,
            },
        );
        true
    }

    pub fn get(&self, name: &str) -> Option<&SymbolInfo> {
        self.symbols.get(name)
    }

    /// Flags a declared name as initialized. No-op for unknown names;
    /// the caller has already diagnosed those.
    pub fn mark_initialized(&mut self, name: &str) {
        if let Some(info) = self.symbols.get_mut(name) {
            info.initialized = true;
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Declared names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.symbols.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declare_once() {
        let mut table = SymbolTable::new();
        assert!(table.declare("x", VarType::Int, false, Span::DUMMY));
        assert!(!table.declare("x", VarType::Float, true, Span::DUMMY));
        // The original entry survives a rejected redeclaration.
        let info = table.get("x").unwrap();
        assert_eq!(info.ty, VarType::Int);
        assert!(!info.initialized);
    }

    #[test]
    fn test_mark_initialized() {
        let mut table = SymbolTable::new();
        table.declare("n", VarType::Int, false, Span::DUMMY);
        table.mark_initialized("n");
        assert!(table.get("n").unwrap().initialized);
        // Unknown names are ignored.
        table.mark_initialized("missing");
        assert!(!table.contains("missing"));
    }

    #[test]
    fn test_declaration_order_is_preserved() {
        let mut table = SymbolTable::new();
        for name in ["c", "a", "b"] {
            table.declare(name, VarType::Int, false, Span::DUMMY);
        }
        let names: Vec<_> = table.names().collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }
}
