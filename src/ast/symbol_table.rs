use std::collections::HashMap;

/// A stack of lexical scopes mapping names to `T`.
///
/// The type checker stores resolved types here and the code generator
/// stores stack slots. Lookups walk from the innermost scope outwards.
#[derive(Debug, Clone)]
pub struct SymbolTable<T> {
    scopes: Vec<HashMap<String, T>>,
}

impl<T> Default for SymbolTable<T> {
    fn default() -> Self {
        SymbolTable { scopes: vec![] }
    }
}

impl<T> SymbolTable<T> {
    pub fn new() -> Self {
        SymbolTable::default()
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    pub fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    /// Binds `name` in the innermost scope, replacing any earlier binding
    /// there. Without an open scope the binding is dropped.
    pub fn insert(&mut self, name: impl Into<String>, value: T) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.into(), value);
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&T> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    pub fn local_lookup(&self, name: &str) -> Option<&T> {
        self.scopes.last().and_then(|scope| scope.get(name))
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }
}
