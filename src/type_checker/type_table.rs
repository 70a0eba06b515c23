use crate::ast::{ast::ExprId, types::Type};

/// Resolved type of every expression in an `Ast`, indexed by `ExprId`.
///
/// Only the type checker fills this in. Every entry starts as `invalid`.
#[derive(Debug, Clone, Default)]
pub struct TypeTable {
    types: Vec<Type>,
}

impl TypeTable {
    pub fn new(len: usize) -> Self {
        TypeTable {
            types: vec![Type::INVALID; len],
        }
    }

    pub fn get(&self, id: ExprId) -> Type {
        self.types.get(id.0).copied().unwrap_or(Type::INVALID)
    }

    pub(crate) fn set(&mut self, id: ExprId, type_: Type) {
        if let Some(slot) = self.types.get_mut(id.0) {
            *slot = type_;
        }
    }
}
