use crate::{lexer::tokens::TokenKind, SourceLocation};

use super::types::Type;

/// Index of an expression inside its owning `Ast`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExprId(pub usize);

/// Expression Kinds
///
/// Every construct of the language is an expression. Children are referenced
/// by id and each id has exactly one parent.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Binary {
        operator: TokenKind,
        lhs: ExprId,
        rhs: ExprId,
    },
    Unary {
        operator: TokenKind,
        operand: ExprId,
    },
    If {
        condition: ExprId,
        then_block: ExprId,
        else_block: Option<ExprId>,
    },
    Let {
        name: String,
        annotation: Option<Type>,
        value: ExprId,
    },
    Block {
        statements: Vec<ExprId>,
    },
    /// `return`, `break` or `continue`, with the returned value if any.
    SingleOp {
        operator: TokenKind,
        value: Option<ExprId>,
    },
    Call {
        callee: String,
        arguments: Vec<ExprId>,
    },
    Variable {
        name: String,
    },
    Subscript {
        operand: ExprId,
        index: ExprId,
    },
    Boolean {
        value: bool,
    },
    Number {
        value: String,
        is_float: bool,
    },
    String {
        value: String,
    },
    Char {
        value: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub location: SourceLocation,
}

/// Expression arena. Nodes are only ever appended, so ids stay valid for
/// the lifetime of the tree.
#[derive(Debug, Clone, Default)]
pub struct Ast {
    nodes: Vec<Expr>,
}

impl Ast {
    pub fn new() -> Self {
        Ast::default()
    }

    pub fn add(&mut self, kind: ExprKind, location: SourceLocation) -> ExprId {
        self.nodes.push(Expr { kind, location });
        ExprId(self.nodes.len() - 1)
    }

    pub fn get(&self, id: ExprId) -> &Expr {
        &self.nodes[id.0]
    }

    pub fn kind(&self, id: ExprId) -> &ExprKind {
        &self.get(id).kind
    }

    pub fn location(&self, id: ExprId) -> SourceLocation {
        self.get(id).location
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn is_block(&self, id: ExprId) -> bool {
        matches!(self.kind(id), ExprKind::Block { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrototypeArg {
    pub name: String,
    pub type_: Type,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Prototype {
    pub name: String,
    pub args: Vec<PrototypeArg>,
    pub return_type: Type,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub prototype: Prototype,
    /// Always a `Block` expression.
    pub body: ExprId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExternDef {
    pub prototype: Prototype,
}

/// A whole translation unit: the expression arena plus the top level items
/// in source order.
#[derive(Debug, Clone, Default)]
pub struct Program {
    pub ast: Ast,
    pub externs: Vec<ExternDef>,
    pub functions: Vec<Function>,
}

impl Program {
    pub fn get_function(&self, name: &str) -> Option<&Function> {
        self.functions
            .iter()
            .find(|function| function.prototype.name == name)
    }

    pub fn get_extern(&self, name: &str) -> Option<&ExternDef> {
        self.externs
            .iter()
            .find(|extern_def| extern_def.prototype.name == name)
    }
}
