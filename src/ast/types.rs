use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Void,
    Bool,
    Int,
    Char,
    Float,
    Str,
    Invalid,
}

impl TypeKind {
    pub fn name(&self) -> &'static str {
        match self {
            TypeKind::Void => "void",
            TypeKind::Bool => "bool",
            TypeKind::Int => "int",
            TypeKind::Char => "char",
            TypeKind::Float => "float",
            TypeKind::Str => "str",
            TypeKind::Invalid => "invalid",
        }
    }
}

/// A primitive type behind zero or more references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Type {
    pub kind: TypeKind,
    pub reference_depth: u32,
}

impl Type {
    pub const VOID: Type = Type::new(TypeKind::Void);
    pub const BOOL: Type = Type::new(TypeKind::Bool);
    pub const INT: Type = Type::new(TypeKind::Int);
    pub const CHAR: Type = Type::new(TypeKind::Char);
    pub const FLOAT: Type = Type::new(TypeKind::Float);
    pub const STR: Type = Type::new(TypeKind::Str);
    pub const INVALID: Type = Type::new(TypeKind::Invalid);

    pub const fn new(kind: TypeKind) -> Self {
        Type {
            kind,
            reference_depth: 0,
        }
    }

    pub fn reference(self) -> Self {
        Type {
            reference_depth: self.reference_depth + 1,
            ..self
        }
    }

    /// Strips one level of reference. A plain `str` dereferences to its
    /// `char` element; any other unreferenced type has nothing to strip.
    pub fn dereference(self) -> Option<Self> {
        if self.reference_depth > 0 {
            Some(Type {
                reference_depth: self.reference_depth - 1,
                ..self
            })
        } else if self.kind == TypeKind::Str {
            Some(Type::CHAR)
        } else {
            None
        }
    }

    pub fn is_indexable(&self) -> bool {
        self.kind == TypeKind::Str || self.reference_depth > 0
    }

    pub fn is_invalid(&self) -> bool {
        self.kind == TypeKind::Invalid
    }

    pub fn is_numeric(&self) -> bool {
        self.reference_depth == 0 && matches!(self.kind, TypeKind::Int | TypeKind::Float)
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for _ in 0..self.reference_depth {
            write!(f, "&")?;
        }
        write!(f, "{}", self.kind.name())
    }
}

#[cfg(test)]
mod tests {
    use super::{Type, TypeKind};

    #[test]
    fn test_type_names() {
        assert_eq!(Type::INT.to_string(), "int");
        assert_eq!(Type::STR.reference().reference().to_string(), "&&str");
        assert_eq!(Type::INVALID.to_string(), "invalid");
    }

    #[test]
    fn test_dereference() {
        let reference = Type::INT.reference();

        assert_eq!(reference.dereference(), Some(Type::INT));
        assert_eq!(Type::INT.dereference(), None);
        assert_eq!(Type::STR.dereference(), Some(Type::CHAR));
        assert_eq!(Type::STR.reference().dereference(), Some(Type::STR));
    }

    #[test]
    fn test_structural_equality() {
        assert_eq!(Type::new(TypeKind::Bool), Type::BOOL);
        assert_ne!(Type::BOOL, Type::BOOL.reference());
    }

    #[test]
    fn test_indexable() {
        assert!(Type::STR.is_indexable());
        assert!(Type::FLOAT.reference().is_indexable());
        assert!(!Type::INT.is_indexable());
    }
}
