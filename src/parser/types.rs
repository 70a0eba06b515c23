//! Type annotation parsing.
//!
//! A type is any number of `&` followed by one of the primitive type names.

use lazy_static::lazy_static;
use std::collections::HashMap;

use crate::{
    ast::types::{Type, TypeKind},
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::parser::Parser;

lazy_static! {
    pub static ref PRIMITIVE_LOOKUP: HashMap<&'static str, TypeKind> = {
        let mut map = HashMap::new();
        map.insert("int", TypeKind::Int);
        map.insert("float", TypeKind::Float);
        map.insert("char", TypeKind::Char);
        map.insert("str", TypeKind::Str);
        map.insert("bool", TypeKind::Bool);
        map
    };
}

pub fn parse_type(parser: &mut Parser) -> Result<Type, Error> {
    let mut reference_depth = 0;
    while parser.current_token_kind() == TokenKind::Ref {
        parser.advance();
        reference_depth += 1;
    }

    let token = parser.expect(TokenKind::Ident, "type name")?;

    match PRIMITIVE_LOOKUP.get(token.lexeme.as_str()) {
        Some(kind) => Ok(Type {
            kind: *kind,
            reference_depth,
        }),
        None => Err(Error::new(
            ErrorImpl::UnknownType {
                type_: token.lexeme,
            },
            token.location,
        )),
    }
}
