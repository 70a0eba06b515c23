use std::collections::HashMap;

use crate::{
    ast::ast::ExprId,
    errors::errors::Error,
    lexer::tokens::{Token, TokenKind},
};

use super::{expr::*, parser::Parser, stmt::parse_block};

#[derive(PartialEq, PartialOrd, Clone, Copy, Debug)]
pub enum BindingPower {
    Default,
    Assignment,
    Equality,
    Relational,
    Additive,
    Multiplicative,
}

impl BindingPower {
    /// Numeric precedence used by the climbing loop. Non-operators sit below
    /// every real operator.
    pub fn level(self) -> i32 {
        match self {
            BindingPower::Default => -1,
            BindingPower::Assignment => 1,
            BindingPower::Equality => 2,
            BindingPower::Relational => 3,
            BindingPower::Additive => 4,
            BindingPower::Multiplicative => 5,
        }
    }
}

pub type NUDHandler = fn(&mut Parser) -> Result<ExprId, Error>;
pub type LEDHandler = fn(&mut Parser, ExprId, Token, ExprId) -> Result<ExprId, Error>;

pub fn create_token_lookups(parser: &mut Parser) {
    parser.led(TokenKind::Equal, BindingPower::Assignment, parse_assignment_expr);
    parser.led(TokenKind::ColonEqual, BindingPower::Assignment, parse_assignment_expr);

    // Equality and relational
    parser.led(TokenKind::EqualEqual, BindingPower::Equality, parse_binary_expr);
    parser.led(TokenKind::BangEqual, BindingPower::Equality, parse_binary_expr);
    parser.led(TokenKind::Less, BindingPower::Relational, parse_binary_expr);
    parser.led(TokenKind::LessEqual, BindingPower::Relational, parse_binary_expr);
    parser.led(TokenKind::Greater, BindingPower::Relational, parse_binary_expr);
    parser.led(TokenKind::GreaterEqual, BindingPower::Relational, parse_binary_expr);

    // Additive and multiplicative
    parser.led(TokenKind::Plus, BindingPower::Additive, parse_binary_expr);
    parser.led(TokenKind::Minus, BindingPower::Additive, parse_binary_expr);
    parser.led(TokenKind::Star, BindingPower::Multiplicative, parse_binary_expr);
    parser.led(TokenKind::Slash, BindingPower::Multiplicative, parse_binary_expr);

    // Literals and symbols
    parser.nud(TokenKind::Integer, parse_number_expr);
    parser.nud(TokenKind::Float, parse_number_expr);
    parser.nud(TokenKind::String, parse_string_expr);
    parser.nud(TokenKind::Char, parse_char_expr);
    parser.nud(TokenKind::True, parse_boolean_expr);
    parser.nud(TokenKind::False, parse_boolean_expr);
    parser.nud(TokenKind::Ident, parse_identifier_expr);

    // Prefix operators
    parser.nud(TokenKind::Minus, parse_unary_expr);
    parser.nud(TokenKind::Bang, parse_unary_expr);

    parser.nud(TokenKind::LParen, parse_grouping_expr);
    parser.nud(TokenKind::LBrace, parse_block);
    parser.nud(TokenKind::Let, parse_let_expr);
    parser.nud(TokenKind::If, parse_if_expr);

    parser.nud(TokenKind::Return, parse_single_op_expr);
    parser.nud(TokenKind::Break, parse_single_op_expr);
    parser.nud(TokenKind::Continue, parse_single_op_expr);
}

// Lookup tables inside parser struct, so it's easier
pub type NUDLookup = HashMap<TokenKind, NUDHandler>;
pub type LEDLookup = HashMap<TokenKind, LEDHandler>;
pub type BPLookup = HashMap<TokenKind, BindingPower>;
