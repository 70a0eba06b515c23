use crate::{
    ast::ast::{ExprId, ExprKind},
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
};

use super::{parser::Parser, stmt::parse_block, types::parse_type};

pub fn parse_expr(parser: &mut Parser) -> Result<ExprId, Error> {
    let lhs = parse_unary(parser)?;
    parse_binop_rhs(parser, 0, lhs)
}

/// Parses a primary, or a prefix operator applied to one.
pub fn parse_unary(parser: &mut Parser) -> Result<ExprId, Error> {
    let token_kind = parser.current_token_kind();

    match parser.get_nud_lookup().get(&token_kind).copied() {
        Some(handler) => handler(parser),
        None => Err(Error::new(
            ErrorImpl::ExpectedExpression {
                found: parser.current_lexeme(),
            },
            parser.current_location(),
        )),
    }
}

fn parse_binop_rhs(parser: &mut Parser, min_level: i32, mut lhs: ExprId) -> Result<ExprId, Error> {
    loop {
        let token_kind = parser.current_token_kind();
        let level = parser.binding_power(token_kind).level();

        if level < min_level {
            return Ok(lhs);
        }

        let Some(handler) = parser.get_led_lookup().get(&token_kind).copied() else {
            return Ok(lhs);
        };
        let Some(operator) = parser.advance() else {
            return Ok(lhs);
        };

        let mut rhs = parse_unary(parser)?;

        // A tighter operator to the right takes rhs as its left operand
        let next_level = parser.binding_power(parser.current_token_kind()).level();
        if level < next_level {
            rhs = parse_binop_rhs(parser, level + 1, rhs)?;
        }

        lhs = handler(parser, lhs, operator, rhs)?;
    }
}

pub fn parse_binary_expr(
    parser: &mut Parser,
    lhs: ExprId,
    operator: Token,
    rhs: ExprId,
) -> Result<ExprId, Error> {
    Ok(parser.add_expr(
        ExprKind::Binary {
            operator: operator.kind,
            lhs,
            rhs,
        },
        operator.location,
    ))
}

/// `x = e` stays a binary node, `x := e` becomes a `let` without annotation.
pub fn parse_assignment_expr(
    parser: &mut Parser,
    lhs: ExprId,
    operator: Token,
    rhs: ExprId,
) -> Result<ExprId, Error> {
    let ExprKind::Variable { name } = parser.get_ast().kind(lhs) else {
        return Err(Error::new(
            ErrorImpl::InvalidAssignmentTarget,
            operator.location,
        ));
    };

    if operator.kind == TokenKind::ColonEqual {
        let name = name.clone();
        let location = parser.get_ast().location(lhs);

        return Ok(parser.add_expr(
            ExprKind::Let {
                name,
                annotation: None,
                value: rhs,
            },
            location,
        ));
    }

    parse_binary_expr(parser, lhs, operator, rhs)
}

pub fn parse_unary_expr(parser: &mut Parser) -> Result<ExprId, Error> {
    let location = parser.current_location();
    let operator = parser.current_token_kind();
    parser.advance();

    let operand = parse_unary(parser)?;

    Ok(parser.add_expr(ExprKind::Unary { operator, operand }, location))
}

pub fn parse_number_expr(parser: &mut Parser) -> Result<ExprId, Error> {
    let location = parser.current_location();
    let is_float = parser.current_token_kind() == TokenKind::Float;
    let value = parser.current_lexeme();
    parser.advance();

    Ok(parser.add_expr(ExprKind::Number { value, is_float }, location))
}

pub fn parse_string_expr(parser: &mut Parser) -> Result<ExprId, Error> {
    let location = parser.current_location();
    let token = parser.expect(TokenKind::String, "string")?;

    Ok(parser.add_expr(ExprKind::String { value: token.lexeme }, location))
}

pub fn parse_char_expr(parser: &mut Parser) -> Result<ExprId, Error> {
    let location = parser.current_location();
    let token = parser.expect(TokenKind::Char, "character")?;

    Ok(parser.add_expr(ExprKind::Char { value: token.lexeme }, location))
}

pub fn parse_boolean_expr(parser: &mut Parser) -> Result<ExprId, Error> {
    let location = parser.current_location();
    let value = parser.current_token_kind() == TokenKind::True;
    parser.advance();

    Ok(parser.add_expr(ExprKind::Boolean { value }, location))
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<ExprId, Error> {
    parser.expect(TokenKind::LParen, "`(`")?;
    let expr = parse_expr(parser)?;
    parser.expect(TokenKind::RParen, "`)`")?;

    Ok(expr)
}

/// A bare identifier is a variable. Followed by `(` it is a call, followed
/// by `[` a subscript.
pub fn parse_identifier_expr(parser: &mut Parser) -> Result<ExprId, Error> {
    let location = parser.current_location();
    let name = parser.expect(TokenKind::Ident, "identifier")?.lexeme;

    match parser.current_token_kind() {
        TokenKind::LParen => {
            parser.advance();

            let mut arguments = vec![];
            if parser.current_token_kind() != TokenKind::RParen {
                loop {
                    arguments.push(parse_expr(parser)?);

                    match parser.current_token_kind() {
                        TokenKind::Comma => {
                            parser.advance();
                        }
                        TokenKind::RParen => break,
                        _ => return Err(parser.unexpected("`,` or `)`")),
                    }
                }
            }
            parser.expect(TokenKind::RParen, "`)`")?;

            Ok(parser.add_expr(
                ExprKind::Call {
                    callee: name,
                    arguments,
                },
                location,
            ))
        }
        TokenKind::LBracket => {
            let operand = parser.add_expr(ExprKind::Variable { name }, location);
            let bracket_location = parser.current_location();
            parser.advance();

            let index = parse_expr(parser)?;
            parser.expect(TokenKind::RBracket, "closing `]`")?;

            Ok(parser.add_expr(ExprKind::Subscript { operand, index }, bracket_location))
        }
        _ => Ok(parser.add_expr(ExprKind::Variable { name }, location)),
    }
}

pub fn parse_let_expr(parser: &mut Parser) -> Result<ExprId, Error> {
    let location = parser.current_location();
    parser.expect(TokenKind::Let, "`let`")?;

    let name = parser
        .expect(TokenKind::Ident, "variable name after `let`")?
        .lexeme;

    let annotation = if parser.current_token_kind() == TokenKind::Colon {
        parser.advance();
        Some(parse_type(parser)?)
    } else {
        None
    };

    parser.expect(TokenKind::Equal, "`=`")?;
    let value = parse_expr(parser)?;

    Ok(parser.add_expr(
        ExprKind::Let {
            name,
            annotation,
            value,
        },
        location,
    ))
}

pub fn parse_if_expr(parser: &mut Parser) -> Result<ExprId, Error> {
    let location = parser.current_location();
    parser.expect(TokenKind::If, "`if`")?;

    let condition = parse_expr(parser)?;
    let then_block = parse_block(parser)?;

    let else_block = if parser.current_token_kind() == TokenKind::Else {
        parser.advance();
        Some(parse_block(parser)?)
    } else {
        None
    };

    Ok(parser.add_expr(
        ExprKind::If {
            condition,
            then_block,
            else_block,
        },
        location,
    ))
}

/// `return` with an optional value, `break` and `continue`.
pub fn parse_single_op_expr(parser: &mut Parser) -> Result<ExprId, Error> {
    let location = parser.current_location();
    let operator = parser.current_token_kind();
    parser.advance();

    let value = match (operator, parser.current_token_kind()) {
        (TokenKind::Return, TokenKind::Semicolon | TokenKind::RBrace) => None,
        (TokenKind::Return, _) => Some(parse_expr(parser)?),
        _ => None,
    };

    Ok(parser.add_expr(ExprKind::SingleOp { operator, value }, location))
}
