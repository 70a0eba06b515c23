use crate::{
    ast::{
        ast::{ExprId, ExprKind, ExternDef, Function, Prototype, PrototypeArg},
        types::Type,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::{expr::parse_expr, parser::Parser, types::parse_type};

/// Parses `{ expr (; expr)* ;? }`.
///
/// Statements are separated by `;`. An `if` or a nested block may be
/// followed directly by the next statement.
pub fn parse_block(parser: &mut Parser) -> Result<ExprId, Error> {
    let location = parser.current_location();
    parser.expect(TokenKind::LBrace, "`{`")?;

    if parser.current_token_kind() == TokenKind::RBrace {
        return Err(Error::new(ErrorImpl::EmptyBlock, location));
    }

    let mut statements = vec![];

    while parser.current_token_kind() != TokenKind::RBrace {
        let statement = parse_expr(parser)?;
        statements.push(statement);

        match parser.current_token_kind() {
            TokenKind::Semicolon => {
                parser.advance();
            }
            TokenKind::RBrace => {}
            _ => {
                let ends_with_block = matches!(
                    parser.get_ast().kind(statement),
                    ExprKind::If { .. } | ExprKind::Block { .. }
                );

                if !ends_with_block {
                    return Err(Error::new(
                        ErrorImpl::ExpectedStatementEnd {
                            found: parser.current_lexeme(),
                        },
                        parser.current_location(),
                    ));
                }
            }
        }
    }

    parser.expect(TokenKind::RBrace, "`}`")?;

    Ok(parser.add_expr(ExprKind::Block { statements }, location))
}

/// Parses `func name(arg: type, ...) -> type`. Without an arrow the return
/// type is `void`.
pub fn parse_prototype(parser: &mut Parser) -> Result<Prototype, Error> {
    parser.expect(TokenKind::Func, "`func`")?;

    let name_token = parser.expect(TokenKind::Ident, "identifier")?;
    parser.expect(TokenKind::LParen, "`(`")?;

    let mut args = vec![];
    if parser.current_token_kind() != TokenKind::RParen {
        loop {
            let arg = parser.expect(TokenKind::Ident, "identifier")?;
            parser.expect(TokenKind::Colon, "`:`")?;
            let type_ = parse_type(parser)?;

            args.push(PrototypeArg {
                name: arg.lexeme,
                type_,
                location: arg.location,
            });

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

    let return_type = if parser.current_token_kind() == TokenKind::Arrow {
        parser.advance();
        parse_type(parser)?
    } else {
        Type::VOID
    };

    Ok(Prototype {
        name: name_token.lexeme,
        args,
        return_type,
        location: name_token.location,
    })
}

pub fn parse_function(parser: &mut Parser) -> Result<Function, Error> {
    let prototype = parse_prototype(parser)?;
    let body = parse_block(parser)?;

    Ok(Function { prototype, body })
}

/// Parses `extern func name(...) -> type;`.
pub fn parse_extern(parser: &mut Parser) -> Result<ExternDef, Error> {
    parser.expect(TokenKind::Extern, "`extern`")?;
    let prototype = parse_prototype(parser)?;
    parser.expect(TokenKind::Semicolon, "`;`")?;

    Ok(ExternDef { prototype })
}
