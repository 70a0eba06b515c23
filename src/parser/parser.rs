//! Parser implementation for building the Abstract Syntax Tree.
//!
//! This module contains the main Parser struct and the parsing entry point.
//! Expressions are parsed by precedence climbing: NUD handlers parse
//! primaries and prefix operators, LED handlers combine a left and right
//! operand once the binding power table says the operator binds tightly
//! enough.
//!
//! It maintains lookup tables for:
//! - NUD (null denotation) handlers for primaries and prefix expressions
//! - LED (left denotation) handlers for binary operators
//! - Binding powers for operator precedence

use std::collections::HashMap;

use crate::{
    ast::ast::{Ast, ExprId, ExprKind, Program},
    errors::{
        diagnostics::Diagnostics,
        errors::{Error, ErrorImpl},
    },
    lexer::tokens::{Token, TokenKind},
    SourceLocation,
};

use super::{
    lookups::{
        create_token_lookups, BPLookup, BindingPower, LEDHandler, LEDLookup, NUDHandler, NUDLookup,
    },
    stmt::{parse_extern, parse_function},
};

/// The main parser structure that maintains parsing state.
///
/// This struct holds the token stream, the expression arena being filled and
/// the lookup tables used for expressions.
pub struct Parser {
    /// The list of tokens to parse
    tokens: Vec<Token>,
    /// Current position in the token stream
    pos: usize,
    /// Arena receiving every parsed expression
    ast: Ast,
    /// Lookup table for null denotation (prefix) expression handlers
    nud_lookup: NUDLookup,
    /// Lookup table for left denotation (infix) expression handlers
    led_lookup: LEDLookup,
    /// Lookup table for expression binding powers (precedence)
    binding_power_lookup: BPLookup,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser {
            tokens,
            pos: 0,
            ast: Ast::new(),
            nud_lookup: HashMap::new(),
            led_lookup: HashMap::new(),
            binding_power_lookup: HashMap::new(),
        }
    }

    /// Returns the current token, or `None` once the stream is exhausted.
    pub fn current_token(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    /// Returns the kind of the current token. An exhausted stream reads as
    /// `Eof`.
    pub fn current_token_kind(&self) -> TokenKind {
        self.current_token().map_or(TokenKind::Eof, |token| token.kind)
    }

    pub fn current_lexeme(&self) -> String {
        match self.current_token() {
            Some(token) if token.lexeme.is_empty() => token.kind.to_string(),
            Some(token) => token.lexeme.clone(),
            None => String::from("end of file"),
        }
    }

    /// Location of the current token, or of the last token at end of file.
    pub fn current_location(&self) -> SourceLocation {
        self.current_token()
            .or_else(|| self.tokens.last())
            .map_or(SourceLocation::default(), |token| token.location)
    }

    /// Advances to the next token and returns the previous one.
    pub fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    /// Builds the error reported when the current token is not `expected`.
    pub fn unexpected(&self, expected: &str) -> Error {
        Error::new(
            ErrorImpl::UnexpectedToken {
                expected: String::from(expected),
                found: self.current_lexeme(),
            },
            self.current_location(),
        )
    }

    /// Consumes a token of the specified kind.
    ///
    /// # Arguments
    ///
    /// * `expected_kind` - The expected TokenKind
    /// * `expected` - How the expected token is named in the error message
    ///
    /// # Returns
    ///
    /// Returns Ok(Token) if the current token matches, otherwise returns an Error.
    pub fn expect(&mut self, expected_kind: TokenKind, expected: &str) -> Result<Token, Error> {
        match self.current_token() {
            Some(token) if token.kind == expected_kind => {
                let token = token.clone();
                self.pos += 1;
                Ok(token)
            }
            _ => Err(self.unexpected(expected)),
        }
    }

    /// Checks if there are more tokens to parse.
    pub fn has_tokens(&self) -> bool {
        self.pos < self.tokens.len()
    }

    pub fn get_nud_lookup(&self) -> &NUDLookup {
        &self.nud_lookup
    }

    pub fn get_led_lookup(&self) -> &LEDLookup {
        &self.led_lookup
    }

    /// Binding power of `kind`, `Default` for anything that is not a binary
    /// operator.
    pub fn binding_power(&self, kind: TokenKind) -> BindingPower {
        self.binding_power_lookup
            .get(&kind)
            .copied()
            .unwrap_or(BindingPower::Default)
    }

    /// Registers a left denotation (infix) handler for a token.
    pub fn led(&mut self, kind: TokenKind, binding_power: BindingPower, led_fn: LEDHandler) {
        self.binding_power_lookup.insert(kind, binding_power);
        self.led_lookup.insert(kind, led_fn);
    }

    /// Registers a null denotation (prefix) handler for a token.
    pub fn nud(&mut self, kind: TokenKind, nud_fn: NUDHandler) {
        self.nud_lookup.insert(kind, nud_fn);
    }

    pub fn add_expr(&mut self, kind: ExprKind, location: SourceLocation) -> ExprId {
        self.ast.add(kind, location)
    }

    pub fn get_ast(&self) -> &Ast {
        &self.ast
    }

    pub fn take_ast(&mut self) -> Ast {
        std::mem::take(&mut self.ast)
    }
}

fn parse_program(parser: &mut Parser) -> Result<Program, Error> {
    let mut program = Program::default();

    while parser.has_tokens() {
        match parser.current_token_kind() {
            TokenKind::Func => program.functions.push(parse_function(parser)?),
            TokenKind::Extern => program.externs.push(parse_extern(parser)?),
            _ => {
                return Err(Error::new(
                    ErrorImpl::UnexpectedTopLevelToken {
                        token: parser.current_lexeme(),
                    },
                    parser.current_location(),
                ))
            }
        }
    }

    program.ast = parser.take_ast();
    Ok(program)
}

/// Parses a stream of tokens into a program.
///
/// This is the main entry point for parsing. It creates a parser instance,
/// initializes the lookup tables and parses top level items until the
/// tokens run out. The first syntax error is recorded in `diagnostics` and
/// stops parsing.
pub fn parse(tokens: Vec<Token>, diagnostics: &mut Diagnostics) -> Option<Program> {
    let mut parser = Parser::new(tokens);
    create_token_lookups(&mut parser);

    match parse_program(&mut parser) {
        Ok(program) => Some(program),
        Err(error) => {
            diagnostics.record(error);
            None
        }
    }
}
