//! Unit tests for the lexer module.
//!
//! This module contains tests for tokenization including:
//! - Keywords and identifiers
//! - Numeric literals (integers and floats)
//! - String and character literals
//! - Operators and punctuation
//! - Comments
//! - Error cases

use crate::{
    errors::{diagnostics::Diagnostics, errors::ErrorImpl},
    SourceLocation,
};

use super::{
    lexer::{tokenize, unescape},
    tokens::{Token, TokenKind},
};

fn lex(source: &str) -> Vec<Token> {
    let mut diagnostics = Diagnostics::new();
    let tokens = tokenize(source, &mut diagnostics).unwrap();
    assert!(!diagnostics.has_errors());
    tokens
}

fn kinds(source: &str) -> Vec<TokenKind> {
    lex(source).iter().map(|token| token.kind).collect()
}

fn lex_error(source: &str) -> ErrorImpl {
    let mut diagnostics = Diagnostics::new();
    let tokens = tokenize(source, &mut diagnostics);

    assert!(tokens.is_none());
    assert_eq!(diagnostics.error_count(), 1);
    diagnostics.errors()[0].get_kind().clone()
}

#[test]
fn test_tokenize_keywords() {
    assert_eq!(
        kinds("let if else for while return break continue true false nil func extern"),
        vec![
            TokenKind::Let,
            TokenKind::If,
            TokenKind::Else,
            TokenKind::For,
            TokenKind::While,
            TokenKind::Return,
            TokenKind::Break,
            TokenKind::Continue,
            TokenKind::True,
            TokenKind::False,
            TokenKind::Nil,
            TokenKind::Func,
            TokenKind::Extern,
        ]
    );
}

#[test]
fn test_tokenize_identifiers() {
    let tokens = lex("foo bar baz_123 _underscore CamelCase lets");

    assert!(tokens.iter().all(|token| token.kind == TokenKind::Ident));
    assert_eq!(tokens[0].lexeme, "foo");
    assert_eq!(tokens[2].lexeme, "baz_123");
    assert_eq!(tokens[3].lexeme, "_underscore");
    assert_eq!(tokens[5].lexeme, "lets");
}

#[test]
fn test_tokenize_numbers() {
    let tokens = lex("42 3.14 0 100.5");

    assert_eq!(tokens[0].kind, TokenKind::Integer);
    assert_eq!(tokens[0].lexeme, "42");
    assert_eq!(tokens[1].kind, TokenKind::Float);
    assert_eq!(tokens[1].lexeme, "3.14");
    assert_eq!(tokens[2].kind, TokenKind::Integer);
    assert_eq!(tokens[3].kind, TokenKind::Float);
}

#[test]
fn test_tokenize_operators_maximal_munch() {
    assert_eq!(
        kinds("-> == != <= >= := = ! < > - + * / &"),
        vec![
            TokenKind::Arrow,
            TokenKind::EqualEqual,
            TokenKind::BangEqual,
            TokenKind::LessEqual,
            TokenKind::GreaterEqual,
            TokenKind::ColonEqual,
            TokenKind::Equal,
            TokenKind::Bang,
            TokenKind::Less,
            TokenKind::Greater,
            TokenKind::Minus,
            TokenKind::Plus,
            TokenKind::Star,
            TokenKind::Slash,
            TokenKind::Ref,
        ]
    );

    assert_eq!(
        kinds("a:=b"),
        vec![TokenKind::Ident, TokenKind::ColonEqual, TokenKind::Ident]
    );
}

#[test]
fn test_tokenize_punctuation() {
    assert_eq!(
        kinds("( ) { } [ ] , . : ;"),
        vec![
            TokenKind::LParen,
            TokenKind::RParen,
            TokenKind::LBrace,
            TokenKind::RBrace,
            TokenKind::LBracket,
            TokenKind::RBracket,
            TokenKind::Comma,
            TokenKind::Dot,
            TokenKind::Colon,
            TokenKind::Semicolon,
        ]
    );
}

#[test]
fn test_tokenize_string_keeps_raw_lexeme() {
    let tokens = lex(r#""hello\n \"world\"""#);

    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].lexeme, r#"hello\n \"world\""#);
    assert_eq!(unescape(&tokens[0].lexeme), "hello\n \"world\"");
}

#[test]
fn test_tokenize_empty_string() {
    let tokens = lex("\"\"");

    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].lexeme, "");
}

#[test]
fn test_tokenize_chars() {
    let tokens = lex(r"'a' '\n'");

    assert_eq!(tokens[0].kind, TokenKind::Char);
    assert_eq!(tokens[0].lexeme, "a");
    assert_eq!(tokens[1].kind, TokenKind::Char);
    assert_eq!(tokens[1].lexeme, r"\n");
}

#[test]
fn test_tokenize_comments() {
    let source = "let x = 1; // trailing comment\n/* block\ncomment */ let y = 2;\n";

    assert_eq!(
        kinds(source),
        vec![
            TokenKind::Let,
            TokenKind::Ident,
            TokenKind::Equal,
            TokenKind::Integer,
            TokenKind::Semicolon,
            TokenKind::Let,
            TokenKind::Ident,
            TokenKind::Equal,
            TokenKind::Integer,
            TokenKind::Semicolon,
        ]
    );
}

#[test]
fn test_tokenize_locations() {
    let tokens = lex("func f()\n  -> int");

    assert_eq!(tokens[0].location, SourceLocation::new(0, 0));
    assert_eq!(tokens[1].location, SourceLocation::new(0, 5));
    assert_eq!(tokens[4].location, SourceLocation::new(1, 2));
    assert_eq!(tokens[5].location, SourceLocation::new(1, 5));
}

#[test]
fn test_tokenize_function() {
    let tokens = lex("func add(a: int, b: int) -> int { return a + b; }");

    assert_eq!(tokens.len(), 20);
    assert_eq!(tokens[0].kind, TokenKind::Func);
    assert_eq!(tokens[19].kind, TokenKind::RBrace);
}

#[test]
fn test_tokenize_empty_source() {
    assert!(lex("").is_empty());
    assert!(lex("  \n\t ").is_empty());
}

#[test]
fn test_unterminated_string() {
    assert_eq!(lex_error("\"abc"), ErrorImpl::UnterminatedString);
    assert_eq!(lex_error("\"abc\\\""), ErrorImpl::UnterminatedString);
}

#[test]
fn test_newline_in_string() {
    assert_eq!(lex_error("\"ab\ncd\""), ErrorImpl::NewlineInString);
}

#[test]
fn test_character_literal_errors() {
    assert_eq!(lex_error("''"), ErrorImpl::EmptyCharacterLiteral);
    assert_eq!(lex_error("'\n'"), ErrorImpl::NewlineInCharacterLiteral);
    assert_eq!(lex_error("'ab'"), ErrorImpl::UnterminatedCharacterLiteral);
    assert_eq!(lex_error("'a"), ErrorImpl::UnterminatedCharacterLiteral);
}

#[test]
fn test_unterminated_comments() {
    assert_eq!(lex_error("let x = 1; // no newline"), ErrorImpl::UnterminatedComment);
    assert_eq!(lex_error("/* never closed"), ErrorImpl::UnterminatedBlockComment);
}

#[test]
fn test_unexpected_character() {
    let mut diagnostics = Diagnostics::new();
    let tokens = tokenize("let a = #;", &mut diagnostics);

    assert!(tokens.is_none());
    assert_eq!(diagnostics.errors()[0].get_kind(), &ErrorImpl::UnexpectedCharacter);
    assert_eq!(diagnostics.errors()[0].get_location(), SourceLocation::new(0, 8));
}

#[test]
fn test_unescape_unknown_escape() {
    assert_eq!(unescape(r"a\qb"), r"a\qb");
    assert_eq!(unescape(r"tab\there"), "tab\there");
}
