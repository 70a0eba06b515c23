use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

use crate::SourceLocation;

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("let", TokenKind::Let);
        map.insert("if", TokenKind::If);
        map.insert("else", TokenKind::Else);
        map.insert("for", TokenKind::For);
        map.insert("while", TokenKind::While);
        map.insert("return", TokenKind::Return);
        map.insert("break", TokenKind::Break);
        map.insert("continue", TokenKind::Continue);
        map.insert("true", TokenKind::True);
        map.insert("false", TokenKind::False);
        map.insert("nil", TokenKind::Nil);
        map.insert("func", TokenKind::Func);
        map.insert("extern", TokenKind::Extern);
        map
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Dot,
    Colon,
    Semicolon,
    Ref, // &

    Plus,
    Minus,
    Star,
    Slash,
    Arrow,      // ->
    Equal,      // =
    EqualEqual, // ==
    ColonEqual, // :=
    Bang,       // !
    BangEqual,  // !=
    Less,
    LessEqual,
    Greater,
    GreaterEqual,

    Ident,
    String,
    Char,
    Integer,
    Float,

    // Reserved
    Let,
    If,
    Else,
    For,
    While,
    Return,
    Break,
    Continue,
    True,
    False,
    Nil,
    Func,
    Extern,

    Eof,
    Invalid,
    Comment,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub location: SourceLocation,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_one_of_many(&[
            TokenKind::Ident,
            TokenKind::String,
            TokenKind::Char,
            TokenKind::Integer,
            TokenKind::Float,
        ]) {
            write!(f, "{} {} ({})", self.location, self.kind, self.lexeme)
        } else {
            write!(f, "{} {}", self.location, self.kind)
        }
    }
}

impl Token {
    pub fn is_one_of_many(&self, kinds: &[TokenKind]) -> bool {
        kinds.contains(&self.kind)
    }

    /// Prints the token on its own line, used by `--pass-debug lex`.
    pub fn debug(&self) {
        println!("{}", self);
    }
}
