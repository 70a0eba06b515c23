use lazy_static::lazy_static;
use regex::Regex;

use crate::{
    errors::{
        diagnostics::Diagnostics,
        errors::{Error, ErrorImpl},
    },
    SourceLocation, MK_DEFAULT_HANDLER, MK_TOKEN,
};

use super::tokens::{Token, TokenKind, RESERVED_LOOKUP};

pub type RegexHandler = fn(&mut Lexer, &Regex) -> Result<(), Error>;

pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler,
}

lazy_static! {
    // Tried in order; longer operators come before their prefixes.
    static ref PATTERNS: Vec<RegexPattern> = vec![
        RegexPattern { regex: Regex::new("^\\s+").unwrap(), handler: skip_handler },
        RegexPattern { regex: Regex::new("^//").unwrap(), handler: line_comment_handler },
        RegexPattern { regex: Regex::new("^/\\*").unwrap(), handler: block_comment_handler },
        RegexPattern { regex: Regex::new("^\"").unwrap(), handler: string_handler },
        RegexPattern { regex: Regex::new("^'").unwrap(), handler: char_handler },
        RegexPattern { regex: Regex::new("^[a-zA-Z_][a-zA-Z0-9_]*").unwrap(), handler: symbol_handler },
        RegexPattern { regex: Regex::new("^[0-9]+(\\.[0-9]+)?").unwrap(), handler: number_handler },
        RegexPattern { regex: Regex::new("^->").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Arrow, "->") },
        RegexPattern { regex: Regex::new("^==").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::EqualEqual, "==") },
        RegexPattern { regex: Regex::new("^!=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::BangEqual, "!=") },
        RegexPattern { regex: Regex::new("^<=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::LessEqual, "<=") },
        RegexPattern { regex: Regex::new("^>=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::GreaterEqual, ">=") },
        RegexPattern { regex: Regex::new("^:=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::ColonEqual, ":=") },
        RegexPattern { regex: Regex::new("^\\(").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::LParen, "(") },
        RegexPattern { regex: Regex::new("^\\)").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::RParen, ")") },
        RegexPattern { regex: Regex::new("^\\{").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::LBrace, "{") },
        RegexPattern { regex: Regex::new("^\\}").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::RBrace, "}") },
        RegexPattern { regex: Regex::new("^\\[").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::LBracket, "[") },
        RegexPattern { regex: Regex::new("^\\]").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::RBracket, "]") },
        RegexPattern { regex: Regex::new("^,").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Comma, ",") },
        RegexPattern { regex: Regex::new("^\\.").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Dot, ".") },
        RegexPattern { regex: Regex::new("^:").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Colon, ":") },
        RegexPattern { regex: Regex::new("^;").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Semicolon, ";") },
        RegexPattern { regex: Regex::new("^&").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Ref, "&") },
        RegexPattern { regex: Regex::new("^\\+").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Plus, "+") },
        RegexPattern { regex: Regex::new("^-").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Minus, "-") },
        RegexPattern { regex: Regex::new("^\\*").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Star, "*") },
        RegexPattern { regex: Regex::new("^/").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Slash, "/") },
        RegexPattern { regex: Regex::new("^=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Equal, "=") },
        RegexPattern { regex: Regex::new("^!").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Bang, "!") },
        RegexPattern { regex: Regex::new("^<").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Less, "<") },
        RegexPattern { regex: Regex::new("^>").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Greater, ">") },
    ];
}

pub struct Lexer<'a> {
    tokens: Vec<Token>,
    source: &'a str,
    pos: usize,
    location: SourceLocation,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Lexer<'a> {
        Lexer {
            tokens: vec![],
            source,
            pos: 0,
            location: SourceLocation::default(),
        }
    }

    /// Steps over the next `n` bytes, keeping the line and column in sync.
    pub fn advance_n(&mut self, n: usize) {
        let end = (self.pos + n).min(self.source.len());
        for ch in self.source[self.pos..end].chars() {
            self.location.advance(ch);
        }
        self.pos = end;
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub fn location(&self) -> SourceLocation {
        self.location
    }

    pub fn remainder(&self) -> &'a str {
        &self.source[self.pos..]
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn matched(&self, regex: &Regex) -> &'a str {
        regex.find(self.remainder()).map_or("", |m| m.as_str())
    }
}

fn skip_handler(lexer: &mut Lexer, regex: &Regex) -> Result<(), Error> {
    let matched = lexer.matched(regex).len();
    lexer.advance_n(matched);
    Ok(())
}

fn line_comment_handler(lexer: &mut Lexer, _regex: &Regex) -> Result<(), Error> {
    let start = lexer.location();

    match lexer.remainder().find('\n') {
        Some(end) => {
            let text = &lexer.remainder()[..end];
            lexer.push(MK_TOKEN!(TokenKind::Comment, String::from(text), start));
            lexer.advance_n(end);
            Ok(())
        }
        None => Err(Error::new(ErrorImpl::UnterminatedComment, start)),
    }
}

fn block_comment_handler(lexer: &mut Lexer, _regex: &Regex) -> Result<(), Error> {
    let start = lexer.location();

    match lexer.remainder()[2..].find("*/") {
        Some(end) => {
            let length = end + 4;
            let text = &lexer.remainder()[..length];
            lexer.push(MK_TOKEN!(TokenKind::Comment, String::from(text), start));
            lexer.advance_n(length);
            Ok(())
        }
        None => Err(Error::new(ErrorImpl::UnterminatedBlockComment, start)),
    }
}

fn string_handler(lexer: &mut Lexer, _regex: &Regex) -> Result<(), Error> {
    let start = lexer.location();
    let body = &lexer.remainder()[1..];
    let mut chars = body.char_indices();

    while let Some((index, ch)) = chars.next() {
        match ch {
            '"' => {
                lexer.push(MK_TOKEN!(TokenKind::String, String::from(&body[..index]), start));
                lexer.advance_n(index + 2);
                return Ok(());
            }
            '\n' => return Err(Error::new(ErrorImpl::NewlineInString, start)),
            '\\' => match chars.next() {
                Some((_, '\n')) => return Err(Error::new(ErrorImpl::NewlineInString, start)),
                Some(_) => {}
                None => break,
            },
            _ => {}
        }
    }

    Err(Error::new(ErrorImpl::UnterminatedString, start))
}

fn char_handler(lexer: &mut Lexer, _regex: &Regex) -> Result<(), Error> {
    let start = lexer.location();
    let body = &lexer.remainder()[1..];
    let mut chars = body.char_indices();

    // One character, or a backslash and the character it escapes.
    let length = match chars.next() {
        None => return Err(Error::new(ErrorImpl::UnterminatedCharacterLiteral, start)),
        Some((_, '\'')) => return Err(Error::new(ErrorImpl::EmptyCharacterLiteral, start)),
        Some((_, '\n')) => return Err(Error::new(ErrorImpl::NewlineInCharacterLiteral, start)),
        Some((_, '\\')) => match chars.next() {
            None => return Err(Error::new(ErrorImpl::UnterminatedCharacterLiteral, start)),
            Some((_, '\n')) => {
                return Err(Error::new(ErrorImpl::NewlineInCharacterLiteral, start))
            }
            Some((index, ch)) => index + ch.len_utf8(),
        },
        Some((_, ch)) => ch.len_utf8(),
    };

    match chars.next() {
        Some((_, '\'')) => {
            lexer.push(MK_TOKEN!(TokenKind::Char, String::from(&body[..length]), start));
            lexer.advance_n(length + 2);
            Ok(())
        }
        Some((_, '\n')) => Err(Error::new(ErrorImpl::NewlineInCharacterLiteral, start)),
        _ => Err(Error::new(ErrorImpl::UnterminatedCharacterLiteral, start)),
    }
}

fn symbol_handler(lexer: &mut Lexer, regex: &Regex) -> Result<(), Error> {
    let value = lexer.matched(regex);
    let kind = RESERVED_LOOKUP
        .get(value)
        .copied()
        .unwrap_or(TokenKind::Ident);

    lexer.push(MK_TOKEN!(kind, String::from(value), lexer.location()));
    lexer.advance_n(value.len());
    Ok(())
}

fn number_handler(lexer: &mut Lexer, regex: &Regex) -> Result<(), Error> {
    let value = lexer.matched(regex);
    let kind = if value.contains('.') {
        TokenKind::Float
    } else {
        TokenKind::Integer
    };

    lexer.push(MK_TOKEN!(kind, String::from(value), lexer.location()));
    lexer.advance_n(value.len());
    Ok(())
}

fn next_token(lexer: &mut Lexer) -> Result<(), Error> {
    for pattern in PATTERNS.iter() {
        if pattern.regex.is_match(lexer.remainder()) {
            return (pattern.handler)(lexer, &pattern.regex);
        }
    }

    Err(Error::new(ErrorImpl::UnexpectedCharacter, lexer.location()))
}

/// Splits `source` into tokens.
///
/// Comments and whitespace never reach the returned vector, and no end of
/// file token is appended. The first lexical error is recorded in
/// `diagnostics` and aborts lexing with `None`.
pub fn tokenize(source: &str, diagnostics: &mut Diagnostics) -> Option<Vec<Token>> {
    let mut lex = Lexer::new(source);

    while !lex.at_eof() {
        if let Err(error) = next_token(&mut lex) {
            diagnostics.record(error);
            return None;
        }
    }

    lex.tokens.retain(|token| token.kind != TokenKind::Comment);
    Some(lex.tokens)
}

/// Decodes the escape sequences of a string or character literal lexeme.
pub fn unescape(literal: &str) -> String {
    let mut result = String::new();
    let mut chars = literal.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            result.push(ch);
            continue;
        }

        match chars.peek() {
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some('r') => result.push('\r'),
            Some('0') => result.push('\0'),
            Some('\\') => result.push('\\'),
            Some('"') => result.push('"'),
            Some('\'') => result.push('\''),
            Some(other) => {
                // Unknown escape, keep the backslash
                result.push(ch);
                result.push(*other);
            }
            None => {
                result.push(ch);
                break;
            }
        }
        chars.next();
    }

    result
}
