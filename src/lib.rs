#![allow(clippy::module_inception)]

use std::fmt::Display;

use crate::errors::errors::{Error, ErrorTip};

pub mod ast;
pub mod compiler;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod type_checker;

extern crate regex;

/// A zero-indexed line/column pair. Rendered one-indexed as `line:column`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct SourceLocation {
    pub line: u32,
    pub column: u32,
}

impl SourceLocation {
    pub fn new(line: u32, column: u32) -> Self {
        SourceLocation { line, column }
    }

    /// Steps over `ch`, moving to the start of the next line on `\n`.
    pub fn advance(&mut self, ch: char) {
        if ch == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
    }
}

impl Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.column + 1)
    }
}

pub fn get_line_at_location(source: &str, location: SourceLocation) -> Option<&str> {
    source.lines().nth(location.line as usize)
}

/// Renders a diagnostic with the offending source line and a caret under
/// the reported column.
pub fn render_error(error: &Error, source: &str, file: &str) -> String {
    /*
        final.fern:20:9: error: unexpected character
           |
        20 | let a = #;
           | --------^
           = note: ...
    */

    let location = error.get_location();
    let mut output = format!(
        "{}:{}: {}: {}\n",
        file,
        location,
        error.severity(),
        error.get_message()
    );

    let line_string = (location.line + 1).to_string();
    let padding = line_string.len() + 2;

    if let Some(line_text) = get_line_at_location(source, location) {
        let (line_text_removed, removed_whitespace) = remove_starting_whitespace(line_text);
        let arrows = (location.column as usize).saturating_sub(removed_whitespace) + 1;

        output.push_str(&format!("{:>padding$}\n", "|"));
        output.push_str(&format!("{} | {}\n", line_string, line_text_removed.trim_end()));
        output.push_str(&format!("{:>padding$} {:->arrows$}\n", "|", "^"));
    }

    for note in error.get_notes() {
        output.push_str(&format!("{:>padding$} note: {}\n", "=", note));
    }

    if let ErrorTip::Suggestion(tip) = error.get_tip() {
        output.push_str(&format!("{:>padding$} help: {}\n", "=", tip));
    }

    output
}

pub fn display_error(error: &Error, source: &str, file: &str) {
    eprint!("{}", render_error(error, source, file));
}

fn remove_starting_whitespace(string: &str) -> (&str, usize) {
    let mut start = 0;
    for c in string.chars() {
        if c == ' ' || c == '\t' {
            start += 1;
        } else {
            break;
        }
    }

    (&string[start..], start)
}

#[cfg(test)]
mod tests {
    use crate::{
        errors::errors::{Error, ErrorImpl},
        SourceLocation,
    };

    #[test]
    fn test_get_line_at_location() {
        let source = "Hello, world!\nsecond\n\nTesting { }\n";

        let line = super::get_line_at_location(source, SourceLocation::new(0, 10));
        assert_eq!(line, Some("Hello, world!"));

        let line = super::get_line_at_location(source, SourceLocation::new(3, 8));
        assert_eq!(line, Some("Testing { }"));

        assert!(super::get_line_at_location(source, SourceLocation::new(9, 0)).is_none());
    }

    #[test]
    fn test_location_advance() {
        let mut location = SourceLocation::default();
        for ch in "ab\nc".chars() {
            location.advance(ch);
        }

        assert_eq!(location, SourceLocation::new(1, 1));
        assert_eq!(location.to_string(), "2:2");
    }

    #[test]
    fn test_render_error() {
        let source = "func f() {\n    let a = #;\n}";
        let error = Error::new(ErrorImpl::UnexpectedCharacter, SourceLocation::new(1, 12));

        let rendered = super::render_error(&error, source, "final.fern");
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines[0], "final.fern:2:13: error: unexpected character");
        assert_eq!(lines[1], "  |");
        assert_eq!(lines[2], "2 | let a = #;");
        assert_eq!(lines[3], "  | --------^");
    }
}
