//! Parser module for building an Abstract Syntax Tree (AST).
//!
//! This module contains the parser that transforms a stream of tokens
//! into a `Program`. It uses precedence climbing for binary expressions
//! and handles:
//!
//! - Top level items (functions and extern declarations)
//! - Expression parsing (binary and unary ops, calls, literals, blocks)
//! - Type parsing for annotations and prototypes
//! - Fail-fast error reporting on the first syntax error

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;
pub mod types;
