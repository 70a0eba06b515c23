//! Type checking and semantic analysis module.
//!
//! This module resolves the type of every expression of a parsed program
//! while:
//!
//! - Verifying operand types of unary and binary operators
//! - Resolving variable references through a scope stack
//! - Checking call arity and argument types against function signatures
//! - Checking `return` values against the enclosing function
//!
//! The resolved types are written to a `TypeTable` keyed by expression id,
//! which the code generator requires as input.

pub mod type_checker;
pub mod type_table;
