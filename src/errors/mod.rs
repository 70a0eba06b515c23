//! Error types and error handling for the compiler.
//!
//! This module defines the diagnostics produced by every compilation
//! phase. It includes:
//!
//! - Error structures with source location information and notes
//! - Specific error variants grouped by lex, parse, type and codegen phase
//! - The `Diagnostics` sink the passes record into
//! - Helpful suggestions attached to some errors

pub mod diagnostics;
pub mod errors;
