//! Code generation module for the compiler.
//!
//! This module contains the LLVM-based code generator that lowers a type
//! checked program to LLVM IR. It handles:
//!
//! - Declaration of externs and function prototypes
//! - Lowering of expressions and control flow
//! - Type conversion from language types to LLVM types

pub mod compiler;
pub mod expr;
pub mod stmt;
