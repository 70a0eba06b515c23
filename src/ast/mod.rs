/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: Expression arena, expression kinds and top level items
/// - printer: Tree dump used for debugging the parser
/// - symbol_table: Scope stack shared by the checker and code generator
/// - types: Primitive types and reference depth
pub mod ast;
pub mod printer;
pub mod symbol_table;
pub mod types;
