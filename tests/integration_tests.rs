//! Integration tests for end-to-end compilation.
//!
//! These tests drive the complete pipeline from source text through
//! tokenization, parsing, type checking and LLVM IR generation.

use fernc::{
    ast::ast::Program,
    compiler::compiler::{compile, Compiler},
    errors::{diagnostics::Diagnostics, errors::ErrorImpl},
    lexer::lexer::tokenize,
    parser::parser::parse,
    type_checker::{type_checker::type_check, type_table::TypeTable},
};
use inkwell::{
    context::Context,
    values::{BasicValueEnum, FunctionValue, InstructionOpcode, InstructionValue},
};

fn front_end(source: &str, diagnostics: &mut Diagnostics) -> (Program, TypeTable) {
    let tokens = tokenize(source, diagnostics).expect("source should tokenize");
    let program = parse(tokens, diagnostics).expect("source should parse");
    let types = type_check(&program, diagnostics);
    assert!(!diagnostics.has_errors(), "{:?}", diagnostics.errors());

    (program, types)
}

fn opcodes(function: FunctionValue) -> Vec<InstructionOpcode> {
    let mut opcodes = vec![];
    for block in function.get_basic_blocks() {
        let mut instruction = block.get_first_instruction();
        while let Some(current) = instruction {
            opcodes.push(current.get_opcode());
            instruction = current.get_next_instruction();
        }
    }
    opcodes
}

fn find_instruction(function: FunctionValue, opcode: InstructionOpcode) -> Option<InstructionValue> {
    function.get_basic_blocks().into_iter().find_map(|block| {
        let mut instruction = block.get_first_instruction();
        while let Some(current) = instruction {
            if current.get_opcode() == opcode {
                return Some(current);
            }
            instruction = current.get_next_instruction();
        }
        None
    })
}

/// Parses and type checks `source`, ignoring type errors so code generation
/// can be exercised on programs the driver would reject.
fn unchecked_front_end(source: &str) -> (Program, TypeTable) {
    let mut diagnostics = Diagnostics::new();
    let tokens = tokenize(source, &mut diagnostics).expect("source should tokenize");
    let program = parse(tokens, &mut diagnostics).expect("source should parse");
    let types = type_check(&program, &mut diagnostics);

    (program, types)
}

fn assert_compiles(compiler: &Compiler, diagnostics: &Diagnostics) {
    assert!(!diagnostics.has_errors(), "{:?}", diagnostics.errors());
    assert!(
        compiler.module.verify().is_ok(),
        "{}",
        compiler.print_module()
    );
}

#[test]
fn test_compile_add_function() {
    let source = "func add(a: int, b: int) -> int { return a + b; }";
    let mut diagnostics = Diagnostics::new();
    let (program, types) = front_end(source, &mut diagnostics);

    let context = Context::create();
    let compiler = compile(&program, &types, &context, "test.fern", &mut diagnostics);
    assert_compiles(&compiler, &diagnostics);

    let add = compiler.module.get_function("add").unwrap();
    assert_eq!(add.count_basic_blocks(), 1);
    assert_eq!(add.count_params(), 2);

    let opcodes = opcodes(add);
    assert!(opcodes.contains(&InstructionOpcode::Add));
    assert_eq!(opcodes.last(), Some(&InstructionOpcode::Return));
}

#[test]
fn test_compile_if_else_value() {
    let source = "func pick(c: bool) -> int { if c { 1 } else { 2 } }";
    let mut diagnostics = Diagnostics::new();
    let (program, types) = front_end(source, &mut diagnostics);

    let context = Context::create();
    let compiler = compile(&program, &types, &context, "test.fern", &mut diagnostics);
    assert_compiles(&compiler, &diagnostics);

    let pick = compiler.module.get_function("pick").unwrap();
    assert_eq!(pick.count_basic_blocks(), 4);
    assert!(opcodes(pick).contains(&InstructionOpcode::Phi));
    assert!(opcodes(pick).contains(&InstructionOpcode::Br));
}

#[test]
fn test_compile_returns_in_both_arms() {
    let source = "func sign(n: int) -> int { if n < 0 { return -1; } else { return 1; } }";
    let mut diagnostics = Diagnostics::new();
    let (program, types) = front_end(source, &mut diagnostics);

    let context = Context::create();
    let compiler = compile(&program, &types, &context, "test.fern", &mut diagnostics);
    assert_compiles(&compiler, &diagnostics);

    let sign = compiler.module.get_function("sign").unwrap();
    assert!(!opcodes(sign).contains(&InstructionOpcode::Phi));
    assert!(opcodes(sign).contains(&InstructionOpcode::ICmp));
}

#[test]
fn test_compile_extern_and_calls() {
    let source = "extern func puts(s: str) -> int;\n\
                  func greet() { puts(\"hello\\n\"); }\n\
                  func main() -> int { greet(); return 0; }";
    let mut diagnostics = Diagnostics::new();
    let (program, types) = front_end(source, &mut diagnostics);

    let context = Context::create();
    let compiler = compile(&program, &types, &context, "test.fern", &mut diagnostics);
    assert_compiles(&compiler, &diagnostics);

    let puts = compiler.module.get_function("puts").unwrap();
    assert_eq!(puts.count_basic_blocks(), 0);

    let greet = compiler.module.get_function("greet").unwrap();
    assert!(greet.get_type().get_return_type().is_none());
    assert!(opcodes(greet).contains(&InstructionOpcode::Call));

    assert!(compiler.print_module().contains("hello\\0A"));
}

#[test]
fn test_compile_if_with_one_returning_arm() {
    let source = "func f(x: bool) -> int { if x { return 1; } else { 2 } }";
    let mut diagnostics = Diagnostics::new();
    let (program, types) = front_end(source, &mut diagnostics);

    let context = Context::create();
    let compiler = compile(&program, &types, &context, "test.fern", &mut diagnostics);
    assert_compiles(&compiler, &diagnostics);

    let f = compiler.module.get_function("f").unwrap();
    let opcodes = opcodes(f);
    assert!(!opcodes.contains(&InstructionOpcode::Unreachable));
    assert!(!opcodes.contains(&InstructionOpcode::Phi));
    assert_eq!(
        opcodes
            .iter()
            .filter(|opcode| **opcode == InstructionOpcode::Return)
            .count(),
        2
    );
    assert!(compiler.print_module().contains("ret i32 2"));
}

#[test]
fn test_compile_call_arguments() {
    let source = "func g(a: int) -> int { a }\nfunc f() -> int { g(1) }";
    let mut diagnostics = Diagnostics::new();
    let (program, types) = front_end(source, &mut diagnostics);

    let context = Context::create();
    let compiler = compile(&program, &types, &context, "test.fern", &mut diagnostics);
    assert_compiles(&compiler, &diagnostics);

    let f = compiler.module.get_function("f").unwrap();
    let call = find_instruction(f, InstructionOpcode::Call).unwrap();

    // One argument plus the callee
    assert_eq!(call.get_num_operands(), 2);
    match call.get_operand(0).and_then(|operand| operand.left()) {
        Some(BasicValueEnum::IntValue(argument)) => {
            assert_eq!(argument.get_type().get_bit_width(), 32);
        }
        operand => panic!("unexpected call operand {:?}", operand),
    }
}

#[test]
fn test_compile_unary_operators() {
    let source = "func n(a: int, b: float, c: bool) -> bool { -a; -b; !c }";
    let mut diagnostics = Diagnostics::new();
    let (program, types) = front_end(source, &mut diagnostics);

    let context = Context::create();
    let compiler = compile(&program, &types, &context, "test.fern", &mut diagnostics);
    assert_compiles(&compiler, &diagnostics);

    let opcodes = opcodes(compiler.module.get_function("n").unwrap());
    assert!(opcodes.contains(&InstructionOpcode::Sub));
    assert!(opcodes.contains(&InstructionOpcode::FNeg));
    assert!(opcodes.contains(&InstructionOpcode::Xor));
}

#[test]
fn test_compile_nested_block() {
    let source = "func b() -> int { let x = 1; { x + 1 } }";
    let mut diagnostics = Diagnostics::new();
    let (program, types) = front_end(source, &mut diagnostics);

    let context = Context::create();
    let compiler = compile(&program, &types, &context, "test.fern", &mut diagnostics);
    assert_compiles(&compiler, &diagnostics);

    let b = compiler.module.get_function("b").unwrap();
    assert_eq!(b.count_basic_blocks(), 2);

    let entry = b.get_first_basic_block().unwrap();
    let branch = entry.get_terminator().unwrap();
    assert_eq!(branch.get_opcode(), InstructionOpcode::Br);
    assert_eq!(
        b.get_last_basic_block().unwrap().get_terminator().unwrap().get_opcode(),
        InstructionOpcode::Return
    );
}

#[test]
fn test_call_before_definition_is_rejected() {
    let source = "func a() -> int { b() }\nfunc b() -> int { let x = 99999999999; 1 }";
    let (program, types) = unchecked_front_end(source);

    let mut diagnostics = Diagnostics::new();
    let context = Context::create();
    let compiler = compile(&program, &types, &context, "test.fern", &mut diagnostics);

    let kinds: Vec<&ErrorImpl> = diagnostics.errors().iter().map(|error| error.get_kind()).collect();
    assert!(matches!(
        kinds.as_slice(),
        [ErrorImpl::FunctionNotFound { .. }, ErrorImpl::InvalidNumber { .. }]
    ));
    assert!(compiler.module.get_function("a").is_none());
    assert!(compiler.module.get_function("b").is_none());
    assert!(compiler.module.verify().is_ok());
    assert!(!compiler.print_module().contains("define"));
}

#[test]
fn test_failed_function_keeps_called_declaration() {
    let source = "extern func b() -> int;\n\
                  func a() -> int { b() }\n\
                  func b() -> int { let x = 99999999999; 1 }";
    let (program, types) = unchecked_front_end(source);

    let mut diagnostics = Diagnostics::new();
    let context = Context::create();
    let compiler = compile(&program, &types, &context, "test.fern", &mut diagnostics);

    assert_eq!(diagnostics.error_count(), 1);
    assert!(matches!(
        diagnostics.errors()[0].get_kind(),
        ErrorImpl::InvalidNumber { token } if token == "99999999999"
    ));

    let b = compiler.module.get_function("b").unwrap();
    assert_eq!(b.count_basic_blocks(), 0);
    assert!(find_instruction(compiler.module.get_function("a").unwrap(), InstructionOpcode::Call).is_some());
    assert!(compiler.module.verify().is_ok());
    assert!(compiler.print_module().contains("declare i32 @b()"));
}

#[test]
fn test_compile_division_is_float() {
    let source = "func half(a: int) -> float { return a / 2; }";
    let mut diagnostics = Diagnostics::new();
    let (program, types) = front_end(source, &mut diagnostics);

    let context = Context::create();
    let compiler = compile(&program, &types, &context, "test.fern", &mut diagnostics);
    assert_compiles(&compiler, &diagnostics);

    let opcodes = opcodes(compiler.module.get_function("half").unwrap());
    assert!(opcodes.contains(&InstructionOpcode::SIToFP));
    assert!(opcodes.contains(&InstructionOpcode::FDiv));
}

#[test]
fn test_compile_variables_and_assignment() {
    let source = "func count() -> int { let x = 1; x = x + 1; y := 2.5; x }";
    let mut diagnostics = Diagnostics::new();
    let (program, types) = front_end(source, &mut diagnostics);

    let context = Context::create();
    let compiler = compile(&program, &types, &context, "test.fern", &mut diagnostics);
    assert_compiles(&compiler, &diagnostics);

    let opcodes = opcodes(compiler.module.get_function("count").unwrap());
    assert_eq!(
        opcodes
            .iter()
            .filter(|opcode| **opcode == InstructionOpcode::Alloca)
            .count(),
        2
    );
    assert!(opcodes.contains(&InstructionOpcode::Store));
}

#[test]
fn test_compile_char_and_subscript() {
    let source = "func first(s: str) -> char { return s[0]; }\n\
                  func newline() -> char { '\\n' }";
    let mut diagnostics = Diagnostics::new();
    let (program, types) = front_end(source, &mut diagnostics);

    let context = Context::create();
    let compiler = compile(&program, &types, &context, "test.fern", &mut diagnostics);
    assert_compiles(&compiler, &diagnostics);

    let first = compiler.module.get_function("first").unwrap();
    assert!(opcodes(first).contains(&InstructionOpcode::GetElementPtr));
    assert!(compiler.print_module().contains("ret i8 10"));
}

#[test]
fn test_unterminated_string_stops_at_lexing() {
    let mut diagnostics = Diagnostics::new();
    let tokens = tokenize("func f() { \"abc", &mut diagnostics);

    assert!(tokens.is_none());
    assert_eq!(diagnostics.error_count(), 1);
    assert_eq!(
        diagnostics.errors()[0].get_kind(),
        &ErrorImpl::UnterminatedString
    );
}

#[test]
fn test_type_errors_are_collected() {
    let mut diagnostics = Diagnostics::new();
    let tokens = tokenize("func f() -> int { let x = true; x + 1; return 1; }", &mut diagnostics).unwrap();
    let program = parse(tokens, &mut diagnostics).unwrap();
    type_check(&program, &mut diagnostics);

    assert_eq!(diagnostics.error_count(), 1);
    assert_eq!(
        diagnostics.errors()[0].get_kind(),
        &ErrorImpl::ArithmeticTypeMismatch
    );
}

#[test]
fn test_codegen_error_removes_function() {
    let (program, types) = unchecked_front_end("func f() { break; }\nfunc g() -> int { 1 }");

    let mut diagnostics = Diagnostics::new();
    let context = Context::create();
    let compiler = compile(&program, &types, &context, "test.fern", &mut diagnostics);

    assert_eq!(diagnostics.error_count(), 1);
    assert_eq!(diagnostics.errors()[0].get_kind(), &ErrorImpl::InvalidSingleOp);
    assert!(compiler.module.get_function("f").is_none());
    assert!(compiler.module.get_function("g").is_some());
}

#[test]
fn test_numbers_follow_resolved_types() {
    let mut diagnostics = Diagnostics::new();
    let tokens = tokenize("func g() -> int { 1 }", &mut diagnostics).unwrap();
    let program = parse(tokens, &mut diagnostics).unwrap();
    let types = TypeTable::new(program.ast.len());

    let context = Context::create();
    let compiler = compile(&program, &types, &context, "test.fern", &mut diagnostics);

    assert_eq!(diagnostics.error_count(), 1);
    assert!(matches!(
        diagnostics.errors()[0].get_kind(),
        ErrorImpl::InvalidNumber { .. }
    ));
    assert!(compiler.module.get_function("g").is_none());
}
