use std::collections::HashMap;

use crate::{
    ast::{
        ast::{ExprId, ExprKind, Function, Program, Prototype},
        symbol_table::SymbolTable,
        types::Type,
    },
    errors::{diagnostics::Diagnostics, errors::ErrorImpl},
    lexer::tokens::TokenKind,
    SourceLocation,
};

use super::type_table::TypeTable;

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSignature {
    pub params: Vec<Type>,
    pub return_type: Type,
}

pub struct TypeChecker<'a> {
    pub program: &'a Program,
    pub diagnostics: &'a mut Diagnostics,
    pub types: TypeTable,
    pub symbols: SymbolTable<Type>,
    pub functions: HashMap<String, FunctionSignature>,
    /// Declared return type of the function being checked
    pub current_return_type: Option<Type>,
}

impl<'a> TypeChecker<'a> {
    pub fn new(program: &'a Program, diagnostics: &'a mut Diagnostics) -> Self {
        TypeChecker {
            program,
            diagnostics,
            types: TypeTable::new(program.ast.len()),
            symbols: SymbolTable::new(),
            functions: HashMap::new(),
            current_return_type: None,
        }
    }

    fn error(&mut self, error: ErrorImpl, location: SourceLocation) {
        self.diagnostics.record_error(error, location);
    }

    fn note(&mut self, note: String) {
        self.diagnostics.record_note(note);
    }
}

fn is_comparison(operator: TokenKind) -> bool {
    matches!(
        operator,
        TokenKind::EqualEqual
            | TokenKind::BangEqual
            | TokenKind::Less
            | TokenKind::LessEqual
            | TokenKind::Greater
            | TokenKind::GreaterEqual
    )
}

fn is_arithmetic(operator: TokenKind) -> bool {
    matches!(
        operator,
        TokenKind::Plus | TokenKind::Minus | TokenKind::Star | TokenKind::Slash
    )
}

/// Registers the signature of a function or extern. A name that is already
/// taken is reported and then overwritten.
pub fn type_check_prototype(type_checker: &mut TypeChecker, prototype: &Prototype) {
    if type_checker.functions.contains_key(&prototype.name) {
        type_checker.error(
            ErrorImpl::DuplicateFunction {
                function: prototype.name.clone(),
            },
            prototype.location,
        );
    }

    type_checker.functions.insert(
        prototype.name.clone(),
        FunctionSignature {
            params: prototype.args.iter().map(|arg| arg.type_).collect(),
            return_type: prototype.return_type,
        },
    );
}

/// Registers the prototype, then checks the body. Only functions registered
/// so far, and the function itself, are callable from the body.
pub fn type_check_function(type_checker: &mut TypeChecker, function: &Function) {
    type_check_prototype(type_checker, &function.prototype);

    type_checker.symbols.push_scope();
    for arg in &function.prototype.args {
        type_checker.symbols.insert(arg.name.clone(), arg.type_);
    }

    type_checker.current_return_type = Some(function.prototype.return_type);
    type_check_expr(type_checker, function.body);
    type_checker.current_return_type = None;

    type_checker.symbols.pop_scope();
}

/// Resolves the type of `id`, records it in the type table and returns it.
pub fn type_check_expr(type_checker: &mut TypeChecker, id: ExprId) -> Type {
    let type_ = resolve_expr(type_checker, id);
    type_checker.types.set(id, type_);
    type_
}

fn resolve_expr(type_checker: &mut TypeChecker, id: ExprId) -> Type {
    let program = type_checker.program;
    let location = program.ast.location(id);

    match program.ast.kind(id) {
        ExprKind::Number { is_float, .. } => {
            if *is_float {
                Type::FLOAT
            } else {
                Type::INT
            }
        }
        ExprKind::Boolean { .. } => Type::BOOL,
        ExprKind::String { .. } => Type::STR,
        ExprKind::Char { .. } => Type::CHAR,
        ExprKind::Variable { name } => match type_checker.symbols.lookup(name) {
            Some(type_) => *type_,
            None => {
                type_checker.error(
                    ErrorImpl::UnknownVariable {
                        variable: name.clone(),
                    },
                    location,
                );
                Type::INVALID
            }
        },
        ExprKind::Let {
            name,
            annotation,
            value,
        } => {
            let value_type = type_check_expr(type_checker, *value);

            if let Some(annotation) = annotation {
                if !value_type.is_invalid() && *annotation != value_type {
                    type_checker.error(ErrorImpl::AnnotationMismatch, location);
                    type_checker.note(format!(
                        "variable `{}` annotated as {}, value is {}",
                        name, annotation, value_type
                    ));
                }
            }

            if type_checker.symbols.local_lookup(name).is_some() {
                type_checker.error(
                    ErrorImpl::DuplicateVariable {
                        variable: name.clone(),
                    },
                    location,
                );
            }

            type_checker.symbols.insert(name.clone(), value_type);
            value_type
        }
        ExprKind::Block { statements } => {
            type_checker.symbols.push_scope();

            let mut type_ = Type::VOID;
            let mut after_return = false;
            for statement in statements {
                if after_return {
                    type_checker
                        .diagnostics
                        .record_warning(ErrorImpl::UnreachableCode, program.ast.location(*statement));
                    after_return = false;
                }

                type_ = type_check_expr(type_checker, *statement);
                after_return |= matches!(
                    program.ast.kind(*statement),
                    ExprKind::SingleOp {
                        operator: TokenKind::Return,
                        ..
                    }
                );
            }

            type_checker.symbols.pop_scope();
            type_
        }
        ExprKind::If {
            condition,
            then_block,
            else_block,
        } => {
            let condition_type = type_check_expr(type_checker, *condition);
            if !condition_type.is_invalid() && condition_type != Type::BOOL {
                type_checker.error(ErrorImpl::NonBoolCondition, program.ast.location(*condition));
                type_checker.note(format!("condition type is {}", condition_type));
            }

            let then_type = type_check_expr(type_checker, *then_block);
            if let Some(else_block) = else_block {
                let else_type = type_check_expr(type_checker, *else_block);

                if !then_type.is_invalid() && !else_type.is_invalid() && then_type != else_type {
                    type_checker.error(ErrorImpl::IfBranchMismatch, location);
                    type_checker.note(format!(
                        "then block is {}, else block is {}",
                        then_type, else_type
                    ));
                }
            }

            then_type
        }
        ExprKind::Binary { operator, lhs, rhs } => {
            let lhs_type = type_check_expr(type_checker, *lhs);
            let rhs_type = type_check_expr(type_checker, *rhs);
            let operands_valid = !lhs_type.is_invalid() && !rhs_type.is_invalid();

            match operator {
                TokenKind::Equal | TokenKind::ColonEqual => {
                    if operands_valid && lhs_type != rhs_type {
                        type_checker.error(ErrorImpl::ReassignTypeMismatch, location);

                        let name = match program.ast.kind(*lhs) {
                            ExprKind::Variable { name } => name.as_str(),
                            _ => "?",
                        };
                        type_checker.note(format!(
                            "variable `{}` expected type {}, got {}",
                            name, lhs_type, rhs_type
                        ));
                    }
                    lhs_type
                }
                operator if is_comparison(*operator) => {
                    if operands_valid && lhs_type != rhs_type {
                        type_checker.error(ErrorImpl::ComparisonTypeMismatch, location);
                        type_checker.note(format!("LHS is {}, RHS is {}", lhs_type, rhs_type));
                    }
                    Type::BOOL
                }
                operator if is_arithmetic(*operator) => {
                    if !operands_valid {
                        return Type::INVALID;
                    }

                    if !lhs_type.is_numeric() || lhs_type != rhs_type {
                        type_checker.error(ErrorImpl::ArithmeticTypeMismatch, location);
                        type_checker.note(format!("LHS is {}, RHS is {}", lhs_type, rhs_type));
                    }

                    if *operator == TokenKind::Slash {
                        Type::FLOAT
                    } else {
                        lhs_type
                    }
                }
                operator => {
                    type_checker.error(
                        ErrorImpl::UnknownBinaryOperator {
                            operator: operator.to_string(),
                        },
                        location,
                    );
                    Type::INVALID
                }
            }
        }
        ExprKind::Unary { operator, operand } => {
            let operand_type = type_check_expr(type_checker, *operand);
            if operand_type.is_invalid() {
                return Type::INVALID;
            }

            match operator {
                TokenKind::Minus if operand_type.is_numeric() => operand_type,
                TokenKind::Minus => {
                    type_checker.error(ErrorImpl::ExpectedNumericOperand, location);
                    Type::INVALID
                }
                TokenKind::Bang if operand_type == Type::BOOL => Type::BOOL,
                TokenKind::Bang => {
                    type_checker.error(ErrorImpl::ExpectedBoolOperand, location);
                    Type::INVALID
                }
                operator => {
                    type_checker.error(
                        ErrorImpl::UnknownUnaryOperator {
                            operator: operator.to_string(),
                        },
                        location,
                    );
                    Type::INVALID
                }
            }
        }
        ExprKind::SingleOp {
            operator: TokenKind::Return,
            value,
        } => {
            let value_type = match value {
                Some(value) => type_check_expr(type_checker, *value),
                None => Type::VOID,
            };

            match type_checker.current_return_type {
                None => {
                    type_checker.error(ErrorImpl::ReturnOutsideFunction, location);
                    Type::INVALID
                }
                Some(return_type) => {
                    if !value_type.is_invalid() && value_type != return_type {
                        type_checker.error(ErrorImpl::ReturnTypeMismatch, location);
                        type_checker.note(format!(
                            "function returns {}, value type is {}",
                            return_type, value_type
                        ));
                    }
                    value_type
                }
            }
        }
        ExprKind::SingleOp { .. } => {
            type_checker.error(ErrorImpl::LoopControlOutsideLoop, location);
            Type::VOID
        }
        ExprKind::Call { callee, arguments } => {
            let Some(signature) = type_checker.functions.get(callee).cloned() else {
                type_checker.error(
                    ErrorImpl::UnknownFunction {
                        function: callee.clone(),
                    },
                    location,
                );
                return Type::INVALID;
            };

            if signature.params.len() != arguments.len() {
                type_checker.error(
                    ErrorImpl::ArgumentCountMismatch {
                        expected: signature.params.len(),
                        received: arguments.len(),
                    },
                    location,
                );
                return Type::INVALID;
            }

            for (argument, param) in arguments.iter().zip(&signature.params) {
                let argument_type = type_check_expr(type_checker, *argument);
                if argument_type.is_invalid() {
                    return Type::INVALID;
                }

                if argument_type != *param {
                    type_checker.error(
                        ErrorImpl::ArgumentTypeMismatch,
                        program.ast.location(*argument),
                    );
                    type_checker.note(format!(
                        "parameter of `{}` expects {}, got {}",
                        callee, param, argument_type
                    ));
                    return Type::INVALID;
                }
            }

            signature.return_type
        }
        ExprKind::Subscript { operand, index } => {
            let operand_type = type_check_expr(type_checker, *operand);
            let index_type = type_check_expr(type_checker, *index);
            if operand_type.is_invalid() || index_type.is_invalid() {
                return Type::INVALID;
            }

            if !operand_type.is_indexable() {
                type_checker.error(ErrorImpl::NotIndexable, location);
                type_checker.note(format!("operand type is {}", operand_type));
                return Type::INVALID;
            }

            if index_type != Type::INT {
                type_checker.error(ErrorImpl::NonIntegerIndex, program.ast.location(*index));
                return Type::INVALID;
            }

            operand_type.dereference().unwrap_or(Type::INVALID)
        }
    }
}

/// Type checks a whole program.
///
/// Externs are registered first, then functions are checked in source order.
/// A function may call externs, itself and the functions defined above it.
/// Errors are recorded in `diagnostics` and checking continues with the next
/// expression.
///
/// # Returns
///
/// The type of every expression of `program.ast`.
pub fn type_check(program: &Program, diagnostics: &mut Diagnostics) -> TypeTable {
    let mut type_checker = TypeChecker::new(program, diagnostics);

    for extern_def in &program.externs {
        type_check_prototype(&mut type_checker, &extern_def.prototype);
    }

    for function in &program.functions {
        type_check_function(&mut type_checker, function);
    }

    type_checker.types
}
