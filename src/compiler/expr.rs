use inkwell::{
    values::{BasicMetadataValueEnum, BasicValueEnum, FloatValue, IntValue},
    FloatPredicate, IntPredicate,
};

use crate::{
    ast::{
        ast::{ExprId, ExprKind},
        types::Type,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::{lexer::unescape, tokens::TokenKind},
    SourceLocation,
};

use super::{
    compiler::{Compiler, Located},
    stmt::{gen_block, gen_if, gen_let, gen_single_op, GenResult},
};

/// Generates LLVM IR for the given expression.
///
/// # Returns
///
/// The value of the expression, or `None` when it produces no value
/// (a `return`, a call to a void function, an `if` without a merged value).
pub fn gen_expression<'a>(compiler: &mut Compiler<'a>, id: ExprId) -> GenResult<'a> {
    let program = compiler.program;
    let location = program.ast.location(id);

    match program.ast.kind(id) {
        ExprKind::Binary { operator, lhs, rhs } => gen_binary(compiler, *operator, *lhs, *rhs, location),
        ExprKind::Unary { operator, operand } => gen_unary(compiler, *operator, *operand, location),
        ExprKind::If {
            condition,
            then_block,
            else_block,
        } => gen_if(compiler, *condition, *then_block, *else_block, location),
        ExprKind::Let { name, value, .. } => gen_let(compiler, name, *value, location),
        ExprKind::Block { .. } => gen_block(compiler, id, location),
        ExprKind::SingleOp { operator, value } => gen_single_op(compiler, *operator, *value, location),
        ExprKind::Call { callee, arguments } => gen_call(compiler, callee, arguments, location),
        ExprKind::Variable { name } => {
            let slot = *compiler.named_values.lookup(name).ok_or_else(|| {
                Error::new(
                    ErrorImpl::VariableNotFound {
                        variable: name.clone(),
                    },
                    location,
                )
            })?;

            // The slot must hold the type the checker resolved for this read
            let expected = compiler
                .convert_type(compiler.types.get(id))
                .map_err(|error| Error::new(error, location))?;
            if slot.type_ != expected {
                return Err(Error::new(ErrorImpl::InvalidType, location));
            }

            let value = compiler
                .builder
                .build_load(slot.pointer, name)
                .at(location)?;
            Ok(Some(value))
        }
        ExprKind::Subscript { operand, index } => {
            let pointer = match gen_expression(compiler, *operand)? {
                Some(BasicValueEnum::PointerValue(pointer)) => pointer,
                _ => return Err(Error::new(ErrorImpl::InvalidType, location)),
            };
            let index = match gen_expression(compiler, *index)? {
                Some(BasicValueEnum::IntValue(index)) => index,
                _ => return Err(Error::new(ErrorImpl::InvalidType, location)),
            };

            let element = unsafe { compiler.builder.build_gep(pointer, &[index], "idx") }.at(location)?;
            let value = compiler
                .builder
                .build_load(element, "elem")
                .at(location)?;
            Ok(Some(value))
        }
        ExprKind::Boolean { value } => Ok(Some(
            compiler
                .context
                .bool_type()
                .const_int(*value as u64, false)
                .into(),
        )),
        ExprKind::Number { value, .. } => {
            let invalid_number = || {
                Error::new(
                    ErrorImpl::InvalidNumber {
                        token: value.clone(),
                    },
                    location,
                )
            };

            match compiler.types.get(id) {
                Type::FLOAT => {
                    let parsed = value.parse::<f64>().map_err(|_| invalid_number())?;
                    Ok(Some(compiler.context.f64_type().const_float(parsed).into()))
                }
                Type::INT => {
                    let parsed = value.parse::<i32>().map_err(|_| invalid_number())?;
                    Ok(Some(
                        compiler
                            .context
                            .i32_type()
                            .const_int(parsed as u64, true)
                            .into(),
                    ))
                }
                _ => Err(invalid_number()),
            }
        }
        ExprKind::String { value } => {
            let global = compiler
                .builder
                .build_global_string_ptr(&unescape(value), "str")
                .at(location)?;
            Ok(Some(global.as_pointer_value().into()))
        }
        ExprKind::Char { value } => {
            let decoded = unescape(value).chars().next().unwrap_or('\0');
            Ok(Some(
                compiler
                    .context
                    .i8_type()
                    .const_int(decoded as u64, false)
                    .into(),
            ))
        }
    }
}

fn expect_value<'a>(value: Option<BasicValueEnum<'a>>, location: SourceLocation) -> Result<BasicValueEnum<'a>, Error> {
    value.ok_or_else(|| Error::new(ErrorImpl::InvalidType, location))
}

fn gen_binary<'a>(
    compiler: &mut Compiler<'a>,
    operator: TokenKind,
    lhs: ExprId,
    rhs: ExprId,
    location: SourceLocation,
) -> GenResult<'a> {
    // The right operand is generated before the left one
    let rhs_value = expect_value(gen_expression(compiler, rhs)?, location)?;

    if operator == TokenKind::Equal {
        return gen_assignment(compiler, lhs, rhs_value, location);
    }

    let lhs_value = expect_value(gen_expression(compiler, lhs)?, location)?;

    match (lhs_value, rhs_value) {
        (BasicValueEnum::IntValue(lhs), BasicValueEnum::IntValue(rhs)) => {
            gen_int_binary(compiler, operator, lhs, rhs, location)
        }
        (BasicValueEnum::FloatValue(lhs), BasicValueEnum::FloatValue(rhs)) => {
            gen_float_binary(compiler, operator, lhs, rhs, location)
        }
        (BasicValueEnum::PointerValue(lhs), BasicValueEnum::PointerValue(rhs)) => {
            let predicate = match operator {
                TokenKind::EqualEqual => IntPredicate::EQ,
                TokenKind::BangEqual => IntPredicate::NE,
                _ => return Err(Error::new(ErrorImpl::InvalidBinaryOp, location)),
            };

            let address_type = compiler.context.i64_type();
            let lhs = compiler
                .builder
                .build_ptr_to_int(lhs, address_type, "lhsaddr")
                .at(location)?;
            let rhs = compiler
                .builder
                .build_ptr_to_int(rhs, address_type, "rhsaddr")
                .at(location)?;

            let value = compiler
                .builder
                .build_int_compare(predicate, lhs, rhs, "cmptmp")
                .at(location)?;
            Ok(Some(value.into()))
        }
        _ => Err(Error::new(ErrorImpl::InvalidBinaryOp, location)),
    }
}

fn gen_assignment<'a>(
    compiler: &mut Compiler<'a>,
    target: ExprId,
    value: BasicValueEnum<'a>,
    location: SourceLocation,
) -> GenResult<'a> {
    let ExprKind::Variable { name } = compiler.program.ast.kind(target) else {
        return Err(Error::new(ErrorImpl::InvalidBinaryOp, location));
    };

    let slot = *compiler.named_values.lookup(name).ok_or_else(|| {
        Error::new(
            ErrorImpl::VariableNotFound {
                variable: name.clone(),
            },
            location,
        )
    })?;

    if slot.type_ != value.get_type() {
        return Err(Error::new(ErrorImpl::StoreTypeMismatch, location).with_note(format!(
            "variable `{}` is stored as {}, value is {}",
            name,
            slot.type_.print_to_string(),
            value.get_type().print_to_string()
        )));
    }

    compiler
        .builder
        .build_store(slot.pointer, value)
        .at(location)?;

    Ok(Some(value))
}

fn gen_int_binary<'a>(
    compiler: &Compiler<'a>,
    operator: TokenKind,
    lhs: IntValue<'a>,
    rhs: IntValue<'a>,
    location: SourceLocation,
) -> GenResult<'a> {
    let builder = &compiler.builder;

    let predicate = match operator {
        TokenKind::Plus => return Ok(Some(builder.build_int_add(lhs, rhs, "addtmp").at(location)?.into())),
        TokenKind::Minus => return Ok(Some(builder.build_int_sub(lhs, rhs, "subtmp").at(location)?.into())),
        TokenKind::Star => return Ok(Some(builder.build_int_mul(lhs, rhs, "multmp").at(location)?.into())),
        TokenKind::Slash => {
            // Integer division produces a float
            let float_type = compiler.context.f64_type();
            let lhs = builder
                .build_signed_int_to_float(lhs, float_type, "lhsfp")
                .at(location)?;
            let rhs = builder
                .build_signed_int_to_float(rhs, float_type, "rhsfp")
                .at(location)?;
            return Ok(Some(builder.build_float_div(lhs, rhs, "divtmp").at(location)?.into()));
        }
        TokenKind::EqualEqual => IntPredicate::EQ,
        TokenKind::BangEqual => IntPredicate::NE,
        TokenKind::Less => IntPredicate::SLT,
        TokenKind::LessEqual => IntPredicate::SLE,
        TokenKind::Greater => IntPredicate::SGT,
        TokenKind::GreaterEqual => IntPredicate::SGE,
        _ => return Err(Error::new(ErrorImpl::InvalidBinaryOp, location)),
    };

    let value = builder
        .build_int_compare(predicate, lhs, rhs, "cmptmp")
        .at(location)?;
    Ok(Some(value.into()))
}

fn gen_float_binary<'a>(
    compiler: &Compiler<'a>,
    operator: TokenKind,
    lhs: FloatValue<'a>,
    rhs: FloatValue<'a>,
    location: SourceLocation,
) -> GenResult<'a> {
    let builder = &compiler.builder;

    let predicate = match operator {
        TokenKind::Plus => return Ok(Some(builder.build_float_add(lhs, rhs, "addtmp").at(location)?.into())),
        TokenKind::Minus => return Ok(Some(builder.build_float_sub(lhs, rhs, "subtmp").at(location)?.into())),
        TokenKind::Star => return Ok(Some(builder.build_float_mul(lhs, rhs, "multmp").at(location)?.into())),
        TokenKind::Slash => return Ok(Some(builder.build_float_div(lhs, rhs, "divtmp").at(location)?.into())),
        TokenKind::EqualEqual => FloatPredicate::OEQ,
        TokenKind::BangEqual => FloatPredicate::ONE,
        TokenKind::Less => FloatPredicate::OLT,
        TokenKind::LessEqual => FloatPredicate::OLE,
        TokenKind::Greater => FloatPredicate::OGT,
        TokenKind::GreaterEqual => FloatPredicate::OGE,
        _ => return Err(Error::new(ErrorImpl::InvalidBinaryOp, location)),
    };

    let value = builder
        .build_float_compare(predicate, lhs, rhs, "cmptmp")
        .at(location)?;
    Ok(Some(value.into()))
}

fn gen_unary<'a>(
    compiler: &mut Compiler<'a>,
    operator: TokenKind,
    operand: ExprId,
    location: SourceLocation,
) -> GenResult<'a> {
    let value = expect_value(gen_expression(compiler, operand)?, location)?;

    let result: BasicValueEnum<'a> = match (operator, value) {
        (TokenKind::Minus, BasicValueEnum::IntValue(value)) => compiler
            .builder
            .build_int_neg(value, "negtmp")
            .at(location)?
            .into(),
        (TokenKind::Minus, BasicValueEnum::FloatValue(value)) => compiler
            .builder
            .build_float_neg(value, "negtmp")
            .at(location)?
            .into(),
        (TokenKind::Bang, BasicValueEnum::IntValue(value)) => compiler
            .builder
            .build_not(value, "nottmp")
            .at(location)?
            .into(),
        _ => return Err(Error::new(ErrorImpl::InvalidUnaryOp, location)),
    };

    Ok(Some(result))
}

fn gen_call<'a>(
    compiler: &mut Compiler<'a>,
    callee: &str,
    arguments: &[ExprId],
    location: SourceLocation,
) -> GenResult<'a> {
    let function = compiler.module.get_function(callee).ok_or_else(|| {
        Error::new(
            ErrorImpl::FunctionNotFound {
                function: callee.to_string(),
            },
            location,
        )
    })?;

    if function.count_params() as usize != arguments.len() {
        return Err(Error::new(
            ErrorImpl::FunctionArgumentCountMismatch {
                expected: function.count_params() as usize,
                received: arguments.len(),
            },
            location,
        ));
    }

    let mut args: Vec<BasicMetadataValueEnum<'a>> = Vec::with_capacity(arguments.len());
    for argument in arguments {
        let value = expect_value(gen_expression(compiler, *argument)?, location)?;
        args.push(value.into());
    }

    // Void calls cannot carry a result name
    let name = if function.get_type().get_return_type().is_some() {
        "calltmp"
    } else {
        ""
    };

    let call = compiler
        .builder
        .build_call(function, &args, name)
        .at(location)?;

    Ok(call.try_as_basic_value().left())
}
