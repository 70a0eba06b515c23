use inkwell::values::{BasicValue, BasicValueEnum, FunctionValue};

use crate::{
    ast::{
        ast::{ExprId, ExprKind, Function, Prototype},
        types::Type,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    SourceLocation,
};

use super::{
    compiler::{Compiler, Located, Slot},
    expr::gen_expression,
};

pub type GenResult<'a> = Result<Option<BasicValueEnum<'a>>, Error>;

/// Declares a function in the module.
///
/// LLVM renames a declaration whose name is taken, and a mismatched
/// parameter count means the signature could not be represented. Both
/// remove the declaration again.
pub fn gen_prototype<'a>(compiler: &Compiler<'a>, prototype: &Prototype) -> Result<FunctionValue<'a>, Error> {
    let function_type = compiler.convert_function_type(prototype)?;
    let function = compiler
        .module
        .add_function(&prototype.name, function_type, None);

    if function.get_name().to_str() != Ok(prototype.name.as_str()) {
        unsafe { function.delete() };
        return Err(Error::new(
            ErrorImpl::FunctionNameInUse {
                function: prototype.name.clone(),
            },
            prototype.location,
        ));
    }

    if function.count_params() as usize != prototype.args.len() {
        unsafe { function.delete() };
        return Err(Error::new(
            ErrorImpl::FunctionArgumentCountMismatch {
                expected: prototype.args.len(),
                received: function.count_params() as usize,
            },
            prototype.location,
        ));
    }

    for (param, arg) in function.get_param_iter().zip(&prototype.args) {
        param.set_name(&arg.name);
    }

    Ok(function)
}

/// Generates the body of a function, reusing an earlier declaration of the
/// same name. A function that fails to generate or to verify is removed
/// from the module.
pub fn gen_function<'a>(compiler: &mut Compiler<'a>, function: &Function) -> Result<(), Error> {
    let prototype = &function.prototype;
    let function_value = match compiler.module.get_function(&prototype.name) {
        Some(function_value) => function_value,
        None => gen_prototype(compiler, prototype)?,
    };

    if function_value.count_basic_blocks() > 0 {
        return Err(Error::new(
            ErrorImpl::FunctionAlreadyDefined {
                function: prototype.name.clone(),
            },
            prototype.location,
        ));
    }

    compiler.current_function = Some(function_value);
    compiler.named_values.push_scope();

    let result = gen_function_body(compiler, function, function_value);

    compiler.named_values.pop_scope();
    compiler.current_function = None;
    compiler.builder.clear_insertion_position();

    if let Err(error) = result {
        discard_function(compiler, function_value, &prototype.name);
        return Err(error);
    }

    if !function_value.verify(true) {
        discard_function(compiler, function_value, &prototype.name);
        return Err(Error::new(
            ErrorImpl::VerificationFailed {
                function: prototype.name.clone(),
            },
            prototype.location,
        ));
    }

    Ok(())
}

/// Removes a function whose body could not be generated. If the symbol is
/// already called from elsewhere, those calls are moved to a fresh bodiless
/// declaration first so no use is left dangling.
fn discard_function<'a>(compiler: &Compiler<'a>, function_value: FunctionValue<'a>, name: &str) {
    let is_used = function_value
        .as_global_value()
        .as_pointer_value()
        .get_first_use()
        .is_some();

    if !is_used {
        unsafe { function_value.delete() };
        return;
    }

    let declaration = compiler
        .module
        .add_function(name, function_value.get_type(), None);
    function_value.replace_all_uses_with(declaration);
    unsafe { function_value.delete() };
    declaration.as_global_value().set_name(name);
}

fn gen_function_body<'a>(
    compiler: &mut Compiler<'a>,
    function: &Function,
    function_value: FunctionValue<'a>,
) -> Result<(), Error> {
    let location = function.prototype.location;
    let entry = compiler.create_basic_block("entry", location)?;
    compiler.builder.position_at_end(entry);

    // Parameters live in stack slots like any other variable
    for (param, arg) in function_value.get_param_iter().zip(&function.prototype.args) {
        let pointer = compiler
            .builder
            .build_alloca(param.get_type(), &arg.name)
            .at(arg.location)?;
        compiler.builder.build_store(pointer, param).at(arg.location)?;
        compiler.named_values.insert(
            arg.name.clone(),
            Slot {
                pointer,
                type_: param.get_type(),
            },
        );
    }

    let tail = gen_block_statements(compiler, function.body)?;

    if !compiler.is_terminated() {
        let return_type = function_value.get_type().get_return_type();

        match (return_type, tail) {
            (None, _) => {
                compiler.builder.build_return(None).at(location)?;
            }
            (Some(return_type), Some(tail)) if tail.get_type() == return_type => {
                compiler.builder.build_return(Some(&tail)).at(location)?;
            }
            _ => {
                compiler.builder.build_unreachable().at(location)?;
            }
        }
    }

    Ok(())
}

/// Statements of a block expression. Any other expression is treated as a
/// block holding just itself.
fn block_statements(compiler: &Compiler, id: ExprId) -> Vec<ExprId> {
    match compiler.program.ast.kind(id) {
        ExprKind::Block { statements } => statements.clone(),
        _ => vec![id],
    }
}

/// Generates the statements of `block` into the current basic block inside
/// a fresh variable scope. Statements after a terminator are skipped.
///
/// # Returns
///
/// The value of the last generated statement.
pub fn gen_block_statements<'a>(compiler: &mut Compiler<'a>, block: ExprId) -> GenResult<'a> {
    compiler.named_values.push_scope();

    let mut value = Ok(None);
    for statement in block_statements(compiler, block) {
        if compiler.is_terminated() {
            break;
        }

        value = gen_expression(compiler, statement);
        if value.is_err() {
            break;
        }
    }

    compiler.named_values.pop_scope();
    value
}

/// A nested block gets its own basic block, entered from the current one.
pub fn gen_block<'a>(compiler: &mut Compiler<'a>, block: ExprId, location: SourceLocation) -> GenResult<'a> {
    let basic_block = compiler.create_basic_block("block", location)?;

    if !compiler.is_terminated() {
        compiler
            .builder
            .build_unconditional_branch(basic_block)
            .at(location)?;
    }
    compiler.builder.position_at_end(basic_block);

    gen_block_statements(compiler, block)
}

pub fn gen_if<'a>(
    compiler: &mut Compiler<'a>,
    condition: ExprId,
    then_block: ExprId,
    else_block: Option<ExprId>,
    location: SourceLocation,
) -> GenResult<'a> {
    let condition_value = match gen_expression(compiler, condition)? {
        Some(BasicValueEnum::IntValue(value)) => value,
        _ => return Err(Error::new(ErrorImpl::InvalidType, location)),
    };

    let then_bb = compiler.create_basic_block("then", location)?;
    let else_bb = match else_block {
        Some(_) => Some(compiler.create_basic_block("else", location)?),
        None => None,
    };
    let merge_bb = compiler.create_basic_block("ifcont", location)?;

    compiler
        .builder
        .build_conditional_branch(condition_value, then_bb, else_bb.unwrap_or(merge_bb))
        .at(location)?;

    // Then arm
    compiler.builder.position_at_end(then_bb);
    let then_value = gen_block_statements(compiler, then_block)?;
    let then_end = compiler.current_block(location)?;
    let then_reaches_merge = !compiler.is_terminated();
    if then_reaches_merge {
        compiler
            .builder
            .build_unconditional_branch(merge_bb)
            .at(location)?;
    }

    // Else arm
    let mut else_arm = None;
    if let (Some(else_block), Some(else_bb)) = (else_block, else_bb) {
        compiler.builder.position_at_end(else_bb);
        let else_value = gen_block_statements(compiler, else_block)?;
        let else_end = compiler.current_block(location)?;
        let else_reaches_merge = !compiler.is_terminated();
        if else_reaches_merge {
            compiler
                .builder
                .build_unconditional_branch(merge_bb)
                .at(location)?;
        }

        else_arm = Some((else_value, else_end, else_reaches_merge));
    }

    compiler.builder.position_at_end(merge_bb);

    // Without an else arm the false edge reaches `ifcont` with no value
    let Some((else_value, else_end, else_reaches_merge)) = else_arm else {
        return Ok(None);
    };

    match (then_value, else_value) {
        (Some(then_value), Some(else_value))
            if then_reaches_merge
                && else_reaches_merge
                && then_value.get_type() == else_value.get_type() =>
        {
            let phi = compiler
                .builder
                .build_phi(then_value.get_type(), "iftmp")
                .at(location)?;
            phi.add_incoming(&[
                (&then_value as &dyn BasicValue<'a>, then_end),
                (&else_value as &dyn BasicValue<'a>, else_end),
            ]);

            Ok(Some(phi.as_basic_value()))
        }
        // A single arm reaching `ifcont` is its only predecessor
        (Some(then_value), _) if then_reaches_merge && !else_reaches_merge => Ok(Some(then_value)),
        (_, Some(else_value)) if else_reaches_merge && !then_reaches_merge => Ok(Some(else_value)),
        _ => Ok(None),
    }
}

/// Every binding gets a stack slot holding its current value.
pub fn gen_let<'a>(compiler: &mut Compiler<'a>, name: &str, value: ExprId, location: SourceLocation) -> GenResult<'a> {
    let value = gen_expression(compiler, value)?
        .ok_or_else(|| Error::new(ErrorImpl::InvalidType, location))?;

    let pointer = compiler
        .builder
        .build_alloca(value.get_type(), name)
        .at(location)?;
    compiler.builder.build_store(pointer, value).at(location)?;

    compiler.named_values.insert(
        name,
        Slot {
            pointer,
            type_: value.get_type(),
        },
    );

    Ok(Some(value))
}

pub fn gen_single_op<'a>(
    compiler: &mut Compiler<'a>,
    operator: TokenKind,
    value: Option<ExprId>,
    location: SourceLocation,
) -> GenResult<'a> {
    if operator != TokenKind::Return {
        return Err(Error::new(ErrorImpl::InvalidSingleOp, location));
    }

    let returned = match value {
        Some(value) if compiler.types.get(value) != Type::VOID => gen_expression(compiler, value)?,
        Some(value) => {
            gen_expression(compiler, value)?;
            None
        }
        None => None,
    };

    match returned {
        Some(returned) => compiler
            .builder
            .build_return(Some(&returned as &dyn BasicValue<'a>))
            .at(location)?,
        None => compiler.builder.build_return(None).at(location)?,
    };

    Ok(None)
}
