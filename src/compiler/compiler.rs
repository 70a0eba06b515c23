//! Main compiler module.
//!
//! This module contains the core Compiler structure that drives inkwell's
//! builder over a type checked program. It owns the LLVM module being
//! built, maps language types to LLVM types and walks the top level items.

use std::path::Path;

use inkwell::{
    basic_block::BasicBlock,
    builder::{Builder, BuilderError},
    context::Context,
    module::Module,
    types::{BasicMetadataTypeEnum, BasicType, BasicTypeEnum, FunctionType},
    values::{FunctionValue, PointerValue},
    AddressSpace,
};

use crate::{
    ast::{
        ast::{Program, Prototype},
        symbol_table::SymbolTable,
        types::{Type, TypeKind},
    },
    errors::{
        diagnostics::Diagnostics,
        errors::{Error, ErrorImpl},
    },
    type_checker::type_table::TypeTable,
    SourceLocation,
};

use super::stmt::{gen_function, gen_prototype};

/// Stack storage of a variable or parameter.
#[derive(Debug, Clone, Copy)]
pub struct Slot<'a> {
    pub pointer: PointerValue<'a>,
    pub type_: BasicTypeEnum<'a>,
}

/// Attaches a source location to builder failures.
pub trait Located<T> {
    fn at(self, location: SourceLocation) -> Result<T, Error>;
}

impl<T> Located<T> for Result<T, BuilderError> {
    fn at(self, location: SourceLocation) -> Result<T, Error> {
        self.map_err(|error| Error::new(error.into(), location))
    }
}

/// The main compiler structure that holds the state of code generation.
///
/// # Type Parameters
///
/// * `'a` - Lifetime of the LLVM context and of the checked program
pub struct Compiler<'a> {
    /// The parsed program being compiled
    pub program: &'a Program,
    /// Types resolved by the type checker, keyed by expression id
    pub types: &'a TypeTable,

    /// Stack slots of the variables in scope
    pub named_values: SymbolTable<Slot<'a>>,
    /// The function whose body is being generated
    pub current_function: Option<FunctionValue<'a>>,

    /// Reference to the LLVM context
    pub context: &'a Context,
    /// The LLVM module being built
    pub module: Module<'a>,
    /// The LLVM IR builder
    pub builder: Builder<'a>,
}

impl<'a> Compiler<'a> {
    pub fn new(
        program: &'a Program,
        types: &'a TypeTable,
        context: &'a Context,
        module_name: &str,
    ) -> Self {
        Compiler {
            program,
            types,
            named_values: SymbolTable::new(),
            current_function: None,
            context,
            module: context.create_module(module_name),
            builder: context.create_builder(),
        }
    }

    /// Saves the current LLVM module to a file as textual IR.
    pub fn save_module_to_file(&self, output_file: &Path) -> Result<(), String> {
        self.module
            .print_to_file(output_file)
            .map_err(|error| error.to_string())
    }

    pub fn print_module(&self) -> String {
        self.module.print_to_string().to_string()
    }

    /// Converts a value type to its LLVM representation.
    ///
    /// `float` is always a double. Every reference level wraps the base type
    /// in one more pointer. `void` and `invalid` have no value type.
    pub fn convert_type(&self, type_: Type) -> Result<BasicTypeEnum<'a>, ErrorImpl> {
        let mut converted: BasicTypeEnum<'a> = match type_.kind {
            TypeKind::Bool => self.context.bool_type().into(),
            TypeKind::Int => self.context.i32_type().into(),
            TypeKind::Char => self.context.i8_type().into(),
            TypeKind::Float => self.context.f64_type().into(),
            TypeKind::Str => self
                .context
                .i8_type()
                .ptr_type(AddressSpace::default())
                .into(),
            TypeKind::Void | TypeKind::Invalid => return Err(ErrorImpl::InvalidType),
        };

        for _ in 0..type_.reference_depth {
            converted = converted.ptr_type(AddressSpace::default()).into();
        }

        Ok(converted)
    }

    /// Builds the LLVM signature of a prototype.
    pub fn convert_function_type(&self, prototype: &Prototype) -> Result<FunctionType<'a>, Error> {
        let params = prototype
            .args
            .iter()
            .map(|arg| {
                self.convert_type(arg.type_)
                    .map(BasicMetadataTypeEnum::from)
                    .map_err(|error| Error::new(error, arg.location))
            })
            .collect::<Result<Vec<_>, _>>()?;

        if prototype.return_type == Type::VOID {
            Ok(self.context.void_type().fn_type(&params, false))
        } else {
            let return_type = self
                .convert_type(prototype.return_type)
                .map_err(|error| Error::new(error, prototype.location))?;
            Ok(return_type.fn_type(&params, false))
        }
    }

    /// Creates a new basic block in the function being generated.
    pub fn create_basic_block(&self, name: &str, location: SourceLocation) -> Result<BasicBlock<'a>, Error> {
        let function = self.current_function.ok_or_else(|| {
            Error::new(
                ErrorImpl::Backend {
                    message: String::from("no function to append a block to"),
                },
                location,
            )
        })?;

        Ok(self.context.append_basic_block(function, name))
    }

    pub fn current_block(&self, location: SourceLocation) -> Result<BasicBlock<'a>, Error> {
        self.builder.get_insert_block().ok_or_else(|| {
            Error::new(
                ErrorImpl::Backend {
                    message: String::from("builder is not positioned in a block"),
                },
                location,
            )
        })
    }

    /// Whether the block the builder is positioned in already ends with a
    /// terminator.
    pub fn is_terminated(&self) -> bool {
        self.builder
            .get_insert_block()
            .map_or(true, |block| block.get_terminator().is_some())
    }
}

/// Generates LLVM IR for a checked program.
///
/// Externs are declared first, then functions are declared and generated
/// one at a time in source order. An error aborts only the item it occurs
/// in; it is recorded in `diagnostics` and generation moves on to the next
/// item.
///
/// # Returns
///
/// The Compiler instance owning the generated module.
pub fn compile<'a>(
    program: &'a Program,
    types: &'a TypeTable,
    context: &'a Context,
    module_name: &str,
    diagnostics: &mut Diagnostics,
) -> Compiler<'a> {
    let mut compiler = Compiler::new(program, types, context, module_name);

    for extern_def in &program.externs {
        if let Err(error) = gen_prototype(&compiler, &extern_def.prototype) {
            diagnostics.record(error);
        }
    }

    for function in &program.functions {
        if let Err(error) = gen_function(&mut compiler, function) {
            diagnostics.record(error);
        }
    }

    compiler
}
