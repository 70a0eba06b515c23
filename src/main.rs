use std::{fs::read_to_string, path::PathBuf, process::ExitCode, time::Instant};

use clap::Parser as _;
use fernc::{
    compiler::compiler::compile,
    display_error,
    errors::diagnostics::Diagnostics,
    lexer::lexer::tokenize,
    parser::parser::parse,
    type_checker::type_checker::type_check,
};
use inkwell::context::Context;

/// Compiles a Fern source file to LLVM IR.
#[derive(clap::Parser)]
#[command(version)]
struct Args {
    /// Source file to compile
    file: PathBuf,

    /// Dump the output of a pass to stdout
    #[arg(long = "pass-debug", value_enum)]
    pass_debug: Vec<Pass>,

    /// Write the generated module as textual IR
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print how long every pass took to stderr
    #[arg(long)]
    timings: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum Pass {
    Lex,
    Parse,
    Codegen,
}

/// Prints every recorded error followed by the error count. Warnings are
/// printed either way.
fn report(diagnostics: &mut Diagnostics, source: &str, file_name: &str) -> bool {
    diagnostics.flush_warnings(|warning| display_error(warning, source, file_name));

    if !diagnostics.has_errors() {
        return false;
    }

    for error in diagnostics.errors() {
        display_error(error, source, file_name);
    }
    eprintln!("Generated {} error(s)", diagnostics.error_count());

    true
}

fn main() -> ExitCode {
    let args = Args::parse();

    let file_name = args
        .file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| args.file.to_string_lossy().into_owned());

    let source = match read_to_string(&args.file) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("Failed to read {}: {}", args.file.display(), error);
            return ExitCode::FAILURE;
        }
    };

    if source.trim().is_empty() {
        eprintln!("File is empty");
        return ExitCode::FAILURE;
    }

    let mut diagnostics = Diagnostics::new();
    let start = Instant::now();

    let tokens = tokenize(&source, &mut diagnostics);
    if args.timings {
        eprintln!("Tokenized in {:?}", start.elapsed());
    }
    if report(&mut diagnostics, &source, &file_name) {
        return ExitCode::FAILURE;
    }
    let Some(tokens) = tokens else {
        return ExitCode::FAILURE;
    };

    if args.pass_debug.contains(&Pass::Lex) {
        for token in &tokens {
            token.debug();
        }
    }

    let parse_start = Instant::now();
    let program = parse(tokens, &mut diagnostics);
    if args.timings {
        eprintln!("Parsed in {:?}", parse_start.elapsed());
    }
    if report(&mut diagnostics, &source, &file_name) {
        return ExitCode::FAILURE;
    }
    let Some(program) = program else {
        return ExitCode::FAILURE;
    };

    if args.pass_debug.contains(&Pass::Parse) {
        print!("{}", program);
    }

    let type_check_start = Instant::now();
    let types = type_check(&program, &mut diagnostics);
    if args.timings {
        eprintln!("Type checked in {:?}", type_check_start.elapsed());
    }
    if report(&mut diagnostics, &source, &file_name) {
        return ExitCode::FAILURE;
    }

    let context = Context::create();
    let compile_start = Instant::now();
    let compiler = compile(&program, &types, &context, &file_name, &mut diagnostics);
    if args.timings {
        eprintln!("Compiled in {:?}", compile_start.elapsed());
        eprintln!("Total time for IR generation: {:?}", start.elapsed());
    }
    if report(&mut diagnostics, &source, &file_name) {
        return ExitCode::FAILURE;
    }

    if args.pass_debug.contains(&Pass::Codegen) {
        print!("{}", compiler.print_module());
    }

    if let Some(output) = &args.output {
        if let Err(error) = compiler.save_module_to_file(output) {
            eprintln!("Failed to write {}: {}", output.display(), error);
            return ExitCode::FAILURE;
        }
    }

    ExitCode::SUCCESS
}
