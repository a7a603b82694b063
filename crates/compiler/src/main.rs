//! mercc - Mercenary Compiler
//! Compiles Mercenary source files into .mrcb instruction bundles.

use bumpalo::Bump;
use clap::Parser as ClapParser;
use log::LevelFilter;
use mercenary_compiler::bundle;
use mercenary_compiler::compiler::{Compiler, DEFAULT_ENTRY};
use mercenary_compiler::ir::{CompiledProgram, Listing};
use mercenary_compiler::resolve::resolve_program;
use mercenary_compiler::CompileError;
use std::fs;
use std::path::PathBuf;

#[derive(ClapParser)]
#[command(name = "mercc")]
#[command(version, about = "Mercenary Compiler: compile source to a stack-machine bundle")]
struct Cli {
    /// Input source file
    #[arg(short, long)]
    input: PathBuf,

    /// Output bundle (default: same name as input with .mrcb extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Function that terminates the program when it returns
    #[arg(long, default_value = DEFAULT_ENTRY)]
    entry: String,

    /// Print the instruction listing to stdout
    #[arg(long)]
    dump: bool,

    /// Print the resolved syntax tree to stdout
    #[arg(long)]
    ast: bool,

    /// Log compiler progress to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { LevelFilter::Debug } else { LevelFilter::Warn };
    env_logger::Builder::from_default_env().filter_level(level).init();

    if let Err(e) = run(&cli) {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), CompileError> {
    let source = fs::read_to_string(&cli.input).map_err(|source| CompileError::Io {
        path: cli.input.clone(),
        source,
    })?;

    let arena = Bump::new();
    let program = mercenary_language::parse_program(&source, &arena)?;
    let resolved = resolve_program(&program, &arena);
    if cli.ast {
        print!("{}", resolved);
    }

    let mut compiler = Compiler::with_entry(cli.entry.as_str());
    compiler.compile(&resolved);
    let compiled = CompiledProgram::new(compiler.instructions);
    if cli.dump {
        print!("{}", Listing(&compiled.instructions));
    }

    let output_path = cli
        .output
        .clone()
        .unwrap_or_else(|| cli.input.with_extension(bundle::EXTENSION));
    let io_error = |source| CompileError::Io {
        path: output_path.clone(),
        source,
    };
    let mut file = fs::File::create(&output_path).map_err(io_error)?;
    bundle::write_bundle(&mut file, &compiled).map_err(io_error)?;

    println!(
        "Compiled successfully: {} -> {}",
        cli.input.display(),
        output_path.display()
    );
    println!("  Functions: {}", compiled.function_names().len());
    println!("  Instructions: {}", compiled.instructions.len());
    Ok(())
}
