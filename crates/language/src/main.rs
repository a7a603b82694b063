use bumpalo::Bump;
use clap::Parser;
use log::LevelFilter;
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Parse a Mercenary source file and print its syntax tree", long_about = None)]
struct Args {
    /// Source file to parse
    #[arg(short, long)]
    input: PathBuf,

    /// Print the tree's Debug form instead of source form
    #[arg(long)]
    debug: bool,

    /// Log parser progress to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    let level = if args.verbose { LevelFilter::Debug } else { LevelFilter::Warn };
    env_logger::Builder::from_default_env().filter_level(level).init();

    let content = match fs::read_to_string(&args.input) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading {}: {}", args.input.display(), e);
            std::process::exit(1);
        }
    };

    let arena = Bump::new();
    let program = match mercenary_language::parse_program(&content, &arena) {
        Ok(program) => program,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    for function in program.functions() {
        log::info!(
            "function `{}`: {} parameter(s), {} statement(s)",
            function.name,
            function.parameters.len(),
            function.body.len()
        );
    }

    if args.debug {
        println!("{:#?}", program);
    } else {
        print!("{}", program);
    }
}
