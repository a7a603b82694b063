//! Mercenary compiler: name resolution and lowering to stack-machine
//! instructions, plus the on-disk bundle format.

pub mod ir;
pub mod resolve;
pub mod compiler;
pub mod bundle;

use bumpalo::Bump;
use mercenary_language::error::SyntaxError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::compiler::Compiler;
use crate::ir::CompiledProgram;

#[derive(Debug, Error)]
pub enum CompileError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Parse, resolve and lower one compilation unit. A syntax error yields no
/// instructions at all.
pub fn compile_source(source: &str, entry: &str) -> Result<CompiledProgram, SyntaxError> {
    let arena = Bump::new();
    let program = mercenary_language::parse_program(source, &arena)?;
    let resolved = resolve::resolve_program(&program, &arena);
    let mut compiler = Compiler::with_entry(entry);
    compiler.compile(&resolved);
    Ok(CompiledProgram::new(compiler.instructions))
}
