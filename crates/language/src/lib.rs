//! Mercenary language front end: lexer, parser and syntax tree.

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod pretty;

use bumpalo::Bump;

use ast::Program;
use error::ParseResult;
use lexer::Lexer;
use parser::Parser;

/// Parses a whole compilation unit, allocating the tree in `arena`.
pub fn parse_program<'a>(source: &'a str, arena: &'a Bump) -> ParseResult<Program<'a, &'a str>> {
    Parser::new(Lexer::new(source), arena).parse_program()
}
