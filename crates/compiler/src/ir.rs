//! Mercenary stack-machine instructions.
//! A compiled program is one flat sequence; blocks are delimited by
//! `StartBlock`/`EndBlock` markers and consumed as values by `If`, `Loop`
//! and `DefineFunction`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Indexing, `collection[key]`.
pub const INDEX: &str = "~[]";
/// Indexed store, `collection[key] = value`: `[value, collection, key] -> []`.
/// Unlike every other known call it leaves nothing behind.
pub const INDEX_ASSIGN: &str = "==[]";
/// Terminates the process; called at the end of the entry function.
pub const EXIT: &str = "exit";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Instruction {
    /// `[path] -> []`
    Import,
    /// `[block] -> []`
    DefineFunction { name: String, param_count: usize },
    StartBlock,
    EndBlock,
    /// `[value] -> ⊥`
    Return,
    /// `[args...] -> [result]`, except [`INDEX_ASSIGN`] which pushes nothing.
    CallKnown { name: String, arity: usize },
    /// `[args..., callee] -> [result]`
    CallUnknown { arity: usize },
    NullConst,
    BooleanConst(bool),
    IntegerConst(i64),
    StringConst(String),
    /// `[elements...] -> [list]`
    ListConst { count: usize },
    GetLocal { slot: usize },
    SetLocal { slot: usize },
    Drop,
    /// `[condition, then, else] -> []`
    If,
    /// `[body] -> []`, repeats the body until a `BreakIf` leaves it.
    Loop,
    /// Pops a boolean and leaves the innermost loop when it is `false`.
    BreakIf,
    /// `[name] -> []`
    DeclareGlobal,
    /// `[name] -> [value]`
    GetFree,
    /// `[value, name] -> []`
    SetFree,
}

impl Instruction {
    pub fn call_known(name: impl Into<String>, arity: usize) -> Self {
        Instruction::CallKnown { name: name.into(), arity }
    }

    pub fn string(value: impl Into<String>) -> Self {
        Instruction::StringConst(value.into())
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Import => write!(f, "Import"),
            Instruction::DefineFunction { name, param_count } => {
                write!(f, "DefineFunction {} {}", name, param_count)
            }
            Instruction::StartBlock => write!(f, "StartBlock"),
            Instruction::EndBlock => write!(f, "EndBlock"),
            Instruction::Return => write!(f, "Return"),
            Instruction::CallKnown { name, arity } => write!(f, "CallKnown {} {}", name, arity),
            Instruction::CallUnknown { arity } => write!(f, "CallUnknown {}", arity),
            Instruction::NullConst => write!(f, "NullConst"),
            Instruction::BooleanConst(value) => write!(f, "BooleanConst {}", value),
            Instruction::IntegerConst(value) => write!(f, "IntegerConst {}", value),
            Instruction::StringConst(value) => write!(f, "StringConst {:?}", value),
            Instruction::ListConst { count } => write!(f, "ListConst {}", count),
            Instruction::GetLocal { slot } => write!(f, "GetLocal {}", slot),
            Instruction::SetLocal { slot } => write!(f, "SetLocal {}", slot),
            Instruction::Drop => write!(f, "Drop"),
            Instruction::If => write!(f, "If"),
            Instruction::Loop => write!(f, "Loop"),
            Instruction::BreakIf => write!(f, "BreakIf"),
            Instruction::DeclareGlobal => write!(f, "DeclareGlobal"),
            Instruction::GetFree => write!(f, "GetFree"),
            Instruction::SetFree => write!(f, "SetFree"),
        }
    }
}

/// Human readable listing, one instruction per line, indented by block depth.
pub struct Listing<'a>(pub &'a [Instruction]);

impl fmt::Display for Listing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut depth = 0usize;
        for instr in self.0 {
            if *instr == Instruction::EndBlock {
                depth = depth.saturating_sub(1);
            }
            writeln!(f, "{:width$}{}", "", instr, width = depth * 2)?;
            if *instr == Instruction::StartBlock {
                depth += 1;
            }
        }
        Ok(())
    }
}

/// A compiled program as stored in a bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompiledProgram {
    pub version: String,
    pub instructions: Vec<Instruction>,
}

impl CompiledProgram {
    pub fn new(instructions: Vec<Instruction>) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            instructions,
        }
    }

    /// Names of the functions defined at top level, in definition order.
    pub fn function_names(&self) -> Vec<&str> {
        self.instructions
            .iter()
            .filter_map(|instr| match instr {
                Instruction::DefineFunction { name, .. } => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }
}
