//! Syntax tree shared by every stage of the pipeline.
//!
//! Every node is generic over `N`, the way identifiers are represented: the
//! parser produces `&str` names, resolution turns them into [`Name`]s. Nodes
//! live in a `bumpalo` arena and are released together with it.

use bumpalo::collections::Vec;
use std::fmt;

pub type Block<'a, N> = Vec<'a, Statement<'a, N>>;

/// A resolved identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Name<'a> {
    /// Parameter or `let` slot of the enclosing function.
    Local(usize),
    /// Looked up by name at run time.
    Free(&'a str),
}

impl fmt::Display for Name<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Name::Local(slot) => write!(f, "${}", slot),
            Name::Free(name) => write!(f, "{}", name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryFlavor {
    Equal,
    NotEqual,
    GreaterThan,
    GreaterOrEqual,
    LessThan,
    LessOrEqual,
    And,
    Or,
    Add,
    Subtract,
    Multiply,
    Divide,
    Remainder,
}

impl BinaryFlavor {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryFlavor::Equal => "==",
            BinaryFlavor::NotEqual => "!=",
            BinaryFlavor::GreaterThan => ">",
            BinaryFlavor::GreaterOrEqual => ">=",
            BinaryFlavor::LessThan => "<",
            BinaryFlavor::LessOrEqual => "<=",
            BinaryFlavor::And => "&",
            BinaryFlavor::Or => "|",
            BinaryFlavor::Add => "+",
            BinaryFlavor::Subtract => "-",
            BinaryFlavor::Multiply => "*",
            BinaryFlavor::Divide => "/",
            BinaryFlavor::Remainder => "%",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryFlavor {
    Negate,
    Not,
}

impl UnaryFlavor {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryFlavor::Negate => "-",
            UnaryFlavor::Not => "!",
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum Expression<'a, N> {
    Null,
    Boolean(bool),
    Integer(i64),
    /// Decoded text, escapes already processed.
    String(&'a str),
    List(Vec<'a, Expression<'a, N>>),
    Identifier(N),
    Binary {
        flavor: BinaryFlavor,
        left: &'a Expression<'a, N>,
        right: &'a Expression<'a, N>,
    },
    Unary {
        flavor: UnaryFlavor,
        operand: &'a Expression<'a, N>,
    },
    Index {
        collection: &'a Expression<'a, N>,
        key: &'a Expression<'a, N>,
    },
    Call {
        callee: &'a Expression<'a, N>,
        arguments: Vec<'a, Expression<'a, N>>,
    },
}

/// One `if` / `else if` arm.
#[derive(Debug, PartialEq)]
pub struct Branch<'a, N> {
    pub condition: Expression<'a, N>,
    pub body: Block<'a, N>,
}

#[derive(Debug, PartialEq)]
pub enum Statement<'a, N> {
    /// Never empty; arms are tried in order.
    If {
        branches: Vec<'a, Branch<'a, N>>,
        otherwise: Option<Block<'a, N>>,
    },
    While {
        condition: Expression<'a, N>,
        body: Block<'a, N>,
    },
    Return {
        value: Expression<'a, N>,
    },
    /// `set target[i][j] = value;`
    Assignment {
        target: N,
        indices: Vec<'a, Expression<'a, N>>,
        value: Expression<'a, N>,
    },
    VariableDeclaration {
        name: N,
        initializer: Expression<'a, N>,
    },
    Do {
        value: Expression<'a, N>,
    },
}

#[derive(Debug, PartialEq)]
pub struct Function<'a, N> {
    pub name: &'a str,
    pub parameters: Vec<'a, N>,
    pub body: Block<'a, N>,
}

#[derive(Debug, PartialEq)]
pub enum Declaration<'a, N> {
    Import { path: &'a str },
    Global { name: &'a str },
    Function(Function<'a, N>),
}

#[derive(Debug, PartialEq)]
pub struct Program<'a, N> {
    pub declarations: Vec<'a, Declaration<'a, N>>,
}

impl<'a, N> Program<'a, N> {
    pub fn functions(&self) -> impl Iterator<Item = &Function<'a, N>> {
        self.declarations.iter().filter_map(|decl| match decl {
            Declaration::Function(function) => Some(function),
            _ => None,
        })
    }
}
