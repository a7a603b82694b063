//! Source-form printing of syntax trees.
//!
//! A raw tree prints as Mercenary source that parses back into the same
//! tree: binary operations are always parenthesised and unary ones are
//! wrapped as `(-x)`, because the grammar has no precedence levels to lean
//! on. Resolved trees print locals as `$slot`.

use std::fmt::{self, Display, Formatter, Write};

use crate::ast::{Block, Declaration, Expression, Function, Program, Statement};

const INDENT: &str = "    ";

impl<N: Display> Display for Program<'_, N> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, decl) in self.declarations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            writeln!(f, "{}", decl)?;
        }
        Ok(())
    }
}

impl<N: Display> Display for Declaration<'_, N> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Declaration::Import { path } => {
                f.write_str("import ")?;
                write_string(f, path)?;
                f.write_char(';')
            }
            Declaration::Global { name } => write!(f, "global {};", name),
            Declaration::Function(function) => Display::fmt(function, f),
        }
    }
}

impl<N: Display> Display for Function<'_, N> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "function {}(", self.name)?;
        write_separated(f, &self.parameters)?;
        f.write_str(") ")?;
        write_block(f, &self.body, 0)
    }
}

impl<N: Display> Display for Statement<'_, N> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_statement(f, self, 0)
    }
}

impl<N: Display> Display for Expression<'_, N> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Null => f.write_str("null"),
            Expression::Boolean(value) => write!(f, "{}", value),
            Expression::Integer(value) => write!(f, "{}", value),
            Expression::String(value) => write_string(f, value),
            Expression::List(elements) => {
                f.write_char('[')?;
                write_separated(f, elements)?;
                f.write_char(']')
            }
            Expression::Identifier(name) => write!(f, "{}", name),
            Expression::Binary { flavor, left, right } => {
                write!(f, "({} {} {})", left, flavor.symbol(), right)
            }
            Expression::Unary { flavor, operand } => write!(f, "({}{})", flavor.symbol(), operand),
            Expression::Index { collection, key } => write!(f, "{}[{}]", collection, key),
            Expression::Call { callee, arguments } => {
                write!(f, "{}(", callee)?;
                write_separated(f, arguments)?;
                f.write_char(')')
            }
        }
    }
}

fn write_statement<N: Display>(f: &mut Formatter<'_>, stmt: &Statement<'_, N>, depth: usize) -> fmt::Result {
    match stmt {
        Statement::If { branches, otherwise } => {
            for (i, branch) in branches.iter().enumerate() {
                if i > 0 {
                    f.write_str(" else ")?;
                }
                write!(f, "if ({}) ", branch.condition)?;
                write_block(f, &branch.body, depth)?;
            }
            if let Some(body) = otherwise {
                f.write_str(" else ")?;
                write_block(f, body, depth)?;
            }
            Ok(())
        }
        Statement::While { condition, body } => {
            write!(f, "while ({}) ", condition)?;
            write_block(f, body, depth)
        }
        Statement::Return { value } => write!(f, "return {};", value),
        Statement::Assignment { target, indices, value } => {
            write!(f, "set {}", target)?;
            for index in indices.iter() {
                write!(f, "[{}]", index)?;
            }
            write!(f, " = {};", value)
        }
        Statement::VariableDeclaration { name, initializer } => {
            write!(f, "let {} = {};", name, initializer)
        }
        Statement::Do { value } => write!(f, "do {};", value),
    }
}

fn write_block<N: Display>(f: &mut Formatter<'_>, block: &Block<'_, N>, depth: usize) -> fmt::Result {
    if block.is_empty() {
        return f.write_str("{}");
    }
    f.write_str("{\n")?;
    for stmt in block.iter() {
        write_indent(f, depth + 1)?;
        write_statement(f, stmt, depth + 1)?;
        f.write_char('\n')?;
    }
    write_indent(f, depth)?;
    f.write_char('}')
}

fn write_indent(f: &mut Formatter<'_>, depth: usize) -> fmt::Result {
    for _ in 0..depth {
        f.write_str(INDENT)?;
    }
    Ok(())
}

fn write_separated<T: Display>(f: &mut Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

fn write_string(f: &mut Formatter<'_>, value: &str) -> fmt::Result {
    f.write_char('"')?;
    for ch in value.chars() {
        match ch {
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            '\r' => f.write_str("\\r")?,
            '\u{c}' => f.write_str("\\f")?,
            '\0' => f.write_str("\\0")?,
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            ch if ch.is_ascii_control() => write!(f, "\\x{:02x}", ch as u32)?,
            ch => f.write_char(ch)?,
        }
    }
    f.write_char('"')
}
