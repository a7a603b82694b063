//! Lowers a resolved syntax tree into the flat instruction stream.
//!
//! Every expression leaves exactly one value on the stack. Statements leave
//! the stack as they found it, except `Return`, which never falls through.

use crate::ir::*;
use mercenary_language::ast::{
    BinaryFlavor, Block, Branch, Declaration, Expression, Function, Name, Program, Statement,
    UnaryFlavor,
};

/// Function that gets the `exit(0)` epilogue unless configured otherwise.
pub const DEFAULT_ENTRY: &str = "main";

pub struct Compiler {
    pub instructions: Vec<Instruction>,
    entry: String,
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

impl Compiler {
    pub fn new() -> Self {
        Self::with_entry(DEFAULT_ENTRY)
    }

    pub fn with_entry(entry: impl Into<String>) -> Self {
        Self {
            instructions: Vec::new(),
            entry: entry.into(),
        }
    }

    /// Lower every declaration in order and return the instructions so far.
    pub fn compile(&mut self, program: &Program<'_, Name<'_>>) -> &[Instruction] {
        for decl in program.declarations.iter() {
            self.compile_declaration(decl);
        }
        &self.instructions
    }

    fn emit(&mut self, instr: Instruction) {
        self.instructions.push(instr);
    }

    // ========== Declarations ==========

    fn compile_declaration(&mut self, decl: &Declaration<'_, Name<'_>>) {
        match decl {
            Declaration::Import { path } => {
                self.emit(Instruction::string(*path));
                self.emit(Instruction::Import);
            }
            Declaration::Global { name } => {
                self.emit(Instruction::string(*name));
                self.emit(Instruction::DeclareGlobal);
            }
            Declaration::Function(function) => self.compile_function(function),
        }
    }

    fn compile_function(&mut self, function: &Function<'_, Name<'_>>) {
        let start = self.instructions.len();
        self.emit(Instruction::StartBlock);
        self.compile_block(&function.body);
        if function.name == self.entry {
            self.emit(Instruction::IntegerConst(0));
            self.emit(Instruction::call_known(EXIT, 1));
        }
        self.emit(Instruction::NullConst);
        self.emit(Instruction::Return);
        self.emit(Instruction::EndBlock);
        self.emit(Instruction::DefineFunction {
            name: function.name.to_string(),
            param_count: function.parameters.len(),
        });

        log::debug!(
            "lowered function `{}`: {} instruction(s)",
            function.name,
            self.instructions.len() - start
        );
    }

    // ========== Statements ==========

    fn compile_block(&mut self, block: &Block<'_, Name<'_>>) {
        for stmt in block.iter() {
            self.compile_statement(stmt);
        }
    }

    fn compile_statement(&mut self, stmt: &Statement<'_, Name<'_>>) {
        match stmt {
            Statement::If { branches, otherwise } => self.compile_if(branches, otherwise.as_ref()),
            Statement::While { condition, body } => {
                self.emit(Instruction::StartBlock);
                self.compile_expression(condition);
                self.emit(Instruction::BreakIf);
                self.compile_block(body);
                self.emit(Instruction::EndBlock);
                self.emit(Instruction::Loop);
            }
            Statement::Return { value } => {
                self.compile_expression(value);
                self.emit(Instruction::Return);
            }
            Statement::Assignment { target, indices, value } => {
                self.compile_expression(value);
                match indices.split_last() {
                    None => self.compile_store(target),
                    Some((last, path)) => {
                        self.compile_load(target);
                        for index in path {
                            self.compile_expression(index);
                            self.emit(Instruction::call_known(INDEX, 2));
                        }
                        self.compile_expression(last);
                        self.emit(Instruction::call_known(INDEX_ASSIGN, 3));
                    }
                }
            }
            Statement::VariableDeclaration { name, initializer } => {
                self.compile_expression(initializer);
                self.emit(Instruction::SetLocal { slot: slot_of(name) });
            }
            Statement::Do { value } => {
                self.compile_expression(value);
                self.emit(Instruction::Drop);
            }
        }
    }

    /// `cond [then] [rest] If`, where `rest` holds the remaining arms nested
    /// the same way, or the else body.
    fn compile_if(&mut self, branches: &[Branch<'_, Name<'_>>], otherwise: Option<&Block<'_, Name<'_>>>) {
        let Some((first, rest)) = branches.split_first() else {
            if let Some(body) = otherwise {
                self.compile_block(body);
            }
            return;
        };

        self.compile_expression(&first.condition);
        self.emit(Instruction::StartBlock);
        self.compile_block(&first.body);
        self.emit(Instruction::EndBlock);

        self.emit(Instruction::StartBlock);
        if !rest.is_empty() {
            self.compile_if(rest, otherwise);
        } else if let Some(body) = otherwise {
            self.compile_block(body);
        }
        self.emit(Instruction::EndBlock);
        self.emit(Instruction::If);
    }

    // ========== Expressions ==========

    fn compile_expression(&mut self, expr: &Expression<'_, Name<'_>>) {
        match expr {
            Expression::Null => self.emit(Instruction::NullConst),
            Expression::Boolean(value) => self.emit(Instruction::BooleanConst(*value)),
            Expression::Integer(value) => self.emit(Instruction::IntegerConst(*value)),
            Expression::String(value) => self.emit(Instruction::string(*value)),
            Expression::List(elements) => {
                for element in elements.iter() {
                    self.compile_expression(element);
                }
                self.emit(Instruction::ListConst { count: elements.len() });
            }
            Expression::Identifier(name) => self.compile_load(name),
            Expression::Binary { flavor, left, right } => {
                self.compile_expression(left);
                self.compile_expression(right);
                self.emit(Instruction::call_known(binary_operator(*flavor), 2));
            }
            Expression::Unary { flavor, operand } => {
                self.compile_expression(operand);
                self.emit(Instruction::call_known(unary_operator(*flavor), 1));
            }
            Expression::Index { collection, key } => {
                self.compile_expression(collection);
                self.compile_expression(key);
                self.emit(Instruction::call_known(INDEX, 2));
            }
            Expression::Call { callee, arguments } => {
                for argument in arguments.iter() {
                    self.compile_expression(argument);
                }
                self.compile_expression(callee);
                self.emit(Instruction::CallUnknown { arity: arguments.len() });
            }
        }
    }

    fn compile_load(&mut self, name: &Name<'_>) {
        match name {
            Name::Local(slot) => self.emit(Instruction::GetLocal { slot: *slot }),
            Name::Free(name) => {
                self.emit(Instruction::string(*name));
                self.emit(Instruction::GetFree);
            }
        }
    }

    fn compile_store(&mut self, name: &Name<'_>) {
        match name {
            Name::Local(slot) => self.emit(Instruction::SetLocal { slot: *slot }),
            Name::Free(name) => {
                self.emit(Instruction::string(*name));
                self.emit(Instruction::SetFree);
            }
        }
    }
}

/// Parameters and `let` names always resolve to a slot.
fn slot_of(name: &Name<'_>) -> usize {
    match name {
        Name::Local(slot) => *slot,
        Name::Free(name) => panic!("binding `{}` was not assigned a slot", name),
    }
}

fn binary_operator(flavor: BinaryFlavor) -> &'static str {
    match flavor {
        BinaryFlavor::Equal => "~==",
        BinaryFlavor::NotEqual => "~!=",
        BinaryFlavor::GreaterThan => "~>",
        BinaryFlavor::GreaterOrEqual => "~>=",
        BinaryFlavor::LessThan => "~<",
        BinaryFlavor::LessOrEqual => "~<=",
        BinaryFlavor::And => "~&&",
        BinaryFlavor::Or => "~||",
        BinaryFlavor::Add => "~+",
        BinaryFlavor::Subtract => "~-",
        BinaryFlavor::Multiply => "~*",
        BinaryFlavor::Divide => "~/",
        BinaryFlavor::Remainder => "~%",
    }
}

fn unary_operator(flavor: UnaryFlavor) -> &'static str {
    match flavor {
        UnaryFlavor::Negate => "#-",
        UnaryFlavor::Not => "#!",
    }
}
