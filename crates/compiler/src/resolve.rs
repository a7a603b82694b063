//! Name resolution: binds every identifier to a function slot or leaves it
//! free for run-time lookup.
//!
//! Scoping is flat per function. Parameters take slots `0..n`, then every
//! `let` met in a top-to-bottom walk of the body takes the next slot, even
//! when the name is already bound. A name with no binding at the point of
//! use is `Free`.

use bumpalo::Bump;
use bumpalo::collections::Vec;
use mercenary_language::ast::{
    Block, Branch, Declaration, Expression, Function, Name, Program, Statement,
};
use std::collections::HashMap;

/// Slot table of the function being resolved.
#[derive(Debug)]
struct FunctionScope<'a> {
    slots: HashMap<&'a str, usize>,
    next_slot: usize,
}

impl<'a> FunctionScope<'a> {
    fn new() -> Self {
        Self {
            slots: HashMap::new(),
            next_slot: 0,
        }
    }

    fn define(&mut self, name: &'a str) -> usize {
        let slot = self.next_slot;
        self.slots.insert(name, slot);
        self.next_slot += 1;
        log::trace!("`{}` -> slot {}", name, slot);
        slot
    }

    fn lookup(&self, name: &'a str) -> Name<'a> {
        match self.slots.get(name) {
            Some(&slot) => Name::Local(slot),
            None => Name::Free(name),
        }
    }
}

struct Resolver<'a> {
    arena: &'a Bump,
    scope: FunctionScope<'a>,
}

/// Produces the resolved twin of `program` in `arena`. Never fails.
pub fn resolve_program<'a>(program: &Program<'a, &'a str>, arena: &'a Bump) -> Program<'a, Name<'a>> {
    let mut declarations = Vec::with_capacity_in(program.declarations.len(), arena);
    for decl in program.declarations.iter() {
        declarations.push(match decl {
            Declaration::Import { path } => Declaration::Import { path: *path },
            Declaration::Global { name } => Declaration::Global { name: *name },
            Declaration::Function(function) => Declaration::Function(resolve_function(function, arena)),
        });
    }
    Program { declarations }
}

fn resolve_function<'a>(function: &Function<'a, &'a str>, arena: &'a Bump) -> Function<'a, Name<'a>> {
    let mut resolver = Resolver {
        arena,
        scope: FunctionScope::new(),
    };

    let mut parameters = Vec::with_capacity_in(function.parameters.len(), arena);
    for &param in function.parameters.iter() {
        parameters.push(Name::Local(resolver.scope.define(param)));
    }
    let body = resolver.resolve_block(&function.body);

    log::debug!(
        "resolved function `{}`: {} slot(s)",
        function.name,
        resolver.scope.next_slot
    );
    Function {
        name: function.name,
        parameters,
        body,
    }
}

impl<'a> Resolver<'a> {
    fn resolve_block(&mut self, block: &Block<'a, &'a str>) -> Block<'a, Name<'a>> {
        let mut out = Vec::with_capacity_in(block.len(), self.arena);
        for stmt in block.iter() {
            out.push(self.resolve_statement(stmt));
        }
        out
    }

    fn resolve_statement(&mut self, stmt: &Statement<'a, &'a str>) -> Statement<'a, Name<'a>> {
        match stmt {
            Statement::If { branches, otherwise } => {
                let mut resolved = Vec::with_capacity_in(branches.len(), self.arena);
                for branch in branches.iter() {
                    let condition = self.resolve_expr(&branch.condition);
                    let body = self.resolve_block(&branch.body);
                    resolved.push(Branch { condition, body });
                }
                let otherwise = otherwise.as_ref().map(|body| self.resolve_block(body));
                Statement::If {
                    branches: resolved,
                    otherwise,
                }
            }
            Statement::While { condition, body } => {
                let condition = self.resolve_expr(condition);
                let body = self.resolve_block(body);
                Statement::While { condition, body }
            }
            Statement::Return { value } => Statement::Return {
                value: self.resolve_expr(value),
            },
            Statement::Assignment { target, indices, value } => {
                let target = self.scope.lookup(*target);
                let indices = self.resolve_list(indices);
                let value = self.resolve_expr(value);
                Statement::Assignment { target, indices, value }
            }
            Statement::VariableDeclaration { name, initializer } => {
                // The initializer cannot see the binding it initializes.
                let initializer = self.resolve_expr(initializer);
                let name = Name::Local(self.scope.define(*name));
                Statement::VariableDeclaration { name, initializer }
            }
            Statement::Do { value } => Statement::Do {
                value: self.resolve_expr(value),
            },
        }
    }

    fn resolve_list(&mut self, exprs: &Vec<'a, Expression<'a, &'a str>>) -> Vec<'a, Expression<'a, Name<'a>>> {
        let mut out = Vec::with_capacity_in(exprs.len(), self.arena);
        for expr in exprs.iter() {
            out.push(self.resolve_expr(expr));
        }
        out
    }

    fn resolve_child(&mut self, expr: &Expression<'a, &'a str>) -> &'a Expression<'a, Name<'a>> {
        let resolved = self.resolve_expr(expr);
        self.arena.alloc(resolved)
    }

    fn resolve_expr(&mut self, expr: &Expression<'a, &'a str>) -> Expression<'a, Name<'a>> {
        match expr {
            Expression::Null => Expression::Null,
            Expression::Boolean(value) => Expression::Boolean(*value),
            Expression::Integer(value) => Expression::Integer(*value),
            Expression::String(value) => Expression::String(*value),
            Expression::List(elements) => Expression::List(self.resolve_list(elements)),
            Expression::Identifier(name) => Expression::Identifier(self.scope.lookup(*name)),
            Expression::Binary { flavor, left, right } => Expression::Binary {
                flavor: *flavor,
                left: self.resolve_child(left),
                right: self.resolve_child(right),
            },
            Expression::Unary { flavor, operand } => Expression::Unary {
                flavor: *flavor,
                operand: self.resolve_child(operand),
            },
            Expression::Index { collection, key } => Expression::Index {
                collection: self.resolve_child(collection),
                key: self.resolve_child(key),
            },
            Expression::Call { callee, arguments } => Expression::Call {
                callee: self.resolve_child(callee),
                arguments: self.resolve_list(arguments),
            },
        }
    }
}
