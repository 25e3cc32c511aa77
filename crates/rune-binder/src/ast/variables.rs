//! Local variable creation
//!
//! Rune has no declaration keyword: the first assignment to a name that does
//! not resolve in scope declares a local of the enclosing function (or a
//! global of the enclosing module). This runs once, before any body is copied.

use super::{Ast, BlockId, ExprKind, FunctionKind, StmtKind, Variable, VariableKind};
use rune_types::FunctionId;

impl Ast {
    /// Declare a variable for every first assignment to an unresolved name
    ///
    /// Returns the number of variables created.
    pub fn create_block_variables(&mut self) -> usize {
        let mut created = 0;
        for index in 0..self.functions.len() {
            let function = FunctionId::new(index as u32);
            let kind = self.function(function).kind;
            if matches!(kind, FunctionKind::Struct | FunctionKind::Enum) {
                continue;
            }
            let block = self.function(function).block;
            created += self.create_variables_in(block, block);
        }
        created
    }

    fn create_variables_in(&mut self, block: BlockId, function_block: BlockId) -> usize {
        let mut created = 0;
        let statements = self.block(block).statements.clone();

        for stmt in statements {
            let (kind, sub_block) = {
                let s = self.statement(stmt);
                (s.kind.clone(), s.sub_block)
            };

            if let StmtKind::Assign { target, .. } = kind {
                let target = self.expr(target);
                if let ExprKind::Ident(name) = target.kind {
                    if self.find_ident(block, name).is_none() {
                        let span = target.span;
                        self.add_variable(Variable::new(name, VariableKind::Local, function_block, span));
                        created += 1;
                    }
                }
            }

            if let Some(sub) = sub_block {
                created += self.create_variables_in(sub, function_block);
            }
        }

        created
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{AstBuilder, Ident, Param};

    #[test]
    fn test_first_assignment_declares() {
        let mut b = AstBuilder::new();
        let root = b.root_block();
        let one = b.uint_lit("1", 32);
        b.assign_to(root, "x", one);
        let two = b.uint_lit("2", 32);
        b.assign_to(root, "x", two);
        let mut program = b.finish();

        assert_eq!(program.ast.create_block_variables(), 1);
        let x = program.interner.get("x").unwrap();
        assert!(matches!(program.ast.find_ident(root, x), Some(Ident::Variable(_))));
    }

    #[test]
    fn test_assignment_in_branch_declares_in_function_block() {
        let mut b = AstBuilder::new();
        let root = b.root_block();
        let f = b.function(root, "f", vec![Param::new("c")]);
        let body = b.body(f);
        let c = b.ident("c");
        let then = b.if_stmt(body, c);
        let one = b.uint_lit("1", 32);
        b.assign_to(then, "y", one);
        let mut program = b.finish();

        assert_eq!(program.ast.create_block_variables(), 1);
        let y = program.interner.get("y").unwrap();
        assert!(matches!(program.ast.find_in_block(body, y), Some(Ident::Variable(_))));
    }

    #[test]
    fn test_parameters_are_not_redeclared() {
        let mut b = AstBuilder::new();
        let root = b.root_block();
        let f = b.function(root, "f", vec![Param::new("n")]);
        let body = b.body(f);
        let zero = b.uint_lit("0", 32);
        b.assign_to(body, "n", zero);
        let mut program = b.finish();

        assert_eq!(program.ast.create_block_variables(), 0);
    }
}
