//! Deep copy of function bodies for specialization
//!
//! Every signature binds its own copy of the function body, so statements,
//! expressions and variables get independent identity per specialization.
//! Nested function declarations are not copied; the copied scope refers to
//! the original declarations. Identifiers are stored by name and re-resolve
//! against the copied scope when bound.

use super::{Ast, Block, BlockId, Expr, ExprKind, Ident, Stmt, StmtKind, VarId};
use rune_types::{ExprId, FunctionId};
use rustc_hash::FxHashMap;

impl Ast {
    /// Copy a function's body, returning the new block and the copied parameters
    pub fn copy_function_body(&mut self, function: FunctionId) -> (BlockId, Vec<VarId>) {
        let original = self.function(function).block;
        let parent = self.block(original).parent;
        let mut vars = FxHashMap::default();

        let block = self.copy_block(original, parent, &mut vars);
        let params = self
            .function(function)
            .params
            .iter()
            .map(|p| vars.get(p).copied().unwrap_or(*p))
            .collect();

        (block, params)
    }

    fn copy_block(
        &mut self,
        source: BlockId,
        parent: Option<BlockId>,
        vars: &mut FxHashMap<VarId, VarId>,
    ) -> BlockId {
        let src = self.block(source).clone();
        let copy = self.add_block(Block {
            function: src.function,
            parent,
            statements: Vec::new(),
            variables: Vec::new(),
            idents: FxHashMap::default(),
            span: src.span,
        });

        for var in &src.variables {
            let mut variable = self.variable(*var).clone();
            variable.block = copy;
            let new_var = self.add_variable(variable);
            vars.insert(*var, new_var);
        }

        for (name, ident) in &src.idents {
            if let Ident::Function(f) = ident {
                self.declare_function(copy, *name, *f);
            }
        }

        for stmt in &src.statements {
            let s = self.statement(*stmt).clone();
            let kind = self.copy_stmt_kind(&s.kind);
            let sub_block = s.sub_block.map(|b| self.copy_block(b, Some(copy), vars));
            self.add_statement(Stmt {
                kind,
                block: copy,
                sub_block,
                span: s.span,
            });
        }

        copy
    }

    fn copy_stmt_kind(&mut self, kind: &StmtKind) -> StmtKind {
        match kind {
            StmtKind::Expr(e) => StmtKind::Expr(self.copy_expr(*e)),
            StmtKind::Assign { target, value } => StmtKind::Assign {
                target: self.copy_expr(*target),
                value: self.copy_expr(*value),
            },
            StmtKind::If(c) => StmtKind::If(self.copy_expr(*c)),
            StmtKind::ElseIf(c) => StmtKind::ElseIf(self.copy_expr(*c)),
            StmtKind::Else => StmtKind::Else,
            StmtKind::While(c) => StmtKind::While(self.copy_expr(*c)),
            StmtKind::Return(e) => StmtKind::Return(e.map(|e| self.copy_expr(e))),
            StmtKind::Print(args) => StmtKind::Print(args.iter().map(|a| self.copy_expr(*a)).collect()),
            StmtKind::Relation(e) => StmtKind::Relation(self.copy_expr(*e)),
        }
    }

    /// Deep-copy an expression tree; the copy remembers its origin
    pub fn copy_expr(&mut self, id: ExprId) -> ExprId {
        let src = self.expr(id).clone();
        let kind = match src.kind {
            ExprKind::Unary { op, operand } => ExprKind::Unary {
                op,
                operand: self.copy_expr(operand),
            },
            ExprKind::Binary { op, left, right } => ExprKind::Binary {
                op,
                left: self.copy_expr(left),
                right: self.copy_expr(right),
            },
            ExprKind::Call { callee, args } => ExprKind::Call {
                callee: self.copy_expr(callee),
                args: args.iter().map(|a| self.copy_expr(*a)).collect(),
            },
            ExprKind::Member { object, member } => ExprKind::Member {
                object: self.copy_expr(object),
                member,
            },
            ExprKind::Index { object, index } => ExprKind::Index {
                object: self.copy_expr(object),
                index: self.copy_expr(index),
            },
            ExprKind::Tuple(elems) => ExprKind::Tuple(elems.iter().map(|e| self.copy_expr(*e)).collect()),
            ExprKind::Array(elems) => ExprKind::Array(elems.iter().map(|e| self.copy_expr(*e)).collect()),
            ExprKind::Modint { value, modulus } => ExprKind::Modint {
                value: self.copy_expr(value),
                modulus: self.copy_expr(modulus),
            },
            leaf => leaf,
        };

        self.push_expr(Expr::new(kind, src.span, src.origin))
    }
}
