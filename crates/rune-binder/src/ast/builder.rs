//! Programmatic AST construction
//!
//! The parser (and tests) build the arena through this API. Spans are
//! synthesized from a line counter: every declaration and statement takes the
//! current line and advances it, expressions take the current line.

use super::{
    Ast, BinaryOperator, Block, BlockId, ExprKind, Function, FunctionKind, IntSuffix, Stmt, StmtId,
    StmtKind, TypeExpr, UnaryOperator, Variable, VariableKind,
};
use crate::interner::{Interner, Symbol};
use crate::span::Span;
use rune_types::{ExprId, FunctionId};
use rustc_hash::FxHashMap;

/// A parsed program: the AST arena, its names and the root module
#[derive(Debug, Clone)]
pub struct Program {
    pub ast: Ast,
    pub interner: Interner,
    pub root: FunctionId,
}

/// A parameter declaration
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    name: String,
    constraint: Option<TypeExpr>,
    default: Option<ExprId>,
    template: bool,
    variadic: bool,
}

impl Param {
    pub fn new(name: &str) -> Self {
        Param {
            name: name.to_string(),
            constraint: None,
            default: None,
            template: false,
            variadic: false,
        }
    }

    /// Constrain the parameter's datatype
    pub fn typed(mut self, constraint: TypeExpr) -> Self {
        self.constraint = Some(constraint);
        self
    }

    /// Give the parameter a default value
    pub fn with_default(mut self, default: ExprId) -> Self {
        self.default = Some(default);
        self
    }

    /// Mark a constructor parameter as selecting the class (`<value>`)
    pub fn template(mut self) -> Self {
        self.template = true;
        self
    }

    /// Collect trailing arguments into a tuple (`..args`)
    pub fn variadic(mut self) -> Self {
        self.variadic = true;
        self
    }
}

pub struct AstBuilder {
    ast: Ast,
    interner: Interner,
    root: FunctionId,
    line: u32,
}

impl Default for AstBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AstBuilder {
    /// Start a program whose root module is `main`
    pub fn new() -> Self {
        let mut builder = AstBuilder {
            ast: Ast::new(),
            interner: Interner::new(),
            root: FunctionId::new(0),
            line: 1,
        };
        builder.root = builder.declare(None, "main", FunctionKind::Module, Vec::new());
        builder
    }

    pub fn root(&self) -> FunctionId {
        self.root
    }

    pub fn root_block(&self) -> BlockId {
        self.ast.function(self.root).block
    }

    /// Body block of a function
    pub fn body(&self, function: FunctionId) -> BlockId {
        self.ast.function(function).block
    }

    /// Move the line counter, e.g. to place a statement on a known line
    pub fn at_line(&mut self, line: u32) -> &mut Self {
        self.line = line;
        self
    }

    pub fn symbol(&mut self, name: &str) -> Symbol {
        self.interner.intern(name)
    }

    pub fn ast(&self) -> &Ast {
        &self.ast
    }

    pub fn finish(self) -> Program {
        Program {
            ast: self.ast,
            interner: self.interner,
            root: self.root,
        }
    }

    fn span(&self) -> Span {
        Span::new(0, 0, self.line, 1)
    }

    fn next_line(&mut self) -> Span {
        let span = self.span();
        self.line += 1;
        span
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    pub fn function(&mut self, scope: BlockId, name: &str, params: Vec<Param>) -> FunctionId {
        self.declare(Some(scope), name, FunctionKind::Plain, params)
    }

    /// Declare a class constructor; its first parameter should be `self`
    pub fn constructor(&mut self, scope: BlockId, name: &str, params: Vec<Param>) -> FunctionId {
        self.declare(Some(scope), name, FunctionKind::Constructor, params)
    }

    pub fn struct_decl(&mut self, scope: BlockId, name: &str, fields: Vec<Param>) -> FunctionId {
        self.declare(Some(scope), name, FunctionKind::Struct, fields)
    }

    pub fn enum_decl(&mut self, scope: BlockId, name: &str, entries: &[&str]) -> FunctionId {
        let function = self.declare(Some(scope), name, FunctionKind::Enum, Vec::new());
        let block = self.body(function);
        for entry in entries {
            let span = self.next_line();
            let name = self.interner.intern(entry);
            self.ast
                .add_variable(Variable::new(name, VariableKind::EnumEntry, block, span));
        }
        function
    }

    pub fn module(&mut self, scope: BlockId, name: &str) -> FunctionId {
        self.declare(Some(scope), name, FunctionKind::Module, Vec::new())
    }

    fn declare(&mut self, scope: Option<BlockId>, name: &str, kind: FunctionKind, params: Vec<Param>) -> FunctionId {
        let span = self.next_line();
        let name = self.interner.intern(name);
        let function = FunctionId::new(self.ast.function_count() as u32);
        let block = self.ast.add_block(Block {
            function,
            parent: scope,
            statements: Vec::new(),
            variables: Vec::new(),
            idents: FxHashMap::default(),
            span,
        });
        self.ast.add_function(Function {
            name,
            kind,
            params: Vec::new(),
            block,
            template: None,
            span,
        });
        if let Some(scope) = scope {
            self.ast.declare_function(scope, name, function);
        }

        for param in params {
            let name = self.interner.intern(&param.name);
            let mut variable = Variable::new(name, VariableKind::Param, block, span);
            variable.constraint = param.constraint;
            variable.default = param.default;
            variable.template_param = param.template;
            variable.variadic = param.variadic;
            let var = self.ast.add_variable(variable);
            self.ast.function_mut(function).params.push(var);
        }

        function
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    fn expr(&mut self, kind: ExprKind) -> ExprId {
        let span = self.span();
        self.ast.add_expr(kind, span)
    }

    /// Integer literal without suffix; its width is refined by context
    pub fn int(&mut self, text: &str) -> ExprId {
        self.expr(ExprKind::Integer {
            text: text.to_string(),
            suffix: None,
        })
    }

    /// Unsigned literal such as `7u32`
    pub fn uint_lit(&mut self, text: &str, width: u32) -> ExprId {
        self.expr(ExprKind::Integer {
            text: text.to_string(),
            suffix: Some(IntSuffix { signed: false, width }),
        })
    }

    /// Signed literal such as `7i32`
    pub fn int_lit(&mut self, text: &str, width: u32) -> ExprId {
        self.expr(ExprKind::Integer {
            text: text.to_string(),
            suffix: Some(IntSuffix { signed: true, width }),
        })
    }

    pub fn float(&mut self, text: &str, width: u32) -> ExprId {
        self.expr(ExprKind::Float {
            text: text.to_string(),
            width,
        })
    }

    pub fn boolean(&mut self, value: bool) -> ExprId {
        self.expr(ExprKind::Bool(value))
    }

    pub fn string(&mut self, value: &str) -> ExprId {
        self.expr(ExprKind::String(value.to_string()))
    }

    pub fn ident(&mut self, name: &str) -> ExprId {
        let name = self.interner.intern(name);
        self.expr(ExprKind::Ident(name))
    }

    pub fn unary(&mut self, op: UnaryOperator, operand: ExprId) -> ExprId {
        self.expr(ExprKind::Unary { op, operand })
    }

    pub fn binary(&mut self, op: BinaryOperator, left: ExprId, right: ExprId) -> ExprId {
        self.expr(ExprKind::Binary { op, left, right })
    }

    pub fn call(&mut self, callee: ExprId, args: Vec<ExprId>) -> ExprId {
        self.expr(ExprKind::Call { callee, args })
    }

    /// Call of a function by name, `name(args)`
    pub fn call_named(&mut self, name: &str, args: Vec<ExprId>) -> ExprId {
        let callee = self.ident(name);
        self.call(callee, args)
    }

    /// Method call, `object.method(args)`
    pub fn method_call(&mut self, object: ExprId, method: &str, args: Vec<ExprId>) -> ExprId {
        let callee = self.member(object, method);
        self.call(callee, args)
    }

    pub fn member(&mut self, object: ExprId, member: &str) -> ExprId {
        let member = self.interner.intern(member);
        self.expr(ExprKind::Member { object, member })
    }

    pub fn index(&mut self, object: ExprId, index: ExprId) -> ExprId {
        self.expr(ExprKind::Index { object, index })
    }

    pub fn tuple(&mut self, elems: Vec<ExprId>) -> ExprId {
        self.expr(ExprKind::Tuple(elems))
    }

    pub fn array(&mut self, elems: Vec<ExprId>) -> ExprId {
        self.expr(ExprKind::Array(elems))
    }

    pub fn null(&mut self, datatype: TypeExpr) -> ExprId {
        self.expr(ExprKind::Null(datatype))
    }

    pub fn modint(&mut self, value: ExprId, modulus: ExprId) -> ExprId {
        self.expr(ExprKind::Modint { value, modulus })
    }

    /// Written datatype naming a template, struct or enum
    pub fn named_type(&mut self, name: &str) -> TypeExpr {
        TypeExpr::Named(self.interner.intern(name))
    }

    // ========================================================================
    // Statements
    // ========================================================================

    fn statement(&mut self, block: BlockId, kind: StmtKind, sub_block: Option<BlockId>) -> StmtId {
        let span = self.next_line();
        self.ast.add_statement(Stmt {
            kind,
            block,
            sub_block,
            span,
        })
    }

    fn sub_block(&mut self, parent: BlockId) -> BlockId {
        let function = self.ast.block(parent).function;
        let span = self.span();
        self.ast.add_block(Block {
            function,
            parent: Some(parent),
            statements: Vec::new(),
            variables: Vec::new(),
            idents: FxHashMap::default(),
            span,
        })
    }

    fn control(&mut self, block: BlockId, kind: StmtKind) -> BlockId {
        let sub = self.sub_block(block);
        self.statement(block, kind, Some(sub));
        sub
    }

    pub fn expr_stmt(&mut self, block: BlockId, expr: ExprId) -> StmtId {
        self.statement(block, StmtKind::Expr(expr), None)
    }

    pub fn assign(&mut self, block: BlockId, target: ExprId, value: ExprId) -> StmtId {
        self.statement(block, StmtKind::Assign { target, value }, None)
    }

    /// `name = value`
    pub fn assign_to(&mut self, block: BlockId, name: &str, value: ExprId) -> StmtId {
        let target = self.ident(name);
        self.assign(block, target, value)
    }

    /// `if cond { ... }`, returning the body
    pub fn if_stmt(&mut self, block: BlockId, cond: ExprId) -> BlockId {
        self.control(block, StmtKind::If(cond))
    }

    pub fn else_if(&mut self, block: BlockId, cond: ExprId) -> BlockId {
        self.control(block, StmtKind::ElseIf(cond))
    }

    pub fn else_block(&mut self, block: BlockId) -> BlockId {
        self.control(block, StmtKind::Else)
    }

    pub fn while_loop(&mut self, block: BlockId, cond: ExprId) -> BlockId {
        self.control(block, StmtKind::While(cond))
    }

    pub fn ret(&mut self, block: BlockId, value: Option<ExprId>) -> StmtId {
        self.statement(block, StmtKind::Return(value), None)
    }

    pub fn print(&mut self, block: BlockId, args: Vec<ExprId>) -> StmtId {
        self.statement(block, StmtKind::Print(args), None)
    }

    pub fn relation(&mut self, block: BlockId, expr: ExprId) -> StmtId {
        self.statement(block, StmtKind::Relation(expr), None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_module() {
        let b = AstBuilder::new();
        let root = b.root();
        assert_eq!(b.ast().function(root).kind, FunctionKind::Module);
        assert_eq!(b.ast().block(b.root_block()).parent, None);
    }

    #[test]
    fn test_statements_advance_lines() {
        let mut b = AstBuilder::new();
        let root = b.root_block();
        let one = b.int("1");
        let first = b.assign_to(root, "x", one);
        let two = b.int("2");
        let second = b.assign_to(root, "y", two);
        let ast = b.ast();
        assert!(ast.statement(first).span.line < ast.statement(second).span.line);
        assert_eq!(ast.block(root).statements, vec![first, second]);
    }

    #[test]
    fn test_params_are_variables() {
        let mut b = AstBuilder::new();
        let root = b.root_block();
        let f = b.function(root, "f", vec![Param::new("a"), Param::new("rest").variadic()]);
        let ast = b.ast();
        let params = &ast.function(f).params;
        assert_eq!(params.len(), 2);
        assert_eq!(ast.variable(params[0]).kind, VariableKind::Param);
        assert!(ast.variable(params[1]).variadic);
    }
}
