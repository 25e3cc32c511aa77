//! AST arena consumed by the binder
//!
//! The parser produces a graph of functions, blocks, statements, expressions
//! and variables. Every record lives in one arena and refers to the others by
//! handle: owning edges (block → statements, statement → sub-block) are
//! forward handles, scope edges (block → parent block) are plain lookups.

pub mod builder;
pub mod copy;
pub mod expression;
pub mod scope;
pub mod statement;
pub mod variables;

pub use builder::{AstBuilder, Param, Program};
pub use expression::{BinaryOperator, Expr, ExprKind, IntSuffix, TypeExpr, UnaryOperator};
pub use scope::Ident;
pub use statement::{Stmt, StmtKind};

use crate::interner::Symbol;
use crate::span::Span;
use rune_types::{define_id, DatatypeId, ExprId, FunctionId, TemplateId};
use rustc_hash::FxHashMap;

define_id!(
    /// A block: an ordered statement list plus the variables it declares
    BlockId
);

define_id!(
    /// A statement in the AST arena
    StmtId
);

define_id!(
    /// A variable (parameter, local or enum entry)
    VarId
);

/// What a function declaration declares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionKind {
    /// A module: its block holds top-level code, functions and globals
    Module,
    /// An ordinary function or a method
    Plain,
    /// A class constructor; the function is the template's blueprint
    Constructor,
    /// A struct declaration; its parameters are the fields
    Struct,
    /// An enum declaration; its variables are the entries
    Enum,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: Symbol,
    pub kind: FunctionKind,
    /// Parameter variables, in declaration order
    pub params: Vec<VarId>,
    pub block: BlockId,
    /// Template this constructor is the blueprint of
    pub template: Option<TemplateId>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// Function whose body contains this block
    pub function: FunctionId,
    /// Lexically enclosing block
    pub parent: Option<BlockId>,
    pub statements: Vec<StmtId>,
    pub variables: Vec<VarId>,
    /// Names declared directly in this block
    pub idents: FxHashMap<Symbol, Ident>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
    Param,
    Local,
    EnumEntry,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: Symbol,
    pub kind: VariableKind,
    pub block: BlockId,
    /// Declared datatype constraint of a parameter
    pub constraint: Option<TypeExpr>,
    /// Default value of a parameter
    pub default: Option<ExprId>,
    /// Constructor parameter whose datatype selects the class
    pub template_param: bool,
    /// Last parameter collecting trailing arguments into a tuple
    pub variadic: bool,
    /// Resolved datatype, set by the binder
    pub datatype: Option<DatatypeId>,
    pub span: Span,
}

impl Variable {
    pub fn new(name: Symbol, kind: VariableKind, block: BlockId, span: Span) -> Self {
        Variable {
            name,
            kind,
            block,
            constraint: None,
            default: None,
            template_param: false,
            variadic: false,
            datatype: None,
            span,
        }
    }
}

/// The arena of every AST record of a compilation
#[derive(Debug, Clone, Default)]
pub struct Ast {
    functions: Vec<Function>,
    blocks: Vec<Block>,
    statements: Vec<Stmt>,
    exprs: Vec<Expr>,
    variables: Vec<Variable>,
}

impl Ast {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Allocation
    // ========================================================================

    pub fn add_function(&mut self, function: Function) -> FunctionId {
        let id = FunctionId::new(self.functions.len() as u32);
        self.functions.push(function);
        id
    }

    pub fn add_block(&mut self, block: Block) -> BlockId {
        let id = BlockId::new(self.blocks.len() as u32);
        self.blocks.push(block);
        id
    }

    /// Allocate a statement and append it to its block
    pub fn add_statement(&mut self, stmt: Stmt) -> StmtId {
        let id = StmtId::new(self.statements.len() as u32);
        let block = stmt.block;
        self.statements.push(stmt);
        self.blocks[block.index()].statements.push(id);
        id
    }

    /// Allocate an expression; parsed expressions are their own origin
    pub fn add_expr(&mut self, kind: ExprKind, span: Span) -> ExprId {
        let id = ExprId::new(self.exprs.len() as u32);
        self.exprs.push(Expr::new(kind, span, id));
        id
    }

    pub(crate) fn push_expr(&mut self, expr: Expr) -> ExprId {
        let id = ExprId::new(self.exprs.len() as u32);
        self.exprs.push(expr);
        id
    }

    /// Allocate a variable, declare it in its block and register its name
    pub fn add_variable(&mut self, variable: Variable) -> VarId {
        let id = VarId::new(self.variables.len() as u32);
        let block = variable.block;
        let name = variable.name;
        self.variables.push(variable);
        let block = &mut self.blocks[block.index()];
        block.variables.push(id);
        block.idents.insert(name, Ident::Variable(id));
        id
    }

    /// Register a function's name in the block that declares it
    pub fn declare_function(&mut self, scope: BlockId, name: Symbol, function: FunctionId) {
        self.blocks[scope.index()]
            .idents
            .insert(name, Ident::Function(function));
    }

    // ========================================================================
    // Access
    // ========================================================================

    pub fn function(&self, id: FunctionId) -> &Function {
        &self.functions[id.index()]
    }

    pub fn function_mut(&mut self, id: FunctionId) -> &mut Function {
        &mut self.functions[id.index()]
    }

    pub fn block(&self, id: BlockId) -> &Block {
        &self.blocks[id.index()]
    }

    pub fn block_mut(&mut self, id: BlockId) -> &mut Block {
        &mut self.blocks[id.index()]
    }

    pub fn statement(&self, id: StmtId) -> &Stmt {
        &self.statements[id.index()]
    }

    pub fn expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id.index()]
    }

    pub fn expr_mut(&mut self, id: ExprId) -> &mut Expr {
        &mut self.exprs[id.index()]
    }

    pub fn variable(&self, id: VarId) -> &Variable {
        &self.variables[id.index()]
    }

    pub fn variable_mut(&mut self, id: VarId) -> &mut Variable {
        &mut self.variables[id.index()]
    }

    pub fn functions(&self) -> impl Iterator<Item = (FunctionId, &Function)> {
        self.functions
            .iter()
            .enumerate()
            .map(|(i, f)| (FunctionId::new(i as u32), f))
    }

    pub fn function_count(&self) -> usize {
        self.functions.len()
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn statement_count(&self) -> usize {
        self.statements.len()
    }

    /// Function whose parameter or local a variable is
    pub fn variable_function(&self, id: VarId) -> FunctionId {
        self.block(self.variable(id).block).function
    }

    /// Check if a function is declared directly inside a constructor
    pub fn is_method(&self, id: FunctionId) -> bool {
        let function = self.function(id);
        if function.kind != FunctionKind::Plain {
            return false;
        }
        self.block(function.block)
            .parent
            .map(|parent| self.function(self.block(parent).function).kind == FunctionKind::Constructor)
            .unwrap_or(false)
    }

    /// Constructor a method is declared in
    pub fn method_owner(&self, id: FunctionId) -> Option<FunctionId> {
        if !self.is_method(id) {
            return None;
        }
        let parent = self.block(self.function(id).block).parent?;
        Some(self.block(parent).function)
    }
}
