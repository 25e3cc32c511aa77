//! Statement nodes

use super::BlockId;
use crate::span::Span;
use rune_types::ExprId;

/// A statement, owned by exactly one block
#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    /// Block that owns this statement
    pub block: BlockId,
    /// Body of control structures
    pub sub_block: Option<BlockId>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    /// Expression evaluated for its effect, typically a call
    Expr(ExprId),
    /// `target = value`; the target is an identifier, member or index
    Assign { target: ExprId, value: ExprId },
    If(ExprId),
    ElseIf(ExprId),
    Else,
    While(ExprId),
    Return(Option<ExprId>),
    Print(Vec<ExprId>),
    /// Generated by the relation subsystem; bound like an expression statement
    Relation(ExprId),
}

impl StmtKind {
    /// Condition of `if`, `else if` and `while`
    pub fn condition(&self) -> Option<ExprId> {
        match self {
            StmtKind::If(cond) | StmtKind::ElseIf(cond) | StmtKind::While(cond) => Some(*cond),
            _ => None,
        }
    }

    /// Root expressions of the statement, in evaluation order
    pub fn expressions(&self) -> Vec<ExprId> {
        match self {
            StmtKind::Expr(e) | StmtKind::Relation(e) => vec![*e],
            StmtKind::Assign { target, value } => vec![*value, *target],
            StmtKind::If(cond) | StmtKind::ElseIf(cond) | StmtKind::While(cond) => vec![*cond],
            StmtKind::Else | StmtKind::Return(None) => Vec::new(),
            StmtKind::Return(Some(e)) => vec![*e],
            StmtKind::Print(args) => args.clone(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            StmtKind::Expr(_) => "expression",
            StmtKind::Assign { .. } => "assignment",
            StmtKind::If(_) => "if",
            StmtKind::ElseIf(_) => "else if",
            StmtKind::Else => "else",
            StmtKind::While(_) => "while",
            StmtKind::Return(_) => "return",
            StmtKind::Print(_) => "print",
            StmtKind::Relation(_) => "relation",
        }
    }
}
