//! Expression nodes

use crate::interner::Symbol;
use crate::span::Span;
use rune_types::{DatatypeId, ExprId};

/// An expression node in the AST arena
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
    /// Resolved datatype, set by the binder
    pub datatype: Option<DatatypeId>,
    /// Expression this node was copied from (itself for parsed nodes)
    pub origin: ExprId,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    // ========================================================================
    // Literals
    // ========================================================================
    /// Integer constant. The text is an opaque operand owned by the constant
    /// evaluator; only the suffix matters here.
    Integer {
        text: String,
        suffix: Option<IntSuffix>,
    },
    /// Float constant of the given width
    Float { text: String, width: u32 },
    Bool(bool),
    String(String),

    // ========================================================================
    // Names and operators
    // ========================================================================
    Ident(Symbol),
    Unary {
        op: UnaryOperator,
        operand: ExprId,
    },
    Binary {
        op: BinaryOperator,
        left: ExprId,
        right: ExprId,
    },

    // ========================================================================
    // Calls and access
    // ========================================================================
    Call {
        callee: ExprId,
        args: Vec<ExprId>,
    },
    /// `object.member`
    Member { object: ExprId, member: Symbol },
    /// `object[index]`
    Index { object: ExprId, index: ExprId },

    // ========================================================================
    // Construction
    // ========================================================================
    Tuple(Vec<ExprId>),
    Array(Vec<ExprId>),
    /// `null(T)`
    Null(TypeExpr),
    /// `value mod modulus`
    Modint { value: ExprId, modulus: ExprId },
}

/// Explicit width and sign of an integer literal, e.g. `7u32` or `-1i8`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntSuffix {
    pub signed: bool,
    pub width: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Negate,     // -
    Not,        // !
    Complement, // ~
    Secret,     // secret(e)
    Reveal,     // reveal(e)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    // Arithmetic
    Add,      // +
    Subtract, // -
    Multiply, // *
    Divide,   // /
    Modulo,   // %
    Exponent, // **

    // Comparison
    Equal,        // ==
    NotEqual,     // !=
    LessThan,     // <
    LessEqual,    // <=
    GreaterThan,  // >
    GreaterEqual, // >=

    // Bitwise
    BitwiseAnd, // &
    BitwiseOr,  // |
    BitwiseXor, // ^
    LeftShift,  // <<
    RightShift, // >>
    RotateLeft,  // <<<
    RotateRight, // >>>

    // Logical
    And, // &&
    Or,  // ||
    Xor, // ^^
}

impl UnaryOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOperator::Negate => "-",
            UnaryOperator::Not => "!",
            UnaryOperator::Complement => "~",
            UnaryOperator::Secret => "secret",
            UnaryOperator::Reveal => "reveal",
        }
    }
}

impl BinaryOperator {
    pub fn as_str(&self) -> &'static str {
        use BinaryOperator::*;
        match self {
            Add => "+",
            Subtract => "-",
            Multiply => "*",
            Divide => "/",
            Modulo => "%",
            Exponent => "**",
            Equal => "==",
            NotEqual => "!=",
            LessThan => "<",
            LessEqual => "<=",
            GreaterThan => ">",
            GreaterEqual => ">=",
            BitwiseAnd => "&",
            BitwiseOr => "|",
            BitwiseXor => "^",
            LeftShift => "<<",
            RightShift => ">>",
            RotateLeft => "<<<",
            RotateRight => ">>>",
            And => "&&",
            Or => "||",
            Xor => "^^",
        }
    }

    /// Operators producing `bool` from two operands of one datatype
    pub fn is_comparison(&self) -> bool {
        use BinaryOperator::*;
        matches!(self, Equal | NotEqual | LessThan | LessEqual | GreaterThan | GreaterEqual)
    }

    /// Operators whose right operand is a shift distance
    pub fn is_shift(&self) -> bool {
        use BinaryOperator::*;
        matches!(self, LeftShift | RightShift | RotateLeft | RotateRight)
    }

    /// Operators over `bool` operands
    pub fn is_logical(&self) -> bool {
        matches!(self, BinaryOperator::And | BinaryOperator::Or | BinaryOperator::Xor)
    }
}

/// A written datatype, used by parameter constraints and `null(T)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    None,
    Bool,
    String,
    Uint(u32),
    Int(u32),
    Float(u32),
    Array(Box<TypeExpr>),
    Tuple(Vec<TypeExpr>),
    /// A template, struct or enum name
    Named(Symbol),
    Secret(Box<TypeExpr>),
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span, origin: ExprId) -> Self {
        Expr {
            kind,
            span,
            datatype: None,
            origin,
        }
    }

    /// Check if this is a constant literal
    pub fn is_literal(&self) -> bool {
        matches!(
            self.kind,
            ExprKind::Integer { .. } | ExprKind::Float { .. } | ExprKind::Bool(_) | ExprKind::String(_)
        )
    }

    /// Check if this is the literal `false`
    pub fn is_false_literal(&self) -> bool {
        matches!(self.kind, ExprKind::Bool(false))
    }

    /// Direct child expressions, in evaluation order
    pub fn children(&self) -> Vec<ExprId> {
        match &self.kind {
            ExprKind::Integer { .. }
            | ExprKind::Float { .. }
            | ExprKind::Bool(_)
            | ExprKind::String(_)
            | ExprKind::Ident(_)
            | ExprKind::Null(_) => Vec::new(),
            ExprKind::Unary { operand, .. } => vec![*operand],
            ExprKind::Binary { left, right, .. } => vec![*left, *right],
            ExprKind::Call { callee, args } => {
                let mut children = vec![*callee];
                children.extend(args.iter().copied());
                children
            }
            ExprKind::Member { object, .. } => vec![*object],
            ExprKind::Index { object, index } => vec![*object, *index],
            ExprKind::Tuple(elems) | ExprKind::Array(elems) => elems.clone(),
            ExprKind::Modint { value, modulus } => vec![*value, *modulus],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_classes() {
        assert!(BinaryOperator::LessThan.is_comparison());
        assert!(BinaryOperator::RotateLeft.is_shift());
        assert!(BinaryOperator::Xor.is_logical());
        assert!(!BinaryOperator::BitwiseXor.is_logical());
        assert_eq!(BinaryOperator::Exponent.as_str(), "**");
    }

    #[test]
    fn test_children_order() {
        let call = Expr::new(
            ExprKind::Call {
                callee: ExprId::new(0),
                args: vec![ExprId::new(1), ExprId::new(2)],
            },
            Span::default(),
            ExprId::new(3),
        );
        assert_eq!(call.children(), vec![ExprId::new(0), ExprId::new(1), ExprId::new(2)]);
    }
}
