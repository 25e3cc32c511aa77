//! Error types for binding
//!
//! Every error carries the span of the statement or expression it is
//! attributed to. Datatypes are rendered to user-facing names when the error
//! is recorded, so errors outlive the binding pass.

use crate::span::Span;
use thiserror::Error;

/// Errors that can occur while binding a program
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BindError {
    /// No enclosing scope defines a referenced name
    #[error("Undefined identifier '{name}'")]
    UndefinedIdentifier {
        /// Identifier name
        name: String,
        /// Location of the reference
        span: Span,
    },

    /// Unification failure between operand datatypes
    #[error("Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// Datatype required by the context
        expected: String,
        /// Datatype found
        actual: String,
        /// Location of the offending expression
        span: Span,
    },

    /// Call or construction argument count disagrees with the declaration
    #[error("Function '{function}' expects {expected} argument(s), got {actual}")]
    ArityMismatch {
        /// Callee name
        function: String,
        /// Declared parameter count
        expected: usize,
        /// Argument count at the call site
        actual: usize,
        /// Location of the call
        span: Span,
    },

    /// Bindings remain parked on events that can no longer fire
    #[error("Binding deadlock: unable to resolve {}", stuck.join(", "))]
    BindingDeadlock {
        /// Every unresolved identifier, variable and signature
        stuck: Vec<String>,
        /// Location of the first stuck statement
        span: Span,
    },

    /// Too many specializations of one function or template, or a runaway pass
    #[error("Instantiation limit of {limit} exceeded for '{name}'")]
    InstantiationLimit {
        /// Function, template or pass that hit the limit
        name: String,
        /// The configured ceiling
        limit: usize,
        /// Location of the call that crossed it
        span: Span,
    },

    /// Call of something that is not a function
    #[error("Datatype {datatype} is not callable")]
    NotCallable {
        /// Datatype of the callee
        datatype: String,
        /// Location of the call
        span: Span,
    },

    /// Access of a member the namespace does not define
    #[error("'{member}' is not a member of {datatype}")]
    MemberNotFound {
        /// Member name
        member: String,
        /// Datatype or namespace searched
        datatype: String,
        /// Location of the access
        span: Span,
    },

    /// Operator applied to operands it is not defined for
    #[error("Operator '{op}' cannot be applied to {operand}")]
    InvalidOperator {
        /// Operator
        op: String,
        /// Operand datatype(s)
        operand: String,
        /// Location of the expression
        span: Span,
    },

    /// Indexing of a datatype that has no elements, or a bad index
    #[error("Cannot index {datatype}: {reason}")]
    NotIndexable {
        /// Datatype of the indexed value
        datatype: String,
        /// What is wrong with the index
        reason: String,
        /// Location of the index expression
        span: Span,
    },

    /// Argument datatype does not satisfy the parameter's constraint
    #[error("Argument for '{param}' has datatype {actual}, which does not satisfy {constraint}")]
    ConstraintViolation {
        /// Parameter name
        param: String,
        /// Declared constraint
        constraint: String,
        /// Argument datatype
        actual: String,
        /// Location of the call
        span: Span,
    },

    /// `return` at module level
    #[error("'return' can only be used inside a function")]
    ReturnOutsideFunction {
        /// Location of the return statement
        span: Span,
    },

    /// Parameter default that is not a constant literal
    #[error("Default value of parameter '{param}' must be a constant")]
    NonConstantDefault {
        /// Parameter name
        param: String,
        /// Location of the call that needed the default
        span: Span,
    },

    /// The AST handed over by the parser is inconsistent
    #[error("Malformed syntax tree: {message}")]
    MalformedAst {
        /// What is wrong
        message: String,
        /// Location of the offending node
        span: Span,
    },
}

impl BindError {
    pub fn span(&self) -> Span {
        use BindError::*;

        match self {
            UndefinedIdentifier { span, .. }
            | TypeMismatch { span, .. }
            | ArityMismatch { span, .. }
            | BindingDeadlock { span, .. }
            | InstantiationLimit { span, .. }
            | NotCallable { span, .. }
            | MemberNotFound { span, .. }
            | InvalidOperator { span, .. }
            | NotIndexable { span, .. }
            | ConstraintViolation { span, .. }
            | ReturnOutsideFunction { span }
            | NonConstantDefault { span, .. }
            | MalformedAst { span, .. } => *span,
        }
    }

    /// Pass-level errors halt binding; the others fail one binding
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            BindError::BindingDeadlock { .. } | BindError::InstantiationLimit { .. } | BindError::MalformedAst { .. }
        )
    }
}

/// Errors loading a binder configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the manifest file
    #[error("Failed to read configuration: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] toml::de::Error),

    /// A value is out of range
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}
