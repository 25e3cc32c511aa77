//! Rune Binding Core
//!
//! Datatype binding and monomorphization for Rune.
//!
//! This crate provides:
//! - The AST arena the parser hands over, with scope lookup and body copying
//! - A signature table memoizing one specialization per argument datatype tuple
//! - A template registry creating one class per template argument tuple
//! - An event graph and binding engine that bind statements out of order,
//!   parking each binding until the datatype it needs is known
//! - Diagnostics reported in source order
//!
//! # Usage
//!
//! ```ignore
//! use rune_binder::{bind, AstBuilder, BindConfig, Param};
//!
//! let mut b = AstBuilder::new();
//! let root = b.root_block();
//! let id = b.function(root, "id", vec![Param::new("x")]);
//! let body = b.body(id);
//! let x = b.ident("x");
//! b.ret(body, Some(x));
//! let one = b.int("1");
//! let call = b.call_named("id", vec![one]);
//! b.expr_stmt(root, call);
//!
//! let output = bind(b.finish(), &BindConfig::default());
//! assert!(output.is_ok());
//! ```

pub mod ast;
pub mod binder;
pub mod config;
pub mod diagnostic;
pub mod engine;
pub mod error;
pub mod event;
pub mod interner;
pub mod output;
pub mod signature;
pub mod span;
pub mod template;

// Re-export main types
pub use ast::{Ast, AstBuilder, BinaryOperator, BlockId, FunctionKind, Param, Program, StmtId, TypeExpr, UnaryOperator, VarId};
pub use binder::Binder;
pub use config::BindConfig;
pub use diagnostic::{Diagnostic, Diagnostics};
pub use engine::BindingState;
pub use error::{BindError, ConfigError};
pub use interner::{Interner, Symbol};
pub use output::BindOutput;
pub use signature::{Signature, SignatureId, SignatureState};
pub use span::Span;
pub use template::{Class, ClassId};

/// Bind a parsed program
pub fn bind(program: Program, config: &BindConfig) -> BindOutput {
    Binder::new(program, config.clone()).run()
}
