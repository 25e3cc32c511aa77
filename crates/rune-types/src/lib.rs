//! Rune Datatype Model
//!
//! Interned datatype representation, unification and the arena handles shared
//! by every component of the binding core.
//!
//! # Usage
//!
//! ```ignore
//! use rune_types::DatatypeContext;
//!
//! let mut ctx = DatatypeContext::new();
//! let a = ctx.uint_type(32);
//! let b = ctx.uint_type(32);
//! assert_eq!(a, b);
//! assert_eq!(ctx.unify(a, b), Ok(a));
//! ```

#![warn(missing_docs)]

pub mod ids;
pub mod datatype;
pub mod context;
pub mod error;

pub use ids::{ExprId, FunctionId, TemplateId};
pub use datatype::{Datatype, DatatypeId, DatatypeKind};
pub use context::{DatatypeContext, DatatypeNames};
pub use error::TypeError;
