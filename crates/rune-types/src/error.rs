//! Datatype errors

use crate::datatype::DatatypeId;
use thiserror::Error;

/// Errors produced by unification and datatype refinement
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum TypeError {
    /// The two datatypes are of unrelated kinds (e.g. `int` vs `string`)
    #[error("Incompatible datatypes {left} and {right}")]
    KindMismatch {
        /// Left operand
        left: DatatypeId,
        /// Right operand
        right: DatatypeId,
    },

    /// Numeric datatypes of different widths; there is no implicit widening
    #[error("Width mismatch between {left} and {right}")]
    WidthMismatch {
        /// Left operand
        left: DatatypeId,
        /// Right operand
        right: DatatypeId,
    },

    /// Signed and unsigned integers never unify
    #[error("Sign mismatch between {left} and {right}")]
    SignMismatch {
        /// Left operand
        left: DatatypeId,
        /// Right operand
        right: DatatypeId,
    },

    /// Tuples, structs and function pointers of different arity
    #[error("Arity mismatch between {left} and {right}")]
    ArityMismatch {
        /// Left operand
        left: DatatypeId,
        /// Right operand
        right: DatatypeId,
    },

    /// Classes of different templates, or structs of different functions
    #[error("Template mismatch between {left} and {right}")]
    TemplateMismatch {
        /// Left operand
        left: DatatypeId,
        /// Right operand
        right: DatatypeId,
    },

    /// Modular integers over different moduli
    #[error("Modulus mismatch between {left} and {right}")]
    ModulusMismatch {
        /// Left operand
        left: DatatypeId,
        /// Right operand
        right: DatatypeId,
    },

    /// Only integer and float datatypes can be resized or re-signed
    #[error("Datatype {datatype} is not numeric")]
    NotNumeric {
        /// The offending datatype
        datatype: DatatypeId,
    },
}

impl TypeError {
    /// The pair of datatypes that failed to unify, if this is a unification failure
    pub fn operands(&self) -> Option<(DatatypeId, DatatypeId)> {
        match *self {
            TypeError::KindMismatch { left, right }
            | TypeError::WidthMismatch { left, right }
            | TypeError::SignMismatch { left, right }
            | TypeError::ArityMismatch { left, right }
            | TypeError::TemplateMismatch { left, right }
            | TypeError::ModulusMismatch { left, right } => Some((left, right)),
            TypeError::NotNumeric { .. } => None,
        }
    }
}
