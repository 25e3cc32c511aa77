//! Core datatype definitions

use crate::ids::{ExprId, FunctionId, TemplateId};
use std::fmt;

/// Unique identifier for an interned datatype
///
/// Two handles are equal exactly when the datatypes they name are
/// structurally identical, so comparisons never walk the structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DatatypeId(pub(crate) u32);

impl DatatypeId {
    /// Create a DatatypeId from a raw value
    ///
    /// Note: only meaningful for ids handed out by the same `DatatypeContext`.
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw value of this DatatypeId
    pub const fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for DatatypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Datatype({})", self.0)
    }
}

/// The variant of a datatype, without its modifiers
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DatatypeKind {
    /// The `none` datatype (functions returning nothing)
    None,
    /// `bool`
    Bool,
    /// `string`
    String,
    /// Unsigned integer of the given bit width
    Uint(u32),
    /// Signed integer of the given bit width
    Int(u32),
    /// Integer modulo the constant computed by the given expression
    Modint {
        /// Expression producing the modulus (an opaque constant)
        modulus: ExprId,
    },
    /// Floating point of the given bit width
    Float(u32),
    /// Array of elements of one datatype
    Array(DatatypeId),
    /// Some class of this template, not yet narrowed to one instantiation
    Template(TemplateId),
    /// A concrete class: the template plus its template-argument datatypes
    Class {
        /// Template the class was instantiated from
        template: TemplateId,
        /// Concrete template-argument datatypes
        args: Vec<DatatypeId>,
    },
    /// A function value (the function itself, not a pointer)
    Function(FunctionId),
    /// Pointer to a function with the given return and parameter datatypes
    Funcptr {
        /// Return datatype
        ret: DatatypeId,
        /// Parameter datatypes
        params: Vec<DatatypeId>,
    },
    /// Anonymous tuple
    Tuple(Vec<DatatypeId>),
    /// Named struct: the struct function plus field datatypes
    Struct {
        /// Function declaring the struct
        function: FunctionId,
        /// Field datatypes, in declaration order
        fields: Vec<DatatypeId>,
    },
    /// A value of an enum
    Enum(FunctionId),
    /// The enum itself, used as a namespace for its entries
    EnumClass(FunctionId),
}

impl DatatypeKind {
    /// Short name of the variant, used in messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            DatatypeKind::None => "none",
            DatatypeKind::Bool => "bool",
            DatatypeKind::String => "string",
            DatatypeKind::Uint(_) => "uint",
            DatatypeKind::Int(_) => "int",
            DatatypeKind::Modint { .. } => "modint",
            DatatypeKind::Float(_) => "float",
            DatatypeKind::Array(_) => "array",
            DatatypeKind::Template(_) => "template",
            DatatypeKind::Class { .. } => "class",
            DatatypeKind::Function(_) => "function",
            DatatypeKind::Funcptr { .. } => "funcptr",
            DatatypeKind::Tuple(_) => "tuple",
            DatatypeKind::Struct { .. } => "struct",
            DatatypeKind::Enum(_) => "enum",
            DatatypeKind::EnumClass(_) => "enumclass",
        }
    }

    /// Check if this is a signed or unsigned integer
    pub fn is_integer(&self) -> bool {
        matches!(self, DatatypeKind::Uint(_) | DatatypeKind::Int(_))
    }

    /// Check if this is any numeric kind (integers, modular integers, floats)
    pub fn is_number(&self) -> bool {
        matches!(
            self,
            DatatypeKind::Uint(_) | DatatypeKind::Int(_) | DatatypeKind::Modint { .. } | DatatypeKind::Float(_)
        )
    }

    /// Bit width of integer and float kinds
    pub fn width(&self) -> Option<u32> {
        match self {
            DatatypeKind::Uint(w) | DatatypeKind::Int(w) | DatatypeKind::Float(w) => Some(*w),
            _ => None,
        }
    }
}

/// An interned datatype: a variant plus the two orthogonal modifiers
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Datatype {
    /// The variant
    pub kind: DatatypeKind,
    /// Information-flow taint
    pub secret: bool,
    /// Whether the value may be null
    pub nullable: bool,
}

impl Datatype {
    /// A datatype with no modifiers
    pub fn plain(kind: DatatypeKind) -> Self {
        Datatype {
            kind,
            secret: false,
            nullable: false,
        }
    }
}

impl From<DatatypeKind> for Datatype {
    fn from(kind: DatatypeKind) -> Self {
        Datatype::plain(kind)
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[DatatypeId]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl fmt::Display for Datatype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.secret {
            write!(f, "secret ")?;
        }
        if self.nullable {
            write!(f, "?")?;
        }
        match &self.kind {
            DatatypeKind::None => write!(f, "none"),
            DatatypeKind::Bool => write!(f, "bool"),
            DatatypeKind::String => write!(f, "string"),
            DatatypeKind::Uint(w) => write!(f, "u{}", w),
            DatatypeKind::Int(w) => write!(f, "i{}", w),
            DatatypeKind::Modint { modulus } => write!(f, "modint({})", modulus),
            DatatypeKind::Float(w) => write!(f, "f{}", w),
            DatatypeKind::Array(elem) => write!(f, "[{}]", elem),
            DatatypeKind::Template(t) => write!(f, "template {}", t),
            DatatypeKind::Class { template, args } => {
                write!(f, "class {}(", template)?;
                write_list(f, args)?;
                write!(f, ")")
            }
            DatatypeKind::Function(func) => write!(f, "function {}", func),
            DatatypeKind::Funcptr { ret, params } => {
                write!(f, "funcptr(")?;
                write_list(f, params)?;
                write!(f, ") -> {}", ret)
            }
            DatatypeKind::Tuple(elems) => {
                write!(f, "(")?;
                write_list(f, elems)?;
                write!(f, ")")
            }
            DatatypeKind::Struct { function, fields } => {
                write!(f, "struct {}(", function)?;
                write_list(f, fields)?;
                write!(f, ")")
            }
            DatatypeKind::Enum(func) => write!(f, "enum {}", func),
            DatatypeKind::EnumClass(func) => write!(f, "enumclass {}", func),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_predicates() {
        assert!(DatatypeKind::Uint(32).is_integer());
        assert!(DatatypeKind::Int(8).is_number());
        assert!(DatatypeKind::Float(64).is_number());
        assert!(!DatatypeKind::Float(64).is_integer());
        assert!(!DatatypeKind::String.is_number());
        assert_eq!(DatatypeKind::Uint(16).width(), Some(16));
        assert_eq!(DatatypeKind::Bool.width(), None);
    }

    #[test]
    fn test_display_modifiers() {
        let dt = Datatype {
            kind: DatatypeKind::Uint(32),
            secret: true,
            nullable: false,
        };
        assert_eq!(format!("{}", dt), "secret u32");
    }
}
