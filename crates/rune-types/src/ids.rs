//! Arena handles
//!
//! Records in the binding core refer to each other through small copyable
//! indices instead of pointers. Owning edges are forward indices; scope and
//! back edges are plain lookups.

/// Define a `u32` arena handle with the usual constructors.
#[macro_export]
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(u32);

        impl $name {
            /// Create a handle from a raw arena index
            pub const fn new(index: u32) -> Self {
                Self(index)
            }

            /// Raw value of this handle
            pub const fn as_u32(self) -> u32 {
                self.0
            }

            /// Arena slot of this handle
            pub const fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

define_id!(
    /// A function record in the AST arena (plain functions, constructors,
    /// structs, enums and modules are all functions)
    FunctionId
);

define_id!(
    /// A template: the generic blueprint behind a class constructor
    TemplateId
);

define_id!(
    /// An expression node in the AST arena
    ExprId
);
