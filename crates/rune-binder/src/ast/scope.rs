//! Identifier lookup along the lexical scope chain

use super::{Ast, BlockId, FunctionKind, VarId};
use crate::interner::Symbol;
use rune_types::FunctionId;

/// What a name declared in a block refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ident {
    Variable(VarId),
    /// A function, constructor, struct, enum or module
    Function(FunctionId),
}

impl Ast {
    /// Resolve a name from `block` outward to the root
    ///
    /// The nearest enclosing declaration wins. Functions do not capture the
    /// locals of the functions they are nested in: crossing a function
    /// boundary leaves only functions and module-level variables visible.
    pub fn find_ident(&self, block: BlockId, name: Symbol) -> Option<Ident> {
        let current = self.block(block).function;
        let mut scope = Some(block);

        while let Some(id) = scope {
            let b = self.block(id);
            if let Some(&ident) = b.idents.get(&name) {
                match ident {
                    Ident::Function(_) => return Some(ident),
                    Ident::Variable(_) => {
                        if b.function == current || self.function(b.function).kind == FunctionKind::Module {
                            return Some(ident);
                        }
                    }
                }
            }
            scope = b.parent;
        }

        None
    }

    /// Resolve a name declared directly in one block (a member namespace)
    pub fn find_in_block(&self, block: BlockId, name: Symbol) -> Option<Ident> {
        self.block(block).idents.get(&name).copied()
    }

    /// Resolve a name declared directly in a function's body
    pub fn find_member(&self, function: FunctionId, name: Symbol) -> Option<Ident> {
        self.find_in_block(self.function(function).block, name)
    }
}
