//! Signature table
//!
//! A signature is one specialization of a function for a concrete tuple of
//! parameter datatypes. The table memoizes signatures by that key, so a
//! function called with N distinct argument shapes yields exactly N
//! signatures, each with its own copy of the function body.

use crate::ast::{BlockId, VarId};
use crate::span::Span;
use crate::template::ClassId;
use rune_types::{define_id, DatatypeId, FunctionId};
use rustc_hash::FxHashMap;

define_id!(
    /// A signature in the signature table
    SignatureId
);

/// A unique key identifying a specialization
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SignatureKey {
    pub function: FunctionId,
    /// Datatype of every parameter, `self` first for constructors and methods
    pub args: Vec<DatatypeId>,
}

impl SignatureKey {
    pub fn new(function: FunctionId, args: Vec<DatatypeId>) -> Self {
        Self { function, args }
    }
}

/// One parameter of a signature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paramspec {
    pub datatype: DatatypeId,
    /// Read on some runtime path of this signature
    pub instantiated: bool,
}

/// Outcome of a signature's binding pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureState {
    /// Some binding is still outstanding
    Pending,
    /// Every binding is bound
    Bound,
    /// At least one binding failed
    Failed,
}

/// One specialization of a function
#[derive(Debug, Clone)]
pub struct Signature {
    pub id: SignatureId,
    /// Function this signature specializes
    pub function: FunctionId,
    /// Parameter datatypes in declaration order
    pub paramspecs: Vec<Paramspec>,
    /// This signature's copy of the function body
    pub block: BlockId,
    /// Parameter variables of the copied body
    pub params: Vec<VarId>,
    /// Unification of every `return`; `none` for bodies that return nothing
    pub return_type: Option<DatatypeId>,
    /// Class of a constructor or method signature
    pub class: Option<ClassId>,
    /// Reached by an instantiating call
    pub instantiated: bool,
    pub state: SignatureState,
    /// Bindings of this signature not yet bound or failed
    pub pending: usize,
    /// Some binding of this signature failed
    pub had_failure: bool,
    /// First call site
    pub call_span: Span,
    /// Signature containing the first call site
    pub caller: Option<SignatureId>,
}

impl Signature {
    /// Datatypes of the parameters
    pub fn param_types(&self) -> Vec<DatatypeId> {
        self.paramspecs.iter().map(|p| p.datatype).collect()
    }

    /// No binding of this signature is outstanding
    pub fn is_complete(&self) -> bool {
        self.state != SignatureState::Pending
    }

    /// Position of a parameter variable of this signature
    pub fn param_index(&self, var: VarId) -> Option<usize> {
        self.params.iter().position(|p| *p == var)
    }
}

/// Memo table of every signature of a compilation
#[derive(Debug, Clone, Default)]
pub struct SignatureTable {
    signatures: Vec<Signature>,
    index: FxHashMap<SignatureKey, SignatureId>,
    per_function: FxHashMap<FunctionId, usize>,
}

impl SignatureTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, key: &SignatureKey) -> Option<SignatureId> {
        self.index.get(key).copied()
    }

    /// Number of signatures of one function
    pub fn count_for(&self, function: FunctionId) -> usize {
        self.per_function.get(&function).copied().unwrap_or(0)
    }

    /// Register a new signature for `key`
    ///
    /// The caller has already checked that no signature exists for the key.
    pub fn insert(
        &mut self,
        key: SignatureKey,
        block: BlockId,
        params: Vec<VarId>,
        instantiated: bool,
        call_span: Span,
        caller: Option<SignatureId>,
    ) -> SignatureId {
        let id = SignatureId::new(self.signatures.len() as u32);
        let paramspecs = key
            .args
            .iter()
            .map(|&datatype| Paramspec {
                datatype,
                instantiated: false,
            })
            .collect();

        self.signatures.push(Signature {
            id,
            function: key.function,
            paramspecs,
            block,
            params,
            return_type: None,
            class: None,
            instantiated,
            state: SignatureState::Pending,
            pending: 0,
            had_failure: false,
            call_span,
            caller,
        });
        *self.per_function.entry(key.function).or_insert(0) += 1;
        self.index.insert(key, id);
        id
    }

    pub fn get(&self, id: SignatureId) -> &Signature {
        &self.signatures[id.index()]
    }

    pub fn get_mut(&mut self, id: SignatureId) -> &mut Signature {
        &mut self.signatures[id.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Signature> {
        self.signatures.iter()
    }

    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }
}
