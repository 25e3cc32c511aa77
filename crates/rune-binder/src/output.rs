//! Results of a binding pass
//!
//! The tables the code generator consumes: every signature with its bound
//! block, parameter and return datatypes, and every class with its members.

use crate::ast::{Ast, ExprKind, StmtId, VarId};
use crate::binder::Binder;
use crate::diagnostic::Diagnostics;
use crate::engine::{BindingEngine, BindingState};
use crate::interner::Interner;
use crate::signature::{Signature, SignatureId, SignatureTable};
use crate::template::{Class, TemplateRegistry};
use rune_types::{DatatypeContext, DatatypeId, DatatypeNames, ExprId, FunctionId, TemplateId};
use std::fmt::Write as _;

/// Resolves datatype handles to source names
pub struct Names<'a> {
    ast: &'a Ast,
    interner: &'a Interner,
    templates: &'a TemplateRegistry,
}

impl<'a> Names<'a> {
    pub fn new(ast: &'a Ast, interner: &'a Interner, templates: &'a TemplateRegistry) -> Self {
        Names {
            ast,
            interner,
            templates,
        }
    }

    fn name(&self, function: FunctionId) -> &'a str {
        self.interner.resolve(self.ast.function(function).name)
    }
}

impl DatatypeNames for Names<'_> {
    fn function_name(&self, function: FunctionId) -> String {
        self.name(function).to_string()
    }

    fn template_name(&self, template: TemplateId) -> String {
        self.name(self.templates.template(template).constructor).to_string()
    }

    fn modulus_text(&self, modulus: ExprId) -> String {
        match &self.ast.expr(modulus).kind {
            ExprKind::Integer { text, .. } => text.clone(),
            ExprKind::Ident(name) => self.interner.resolve(*name).to_string(),
            _ => format!("{}", modulus),
        }
    }
}

/// Human-readable form of a signature, e.g. `Stack.push(Stack(u32), u32)`
pub fn signature_path(
    signatures: &SignatureTable,
    datatypes: &DatatypeContext,
    names: &Names<'_>,
    id: SignatureId,
) -> String {
    let sig = signatures.get(id);
    let args: Vec<String> = sig
        .paramspecs
        .iter()
        .map(|p| datatypes.type_string(p.datatype, names))
        .collect();

    let name = names.name(sig.function);
    match names.ast.method_owner(sig.function) {
        Some(owner) => format!("{}.{}({})", names.name(owner), name, args.join(", ")),
        None => format!("{}({})", name, args.join(", ")),
    }
}

/// Everything a binding pass produced
pub struct BindOutput {
    ast: Ast,
    interner: Interner,
    datatypes: DatatypeContext,
    signatures: SignatureTable,
    templates: TemplateRegistry,
    engine: BindingEngine,
    diagnostics: Diagnostics,
    roots: Vec<SignatureId>,
}

impl BindOutput {
    pub(crate) fn new(binder: Binder) -> Self {
        let parts = binder.into_parts();
        BindOutput {
            ast: parts.ast,
            interner: parts.interner,
            datatypes: parts.datatypes,
            signatures: parts.signatures,
            templates: parts.templates,
            engine: parts.engine,
            diagnostics: parts.diagnostics,
            roots: parts.roots,
        }
    }

    /// True when the pass reported no error
    pub fn is_ok(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn ast(&self) -> &Ast {
        &self.ast
    }

    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    pub fn datatypes(&self) -> &DatatypeContext {
        &self.datatypes
    }

    pub fn signatures(&self) -> &SignatureTable {
        &self.signatures
    }

    pub fn templates(&self) -> &TemplateRegistry {
        &self.templates
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn names(&self) -> Names<'_> {
        Names::new(&self.ast, &self.interner, &self.templates)
    }

    pub fn type_string(&self, datatype: DatatypeId) -> String {
        self.datatypes.type_string(datatype, &self.names())
    }

    pub fn signature_path(&self, id: SignatureId) -> String {
        signature_path(&self.signatures, &self.datatypes, &self.names(), id)
    }

    /// Module signatures, one per module
    pub fn root_signatures(&self) -> &[SignatureId] {
        &self.roots
    }

    /// Signatures reached on a runtime path; these get code
    pub fn instantiated_signatures(&self) -> Vec<&Signature> {
        self.signatures.iter().filter(|s| s.instantiated).collect()
    }

    /// Every signature of the functions with this name
    pub fn signatures_of(&self, name: &str) -> Vec<&Signature> {
        self.signatures
            .iter()
            .filter(|s| self.interner.resolve(self.ast.function(s.function).name) == name)
            .collect()
    }

    /// Every class of the template with this name
    pub fn classes_of(&self, template: &str) -> Vec<&Class> {
        self.templates
            .classes()
            .filter(|c| {
                let constructor = self.templates.template(c.template).constructor;
                self.interner.resolve(self.ast.function(constructor).name) == template
            })
            .collect()
    }

    /// Datatype of a class member
    pub fn member_type(&self, class: &Class, member: &str) -> Option<DatatypeId> {
        let symbol = self.interner.get(member)?;
        class.member(symbol)
    }

    /// Datatype bound to an expression
    pub fn expr_type(&self, expr: ExprId) -> Option<DatatypeId> {
        self.ast.expr(expr).datatype
    }

    pub fn variable_type(&self, var: VarId) -> Option<DatatypeId> {
        self.ast.variable(var).datatype
    }

    /// Final state of the latest binding of a statement in a signature
    pub fn binding_state(&self, signature: SignatureId, stmt: StmtId) -> Option<BindingState> {
        self.engine
            .iter()
            .filter(|(_, b)| b.signature == signature && b.statement == stmt)
            .map(|(_, b)| b.state)
            .last()
    }

    /// Statements of a signature with the state of their latest binding
    pub fn statement_states(&self, signature: SignatureId) -> Vec<(StmtId, BindingState)> {
        let mut states: Vec<(StmtId, BindingState)> = Vec::new();
        for (_, binding) in self.engine.iter().filter(|(_, b)| b.signature == signature) {
            match states.iter_mut().find(|(s, _)| *s == binding.statement) {
                Some(entry) => entry.1 = binding.state,
                None => states.push((binding.statement, binding.state)),
            }
        }
        states
    }

    /// Text listing of instantiated signatures and classes
    pub fn dump(&self) -> String {
        let mut out = String::new();

        for sig in self.instantiated_signatures() {
            let ret = sig
                .return_type
                .map(|r| self.type_string(r))
                .unwrap_or_else(|| "?".to_string());
            let _ = writeln!(out, "{} -> {} [{:?}]", self.signature_path(sig.id), ret, sig.state);
        }

        for class in self.templates.classes() {
            let _ = writeln!(out, "class {}", self.type_string(class.datatype));
            for (name, datatype) in &class.members {
                let _ = writeln!(out, "    {}: {}", self.interner.resolve(*name), self.type_string(*datatype));
            }
        }

        out
    }
}
