//! Binder - deferred, event-driven type binding
//!
//! The binder owns every table of the pass and drives the binding engine:
//!
//! 1. Seed one signature per module and queue its statements
//! 2. Pop a binding, bind its statement against the current knowledge
//! 3. On a missing datatype, park the binding on the event that will supply it
//! 4. When the queue drains, fail bindings waiting on names nobody can define;
//!    if bindings are still parked after that, report a deadlock and halt

mod access;
mod call;
mod expr;
mod stmt;

use crate::ast::{Ast, BlockId, FunctionKind, Ident, Program, StmtId, StmtKind, VariableKind};
use crate::config::BindConfig;
use crate::diagnostic::Diagnostics;
use crate::engine::{BindingEngine, BindingId, BindingState};
use crate::error::BindError;
use crate::event::{EventGraph, EventKind, Namespace, WaitOutcome};
use crate::interner::Interner;
use crate::output::{BindOutput, Names};
use crate::signature::{SignatureId, SignatureKey, SignatureState, SignatureTable};
use crate::span::Span;
use crate::template::TemplateRegistry;
use rune_types::{DatatypeContext, DatatypeId, FunctionId};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, warn};

/// Why a binding could not complete
#[derive(Debug)]
pub(crate) enum Stall {
    /// A datatype is not known yet; retry when the event fires
    Wait(EventKind, Span),
    /// A genuine error attributed to this binding
    Fail(BindError),
    /// Failed because of an error already reported elsewhere
    Silent,
    /// A pass-level error; binding stops
    Abort(BindError),
}

pub(crate) type BindResult<T> = Result<T, Stall>;

/// Context of the binding being run
#[derive(Debug, Clone, Copy)]
pub(crate) struct Frame {
    pub signature: SignatureId,
    pub function: FunctionId,
    /// Block containing the statement
    pub block: BlockId,
    pub instantiating: bool,
}

pub struct Binder {
    pub(crate) ast: Ast,
    pub(crate) interner: Interner,
    pub(crate) datatypes: DatatypeContext,
    pub(crate) signatures: SignatureTable,
    pub(crate) templates: TemplateRegistry,
    pub(crate) events: EventGraph,
    pub(crate) engine: BindingEngine,
    pub(crate) diagnostics: Diagnostics,
    pub(crate) config: BindConfig,
    /// Variables whose defining statement failed
    pub(crate) poisoned: FxHashSet<crate::ast::VarId>,
    /// Location of the expression each parked binding waits for
    wait_spans: FxHashMap<BindingId, Span>,
    roots: Vec<SignatureId>,
    halted: bool,
}

impl Binder {
    /// Prepare a parsed program for binding
    pub fn new(program: Program, config: BindConfig) -> Self {
        let Program { mut ast, interner, .. } = program;
        let created = ast.create_block_variables();
        debug!(variables = created, "block variables created");

        let mut binder = Binder {
            ast,
            interner,
            datatypes: DatatypeContext::new(),
            signatures: SignatureTable::new(),
            templates: TemplateRegistry::new(),
            events: EventGraph::new(),
            engine: BindingEngine::new(),
            diagnostics: Diagnostics::new(),
            config,
            poisoned: FxHashSet::default(),
            wait_spans: FxHashMap::default(),
            roots: Vec::new(),
            halted: false,
        };
        binder.register_declarations();
        binder
    }

    /// Create templates for constructors and type enum entries
    fn register_declarations(&mut self) {
        let declarations: Vec<(FunctionId, FunctionKind)> =
            self.ast.functions().map(|(id, f)| (id, f.kind)).collect();

        for (function, kind) in declarations {
            match kind {
                FunctionKind::Constructor => {
                    let template_params = self
                        .ast
                        .function(function)
                        .params
                        .iter()
                        .skip(1)
                        .enumerate()
                        .filter(|(_, p)| self.ast.variable(**p).template_param)
                        .map(|(i, _)| i)
                        .collect();
                    let template = self
                        .templates
                        .add_template(function, self.config.default_ref_width, template_params);
                    self.ast.function_mut(function).template = Some(template);
                }
                FunctionKind::Enum => {
                    let datatype = self.datatypes.enum_type(function);
                    let entries = self.ast.block(self.ast.function(function).block).variables.clone();
                    for entry in entries {
                        if self.ast.variable(entry).kind == VariableKind::EnumEntry {
                            self.ast.variable_mut(entry).datatype = Some(datatype);
                        }
                    }
                }
                _ => {}
            }
        }
    }

    /// Run the pass to completion
    pub fn run(mut self) -> BindOutput {
        self.create_default_classes();
        if !self.halted {
            self.seed_modules();
            self.drive();
        }

        debug!(
            signatures = self.signatures.len(),
            classes = self.templates.class_count(),
            bindings = self.engine.len(),
            runs = self.engine.runs(),
            diagnostics = self.diagnostics.len(),
            "binding pass finished"
        );

        BindOutput::new(self)
    }

    /// Templates without template parameters get their class eagerly
    ///
    /// When the constructor takes nothing but `self` its signature is known
    /// too; it is bound compile-time only until some call reaches it.
    fn create_default_classes(&mut self) {
        let defaults: Vec<_> = self
            .templates
            .templates()
            .filter(|t| t.is_default_only())
            .map(|t| (t.id, t.constructor))
            .collect();

        for (template, constructor) in defaults {
            let span = self.ast.function(constructor).span;
            let class = match self.instantiate(template, Vec::new(), span) {
                Ok(class) => class,
                Err(stall) => {
                    self.record_stall(stall);
                    continue;
                }
            };
            if self.ast.function(constructor).params.len() != 1 {
                continue;
            }

            let key = SignatureKey::new(constructor, vec![self.templates.class(class).datatype]);
            match self.create_signature(key, Some(class), None, false, span) {
                Ok(signature) => self.templates.class_mut(class).constructors.push(signature),
                Err(stall) => self.record_stall(stall),
            }
            if self.halted {
                return;
            }
        }
    }

    fn seed_modules(&mut self) {
        let modules: Vec<FunctionId> = self
            .ast
            .functions()
            .filter(|(_, f)| f.kind == FunctionKind::Module)
            .map(|(id, _)| id)
            .collect();

        for module in modules {
            let block = self.ast.function(module).block;
            let span = self.ast.function(module).span;
            let id = self
                .signatures
                .insert(SignatureKey::new(module, Vec::new()), block, Vec::new(), true, span, None);
            self.roots.push(id);
            debug!(signature = %self.signature_path(id), "module signature created");
            self.queue_block(id, block, true);
            self.complete_if_idle(id);
        }
    }

    /// Queue bindings for a block's statements, depth first in declaration order
    ///
    /// The body of `if false` / `while false` is compile-time only.
    pub(crate) fn queue_block(&mut self, signature: SignatureId, block: BlockId, instantiating: bool) {
        let statements = self.ast.block(block).statements.clone();
        for stmt in statements {
            self.engine.add(signature, stmt, instantiating);
            self.signatures.get_mut(signature).pending += 1;

            let s = self.ast.statement(stmt);
            if let Some(sub) = s.sub_block {
                let reachable = match s.kind.condition() {
                    Some(cond) => !self.ast.expr(cond).is_false_literal(),
                    None => true,
                };
                self.queue_block(signature, sub, instantiating && reachable);
            }
        }
    }

    /// Statements of a block on its runtime path, in queue order
    pub(crate) fn runtime_statements(&self, block: BlockId) -> Vec<StmtId> {
        let mut statements = Vec::new();
        for &stmt in &self.ast.block(block).statements {
            statements.push(stmt);
            let s = self.ast.statement(stmt);
            if let Some(sub) = s.sub_block {
                let compile_time = s.kind.condition().is_some_and(|cond| self.ast.expr(cond).is_false_literal());
                if !compile_time {
                    statements.extend(self.runtime_statements(sub));
                }
            }
        }
        statements
    }

    // ========================================================================
    // Scheduler loop
    // ========================================================================

    fn drive(&mut self) {
        loop {
            while let Some(id) = self.engine.pop() {
                if self.engine.runs() > self.config.max_binding_runs {
                    let span = self.ast.statement(self.engine.get(id).statement).span;
                    self.halt(BindError::InstantiationLimit {
                        name: "binding pass".to_string(),
                        limit: self.config.max_binding_runs,
                        span,
                    });
                    return;
                }
                self.run_binding(id);
                if self.halted {
                    return;
                }
            }

            if !self.resolve_quiescence() {
                return;
            }
        }
    }

    fn run_binding(&mut self, id: BindingId) {
        let binding = *self.engine.get(id);
        let stmt = binding.statement;
        let frame = Frame {
            signature: binding.signature,
            function: self.signatures.get(binding.signature).function,
            block: self.ast.statement(stmt).block,
            instantiating: binding.instantiating,
        };

        match self.bind_statement(&frame, stmt) {
            Ok(()) => self.complete_binding(id, BindingState::Bound),
            Err(Stall::Wait(kind, span)) => {
                self.engine.suspend(id);
                match self.events.wait(id, kind) {
                    WaitOutcome::Suspended => {
                        self.wait_spans.insert(id, span);
                    }
                    WaitOutcome::AlreadyFired => self.engine.requeue(id),
                }
            }
            Err(stall) => {
                self.poison_target(stmt);
                self.record_stall(stall);
                self.complete_binding(id, BindingState::Failed);
            }
        }
    }

    fn record_stall(&mut self, stall: Stall) {
        match stall {
            Stall::Fail(error) => self.diagnostics.push(error),
            Stall::Abort(error) => self.halt(error),
            Stall::Wait(..) | Stall::Silent => {}
        }
    }

    fn halt(&mut self, error: BindError) {
        warn!(error = %error, "binding pass halted");
        self.diagnostics.push(error);
        self.halted = true;
    }

    /// A failed assignment leaves its variable untyped; readers fail silently
    fn poison_target(&mut self, stmt: StmtId) {
        let s = self.ast.statement(stmt);
        let StmtKind::Assign { target, .. } = s.kind else {
            return;
        };
        let crate::ast::ExprKind::Ident(name) = self.ast.expr(target).kind else {
            return;
        };
        if let Some(Ident::Variable(var)) = self.ast.find_ident(s.block, name) {
            if self.ast.variable(var).datatype.is_none() && self.poisoned.insert(var) {
                self.fire(EventKind::Variable(var));
            }
        }
    }

    fn complete_binding(&mut self, id: BindingId, state: BindingState) {
        self.engine.finish(id, state);
        self.wait_spans.remove(&id);

        let signature = self.engine.get(id).signature;
        let sig = self.signatures.get_mut(signature);
        sig.pending = sig.pending.saturating_sub(1);
        if state == BindingState::Failed {
            sig.had_failure = true;
        }
        self.complete_if_idle(signature);
    }

    /// Finish a signature once none of its bindings is outstanding
    pub(crate) fn complete_if_idle(&mut self, signature: SignatureId) {
        let none = self.datatypes.none_type();
        let sig = self.signatures.get_mut(signature);
        if sig.pending > 0 || sig.is_complete() {
            return;
        }

        sig.state = if sig.had_failure {
            SignatureState::Failed
        } else {
            SignatureState::Bound
        };
        if sig.return_type.is_none() {
            sig.return_type = Some(none);
        }
        let state = sig.state;
        let function = sig.function;
        let class = sig.class;

        if let Some(class) = class {
            if self.ast.function(function).kind == FunctionKind::Constructor {
                self.templates.class_mut(class).constructed = true;
            }
        }

        debug!(signature = %self.signature_path(signature), ?state, "signature complete");
        self.fire(EventKind::Signature(signature));
    }

    /// Fire an event and hand its waiters back to the queue
    pub(crate) fn fire(&mut self, kind: EventKind) {
        for waiter in self.events.fire(kind) {
            self.wait_spans.remove(&waiter);
            self.engine.requeue(waiter);
        }
    }

    /// Called when the ready queue is empty; returns true if binding can go on
    fn resolve_quiescence(&mut self) -> bool {
        let waiting = self.engine.waiting();
        if waiting.is_empty() {
            return false;
        }

        // Names nobody defined by now never will be
        let mut progressed = false;
        for id in &waiting {
            let Some(EventKind::IdentDefined(namespace, name)) = self.events.waiting_on(*id) else {
                continue;
            };
            self.events.cancel_wait(*id);
            let span = self.wait_spans.get(id).copied().unwrap_or_default();
            let name = self.interner.resolve(name).to_string();
            let error = match namespace {
                Namespace::Scope(_) => BindError::UndefinedIdentifier { name, span },
                Namespace::Class(class) => BindError::MemberNotFound {
                    member: name,
                    datatype: self.type_string(self.templates.class(class).datatype),
                    span,
                },
            };
            let stmt = self.engine.get(*id).statement;
            self.poison_target(stmt);
            self.diagnostics.push(error);
            self.complete_binding(*id, BindingState::Failed);
            progressed = true;
        }
        if progressed {
            return true;
        }

        let mut stuck = Vec::new();
        for event in self.events.pending() {
            let description = self.describe_event(event.kind);
            if !stuck.contains(&description) {
                stuck.push(description);
            }
        }
        let span = waiting
            .iter()
            .map(|id| self.ast.statement(self.engine.get(*id).statement).span)
            .min_by_key(|span| span.position())
            .unwrap_or_default();
        self.halt(BindError::BindingDeadlock { stuck, span });
        false
    }

    fn describe_event(&self, kind: EventKind) -> String {
        match kind {
            EventKind::Signature(sig) => format!("signature {}", self.signature_path(sig)),
            EventKind::Variable(var) => {
                format!("variable '{}'", self.interner.resolve(self.ast.variable(var).name))
            }
            EventKind::IdentDefined(_, name) => format!("identifier '{}'", self.interner.resolve(name)),
        }
    }

    // ========================================================================
    // Naming
    // ========================================================================

    pub(crate) fn names(&self) -> Names<'_> {
        Names::new(&self.ast, &self.interner, &self.templates)
    }

    pub(crate) fn type_string(&self, datatype: DatatypeId) -> String {
        self.datatypes.type_string(datatype, &self.names())
    }

    pub(crate) fn function_name(&self, function: FunctionId) -> String {
        self.interner.resolve(self.ast.function(function).name).to_string()
    }

    pub(crate) fn signature_path(&self, signature: SignatureId) -> String {
        crate::output::signature_path(&self.signatures, &self.datatypes, &self.names(), signature)
    }

    /// Type mismatch between what the context requires and what was found
    pub(crate) fn mismatch(&self, expected: DatatypeId, actual: DatatypeId, span: Span) -> Stall {
        Stall::Fail(BindError::TypeMismatch {
            expected: self.type_string(expected),
            actual: self.type_string(actual),
            span,
        })
    }

    pub(crate) fn into_parts(self) -> BinderParts {
        BinderParts {
            ast: self.ast,
            interner: self.interner,
            datatypes: self.datatypes,
            signatures: self.signatures,
            templates: self.templates,
            engine: self.engine,
            diagnostics: self.diagnostics,
            roots: self.roots,
        }
    }
}

/// Tables handed to the output once the pass is over
pub(crate) struct BinderParts {
    pub ast: Ast,
    pub interner: Interner,
    pub datatypes: DatatypeContext,
    pub signatures: SignatureTable,
    pub templates: TemplateRegistry,
    pub engine: BindingEngine,
    pub diagnostics: Diagnostics,
    pub roots: Vec<SignatureId>,
}
