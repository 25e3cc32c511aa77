//! Calls, signature creation and class instantiation

use super::{BindResult, Binder, Frame, Stall};
use crate::ast::{BlockId, ExprKind, FunctionKind, Ident, StmtKind, VarId};
use crate::engine::BindingState;
use crate::error::BindError;
use crate::event::{EventKind, Namespace};
use crate::signature::{SignatureId, SignatureKey, SignatureState};
use crate::span::Span;
use crate::template::{ClassId, GeneratedMethod};
use rune_types::{DatatypeId, DatatypeKind, ExprId, FunctionId, TemplateId};
use rustc_hash::FxHashMap;
use tracing::debug;

/// A bound call argument
#[derive(Debug, Clone, Copy)]
struct Arg {
    expr: ExprId,
    datatype: DatatypeId,
}

impl Binder {
    pub(crate) fn bind_call(&mut self, frame: &Frame, callee: ExprId, args: &[ExprId], span: Span) -> BindResult<DatatypeId> {
        let callee_expr = self.ast.expr(callee).clone();

        match callee_expr.kind {
            ExprKind::Ident(name) => match self.ast.find_ident(frame.block, name) {
                Some(Ident::Function(function)) => {
                    let value = self.function_value(function);
                    self.ast.expr_mut(callee).datatype = Some(value);
                    self.call_function(frame, function, args, span)
                }
                Some(Ident::Variable(var)) => {
                    let datatype = self.read_variable(frame, var, callee_expr.span)?;
                    self.ast.expr_mut(callee).datatype = Some(datatype);
                    self.call_value(frame, datatype, args, span)
                }
                None => Err(Stall::Wait(
                    EventKind::IdentDefined(Namespace::Scope(frame.block), name),
                    callee_expr.span,
                )),
            },
            ExprKind::Member { object, member } => {
                let object_type = self.bind_expr(frame, object)?;

                if let Some(class) = self.class_of(object_type) {
                    return self.call_method(frame, class, callee, member, args, span);
                }
                if let DatatypeKind::Function(module) = *self.datatypes.kind(object_type) {
                    if self.ast.function(module).kind == FunctionKind::Module {
                        if let Some(Ident::Function(function)) = self.ast.find_member(module, member) {
                            let value = self.function_value(function);
                            self.ast.expr_mut(callee).datatype = Some(value);
                            return self.call_function(frame, function, args, span);
                        }
                    }
                }

                let datatype = self.bind_member_of(frame, object_type, member, callee_expr.span)?;
                self.ast.expr_mut(callee).datatype = Some(datatype);
                self.call_value(frame, datatype, args, span)
            }
            _ => {
                let datatype = self.bind_expr(frame, callee)?;
                self.call_value(frame, datatype, args, span)
            }
        }
    }

    fn bind_args(&mut self, frame: &Frame, args: &[ExprId]) -> BindResult<Vec<Arg>> {
        let mut bound = Vec::with_capacity(args.len());
        for &expr in args {
            let datatype = self.bind_expr(frame, expr)?;
            bound.push(Arg { expr, datatype });
        }
        Ok(bound)
    }

    /// Call of a declared function, constructor or struct
    fn call_function(&mut self, frame: &Frame, function: FunctionId, args: &[ExprId], span: Span) -> BindResult<DatatypeId> {
        match self.ast.function(function).kind {
            FunctionKind::Plain => {
                let args = self.bind_args(frame, args)?;
                let params = self.ast.function(function).params.clone();
                let types = self.normalize_args(function, &params, &args, span)?;
                let signature = self.lookup_or_create_signature(frame, function, types, None, span)?;
                self.signature_result(signature, span)
            }
            FunctionKind::Constructor => self.call_constructor(frame, function, args, span),
            FunctionKind::Struct => {
                let args = self.bind_args(frame, args)?;
                let params = self.ast.function(function).params.clone();
                let fields = self.normalize_args(function, &params, &args, span)?;
                Ok(self.datatypes.struct_type(function, fields))
            }
            FunctionKind::Enum | FunctionKind::Module => {
                let datatype = self.function_value(function);
                Err(Stall::Fail(BindError::NotCallable {
                    datatype: self.type_string(datatype),
                    span,
                }))
            }
        }
    }

    /// Call of a value: only function pointers can be called
    fn call_value(&mut self, frame: &Frame, datatype: DatatypeId, args: &[ExprId], span: Span) -> BindResult<DatatypeId> {
        let DatatypeKind::Funcptr { ret, params } = self.datatypes.kind(datatype).clone() else {
            return Err(Stall::Fail(BindError::NotCallable {
                datatype: self.type_string(datatype),
                span,
            }));
        };

        let args = self.bind_args(frame, args)?;
        if args.len() != params.len() {
            return Err(Stall::Fail(BindError::ArityMismatch {
                function: self.type_string(datatype),
                expected: params.len(),
                actual: args.len(),
                span,
            }));
        }
        for (arg, param) in args.iter().zip(params) {
            let datatype = self.refine_literal(arg.expr, arg.datatype, param);
            self.datatypes
                .unify(param, datatype)
                .map_err(|_| self.mismatch(param, datatype, span))?;
        }
        Ok(ret)
    }

    /// `Name(args)`: instantiate the class selected by the template
    /// parameters, then specialize the constructor for it
    fn call_constructor(&mut self, frame: &Frame, constructor: FunctionId, args: &[ExprId], span: Span) -> BindResult<DatatypeId> {
        let Some(template) = self.ast.function(constructor).template else {
            return Err(self.malformed(format!("constructor '{}' has no template", self.function_name(constructor)), span));
        };
        let params = self.ast.function(constructor).params.clone();
        let Some((_, params)) = params.split_first() else {
            return Err(self.malformed(format!("constructor '{}' has no self parameter", self.function_name(constructor)), span));
        };

        let args = self.bind_args(frame, args)?;
        let types = self.normalize_args(constructor, params, &args, span)?;
        let template_args = self
            .templates
            .template(template)
            .template_params
            .iter()
            .filter_map(|&i| types.get(i).copied())
            .collect();

        let class = self.instantiate(template, template_args, span)?;
        let class_type = self.templates.class(class).datatype;

        let mut signature_args = Vec::with_capacity(types.len() + 1);
        signature_args.push(class_type);
        signature_args.extend(types);
        let signature = self.lookup_or_create_signature(frame, constructor, signature_args, Some(class), span)?;
        if !self.templates.class(class).constructors.contains(&signature) {
            self.templates.class_mut(class).constructors.push(signature);
        }

        Ok(class_type)
    }

    /// `object.name(args)` on a class instance
    fn call_method(
        &mut self,
        frame: &Frame,
        class: ClassId,
        callee: ExprId,
        name: crate::interner::Symbol,
        args: &[ExprId],
        span: Span,
    ) -> BindResult<DatatypeId> {
        let template = self.templates.class(class).template;
        let constructor = self.templates.template(template).constructor;
        let class_type = self.templates.class(class).datatype;

        if let Some(Ident::Function(method)) = self.ast.find_member(constructor, name) {
            if self.ast.function(method).kind == FunctionKind::Plain {
                let method_value = self.datatypes.function_type(method);
                self.ast.expr_mut(callee).datatype = Some(method_value);

                let params = self.ast.function(method).params.clone();
                let Some((_, params)) = params.split_first() else {
                    return Err(self.malformed(format!("method '{}' has no self parameter", self.function_name(method)), span));
                };
                let args = self.bind_args(frame, args)?;
                let types = self.normalize_args(method, params, &args, span)?;

                let mut signature_args = Vec::with_capacity(types.len() + 1);
                signature_args.push(class_type);
                signature_args.extend(types);
                let signature = self.lookup_or_create_signature(frame, method, signature_args, Some(class), span)?;
                return self.signature_result(signature, span);
            }
        }

        if let Some(&generated) = self.templates.class(class).generated_methods.get(&name) {
            self.bind_args(frame, args)?;
            if !args.is_empty() {
                return Err(Stall::Fail(BindError::ArityMismatch {
                    function: generated.name().to_string(),
                    expected: 0,
                    actual: args.len(),
                    span,
                }));
            }
            return Ok(match generated {
                GeneratedMethod::ToString => self.datatypes.string_type(),
                GeneratedMethod::Show => self.datatypes.none_type(),
            });
        }

        // A data member holding a function pointer
        let callee_span = self.ast.expr(callee).span;
        let datatype = self.bind_member_of(frame, class_type, name, callee_span)?;
        self.ast.expr_mut(callee).datatype = Some(datatype);
        self.call_value(frame, datatype, args, span)
    }

    // ========================================================================
    // Argument normalization
    // ========================================================================

    /// Match arguments to parameters
    ///
    /// Missing trailing arguments take their parameter's constant default; a
    /// variadic last parameter collects the remaining arguments into a tuple.
    fn normalize_args(&mut self, function: FunctionId, params: &[VarId], args: &[Arg], span: Span) -> BindResult<Vec<DatatypeId>> {
        let variadic = params
            .last()
            .map(|p| self.ast.variable(*p).variadic)
            .unwrap_or(false);
        let fixed = if variadic { params.len() - 1 } else { params.len() };

        if args.len() > fixed && !variadic {
            return Err(self.arity(function, params.len(), args.len(), span));
        }

        let mut types = Vec::with_capacity(params.len());
        for (i, &param) in params[..fixed].iter().enumerate() {
            let datatype = match args.get(i) {
                Some(arg) => self.constrain_arg(param, *arg, span)?,
                None => match self.ast.variable(param).default {
                    Some(default) => self.default_type(param, default, span)?,
                    None => return Err(self.arity(function, params.len(), args.len(), span)),
                },
            };
            types.push(datatype);
        }

        if variadic {
            let rest = args.iter().skip(fixed).map(|a| a.datatype).collect();
            types.push(self.datatypes.tuple_type(rest));
        }

        Ok(types)
    }

    fn arity(&self, function: FunctionId, expected: usize, actual: usize, span: Span) -> Stall {
        Stall::Fail(BindError::ArityMismatch {
            function: self.function_name(function),
            expected,
            actual,
            span,
        })
    }

    /// Check an argument against its parameter's constraint
    fn constrain_arg(&mut self, param: VarId, arg: Arg, span: Span) -> BindResult<DatatypeId> {
        let Some(constraint) = self.ast.variable(param).constraint.clone() else {
            return Ok(arg.datatype);
        };
        let scope = self.ast.variable(param).block;
        let required = self.resolve_type_expr(&constraint, scope, span)?;
        let actual = self.refine_literal(arg.expr, arg.datatype, required);

        if self.satisfies(actual, required) {
            Ok(actual)
        } else {
            Err(Stall::Fail(BindError::ConstraintViolation {
                param: self.interner.resolve(self.ast.variable(param).name).to_string(),
                constraint: self.type_string(required),
                actual: self.type_string(actual),
                span,
            }))
        }
    }

    /// Check if `actual` is an instance of `required`, ignoring modifiers
    fn satisfies(&mut self, actual: DatatypeId, required: DatatypeId) -> bool {
        let plain_actual = self.datatypes.set_secret(actual, false);
        let plain_actual = self.datatypes.set_nullable(plain_actual, false);
        let plain_required = self.datatypes.set_secret(required, false);
        let plain_required = self.datatypes.set_nullable(plain_required, false);
        self.datatypes.unify(plain_actual, plain_required) == Ok(plain_actual)
    }

    fn default_type(&mut self, param: VarId, default: ExprId, span: Span) -> BindResult<DatatypeId> {
        self.literal_type(default).ok_or_else(|| {
            Stall::Fail(BindError::NonConstantDefault {
                param: self.interner.resolve(self.ast.variable(param).name).to_string(),
                span,
            })
        })
    }

    pub(crate) fn malformed(&self, message: String, span: Span) -> Stall {
        Stall::Abort(BindError::MalformedAst { message, span })
    }

    // ========================================================================
    // Signature table and template registry
    // ========================================================================

    /// Find the signature for `(function, args)`, creating it on first use
    ///
    /// A new signature gets its own copy of the function body and queues
    /// bindings for it. A signature created by a compile-time-only call is
    /// promoted when an instantiating call reaches the same key.
    pub(crate) fn lookup_or_create_signature(
        &mut self,
        frame: &Frame,
        function: FunctionId,
        args: Vec<DatatypeId>,
        class: Option<ClassId>,
        span: Span,
    ) -> BindResult<SignatureId> {
        let key = SignatureKey::new(function, args);
        if let Some(id) = self.signatures.lookup(&key) {
            if frame.instantiating && !self.signatures.get(id).instantiated {
                self.promote(id);
            }
            return Ok(id);
        }
        self.create_signature(key, class, Some(frame.signature), frame.instantiating, span)
    }

    /// Copy the function body for a new key and queue its bindings
    pub(crate) fn create_signature(
        &mut self,
        key: SignatureKey,
        class: Option<ClassId>,
        caller: Option<SignatureId>,
        instantiating: bool,
        span: Span,
    ) -> BindResult<SignatureId> {
        let function = key.function;
        let limit = self.config.max_signatures_per_function;
        if self.signatures.count_for(function) >= limit {
            return Err(Stall::Abort(BindError::InstantiationLimit {
                name: self.function_name(function),
                limit,
                span,
            }));
        }

        let (block, params) = self.ast.copy_function_body(function);
        for (var, datatype) in params.iter().zip(key.args.iter()) {
            self.ast.variable_mut(*var).datatype = Some(*datatype);
        }
        let id = self.signatures.insert(key, block, params, instantiating, span, caller);
        self.signatures.get_mut(id).class = class;

        debug!(
            signature = %self.signature_path(id),
            instantiated = instantiating,
            "signature created"
        );

        self.queue_block(id, block, instantiating);

        // A body without `return <value>` returns none; callers need not wait
        if !self.returns_value(block) {
            let none = self.datatypes.none_type();
            self.signatures.get_mut(id).return_type = Some(none);
            self.fire(EventKind::Signature(id));
        }
        self.complete_if_idle(id);
        Ok(id)
    }

    /// Check for a `return` with a value anywhere in a body
    fn returns_value(&self, block: BlockId) -> bool {
        self.ast.block(block).statements.iter().any(|&stmt| {
            let s = self.ast.statement(stmt);
            matches!(s.kind, StmtKind::Return(Some(_))) || s.sub_block.is_some_and(|sub| self.returns_value(sub))
        })
    }

    /// Re-bind a compile-time-only signature on a runtime path
    ///
    /// Statements that already failed keep their one diagnostic and are not
    /// bound again. Statements still in flight just become instantiating.
    fn promote(&mut self, id: SignatureId) {
        let sig = self.signatures.get_mut(id);
        sig.instantiated = true;
        sig.state = SignatureState::Pending;
        let block = sig.block;
        debug!(signature = %self.signature_path(id), "signature promoted");

        let mut latest = FxHashMap::default();
        for (binding, b) in self.engine.iter() {
            if b.signature == id {
                latest.insert(b.statement, binding);
            }
        }

        for stmt in self.runtime_statements(block) {
            let previous = latest.get(&stmt).map(|&binding| (binding, self.engine.get(binding).state));
            match previous {
                Some((_, BindingState::Failed)) => {}
                Some((binding, state)) if !state.is_terminal() => self.engine.make_instantiating(binding),
                _ => {
                    self.engine.add(id, stmt, true);
                    self.signatures.get_mut(id).pending += 1;
                }
            }
        }
        self.complete_if_idle(id);
    }

    /// Return datatype of a called signature; waits until it is known
    fn signature_result(&self, id: SignatureId, span: Span) -> BindResult<DatatypeId> {
        let sig = self.signatures.get(id);
        if sig.state == SignatureState::Failed {
            return Err(Stall::Silent);
        }
        match sig.return_type {
            Some(datatype) => Ok(datatype),
            None => Err(Stall::Wait(EventKind::Signature(id), span)),
        }
    }

    /// Find or create the class of a template for concrete template arguments
    pub(crate) fn instantiate(&mut self, template: TemplateId, args: Vec<DatatypeId>, span: Span) -> BindResult<ClassId> {
        if let Some(class) = self.templates.lookup_class(template, &args) {
            return Ok(class);
        }

        let constructor = self.templates.template(template).constructor;
        let limit = self.config.max_classes_per_template;
        if self.templates.template(template).classes.len() >= limit {
            return Err(Stall::Abort(BindError::InstantiationLimit {
                name: self.function_name(constructor),
                limit,
                span,
            }));
        }

        let datatype = self.datatypes.class_type(template, args.clone());
        let class = self.templates.add_class(template, args, datatype);

        if self.config.generate_default_methods {
            for method in GeneratedMethod::ALL {
                let name = self.interner.intern(method.name());
                if self.ast.find_member(constructor, name).is_none() {
                    self.templates.class_mut(class).generated_methods.insert(name, method);
                }
            }
        }

        debug!(class = %self.type_string(datatype), "class created");
        Ok(class)
    }
}
