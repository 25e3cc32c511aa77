//! Expression rules

use super::{BindResult, Binder, Frame, Stall};
use crate::ast::{BinaryOperator, ExprKind, FunctionKind, Ident, IntSuffix, UnaryOperator, VarId};
use crate::error::BindError;
use crate::event::{EventKind, Namespace};
use crate::span::Span;
use rune_types::{DatatypeId, DatatypeKind, ExprId, FunctionId};

/// Width of integer literals written without a suffix
const DEFAULT_LITERAL_WIDTH: u32 = 64;

impl Binder {
    /// Bind an expression tree, recording the datatype of every node
    pub(crate) fn bind_expr(&mut self, frame: &Frame, id: ExprId) -> BindResult<DatatypeId> {
        let expr = self.ast.expr(id).clone();
        let span = expr.span;

        let datatype = match expr.kind {
            ExprKind::Integer { suffix, .. } => self.integer_type(suffix),
            ExprKind::Float { width, .. } => self.datatypes.float_type(width),
            ExprKind::Bool(_) => self.datatypes.bool_type(),
            ExprKind::String(_) => self.datatypes.string_type(),
            ExprKind::Ident(name) => match self.ast.find_ident(frame.block, name) {
                Some(Ident::Variable(var)) => self.read_variable(frame, var, span)?,
                Some(Ident::Function(function)) => self.function_value(function),
                None => {
                    return Err(Stall::Wait(
                        EventKind::IdentDefined(Namespace::Scope(frame.block), name),
                        span,
                    ));
                }
            },
            ExprKind::Unary { op, operand } => self.bind_unary(frame, op, operand, span)?,
            ExprKind::Binary { op, left, right } => self.bind_binary(frame, op, left, right, span)?,
            ExprKind::Call { callee, args } => self.bind_call(frame, callee, &args, span)?,
            ExprKind::Member { object, member } => {
                let object_type = self.bind_expr(frame, object)?;
                self.bind_member_of(frame, object_type, member, span)?
            }
            ExprKind::Index { object, index } => self.bind_index(frame, object, index, span)?,
            ExprKind::Tuple(elems) => {
                let mut types = Vec::with_capacity(elems.len());
                for elem in elems {
                    types.push(self.bind_expr(frame, elem)?);
                }
                self.datatypes.tuple_type(types)
            }
            ExprKind::Array(elems) => self.bind_array(frame, &elems, span)?,
            ExprKind::Null(type_expr) => {
                let datatype = self.resolve_type_expr(&type_expr, frame.block, span)?;
                self.datatypes.set_nullable(datatype, true)
            }
            ExprKind::Modint { value, modulus } => self.bind_modint(frame, value, modulus, span)?,
        };

        self.ast.expr_mut(id).datatype = Some(datatype);
        Ok(datatype)
    }

    fn integer_type(&mut self, suffix: Option<IntSuffix>) -> DatatypeId {
        match suffix {
            Some(IntSuffix { signed: true, width }) => self.datatypes.int_type(width),
            Some(IntSuffix { signed: false, width }) => self.datatypes.uint_type(width),
            None => self.datatypes.uint_type(DEFAULT_LITERAL_WIDTH),
        }
    }

    /// Datatype of a constant literal, if the expression is one
    pub(crate) fn literal_type(&mut self, id: ExprId) -> Option<DatatypeId> {
        match self.ast.expr(id).kind {
            ExprKind::Integer { suffix, .. } => Some(self.integer_type(suffix)),
            ExprKind::Float { width, .. } => Some(self.datatypes.float_type(width)),
            ExprKind::Bool(_) => Some(self.datatypes.bool_type()),
            ExprKind::String(_) => Some(self.datatypes.string_type()),
            _ => None,
        }
    }

    /// Datatype of a variable read; waits until the variable is typed
    pub(crate) fn read_variable(&mut self, frame: &Frame, var: VarId, span: Span) -> BindResult<DatatypeId> {
        if frame.instantiating {
            let sig = self.signatures.get_mut(frame.signature);
            if let Some(index) = sig.param_index(var) {
                sig.paramspecs[index].instantiated = true;
            }
        }

        match self.ast.variable(var).datatype {
            Some(datatype) => Ok(datatype),
            None if self.poisoned.contains(&var) => Err(Stall::Silent),
            None => Err(Stall::Wait(EventKind::Variable(var), span)),
        }
    }

    /// Datatype of a function name used as a value
    pub(crate) fn function_value(&mut self, function: FunctionId) -> DatatypeId {
        let f = self.ast.function(function);
        match (f.kind, f.template) {
            (FunctionKind::Enum, _) => self.datatypes.enum_class_type(function),
            (FunctionKind::Constructor, Some(template)) => self.datatypes.template_type(template),
            _ => self.datatypes.function_type(function),
        }
    }

    // ========================================================================
    // Literal refinement
    // ========================================================================

    /// Check if an expression is an unsuffixed integer literal, possibly negated
    fn is_refinable(&self, id: ExprId) -> bool {
        match &self.ast.expr(id).kind {
            ExprKind::Integer { suffix: None, .. } => true,
            ExprKind::Unary {
                op: UnaryOperator::Negate,
                operand,
            } => self.is_refinable(*operand),
            _ => false,
        }
    }

    /// Give an unsuffixed literal the integer datatype its context requires
    ///
    /// Returns the (possibly new) datatype of the expression.
    pub(crate) fn refine_literal(&mut self, id: ExprId, current: DatatypeId, target: DatatypeId) -> DatatypeId {
        if current == target || !self.is_refinable(id) || !self.datatypes.kind(target).is_integer() {
            return current;
        }
        let plain = self.datatypes.set_secret(target, false);
        let plain = self.datatypes.set_nullable(plain, false);
        self.set_literal_type(id, plain);
        plain
    }

    fn set_literal_type(&mut self, id: ExprId, datatype: DatatypeId) {
        self.ast.expr_mut(id).datatype = Some(datatype);
        if let ExprKind::Unary { operand, .. } = self.ast.expr(id).kind {
            self.set_literal_type(operand, datatype);
        }
    }

    /// Refine whichever operand is a bare literal towards the other
    fn refine_pair(
        &mut self,
        left: ExprId,
        left_type: DatatypeId,
        right: ExprId,
        right_type: DatatypeId,
    ) -> (DatatypeId, DatatypeId) {
        if left_type == right_type {
            return (left_type, right_type);
        }
        if self.is_refinable(left) && !self.is_refinable(right) {
            return (self.refine_literal(left, left_type, right_type), right_type);
        }
        (left_type, self.refine_literal(right, right_type, left_type))
    }

    // ========================================================================
    // Operators
    // ========================================================================

    fn invalid_operator(&self, op: &str, operand: DatatypeId, span: Span) -> Stall {
        Stall::Fail(BindError::InvalidOperator {
            op: op.to_string(),
            operand: self.type_string(operand),
            span,
        })
    }

    fn bind_unary(&mut self, frame: &Frame, op: UnaryOperator, operand: ExprId, span: Span) -> BindResult<DatatypeId> {
        let datatype = self.bind_expr(frame, operand)?;
        let kind = self.datatypes.kind(datatype).clone();

        match op {
            UnaryOperator::Negate if kind.is_number() => Ok(datatype),
            UnaryOperator::Not if kind == DatatypeKind::Bool => Ok(datatype),
            UnaryOperator::Complement if kind.is_integer() => Ok(datatype),
            UnaryOperator::Secret => Ok(self.datatypes.set_secret(datatype, true)),
            UnaryOperator::Reveal => Ok(self.datatypes.set_secret(datatype, false)),
            _ => Err(self.invalid_operator(op.as_str(), datatype, span)),
        }
    }

    fn bind_binary(
        &mut self,
        frame: &Frame,
        op: BinaryOperator,
        left: ExprId,
        right: ExprId,
        span: Span,
    ) -> BindResult<DatatypeId> {
        let left_type = self.bind_expr(frame, left)?;
        let right_type = self.bind_expr(frame, right)?;

        if op.is_shift() {
            if !self.datatypes.kind(left_type).is_integer() {
                return Err(self.invalid_operator(op.as_str(), left_type, span));
            }
            if !matches!(self.datatypes.kind(right_type), DatatypeKind::Uint(_)) {
                return Err(self.invalid_operator(op.as_str(), right_type, span));
            }
            let secret = self.datatypes.is_secret(right_type);
            return Ok(if secret {
                self.datatypes.set_secret(left_type, true)
            } else {
                left_type
            });
        }

        let (left_type, right_type) = self.refine_pair(left, left_type, right, right_type);
        let unified = self
            .datatypes
            .unify(left_type, right_type)
            .map_err(|_| self.mismatch(left_type, right_type, span))?;

        let kind = self.datatypes.kind(unified).clone();
        let allowed = match op {
            BinaryOperator::Add => {
                kind.is_number() || matches!(kind, DatatypeKind::String | DatatypeKind::Array(_))
            }
            BinaryOperator::Subtract
            | BinaryOperator::Multiply
            | BinaryOperator::Divide
            | BinaryOperator::Modulo
            | BinaryOperator::Exponent => kind.is_number(),
            BinaryOperator::BitwiseAnd | BinaryOperator::BitwiseOr | BinaryOperator::BitwiseXor => {
                kind.is_integer() || kind == DatatypeKind::Bool
            }
            BinaryOperator::Equal | BinaryOperator::NotEqual => true,
            BinaryOperator::LessThan
            | BinaryOperator::LessEqual
            | BinaryOperator::GreaterThan
            | BinaryOperator::GreaterEqual => kind.is_number() || kind == DatatypeKind::String,
            BinaryOperator::And | BinaryOperator::Or | BinaryOperator::Xor => kind == DatatypeKind::Bool,
            BinaryOperator::LeftShift
            | BinaryOperator::RightShift
            | BinaryOperator::RotateLeft
            | BinaryOperator::RotateRight => false,
        };
        if !allowed {
            return Err(self.invalid_operator(op.as_str(), unified, span));
        }

        if op.is_comparison() {
            let bool_type = self.datatypes.bool_type();
            let secret = self.datatypes.is_secret(unified);
            return Ok(self.datatypes.set_secret(bool_type, secret));
        }
        Ok(unified)
    }

    // ========================================================================
    // Construction
    // ========================================================================

    fn bind_array(&mut self, frame: &Frame, elems: &[ExprId], span: Span) -> BindResult<DatatypeId> {
        let Some((&first, rest)) = elems.split_first() else {
            return Err(Stall::Abort(BindError::MalformedAst {
                message: "empty array literal has no element datatype".to_string(),
                span,
            }));
        };

        let mut element = self.bind_expr(frame, first)?;
        for &elem in rest {
            let datatype = self.bind_expr(frame, elem)?;
            let datatype = self.refine_literal(elem, datatype, element);
            if self.is_refinable(first) && !self.is_refinable(elem) {
                element = self.refine_literal(first, element, datatype);
            }
            let elem_span = self.ast.expr(elem).span;
            element = self
                .datatypes
                .unify(element, datatype)
                .map_err(|_| self.mismatch(element, datatype, elem_span))?;
        }
        Ok(self.datatypes.array_type(element))
    }

    fn bind_modint(&mut self, frame: &Frame, value: ExprId, modulus: ExprId, span: Span) -> BindResult<DatatypeId> {
        let value_type = self.bind_expr(frame, value)?;
        let modulus_type = self.bind_expr(frame, modulus)?;

        if !self.datatypes.kind(value_type).is_integer() {
            return Err(self.invalid_operator("mod", value_type, span));
        }
        if !self.datatypes.kind(modulus_type).is_integer() {
            return Err(self.invalid_operator("mod", modulus_type, span));
        }

        // Copies of one modulus expression denote the same modulus
        let origin = self.ast.expr(modulus).origin;
        let datatype = self.datatypes.modint_type(origin);
        let secret = self.datatypes.is_secret(value_type);
        Ok(self.datatypes.set_secret(datatype, secret))
    }
}
