//! Statement rules

use super::{BindResult, Binder, Frame, Stall};
use crate::ast::{ExprKind, FunctionKind, Ident, StmtId, StmtKind, VarId};
use crate::error::BindError;
use crate::event::{EventKind, Namespace};
use crate::span::Span;
use crate::template::ClassId;
use rune_types::{DatatypeId, DatatypeKind, ExprId};

impl Binder {
    /// Bind one statement from its start
    pub(crate) fn bind_statement(&mut self, frame: &Frame, stmt: StmtId) -> BindResult<()> {
        let s = self.ast.statement(stmt).clone();

        match s.kind {
            StmtKind::Expr(e) | StmtKind::Relation(e) => {
                self.bind_expr(frame, e)?;
            }
            StmtKind::Assign { target, value } => self.bind_assign(frame, target, value, s.span)?,
            StmtKind::If(cond) | StmtKind::ElseIf(cond) | StmtKind::While(cond) => {
                self.bind_condition(frame, cond)?;
            }
            StmtKind::Else => {}
            StmtKind::Return(value) => self.bind_return(frame, value, s.span)?,
            StmtKind::Print(args) => {
                for arg in args {
                    self.bind_expr(frame, arg)?;
                }
            }
        }

        Ok(())
    }

    fn bind_condition(&mut self, frame: &Frame, cond: ExprId) -> BindResult<()> {
        let datatype = self.bind_expr(frame, cond)?;
        let bool_type = self.datatypes.bool_type();
        if datatype != bool_type {
            // Branching on a secret would leak it
            let span = self.ast.expr(cond).span;
            return Err(self.mismatch(bool_type, datatype, span));
        }
        Ok(())
    }

    fn bind_return(&mut self, frame: &Frame, value: Option<ExprId>, span: Span) -> BindResult<()> {
        if self.ast.function(frame.function).kind == FunctionKind::Module {
            return Err(Stall::Fail(BindError::ReturnOutsideFunction { span }));
        }

        let datatype = match value {
            Some(e) => self.bind_expr(frame, e)?,
            None => self.datatypes.none_type(),
        };

        match self.signatures.get(frame.signature).return_type {
            None => {
                self.signatures.get_mut(frame.signature).return_type = Some(datatype);
                self.fire(EventKind::Signature(frame.signature));
            }
            Some(existing) => {
                let datatype = match value {
                    Some(e) => self.refine_literal(e, datatype, existing),
                    None => datatype,
                };
                let unified = self
                    .datatypes
                    .unify(existing, datatype)
                    .map_err(|_| self.mismatch(existing, datatype, span))?;
                self.signatures.get_mut(frame.signature).return_type = Some(unified);
            }
        }

        Ok(())
    }

    fn bind_assign(&mut self, frame: &Frame, target: ExprId, value: ExprId, span: Span) -> BindResult<()> {
        let value_type = self.bind_expr(frame, value)?;
        let target_expr = self.ast.expr(target).clone();

        let assigned = match target_expr.kind {
            ExprKind::Ident(name) => match self.ast.find_ident(frame.block, name) {
                Some(Ident::Variable(var)) => self.assign_variable(var, value, value_type, span)?,
                Some(Ident::Function(function)) => {
                    return Err(Stall::Fail(BindError::InvalidOperator {
                        op: "=".to_string(),
                        operand: format!("function '{}'", self.function_name(function)),
                        span,
                    }));
                }
                None => {
                    return Err(Stall::Wait(
                        EventKind::IdentDefined(Namespace::Scope(frame.block), name),
                        target_expr.span,
                    ));
                }
            },
            ExprKind::Member { object, member } => {
                let object_type = self.bind_expr(frame, object)?;
                match self.class_of(object_type) {
                    Some(class) if self.constructs(frame, class) => {
                        self.define_member(class, member, value, value_type, span)?
                    }
                    _ => {
                        let current = self.bind_member_of(frame, object_type, member, target_expr.span)?;
                        self.unify_assigned(current, value, value_type, span)?
                    }
                }
            }
            ExprKind::Index { .. } => {
                let element = self.bind_expr(frame, target)?;
                self.unify_assigned(element, value, value_type, span)?
            }
            _ => {
                return Err(Stall::Fail(BindError::InvalidOperator {
                    op: "=".to_string(),
                    operand: "a value that is not assignable".to_string(),
                    span,
                }));
            }
        };

        self.ast.expr_mut(target).datatype = Some(assigned);
        Ok(())
    }

    /// Unify the datatype of an assignment target with the assigned value
    fn unify_assigned(
        &mut self,
        current: DatatypeId,
        value: ExprId,
        value_type: DatatypeId,
        span: Span,
    ) -> BindResult<DatatypeId> {
        let value_type = self.refine_literal(value, value_type, current);
        self.datatypes
            .unify(current, value_type)
            .map_err(|_| self.mismatch(current, value_type, span))
    }

    fn assign_variable(&mut self, var: VarId, value: ExprId, value_type: DatatypeId, span: Span) -> BindResult<DatatypeId> {
        match self.ast.variable(var).datatype {
            None => {
                self.ast.variable_mut(var).datatype = Some(value_type);
                self.fire(EventKind::Variable(var));
                Ok(value_type)
            }
            Some(current) => {
                let unified = self.unify_assigned(current, value, value_type, span)?;
                self.ast.variable_mut(var).datatype = Some(unified);
                Ok(unified)
            }
        }
    }

    /// `self.x = e` in a constructor defines member `x` of the class
    fn define_member(
        &mut self,
        class: ClassId,
        member: crate::interner::Symbol,
        value: ExprId,
        value_type: DatatypeId,
        span: Span,
    ) -> BindResult<DatatypeId> {
        match self.templates.class(class).member(member) {
            Some(current) => {
                let unified = self.unify_assigned(current, value, value_type, span)?;
                self.templates.class_mut(class).set_member(member, unified);
                Ok(unified)
            }
            None => {
                self.templates.class_mut(class).set_member(member, value_type);
                self.fire(EventKind::IdentDefined(Namespace::Class(class), member));
                Ok(value_type)
            }
        }
    }

    /// Check if the running signature is a constructor of `class`
    fn constructs(&self, frame: &Frame, class: ClassId) -> bool {
        let function = self.ast.function(frame.function);
        function.kind == FunctionKind::Constructor
            && function.template == Some(self.templates.class(class).template)
    }

    /// Class a datatype is an instance of
    pub(crate) fn class_of(&self, datatype: DatatypeId) -> Option<ClassId> {
        match self.datatypes.kind(datatype) {
            DatatypeKind::Class { template, args } => self.templates.lookup_class(*template, args),
            _ => None,
        }
    }
}
