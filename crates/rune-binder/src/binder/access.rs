//! Member access, indexing and type expressions

use super::{BindResult, Binder, Frame, Stall};
use crate::ast::{ExprKind, FunctionKind, Ident, TypeExpr};
use crate::ast::BlockId;
use crate::error::BindError;
use crate::event::{EventKind, Namespace};
use crate::interner::Symbol;
use crate::span::Span;
use crate::template::GeneratedMethod;
use rune_types::{DatatypeId, DatatypeKind, ExprId};

impl Binder {
    /// Datatype of `object.member` given the object's datatype
    pub(crate) fn bind_member_of(
        &mut self,
        frame: &Frame,
        object_type: DatatypeId,
        member: Symbol,
        span: Span,
    ) -> BindResult<DatatypeId> {
        if let Some(class) = self.class_of(object_type) {
            if let Some(datatype) = self.templates.class(class).member(member) {
                return Ok(datatype);
            }

            let constructor = self.templates.template(self.templates.class(class).template).constructor;
            if let Some(Ident::Function(method)) = self.ast.find_member(constructor, member) {
                return Ok(self.datatypes.function_type(method));
            }
            if let Some(&generated) = self.templates.class(class).generated_methods.get(&member) {
                let ret = match generated {
                    GeneratedMethod::ToString => self.datatypes.string_type(),
                    GeneratedMethod::Show => self.datatypes.none_type(),
                };
                return Ok(self.datatypes.funcptr_type(ret, Vec::new()));
            }

            // Members appear as the constructor binds
            if !self.templates.class(class).constructed {
                return Err(Stall::Wait(EventKind::IdentDefined(Namespace::Class(class), member), span));
            }
            return Err(self.member_not_found(member, object_type, span));
        }

        match self.datatypes.kind(object_type).clone() {
            DatatypeKind::Struct { function, fields } => {
                let params = &self.ast.function(function).params;
                match params.iter().position(|p| self.ast.variable(*p).name == member) {
                    Some(i) if i < fields.len() => Ok(fields[i]),
                    _ => Err(self.member_not_found(member, object_type, span)),
                }
            }
            DatatypeKind::EnumClass(function) => match self.ast.find_member(function, member) {
                Some(Ident::Variable(entry)) => match self.ast.variable(entry).datatype {
                    Some(datatype) => Ok(datatype),
                    None => Err(self.member_not_found(member, object_type, span)),
                },
                _ => Err(self.member_not_found(member, object_type, span)),
            },
            DatatypeKind::Function(module) if self.ast.function(module).kind == FunctionKind::Module => {
                match self.ast.find_member(module, member) {
                    Some(Ident::Variable(var)) => self.read_variable(frame, var, span),
                    Some(Ident::Function(function)) => Ok(self.function_value(function)),
                    None => Err(self.member_not_found(member, object_type, span)),
                }
            }
            _ => Err(self.member_not_found(member, object_type, span)),
        }
    }

    fn member_not_found(&self, member: Symbol, datatype: DatatypeId, span: Span) -> Stall {
        Stall::Fail(BindError::MemberNotFound {
            member: self.interner.resolve(member).to_string(),
            datatype: self.type_string(datatype),
            span,
        })
    }

    /// `object[index]`
    pub(crate) fn bind_index(&mut self, frame: &Frame, object: ExprId, index: ExprId, span: Span) -> BindResult<DatatypeId> {
        let object_type = self.bind_expr(frame, object)?;
        let index_type = self.bind_expr(frame, index)?;

        if !self.datatypes.kind(index_type).is_integer() {
            let reason = format!("index has datatype {}", self.type_string(index_type));
            return Err(self.not_indexable(object_type, reason, span));
        }

        let element = match self.datatypes.kind(object_type).clone() {
            DatatypeKind::Array(element) => element,
            DatatypeKind::String => self.datatypes.uint_type(8),
            DatatypeKind::Tuple(elements) | DatatypeKind::Struct { fields: elements, .. } => {
                let position = match &self.ast.expr(index).kind {
                    ExprKind::Integer { text, .. } => text.parse::<usize>().ok(),
                    _ => None,
                };
                let Some(position) = position else {
                    return Err(self.not_indexable(object_type, "index must be a constant integer".to_string(), span));
                };
                match elements.get(position) {
                    Some(&element) => element,
                    None => {
                        let reason = format!("index {} out of range for {} element(s)", position, elements.len());
                        return Err(self.not_indexable(object_type, reason, span));
                    }
                }
            }
            _ => {
                return Err(self.not_indexable(object_type, "not an array, string or tuple".to_string(), span));
            }
        };

        // Reading with a secret index makes the element secret
        if self.datatypes.is_secret(index_type) || self.datatypes.is_secret(object_type) {
            return Ok(self.datatypes.set_secret(element, true));
        }
        Ok(element)
    }

    fn not_indexable(&self, datatype: DatatypeId, reason: String, span: Span) -> Stall {
        Stall::Fail(BindError::NotIndexable {
            datatype: self.type_string(datatype),
            reason,
            span,
        })
    }

    /// Datatype denoted by a written type, resolved from `scope`
    pub(crate) fn resolve_type_expr(&mut self, type_expr: &TypeExpr, scope: BlockId, span: Span) -> BindResult<DatatypeId> {
        let datatype = match type_expr {
            TypeExpr::None => self.datatypes.none_type(),
            TypeExpr::Bool => self.datatypes.bool_type(),
            TypeExpr::String => self.datatypes.string_type(),
            TypeExpr::Uint(width) => self.datatypes.uint_type(*width),
            TypeExpr::Int(width) => self.datatypes.int_type(*width),
            TypeExpr::Float(width) => self.datatypes.float_type(*width),
            TypeExpr::Array(element) => {
                let element = self.resolve_type_expr(element, scope, span)?;
                self.datatypes.array_type(element)
            }
            TypeExpr::Tuple(elements) => {
                let mut types = Vec::with_capacity(elements.len());
                for element in elements {
                    types.push(self.resolve_type_expr(element, scope, span)?);
                }
                self.datatypes.tuple_type(types)
            }
            TypeExpr::Secret(inner) => {
                let inner = self.resolve_type_expr(inner, scope, span)?;
                self.datatypes.set_secret(inner, true)
            }
            TypeExpr::Named(name) => self.resolve_type_name(*name, scope, span)?,
        };
        Ok(datatype)
    }

    fn resolve_type_name(&mut self, name: Symbol, scope: BlockId, span: Span) -> BindResult<DatatypeId> {
        let Some(Ident::Function(function)) = self.ast.find_ident(scope, name) else {
            return Err(Stall::Fail(BindError::UndefinedIdentifier {
                name: self.interner.resolve(name).to_string(),
                span,
            }));
        };

        match self.ast.function(function).kind {
            FunctionKind::Constructor => Ok(self.function_value(function)),
            FunctionKind::Enum => Ok(self.datatypes.enum_type(function)),
            FunctionKind::Struct => {
                let params = self.ast.function(function).params.clone();
                let struct_scope = self.ast.function(function).block;
                let mut fields = Vec::with_capacity(params.len());
                for param in params {
                    let Some(constraint) = self.ast.variable(param).constraint.clone() else {
                        return Err(self.malformed(
                            format!(
                                "struct '{}' is used as a datatype but field '{}' has no type",
                                self.function_name(function),
                                self.interner.resolve(self.ast.variable(param).name)
                            ),
                            span,
                        ));
                    };
                    fields.push(self.resolve_type_expr(&constraint, struct_scope, span)?);
                }
                Ok(self.datatypes.struct_type(function, fields))
            }
            FunctionKind::Plain | FunctionKind::Module => Err(Stall::Fail(BindError::TypeMismatch {
                expected: "a datatype name".to_string(),
                actual: format!("function '{}'", self.function_name(function)),
                span,
            })),
        }
    }
}
