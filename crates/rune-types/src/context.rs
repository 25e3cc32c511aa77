//! Datatype context for interning and unifying datatypes

use crate::datatype::{Datatype, DatatypeId, DatatypeKind};
use crate::error::TypeError;
use crate::ids::{ExprId, FunctionId, TemplateId};
use rustc_hash::FxHashMap;

/// Names of the records a datatype refers to, for user-facing strings
///
/// The datatype model only stores handles; whoever owns the AST supplies the
/// names when a datatype has to be shown to a user.
pub trait DatatypeNames {
    /// Name of a function, struct or enum
    fn function_name(&self, function: FunctionId) -> String;

    /// Name of a template (its constructor's name)
    fn template_name(&self, template: TemplateId) -> String;

    /// Source text of a modulus expression
    fn modulus_text(&self, modulus: ExprId) -> String {
        format!("{}", modulus)
    }
}

/// Datatype context that owns every datatype of a compilation
///
/// Datatypes are interned so that structurally identical datatypes share one
/// DatatypeId; equality and unification of identical operands are O(1). The
/// table is append-only for the lifetime of the compilation.
#[derive(Debug, Clone)]
pub struct DatatypeContext {
    /// Storage for all datatypes, indexed by DatatypeId
    datatypes: Vec<Datatype>,

    /// Reverse mapping from Datatype to DatatypeId for interning
    datatype_to_id: FxHashMap<Datatype, DatatypeId>,
}

impl Default for DatatypeContext {
    fn default() -> Self {
        Self::new()
    }
}

impl DatatypeContext {
    /// Create a new context with the leaf datatypes pre-interned
    pub fn new() -> Self {
        let mut ctx = DatatypeContext {
            datatypes: Vec::new(),
            datatype_to_id: FxHashMap::default(),
        };

        ctx.intern(Datatype::plain(DatatypeKind::None));
        ctx.intern(Datatype::plain(DatatypeKind::Bool));
        ctx.intern(Datatype::plain(DatatypeKind::String));

        ctx
    }

    /// Intern a datatype, returning its DatatypeId
    ///
    /// If the datatype already exists, returns the existing DatatypeId.
    pub fn intern(&mut self, datatype: Datatype) -> DatatypeId {
        if let Some(&id) = self.datatype_to_id.get(&datatype) {
            return id;
        }

        let id = DatatypeId(self.datatypes.len() as u32);
        self.datatypes.push(datatype.clone());
        self.datatype_to_id.insert(datatype, id);
        id
    }

    /// Canonical datatype for a variant and modifiers
    pub fn create(&mut self, kind: DatatypeKind, secret: bool, nullable: bool) -> DatatypeId {
        self.intern(Datatype {
            kind,
            secret,
            nullable,
        })
    }

    /// Get a datatype by its id
    pub fn get(&self, id: DatatypeId) -> Option<&Datatype> {
        self.datatypes.get(id.0 as usize)
    }

    /// Get a datatype by its id
    ///
    /// # Panics
    ///
    /// Panics if the id was not handed out by this context
    pub fn datatype(&self, id: DatatypeId) -> &Datatype {
        &self.datatypes[id.0 as usize]
    }

    /// Variant of a datatype
    ///
    /// # Panics
    ///
    /// Panics if the id was not handed out by this context
    pub fn kind(&self, id: DatatypeId) -> &DatatypeKind {
        &self.datatype(id).kind
    }

    /// Look up a datatype's id without interning it
    pub fn lookup(&self, datatype: &Datatype) -> Option<DatatypeId> {
        self.datatype_to_id.get(datatype).copied()
    }

    // Convenience constructors

    /// The `none` datatype
    pub fn none_type(&mut self) -> DatatypeId {
        self.intern(Datatype::plain(DatatypeKind::None))
    }

    /// The `bool` datatype
    pub fn bool_type(&mut self) -> DatatypeId {
        self.intern(Datatype::plain(DatatypeKind::Bool))
    }

    /// The `string` datatype
    pub fn string_type(&mut self) -> DatatypeId {
        self.intern(Datatype::plain(DatatypeKind::String))
    }

    /// Unsigned integer of `width` bits
    pub fn uint_type(&mut self, width: u32) -> DatatypeId {
        self.intern(Datatype::plain(DatatypeKind::Uint(width)))
    }

    /// Signed integer of `width` bits
    pub fn int_type(&mut self, width: u32) -> DatatypeId {
        self.intern(Datatype::plain(DatatypeKind::Int(width)))
    }

    /// Modular integer over the constant produced by `modulus`
    pub fn modint_type(&mut self, modulus: ExprId) -> DatatypeId {
        self.intern(Datatype::plain(DatatypeKind::Modint { modulus }))
    }

    /// Float of `width` bits
    pub fn float_type(&mut self, width: u32) -> DatatypeId {
        self.intern(Datatype::plain(DatatypeKind::Float(width)))
    }

    /// Array of `element`
    pub fn array_type(&mut self, element: DatatypeId) -> DatatypeId {
        self.intern(Datatype::plain(DatatypeKind::Array(element)))
    }

    /// Unnarrowed class of `template`
    pub fn template_type(&mut self, template: TemplateId) -> DatatypeId {
        self.intern(Datatype::plain(DatatypeKind::Template(template)))
    }

    /// Concrete class of `template` for the given template arguments
    pub fn class_type(&mut self, template: TemplateId, args: Vec<DatatypeId>) -> DatatypeId {
        self.intern(Datatype::plain(DatatypeKind::Class { template, args }))
    }

    /// A function used as a value
    pub fn function_type(&mut self, function: FunctionId) -> DatatypeId {
        self.intern(Datatype::plain(DatatypeKind::Function(function)))
    }

    /// Function pointer
    pub fn funcptr_type(&mut self, ret: DatatypeId, params: Vec<DatatypeId>) -> DatatypeId {
        self.intern(Datatype::plain(DatatypeKind::Funcptr { ret, params }))
    }

    /// Tuple of `elements`
    pub fn tuple_type(&mut self, elements: Vec<DatatypeId>) -> DatatypeId {
        self.intern(Datatype::plain(DatatypeKind::Tuple(elements)))
    }

    /// Struct declared by `function` with the given field datatypes
    pub fn struct_type(&mut self, function: FunctionId, fields: Vec<DatatypeId>) -> DatatypeId {
        self.intern(Datatype::plain(DatatypeKind::Struct { function, fields }))
    }

    /// A value of the enum declared by `function`
    pub fn enum_type(&mut self, function: FunctionId) -> DatatypeId {
        self.intern(Datatype::plain(DatatypeKind::Enum(function)))
    }

    /// The enum declared by `function`, used as a namespace
    pub fn enum_class_type(&mut self, function: FunctionId) -> DatatypeId {
        self.intern(Datatype::plain(DatatypeKind::EnumClass(function)))
    }

    // Modifiers

    /// Same datatype with the secret modifier set or cleared
    pub fn set_secret(&mut self, id: DatatypeId, secret: bool) -> DatatypeId {
        let datatype = self.datatype(id);
        if datatype.secret == secret {
            return id;
        }
        let mut datatype = datatype.clone();
        datatype.secret = secret;
        self.intern(datatype)
    }

    /// Same datatype with the nullable modifier set or cleared
    pub fn set_nullable(&mut self, id: DatatypeId, nullable: bool) -> DatatypeId {
        let datatype = self.datatype(id);
        if datatype.nullable == nullable {
            return id;
        }
        let mut datatype = datatype.clone();
        datatype.nullable = nullable;
        self.intern(datatype)
    }

    /// Check if a datatype carries the secret modifier
    pub fn is_secret(&self, id: DatatypeId) -> bool {
        self.datatype(id).secret
    }

    /// Check if a datatype carries the nullable modifier
    pub fn is_nullable(&self, id: DatatypeId) -> bool {
        self.datatype(id).nullable
    }

    /// Integer or float datatype of the same signedness with a new width
    ///
    /// Used when the width of a literal is refined by its context.
    pub fn resize(&mut self, id: DatatypeId, width: u32) -> Result<DatatypeId, TypeError> {
        let datatype = self.datatype(id);
        let kind = match datatype.kind {
            DatatypeKind::Uint(_) => DatatypeKind::Uint(width),
            DatatypeKind::Int(_) => DatatypeKind::Int(width),
            DatatypeKind::Float(_) => DatatypeKind::Float(width),
            _ => return Err(TypeError::NotNumeric { datatype: id }),
        };
        let (secret, nullable) = (datatype.secret, datatype.nullable);
        Ok(self.create(kind, secret, nullable))
    }

    /// Integer datatype of the same width with the requested signedness
    pub fn set_signed(&mut self, id: DatatypeId, signed: bool) -> Result<DatatypeId, TypeError> {
        let datatype = self.datatype(id);
        let kind = match datatype.kind {
            DatatypeKind::Uint(w) | DatatypeKind::Int(w) => {
                if signed {
                    DatatypeKind::Int(w)
                } else {
                    DatatypeKind::Uint(w)
                }
            }
            _ => return Err(TypeError::NotNumeric { datatype: id }),
        };
        let (secret, nullable) = (datatype.secret, datatype.nullable);
        Ok(self.create(kind, secret, nullable))
    }

    // Unification

    /// Most specific datatype consistent with both operands
    ///
    /// `secret` propagates if either operand is secret; `nullable` survives
    /// only if both operands are nullable. Numeric widths and signs must match
    /// exactly. Arrays, tuples, structs, function pointers and classes unify
    /// pointwise; a template unifies with any class of that template.
    pub fn unify(&mut self, left: DatatypeId, right: DatatypeId) -> Result<DatatypeId, TypeError> {
        if left == right {
            return Ok(left);
        }

        let l = self.datatype(left).clone();
        let r = self.datatype(right).clone();
        let kind = self.unify_kinds(left, &l.kind, right, &r.kind)?;
        Ok(self.create(kind, l.secret || r.secret, l.nullable && r.nullable))
    }

    fn unify_kinds(
        &mut self,
        left: DatatypeId,
        lk: &DatatypeKind,
        right: DatatypeId,
        rk: &DatatypeKind,
    ) -> Result<DatatypeKind, TypeError> {
        use DatatypeKind::*;

        if lk == rk {
            return Ok(lk.clone());
        }

        match (lk, rk) {
            (Uint(_), Uint(_)) | (Int(_), Int(_)) | (Float(_), Float(_)) => {
                Err(TypeError::WidthMismatch { left, right })
            }
            (Uint(_), Int(_)) | (Int(_), Uint(_)) => Err(TypeError::SignMismatch { left, right }),
            (Modint { .. }, Modint { .. }) => Err(TypeError::ModulusMismatch { left, right }),
            (Array(le), Array(re)) => Ok(Array(self.unify(*le, *re)?)),
            (Tuple(le), Tuple(re)) => Ok(Tuple(self.unify_lists(left, le, right, re)?)),
            (
                Struct { function: lf, fields: le },
                Struct { function: rf, fields: re },
            ) => {
                if lf != rf {
                    return Err(TypeError::TemplateMismatch { left, right });
                }
                Ok(Struct {
                    function: *lf,
                    fields: self.unify_lists(left, le, right, re)?,
                })
            }
            (Funcptr { ret: lr, params: lp }, Funcptr { ret: rr, params: rp }) => {
                let params = self.unify_lists(left, lp, right, rp)?;
                let ret = self.unify(*lr, *rr)?;
                Ok(Funcptr { ret, params })
            }
            (
                Class { template: lt, args: la },
                Class { template: rt, args: ra },
            ) => {
                if lt != rt {
                    return Err(TypeError::TemplateMismatch { left, right });
                }
                Ok(Class {
                    template: *lt,
                    args: self.unify_lists(left, la, right, ra)?,
                })
            }
            (Template(t), Class { template, .. }) | (Class { template, .. }, Template(t)) => {
                if t != template {
                    return Err(TypeError::TemplateMismatch { left, right });
                }
                // The class is the more specific of the two
                Ok(if matches!(lk, Class { .. }) { lk.clone() } else { rk.clone() })
            }
            (Template(_), Template(_)) => Err(TypeError::TemplateMismatch { left, right }),
            _ => Err(TypeError::KindMismatch { left, right }),
        }
    }

    fn unify_lists(
        &mut self,
        left: DatatypeId,
        l: &[DatatypeId],
        right: DatatypeId,
        r: &[DatatypeId],
    ) -> Result<Vec<DatatypeId>, TypeError> {
        if l.len() != r.len() {
            return Err(TypeError::ArityMismatch { left, right });
        }
        l.iter()
            .zip(r.iter())
            .map(|(&a, &b)| self.unify(a, b))
            .collect()
    }

    // Queries

    /// Innermost element datatype of a (possibly nested) array
    pub fn array_base(&self, id: DatatypeId) -> DatatypeId {
        let mut current = id;
        while let DatatypeKind::Array(elem) = self.kind(current) {
            current = *elem;
        }
        current
    }

    /// Nesting depth of array datatypes (0 for non-arrays)
    pub fn array_depth(&self, id: DatatypeId) -> u32 {
        let mut depth = 0;
        let mut current = id;
        while let DatatypeKind::Array(elem) = self.kind(current) {
            current = *elem;
            depth += 1;
        }
        depth
    }

    /// Check if a datatype is an unnarrowed template
    pub fn is_template(&self, id: DatatypeId) -> bool {
        matches!(self.kind(id), DatatypeKind::Template(_))
    }

    /// Check if a template placeholder appears anywhere inside a datatype
    pub fn contains_template(&self, id: DatatypeId) -> bool {
        match self.kind(id) {
            DatatypeKind::Template(_) => true,
            DatatypeKind::Array(elem) => self.contains_template(*elem),
            DatatypeKind::Tuple(elems)
            | DatatypeKind::Class { args: elems, .. }
            | DatatypeKind::Struct { fields: elems, .. } => {
                elems.iter().any(|e| self.contains_template(*e))
            }
            DatatypeKind::Funcptr { ret, params } => {
                self.contains_template(*ret) || params.iter().any(|p| self.contains_template(*p))
            }
            _ => false,
        }
    }

    /// Check if a datatype is fully concrete (usable in a code-generated program)
    pub fn is_concrete(&self, id: DatatypeId) -> bool {
        !self.contains_template(id)
    }

    /// Template a class or template datatype belongs to
    pub fn template_of(&self, id: DatatypeId) -> Option<TemplateId> {
        match self.kind(id) {
            DatatypeKind::Template(t) | DatatypeKind::Class { template: t, .. } => Some(*t),
            _ => None,
        }
    }

    /// User-facing name of a datatype, e.g. `[u32]` or `Stack(string)`
    pub fn type_string(&self, id: DatatypeId, names: &dyn DatatypeNames) -> String {
        let datatype = self.datatype(id);
        let base = match &datatype.kind {
            DatatypeKind::None => "none".to_string(),
            DatatypeKind::Bool => "bool".to_string(),
            DatatypeKind::String => "string".to_string(),
            DatatypeKind::Uint(w) => format!("u{}", w),
            DatatypeKind::Int(w) => format!("i{}", w),
            DatatypeKind::Modint { modulus } => format!("modint({})", names.modulus_text(*modulus)),
            DatatypeKind::Float(w) => format!("f{}", w),
            DatatypeKind::Array(elem) => format!("[{}]", self.type_string(*elem, names)),
            DatatypeKind::Template(t) => names.template_name(*t),
            DatatypeKind::Class { template, args } => {
                if args.is_empty() {
                    names.template_name(*template)
                } else {
                    format!("{}({})", names.template_name(*template), self.list_string(args, names))
                }
            }
            DatatypeKind::Function(f) => format!("func {}", names.function_name(*f)),
            DatatypeKind::Funcptr { ret, params } => format!(
                "funcptr({}) -> {}",
                self.list_string(params, names),
                self.type_string(*ret, names)
            ),
            DatatypeKind::Tuple(elems) => format!("({})", self.list_string(elems, names)),
            DatatypeKind::Struct { function, .. } => names.function_name(*function),
            DatatypeKind::Enum(f) => names.function_name(*f),
            DatatypeKind::EnumClass(f) => format!("enum {}", names.function_name(*f)),
        };
        let base = if datatype.nullable { format!("{}?", base) } else { base };
        if datatype.secret {
            format!("secret({})", base)
        } else {
            base
        }
    }

    fn list_string(&self, ids: &[DatatypeId], names: &dyn DatatypeNames) -> String {
        ids.iter()
            .map(|id| self.type_string(*id, names))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Source text of the default (zero) value of a datatype
    pub fn default_value_string(&self, id: DatatypeId, names: &dyn DatatypeNames) -> String {
        match self.kind(id) {
            DatatypeKind::None => "none".to_string(),
            DatatypeKind::Bool => "false".to_string(),
            DatatypeKind::String => "\"\"".to_string(),
            DatatypeKind::Uint(w) => format!("0u{}", w),
            DatatypeKind::Int(w) => format!("0i{}", w),
            DatatypeKind::Modint { .. } => "0".to_string(),
            DatatypeKind::Float(w) => format!("0.0f{}", w),
            DatatypeKind::Array(elem) => format!("arrayof({})", self.type_string(*elem, names)),
            DatatypeKind::Template(t) | DatatypeKind::Class { template: t, .. } => {
                format!("null({})", names.template_name(*t))
            }
            DatatypeKind::Function(f) | DatatypeKind::Enum(f) | DatatypeKind::EnumClass(f) => {
                names.function_name(*f)
            }
            DatatypeKind::Funcptr { .. } => "null".to_string(),
            DatatypeKind::Tuple(elems) => {
                let values: Vec<String> = elems
                    .iter()
                    .map(|e| self.default_value_string(*e, names))
                    .collect();
                format!("({})", values.join(", "))
            }
            DatatypeKind::Struct { function, fields } => {
                let values: Vec<String> = fields
                    .iter()
                    .map(|e| self.default_value_string(*e, names))
                    .collect();
                format!("{}({})", names.function_name(*function), values.join(", "))
            }
        }
    }

    /// Get a display string for a datatype, using raw handles for names
    pub fn display(&self, id: DatatypeId) -> String {
        self.get(id)
            .map(|datatype| format!("{}", datatype))
            .unwrap_or_else(|| format!("InvalidDatatype({})", id.0))
    }

    /// Get the number of datatypes in the context
    pub fn len(&self) -> usize {
        self.datatypes.len()
    }

    /// Check if the context is empty
    pub fn is_empty(&self) -> bool {
        self.datatypes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Names;

    impl DatatypeNames for Names {
        fn function_name(&self, function: FunctionId) -> String {
            format!("f{}", function.as_u32())
        }

        fn template_name(&self, template: TemplateId) -> String {
            format!("T{}", template.as_u32())
        }
    }

    #[test]
    fn test_interning() {
        let mut ctx = DatatypeContext::new();

        let a = ctx.uint_type(32);
        let b = ctx.uint_type(32);
        assert_eq!(a, b);

        let arr1 = ctx.array_type(a);
        let arr2 = ctx.array_type(b);
        assert_eq!(arr1, arr2);
        assert_ne!(ctx.uint_type(64), a);
    }

    #[test]
    fn test_modifiers_are_part_of_identity() {
        let mut ctx = DatatypeContext::new();

        let plain = ctx.uint_type(8);
        let secret = ctx.set_secret(plain, true);
        assert_ne!(plain, secret);
        assert_eq!(ctx.set_secret(secret, false), plain);
        assert_eq!(ctx.create(DatatypeKind::Uint(8), true, false), secret);
    }

    #[test]
    fn test_unify_identical() {
        let mut ctx = DatatypeContext::new();

        let s = ctx.string_type();
        assert_eq!(ctx.unify(s, s), Ok(s));
    }

    #[test]
    fn test_unify_propagates_secret() {
        let mut ctx = DatatypeContext::new();

        let plain = ctx.int_type(32);
        let secret = ctx.set_secret(plain, true);
        assert_eq!(ctx.unify(plain, secret), Ok(secret));
        assert_eq!(ctx.unify(secret, plain), Ok(secret));
    }

    #[test]
    fn test_unify_nullable_only_if_both() {
        let mut ctx = DatatypeContext::new();

        let template = TemplateId::new(0);
        let class = ctx.class_type(template, vec![]);
        let nullable = ctx.set_nullable(class, true);
        assert_eq!(ctx.unify(class, nullable), Ok(class));
        assert_eq!(ctx.unify(nullable, nullable), Ok(nullable));
    }

    #[test]
    fn test_no_implicit_widening() {
        let mut ctx = DatatypeContext::new();

        let u32_ty = ctx.uint_type(32);
        let u64_ty = ctx.uint_type(64);
        let i32_ty = ctx.int_type(32);

        assert!(matches!(ctx.unify(u32_ty, u64_ty), Err(TypeError::WidthMismatch { .. })));
        assert!(matches!(ctx.unify(u32_ty, i32_ty), Err(TypeError::SignMismatch { .. })));
    }

    #[test]
    fn test_unify_incompatible_kinds() {
        let mut ctx = DatatypeContext::new();

        let i = ctx.int_type(32);
        let s = ctx.string_type();
        assert_eq!(ctx.unify(i, s), Err(TypeError::KindMismatch { left: i, right: s }));
    }

    #[test]
    fn test_unify_array_recurses() {
        let mut ctx = DatatypeContext::new();

        let plain = ctx.uint_type(16);
        let secret = ctx.set_secret(plain, true);
        let a = ctx.array_type(plain);
        let b = ctx.array_type(secret);
        let expected = ctx.array_type(secret);
        assert_eq!(ctx.unify(a, b), Ok(expected));
    }

    #[test]
    fn test_unify_tuple_arity() {
        let mut ctx = DatatypeContext::new();

        let u = ctx.uint_type(32);
        let pair = ctx.tuple_type(vec![u, u]);
        let triple = ctx.tuple_type(vec![u, u, u]);
        assert!(matches!(ctx.unify(pair, triple), Err(TypeError::ArityMismatch { .. })));
    }

    #[test]
    fn test_unify_template_with_class() {
        let mut ctx = DatatypeContext::new();

        let template = TemplateId::new(1);
        let other = TemplateId::new(2);
        let u = ctx.uint_type(32);
        let class = ctx.class_type(template, vec![u]);
        let placeholder = ctx.template_type(template);
        let foreign = ctx.template_type(other);

        assert_eq!(ctx.unify(placeholder, class), Ok(class));
        assert_eq!(ctx.unify(class, placeholder), Ok(class));
        assert!(matches!(ctx.unify(foreign, class), Err(TypeError::TemplateMismatch { .. })));
    }

    #[test]
    fn test_unify_classes_pointwise() {
        let mut ctx = DatatypeContext::new();

        let template = TemplateId::new(0);
        let u = ctx.uint_type(32);
        let s = ctx.string_type();
        let a = ctx.class_type(template, vec![u]);
        let b = ctx.class_type(template, vec![s]);
        assert!(ctx.unify(a, b).is_err());
    }

    #[test]
    fn test_resize_keeps_sign_and_modifiers() {
        let mut ctx = DatatypeContext::new();

        let i = ctx.int_type(64);
        let secret = ctx.set_secret(i, true);
        let resized = ctx.resize(secret, 8).unwrap();
        assert_eq!(ctx.kind(resized), &DatatypeKind::Int(8));
        assert!(ctx.is_secret(resized));

        let s = ctx.string_type();
        assert_eq!(ctx.resize(s, 8), Err(TypeError::NotNumeric { datatype: s }));
    }

    #[test]
    fn test_set_signed() {
        let mut ctx = DatatypeContext::new();

        let u = ctx.uint_type(32);
        let i = ctx.set_signed(u, true).unwrap();
        assert_eq!(i, ctx.int_type(32));
        assert_eq!(ctx.set_signed(i, false).unwrap(), u);
    }

    #[test]
    fn test_array_base_and_depth() {
        let mut ctx = DatatypeContext::new();

        let b = ctx.bool_type();
        let a1 = ctx.array_type(b);
        let a2 = ctx.array_type(a1);
        assert_eq!(ctx.array_base(a2), b);
        assert_eq!(ctx.array_depth(a2), 2);
        assert_eq!(ctx.array_depth(b), 0);
    }

    #[test]
    fn test_contains_template() {
        let mut ctx = DatatypeContext::new();

        let t = ctx.template_type(TemplateId::new(0));
        let arr = ctx.array_type(t);
        let u = ctx.uint_type(32);
        let tuple = ctx.tuple_type(vec![u, arr]);
        assert!(ctx.contains_template(tuple));
        assert!(ctx.is_concrete(u));
    }

    #[test]
    fn test_type_string() {
        let mut ctx = DatatypeContext::new();

        let u = ctx.uint_type(32);
        let s = ctx.string_type();
        let class = ctx.class_type(TemplateId::new(3), vec![u]);
        let tuple = ctx.tuple_type(vec![u, s]);
        let secret = ctx.set_secret(u, true);

        assert_eq!(ctx.type_string(class, &Names), "T3(u32)");
        assert_eq!(ctx.type_string(tuple, &Names), "(u32, string)");
        assert_eq!(ctx.type_string(secret, &Names), "secret(u32)");
    }

    #[test]
    fn test_default_value_string() {
        let mut ctx = DatatypeContext::new();

        let u = ctx.uint_type(32);
        let b = ctx.bool_type();
        let tuple = ctx.tuple_type(vec![u, b]);
        assert_eq!(ctx.default_value_string(tuple, &Names), "(0u32, false)");
    }
}
