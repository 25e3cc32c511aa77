//! Template and class registry
//!
//! A template is the generic blueprint behind a constructor; a class is one
//! instantiation of it for a tuple of template-argument datatypes. Classes are
//! created lazily and memoized by that tuple.

use crate::interner::Symbol;
use crate::signature::SignatureId;
use rune_types::{define_id, DatatypeId, FunctionId, TemplateId};
use rustc_hash::FxHashMap;

define_id!(
    /// A class: one instantiation of a template
    ClassId
);

#[derive(Debug, Clone)]
pub struct Template {
    pub id: TemplateId,
    /// Constructor function
    pub constructor: FunctionId,
    /// Bit width of generated object handles
    pub ref_width: u32,
    /// Constructor parameter positions (after `self`) that select the class
    pub template_params: Vec<usize>,
    pub classes: Vec<ClassId>,
}

impl Template {
    /// A template without template parameters has exactly one class
    pub fn is_default_only(&self) -> bool {
        self.template_params.is_empty()
    }
}

/// A method generated for classes that do not define it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeneratedMethod {
    /// `toString()`, returns `string`
    ToString,
    /// `show()`, prints the object and returns `none`
    Show,
}

impl GeneratedMethod {
    pub const ALL: [GeneratedMethod; 2] = [GeneratedMethod::ToString, GeneratedMethod::Show];

    pub fn name(&self) -> &'static str {
        match self {
            GeneratedMethod::ToString => "toString",
            GeneratedMethod::Show => "show",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Class {
    pub id: ClassId,
    pub template: TemplateId,
    pub args: Vec<DatatypeId>,
    /// The class datatype, `class(template, args)`
    pub datatype: DatatypeId,
    /// Data members in definition order
    pub members: Vec<(Symbol, DatatypeId)>,
    member_index: FxHashMap<Symbol, usize>,
    pub generated_methods: FxHashMap<Symbol, GeneratedMethod>,
    pub constructors: Vec<SignatureId>,
    /// Some constructor signature finished binding
    pub constructed: bool,
}

impl Class {
    pub fn member(&self, name: Symbol) -> Option<DatatypeId> {
        self.member_index.get(&name).map(|&i| self.members[i].1)
    }

    /// Define a member or replace its datatype
    ///
    /// Returns true when the member is new.
    pub fn set_member(&mut self, name: Symbol, datatype: DatatypeId) -> bool {
        match self.member_index.get(&name) {
            Some(&i) => {
                self.members[i].1 = datatype;
                false
            }
            None => {
                self.member_index.insert(name, self.members.len());
                self.members.push((name, datatype));
                true
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: Vec<Template>,
    classes: Vec<Class>,
    by_constructor: FxHashMap<FunctionId, TemplateId>,
    index: FxHashMap<(TemplateId, Vec<DatatypeId>), ClassId>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_template(&mut self, constructor: FunctionId, ref_width: u32, template_params: Vec<usize>) -> TemplateId {
        let id = TemplateId::new(self.templates.len() as u32);
        self.templates.push(Template {
            id,
            constructor,
            ref_width,
            template_params,
            classes: Vec::new(),
        });
        self.by_constructor.insert(constructor, id);
        id
    }

    pub fn template_of(&self, constructor: FunctionId) -> Option<TemplateId> {
        self.by_constructor.get(&constructor).copied()
    }

    pub fn lookup_class(&self, template: TemplateId, args: &[DatatypeId]) -> Option<ClassId> {
        self.index.get(&(template, args.to_vec())).copied()
    }

    /// Register a new class; the caller has checked it does not exist yet
    pub fn add_class(&mut self, template: TemplateId, args: Vec<DatatypeId>, datatype: DatatypeId) -> ClassId {
        let id = ClassId::new(self.classes.len() as u32);
        self.classes.push(Class {
            id,
            template,
            args: args.clone(),
            datatype,
            members: Vec::new(),
            member_index: FxHashMap::default(),
            generated_methods: FxHashMap::default(),
            constructors: Vec::new(),
            constructed: false,
        });
        self.templates[template.index()].classes.push(id);
        self.index.insert((template, args), id);
        id
    }

    pub fn template(&self, id: TemplateId) -> &Template {
        &self.templates[id.index()]
    }

    pub fn class(&self, id: ClassId) -> &Class {
        &self.classes[id.index()]
    }

    pub fn class_mut(&mut self, id: ClassId) -> &mut Class {
        &mut self.classes[id.index()]
    }

    pub fn templates(&self) -> impl Iterator<Item = &Template> {
        self.templates.iter()
    }

    pub fn classes(&self) -> impl Iterator<Item = &Class> {
        self.classes.iter()
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }
}
