//! The binding metamodel: resolved classes, functions, fields and enums.
//!
//! Entities live in arenas owned by [`MetaModel`] and refer to each other by
//! id ([`ClassId`], [`FunctionId`], [`EnumId`]). The builder creates and
//! mutates them; once the build returns, the model is read-only.

mod class;
mod enums;
mod function;
mod types;

use std::sync::Arc;

use rustc_hash::FxHashMap;

pub use class::{ClassAttributes, MetaClass, MetaField};
pub use enums::{MetaEnum, MetaEnumValue, evaluate_enum_values, parse_integer_literal};
pub use function::{FunctionAttributes, FunctionKind, MetaArgument, MetaFunction};
pub use types::{MetaType, TemplateBinding, substitute};

use crate::base::{ClassId, EnumId, FunctionId, TypeEntryId};

/// Arena container for the built model.
#[derive(Clone, Debug, Default)]
pub struct MetaModel {
    classes: Vec<MetaClass>,
    functions: Vec<MetaFunction>,
    enums: Vec<MetaEnum>,
    class_by_name: FxHashMap<Arc<str>, ClassId>,
    /// Emission order of classes; dependencies first.
    pub class_order: Vec<ClassId>,
    pub global_functions: Vec<FunctionId>,
    pub global_enums: Vec<EnumId>,
}

impl MetaModel {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // CLASSES
    // ========================================================================

    /// Add a class under its qualified name.
    pub fn add_class(&mut self, entry: TypeEntryId, name: impl Into<Arc<str>>) -> ClassId {
        let id = ClassId::new(self.classes.len());
        let class = MetaClass::new(id, entry, name);
        self.class_by_name.insert(class.name.clone(), id);
        self.classes.push(class);
        id
    }

    pub fn class(&self, id: ClassId) -> &MetaClass {
        &self.classes[id.index()]
    }

    pub fn class_mut(&mut self, id: ClassId) -> &mut MetaClass {
        &mut self.classes[id.index()]
    }

    pub fn classes(&self) -> &[MetaClass] {
        &self.classes
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    pub fn find_class(&self, name: &str) -> Option<ClassId> {
        self.class_by_name.get(name).copied()
    }

    pub fn class_by_entry(&self, entry: TypeEntryId) -> Option<ClassId> {
        self.classes.iter().find(|c| c.entry == entry).map(|c| c.id)
    }

    /// Classes in emission order (declaration order until sorted).
    pub fn ordered_classes(&self) -> impl Iterator<Item = &MetaClass> {
        let order: Box<dyn Iterator<Item = ClassId> + '_> = if self.class_order.is_empty() {
            Box::new(self.classes.iter().map(|c| c.id))
        } else {
            Box::new(self.class_order.iter().copied())
        };
        order.map(|id| self.class(id))
    }

    /// Whether `ancestor` is `class` or one of its transitive bases.
    pub fn inherits_from(&self, class: ClassId, ancestor: ClassId) -> bool {
        let mut pending = vec![class];
        let mut seen = Vec::new();
        while let Some(current) = pending.pop() {
            if current == ancestor {
                return true;
            }
            if seen.contains(&current) {
                continue;
            }
            seen.push(current);
            pending.extend(self.class(current).bases.iter().copied());
        }
        false
    }

    /// All transitive bases of a class, nearest first, without duplicates.
    pub fn ancestors(&self, class: ClassId) -> Vec<ClassId> {
        let mut out: Vec<ClassId> = Vec::new();
        let mut queue: std::collections::VecDeque<ClassId> =
            self.class(class).bases.iter().copied().collect();
        while let Some(current) = queue.pop_front() {
            if current == class || out.contains(&current) {
                continue;
            }
            out.push(current);
            queue.extend(self.class(current).bases.iter().copied());
        }
        out
    }

    // ========================================================================
    // FUNCTIONS
    // ========================================================================

    /// Add a function, assigning its id. Attached to its owner's function
    /// list, or to the global list when it has no owner.
    pub fn add_function(&mut self, mut function: MetaFunction) -> FunctionId {
        let id = FunctionId::new(self.functions.len());
        function.id = id;
        match function.owner {
            Some(owner) => self.classes[owner.index()].functions.push(id),
            None => self.global_functions.push(id),
        }
        self.functions.push(function);
        id
    }

    pub fn function(&self, id: FunctionId) -> &MetaFunction {
        &self.functions[id.index()]
    }

    pub fn function_mut(&mut self, id: FunctionId) -> &mut MetaFunction {
        &mut self.functions[id.index()]
    }

    pub fn functions(&self) -> &[MetaFunction] {
        &self.functions
    }

    /// Functions owned by a class, in declaration order.
    pub fn functions_of(&self, class: ClassId) -> impl Iterator<Item = &MetaFunction> {
        self.class(class).functions.iter().map(|id| self.function(*id))
    }

    pub fn global_functions(&self) -> impl Iterator<Item = &MetaFunction> {
        self.global_functions.iter().map(|id| self.function(*id))
    }

    /// Move a function to another owner (or to the global list).
    pub fn set_function_owner(&mut self, id: FunctionId, owner: Option<ClassId>) {
        match self.functions[id.index()].owner {
            Some(old) => self.classes[old.index()].functions.retain(|f| *f != id),
            None => self.global_functions.retain(|f| *f != id),
        }
        self.functions[id.index()].owner = owner;
        match owner {
            Some(new) => self.classes[new.index()].functions.push(id),
            None => self.global_functions.push(id),
        }
    }

    /// Detach a function from its owner; it stays in the arena unreachable.
    pub fn detach_function(&mut self, id: FunctionId) {
        match self.functions[id.index()].owner {
            Some(owner) => self.classes[owner.index()].functions.retain(|f| *f != id),
            None => self.global_functions.retain(|f| *f != id),
        }
    }

    // ========================================================================
    // ENUMS
    // ========================================================================

    pub fn add_enum(&mut self, mut meta_enum: MetaEnum) -> EnumId {
        let id = EnumId::new(self.enums.len());
        meta_enum.id = id;
        match meta_enum.enclosing {
            Some(owner) => self.classes[owner.index()].enums.push(id),
            None => self.global_enums.push(id),
        }
        self.enums.push(meta_enum);
        id
    }

    pub fn enumeration(&self, id: EnumId) -> &MetaEnum {
        &self.enums[id.index()]
    }

    pub fn enums(&self) -> &[MetaEnum] {
        &self.enums
    }

    pub fn find_enum(&self, name: &str) -> Option<&MetaEnum> {
        self.enums.iter().find(|e| &*e.name == name)
    }
}
