//! Metamodel builder.
//!
//! Turns a [`TranslationUnit`] plus a [`BindingSpec`] into a [`MetaModel`].
//! The build runs as a fixed sequence of passes over one mutable model:
//!
//! 1. **Types** - classes, enums, namespaces (recursively) and typedefs, so
//!    every type-producing declaration exists before members are resolved
//! 2. **Members** - member functions and fields
//! 3. **Free functions** - specification-declared functions and operators
//! 4. **Inheritance** - base resolution and template inheritance
//! 5. **Added functions** - functions declared only in the specification
//! 6. **Operators** - free operators rehomed into classes
//! 7. **Special members** - synthesized default and copy constructors
//! 8. **Capabilities** - abstract/polymorphic/clonable/hashable/... flags
//! 9. **Ordering** - dependency-respecting class order
//! 10. **Validation** - specification entries without declarations
//!
//! Per-declaration failures are recorded in [`Diagnostics`] and drop only that
//! declaration. Only an added function that cannot be built is fatal.

mod inheritance;
mod members;
mod operators;
mod ordering;
mod resolve;
mod traverse;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::base::{ClassId, FunctionId};
use crate::config::BuilderOptions;
use crate::decl::{ClassDecl, Item, TranslationUnit, TypeSpec};
use crate::diagnostics::Diagnostics;
use crate::error::BuildError;
use crate::model::MetaModel;
use crate::registry::TypeRegistry;
use crate::typesystem::{BindingSpec, FunctionModification};

/// Bound on typedef chains followed during type resolution.
const MAX_TYPEDEF_DEPTH: usize = 32;

/// Result of a successful build.
#[derive(Clone, Debug)]
pub struct BuildOutput {
    pub model: MetaModel,
    pub diagnostics: Diagnostics,
}

/// Items awaiting the member pass, with the scope they were declared in.
#[derive(Clone, Debug)]
struct MemberScope<'a> {
    owner: Option<ClassId>,
    scope: String,
    items: &'a [Item],
}

/// Builds a metamodel from declarations. The registry is extended with
/// synthesized entries as types are resolved.
pub struct MetaBuilder<'a> {
    registry: &'a mut TypeRegistry,
    spec: &'a BindingSpec,
    options: &'a BuilderOptions,
    model: MetaModel,
    diagnostics: Diagnostics,
    /// Typedefs declared in the unit: qualified name -> target.
    typedefs: FxHashMap<String, TypeSpec>,
    class_decls: Vec<(ClassId, &'a ClassDecl)>,
    member_scopes: Vec<MemberScope<'a>>,
    /// Free functions awaiting their pass: (declaring scope, declaration).
    free_functions: Vec<(String, &'a crate::decl::FunctionDecl)>,
    /// Free operators built as global functions, awaiting rehoming.
    operators: Vec<FunctionId>,
    /// Classes whose inheritance has been set up.
    inheritance_done: FxHashSet<ClassId>,
    inheritance_in_progress: FxHashSet<ClassId>,
    global_modifications: Vec<FunctionModification>,
}

impl<'a> MetaBuilder<'a> {
    pub fn new(
        registry: &'a mut TypeRegistry,
        spec: &'a BindingSpec,
        options: &'a BuilderOptions,
    ) -> Self {
        Self {
            registry,
            spec,
            options,
            model: MetaModel::new(),
            diagnostics: Diagnostics::new(),
            typedefs: FxHashMap::default(),
            class_decls: Vec::new(),
            member_scopes: Vec::new(),
            free_functions: Vec::new(),
            operators: Vec::new(),
            inheritance_done: FxHashSet::default(),
            inheritance_in_progress: FxHashSet::default(),
            global_modifications: Vec::new(),
        }
    }

    /// Run every pass over `unit`.
    pub fn build(mut self, unit: &'a TranslationUnit) -> Result<BuildOutput, BuildError> {
        self.global_modifications =
            crate::registry::normalize_global_modifications(&self.spec.global_modifications)?;

        self.traverse_items(&unit.items, "", None);
        tracing::debug!(
            "[BUILD] types: {} classes, {} enums",
            self.model.class_count(),
            self.model.enums().len()
        );

        self.traverse_members();
        self.traverse_free_functions();
        self.setup_inheritance();
        self.add_specified_functions()?;
        if self.options.rehome_operators {
            self.rehome_operators();
        }
        self.add_special_members();
        self.compute_capabilities();
        self.order_classes();
        self.validate();

        tracing::info!(
            "[BUILD] {} classes, {} functions, {} enums, {} diagnostics",
            self.model.class_count(),
            self.model.functions().len(),
            self.model.enums().len(),
            self.diagnostics.len()
        );
        Ok(BuildOutput {
            model: self.model,
            diagnostics: self.diagnostics,
        })
    }

    /// Qualified name of a class's enclosing scope, or `""`.
    fn enclosing_scope(&self, class: ClassId) -> String {
        crate::base::parent_scope(&self.model.class(class).name)
            .unwrap_or("")
            .to_string()
    }

    /// Class built for a type entry, if any.
    fn class_for_entry(&self, entry: crate::base::TypeEntryId) -> Option<ClassId> {
        self.model.class_by_entry(entry)
    }
}

#[cfg(test)]
mod tests;
