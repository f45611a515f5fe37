//! End-to-end build: registry population, metamodel, overload groups.

use indexmap::IndexMap;

use crate::base::ClassId;
use crate::builder::{BuildOutput, MetaBuilder};
use crate::config::{BuilderOptions, PrecedenceRules};
use crate::decl::TranslationUnit;
use crate::diagnostics::Diagnostics;
use crate::error::BuildError;
use crate::model::MetaModel;
use crate::overload::{OverloadGroup, OverloadResolver};
use crate::registry::TypeRegistry;
use crate::typesystem::BindingSpec;

/// The frozen result of a build, handed to an emitter.
#[derive(Clone, Debug)]
pub struct BindingModel {
    pub registry: TypeRegistry,
    pub model: MetaModel,
    pub diagnostics: Diagnostics,
    /// Overload groups per class, in class emission order.
    pub class_overloads: IndexMap<ClassId, Vec<OverloadGroup>>,
    pub global_overloads: Vec<OverloadGroup>,
    precedence: PrecedenceRules,
}

impl BindingModel {
    /// Overload groups of the class with the given qualified name.
    pub fn overloads_of(&self, class: &str) -> &[OverloadGroup] {
        self.model
            .find_class(class)
            .and_then(|id| self.class_overloads.get(&id))
            .map_or(&[], Vec::as_slice)
    }

    pub fn overload(&self, class: &str, name: &str) -> Option<&OverloadGroup> {
        self.overloads_of(class).iter().find(|g| &*g.name == name)
    }

    pub fn global_overload(&self, name: &str) -> Option<&OverloadGroup> {
        self.global_overloads.iter().find(|g| &*g.name == name)
    }

    /// Resolver over this model, for call selection queries.
    pub fn resolver(&self) -> OverloadResolver<'_> {
        OverloadResolver::new(&self.model, &self.registry, &self.precedence)
    }
}

/// Build a binding model from declarations and a specification.
///
/// Per-declaration problems end up in [`BindingModel::diagnostics`]; only an
/// invalid specification or an unbuildable added function is an error.
pub fn build_binding_model(
    unit: &TranslationUnit,
    spec: &BindingSpec,
    options: &BuilderOptions,
) -> Result<BindingModel, BuildError> {
    let mut registry = TypeRegistry::from_spec(spec)?.with_api_version(options.api_version);
    let BuildOutput {
        model,
        mut diagnostics,
    } = MetaBuilder::new(&mut registry, spec, options).build(unit)?;

    let resolver = OverloadResolver::new(&model, &registry, &options.precedence);
    let mut class_overloads = IndexMap::new();
    for class in model.ordered_classes() {
        class_overloads.insert(class.id, resolver.class_groups(class.id, &mut diagnostics));
    }
    let global_overloads = resolver.global_groups(&mut diagnostics);

    let group_count: usize =
        class_overloads.values().map(Vec::len).sum::<usize>() + global_overloads.len();
    tracing::info!(
        "[OVERLOAD] {} groups over {} classes",
        group_count,
        class_overloads.len()
    );

    Ok(BindingModel {
        registry,
        model,
        diagnostics,
        class_overloads,
        global_overloads,
        precedence: options.precedence.clone(),
    })
}
