//! Binding specification documents (YAML/JSON).
//!
//! ```yaml
//! primitives:
//!   - name: int
//!   - { name: qint32, aliases: int }
//! containers:
//!   - { name: QList, kind: list }
//! value-types:
//!   - name: Point
//!     include: "<point.h>"
//!     modify-functions:
//!       - { signature: "setX(int)", rename: set_x }
//! rejections:
//!   - { class: "Help.*" }
//! ```

use std::path::Path;

use serde::Deserialize;

use super::entry::{
    CodeGeneration, ContainerKind, ConversionRule, Include, TargetToNative, TypeEntry,
    TypeEntryKind,
};
use super::modifications::{
    AddedFunction, ArgumentModification, FieldModification, FunctionModification, Ownership,
};
use super::spec::{BindingSpec, RejectRule};
use super::version::ApiVersion;
use crate::decl::Access;
use crate::error::SpecError;

// ============================================================================
// DOCUMENT SHAPE
// ============================================================================

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct BindingSpecDocument {
    pub primitives: Vec<PrimitiveDoc>,
    pub containers: Vec<ContainerDoc>,
    pub smart_pointers: Vec<SmartPointerDoc>,
    pub value_types: Vec<ComplexDoc>,
    pub object_types: Vec<ComplexDoc>,
    pub namespaces: Vec<ComplexDoc>,
    pub enums: Vec<EnumDoc>,
    pub typedefs: Vec<TypedefDoc>,
    pub functions: Vec<FunctionDoc>,
    pub custom_types: Vec<CommonDoc>,
    pub rejections: Vec<RejectionDoc>,
    pub global_modifications: Vec<FunctionModificationDoc>,
    pub global_added_functions: Vec<AddedFunctionDoc>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CommonDoc {
    pub name: String,
    pub since: Option<ApiVersion>,
    pub generate: Option<GenerateDoc>,
    pub include: Option<String>,
    pub conversion_rule: Option<ConversionRuleDoc>,
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GenerateDoc {
    Enabled,
    ReferenceOnly,
    Disabled,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ConversionRuleDoc {
    pub native_to_target: Option<String>,
    pub target_to_native: Vec<TargetToNativeDoc>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct TargetToNativeDoc {
    pub source_type: String,
    pub check: Option<String>,
    pub code: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct PrimitiveDoc {
    #[serde(flatten)]
    pub common: CommonDoc,
    pub aliases: Option<String>,
    pub target_name: Option<String>,
    /// `false` hides the entry from lookups by name.
    pub preferred: Option<bool>,
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContainerKindDoc {
    List,
    Set,
    Map,
    MultiMap,
    Pair,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ContainerDoc {
    #[serde(flatten)]
    pub common: CommonDoc,
    pub kind: ContainerKindDoc,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct SmartPointerDoc {
    #[serde(flatten)]
    pub common: CommonDoc,
    pub getter: String,
    pub ref_count: Option<String>,
    pub instantiations: Vec<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ComplexDoc {
    #[serde(flatten)]
    pub common: CommonDoc,
    pub stream: bool,
    pub hash_function: Option<String>,
    pub default_constructor: Option<String>,
    pub copyable: Option<bool>,
    pub polymorphic_id_expression: Option<String>,
    pub modify_functions: Vec<FunctionModificationDoc>,
    pub modify_fields: Vec<FieldModificationDoc>,
    pub add_functions: Vec<AddedFunctionDoc>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct EnumDoc {
    #[serde(flatten)]
    pub common: CommonDoc,
    pub flags: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct TypedefDoc {
    #[serde(flatten)]
    pub common: CommonDoc,
    pub source: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct FunctionDoc {
    #[serde(flatten)]
    pub common: CommonDoc,
    pub signatures: Vec<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct RejectionDoc {
    pub class: String,
    pub member: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct FunctionModificationDoc {
    pub signature: String,
    pub rename: Option<String>,
    pub remove: bool,
    pub access: Option<Access>,
    pub arguments: Vec<ArgumentModificationDoc>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ArgumentModificationDoc {
    pub index: usize,
    pub rename: Option<String>,
    pub default: Option<String>,
    pub remove_default: bool,
    pub replace_type: Option<String>,
    pub ownership: Option<Ownership>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct FieldModificationDoc {
    pub name: String,
    pub rename: Option<String>,
    pub remove: bool,
    pub read_only: bool,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct AddedFunctionDoc {
    pub signature: String,
    pub access: Option<Access>,
    #[serde(rename = "static")]
    pub is_static: bool,
}

// ============================================================================
// LOADING
// ============================================================================

impl BindingSpecDocument {
    pub fn from_yaml_str(text: &str) -> Result<Self, SpecError> {
        serde_yaml::from_str(text).map_err(|e| SpecError::Yaml(e.to_string()))
    }

    pub fn from_json_str(text: &str) -> Result<Self, SpecError> {
        serde_json::from_str(text).map_err(|e| SpecError::Json(e.to_string()))
    }

    /// Read a document, choosing the format by extension (`.json` is JSON,
    /// anything else YAML).
    pub fn load(path: &Path) -> Result<Self, SpecError> {
        let text = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&text)
        } else {
            Self::from_yaml_str(&text)
        }
    }

    /// Convert into a [`BindingSpec`].
    pub fn into_spec(self) -> BindingSpec {
        let mut spec = BindingSpec::new();

        for doc in self.primitives {
            let mut entry = doc.common.apply(TypeEntry::primitive(doc.common.name.as_str()));
            if let Some(aliases) = doc.aliases {
                entry = entry.aliasing(aliases);
            }
            if let Some(target) = doc.target_name {
                entry = entry.with_target_name(target);
            }
            if doc.preferred == Some(false) {
                entry = entry.not_preferred();
            }
            spec.entries.push(entry);
        }
        for doc in self.containers {
            let entry = TypeEntry::container(doc.common.name.as_str(), doc.kind.into());
            spec.entries.push(doc.common.apply(entry));
        }
        for doc in self.smart_pointers {
            let mut entry = TypeEntry::smart_pointer(doc.common.name.as_str(), doc.getter);
            for pointee in doc.instantiations {
                entry = entry.accepting(pointee);
            }
            if let super::entry::EntryDetail::SmartPointer { ref_count, .. } = &mut entry.detail {
                *ref_count = doc.ref_count;
            }
            spec.entries.push(doc.common.apply(entry));
        }
        let complex = [
            (TypeEntryKind::Value, self.value_types),
            (TypeEntryKind::Object, self.object_types),
            (TypeEntryKind::Namespace, self.namespaces),
        ];
        for (kind, docs) in complex {
            for doc in docs {
                spec.entries.push(doc.into_entry(kind));
            }
        }
        for doc in self.enums {
            let mut entry = TypeEntry::enumeration(doc.common.name.as_str());
            if let Some(flags) = doc.flags {
                entry = entry.with_flags(flags);
            }
            spec.entries.push(doc.common.apply(entry));
        }
        for doc in self.typedefs {
            let entry = TypeEntry::typedef(doc.common.name.as_str(), doc.source);
            spec.entries.push(doc.common.apply(entry));
        }
        for doc in self.functions {
            let entry = TypeEntry::function(doc.common.name.as_str(), doc.signatures);
            spec.entries.push(doc.common.apply(entry));
        }
        for doc in self.custom_types {
            let entry = TypeEntry::custom(doc.name.as_str());
            spec.entries.push(doc.apply(entry));
        }

        spec.rejections = self
            .rejections
            .into_iter()
            .map(|r| RejectRule {
                class: r.class,
                member: r.member,
            })
            .collect();
        spec.global_modifications = self
            .global_modifications
            .into_iter()
            .map(FunctionModificationDoc::into_modification)
            .collect();
        spec.global_added_functions = self
            .global_added_functions
            .into_iter()
            .map(AddedFunctionDoc::into_added)
            .collect();
        spec
    }
}

impl CommonDoc {
    fn apply(&self, mut entry: TypeEntry) -> TypeEntry {
        entry.since = self.since;
        if let Some(generate) = self.generate {
            entry.codegen = match generate {
                GenerateDoc::Enabled => CodeGeneration::Enabled,
                GenerateDoc::ReferenceOnly => CodeGeneration::ReferenceOnly,
                GenerateDoc::Disabled => CodeGeneration::Disabled,
            };
        }
        entry.include = self.include.as_deref().map(parse_include);
        entry.conversion_rule = self.conversion_rule.clone().map(|rule| ConversionRule {
            native_to_target: rule.native_to_target,
            target_to_native: rule
                .target_to_native
                .into_iter()
                .map(|t| TargetToNative {
                    source_type: t.source_type,
                    check: t.check,
                    code: t.code,
                })
                .collect(),
        });
        entry
    }
}

impl ComplexDoc {
    fn into_entry(self, kind: TypeEntryKind) -> TypeEntry {
        let entry = self
            .common
            .apply(TypeEntry::new(kind, self.common.name.as_str()));
        entry.with_complex(|detail| {
            detail.stream = self.stream;
            detail.hash_function = self.hash_function;
            detail.default_constructor = self.default_constructor;
            detail.copyable = self.copyable;
            detail.polymorphic_id_expression = self.polymorphic_id_expression;
            detail.function_modifications = self
                .modify_functions
                .into_iter()
                .map(FunctionModificationDoc::into_modification)
                .collect();
            detail.field_modifications = self
                .modify_fields
                .into_iter()
                .map(|f| FieldModification {
                    name: f.name,
                    rename: f.rename,
                    remove: f.remove,
                    read_only: f.read_only,
                })
                .collect();
            detail.added_functions = self
                .add_functions
                .into_iter()
                .map(AddedFunctionDoc::into_added)
                .collect();
        })
    }
}

impl FunctionModificationDoc {
    fn into_modification(self) -> FunctionModification {
        FunctionModification {
            signature: self.signature,
            rename: self.rename,
            remove: self.remove,
            access: self.access,
            arguments: self
                .arguments
                .into_iter()
                .map(|a| ArgumentModification {
                    index: a.index,
                    rename: a.rename,
                    default_value: a.default,
                    remove_default: a.remove_default,
                    replace_type: a.replace_type,
                    ownership: a.ownership,
                })
                .collect(),
        }
    }
}

impl AddedFunctionDoc {
    fn into_added(self) -> AddedFunction {
        AddedFunction {
            signature: self.signature,
            access: self.access.unwrap_or_default(),
            is_static: self.is_static,
        }
    }
}

impl From<ContainerKindDoc> for ContainerKind {
    fn from(kind: ContainerKindDoc) -> Self {
        match kind {
            ContainerKindDoc::List => ContainerKind::List,
            ContainerKindDoc::Set => ContainerKind::Set,
            ContainerKindDoc::Map => ContainerKind::Map,
            ContainerKindDoc::MultiMap => ContainerKind::MultiMap,
            ContainerKindDoc::Pair => ContainerKind::Pair,
        }
    }
}

/// `<vector>` is a global include, `"foo.h"` a local one; bare names are global.
fn parse_include(text: &str) -> Include {
    let text = text.trim();
    if let Some(inner) = text.strip_prefix('"').and_then(|t| t.strip_suffix('"')) {
        Include::local(inner)
    } else if let Some(inner) = text.strip_prefix('<').and_then(|t| t.strip_suffix('>')) {
        Include::global(inner)
    } else {
        Include::global(text)
    }
}
