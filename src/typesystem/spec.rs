//! The binding specification: which native entities are exposed and how.

use super::entry::{TypeEntry, TypeEntryKind};
use super::modifications::{AddedFunction, FunctionModification};

/// A rejection rule. With no `member`, the rule rejects whole classes whose
/// name matches `class`; with a member, it rejects matching functions,
/// fields and enums inside matching classes (`*` for any class, including
/// the global scope).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RejectRule {
    pub class: String,
    pub member: Option<String>,
}

impl RejectRule {
    pub fn class(pattern: impl Into<String>) -> Self {
        Self {
            class: pattern.into(),
            member: None,
        }
    }

    pub fn member(class: impl Into<String>, member: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            member: Some(member.into()),
        }
    }
}

/// A complete binding specification.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BindingSpec {
    pub entries: Vec<TypeEntry>,
    pub rejections: Vec<RejectRule>,
    /// Modifications of free functions.
    pub global_modifications: Vec<FunctionModification>,
    /// Free functions declared only in the specification.
    pub global_added_functions: Vec<AddedFunction>,
}

impl BindingSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, entry: TypeEntry) -> Self {
        self.entries.push(entry);
        self
    }

    /// Declare several primitives at once.
    pub fn with_primitives(mut self, names: &[&str]) -> Self {
        self.entries
            .extend(names.iter().map(|name| TypeEntry::primitive(*name)));
        self
    }

    pub fn with_rejection(mut self, rule: RejectRule) -> Self {
        self.rejections.push(rule);
        self
    }

    pub fn with_global_modification(mut self, modification: FunctionModification) -> Self {
        self.global_modifications.push(modification);
        self
    }

    pub fn with_global_added_function(mut self, function: AddedFunction) -> Self {
        self.global_added_functions.push(function);
        self
    }

    pub fn entries_of_kind(&self, kind: TypeEntryKind) -> impl Iterator<Item = &TypeEntry> {
        self.entries.iter().filter(move |e| e.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_collects_entries() {
        let spec = BindingSpec::new()
            .with_primitives(&["int", "double"])
            .with_entry(TypeEntry::value_type("Point"))
            .with_rejection(RejectRule::class("Help.*"));
        assert_eq!(spec.entries.len(), 3);
        assert_eq!(spec.entries_of_kind(TypeEntryKind::Primitive).count(), 2);
        assert_eq!(spec.rejections[0].member, None);
    }
}
