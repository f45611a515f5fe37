//! Binding specification model.
//!
//! A [`BindingSpec`] states which native entities are exposed to the host
//! runtime and how: type entries for primitives, containers, smart pointers,
//! classes, enums, typedefs and free functions; rejection rules; and
//! per-member modifications and added functions. The
//! [`TypeRegistry`](crate::registry::TypeRegistry) is populated from it.

mod entry;
mod modifications;
mod pattern;
mod spec;
mod version;

#[cfg(feature = "interchange")]
mod loader;

pub use entry::{
    CodeGeneration, ComplexDetail, ContainerKind, ConversionRule, EntryDetail, Include,
    IncludeKind, TargetToNative, TypeEntry, TypeEntryKind,
};
pub use modifications::{
    AddedFunction, ArgumentModification, FieldModification, FunctionModification, Ownership,
};
pub use pattern::Pattern;
pub use spec::{BindingSpec, RejectRule};
pub use version::ApiVersion;

#[cfg(feature = "interchange")]
pub use loader::BindingSpecDocument;
