//! Declaration Model: the parsed native declaration tree.
//!
//! The native parser is an external collaborator; this module only defines
//! the shape of what it hands over. Items form a closed enum ([`Item`]) that
//! the builder dispatches on with `match`.

mod items;
mod types;

pub use items::{
    Access, ArgumentDecl, BaseSpec, ClassDecl, ClassKind, EnumDecl, EnumValueDecl, FieldDecl,
    FunctionDecl, FunctionModifiers, Item, NamespaceDecl, TranslationUnit, TypedefDecl,
    is_operator_name,
};
pub use types::{ArrayDim, ReferenceKind, TypeSpec};
