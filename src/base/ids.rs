//! Arena identifiers.
//!
//! Every entity built during a run lives in an arena owned by its container
//! (the type registry or the metamodel). Cross references are stored as one of
//! these ids and resolved by lookup, so back-references never own anything.

use std::fmt;

macro_rules! arena_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u32);

        impl $name {
            /// Create an id from an arena index.
            pub fn new(index: usize) -> Self {
                Self(index as u32)
            }

            /// The arena index of this id.
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }
    };
}

arena_id!(
    /// Index of a [`TypeEntry`](crate::typesystem::TypeEntry) inside the registry.
    TypeEntryId,
    "entry"
);

arena_id!(
    /// Index of a [`MetaClass`](crate::model::MetaClass) inside the metamodel.
    ClassId,
    "class"
);

arena_id!(
    /// Index of a [`MetaFunction`](crate::model::MetaFunction) inside the metamodel.
    FunctionId,
    "fn"
);

arena_id!(
    /// Index of a [`MetaEnum`](crate::model::MetaEnum) inside the metamodel.
    EnumId,
    "enum"
);
