//! Field type resolution.
//!
//! Maps a [`TypeRef`] to the C storage type of the slot that holds it and to
//! the prefix of the `<prefix>_decode` / `<prefix>_encode` routines that
//! convert it.
//!
//! | Reference                 | Storage           | Prefix            |
//! |---------------------------|-------------------|-------------------|
//! | `int`                     | `int`             | `Int`             |
//! | `string`                  | `StringView`      | `StringView`      |
//! | `Range`                   | `Range`           | `Range`           |
//! | `Range`, array            | `Ranges`          | `Ranges`          |
//! | `int`, optional           | `OptionalInt`     | `OptionalInt`     |
//! | `Range`, array + optional | `OptionalRanges`  | `OptionalRanges`  |

use crate::builtin::builtin;
use crate::model::TypeRef;
use crate::registry::Registry;

/// Result of resolving a type reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedType {
    /// C type of the slot
    pub storage: String,
    /// Root of the routine names
    pub prefix: String,
}

impl ResolvedType {
    pub fn decode_fn(&self) -> String {
        format!("{}_decode", self.prefix)
    }

    pub fn encode_fn(&self) -> String {
        format!("{}_encode", self.prefix)
    }
}

/// Resolves type references against a registry.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'r> {
    registry: &'r Registry,
}

impl<'r> Resolver<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self { registry }
    }

    /// Storage type and routine prefix of `ty`.
    ///
    /// The array modifier is applied before the optional one, so a reference
    /// carrying both resolves to an optional array wrapper.
    pub fn resolve(&self, ty: &TypeRef) -> ResolvedType {
        let (mut storage, mut prefix) = match builtin(&ty.name) {
            Some(b) => (b.storage.to_string(), b.alias.to_string()),
            None => (ty.name.clone(), ty.name.clone()),
        };

        if ty.array {
            let plural = self.plural_of(&ty.name);
            storage = plural.clone();
            prefix = plural;
        }
        if ty.optional {
            let optional = format!("Optional{prefix}");
            storage = optional.clone();
            prefix = optional;
        }

        ResolvedType { storage, prefix }
    }

    /// Name of the array wrapper over the type `name`.
    pub fn plural_of(&self, name: &str) -> String {
        if let Some(b) = builtin(name) {
            return b.plural();
        }
        match self.registry.lookup(name) {
            Some(def) => def.plural(),
            None => format!("{name}s"),
        }
    }
}
