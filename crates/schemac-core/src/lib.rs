//! schemac-core - Schema model, type registry and reference codec
//!
//! This crate holds everything the C generator needs to know about a schema:
//! - [`SchemaDocument`] parses a JSON schema file into a typed [`Module`]
//! - [`Registry`] holds every definition visible to one generation run
//! - [`Resolver`] maps type references to C storage types and routine prefixes
//! - [`validate()`] rejects dangling references and reference cycles
//! - [`SchemaLoader`] ties the above together for files on disk
//! - [`Codec`] decodes and encodes JSON exactly like the generated routines

mod builtin;
mod codec;
mod error;
mod loader;
mod model;
mod registry;
mod resolve;
mod schema;
mod shape;
mod validate;
mod value;

pub use builtin::{Builtin, BuiltinKind, builtin, builtins};
pub use codec::{Codec, json_kind};
pub use error::{CodecError, CodecResult, SchemaError, SchemaResult, UnresolvedReference};
pub use loader::{LoadedSchema, SchemaLoader, module_name};
pub use model::{
    Definition, DefinitionKind, EnumDef, EnumLiteral, EnumValue, Field, Module, Payload, Routines,
    StructDef, TypeRef, UnionDef, ValueKind, VariantArm, Wrappers,
};
pub use registry::{Registry, TypeKind};
pub use resolve::{ResolvedType, Resolver};
pub use schema::SchemaDocument;
pub use shape::{Shape, c_string};
pub use validate::{
    ValidationOptions, ValidationReport, Warning, find_cycle, unresolved_references, validate,
};
pub use value::{Record, Value};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Codec, Definition, Field, Registry, Resolver, SchemaError, SchemaLoader, SchemaResult,
        TypeRef, Value,
    };
}
