//! Error types for schema loading and the reference codec

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Result type alias for reference codec operations
pub type CodecResult<T> = Result<T, CodecError>;

/// A `type` reference naming no built-in, no known definition, or a wrapper
/// its definition does not declare.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedReference {
    /// Dotted location of the reference, e.g. `Diagnostic.relatedInformation`
    pub location: String,
    /// The name that failed to resolve
    pub name: String,
}

impl fmt::Display for UnresolvedReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> '{}'", self.location, self.name)
    }
}

/// Schema defects. Any of these aborts generation before output is written.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// I/O error while reading a schema file
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The schema document is not valid JSON or does not have the expected shape
    #[error("malformed schema document: {0}")]
    Json(#[from] serde_json::Error),

    /// A definition or field lacks a property it must carry
    #[error("'{definition}' is missing required property '{property}'")]
    MissingProperty { definition: String, property: String },

    /// Two definitions share a name
    #[error("duplicate definition '{0}'")]
    DuplicateDefinition(String),

    /// An enum declares no values
    #[error("enum '{0}' has no values")]
    EmptyEnum(String),

    /// An enum value literal does not match the enum's value kind
    #[error("enum '{definition}' value '{value}': expected a {expected} literal")]
    MixedEnumLiteral {
        definition: String,
        value: String,
        expected: String,
    },

    /// Two enum values share a wire literal
    #[error("enum '{definition}' repeats literal {literal}")]
    DuplicateEnumLiteral { definition: String, literal: String },

    /// `value_type` is neither "string" nor "int"
    #[error("enum '{definition}' has unknown value type '{value_type}'")]
    UnknownValueKind {
        definition: String,
        value_type: String,
    },

    /// A field or variant arm declares no payload, or more than one
    #[error("'{location}' must declare exactly one of 'type', 'struct' or 'variant'")]
    InvalidPayload { location: String },

    /// A variant declares no arms
    #[error("'{location}' declares an empty variant")]
    EmptyVariant { location: String },

    /// `extends` names something other than a struct
    #[error("struct '{definition}' extends '{base}', which is not a struct")]
    BaseNotStruct { definition: String, base: String },

    /// One or more `type` references could not be resolved
    #[error("unresolved type references: {}", format_references(.0))]
    UnresolvedReferences(Vec<UnresolvedReference>),

    /// The reference graph contains a cycle
    #[error("reference cycle: {}", .0.join(" -> "))]
    Cycle(Vec<String>),

    /// A schema listed in `depends` could not be found
    #[error("module '{module}' depends on '{dependency}', which was not found")]
    DependencyNotFound { module: String, dependency: String },

    /// A lookup named a definition that is not registered
    #[error("unknown definition '{0}'")]
    UnknownDefinition(String),
}

fn format_references(refs: &[UnresolvedReference]) -> String {
    refs.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Contract violations detected by the reference codec.
///
/// The generated C routines trap on the same conditions; the codec reports
/// them as values carrying the JSON path where they occurred.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CodecError {
    /// A required member is absent
    #[error("{path}: required value is missing")]
    MissingValue { path: String },

    /// The external value carries the wrong type tag
    #[error("{path}: expected {expected}, found {actual}")]
    WrongType {
        path: String,
        expected: String,
        actual: String,
    },

    /// No variant arm matches the external value
    #[error("{path}: no variant arm matches")]
    NoMatchingArm { path: String },

    /// More than one variant arm matches the external value
    #[error("{path}: variant arms {arms:?} all match")]
    AmbiguousArms { path: String, arms: Vec<usize> },

    /// A wire literal that is not declared by the enum
    #[error("{path}: '{literal}' is not a value of enum {enumeration}")]
    UnknownEnumLiteral {
        path: String,
        enumeration: String,
        literal: String,
    },

    /// A typed value that does not fit the schema type it is encoded as
    #[error("{path}: value does not fit type {expected}")]
    ValueMismatch { path: String, expected: String },

    /// A union discriminant outside the declared arms
    #[error("{path}: discriminant {tag} out of range for {arms} arms")]
    InvalidDiscriminant {
        path: String,
        tag: usize,
        arms: usize,
    },

    /// The definition was declared with `decode: false` or `encode: false`
    #[error("{routine} is disabled for {definition}")]
    RoutineDisabled {
        definition: String,
        routine: &'static str,
    },

    /// The schema itself is defective
    #[error("schema error: {0}")]
    Schema(String),
}

impl From<SchemaError> for CodecError {
    fn from(err: SchemaError) -> Self {
        CodecError::Schema(err.to_string())
    }
}

#[cfg(test)]
#[path = "error/error_tests.rs"]
mod error_tests;
