//! Error types for code generation

use schemac_core::SchemaError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for generation operations
pub type GenerateResult<T> = Result<T, GenerateError>;

/// Errors that abort generation of a module
#[derive(Error, Debug)]
pub enum GenerateError {
    /// The schema is defective
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// A name reached during emission is neither a built-in nor a definition
    #[error("cannot emit unknown type '{0}'")]
    UnknownType(String),

    /// The configuration file could not be read
    #[error("failed to read config {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for [`crate::GeneratorConfig`]
    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),
}
