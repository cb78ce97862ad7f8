//! schemac-gen - C code generation for schemac schemas
//!
//! Turns a validated [`schemac_core::Registry`] into a `<module>.h` /
//! `<module>.c` pair:
//! - [`Layout`] writes typedefs, wrapper declarations and prototypes
//! - [`RoutineGen`] writes the `_decode` / `_encode` bodies
//! - [`Emitter`] visits definitions in dependency order, each exactly once
//! - [`generate()`] adds the banner, include guard and includes
//!
//! # Example
//!
//! ```ignore
//! use schemac_core::SchemaLoader;
//! use schemac_gen::{GeneratorConfig, generate};
//!
//! let loaded = SchemaLoader::new().load("schema/general.json".as_ref())?;
//! let module = generate(&loaded.registry, &GeneratorConfig::default().output)?;
//! std::fs::write(module.header_file_name(), &module.header)?;
//! ```

mod assemble;
mod config;
mod context;
mod emitter;
mod error;
mod layout;
mod routines;
mod writer;

pub use assemble::{GeneratedModule, generate, include_guard};
pub use config::{CONFIG_FILE_NAME, FormatConfig, GeneratorConfig, OutputConfig, SchemaConfig};
pub use context::{BuildContext, ContextType};
pub use emitter::Emitter;
pub use error::{GenerateError, GenerateResult};
pub use layout::Layout;
pub use routines::RoutineGen;
pub use writer::CodeWriter;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{GenerateError, GenerateResult, GeneratedModule, GeneratorConfig, generate};
}
