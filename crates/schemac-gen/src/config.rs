//! Generator configuration (`schemac.toml`)

use crate::error::{GenerateError, GenerateResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Conventional file name of the configuration file
pub const CONFIG_FILE_NAME: &str = "schemac.toml";

/// Complete generator configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub format: FormatConfig,

    #[serde(default)]
    pub schema: SchemaConfig,
}

/// Naming of the generated files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory prefix of `#include <prefix/module.h>` lines
    #[serde(default = "default_include_prefix")]
    pub include_prefix: String,

    /// Prefix of the include guard, `__<GUARD>_<MODULE>_H__`
    #[serde(default = "default_guard_prefix")]
    pub guard_prefix: String,

    /// Header providing the JSON runtime and wrapper macros
    #[serde(default = "default_base_header")]
    pub base_header: String,

    /// Lines of the comment block opening both files
    #[serde(default = "default_banner")]
    pub banner: Vec<String>,
}

/// External source formatter run on the written files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_format_command")]
    pub command: String,

    #[serde(default = "default_format_args")]
    pub args: Vec<String>,
}

/// Schema loading options
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaConfig {
    /// Directories searched for `depends` schemas
    #[serde(default)]
    pub include_dirs: Vec<PathBuf>,

    /// Downgrade unresolved references to warnings
    #[serde(default)]
    pub allow_external_refs: bool,
}

fn default_include_prefix() -> String {
    "lsp".to_string()
}

fn default_guard_prefix() -> String {
    "LSP".to_string()
}

fn default_base_header() -> String {
    "lsp/lsp_base.h".to_string()
}

fn default_banner() -> Vec<String> {
    vec!["THIS IS GENERATED CODE. DO NOT MODIFY.".to_string()]
}

fn default_true() -> bool {
    true
}

fn default_format_command() -> String {
    "clang-format".to_string()
}

fn default_format_args() -> Vec<String> {
    vec!["-i".to_string()]
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            include_prefix: default_include_prefix(),
            guard_prefix: default_guard_prefix(),
            base_header: default_base_header(),
            banner: default_banner(),
        }
    }
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            command: default_format_command(),
            args: default_format_args(),
        }
    }
}

impl GeneratorConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> GenerateResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| GenerateError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_str(content: &str) -> GenerateResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load `schemac.toml` from `dir` if present, defaults otherwise
    pub fn discover(dir: impl AsRef<Path>) -> GenerateResult<Self> {
        let candidate = dir.as_ref().join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            tracing::debug!(path = %candidate.display(), "loading config");
            Self::from_file(candidate)
        } else {
            Ok(Self::default())
        }
    }
}
