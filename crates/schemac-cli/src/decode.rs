//! The `decode` command: run a document through the reference codec

use crate::generate::configured_loader;
use anyhow::{Context, Result, bail};
use schemac_core::{Codec, Registry};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Decode command implementation
pub fn run(
    schema: &Path,
    type_name: &str,
    input: Option<&Path>,
    include: &[PathBuf],
    config: Option<&Path>,
) -> Result<()> {
    let loaded = configured_loader(include, config)?
        .load(schema)
        .with_context(|| format!("Failed to load schema: {}", schema.display()))?;

    let text = match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read input: {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
    };

    println!("{}", round_trip(&loaded.registry, type_name, &text)?);
    Ok(())
}

/// Decode `text` as `type_name`, re-encode it and render the canonical JSON.
pub fn round_trip(registry: &Registry, type_name: &str, text: &str) -> Result<String> {
    let json: serde_json::Value = serde_json::from_str(text).context("Input is not valid JSON")?;
    let codec = Codec::new(registry);

    let value = codec
        .decode(type_name, &json)
        .with_context(|| format!("Failed to decode input as {type_name}"))?;
    tracing::debug!(type_name, kind = value.kind_name(), "decoded");

    let Some(encoded) = codec
        .encode(type_name, &value)
        .with_context(|| format!("Failed to encode {type_name}"))?
    else {
        bail!("{type_name} encoded to an absent value");
    };
    serde_json::to_string_pretty(&encoded).context("Failed to render JSON")
}
