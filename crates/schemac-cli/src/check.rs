//! The `check` command

use crate::generate::configured_loader;
use anyhow::{Context, Result};
use schemac_core::{DefinitionKind, Registry};
use std::path::{Path, PathBuf};

/// Definition counts of one module.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub enums: usize,
    pub structs: usize,
    pub variants: usize,
    pub imported: usize,
}

impl Summary {
    pub fn of(registry: &Registry) -> Self {
        let mut summary = Self::default();
        for def in registry.all_definitions() {
            if registry.is_imported(def.name()) {
                summary.imported += 1;
                continue;
            }
            match def.kind() {
                DefinitionKind::Enum => summary.enums += 1,
                DefinitionKind::Struct => summary.structs += 1,
                DefinitionKind::Union => summary.variants += 1,
            }
        }
        summary
    }
}

/// Check command implementation
pub fn run(schemas: &[PathBuf], include: &[PathBuf], config: Option<&Path>) -> Result<()> {
    let loader = configured_loader(include, config)?;
    for schema in schemas {
        let loaded = loader
            .load(schema)
            .with_context(|| format!("Invalid schema: {}", schema.display()))?;
        let summary = Summary::of(&loaded.registry);

        println!("Checking schema: {}", schema.display());
        println!("✓ Module: {}", loaded.registry.module_name());
        println!(
            "✓ Definitions: {} enums, {} structs, {} variants ({} imported)",
            summary.enums, summary.structs, summary.variants, summary.imported
        );
        for warning in &loaded.report.warnings {
            println!("⚠ {warning}");
        }
    }

    println!("\nAll schemas are valid!");
    Ok(())
}
