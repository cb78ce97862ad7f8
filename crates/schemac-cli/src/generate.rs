//! The `generate` command

use crate::format;
use anyhow::{Context, Result};
use schemac_core::SchemaLoader;
use schemac_gen::{GeneratedModule, GeneratorConfig, generate};
use std::fs;
use std::path::{Path, PathBuf};

/// Command line options of `schemac generate`
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    pub output: Option<PathBuf>,
    pub include: Vec<PathBuf>,
    pub config: Option<PathBuf>,
    pub no_format: bool,
    pub context: Option<PathBuf>,
}

/// Generate every schema in turn. The first failing schema aborts the run.
pub fn run(schemas: &[PathBuf], options: &GenerateOptions) -> Result<()> {
    let config = effective_config(options)?;
    let out_dir = options.output.clone().unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&out_dir)
        .with_context(|| format!("Failed to create output directory: {}", out_dir.display()))?;

    for schema in schemas {
        let module = generate_module(schema, &config)?;
        let written = write_module(&module, &out_dir)?;

        if config.format.enabled {
            for path in &written {
                format::run(&config.format, path);
            }
        }

        if let Some(dir) = &options.context {
            write_context(&module, dir)?;
        }
    }

    Ok(())
}

/// Configuration file values with command line overrides applied.
pub fn effective_config(options: &GenerateOptions) -> Result<GeneratorConfig> {
    let mut config = match &options.config {
        Some(path) => GeneratorConfig::from_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => GeneratorConfig::discover(".").context("Failed to load schemac.toml")?,
    };

    config
        .schema
        .include_dirs
        .extend(options.include.iter().cloned());
    if options.no_format {
        config.format.enabled = false;
    }
    Ok(config)
}

/// Load, validate and generate one schema without touching the output directory.
pub fn generate_module(schema: &Path, config: &GeneratorConfig) -> Result<GeneratedModule> {
    let loaded = loader(&config.schema.include_dirs, config.schema.allow_external_refs)
        .load(schema)
        .with_context(|| format!("Failed to load schema: {}", schema.display()))?;

    tracing::debug!(
        schema = %schema.display(),
        warnings = loaded.report.warnings.len(),
        "schema validated"
    );

    generate(&loaded.registry, &config.output)
        .with_context(|| format!("Failed to generate code for {}", schema.display()))
}

/// Loader honoring `schemac.toml` (or `config`) plus extra include directories.
pub fn configured_loader(include: &[PathBuf], config: Option<&Path>) -> Result<SchemaLoader> {
    let options = GenerateOptions {
        include: include.to_vec(),
        config: config.map(Path::to_path_buf),
        ..GenerateOptions::default()
    };
    let config = effective_config(&options)?;
    Ok(loader(
        &config.schema.include_dirs,
        config.schema.allow_external_refs,
    ))
}

fn loader(include_dirs: &[PathBuf], allow_external_refs: bool) -> SchemaLoader {
    include_dirs
        .iter()
        .fold(SchemaLoader::new(), |loader, dir| loader.with_include_dir(dir.clone()))
        .allow_external_refs(allow_external_refs)
}

fn write_module(module: &GeneratedModule, out_dir: &Path) -> Result<Vec<PathBuf>> {
    let header = out_dir.join(module.header_file_name());
    let source = out_dir.join(module.source_file_name());

    install(&[
        (header.as_path(), module.header.as_str()),
        (source.as_path(), module.source.as_str()),
    ])?;

    tracing::info!(
        module = %module.module,
        types = module.context.types.len(),
        header = %header.display(),
        source = %source.display(),
        "generated module"
    );
    Ok(vec![header, source])
}

/// Write every file or none: each text goes to a staging file first, and
/// staged files are renamed over their targets only once all are written.
fn install(files: &[(&Path, &str)]) -> Result<()> {
    let mut staged: Vec<PathBuf> = Vec::with_capacity(files.len());
    for (target, text) in files {
        let temp = staging_path(target);
        if let Err(err) = fs::write(&temp, text) {
            staged.push(temp);
            discard(&staged);
            return Err(err).with_context(|| format!("Failed to write {}", target.display()));
        }
        staged.push(temp);
    }

    for (i, ((target, _), temp)) in files.iter().zip(&staged).enumerate() {
        if let Err(err) = fs::rename(temp, target) {
            let installed: Vec<PathBuf> = files[..i].iter().map(|(t, _)| t.to_path_buf()).collect();
            discard(&installed);
            discard(&staged[i..]);
            return Err(err).with_context(|| format!("Failed to write {}", target.display()));
        }
    }
    Ok(())
}

fn staging_path(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    target.with_file_name(format!(".{name}.tmp"))
}

fn discard(paths: &[PathBuf]) {
    for path in paths {
        if let Err(err) = fs::remove_file(path) {
            tracing::debug!(path = %path.display(), error = %err, "nothing to remove");
        }
    }
}

fn write_context(module: &GeneratedModule, dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create context directory: {}", dir.display()))?;
    let path = dir.join(format!("{}.context.json", module.module));
    let json = module
        .context
        .to_json()
        .context("Failed to serialize build context")?;
    fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::debug!(path = %path.display(), "wrote build context");
    Ok(())
}
