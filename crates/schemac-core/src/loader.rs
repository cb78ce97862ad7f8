//! Schema file loading.
//!
//! Reads a schema document from disk, imports the definitions of every
//! module it `depends` on (transitively) and validates the result.

use crate::error::{SchemaError, SchemaResult};
use crate::model::Module;
use crate::registry::Registry;
use crate::schema::SchemaDocument;
use crate::validate::{ValidationOptions, ValidationReport, validate};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// A validated registry ready for generation.
#[derive(Debug)]
pub struct LoadedSchema {
    pub registry: Registry,
    pub report: ValidationReport,
}

/// Loads schema files and their dependencies.
#[derive(Debug, Clone, Default)]
pub struct SchemaLoader {
    include_dirs: Vec<PathBuf>,
    allow_external_refs: bool,
}

impl SchemaLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a directory searched for dependency schemas.
    pub fn with_include_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.include_dirs.push(dir.into());
        self
    }

    /// Tolerate dangling references and missing dependency schemas.
    pub fn allow_external_refs(mut self, allow: bool) -> Self {
        self.allow_external_refs = allow;
        self
    }

    /// Load the schema at `path`. The module is named after the file stem.
    pub fn load(&self, path: &Path) -> SchemaResult<LoadedSchema> {
        let name = module_name(path);
        let module = read_module(path, &name)?;
        self.finish(module, path.parent())
    }

    /// Load a schema document held in memory.
    ///
    /// Dependencies are searched in the include directories only.
    pub fn load_str(&self, name: &str, text: &str) -> SchemaResult<LoadedSchema> {
        let module = SchemaDocument::from_str(text)?.into_module(name)?;
        self.finish(module, None)
    }

    fn finish(&self, module: Module, base_dir: Option<&Path>) -> SchemaResult<LoadedSchema> {
        tracing::debug!(
            module = %module.name,
            enums = module.enums.len(),
            structs = module.structs.len(),
            variants = module.unions.len(),
            "schema parsed"
        );

        let name = module.name.clone();
        let depends = module.depends.clone();
        let mut registry = Registry::from_module(module)?;

        let mut seen = HashSet::from([name.clone()]);
        self.import_depends(&mut registry, &name, &depends, base_dir, &mut seen)?;

        let report = validate(
            &registry,
            ValidationOptions {
                allow_external_refs: self.allow_external_refs,
            },
        )?;
        Ok(LoadedSchema { registry, report })
    }

    fn import_depends(
        &self,
        registry: &mut Registry,
        owner: &str,
        depends: &[String],
        base_dir: Option<&Path>,
        seen: &mut HashSet<String>,
    ) -> SchemaResult<()> {
        for dep in depends {
            if !seen.insert(dep.clone()) {
                continue;
            }

            let Some(path) = self.find_dependency(dep, base_dir) else {
                if self.allow_external_refs {
                    tracing::warn!(module = owner, dependency = %dep, "dependency schema not found");
                    continue;
                }
                return Err(SchemaError::DependencyNotFound {
                    module: owner.to_string(),
                    dependency: dep.clone(),
                });
            };

            let module = read_module(&path, dep)?;
            let nested = module.depends.clone();
            registry.import_module(module)?;
            self.import_depends(registry, dep, &nested, path.parent(), seen)?;
        }
        Ok(())
    }

    fn find_dependency(&self, dep: &str, base_dir: Option<&Path>) -> Option<PathBuf> {
        let file = format!("{dep}.json");
        base_dir
            .into_iter()
            .chain(self.include_dirs.iter().map(PathBuf::as_path))
            .map(|dir| dir.join(&file))
            .find(|candidate| candidate.is_file())
    }
}

/// Module name derived from a schema path: its file stem.
pub fn module_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn read_module(path: &Path, name: &str) -> SchemaResult<Module> {
    let text = std::fs::read_to_string(path).map_err(|source| SchemaError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    SchemaDocument::from_str(&text)?.into_module(name)
}
