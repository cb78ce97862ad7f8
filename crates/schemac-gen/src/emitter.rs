//! Dependency-ordered emission.
//!
//! [`Emitter`] is the per-run generation context: it owns the set of
//! definitions already written and the stack of definitions whose
//! dependencies are still being written. A name on that stack that is
//! reached again closes a reference cycle.

use crate::error::{GenerateError, GenerateResult};
use crate::layout::Layout;
use crate::routines::RoutineGen;
use crate::writer::CodeWriter;
use indexmap::IndexSet;
use schemac_core::{Definition, Registry, SchemaError, builtin};

/// Writes each definition of a registry exactly once, dependencies first.
#[derive(Debug)]
pub struct Emitter<'r> {
    registry: &'r Registry,
    layout: Layout<'r>,
    routines: RoutineGen<'r>,
    emitted: IndexSet<String>,
    in_progress: Vec<String>,
    header: CodeWriter,
    source: CodeWriter,
}

impl<'r> Emitter<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self {
            registry,
            layout: Layout::new(registry),
            routines: RoutineGen::new(registry),
            emitted: IndexSet::new(),
            in_progress: Vec::new(),
            header: CodeWriter::new(),
            source: CodeWriter::new(),
        }
    }

    /// Emit every local definition: enums, then unions, then structs.
    pub fn emit_all(&mut self) -> GenerateResult<()> {
        let registry = self.registry;
        for def in registry.definitions() {
            self.emit(def.name())?;
        }
        Ok(())
    }

    /// Emit `name` and everything it references. Idempotent.
    pub fn emit(&mut self, name: &str) -> GenerateResult<()> {
        if builtin(name).is_none() && !self.registry.contains(name) {
            return Err(GenerateError::UnknownType(name.to_string()));
        }
        self.visit(name)
    }

    fn visit(&mut self, name: &str) -> GenerateResult<()> {
        if self.emitted.contains(name) || builtin(name).is_some() {
            return Ok(());
        }
        if let Some(start) = self.in_progress.iter().position(|n| n == name) {
            let mut cycle = self.in_progress[start..].to_vec();
            cycle.push(name.to_string());
            return Err(SchemaError::Cycle(cycle).into());
        }

        let registry = self.registry;
        let Some(def) = registry.lookup(name) else {
            tracing::debug!(name, "skipping unresolved reference");
            return Ok(());
        };
        if registry.is_imported(name) {
            return Ok(());
        }

        self.in_progress.push(name.to_string());
        for dep in def.references() {
            self.visit(dep)?;
        }
        self.write(def)?;
        self.in_progress.pop();
        self.emitted.insert(name.to_string());
        Ok(())
    }

    fn write(&mut self, def: &Definition) -> GenerateResult<()> {
        tracing::debug!(name = def.name(), kind = %def.kind(), "emitting definition");
        self.layout.declare(def, &mut self.header)?;
        self.routines.define(def, &mut self.source)?;
        Ok(())
    }

    /// Names written so far, in emission order.
    pub fn emitted(&self) -> impl Iterator<Item = &str> {
        self.emitted.iter().map(String::as_str)
    }

    pub fn is_emitted(&self, name: &str) -> bool {
        self.emitted.contains(name)
    }

    /// Header and source text written so far.
    pub fn finish(self) -> (String, String) {
        (self.header.into_string(), self.source.into_string())
    }
}
