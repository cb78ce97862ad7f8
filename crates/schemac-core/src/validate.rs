//! Load-time validation.
//!
//! Runs once over a populated [`Registry`] before anything is emitted:
//!
//! 1. every `type` reference resolves to a built-in or a definition that
//!    declares the array/optional wrappers the reference asks for
//! 2. every `extends` entry names a struct
//! 3. the reference graph is acyclic
//! 4. variant arms are structurally distinguishable (warning only)

use crate::builtin::builtin;
use crate::error::{SchemaError, SchemaResult, UnresolvedReference};
use crate::model::{Definition, Field, Payload, TypeRef, VariantArm};
use crate::registry::{Registry, TypeKind};
use crate::resolve::Resolver;
use crate::shape::Shape;
use std::collections::HashSet;
use std::fmt;

/// Validation switches.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationOptions {
    /// Downgrade unresolved references to warnings
    pub allow_external_refs: bool,
}

/// A non-fatal finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// Two arms of one variant can match the same external value
    AmbiguousArms {
        location: String,
        first: usize,
        second: usize,
        shape: String,
    },

    /// A reference left unresolved because external references are allowed
    ExternalReference(UnresolvedReference),
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::AmbiguousArms {
                location,
                first,
                second,
                shape,
            } => write!(
                f,
                "{location}: arms {first} and {second} can both match {shape}"
            ),
            Warning::ExternalReference(r) => write!(f, "unresolved reference {r}"),
        }
    }
}

/// Outcome of a successful validation.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub warnings: Vec<Warning>,
}

/// Validate every local definition of `registry`.
pub fn validate(registry: &Registry, options: ValidationOptions) -> SchemaResult<ValidationReport> {
    let mut report = ValidationReport::default();

    let unresolved = unresolved_references(registry);
    if !unresolved.is_empty() {
        if !options.allow_external_refs {
            return Err(SchemaError::UnresolvedReferences(unresolved));
        }
        for r in unresolved {
            tracing::warn!(location = %r.location, name = %r.name, "unresolved type reference");
            report.warnings.push(Warning::ExternalReference(r));
        }
    }

    check_bases(registry)?;

    if let Some(cycle) = find_cycle(registry) {
        return Err(SchemaError::Cycle(cycle));
    }

    for def in registry.definitions() {
        if let Definition::Struct(s) = def {
            registry.flattened(s)?;
        }
    }

    for def in registry.definitions() {
        match def {
            Definition::Enum(_) => {}
            Definition::Struct(s) => {
                check_fields(registry, &s.fields, &s.name, &mut report)?;
            }
            Definition::Union(u) => {
                check_arms(registry, &u.arms, &u.name, &mut report)?;
            }
        }
    }

    for w in &report.warnings {
        if let Warning::AmbiguousArms { .. } = w {
            tracing::warn!("{w}");
        }
    }

    Ok(report)
}

/// Every reference in local definitions that names neither a built-in nor a
/// registered definition.
///
/// A reference with `array` or `optional` also needs the matching wrapper
/// declared on its definition; a missing wrapper is reported under the
/// wrapper's name, e.g. `OptionalRanges`.
pub fn unresolved_references(registry: &Registry) -> Vec<UnresolvedReference> {
    let mut out = Vec::new();
    for def in registry.definitions() {
        let name = def.name();
        match def {
            Definition::Enum(_) => {}
            Definition::Struct(s) => {
                for base in &s.extends {
                    if !registry.contains(base) {
                        out.push(UnresolvedReference {
                            location: format!("{name}.extends"),
                            name: base.clone(),
                        });
                    }
                }
                unresolved_in_fields(registry, &s.fields, name, &mut out);
            }
            Definition::Union(u) => unresolved_in_arms(registry, &u.arms, name, &mut out),
        }
    }
    out
}

fn check_type_ref(
    registry: &Registry,
    ty: &TypeRef,
    location: String,
    out: &mut Vec<UnresolvedReference>,
) {
    if builtin(&ty.name).is_some() {
        return;
    }
    let Some(def) = registry.lookup(&ty.name) else {
        out.push(UnresolvedReference {
            location,
            name: ty.name.clone(),
        });
        return;
    };

    let wrappers = def.wrappers();
    let declared = match (ty.array, ty.optional) {
        (false, false) => true,
        (true, false) => wrappers.array,
        (false, true) => wrappers.optional,
        (true, true) => wrappers.array && wrappers.optional_array,
    };
    if !declared {
        out.push(UnresolvedReference {
            location,
            name: Resolver::new(registry).resolve(ty).storage,
        });
    }
}

fn unresolved_in_fields(
    registry: &Registry,
    fields: &[Field],
    owner: &str,
    out: &mut Vec<UnresolvedReference>,
) {
    for field in fields {
        let location = format!("{owner}.{}", field.name);
        match &field.payload {
            Payload::Type(ty) => check_type_ref(registry, ty, location, out),
            Payload::InlineStruct(nested) => unresolved_in_fields(registry, nested, &location, out),
            Payload::Variant(arms) => unresolved_in_arms(registry, arms, &location, out),
        }
    }
}

fn unresolved_in_arms(
    registry: &Registry,
    arms: &[VariantArm],
    owner: &str,
    out: &mut Vec<UnresolvedReference>,
) {
    for (tag, arm) in arms.iter().enumerate() {
        let location = format!("{owner}._{tag}");
        match arm {
            VariantArm::Type(ty) => check_type_ref(registry, ty, location, out),
            VariantArm::InlineStruct(fields) => {
                unresolved_in_fields(registry, fields, &location, out)
            }
        }
    }
}

fn check_bases(registry: &Registry) -> SchemaResult<()> {
    for def in registry.definitions() {
        if let Definition::Struct(s) = def {
            for base in &s.extends {
                match registry.kind_of(base) {
                    TypeKind::Struct | TypeKind::Unknown => {}
                    _ => {
                        return Err(SchemaError::BaseNotStruct {
                            definition: s.name.clone(),
                            base: base.clone(),
                        });
                    }
                }
            }
        }
    }
    Ok(())
}

/// First cycle found in the reference graph, as a closed path.
pub fn find_cycle(registry: &Registry) -> Option<Vec<String>> {
    let mut visited = HashSet::new();
    let mut path = Vec::new();

    for def in registry.all_definitions() {
        if !visited.contains(def.name()) {
            if let Some(cycle) = dfs_cycle(registry, def, &mut visited, &mut path) {
                return Some(cycle);
            }
        }
    }
    None
}

fn dfs_cycle(
    registry: &Registry,
    def: &Definition,
    visited: &mut HashSet<String>,
    path: &mut Vec<String>,
) -> Option<Vec<String>> {
    visited.insert(def.name().to_string());
    path.push(def.name().to_string());

    for name in def.references() {
        if let Some(start) = path.iter().position(|n| n == name) {
            let mut cycle = path[start..].to_vec();
            cycle.push(name.to_string());
            return Some(cycle);
        }
        if visited.contains(name) {
            continue;
        }
        if let Some(next) = registry.lookup(name) {
            if let Some(cycle) = dfs_cycle(registry, next, visited, path) {
                return Some(cycle);
            }
        }
    }

    path.pop();
    None
}

fn check_fields(
    registry: &Registry,
    fields: &[Field],
    owner: &str,
    report: &mut ValidationReport,
) -> SchemaResult<()> {
    for field in fields {
        let location = format!("{owner}.{}", field.name);
        match &field.payload {
            Payload::Type(_) => {}
            Payload::InlineStruct(nested) => check_fields(registry, nested, &location, report)?,
            Payload::Variant(arms) => check_arms(registry, arms, &location, report)?,
        }
    }
    Ok(())
}

fn check_arms(
    registry: &Registry,
    arms: &[VariantArm],
    location: &str,
    report: &mut ValidationReport,
) -> SchemaResult<()> {
    let shapes = arms
        .iter()
        .map(|arm| Shape::of_arm(registry, arm))
        .collect::<SchemaResult<Vec<_>>>()?;

    for first in 0..shapes.len() {
        for second in first + 1..shapes.len() {
            if shapes[first].overlaps(&shapes[second]) {
                report.warnings.push(Warning::AmbiguousArms {
                    location: location.to_string(),
                    first,
                    second,
                    shape: shapes[first].witness(&shapes[second]).describe(),
                });
            }
        }
    }

    for (tag, arm) in arms.iter().enumerate() {
        if let VariantArm::InlineStruct(fields) = arm {
            check_fields(registry, fields, &format!("{location}._{tag}"), report)?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "validate/validate_tests.rs"]
mod validate_tests;
