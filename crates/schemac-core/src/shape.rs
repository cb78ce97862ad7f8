//! Structural shapes of external values.
//!
//! Variant decoding selects an arm by comparing the runtime type tag of the
//! external value against each arm's [`Shape`]. The same shape renders the C
//! match condition, tests a `serde_json::Value` in the reference codec and
//! decides whether two arms can be confused.

use crate::builtin::{BuiltinKind, builtin};
use crate::error::{SchemaError, SchemaResult};
use crate::model::{Definition, Field, TypeRef, ValueKind, VariantArm};
use crate::registry::Registry;

/// A predicate over external values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    Any,
    Bool,
    Int,
    String,
    Null,
    /// An object with no members
    EmptyObject,
    Array,
    /// An object carrying at least the listed members
    Object { required: Vec<String> },
    OneOf(Vec<Shape>),
}

impl Shape {
    /// Shape of values of the referenced type.
    ///
    /// The `optional` modifier is ignored: inside a variant an arm is only
    /// considered when a value is present.
    pub fn of_type(registry: &Registry, ty: &TypeRef) -> SchemaResult<Shape> {
        let mut visiting = Vec::new();
        shape_of_type(registry, ty, &mut visiting)
    }

    /// Shape of one variant arm.
    pub fn of_arm(registry: &Registry, arm: &VariantArm) -> SchemaResult<Shape> {
        match arm {
            VariantArm::Type(ty) => Shape::of_type(registry, ty),
            VariantArm::InlineStruct(fields) => Ok(Shape::of_fields(fields)),
        }
    }

    /// Object shape requiring every non-optional field.
    pub fn of_fields(fields: &[Field]) -> Shape {
        Shape::Object {
            required: fields
                .iter()
                .filter(|f| !f.optional)
                .map(|f| f.name.clone())
                .collect(),
        }
    }

    /// Whether `value` has this shape.
    pub fn matches(&self, value: &serde_json::Value) -> bool {
        use serde_json::Value as J;
        match (self, value) {
            (Shape::Any, _) => true,
            (Shape::Bool, J::Bool(_)) => true,
            (Shape::Int, J::Number(n)) => n.is_i64() || n.is_u64(),
            (Shape::String, J::String(_)) => true,
            (Shape::Null, J::Null) => true,
            (Shape::EmptyObject, J::Object(map)) => map.is_empty(),
            (Shape::Array, J::Array(_)) => true,
            (Shape::Object { required }, J::Object(map)) => {
                required.iter().all(|name| map.contains_key(name))
            }
            (Shape::OneOf(shapes), v) => shapes.iter().any(|s| s.matches(v)),
            _ => false,
        }
    }

    /// Whether some external value matches both shapes.
    ///
    /// Object shapes only demand members, never forbid them, so any two of
    /// them overlap: an object carrying both member sets matches each.
    pub fn overlaps(&self, other: &Shape) -> bool {
        match (self, other) {
            (Shape::Any, _) | (_, Shape::Any) => true,
            (Shape::OneOf(shapes), o) => shapes.iter().any(|s| s.overlaps(o)),
            (s, Shape::OneOf(shapes)) => shapes.iter().any(|o| s.overlaps(o)),
            (Shape::Object { .. }, Shape::Object { .. }) => true,
            (Shape::EmptyObject, Shape::Object { required })
            | (Shape::Object { required }, Shape::EmptyObject) => required.is_empty(),
            (a, b) => a == b,
        }
    }

    /// A shape of values matching both `self` and `other`, for diagnostics.
    ///
    /// Two object shapes combine their required members; otherwise `other`
    /// is returned unchanged.
    pub fn witness(&self, other: &Shape) -> Shape {
        match (self, other) {
            (Shape::Object { required: a }, Shape::Object { required: b }) => {
                let mut required = a.clone();
                required.extend(b.iter().filter(|n| !a.contains(n)).cloned());
                Shape::Object { required }
            }
            _ => other.clone(),
        }
    }

    /// C expression testing the `OptionalJSONValue` named `var`.
    pub fn c_condition(&self, var: &str) -> String {
        match self {
            Shape::Any => "true".to_string(),
            Shape::Bool => format!("{var}.value.type == JSON_TYPE_BOOLEAN"),
            Shape::Int => format!("{var}.value.type == JSON_TYPE_INT"),
            Shape::String => format!("{var}.value.type == JSON_TYPE_STRING"),
            Shape::Null => format!("{var}.value.type == JSON_TYPE_NULL"),
            Shape::Array => format!("{var}.value.type == JSON_TYPE_ARRAY"),
            Shape::EmptyObject => format!(
                "({var}.value.type == JSON_TYPE_OBJECT && {var}.value.object.size == 0)"
            ),
            Shape::Object { required } => {
                let mut cond = format!("{var}.value.type == JSON_TYPE_OBJECT");
                for name in required {
                    cond.push_str(&format!(" && json_has(&{var}.value, {})", c_string(name)));
                }
                format!("({cond})")
            }
            Shape::OneOf(shapes) => {
                let parts: Vec<String> = shapes.iter().map(|s| s.c_condition(var)).collect();
                format!("({})", parts.join(" || "))
            }
        }
    }

    /// Short human-readable description, used in diagnostics.
    pub fn describe(&self) -> String {
        match self {
            Shape::Any => "any value".to_string(),
            Shape::Bool => "boolean".to_string(),
            Shape::Int => "integer".to_string(),
            Shape::String => "string".to_string(),
            Shape::Null => "null".to_string(),
            Shape::EmptyObject => "empty object".to_string(),
            Shape::Array => "array".to_string(),
            Shape::Object { required } if required.is_empty() => "object".to_string(),
            Shape::Object { required } => format!("object with {}", required.join(", ")),
            Shape::OneOf(shapes) => shapes
                .iter()
                .map(Shape::describe)
                .collect::<Vec<_>>()
                .join(" or "),
        }
    }
}

fn shape_of_type(
    registry: &Registry,
    ty: &TypeRef,
    visiting: &mut Vec<String>,
) -> SchemaResult<Shape> {
    if ty.array {
        return Ok(Shape::Array);
    }
    if let Some(b) = builtin(&ty.name) {
        return Ok(match b.kind {
            BuiltinKind::String => Shape::String,
            BuiltinKind::Bool => Shape::Bool,
            BuiltinKind::Int | BuiltinKind::UInt => Shape::Int,
            BuiltinKind::Null => Shape::Null,
            BuiltinKind::Empty => Shape::EmptyObject,
            BuiltinKind::Any => Shape::Any,
            BuiltinKind::BoolOrNull => Shape::OneOf(vec![Shape::Bool, Shape::Null]),
            BuiltinKind::BoolOrEmpty => Shape::OneOf(vec![Shape::Bool, Shape::EmptyObject]),
            BuiltinKind::IntOrNull => Shape::OneOf(vec![Shape::Int, Shape::Null]),
        });
    }

    match registry.lookup(&ty.name) {
        Some(Definition::Enum(e)) => Ok(match e.kind {
            ValueKind::String => Shape::String,
            ValueKind::Int => Shape::Int,
        }),
        Some(Definition::Struct(s)) => Ok(Shape::of_fields(registry.flattened(s)?)),
        Some(Definition::Union(u)) => {
            if visiting.contains(&u.name) {
                let mut cycle = visiting.clone();
                cycle.push(u.name.clone());
                return Err(SchemaError::Cycle(cycle));
            }
            visiting.push(u.name.clone());
            let mut shapes = Vec::with_capacity(u.arms.len());
            for arm in &u.arms {
                shapes.push(match arm {
                    VariantArm::Type(t) => shape_of_type(registry, t, visiting)?,
                    VariantArm::InlineStruct(fields) => Shape::of_fields(fields),
                });
            }
            visiting.pop();
            Ok(Shape::OneOf(shapes))
        }
        // Unresolved names are rejected by validation; treat as an opaque object.
        None => Ok(Shape::Object {
            required: Vec::new(),
        }),
    }
}


/// Render `text` as a C string literal, quotes included.
pub fn c_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_ascii_control() => out.push_str(&format!("\\{:03o}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
#[path = "shape/shape_tests.rs"]
mod shape_tests;
