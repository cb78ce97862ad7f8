//! Reference codec.
//!
//! Interprets the schema the way the generated `<T>_decode` / `<T>_encode`
//! routines do, over `serde_json::Value`. Conditions on which the C routines
//! trap (`assert`, `UNREACHABLE()`) are reported as [`CodecError`] values
//! carrying the JSON path where they occurred.
//!
//! Encoding returns `None` for an absent optional; struct encoding omits such
//! members instead of writing `null`.

use crate::builtin::{BuiltinKind, builtin};
use crate::error::{CodecError, CodecResult, SchemaError};
use crate::model::{Definition, EnumDef, EnumLiteral, Field, Payload, TypeRef, ValueKind, VariantArm};
use crate::registry::Registry;
use crate::shape::Shape;
use crate::value::{Record, Value};
use serde_json::{Map, Value as J};

/// Decoder/encoder bound to a registry.
#[derive(Debug, Clone, Copy)]
pub struct Codec<'r> {
    registry: &'r Registry,
}

impl<'r> Codec<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self { registry }
    }

    /// Decode `json` as an instance of the type named `type_name`.
    pub fn decode(&self, type_name: &str, json: &J) -> CodecResult<Value> {
        self.decode_ref(&TypeRef::named(type_name), Some(json), "$")
    }

    /// Encode `value` as an instance of the type named `type_name`.
    pub fn encode(&self, type_name: &str, value: &Value) -> CodecResult<Option<J>> {
        self.encode_ref(&TypeRef::named(type_name), value, "$")
    }

    /// Decode through a full type reference; `None` models an absent member.
    pub fn decode_ref(&self, ty: &TypeRef, json: Option<&J>, path: &str) -> CodecResult<Value> {
        if ty.optional {
            return match json {
                None => Ok(Value::none()),
                Some(j) => Ok(Value::some(self.decode_ref(&ty.required(), Some(j), path)?)),
            };
        }

        let json = json.ok_or_else(|| CodecError::MissingValue {
            path: path.to_string(),
        })?;

        if ty.array {
            let J::Array(items) = json else {
                return Err(wrong_type(path, "array", json));
            };
            let element = TypeRef::named(&ty.name);
            return items
                .iter()
                .enumerate()
                .map(|(ix, item)| self.decode_ref(&element, Some(item), &format!("{path}[{ix}]")))
                .collect::<CodecResult<Vec<_>>>()
                .map(Value::Array);
        }

        if let Some(b) = builtin(&ty.name) {
            return decode_builtin(b.kind, json, path);
        }

        match self.registry.lookup(&ty.name) {
            Some(def) => self.decode_definition(def, json, path),
            None => Err(SchemaError::UnknownDefinition(ty.name.clone()).into()),
        }
    }

    /// Encode through a full type reference.
    pub fn encode_ref(&self, ty: &TypeRef, value: &Value, path: &str) -> CodecResult<Option<J>> {
        if ty.optional {
            return match value {
                Value::Optional(None) => Ok(None),
                Value::Optional(Some(inner)) => self.encode_ref(&ty.required(), inner, path),
                _ => Err(mismatch(path, &format!("optional {}", ty.name))),
            };
        }

        if ty.array {
            let Value::Array(items) = value else {
                return Err(mismatch(path, &format!("{}[]", ty.name)));
            };
            let element = TypeRef::named(&ty.name);
            let mut out = Vec::with_capacity(items.len());
            for (ix, item) in items.iter().enumerate() {
                let encoded = self.encode_ref(&element, item, &format!("{path}[{ix}]"))?;
                out.push(encoded.unwrap_or(J::Null));
            }
            return Ok(Some(J::Array(out)));
        }

        if let Some(b) = builtin(&ty.name) {
            return encode_builtin(b.kind, b.name, value, path).map(Some);
        }

        match self.registry.lookup(&ty.name) {
            Some(def) => self.encode_definition(def, value, path).map(Some),
            None => Err(SchemaError::UnknownDefinition(ty.name.clone()).into()),
        }
    }

    /// Value name of the enum value whose wire literal is `literal`.
    pub fn parse_enum(&self, enum_name: &str, literal: &str) -> CodecResult<String> {
        let def = self.enum_def(enum_name)?;
        let parsed = match def.kind {
            ValueKind::String => Some(EnumLiteral::String(literal.to_string())),
            ValueKind::Int => literal.parse().ok().map(EnumLiteral::Int),
        };
        parsed
            .and_then(|l| def.by_literal(&l))
            .map(|v| v.name.clone())
            .ok_or_else(|| CodecError::UnknownEnumLiteral {
                path: "$".to_string(),
                enumeration: enum_name.to_string(),
                literal: literal.to_string(),
            })
    }

    /// Wire literal of the enum value named `value_name`, as text.
    pub fn enum_to_string(&self, enum_name: &str, value_name: &str) -> CodecResult<String> {
        let def = self.enum_def(enum_name)?;
        let value = def
            .by_name(value_name)
            .ok_or_else(|| CodecError::UnknownEnumLiteral {
                path: "$".to_string(),
                enumeration: enum_name.to_string(),
                literal: value_name.to_string(),
            })?;
        Ok(match &value.literal {
            EnumLiteral::String(s) => s.clone(),
            EnumLiteral::Int(i) => i.to_string(),
        })
    }

    fn enum_def(&self, name: &str) -> CodecResult<&'r EnumDef> {
        match self.registry.lookup(name) {
            Some(Definition::Enum(e)) => Ok(e),
            _ => Err(SchemaError::UnknownDefinition(name.to_string()).into()),
        }
    }

    fn decode_definition(&self, def: &Definition, json: &J, path: &str) -> CodecResult<Value> {
        if !def.routines().decode {
            return Err(CodecError::RoutineDisabled {
                definition: def.name().to_string(),
                routine: "decode",
            });
        }

        match def {
            Definition::Enum(e) => {
                let literal = match (e.kind, json) {
                    (ValueKind::String, J::String(s)) => EnumLiteral::String(s.clone()),
                    (ValueKind::Int, J::Number(n)) => match n.as_i64() {
                        Some(i) => EnumLiteral::Int(i),
                        None => return Err(wrong_type(path, "int", json)),
                    },
                    (ValueKind::String, _) => return Err(wrong_type(path, "string", json)),
                    (ValueKind::Int, _) => return Err(wrong_type(path, "int", json)),
                };
                let value = e.by_literal(&literal).ok_or_else(|| CodecError::UnknownEnumLiteral {
                    path: path.to_string(),
                    enumeration: e.name.clone(),
                    literal: literal.to_string(),
                })?;
                Ok(Value::enumeration(&e.name, &value.name))
            }
            Definition::Struct(s) => {
                let fields = self.registry.flattened(s)?;
                let J::Object(map) = json else {
                    return Err(wrong_type(path, "object", json));
                };
                self.decode_fields(fields, map, path).map(Value::Record)
            }
            Definition::Union(u) => self.decode_arms(&u.arms, json, path),
        }
    }

    fn decode_fields(&self, fields: &[Field], map: &Map<String, J>, path: &str) -> CodecResult<Record> {
        let mut record = Record::new();
        for field in fields {
            let member_path = format!("{path}.{}", field.name);
            let value = self.decode_field(field, map.get(&field.name), &member_path)?;
            record.insert(&field.name, value);
        }
        Ok(record)
    }

    fn decode_field(&self, field: &Field, member: Option<&J>, path: &str) -> CodecResult<Value> {
        match &field.payload {
            Payload::Type(ty) => self.decode_ref(ty, member, path),
            Payload::InlineStruct(nested) => decode_present(field.optional, member, path, |json| {
                let J::Object(map) = json else {
                    return Err(wrong_type(path, "object", json));
                };
                self.decode_fields(nested, map, path).map(Value::Record)
            }),
            Payload::Variant(arms) => decode_present(field.optional, member, path, |json| {
                self.decode_arms(arms, json, path)
            }),
        }
    }

    /// Select the single arm whose shape matches `json` and decode it.
    fn decode_arms(&self, arms: &[VariantArm], json: &J, path: &str) -> CodecResult<Value> {
        let mut matched = Vec::new();
        for (tag, arm) in arms.iter().enumerate() {
            if Shape::of_arm(self.registry, arm)?.matches(json) {
                matched.push(tag);
            }
        }

        let tag = match matched.as_slice() {
            [] => {
                return Err(CodecError::NoMatchingArm {
                    path: path.to_string(),
                });
            }
            [tag] => *tag,
            _ => {
                return Err(CodecError::AmbiguousArms {
                    path: path.to_string(),
                    arms: matched,
                });
            }
        };

        let payload = match &arms[tag] {
            VariantArm::Type(ty) => self.decode_ref(ty, Some(json), path)?,
            VariantArm::InlineStruct(fields) => {
                let J::Object(map) = json else {
                    return Err(wrong_type(path, "object", json));
                };
                Value::Record(self.decode_fields(fields, map, path)?)
            }
        };
        Ok(Value::union(tag, payload))
    }

    fn encode_definition(&self, def: &Definition, value: &Value, path: &str) -> CodecResult<J> {
        if !def.routines().encode {
            return Err(CodecError::RoutineDisabled {
                definition: def.name().to_string(),
                routine: "encode",
            });
        }

        match def {
            Definition::Enum(e) => {
                let Value::Enum { type_name, value } = value else {
                    return Err(mismatch(path, &e.name));
                };
                if type_name != &e.name {
                    return Err(mismatch(path, &e.name));
                }
                let entry = e.by_name(value).ok_or_else(|| CodecError::UnknownEnumLiteral {
                    path: path.to_string(),
                    enumeration: e.name.clone(),
                    literal: value.clone(),
                })?;
                Ok(match &entry.literal {
                    EnumLiteral::String(s) => J::String(s.clone()),
                    EnumLiteral::Int(i) => J::from(*i),
                })
            }
            Definition::Struct(s) => {
                let Value::Record(record) = value else {
                    return Err(mismatch(path, &s.name));
                };
                let fields = self.registry.flattened(s)?;
                self.encode_fields(fields, record, path).map(J::Object)
            }
            Definition::Union(u) => self.encode_arms(&u.arms, value, path, &u.name),
        }
    }

    fn encode_fields(&self, fields: &[Field], record: &Record, path: &str) -> CodecResult<Map<String, J>> {
        let mut map = Map::new();
        for field in fields {
            let member_path = format!("{path}.{}", field.name);
            if let Some(json) = self.encode_field(field, record.get(&field.name), &member_path)? {
                map.insert(field.name.clone(), json);
            }
        }
        Ok(map)
    }

    fn encode_field(&self, field: &Field, value: Option<&Value>, path: &str) -> CodecResult<Option<J>> {
        let value = match (value, field.optional) {
            (None | Some(Value::Optional(None)), true) => return Ok(None),
            (None, false) => {
                return Err(CodecError::MissingValue {
                    path: path.to_string(),
                });
            }
            (Some(v), _) => v,
        };

        match &field.payload {
            Payload::Type(ty) => self.encode_ref(ty, value, path),
            Payload::InlineStruct(nested) => {
                let inner = present(value, field.optional, path)?;
                let Value::Record(record) = inner else {
                    return Err(mismatch(path, "inline struct"));
                };
                self.encode_fields(nested, record, path)
                    .map(|map| Some(J::Object(map)))
            }
            Payload::Variant(arms) => {
                let inner = present(value, field.optional, path)?;
                self.encode_arms(arms, inner, path, "inline variant")
                    .map(Some)
            }
        }
    }

    /// Encode the active arm; the result is the arm's own external value.
    fn encode_arms(&self, arms: &[VariantArm], value: &Value, path: &str, expected: &str) -> CodecResult<J> {
        let Value::Union { tag, payload } = value else {
            return Err(mismatch(path, expected));
        };
        let arm = arms.get(*tag).ok_or_else(|| CodecError::InvalidDiscriminant {
            path: path.to_string(),
            tag: *tag,
            arms: arms.len(),
        })?;

        match arm {
            VariantArm::Type(ty) => Ok(self.encode_ref(ty, payload, path)?.unwrap_or(J::Null)),
            VariantArm::InlineStruct(fields) => {
                let Value::Record(record) = payload.as_ref() else {
                    return Err(mismatch(path, "inline struct"));
                };
                self.encode_fields(fields, record, path).map(J::Object)
            }
        }
    }
}

/// Presence handling of inline struct and variant members.
fn decode_present(
    optional: bool,
    member: Option<&J>,
    path: &str,
    decode: impl FnOnce(&J) -> CodecResult<Value>,
) -> CodecResult<Value> {
    match (member, optional) {
        (None, true) => Ok(Value::none()),
        (None, false) => Err(CodecError::MissingValue {
            path: path.to_string(),
        }),
        (Some(json), true) => decode(json).map(Value::some),
        (Some(json), false) => decode(json),
    }
}

/// Strip the optional wrapper of a present optional value.
fn present<'v>(value: &'v Value, optional: bool, path: &str) -> CodecResult<&'v Value> {
    match (value, optional) {
        (Value::Optional(Some(inner)), true) => Ok(inner),
        (Value::Optional(None), false) => Err(CodecError::MissingValue {
            path: path.to_string(),
        }),
        (Value::Optional(_), _) => Err(mismatch(path, "required value")),
        (v, false) => Ok(v),
        (_, true) => Err(mismatch(path, "optional value")),
    }
}

fn decode_builtin(kind: BuiltinKind, json: &J, path: &str) -> CodecResult<Value> {
    match (kind, json) {
        (BuiltinKind::String, J::String(s)) => Ok(Value::String(s.clone())),
        (BuiltinKind::Bool, J::Bool(b)) => Ok(Value::Bool(*b)),
        (BuiltinKind::Int, J::Number(n)) => n
            .as_i64()
            .map(Value::Int)
            .ok_or_else(|| wrong_type(path, "int", json)),
        (BuiltinKind::UInt, J::Number(n)) => n
            .as_u64()
            .map(Value::UInt)
            .ok_or_else(|| wrong_type(path, "uint", json)),
        (BuiltinKind::Null, J::Null) => Ok(Value::Null),
        (BuiltinKind::Empty, J::Object(map)) if map.is_empty() => Ok(Value::Empty),
        (BuiltinKind::Any, j) => Ok(Value::Any(j.clone())),
        (BuiltinKind::BoolOrNull, J::Bool(b)) => Ok(Value::union(0, Value::Bool(*b))),
        (BuiltinKind::BoolOrNull, J::Null) => Ok(Value::union(1, Value::Null)),
        (BuiltinKind::BoolOrEmpty, J::Bool(b)) => Ok(Value::union(0, Value::Bool(*b))),
        (BuiltinKind::BoolOrEmpty, J::Object(map)) if map.is_empty() => {
            Ok(Value::union(1, Value::Empty))
        }
        (BuiltinKind::IntOrNull, J::Number(n)) => n
            .as_i64()
            .map(|i| Value::union(0, Value::Int(i)))
            .ok_or_else(|| wrong_type(path, "int or null", json)),
        (BuiltinKind::IntOrNull, J::Null) => Ok(Value::union(1, Value::Null)),
        (kind, j) => Err(wrong_type(path, expected_tag(kind), j)),
    }
}

fn encode_builtin(kind: BuiltinKind, name: &str, value: &Value, path: &str) -> CodecResult<J> {
    match (kind, value) {
        (BuiltinKind::String, Value::String(s)) => Ok(J::String(s.clone())),
        (BuiltinKind::Bool, Value::Bool(b)) => Ok(J::Bool(*b)),
        (BuiltinKind::Int, Value::Int(i)) => Ok(J::from(*i)),
        (BuiltinKind::UInt, Value::UInt(u)) => Ok(J::from(*u)),
        (BuiltinKind::Null, Value::Null) => Ok(J::Null),
        (BuiltinKind::Empty, Value::Empty) => Ok(J::Object(Map::new())),
        (BuiltinKind::Any, Value::Any(j)) => Ok(j.clone()),
        (BuiltinKind::BoolOrNull | BuiltinKind::BoolOrEmpty | BuiltinKind::IntOrNull, Value::Union { tag, payload }) => {
            match (kind, *tag, payload.as_ref()) {
                (BuiltinKind::BoolOrNull | BuiltinKind::BoolOrEmpty, 0, Value::Bool(b)) => Ok(J::Bool(*b)),
                (BuiltinKind::IntOrNull, 0, Value::Int(i)) => Ok(J::from(*i)),
                (BuiltinKind::BoolOrNull | BuiltinKind::IntOrNull, 1, Value::Null) => Ok(J::Null),
                (BuiltinKind::BoolOrEmpty, 1, Value::Empty) => Ok(J::Object(Map::new())),
                (_, tag, _) if tag > 1 => Err(CodecError::InvalidDiscriminant {
                    path: path.to_string(),
                    tag,
                    arms: 2,
                }),
                _ => Err(mismatch(path, name)),
            }
        }
        _ => Err(mismatch(path, name)),
    }
}

fn expected_tag(kind: BuiltinKind) -> &'static str {
    match kind {
        BuiltinKind::String => "string",
        BuiltinKind::Bool => "bool",
        BuiltinKind::Int => "int",
        BuiltinKind::UInt => "uint",
        BuiltinKind::Null => "null",
        BuiltinKind::Empty => "empty object",
        BuiltinKind::Any => "any",
        BuiltinKind::BoolOrNull => "bool or null",
        BuiltinKind::BoolOrEmpty => "bool or empty object",
        BuiltinKind::IntOrNull => "int or null",
    }
}

/// JSON type tag of `json`, as reported in diagnostics.
pub fn json_kind(json: &J) -> &'static str {
    match json {
        J::Null => "null",
        J::Bool(_) => "bool",
        J::Number(n) if n.is_f64() => "float",
        J::Number(_) => "int",
        J::String(_) => "string",
        J::Array(_) => "array",
        J::Object(_) => "object",
    }
}

fn wrong_type(path: &str, expected: &str, actual: &J) -> CodecError {
    CodecError::WrongType {
        path: path.to_string(),
        expected: expected.to_string(),
        actual: json_kind(actual).to_string(),
    }
}

fn mismatch(path: &str, expected: &str) -> CodecError {
    CodecError::ValueMismatch {
        path: path.to_string(),
        expected: expected.to_string(),
    }
}

#[cfg(test)]
#[path = "codec/codec_tests.rs"]
mod codec_tests;
