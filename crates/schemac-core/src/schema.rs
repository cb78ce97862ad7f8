//! Schema document parsing.
//!
//! A schema document is JSON of the form
//!
//! ```json
//! {
//!   "depends": ["base"],
//!   "enums":    [{ "name": "TraceValue", "values": [{ "name": "Off", "value": "off" }] }],
//!   "structs":  [{ "name": "Position", "fields": [{ "name": "line", "type": "uint" }] }],
//!   "variants": [{ "name": "Id", "variant": [{ "type": "int" }, { "type": "string" }] }]
//! }
//! ```
//!
//! Parsing happens in two steps: serde reads the loosely-shaped
//! [`SchemaDocument`], then [`SchemaDocument::into_module`] checks every
//! definition and lowers it into the typed [`Module`]. All structural defects
//! (missing properties, empty enums, fields with zero or several payloads) are
//! reported by the second step with the offending location.

use crate::error::{SchemaError, SchemaResult};
use crate::model::{
    EnumDef, EnumLiteral, EnumValue, Field, Module, Payload, Routines, StructDef, TypeRef,
    UnionDef, ValueKind, VariantArm, Wrappers,
};
use serde::Deserialize;
use std::collections::HashSet;

/// Raw top-level schema document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchemaDocument {
    #[serde(default)]
    pub enums: Vec<RawEnum>,

    #[serde(default)]
    pub structs: Vec<RawStruct>,

    #[serde(default)]
    pub variants: Vec<RawUnion>,

    #[serde(default)]
    pub depends: Vec<String>,
}

/// Properties shared by every definition kind.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCommon {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub optional: bool,

    #[serde(default)]
    pub array: bool,

    #[serde(default)]
    pub plural: Option<String>,

    #[serde(default, rename = "optional-array", alias = "optionalArray")]
    pub optional_array: bool,

    #[serde(default)]
    pub decode: Option<bool>,

    #[serde(default)]
    pub encode: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawEnum {
    #[serde(flatten)]
    pub common: RawCommon,

    #[serde(default, rename = "value_type", alias = "valueKind")]
    pub value_type: Option<String>,

    #[serde(default)]
    pub values: Option<Vec<RawEnumValue>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawEnumValue {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub value: Option<serde_json::Value>,
}

/// `extends` accepts a single base name or a list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawExtends {
    One(String),
    Many(Vec<String>),
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawStruct {
    #[serde(flatten)]
    pub common: RawCommon,

    #[serde(default)]
    pub extends: Option<RawExtends>,

    #[serde(default)]
    pub fields: Option<Vec<RawField>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawUnion {
    #[serde(flatten)]
    pub common: RawCommon,

    #[serde(default)]
    pub variant: Option<Vec<RawField>>,
}

/// A struct field or a variant arm. Arms usually carry no name.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawField {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default, rename = "type")]
    pub ty: Option<String>,

    #[serde(default)]
    pub array: bool,

    #[serde(default)]
    pub optional: bool,

    #[serde(default, rename = "struct", alias = "inlineStruct")]
    pub inline_struct: Option<Vec<RawField>>,

    #[serde(default)]
    pub variant: Option<Vec<RawField>>,
}

impl SchemaDocument {
    /// Parse a schema document from JSON text.
    pub fn from_str(text: &str) -> SchemaResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Check every definition and lower the document into a [`Module`].
    pub fn into_module(self, name: impl Into<String>) -> SchemaResult<Module> {
        let mut module = Module {
            name: name.into(),
            depends: self.depends,
            ..Module::default()
        };

        for (ix, raw) in self.enums.into_iter().enumerate() {
            module.enums.push(lower_enum(raw, ix)?);
        }
        for (ix, raw) in self.structs.into_iter().enumerate() {
            module.structs.push(lower_struct(raw, ix)?);
        }
        for (ix, raw) in self.variants.into_iter().enumerate() {
            module.unions.push(lower_union(raw, ix)?);
        }

        Ok(module)
    }
}

fn definition_name(common: &RawCommon, section: &str, ix: usize) -> SchemaResult<String> {
    common
        .name
        .clone()
        .ok_or_else(|| SchemaError::MissingProperty {
            definition: format!("{section}[{ix}]"),
            property: "name".to_string(),
        })
}

fn wrappers(common: &RawCommon) -> Wrappers {
    Wrappers {
        optional: common.optional,
        array: common.array,
        plural: common.plural.clone(),
        optional_array: common.optional_array,
    }
}

fn routines(common: &RawCommon) -> Routines {
    Routines {
        decode: common.decode.unwrap_or(true),
        encode: common.encode.unwrap_or(true),
    }
}

fn lower_enum(raw: RawEnum, ix: usize) -> SchemaResult<EnumDef> {
    let name = definition_name(&raw.common, "enums", ix)?;

    let kind = match raw.value_type.as_deref() {
        None | Some("string") => ValueKind::String,
        Some("int") => ValueKind::Int,
        Some(other) => {
            return Err(SchemaError::UnknownValueKind {
                definition: name,
                value_type: other.to_string(),
            });
        }
    };

    let raw_values = raw.values.ok_or_else(|| SchemaError::MissingProperty {
        definition: name.clone(),
        property: "values".to_string(),
    })?;
    if raw_values.is_empty() {
        return Err(SchemaError::EmptyEnum(name));
    }

    let mut values = Vec::with_capacity(raw_values.len());
    let mut seen = HashSet::new();
    for (value_ix, raw_value) in raw_values.into_iter().enumerate() {
        let value_name = raw_value
            .name
            .ok_or_else(|| SchemaError::MissingProperty {
                definition: format!("{name}.values[{value_ix}]"),
                property: "name".to_string(),
            })?;

        let literal = match (kind, raw_value.value) {
            (ValueKind::String, None) => Some(EnumLiteral::String(value_name.clone())),
            (ValueKind::String, Some(serde_json::Value::String(s))) => {
                Some(EnumLiteral::String(s))
            }
            (ValueKind::Int, None) => {
                return Err(SchemaError::MissingProperty {
                    definition: format!("{name}.{value_name}"),
                    property: "value".to_string(),
                });
            }
            (ValueKind::Int, Some(v)) => v.as_i64().map(EnumLiteral::Int),
            (ValueKind::String, Some(_)) => None,
        };
        let Some(literal) = literal else {
            return Err(SchemaError::MixedEnumLiteral {
                definition: name,
                value: value_name,
                expected: kind.to_string(),
            });
        };

        if !seen.insert(literal.clone()) {
            return Err(SchemaError::DuplicateEnumLiteral {
                definition: name,
                literal: literal.to_string(),
            });
        }
        values.push(EnumValue {
            name: value_name,
            literal,
        });
    }

    Ok(EnumDef {
        wrappers: wrappers(&raw.common),
        routines: routines(&raw.common),
        name,
        kind,
        values,
    })
}

fn lower_struct(raw: RawStruct, ix: usize) -> SchemaResult<StructDef> {
    let name = definition_name(&raw.common, "structs", ix)?;

    let raw_fields = raw.fields.ok_or_else(|| SchemaError::MissingProperty {
        definition: name.clone(),
        property: "fields".to_string(),
    })?;
    let fields = lower_fields(raw_fields, &name)?;

    let extends = match raw.extends {
        None => Vec::new(),
        Some(RawExtends::One(base)) => vec![base],
        Some(RawExtends::Many(bases)) => bases,
    };

    let mut def = StructDef::new(name, extends, fields);
    def.wrappers = wrappers(&raw.common);
    def.routines = routines(&raw.common);
    Ok(def)
}

fn lower_union(raw: RawUnion, ix: usize) -> SchemaResult<UnionDef> {
    let name = definition_name(&raw.common, "variants", ix)?;

    let raw_arms = raw.variant.ok_or_else(|| SchemaError::MissingProperty {
        definition: name.clone(),
        property: "variant".to_string(),
    })?;
    let arms = lower_arms(raw_arms, &name)?;

    Ok(UnionDef {
        wrappers: wrappers(&raw.common),
        routines: routines(&raw.common),
        name,
        arms,
    })
}

fn lower_fields(raw: Vec<RawField>, owner: &str) -> SchemaResult<Vec<Field>> {
    let mut fields = Vec::with_capacity(raw.len());
    let mut seen = HashSet::new();
    for (ix, raw_field) in raw.into_iter().enumerate() {
        let name = raw_field
            .name
            .clone()
            .ok_or_else(|| SchemaError::MissingProperty {
                definition: format!("{owner}.fields[{ix}]"),
                property: "name".to_string(),
            })?;
        if !seen.insert(name.clone()) {
            return Err(SchemaError::DuplicateDefinition(format!("{owner}.{name}")));
        }
        let location = format!("{owner}.{name}");
        let optional = raw_field.optional;
        let payload = lower_payload(raw_field, &location)?;
        fields.push(Field {
            name,
            optional,
            payload,
        });
    }
    Ok(fields)
}

fn lower_payload(raw: RawField, location: &str) -> SchemaResult<Payload> {
    match (raw.ty, raw.inline_struct, raw.variant) {
        (Some(ty), None, None) => Ok(Payload::Type(TypeRef {
            name: ty,
            array: raw.array,
            optional: raw.optional,
        })),
        (None, Some(nested), None) => Ok(Payload::InlineStruct(lower_fields(nested, location)?)),
        (None, None, Some(arms)) => Ok(Payload::Variant(lower_arms(arms, location)?)),
        _ => Err(SchemaError::InvalidPayload {
            location: location.to_string(),
        }),
    }
}

fn lower_arms(raw: Vec<RawField>, owner: &str) -> SchemaResult<Vec<VariantArm>> {
    if raw.is_empty() {
        return Err(SchemaError::EmptyVariant {
            location: owner.to_string(),
        });
    }

    raw.into_iter()
        .enumerate()
        .map(|(tag, arm)| {
            let location = format!("{owner}._{tag}");
            match (arm.ty, arm.inline_struct, arm.variant) {
                (Some(ty), None, None) => Ok(VariantArm::Type(TypeRef {
                    name: ty,
                    array: arm.array,
                    optional: arm.optional,
                })),
                (None, Some(fields), None) => {
                    Ok(VariantArm::InlineStruct(lower_fields(fields, &location)?))
                }
                _ => Err(SchemaError::InvalidPayload { location }),
            }
        })
        .collect()
}
