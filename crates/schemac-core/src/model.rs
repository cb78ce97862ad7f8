//! Typed schema model.
//!
//! Everything here is built once by [`crate::schema`] and is read-only
//! afterwards, apart from the memoized flattened field list of a struct.
//!
//! # Structure
//!
//! - [`Definition`]: closed variant over [`EnumDef`], [`StructDef`] and [`UnionDef`]
//! - [`Field`]: a named member whose [`Payload`] is a type reference, an
//!   inline struct or an inline variant
//! - [`VariantArm`]: one alternative of a variant; its position is its tag
//! - [`TypeRef`]: a type name plus `array`/`optional` modifiers

use once_cell::unsync::OnceCell;

/// Which kind of literal an enum carries on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    String,
    Int,
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueKind::String => write!(f, "string"),
            ValueKind::Int => write!(f, "int"),
        }
    }
}

/// Wire literal of an enum value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EnumLiteral {
    String(String),
    Int(i64),
}

impl std::fmt::Display for EnumLiteral {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnumLiteral::String(s) => write!(f, "\"{s}\""),
            EnumLiteral::Int(i) => write!(f, "{i}"),
        }
    }
}

/// A named enum value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValue {
    pub name: String,
    pub literal: EnumLiteral,
}

/// Wrapper types requested for a definition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Wrappers {
    /// Emit `Optional<Name>`
    pub optional: bool,

    /// Emit an array wrapper
    pub array: bool,

    /// Explicit name of the array wrapper; defaults to `<Name>s`
    pub plural: Option<String>,

    /// Emit an optional wrapper around the array wrapper
    pub optional_array: bool,
}

/// Which JSON routines are emitted for a definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Routines {
    pub decode: bool,
    pub encode: bool,
}

impl Default for Routines {
    fn default() -> Self {
        Self {
            decode: true,
            encode: true,
        }
    }
}

/// A reference to a named type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
    pub name: String,
    pub array: bool,
    pub optional: bool,
}

impl TypeRef {
    /// A plain reference with no modifiers.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            array: false,
            optional: false,
        }
    }

    /// The same reference without the `optional` modifier.
    pub fn required(&self) -> Self {
        Self {
            optional: false,
            ..self.clone()
        }
    }
}

/// What a field (or variant arm) holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Type(TypeRef),
    InlineStruct(Vec<Field>),
    Variant(Vec<VariantArm>),
}

/// A named struct member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub optional: bool,
    pub payload: Payload,
}

impl Field {
    /// A field holding a type reference. The reference inherits `optional`.
    pub fn typed(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            optional: ty.optional,
            payload: Payload::Type(ty),
        }
    }
}

/// One alternative of a union or inline variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariantArm {
    Type(TypeRef),
    InlineStruct(Vec<Field>),
}

/// An enumeration.
#[derive(Debug, Clone)]
pub struct EnumDef {
    pub name: String,
    pub kind: ValueKind,
    pub values: Vec<EnumValue>,
    pub wrappers: Wrappers,
    pub routines: Routines,
}

impl EnumDef {
    /// Find the value carrying `literal`.
    pub fn by_literal(&self, literal: &EnumLiteral) -> Option<&EnumValue> {
        self.values.iter().find(|v| &v.literal == literal)
    }

    /// Find the value named `name`.
    pub fn by_name(&self, name: &str) -> Option<&EnumValue> {
        self.values.iter().find(|v| v.name == name)
    }
}

/// A record type, optionally extending other structs.
#[derive(Debug, Clone)]
pub struct StructDef {
    pub name: String,
    pub extends: Vec<String>,
    pub fields: Vec<Field>,
    pub wrappers: Wrappers,
    pub routines: Routines,

    /// Bases' fields followed by own fields, filled on first use
    pub(crate) all_fields: OnceCell<Vec<Field>>,
}

impl StructDef {
    pub fn new(name: impl Into<String>, extends: Vec<String>, fields: Vec<Field>) -> Self {
        Self {
            name: name.into(),
            extends,
            fields,
            wrappers: Wrappers::default(),
            routines: Routines::default(),
            all_fields: OnceCell::new(),
        }
    }
}

/// A tagged union.
#[derive(Debug, Clone)]
pub struct UnionDef {
    pub name: String,
    pub arms: Vec<VariantArm>,
    pub wrappers: Wrappers,
    pub routines: Routines,
}

/// Kind of a registered definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionKind {
    Enum,
    Struct,
    Union,
}

impl std::fmt::Display for DefinitionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DefinitionKind::Enum => write!(f, "enum"),
            DefinitionKind::Struct => write!(f, "struct"),
            DefinitionKind::Union => write!(f, "union"),
        }
    }
}

/// A top-level schema definition.
#[derive(Debug, Clone)]
pub enum Definition {
    Enum(EnumDef),
    Struct(StructDef),
    Union(UnionDef),
}

impl Definition {
    pub fn name(&self) -> &str {
        match self {
            Definition::Enum(e) => &e.name,
            Definition::Struct(s) => &s.name,
            Definition::Union(u) => &u.name,
        }
    }

    pub fn kind(&self) -> DefinitionKind {
        match self {
            Definition::Enum(_) => DefinitionKind::Enum,
            Definition::Struct(_) => DefinitionKind::Struct,
            Definition::Union(_) => DefinitionKind::Union,
        }
    }

    pub fn wrappers(&self) -> &Wrappers {
        match self {
            Definition::Enum(e) => &e.wrappers,
            Definition::Struct(s) => &s.wrappers,
            Definition::Union(u) => &u.wrappers,
        }
    }

    pub fn routines(&self) -> Routines {
        match self {
            Definition::Enum(e) => e.routines,
            Definition::Struct(s) => s.routines,
            Definition::Union(u) => u.routines,
        }
    }

    /// Name of the array wrapper: the explicit plural or `<Name>s`.
    pub fn plural(&self) -> String {
        self.wrappers()
            .plural
            .clone()
            .unwrap_or_else(|| format!("{}s", self.name()))
    }

    /// Names this definition refers to, in declaration order.
    ///
    /// Bases come first, then every `type` reference found in fields,
    /// inline structs and variant arms. Built-in names are included; callers
    /// filter them out. Duplicates are kept.
    pub fn references(&self) -> Vec<&str> {
        let mut out = Vec::new();
        match self {
            Definition::Enum(_) => {}
            Definition::Struct(s) => {
                out.extend(s.extends.iter().map(String::as_str));
                collect_field_refs(&s.fields, &mut out);
            }
            Definition::Union(u) => collect_arm_refs(&u.arms, &mut out),
        }
        out
    }
}

fn collect_field_refs<'a>(fields: &'a [Field], out: &mut Vec<&'a str>) {
    for field in fields {
        match &field.payload {
            Payload::Type(ty) => out.push(&ty.name),
            Payload::InlineStruct(nested) => collect_field_refs(nested, out),
            Payload::Variant(arms) => collect_arm_refs(arms, out),
        }
    }
}

fn collect_arm_refs<'a>(arms: &'a [VariantArm], out: &mut Vec<&'a str>) {
    for arm in arms {
        match arm {
            VariantArm::Type(ty) => out.push(&ty.name),
            VariantArm::InlineStruct(fields) => collect_field_refs(fields, out),
        }
    }
}

/// The definitions loaded from one schema file.
#[derive(Debug, Clone, Default)]
pub struct Module {
    pub name: String,
    pub depends: Vec<String>,
    pub enums: Vec<EnumDef>,
    pub structs: Vec<StructDef>,
    pub unions: Vec<UnionDef>,
}

impl Module {
    /// All definitions, enums first, then unions, then structs.
    ///
    /// This is the order in which the generator visits top-level names.
    pub fn into_definitions(self) -> Vec<Definition> {
        let mut defs = Vec::with_capacity(self.enums.len() + self.structs.len() + self.unions.len());
        defs.extend(self.enums.into_iter().map(Definition::Enum));
        defs.extend(self.unions.into_iter().map(Definition::Union));
        defs.extend(self.structs.into_iter().map(Definition::Struct));
        defs
    }
}

#[cfg(test)]
#[path = "model/model_tests.rs"]
mod model_tests;
