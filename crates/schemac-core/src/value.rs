//! Typed in-memory values handled by the reference codec.

use indexmap::IndexMap;

/// A statically-typed value, mirroring the storage of the generated C types.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    UInt(u64),
    String(String),
    Null,
    Empty,
    /// Opaque JSON carried by `any`
    Any(serde_json::Value),
    /// An enum value, identified by its value name
    Enum { type_name: String, value: String },
    Record(Record),
    /// Active arm of a union or inline variant
    Union { tag: usize, payload: Box<Value> },
    Optional(Option<Box<Value>>),
    Array(Vec<Value>),
}

impl Value {
    pub fn some(value: Value) -> Self {
        Value::Optional(Some(Box::new(value)))
    }

    pub fn none() -> Self {
        Value::Optional(None)
    }

    pub fn string(s: impl Into<String>) -> Self {
        Value::String(s.into())
    }

    pub fn enumeration(type_name: impl Into<String>, value: impl Into<String>) -> Self {
        Value::Enum {
            type_name: type_name.into(),
            value: value.into(),
        }
    }

    pub fn union(tag: usize, payload: Value) -> Self {
        Value::Union {
            tag,
            payload: Box::new(payload),
        }
    }

    /// Short name of the variant, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::UInt(_) => "uint",
            Value::String(_) => "string",
            Value::Null => "null",
            Value::Empty => "empty",
            Value::Any(_) => "any",
            Value::Enum { .. } => "enum",
            Value::Record(_) => "record",
            Value::Union { .. } => "union",
            Value::Optional(_) => "optional",
            Value::Array(_) => "array",
        }
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Record(record)
    }
}

/// Named members of a struct value, in field order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    members: IndexMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: Value) -> Self {
        self.members.insert(name.into(), value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.members.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.members.get(name)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.members.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.members.iter().map(|(k, v)| (k.as_str(), v))
    }
}
