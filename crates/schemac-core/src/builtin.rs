//! Built-in type names understood by every schema

/// Semantic class of a built-in type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinKind {
    String,
    Bool,
    Int,
    UInt,
    Null,
    Empty,
    Any,
    BoolOrNull,
    BoolOrEmpty,
    IntOrNull,
}

/// Storage and routine names of a built-in type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Builtin {
    /// Name used in schema `type` references
    pub name: &'static str,
    /// C storage type
    pub storage: &'static str,
    /// Routine prefix, also the root of wrapper names
    pub alias: &'static str,
    /// Explicit array wrapper name
    pub plural: Option<&'static str>,
    pub kind: BuiltinKind,
}

impl Builtin {
    /// Name of the array wrapper over this type.
    pub fn plural(&self) -> String {
        match self.plural {
            Some(plural) => plural.to_string(),
            None => format!("{}s", self.alias),
        }
    }
}

const BUILTINS: &[Builtin] = &[
    Builtin {
        name: "string",
        storage: "StringView",
        alias: "StringView",
        plural: Some("StringList"),
        kind: BuiltinKind::String,
    },
    Builtin {
        name: "URI",
        storage: "StringView",
        alias: "StringView",
        plural: Some("StringList"),
        kind: BuiltinKind::String,
    },
    Builtin {
        name: "DocumentUri",
        storage: "StringView",
        alias: "StringView",
        plural: Some("StringList"),
        kind: BuiltinKind::String,
    },
    Builtin {
        name: "bool",
        storage: "bool",
        alias: "Bool",
        plural: None,
        kind: BuiltinKind::Bool,
    },
    Builtin {
        name: "int",
        storage: "int",
        alias: "Int",
        plural: None,
        kind: BuiltinKind::Int,
    },
    Builtin {
        name: "uint",
        storage: "unsigned int",
        alias: "UInt",
        plural: None,
        kind: BuiltinKind::UInt,
    },
    Builtin {
        name: "null",
        storage: "Null",
        alias: "Null",
        plural: None,
        kind: BuiltinKind::Null,
    },
    Builtin {
        name: "empty",
        storage: "Empty",
        alias: "Empty",
        plural: None,
        kind: BuiltinKind::Empty,
    },
    Builtin {
        name: "any",
        storage: "JSONValue",
        alias: "JSONValue",
        plural: None,
        kind: BuiltinKind::Any,
    },
    Builtin {
        name: "BoolOrNull",
        storage: "BoolOrNull",
        alias: "BoolOrNull",
        plural: None,
        kind: BuiltinKind::BoolOrNull,
    },
    Builtin {
        name: "BoolOrEmpty",
        storage: "BoolOrEmpty",
        alias: "BoolOrEmpty",
        plural: None,
        kind: BuiltinKind::BoolOrEmpty,
    },
    Builtin {
        name: "IntOrNull",
        storage: "IntOrNull",
        alias: "IntOrNull",
        plural: None,
        kind: BuiltinKind::IntOrNull,
    },
];

/// Look up a built-in by its schema name.
pub fn builtin(name: &str) -> Option<&'static Builtin> {
    BUILTINS.iter().find(|b| b.name == name)
}

/// All built-ins, in table order.
pub fn builtins() -> &'static [Builtin] {
    BUILTINS
}
