#![allow(non_snake_case)]

use super::*;

// SchemaError display tests

#[test]
fn SchemaError___missing_property___names_definition_and_property() {
    let err = SchemaError::MissingProperty {
        definition: "Position".to_string(),
        property: "fields".to_string(),
    };

    assert_eq!(
        err.to_string(),
        "'Position' is missing required property 'fields'"
    );
}

#[test]
fn SchemaError___unresolved_references___lists_every_location() {
    let err = SchemaError::UnresolvedReferences(vec![
        UnresolvedReference {
            location: "Diagnostic.range".to_string(),
            name: "Range".to_string(),
        },
        UnresolvedReference {
            location: "Diagnostic.code._1".to_string(),
            name: "Code".to_string(),
        },
    ]);

    assert_eq!(
        err.to_string(),
        "unresolved type references: Diagnostic.range -> 'Range', Diagnostic.code._1 -> 'Code'"
    );
}

#[test]
fn SchemaError___cycle___joins_path_with_arrows() {
    let err = SchemaError::Cycle(vec!["A".to_string(), "B".to_string(), "A".to_string()]);

    assert_eq!(err.to_string(), "reference cycle: A -> B -> A");
}

#[test]
fn SchemaError___json___converts_from_serde_error() {
    let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();

    let err: SchemaError = parse_err.into();

    assert!(matches!(err, SchemaError::Json(_)));
}

// CodecError tests

#[test]
fn CodecError___wrong_type___includes_path_and_tags() {
    let err = CodecError::WrongType {
        path: "$.x".to_string(),
        expected: "int".to_string(),
        actual: "string".to_string(),
    };

    assert_eq!(err.to_string(), "$.x: expected int, found string");
}

#[test]
fn CodecError___from_schema_error___wraps_message() {
    let err: CodecError = SchemaError::UnknownDefinition("Nope".to_string()).into();

    assert_eq!(err, CodecError::Schema("unknown definition 'Nope'".to_string()));
}

#[test]
fn CodecError___routine_disabled___names_routine() {
    let err = CodecError::RoutineDisabled {
        definition: "Hover".to_string(),
        routine: "encode",
    };

    assert_eq!(err.to_string(), "encode is disabled for Hover");
}
