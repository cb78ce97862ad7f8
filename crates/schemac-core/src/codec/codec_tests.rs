#![allow(non_snake_case)]

use super::*;
use crate::schema::SchemaDocument;
use serde_json::json;

const SCHEMA: &str = r#"{
    "enums": [
        { "name": "State", "values": [{ "name": "Open", "value": "open" }, { "name": "Closed", "value": "closed" }] },
        { "name": "Severity", "array": true, "value_type": "int", "values": [{ "name": "Error", "value": 1 }, { "name": "Warning", "value": 2 }] }
    ],
    "structs": [
        { "name": "Point", "fields": [{ "name": "x", "type": "int" }, { "name": "y", "type": "int" }] },
        { "name": "Labeled", "fields": [
            { "name": "name", "type": "string" },
            { "name": "note", "type": "string", "optional": true }
        ] },
        { "name": "MyStruct", "fields": [{ "name": "k", "type": "string" }] },
        { "name": "Holder", "fields": [
            { "name": "value", "variant": [{ "type": "bool" }, { "type": "int" }, { "type": "MyStruct" }] },
            { "name": "extra", "optional": true, "struct": [{ "name": "state", "type": "State" }] },
            { "name": "tags", "type": "Severity", "array": true }
        ] },
        { "name": "WriteOnly", "decode": false, "fields": [] }
    ],
    "variants": [
        { "name": "Id", "variant": [{ "type": "int" }, { "type": "string" }] },
        { "name": "Loose", "variant": [{ "type": "int" }, { "type": "uint" }] }
    ]
}"#;

fn registry() -> Registry {
    let module = SchemaDocument::from_str(SCHEMA)
        .unwrap()
        .into_module("m")
        .unwrap();
    Registry::from_module(module).unwrap()
}

// Struct scenarios

#[test]
fn Codec___point___decodes_and_encodes_back_exactly() {
    let registry = registry();
    let codec = Codec::new(&registry);
    let input = json!({ "x": 3, "y": 4 });

    let value = codec.decode("Point", &input).unwrap();

    assert_eq!(
        value,
        Value::Record(
            Record::new()
                .with("x", Value::Int(3))
                .with("y", Value::Int(4))
        )
    );
    assert_eq!(codec.encode("Point", &value).unwrap(), Some(input));
}

#[test]
fn Codec___missing_optional___decodes_absent_and_is_omitted() {
    let registry = registry();
    let codec = Codec::new(&registry);
    let input = json!({ "name": "n" });

    let value = codec.decode("Labeled", &input).unwrap();

    let Value::Record(record) = &value else {
        panic!("expected record");
    };
    assert_eq!(record.get("note"), Some(&Value::none()));
    assert_eq!(codec.encode("Labeled", &value).unwrap(), Some(input));
}

#[test]
fn Codec___missing_required_member___reports_path() {
    let registry = registry();
    let codec = Codec::new(&registry);

    let result = codec.decode("Point", &json!({ "x": 1 }));

    assert_eq!(
        result,
        Err(CodecError::MissingValue {
            path: "$.y".to_string()
        })
    );
}

#[test]
fn Codec___wrong_member_type___reports_expected_and_actual() {
    let registry = registry();
    let codec = Codec::new(&registry);

    let result = codec.decode("Point", &json!({ "x": "3", "y": 4 }));

    assert_eq!(
        result,
        Err(CodecError::WrongType {
            path: "$.x".to_string(),
            expected: "int".to_string(),
            actual: "string".to_string(),
        })
    );
}

// Variant scenarios

#[test]
fn Codec___inline_variant___boolean_selects_first_arm() {
    let registry = registry();
    let codec = Codec::new(&registry);

    let value = codec
        .decode("Holder", &json!({ "value": true, "tags": [] }))
        .unwrap();

    let Value::Record(record) = value else {
        panic!("expected record");
    };
    assert_eq!(record.get("value"), Some(&Value::union(0, Value::Bool(true))));
}

#[test]
fn Codec___inline_variant___second_arm_encodes_as_int() {
    let registry = registry();
    let codec = Codec::new(&registry);
    let value = Value::Record(
        Record::new()
            .with("value", Value::union(1, Value::Int(7)))
            .with("extra", Value::none())
            .with("tags", Value::Array(vec![])),
    );

    let encoded = codec.encode("Holder", &value).unwrap();

    assert_eq!(encoded, Some(json!({ "value": 7, "tags": [] })));
}

#[test]
fn Codec___inline_variant___object_selects_struct_arm() {
    let registry = registry();
    let codec = Codec::new(&registry);
    let input = json!({
        "value": { "k": "v" },
        "extra": { "state": "closed" },
        "tags": [1, 2]
    });

    let value = codec.decode("Holder", &input).unwrap();

    let Value::Record(record) = &value else {
        panic!("expected record");
    };
    assert_eq!(
        record.get("value"),
        Some(&Value::union(
            2,
            Value::Record(Record::new().with("k", Value::string("v")))
        ))
    );
    assert_eq!(
        record.get("extra"),
        Some(&Value::some(Value::Record(
            Record::new().with("state", Value::enumeration("State", "Closed"))
        )))
    );
    assert_eq!(codec.encode("Holder", &value).unwrap(), Some(input));
}

#[test]
fn Codec___inline_variant___no_matching_arm_is_an_error() {
    let registry = registry();
    let codec = Codec::new(&registry);

    let result = codec.decode("Holder", &json!({ "value": "text", "tags": [] }));

    assert_eq!(
        result,
        Err(CodecError::NoMatchingArm {
            path: "$.value".to_string()
        })
    );
}

#[test]
fn Codec___union___ambiguous_arms_are_an_error() {
    let registry = registry();
    let codec = Codec::new(&registry);

    let result = codec.decode("Loose", &json!(5));

    assert_eq!(
        result,
        Err(CodecError::AmbiguousArms {
            path: "$".to_string(),
            arms: vec![0, 1],
        })
    );
}

#[test]
fn Codec___union___encodes_arm_value_directly() {
    let registry = registry();
    let codec = Codec::new(&registry);

    let encoded = codec.encode("Id", &Value::union(1, Value::string("abc"))).unwrap();

    assert_eq!(encoded, Some(json!("abc")));
}

#[test]
fn Codec___union___out_of_range_discriminant_is_an_error() {
    let registry = registry();
    let codec = Codec::new(&registry);

    let result = codec.encode("Id", &Value::union(2, Value::Int(1)));

    assert_eq!(
        result,
        Err(CodecError::InvalidDiscriminant {
            path: "$".to_string(),
            tag: 2,
            arms: 2,
        })
    );
}

// Enum scenarios

#[test]
fn Codec___parse_enum___maps_literal_to_value() {
    let registry = registry();
    let codec = Codec::new(&registry);

    assert_eq!(codec.parse_enum("State", "open").unwrap(), "Open");
    assert_eq!(codec.enum_to_string("State", "Open").unwrap(), "open");
    assert_eq!(codec.parse_enum("Severity", "2").unwrap(), "Warning");
}

#[test]
fn Codec___parse_enum___unknown_literal_is_an_error() {
    let registry = registry();
    let codec = Codec::new(&registry);

    let result = codec.parse_enum("State", "pending");

    assert!(matches!(result, Err(CodecError::UnknownEnumLiteral { literal, .. }) if literal == "pending"));
}

#[test]
fn Codec___int_enum___round_trips_literal() {
    let registry = registry();
    let codec = Codec::new(&registry);

    let value = codec.decode("Severity", &json!(1)).unwrap();

    assert_eq!(value, Value::enumeration("Severity", "Error"));
    assert_eq!(codec.encode("Severity", &value).unwrap(), Some(json!(1)));
}

#[test]
fn Codec___int_enum___unknown_literal_is_an_error() {
    let registry = registry();
    let codec = Codec::new(&registry);

    let result = codec.decode("Severity", &json!(9));

    assert!(matches!(result, Err(CodecError::UnknownEnumLiteral { .. })));
}

// Built-in and routine flag scenarios

#[test]
fn Codec___composite_builtin___decodes_tagged() {
    let registry = registry();
    let codec = Codec::new(&registry);

    assert_eq!(
        codec.decode("BoolOrNull", &json!(null)).unwrap(),
        Value::union(1, Value::Null)
    );
    assert_eq!(
        codec.decode("IntOrNull", &json!(4)).unwrap(),
        Value::union(0, Value::Int(4))
    );
}

#[test]
fn Codec___empty___requires_empty_object() {
    let registry = registry();
    let codec = Codec::new(&registry);

    assert_eq!(codec.decode("empty", &json!({})).unwrap(), Value::Empty);
    assert!(codec.decode("empty", &json!({ "a": 1 })).is_err());
}

#[test]
fn Codec___disabled_decode___is_reported() {
    let registry = registry();
    let codec = Codec::new(&registry);

    let result = codec.decode("WriteOnly", &json!({}));

    assert_eq!(
        result,
        Err(CodecError::RoutineDisabled {
            definition: "WriteOnly".to_string(),
            routine: "decode",
        })
    );
    assert_eq!(
        codec.encode("WriteOnly", &Value::Record(Record::new())).unwrap(),
        Some(json!({}))
    );
}

#[test]
fn Codec___unknown_type___is_a_schema_error() {
    let registry = registry();
    let codec = Codec::new(&registry);

    assert!(matches!(
        codec.decode("Nope", &json!(1)),
        Err(CodecError::Schema(_))
    ));
}

#[test]
fn Codec___encode_wrong_value_kind___is_a_mismatch() {
    let registry = registry();
    let codec = Codec::new(&registry);

    let result = codec.encode("Point", &Value::Int(1));

    assert!(matches!(result, Err(CodecError::ValueMismatch { .. })));
}

#[test]
fn json_kind___distinguishes_float_from_int() {
    assert_eq!(json_kind(&json!(1)), "int");
    assert_eq!(json_kind(&json!(1.5)), "float");
}
