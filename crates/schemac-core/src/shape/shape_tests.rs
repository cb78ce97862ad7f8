#![allow(non_snake_case)]

use super::*;
use crate::schema::SchemaDocument;
use serde_json::json;
use test_case::test_case;

fn registry(text: &str) -> Registry {
    let module = SchemaDocument::from_str(text)
        .unwrap()
        .into_module("m")
        .unwrap();
    Registry::from_module(module).unwrap()
}

fn sample() -> Registry {
    registry(
        r#"{
            "enums": [
                { "name": "State", "values": [{ "name": "Open", "value": "open" }] },
                { "name": "Level", "value_type": "int", "values": [{ "name": "Low", "value": 1 }] }
            ],
            "structs": [
                { "name": "Base", "fields": [{ "name": "a", "type": "int" }] },
                { "name": "Point", "extends": "Base", "fields": [
                    { "name": "x", "type": "int" },
                    { "name": "label", "type": "string", "optional": true }
                ] }
            ],
            "variants": [
                { "name": "Id", "variant": [{ "type": "int" }, { "type": "string" }] }
            ]
        }"#,
    )
}

// of_type tests

#[test_case("bool", Shape::Bool)]
#[test_case("uint", Shape::Int)]
#[test_case("URI", Shape::String)]
#[test_case("null", Shape::Null)]
#[test_case("empty", Shape::EmptyObject)]
#[test_case("any", Shape::Any)]
#[test_case("State", Shape::String)]
#[test_case("Level", Shape::Int)]
fn Shape___of_type___maps_scalars(name: &str, expected: Shape) {
    let registry = sample();

    assert_eq!(Shape::of_type(&registry, &TypeRef::named(name)).unwrap(), expected);
}

#[test]
fn Shape___of_type___struct_requires_flattened_required_fields() {
    let registry = sample();

    let shape = Shape::of_type(&registry, &TypeRef::named("Point")).unwrap();

    assert_eq!(
        shape,
        Shape::Object {
            required: vec!["a".to_string(), "x".to_string()]
        }
    );
}

#[test]
fn Shape___of_type___union_is_one_of_arms() {
    let registry = sample();

    let shape = Shape::of_type(&registry, &TypeRef::named("Id")).unwrap();

    assert_eq!(shape, Shape::OneOf(vec![Shape::Int, Shape::String]));
}

#[test]
fn Shape___of_type___array_wins_over_element() {
    let registry = sample();
    let ty = TypeRef {
        name: "Point".to_string(),
        array: true,
        optional: false,
    };

    assert_eq!(Shape::of_type(&registry, &ty).unwrap(), Shape::Array);
}

#[test]
fn Shape___of_type___self_referencing_union_is_a_cycle() {
    let registry = registry(
        r#"{ "variants": [{ "name": "U", "variant": [{ "type": "int" }, { "type": "U" }] }] }"#,
    );

    let result = Shape::of_type(&registry, &TypeRef::named("U"));

    assert!(matches!(result, Err(SchemaError::Cycle(_))));
}

// matches tests

#[test]
fn Shape___matches___object_needs_required_members() {
    let shape = Shape::Object {
        required: vec!["x".to_string()],
    };

    assert!(shape.matches(&json!({ "x": 1, "y": 2 })));
    assert!(!shape.matches(&json!({ "y": 2 })));
    assert!(!shape.matches(&json!([1])));
}

#[test]
fn Shape___matches___empty_object_rejects_members() {
    assert!(Shape::EmptyObject.matches(&json!({})));
    assert!(!Shape::EmptyObject.matches(&json!({ "a": 1 })));
}

#[test]
fn Shape___matches___int_rejects_float() {
    assert!(Shape::Int.matches(&json!(3)));
    assert!(!Shape::Int.matches(&json!(3.5)));
}

// overlaps tests

#[test_case(Shape::Bool, Shape::Int, false ; "distinct scalars")]
#[test_case(Shape::Int, Shape::Int, true ; "same scalar")]
#[test_case(Shape::Any, Shape::Null, true ; "any overlaps everything")]
#[test_case(Shape::OneOf(vec![Shape::Bool, Shape::Null]), Shape::Null, true ; "one of containing")]
#[test_case(Shape::EmptyObject, Shape::Object { required: vec![] }, true ; "empty and open object")]
#[test_case(Shape::EmptyObject, Shape::Object { required: vec!["a".to_string()] }, false ; "empty and required member")]
fn Shape___overlaps___scalars_and_unions(a: Shape, b: Shape, expected: bool) {
    assert_eq!(a.overlaps(&b), expected);
    assert_eq!(b.overlaps(&a), expected);
}

#[test]
fn Shape___overlaps___object_subset_overlaps() {
    let small = Shape::Object {
        required: vec!["a".to_string()],
    };
    let large = Shape::Object {
        required: vec!["a".to_string(), "b".to_string()],
    };

    assert!(small.overlaps(&large));
    assert!(large.overlaps(&small));
}

#[test]
fn Shape___overlaps___disjoint_objects_overlap() {
    let text_edit = Shape::Object {
        required: vec!["range".to_string(), "newText".to_string()],
    };
    let insert_replace = Shape::Object {
        required: vec!["insert".to_string(), "newText".to_string()],
    };
    let both = json!({"range": 1, "insert": 2, "newText": "x"});

    assert!(text_edit.overlaps(&insert_replace));
    assert!(text_edit.matches(&both) && insert_replace.matches(&both));
}

#[test]
fn Shape___witness___merges_object_members() {
    let a = Shape::Object {
        required: vec!["range".to_string(), "newText".to_string()],
    };
    let b = Shape::Object {
        required: vec!["insert".to_string(), "newText".to_string()],
    };

    assert_eq!(
        a.witness(&b),
        Shape::Object {
            required: vec![
                "range".to_string(),
                "newText".to_string(),
                "insert".to_string()
            ],
        }
    );
    assert_eq!(Shape::Bool.witness(&Shape::Int), Shape::Int);
}

// c_condition tests

#[test]
fn Shape___c_condition___scalar_checks_type_tag() {
    assert_eq!(
        Shape::Bool.c_condition("v8"),
        "v8.value.type == JSON_TYPE_BOOLEAN"
    );
}

#[test]
fn Shape___c_condition___object_checks_members() {
    let shape = Shape::Object {
        required: vec!["x".to_string(), "y".to_string()],
    };

    assert_eq!(
        shape.c_condition("v4"),
        r#"(v4.value.type == JSON_TYPE_OBJECT && json_has(&v4.value, "x") && json_has(&v4.value, "y"))"#
    );
}

#[test]
fn Shape___c_condition___one_of_joins_with_or() {
    let shape = Shape::OneOf(vec![Shape::Int, Shape::Null]);

    assert_eq!(
        shape.c_condition("v"),
        "(v.value.type == JSON_TYPE_INT || v.value.type == JSON_TYPE_NULL)"
    );
}

#[test]
fn Shape___c_condition___escapes_member_names() {
    let shape = Shape::Object {
        required: vec![r#"say "hi""#.to_string()],
    };

    assert_eq!(
        shape.c_condition("v4"),
        r#"(v4.value.type == JSON_TYPE_OBJECT && json_has(&v4.value, "say \"hi\""))"#
    );
}

// c_string tests

#[test_case("plain", r#""plain""# ; "plain text")]
#[test_case(r#"a"b"#, r#""a\"b""# ; "quote")]
#[test_case(r"C:\dir", r#""C:\\dir""# ; "backslash")]
#[test_case("two\nlines\t", r#""two\nlines\t""# ; "newline and tab")]
#[test_case("bell\u{7}", r#""bell\007""# ; "other control")]
fn c_string___escapes_c_specials(text: &str, expected: &str) {
    assert_eq!(c_string(text), expected);
}

#[test]
fn Shape___describe___lists_required_members() {
    let shape = Shape::Object {
        required: vec!["x".to_string()],
    };

    assert_eq!(shape.describe(), "object with x");
}
