#![allow(non_snake_case)]

use super::*;
use crate::schema::SchemaDocument;

fn registry(text: &str) -> Registry {
    let module = SchemaDocument::from_str(text)
        .unwrap()
        .into_module("m")
        .unwrap();
    Registry::from_module(module).unwrap()
}

fn strict() -> ValidationOptions {
    ValidationOptions::default()
}

// Reference tests

#[test]
fn validate___resolved_schema___has_no_warnings() {
    let registry = registry(
        r#"{
            "enums": [{ "name": "Kind", "optional": true, "values": [{ "name": "A", "value": "a" }] }],
            "structs": [
                { "name": "Position", "fields": [{ "name": "line", "type": "uint" }] },
                { "name": "Range", "fields": [
                    { "name": "start", "type": "Position" },
                    { "name": "kind", "type": "Kind", "optional": true }
                ] }
            ]
        }"#,
    );

    let report = validate(&registry, strict()).unwrap();

    assert!(report.warnings.is_empty());
}

#[test]
fn validate___dangling_references___are_all_reported() {
    let registry = registry(
        r#"{ "structs": [{ "name": "S", "fields": [
            { "name": "a", "type": "Missing" },
            { "name": "b", "struct": [{ "name": "c", "type": "AlsoMissing" }] },
            { "name": "d", "variant": [{ "type": "int" }, { "type": "Gone" }] }
        ] }] }"#,
    );

    let result = validate(&registry, strict());

    let Err(SchemaError::UnresolvedReferences(refs)) = result else {
        panic!("expected unresolved references, got {result:?}");
    };
    let found: Vec<(&str, &str)> = refs
        .iter()
        .map(|r| (r.location.as_str(), r.name.as_str()))
        .collect();
    assert_eq!(
        found,
        vec![
            ("S.a", "Missing"),
            ("S.b.c", "AlsoMissing"),
            ("S.d._1", "Gone"),
        ]
    );
}

#[test]
fn validate___allow_external_refs___downgrades_to_warnings() {
    let registry = registry(
        r#"{ "structs": [{ "name": "S", "fields": [{ "name": "a", "type": "External" }] }] }"#,
    );

    let report = validate(
        &registry,
        ValidationOptions {
            allow_external_refs: true,
        },
    )
    .unwrap();

    assert_eq!(report.warnings.len(), 1);
    assert!(matches!(&report.warnings[0], Warning::ExternalReference(r) if r.name == "External"));
}

#[test]
fn validate___imported_definitions___resolve_references() {
    let mut registry = registry(
        r#"{ "structs": [{ "name": "S", "fields": [{ "name": "r", "type": "Range" }] }] }"#,
    );
    let base = SchemaDocument::from_str(r#"{ "structs": [{ "name": "Range", "fields": [] }] }"#)
        .unwrap()
        .into_module("base")
        .unwrap();
    registry.import_module(base).unwrap();

    assert!(validate(&registry, strict()).is_ok());
}

#[test]
fn validate___modified_reference_without_wrapper___is_reported() {
    let registry = registry(
        r#"{ "structs": [
            { "name": "P", "fields": [] },
            { "name": "Q", "array": true, "fields": [] },
            { "name": "S", "fields": [
                { "name": "arr", "type": "P", "array": true, "optional": true },
                { "name": "list", "type": "P", "array": true },
                { "name": "maybe", "type": "P", "optional": true },
                { "name": "maybeList", "type": "Q", "array": true, "optional": true },
                { "name": "v", "variant": [{ "type": "int" }, { "type": "P", "array": true }] }
            ] }
        ] }"#,
    );

    let result = validate(&registry, strict());

    let Err(SchemaError::UnresolvedReferences(refs)) = result else {
        panic!("expected unresolved references, got {result:?}");
    };
    let found: Vec<(&str, &str)> = refs
        .iter()
        .map(|r| (r.location.as_str(), r.name.as_str()))
        .collect();
    assert_eq!(
        found,
        vec![
            ("S.arr", "OptionalPs"),
            ("S.list", "Ps"),
            ("S.maybe", "OptionalP"),
            ("S.maybeList", "OptionalQs"),
            ("S.v._1", "Ps"),
        ]
    );
}

#[test]
fn validate___declared_wrappers___satisfy_modified_references() {
    let registry = registry(
        r#"{ "structs": [
            { "name": "P", "optional": true, "array": true, "optional-array": true, "fields": [] },
            { "name": "S", "fields": [
                { "name": "arr", "type": "P", "array": true, "optional": true },
                { "name": "list", "type": "P", "array": true },
                { "name": "maybe", "type": "P", "optional": true },
                { "name": "names", "type": "string", "array": true, "optional": true }
            ] }
        ] }"#,
    );

    assert!(validate(&registry, strict()).is_ok());
}

#[test]
fn validate___missing_wrapper_with_external_refs___is_warning() {
    let registry = registry(
        r#"{ "structs": [
            { "name": "P", "fields": [] },
            { "name": "S", "fields": [{ "name": "list", "type": "P", "array": true }] }
        ] }"#,
    );

    let report = validate(
        &registry,
        ValidationOptions {
            allow_external_refs: true,
        },
    )
    .unwrap();

    assert!(matches!(
        &report.warnings[..],
        [Warning::ExternalReference(r)] if r.name == "Ps" && r.location == "S.list"
    ));
}

// Base tests

#[test]
fn validate___extends_enum___is_rejected() {
    let registry = registry(
        r#"{
            "enums": [{ "name": "E", "values": [{ "name": "A" }] }],
            "structs": [{ "name": "S", "extends": "E", "fields": [] }]
        }"#,
    );

    let result = validate(&registry, strict());

    assert!(matches!(result, Err(SchemaError::BaseNotStruct { base, .. }) if base == "E"));
}

// Cycle tests

#[test]
fn validate___field_cycle___is_reported_with_path() {
    let registry = registry(
        r#"{ "structs": [
            { "name": "A", "optional": true, "fields": [{ "name": "b", "type": "B" }] },
            { "name": "B", "fields": [{ "name": "a", "type": "A", "optional": true }] }
        ] }"#,
    );

    let result = validate(&registry, strict());

    assert!(matches!(result, Err(SchemaError::Cycle(path)) if path == vec!["A", "B", "A"]));
}

#[test]
fn validate___self_reference_through_array___is_a_cycle() {
    let registry = registry(
        r#"{ "structs": [
            { "name": "Node", "array": true, "fields": [{ "name": "children", "type": "Node", "array": true }] }
        ] }"#,
    );

    let result = validate(&registry, strict());

    assert!(matches!(result, Err(SchemaError::Cycle(path)) if path == vec!["Node", "Node"]));
}

#[test]
fn find_cycle___diamond___is_not_a_cycle() {
    let registry = registry(
        r#"{ "structs": [
            { "name": "Leaf", "fields": [] },
            { "name": "L", "fields": [{ "name": "x", "type": "Leaf" }] },
            { "name": "R", "fields": [{ "name": "x", "type": "Leaf" }] },
            { "name": "Top", "fields": [{ "name": "l", "type": "L" }, { "name": "r", "type": "R" }] }
        ] }"#,
    );

    assert_eq!(find_cycle(&registry), None);
}

// Ambiguity tests

#[test]
fn validate___overlapping_union_arms___warn() {
    let registry = registry(
        r#"{
            "structs": [
                { "name": "A", "fields": [{ "name": "x", "type": "int" }] },
                { "name": "B", "fields": [{ "name": "x", "type": "int" }, { "name": "y", "type": "int" }] }
            ],
            "variants": [{ "name": "U", "variant": [{ "type": "A" }, { "type": "B" }] }]
        }"#,
    );

    let report = validate(&registry, strict()).unwrap();

    assert_eq!(
        report.warnings,
        vec![Warning::AmbiguousArms {
            location: "U".to_string(),
            first: 0,
            second: 1,
            shape: "object with x, y".to_string(),
        }]
    );
}

#[test]
fn validate___partly_overlapping_object_arms___warn() {
    let registry = registry(
        r#"{
            "structs": [
                { "name": "TextEdit", "fields": [
                    { "name": "range", "type": "int" },
                    { "name": "newText", "type": "string" }
                ] },
                { "name": "InsertReplaceEdit", "fields": [
                    { "name": "insert", "type": "int" },
                    { "name": "newText", "type": "string" }
                ] }
            ],
            "variants": [{ "name": "Edit", "variant": [{ "type": "TextEdit" }, { "type": "InsertReplaceEdit" }] }]
        }"#,
    );

    let report = validate(&registry, strict()).unwrap();

    assert_eq!(
        report.warnings,
        vec![Warning::AmbiguousArms {
            location: "Edit".to_string(),
            first: 0,
            second: 1,
            shape: "object with range, newText, insert".to_string(),
        }]
    );
}

#[test]
fn validate___distinct_arms___do_not_warn() {
    let registry = registry(
        r#"{ "structs": [{ "name": "S", "fields": [
            { "name": "v", "variant": [{ "type": "bool" }, { "type": "int" }, { "struct": [{ "name": "k", "type": "string" }] }] }
        ] }] }"#,
    );

    let report = validate(&registry, strict()).unwrap();

    assert!(report.warnings.is_empty());
}

#[test]
fn validate___inline_variant_overlap___names_field_location() {
    let registry = registry(
        r#"{ "structs": [{ "name": "S", "fields": [
            { "name": "v", "variant": [{ "type": "int" }, { "type": "uint" }] }
        ] }] }"#,
    );

    let report = validate(&registry, strict()).unwrap();

    assert!(matches!(
        &report.warnings[..],
        [Warning::AmbiguousArms { location, .. }] if location == "S.v"
    ));
}

#[test]
fn Warning___display___describes_ambiguity() {
    let warning = Warning::AmbiguousArms {
        location: "U".to_string(),
        first: 0,
        second: 2,
        shape: "integer".to_string(),
    };

    assert_eq!(warning.to_string(), "U: arms 0 and 2 can both match integer");
}
