#![allow(non_snake_case)]

use super::*;

fn arm(name: &str) -> VariantArm {
    VariantArm::Type(TypeRef::named(name))
}

// TypeRef tests

#[test]
fn TypeRef___required___clears_optional_only() {
    let ty = TypeRef {
        name: "Range".to_string(),
        array: true,
        optional: true,
    };

    let required = ty.required();

    assert!(!required.optional);
    assert!(required.array);
    assert_eq!(required.name, "Range");
}

#[test]
fn Field___typed___inherits_optional_from_reference() {
    let field = Field::typed(
        "label",
        TypeRef {
            name: "string".to_string(),
            array: false,
            optional: true,
        },
    );

    assert!(field.optional);
}

// Definition tests

#[test]
fn Definition___plural___defaults_to_name_plus_s() {
    let def = Definition::Struct(StructDef::new("Range", vec![], vec![]));

    assert_eq!(def.plural(), "Ranges");
}

#[test]
fn Definition___plural___honours_explicit_name() {
    let mut s = StructDef::new("Entry", vec![], vec![]);
    s.wrappers.plural = Some("Entries".to_string());

    assert_eq!(Definition::Struct(s).plural(), "Entries");
}

#[test]
fn Definition___references___lists_bases_then_nested_types() {
    let s = StructDef::new(
        "Derived",
        vec!["Base".to_string()],
        vec![
            Field::typed("a", TypeRef::named("Range")),
            Field {
                name: "b".to_string(),
                optional: false,
                payload: Payload::InlineStruct(vec![Field::typed("c", TypeRef::named("int"))]),
            },
            Field {
                name: "d".to_string(),
                optional: true,
                payload: Payload::Variant(vec![
                    arm("bool"),
                    VariantArm::InlineStruct(vec![Field::typed("e", TypeRef::named("Kind"))]),
                ]),
            },
        ],
    );

    let def = Definition::Struct(s);

    assert_eq!(def.references(), vec!["Base", "Range", "int", "bool", "Kind"]);
}

#[test]
fn Definition___references___enum_has_none() {
    let def = Definition::Enum(EnumDef {
        name: "Kind".to_string(),
        kind: ValueKind::Int,
        values: vec![EnumValue {
            name: "One".to_string(),
            literal: EnumLiteral::Int(1),
        }],
        wrappers: Wrappers::default(),
        routines: Routines::default(),
    });

    assert!(def.references().is_empty());
    assert_eq!(def.kind(), DefinitionKind::Enum);
}

// EnumDef tests

#[test]
fn EnumDef___by_literal___finds_matching_value() {
    let e = EnumDef {
        name: "State".to_string(),
        kind: ValueKind::String,
        values: vec![
            EnumValue {
                name: "Open".to_string(),
                literal: EnumLiteral::String("open".to_string()),
            },
            EnumValue {
                name: "Closed".to_string(),
                literal: EnumLiteral::String("closed".to_string()),
            },
        ],
        wrappers: Wrappers::default(),
        routines: Routines::default(),
    };

    let found = e.by_literal(&EnumLiteral::String("closed".to_string()));

    assert_eq!(found.map(|v| v.name.as_str()), Some("Closed"));
    assert!(e.by_name("Pending").is_none());
}

// Module tests

#[test]
fn Module___into_definitions___orders_enums_unions_structs() {
    let module = Module {
        name: "m".to_string(),
        depends: vec![],
        enums: vec![EnumDef {
            name: "E".to_string(),
            kind: ValueKind::String,
            values: vec![EnumValue {
                name: "A".to_string(),
                literal: EnumLiteral::String("a".to_string()),
            }],
            wrappers: Wrappers::default(),
            routines: Routines::default(),
        }],
        structs: vec![StructDef::new("S", vec![], vec![])],
        unions: vec![UnionDef {
            name: "U".to_string(),
            arms: vec![arm("int")],
            wrappers: Wrappers::default(),
            routines: Routines::default(),
        }],
    };

    let names: Vec<String> = module
        .into_definitions()
        .iter()
        .map(|d| d.name().to_string())
        .collect();

    assert_eq!(names, vec!["E", "U", "S"]);
}

#[test]
fn Routines___default___enables_both() {
    let r = Routines::default();

    assert!(r.decode && r.encode);
}
