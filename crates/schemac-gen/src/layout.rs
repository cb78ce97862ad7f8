//! Header declarations: typedefs, wrapper macros and routine prototypes.

use crate::error::GenerateResult;
use crate::writer::CodeWriter;
use schemac_core::{
    Definition, EnumDef, EnumLiteral, Field, Payload, Registry, Resolver, Routines, StructDef,
    UnionDef, ValueKind, VariantArm,
};

/// Writes the header half of each definition.
#[derive(Debug, Clone, Copy)]
pub struct Layout<'r> {
    registry: &'r Registry,
    resolver: Resolver<'r>,
}

impl<'r> Layout<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self {
            registry,
            resolver: Resolver::new(registry),
        }
    }

    /// Declare `def`: its typedef, then wrappers, then routine prototypes.
    pub fn declare(&self, def: &Definition, w: &mut CodeWriter) -> GenerateResult<()> {
        match def {
            Definition::Enum(e) => self.declare_enum(e, w),
            Definition::Struct(s) => self.declare_struct(s, w)?,
            Definition::Union(u) => self.declare_union(u, w),
        }
        w.blank_line();

        declare_wrappers(def, w);
        if let Definition::Enum(e) = def {
            declare_enum_conversions(e, w);
        }
        declare_routines(def.name(), def.routines(), w);
        w.blank_line();
        Ok(())
    }

    fn declare_enum(&self, e: &EnumDef, w: &mut CodeWriter) {
        w.open("typedef enum {");
        for value in &e.values {
            match &value.literal {
                EnumLiteral::Int(i) => w.line(format!("{}{} = {i},", e.name, value.name)),
                EnumLiteral::String(_) => w.line(format!("{}{},", e.name, value.name)),
            }
        }
        w.close(format!("}} {};", e.name));
    }

    fn declare_struct(&self, s: &StructDef, w: &mut CodeWriter) -> GenerateResult<()> {
        let fields = self.registry.flattened(s)?;
        w.open("typedef struct {");
        self.declare_fields(fields, w);
        w.close(format!("}} {};", s.name));
        Ok(())
    }

    fn declare_union(&self, u: &UnionDef, w: &mut CodeWriter) {
        w.open("typedef struct {");
        w.line("int tag;");
        self.declare_arms(&u.arms, w);
        w.close(format!("}} {};", u.name));
    }

    fn declare_fields(&self, fields: &[Field], w: &mut CodeWriter) {
        for field in fields {
            self.declare_member(&field.name, &field.payload, w);
        }
    }

    fn declare_member(&self, name: &str, payload: &Payload, w: &mut CodeWriter) {
        match payload {
            Payload::Type(ty) => {
                let resolved = self.resolver.resolve(ty);
                w.line(format!("{} {name};", resolved.storage));
            }
            Payload::InlineStruct(fields) => self.declare_inline_struct(name, fields, w),
            Payload::Variant(arms) => {
                w.open("struct {");
                w.line("bool has_value;");
                w.line("int tag;");
                self.declare_arms(arms, w);
                w.close(format!("}} {name};"));
            }
        }
    }

    fn declare_inline_struct(&self, name: &str, fields: &[Field], w: &mut CodeWriter) {
        w.open("struct {");
        w.line("bool has_value;");
        w.open("struct {");
        self.declare_fields(fields, w);
        w.close("};");
        w.close(format!("}} {name};"));
    }

    /// Anonymous union with one `_<tag>` member per arm.
    fn declare_arms(&self, arms: &[VariantArm], w: &mut CodeWriter) {
        w.open("union {");
        for (tag, arm) in arms.iter().enumerate() {
            let member = format!("_{tag}");
            match arm {
                VariantArm::Type(ty) => {
                    let resolved = self.resolver.resolve(ty);
                    w.line(format!("{} {member};", resolved.storage));
                }
                VariantArm::InlineStruct(fields) => self.declare_inline_struct(&member, fields, w),
            }
        }
        w.close("};");
    }
}

/// `OPTIONAL`/`DA_WITH_NAME` wrapper declarations requested by `def`.
fn declare_wrappers(def: &Definition, w: &mut CodeWriter) {
    let name = def.name();
    let wrappers = def.wrappers();
    let routines = def.routines();

    if wrappers.optional {
        declare_optional(name, routines, w);
        w.blank_line();
    }
    if wrappers.array {
        let plural = def.plural();
        w.line(format!("DA_WITH_NAME({name}, {plural});"));
        if routines.encode {
            w.line(format!("JSON_ENCODE({plural}, {plural});"));
        }
        if routines.decode {
            w.line(format!("JSON_DECODE({plural}, {plural});"));
        }
        if wrappers.optional_array {
            declare_optional(&plural, routines, w);
        }
        w.blank_line();
    }
}

fn declare_optional(name: &str, routines: Routines, w: &mut CodeWriter) {
    w.line(format!("OPTIONAL({name});"));
    if routines.encode {
        w.line(format!("OPTIONAL_JSON_ENCODE({name});"));
    }
    if routines.decode {
        w.line(format!("OPTIONAL_JSON_DECODE({name});"));
    }
}

fn declare_routines(name: &str, routines: Routines, w: &mut CodeWriter) {
    if routines.decode {
        w.line(format!("extern {name} {name}_decode(OptionalJSONValue value);"));
    }
    if routines.encode {
        w.line(format!("extern OptionalJSONValue {name}_encode({name} value);"));
    }
}

/// String enums also get conversions to and from their wire literal.
fn declare_enum_conversions(e: &EnumDef, w: &mut CodeWriter) {
    if e.kind == ValueKind::String {
        w.line(format!("extern StringView {0}_to_string({0} value);", e.name));
        w.line(format!("extern {0} {0}_parse(StringView s);", e.name));
    }
}
