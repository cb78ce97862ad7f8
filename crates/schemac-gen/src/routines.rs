//! Source bodies: wrapper instantiations and the `_decode` / `_encode` routines.
//!
//! The routines mirror the schema's recursive structure. Every nested block
//! sits four columns deeper than its parent and names its JSON temporary
//! after that column (`v4`, `v8`, ...), so nested temporaries never shadow
//! each other.
//!
//! Variant members are decoded by evaluating every arm's structural match
//! condition, asserting that exactly one arm matched, and then decoding that
//! arm only.

use crate::error::GenerateResult;
use crate::writer::CodeWriter;
use schemac_core::{
    BuiltinKind, Definition, EnumDef, EnumLiteral, Field, Payload, Registry, Resolver, Routines,
    Shape, StructDef, TypeRef, UnionDef, ValueKind, VariantArm, builtin, c_string,
};

/// Writes the source half of each definition.
#[derive(Debug, Clone, Copy)]
pub struct RoutineGen<'r> {
    registry: &'r Registry,
    resolver: Resolver<'r>,
}

/// Built-ins whose variant arms are extracted straight from the JSON value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Primitive {
    Bool,
    Int,
    String,
    Null,
    Empty,
}

fn primitive(ty: &TypeRef) -> Option<Primitive> {
    if ty.array || ty.optional {
        return None;
    }
    match builtin(&ty.name)?.kind {
        BuiltinKind::Bool => Some(Primitive::Bool),
        BuiltinKind::Int => Some(Primitive::Int),
        BuiltinKind::String => Some(Primitive::String),
        BuiltinKind::Null => Some(Primitive::Null),
        BuiltinKind::Empty => Some(Primitive::Empty),
        _ => None,
    }
}

impl<'r> RoutineGen<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self {
            registry,
            resolver: Resolver::new(registry),
        }
    }

    /// Define everything `def` declared in the header.
    pub fn define(&self, def: &Definition, w: &mut CodeWriter) -> GenerateResult<()> {
        define_wrappers(def, w);
        match def {
            Definition::Enum(e) => self.define_enum(e, w),
            Definition::Struct(s) => self.define_struct(s, w)?,
            Definition::Union(u) => self.define_union(u, w)?,
        }
        Ok(())
    }

    // ========================================================================
    // Enums
    // ========================================================================

    fn define_enum(&self, e: &EnumDef, w: &mut CodeWriter) {
        let name = &e.name;
        match e.kind {
            ValueKind::String => {
                w.line(format!("StringView {name}_to_string({name} value)"));
                w.open("{");
                w.line("switch (value) {");
                for value in &e.values {
                    if let EnumLiteral::String(literal) = &value.literal {
                        w.line(format!(
                            "case {name}{}: return sv_from({});",
                            value.name,
                            c_string(literal)
                        ));
                    }
                }
                w.line("default: UNREACHABLE();");
                w.line("}");
                w.close("}");
                w.blank_line();

                w.line(format!("{name} {name}_parse(StringView s)"));
                w.open("{");
                for value in &e.values {
                    if let EnumLiteral::String(literal) = &value.literal {
                        w.line(format!(
                            "if (sv_eq_cstr(s, {})) return {name}{};",
                            c_string(literal),
                            value.name
                        ));
                    }
                }
                w.line("UNREACHABLE();");
                w.close("}");
                w.blank_line();

                if e.routines.decode {
                    w.line(format!("{name} {name}_decode(OptionalJSONValue json)"));
                    w.open("{");
                    w.line("assert(json.has_value);");
                    w.line("assert(json.value.type == JSON_TYPE_STRING);");
                    w.line(format!("return {name}_parse(json.value.string);"));
                    w.close("}");
                    w.blank_line();
                }
                if e.routines.encode {
                    w.line(format!("OptionalJSONValue {name}_encode({name} value)"));
                    w.open("{");
                    w.line(format!(
                        "RETURN_VALUE(JSONValue, json_string({name}_to_string(value)));"
                    ));
                    w.close("}");
                    w.blank_line();
                }
            }
            ValueKind::Int => {
                if e.routines.decode {
                    w.line(format!("{name} {name}_decode(OptionalJSONValue json)"));
                    w.open("{");
                    w.line("assert(json.has_value);");
                    w.line("assert(json.value.type == JSON_TYPE_INT);");
                    w.line(format!("return ({name}) json_int_value(json.value);"));
                    w.close("}");
                    w.blank_line();
                }
                if e.routines.encode {
                    w.line(format!("OptionalJSONValue {name}_encode({name} value)"));
                    w.open("{");
                    w.line("RETURN_VALUE(JSONValue, json_int((int) value));");
                    w.close("}");
                    w.blank_line();
                }
            }
        }
    }

    // ========================================================================
    // Structs
    // ========================================================================

    fn define_struct(&self, s: &StructDef, w: &mut CodeWriter) -> GenerateResult<()> {
        let name = &s.name;
        let fields = self.registry.flattened(s)?;

        if s.routines.decode {
            w.line(format!("{name} {name}_decode(OptionalJSONValue v4)"));
            w.open("{");
            w.line("assert(v4.has_value);");
            w.line("assert(v4.value.type == JSON_TYPE_OBJECT);");
            w.line(format!("{name} value = {{0}};"));
            for field in fields {
                self.decode_field(field, "v4", &format!("value.{}", field.name), w)?;
            }
            w.line("return value;");
            w.close("}");
            w.blank_line();
        }

        if s.routines.encode {
            w.line(format!("OptionalJSONValue {name}_encode({name} value)"));
            w.open("{");
            w.line("JSONValue v4 = json_object();");
            for field in fields {
                self.encode_field(field, "v4", &format!("value.{}", field.name), w)?;
            }
            w.line("RETURN_VALUE(JSONValue, v4);");
            w.close("}");
            w.blank_line();
        }
        Ok(())
    }

    // ========================================================================
    // Unions
    // ========================================================================

    fn define_union(&self, u: &UnionDef, w: &mut CodeWriter) -> GenerateResult<()> {
        let name = &u.name;

        if u.routines.decode {
            w.line(format!("{name} {name}_decode(OptionalJSONValue v4)"));
            w.open("{");
            w.line(format!("{name} value = {{0}};"));
            w.line("assert(v4.has_value);");
            self.decode_arms(&u.arms, "v4", "value", w)?;
            w.line("return value;");
            w.close("}");
            w.blank_line();
        }

        if u.routines.encode {
            w.line(format!("OptionalJSONValue {name}_encode({name} value)"));
            w.open("{");
            w.line("JSONValue v4 = {0};");
            self.encode_arms(&u.arms, "v4", "value", w)?;
            w.line("RETURN_VALUE(JSONValue, v4);");
            w.close("}");
            w.blank_line();
        }
        Ok(())
    }

    // ========================================================================
    // Decoding
    // ========================================================================

    /// Decode the member `field.name` of the object held in `json` into `target`.
    fn decode_field(
        &self,
        field: &Field,
        json: &str,
        target: &str,
        w: &mut CodeWriter,
    ) -> GenerateResult<()> {
        w.open("{");
        let var = w.var();
        w.line(format!(
            "OptionalJSONValue {var} = json_get(&{json}.value, {});",
            c_string(&field.name)
        ));

        match &field.payload {
            Payload::Type(ty) => {
                let resolved = self.resolver.resolve(ty);
                w.line(format!("{target} = {}({var});", resolved.decode_fn()));
            }
            Payload::InlineStruct(fields) => {
                self.open_presence(field.optional, &var, w);
                w.line(format!("{target}.has_value = true;"));
                for nested in fields {
                    self.decode_field(nested, &var, &format!("{target}.{}", nested.name), w)?;
                }
                self.close_presence(field.optional, w);
            }
            Payload::Variant(arms) => {
                self.open_presence(field.optional, &var, w);
                w.line(format!("{target}.has_value = true;"));
                self.decode_arms(arms, &var, target, w)?;
                self.close_presence(field.optional, w);
            }
        }

        w.close("}");
        Ok(())
    }

    fn open_presence(&self, optional: bool, var: &str, w: &mut CodeWriter) {
        if optional {
            w.open(format!("if ({var}.has_value) {{"));
        } else {
            w.line(format!("assert({var}.has_value);"));
        }
    }

    fn close_presence(&self, optional: bool, w: &mut CodeWriter) {
        if optional {
            w.close("}");
        }
    }

    /// Select the single arm matching `var` and decode it into `target`.
    fn decode_arms(
        &self,
        arms: &[VariantArm],
        var: &str,
        target: &str,
        w: &mut CodeWriter,
    ) -> GenerateResult<()> {
        let mut flags = Vec::with_capacity(arms.len());
        for (tag, arm) in arms.iter().enumerate() {
            let shape = Shape::of_arm(self.registry, arm)?;
            let flag = format!("{var}_{tag}");
            w.line(format!("bool {flag} = {};", shape.c_condition(var)));
            flags.push(flag);
        }
        w.line(format!("assert({} == 1);", flags.join(" + ")));

        for (tag, arm) in arms.iter().enumerate() {
            if tag == 0 {
                w.open(format!("if ({}) {{", flags[tag]));
            } else {
                w.dedent();
                w.open(format!("}} else if ({}) {{", flags[tag]));
            }
            w.line(format!("{target}.tag = {tag};"));
            let member = format!("{target}._{tag}");
            match arm {
                VariantArm::Type(ty) => match primitive(ty) {
                    Some(Primitive::Bool) => w.line(format!("{member} = {var}.value.boolean;")),
                    Some(Primitive::Int) => {
                        w.line(format!("{member} = json_int_value({var}.value);"))
                    }
                    Some(Primitive::String) => w.line(format!("{member} = {var}.value.string;")),
                    Some(Primitive::Null) => w.line(format!("{member} = (Null) {{}};")),
                    Some(Primitive::Empty) => w.line(format!("{member} = (Empty) {{}};")),
                    None => {
                        let resolved = self.resolver.resolve(ty);
                        w.line(format!("{member} = {}({var});", resolved.decode_fn()));
                    }
                },
                VariantArm::InlineStruct(fields) => {
                    w.line(format!("{member}.has_value = true;"));
                    for nested in fields {
                        self.decode_field(nested, var, &format!("{member}.{}", nested.name), w)?;
                    }
                }
            }
        }
        w.close("}");
        Ok(())
    }

    // ========================================================================
    // Encoding
    // ========================================================================

    /// Encode `target` as the member `field.name` of the object held in `object`.
    fn encode_field(
        &self,
        field: &Field,
        object: &str,
        target: &str,
        w: &mut CodeWriter,
    ) -> GenerateResult<()> {
        match &field.payload {
            Payload::Type(ty) => {
                let resolved = self.resolver.resolve(ty);
                w.line(format!(
                    "json_optional_set(&{object}, {}, {}({target}));",
                    c_string(&field.name),
                    resolved.encode_fn()
                ));
            }
            Payload::InlineStruct(fields) => {
                if field.optional {
                    w.open(format!("if ({target}.has_value) {{"));
                } else {
                    w.open("{");
                }
                let var = w.var();
                w.line(format!("JSONValue {var} = json_object();"));
                for nested in fields {
                    self.encode_field(nested, &var, &format!("{target}.{}", nested.name), w)?;
                }
                w.line(format!("json_set(&{object}, {}, {var});", c_string(&field.name)));
                w.close("}");
            }
            Payload::Variant(arms) => {
                if field.optional {
                    w.open(format!("if ({target}.has_value) {{"));
                } else {
                    w.line(format!("assert({target}.has_value);"));
                    w.open("{");
                }
                let var = w.var();
                w.line(format!("JSONValue {var} = {{0}};"));
                self.encode_arms(arms, &var, target, w)?;
                w.line(format!("json_set(&{object}, {}, {var});", c_string(&field.name)));
                w.close("}");
            }
        }
        Ok(())
    }

    /// Switch over `target.tag`, storing the active arm's JSON in `var`.
    fn encode_arms(
        &self,
        arms: &[VariantArm],
        var: &str,
        target: &str,
        w: &mut CodeWriter,
    ) -> GenerateResult<()> {
        w.line(format!("switch ({target}.tag) {{"));
        for (tag, arm) in arms.iter().enumerate() {
            let member = format!("{target}._{tag}");
            w.open(format!("case {tag}:"));
            match arm {
                VariantArm::Type(ty) => match primitive(ty) {
                    Some(Primitive::Bool) => w.line(format!("{var} = json_bool({member});")),
                    Some(Primitive::Int) => w.line(format!("{var} = json_int({member});")),
                    Some(Primitive::String) => w.line(format!("{var} = json_string({member});")),
                    Some(Primitive::Null) => w.line(format!("{var} = json_null();")),
                    Some(Primitive::Empty) => w.line(format!("{var} = json_object();")),
                    None => {
                        let resolved = self.resolver.resolve(ty);
                        w.line(format!("{var} = {}({member}).value;", resolved.encode_fn()));
                    }
                },
                VariantArm::InlineStruct(fields) => {
                    w.line(format!("{var} = json_object();"));
                    for nested in fields {
                        self.encode_field(nested, var, &format!("{member}.{}", nested.name), w)?;
                    }
                }
            }
            w.line("break;");
            w.dedent();
        }
        w.open("default:");
        w.line("UNREACHABLE();");
        w.dedent();
        w.line("}");
        Ok(())
    }
}

/// Instantiate the wrapper routines declared by `declare_wrappers`.
fn define_wrappers(def: &Definition, w: &mut CodeWriter) {
    let name = def.name();
    let wrappers = def.wrappers();
    let routines = def.routines();

    if wrappers.optional {
        define_optional(name, routines, w);
        w.blank_line();
    }
    if wrappers.array {
        let plural = def.plural();
        w.line(format!("DA_IMPL({name});"));
        if routines.encode {
            w.line(format!("DA_JSON_ENCODE_IMPL({name}, {plural}, elements);"));
        }
        if routines.decode {
            w.line(format!("DA_JSON_DECODE_IMPL({name}, {plural}, elements);"));
        }
        if wrappers.optional_array {
            define_optional(&plural, routines, w);
        }
        w.blank_line();
    }
}

fn define_optional(name: &str, routines: Routines, w: &mut CodeWriter) {
    if routines.encode {
        w.line(format!("OPTIONAL_JSON_ENCODE_IMPL({name});"));
    }
    if routines.decode {
        w.line(format!("OPTIONAL_JSON_DECODE_IMPL({name});"));
    }
}
