//! Type registry

use crate::builtin::builtin;
use crate::error::{SchemaError, SchemaResult, UnresolvedReference};
use crate::model::{Definition, Field, Module, StructDef};
use indexmap::IndexMap;

/// What a type name refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Enum,
    Struct,
    Union,
    BuiltIn,
    Unknown,
}

#[derive(Debug)]
struct Entry {
    definition: Definition,
    imported: bool,
}

/// All definitions visible while generating one module.
///
/// Local definitions keep registration order, which is the order the
/// generator visits them. Imported definitions come from `depends` modules:
/// they resolve like local ones but are never emitted.
#[derive(Debug, Default)]
pub struct Registry {
    module: String,
    depends: Vec<String>,
    entries: IndexMap<String, Entry>,
}

impl Registry {
    /// Create an empty registry for the named module.
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            ..Self::default()
        }
    }

    /// Build a registry holding every definition of `module`.
    pub fn from_module(module: Module) -> SchemaResult<Self> {
        let mut registry = Self::new(module.name.clone());
        registry.depends = module.depends.clone();
        for def in module.into_definitions() {
            registry.register(def)?;
        }
        Ok(registry)
    }

    /// Register a local definition.
    pub fn register(&mut self, definition: Definition) -> SchemaResult<()> {
        self.insert(definition, false)
    }

    /// Register a definition owned by a dependency module.
    pub fn import(&mut self, definition: Definition) -> SchemaResult<()> {
        self.insert(definition, true)
    }

    /// Import every definition of a dependency module.
    pub fn import_module(&mut self, module: Module) -> SchemaResult<()> {
        tracing::debug!(module = %module.name, "importing definitions");
        for def in module.into_definitions() {
            self.import(def)?;
        }
        Ok(())
    }

    fn insert(&mut self, definition: Definition, imported: bool) -> SchemaResult<()> {
        let name = definition.name().to_string();
        if self.entries.contains_key(&name) {
            return Err(SchemaError::DuplicateDefinition(name));
        }
        self.entries.insert(
            name,
            Entry {
                definition,
                imported,
            },
        );
        Ok(())
    }

    /// Name of the module being generated.
    pub fn module_name(&self) -> &str {
        &self.module
    }

    /// Modules whose headers the generated header includes.
    pub fn depends(&self) -> &[String] {
        &self.depends
    }

    pub fn lookup(&self, name: &str) -> Option<&Definition> {
        self.entries.get(name).map(|e| &e.definition)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// True for definitions registered through [`Registry::import`].
    pub fn is_imported(&self, name: &str) -> bool {
        self.entries.get(name).is_some_and(|e| e.imported)
    }

    /// Classify a type name. Built-ins win over definitions.
    pub fn kind_of(&self, name: &str) -> TypeKind {
        if builtin(name).is_some() {
            return TypeKind::BuiltIn;
        }
        match self.lookup(name) {
            Some(Definition::Enum(_)) => TypeKind::Enum,
            Some(Definition::Struct(_)) => TypeKind::Struct,
            Some(Definition::Union(_)) => TypeKind::Union,
            None => TypeKind::Unknown,
        }
    }

    /// Local definitions in registration order.
    pub fn definitions(&self) -> impl Iterator<Item = &Definition> {
        self.entries
            .values()
            .filter(|e| !e.imported)
            .map(|e| &e.definition)
    }

    /// Local and imported definitions in registration order.
    pub fn all_definitions(&self) -> impl Iterator<Item = &Definition> {
        self.entries.values().map(|e| &e.definition)
    }

    /// Flattened field list of the struct named `name`.
    pub fn all_fields(&self, name: &str) -> SchemaResult<&[Field]> {
        match self.lookup(name) {
            Some(Definition::Struct(def)) => self.flattened(def),
            Some(_) => Err(SchemaError::BaseNotStruct {
                definition: name.to_string(),
                base: name.to_string(),
            }),
            None => Err(SchemaError::UnknownDefinition(name.to_string())),
        }
    }

    /// Bases' fields (transitively, in `extends` order) followed by own fields.
    ///
    /// Computed once per struct. A field redeclared further down the chain
    /// replaces the inherited one in place.
    pub fn flattened<'a>(&'a self, def: &'a StructDef) -> SchemaResult<&'a [Field]> {
        let mut stack = Vec::new();
        self.flatten_guarded(def, &mut stack)
    }

    fn flatten_guarded<'a>(
        &'a self,
        def: &'a StructDef,
        stack: &mut Vec<String>,
    ) -> SchemaResult<&'a [Field]> {
        if let Some(fields) = def.all_fields.get() {
            return Ok(fields);
        }
        if let Some(pos) = stack.iter().position(|n| n == &def.name) {
            let mut cycle = stack[pos..].to_vec();
            cycle.push(def.name.clone());
            return Err(SchemaError::Cycle(cycle));
        }
        stack.push(def.name.clone());

        let mut fields: Vec<Field> = Vec::new();
        for base in &def.extends {
            let base_def = match self.lookup(base) {
                Some(Definition::Struct(b)) => b,
                Some(_) => {
                    return Err(SchemaError::BaseNotStruct {
                        definition: def.name.clone(),
                        base: base.clone(),
                    });
                }
                None => {
                    return Err(SchemaError::UnresolvedReferences(vec![
                        UnresolvedReference {
                            location: format!("{}.extends", def.name),
                            name: base.clone(),
                        },
                    ]));
                }
            };
            for field in self.flatten_guarded(base_def, stack)? {
                merge_field(&mut fields, field, &def.name);
            }
        }
        for field in &def.fields {
            merge_field(&mut fields, field, &def.name);
        }

        stack.pop();
        Ok(def.all_fields.get_or_init(|| fields))
    }
}

fn merge_field(fields: &mut Vec<Field>, field: &Field, owner: &str) {
    match fields.iter_mut().find(|f| f.name == field.name) {
        Some(existing) => {
            tracing::debug!(owner, field = %field.name, "field redeclared, replacing inherited");
            *existing = field.clone();
        }
        None => fields.push(field.clone()),
    }
}
