//! Build-descriptor context handed to an external templating step.

use schemac_core::{DefinitionKind, Registry};
use serde::Serialize;

/// One generated type, in emission order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContextType {
    pub name: String,
    pub kind: String,

    /// Array wrapper name, when the type has one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plural: Option<String>,
}

/// Module name, dependencies and generated types of one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildContext {
    pub module: String,
    pub depends: Vec<String>,
    pub types: Vec<ContextType>,
}

impl BuildContext {
    /// Describe the definitions named by `emitted`, keeping their order.
    pub fn new<'a>(registry: &Registry, emitted: impl IntoIterator<Item = &'a str>) -> Self {
        let types = emitted
            .into_iter()
            .filter_map(|name| registry.lookup(name))
            .map(|def| ContextType {
                name: def.name().to_string(),
                kind: kind_name(def.kind()).to_string(),
                plural: def.wrappers().array.then(|| def.plural()),
            })
            .collect();

        Self {
            module: registry.module_name().to_string(),
            depends: registry.depends().to_vec(),
            types,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn kind_name(kind: DefinitionKind) -> &'static str {
    match kind {
        DefinitionKind::Enum => "enum",
        DefinitionKind::Struct => "struct",
        DefinitionKind::Union => "variant",
    }
}
