//! Generator settings, loadable from a JSON file and overridable from the CLI.
use std::path::Path;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::semantics::TypeKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Kind assumed for property types nothing can resolve.
    pub unresolved_kind: TypeKind,
    /// Extra names to treat as reference types.
    pub reference_types: Vec<String>,
    /// Extra names to treat as value types. Wins over `reference_types`.
    pub value_types: Vec<String>,
    /// Spaces per indentation level in printed source.
    pub indent: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            unresolved_kind: TypeKind::Value,
            reference_types: Vec::new(),
            value_types: Vec::new(),
            indent: 4,
        }
    }
}

impl GeneratorConfig {
    pub fn load(path: &Path) -> Result<Self> {
        crate::path_de::read_json(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_documents_keep_defaults() {
        let config: GeneratorConfig =
            crate::path_de::from_str_with_path(r#"{"unresolved_kind": "reference"}"#).unwrap();
        assert_eq!(config.unresolved_kind, TypeKind::Reference);
        assert_eq!(config.indent, 4);
        assert!(config.reference_types.is_empty());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = crate::path_de::from_str_with_path::<GeneratorConfig>(r#"{"indnet": 2}"#).unwrap_err();
        assert!(err.to_string().contains("indnet"));
    }
}
