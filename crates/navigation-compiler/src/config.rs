//! Navigation configuration document.
//!
//! The document has two optional top-level maps, `menus` and `breadcrumbs`.
//! Items are kept raw here and normalized while compiling.

use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::CompileError;

/// A parsed navigation configuration document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NavigationConfig {
    /// Menus by name, in document order.
    #[serde(default)]
    pub menus: IndexMap<String, MenuSpec>,
    /// Raw breadcrumb entries by name, in document order.
    #[serde(default)]
    pub breadcrumbs: IndexMap<String, Value>,
}

/// One menu: root options plus its top-level items.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MenuSpec {
    #[serde(default)]
    pub options: Map<String, Value>,
    /// Raw item configuration by name.
    #[serde(default)]
    pub items: Map<String, Value>,
    /// Other menu-level keys, applied to the root item.
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl NavigationConfig {
    /// Parse a configuration document from a YAML/JSON string.
    pub fn parse(input: &str) -> Result<Self, CompileError> {
        // YAML parser also handles JSON since JSON is valid YAML
        let root: Value =
            serde_yaml::from_str(input).map_err(|e| CompileError::Parse(e.to_string()))?;

        match root {
            Value::Null => Ok(Self::default()),
            Value::Object(_) => serde_json::from_value(root)
                .map_err(|e| CompileError::validation("document", e.to_string())),
            _ => Err(CompileError::Parse("document root must be a mapping".into())),
        }
    }

    /// Parse a configuration document from a file.
    pub fn from_file(path: &Path) -> Result<Self, CompileError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_empty_document() {
        let config = NavigationConfig::parse("").unwrap();
        assert!(config.menus.is_empty());
        assert!(config.breadcrumbs.is_empty());
    }

    #[test]
    fn parse_keeps_document_order() {
        let content = r#"
menus:
  zulu:
    items:
      second: { label: Second }
      first: { label: First }
  alpha:
    label: Alpha
breadcrumbs:
  leaf: { parent: top }
  top: ~
"#;
        let config = NavigationConfig::parse(content).unwrap();

        assert_eq!(config.menus.keys().collect::<Vec<_>>(), ["zulu", "alpha"]);
        let items: Vec<&String> = config.menus["zulu"].items.keys().collect();
        assert_eq!(items, ["second", "first"]);
        assert_eq!(config.menus["alpha"].attributes["label"], "Alpha");
        assert_eq!(config.breadcrumbs.keys().collect::<Vec<_>>(), ["leaf", "top"]);
    }

    #[test]
    fn parse_rejects_unknown_top_level_key() {
        let err = NavigationConfig::parse("menus: {}\nmenu: {}\n").unwrap_err();
        assert!(matches!(err, CompileError::Validation { .. }));
    }

    #[test]
    fn parse_rejects_invalid_yaml() {
        let err = NavigationConfig::parse("menus: [unclosed").unwrap_err();
        assert!(matches!(err, CompileError::Parse(_)));
    }

    #[test]
    fn parse_rejects_scalar_root() {
        let err = NavigationConfig::parse("just a string").unwrap_err();
        assert!(matches!(err, CompileError::Parse(_)));
    }

    #[test]
    fn parse_json_document() {
        let config = NavigationConfig::parse(r#"{"menus": {"main": {"items": {}}}}"#).unwrap();
        assert!(config.menus.contains_key("main"));
    }
}
