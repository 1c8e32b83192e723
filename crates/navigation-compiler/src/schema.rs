//! Item schema and normalization.
//!
//! The schema is a JSON Schema document whose `children` property refers
//! back to the item definition, so a whole item tree is validated in one
//! pass. Compiled validators are built once per process and per strictness
//! mode, then shared read-only.

use std::sync::OnceLock;

use jsonschema::Validator;
use serde_json::{json, Map, Value};

use crate::error::CompileError;
use crate::item::{BreadcrumbSpec, ItemConfig};

static STRICT_TREE: OnceLock<Result<SchemaTree, String>> = OnceLock::new();
static LENIENT_TREE: OnceLock<Result<SchemaTree, String>> = OnceLock::new();

/// Compiled validators for menu items and breadcrumbs.
pub struct SchemaTree {
    item: Validator,
    breadcrumb: Validator,
}

impl SchemaTree {
    /// Get the process-wide schema tree, building it on first use.
    pub fn shared(strict: bool) -> Result<&'static SchemaTree, CompileError> {
        let cell = if strict { &STRICT_TREE } else { &LENIENT_TREE };
        cell.get_or_init(|| Self::build(strict))
            .as_ref()
            .map_err(|e| CompileError::InvalidSchema(e.clone()))
    }

    fn build(strict: bool) -> Result<Self, String> {
        tracing::debug!(strict, "building item schema tree");

        let item = Validator::new(&item_schema(strict))
            .map_err(|e| format!("item schema: {}", e))?;
        let breadcrumb = Validator::new(&breadcrumb_schema(strict))
            .map_err(|e| format!("breadcrumb schema: {}", e))?;

        Ok(Self { item, breadcrumb })
    }
}

/// Properties accepted on every item.
fn item_properties() -> Map<String, Value> {
    let object = json!({ "type": "object" });
    let optional_string = json!({ "type": ["string", "null"] });

    let properties = json!({
        "label": optional_string,
        "uri": optional_string,
        "translationDomain": optional_string,
        "attributes": object,
        "linkAttributes": object,
        "childrenAttributes": object,
        "labelAttributes": object,
        "extras": object,
        "display": { "type": "boolean" },
        "displayChildren": { "type": "boolean" },
        "current": { "type": ["boolean", "null"] },
        "options": object,
        "route": {
            "oneOf": [
                { "type": "string", "minLength": 1 },
                {
                    "type": "object",
                    "required": ["name"],
                    "additionalProperties": false,
                    "properties": {
                        "name": { "type": "string", "minLength": 1 },
                        "parameters": { "type": "object" },
                        "absolute": { "type": ["boolean", "string"] }
                    }
                },
                { "type": "null" }
            ]
        },
        "service": {
            "oneOf": [
                { "type": "string", "minLength": 1 },
                {
                    "type": "object",
                    "required": ["id"],
                    "additionalProperties": false,
                    "properties": {
                        "id": { "type": "string", "minLength": 1 },
                        "method": { "type": ["string", "null"] },
                        "parameters": true
                    }
                },
                { "type": "null" }
            ]
        },
        "expression": optional_string,
        "children": {
            "type": ["object", "null"],
            "additionalProperties": { "$ref": "#/$defs/item" }
        }
    });

    match properties {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

fn item_definition(strict: bool, properties: Map<String, Value>) -> Value {
    json!({
        "type": ["object", "null"],
        "additionalProperties": !strict,
        "properties": properties
    })
}

/// The JSON Schema for a single menu item.
pub fn item_schema(strict: bool) -> Value {
    json!({
        "$defs": { "item": item_definition(strict, item_properties()) },
        "$ref": "#/$defs/item"
    })
}

/// The JSON Schema for a breadcrumb: an item plus `parent`.
pub fn breadcrumb_schema(strict: bool) -> Value {
    let mut properties = item_properties();
    properties.insert("parent".into(), json!({ "type": ["string", "null"] }));

    let mut schema = item_definition(strict, properties);
    schema["$defs"] = json!({ "item": item_definition(strict, item_properties()) });
    schema
}

/// Normalizes raw item configuration into typed records.
#[derive(Debug, Clone, Copy)]
pub struct ItemNormalizer {
    strict: bool,
}

impl Default for ItemNormalizer {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ItemNormalizer {
    /// In strict mode unknown item keys are rejected.
    pub fn new(strict: bool) -> Self {
        Self { strict }
    }

    /// Validate and normalize one item, including all its children.
    ///
    /// `location` is used in error messages (e.g. `menus.main.items.home`).
    pub fn normalize_item(&self, location: &str, raw: &Value) -> Result<ItemConfig, CompileError> {
        let tree = SchemaTree::shared(self.strict)?;
        tree.item
            .validate(raw)
            .map_err(|e| CompileError::validation(location, e.to_string()))?;

        into_item(location, expand_shorthands(raw.clone()))
    }

    /// Validate and normalize one breadcrumb entry.
    pub fn normalize_breadcrumb(
        &self,
        location: &str,
        raw: &Value,
    ) -> Result<BreadcrumbSpec, CompileError> {
        let tree = SchemaTree::shared(self.strict)?;
        tree.breadcrumb
            .validate(raw)
            .map_err(|e| CompileError::validation(location, e.to_string()))?;

        let mut value = expand_shorthands(raw.clone());
        let parent = match &mut value {
            Value::Object(map) => match map.shift_remove("parent") {
                Some(Value::String(parent)) => Some(parent),
                _ => None,
            },
            _ => None,
        };

        Ok(BreadcrumbSpec {
            parent,
            item: into_item(location, value)?,
        })
    }
}

fn into_item(location: &str, value: Value) -> Result<ItemConfig, CompileError> {
    serde_json::from_value(value).map_err(|e| CompileError::validation(location, e.to_string()))
}

/// Apply defaults and expand string shorthands, recursing into children.
fn expand_shorthands(value: Value) -> Value {
    let mut map = match value {
        Value::Object(map) => map,
        Value::Null => return Value::Object(Map::new()),
        other => return other,
    };

    if let Some(Value::String(name)) = map.get("route") {
        let route = json!({ "name": name });
        map.insert("route".into(), route);
    }
    if let Some(Value::String(id)) = map.get("service") {
        let service = json!({ "id": id });
        map.insert("service".into(), service);
    }

    match map.get_mut("children") {
        Some(Value::Object(children)) => {
            for child in children.values_mut() {
                *child = expand_shorthands(child.take());
            }
        }
        Some(children @ Value::Null) => *children = Value::Object(Map::new()),
        _ => {}
    }

    Value::Object(map)
}
