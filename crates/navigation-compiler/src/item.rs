//! Normalized menu item records.
//!
//! These are produced by [`crate::schema::ItemNormalizer`] only; raw
//! configuration never deserializes into them directly.

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{Map, Value};

/// One normalized menu item.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ItemConfig {
    /// Extra factory options, merged under the explicit attributes.
    #[serde(default)]
    pub options: Map<String, Value>,
    #[serde(default)]
    pub route: Option<RouteConfig>,
    #[serde(default)]
    pub service: Option<ServiceConfig>,
    #[serde(default)]
    pub expression: Option<String>,
    /// Child items in document order.
    #[serde(default)]
    pub children: IndexMap<String, ItemConfig>,
    /// Every other key set directly on the item (label, uri, ...).
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl ItemConfig {
    /// The expression source, if set and non-empty.
    pub fn expression(&self) -> Option<&str> {
        self.expression.as_deref().filter(|s| !s.is_empty())
    }

    /// Names of the construction-driving keys that are set.
    pub(crate) fn driving_keys(&self) -> Vec<&'static str> {
        let mut keys = Vec::new();
        if self.service.is_some() {
            keys.push("service");
        }
        if self.expression().is_some() {
            keys.push("expression");
        }
        if !self.children.is_empty() {
            keys.push("children");
        }
        keys
    }
}

/// Route an item links to.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RouteConfig {
    pub name: String,
    #[serde(default)]
    pub parameters: Map<String, Value>,
    /// Boolean, or an expression string.
    #[serde(default = "default_absolute")]
    pub absolute: Value,
}

fn default_absolute() -> Value {
    Value::Bool(false)
}

/// An item provided by another object in the container.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServiceConfig {
    pub id: String,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub parameters: Option<Value>,
}

impl ServiceConfig {
    /// The factory method, if set and non-empty.
    pub fn method(&self) -> Option<&str> {
        self.method.as_deref().filter(|m| !m.is_empty())
    }
}

/// A normalized breadcrumb: an item plus an optional parent name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BreadcrumbSpec {
    /// `None` marks the top of a chain.
    pub parent: Option<String>,
    pub item: ItemConfig,
}
