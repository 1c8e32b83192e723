//! Configuration value resolution.
//!
//! Strings starting with `@` are expressions evaluated by the consumer of the
//! plan; `@@` escapes a literal leading `@`. Everything else passes through.

use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// Leading character marking an expression.
pub const EXPRESSION_MARKER: char = '@';

/// A configuration value after marker resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedValue {
    /// A value carried verbatim (scalar, or a structure that was not resolved).
    Literal(Value),
    /// A resolved sequence.
    Sequence(Vec<ResolvedValue>),
    /// A resolved mapping, in document order.
    Mapping(IndexMap<String, ResolvedValue>),
    /// A reference to an object registered with the assembly container.
    Reference(String),
    /// Expression source text, evaluated by the consumer.
    Expression(String),
}

impl ResolvedValue {
    /// Shorthand for a literal string.
    pub fn string(s: impl Into<String>) -> Self {
        Self::Literal(Value::String(s.into()))
    }

    /// Returns the string if this is a literal string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Literal(Value::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Whether this is a sequence (resolved or literal).
    pub fn is_sequence(&self) -> bool {
        matches!(self, Self::Sequence(_) | Self::Literal(Value::Array(_)))
    }

    /// Converts into a list of call arguments.
    ///
    /// A sequence yields its elements; any other value becomes a single
    /// argument.
    pub fn into_arguments(self) -> Vec<ResolvedValue> {
        match self {
            Self::Sequence(items) => items,
            Self::Literal(Value::Array(items)) => {
                items.into_iter().map(ResolvedValue::Literal).collect()
            }
            other => vec![other],
        }
    }
}

impl From<Value> for ResolvedValue {
    fn from(value: Value) -> Self {
        Self::Literal(value)
    }
}

impl Serialize for ResolvedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Literal(value) => value.serialize(serializer),
            Self::Sequence(items) => items.serialize(serializer),
            Self::Mapping(map) => map.serialize(serializer),
            Self::Reference(id) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("$reference", id)?;
                map.end()
            }
            Self::Expression(source) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("$expression", source)?;
                map.end()
            }
        }
    }
}

/// Resolve a raw configuration value.
///
/// Total over any input: containers are resolved recursively (keeping key
/// order and shape), `@@x` becomes the literal `@x`, `@x` becomes the
/// expression `x`.
pub fn resolve(value: &Value) -> ResolvedValue {
    match value {
        Value::Array(items) => ResolvedValue::Sequence(items.iter().map(resolve).collect()),
        Value::Object(map) => ResolvedValue::Mapping(resolve_map(map)),
        Value::String(s) => resolve_str(s),
        other => ResolvedValue::Literal(other.clone()),
    }
}

/// Resolve every value of a mapping, keeping key order.
pub fn resolve_map(map: &Map<String, Value>) -> IndexMap<String, ResolvedValue> {
    map.iter().map(|(k, v)| (k.clone(), resolve(v))).collect()
}

fn resolve_str(s: &str) -> ResolvedValue {
    match s.strip_prefix(EXPRESSION_MARKER) {
        Some(rest) if rest.starts_with(EXPRESSION_MARKER) => ResolvedValue::string(rest),
        Some(rest) => ResolvedValue::Expression(rest.to_string()),
        None => ResolvedValue::string(s),
    }
}
