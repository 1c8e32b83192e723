use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced during compilation.
///
/// Compilation is all-or-nothing: the first error aborts the whole pass and
/// no partial plan is returned.
#[derive(Debug, Error)]
pub enum CompileError {
    /// E2001: The configuration document is not valid YAML/JSON.
    #[error("E2001: parse error: {0}")]
    Parse(String),

    /// E2002: A value failed schema shape/type checks.
    #[error("E2002: invalid configuration at '{location}': {message}")]
    Validation { location: String, message: String },

    /// E2003: The built-in item schema could not be compiled.
    #[error("E2003: invalid item schema: {0}")]
    InvalidSchema(String),

    /// E2010: A breadcrumb names a parent that is not registered.
    #[error("E2010: parent '{parent}' of breadcrumb '{child}' is not registered")]
    MissingParent { parent: String, child: String },

    /// E2011: Following parent pointers revisited a breadcrumb.
    #[error(
        "E2011: circular reference detected with parent of breadcrumb '{name}', path: {}",
        .path.join(" -> ")
    )]
    CircularReference { name: String, path: Vec<String> },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CompileError {
    pub(crate) fn validation(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            location: location.into(),
            message: message.into(),
        }
    }

    /// Stable error code (e.g. "E2010"), if the error carries one.
    pub fn code(&self) -> Option<&'static str> {
        match self {
            Self::Parse(_) => Some("E2001"),
            Self::Validation { .. } => Some("E2002"),
            Self::InvalidSchema(_) => Some("E2003"),
            Self::MissingParent { .. } => Some("E2010"),
            Self::CircularReference { .. } => Some("E2011"),
            Self::Io(_) | Self::Json(_) => None,
        }
    }
}

/// A non-fatal issue found during compilation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileWarning {
    /// Warning code (e.g. "W2030").
    pub code: String,
    pub message: String,
    /// Where in the document the issue was found.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}
