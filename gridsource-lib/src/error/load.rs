//! Dataset and column definition loading errors

use std::time::Duration;

/// Errors that can occur while loading a dataset or column definitions.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// HTTP error response from the remote source.
    #[error("HTTP {status}: {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body or reason.
        message: String,
    },

    /// Network error during the request.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Request timed out.
    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Failed to read a local file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Payload was not valid JSON.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The payload parsed, but its top level is not an array.
    #[error("Expected a JSON array, found {found}")]
    NotAnArray {
        /// JSON type found instead.
        found: &'static str,
    },

    /// An element of the array is not an object.
    #[error("Element {index} is not an object (found {found})")]
    NotAnObject {
        /// Position of the offending element.
        index: usize,
        /// JSON type found instead.
        found: &'static str,
    },
}

impl LoadError {
    /// Creates a new HTTP error.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    /// Returns the HTTP status code if this is an HTTP error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Returns the JSON type name of a value, for error messages.
pub(crate) fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
