//! Error types for MinLog
//!
//! Instrumentation never fails the wrapped operation, so these errors only
//! surface at the edges: payload rendering and configuration loading.

use thiserror::Error;

/// A structured payload could not be rendered to text.
///
/// Never propagated past the formatter; callers see a fallback payload instead.
#[derive(Error, Debug)]
pub enum SerializationError {
    /// The payload's `Serialize` impl or the JSON writer rejected it
    #[error("Payload serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration could not be assembled.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable was set but could not be interpreted
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: String, value: String },

    /// A `KEY=VALUE` pair was malformed
    #[error("Malformed pair '{0}', expected KEY=VALUE")]
    MalformedPair(String),
}

impl ConfigError {
    /// Create an invalid value error
    pub fn invalid_value(name: impl Into<String>, value: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Result type alias for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;
