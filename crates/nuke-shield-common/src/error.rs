//! Typed errors for the config-editing engine

use thiserror::Error;

/// Malformed `key:value` tag input.
///
/// Always fatal: a tag without a value would produce a filter rule that
/// protects nothing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TagError {
    /// No `:value` part, or an empty value
    #[error("tag '{0}' is missing a value, expected key:value")]
    MissingValue(String),

    /// Empty key before the colon
    #[error("tag '{0}' has an empty key, expected key:value")]
    EmptyKey(String),
}

/// Reading or writing a config document failed
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Failed to read config document '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write config document '{path}': {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Settings file and override table errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the settings file
    #[error("Failed to read settings file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the settings JSON
    #[error("Failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    /// Property override with the wrong number of elements
    #[error("property override must have 1 or 2 elements, got {0}")]
    InvalidOverride(usize),

    /// Property override with an empty property name
    #[error("property override has an empty property name")]
    EmptyOverrideProperty,
}

impl ConfigError {
    /// Create an IO error with path context
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
