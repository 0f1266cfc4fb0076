//! Error types for Chatkit components.

use std::path::PathBuf;

use chatkit_core::ObjectError;

/// Result type alias for component operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by component lifecycle and configuration.
///
/// Navigation and toggling never fail; only attaching components to a tree
/// and loading configuration can.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Object-tree error.
    #[error("Object error: {0}")]
    Object(#[from] ObjectError),

    /// The component is already attached to a tree.
    #[error("Component '{tag}' is already connected")]
    AlreadyConnected { tag: String },

    /// The operation needs the component to be attached to a tree.
    #[error("Component '{tag}' is not connected")]
    NotConnected { tag: String },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parsing error.
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// File I/O error.
    #[error("Failed to read configuration '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A field holds a value the components cannot use.
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl ConfigError {
    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a value error.
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}
