//! Error types for the model registry and documentation build

use thiserror::Error;

/// Result type for documentation operations
pub type Result<T> = std::result::Result<T, ApiDocError>;

/// Documentation build errors
#[derive(Error, Debug)]
pub enum ApiDocError {
    #[error("Definition of type \"{type_name}\" can't be generated, no describer supports it.")]
    UnsupportedType { type_name: String },

    #[error("Invalid type reference: {0:?}")]
    InvalidTypeReference(String),

    #[error("Unknown class: {0}")]
    UnknownClass(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config_crate::ConfigError),
}
