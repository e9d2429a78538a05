use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for embedding loading.
///
/// Every repository operation is terminal on error: there is no partial
/// result and nothing is retried.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoaderError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid {field} '{value}': expected {expected}")]
    Validation {
        field: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error(
        "Artifact not found: {}. Generate it and place it at that path manually.",
        .path.display()
    )]
    NotFound { path: PathBuf },

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Shape mismatch: title has {title_rows} rows but text has {text_rows} rows")]
    ShapeMismatch { title_rows: usize, text_rows: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl LoaderError {
    pub fn validation(field: &'static str, value: &str, expected: &'static str) -> Self {
        LoaderError::Validation {
            field,
            value: value.to_string(),
            expected,
        }
    }
}

impl From<toml::de::Error> for LoaderError {
    fn from(err: toml::de::Error) -> Self {
        LoaderError::Config(err.to_string())
    }
}

impl From<bincode::Error> for LoaderError {
    fn from(err: bincode::Error) -> Self {
        LoaderError::Deserialization(err.to_string())
    }
}

/// A specialized `Result` type for loader operations.
pub type Result<T> = std::result::Result<T, LoaderError>;
