// src/error.rs
//! Public error type for the entire crate
//!
//! Messages never carry password, salt or key bytes.

use thiserror::Error;

pub use crate::format::TemplateError;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Secure random source failed: {0}")]
    RandomSource(String),

    #[error("Format error: {0}")]
    Template(#[from] TemplateError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed record: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<toml::de::Error> for CoreError {
    fn from(err: toml::de::Error) -> Self {
        CoreError::Config(err.to_string())
    }
}
