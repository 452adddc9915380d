//! Application error type.
//!
//! Every failure maps to one of a small set of kinds so callers can tell
//! what is recoverable per identifier (fetch/shape errors) from what aborts
//! the whole run (config, catalog, persistence). `exit_code` is consumed by
//! `main.rs`.

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum AppError {
    /// Missing or malformed configuration file.
    #[error("Config error: {0}")]
    Config(String),

    /// Missing or malformed tag catalog document.
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Invalid command-line usage or arguments.
    #[error("Usage error: {0}")]
    Usage(String),

    /// Network, transport, HTTP, or body-decode failure for one identifier.
    #[error("Fetch error for '{item}': {message}")]
    Fetch { item: String, message: String },

    /// Response payload matched neither known vendor shape.
    #[error("Unrecognized response shape: {0}")]
    UnrecognizedShape(String),

    /// Failure reading or writing a persisted table.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// A scrape run attempted identifiers but produced zero rows.
    #[error("Empty run: {0}")]
    EmptyRun(String),
}

impl AppError {
    pub fn fetch(item: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Fetch {
            item: item.into(),
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Config(_) | AppError::Catalog(_) | AppError::Usage(_) => 2,
            AppError::Persistence(_) => 3,
            AppError::Fetch { .. } | AppError::UnrecognizedShape(_) | AppError::EmptyRun(_) => 4,
        }
    }
}
