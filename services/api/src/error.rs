//! services/api/src/error.rs
//!
//! Defines the primary error type for the entire API service.

use crate::adapters::corpus::CorpusError;
use crate::config::ConfigError;
use tilawah_core::ports::PortError;
use tilawah_core::reference::ReferenceError;

/// The primary error type for the `api` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The built-in reference tables failed validation. Fatal at startup.
    #[error("Reference data error: {0}")]
    Reference(#[from] ReferenceError),

    /// The configured verse text could not be loaded.
    #[error("Corpus error: {0}")]
    Corpus(#[from] CorpusError),

    /// Represents an error that propagated up from the position store port.
    #[error("Service Port Error: {0}")]
    Port(#[from] PortError),

    /// Represents an error from the underlying database library.
    #[error("Database Error: {0}")]
    Database(#[from] sqlx::Error),

    /// Represents an error from running the embedded database migrations.
    #[error("Migration Error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
