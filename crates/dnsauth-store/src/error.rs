//! Error types for the usage log store and service.

use thiserror::Error;

/// Errors that can occur while persisting or serving usage data.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The HTTP listener failed to bind or the server stopped with an error.
    #[error("server error: {0}")]
    Server(String),

    /// A database statement failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Configuration is invalid.
    #[error("config error: {0}")]
    Config(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
