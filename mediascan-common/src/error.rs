//! Common error types for mediascan

use thiserror::Error;

/// Common result type for mediascan operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across mediascan crates
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file could not be parsed
    #[error("Configuration error: {0}")]
    Config(String),

    /// Database location that cannot be turned into a SQLite URL
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
