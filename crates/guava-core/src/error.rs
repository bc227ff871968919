//! Error types for guava-core

use thiserror::Error;

use crate::api::ApiError;
use crate::storage::StorageError;

/// Result type alias using guava-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in guava-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Local key-value storage error
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Remote API error
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Whether this error means the user has to sign in again.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::Api(error) if error.is_auth_error())
    }
}
