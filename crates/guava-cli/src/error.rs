use std::io;

use guava_core::api::ApiError;
use guava_core::storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(guava_core::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("{0}")]
    Api(String),
    #[error("Not signed in or session expired. Run `guava auth login` first.")]
    NotSignedIn,
    #[error("Service not found: {0}")]
    ServiceNotFound(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<ApiError> for CliError {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::Storage(error) => Self::Storage(error),
            error if error.is_auth_error() => Self::NotSignedIn,
            ApiError::InvalidInput(message) => Self::Api(message),
            error => Self::Api(format!("{} ({error})", error.user_message())),
        }
    }
}

impl From<guava_core::Error> for CliError {
    fn from(error: guava_core::Error) -> Self {
        match error {
            guava_core::Error::Api(error) => error.into(),
            guava_core::Error::Storage(error) => Self::Storage(error),
            error => Self::Core(error),
        }
    }
}
