use thiserror::Error as ThisError;

use crate::series::SeriesError;
use crate::services::provider::ProviderError;

#[derive(ThisError, Debug)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Series error: {0}")]
    Series(SeriesError),

    #[error("Provider error: {0}")]
    Provider(ProviderError),

    #[error("Scheduling error: {0}")]
    Scheduling(String),

    #[error("{0}")]
    Other(String),
}

impl From<SeriesError> for AppError {
    fn from(err: SeriesError) -> Self {
        AppError::Series(err)
    }
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        AppError::Provider(err)
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

// Alias for convenience
pub type Error = AppError;
