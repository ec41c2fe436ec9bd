use thiserror::Error;
use uuid::Uuid;

use crate::domain::{DeviceInUse, RepositoryError};

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    DeviceInUse(#[from] DeviceInUse),

    #[error("Device not found: {0}")]
    NotFound(Uuid),

    #[error(transparent)]
    Unknown(#[from] anyhow::Error),
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(id) => AppError::NotFound(id),
            RepositoryError::Storage(e) => AppError::Unknown(e),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
