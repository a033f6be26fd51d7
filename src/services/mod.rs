//! Service functions coordinating repositories with the table kit.

use thiserror::Error;

use crate::domain::types::TypeConstraintError;
use crate::repository::errors::RepositoryError;
use crate::table::page::InvalidPageSize;
use crate::table::source::FetchError;

pub mod applications;
pub mod companies;
pub mod positions;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Not found")]
    NotFound,

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Validation error: {0}")]
    Validation(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<TypeConstraintError> for ServiceError {
    fn from(err: TypeConstraintError) -> Self {
        ServiceError::Validation(err.to_string())
    }
}

impl From<InvalidPageSize> for ServiceError {
    fn from(err: InvalidPageSize) -> Self {
        ServiceError::Validation(err.to_string())
    }
}
