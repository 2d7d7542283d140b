//! Products service errors.

use satchel::DbError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProductsServiceError {
    #[error("product already exists")]
    AlreadyExists,

    #[error("product not found")]
    NotFound,

    #[error("storage error")]
    Storage(#[source] DbError),
}

impl From<DbError> for ProductsServiceError {
    fn from(error: DbError) -> Self {
        match error {
            DbError::AlreadyExists { .. } | DbError::UniqueViolation { .. } => Self::AlreadyExists,
            other => Self::Storage(other),
        }
    }
}
