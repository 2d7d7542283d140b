//! Users service errors.

use satchel::DbError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UsersServiceError {
    #[error("user already exists")]
    AlreadyExists,

    #[error("user not found")]
    NotFound,

    #[error("storage error")]
    Storage(#[source] DbError),
}

impl From<DbError> for UsersServiceError {
    fn from(error: DbError) -> Self {
        match error {
            DbError::AlreadyExists { .. } | DbError::UniqueViolation { .. } => Self::AlreadyExists,
            other => Self::Storage(other),
        }
    }
}
