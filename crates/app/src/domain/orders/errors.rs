//! Orders service errors.

use satchel::DbError;
use thiserror::Error;

use crate::domain::carts::CartsServiceError;

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("order not found")]
    NotFound,

    #[error("order could not be snapshotted from the cart")]
    Cart(#[from] CartsServiceError),

    #[error("storage error")]
    Storage(#[source] DbError),
}

impl From<DbError> for OrdersServiceError {
    fn from(error: DbError) -> Self {
        Self::Storage(error)
    }
}
