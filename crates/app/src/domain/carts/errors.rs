//! Carts service errors.

use satchel::{DbError, KvError};
use thiserror::Error;

use crate::uuids::ProductUuid;

#[derive(Debug, Error)]
pub enum CartsServiceError {
    #[error("product has no identifier")]
    InvalidProduct,

    #[error("quantity must be at least 1")]
    InvalidQuantity,

    #[error("insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { requested: u32, available: u32 },

    #[error("cart item not found")]
    ItemNotFound,

    #[error("cart is empty")]
    EmptyCart,

    #[error("cart line for product {0} has no resolvable price")]
    UnpricedLine(ProductUuid),

    #[error("anonymous cart entry for product {0} carries no product snapshot")]
    MissingSnapshot(ProductUuid),

    #[error("storage error")]
    Storage(#[from] DbError),

    #[error("storage error")]
    Kv(#[from] KvError),
}
