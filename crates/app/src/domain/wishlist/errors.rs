//! Wishlist service errors.

use satchel::{DbError, KvError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WishlistServiceError {
    #[error("product has no identifier")]
    InvalidProduct,

    #[error("storage error")]
    Storage(#[from] DbError),

    #[error("storage error")]
    Kv(#[from] KvError),
}
