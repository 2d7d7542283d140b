//! Wishlist Models

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::{
    domain::products::models::Product,
    uuids::{ProductUuid, UserUuid},
};

/// One item of the anonymous wishlist blob, denormalized like the cart's.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnonymousWishlistItem {
    pub product: Product,
}

/// One `wishlist` record of the structured scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub user_id: UserUuid,
    pub product_id: ProductUuid,
    pub added_at: Timestamp,
}

/// One resolved wishlist line. `product` is `None` for a stale user-scope
/// reference.
#[derive(Debug, Clone, PartialEq)]
pub struct WishlistLine {
    pub product_uuid: ProductUuid,
    pub product: Option<Product>,
}
