//! Cart Models

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::{
    domain::products::models::Product,
    uuids::{ProductUuid, UserUuid},
};

/// One item of the anonymous cart blob.
///
/// The anonymous scope denormalizes the full product into the stored array,
/// so the cart renders without further lookups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnonymousCartItem {
    pub product: Product,
    pub quantity: u32,
}

/// One `cartItems` record of the structured scope.
///
/// `id` is assigned by the store on first insert. The record references its
/// product by id; resolution to a full product happens at read time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub user_id: UserUuid,
    pub product_id: ProductUuid,
    pub quantity: u32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// The product carried by a cart entry: a full snapshot in the anonymous
/// scope, a reference in the user scope.
#[derive(Debug, Clone, PartialEq)]
pub enum ProductRef {
    /// Denormalized product, as stored in the anonymous blob.
    Snapshot(Product),
    /// Product id, resolved at read time.
    Reference(ProductUuid),
}

impl ProductRef {
    /// The referenced product's id.
    #[must_use]
    pub fn uuid(&self) -> ProductUuid {
        match self {
            Self::Snapshot(product) => product.id,
            Self::Reference(id) => *id,
        }
    }

    /// The carried product, when this is a snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Option<&Product> {
        match self {
            Self::Snapshot(product) => Some(product),
            Self::Reference(_) => None,
        }
    }
}

/// A scope-independent cart entry, as read from either backing store.
///
/// Timestamps are present only for entries that have been persisted to the
/// structured scope.
#[derive(Debug, Clone, PartialEq)]
pub struct CartEntry {
    pub product: ProductRef,
    pub quantity: u32,
    pub created_at: Option<Timestamp>,
    pub updated_at: Option<Timestamp>,
}

impl CartEntry {
    /// A fresh, unpersisted entry carrying a product snapshot.
    #[must_use]
    pub fn new(product: Product, quantity: u32) -> Self {
        Self {
            product: ProductRef::Snapshot(product),
            quantity,
            created_at: None,
            updated_at: None,
        }
    }
}

/// One resolved line of the cart, as handed to consumers.
///
/// `product` is `None` when a user-scope reference no longer resolves; a
/// stale reference is not an error at this layer.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub product_uuid: ProductUuid,
    pub product: Option<Product>,
    pub quantity: u32,
    /// Unit price in minor units, when the product resolved.
    pub unit_price: Option<u64>,
    /// `unit_price × quantity`, when the product resolved.
    pub line_total: Option<u64>,
}

impl CartLine {
    pub(crate) fn from_resolved(
        product_uuid: ProductUuid,
        product: Option<Product>,
        quantity: u32,
    ) -> Self {
        let unit_price = product.as_ref().map(|p| p.price);
        let line_total = unit_price.map(|price| price.saturating_mul(u64::from(quantity)));

        Self {
            product_uuid,
            product,
            quantity,
            unit_price,
            line_total,
        }
    }
}
