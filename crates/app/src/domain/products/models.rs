//! Product Models

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::uuids::ProductUuid;

/// Product Model
///
/// The cart subsystem treats products as read-only. `stock` of `None` means
/// unconstrained availability; a declared stock caps cart quantities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductUuid,
    pub name: String,
    /// Unit price in minor currency units.
    pub price: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
    pub category: String,
    #[serde(default)]
    pub popular: bool,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub images: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// New Product Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub id: ProductUuid,
    pub name: String,
    pub price: u64,
    pub stock: Option<u32>,
    pub category: String,
    pub popular: bool,
    pub featured: bool,
    pub images: Vec<String>,
}

/// Product Update Model
#[derive(Debug, Clone, PartialEq)]
pub struct ProductUpdate {
    pub name: String,
    pub price: u64,
    pub stock: Option<u32>,
    pub category: String,
    pub popular: bool,
    pub featured: bool,
    pub images: Vec<String>,
}
