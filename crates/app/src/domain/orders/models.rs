//! Order Models

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::uuids::{OrderUuid, ProductUuid, UserUuid};

/// Order lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// The stored string form, as indexed by the `status` index.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }
}

impl From<OrderStatus> for satchel::IndexValue {
    fn from(status: OrderStatus) -> Self {
        Self::Text(status.as_str().to_string())
    }
}

/// A postal address captured with an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

/// Caller-supplied checkout details merged into the order snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetails {
    pub email: String,
    pub shipping_address: Address,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// One order line, with price and totals captured at snapshot time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: ProductUuid,
    pub name: String,
    /// Unit price in minor units at snapshot time.
    pub unit_price: u64,
    pub quantity: u32,
    pub line_total: u64,
}

/// Order Model
///
/// Amounts are minor currency units. `date` doubles as the stored field the
/// `date` index covers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderUuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserUuid>,
    pub items: Vec<OrderLine>,
    pub subtotal: u64,
    pub shipping_fee: u64,
    pub total: u64,
    pub status: OrderStatus,
    pub details: OrderDetails,
    #[serde(rename = "date")]
    pub placed_at: Timestamp,
}
