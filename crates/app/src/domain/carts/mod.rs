//! Carts

pub mod errors;
pub mod models;
pub mod policy;
pub mod service;
mod stores;

pub use errors::CartsServiceError;
pub use policy::ShippingPolicy;
pub use service::*;
