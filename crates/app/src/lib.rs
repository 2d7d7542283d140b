//! Storefront domain and persistence modules.

pub mod context;
pub mod domain;
pub mod events;
pub mod schema;
pub mod session;

#[cfg(test)]
mod test;

mod uuids;

pub use uuids::{OrderUuid, ProductUuid, UserUuid};
