//! Orders

pub mod errors;
pub mod models;
mod repository;
pub mod service;

pub(crate) use repository::OrdersRepository;

pub use errors::OrdersServiceError;
pub use service::*;
