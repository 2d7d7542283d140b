//! Products

pub mod errors;
pub mod models;
mod repository;
pub mod service;

pub(crate) use repository::ProductsRepository;

pub use errors::ProductsServiceError;
pub use service::*;
