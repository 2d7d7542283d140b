//! Satchel
//!
//! Satchel is an embedded, in-process storage engine for client-side storefront
//! data. It provides two storage scopes: a synchronous key-value store for
//! anonymous-session blobs, and an asynchronous structured store with named
//! object stores, primary-key policies, secondary indexes and versioned
//! migrations for per-user records.

pub mod db;
pub mod errors;
pub mod keys;
pub mod kv;
pub mod schema;

pub use db::Db;
pub use errors::{DbError, KvError};
pub use keys::{IndexValue, Key};
pub use kv::KvStore;
pub use schema::{IndexDef, KeyPolicy, Migration, Schema, SchemaError, StoreDef};
