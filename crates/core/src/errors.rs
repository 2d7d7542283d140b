//! Storage engine errors.

use thiserror::Error;

use crate::schema::SchemaError;

/// Errors raised by structured-store operations.
///
/// Every operation attaches the store it touched; callers decide user-facing
/// messaging. No operation retries automatically.
#[derive(Debug, Error)]
pub enum DbError {
    /// The named store is not part of the schema.
    #[error("store {store} is not declared in the schema")]
    UnknownStore {
        /// Requested store name.
        store: String,
    },

    /// The named index does not exist on the store.
    #[error("store {store} has no index named {index}")]
    UnknownIndex {
        /// Store that was queried.
        store: String,
        /// Requested index name.
        index: String,
    },

    /// `add` on a primary key that is already present.
    #[error("store {store} already contains key {key}")]
    AlreadyExists {
        /// Store that rejected the record.
        store: String,
        /// The conflicting key.
        key: String,
    },

    /// A write would duplicate a value in a unique index.
    #[error("unique index {index} on store {store} already contains this value")]
    UniqueViolation {
        /// Store that rejected the record.
        store: String,
        /// The violated index.
        index: String,
    },

    /// A record for an explicit-key store is missing its key field, or the
    /// field is not key-shaped.
    #[error("record for store {store} has no usable key in field {path}")]
    MissingKey {
        /// Store the record was destined for.
        store: String,
        /// Field the key was expected in.
        path: &'static str,
    },

    /// A record could not be serialized for storage.
    #[error("failed to encode record for store {store}")]
    Encode {
        /// Store the record was destined for.
        store: String,
        /// Underlying serialization error.
        #[source]
        source: serde_json::Error,
    },

    /// A stored document could not be deserialized into the requested type.
    #[error("failed to decode record from store {store}")]
    Decode {
        /// Store the record came from.
        store: String,
        /// Underlying deserialization error.
        #[source]
        source: serde_json::Error,
    },

    /// The schema failed validation when the database opened.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// An internal lock was poisoned by a panicking writer.
    #[error("storage lock poisoned")]
    LockPoisoned,
}

/// Errors raised by key-value writes.
///
/// Reads never fail: absent or corrupt values degrade to the type's default.
#[derive(Debug, Error)]
pub enum KvError {
    /// The value could not be serialized.
    #[error("failed to encode value for key {key}")]
    Encode {
        /// Key the value was destined for.
        key: String,
        /// Underlying serialization error.
        #[source]
        source: serde_json::Error,
    },

    /// The store's lock was poisoned by a panicking writer.
    #[error("storage lock poisoned")]
    LockPoisoned,
}
