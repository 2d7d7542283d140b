//! The structured store: named object stores behind one lazily-opened handle.
//!
//! A [`Db`] is cheap to construct and opens on first use. Concurrent callers
//! share the in-flight open; a failed open leaves the handle uninitialized so
//! a later call can retry. Individual store operations are serialized by a
//! per-store lock; nothing spans more than one operation atomically.

mod store;

use std::sync::RwLock;

use rustc_hash::FxHashMap;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::{
    errors::DbError,
    keys::{IndexValue, Key},
    schema::Schema,
};

use store::Store;

#[derive(Debug)]
struct Inner {
    version: u32,
    stores: FxHashMap<&'static str, RwLock<Store>>,
}

impl Inner {
    fn open(schema: &Schema) -> Result<Self, DbError> {
        schema.validate()?;

        let mut stores = FxHashMap::default();
        let mut version = 0;

        for migration in schema.steps_after(0) {
            for def in migration.stores.clone() {
                stores.insert(def.name, RwLock::new(Store::new(def)));
            }
            version = migration.version;
        }

        info!(version, store_count = stores.len(), "opened structured store");

        Ok(Self { version, stores })
    }
}

/// Handle to the embedded structured database.
#[derive(Debug)]
pub struct Db {
    schema: Schema,
    cell: OnceCell<Inner>,
}

impl Db {
    /// Create a handle. The database opens lazily on first use.
    #[must_use]
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            cell: OnceCell::new(),
        }
    }

    /// Open the database if it is not open yet.
    ///
    /// Concurrent callers share one in-flight open; once open, this is a
    /// no-op and stored data is untouched.
    ///
    /// # Errors
    ///
    /// Returns a [`DbError`] when the schema fails validation. The handle
    /// stays uninitialized, so the call may be retried.
    pub async fn initialize(&self) -> Result<(), DbError> {
        self.inner().await.map(|_| ())
    }

    /// The schema version the open database is at.
    ///
    /// # Errors
    ///
    /// Returns a [`DbError`] when opening fails.
    pub async fn version(&self) -> Result<u32, DbError> {
        self.inner().await.map(|inner| inner.version)
    }

    /// Insert a new record into `store`.
    ///
    /// Auto-increment stores assign and inject the key when the record does
    /// not carry one; the stored key is returned either way.
    ///
    /// # Errors
    ///
    /// Returns a [`DbError`] when the store is unknown, the key is already
    /// present, a unique index would be violated, or encoding fails.
    pub async fn add<T: Serialize>(&self, store: &str, record: &T) -> Result<Key, DbError> {
        let value = self.encode(store, record)?;
        let result = self
            .with_store(store, |target| target.insert(value))
            .await;

        observe(store, "add", result)
    }

    /// Insert or replace a record in `store`.
    ///
    /// # Errors
    ///
    /// Returns a [`DbError`] when the store is unknown, a unique index would
    /// be violated, or encoding fails.
    pub async fn put<T: Serialize>(&self, store: &str, record: &T) -> Result<Key, DbError> {
        let value = self.encode(store, record)?;
        let result = self
            .with_store(store, |target| target.upsert(value))
            .await;

        observe(store, "put", result)
    }

    /// Delete the record under `key`. Returns whether a record existed.
    ///
    /// # Errors
    ///
    /// Returns a [`DbError`] when the store is unknown.
    pub async fn delete(&self, store: &str, key: &Key) -> Result<bool, DbError> {
        let result = self
            .with_store(store, |target| Ok(target.remove(key)))
            .await;

        observe(store, "delete", result)
    }

    /// Fetch the record under `key`, if present.
    ///
    /// # Errors
    ///
    /// Returns a [`DbError`] when the store is unknown or decoding fails.
    pub async fn get<T: DeserializeOwned>(
        &self,
        store: &str,
        key: &Key,
    ) -> Result<Option<T>, DbError> {
        let result = self
            .with_store_read(store, |target| Ok(target.get(key)))
            .await
            .and_then(|found| found.map(|value| decode(store, value)).transpose());

        observe(store, "get", result)
    }

    /// Fetch every record in `store`, in primary-key order.
    ///
    /// # Errors
    ///
    /// Returns a [`DbError`] when the store is unknown or decoding fails.
    pub async fn get_all<T: DeserializeOwned>(&self, store: &str) -> Result<Vec<T>, DbError> {
        let result = self
            .with_store_read(store, |target| Ok(target.all()))
            .await
            .and_then(|values| decode_many(store, values));

        observe(store, "get_all", result)
    }

    /// Number of records in `store`.
    ///
    /// # Errors
    ///
    /// Returns a [`DbError`] when the store is unknown.
    pub async fn count(&self, store: &str) -> Result<u64, DbError> {
        let result = self
            .with_store_read(store, |target| Ok(target.count()))
            .await;

        observe(store, "count", result)
    }

    /// Fetch every record whose named secondary index matches `value`.
    ///
    /// # Errors
    ///
    /// Returns a [`DbError`] when the store or index is unknown or decoding
    /// fails.
    pub async fn get_by_index<T: DeserializeOwned>(
        &self,
        store: &str,
        index: &str,
        value: impl Into<IndexValue>,
    ) -> Result<Vec<T>, DbError> {
        let indexed = value.into();
        let result = self
            .with_store_read(store, |target| target.by_index(index, &indexed))
            .await
            .and_then(|values| decode_many(store, values));

        observe(store, "get_by_index", result)
    }

    async fn inner(&self) -> Result<&Inner, DbError> {
        self.cell
            .get_or_try_init(|| async { Inner::open(&self.schema) })
            .await
    }

    async fn with_store<T>(
        &self,
        store: &str,
        action: impl FnOnce(&mut Store) -> Result<T, DbError>,
    ) -> Result<T, DbError> {
        let inner = self.inner().await?;
        let target = inner.stores.get(store).ok_or_else(|| DbError::UnknownStore {
            store: store.to_string(),
        })?;

        let mut guard = target.write().map_err(|_| DbError::LockPoisoned)?;
        action(&mut guard)
    }

    async fn with_store_read<T>(
        &self,
        store: &str,
        action: impl FnOnce(&Store) -> Result<T, DbError>,
    ) -> Result<T, DbError> {
        let inner = self.inner().await?;
        let target = inner.stores.get(store).ok_or_else(|| DbError::UnknownStore {
            store: store.to_string(),
        })?;

        let guard = target.read().map_err(|_| DbError::LockPoisoned)?;
        action(&guard)
    }

    fn encode<T: Serialize>(&self, store: &str, record: &T) -> Result<Value, DbError> {
        serde_json::to_value(record).map_err(|source| DbError::Encode {
            store: store.to_string(),
            source,
        })
    }
}

fn decode<T: DeserializeOwned>(store: &str, value: Value) -> Result<T, DbError> {
    serde_json::from_value(value).map_err(|source| DbError::Decode {
        store: store.to_string(),
        source,
    })
}

fn decode_many<T: DeserializeOwned>(store: &str, values: Vec<Value>) -> Result<Vec<T>, DbError> {
    values
        .into_iter()
        .map(|value| decode(store, value))
        .collect()
}

/// Log the store and operation of a failed call before handing the error back.
fn observe<T>(store: &str, op: &'static str, result: Result<T, DbError>) -> Result<T, DbError> {
    if let Err(error) = &result {
        warn!(store, op, %error, "store operation failed");
    }

    result
}
