//! A single object store: records keyed by primary key, with shadow maps for
//! each secondary index.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use serde_json::Value;
use smallvec::SmallVec;

use crate::{
    errors::DbError,
    keys::{IndexValue, Key},
    schema::{IndexDef, KeyPolicy, StoreDef},
};

/// Posting list of one indexed value. Most values map to a handful of records.
type Postings = SmallVec<[Key; 4]>;

#[derive(Debug)]
struct IndexState {
    def: IndexDef,
    postings: BTreeMap<IndexValue, Postings>,
}

/// One object store and its indexes.
#[derive(Debug)]
pub(crate) struct Store {
    def: StoreDef,
    records: BTreeMap<Key, Value>,
    next_serial: u64,
    indexes: FxHashMap<&'static str, IndexState>,
}

impl Store {
    pub(crate) fn new(def: StoreDef) -> Self {
        let indexes = def
            .indexes
            .iter()
            .map(|&index| {
                (
                    index.name,
                    IndexState {
                        def: index,
                        postings: BTreeMap::new(),
                    },
                )
            })
            .collect();

        Self {
            def,
            records: BTreeMap::new(),
            next_serial: 1,
            indexes,
        }
    }

    fn store_name(&self) -> String {
        self.def.name.to_string()
    }

    /// Insert a new record. Fails when the key is already present.
    pub(crate) fn insert(&mut self, mut value: Value) -> Result<Key, DbError> {
        let key = self.extract_key(&mut value)?;

        if self.records.contains_key(&key) {
            return Err(DbError::AlreadyExists {
                store: self.store_name(),
                key: key.to_string(),
            });
        }

        self.check_unique(&key, &value)?;
        self.index_record(&key, &value);
        self.records.insert(key.clone(), value);

        Ok(key)
    }

    /// Insert or replace a record.
    pub(crate) fn upsert(&mut self, mut value: Value) -> Result<Key, DbError> {
        let key = self.extract_key(&mut value)?;

        self.check_unique(&key, &value)?;

        if let Some(previous) = self.records.get(&key).cloned() {
            self.unindex_record(&key, &previous);
        }

        self.index_record(&key, &value);
        self.records.insert(key.clone(), value);

        Ok(key)
    }

    /// Remove a record. Returns whether it existed.
    pub(crate) fn remove(&mut self, key: &Key) -> bool {
        match self.records.remove(key) {
            Some(previous) => {
                self.unindex_record(key, &previous);
                true
            }
            None => false,
        }
    }

    pub(crate) fn get(&self, key: &Key) -> Option<Value> {
        self.records.get(key).cloned()
    }

    /// All records in primary-key order.
    pub(crate) fn all(&self) -> Vec<Value> {
        self.records.values().cloned().collect()
    }

    pub(crate) fn count(&self) -> u64 {
        u64::try_from(self.records.len()).unwrap_or(u64::MAX)
    }

    /// All records whose indexed field matches `value`, in primary-key order.
    pub(crate) fn by_index(&self, index: &str, value: &IndexValue) -> Result<Vec<Value>, DbError> {
        let state = self.indexes.get(index).ok_or_else(|| DbError::UnknownIndex {
            store: self.store_name(),
            index: index.to_string(),
        })?;

        let Some(postings) = state.postings.get(value) else {
            return Ok(Vec::new());
        };

        Ok(postings
            .iter()
            .filter_map(|key| self.records.get(key).cloned())
            .collect())
    }

    /// Determine the record's primary key, assigning and injecting a serial
    /// key for auto-increment stores when the key field is absent.
    fn extract_key(&mut self, value: &mut Value) -> Result<Key, DbError> {
        let path = self.def.key.path();
        let name = self.def.name;

        let missing_key = move || DbError::MissingKey {
            store: name.to_string(),
            path,
        };

        match self.def.key {
            KeyPolicy::Explicit { .. } => value
                .get(path)
                .and_then(Key::from_json)
                .ok_or_else(missing_key),
            KeyPolicy::AutoIncrement { .. } => {
                let field = value.get(path);

                if field.is_none() || field.is_some_and(Value::is_null) {
                    let key = Key::Serial(self.next_serial);
                    self.next_serial += 1;

                    let object = value.as_object_mut().ok_or_else(missing_key)?;
                    object.insert(path.to_string(), key.to_json());

                    return Ok(key);
                }

                let key = field.and_then(Key::from_json).ok_or_else(missing_key)?;

                if let Key::Serial(serial) = key {
                    self.next_serial = self.next_serial.max(serial + 1);
                }

                Ok(key)
            }
        }
    }

    /// Reject a write that would duplicate a value in a unique index.
    fn check_unique(&self, key: &Key, value: &Value) -> Result<(), DbError> {
        for state in self.indexes.values().filter(|state| state.def.unique) {
            let Some(indexed) = value.get(state.def.path).and_then(IndexValue::from_json) else {
                continue;
            };

            let taken = state
                .postings
                .get(&indexed)
                .is_some_and(|postings| postings.iter().any(|existing| existing != key));

            if taken {
                return Err(DbError::UniqueViolation {
                    store: self.def.name.to_string(),
                    index: state.def.name.to_string(),
                });
            }
        }

        Ok(())
    }

    fn index_record(&mut self, key: &Key, value: &Value) {
        for state in self.indexes.values_mut() {
            let Some(indexed) = value.get(state.def.path).and_then(IndexValue::from_json) else {
                continue;
            };

            state
                .postings
                .entry(indexed)
                .or_insert_with(Postings::new)
                .push(key.clone());
        }
    }

    fn unindex_record(&mut self, key: &Key, value: &Value) {
        for state in self.indexes.values_mut() {
            let Some(indexed) = value.get(state.def.path).and_then(IndexValue::from_json) else {
                continue;
            };

            if let Some(postings) = state.postings.get_mut(&indexed) {
                postings.retain(|existing| existing != key);

                if postings.is_empty() {
                    state.postings.remove(&indexed);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::schema::StoreDef;

    use super::*;

    fn keyed_store() -> Store {
        Store::new(
            StoreDef::keyed("users", "id")
                .unique_index("email", "email")
                .index("role", "role"),
        )
    }

    fn auto_store() -> Store {
        Store::new(StoreDef::auto("cartItems", "id").index("userId", "userId"))
    }

    #[test]
    fn insert_rejects_duplicate_key() {
        let mut store = keyed_store();

        store
            .insert(json!({"id": "u1", "email": "a@example.com", "role": "customer"}))
            .expect("first insert should succeed");

        let result = store.insert(json!({"id": "u1", "email": "b@example.com"}));

        assert!(matches!(result, Err(DbError::AlreadyExists { .. })));
    }

    #[test]
    fn insert_rejects_unique_index_violation() {
        let mut store = keyed_store();

        store
            .insert(json!({"id": "u1", "email": "a@example.com"}))
            .expect("first insert should succeed");

        let result = store.insert(json!({"id": "u2", "email": "a@example.com"}));

        assert!(matches!(
            result,
            Err(DbError::UniqueViolation { ref index, .. }) if index == "email"
        ));
    }

    #[test]
    fn upsert_may_keep_own_unique_value() {
        let mut store = keyed_store();

        store
            .insert(json!({"id": "u1", "email": "a@example.com", "role": "customer"}))
            .expect("insert should succeed");

        store
            .upsert(json!({"id": "u1", "email": "a@example.com", "role": "admin"}))
            .expect("upsert of the same record should succeed");

        let admins = store
            .by_index("role", &IndexValue::Text("admin".to_string()))
            .expect("role index should exist");

        assert_eq!(admins.len(), 1);
    }

    #[test]
    fn auto_increment_assigns_and_injects_keys() {
        let mut store = auto_store();

        let first = store
            .insert(json!({"userId": "u1", "quantity": 1}))
            .expect("insert should succeed");
        let second = store
            .insert(json!({"userId": "u1", "quantity": 2}))
            .expect("insert should succeed");

        assert_eq!(first, Key::Serial(1));
        assert_eq!(second, Key::Serial(2));

        let record = store.get(&Key::Serial(1)).expect("record should exist");
        assert_eq!(record.get("id"), Some(&json!(1)));
    }

    #[test]
    fn auto_increment_respects_explicit_keys() {
        let mut store = auto_store();

        store
            .insert(json!({"id": 10, "userId": "u1"}))
            .expect("explicit-key insert should succeed");

        let next = store
            .insert(json!({"userId": "u1"}))
            .expect("insert should succeed");

        assert_eq!(next, Key::Serial(11));
    }

    #[test]
    fn removal_prunes_index_postings() {
        let mut store = auto_store();

        let key = store
            .insert(json!({"userId": "u1", "quantity": 1}))
            .expect("insert should succeed");

        assert!(store.remove(&key));
        assert!(!store.remove(&key));

        let remaining = store
            .by_index("userId", &IndexValue::Text("u1".to_string()))
            .expect("userId index should exist");

        assert!(remaining.is_empty());
    }

    #[test]
    fn missing_indexed_field_is_not_indexed() {
        let mut store = auto_store();

        store
            .insert(json!({"quantity": 1}))
            .expect("insert should succeed");

        let matches = store
            .by_index("userId", &IndexValue::Text("u1".to_string()))
            .expect("userId index should exist");

        assert!(matches.is_empty());
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn unknown_index_is_an_error() {
        let store = keyed_store();

        let result = store.by_index("nope", &IndexValue::Bool(true));

        assert!(matches!(result, Err(DbError::UnknownIndex { .. })));
    }

    #[test]
    fn explicit_store_requires_key_field() {
        let mut store = keyed_store();

        let result = store.insert(json!({"email": "a@example.com"}));

        assert!(matches!(
            result,
            Err(DbError::MissingKey { path: "id", .. })
        ));
    }
}
