//! Schema declaration for the structured store.
//!
//! A [`Schema`] is an ordered list of versioned [`Migration`] steps. When the
//! database opens, every step whose version exceeds the previously stored
//! version runs in ascending order, so upgrades are cumulative and idempotent
//! across skipped versions.

use thiserror::Error;

/// Errors detected while validating a schema at open time.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A schema with no migration steps cannot open a database.
    #[error("schema declares no migrations")]
    Empty,

    /// Migration versions must be strictly ascending.
    #[error("migration version {version} is not above its predecessor")]
    NonAscendingVersion {
        /// The offending version number.
        version: u32,
    },

    /// The same store is declared twice across all migrations.
    #[error("store {store} is declared more than once")]
    DuplicateStore {
        /// Name of the duplicated store.
        store: &'static str,
    },

    /// The same index name is declared twice on one store.
    #[error("store {store} declares index {index} more than once")]
    DuplicateIndex {
        /// Store carrying the duplicate.
        store: &'static str,
        /// Name of the duplicated index.
        index: &'static str,
    },
}

/// Primary-key policy of a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPolicy {
    /// Records carry their own key in the named field.
    Explicit {
        /// Field holding the key.
        path: &'static str,
    },
    /// The store assigns ascending surrogate keys, injected into the named
    /// field when a record is added without one.
    AutoIncrement {
        /// Field holding the key.
        path: &'static str,
    },
}

impl KeyPolicy {
    /// The field the key lives in.
    #[must_use]
    pub const fn path(&self) -> &'static str {
        match self {
            Self::Explicit { path } | Self::AutoIncrement { path } => path,
        }
    }
}

/// A secondary index over one scalar field of a store's records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexDef {
    /// Index name, used for lookups.
    pub name: &'static str,
    /// Record field the index covers.
    pub path: &'static str,
    /// Whether two records may share one indexed value.
    pub unique: bool,
}

impl IndexDef {
    /// A non-unique index.
    #[must_use]
    pub const fn new(name: &'static str, path: &'static str) -> Self {
        Self {
            name,
            path,
            unique: false,
        }
    }

    /// A unique index.
    #[must_use]
    pub const fn unique(name: &'static str, path: &'static str) -> Self {
        Self {
            name,
            path,
            unique: true,
        }
    }
}

/// Declaration of one object store.
#[derive(Debug, Clone)]
pub struct StoreDef {
    /// Store name.
    pub name: &'static str,
    /// Primary-key policy.
    pub key: KeyPolicy,
    /// Secondary indexes.
    pub indexes: Vec<IndexDef>,
}

impl StoreDef {
    /// A store whose records carry their own key in `path`.
    #[must_use]
    pub const fn keyed(name: &'static str, path: &'static str) -> Self {
        Self {
            name,
            key: KeyPolicy::Explicit { path },
            indexes: Vec::new(),
        }
    }

    /// A store with auto-incrementing surrogate keys injected into `path`.
    #[must_use]
    pub const fn auto(name: &'static str, path: &'static str) -> Self {
        Self {
            name,
            key: KeyPolicy::AutoIncrement { path },
            indexes: Vec::new(),
        }
    }

    /// Add a non-unique index.
    #[must_use]
    pub fn index(mut self, name: &'static str, path: &'static str) -> Self {
        self.indexes.push(IndexDef::new(name, path));
        self
    }

    /// Add a unique index.
    #[must_use]
    pub fn unique_index(mut self, name: &'static str, path: &'static str) -> Self {
        self.indexes.push(IndexDef::unique(name, path));
        self
    }
}

/// One versioned upgrade step: the stores it creates.
#[derive(Debug, Clone)]
pub struct Migration {
    /// Version this step upgrades the database to.
    pub version: u32,
    /// Stores created by this step.
    pub stores: Vec<StoreDef>,
}

/// The full, immutable schema of a database.
#[derive(Debug, Clone)]
pub struct Schema {
    migrations: Vec<Migration>,
}

impl Schema {
    /// Declare a schema from its migration steps.
    ///
    /// Validation happens when the database opens, not here, so an invalid
    /// schema surfaces as a retryable open failure.
    #[must_use]
    pub fn new(migrations: Vec<Migration>) -> Self {
        Self { migrations }
    }

    /// The version the database reaches after all steps have run.
    #[must_use]
    pub fn latest_version(&self) -> u32 {
        self.migrations.iter().map(|m| m.version).max().unwrap_or(0)
    }

    /// The steps that still need to run on a database stored at `version`.
    pub(crate) fn steps_after(&self, version: u32) -> impl Iterator<Item = &Migration> {
        self.migrations.iter().filter(move |m| m.version > version)
    }

    /// Check the schema for structural mistakes.
    pub(crate) fn validate(&self) -> Result<(), SchemaError> {
        if self.migrations.is_empty() {
            return Err(SchemaError::Empty);
        }

        let mut previous = 0;
        let mut seen_stores: Vec<&'static str> = Vec::new();

        for migration in &self.migrations {
            if migration.version <= previous {
                return Err(SchemaError::NonAscendingVersion {
                    version: migration.version,
                });
            }
            previous = migration.version;

            for store in &migration.stores {
                if seen_stores.contains(&store.name) {
                    return Err(SchemaError::DuplicateStore { store: store.name });
                }
                seen_stores.push(store.name);

                let mut seen_indexes: Vec<&'static str> = Vec::new();
                for index in &store.indexes {
                    if seen_indexes.contains(&index.name) {
                        return Err(SchemaError::DuplicateIndex {
                            store: store.name,
                            index: index.name,
                        });
                    }
                    seen_indexes.push(index.name);
                }
            }
        }

        Ok(())
    }
}
