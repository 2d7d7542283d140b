//! Cart storage backends.
//!
//! One capability set — read, write, clear — with two variants: the anonymous
//! scope keeps the whole cart as one key-value blob of product snapshots; the
//! user scope keeps one `cartItems` record per product, found via the owning
//! user's index. The service selects a variant per operation from the session
//! it was handed.

use std::sync::Arc;

use jiff::Timestamp;
use rustc_hash::FxHashSet;
use satchel::{Db, Key, KvStore};
use tracing::warn;

use crate::{
    domain::carts::{
        errors::CartsServiceError,
        models::{AnonymousCartItem, CartEntry, CartItemRecord, ProductRef},
    },
    schema::{indexes, keys, stores},
    uuids::UserUuid,
};

/// The anonymous scope: one JSON array under a fixed key.
#[derive(Debug, Clone)]
pub(crate) struct AnonymousCartStore {
    kv: Arc<KvStore>,
}

impl AnonymousCartStore {
    pub(crate) fn new(kv: Arc<KvStore>) -> Self {
        Self { kv }
    }

    /// Read the anonymous cart. Absent or corrupt blobs read as empty.
    pub(crate) fn read(&self) -> Vec<CartEntry> {
        let items: Vec<AnonymousCartItem> = self.kv.read(keys::ANONYMOUS_CART);

        items
            .into_iter()
            .map(|item| CartEntry {
                product: ProductRef::Snapshot(item.product),
                quantity: item.quantity,
                created_at: None,
                updated_at: None,
            })
            .collect()
    }

    /// Replace the anonymous cart with the given entries.
    pub(crate) fn write(&self, entries: &[CartEntry]) -> Result<(), CartsServiceError> {
        let items = entries
            .iter()
            .map(|entry| match &entry.product {
                ProductRef::Snapshot(product) => Ok(AnonymousCartItem {
                    product: product.clone(),
                    quantity: entry.quantity,
                }),
                ProductRef::Reference(id) => Err(CartsServiceError::MissingSnapshot(*id)),
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.kv.write(keys::ANONYMOUS_CART, &items)?;

        Ok(())
    }

    /// Drop the anonymous cart key entirely.
    pub(crate) fn clear(&self) {
        self.kv.remove(keys::ANONYMOUS_CART);
    }
}

/// The user scope: one `cartItems` record per product, tagged by user.
#[derive(Debug, Clone)]
pub(crate) struct UserCartStore {
    db: Arc<Db>,
    user: UserUuid,
}

impl UserCartStore {
    pub(crate) fn new(db: Arc<Db>, user: UserUuid) -> Self {
        Self { db, user }
    }

    pub(crate) async fn records(&self) -> Result<Vec<CartItemRecord>, CartsServiceError> {
        Ok(self
            .db
            .get_by_index(stores::CART_ITEMS, indexes::USER_ID, self.user)
            .await?)
    }

    pub(crate) async fn read(&self) -> Result<Vec<CartEntry>, CartsServiceError> {
        Ok(self
            .records()
            .await?
            .into_iter()
            .map(|record| CartEntry {
                product: ProductRef::Reference(record.product_id),
                quantity: record.quantity,
                created_at: Some(record.created_at),
                updated_at: Some(record.updated_at),
            })
            .collect())
    }

    /// Reconcile the user's records with the given entries: upsert by
    /// product, delete records no longer present. Creation stamps survive
    /// quantity changes; update stamps refresh.
    ///
    /// The steps are individual store operations, not a transaction; a
    /// failure partway leaves the completed steps applied.
    pub(crate) async fn write(&self, entries: &[CartEntry]) -> Result<(), CartsServiceError> {
        let mut current = self.records().await?;
        let desired: FxHashSet<_> = entries.iter().map(|entry| entry.product.uuid()).collect();
        let now = Timestamp::now();

        for record in current
            .iter()
            .filter(|record| !desired.contains(&record.product_id))
        {
            self.delete_record(record).await?;
        }
        current.retain(|record| desired.contains(&record.product_id));

        for entry in entries {
            let product_id = entry.product.uuid();

            match current
                .iter_mut()
                .find(|record| record.product_id == product_id)
            {
                Some(record) => {
                    if record.quantity == entry.quantity {
                        continue;
                    }

                    record.quantity = entry.quantity;
                    record.updated_at = entry.updated_at.unwrap_or(now);
                    self.db.put(stores::CART_ITEMS, record).await?;
                }
                None => {
                    let record = CartItemRecord {
                        id: None,
                        user_id: self.user,
                        product_id,
                        quantity: entry.quantity,
                        created_at: entry.created_at.unwrap_or(now),
                        updated_at: entry.updated_at.unwrap_or(now),
                    };

                    self.db.add(stores::CART_ITEMS, &record).await?;
                }
            }
        }

        Ok(())
    }

    pub(crate) async fn clear(&self) -> Result<(), CartsServiceError> {
        for record in self.records().await? {
            self.delete_record(&record).await?;
        }

        Ok(())
    }

    async fn delete_record(&self, record: &CartItemRecord) -> Result<(), CartsServiceError> {
        let Some(id) = record.id else {
            warn!(user = %self.user, product = %record.product_id, "cart record without id, skipping delete");
            return Ok(());
        };

        self.db
            .delete(stores::CART_ITEMS, &Key::Serial(id))
            .await?;

        Ok(())
    }
}

/// The store variant active for one operation.
pub(crate) enum ActiveCartStore {
    Anonymous(AnonymousCartStore),
    User(UserCartStore),
}

impl ActiveCartStore {
    pub(crate) async fn read(&self) -> Result<Vec<CartEntry>, CartsServiceError> {
        match self {
            Self::Anonymous(store) => Ok(store.read()),
            Self::User(store) => store.read().await,
        }
    }

    pub(crate) async fn write(&self, entries: &[CartEntry]) -> Result<(), CartsServiceError> {
        match self {
            Self::Anonymous(store) => store.write(entries),
            Self::User(store) => store.write(entries).await,
        }
    }

    pub(crate) async fn clear(&self) -> Result<(), CartsServiceError> {
        match self {
            Self::Anonymous(store) => {
                store.clear();
                Ok(())
            }
            Self::User(store) => store.clear().await,
        }
    }
}
