//! Products Repository

use std::sync::Arc;

use satchel::{Db, DbError};

use crate::{
    domain::products::models::Product,
    schema::{indexes, stores},
    uuids::ProductUuid,
};

#[derive(Debug, Clone)]
pub(crate) struct ProductsRepository {
    db: Arc<Db>,
}

impl ProductsRepository {
    #[must_use]
    pub(crate) fn new(db: Arc<Db>) -> Self {
        Self { db }
    }

    pub(crate) async fn get(&self, product: ProductUuid) -> Result<Option<Product>, DbError> {
        self.db.get(stores::PRODUCTS, &product.key()).await
    }

    pub(crate) async fn list(&self) -> Result<Vec<Product>, DbError> {
        self.db.get_all(stores::PRODUCTS).await
    }

    pub(crate) async fn create(&self, product: &Product) -> Result<(), DbError> {
        self.db.add(stores::PRODUCTS, product).await.map(|_| ())
    }

    pub(crate) async fn save(&self, product: &Product) -> Result<(), DbError> {
        self.db.put(stores::PRODUCTS, product).await.map(|_| ())
    }

    pub(crate) async fn delete(&self, product: ProductUuid) -> Result<bool, DbError> {
        self.db.delete(stores::PRODUCTS, &product.key()).await
    }

    pub(crate) async fn list_by_category(&self, category: &str) -> Result<Vec<Product>, DbError> {
        self.db
            .get_by_index(stores::PRODUCTS, indexes::CATEGORY, category)
            .await
    }

    pub(crate) async fn list_popular(&self) -> Result<Vec<Product>, DbError> {
        self.db
            .get_by_index(stores::PRODUCTS, indexes::POPULAR, true)
            .await
    }

    pub(crate) async fn list_featured(&self) -> Result<Vec<Product>, DbError> {
        self.db
            .get_by_index(stores::PRODUCTS, indexes::FEATURED, true)
            .await
    }
}
