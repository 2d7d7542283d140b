//! Products service.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use satchel::Db;

use crate::{
    domain::products::{
        ProductsRepository,
        errors::ProductsServiceError,
        models::{NewProduct, Product, ProductUpdate},
    },
    uuids::ProductUuid,
};

#[derive(Debug, Clone)]
pub struct LocalProductsService {
    repository: ProductsRepository,
}

impl LocalProductsService {
    #[must_use]
    pub fn new(db: Arc<Db>) -> Self {
        Self {
            repository: ProductsRepository::new(db),
        }
    }
}

#[async_trait]
impl ProductsService for LocalProductsService {
    async fn list_products(&self) -> Result<Vec<Product>, ProductsServiceError> {
        Ok(self.repository.list().await?)
    }

    async fn get_product(&self, product: ProductUuid) -> Result<Product, ProductsServiceError> {
        self.repository
            .get(product)
            .await?
            .ok_or(ProductsServiceError::NotFound)
    }

    async fn create_product(&self, product: NewProduct) -> Result<Product, ProductsServiceError> {
        let now = Timestamp::now();

        let created = Product {
            id: product.id,
            name: product.name,
            price: product.price,
            stock: product.stock,
            category: product.category,
            popular: product.popular,
            featured: product.featured,
            images: product.images,
            created_at: now,
            updated_at: now,
        };

        self.repository.create(&created).await?;

        Ok(created)
    }

    async fn update_product(
        &self,
        product: ProductUuid,
        update: ProductUpdate,
    ) -> Result<Product, ProductsServiceError> {
        let existing = self
            .repository
            .get(product)
            .await?
            .ok_or(ProductsServiceError::NotFound)?;

        let updated = Product {
            id: existing.id,
            name: update.name,
            price: update.price,
            stock: update.stock,
            category: update.category,
            popular: update.popular,
            featured: update.featured,
            images: update.images,
            created_at: existing.created_at,
            updated_at: Timestamp::now(),
        };

        self.repository.save(&updated).await?;

        Ok(updated)
    }

    async fn delete_product(&self, product: ProductUuid) -> Result<(), ProductsServiceError> {
        let existed = self.repository.delete(product).await?;

        if !existed {
            return Err(ProductsServiceError::NotFound);
        }

        Ok(())
    }

    async fn list_by_category(
        &self,
        category: &str,
    ) -> Result<Vec<Product>, ProductsServiceError> {
        Ok(self.repository.list_by_category(category).await?)
    }

    async fn list_popular(&self) -> Result<Vec<Product>, ProductsServiceError> {
        Ok(self.repository.list_popular().await?)
    }

    async fn list_featured(&self) -> Result<Vec<Product>, ProductsServiceError> {
        Ok(self.repository.list_featured().await?)
    }
}

#[automock]
#[async_trait]
pub trait ProductsService: Send + Sync {
    /// All products in the catalog.
    async fn list_products(&self) -> Result<Vec<Product>, ProductsServiceError>;

    /// Retrieve a single product.
    async fn get_product(&self, product: ProductUuid) -> Result<Product, ProductsServiceError>;

    /// Create a product with the given details.
    async fn create_product(&self, product: NewProduct) -> Result<Product, ProductsServiceError>;

    /// Replace a product's details.
    async fn update_product(
        &self,
        product: ProductUuid,
        update: ProductUpdate,
    ) -> Result<Product, ProductsServiceError>;

    /// Delete a product.
    async fn delete_product(&self, product: ProductUuid) -> Result<(), ProductsServiceError>;

    /// Products in the named category.
    async fn list_by_category(&self, category: &str)
    -> Result<Vec<Product>, ProductsServiceError>;

    /// Products flagged popular.
    async fn list_popular(&self) -> Result<Vec<Product>, ProductsServiceError>;

    /// Products flagged featured.
    async fn list_featured(&self) -> Result<Vec<Product>, ProductsServiceError>;
}
