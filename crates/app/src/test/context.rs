//! Test context for service-level tests.
//!
//! Builds a fresh engine and concrete services per test; nothing is shared
//! between tests.

use std::sync::Arc;

use jiff::Timestamp;
use satchel::{Db, KvStore};

use crate::{
    domain::{
        carts::LocalCartsService,
        orders::{
            LocalOrdersService,
            models::{Address, OrderDetails},
        },
        products::{
            LocalProductsService, ProductsService, ProductsServiceError,
            models::{NewProduct, Product},
        },
        users::LocalUsersService,
        wishlist::LocalWishlistService,
    },
    events::Changes,
    schema::storefront_schema,
    uuids::ProductUuid,
};

pub(crate) struct TestContext {
    pub db: Arc<Db>,
    pub kv: Arc<KvStore>,
    pub changes: Changes,
    pub products: LocalProductsService,
    pub carts: LocalCartsService,
    pub orders: LocalOrdersService,
    pub users: LocalUsersService,
    pub wishlist: LocalWishlistService,
}

impl TestContext {
    pub(crate) async fn new() -> Self {
        let db = Arc::new(Db::new(storefront_schema()));
        db.initialize().await.expect("database should open");

        let kv = Arc::new(KvStore::new());
        let changes = Changes::new();

        let carts = LocalCartsService::new(db.clone(), kv.clone(), changes.clone());

        Self {
            products: LocalProductsService::new(db.clone()),
            orders: LocalOrdersService::new(db.clone(), Arc::new(carts.clone())),
            users: LocalUsersService::new(db.clone()),
            wishlist: LocalWishlistService::new(db.clone(), kv.clone(), changes.clone()),
            carts,
            db,
            kv,
            changes,
        }
    }

    /// Create a catalog product the structured scope can resolve.
    pub(crate) async fn create_product(
        &self,
        name: &str,
        price: u64,
        stock: Option<u32>,
    ) -> Result<Product, ProductsServiceError> {
        self.products
            .create_product(NewProduct {
                id: ProductUuid::generate(),
                name: name.to_string(),
                price,
                stock,
                category: "test".to_string(),
                popular: false,
                featured: false,
                images: Vec::new(),
            })
            .await
    }
}

/// A product that exists only in memory, for anonymous-scope tests that never
/// touch the catalog store.
pub(crate) fn detached_product(name: &str, price: u64, stock: Option<u32>) -> Product {
    let now = Timestamp::now();

    Product {
        id: ProductUuid::generate(),
        name: name.to_string(),
        price,
        stock,
        category: "test".to_string(),
        popular: false,
        featured: false,
        images: Vec::new(),
        created_at: now,
        updated_at: now,
    }
}

/// Minimal checkout details for order tests.
pub(crate) fn checkout_details() -> OrderDetails {
    OrderDetails {
        email: "shopper@example.com".to_string(),
        shipping_address: Address {
            line1: "1 Harbour Lane".to_string(),
            line2: None,
            city: "Porto".to_string(),
            postal_code: "4000-001".to_string(),
            country: "PT".to_string(),
        },
        billing_address: None,
        note: None,
    }
}
