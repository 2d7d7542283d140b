//! App Context

use std::sync::Arc;

use satchel::{Db, DbError, KvStore};
use thiserror::Error;

use crate::{
    domain::{
        carts::{CartsService, LocalCartsService, ShippingPolicy},
        orders::{LocalOrdersService, OrdersService},
        products::{LocalProductsService, ProductsService},
        users::{LocalUsersService, UsersService},
        wishlist::{LocalWishlistService, WishlistService},
    },
    events::Changes,
    schema::storefront_schema,
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to open the storefront database")]
    Database(#[source] DbError),
}

/// The wired storefront: one owned engine and the services over it, built
/// once at startup and handed to consumers by reference.
#[derive(Clone)]
pub struct AppContext {
    pub db: Arc<Db>,
    pub kv: Arc<KvStore>,
    pub changes: Changes,
    pub products: Arc<dyn ProductsService>,
    pub carts: Arc<dyn CartsService>,
    pub orders: Arc<dyn OrdersService>,
    pub users: Arc<dyn UsersService>,
    pub wishlist: Arc<dyn WishlistService>,
}

impl AppContext {
    /// Open the storefront with the default shipping policy.
    ///
    /// # Errors
    ///
    /// Returns an error when the database fails to open.
    pub async fn open() -> Result<Self, AppInitError> {
        Self::with_policy(ShippingPolicy::default()).await
    }

    /// Open the storefront with a custom shipping policy.
    ///
    /// # Errors
    ///
    /// Returns an error when the database fails to open.
    pub async fn with_policy(policy: ShippingPolicy) -> Result<Self, AppInitError> {
        let db = Arc::new(Db::new(storefront_schema()));
        db.initialize().await.map_err(AppInitError::Database)?;

        let kv = Arc::new(KvStore::new());
        let changes = Changes::new();

        let carts = Arc::new(LocalCartsService::with_policy(
            db.clone(),
            kv.clone(),
            changes.clone(),
            policy,
        ));

        Ok(Self {
            products: Arc::new(LocalProductsService::new(db.clone())),
            orders: Arc::new(LocalOrdersService::new(db.clone(), carts.clone())),
            users: Arc::new(LocalUsersService::new(db.clone())),
            wishlist: Arc::new(LocalWishlistService::new(
                db.clone(),
                kv.clone(),
                changes.clone(),
            )),
            carts,
            db,
            kv,
            changes,
        })
    }
}
