//! Orders service.
//!
//! The order-management collaborator of the cart: the cart snapshots itself
//! into an [`Order`] but never persists it; placing, fetching and advancing
//! orders happens here.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use satchel::Db;
use tracing::info;

use crate::{
    domain::{
        carts::CartsService,
        orders::{
            OrdersRepository,
            errors::OrdersServiceError,
            models::{Order, OrderDetails, OrderStatus},
        },
    },
    session::Session,
    uuids::{OrderUuid, UserUuid},
};

pub struct LocalOrdersService {
    repository: OrdersRepository,
    carts: Arc<dyn CartsService>,
}

impl LocalOrdersService {
    #[must_use]
    pub fn new(db: Arc<Db>, carts: Arc<dyn CartsService>) -> Self {
        Self {
            repository: OrdersRepository::new(db),
            carts,
        }
    }
}

#[async_trait]
impl OrdersService for LocalOrdersService {
    async fn place_order(
        &self,
        session: Session,
        details: OrderDetails,
    ) -> Result<Order, OrdersServiceError> {
        let order = self.carts.create_order_from_cart(session, details).await?;

        self.repository.create(&order).await?;

        info!(order = %order.id, total = order.total, "placed order");

        Ok(order)
    }

    async fn get_order(&self, order: OrderUuid) -> Result<Order, OrdersServiceError> {
        self.repository
            .get(order)
            .await?
            .ok_or(OrdersServiceError::NotFound)
    }

    async fn list_orders(&self, user: UserUuid) -> Result<Vec<Order>, OrdersServiceError> {
        Ok(self.repository.list_for_user(user).await?)
    }

    async fn list_by_status(
        &self,
        status: OrderStatus,
    ) -> Result<Vec<Order>, OrdersServiceError> {
        Ok(self.repository.list_by_status(status).await?)
    }

    async fn update_status(
        &self,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<Order, OrdersServiceError> {
        let mut updated = self
            .repository
            .get(order)
            .await?
            .ok_or(OrdersServiceError::NotFound)?;

        updated.status = status;
        self.repository.save(&updated).await?;

        Ok(updated)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Snapshot the session's cart into an order, persist it, and clear the
    /// cart.
    async fn place_order(
        &self,
        session: Session,
        details: OrderDetails,
    ) -> Result<Order, OrdersServiceError>;

    /// Retrieve a single order.
    async fn get_order(&self, order: OrderUuid) -> Result<Order, OrdersServiceError>;

    /// All orders placed by the given user.
    async fn list_orders(&self, user: UserUuid) -> Result<Vec<Order>, OrdersServiceError>;

    /// All orders in the given state.
    async fn list_by_status(&self, status: OrderStatus)
    -> Result<Vec<Order>, OrdersServiceError>;

    /// Advance an order to a new state.
    async fn update_status(
        &self,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<Order, OrdersServiceError>;
}
