//! Orders Repository

use std::sync::Arc;

use satchel::{Db, DbError};

use crate::{
    domain::orders::models::{Order, OrderStatus},
    schema::{indexes, stores},
    uuids::{OrderUuid, UserUuid},
};

#[derive(Debug, Clone)]
pub(crate) struct OrdersRepository {
    db: Arc<Db>,
}

impl OrdersRepository {
    #[must_use]
    pub(crate) fn new(db: Arc<Db>) -> Self {
        Self { db }
    }

    pub(crate) async fn create(&self, order: &Order) -> Result<(), DbError> {
        self.db.add(stores::ORDERS, order).await.map(|_| ())
    }

    pub(crate) async fn save(&self, order: &Order) -> Result<(), DbError> {
        self.db.put(stores::ORDERS, order).await.map(|_| ())
    }

    pub(crate) async fn get(&self, order: OrderUuid) -> Result<Option<Order>, DbError> {
        self.db.get(stores::ORDERS, &order.key()).await
    }

    pub(crate) async fn list_for_user(&self, user: UserUuid) -> Result<Vec<Order>, DbError> {
        self.db
            .get_by_index(stores::ORDERS, indexes::USER_ID, user)
            .await
    }

    pub(crate) async fn list_by_status(
        &self,
        status: OrderStatus,
    ) -> Result<Vec<Order>, DbError> {
        self.db
            .get_by_index(stores::ORDERS, indexes::STATUS, status)
            .await
    }
}
