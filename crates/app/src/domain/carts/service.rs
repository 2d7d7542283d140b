//! Carts service.
//!
//! One cart API over both storage scopes. The service owns the stock and
//! merge invariants; the backing stores only move entries. Stock is checked
//! at mutation time and never reserved.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use satchel::{Db, KvStore};
use tracing::{debug, info, warn};

use crate::{
    domain::{
        carts::{
            errors::CartsServiceError,
            models::{CartEntry, CartLine, ProductRef},
            policy::ShippingPolicy,
            stores::{ActiveCartStore, AnonymousCartStore, UserCartStore},
        },
        orders::models::{Order, OrderDetails, OrderLine, OrderStatus},
        products::{ProductsRepository, models::Product},
    },
    events::{ChangeEvent, Changes},
    session::Session,
    uuids::{OrderUuid, ProductUuid, UserUuid},
};

/// Reject a quantity the declared stock cannot cover. Undeclared stock never
/// rejects.
fn check_stock(stock: Option<u32>, requested: u32) -> Result<(), CartsServiceError> {
    match stock {
        Some(available) if requested > available => Err(CartsServiceError::InsufficientStock {
            requested,
            available,
        }),
        _ => Ok(()),
    }
}

/// Cap a quantity at the declared stock, when there is one.
fn capped(stock: Option<u32>, quantity: u32) -> u32 {
    stock.map_or(quantity, |available| quantity.min(available))
}

#[derive(Debug, Clone)]
pub struct LocalCartsService {
    db: Arc<Db>,
    anonymous: AnonymousCartStore,
    products: ProductsRepository,
    policy: ShippingPolicy,
    changes: Changes,
}

impl LocalCartsService {
    #[must_use]
    pub fn new(db: Arc<Db>, kv: Arc<KvStore>, changes: Changes) -> Self {
        Self::with_policy(db, kv, changes, ShippingPolicy::default())
    }

    #[must_use]
    pub fn with_policy(
        db: Arc<Db>,
        kv: Arc<KvStore>,
        changes: Changes,
        policy: ShippingPolicy,
    ) -> Self {
        Self {
            products: ProductsRepository::new(db.clone()),
            anonymous: AnonymousCartStore::new(kv),
            db,
            policy,
            changes,
        }
    }

    fn store_for(&self, session: Session) -> ActiveCartStore {
        match session {
            Session::Anonymous => ActiveCartStore::Anonymous(self.anonymous.clone()),
            Session::User(user) => {
                ActiveCartStore::User(UserCartStore::new(self.db.clone(), user))
            }
        }
    }

    async fn resolve(
        &self,
        product: &ProductRef,
    ) -> Result<Option<Product>, CartsServiceError> {
        match product {
            ProductRef::Snapshot(snapshot) => Ok(Some(snapshot.clone())),
            ProductRef::Reference(id) => Ok(self.products.get(*id).await?),
        }
    }

    async fn load_lines(&self, session: Session) -> Result<Vec<CartLine>, CartsServiceError> {
        let entries = self.store_for(session).read().await?;
        let mut lines = Vec::with_capacity(entries.len());

        for entry in entries {
            let product_uuid = entry.product.uuid();
            let product = self.resolve(&entry.product).await?;

            lines.push(CartLine::from_resolved(product_uuid, product, entry.quantity));
        }

        Ok(lines)
    }

    /// Apply the anonymous entries to the user's cart one at a time, dropping
    /// each from the anonymous blob as soon as it is durably applied. A
    /// failure partway leaves only the unmerged remainder behind, so a
    /// retried merge cannot double-apply.
    async fn merge_entries(
        &self,
        user: UserUuid,
        anonymous_items: &[CartEntry],
    ) -> Result<(), CartsServiceError> {
        let user_store = UserCartStore::new(self.db.clone(), user);
        let mut user_entries = user_store.read().await?;
        let mut remainder: Vec<CartEntry> = anonymous_items.to_vec();

        for item in anonymous_items {
            let product_id = item.product.uuid();
            let product = item
                .product
                .snapshot()
                .cloned()
                .ok_or(CartsServiceError::MissingSnapshot(product_id))?;

            match user_entries
                .iter_mut()
                .find(|entry| entry.product.uuid() == product_id)
            {
                Some(existing) => {
                    let merged = existing.quantity.saturating_add(item.quantity);
                    let allowed = capped(product.stock, merged);

                    if allowed < merged {
                        debug!(product = %product_id, merged, allowed, "merge capped at declared stock");
                    }

                    existing.quantity = allowed;
                    existing.updated_at = Some(Timestamp::now());
                }
                None => {
                    let allowed = capped(product.stock, item.quantity);

                    if allowed < item.quantity {
                        debug!(product = %product_id, requested = item.quantity, allowed, "merge capped at declared stock");
                    }

                    if allowed > 0 {
                        user_entries.push(CartEntry::new(product, allowed));
                    }
                }
            }

            user_entries.retain(|entry| entry.quantity > 0);
            user_store.write(&user_entries).await?;

            remainder.retain(|entry| entry.product.uuid() != product_id);
            self.anonymous.write(&remainder)?;
        }

        Ok(())
    }
}

#[async_trait]
impl CartsService for LocalCartsService {
    async fn get_cart(&self, session: Session) -> Vec<CartLine> {
        match self.load_lines(session).await {
            Ok(lines) => lines,
            Err(error) => {
                warn!(%error, "cart read failed, returning empty cart");
                Vec::new()
            }
        }
    }

    #[tracing::instrument(
        name = "carts.service.add_to_cart",
        skip(self, product),
        fields(product_uuid = %product.id, quantity),
        err
    )]
    async fn add_to_cart(
        &self,
        session: Session,
        product: &Product,
        quantity: u32,
    ) -> Result<(), CartsServiceError> {
        if product.id.is_nil() {
            return Err(CartsServiceError::InvalidProduct);
        }

        if quantity == 0 {
            return Err(CartsServiceError::InvalidQuantity);
        }

        check_stock(product.stock, quantity)?;

        let store = self.store_for(session);
        let mut entries = store.read().await?;

        match entries
            .iter_mut()
            .find(|entry| entry.product.uuid() == product.id)
        {
            Some(existing) => {
                let requested = existing.quantity.saturating_add(quantity);

                check_stock(product.stock, requested)?;

                existing.quantity = requested;
                existing.updated_at = Some(Timestamp::now());
            }
            None => entries.push(CartEntry::new(product.clone(), quantity)),
        }

        store.write(&entries).await?;
        self.changes.notify(ChangeEvent::CartChanged);

        Ok(())
    }

    async fn update_quantity(
        &self,
        session: Session,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<(), CartsServiceError> {
        if quantity == 0 {
            return self.remove_from_cart(session, product).await;
        }

        let store = self.store_for(session);
        let mut entries = store.read().await?;

        let Some(entry) = entries
            .iter_mut()
            .find(|entry| entry.product.uuid() == product)
        else {
            return Err(CartsServiceError::ItemNotFound);
        };

        let stock = match &entry.product {
            ProductRef::Snapshot(snapshot) => snapshot.stock,
            ProductRef::Reference(id) => {
                self.products.get(*id).await?.and_then(|found| found.stock)
            }
        };

        check_stock(stock, quantity)?;

        entry.quantity = quantity;
        entry.updated_at = Some(Timestamp::now());

        store.write(&entries).await?;
        self.changes.notify(ChangeEvent::CartChanged);

        Ok(())
    }

    async fn remove_from_cart(
        &self,
        session: Session,
        product: ProductUuid,
    ) -> Result<(), CartsServiceError> {
        let store = self.store_for(session);
        let mut entries = store.read().await?;
        let before = entries.len();

        entries.retain(|entry| entry.product.uuid() != product);

        // removing an absent item still succeeds, without a write or event
        if entries.len() == before {
            return Ok(());
        }

        store.write(&entries).await?;
        self.changes.notify(ChangeEvent::CartChanged);

        Ok(())
    }

    async fn clear_cart(&self, session: Session) -> Result<(), CartsServiceError> {
        self.store_for(session).clear().await?;
        self.changes.notify(ChangeEvent::CartChanged);

        Ok(())
    }

    #[tracing::instrument(name = "carts.service.merge_at_login", skip(self), fields(user = %user), err)]
    async fn merge_at_login(&self, user: UserUuid) -> Result<(), CartsServiceError> {
        let anonymous_items = self.anonymous.read();

        if anonymous_items.is_empty() {
            return Ok(());
        }

        let result = self.merge_entries(user, &anonymous_items).await;

        match &result {
            Ok(()) => {
                self.anonymous.clear();
                info!(merged = anonymous_items.len(), "merged anonymous cart into user cart");
            }
            Err(error) => {
                warn!(%error, "merge aborted, unmerged items remain in the anonymous scope");
            }
        }

        self.changes.notify(ChangeEvent::CartChanged);

        result
    }

    fn shipping_fee(&self, subtotal: u64) -> u64 {
        self.policy.fee(subtotal)
    }

    async fn create_order_from_cart(
        &self,
        session: Session,
        details: OrderDetails,
    ) -> Result<Order, CartsServiceError> {
        let store = self.store_for(session);
        let entries = store.read().await?;

        if entries.is_empty() {
            return Err(CartsServiceError::EmptyCart);
        }

        let mut items = Vec::with_capacity(entries.len());
        let mut subtotal: u64 = 0;

        for entry in &entries {
            let product_uuid = entry.product.uuid();
            let product = self
                .resolve(&entry.product)
                .await?
                .ok_or(CartsServiceError::UnpricedLine(product_uuid))?;

            let line_total = product.price.saturating_mul(u64::from(entry.quantity));

            items.push(OrderLine {
                product_id: product_uuid,
                name: product.name,
                unit_price: product.price,
                quantity: entry.quantity,
                line_total,
            });

            subtotal = subtotal.saturating_add(line_total);
        }

        let shipping_fee = self.policy.fee(subtotal);

        let order = Order {
            id: OrderUuid::generate(),
            user_id: session.user(),
            items,
            subtotal,
            shipping_fee,
            total: subtotal.saturating_add(shipping_fee),
            status: OrderStatus::Pending,
            details,
            placed_at: Timestamp::now(),
        };

        store.clear().await?;
        self.changes.notify(ChangeEvent::CartChanged);

        info!(order = %order.id, lines = order.items.len(), total = order.total, "snapshotted cart into order");

        Ok(order)
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// The session's cart, resolved to renderable lines.
    ///
    /// Degrades to an empty cart on read failure; never errors.
    async fn get_cart(&self, session: Session) -> Vec<CartLine>;

    /// Add `quantity` of `product`, merging into an existing line for the
    /// same product.
    async fn add_to_cart(
        &self,
        session: Session,
        product: &Product,
        quantity: u32,
    ) -> Result<(), CartsServiceError>;

    /// Set a line's quantity. Zero removes the line.
    async fn update_quantity(
        &self,
        session: Session,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<(), CartsServiceError>;

    /// Remove the line for `product`. Succeeds when no line matches.
    async fn remove_from_cart(
        &self,
        session: Session,
        product: ProductUuid,
    ) -> Result<(), CartsServiceError>;

    /// Remove every line in the session's scope.
    async fn clear_cart(&self, session: Session) -> Result<(), CartsServiceError>;

    /// Fold the anonymous cart into `user`'s cart, capping merged quantities
    /// at declared stock, then drop the anonymous cart. Invoked once at
    /// successful login.
    async fn merge_at_login(&self, user: UserUuid) -> Result<(), CartsServiceError>;

    /// The shipping fee for a subtotal, per the flat policy.
    fn shipping_fee(&self, subtotal: u64) -> u64;

    /// Snapshot the cart into a pending [`Order`] and clear the cart. The
    /// order is returned, not persisted; persistence belongs to the orders
    /// service.
    async fn create_order_from_cart(
        &self,
        session: Session,
        details: OrderDetails,
    ) -> Result<Order, CartsServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        domain::products::ProductsService,
        schema::keys,
        test::{TestContext, checkout_details, detached_product},
    };

    use super::*;

    #[tokio::test]
    async fn add_to_anonymous_cart_stores_snapshot() -> TestResult {
        let ctx = TestContext::new().await;
        let product = detached_product("Walnut Desk", 129_00, Some(5));

        ctx.carts
            .add_to_cart(Session::Anonymous, &product, 2)
            .await?;

        let cart = ctx.carts.get_cart(Session::Anonymous).await;

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.first().map(|line| line.quantity), Some(2));
        assert_eq!(cart.first().and_then(|line| line.unit_price), Some(129_00));
        assert!(ctx.kv.contains(keys::ANONYMOUS_CART));

        Ok(())
    }

    #[tokio::test]
    async fn adding_same_product_twice_merges_into_one_line() -> TestResult {
        let ctx = TestContext::new().await;
        let product = detached_product("Walnut Desk", 129_00, None);

        ctx.carts
            .add_to_cart(Session::Anonymous, &product, 1)
            .await?;
        ctx.carts
            .add_to_cart(Session::Anonymous, &product, 2)
            .await?;

        let cart = ctx.carts.get_cart(Session::Anonymous).await;

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.first().map(|line| line.quantity), Some(3));

        Ok(())
    }

    #[tokio::test]
    async fn add_rejects_quantity_above_stock() {
        let ctx = TestContext::new().await;
        let product = detached_product("Walnut Desk", 129_00, Some(2));

        let result = ctx
            .carts
            .add_to_cart(Session::Anonymous, &product, 3)
            .await;

        assert!(
            matches!(
                result,
                Err(CartsServiceError::InsufficientStock {
                    requested: 3,
                    available: 2
                })
            ),
            "expected InsufficientStock, got {result:?}"
        );
        assert!(ctx.carts.get_cart(Session::Anonymous).await.is_empty());
    }

    #[tokio::test]
    async fn add_rejects_increment_that_would_exceed_stock() -> TestResult {
        let ctx = TestContext::new().await;
        let product = detached_product("Walnut Desk", 129_00, Some(4));

        ctx.carts
            .add_to_cart(Session::Anonymous, &product, 3)
            .await?;

        let result = ctx
            .carts
            .add_to_cart(Session::Anonymous, &product, 2)
            .await;

        assert!(
            matches!(
                result,
                Err(CartsServiceError::InsufficientStock {
                    requested: 5,
                    available: 4
                })
            ),
            "expected InsufficientStock, got {result:?}"
        );

        let cart = ctx.carts.get_cart(Session::Anonymous).await;
        assert_eq!(cart.first().map(|line| line.quantity), Some(3));

        Ok(())
    }

    #[tokio::test]
    async fn undeclared_stock_never_rejects_on_stock_grounds() -> TestResult {
        let ctx = TestContext::new().await;
        let product = detached_product("Ceramic Mug", 9_00, None);

        ctx.carts
            .add_to_cart(Session::Anonymous, &product, 1_000)
            .await?;
        ctx.carts
            .add_to_cart(Session::Anonymous, &product, 1_000)
            .await?;

        let cart = ctx.carts.get_cart(Session::Anonymous).await;
        assert_eq!(cart.first().map(|line| line.quantity), Some(2_000));

        Ok(())
    }

    #[tokio::test]
    async fn add_rejects_nil_product_id_without_mutating_state() {
        let ctx = TestContext::new().await;
        let mut product = detached_product("Ghost Item", 1_00, None);
        product.id = ProductUuid::from_uuid(uuid::Uuid::nil());

        let result = ctx
            .carts
            .add_to_cart(Session::Anonymous, &product, 1)
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::InvalidProduct)),
            "expected InvalidProduct, got {result:?}"
        );
        assert!(!ctx.kv.contains(keys::ANONYMOUS_CART));
    }

    #[tokio::test]
    async fn add_rejects_zero_quantity() {
        let ctx = TestContext::new().await;
        let product = detached_product("Walnut Desk", 129_00, None);

        let result = ctx
            .carts
            .add_to_cart(Session::Anonymous, &product, 0)
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::InvalidQuantity)),
            "expected InvalidQuantity, got {result:?}"
        );
    }

    #[tokio::test]
    async fn update_quantity_zero_removes_the_line() -> TestResult {
        let ctx = TestContext::new().await;
        let product = detached_product("Walnut Desk", 129_00, None);

        ctx.carts
            .add_to_cart(Session::Anonymous, &product, 2)
            .await?;
        ctx.carts
            .update_quantity(Session::Anonymous, product.id, 0)
            .await?;

        assert!(ctx.carts.get_cart(Session::Anonymous).await.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn update_quantity_revalidates_against_stock() -> TestResult {
        let ctx = TestContext::new().await;
        let product = detached_product("Walnut Desk", 129_00, Some(4));

        ctx.carts
            .add_to_cart(Session::Anonymous, &product, 2)
            .await?;

        let result = ctx
            .carts
            .update_quantity(Session::Anonymous, product.id, 5)
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::InsufficientStock { .. })),
            "expected InsufficientStock, got {result:?}"
        );

        ctx.carts
            .update_quantity(Session::Anonymous, product.id, 4)
            .await?;

        let cart = ctx.carts.get_cart(Session::Anonymous).await;
        assert_eq!(cart.first().map(|line| line.quantity), Some(4));

        Ok(())
    }

    #[tokio::test]
    async fn update_quantity_on_missing_item_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx
            .carts
            .update_quantity(Session::Anonymous, ProductUuid::generate(), 2)
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::ItemNotFound)),
            "expected ItemNotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn removing_absent_item_still_succeeds() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.carts
            .remove_from_cart(Session::Anonymous, ProductUuid::generate())
            .await?;

        Ok(())
    }

    #[tokio::test]
    async fn clear_cart_twice_leaves_empty_cart_without_error() -> TestResult {
        let ctx = TestContext::new().await;
        let product = detached_product("Walnut Desk", 129_00, None);

        ctx.carts
            .add_to_cart(Session::Anonymous, &product, 1)
            .await?;

        ctx.carts.clear_cart(Session::Anonymous).await?;
        ctx.carts.clear_cart(Session::Anonymous).await?;

        assert!(ctx.carts.get_cart(Session::Anonymous).await.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn user_scope_persists_records_and_resolves_at_read() -> TestResult {
        let ctx = TestContext::new().await;
        let session = Session::User(UserUuid::generate());

        let product = ctx.create_product("Walnut Desk", 129_00, Some(5)).await?;
        ctx.carts.add_to_cart(session, &product, 2).await?;

        assert_eq!(ctx.db.count(crate::schema::stores::CART_ITEMS).await?, 1);

        let cart = ctx.carts.get_cart(session).await;
        assert_eq!(cart.len(), 1);
        assert_eq!(
            cart.first().and_then(|line| line.product.as_ref()).map(|p| p.id),
            Some(product.id)
        );
        assert_eq!(cart.first().and_then(|line| line.line_total), Some(258_00));

        Ok(())
    }

    #[tokio::test]
    async fn stale_user_scope_reference_resolves_to_none() -> TestResult {
        let ctx = TestContext::new().await;
        let session = Session::User(UserUuid::generate());

        let product = ctx.create_product("Walnut Desk", 129_00, None).await?;
        ctx.carts.add_to_cart(session, &product, 1).await?;
        ctx.products.delete_product(product.id).await?;

        let cart = ctx.carts.get_cart(session).await;

        assert_eq!(cart.len(), 1);
        assert!(cart.first().is_some_and(|line| line.product.is_none()));
        assert_eq!(cart.first().and_then(|line| line.unit_price), None);

        Ok(())
    }

    #[tokio::test]
    async fn anonymous_and_user_scopes_are_isolated() -> TestResult {
        let ctx = TestContext::new().await;
        let session = Session::User(UserUuid::generate());
        let product = detached_product("Walnut Desk", 129_00, None);

        ctx.carts
            .add_to_cart(Session::Anonymous, &product, 1)
            .await?;

        assert!(ctx.carts.get_cart(session).await.is_empty());
        assert_eq!(ctx.carts.get_cart(Session::Anonymous).await.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn merge_caps_combined_quantity_at_declared_stock() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::generate();
        let session = Session::User(user);

        let product = ctx.create_product("Walnut Desk", 129_00, Some(4)).await?;

        ctx.carts.add_to_cart(session, &product, 2).await?;
        ctx.carts
            .add_to_cart(Session::Anonymous, &product, 3)
            .await?;

        ctx.carts.merge_at_login(user).await?;

        let cart = ctx.carts.get_cart(session).await;
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.first().map(|line| line.quantity), Some(4));

        Ok(())
    }

    #[tokio::test]
    async fn merge_moves_new_items_and_empties_anonymous_scope() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::generate();

        let product = ctx.create_product("Ceramic Mug", 9_00, None).await?;
        ctx.carts
            .add_to_cart(Session::Anonymous, &product, 1)
            .await?;

        ctx.carts.merge_at_login(user).await?;

        let cart = ctx.carts.get_cart(Session::User(user)).await;
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.first().map(|line| line.quantity), Some(1));

        assert!(ctx.carts.get_cart(Session::Anonymous).await.is_empty());
        assert!(!ctx.kv.contains(keys::ANONYMOUS_CART));

        Ok(())
    }

    #[tokio::test]
    async fn merge_caps_new_items_at_declared_stock() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::generate();

        let product = ctx.create_product("Walnut Desk", 129_00, Some(3)).await?;

        // planted directly: add_to_cart would already reject 5 against stock 3
        ctx.kv.write(
            keys::ANONYMOUS_CART,
            &vec![crate::domain::carts::models::AnonymousCartItem {
                product: product.clone(),
                quantity: 5,
            }],
        )?;

        ctx.carts.merge_at_login(user).await?;

        let cart = ctx.carts.get_cart(Session::User(user)).await;
        assert_eq!(cart.first().map(|line| line.quantity), Some(3));

        Ok(())
    }

    #[tokio::test]
    async fn merge_with_empty_anonymous_cart_is_a_noop() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::generate();

        ctx.carts.merge_at_login(user).await?;

        assert!(ctx.carts.get_cart(Session::User(user)).await.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn mutations_notify_subscribers() -> TestResult {
        let ctx = TestContext::new().await;
        let mut receiver = ctx.changes.subscribe();
        let product = detached_product("Walnut Desk", 129_00, None);

        ctx.carts
            .add_to_cart(Session::Anonymous, &product, 1)
            .await?;

        assert!(matches!(receiver.recv().await, Ok(ChangeEvent::CartChanged)));

        Ok(())
    }

    #[tokio::test]
    async fn order_snapshot_captures_lines_and_totals() -> TestResult {
        let ctx = TestContext::new().await;
        let desk = detached_product("Walnut Desk", 10_00, None);
        let mug = detached_product("Ceramic Mug", 5_00, None);

        ctx.carts.add_to_cart(Session::Anonymous, &desk, 2).await?;
        ctx.carts.add_to_cart(Session::Anonymous, &mug, 1).await?;

        let order = ctx
            .carts
            .create_order_from_cart(Session::Anonymous, checkout_details())
            .await?;

        assert_eq!(order.items.len(), 2);
        assert_eq!(order.subtotal, 25_00);
        assert_eq!(order.shipping_fee, 7_90);
        assert_eq!(order.total, 32_90);
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.user_id, None);

        assert!(ctx.carts.get_cart(Session::Anonymous).await.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn order_above_threshold_ships_free() -> TestResult {
        let ctx = TestContext::new().await;
        let desk = detached_product("Walnut Desk", 60_00, None);

        ctx.carts.add_to_cart(Session::Anonymous, &desk, 1).await?;

        let order = ctx
            .carts
            .create_order_from_cart(Session::Anonymous, checkout_details())
            .await?;

        assert_eq!(order.shipping_fee, 0);
        assert_eq!(order.total, 60_00);

        Ok(())
    }

    #[tokio::test]
    async fn order_from_empty_cart_is_rejected() {
        let ctx = TestContext::new().await;

        let result = ctx
            .carts
            .create_order_from_cart(Session::Anonymous, checkout_details())
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::EmptyCart)),
            "expected EmptyCart, got {result:?}"
        );
    }

    #[tokio::test]
    async fn shipping_fee_follows_the_flat_policy() {
        let ctx = TestContext::new().await;

        assert_eq!(ctx.carts.shipping_fee(59_99), 7_90);
        assert_eq!(ctx.carts.shipping_fee(60_00), 0);
    }
}
