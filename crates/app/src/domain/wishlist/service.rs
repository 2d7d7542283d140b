//! Wishlist service.
//!
//! Dual-scope like the cart, without quantities or stock math: the anonymous
//! scope is one key-value blob of product snapshots, the user scope one
//! `wishlist` record per product. Re-adding a wished product is a no-op.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use satchel::{Db, Key, KvStore};
use tracing::{info, warn};

use crate::{
    domain::{
        products::{ProductsRepository, models::Product},
        wishlist::{
            errors::WishlistServiceError,
            models::{AnonymousWishlistItem, WishlistLine, WishlistRecord},
        },
    },
    events::{ChangeEvent, Changes},
    schema::{indexes, keys, stores},
    session::Session,
    uuids::{ProductUuid, UserUuid},
};

#[derive(Debug, Clone)]
pub struct LocalWishlistService {
    db: Arc<Db>,
    kv: Arc<KvStore>,
    products: ProductsRepository,
    changes: Changes,
}

impl LocalWishlistService {
    #[must_use]
    pub fn new(db: Arc<Db>, kv: Arc<KvStore>, changes: Changes) -> Self {
        Self {
            products: ProductsRepository::new(db.clone()),
            db,
            kv,
            changes,
        }
    }

    fn anonymous_items(&self) -> Vec<AnonymousWishlistItem> {
        self.kv.read(keys::ANONYMOUS_WISHLIST)
    }

    async fn user_records(
        &self,
        user: UserUuid,
    ) -> Result<Vec<WishlistRecord>, WishlistServiceError> {
        Ok(self
            .db
            .get_by_index(stores::WISHLIST, indexes::USER_ID, user)
            .await?)
    }

    async fn load_lines(
        &self,
        session: Session,
    ) -> Result<Vec<WishlistLine>, WishlistServiceError> {
        match session {
            Session::Anonymous => Ok(self
                .anonymous_items()
                .into_iter()
                .map(|item| WishlistLine {
                    product_uuid: item.product.id,
                    product: Some(item.product),
                })
                .collect()),
            Session::User(user) => {
                let records = self.user_records(user).await?;
                let mut lines = Vec::with_capacity(records.len());

                for record in records {
                    let product = self.products.get(record.product_id).await?;

                    lines.push(WishlistLine {
                        product_uuid: record.product_id,
                        product,
                    });
                }

                Ok(lines)
            }
        }
    }

    async fn add_for_user(
        &self,
        user: UserUuid,
        product: ProductUuid,
    ) -> Result<bool, WishlistServiceError> {
        let records = self.user_records(user).await?;

        if records.iter().any(|record| record.product_id == product) {
            return Ok(false);
        }

        self.db
            .add(
                stores::WISHLIST,
                &WishlistRecord {
                    id: None,
                    user_id: user,
                    product_id: product,
                    added_at: Timestamp::now(),
                },
            )
            .await?;

        Ok(true)
    }

    async fn delete_record(&self, record: &WishlistRecord) -> Result<(), WishlistServiceError> {
        let Some(id) = record.id else {
            warn!(user = %record.user_id, product = %record.product_id, "wishlist record without id, skipping delete");
            return Ok(());
        };

        self.db.delete(stores::WISHLIST, &Key::Serial(id)).await?;

        Ok(())
    }
}

#[async_trait]
impl WishlistService for LocalWishlistService {
    async fn get_wishlist(&self, session: Session) -> Vec<WishlistLine> {
        match self.load_lines(session).await {
            Ok(lines) => lines,
            Err(error) => {
                warn!(%error, "wishlist read failed, returning empty wishlist");
                Vec::new()
            }
        }
    }

    async fn add(&self, session: Session, product: &Product) -> Result<(), WishlistServiceError> {
        if product.id.is_nil() {
            return Err(WishlistServiceError::InvalidProduct);
        }

        let added = match session {
            Session::Anonymous => {
                let mut items = self.anonymous_items();

                if items.iter().any(|item| item.product.id == product.id) {
                    false
                } else {
                    items.push(AnonymousWishlistItem {
                        product: product.clone(),
                    });
                    self.kv.write(keys::ANONYMOUS_WISHLIST, &items)?;
                    true
                }
            }
            Session::User(user) => self.add_for_user(user, product.id).await?,
        };

        if added {
            self.changes.notify(ChangeEvent::WishlistChanged);
        }

        Ok(())
    }

    async fn remove(
        &self,
        session: Session,
        product: ProductUuid,
    ) -> Result<(), WishlistServiceError> {
        let removed = match session {
            Session::Anonymous => {
                let mut items = self.anonymous_items();
                let before = items.len();

                items.retain(|item| item.product.id != product);

                if items.len() == before {
                    false
                } else {
                    self.kv.write(keys::ANONYMOUS_WISHLIST, &items)?;
                    true
                }
            }
            Session::User(user) => {
                let mut removed = false;

                for record in self.user_records(user).await? {
                    if record.product_id == product {
                        self.delete_record(&record).await?;
                        removed = true;
                    }
                }

                removed
            }
        };

        if removed {
            self.changes.notify(ChangeEvent::WishlistChanged);
        }

        Ok(())
    }

    async fn contains(
        &self,
        session: Session,
        product: ProductUuid,
    ) -> Result<bool, WishlistServiceError> {
        match session {
            Session::Anonymous => Ok(self
                .anonymous_items()
                .iter()
                .any(|item| item.product.id == product)),
            Session::User(user) => Ok(self
                .user_records(user)
                .await?
                .iter()
                .any(|record| record.product_id == product)),
        }
    }

    async fn clear(&self, session: Session) -> Result<(), WishlistServiceError> {
        match session {
            Session::Anonymous => self.kv.remove(keys::ANONYMOUS_WISHLIST),
            Session::User(user) => {
                for record in self.user_records(user).await? {
                    self.delete_record(&record).await?;
                }
            }
        }

        self.changes.notify(ChangeEvent::WishlistChanged);

        Ok(())
    }

    async fn merge_at_login(&self, user: UserUuid) -> Result<(), WishlistServiceError> {
        let items = self.anonymous_items();

        if items.is_empty() {
            return Ok(());
        }

        let mut remainder = items.clone();

        for item in &items {
            self.add_for_user(user, item.product.id).await?;

            remainder.retain(|entry| entry.product.id != item.product.id);
            self.kv.write(keys::ANONYMOUS_WISHLIST, &remainder)?;
        }

        self.kv.remove(keys::ANONYMOUS_WISHLIST);
        self.changes.notify(ChangeEvent::WishlistChanged);

        info!(%user, merged = items.len(), "merged anonymous wishlist into user wishlist");

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait WishlistService: Send + Sync {
    /// The session's wishlist, resolved to renderable lines.
    ///
    /// Degrades to an empty wishlist on read failure; never errors.
    async fn get_wishlist(&self, session: Session) -> Vec<WishlistLine>;

    /// Wish for a product. Re-adding a wished product is a no-op.
    async fn add(&self, session: Session, product: &Product)
    -> Result<(), WishlistServiceError>;

    /// Drop a product from the wishlist. Succeeds when it was not wished.
    async fn remove(
        &self,
        session: Session,
        product: ProductUuid,
    ) -> Result<(), WishlistServiceError>;

    /// Whether the wishlist holds the product.
    async fn contains(
        &self,
        session: Session,
        product: ProductUuid,
    ) -> Result<bool, WishlistServiceError>;

    /// Drop every wished product in the session's scope.
    async fn clear(&self, session: Session) -> Result<(), WishlistServiceError>;

    /// Union the anonymous wishlist into `user`'s, then drop the anonymous
    /// blob. Invoked once at successful login.
    async fn merge_at_login(&self, user: UserUuid) -> Result<(), WishlistServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::test::{TestContext, detached_product};

    use super::*;

    #[tokio::test]
    async fn add_and_contains_in_anonymous_scope() -> TestResult {
        let ctx = TestContext::new().await;
        let product = detached_product("Walnut Desk", 129_00, None);

        ctx.wishlist.add(Session::Anonymous, &product).await?;

        assert!(ctx.wishlist.contains(Session::Anonymous, product.id).await?);
        assert_eq!(ctx.wishlist.get_wishlist(Session::Anonymous).await.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn re_adding_a_wished_product_is_a_noop() -> TestResult {
        let ctx = TestContext::new().await;
        let product = detached_product("Walnut Desk", 129_00, None);

        ctx.wishlist.add(Session::Anonymous, &product).await?;
        ctx.wishlist.add(Session::Anonymous, &product).await?;

        assert_eq!(ctx.wishlist.get_wishlist(Session::Anonymous).await.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn removing_an_unwished_product_still_succeeds() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.wishlist
            .remove(Session::Anonymous, ProductUuid::generate())
            .await?;

        Ok(())
    }

    #[tokio::test]
    async fn user_scope_stores_records_per_product() -> TestResult {
        let ctx = TestContext::new().await;
        let session = Session::User(UserUuid::generate());

        let product = ctx.create_product("Walnut Desk", 129_00, None).await?;
        ctx.wishlist.add(session, &product).await?;

        assert_eq!(ctx.db.count(stores::WISHLIST).await?, 1);

        let lines = ctx.wishlist.get_wishlist(session).await;
        assert_eq!(lines.first().map(|line| line.product_uuid), Some(product.id));
        assert!(lines.first().is_some_and(|line| line.product.is_some()));

        Ok(())
    }

    #[tokio::test]
    async fn merge_unions_into_user_wishlist_and_clears_anonymous() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::generate();

        let desk = ctx.create_product("Walnut Desk", 129_00, None).await?;
        let mug = ctx.create_product("Ceramic Mug", 9_00, None).await?;

        ctx.wishlist.add(Session::User(user), &desk).await?;
        ctx.wishlist.add(Session::Anonymous, &desk).await?;
        ctx.wishlist.add(Session::Anonymous, &mug).await?;

        ctx.wishlist.merge_at_login(user).await?;

        let lines = ctx.wishlist.get_wishlist(Session::User(user)).await;
        assert_eq!(lines.len(), 2);

        assert!(ctx.wishlist.get_wishlist(Session::Anonymous).await.is_empty());
        assert!(!ctx.kv.contains(keys::ANONYMOUS_WISHLIST));

        Ok(())
    }

    #[tokio::test]
    async fn mutations_notify_subscribers() -> TestResult {
        let ctx = TestContext::new().await;
        let mut receiver = ctx.changes.subscribe();
        let product = detached_product("Walnut Desk", 129_00, None);

        ctx.wishlist.add(Session::Anonymous, &product).await?;

        assert!(matches!(
            receiver.recv().await,
            Ok(ChangeEvent::WishlistChanged)
        ));

        Ok(())
    }
}
