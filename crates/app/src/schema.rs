//! Storefront schema declaration.
//!
//! Declares, once, the stores and indexes of the structured scope plus the
//! fixed key-value keys of the anonymous scope. Future schema changes are
//! additional [`Migration`] entries with higher versions; the engine runs
//! only the steps above the stored version.

use satchel::{Migration, Schema, StoreDef};

/// Store names of the structured scope.
pub mod stores {
    /// User accounts.
    pub const USERS: &str = "users";
    /// Product catalog.
    pub const PRODUCTS: &str = "products";
    /// Per-user cart line items.
    pub const CART_ITEMS: &str = "cartItems";
    /// Placed orders.
    pub const ORDERS: &str = "orders";
    /// Per-user wishlist entries.
    pub const WISHLIST: &str = "wishlist";
    /// Saved shipping/billing addresses.
    pub const ADDRESSES: &str = "addresses";
    /// Quote requests.
    pub const QUOTES: &str = "quotes";
    /// Blog posts.
    pub const BLOG_POSTS: &str = "blogPosts";
    /// Blog comments.
    pub const BLOG_COMMENTS: &str = "blogComments";
    /// Product categories.
    pub const CATEGORIES: &str = "categories";
}

/// Index names, shared with the record field they cover.
pub mod indexes {
    /// Owning user.
    pub const USER_ID: &str = "userId";
    /// Referenced product.
    pub const PRODUCT_ID: &str = "productId";
    /// Unique account email.
    pub const EMAIL: &str = "email";
    /// Account role.
    pub const ROLE: &str = "role";
    /// Product or post category.
    pub const CATEGORY: &str = "category";
    /// Popular-product flag.
    pub const POPULAR: &str = "popular";
    /// Featured-product flag.
    pub const FEATURED: &str = "featured";
    /// Order or quote status.
    pub const STATUS: &str = "status";
    /// Order, quote or post date.
    pub const DATE: &str = "date";
    /// Default-address flag.
    pub const IS_DEFAULT: &str = "isDefault";
    /// Address type.
    pub const TYPE: &str = "type";
    /// Post author.
    pub const AUTHOR: &str = "author";
    /// Commented post.
    pub const POST_ID: &str = "postId";
    /// Parent comment of a reply.
    pub const PARENT_ID: &str = "parentId";
    /// Unique category name.
    pub const NAME: &str = "name";
}

/// Fixed key-value keys of the anonymous scope.
pub mod keys {
    /// The anonymous cart blob: a JSON array of `{product, quantity}` items.
    pub const ANONYMOUS_CART: &str = "storefront.anonymous-cart";
    /// The anonymous wishlist blob: a JSON array of `{product}` items.
    pub const ANONYMOUS_WISHLIST: &str = "storefront.anonymous-wishlist";
}

/// The storefront schema at its current version.
#[must_use]
pub fn storefront_schema() -> Schema {
    Schema::new(vec![Migration {
        version: 1,
        stores: vec![
            StoreDef::keyed(stores::USERS, "id")
                .unique_index(indexes::EMAIL, indexes::EMAIL)
                .index(indexes::ROLE, indexes::ROLE),
            StoreDef::keyed(stores::PRODUCTS, "id")
                .index(indexes::CATEGORY, indexes::CATEGORY)
                .index(indexes::POPULAR, indexes::POPULAR)
                .index(indexes::FEATURED, indexes::FEATURED),
            StoreDef::auto(stores::CART_ITEMS, "id")
                .index(indexes::USER_ID, indexes::USER_ID)
                .index(indexes::PRODUCT_ID, indexes::PRODUCT_ID),
            StoreDef::keyed(stores::ORDERS, "id")
                .index(indexes::USER_ID, indexes::USER_ID)
                .index(indexes::STATUS, indexes::STATUS)
                .index(indexes::DATE, indexes::DATE),
            StoreDef::auto(stores::WISHLIST, "id")
                .index(indexes::USER_ID, indexes::USER_ID)
                .index(indexes::PRODUCT_ID, indexes::PRODUCT_ID),
            StoreDef::keyed(stores::ADDRESSES, "id")
                .index(indexes::USER_ID, indexes::USER_ID)
                .index(indexes::IS_DEFAULT, indexes::IS_DEFAULT)
                .index(indexes::TYPE, indexes::TYPE),
            StoreDef::keyed(stores::QUOTES, "id")
                .index(indexes::USER_ID, indexes::USER_ID)
                .index(indexes::STATUS, indexes::STATUS)
                .index(indexes::DATE, indexes::DATE),
            StoreDef::keyed(stores::BLOG_POSTS, "id")
                .index(indexes::CATEGORY, indexes::CATEGORY)
                .index(indexes::AUTHOR, indexes::AUTHOR)
                .index(indexes::DATE, indexes::DATE),
            StoreDef::auto(stores::BLOG_COMMENTS, "id")
                .index(indexes::POST_ID, indexes::POST_ID)
                .index(indexes::USER_ID, indexes::USER_ID)
                .index(indexes::PARENT_ID, indexes::PARENT_ID),
            StoreDef::keyed(stores::CATEGORIES, "id")
                .unique_index(indexes::NAME, indexes::NAME),
        ],
    }])
}
