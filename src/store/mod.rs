//! Record store capability set.
//!
//! Services talk to persistence only through these traits. Rows cross the
//! boundary already mapped to the domain types in [`crate::models`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::{
    catalog::FilterSpec,
    models::{
        CartLineItem, NewBanner, NewCartLineItem, NewProduct, NewReview, Product,
        PromotionalBanner, Review, ReviewEdit, WishlistEntry,
    },
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// The store could not be reached or rejected the request.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sql(#[from] sqlx::Error),

    #[error("ORM error: {0}")]
    Orm(#[from] sea_orm::DbErr),

    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A merged cart quantity would not fit the quantity column.
    #[error("cart quantity out of range")]
    QuantityOutOfRange,
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Products in source order (ascending id). `prefilter` may be used to
    /// narrow the scan; callers still evaluate it on the returned rows.
    async fn list_products(&self, prefilter: &FilterSpec) -> StoreResult<Vec<Product>>;

    async fn get_product(&self, id: i64) -> StoreResult<Option<Product>>;

    async fn get_products(&self, ids: &[i64]) -> StoreResult<Vec<Product>>;

    async fn insert_product(&self, product: NewProduct) -> StoreResult<Product>;

    /// Replaces every field of an existing product. `None` when absent.
    async fn replace_product(&self, product: Product) -> StoreResult<Option<Product>>;

    async fn delete_product(&self, id: i64) -> StoreResult<bool>;
}

#[async_trait]
pub trait CartStore: Send + Sync {
    /// Line items, most recently added first.
    async fn list_cart_items(&self) -> StoreResult<Vec<CartLineItem>>;

    /// Adds `item.quantity` to the line item with the same product, size and
    /// color, or inserts `item` when there is none. Atomic per call. Fails
    /// with [`StoreError::QuantityOutOfRange`] and changes nothing when the
    /// sum overflows.
    async fn merge_cart_item(&self, item: NewCartLineItem) -> StoreResult<CartLineItem>;

    async fn set_cart_quantity(&self, id: i64, quantity: i32) -> StoreResult<Option<CartLineItem>>;

    async fn delete_cart_item(&self, id: i64) -> StoreResult<bool>;

    async fn clear_cart(&self) -> StoreResult<u64>;
}

#[async_trait]
pub trait WishlistStore: Send + Sync {
    /// Entries, most recently added first.
    async fn list_wishlist(&self) -> StoreResult<Vec<WishlistEntry>>;

    /// Inserts an entry unless one already exists for the product, in which
    /// case `None` is returned and nothing changes.
    async fn insert_wishlist_entry(
        &self,
        product_id: i64,
        added_at: DateTime<Utc>,
    ) -> StoreResult<Option<WishlistEntry>>;

    async fn delete_wishlist_entry(&self, product_id: i64) -> StoreResult<bool>;
}

#[async_trait]
pub trait ReviewStore: Send + Sync {
    /// Reviews for one product, newest first.
    async fn list_reviews(&self, product_id: i64) -> StoreResult<Vec<Review>>;

    async fn insert_review(&self, review: NewReview) -> StoreResult<Review>;

    async fn update_review(&self, id: i64, edit: ReviewEdit) -> StoreResult<Option<Review>>;

    async fn delete_review(&self, id: i64) -> StoreResult<bool>;
}

#[async_trait]
pub trait BannerStore: Send + Sync {
    /// Active banners by ascending priority.
    async fn list_active_banners(&self) -> StoreResult<Vec<PromotionalBanner>>;

    async fn get_banner(&self, id: i64) -> StoreResult<Option<PromotionalBanner>>;

    async fn insert_banner(&self, banner: NewBanner) -> StoreResult<PromotionalBanner>;

    async fn replace_banner(
        &self,
        banner: PromotionalBanner,
    ) -> StoreResult<Option<PromotionalBanner>>;

    async fn delete_banner(&self, id: i64) -> StoreResult<bool>;
}

/// Everything the storefront needs from persistence.
pub trait RecordStore: ProductStore + CartStore + WishlistStore + ReviewStore + BannerStore {}

impl<T> RecordStore for T where T: ProductStore + CartStore + WishlistStore + ReviewStore + BannerStore
{}
