use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::{
    BannerStore, CartStore, ProductStore, ReviewStore, StoreError, StoreResult, WishlistStore,
};
use crate::{
    catalog::FilterSpec,
    models::{
        CartLineItem, NewBanner, NewCartLineItem, NewProduct, NewReview, Product,
        PromotionalBanner, Review, ReviewEdit, WishlistEntry,
    },
    seed,
};

struct Table<T> {
    rows: BTreeMap<i64, T>,
    next_id: i64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl<T> Table<T> {
    fn allocate_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

#[derive(Default)]
struct Tables {
    products: Table<Product>,
    cart_items: Table<CartLineItem>,
    wishlist: Table<WishlistEntry>,
    reviews: Table<Review>,
    banners: Table<PromotionalBanner>,
}

/// In-process record store. Each instance owns its own tables.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    offline: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store preloaded with the demo catalog and banners.
    pub fn with_demo_data() -> Self {
        let mut tables = Tables::default();
        for product in seed::demo_products() {
            let id = tables.products.allocate_id();
            tables.products.rows.insert(id, product.into_product(id));
        }
        for banner in seed::demo_banners(Utc::now()) {
            let id = tables.banners.allocate_id();
            tables.banners.rows.insert(id, banner.into_banner(id));
        }
        Self {
            tables: RwLock::new(tables),
            offline: AtomicBool::new(false),
        }
    }

    /// While offline every call fails with [`StoreError::Unavailable`].
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn ensure_online(&self) -> StoreResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store is offline".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn list_products(&self, _prefilter: &FilterSpec) -> StoreResult<Vec<Product>> {
        self.ensure_online()?;
        let tables = self.tables.read().await;
        Ok(tables.products.rows.values().cloned().collect())
    }

    async fn get_product(&self, id: i64) -> StoreResult<Option<Product>> {
        self.ensure_online()?;
        let tables = self.tables.read().await;
        Ok(tables.products.rows.get(&id).cloned())
    }

    async fn get_products(&self, ids: &[i64]) -> StoreResult<Vec<Product>> {
        self.ensure_online()?;
        let tables = self.tables.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| tables.products.rows.get(id).cloned())
            .collect())
    }

    async fn insert_product(&self, product: NewProduct) -> StoreResult<Product> {
        self.ensure_online()?;
        let mut tables = self.tables.write().await;
        let id = tables.products.allocate_id();
        let product = product.into_product(id);
        tables.products.rows.insert(id, product.clone());
        Ok(product)
    }

    async fn replace_product(&self, product: Product) -> StoreResult<Option<Product>> {
        self.ensure_online()?;
        let mut tables = self.tables.write().await;
        match tables.products.rows.get_mut(&product.id) {
            Some(slot) => {
                *slot = product.clone();
                Ok(Some(product))
            }
            None => Ok(None),
        }
    }

    async fn delete_product(&self, id: i64) -> StoreResult<bool> {
        self.ensure_online()?;
        let mut tables = self.tables.write().await;
        Ok(tables.products.rows.remove(&id).is_some())
    }
}

#[async_trait]
impl CartStore for MemoryStore {
    async fn list_cart_items(&self) -> StoreResult<Vec<CartLineItem>> {
        self.ensure_online()?;
        let tables = self.tables.read().await;
        let mut items: Vec<CartLineItem> = tables.cart_items.rows.values().cloned().collect();
        items.sort_by(|a, b| b.added_at.cmp(&a.added_at).then(b.id.cmp(&a.id)));
        Ok(items)
    }

    async fn merge_cart_item(&self, item: NewCartLineItem) -> StoreResult<CartLineItem> {
        self.ensure_online()?;
        let mut tables = self.tables.write().await;
        let existing = tables.cart_items.rows.values_mut().find(|line| {
            line.product_id == item.product_id && line.size == item.size && line.color == item.color
        });
        if let Some(line) = existing {
            line.quantity = line
                .quantity
                .checked_add(item.quantity)
                .ok_or(StoreError::QuantityOutOfRange)?;
            return Ok(line.clone());
        }

        let id = tables.cart_items.allocate_id();
        let line = CartLineItem {
            id,
            product_id: item.product_id,
            quantity: item.quantity,
            size: item.size,
            color: item.color,
            added_at: item.added_at,
        };
        tables.cart_items.rows.insert(id, line.clone());
        Ok(line)
    }

    async fn set_cart_quantity(&self, id: i64, quantity: i32) -> StoreResult<Option<CartLineItem>> {
        self.ensure_online()?;
        let mut tables = self.tables.write().await;
        Ok(tables.cart_items.rows.get_mut(&id).map(|line| {
            line.quantity = quantity;
            line.clone()
        }))
    }

    async fn delete_cart_item(&self, id: i64) -> StoreResult<bool> {
        self.ensure_online()?;
        let mut tables = self.tables.write().await;
        Ok(tables.cart_items.rows.remove(&id).is_some())
    }

    async fn clear_cart(&self) -> StoreResult<u64> {
        self.ensure_online()?;
        let mut tables = self.tables.write().await;
        let removed = tables.cart_items.rows.len() as u64;
        tables.cart_items.rows.clear();
        Ok(removed)
    }
}

#[async_trait]
impl WishlistStore for MemoryStore {
    async fn list_wishlist(&self) -> StoreResult<Vec<WishlistEntry>> {
        self.ensure_online()?;
        let tables = self.tables.read().await;
        let mut entries: Vec<WishlistEntry> = tables.wishlist.rows.values().cloned().collect();
        entries.sort_by(|a, b| b.added_at.cmp(&a.added_at).then(b.id.cmp(&a.id)));
        Ok(entries)
    }

    async fn insert_wishlist_entry(
        &self,
        product_id: i64,
        added_at: DateTime<Utc>,
    ) -> StoreResult<Option<WishlistEntry>> {
        self.ensure_online()?;
        let mut tables = self.tables.write().await;
        if tables
            .wishlist
            .rows
            .values()
            .any(|entry| entry.product_id == product_id)
        {
            return Ok(None);
        }
        let id = tables.wishlist.allocate_id();
        let entry = WishlistEntry {
            id,
            product_id,
            added_at,
        };
        tables.wishlist.rows.insert(id, entry.clone());
        Ok(Some(entry))
    }

    async fn delete_wishlist_entry(&self, product_id: i64) -> StoreResult<bool> {
        self.ensure_online()?;
        let mut tables = self.tables.write().await;
        let before = tables.wishlist.rows.len();
        tables
            .wishlist
            .rows
            .retain(|_, entry| entry.product_id != product_id);
        Ok(tables.wishlist.rows.len() < before)
    }
}

#[async_trait]
impl ReviewStore for MemoryStore {
    async fn list_reviews(&self, product_id: i64) -> StoreResult<Vec<Review>> {
        self.ensure_online()?;
        let tables = self.tables.read().await;
        let mut reviews: Vec<Review> = tables
            .reviews
            .rows
            .values()
            .filter(|review| review.product_id == product_id)
            .cloned()
            .collect();
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(reviews)
    }

    async fn insert_review(&self, review: NewReview) -> StoreResult<Review> {
        self.ensure_online()?;
        let mut tables = self.tables.write().await;
        let id = tables.reviews.allocate_id();
        let review = Review {
            id,
            product_id: review.product_id,
            user_name: review.user_name,
            rating: review.rating,
            comment: review.comment,
            created_at: review.created_at,
            updated_at: review.created_at,
        };
        tables.reviews.rows.insert(id, review.clone());
        Ok(review)
    }

    async fn update_review(&self, id: i64, edit: ReviewEdit) -> StoreResult<Option<Review>> {
        self.ensure_online()?;
        let mut tables = self.tables.write().await;
        Ok(tables.reviews.rows.get_mut(&id).map(|review| {
            review.user_name = edit.user_name;
            review.rating = edit.rating;
            review.comment = edit.comment;
            review.updated_at = edit.updated_at;
            review.clone()
        }))
    }

    async fn delete_review(&self, id: i64) -> StoreResult<bool> {
        self.ensure_online()?;
        let mut tables = self.tables.write().await;
        Ok(tables.reviews.rows.remove(&id).is_some())
    }
}

#[async_trait]
impl BannerStore for MemoryStore {
    async fn list_active_banners(&self) -> StoreResult<Vec<PromotionalBanner>> {
        self.ensure_online()?;
        let tables = self.tables.read().await;
        let mut banners: Vec<PromotionalBanner> = tables
            .banners
            .rows
            .values()
            .filter(|banner| banner.is_active)
            .cloned()
            .collect();
        banners.sort_by(|a, b| a.priority.cmp(&b.priority).then(a.id.cmp(&b.id)));
        Ok(banners)
    }

    async fn get_banner(&self, id: i64) -> StoreResult<Option<PromotionalBanner>> {
        self.ensure_online()?;
        let tables = self.tables.read().await;
        Ok(tables.banners.rows.get(&id).cloned())
    }

    async fn insert_banner(&self, banner: NewBanner) -> StoreResult<PromotionalBanner> {
        self.ensure_online()?;
        let mut tables = self.tables.write().await;
        let id = tables.banners.allocate_id();
        let banner = banner.into_banner(id);
        tables.banners.rows.insert(id, banner.clone());
        Ok(banner)
    }

    async fn replace_banner(
        &self,
        banner: PromotionalBanner,
    ) -> StoreResult<Option<PromotionalBanner>> {
        self.ensure_online()?;
        let mut tables = self.tables.write().await;
        match tables.banners.rows.get_mut(&banner.id) {
            Some(slot) => {
                *slot = banner.clone();
                Ok(Some(banner))
            }
            None => Ok(None),
        }
    }

    async fn delete_banner(&self, id: i64) -> StoreResult<bool> {
        self.ensure_online()?;
        let mut tables = self.tables.write().await;
        Ok(tables.banners.rows.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(product_id: i64, quantity: i32, size: &str) -> NewCartLineItem {
        NewCartLineItem {
            product_id,
            quantity,
            size: size.into(),
            color: "Red".into(),
            added_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn ids_are_allocated_per_table() {
        let store = MemoryStore::new();
        let a = store.merge_cart_item(line(1, 1, "M")).await.unwrap();
        let b = store.merge_cart_item(line(1, 1, "L")).await.unwrap();
        let w = store.insert_wishlist_entry(1, Utc::now()).await.unwrap().unwrap();
        assert_eq!((a.id, b.id, w.id), (1, 2, 1));
    }

    #[tokio::test]
    async fn offline_store_rejects_calls() {
        let store = MemoryStore::with_demo_data();
        store.set_offline(true);
        let err = store.list_products(&FilterSpec::new()).await.unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));

        store.set_offline(false);
        assert!(!store.list_products(&FilterSpec::new()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn overflowing_merge_leaves_line_untouched() {
        let store = MemoryStore::new();
        store.merge_cart_item(line(3, i32::MAX, "M")).await.unwrap();
        let err = store.merge_cart_item(line(3, 1, "M")).await.unwrap_err();
        assert!(matches!(err, StoreError::QuantityOutOfRange));

        let items = store.list_cart_items().await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, i32::MAX);
    }

    #[tokio::test]
    async fn deleted_ids_are_not_reused() {
        let store = MemoryStore::new();
        let first = store.merge_cart_item(line(7, 1, "S")).await.unwrap();
        assert!(store.delete_cart_item(first.id).await.unwrap());
        let second = store.merge_cart_item(line(7, 1, "S")).await.unwrap();
        assert_ne!(first.id, second.id);
    }
}
