use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use sqlx::{FromRow, PgPool};

use super::{
    BannerStore, CartStore, ProductStore, ReviewStore, StoreError, StoreResult, WishlistStore,
};
use crate::{
    catalog::{Criterion, FilterSpec},
    entity::{
        CartItems, Products, PromotionalBanners, Reviews, WishlistItems, cart_items, products,
        promotional_banners, reviews, wishlist_items,
    },
    models::{
        CartLineItem, NewBanner, NewCartLineItem, NewProduct, NewReview, Product,
        PromotionalBanner, Review, ReviewEdit, WishlistEntry,
    },
};

/// PostgreSQL-backed store. Row CRUD goes through sea-orm; the atomic
/// upserts are plain sqlx statements on the same pool.
#[derive(Clone)]
pub struct PgStore {
    orm: DatabaseConnection,
}

impl PgStore {
    pub fn new(orm: DatabaseConnection) -> Self {
        Self { orm }
    }

    fn pool(&self) -> &PgPool {
        self.orm.get_postgres_connection_pool()
    }
}

#[derive(FromRow)]
struct CartItemRow {
    id: i64,
    product_id: i64,
    quantity: i32,
    size: String,
    color: String,
    added_at: DateTime<Utc>,
}

impl From<CartItemRow> for CartLineItem {
    fn from(row: CartItemRow) -> Self {
        Self {
            id: row.id,
            product_id: row.product_id,
            quantity: row.quantity,
            size: row.size,
            color: row.color,
            added_at: row.added_at,
        }
    }
}

#[derive(FromRow)]
struct WishlistRow {
    id: i64,
    product_id: i64,
    added_at: DateTime<Utc>,
}

fn product_from_entity(model: products::Model) -> Product {
    Product {
        id: model.id,
        name: model.name,
        brand: model.brand,
        price: model.price,
        discount_price: model.discount_price,
        images: model.images,
        sizes: model.sizes,
        colors: model.colors,
        category: model.category,
        subcategory: model.subcategory,
        in_stock: model.in_stock,
        description: model.description,
    }
}

fn cart_item_from_entity(model: cart_items::Model) -> CartLineItem {
    CartLineItem {
        id: model.id,
        product_id: model.product_id,
        quantity: model.quantity,
        size: model.size,
        color: model.color,
        added_at: model.added_at.with_timezone(&Utc),
    }
}

fn wishlist_entry_from_entity(model: wishlist_items::Model) -> WishlistEntry {
    WishlistEntry {
        id: model.id,
        product_id: model.product_id,
        added_at: model.added_at.with_timezone(&Utc),
    }
}

fn review_from_entity(model: reviews::Model) -> Review {
    Review {
        id: model.id,
        product_id: model.product_id,
        user_name: model.user_name,
        rating: model.rating,
        comment: model.comment,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

fn banner_from_entity(model: promotional_banners::Model) -> PromotionalBanner {
    PromotionalBanner {
        id: model.id,
        title: model.title,
        description: model.description,
        cta_text: model.cta_text,
        cta_link: model.cta_link,
        background_color: model.background_color,
        is_active: model.is_active,
        priority: model.priority,
        start_date: model.start_date.with_timezone(&Utc),
        end_date: model.end_date.map(|d| d.with_timezone(&Utc)),
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

/// `ILIKE` pattern matching `text` literally anywhere in the column.
/// Backslash is Postgres' default LIKE escape character.
fn contains_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for ch in text.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

// SQLSTATE 22003, numeric_value_out_of_range.
fn is_numeric_out_of_range(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|db| db.code())
        .is_some_and(|code| code == "22003")
}

/// Narrows the product scan with the criteria SQL expresses cheaply.
fn product_condition(prefilter: &FilterSpec) -> Condition {
    let mut condition = Condition::all();
    for criterion in prefilter.criteria() {
        condition = match criterion {
            Criterion::Search(text) => {
                let pattern = contains_pattern(text);
                condition.add(
                    Condition::any()
                        .add(Expr::col(products::Column::Name).ilike(pattern.clone()))
                        .add(Expr::col(products::Column::Brand).ilike(pattern.clone()))
                        .add(Expr::col(products::Column::Category).ilike(pattern)),
                )
            }
            Criterion::Categories(values) => {
                condition.add(products::Column::Category.is_in(values.clone()))
            }
            Criterion::Brands(values) => condition.add(products::Column::Brand.is_in(values.clone())),
            Criterion::MinDiscount(_) => condition.add(products::Column::DiscountPrice.is_not_null()),
            Criterion::Sizes(_) | Criterion::Colors(_) | Criterion::PriceRange { .. } => condition,
        };
    }
    condition
}

#[async_trait]
impl ProductStore for PgStore {
    async fn list_products(&self, prefilter: &FilterSpec) -> StoreResult<Vec<Product>> {
        let rows = Products::find()
            .filter(product_condition(prefilter))
            .order_by_asc(products::Column::Id)
            .all(&self.orm)
            .await?;
        Ok(rows.into_iter().map(product_from_entity).collect())
    }

    async fn get_product(&self, id: i64) -> StoreResult<Option<Product>> {
        let row = Products::find_by_id(id).one(&self.orm).await?;
        Ok(row.map(product_from_entity))
    }

    async fn get_products(&self, ids: &[i64]) -> StoreResult<Vec<Product>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = Products::find()
            .filter(products::Column::Id.is_in(ids.iter().copied()))
            .all(&self.orm)
            .await?;
        Ok(rows.into_iter().map(product_from_entity).collect())
    }

    async fn insert_product(&self, product: NewProduct) -> StoreResult<Product> {
        let active = products::ActiveModel {
            id: NotSet,
            name: Set(product.name),
            brand: Set(product.brand),
            price: Set(product.price),
            discount_price: Set(product.discount_price),
            images: Set(product.images),
            sizes: Set(product.sizes),
            colors: Set(product.colors),
            category: Set(product.category),
            subcategory: Set(product.subcategory),
            in_stock: Set(product.in_stock),
            description: Set(product.description),
        };
        let model = active.insert(&self.orm).await?;
        Ok(product_from_entity(model))
    }

    async fn replace_product(&self, product: Product) -> StoreResult<Option<Product>> {
        let active = products::ActiveModel {
            id: Set(product.id),
            name: Set(product.name),
            brand: Set(product.brand),
            price: Set(product.price),
            discount_price: Set(product.discount_price),
            images: Set(product.images),
            sizes: Set(product.sizes),
            colors: Set(product.colors),
            category: Set(product.category),
            subcategory: Set(product.subcategory),
            in_stock: Set(product.in_stock),
            description: Set(product.description),
        };
        match active.update(&self.orm).await {
            Ok(model) => Ok(Some(product_from_entity(model))),
            Err(DbErr::RecordNotUpdated) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn delete_product(&self, id: i64) -> StoreResult<bool> {
        let result = Products::delete_by_id(id).exec(&self.orm).await?;
        Ok(result.rows_affected > 0)
    }
}

#[async_trait]
impl CartStore for PgStore {
    async fn list_cart_items(&self) -> StoreResult<Vec<CartLineItem>> {
        let rows = CartItems::find()
            .order_by_desc(cart_items::Column::AddedAt)
            .order_by_desc(cart_items::Column::Id)
            .all(&self.orm)
            .await?;
        Ok(rows.into_iter().map(cart_item_from_entity).collect())
    }

    async fn merge_cart_item(&self, item: NewCartLineItem) -> StoreResult<CartLineItem> {
        let row = sqlx::query_as::<_, CartItemRow>(
            r#"
            INSERT INTO cart_items (product_id, quantity, size, color, added_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (product_id, size, color)
            DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity
            RETURNING id, product_id, quantity, size, color, added_at
            "#,
        )
        .bind(item.product_id)
        .bind(item.quantity)
        .bind(item.size)
        .bind(item.color)
        .bind(item.added_at)
        .fetch_one(self.pool())
        .await
        .map_err(|err| {
            if is_numeric_out_of_range(&err) {
                StoreError::QuantityOutOfRange
            } else {
                StoreError::Sql(err)
            }
        })?;
        Ok(row.into())
    }

    async fn set_cart_quantity(&self, id: i64, quantity: i32) -> StoreResult<Option<CartLineItem>> {
        let row = sqlx::query_as::<_, CartItemRow>(
            r#"
            UPDATE cart_items
            SET quantity = $2
            WHERE id = $1
            RETURNING id, product_id, quantity, size, color, added_at
            "#,
        )
        .bind(id)
        .bind(quantity)
        .fetch_optional(self.pool())
        .await?;
        Ok(row.map(Into::into))
    }

    async fn delete_cart_item(&self, id: i64) -> StoreResult<bool> {
        let result = CartItems::delete_by_id(id).exec(&self.orm).await?;
        Ok(result.rows_affected > 0)
    }

    async fn clear_cart(&self) -> StoreResult<u64> {
        let result = CartItems::delete_many().exec(&self.orm).await?;
        Ok(result.rows_affected)
    }
}

#[async_trait]
impl WishlistStore for PgStore {
    async fn list_wishlist(&self) -> StoreResult<Vec<WishlistEntry>> {
        let rows = WishlistItems::find()
            .order_by_desc(wishlist_items::Column::AddedAt)
            .order_by_desc(wishlist_items::Column::Id)
            .all(&self.orm)
            .await?;
        Ok(rows.into_iter().map(wishlist_entry_from_entity).collect())
    }

    async fn insert_wishlist_entry(
        &self,
        product_id: i64,
        added_at: DateTime<Utc>,
    ) -> StoreResult<Option<WishlistEntry>> {
        let row = sqlx::query_as::<_, WishlistRow>(
            r#"
            INSERT INTO wishlist_items (product_id, added_at)
            VALUES ($1, $2)
            ON CONFLICT (product_id) DO NOTHING
            RETURNING id, product_id, added_at
            "#,
        )
        .bind(product_id)
        .bind(added_at)
        .fetch_optional(self.pool())
        .await?;
        Ok(row.map(|row| WishlistEntry {
            id: row.id,
            product_id: row.product_id,
            added_at: row.added_at,
        }))
    }

    async fn delete_wishlist_entry(&self, product_id: i64) -> StoreResult<bool> {
        let result = WishlistItems::delete_many()
            .filter(wishlist_items::Column::ProductId.eq(product_id))
            .exec(&self.orm)
            .await?;
        Ok(result.rows_affected > 0)
    }
}

#[async_trait]
impl ReviewStore for PgStore {
    async fn list_reviews(&self, product_id: i64) -> StoreResult<Vec<Review>> {
        let rows = Reviews::find()
            .filter(reviews::Column::ProductId.eq(product_id))
            .order_by_desc(reviews::Column::CreatedAt)
            .order_by_desc(reviews::Column::Id)
            .all(&self.orm)
            .await?;
        Ok(rows.into_iter().map(review_from_entity).collect())
    }

    async fn insert_review(&self, review: NewReview) -> StoreResult<Review> {
        let created_at = review.created_at.fixed_offset();
        let active = reviews::ActiveModel {
            id: NotSet,
            product_id: Set(review.product_id),
            user_name: Set(review.user_name),
            rating: Set(review.rating),
            comment: Set(review.comment),
            created_at: Set(created_at),
            updated_at: Set(created_at),
        };
        let model = active.insert(&self.orm).await?;
        Ok(review_from_entity(model))
    }

    async fn update_review(&self, id: i64, edit: ReviewEdit) -> StoreResult<Option<Review>> {
        let existing = Reviews::find_by_id(id).one(&self.orm).await?;
        let Some(existing) = existing else {
            return Ok(None);
        };

        let mut active: reviews::ActiveModel = existing.into();
        active.user_name = Set(edit.user_name);
        active.rating = Set(edit.rating);
        active.comment = Set(edit.comment);
        active.updated_at = Set(edit.updated_at.fixed_offset());
        let model = active.update(&self.orm).await?;
        Ok(Some(review_from_entity(model)))
    }

    async fn delete_review(&self, id: i64) -> StoreResult<bool> {
        let result = Reviews::delete_by_id(id).exec(&self.orm).await?;
        Ok(result.rows_affected > 0)
    }
}

#[async_trait]
impl BannerStore for PgStore {
    async fn list_active_banners(&self) -> StoreResult<Vec<PromotionalBanner>> {
        let rows = PromotionalBanners::find()
            .filter(promotional_banners::Column::IsActive.eq(true))
            .order_by_asc(promotional_banners::Column::Priority)
            .order_by_asc(promotional_banners::Column::Id)
            .all(&self.orm)
            .await?;
        Ok(rows.into_iter().map(banner_from_entity).collect())
    }

    async fn get_banner(&self, id: i64) -> StoreResult<Option<PromotionalBanner>> {
        let row = PromotionalBanners::find_by_id(id).one(&self.orm).await?;
        Ok(row.map(banner_from_entity))
    }

    async fn insert_banner(&self, banner: NewBanner) -> StoreResult<PromotionalBanner> {
        let created_at = banner.created_at.fixed_offset();
        let active = promotional_banners::ActiveModel {
            id: NotSet,
            title: Set(banner.title),
            description: Set(banner.description),
            cta_text: Set(banner.cta_text),
            cta_link: Set(banner.cta_link),
            background_color: Set(banner.background_color),
            is_active: Set(banner.is_active),
            priority: Set(banner.priority),
            start_date: Set(banner.start_date.fixed_offset()),
            end_date: Set(banner.end_date.map(|d| d.fixed_offset())),
            created_at: Set(created_at),
            updated_at: Set(created_at),
        };
        let model = active.insert(&self.orm).await?;
        Ok(banner_from_entity(model))
    }

    async fn replace_banner(
        &self,
        banner: PromotionalBanner,
    ) -> StoreResult<Option<PromotionalBanner>> {
        let active = promotional_banners::ActiveModel {
            id: Set(banner.id),
            title: Set(banner.title),
            description: Set(banner.description),
            cta_text: Set(banner.cta_text),
            cta_link: Set(banner.cta_link),
            background_color: Set(banner.background_color),
            is_active: Set(banner.is_active),
            priority: Set(banner.priority),
            start_date: Set(banner.start_date.fixed_offset()),
            end_date: Set(banner.end_date.map(|d| d.fixed_offset())),
            created_at: Set(banner.created_at.fixed_offset()),
            updated_at: Set(banner.updated_at.fixed_offset()),
        };
        match active.update(&self.orm).await {
            Ok(model) => Ok(Some(banner_from_entity(model))),
            Err(DbErr::RecordNotUpdated) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn delete_banner(&self, id: i64) -> StoreResult<bool> {
        let result = PromotionalBanners::delete_by_id(id).exec(&self.orm).await?;
        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::contains_pattern;

    #[test]
    fn search_pattern_escapes_like_metacharacters() {
        assert_eq!(contains_pattern("dress"), "%dress%");
        assert_eq!(contains_pattern(r"50%_off\"), r"%50\%\_off\\%");
        assert_eq!(contains_pattern(r"a\x"), r"%a\\x%");
    }
}
