use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub brand: String,
    pub price: i64,
    pub discount_price: Option<i64>,
    pub images: Vec<String>,
    pub sizes: Vec<String>,
    pub colors: Vec<String>,
    pub category: String,
    pub subcategory: String,
    pub in_stock: bool,
    pub description: String,
}

impl Product {
    /// The price the shopper actually pays.
    pub fn effective_price(&self) -> i64 {
        self.discount_price.unwrap_or(self.price)
    }

    /// `round((price - discountPrice) / price * 100)`, or `None` without a discount.
    pub fn discount_percentage(&self) -> Option<i64> {
        let discount = self.discount_price?;
        if self.price <= 0 {
            return None;
        }
        let pct = (self.price - discount) as f64 / self.price as f64 * 100.0;
        Some(pct.round() as i64)
    }
}

/// Fields needed to insert a product; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub brand: String,
    pub price: i64,
    pub discount_price: Option<i64>,
    pub images: Vec<String>,
    pub sizes: Vec<String>,
    pub colors: Vec<String>,
    pub category: String,
    pub subcategory: String,
    pub in_stock: bool,
    pub description: String,
}

impl NewProduct {
    pub fn into_product(self, id: i64) -> Product {
        Product {
            id,
            name: self.name,
            brand: self.brand,
            price: self.price,
            discount_price: self.discount_price,
            images: self.images,
            sizes: self.sizes,
            colors: self.colors,
            category: self.category,
            subcategory: self.subcategory,
            in_stock: self.in_stock,
            description: self.description,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    pub id: i64,
    pub product_id: i64,
    pub quantity: i32,
    pub size: String,
    pub color: String,
    pub added_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewCartLineItem {
    pub product_id: i64,
    pub quantity: i32,
    pub size: String,
    pub color: String,
    pub added_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WishlistEntry {
    pub id: i64,
    pub product_id: i64,
    pub added_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: i64,
    pub product_id: i64,
    pub user_name: String,
    pub rating: i16,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewReview {
    pub product_id: i64,
    pub user_name: String,
    pub rating: i16,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

/// Replacement values for an edited review.
#[derive(Debug, Clone)]
pub struct ReviewEdit {
    pub user_name: String,
    pub rating: i16,
    pub comment: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PromotionalBanner {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub cta_text: String,
    pub cta_link: String,
    pub background_color: String,
    pub is_active: bool,
    pub priority: i32,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewBanner {
    pub title: String,
    pub description: String,
    pub cta_text: String,
    pub cta_link: String,
    pub background_color: String,
    pub is_active: bool,
    pub priority: i32,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl NewBanner {
    pub fn into_banner(self, id: i64) -> PromotionalBanner {
        PromotionalBanner {
            id,
            title: self.title,
            description: self.description,
            cta_text: self.cta_text,
            cta_link: self.cta_link,
            background_color: self.background_color,
            is_active: self.is_active,
            priority: self.priority,
            start_date: self.start_date,
            end_date: self.end_date,
            created_at: self.created_at,
            updated_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(price: i64, discount_price: Option<i64>) -> Product {
        NewProduct {
            name: "Linen Shirt".into(),
            brand: "Maison".into(),
            price,
            discount_price,
            images: vec![],
            sizes: vec![],
            colors: vec![],
            category: "Men".into(),
            subcategory: "Shirts".into(),
            in_stock: true,
            description: String::new(),
        }
        .into_product(1)
    }

    #[test]
    fn effective_price_prefers_discount() {
        assert_eq!(product(2000, Some(1500)).effective_price(), 1500);
        assert_eq!(product(2000, None).effective_price(), 2000);
    }

    #[test]
    fn discount_percentage_rounds_to_nearest() {
        assert_eq!(product(2999, Some(1999)).discount_percentage(), Some(33));
        assert_eq!(product(1000, Some(995)).discount_percentage(), Some(1));
        assert_eq!(product(1000, Some(250)).discount_percentage(), Some(75));
        assert_eq!(product(1000, None).discount_percentage(), None);
    }
}
