use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Product;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: i64,
    pub quantity: i32,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub color: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCartItemRequest {
    pub quantity: i32,
}

/// A line item joined with its product.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartItemView {
    pub id: i64,
    pub product_id: i64,
    pub quantity: i32,
    pub size: String,
    pub color: String,
    pub added_at: DateTime<Utc>,
    pub product: Product,
}

#[derive(Debug, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartSummary {
    pub items: Vec<CartItemView>,
    /// Sum of quantities.
    pub item_count: i64,
    pub subtotal: i64,
    pub savings: i64,
}
