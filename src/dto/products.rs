use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Product;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub name: String,
    pub brand: String,
    pub price: i64,
    pub discount_price: Option<i64>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub colors: Vec<String>,
    pub category: String,
    #[serde(default)]
    pub subcategory: String,
    pub in_stock: Option<bool>,
    #[serde(default)]
    pub description: String,
}

/// Partial update. `discountPrice: null` is indistinguishable from absent;
/// use `clearDiscount` to remove a discount.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub price: Option<i64>,
    pub discount_price: Option<i64>,
    #[serde(default)]
    pub clear_discount: bool,
    pub images: Option<Vec<String>>,
    pub sizes: Option<Vec<String>>,
    pub colors: Option<Vec<String>>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub in_stock: Option<bool>,
    pub description: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct ProductList {
    #[schema(value_type = Vec<Product>)]
    pub items: Vec<Product>,
}

/// Filter sidebar options derived from the catalog.
#[derive(Debug, Default, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CatalogFacets {
    pub categories: Vec<String>,
    pub brands: Vec<String>,
    pub sizes: Vec<String>,
    pub colors: Vec<String>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
}
