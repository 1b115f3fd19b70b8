use std::collections::HashMap;

use chrono::Utc;

use crate::{
    dto::cart::{AddToCartRequest, CartItemView, CartSummary, UpdateCartItemRequest},
    error::{AppError, AppResult},
    models::{CartLineItem, NewCartLineItem, Product},
    services::Fetched,
    state::AppState,
    store::{StoreError, StoreResult},
};

/// Line items joined with their products, newest first. Items whose
/// product no longer exists are dropped.
pub async fn get_cart_items(state: &AppState) -> Fetched<Vec<CartItemView>> {
    Fetched::from_store("get_cart_items", load_cart(state).await)
}

pub async fn get_cart_summary(state: &AppState) -> Fetched<CartSummary> {
    get_cart_items(state).await.map(summarize)
}

/// Adds `quantity` of a product variant. An existing line item with the same
/// product, size and color has its quantity increased instead.
pub async fn add_to_cart(state: &AppState, payload: AddToCartRequest) -> AppResult<CartLineItem> {
    ensure_quantity(payload.quantity)?;

    if state.store.get_product(payload.product_id).await?.is_none() {
        return Err(AppError::NotFound);
    }

    let item = state
        .store
        .merge_cart_item(NewCartLineItem {
            product_id: payload.product_id,
            quantity: payload.quantity,
            size: payload.size,
            color: payload.color,
            added_at: Utc::now(),
        })
        .await
        .map_err(|err| match err {
            StoreError::QuantityOutOfRange => {
                AppError::Validation("quantity exceeds the maximum for one line item".into())
            }
            other => AppError::Store(other),
        })?;

    tracing::info!(
        cart_item_id = item.id,
        product_id = item.product_id,
        quantity = item.quantity,
        "cart updated"
    );
    Ok(item)
}

pub async fn update_cart_item(
    state: &AppState,
    id: i64,
    payload: UpdateCartItemRequest,
) -> AppResult<CartLineItem> {
    ensure_quantity(payload.quantity)?;

    let item = state
        .store
        .set_cart_quantity(id, payload.quantity)
        .await?
        .ok_or(AppError::NotFound)?;

    tracing::info!(cart_item_id = id, quantity = item.quantity, "cart item quantity set");
    Ok(item)
}

/// Returns `false` when there was no such line item.
pub async fn remove_from_cart(state: &AppState, id: i64) -> AppResult<bool> {
    let removed = state.store.delete_cart_item(id).await?;
    if removed {
        tracing::info!(cart_item_id = id, "removed from cart");
    } else {
        tracing::debug!(cart_item_id = id, "cart item to remove was absent");
    }
    Ok(removed)
}

pub async fn clear_cart(state: &AppState) -> AppResult<u64> {
    let removed = state.store.clear_cart().await?;
    tracing::info!(removed, "cart cleared");
    Ok(removed)
}

fn ensure_quantity(quantity: i32) -> AppResult<()> {
    if quantity < 1 {
        return Err(AppError::Validation(
            "quantity must be greater than 0".to_string(),
        ));
    }
    Ok(())
}

async fn load_cart(state: &AppState) -> StoreResult<Vec<CartItemView>> {
    let items = state.store.list_cart_items().await?;
    let products = products_by_id(state, items.iter().map(|item| item.product_id)).await?;

    Ok(items
        .into_iter()
        .filter_map(|item| {
            let product = products.get(&item.product_id)?.clone();
            Some(CartItemView {
                id: item.id,
                product_id: item.product_id,
                quantity: item.quantity,
                size: item.size,
                color: item.color,
                added_at: item.added_at,
                product,
            })
        })
        .collect())
}

pub(crate) async fn products_by_id(
    state: &AppState,
    ids: impl Iterator<Item = i64>,
) -> StoreResult<HashMap<i64, Product>> {
    let mut ids: Vec<i64> = ids.collect();
    ids.sort_unstable();
    ids.dedup();
    let products = state.store.get_products(&ids).await?;
    Ok(products.into_iter().map(|p| (p.id, p)).collect())
}

fn summarize(items: Vec<CartItemView>) -> CartSummary {
    let mut summary = CartSummary::default();
    for item in &items {
        let quantity = i64::from(item.quantity);
        summary.item_count += quantity;
        summary.subtotal += item.product.effective_price() * quantity;
        if let Some(discount_price) = item.product.discount_price {
            summary.savings += (item.product.price - discount_price) * quantity;
        }
    }
    summary.items = items;
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewProduct;

    fn view(id: i64, quantity: i32, price: i64, discount: Option<i64>) -> CartItemView {
        let product = NewProduct {
            name: format!("Item {id}"),
            brand: "Nova".into(),
            price,
            discount_price: discount,
            images: vec![],
            sizes: vec![],
            colors: vec![],
            category: "Women".into(),
            subcategory: String::new(),
            in_stock: true,
            description: String::new(),
        }
        .into_product(id);
        CartItemView {
            id,
            product_id: id,
            quantity,
            size: "M".into(),
            color: "Red".into(),
            added_at: Utc::now(),
            product,
        }
    }

    #[test]
    fn summary_uses_effective_price() {
        let summary = summarize(vec![view(1, 2, 1000, Some(800)), view(2, 1, 500, None)]);
        assert_eq!(summary.item_count, 3);
        assert_eq!(summary.subtotal, 2 * 800 + 500);
        assert_eq!(summary.savings, 2 * 200);
        assert_eq!(summary.items.len(), 2);
    }

    #[test]
    fn rejects_non_positive_quantity() {
        assert!(ensure_quantity(1).is_ok());
        assert!(matches!(ensure_quantity(0), Err(AppError::Validation(_))));
        assert!(matches!(ensure_quantity(-3), Err(AppError::Validation(_))));
    }
}
