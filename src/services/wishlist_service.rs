use chrono::Utc;

use crate::{
    dto::wishlist::WishlistItemView,
    error::{AppError, AppResult},
    models::WishlistEntry,
    services::{Fetched, cart_service::products_by_id},
    state::AppState,
    store::StoreResult,
};

pub async fn get_wishlist_items(state: &AppState) -> Fetched<Vec<WishlistItemView>> {
    Fetched::from_store("get_wishlist_items", load_wishlist(state).await)
}

pub async fn add_to_wishlist(state: &AppState, product_id: i64) -> AppResult<WishlistEntry> {
    if state.store.get_product(product_id).await?.is_none() {
        return Err(AppError::NotFound);
    }

    let entry = state
        .store
        .insert_wishlist_entry(product_id, Utc::now())
        .await?
        .ok_or_else(|| AppError::AlreadyExists("product already in wishlist".into()))?;

    tracing::info!(product_id, "added to wishlist");
    Ok(entry)
}

pub async fn remove_from_wishlist(state: &AppState, product_id: i64) -> AppResult<()> {
    if !state.store.delete_wishlist_entry(product_id).await? {
        return Err(AppError::NotFound);
    }
    tracing::info!(product_id, "removed from wishlist");
    Ok(())
}

async fn load_wishlist(state: &AppState) -> StoreResult<Vec<WishlistItemView>> {
    let entries = state.store.list_wishlist().await?;
    let products = products_by_id(state, entries.iter().map(|e| e.product_id)).await?;

    Ok(entries
        .into_iter()
        .filter_map(|entry| {
            let product = products.get(&entry.product_id)?.clone();
            Some(WishlistItemView {
                id: entry.id,
                product_id: entry.product_id,
                added_at: entry.added_at,
                product,
            })
        })
        .collect())
}
