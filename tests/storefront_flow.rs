use std::sync::Arc;

use fashion_storefront::{
    catalog::{FilterSpec, SortKey},
    dto::{
        cart::{AddToCartRequest, UpdateCartItemRequest},
        products::UpdateProductRequest,
        reviews::ReviewRequest,
    },
    error::AppError,
    services::{cart_service, product_service, review_service, wishlist_service},
    state::AppState,
    store::MemoryStore,
};

fn demo_state() -> (AppState, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::with_demo_data());
    (AppState::new(store.clone()), store)
}

fn add(product_id: i64, quantity: i32, size: &str, color: &str) -> AddToCartRequest {
    AddToCartRequest {
        product_id,
        quantity,
        size: size.into(),
        color: color.into(),
    }
}

fn review(rating: i16) -> ReviewRequest {
    ReviewRequest {
        user_name: "Meera".into(),
        rating,
        comment: "True to size".into(),
    }
}

fn ids(products: &[fashion_storefront::models::Product]) -> Vec<i64> {
    products.iter().map(|p| p.id).collect()
}

#[tokio::test]
async fn empty_spec_returns_catalog_in_source_order() {
    let (state, _) = demo_state();
    let fetched =
        product_service::query_products(&state, &FilterSpec::new().search("  "), SortKey::Featured, None)
            .await;

    assert!(!fetched.is_degraded());
    assert_eq!(ids(&fetched.data), (1..=8).collect::<Vec<_>>());
}

#[tokio::test]
async fn dimensions_are_and_values_are_or() {
    let (state, _) = demo_state();
    let spec = FilterSpec::new()
        .brands(["Mango", "H&M"])
        .sizes(["M"]);
    let fetched = product_service::query_products(&state, &spec, SortKey::Featured, None).await;

    // Mango skirt and overcoat plus the H&M shirt carry an M; the kids tee does not.
    assert_eq!(ids(&fetched.data), vec![2, 6, 8]);
}

#[tokio::test]
async fn price_filter_uses_effective_price_inclusively() {
    let (state, _) = demo_state();
    let spec = FilterSpec::new().price_range(Some(1249), Some(1999));
    let fetched = product_service::query_products(&state, &spec, SortKey::PriceLow, None).await;

    assert_eq!(ids(&fetched.data), vec![6, 2, 1]);
}

#[tokio::test]
async fn discount_filter_and_sort() {
    let (state, _) = demo_state();
    let spec = FilterSpec::new().min_discount(Some(25));
    let fetched = product_service::query_products(&state, &spec, SortKey::Featured, None).await;
    assert_eq!(ids(&fetched.data), vec![1, 4, 6]);

    let all = product_service::query_products(&state, &FilterSpec::new(), SortKey::Discount, None)
        .await
        .data;
    for pair in all.windows(2) {
        assert!(pair[0].discount_price >= pair[1].discount_price);
    }
    for product in &all {
        if let Some(discount_price) = product.discount_price {
            let expected = ((product.price - discount_price) as f64 / product.price as f64 * 100.0).round() as i64;
            assert_eq!(product.discount_percentage(), Some(expected));
        }
    }
}

#[tokio::test]
async fn limit_truncates_after_sorting() {
    let (state, _) = demo_state();
    let fetched =
        product_service::query_products(&state, &FilterSpec::new(), SortKey::PriceHigh, Some(2)).await;
    assert_eq!(ids(&fetched.data), vec![8, 4]);
}

#[tokio::test]
async fn add_to_cart_merges_matching_variant() {
    let (state, _) = demo_state();
    cart_service::add_to_cart(&state, add(1, 2, "M", "Red")).await.unwrap();
    let merged = cart_service::add_to_cart(&state, add(1, 3, "M", "Red")).await.unwrap();
    assert_eq!(merged.quantity, 5);

    let items = cart_service::get_cart_items(&state).await.data;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].quantity, 5);
}

#[tokio::test]
async fn add_to_cart_keeps_distinct_variants_apart() {
    let (state, _) = demo_state();
    cart_service::add_to_cart(&state, add(1, 1, "M", "Red")).await.unwrap();
    cart_service::add_to_cart(&state, add(1, 1, "L", "Red")).await.unwrap();

    let summary = cart_service::get_cart_summary(&state).await.data;
    assert_eq!(summary.items.len(), 2);
    assert_eq!(summary.item_count, 2);
    assert_eq!(summary.subtotal, 2 * 1999);
    assert_eq!(summary.savings, 2 * 1000);
}

#[tokio::test]
async fn merge_past_quantity_limit_is_rejected() {
    let (state, _) = demo_state();
    cart_service::add_to_cart(&state, add(1, i32::MAX, "M", "Red")).await.unwrap();

    let overflow = cart_service::add_to_cart(&state, add(1, 1, "M", "Red")).await;
    let err = overflow.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert!(!err.is_retryable());

    let items = cart_service::get_cart_items(&state).await.data;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].quantity, i32::MAX);
}

#[tokio::test]
async fn cart_rejects_bad_input() {
    let (state, _) = demo_state();
    let zero = cart_service::add_to_cart(&state, add(1, 0, "M", "Red")).await;
    assert!(matches!(zero, Err(AppError::Validation(_))));

    let unknown = cart_service::add_to_cart(&state, add(999, 1, "M", "Red")).await;
    assert!(matches!(unknown, Err(AppError::NotFound)));

    let missing = cart_service::update_cart_item(&state, 42, UpdateCartItemRequest { quantity: 2 }).await;
    assert!(matches!(missing, Err(AppError::NotFound)));

    assert!(cart_service::get_cart_items(&state).await.data.is_empty());
}

#[tokio::test]
async fn update_replaces_quantity_and_remove_reports_absence() {
    let (state, _) = demo_state();
    let item = cart_service::add_to_cart(&state, add(2, 4, "L", "White")).await.unwrap();

    let updated = cart_service::update_cart_item(&state, item.id, UpdateCartItemRequest { quantity: 1 })
        .await
        .unwrap();
    assert_eq!(updated.quantity, 1);

    let rejected =
        cart_service::update_cart_item(&state, item.id, UpdateCartItemRequest { quantity: 0 }).await;
    assert!(matches!(rejected, Err(AppError::Validation(_))));

    assert!(cart_service::remove_from_cart(&state, item.id).await.unwrap());
    assert!(!cart_service::remove_from_cart(&state, item.id).await.unwrap());
    assert!(!cart_service::remove_from_cart(&state, 9999).await.unwrap());
}

#[tokio::test]
async fn clear_cart_removes_everything() {
    let (state, _) = demo_state();
    cart_service::add_to_cart(&state, add(1, 1, "S", "Pink")).await.unwrap();
    cart_service::add_to_cart(&state, add(7, 1, "9", "White")).await.unwrap();

    assert_eq!(cart_service::clear_cart(&state).await.unwrap(), 2);
    assert!(cart_service::get_cart_items(&state).await.data.is_empty());
}

#[tokio::test]
async fn second_wishlist_add_is_rejected() {
    let (state, _) = demo_state();
    wishlist_service::add_to_wishlist(&state, 3).await.unwrap();
    let again = wishlist_service::add_to_wishlist(&state, 3).await;
    assert!(matches!(again, Err(AppError::AlreadyExists(_))));

    let items = wishlist_service::get_wishlist_items(&state).await.data;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].product_id, 3);
    assert_eq!(items[0].product.brand, "Levis");

    wishlist_service::remove_from_wishlist(&state, 3).await.unwrap();
    let gone = wishlist_service::remove_from_wishlist(&state, 3).await;
    assert!(matches!(gone, Err(AppError::NotFound)));
}

#[tokio::test]
async fn orphaned_items_are_dropped_on_read() {
    let (state, _) = demo_state();
    cart_service::add_to_cart(&state, add(5, 1, "6Y", "Red")).await.unwrap();
    cart_service::add_to_cart(&state, add(2, 1, "M", "Blue")).await.unwrap();
    wishlist_service::add_to_wishlist(&state, 5).await.unwrap();

    product_service::delete_product(&state, 5).await.unwrap();

    let cart = cart_service::get_cart_items(&state).await.data;
    assert_eq!(cart.iter().map(|i| i.product_id).collect::<Vec<_>>(), vec![2]);
    assert!(wishlist_service::get_wishlist_items(&state).await.data.is_empty());
}

#[tokio::test]
async fn review_summary_over_ratings() {
    let (state, _) = demo_state();
    let empty = review_service::get_reviews_summary(&state, 1).await.data;
    assert_eq!(empty.total_reviews, 0);
    assert_eq!(empty.average_rating, 0.0);
    assert!(empty.rating_breakdown.values().all(|count| *count == 0));

    for rating in [5, 5, 3] {
        review_service::add_review(&state, 1, review(rating)).await.unwrap();
    }
    review_service::add_review(&state, 2, review(1)).await.unwrap();

    let summary = review_service::get_reviews_summary(&state, 1).await.data;
    assert_eq!(summary.total_reviews, 3);
    assert_eq!(summary.average_rating, 4.3);
    assert_eq!(summary.rating_breakdown[&5], 2);
    assert_eq!(summary.rating_breakdown[&4], 0);
    assert_eq!(summary.rating_breakdown[&3], 1);
    assert_eq!(summary.rating_breakdown[&1], 0);
}

#[tokio::test]
async fn review_update_keeps_created_at() {
    let (state, _) = demo_state();
    let created = review_service::add_review(&state, 4, review(2)).await.unwrap();

    let updated = review_service::update_review(&state, created.id, review(4)).await.unwrap();
    assert_eq!(updated.rating, 4);
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at >= created.updated_at);

    let invalid = review_service::update_review(&state, created.id, review(9)).await;
    assert!(matches!(invalid, Err(AppError::Validation(_))));

    review_service::delete_review(&state, created.id).await.unwrap();
    let missing = review_service::delete_review(&state, created.id).await;
    assert!(matches!(missing, Err(AppError::NotFound)));
}

#[tokio::test]
async fn offline_store_degrades_reads_and_fails_writes() {
    let (state, store) = demo_state();
    cart_service::add_to_cart(&state, add(1, 1, "M", "Pink")).await.unwrap();
    store.set_offline(true);

    let products =
        product_service::query_products(&state, &FilterSpec::new(), SortKey::Featured, None).await;
    assert!(products.is_degraded());
    assert!(products.data.is_empty());

    let cart = cart_service::get_cart_summary(&state).await;
    assert!(cart.is_degraded());
    assert_eq!(cart.data.item_count, 0);

    let write = cart_service::add_to_cart(&state, add(1, 1, "M", "Pink")).await;
    let err = write.unwrap_err();
    assert!(matches!(err, AppError::Store(_)));
    assert!(err.is_retryable());

    store.set_offline(false);
    let cart = cart_service::get_cart_summary(&state).await;
    assert!(!cart.is_degraded());
    assert_eq!(cart.data.item_count, 1);
}

#[tokio::test]
async fn product_update_can_clear_discount() {
    let (state, _) = demo_state();
    let updated = product_service::update_product(
        &state,
        1,
        UpdateProductRequest {
            clear_discount: true,
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.discount_price, None);
    assert_eq!(updated.effective_price(), 2999);

    let missing = product_service::update_product(&state, 999, UpdateProductRequest::default()).await;
    assert!(matches!(missing, Err(AppError::NotFound)));
}
