use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get},
};

use crate::{
    dto::wishlist::{AddToWishlistRequest, WishlistItemView},
    error::AppResult,
    models::WishlistEntry,
    response::{ApiResponse, Meta},
    routes::fetched_response,
    services::wishlist_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_wishlist).post(add_to_wishlist))
        .route("/{product_id}", delete(remove_from_wishlist))
}

#[utoipa::path(
    get,
    path = "/api/wishlist",
    responses(
        (status = 200, description = "Wishlist entries with their products", body = ApiResponse<Vec<WishlistItemView>>)
    ),
    tag = "Wishlist"
)]
pub async fn list_wishlist(State(state): State<AppState>) -> Json<ApiResponse<Vec<WishlistItemView>>> {
    let fetched = wishlist_service::get_wishlist_items(&state).await;
    let meta = Meta::total(fetched.data.len());
    fetched_response("OK", fetched, meta)
}

#[utoipa::path(
    post,
    path = "/api/wishlist",
    request_body = AddToWishlistRequest,
    responses(
        (status = 200, description = "Added to wishlist", body = ApiResponse<WishlistEntry>),
        (status = 404, description = "Product not found"),
        (status = 409, description = "Product already in wishlist"),
    ),
    tag = "Wishlist"
)]
pub async fn add_to_wishlist(
    State(state): State<AppState>,
    Json(payload): Json<AddToWishlistRequest>,
) -> AppResult<Json<ApiResponse<WishlistEntry>>> {
    let entry = wishlist_service::add_to_wishlist(&state, payload.product_id).await?;
    Ok(Json(ApiResponse::success(
        "Added to wishlist",
        entry,
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    delete,
    path = "/api/wishlist/{product_id}",
    params(
        ("product_id" = i64, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Removed from wishlist", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Product not in wishlist"),
    ),
    tag = "Wishlist"
)]
pub async fn remove_from_wishlist(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    wishlist_service::remove_from_wishlist(&state, product_id).await?;
    Ok(Json(ApiResponse::success(
        "Removed from wishlist",
        serde_json::json!({}),
        Some(Meta::empty()),
    )))
}
