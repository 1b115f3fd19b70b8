use axum::{Json, Router};
use serde::Serialize;

use crate::{
    response::{ApiResponse, Meta},
    services::Fetched,
    state::AppState,
};

pub mod banners;
pub mod cart;
pub mod doc;
pub mod health;
pub mod params;
pub mod products;
pub mod reviews;
pub mod wishlist;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/products", products::router())
        .nest("/reviews", reviews::router())
        .nest("/cart", cart::router())
        .nest("/wishlist", wishlist::router())
        .nest("/banners", banners::router())
}

/// Wraps a read result. Degraded reads still answer 200 with the empty
/// fallback, flagged retryable in `meta`.
pub(crate) fn fetched_response<T: Serialize>(
    message: &str,
    fetched: Fetched<T>,
    meta: Meta,
) -> Json<ApiResponse<T>> {
    if fetched.is_degraded() {
        return Json(ApiResponse::success(
            format!("{message} temporarily unavailable"),
            fetched.data,
            Some(meta.retryable()),
        ));
    }
    Json(ApiResponse::success(message, fetched.data, Some(meta)))
}
