use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, patch},
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    dto::cart::{AddToCartRequest, CartSummary, UpdateCartItemRequest},
    error::AppResult,
    models::CartLineItem,
    response::{ApiResponse, Meta},
    routes::fetched_response,
    services::cart_service,
    state::AppState,
};

#[derive(Debug, Serialize, ToSchema)]
pub struct RemovedData {
    pub removed: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ClearedData {
    pub removed: u64,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(cart_list).post(add_to_cart).delete(clear_cart))
        .route("/{id}", patch(update_cart_item).delete(remove_from_cart))
}

#[utoipa::path(
    get,
    path = "/api/cart",
    responses(
        (status = 200, description = "Cart items with totals", body = ApiResponse<CartSummary>)
    ),
    tag = "Cart"
)]
pub async fn cart_list(State(state): State<AppState>) -> Json<ApiResponse<CartSummary>> {
    let fetched = cart_service::get_cart_summary(&state).await;
    let meta = Meta::total(fetched.data.items.len());
    fetched_response("OK", fetched, meta)
}

#[utoipa::path(
    post,
    path = "/api/cart",
    request_body = AddToCartRequest,
    responses(
        (status = 200, description = "Add or merge cart item", body = ApiResponse<CartLineItem>),
        (status = 400, description = "Bad request"),
        (status = 404, description = "Product not found"),
    ),
    tag = "Cart"
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    Json(payload): Json<AddToCartRequest>,
) -> AppResult<Json<ApiResponse<CartLineItem>>> {
    let item = cart_service::add_to_cart(&state, payload).await?;
    Ok(Json(ApiResponse::success("OK", item, Some(Meta::empty()))))
}

#[utoipa::path(
    patch,
    path = "/api/cart/{id}",
    params(
        ("id" = i64, Path, description = "Cart line item ID")
    ),
    request_body = UpdateCartItemRequest,
    responses(
        (status = 200, description = "Quantity replaced", body = ApiResponse<CartLineItem>),
        (status = 400, description = "Bad request"),
        (status = 404, description = "Cart item not found"),
    ),
    tag = "Cart"
)]
pub async fn update_cart_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateCartItemRequest>,
) -> AppResult<Json<ApiResponse<CartLineItem>>> {
    let item = cart_service::update_cart_item(&state, id, payload).await?;
    Ok(Json(ApiResponse::success("Updated", item, Some(Meta::empty()))))
}

#[utoipa::path(
    delete,
    path = "/api/cart/{id}",
    params(
        ("id" = i64, Path, description = "Cart line item ID")
    ),
    responses(
        (status = 200, description = "`removed` is false when the item did not exist", body = ApiResponse<RemovedData>),
    ),
    tag = "Cart"
)]
pub async fn remove_from_cart(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<RemovedData>>> {
    let removed = cart_service::remove_from_cart(&state, id).await?;
    let message = if removed {
        "Removed from cart"
    } else {
        "Cart item not found"
    };
    Ok(Json(ApiResponse::success(
        message,
        RemovedData { removed },
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    delete,
    path = "/api/cart",
    responses(
        (status = 200, description = "Cart emptied", body = ApiResponse<ClearedData>),
    ),
    tag = "Cart"
)]
pub async fn clear_cart(State(state): State<AppState>) -> AppResult<Json<ApiResponse<ClearedData>>> {
    let removed = cart_service::clear_cart(&state).await?;
    Ok(Json(ApiResponse::success(
        "Cart cleared",
        ClearedData { removed },
        Some(Meta::empty()),
    )))
}
