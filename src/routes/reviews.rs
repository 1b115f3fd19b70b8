use axum::{
    Json, Router,
    extract::{Path, State},
    routing::put,
};

use crate::{
    dto::reviews::ReviewRequest,
    error::AppResult,
    models::Review,
    response::{ApiResponse, Meta},
    services::review_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/{id}", put(update_review).delete(delete_review))
}

#[utoipa::path(
    put,
    path = "/api/reviews/{id}",
    params(
        ("id" = i64, Path, description = "Review ID")
    ),
    request_body = ReviewRequest,
    responses(
        (status = 200, description = "Review updated", body = ApiResponse<Review>),
        (status = 400, description = "Invalid review"),
        (status = 404, description = "Review not found"),
    ),
    tag = "Reviews"
)]
pub async fn update_review(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<ReviewRequest>,
) -> AppResult<Json<ApiResponse<Review>>> {
    let review = review_service::update_review(&state, id, payload).await?;
    Ok(Json(ApiResponse::success(
        "Review updated",
        review,
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    delete,
    path = "/api/reviews/{id}",
    params(
        ("id" = i64, Path, description = "Review ID")
    ),
    responses(
        (status = 200, description = "Review deleted", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Review not found"),
    ),
    tag = "Reviews"
)]
pub async fn delete_review(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    review_service::delete_review(&state, id).await?;
    Ok(Json(ApiResponse::success(
        "Review deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    )))
}
