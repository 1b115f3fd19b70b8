use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};

use crate::{
    dto::banners::{BannerList, CreateBannerRequest, UpdateBannerRequest},
    error::{AppError, AppResult},
    models::PromotionalBanner,
    response::{ApiResponse, Meta},
    routes::fetched_response,
    services::banner_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_banners).post(create_banner))
        .route(
            "/{id}",
            get(get_banner).put(update_banner).delete(delete_banner),
        )
}

#[utoipa::path(
    get,
    path = "/api/banners",
    responses(
        (status = 200, description = "Active banners by priority", body = ApiResponse<BannerList>)
    ),
    tag = "Banners"
)]
pub async fn list_banners(State(state): State<AppState>) -> Json<ApiResponse<BannerList>> {
    let fetched = banner_service::list_active_banners(&state)
        .await
        .map(|items| BannerList { items });
    let meta = Meta::total(fetched.data.items.len());
    fetched_response("Banners", fetched, meta)
}

#[utoipa::path(
    get,
    path = "/api/banners/{id}",
    params(
        ("id" = i64, Path, description = "Banner ID")
    ),
    responses(
        (status = 200, description = "Banner", body = ApiResponse<PromotionalBanner>),
        (status = 404, description = "Banner not found"),
    ),
    tag = "Banners"
)]
pub async fn get_banner(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Option<PromotionalBanner>>>> {
    let fetched = banner_service::get_banner(&state, id).await;
    if !fetched.is_degraded() && fetched.data.is_none() {
        return Err(AppError::NotFound);
    }
    Ok(fetched_response("Banner", fetched, Meta::empty()))
}

#[utoipa::path(
    post,
    path = "/api/banners",
    request_body = CreateBannerRequest,
    responses(
        (status = 201, description = "Banner created", body = ApiResponse<PromotionalBanner>),
        (status = 400, description = "Invalid banner"),
    ),
    tag = "Banners"
)]
pub async fn create_banner(
    State(state): State<AppState>,
    Json(payload): Json<CreateBannerRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<PromotionalBanner>>)> {
    let banner = banner_service::create_banner(&state, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            "Banner created",
            banner,
            Some(Meta::empty()),
        )),
    ))
}

#[utoipa::path(
    put,
    path = "/api/banners/{id}",
    params(
        ("id" = i64, Path, description = "Banner ID")
    ),
    request_body = UpdateBannerRequest,
    responses(
        (status = 200, description = "Banner updated", body = ApiResponse<PromotionalBanner>),
        (status = 404, description = "Banner not found"),
    ),
    tag = "Banners"
)]
pub async fn update_banner(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateBannerRequest>,
) -> AppResult<Json<ApiResponse<PromotionalBanner>>> {
    let banner = banner_service::update_banner(&state, id, payload).await?;
    Ok(Json(ApiResponse::success(
        "Updated",
        banner,
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    delete,
    path = "/api/banners/{id}",
    params(
        ("id" = i64, Path, description = "Banner ID")
    ),
    responses(
        (status = 200, description = "Banner deleted", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Banner not found"),
    ),
    tag = "Banners"
)]
pub async fn delete_banner(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    banner_service::delete_banner(&state, id).await?;
    Ok(Json(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    )))
}
