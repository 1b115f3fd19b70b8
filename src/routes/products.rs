use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};

use crate::{
    catalog::SortKey,
    dto::{
        products::{CatalogFacets, CreateProductRequest, ProductList, UpdateProductRequest},
        reviews::{ReviewRequest, ReviewSummary},
    },
    error::{AppError, AppResult},
    models::{Product, Review},
    response::{ApiResponse, Meta},
    routes::{
        fetched_response,
        params::{ProductQuery, ReviewListQuery},
    },
    services::{Fetched, product_service, review_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/facets", get(catalog_facets))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/{id}/reviews", get(list_reviews).post(add_review))
        .route("/{id}/reviews/summary", get(reviews_summary))
}

#[utoipa::path(
    get,
    path = "/api/products",
    params(ProductQuery),
    responses(
        (status = 200, description = "Filtered and sorted products", body = ApiResponse<ProductList>)
    ),
    tag = "Products"
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Json<ApiResponse<ProductList>> {
    let spec = query.filter_spec();
    let sort = query.sort.unwrap_or(SortKey::Featured);
    let fetched = product_service::query_products(&state, &spec, sort, query.limit)
        .await
        .map(|items| ProductList { items });
    let meta = Meta::total(fetched.data.items.len());
    fetched_response("Products", fetched, meta)
}

#[utoipa::path(
    get,
    path = "/api/products/facets",
    responses(
        (status = 200, description = "Filter options for the catalog", body = ApiResponse<CatalogFacets>)
    ),
    tag = "Products"
)]
pub async fn catalog_facets(State(state): State<AppState>) -> Json<ApiResponse<CatalogFacets>> {
    let fetched = product_service::catalog_facets(&state).await;
    fetched_response("Facets", fetched, Meta::empty())
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(
        ("id" = i64, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Get product", body = ApiResponse<Product>),
        (status = 404, description = "Product not found"),
    ),
    tag = "Products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Option<Product>>>> {
    let fetched = product_service::get_product(&state, id).await;
    if !fetched.is_degraded() && fetched.data.is_none() {
        return Err(AppError::NotFound);
    }
    Ok(fetched_response("Product", fetched, Meta::empty()))
}

#[utoipa::path(
    post,
    path = "/api/products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Create product", body = ApiResponse<Product>),
        (status = 400, description = "Invalid product"),
    ),
    tag = "Products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<CreateProductRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Product>>)> {
    let product = product_service::create_product(&state, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            "Product created",
            product,
            Some(Meta::empty()),
        )),
    ))
}

#[utoipa::path(
    put,
    path = "/api/products/{id}",
    params(
        ("id" = i64, Path, description = "Product ID")
    ),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Updated product", body = ApiResponse<Product>),
        (status = 404, description = "Product not found"),
    ),
    tag = "Products"
)]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateProductRequest>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let product = product_service::update_product(&state, id, payload).await?;
    Ok(Json(ApiResponse::success(
        "Updated",
        product,
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    params(
        ("id" = i64, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Deleted product", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Product not found"),
    ),
    tag = "Products"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    product_service::delete_product(&state, id).await?;
    Ok(Json(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}/reviews",
    params(
        ("id" = i64, Path, description = "Product ID"),
        ReviewListQuery,
    ),
    responses(
        (status = 200, description = "One page of the product's reviews", body = ApiResponse<Vec<Review>>)
    ),
    tag = "Reviews"
)]
pub async fn list_reviews(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<ReviewListQuery>,
) -> Json<ApiResponse<Vec<Review>>> {
    let fetched = review_service::get_reviews(&state, id).await;
    let (items, page, per_page, total) = query.arrange(fetched.data);
    let page_of_reviews = Fetched {
        data: items,
        error: fetched.error,
    };
    fetched_response("Reviews", page_of_reviews, Meta::new(page, per_page, total))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}/reviews/summary",
    params(
        ("id" = i64, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Rating count, mean and histogram", body = ApiResponse<ReviewSummary>)
    ),
    tag = "Reviews"
)]
pub async fn reviews_summary(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Json<ApiResponse<ReviewSummary>> {
    let fetched = review_service::get_reviews_summary(&state, id).await;
    fetched_response("Review summary", fetched, Meta::empty())
}

#[utoipa::path(
    post,
    path = "/api/products/{id}/reviews",
    params(
        ("id" = i64, Path, description = "Product ID")
    ),
    request_body = ReviewRequest,
    responses(
        (status = 201, description = "Review added", body = ApiResponse<Review>),
        (status = 400, description = "Invalid review"),
    ),
    tag = "Reviews"
)]
pub async fn add_review(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<ReviewRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Review>>)> {
    let review = review_service::add_review(&state, id, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Review added", review, Some(Meta::empty()))),
    ))
}
