use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};

use crate::{
    dto::{
        products::{ProductDetail, ProductList},
        purchases::PurchaseRequest,
        reviews::{AddReviewRequest, ReviewList},
    },
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::{product_service, purchase_service, review_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products))
        .route("/{id}", get(get_product))
        .route("/{id}/reviews", get(list_reviews).post(add_review))
        .route("/{id}/purchase", post(purchase))
}

#[utoipa::path(
    get,
    path = "/api/products",
    responses(
        (status = 200, description = "List products", body = ApiResponse<ProductList>)
    ),
    tag = "Products"
)]
pub async fn list_products(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let resp = product_service::list_products(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product with manufacturer and rating", body = ApiResponse<ProductDetail>),
        (status = 404, description = "Product not found"),
    ),
    tag = "Products"
)]
pub async fn get_product(
    Path(id): Path<i32>,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<ProductDetail>>> {
    let resp = product_service::get_product(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}/reviews",
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Reviews for a product", body = ApiResponse<ReviewList>),
        (status = 404, description = "Product not found"),
    ),
    tag = "Reviews"
)]
pub async fn list_reviews(
    Path(id): Path<i32>,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<ReviewList>>> {
    let resp = review_service::list_reviews(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/products/{id}/reviews",
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    request_body = AddReviewRequest,
    responses(
        (status = 200, description = "Review added", body = ApiResponse<serde_json::Value>),
        (status = 400, description = "Already reviewed"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Product not found"),
        (status = 422, description = "Invalid review"),
    ),
    security(("bearer_auth" = [])),
    tag = "Reviews"
)]
pub async fn add_review(
    Path(id): Path<i32>,
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<AddReviewRequest>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = review_service::add_review(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/products/{id}/purchase",
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    request_body(content = Option<PurchaseRequest>, description = "Optional; defaults to the account address"),
    responses(
        (status = 200, description = "Purchase completed", body = ApiResponse<serde_json::Value>),
        (status = 400, description = "Out of stock"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Product not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Purchases"
)]
pub async fn purchase(
    Path(id): Path<i32>,
    State(state): State<AppState>,
    user: AuthUser,
    payload: Option<Json<PurchaseRequest>>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    // no body means ship to the address on the account
    let payload = payload.map(|Json(p)| p).unwrap_or_default();
    let resp = purchase_service::purchase(&state, &user, id, payload).await?;
    Ok(Json(resp))
}
