use axum::{
    Form, Json, Router,
    extract::{Path, State},
    routing::{get, patch, post},
};

use crate::{
    dto::{
        accounts::{AccountList, UpdateUserRequest},
        manufacturers::AddManufacturerRequest,
        products::{AddProductForm, ProductDetail},
        purchases::TransactionList,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::{Account, Manufacturer, ManufacturerChanges, ProductChanges},
    response::ApiResponse,
    services::{account_service, manufacturer_service, product_service, purchase_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/products", post(add_product))
        .route("/products/{id}", patch(edit_product).delete(delete_product))
        .route("/manufacturers", post(add_manufacturer))
        .route("/manufacturers/{id}", patch(edit_manufacturer))
        .route("/users", get(list_users))
        .route("/users/{id}", patch(edit_user))
        .route("/transactions", get(list_transactions))
}

#[utoipa::path(
    post,
    path = "/api/admin/products",
    request_body(content = AddProductForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Product added, or the empty form when not submitted", body = ApiResponse<serde_json::Value>),
        (status = 403, description = "Forbidden"),
        (status = 422, description = "Invalid product form"),
        (status = 500, description = "Failed to add product"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn add_product(
    State(state): State<AppState>,
    user: AuthUser,
    Form(form): Form<AddProductForm>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = product_service::add_product(&state, &user, form).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/admin/products/{id}",
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    request_body = ProductChanges,
    responses(
        (status = 200, description = "Updated product", body = ApiResponse<ProductDetail>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Product not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn edit_product(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<ProductChanges>,
) -> AppResult<Json<ApiResponse<ProductDetail>>> {
    let resp = product_service::edit_product(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/products/{id}",
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Deleted product", body = ApiResponse<serde_json::Value>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Product not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = product_service::delete_product(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/manufacturers",
    request_body = AddManufacturerRequest,
    responses(
        (status = 200, description = "Manufacturer added", body = ApiResponse<serde_json::Value>),
        (status = 403, description = "Forbidden"),
        (status = 422, description = "Invalid manufacturer"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn add_manufacturer(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<AddManufacturerRequest>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = manufacturer_service::add_manufacturer(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/admin/manufacturers/{id}",
    params(
        ("id" = i32, Path, description = "Manufacturer ID")
    ),
    request_body = ManufacturerChanges,
    responses(
        (status = 200, description = "Updated manufacturer", body = ApiResponse<Manufacturer>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Manufacturer not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn edit_manufacturer(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<ManufacturerChanges>,
) -> AppResult<Json<ApiResponse<Manufacturer>>> {
    let resp = manufacturer_service::edit_manufacturer(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/users",
    responses(
        (status = 200, description = "All accounts (admin only)", body = ApiResponse<AccountList>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_users(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<AccountList>>> {
    let resp = account_service::list_users(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/admin/users/{id}",
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated account", body = ApiResponse<Account>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "User not found"),
        (status = 422, description = "Invalid account fields"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn edit_user(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateUserRequest>,
) -> AppResult<Json<ApiResponse<Account>>> {
    let resp = account_service::edit_user(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/transactions",
    responses(
        (status = 200, description = "Every recorded purchase (admin only)", body = ApiResponse<TransactionList>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_transactions(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<TransactionList>>> {
    let resp = purchase_service::list_all_transactions(&state, &user).await?;
    Ok(Json(resp))
}
