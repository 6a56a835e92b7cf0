use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};

use crate::{
    dto::{manufacturers::ManufacturerList, products::ProductList},
    error::AppResult,
    response::ApiResponse,
    services::{manufacturer_service, product_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_manufacturers))
        .route("/{id}/products", get(list_manufacturer_products))
}

#[utoipa::path(
    get,
    path = "/api/manufacturers",
    responses(
        (status = 200, description = "List manufacturers", body = ApiResponse<ManufacturerList>)
    ),
    tag = "Manufacturers"
)]
pub async fn list_manufacturers(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<ManufacturerList>>> {
    let resp = manufacturer_service::list_manufacturers(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/manufacturers/{id}/products",
    params(
        ("id" = i32, Path, description = "Manufacturer ID")
    ),
    responses(
        (status = 200, description = "Products made by a manufacturer", body = ApiResponse<ProductList>),
        (status = 404, description = "Manufacturer not found"),
    ),
    tag = "Manufacturers"
)]
pub async fn list_manufacturer_products(
    Path(id): Path<i32>,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let resp = product_service::list_products_by_manufacturer(&state, id).await?;
    Ok(Json(resp))
}
