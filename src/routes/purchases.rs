use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::purchases::TransactionList,
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::purchase_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_purchases))
}

#[utoipa::path(
    get,
    path = "/api/purchases",
    responses(
        (status = 200, description = "Purchase history of the caller", body = ApiResponse<TransactionList>),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Purchases"
)]
pub async fn list_purchases(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<TransactionList>>> {
    let resp = purchase_service::list_purchases(&state, &user).await?;
    Ok(Json(resp))
}
