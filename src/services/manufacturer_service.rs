use crate::{
    dto::manufacturers::{AddManufacturerRequest, ManufacturerList},
    error::{AppError, AppResult, FieldError},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Manufacturer, ManufacturerChanges},
    response::{ApiResponse, Meta},
    state::AppState,
};

pub const MAX_COMPANY_NAME_LEN: usize = 50;

pub async fn list_manufacturers(state: &AppState) -> AppResult<ApiResponse<ManufacturerList>> {
    let items = state.db.get_manufacturers().await;
    let meta = Meta::total(items.len());
    Ok(ApiResponse::success(
        "Manufacturers",
        ManufacturerList { items },
        Some(meta),
    ))
}

pub async fn add_manufacturer(
    state: &AppState,
    user: &AuthUser,
    payload: AddManufacturerRequest,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(AppError::Validation(vec![FieldError::new(
            "name",
            "Missing company name",
        )]));
    }
    if name.chars().count() > MAX_COMPANY_NAME_LEN {
        return Err(AppError::Validation(vec![FieldError::new(
            "name",
            "Company name too long",
        )]));
    }

    if !state.db.add_manufacturer(name, payload.website.trim()).await {
        return Err(AppError::Failed("Failed to add manufacturer".into()));
    }

    tracing::info!(admin_id = user.user_id, name = %name, "manufacturer added");
    Ok(ApiResponse::success(
        "Manufacturer added",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

pub async fn edit_manufacturer(
    state: &AppState,
    user: &AuthUser,
    id: i32,
    changes: ManufacturerChanges,
) -> AppResult<ApiResponse<Manufacturer>> {
    ensure_admin(user)?;
    if state.db.get_manufacturer(id).await.is_none() {
        return Err(AppError::NotFound);
    }
    if changes
        .name
        .as_ref()
        .is_some_and(|n| n.chars().count() > MAX_COMPANY_NAME_LEN)
    {
        return Err(AppError::Validation(vec![FieldError::new(
            "name",
            "Company name too long",
        )]));
    }

    if !state.db.edit_manufacturer(id, changes).await {
        return Err(AppError::Failed("Failed to edit manufacturer".into()));
    }

    let manufacturer = match state.db.get_manufacturer(id).await {
        Some(m) => m,
        None => return Err(AppError::NotFound),
    };
    tracing::info!(admin_id = user.user_id, manufacturer_id = id, "manufacturer edited");
    Ok(ApiResponse::success("Updated", manufacturer, Some(Meta::empty())))
}
