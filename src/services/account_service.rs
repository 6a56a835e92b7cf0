use crate::{
    dto::accounts::{AccountList, UpdateUserRequest},
    error::{AppError, AppResult, FieldError},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Account, AccountChanges},
    response::{ApiResponse, Meta},
    services::auth_service::{MAX_USERNAME_LEN, MIN_PASSWORD_LEN},
    state::AppState,
};

pub async fn list_users(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<AccountList>> {
    ensure_admin(user)?;
    let items = state.db.get_users().await;
    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Users", AccountList { items }, Some(meta)))
}

pub async fn edit_user(
    state: &AppState,
    user: &AuthUser,
    id: i32,
    payload: UpdateUserRequest,
) -> AppResult<ApiResponse<Account>> {
    ensure_admin(user)?;
    let existing = match state.db.get_user(id).await {
        Some(account) => account,
        None => return Err(AppError::NotFound),
    };

    let mut errors = Vec::new();
    if let Some(username) = payload.username.as_deref().filter(|u| !u.is_empty()) {
        if username.chars().count() > MAX_USERNAME_LEN {
            errors.push(FieldError::new("username", "Username too long"));
        } else if username != existing.username
            && state.db.check_for_existing_account(username).await
        {
            errors.push(FieldError::new("username", "Username is already taken"));
        }
    }
    if payload
        .email
        .as_deref()
        .is_some_and(|e| !e.is_empty() && !e.contains('@'))
    {
        errors.push(FieldError::new("email", "Invalid email address"));
    }
    if payload
        .password
        .as_deref()
        .is_some_and(|p| !p.is_empty() && p.chars().count() < MIN_PASSWORD_LEN)
    {
        errors.push(FieldError::new("password", "Password too short"));
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let changes = AccountChanges {
        username: payload.username,
        email: payload.email,
        first_name: payload.first_name,
        last_name: payload.last_name,
        phone: payload.phone,
        address: payload.address,
        role: payload.role,
        password: payload.password,
    };
    if !state.db.edit_user(id, changes).await {
        return Err(AppError::Failed("Failed to edit user".into()));
    }

    let account = match state.db.get_user(id).await {
        Some(account) => account,
        None => return Err(AppError::NotFound),
    };
    tracing::info!(admin_id = user.user_id, user_id = id, "user edited");
    Ok(ApiResponse::success("Updated", account, Some(Meta::empty())))
}
