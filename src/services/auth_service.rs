use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};

use crate::{
    dto::auth::{Claims, LoginRequest, LoginResponse, RegisterRequest},
    error::{AppError, AppResult, FieldError},
    models::{Account, NewAccount, Role},
    response::{ApiResponse, Meta},
    state::AppState,
};

pub const MAX_USERNAME_LEN: usize = 32;
pub const MIN_PASSWORD_LEN: usize = 6;

pub async fn register_user(
    state: &AppState,
    payload: RegisterRequest,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let account = validate_registration(payload).map_err(AppError::Validation)?;

    if state.db.check_for_existing_account(&account.username).await {
        return Err(AppError::Validation(vec![FieldError::new(
            "username",
            "Username is already taken",
        )]));
    }

    let username = account.username.clone();
    if !state.db.add_user(account).await {
        return Err(AppError::Failed("Failed to create account".into()));
    }

    tracing::info!(username = %username, "user registered");
    Ok(ApiResponse::success(
        "User created",
        serde_json::json!({ "username": username }),
        None,
    ))
}

pub async fn login_user(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<ApiResponse<LoginResponse>> {
    let LoginRequest { username, password } = payload;
    let account = match state.db.get_user_by_credentials(&username, &password).await {
        Some(account) => account,
        None => return Err(AppError::BadRequest("Invalid username or password".into())),
    };

    let token = issue_token(&account, &state.jwt_secret)?;
    tracing::info!(user_id = account.id, "user logged in");

    Ok(ApiResponse::success(
        "Logged in",
        LoginResponse {
            token: format!("Bearer {}", token),
        },
        Some(Meta::empty()),
    ))
}

pub fn issue_token(account: &Account, secret: &str) -> AppResult<String> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(24))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: account.id.to_string(),
        role: account.role,
        exp: expiration.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}

/// Registration form checks. New accounts are always plain users.
pub fn validate_registration(payload: RegisterRequest) -> Result<NewAccount, Vec<FieldError>> {
    let mut errors = Vec::new();
    let mut required = |value: Option<String>, field: &str, message: &str| {
        match value.filter(|v| !v.trim().is_empty()) {
            Some(v) => v,
            None => {
                errors.push(FieldError::new(field, message));
                String::new()
            }
        }
    };

    let username = required(payload.username, "username", "Missing username");
    let email = required(payload.email, "email", "Missing email");
    let password = required(payload.password, "password", "Missing password");
    let first_name = required(payload.first_name, "first_name", "Missing first name");
    let last_name = required(payload.last_name, "last_name", "Missing last name");
    let address = required(payload.address, "address", "Missing address");

    if username.chars().count() > MAX_USERNAME_LEN {
        errors.push(FieldError::new("username", "Username too long"));
    }
    if !email.is_empty() && !email.contains('@') {
        errors.push(FieldError::new("email", "Invalid email address"));
    }
    if !password.is_empty() && password.chars().count() < MIN_PASSWORD_LEN {
        errors.push(FieldError::new("password", "Password too short"));
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(NewAccount {
        username,
        email,
        password,
        first_name,
        last_name,
        phone: payload.phone.unwrap_or_default(),
        address,
        role: Role::User,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> RegisterRequest {
        RegisterRequest {
            username: Some("alice".into()),
            email: Some("alice@example.com".into()),
            password: Some("wonderland".into()),
            first_name: Some("Alice".into()),
            last_name: Some("Liddell".into()),
            phone: None,
            address: Some("1 Rabbit Hole".into()),
        }
    }

    #[test]
    fn registration_builds_plain_user() {
        let account = validate_registration(alice()).unwrap();
        assert_eq!(account.username, "alice");
        assert_eq!(account.phone, "");
        assert_eq!(account.role, Role::User);
    }

    #[test]
    fn registration_reports_each_problem() {
        let errors = validate_registration(RegisterRequest {
            email: Some("not-an-email".into()),
            password: Some("abc".into()),
            ..alice()
        })
        .unwrap_err();
        assert_eq!(
            errors,
            vec![
                FieldError::new("email", "Invalid email address"),
                FieldError::new("password", "Password too short"),
            ]
        );

        let errors = validate_registration(RegisterRequest::default()).unwrap_err();
        assert_eq!(errors.len(), 6);
    }

    #[test]
    fn token_round_trips_claims() {
        let account = Account {
            id: 42,
            username: "root".into(),
            email: "root@example.com".into(),
            first_name: "Ro".into(),
            last_name: "Ot".into(),
            phone: String::new(),
            address: "Server room".into(),
            role: Role::Admin,
        };
        let token = issue_token(&account, "secret").unwrap();
        let decoded = jsonwebtoken::decode::<Claims>(
            &token,
            &jsonwebtoken::DecodingKey::from_secret(b"secret"),
            &jsonwebtoken::Validation::default(),
        )
        .unwrap();
        assert_eq!(decoded.claims.sub, "42");
        assert_eq!(decoded.claims.role, Role::Admin);
    }
}
