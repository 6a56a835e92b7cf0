use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Account, Role};

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub role: Option<Role>,
    pub password: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct AccountList {
    pub items: Vec<Account>,
}
