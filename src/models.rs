use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn from_admin_flag(is_admin: bool) -> Self {
        if is_admin { Role::Admin } else { Role::User }
    }

    pub fn is_admin(self) -> bool {
        matches!(self, Role::Admin)
    }
}

/// A registered customer or administrator. The password hash never leaves the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Account {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub address: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub manufacturer_id: i32,
    pub price: f64,
    pub stock: i32,
    pub image: Option<String>,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Manufacturer {
    pub id: i32,
    pub name: String,
    pub website: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Review {
    pub id: i32,
    pub user_id: i32,
    pub product_id: i32,
    pub rating: i32,
    pub comment: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Transaction {
    pub id: i32,
    pub user_id: i32,
    pub product_id: i32,
    pub price: f64,
    pub shipping_price: f64,
    pub shipping_address: String,
    pub date: DateTime<Utc>,
}

/// Average review score of a product, scaled to `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rating {
    Rated(f64),
    Unrated,
}

impl Rating {
    pub fn value(self) -> Option<f64> {
        match self {
            Rating::Rated(v) => Some(v),
            Rating::Unrated => None,
        }
    }
}

/// Fields for a new account; the password is plain text and hashed by the store.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub address: String,
    pub role: Role,
}

/// Partial account update. Empty strings count as absent except for `phone`.
#[derive(Debug, Clone, Default)]
pub struct AccountChanges {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub role: Option<Role>,
    pub password: Option<String>,
}

/// Partial product update. Only an empty `name` is ignored; other present fields are written as-is.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub manufacturer_id: Option<i32>,
    pub price: Option<f64>,
    pub stock: Option<i32>,
    pub image: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ManufacturerChanges {
    pub name: Option<String>,
    pub website: Option<String>,
}
