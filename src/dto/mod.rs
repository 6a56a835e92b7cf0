pub mod accounts;
pub mod auth;
pub mod manufacturers;
pub mod products;
pub mod purchases;
pub mod reviews;
