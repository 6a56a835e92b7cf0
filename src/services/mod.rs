pub mod account_service;
pub mod auth_service;
pub mod manufacturer_service;
pub mod product_service;
pub mod purchase_service;
pub mod review_service;
