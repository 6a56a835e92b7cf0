use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Product;

/// Raw AddProduct form. Numbers arrive as text; anything unparsable counts as missing.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct AddProductForm {
    pub name: Option<String>,
    pub manufacturer_id: Option<String>,
    pub price: Option<String>,
    pub stock: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub submit: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub manufacturer_name: Option<String>,
    /// Average review score scaled to `0.0..=1.0`; absent until the first review.
    pub rating: Option<f64>,
}

#[derive(Serialize, ToSchema)]
pub struct ProductList {
    pub items: Vec<Product>,
}
