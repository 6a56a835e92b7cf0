use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Manufacturer;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddManufacturerRequest {
    pub name: String,
    #[serde(default)]
    pub website: String,
}

#[derive(Serialize, ToSchema)]
pub struct ManufacturerList {
    pub items: Vec<Manufacturer>,
}
