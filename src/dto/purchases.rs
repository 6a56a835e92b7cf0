use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Transaction;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct PurchaseRequest {
    /// Defaults to the address on the buyer's account.
    pub shipping_address: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TransactionView {
    #[serde(flatten)]
    pub transaction: Transaction,
    pub product_name: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct TransactionList {
    pub items: Vec<TransactionView>,
}
