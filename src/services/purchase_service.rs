use crate::{
    dto::purchases::{PurchaseRequest, TransactionList, TransactionView},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::Transaction,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub const FLAT_SHIPPING_PRICE: f64 = 4.99;

/// Buy one unit: take it out of stock, then record the transaction at the current price.
pub async fn purchase(
    state: &AppState,
    user: &AuthUser,
    product_id: i32,
    payload: PurchaseRequest,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let product = match state.db.get_product(product_id).await {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };
    if product.stock <= 0 {
        return Err(AppError::BadRequest("Product is out of stock".into()));
    }

    let shipping_address = match payload.shipping_address.filter(|a| !a.trim().is_empty()) {
        Some(address) => address,
        None => match state.db.get_user(user.user_id).await {
            Some(account) => account.address,
            None => return Err(AppError::NotFound),
        },
    };

    if !state.db.decrease_product_stock(product_id).await {
        return Err(AppError::Failed("Failed to complete purchase".into()));
    }

    if !state
        .db
        .add_transaction(
            user.user_id,
            product_id,
            product.price,
            FLAT_SHIPPING_PRICE,
            &shipping_address,
        )
        .await
    {
        tracing::error!(
            user_id = user.user_id,
            product_id,
            "stock taken but purchase was not recorded"
        );
        return Err(AppError::Failed("Failed to complete purchase".into()));
    }

    tracing::info!(user_id = user.user_id, product_id, "purchase completed");
    Ok(ApiResponse::success(
        "Purchase completed",
        serde_json::json!({
            "product_id": product_id,
            "price": product.price,
            "shipping_price": FLAT_SHIPPING_PRICE,
        }),
        Some(Meta::empty()),
    ))
}

pub async fn list_purchases(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<TransactionList>> {
    let transactions = state.db.get_transactions_for_user(user.user_id).await;
    let items = with_product_names(state, transactions).await;
    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Purchases", TransactionList { items }, Some(meta)))
}

pub async fn list_all_transactions(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<TransactionList>> {
    ensure_admin(user)?;
    let transactions = state.db.get_transactions().await;
    let items = with_product_names(state, transactions).await;
    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Transactions", TransactionList { items }, Some(meta)))
}

async fn with_product_names(
    state: &AppState,
    transactions: Vec<Transaction>,
) -> Vec<TransactionView> {
    let mut items = Vec::with_capacity(transactions.len());
    for transaction in transactions {
        let product_name = state.db.get_product_name(transaction.product_id).await;
        items.push(TransactionView {
            transaction,
            product_name,
        });
    }
    items
}
