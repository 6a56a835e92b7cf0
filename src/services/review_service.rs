use crate::{
    dto::reviews::{AddReviewRequest, ReviewList, ReviewView},
    error::{AppError, AppResult, FieldError},
    middleware::auth::AuthUser,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 10;

pub async fn list_reviews(
    state: &AppState,
    product_id: i32,
) -> AppResult<ApiResponse<ReviewList>> {
    if state.db.get_product(product_id).await.is_none() {
        return Err(AppError::NotFound);
    }

    let mut items = Vec::new();
    for review in state.db.get_reviews_for_product(product_id).await {
        let username = state.db.get_user_name(review.user_id).await;
        items.push(ReviewView { review, username });
    }

    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Reviews", ReviewList { items }, Some(meta)))
}

/// One review per user per product; the rating must be within 1..=10.
pub async fn add_review(
    state: &AppState,
    user: &AuthUser,
    product_id: i32,
    payload: AddReviewRequest,
) -> AppResult<ApiResponse<serde_json::Value>> {
    if state.db.get_product(product_id).await.is_none() {
        return Err(AppError::NotFound);
    }

    let mut errors = Vec::new();
    match payload.rating {
        Some(r) if (MIN_RATING..=MAX_RATING).contains(&r) => {}
        Some(_) => errors.push(FieldError::new("rating", "Rating must be between 1 and 10")),
        None => errors.push(FieldError::new("rating", "Missing rating")),
    }
    let comment = payload.comment.unwrap_or_default();
    if comment.trim().is_empty() {
        errors.push(FieldError::new("comment", "Missing comment"));
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    if state
        .db
        .check_for_existing_review(product_id, user.user_id)
        .await
    {
        return Err(AppError::BadRequest(
            "You have already reviewed this product".into(),
        ));
    }

    let rating = payload.rating.unwrap_or(MIN_RATING);
    if !state
        .db
        .add_review(user.user_id, product_id, rating, &comment)
        .await
    {
        return Err(AppError::Failed("Failed to add review".into()));
    }

    tracing::info!(user_id = user.user_id, product_id, rating, "review added");
    Ok(ApiResponse::success(
        "Review added",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}
