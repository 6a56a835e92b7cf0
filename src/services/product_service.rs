use std::str::FromStr;

use crate::{
    database::Database,
    dto::products::{AddProductForm, ProductDetail, ProductList},
    error::{AppError, AppResult, FieldError},
    middleware::auth::{AuthUser, ensure_admin},
    models::ProductChanges,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub const MAX_PRODUCT_NAME_LEN: usize = 50;

/// A form that passed every field check.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidProduct {
    pub name: String,
    pub manufacturer_id: i32,
    pub price: f64,
    pub stock: i32,
    pub image: Option<String>,
    pub description: String,
}

pub async fn list_products(state: &AppState) -> AppResult<ApiResponse<ProductList>> {
    let items = state.db.get_products().await;
    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Products", ProductList { items }, Some(meta)))
}

pub async fn list_products_by_manufacturer(
    state: &AppState,
    manufacturer_id: i32,
) -> AppResult<ApiResponse<ProductList>> {
    if state.db.get_manufacturer(manufacturer_id).await.is_none() {
        return Err(AppError::NotFound);
    }
    let items = state.db.get_products_by_manufacturer(manufacturer_id).await;
    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Products", ProductList { items }, Some(meta)))
}

pub async fn get_product(state: &AppState, id: i32) -> AppResult<ApiResponse<ProductDetail>> {
    let product = match state.db.get_product(id).await {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };

    let manufacturer_name = state.db.get_manufacturer_name(product.manufacturer_id).await;
    let rating = state.db.get_review_rating(product.id).await.value();

    let detail = ProductDetail {
        product,
        manufacturer_name,
        rating,
    };
    Ok(ApiResponse::success("Product", detail, None))
}

/// The AddProduct action: validate the submitted form and hand it to the store.
pub async fn add_product(
    state: &AppState,
    user: &AuthUser,
    form: AddProductForm,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    if !form.submit {
        return Ok(ApiResponse {
            message: "Input".into(),
            data: None,
            meta: Some(Meta::empty()),
        });
    }

    let product = validate_add_product(&state.db, &form)
        .await
        .map_err(AppError::Validation)?;

    let added = state
        .db
        .add_product(
            &product.name,
            product.manufacturer_id,
            product.price,
            product.stock,
            product.image.as_deref(),
            &product.description,
        )
        .await;
    if !added {
        return Err(AppError::Failed("Failed to add product".into()));
    }

    tracing::info!(admin_id = user.user_id, name = %product.name, "product added");
    Ok(ApiResponse::success(
        "Product added",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

pub async fn edit_product(
    state: &AppState,
    user: &AuthUser,
    id: i32,
    changes: ProductChanges,
) -> AppResult<ApiResponse<ProductDetail>> {
    ensure_admin(user)?;
    if state.db.get_product(id).await.is_none() {
        return Err(AppError::NotFound);
    }

    let mut errors = Vec::new();
    if changes.name.as_ref().is_some_and(|n| n.chars().count() > MAX_PRODUCT_NAME_LEN) {
        errors.push(FieldError::new("name", "Name too long"));
    }
    if changes.image.as_ref().is_some_and(|i| i.chars().count() > MAX_PRODUCT_NAME_LEN) {
        errors.push(FieldError::new("image", "Image path too long"));
    }
    if changes.price.is_some_and(|p| !p.is_finite() || p < 0.0) {
        errors.push(FieldError::new("price", "Price cannot be negative"));
    }
    if changes.stock.is_some_and(|s| s < 0) {
        errors.push(FieldError::new("stock", "Stock cannot be negative"));
    }
    if let Some(manufacturer_id) = changes.manufacturer_id {
        if state.db.get_manufacturer(manufacturer_id).await.is_none() {
            errors.push(FieldError::new("manufacturer_id", "No such manufacturer id"));
        }
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    if !state.db.edit_product(id, changes).await {
        return Err(AppError::Failed("Failed to edit product".into()));
    }

    tracing::info!(admin_id = user.user_id, product_id = id, "product edited");
    let mut response = get_product(state, id).await?;
    response.message = "Updated".into();
    Ok(response)
}

pub async fn delete_product(
    state: &AppState,
    user: &AuthUser,
    id: i32,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    if state.db.get_product(id).await.is_none() {
        return Err(AppError::NotFound);
    }

    if !state.db.delete_product(id).await {
        return Err(AppError::Failed("Failed to delete product".into()));
    }

    tracing::info!(admin_id = user.user_id, product_id = id, "product deleted");
    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

/// Field checks plus the manufacturer lookup.
pub async fn validate_add_product(
    db: &Database,
    form: &AddProductForm,
) -> Result<ValidProduct, Vec<FieldError>> {
    let checked = validate_fields(form);

    let unknown_manufacturer = match parse_field::<i32>(&form.manufacturer_id) {
        Some(id) => db.get_manufacturer(id).await.is_none(),
        None => false,
    };
    let no_such = || FieldError::new("manufacturer_id", "No such manufacturer id");

    match checked {
        Ok(product) if !unknown_manufacturer => Ok(product),
        Ok(_) => Err(vec![no_such()]),
        Err(mut errors) => {
            if unknown_manufacturer {
                errors.push(no_such());
            }
            Err(errors)
        }
    }
}

/// Checks that need nothing but the form itself. All failures are collected.
pub fn validate_fields(form: &AddProductForm) -> Result<ValidProduct, Vec<FieldError>> {
    let mut errors = Vec::new();

    let name = present(&form.name);
    match name {
        Some(name) if name.chars().count() > MAX_PRODUCT_NAME_LEN => {
            errors.push(FieldError::new("name", "Name too long"));
        }
        Some(_) => {}
        None => errors.push(FieldError::new("name", "Missing Name")),
    }

    let image = present(&form.image);
    if image.is_some_and(|i| i.chars().count() > MAX_PRODUCT_NAME_LEN) {
        errors.push(FieldError::new("image", "Image path too long"));
    }

    let description = present(&form.description);
    if description.is_none() {
        errors.push(FieldError::new("description", "Missing description"));
    }

    let manufacturer_id = parse_field::<i32>(&form.manufacturer_id);
    if manufacturer_id.is_none() {
        errors.push(FieldError::new("manufacturer_id", "Missing manufacturer"));
    }

    let stock = parse_field::<i32>(&form.stock);
    match stock {
        Some(s) if s < 0 => errors.push(FieldError::new("stock", "Stock cannot be negative")),
        Some(_) => {}
        None => errors.push(FieldError::new("stock", "Missing stock count")),
    }

    let price = parse_field::<f64>(&form.price).filter(|p| p.is_finite());
    match price {
        Some(p) if p < 0.0 => errors.push(FieldError::new("price", "Price cannot be negative")),
        Some(_) => {}
        None => errors.push(FieldError::new("price", "Missing price")),
    }

    match (name, manufacturer_id, price, stock, description) {
        (Some(name), Some(manufacturer_id), Some(price), Some(stock), Some(description))
            if errors.is_empty() =>
        {
            Ok(ValidProduct {
                name: name.to_string(),
                manufacturer_id,
                price,
                stock,
                image: form.image.clone(),
                description: description.to_string(),
            })
        }
        _ => Err(errors),
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn parse_field<T: FromStr>(value: &Option<String>) -> Option<T> {
    value.as_deref().and_then(|v| v.trim().parse::<T>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget_form() -> AddProductForm {
        AddProductForm {
            name: Some("Widget".into()),
            manufacturer_id: Some("1".into()),
            price: Some("9.99".into()),
            stock: Some("10".into()),
            image: Some(String::new()),
            description: Some("A widget".into()),
            submit: true,
        }
    }

    #[test]
    fn accepts_complete_form() {
        let product = validate_fields(&widget_form()).unwrap();
        assert_eq!(
            product,
            ValidProduct {
                name: "Widget".into(),
                manufacturer_id: 1,
                price: 9.99,
                stock: 10,
                image: Some(String::new()),
                description: "A widget".into(),
            }
        );
    }

    #[test]
    fn collects_every_missing_field() {
        let errors = validate_fields(&AddProductForm {
            submit: true,
            ..Default::default()
        })
        .unwrap_err();

        assert_eq!(
            errors,
            vec![
                FieldError::new("name", "Missing Name"),
                FieldError::new("description", "Missing description"),
                FieldError::new("manufacturer_id", "Missing manufacturer"),
                FieldError::new("stock", "Missing stock count"),
                FieldError::new("price", "Missing price"),
            ]
        );
    }

    #[test]
    fn unparsable_numbers_count_as_missing() {
        let form = AddProductForm {
            manufacturer_id: Some("acme".into()),
            price: Some("cheap".into()),
            stock: Some("lots".into()),
            ..widget_form()
        };
        let errors = validate_fields(&form).unwrap_err();
        assert!(errors.contains(&FieldError::new("manufacturer_id", "Missing manufacturer")));
        assert!(errors.contains(&FieldError::new("price", "Missing price")));
        assert!(errors.contains(&FieldError::new("stock", "Missing stock count")));
    }

    #[test]
    fn rejects_overlong_name_and_image() {
        let long = "x".repeat(MAX_PRODUCT_NAME_LEN + 1);
        let form = AddProductForm {
            name: Some(long.clone()),
            image: Some(long),
            ..widget_form()
        };
        let errors = validate_fields(&form).unwrap_err();
        assert_eq!(
            errors,
            vec![
                FieldError::new("name", "Name too long"),
                FieldError::new("image", "Image path too long"),
            ]
        );
    }

    #[test]
    fn rejects_negative_and_non_finite_numbers() {
        let form = AddProductForm {
            price: Some("-1".into()),
            stock: Some("-3".into()),
            ..widget_form()
        };
        let errors = validate_fields(&form).unwrap_err();
        assert!(errors.contains(&FieldError::new("price", "Price cannot be negative")));
        assert!(errors.contains(&FieldError::new("stock", "Stock cannot be negative")));

        let form = AddProductForm {
            price: Some("NaN".into()),
            ..widget_form()
        };
        assert_eq!(
            validate_fields(&form).unwrap_err(),
            vec![FieldError::new("price", "Missing price")]
        );
    }
}
