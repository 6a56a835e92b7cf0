use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        accounts::{AccountList, UpdateUserRequest},
        auth::{LoginRequest, LoginResponse, RegisterRequest},
        manufacturers::{AddManufacturerRequest, ManufacturerList},
        products::{AddProductForm, ProductDetail, ProductList},
        purchases::{PurchaseRequest, TransactionList, TransactionView},
        reviews::{AddReviewRequest, ReviewList, ReviewView},
    },
    error::FieldError,
    models::{Account, Manufacturer, ManufacturerChanges, Product, ProductChanges, Review, Role, Transaction},
    response::{ApiResponse, Meta},
    routes::{admin, auth, health, manufacturers, products, purchases},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        products::list_products,
        products::get_product,
        products::list_reviews,
        products::add_review,
        products::purchase,
        manufacturers::list_manufacturers,
        manufacturers::list_manufacturer_products,
        purchases::list_purchases,
        admin::add_product,
        admin::edit_product,
        admin::delete_product,
        admin::add_manufacturer,
        admin::edit_manufacturer,
        admin::list_users,
        admin::edit_user,
        admin::list_transactions
    ),
    components(
        schemas(
            Role,
            Account,
            Product,
            Manufacturer,
            Review,
            Transaction,
            FieldError,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            AddProductForm,
            ProductChanges,
            ProductDetail,
            ProductList,
            AddManufacturerRequest,
            ManufacturerChanges,
            ManufacturerList,
            AddReviewRequest,
            ReviewView,
            ReviewList,
            PurchaseRequest,
            TransactionView,
            TransactionList,
            UpdateUserRequest,
            AccountList,
            Meta,
            ApiResponse<Product>,
            ApiResponse<ProductDetail>,
            ApiResponse<ProductList>,
            ApiResponse<TransactionList>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Registration and login"),
        (name = "Products", description = "Product catalogue"),
        (name = "Manufacturers", description = "Manufacturer endpoints"),
        (name = "Reviews", description = "Product reviews"),
        (name = "Purchases", description = "Buying products and purchase history"),
        (name = "Admin", description = "Admin endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
