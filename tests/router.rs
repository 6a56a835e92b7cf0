use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use sea_orm::{DatabaseBackend, MockDatabase};
use tower::ServiceExt;
use webstore::{
    cache::ScalarCache,
    database::Database,
    models::{Account, Role},
    routes::create_api_router,
    services::auth_service::issue_token,
    state::AppState,
};

const SECRET: &str = "router-test-secret";

fn app() -> Router {
    let conn = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let state = AppState::new(Database::new(conn, ScalarCache::default()), SECRET);
    Router::new().nest("/api", create_api_router()).with_state(state)
}

fn bearer(role: Role) -> String {
    let account = Account {
        id: 11,
        username: "bob".into(),
        email: "bob@example.com".into(),
        first_name: "Bob".into(),
        last_name: "Builder".into(),
        phone: String::new(),
        address: "2 Site Road".into(),
        role,
    };
    format!("Bearer {}", issue_token(&account, SECRET).unwrap())
}

async fn json_body(body: Body) -> serde_json::Value {
    let bytes = to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn purchase_requires_a_token() {
    let response = app()
        .oneshot(
            Request::post("/api/products/1/purchase")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn garbage_token_is_unauthorized() {
    let response = app()
        .oneshot(
            Request::get("/api/purchases")
                .header(header::AUTHORIZATION, "Bearer not-a-jwt")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn plain_users_cannot_add_products() {
    let response = app()
        .oneshot(
            Request::post("/api/admin/products")
                .header(header::AUTHORIZATION, bearer(Role::User))
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("name=Widget&submit=true"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn unsubmitted_form_returns_input() {
    let response = app()
        .oneshot(
            Request::post("/api/admin/products")
                .header(header::AUTHORIZATION, bearer(Role::Admin))
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("name=Widget"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response.into_body()).await;
    assert_eq!(body["message"], "Input");
    assert!(body["data"].is_null());
}

#[tokio::test]
async fn registration_errors_are_listed_per_field() {
    let response = app()
        .oneshot(
            Request::post("/api/auth/register")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"username":"carol","password":"abc"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json_body(response.into_body()).await;
    let fields: Vec<&str> = body["data"]["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["field"].as_str().unwrap())
        .collect();
    assert_eq!(
        fields,
        vec!["email", "first_name", "last_name", "address", "password"]
    );
}

#[tokio::test]
async fn purchase_without_a_body_reaches_the_service() {
    // the empty mock store has no such product, so the service answers 404
    let response = app()
        .oneshot(
            Request::post("/api/products/1/purchase")
                .header(header::AUTHORIZATION, bearer(Role::User))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn product_form_errors_use_the_form_field_names() {
    let response = app()
        .oneshot(
            Request::post("/api/admin/products")
                .header(header::AUTHORIZATION, bearer(Role::Admin))
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(
                    "name=Widget&manufacturer_id=acme&price=1&stock=1&description=Thing&submit=true",
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json_body(response.into_body()).await;
    assert_eq!(body["data"]["fields"][0]["field"], "manufacturer_id");
    assert_eq!(body["data"]["fields"][0]["message"], "Missing manufacturer");
}
