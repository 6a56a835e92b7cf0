use std::{collections::BTreeMap, sync::Arc};

use chrono::{DateTime, Utc};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult, Value};
use webstore::{
    cache::ScalarCache,
    database::Database,
    entity::{manufacturer, product, purchases, reviews, users},
    models::{ProductChanges, Rating, Role},
    password,
};

fn widget(id: i32) -> product::Model {
    product::Model {
        product_id: id,
        name: "Tom &amp; Jerry &lt;DVD&gt;".into(),
        manufacturer_id: 1,
        price: 9.99,
        stock: 5,
        image: None,
        description: "It&#39;s a classic".into(),
    }
}

fn exec_ok() -> MockExecResult {
    MockExecResult {
        last_insert_id: 0,
        rows_affected: 1,
    }
}

fn average(value: Option<f64>) -> BTreeMap<&'static str, Value> {
    BTreeMap::from([("average", Value::Double(value))])
}

fn store(mock: MockDatabase) -> (Database, Arc<DatabaseConnection>) {
    let conn = Arc::new(mock.into_connection());
    (Database::new(conn.clone(), ScalarCache::default()), conn)
}

// Consumes the store so the mock connection can hand over its log.
fn statements_issued(db: Database, conn: Arc<DatabaseConnection>) -> usize {
    drop(db);
    match Arc::try_unwrap(conn) {
        Ok(conn) => conn.into_transaction_log().len(),
        Err(_) => panic!("mock connection is still shared"),
    }
}

#[tokio::test]
async fn get_product_unescapes_stored_text() {
    let (db, _conn) = store(MockDatabase::new(DatabaseBackend::Postgres).append_query_results([vec![widget(7)]]));

    let product = db.get_product(7).await.expect("product");
    assert_eq!(product.id, 7);
    assert_eq!(product.name, "Tom & Jerry <DVD>");
    assert_eq!(product.description, "It's a classic");
    assert_eq!(product.image, None);
}

#[tokio::test]
async fn missing_product_is_none() {
    let (db, _conn) = store(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<product::Model>::new()]),
    );

    assert!(db.get_product(404).await.is_none());
}

#[tokio::test]
async fn database_errors_collapse_to_sentinels() {
    // nothing primed: every statement fails
    let (db, _conn) = store(MockDatabase::new(DatabaseBackend::Postgres));

    assert!(db.get_product(1).await.is_none());
    assert!(db.get_products().await.is_empty());
    assert!(db.get_user(1).await.is_none());
    assert!(!db.add_product("Widget", 1, 1.0, 1, None, "desc").await);
    assert!(!db.decrease_product_stock(1).await);
    assert!(!db.add_manufacturer("Acme", "https://acme.example").await);
    assert_eq!(db.get_review_rating(1).await, Rating::Unrated);
}

#[tokio::test]
async fn edit_without_changes_issues_no_statement() {
    let (db, conn) = store(MockDatabase::new(DatabaseBackend::Postgres));

    assert!(db.edit_product(3, ProductChanges::default()).await);
    assert_eq!(statements_issued(db, conn), 0);
}

#[tokio::test]
async fn rename_evicts_cached_product_name() {
    let (db, conn) = store(
        MockDatabase::new(DatabaseBackend::Postgres).append_exec_results([exec_ok(), exec_ok()]),
    );
    db.cache().put_product_name(3, "Old name".into());

    let restock = ProductChanges {
        stock: Some(12),
        ..Default::default()
    };
    assert!(db.edit_product(3, restock).await);
    assert_eq!(db.cache().product_name(3).as_deref(), Some("Old name"));

    let rename = ProductChanges {
        name: Some("New name".into()),
        ..Default::default()
    };
    assert!(db.edit_product(3, rename).await);
    assert!(db.cache().product_name(3).is_none());
    assert_eq!(statements_issued(db, conn), 2);
}

#[tokio::test]
async fn rating_is_average_over_ten_and_cached() {
    let (db, conn) = store(
        MockDatabase::new(DatabaseBackend::Postgres).append_query_results([vec![average(Some(8.0))]]),
    );

    assert_eq!(db.get_review_rating(5).await, Rating::Rated(0.8));
    // served from the cache; the mock has no second result
    assert_eq!(db.get_review_rating(5).await, Rating::Rated(0.8));
    assert_eq!(statements_issued(db, conn), 1);
}

#[tokio::test]
async fn unrated_products_are_not_cached() {
    let (db, _conn) = store(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![average(None)], vec![average(Some(3.0))]]),
    );

    assert_eq!(db.get_review_rating(9).await, Rating::Unrated);
    assert_eq!(db.get_review_rating(9).await, Rating::Rated(0.3));
}

#[tokio::test]
async fn new_review_evicts_cached_rating() {
    let (db, _conn) = store(MockDatabase::new(DatabaseBackend::Postgres).append_exec_results([exec_ok()]));
    db.cache().put_product_rating(2, 0.5);

    assert!(db.add_review(1, 2, 9, "Great").await);
    assert!(db.cache().product_rating(2).is_none());
}

#[tokio::test]
async fn delete_evicts_name_and_rating() {
    let (db, _conn) = store(MockDatabase::new(DatabaseBackend::Postgres).append_exec_results([exec_ok()]));
    db.cache().put_product_name(4, "Gone".into());
    db.cache().put_product_rating(4, 0.7);

    assert!(db.delete_product(4).await);
    assert!(db.cache().product_name(4).is_none());
    assert!(db.cache().product_rating(4).is_none());
}

#[tokio::test]
async fn credentials_are_checked_against_the_digest() {
    let alice = users::Model {
        user_id: 1,
        username: "alice".into(),
        email: "alice@example.com".into(),
        password: password::hash("wonderland").unwrap(),
        first_name: "Alice".into(),
        last_name: "Liddell".into(),
        address: "1 Rabbit Hole".into(),
        phone: String::new(),
        is_admin: false,
    };
    let (db, _conn) = store(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![alice.clone()], vec![alice]]),
    );

    let account = db
        .get_user_by_credentials("alice", "wonderland")
        .await
        .expect("valid login");
    assert_eq!(account.id, 1);
    assert_eq!(account.role, Role::User);

    assert!(db.get_user_by_credentials("alice", "looking-glass").await.is_none());
}

fn acme() -> manufacturer::Model {
    manufacturer::Model {
        m_id: 3,
        website: "https://acme.example/?a=1&amp;b=2".into(),
        company_name: "Acme &amp; Sons".into(),
    }
}

fn review(id: i32, user_id: i32) -> reviews::Model {
    reviews::Model {
        review_id: id,
        user_id,
        product_id: 7,
        rating: 8,
        comment: "&lt;3 it, &quot;solid&quot;".into(),
    }
}

#[tokio::test]
async fn missing_rows_of_every_kind_are_none() {
    let (db, _conn) = store(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<manufacturer::Model>::new()])
            .append_query_results([Vec::<reviews::Model>::new()])
            .append_query_results([Vec::<purchases::Model>::new()])
            .append_query_results([Vec::<users::Model>::new()]),
    );

    assert!(db.get_manufacturer(99).await.is_none());
    assert!(db.get_review(99).await.is_none());
    assert!(db.get_transaction(99).await.is_none());
    assert!(db.get_user(99).await.is_none());
}

#[tokio::test]
async fn manufacturer_text_is_unescaped() {
    let (db, _conn) = store(MockDatabase::new(DatabaseBackend::Postgres).append_query_results([vec![acme()]]));

    let manufacturer = db.get_manufacturer(3).await.expect("manufacturer");
    assert_eq!(manufacturer.id, 3);
    assert_eq!(manufacturer.name, "Acme & Sons");
    assert_eq!(manufacturer.website, "https://acme.example/?a=1&b=2");
}

#[tokio::test]
async fn reviews_come_back_unescaped() {
    let (db, _conn) = store(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![review(1, 4)]])
            .append_query_results([vec![review(1, 4), review(2, 5)]]),
    );

    let single = db.get_review(1).await.expect("review");
    assert_eq!(single.user_id, 4);
    assert_eq!(single.product_id, 7);
    assert_eq!(single.rating, 8);
    assert_eq!(single.comment, "<3 it, \"solid\"");

    let all = db.get_reviews().await;
    assert_eq!(all.len(), 2);
    assert_eq!(all[1].id, 2);
    assert_eq!(all[1].user_id, 5);
    assert_eq!(all[1].comment, "<3 it, \"solid\"");
}

#[tokio::test]
async fn transaction_keeps_prices_and_date() {
    let date = DateTime::parse_from_rfc3339("2024-05-01T12:00:00+02:00").unwrap();
    let row = purchases::Model {
        purchase_id: 11,
        date,
        user_id: 4,
        product_id: 7,
        price: 9.5,
        shipping_address: "1 Rabbit Hole &amp; Co".into(),
        shipping_price: 4.99,
    };
    let (db, _conn) = store(MockDatabase::new(DatabaseBackend::Postgres).append_query_results([vec![row]]));

    let transaction = db.get_transaction(11).await.expect("transaction");
    assert_eq!(transaction.user_id, 4);
    assert_eq!(transaction.product_id, 7);
    assert_eq!(transaction.price, 9.5);
    assert_eq!(transaction.shipping_price, 4.99);
    assert_eq!(transaction.shipping_address, "1 Rabbit Hole & Co");
    assert_eq!(transaction.date, date.with_timezone(&Utc));
}

#[tokio::test]
async fn rejected_review_insert_is_false() {
    let (db, _conn) = store(
        MockDatabase::new(DatabaseBackend::Postgres).append_exec_errors([sea_orm::DbErr::Custom(
            "duplicate key value violates unique constraint \"reviews_user_product_key\"".into(),
        )]),
    );

    assert!(!db.add_review(4, 7, 9, "Again").await);
}

#[tokio::test]
async fn empty_image_is_kept() {
    let stored = product::Model {
        image: Some(String::new()),
        ..widget(8)
    };
    let (db, _conn) = store(MockDatabase::new(DatabaseBackend::Postgres).append_query_results([vec![stored]]));

    assert_eq!(db.get_product(8).await.expect("product").image.as_deref(), Some(""));
}
