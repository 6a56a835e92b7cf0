use webstore::{
    cache::ScalarCache,
    config::DatabaseConfig,
    database::Database,
    db::{create_orm_conn, create_pool, run_migrations},
    models::{NewAccount, Role},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = DatabaseConfig::from_env();

    let pool = create_pool(&config).await?;
    run_migrations(&pool).await?;
    let db = Database::new(create_orm_conn(&pool), ScalarCache::default());

    ensure_account(&db, "admin", "admin@example.com", "admin123", Role::Admin).await?;
    ensure_account(&db, "alice", "alice@example.com", "alice123", Role::User).await?;
    seed_catalogue(&db).await?;

    println!("Seed completed");
    Ok(())
}

async fn ensure_account(
    db: &Database,
    username: &str,
    email: &str,
    password: &str,
    role: Role,
) -> anyhow::Result<()> {
    if db.check_for_existing_account(username).await {
        return Ok(());
    }

    let added = db
        .add_user(NewAccount {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            first_name: username.to_string(),
            last_name: "Example".to_string(),
            phone: String::new(),
            address: "1 Example Street".to_string(),
            role,
        })
        .await;
    if !added {
        anyhow::bail!("failed to seed account {username}");
    }
    println!("Seeded account {username}");
    Ok(())
}

async fn seed_catalogue(db: &Database) -> anyhow::Result<()> {
    let catalogue = [
        (
            "Ferris & Co",
            "https://ferris.example.com",
            vec![
                ("Ferris Mug", "Coffee tastes better with Ferris", 12.0, 100),
                ("Rust Sticker Pack", "Decorate your laptop", 5.0, 200),
            ],
        ),
        (
            "Async Apparel",
            "https://apparel.example.com",
            vec![("Axum Hoodie", "Warm hoodie for Rustaceans", 55.0, 50)],
        ),
    ];

    for (company, website, products) in catalogue {
        let manufacturer_id = match find_manufacturer(db, company).await {
            Some(id) => id,
            None => {
                if !db.add_manufacturer(company, website).await {
                    anyhow::bail!("failed to seed manufacturer {company}");
                }
                find_manufacturer(db, company)
                    .await
                    .ok_or_else(|| anyhow::anyhow!("manufacturer {company} missing after insert"))?
            }
        };

        let existing = db.get_products_by_manufacturer(manufacturer_id).await;
        for (name, description, price, stock) in products {
            if existing.iter().any(|p| p.name == name) {
                continue;
            }
            if !db
                .add_product(name, manufacturer_id, price, stock, None, description)
                .await
            {
                anyhow::bail!("failed to seed product {name}");
            }
        }
    }

    println!("Seeded catalogue");
    Ok(())
}

async fn find_manufacturer(db: &Database, company: &str) -> Option<i32> {
    db.get_manufacturers()
        .await
        .into_iter()
        .find(|m| m.name == company)
        .map(|m| m.id)
}
