#![allow(dead_code)]

use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

pub const CREATE_PRODUCTS_SQL: &str = r#"
CREATE TABLE products (
    id INTEGER PRIMARY KEY,
    sku TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    stock INTEGER NOT NULL DEFAULT 0,
    price REAL NOT NULL DEFAULT 0,
    meta TEXT,
    updated_at TEXT
)
"#;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

pub async fn create_test_pool() -> SqlitePool {
    init_tracing();
    SqlitePoolOptions::new()
        .max_connections(1)
        .connect(":memory:")
        .await
        .expect("Failed to create in-memory SQLite pool")
}

pub async fn seeded_pool() -> SqlitePool {
    let pool = create_test_pool().await;
    sqlx::query(CREATE_PRODUCTS_SQL)
        .execute(&pool)
        .await
        .expect("Failed to create products");
    sqlx::query(
        "INSERT INTO products (id, sku, name, stock, price) VALUES \
         (1, 'A-1', 'Anvil', 10, 99.5), \
         (2, 'B-2', 'Bucket', 5, 4.25), \
         (3, 'C-3', 'Chain', 0, 12.0)",
    )
    .execute(&pool)
    .await
    .expect("Failed to seed products");
    pool
}

pub async fn product(pool: &SqlitePool, id: i64) -> (String, i64, f64, Option<String>) {
    sqlx::query_as("SELECT name, stock, price, meta FROM products WHERE id = ?")
        .bind(id)
        .fetch_one(pool)
        .await
        .unwrap_or_else(|e| panic!("Failed to load product {id}: {e}"))
}
