//! Schema bootstrap: idempotent DDL for the marketplace tables.
//! Order follows foreign-key dependencies; join tables come last.

use crate::error::AppError;
use sqlx::PgPool;

const DDL: &[(&str, &str)] = &[
    (
        "merchants",
        r#"
        CREATE TABLE IF NOT EXISTS merchants (
            id SERIAL PRIMARY KEY,
            name VARCHAR(80) NOT NULL UNIQUE,
            city VARCHAR(120),
            state VARCHAR(120),
            phone VARCHAR(120),
            email VARCHAR(120),
            fb_link VARCHAR(120),
            insta_link VARCHAR(120),
            image_link VARCHAR(500),
            description VARCHAR(500)
        )
        "#,
    ),
    (
        "items",
        r#"
        CREATE TABLE IF NOT EXISTS items (
            id SERIAL PRIMARY KEY,
            name VARCHAR(100) NOT NULL,
            price DOUBLE PRECISION NOT NULL,
            description VARCHAR(500),
            image_link VARCHAR(500),
            merchant_id INTEGER NOT NULL REFERENCES merchants (id)
        )
        "#,
    ),
    (
        "customers",
        r#"
        CREATE TABLE IF NOT EXISTS customers (
            id SERIAL PRIMARY KEY,
            name VARCHAR(100) NOT NULL,
            email VARCHAR(100) NOT NULL
        )
        "#,
    ),
    (
        "favorites",
        r#"
        CREATE TABLE IF NOT EXISTS favorites (
            customer_id INTEGER NOT NULL REFERENCES customers (id),
            item_id INTEGER NOT NULL REFERENCES items (id),
            PRIMARY KEY (customer_id, item_id)
        )
        "#,
    ),
    (
        "purchased",
        r#"
        CREATE TABLE IF NOT EXISTS purchased (
            customer_id INTEGER NOT NULL REFERENCES customers (id),
            item_id INTEGER NOT NULL REFERENCES items (id),
            PRIMARY KEY (customer_id, item_id)
        )
        "#,
    ),
    (
        "items_merchant_id_idx",
        "CREATE INDEX IF NOT EXISTS items_merchant_id_idx ON items (merchant_id)",
    ),
];

/// Create every table and index that does not exist yet, in one transaction.
pub async fn apply_migrations(pool: &PgPool) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;
    for (name, sql) in DDL {
        tracing::debug!(object = name, "ensure");
        sqlx::query(sql).execute(&mut *tx).await?;
    }
    tx.commit().await?;
    tracing::info!(objects = DDL.len(), "schema ready");
    Ok(())
}
