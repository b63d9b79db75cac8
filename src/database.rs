// src/database.rs
use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

/// Creates the SQLite pool, creating the database file on first run.
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
}

/// Runs the schema DDL. Idempotent, executed at every startup.
///
/// Timestamps are written from Rust as RFC 3339 text so range comparisons
/// stay consistent; never rely on SQL-side defaults for them.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(
        r#"
        CREATE TABLE IF NOT EXISTS categories (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            name        TEXT NOT NULL,
            code        TEXT NOT NULL UNIQUE,
            created_at  TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS products (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            product_code    TEXT NOT NULL UNIQUE,
            name            TEXT NOT NULL,
            category_id     INTEGER REFERENCES categories(id) ON DELETE SET NULL,
            marked_price    REAL NOT NULL DEFAULT 0,
            wholesale_price REAL NOT NULL DEFAULT 0,
            stock_qty       REAL NOT NULL DEFAULT 0,
            created_at      TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS customers (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            name        TEXT NOT NULL,
            phone       TEXT NOT NULL UNIQUE,
            address     TEXT,
            dob         TEXT,
            created_at  TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS sales (
            id                INTEGER PRIMARY KEY AUTOINCREMENT,
            bill_number       TEXT NOT NULL,
            customer_id       INTEGER REFERENCES customers(id) ON DELETE SET NULL,
            global_percent    REAL NOT NULL DEFAULT 0,
            additional_amount REAL NOT NULL DEFAULT 0,
            total_amount      REAL NOT NULL DEFAULT 0,
            total_paid        REAL NOT NULL DEFAULT 0,
            profit            REAL NOT NULL DEFAULT 0,
            created_at        TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS sale_items (
            id                   INTEGER PRIMARY KEY AUTOINCREMENT,
            sale_id              INTEGER NOT NULL REFERENCES sales(id) ON DELETE CASCADE,
            product_id           INTEGER REFERENCES products(id) ON DELETE SET NULL,
            name                 TEXT NOT NULL,
            qty                  REAL NOT NULL,
            unit_price           REAL NOT NULL,
            marked_price_at_sale REAL NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS payments (
            id       INTEGER PRIMARY KEY AUTOINCREMENT,
            sale_id  INTEGER NOT NULL REFERENCES sales(id) ON DELETE CASCADE,
            method   TEXT NOT NULL,
            amount   REAL NOT NULL
        );

        CREATE TABLE IF NOT EXISTS counters (
            name   TEXT PRIMARY KEY,
            value  INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_sales_created_at ON sales(created_at);
        CREATE INDEX IF NOT EXISTS idx_sale_items_sale ON sale_items(sale_id);
        CREATE INDEX IF NOT EXISTS idx_payments_sale ON payments(sale_id);
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
