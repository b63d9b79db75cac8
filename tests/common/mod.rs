// tests/common/mod.rs
use axum::{extract::State, http::StatusCode, Json};
use sqlx::sqlite::SqlitePoolOptions;

use firstchoice_backend::config::Config;
use firstchoice_backend::database;
use firstchoice_backend::dtos::billing::{CreateBillRequest, CreateBillResponse};
use firstchoice_backend::dtos::category::{CategoryResponse, CreateCategoryRequest};
use firstchoice_backend::dtos::product::{CreateProductRequest, ProductResponse};
use firstchoice_backend::handlers;
use firstchoice_backend::state::AppState;

/// Fresh app state over an in-memory database. One connection only, so
/// every call sees the same in-memory store.
pub async fn test_state() -> AppState {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory pool");
    database::init_schema(&pool).await.expect("schema");

    let config = Config {
        database_url: "sqlite::memory:".to_string(),
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        admin_username: "Admin".to_string(),
        admin_password: "firstChoice".to_string(),
    };

    AppState::new(pool, config)
}

pub async fn seed_category(state: &AppState, name: &str, code: &str) -> CategoryResponse {
    let (status, Json(category)) = handlers::category::create_category(
        State(state.clone()),
        Json(CreateCategoryRequest {
            name: name.to_string(),
            code: code.to_string(),
        }),
    )
    .await
    .expect("create category");
    assert_eq!(status, StatusCode::CREATED);
    category
}

pub async fn seed_product(
    state: &AppState,
    code: &str,
    name: &str,
    category_id: Option<i64>,
    marked_price: f64,
    wholesale_price: f64,
    stock_qty: f64,
) -> ProductResponse {
    let (status, Json(product)) = handlers::product::create_product(
        State(state.clone()),
        Json(CreateProductRequest {
            product_code: code.to_string(),
            name: name.to_string(),
            category_id,
            marked_price,
            wholesale_price,
            stock_qty,
        }),
    )
    .await
    .expect("create product");
    assert_eq!(status, StatusCode::CREATED);
    product
}

pub async fn submit_bill(state: &AppState, payload: serde_json::Value) -> CreateBillResponse {
    let req: CreateBillRequest = serde_json::from_value(payload).expect("bill payload");
    let (status, Json(response)) =
        handlers::billing::create_bill(State(state.clone()), Json(req))
            .await
            .expect("create bill");
    assert_eq!(status, StatusCode::CREATED);
    response
}

pub async fn product_stock(state: &AppState, id: i64) -> f64 {
    let (stock,): (f64,) = sqlx::query_as("SELECT stock_qty FROM products WHERE id = $1")
        .bind(id)
        .fetch_one(&state.db_pool)
        .await
        .expect("stock query");
    stock
}

pub async fn count_rows(state: &AppState, table: &str) -> i64 {
    let (count,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(&state.db_pool)
        .await
        .expect("count query");
    count
}
