// src/routes/mod.rs
pub mod api;
pub mod billing;
pub mod categories;
pub mod customers;
pub mod products;
pub mod sales;

use axum::{
    http::{StatusCode, Uri},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use crate::handlers::{auth, dashboard};
use crate::state::AppState;

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/dashboard", get(dashboard::dashboard))
        .merge(categories::routes())
        .merge(products::routes())
        .merge(customers::routes())
        .merge(billing::routes())
        .merge(sales::routes())
        .merge(api::routes())
        .fallback(not_found)
}

// Any unmatched route answers with a JSON not-found body.
async fn not_found(uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Not Found", "path": uri.path() })),
    )
}
