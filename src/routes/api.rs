use axum::{routing::get, Router};

use crate::handlers::search::{
    category_analytics, product_by_code, search_categories, search_products,
};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/search/categories", get(search_categories))
        .route("/api/search/products", get(search_products))
        .route("/api/products/by-id/{product_code}", get(product_by_code))
        .route("/api/category-analytics", get(category_analytics))
}
