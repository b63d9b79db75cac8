use axum::{
    routing::{delete, get},
    Router,
};

use crate::handlers::sales::{range_sales, today_sales, void_sale};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/sales/today", get(today_sales))
        .route("/sales/range", get(range_sales))
        .route("/sales/{id}", delete(void_sale))
}
