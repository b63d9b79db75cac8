use axum::{
    routing::{get, post, put},
    Router,
};

use crate::handlers::billing::{create_bill, print_bill, update_bill};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/billing", post(create_bill))
        .route("/billing/print/{id}", get(print_bill))
        .route("/billing/{id}", put(update_bill))
}
