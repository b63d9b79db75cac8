use axum::{
    routing::{get, put},
    Router,
};

use crate::handlers::customer::{
    delete_customer, get_customers, search_customers, update_customer,
};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/customers", get(get_customers))
        .route("/customers/search", get(search_customers))
        .route(
            "/customers/{id}",
            put(update_customer).delete(delete_customer),
        )
}
