// src/handlers/customer.rs
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use tracing::instrument;

use crate::dtos::customer::{CustomerResponse, CustomerSearchResult, UpdateCustomerRequest};
use crate::error::{map_unique_violation, AppError};
use crate::models::customer::Customer;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CustomerSearchQuery {
    #[serde(default)]
    pub q: String,
}

// GET /customers - List all customers sorted by name
#[instrument(skip(state))]
pub async fn get_customers(
    State(state): State<AppState>,
) -> Result<Json<Vec<CustomerResponse>>, AppError> {
    let customers = sqlx::query_as::<_, Customer>(
        "SELECT id, name, phone, address, dob, created_at FROM customers ORDER BY name",
    )
    .fetch_all(&state.db_pool)
    .await?;

    Ok(Json(customers.into_iter().map(CustomerResponse::from).collect()))
}

// GET /customers/search?q= - Interactive lookup for billing entry
#[instrument(skip(state))]
pub async fn search_customers(
    Query(params): Query<CustomerSearchQuery>,
    State(state): State<AppState>,
) -> Result<Json<Vec<CustomerSearchResult>>, AppError> {
    let query = params.q.trim();
    if query.is_empty() {
        return Ok(Json(Vec::new()));
    }

    let customers = sqlx::query_as::<_, CustomerSearchResult>(
        "SELECT id, name, phone, address FROM customers
         WHERE phone LIKE '%' || $1 || '%' ESCAPE '\\'
            OR name LIKE '%' || $1 || '%' ESCAPE '\\'
         LIMIT 10",
    )
    .bind(super::escape_like(query))
    .fetch_all(&state.db_pool)
    .await?;

    Ok(Json(customers))
}

// PUT /customers/:id - Update customer
#[instrument(skip(state, payload), fields(id))]
pub async fn update_customer(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateCustomerRequest>,
) -> Result<Json<CustomerResponse>, AppError> {
    let customer = sqlx::query_as::<_, Customer>(
        "UPDATE customers SET
         name = COALESCE($1, name),
         phone = COALESCE($2, phone),
         address = COALESCE($3, address),
         dob = COALESCE($4, dob)
         WHERE id = $5
         RETURNING id, name, phone, address, dob, created_at",
    )
    .bind(payload.name)
    .bind(payload.phone)
    .bind(payload.address)
    .bind(payload.dob)
    .bind(id)
    .fetch_optional(&state.db_pool)
    .await
    .map_err(|e| map_unique_violation(e, "Customer phone already exists"))?
    .ok_or_else(|| AppError::not_found("Customer not found"))?;

    state.dashboard_cache.refresh(&state.db_pool).await;

    Ok(Json(CustomerResponse::from(customer)))
}

// DELETE /customers/:id - Delete customer
#[instrument(skip(state), fields(id))]
pub async fn delete_customer(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<()>, AppError> {
    let result = sqlx::query("DELETE FROM customers WHERE id = $1")
        .bind(id)
        .execute(&state.db_pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Customer not found"));
    }

    state.dashboard_cache.refresh(&state.db_pool).await;

    Ok(Json(()))
}
