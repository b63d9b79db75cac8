// src/handlers/product.rs
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::instrument;

use crate::dtos::product::{CreateProductRequest, ProductResponse, UpdateProductRequest};
use crate::error::{map_unique_violation, AppError};
use crate::state::AppState;

const PRODUCT_COLUMNS: &str = "p.id, p.product_code, p.name, p.category_id, c.name AS category_name,
     p.marked_price, p.wholesale_price, p.stock_qty, p.created_at";

async fn fetch_product(pool: &SqlitePool, id: i64) -> Result<Option<ProductResponse>, AppError> {
    let product = sqlx::query_as::<_, ProductResponse>(&format!(
        "SELECT {PRODUCT_COLUMNS}
         FROM products p LEFT JOIN categories c ON c.id = p.category_id
         WHERE p.id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(product)
}

// GET /products - List all products with category names
#[instrument(skip(state))]
pub async fn get_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductResponse>>, AppError> {
    let products = sqlx::query_as::<_, ProductResponse>(&format!(
        "SELECT {PRODUCT_COLUMNS}
         FROM products p LEFT JOIN categories c ON c.id = p.category_id
         ORDER BY p.name"
    ))
    .fetch_all(&state.db_pool)
    .await?;

    Ok(Json(products))
}

// GET /products/:id - Get single product
#[instrument(skip(state), fields(id))]
pub async fn get_product(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<ProductResponse>, AppError> {
    let product = fetch_product(&state.db_pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Product not found"))?;

    Ok(Json(product))
}

// POST /products - Create new product
#[instrument(skip(state, payload))]
pub async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>), AppError> {
    let (id,): (i64,) = sqlx::query_as(
        "INSERT INTO products (product_code, name, category_id, marked_price, wholesale_price, stock_qty, created_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         RETURNING id",
    )
    .bind(payload.product_code.trim())
    .bind(payload.name.trim())
    .bind(payload.category_id)
    .bind(payload.marked_price)
    .bind(payload.wholesale_price)
    .bind(payload.stock_qty)
    .bind(Utc::now())
    .fetch_one(&state.db_pool)
    .await
    .map_err(|e| {
        map_unique_violation(
            e,
            &format!("Product ID '{}' already exists", payload.product_code.trim()),
        )
    })?;

    state.dashboard_cache.refresh(&state.db_pool).await;

    let product = fetch_product(&state.db_pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Product not found"))?;

    Ok((StatusCode::CREATED, Json(product)))
}

// PUT /products/:id - Update product
// Note: this is the one catalog mutation the legacy app does not follow
// with a count refresh; kept as-is.
#[instrument(skip(state, payload), fields(id))]
pub async fn update_product(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateProductRequest>,
) -> Result<Json<ProductResponse>, AppError> {
    let result = sqlx::query(
        "UPDATE products SET
         name = COALESCE($1, name),
         category_id = COALESCE($2, category_id),
         marked_price = COALESCE($3, marked_price),
         wholesale_price = COALESCE($4, wholesale_price),
         stock_qty = COALESCE($5, stock_qty)
         WHERE id = $6",
    )
    .bind(payload.name)
    .bind(payload.category_id)
    .bind(payload.marked_price)
    .bind(payload.wholesale_price)
    .bind(payload.stock_qty)
    .bind(id)
    .execute(&state.db_pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Product not found"));
    }

    let product = fetch_product(&state.db_pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Product not found"))?;

    Ok(Json(product))
}

// DELETE /products/:id - Delete product
#[instrument(skip(state), fields(id))]
pub async fn delete_product(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<()>, AppError> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(&state.db_pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Product not found"));
    }

    state.dashboard_cache.refresh(&state.db_pool).await;

    Ok(Json(()))
}
