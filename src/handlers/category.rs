// src/handlers/category.rs
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use tracing::instrument;

use crate::dtos::category::{CategoryResponse, CreateCategoryRequest, UpdateCategoryRequest};
use crate::error::{map_unique_violation, AppError};
use crate::models::category::Category;
use crate::state::AppState;

// GET /categories - List all categories
#[instrument(skip(state))]
pub async fn get_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryResponse>>, AppError> {
    let categories = sqlx::query_as::<_, Category>(
        "SELECT id, name, code, created_at FROM categories ORDER BY name",
    )
    .fetch_all(&state.db_pool)
    .await?;

    Ok(Json(categories.into_iter().map(CategoryResponse::from).collect()))
}

// POST /categories - Create new category
#[instrument(skip(state, payload))]
pub async fn create_category(
    State(state): State<AppState>,
    Json(payload): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<CategoryResponse>), AppError> {
    let category = sqlx::query_as::<_, Category>(
        "INSERT INTO categories (name, code, created_at) VALUES ($1, $2, $3)
         RETURNING id, name, code, created_at",
    )
    .bind(payload.name.trim())
    .bind(payload.code.trim())
    .bind(Utc::now())
    .fetch_one(&state.db_pool)
    .await
    .map_err(|e| map_unique_violation(e, "Category code must be unique"))?;

    state.dashboard_cache.refresh(&state.db_pool).await;

    Ok((StatusCode::CREATED, Json(CategoryResponse::from(category))))
}

// PUT /categories/:id - Update category
#[instrument(skip(state, payload), fields(id))]
pub async fn update_category(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateCategoryRequest>,
) -> Result<Json<CategoryResponse>, AppError> {
    let category = sqlx::query_as::<_, Category>(
        "UPDATE categories SET
         name = COALESCE($1, name),
         code = COALESCE($2, code)
         WHERE id = $3
         RETURNING id, name, code, created_at",
    )
    .bind(payload.name)
    .bind(payload.code)
    .bind(id)
    .fetch_optional(&state.db_pool)
    .await
    .map_err(|e| map_unique_violation(e, "Category code must be unique"))?
    .ok_or_else(|| AppError::not_found("Category not found"))?;

    state.dashboard_cache.refresh(&state.db_pool).await;

    Ok(Json(CategoryResponse::from(category)))
}

// DELETE /categories/:id - Delete category
#[instrument(skip(state), fields(id))]
pub async fn delete_category(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<()>, AppError> {
    let result = sqlx::query("DELETE FROM categories WHERE id = $1")
        .bind(id)
        .execute(&state.db_pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Category not found"));
    }

    state.dashboard_cache.refresh(&state.db_pool).await;

    Ok(Json(()))
}
