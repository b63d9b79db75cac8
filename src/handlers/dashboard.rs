// src/handlers/dashboard.rs
use axum::{extract::State, Json};
use chrono::{DateTime, Datelike, Utc};
use sqlx::SqlitePool;
use tracing::instrument;

use super::{day_window, month_window};
use crate::dtos::dashboard::DashboardResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Sale/profit sums over a window, computed at render time (not cached,
/// unlike the entity counts).
async fn sums_in_window(
    pool: &SqlitePool,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<(f64, f64), AppError> {
    let (total, profit): (f64, f64) = sqlx::query_as(
        "SELECT COALESCE(SUM(total_amount), 0.0), COALESCE(SUM(profit), 0.0)
         FROM sales WHERE created_at >= $1 AND created_at < $2",
    )
    .bind(start)
    .bind(end)
    .fetch_one(pool)
    .await?;

    Ok((total, profit))
}

// GET /dashboard - Cached counts plus live today/month sums
#[instrument(skip(state))]
pub async fn dashboard(State(state): State<AppState>) -> Result<Json<DashboardResponse>, AppError> {
    let counts = state.dashboard_cache.snapshot().await;

    let now = Utc::now();
    let (today_start, today_end) = day_window(now.date_naive());
    let (month_start, month_end) = month_window(now.year(), now.month())
        .ok_or_else(|| AppError::validation("Invalid current date"))?;

    let (today_sales, today_profit) =
        sums_in_window(&state.db_pool, today_start, today_end).await?;
    let (month_sales, month_profit) =
        sums_in_window(&state.db_pool, month_start, month_end).await?;

    Ok(Json(DashboardResponse {
        category_count: counts.category_count,
        product_count: counts.product_count,
        customer_count: counts.customer_count,
        today_sales,
        month_sales,
        today_profit,
        month_profit,
    }))
}
