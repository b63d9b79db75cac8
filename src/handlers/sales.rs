// src/handlers/sales.rs
use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::{info, instrument};

use super::day_window;
use crate::dtos::billing::{redirect_target, RangeContext, RedirectResponse};
use crate::dtos::sale::{RangeSalesResponse, SaleResponse};
use crate::error::AppError;
use crate::handlers::billing::assemble_sale;
use crate::models::sale::Sale;
use crate::state::AppState;

const SALE_COLUMNS: &str = "id, bill_number, customer_id, global_percent, additional_amount,
     total_amount, total_paid, profit, created_at";

#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

// GET /sales/today - Sales within the current day
#[instrument(skip(state))]
pub async fn today_sales(
    State(state): State<AppState>,
) -> Result<Json<Vec<SaleResponse>>, AppError> {
    let (start, end) = day_window(Utc::now().date_naive());

    let sales = sqlx::query_as::<_, Sale>(&format!(
        "SELECT {SALE_COLUMNS} FROM sales
         WHERE created_at >= $1 AND created_at < $2
         ORDER BY id"
    ))
    .bind(start)
    .bind(end)
    .fetch_all(&state.db_pool)
    .await?;

    let mut out = Vec::with_capacity(sales.len());
    for sale in sales {
        out.push(assemble_sale(&state.db_pool, sale).await?);
    }

    Ok(Json(out))
}

// GET /sales/range?from=&to= - Sales between two dates, newest first
#[instrument(skip(state))]
pub async fn range_sales(
    Query(params): Query<RangeQuery>,
    State(state): State<AppState>,
) -> Result<Json<RangeSalesResponse>, AppError> {
    let (Some(from), Some(to)) = (params.from, params.to) else {
        return Err(AppError::validation("Please select both dates"));
    };

    let (start, _) = day_window(from);
    let (_, end) = day_window(to);

    let sales = sqlx::query_as::<_, Sale>(&format!(
        "SELECT {SALE_COLUMNS} FROM sales
         WHERE created_at >= $1 AND created_at < $2
         ORDER BY created_at DESC"
    ))
    .bind(start)
    .bind(end)
    .fetch_all(&state.db_pool)
    .await?;

    let mut total = 0.0;
    let mut total_profit = 0.0;
    let mut out = Vec::with_capacity(sales.len());

    for sale in sales {
        total += sale.total_amount;
        let mut view = assemble_sale(&state.db_pool, sale).await?;
        if view.profit == 0.0 {
            // Legacy records predate the stored profit column; recompute
            // for display only, never persisted.
            view.profit = recompute_profit(&state.db_pool, view.id).await?;
        }
        total_profit += view.profit;
        out.push(view);
    }

    Ok(Json(RangeSalesResponse {
        sales: out,
        total,
        total_profit,
        from,
        to,
    }))
}

/// Recomputes a sale's profit from its line snapshots against the current
/// wholesale prices. Lines whose product no longer exists contribute 0.
async fn recompute_profit(pool: &SqlitePool, sale_id: i64) -> Result<f64, AppError> {
    let (profit,): (f64,) = sqlx::query_as(
        "SELECT COALESCE(SUM((si.unit_price - p.wholesale_price) * si.qty), 0.0)
         FROM sale_items si
         JOIN products p ON p.id = si.product_id
         WHERE si.sale_id = $1",
    )
    .bind(sale_id)
    .fetch_one(pool)
    .await?;

    Ok(profit)
}

// DELETE /sales/:id - Void a bill, restoring line quantities to stock
//
// Restock targets products that still exist; lines whose product was
// auto-created at sale time started with stock = qty sold, so a void
// double-adds there. A missing sale still redirects cleanly.
#[instrument(skip(state), fields(id))]
pub async fn void_sale(
    Path(id): Path<i64>,
    Query(ctx): Query<RangeContext>,
    State(state): State<AppState>,
) -> Result<Json<RedirectResponse>, AppError> {
    let mut tx = state.db_pool.begin().await?;

    let sale = sqlx::query_as::<_, Sale>(&format!("SELECT {SALE_COLUMNS} FROM sales WHERE id = $1"))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

    if let Some(sale) = sale {
        let items = sqlx::query_as::<_, (Option<i64>, f64)>(
            "SELECT product_id, qty FROM sale_items WHERE sale_id = $1",
        )
        .bind(sale.id)
        .fetch_all(&mut *tx)
        .await?;

        for (product_id, qty) in items {
            if let Some(product_id) = product_id {
                sqlx::query("UPDATE products SET stock_qty = stock_qty + $1 WHERE id = $2")
                    .bind(qty)
                    .bind(product_id)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        // Items and payments go with the sale via cascade.
        sqlx::query("DELETE FROM sales WHERE id = $1")
            .bind(sale.id)
            .execute(&mut *tx)
            .await?;

        info!(sale_id = sale.id, bill_number = %sale.bill_number, "Bill voided");
    }

    tx.commit().await?;

    state.dashboard_cache.refresh(&state.db_pool).await;

    Ok(Json(RedirectResponse {
        redirect: redirect_target(ctx.view.as_deref(), ctx.from, ctx.to),
    }))
}
