// src/handlers/search.rs
use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::json;
use tracing::{error, instrument};

use super::{escape_like, month_window};
use crate::dtos::search::{
    AnalyticsQuery, AnalyticsResponse, CategorySearchResult, CategoryValue, ProductSearchResult,
    ProductValue, SearchQuery,
};
use crate::error::AppError;
use crate::state::AppState;

// GET /api/search/categories?q= - Capped ci substring match
#[instrument(skip(state))]
pub async fn search_categories(
    Query(params): Query<SearchQuery>,
    State(state): State<AppState>,
) -> Result<Json<Vec<CategorySearchResult>>, AppError> {
    let categories = sqlx::query_as::<_, CategorySearchResult>(
        "SELECT id, name, code FROM categories
         WHERE name LIKE '%' || $1 || '%' ESCAPE '\\'
         LIMIT 10",
    )
    .bind(escape_like(params.q.trim()))
    .fetch_all(&state.db_pool)
    .await?;

    Ok(Json(categories))
}

// GET /api/search/products?q=&category= - Capped ci substring match
#[instrument(skip(state))]
pub async fn search_products(
    Query(params): Query<SearchQuery>,
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductSearchResult>>, AppError> {
    let query = escape_like(params.q.trim());

    let products = match params.category {
        Some(category_id) => {
            sqlx::query_as::<_, ProductSearchResult>(
                "SELECT id, name, marked_price FROM products
                 WHERE name LIKE '%' || $1 || '%' ESCAPE '\\' AND category_id = $2
                 LIMIT 10",
            )
            .bind(query.as_str())
            .bind(category_id)
            .fetch_all(&state.db_pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, ProductSearchResult>(
                "SELECT id, name, marked_price FROM products
                 WHERE name LIKE '%' || $1 || '%' ESCAPE '\\'
                 LIMIT 10",
            )
            .bind(query.as_str())
            .fetch_all(&state.db_pool)
            .await?
        }
    };

    Ok(Json(products))
}

// GET /api/products/by-id/:product_code - Lookup by external product id
//
// Always answers 200 with a {success, ...} envelope, as the clients of
// the legacy endpoint expect.
#[instrument(skip(state))]
pub async fn product_by_code(
    Path(product_code): Path<String>,
    State(state): State<AppState>,
) -> Json<serde_json::Value> {
    type Row = (i64, String, String, f64, f64, Option<i64>, Option<String>);

    let row = sqlx::query_as::<_, Row>(
        "SELECT p.id, p.product_code, p.name, p.marked_price, p.stock_qty,
                c.id, c.name
         FROM products p LEFT JOIN categories c ON c.id = p.category_id
         WHERE p.product_code = $1",
    )
    .bind(&product_code)
    .fetch_optional(&state.db_pool)
    .await;

    match row {
        Ok(Some((id, product_code, name, marked_price, stock_qty, category_id, category_name))) => {
            Json(json!({
                "success": true,
                "product": {
                    "id": id,
                    "product_code": product_code,
                    "name": name,
                    "marked_price": marked_price,
                    "stock_qty": stock_qty,
                    "category": {
                        "id": category_id,
                        "name": category_name.unwrap_or_default(),
                    },
                },
            }))
        }
        Ok(None) => Json(json!({ "success": false, "message": "Product not found" })),
        Err(e) => {
            error!(?e, "Failed to fetch product by code");
            Json(json!({ "success": false, "message": "Server error" }))
        }
    }
}

// GET /api/category-analytics?month=&year=&mode= - Per-category and
// per-product totals over one month, descending by value.
#[instrument(skip(state))]
pub async fn category_analytics(
    Query(params): Query<AnalyticsQuery>,
    State(state): State<AppState>,
) -> Result<Json<AnalyticsResponse>, AppError> {
    let (Some(month), Some(year)) = (params.month, params.year) else {
        return Err(AppError::validation("Month and Year are required"));
    };
    let (start, end) = month_window(year, month)
        .ok_or_else(|| AppError::validation("Month and Year are required"))?;

    let profit_mode = params.mode.as_deref() == Some("profit");

    type Row = (f64, f64, Option<String>, Option<f64>, Option<String>);
    let rows = sqlx::query_as::<_, Row>(
        "SELECT si.qty, si.unit_price, p.name, p.wholesale_price, c.name
         FROM sales s
         JOIN sale_items si ON si.sale_id = s.id
         LEFT JOIN products p ON p.id = si.product_id
         LEFT JOIN categories c ON c.id = p.category_id
         WHERE s.created_at >= $1 AND s.created_at < $2",
    )
    .bind(start)
    .bind(end)
    .fetch_all(&state.db_pool)
    .await?;

    let mut by_category: HashMap<String, (f64, HashMap<String, f64>)> = HashMap::new();

    for (qty, unit_price, product_name, wholesale_price, category_name) in rows {
        let category = category_name.unwrap_or_else(|| "Uncategorized".to_string());
        let product = product_name.unwrap_or_else(|| "Unknown".to_string());
        let wholesale = wholesale_price.unwrap_or(0.0);

        let value = if profit_mode {
            (unit_price - wholesale) * qty
        } else {
            unit_price * qty
        };

        let entry = by_category.entry(category).or_default();
        entry.0 += value;
        *entry.1.entry(product).or_default() += value;
    }

    let mut categories: Vec<CategoryValue> = by_category
        .into_iter()
        .map(|(name, (value, products))| {
            let mut products: Vec<ProductValue> = products
                .into_iter()
                .map(|(name, value)| ProductValue { name, value })
                .collect();
            products.sort_by(|a, b| b.value.total_cmp(&a.value));
            CategoryValue {
                name,
                value,
                products,
            }
        })
        .collect();
    categories.sort_by(|a, b| b.value.total_cmp(&a.value));

    let total = categories.iter().map(|c| c.value).sum();

    Ok(Json(AnalyticsResponse { total, categories }))
}
