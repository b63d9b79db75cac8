// src/dtos/product.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub product_code: String,
    pub name: String,
    pub category_id: Option<i64>,
    pub marked_price: f64,
    #[serde(default)]
    pub wholesale_price: f64,
    #[serde(default)]
    pub stock_qty: f64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub category_id: Option<i64>,
    pub marked_price: Option<f64>,
    pub wholesale_price: Option<f64>,
    pub stock_qty: Option<f64>,
}

/// Product row with its category name joined in for list/detail views.
#[derive(Debug, FromRow, Serialize)]
pub struct ProductResponse {
    pub id: i64,
    pub product_code: String,
    pub name: String,
    pub category_id: Option<i64>,
    pub category_name: Option<String>,
    pub marked_price: f64,
    pub wholesale_price: f64,
    pub stock_qty: f64,
    pub created_at: DateTime<Utc>,
}
