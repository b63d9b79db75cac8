// src/dtos/search.rs
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    /// Optional category filter for product search.
    pub category: Option<i64>,
}

#[derive(Debug, Serialize, FromRow)]
pub struct CategorySearchResult {
    pub id: i64,
    pub name: String,
    pub code: String,
}

#[derive(Debug, Serialize, FromRow)]
pub struct ProductSearchResult {
    pub id: i64,
    pub name: String,
    pub marked_price: f64,
}

#[derive(Debug, Deserialize)]
pub struct AnalyticsQuery {
    pub month: Option<u32>,
    pub year: Option<i32>,
    pub mode: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProductValue {
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Serialize)]
pub struct CategoryValue {
    pub name: String,
    pub value: f64,
    pub products: Vec<ProductValue>,
}

#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    pub total: f64,
    pub categories: Vec<CategoryValue>,
}
