use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct Product {
    pub id: i64,
    pub product_code: String,
    pub name: String,
    pub category_id: Option<i64>,
    pub marked_price: f64,
    pub wholesale_price: f64,
    pub stock_qty: f64,
    pub created_at: DateTime<Utc>,
}
