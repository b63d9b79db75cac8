use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Sale header row. Line items and payments live in their own tables and
/// are fetched alongside when a full bill is needed.
#[derive(Debug, FromRow)]
pub struct Sale {
    pub id: i64,
    pub bill_number: String,
    pub customer_id: Option<i64>,
    pub global_percent: f64,
    pub additional_amount: f64,
    pub total_amount: f64,
    pub total_paid: f64,
    pub profit: f64,
    pub created_at: DateTime<Utc>,
}

/// Snapshot of one sold line. `name`, `unit_price` and
/// `marked_price_at_sale` are frozen at sale time so historical bills stay
/// stable even if the product record later changes.
#[derive(Debug, FromRow)]
pub struct SaleItem {
    pub id: i64,
    pub sale_id: i64,
    pub product_id: Option<i64>,
    pub name: String,
    pub qty: f64,
    pub unit_price: f64,
    pub marked_price_at_sale: f64,
}

#[derive(Debug, FromRow)]
pub struct Payment {
    pub id: i64,
    pub sale_id: i64,
    pub method: String,
    pub amount: f64,
}
