// src/dtos/dashboard.rs
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub category_count: i64,
    pub product_count: i64,
    pub customer_count: i64,
    pub today_sales: f64,
    pub month_sales: f64,
    pub today_profit: f64,
    pub month_profit: f64,
}
