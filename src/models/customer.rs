use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

#[derive(Debug, FromRow)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub address: Option<String>,
    pub dob: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}
