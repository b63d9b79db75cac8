// src/dtos/customer.rs
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::models::customer::Customer;

#[derive(Debug, Deserialize)]
pub struct UpdateCustomerRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub dob: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct CustomerResponse {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub address: Option<String>,
    pub dob: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl From<Customer> for CustomerResponse {
    fn from(customer: Customer) -> Self {
        Self {
            id: customer.id,
            name: customer.name,
            phone: customer.phone,
            address: customer.address,
            dob: customer.dob,
            created_at: customer.created_at,
        }
    }
}

/// Trimmed shape for the interactive billing lookup.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct CustomerSearchResult {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub address: Option<String>,
}
