// src/dtos/billing.rs
use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::billing::payments::RawPayments;
use crate::billing::util::lenient_f64;

/// Customer block of a billing submission. All fields optional in the
/// payload; the phone drives lookup, everything else is create-only data.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BillCustomer {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    pub address: Option<String>,
    pub dob: Option<NaiveDate>,
}

/// One submitted cart line. `product` is a row id or free text.
#[derive(Debug, Clone, Deserialize)]
pub struct BillLineInput {
    #[serde(default)]
    pub product: String,
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub qty: f64,
    #[serde(default, alias = "unitPrice", deserialize_with = "lenient_f64")]
    pub unit_price: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Discounts {
    #[serde(default, alias = "globalPercent", deserialize_with = "lenient_f64")]
    pub global_percent: f64,
    #[serde(default, alias = "additionalAmount", deserialize_with = "lenient_f64")]
    pub additional_amount: f64,
}

/// Billing creation payload. Items are keyed by arbitrary client-side
/// indexes; declared totals are trusted, not recomputed from the lines.
#[derive(Debug, Deserialize)]
pub struct CreateBillRequest {
    #[serde(default)]
    pub customer: BillCustomer,
    #[serde(default)]
    pub items: BTreeMap<String, BillLineInput>,
    #[serde(default)]
    pub payments: Option<RawPayments>,
    #[serde(default)]
    pub discounts: Discounts,
    #[serde(default, alias = "totalAmount", deserialize_with = "lenient_f64")]
    pub total_amount: f64,
    #[serde(default, alias = "totalPaid", deserialize_with = "lenient_f64")]
    pub total_paid: f64,
}

#[derive(Debug, Serialize)]
pub struct CreateBillResponse {
    pub sale_id: i64,
    pub bill_number: String,
    pub redirect: String,
}

/// Customer block of an edit submission. Every field is optional so
/// only submitted values overwrite the stored record.
#[derive(Debug, Clone, Deserialize)]
pub struct EditBillCustomer {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub dob: Option<NaiveDate>,
}

/// Replacement line for the edit-bill flow: already in snapshot shape.
#[derive(Debug, Clone, Deserialize)]
pub struct EditItemInput {
    pub product: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub qty: f64,
    #[serde(default, alias = "unitPrice", deserialize_with = "lenient_f64")]
    pub unit_price: f64,
    #[serde(default, alias = "markedPriceAtSale", deserialize_with = "lenient_f64")]
    pub marked_price_at_sale: f64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateBillRequest {
    #[serde(default)]
    pub customer: Option<EditBillCustomer>,
    #[serde(default)]
    pub items: BTreeMap<String, EditItemInput>,
    #[serde(default)]
    pub discounts: Discounts,
    #[serde(default, alias = "totalAmount", deserialize_with = "lenient_f64")]
    pub total_amount: f64,
    #[serde(default, alias = "totalPaid", deserialize_with = "lenient_f64")]
    pub total_paid: f64,
    pub view: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// Range/view context echoed on edit and void to pick the return page.
#[derive(Debug, Default, Deserialize)]
pub struct RangeContext {
    pub view: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct RedirectResponse {
    pub redirect: String,
}

/// The post-save return target: the date-range view when the client came
/// from one, otherwise the fixed today view.
pub fn redirect_target(view: Option<&str>, from: Option<NaiveDate>, to: Option<NaiveDate>) -> String {
    match (view, from, to) {
        (Some("range"), Some(from), Some(to)) => {
            format!("/sales/range?from={from}&to={to}")
        }
        _ => "/sales/today".to_string(),
    }
}
