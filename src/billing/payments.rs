// src/billing/payments.rs
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::util::lenient_f64;

/// One payment entry as submitted. `mixed` entries carry the split in
/// `cash_amount`/`upi_amount` instead of `amount`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPayment {
    #[serde(default)]
    pub method: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub amount: f64,
    #[serde(default, alias = "cashAmount", deserialize_with = "lenient_f64")]
    pub cash_amount: f64,
    #[serde(default, alias = "upiAmount", deserialize_with = "lenient_f64")]
    pub upi_amount: f64,
}

/// Clients send payments either as a list or as an index-keyed object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawPayments {
    List(Vec<RawPayment>),
    Map(BTreeMap<String, RawPayment>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedPayment {
    pub method: String,
    pub amount: f64,
}

/// Normalizes the raw payment field: only the first entry counts, and a
/// "mixed" method splits into a cash and a upi payment.
pub fn normalize_payments(raw: Option<RawPayments>) -> Vec<NormalizedPayment> {
    let entries: Vec<RawPayment> = match raw {
        Some(RawPayments::List(list)) => list,
        Some(RawPayments::Map(map)) => map.into_values().collect(),
        None => Vec::new(),
    };

    let Some(first) = entries.into_iter().next() else {
        return Vec::new();
    };

    if first.method == "mixed" {
        vec![
            NormalizedPayment {
                method: "cash".to_string(),
                amount: first.cash_amount,
            },
            NormalizedPayment {
                method: "upi".to_string(),
                amount: first.upi_amount,
            },
        ]
    } else {
        vec![NormalizedPayment {
            method: first.method,
            amount: first.amount,
        }]
    }
}
