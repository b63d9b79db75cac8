// src/dtos/sale.rs
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::billing::payments::NormalizedPayment;
use crate::dtos::customer::CustomerResponse;
use crate::models::sale::{Payment, Sale, SaleItem};

#[derive(Debug, Serialize)]
pub struct SaleItemView {
    pub product_id: Option<i64>,
    pub name: String,
    pub qty: f64,
    pub unit_price: f64,
    pub marked_price_at_sale: f64,
}

impl From<SaleItem> for SaleItemView {
    fn from(item: SaleItem) -> Self {
        Self {
            product_id: item.product_id,
            name: item.name,
            qty: item.qty,
            unit_price: item.unit_price,
            marked_price_at_sale: item.marked_price_at_sale,
        }
    }
}

impl From<Payment> for NormalizedPayment {
    fn from(payment: Payment) -> Self {
        Self {
            method: payment.method,
            amount: payment.amount,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DiscountsView {
    pub global_percent: f64,
    pub additional_amount: f64,
}

/// Full bill as shown on the print view and the sales lists.
#[derive(Debug, Serialize)]
pub struct SaleResponse {
    pub id: i64,
    pub bill_number: String,
    pub customer: Option<CustomerResponse>,
    pub items: Vec<SaleItemView>,
    pub payments: Vec<NormalizedPayment>,
    pub discounts: DiscountsView,
    pub total_amount: f64,
    pub total_paid: f64,
    pub profit: f64,
    pub created_at: DateTime<Utc>,
}

impl SaleResponse {
    pub fn assemble(
        sale: Sale,
        customer: Option<CustomerResponse>,
        items: Vec<SaleItem>,
        payments: Vec<Payment>,
    ) -> Self {
        Self {
            id: sale.id,
            bill_number: sale.bill_number,
            customer,
            items: items.into_iter().map(SaleItemView::from).collect(),
            payments: payments.into_iter().map(NormalizedPayment::from).collect(),
            discounts: DiscountsView {
                global_percent: sale.global_percent,
                additional_amount: sale.additional_amount,
            },
            total_amount: sale.total_amount,
            total_paid: sale.total_paid,
            profit: sale.profit,
            created_at: sale.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RangeSalesResponse {
    pub sales: Vec<SaleResponse>,
    pub total: f64,
    pub total_profit: f64,
    pub from: NaiveDate,
    pub to: NaiveDate,
}
