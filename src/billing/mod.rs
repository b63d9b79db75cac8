// src/billing/mod.rs
//
// Pure billing core: no I/O here. The handlers prefetch whatever rows a
// decision needs and apply the returned decision in one place.
pub mod numbers;
pub mod payments;
pub mod resolution;
pub mod util;

/// Profit contribution of one sold line.
pub fn line_profit(unit_price: f64, wholesale_price: f64, qty: f64) -> f64 {
    (unit_price - wholesale_price) * qty
}
