// tests/billing_flow.rs
//
// End-to-end billing workflow against an in-memory store, driving the
// handlers directly.
mod common;

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::NaiveDate;
use serde_json::json;

use common::{count_rows, product_stock, seed_category, seed_product, submit_bill, test_state};
use firstchoice_backend::dtos::billing::{RangeContext, UpdateBillRequest};
use firstchoice_backend::error::AppError;
use firstchoice_backend::handlers;

#[tokio::test]
async fn bill_decrements_stock_and_computes_profit() {
    let state = test_state().await;
    let category = seed_category(&state, "Snacks", "CAT01").await;
    let product = seed_product(&state, "P001", "Parle-G", Some(category.id), 10.0, 6.0, 500.0).await;

    let response = submit_bill(
        &state,
        json!({
            "customer": { "name": "Ravi", "phone": "9876543210" },
            "items": { "0": { "product": "Parle-G", "qty": 5, "unitPrice": 10 } },
            "payments": [ { "method": "cash", "amount": 50 } ],
            "discounts": { "globalPercent": 0, "additionalAmount": 0 },
            "totalAmount": 50,
            "totalPaid": 50
        }),
    )
    .await;

    assert_eq!(response.bill_number, "FC-00001");
    assert_eq!(response.redirect, format!("/billing/print/{}", response.sale_id));
    assert_eq!(product_stock(&state, product.id).await, 495.0);

    let Json(sale) = handlers::billing::print_bill(Path(response.sale_id), State(state.clone()))
        .await
        .expect("print bill");
    assert_eq!(sale.profit, 20.0);
    assert_eq!(sale.total_amount, 50.0);
    assert_eq!(sale.items.len(), 1);
    assert_eq!(sale.items[0].product_id, Some(product.id));
    assert_eq!(sale.items[0].marked_price_at_sale, 10.0);
    assert_eq!(sale.payments.len(), 1);
    assert_eq!(sale.customer.as_ref().map(|c| c.phone.as_str()), Some("9876543210"));
}

#[tokio::test]
async fn insufficient_stock_aborts_whole_bill() {
    let state = test_state().await;
    let a = seed_product(&state, "P001", "Biscuits", None, 10.0, 6.0, 10.0).await;
    let b = seed_product(&state, "P002", "Soap", None, 30.0, 20.0, 1.0).await;

    let req = serde_json::from_value(json!({
        "customer": { "name": "Ravi", "phone": "111" },
        "items": {
            "0": { "product": "Biscuits", "qty": 5, "unitPrice": 10 },
            "1": { "product": "Soap", "qty": 5, "unitPrice": 30 }
        },
        "totalAmount": 200,
        "totalPaid": 200
    }))
    .unwrap();

    let result = handlers::billing::create_bill(State(state.clone()), Json(req)).await;
    match result {
        Err(AppError::ValidationError(msg)) => assert!(msg.contains("Soap"), "message: {msg}"),
        other => panic!("expected validation error, got {other:?}"),
    }

    // Transaction rolled back: no sale, no partial stock effects.
    assert_eq!(count_rows(&state, "sales").await, 0);
    assert_eq!(count_rows(&state, "customers").await, 0);
    assert_eq!(product_stock(&state, a.id).await, 10.0);
    assert_eq!(product_stock(&state, b.id).await, 1.0);
}

#[tokio::test]
async fn free_text_line_autocreates_product_and_category() {
    let state = test_state().await;

    let response = submit_bill(
        &state,
        json!({
            "customer": { "name": "Asha", "phone": "222" },
            "items": { "0": { "product": "Maggi", "category": "Noodles", "qty": 3, "unitPrice": 15 } },
            "totalAmount": 45,
            "totalPaid": 45
        }),
    )
    .await;

    type ProductRow = (i64, String, f64, f64, f64, Option<i64>);
    let (id, code, marked, wholesale, stock, category_id): ProductRow = sqlx::query_as(
        "SELECT id, product_code, marked_price, wholesale_price, stock_qty, category_id
         FROM products WHERE name = 'Maggi'",
    )
    .fetch_one(&state.db_pool)
    .await
    .expect("auto-created product");

    assert!(code.starts_with("AUTO-"), "code: {code}");
    assert_eq!(marked, 15.0);
    assert_eq!(wholesale, 0.0);
    // Just-in-time stock entry: equals qty sold, not decremented further.
    assert_eq!(stock, 3.0);

    let (category_name,): (String,) =
        sqlx::query_as("SELECT name FROM categories WHERE id = $1")
            .bind(category_id.expect("category attached"))
            .fetch_one(&state.db_pool)
            .await
            .expect("auto-created category");
    assert_eq!(category_name, "Noodles");

    let Json(sale) = handlers::billing::print_bill(Path(response.sale_id), State(state.clone()))
        .await
        .expect("print bill");
    assert_eq!(sale.profit, 45.0);
    assert_eq!(sale.items[0].product_id, Some(id));

    // A repeat sale of the same name now matches case-insensitively and
    // decrements the jit stock.
    submit_bill(
        &state,
        json!({
            "customer": { "name": "Asha", "phone": "222" },
            "items": { "0": { "product": "maggi", "qty": 2, "unitPrice": 15 } },
            "totalAmount": 30,
            "totalPaid": 30
        }),
    )
    .await;
    assert_eq!(product_stock(&state, id).await, 1.0);
    assert_eq!(count_rows(&state, "customers").await, 1);
}

#[tokio::test]
async fn dangling_id_and_empty_lines_are_skipped() {
    let state = test_state().await;
    seed_product(&state, "P001", "Biscuits", None, 10.0, 6.0, 10.0).await;

    let response = submit_bill(
        &state,
        json!({
            "customer": { "name": "Ravi", "phone": "333" },
            "items": {
                "0": { "product": "", "qty": 2, "unitPrice": 5 },
                "1": { "product": "99999", "qty": 2, "unitPrice": 5 },
                "2": { "product": "Biscuits", "qty": 1, "unitPrice": 10 }
            },
            "totalAmount": 10,
            "totalPaid": 10
        }),
    )
    .await;

    let Json(sale) = handlers::billing::print_bill(Path(response.sale_id), State(state.clone()))
        .await
        .expect("print bill");
    assert_eq!(sale.items.len(), 1);
    assert_eq!(sale.items[0].name, "Biscuits");
}

#[tokio::test]
async fn mixed_payment_splits_into_cash_and_upi() {
    let state = test_state().await;
    seed_product(&state, "P001", "Biscuits", None, 10.0, 6.0, 10.0).await;

    let response = submit_bill(
        &state,
        json!({
            "customer": { "name": "Ravi", "phone": "444" },
            "items": { "0": { "product": "Biscuits", "qty": 2, "unitPrice": 10 } },
            "payments": { "0": { "method": "mixed", "cashAmount": "12", "upiAmount": "8" } },
            "totalAmount": 20,
            "totalPaid": 20
        }),
    )
    .await;

    let Json(sale) = handlers::billing::print_bill(Path(response.sale_id), State(state.clone()))
        .await
        .expect("print bill");
    assert_eq!(sale.payments.len(), 2);
    assert_eq!(sale.payments[0].method, "cash");
    assert_eq!(sale.payments[0].amount, 12.0);
    assert_eq!(sale.payments[1].method, "upi");
    assert_eq!(sale.payments[1].amount, 8.0);
}

#[tokio::test]
async fn bill_numbers_are_sequential() {
    let state = test_state().await;
    seed_product(&state, "P001", "Biscuits", None, 10.0, 6.0, 100.0).await;

    for expected in ["FC-00001", "FC-00002", "FC-00003"] {
        let response = submit_bill(
            &state,
            json!({
                "customer": { "name": "Ravi", "phone": "555" },
                "items": { "0": { "product": "Biscuits", "qty": 1, "unitPrice": 10 } },
                "totalAmount": 10,
                "totalPaid": 10
            }),
        )
        .await;
        assert_eq!(response.bill_number, expected);
    }
}

#[tokio::test]
async fn marked_price_backfilled_when_zero() {
    let state = test_state().await;
    let product = seed_product(&state, "P001", "Loose Rice", None, 0.0, 30.0, 50.0).await;

    submit_bill(
        &state,
        json!({
            "customer": { "name": "Ravi", "phone": "666" },
            "items": { "0": { "product": "Loose Rice", "qty": 2, "unitPrice": 42 } },
            "totalAmount": 84,
            "totalPaid": 84
        }),
    )
    .await;

    let (marked,): (f64,) = sqlx::query_as("SELECT marked_price FROM products WHERE id = $1")
        .bind(product.id)
        .fetch_one(&state.db_pool)
        .await
        .unwrap();
    assert_eq!(marked, 42.0);
}

#[tokio::test]
async fn void_restores_stock_and_removes_sale() {
    let state = test_state().await;
    let product = seed_product(&state, "P001", "Biscuits", None, 10.0, 6.0, 500.0).await;

    let response = submit_bill(
        &state,
        json!({
            "customer": { "name": "Ravi", "phone": "777" },
            "items": { "0": { "product": "Biscuits", "qty": 5, "unitPrice": 10 } },
            "totalAmount": 50,
            "totalPaid": 50
        }),
    )
    .await;
    assert_eq!(product_stock(&state, product.id).await, 495.0);

    let Json(redirect) = handlers::sales::void_sale(
        Path(response.sale_id),
        Query(RangeContext::default()),
        State(state.clone()),
    )
    .await
    .expect("void");
    assert_eq!(redirect.redirect, "/sales/today");

    assert_eq!(product_stock(&state, product.id).await, 500.0);
    assert_eq!(count_rows(&state, "sales").await, 0);
    assert_eq!(count_rows(&state, "sale_items").await, 0);
    assert_eq!(count_rows(&state, "payments").await, 0);

    let Json(today) = handlers::sales::today_sales(State(state.clone()))
        .await
        .expect("today");
    assert!(today.is_empty());
}

#[tokio::test]
async fn edit_replaces_items_and_totals_without_touching_stock() {
    let state = test_state().await;
    let product = seed_product(&state, "P001", "Biscuits", None, 10.0, 6.0, 500.0).await;

    let response = submit_bill(
        &state,
        json!({
            "customer": { "name": "Ravi", "phone": "888" },
            "items": { "0": { "product": "Biscuits", "qty": 5, "unitPrice": 10 } },
            "totalAmount": 50,
            "totalPaid": 50
        }),
    )
    .await;

    let req: UpdateBillRequest = serde_json::from_value(json!({
        "customer": { "name": "Ravi Kumar", "phone": "888", "address": "MG Road" },
        "items": {
            "0": {
                "product": product.id.to_string(),
                "name": "Biscuits",
                "qty": 8,
                "unitPrice": 9,
                "markedPriceAtSale": 10
            }
        },
        "discounts": { "globalPercent": 5, "additionalAmount": 2 },
        "totalAmount": 70,
        "totalPaid": 60,
        "view": "range",
        "from": "2024-01-01",
        "to": "2024-01-31"
    }))
    .unwrap();

    let Json(redirect) =
        handlers::billing::update_bill(Path(response.sale_id), State(state.clone()), Json(req))
            .await
            .expect("edit bill");
    assert_eq!(redirect.redirect, "/sales/range?from=2024-01-01&to=2024-01-31");

    // Inventory untouched by edits, even though quantities changed.
    assert_eq!(product_stock(&state, product.id).await, 495.0);

    let Json(sale) = handlers::billing::print_bill(Path(response.sale_id), State(state.clone()))
        .await
        .expect("print bill");
    assert_eq!(sale.items.len(), 1);
    assert_eq!(sale.items[0].qty, 8.0);
    assert_eq!(sale.items[0].unit_price, 9.0);
    assert_eq!(sale.total_amount, 70.0);
    assert_eq!(sale.total_paid, 60.0);
    assert_eq!(sale.discounts.global_percent, 5.0);
    assert_eq!(sale.customer.as_ref().map(|c| c.name.as_str()), Some("Ravi Kumar"));
    assert_eq!(sale.customer.as_ref().and_then(|c| c.address.as_deref()), Some("MG Road"));
}

#[tokio::test]
async fn edit_keeps_unsubmitted_customer_fields() {
    let state = test_state().await;
    seed_product(&state, "P001", "Biscuits", None, 10.0, 6.0, 100.0).await;

    let response = submit_bill(
        &state,
        json!({
            "customer": {
                "name": "Meera",
                "phone": "9990001111",
                "address": "MG Road",
                "dob": "1990-01-15"
            },
            "items": { "0": { "product": "Biscuits", "qty": 2, "unitPrice": 10 } },
            "totalAmount": 20,
            "totalPaid": 20
        }),
    )
    .await;

    // The edit form only carries name and phone; address and dob must
    // survive the update untouched.
    let req: UpdateBillRequest = serde_json::from_value(json!({
        "customer": { "name": "Meera S", "phone": "9990001111" },
        "items": {
            "0": {
                "product": "",
                "name": "Biscuits",
                "qty": 2,
                "unitPrice": 10,
                "markedPriceAtSale": 10
            }
        },
        "totalAmount": 20,
        "totalPaid": 20
    }))
    .unwrap();

    handlers::billing::update_bill(Path(response.sale_id), State(state.clone()), Json(req))
        .await
        .expect("edit bill");

    let Json(sale) = handlers::billing::print_bill(Path(response.sale_id), State(state.clone()))
        .await
        .expect("print bill");
    let customer = sale.customer.expect("customer attached");
    assert_eq!(customer.name, "Meera S");
    assert_eq!(customer.address.as_deref(), Some("MG Road"));
    assert_eq!(customer.dob, NaiveDate::from_ymd_opt(1990, 1, 15));
}

#[tokio::test]
async fn editing_missing_bill_is_not_found() {
    let state = test_state().await;
    let req: UpdateBillRequest = serde_json::from_value(json!({
        "items": {},
        "totalAmount": 0,
        "totalPaid": 0
    }))
    .unwrap();

    let result = handlers::billing::update_bill(Path(42), State(state.clone()), Json(req)).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}
