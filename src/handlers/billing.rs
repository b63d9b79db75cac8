// src/handlers/billing.rs
//
// The billing workflow. Create runs as one transaction: an abort on any
// line (insufficient stock) rolls back every earlier line's stock and
// auto-create effects along with it.
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{info, instrument};

use crate::billing::line_profit;
use crate::billing::numbers::format_bill_number;
use crate::billing::payments::{normalize_payments, NormalizedPayment};
use crate::billing::resolution::{
    product_ref, resolve_category, resolve_product, CategoryResolution, ProductRef,
    ProductResolution,
};
use crate::dtos::billing::{
    redirect_target, BillCustomer, CreateBillRequest, CreateBillResponse, RedirectResponse,
    UpdateBillRequest,
};
use crate::dtos::customer::CustomerResponse;
use crate::dtos::sale::SaleResponse;
use crate::error::{map_unique_violation, AppError};
use crate::models::customer::Customer;
use crate::models::product::Product;
use crate::models::sale::{Payment, Sale, SaleItem};
use crate::state::AppState;

/// Line snapshot accumulated during create, written out after the loop.
struct LineSnapshot {
    product_id: i64,
    name: String,
    qty: f64,
    unit_price: f64,
    marked_price_at_sale: f64,
}

// POST /billing - Create a bill from a submitted cart
#[instrument(skip(state, req))]
pub async fn create_bill(
    State(state): State<AppState>,
    Json(req): Json<CreateBillRequest>,
) -> Result<(StatusCode, Json<CreateBillResponse>), AppError> {
    let payments = normalize_payments(req.payments);

    let mut tx = state.db_pool.begin().await?;

    let mut total_profit = 0.0;
    let mut snapshots: Vec<LineSnapshot> = Vec::new();

    // Mapping-iteration order over the submitted keys; order carries no
    // meaning beyond determinism.
    for (offset, line) in req.items.values().enumerate() {
        let reference = product_ref(&line.product);
        let qty = line.qty;
        // Per-line synthetic-id base; the offset keeps AUTO codes unique
        // when one cart creates several products in the same millisecond.
        let now_millis = Utc::now().timestamp_millis() + offset as i64;

        let lookup = prefetch_product(&mut tx, &reference).await?;

        let category = match &reference {
            ProductRef::Name(_) if lookup.is_none() => {
                prefetch_category(&mut tx, line.category.as_deref(), now_millis).await?
            }
            _ => CategoryResolution::None,
        };

        let resolved = resolve_product(
            &reference,
            lookup,
            line.unit_price,
            qty,
            category,
            now_millis,
        );

        let (mut product, is_new) = match resolved {
            ProductResolution::Skip => continue,
            ProductResolution::Found(product) => (product, false),
            ProductResolution::CreateNew(new) => (apply_create(&mut tx, new).await?, true),
        };

        if !is_new {
            if qty > product.stock_qty {
                return Err(AppError::validation(format!(
                    "Not enough stock for {}",
                    product.name
                )));
            }
            product.stock_qty = (product.stock_qty - qty).max(0.0);
        }

        if product.marked_price == 0.0 && line.unit_price > 0.0 {
            product.marked_price = line.unit_price;
        }

        sqlx::query("UPDATE products SET stock_qty = $1, marked_price = $2 WHERE id = $3")
            .bind(product.stock_qty)
            .bind(product.marked_price)
            .bind(product.id)
            .execute(&mut *tx)
            .await?;

        total_profit += line_profit(line.unit_price, product.wholesale_price, qty);

        snapshots.push(LineSnapshot {
            product_id: product.id,
            name: product.name,
            qty,
            unit_price: line.unit_price,
            marked_price_at_sale: product.marked_price,
        });
    }

    let customer_id = resolve_customer(&mut tx, &req.customer).await?;

    // Atomic bill sequence; count-then-format collides under concurrency.
    let (seq,): (i64,) = sqlx::query_as(
        "INSERT INTO counters (name, value) VALUES ('bill_number', 1)
         ON CONFLICT(name) DO UPDATE SET value = value + 1
         RETURNING value",
    )
    .fetch_one(&mut *tx)
    .await?;
    let bill_number = format_bill_number(seq);

    let (sale_id,): (i64,) = sqlx::query_as(
        "INSERT INTO sales (bill_number, customer_id, global_percent, additional_amount,
                            total_amount, total_paid, profit, created_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
         RETURNING id",
    )
    .bind(&bill_number)
    .bind(customer_id)
    .bind(req.discounts.global_percent)
    .bind(req.discounts.additional_amount)
    .bind(req.total_amount)
    .bind(req.total_paid)
    .bind(total_profit)
    .bind(Utc::now())
    .fetch_one(&mut *tx)
    .await?;

    for snapshot in &snapshots {
        sqlx::query(
            "INSERT INTO sale_items (sale_id, product_id, name, qty, unit_price, marked_price_at_sale)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(sale_id)
        .bind(snapshot.product_id)
        .bind(&snapshot.name)
        .bind(snapshot.qty)
        .bind(snapshot.unit_price)
        .bind(snapshot.marked_price_at_sale)
        .execute(&mut *tx)
        .await?;
    }

    insert_payments(&mut tx, sale_id, &payments).await?;

    tx.commit().await?;

    state.dashboard_cache.refresh(&state.db_pool).await;

    info!(sale_id, %bill_number, lines = snapshots.len(), "Bill created");

    Ok((
        StatusCode::CREATED,
        Json(CreateBillResponse {
            sale_id,
            bill_number,
            redirect: format!("/billing/print/{sale_id}"),
        }),
    ))
}

// GET /billing/print/:id - Full bill for the print view
#[instrument(skip(state), fields(id))]
pub async fn print_bill(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<SaleResponse>, AppError> {
    fetch_sale_by_id(&state.db_pool, id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Bill not found"))
}

// PUT /billing/:id - Blunt-overwrite edit
//
// Replaces the item list and totals exactly as submitted. Deliberately no
// stock reconciliation against the original quantities, and profit stays
// whatever create computed; edits are manual corrections of the record.
#[instrument(skip(state, req), fields(id))]
pub async fn update_bill(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(req): Json<UpdateBillRequest>,
) -> Result<Json<RedirectResponse>, AppError> {
    let mut tx = state.db_pool.begin().await?;

    let sale = sqlx::query_as::<_, Sale>(
        "SELECT id, bill_number, customer_id, global_percent, additional_amount,
                total_amount, total_paid, profit, created_at
         FROM sales WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| AppError::not_found("Bill not found"))?;

    // Partial overwrite: fields absent from the payload keep their
    // stored values instead of being blanked out.
    if let (Some(customer_id), Some(customer)) = (sale.customer_id, &req.customer) {
        sqlx::query(
            "UPDATE customers SET
             name = COALESCE($1, name),
             phone = COALESCE($2, phone),
             address = COALESCE($3, address),
             dob = COALESCE($4, dob)
             WHERE id = $5",
        )
        .bind(&customer.name)
        .bind(&customer.phone)
        .bind(&customer.address)
        .bind(customer.dob)
        .bind(customer_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, "Customer phone already exists"))?;
    }

    sqlx::query("DELETE FROM sale_items WHERE sale_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    for item in req.items.values() {
        // Dangling or free-text product references are stored as NULL;
        // the snapshot fields carry the display data.
        let product_id = match item.product.as_deref().and_then(|p| p.trim().parse::<i64>().ok()) {
            Some(pid) => {
                let (exists,): (bool,) =
                    sqlx::query_as("SELECT EXISTS(SELECT 1 FROM products WHERE id = $1)")
                        .bind(pid)
                        .fetch_one(&mut *tx)
                        .await?;
                exists.then_some(pid)
            }
            None => None,
        };

        sqlx::query(
            "INSERT INTO sale_items (sale_id, product_id, name, qty, unit_price, marked_price_at_sale)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(id)
        .bind(product_id)
        .bind(&item.name)
        .bind(item.qty)
        .bind(item.unit_price)
        .bind(item.marked_price_at_sale)
        .execute(&mut *tx)
        .await?;
    }

    sqlx::query(
        "UPDATE sales SET global_percent = $1, additional_amount = $2,
                          total_amount = $3, total_paid = $4
         WHERE id = $5",
    )
    .bind(req.discounts.global_percent)
    .bind(req.discounts.additional_amount)
    .bind(req.total_amount)
    .bind(req.total_paid)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(Json(RedirectResponse {
        redirect: redirect_target(req.view.as_deref(), req.from, req.to),
    }))
}

async fn prefetch_product(
    tx: &mut Transaction<'_, Sqlite>,
    reference: &ProductRef,
) -> Result<Option<Product>, AppError> {
    let product = match reference {
        ProductRef::Id(id) => {
            sqlx::query_as::<_, Product>(
                "SELECT id, product_code, name, category_id, marked_price, wholesale_price,
                        stock_qty, created_at
                 FROM products WHERE id = $1",
            )
            .bind(*id)
            .fetch_optional(&mut **tx)
            .await?
        }
        ProductRef::Name(name) => {
            sqlx::query_as::<_, Product>(
                "SELECT id, product_code, name, category_id, marked_price, wholesale_price,
                        stock_qty, created_at
                 FROM products WHERE LOWER(name) = LOWER($1)",
            )
            .bind(name.as_str())
            .fetch_optional(&mut **tx)
            .await?
        }
        ProductRef::Empty => None,
    };

    Ok(product)
}

async fn prefetch_category(
    tx: &mut Transaction<'_, Sqlite>,
    raw: Option<&str>,
    now_millis: i64,
) -> Result<CategoryResolution, AppError> {
    let by_name = match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(name) if name.parse::<i64>().is_err() => {
            sqlx::query_as::<_, (i64,)>("SELECT id FROM categories WHERE LOWER(name) = LOWER($1)")
                .bind(name)
                .fetch_optional(&mut **tx)
                .await?
                .map(|(id,)| id)
        }
        _ => None,
    };

    Ok(resolve_category(raw, by_name, now_millis))
}

/// Applies a CreateNew decision: auto-creates the category when asked,
/// then the just-in-time product row.
async fn apply_create(
    tx: &mut Transaction<'_, Sqlite>,
    new: crate::billing::resolution::NewProduct,
) -> Result<Product, AppError> {
    let category_id = match new.category {
        CategoryResolution::Existing(id) => Some(id),
        CategoryResolution::CreateNew { name, code } => {
            let (id,): (i64,) = sqlx::query_as(
                "INSERT INTO categories (name, code, created_at) VALUES ($1, $2, $3) RETURNING id",
            )
            .bind(name)
            .bind(code)
            .bind(Utc::now())
            .fetch_one(&mut **tx)
            .await?;
            Some(id)
        }
        CategoryResolution::None => None,
    };

    let product = sqlx::query_as::<_, Product>(
        "INSERT INTO products (product_code, name, category_id, marked_price, wholesale_price,
                               stock_qty, created_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         RETURNING id, product_code, name, category_id, marked_price, wholesale_price,
                   stock_qty, created_at",
    )
    .bind(&new.product_code)
    .bind(&new.name)
    .bind(category_id)
    .bind(new.marked_price)
    .bind(new.wholesale_price)
    .bind(new.stock_qty)
    .bind(Utc::now())
    .fetch_one(&mut **tx)
    .await?;

    Ok(product)
}

/// Exact phone match wins; anything else creates a new customer record.
async fn resolve_customer(
    tx: &mut Transaction<'_, Sqlite>,
    customer: &BillCustomer,
) -> Result<i64, AppError> {
    if !customer.phone.is_empty() {
        let existing = sqlx::query_as::<_, (i64,)>("SELECT id FROM customers WHERE phone = $1")
            .bind(&customer.phone)
            .fetch_optional(&mut **tx)
            .await?;
        if let Some((id,)) = existing {
            return Ok(id);
        }
    }

    let (id,): (i64,) = sqlx::query_as(
        "INSERT INTO customers (name, phone, address, dob, created_at)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING id",
    )
    .bind(&customer.name)
    .bind(&customer.phone)
    .bind(&customer.address)
    .bind(customer.dob)
    .bind(Utc::now())
    .fetch_one(&mut **tx)
    .await
    .map_err(|e| map_unique_violation(e, "Customer phone already exists"))?;

    Ok(id)
}

async fn insert_payments(
    tx: &mut Transaction<'_, Sqlite>,
    sale_id: i64,
    payments: &[NormalizedPayment],
) -> Result<(), AppError> {
    for payment in payments {
        sqlx::query("INSERT INTO payments (sale_id, method, amount) VALUES ($1, $2, $3)")
            .bind(sale_id)
            .bind(&payment.method)
            .bind(payment.amount)
            .execute(&mut **tx)
            .await?;
    }
    Ok(())
}

/// Assembles the full bill: header, populated customer, items, payments.
pub async fn fetch_sale_by_id(
    pool: &SqlitePool,
    id: i64,
) -> Result<Option<SaleResponse>, AppError> {
    let Some(sale) = sqlx::query_as::<_, Sale>(
        "SELECT id, bill_number, customer_id, global_percent, additional_amount,
                total_amount, total_paid, profit, created_at
         FROM sales WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    else {
        return Ok(None);
    };

    Ok(Some(assemble_sale(pool, sale).await?))
}

pub async fn assemble_sale(pool: &SqlitePool, sale: Sale) -> Result<SaleResponse, AppError> {
    let customer = match sale.customer_id {
        Some(customer_id) => sqlx::query_as::<_, Customer>(
            "SELECT id, name, phone, address, dob, created_at FROM customers WHERE id = $1",
        )
        .bind(customer_id)
        .fetch_optional(pool)
        .await?
        .map(CustomerResponse::from),
        None => None,
    };

    let items = sqlx::query_as::<_, SaleItem>(
        "SELECT id, sale_id, product_id, name, qty, unit_price, marked_price_at_sale
         FROM sale_items WHERE sale_id = $1 ORDER BY id",
    )
    .bind(sale.id)
    .fetch_all(pool)
    .await?;

    let payments = sqlx::query_as::<_, Payment>(
        "SELECT id, sale_id, method, amount FROM payments WHERE sale_id = $1 ORDER BY id",
    )
    .bind(sale.id)
    .fetch_all(pool)
    .await?;

    Ok(SaleResponse::assemble(sale, customer, items, payments))
}
