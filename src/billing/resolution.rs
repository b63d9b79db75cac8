// src/billing/resolution.rs
//
// Pure resolution of a submitted bill line against the catalog. The
// handler prefetches the candidate rows, these functions make the
// decision, and the handler applies it in exactly one place.
use crate::models::product::Product;

/// How the client referred to a product on a bill line.
#[derive(Debug, Clone, PartialEq)]
pub enum ProductRef {
    /// A store-generated row id.
    Id(i64),
    /// Free-text name, matched case-insensitively.
    Name(String),
    Empty,
}

pub fn product_ref(raw: &str) -> ProductRef {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return ProductRef::Empty;
    }
    match trimmed.parse::<i64>() {
        Ok(id) => ProductRef::Id(id),
        Err(_) => ProductRef::Name(trimmed.to_string()),
    }
}

/// Category to attach to an auto-created product.
#[derive(Debug, Clone, PartialEq)]
pub enum CategoryResolution {
    Existing(i64),
    CreateNew { name: String, code: String },
    None,
}

/// Resolves the category field of a bill line. `by_name` is the id of an
/// existing category whose name matched case-insensitively, prefetched by
/// the caller when the field is non-numeric.
pub fn resolve_category(
    raw: Option<&str>,
    by_name: Option<i64>,
    now_millis: i64,
) -> CategoryResolution {
    let Some(trimmed) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return CategoryResolution::None;
    };
    if let Ok(id) = trimmed.parse::<i64>() {
        return CategoryResolution::Existing(id);
    }
    match by_name {
        Some(id) => CategoryResolution::Existing(id),
        None => CategoryResolution::CreateNew {
            name: trimmed.to_string(),
            code: now_millis.to_string(),
        },
    }
}

/// Fields of a product to be auto-created for an unrecognized name.
/// Initial stock equals the quantity being sold: a just-in-time stock
/// entry, not a real decrement.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub product_code: String,
    pub name: String,
    pub category: CategoryResolution,
    pub marked_price: f64,
    pub wholesale_price: f64,
    pub stock_qty: f64,
}

#[derive(Debug)]
pub enum ProductResolution {
    Found(Product),
    CreateNew(NewProduct),
    /// Dangling id or empty reference; the line is dropped silently.
    Skip,
}

/// Decides what to do with one bill line. `lookup` is the row prefetched
/// for the reference: by id for `ProductRef::Id`, by case-insensitive
/// exact name for `ProductRef::Name`.
pub fn resolve_product(
    reference: &ProductRef,
    lookup: Option<Product>,
    unit_price: f64,
    qty: f64,
    category: CategoryResolution,
    now_millis: i64,
) -> ProductResolution {
    match reference {
        ProductRef::Empty => ProductResolution::Skip,
        ProductRef::Id(_) => match lookup {
            Some(product) => ProductResolution::Found(product),
            None => ProductResolution::Skip,
        },
        ProductRef::Name(name) => match lookup {
            Some(product) => ProductResolution::Found(product),
            None => ProductResolution::CreateNew(NewProduct {
                product_code: format!("AUTO-{now_millis}"),
                name: name.clone(),
                category,
                marked_price: unit_price,
                wholesale_price: 0.0,
                stock_qty: qty,
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn product(id: i64, name: &str) -> Product {
        Product {
            id,
            product_code: format!("P{id:03}"),
            name: name.to_string(),
            category_id: None,
            marked_price: 10.0,
            wholesale_price: 6.0,
            stock_qty: 100.0,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn parses_product_references() {
        assert_eq!(product_ref("42"), ProductRef::Id(42));
        assert_eq!(product_ref(" Parle-G "), ProductRef::Name("Parle-G".to_string()));
        assert_eq!(product_ref("   "), ProductRef::Empty);
    }

    #[test]
    fn id_reference_with_row_is_found() {
        let resolved = resolve_product(
            &ProductRef::Id(7),
            Some(product(7, "Parle-G")),
            10.0,
            5.0,
            CategoryResolution::None,
            1_700_000_000_000,
        );
        assert!(matches!(resolved, ProductResolution::Found(p) if p.id == 7));
    }

    #[test]
    fn dangling_id_is_skipped() {
        let resolved = resolve_product(
            &ProductRef::Id(7),
            None,
            10.0,
            5.0,
            CategoryResolution::None,
            1_700_000_000_000,
        );
        assert!(matches!(resolved, ProductResolution::Skip));
    }

    #[test]
    fn unmatched_name_creates_jit_product() {
        let resolved = resolve_product(
            &ProductRef::Name("Lays Classic".to_string()),
            None,
            20.0,
            3.0,
            CategoryResolution::Existing(2),
            1_700_000_000_000,
        );
        match resolved {
            ProductResolution::CreateNew(new) => {
                assert_eq!(new.product_code, "AUTO-1700000000000");
                assert_eq!(new.name, "Lays Classic");
                assert_eq!(new.marked_price, 20.0);
                assert_eq!(new.wholesale_price, 0.0);
                assert_eq!(new.stock_qty, 3.0);
                assert_eq!(new.category, CategoryResolution::Existing(2));
            }
            other => panic!("expected CreateNew, got {other:?}"),
        }
    }

    #[test]
    fn category_resolution_rules() {
        assert_eq!(resolve_category(None, None, 1), CategoryResolution::None);
        assert_eq!(resolve_category(Some("  "), None, 1), CategoryResolution::None);
        assert_eq!(
            resolve_category(Some("12"), None, 1),
            CategoryResolution::Existing(12)
        );
        assert_eq!(
            resolve_category(Some("Snacks"), Some(3), 1),
            CategoryResolution::Existing(3)
        );
        assert_eq!(
            resolve_category(Some("Snacks"), None, 1_700_000_000_000),
            CategoryResolution::CreateNew {
                name: "Snacks".to_string(),
                code: "1700000000000".to_string(),
            }
        );
    }
}
