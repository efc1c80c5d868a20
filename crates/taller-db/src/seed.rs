//! # Demo Catalogue
//!
//! A few shop products so a fresh install has something on the shelves.
//! Inserted only into an empty products table.

use tracing::info;

use crate::error::DbResult;
use crate::pool::Database;
use taller_core::{Money, NewProduct};

/// (name, category, description, sku, stock, min_stock, buy cents, sell cents)
const DEMO_PRODUCTS: &[(&str, &str, &str, &str, i64, i64, i64, i64)] = &[
    (
        "Aceite Sintético 5W-30",
        "Aceites",
        "Galón de aceite premium",
        "OIL-5W30",
        12,
        5,
        2500,
        4500,
    ),
    (
        "Filtro de Aceite Universal",
        "Filtros",
        "Filtro para motores de 4 cilindros",
        "FIL-UNI",
        3,
        10,
        350,
        800,
    ),
    (
        "Pastillas de Freno Delanteras",
        "Frenos",
        "Juego de pastillas cerámicas",
        "BRK-FRONT",
        8,
        4,
        1500,
        3500,
    ),
    (
        "Líquido de Frenos DOT4",
        "Líquidos",
        "Botella de 500ml",
        "LIQ-DOT4",
        20,
        5,
        400,
        1000,
    ),
];

/// The demo catalogue as create requests.
pub fn demo_products() -> Vec<NewProduct> {
    DEMO_PRODUCTS
        .iter()
        .map(
            |&(name, category, description, sku, stock, min_stock, buy, sell)| NewProduct {
                name: name.to_string(),
                category: category.to_string(),
                description: Some(description.to_string()),
                sku: Some(sku.to_string()),
                stock,
                min_stock,
                price_buy: Money::from_cents(buy),
                price_sell: Money::from_cents(sell),
            },
        )
        .collect()
}

/// Inserts the demo catalogue when no products exist.
///
/// ## Returns
/// How many products were inserted (0 when the table already had rows).
pub async fn seed_demo_products(db: &Database) -> DbResult<usize> {
    let existing = db.products().count().await?;
    if existing > 0 {
        info!(existing, "Products present, skipping demo seed");
        return Ok(0);
    }

    let products = demo_products();
    for product in &products {
        db.products().insert(product).await?;
    }

    info!(count = products.len(), "Seeded demo products");
    Ok(products.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DbConfig;
    use taller_core::validation::validate_new_product;

    #[test]
    fn test_demo_products_are_valid() {
        for product in demo_products() {
            assert!(validate_new_product(&product).is_ok(), "{}", product.name);
        }
    }

    #[tokio::test]
    async fn test_seed_only_once() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        assert_eq!(seed_demo_products(&db).await.unwrap(), 4);
        assert_eq!(seed_demo_products(&db).await.unwrap(), 0);
        assert_eq!(db.products().count().await.unwrap(), 4);

        // The filter starts below its threshold
        assert_eq!(db.stats().low_stock_count().await.unwrap(), 1);
    }
}
