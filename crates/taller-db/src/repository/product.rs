//! # Product Repository
//!
//! The product ledger: the authoritative store of products and their stock.
//!
//! ## Key Operations
//! - Filtered listing (search, category, low stock)
//! - CRUD operations
//! - [`ProductRepository::adjust_stock`], the composable stock primitive
//!
//! ## Stock Adjustment
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │              Why one UPDATE and not SELECT-then-UPDATE                  │
//! │                                                                         │
//! │  Read-then-write (lost update):                                        │
//! │    Sale A: SELECT stock → 1                                            │
//! │    Sale B: SELECT stock → 1                                            │
//! │    Sale A: UPDATE stock = 0                                            │
//! │    Sale B: UPDATE stock = 0     ← one sale vanished from the ledger    │
//! │                                                                         │
//! │  Single statement (this module):                                       │
//! │    Sale A: UPDATE stock = stock - 1  → 0                               │
//! │    Sale B: UPDATE stock = stock - 1  → -1  (or refused, see policy)    │
//! │                                                                         │
//! │  SQLite serializes writers, and the delta is applied to whatever the   │
//! │  row holds at that instant.                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use taller_core::{NewProduct, Product, ProductFilter, ProductUpdate, StockPolicy};

/// Outcome of a stock adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockAdjustment {
    /// The delta was applied; carries the resulting stock.
    Applied { new_stock: i64 },
    /// No product with that id. Nothing was written.
    ProductMissing,
    /// The delta would take stock outside the 64-bit range. Nothing was written.
    OutOfRange { stock: i64 },
}

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// let low = repo
///     .list(&ProductFilter { low_stock: true, ..Default::default() })
///     .await?;
///
/// let product = repo.get_by_id(7).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists products ordered by name.
    ///
    /// ## Filters
    /// - `search`: substring of name, SKU or description (ASCII case-insensitive)
    /// - `category`: exact match
    /// - `low_stock`: only `stock <= min_stock`
    pub async fn list(&self, filter: &ProductFilter) -> DbResult<Vec<Product>> {
        let pattern = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(like_pattern);

        let category = filter
            .category
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        debug!(
            search = ?pattern,
            category = ?category,
            low_stock = filter.low_stock,
            "Listing products"
        );

        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT
                id, name, category, description, sku, stock, min_stock,
                price_buy_cents AS price_buy,
                price_sell_cents AS price_sell
            FROM products
            WHERE (?1 IS NULL
                   OR name LIKE ?1 ESCAPE '\'
                   OR sku LIKE ?1 ESCAPE '\'
                   OR description LIKE ?1 ESCAPE '\')
              AND (?2 IS NULL OR category = ?2)
              AND (?3 = 0 OR stock <= min_stock)
            ORDER BY name, id
            "#,
        )
        .bind(pattern)
        .bind(category)
        .bind(filter.low_stock)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = products.len(), "Listed products");
        Ok(products)
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT
                id, name, category, description, sku, stock, min_stock,
                price_buy_cents AS price_buy,
                price_sell_cents AS price_sell
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Inserts a new product and returns it with its assigned id.
    ///
    /// Blank description or SKU is stored as NULL.
    pub async fn insert(&self, product: &NewProduct) -> DbResult<Product> {
        let name = product.name.trim().to_string();
        let category = product.category.trim().to_string();
        let description = non_blank(product.description.as_deref());
        let sku = non_blank(product.sku.as_deref());

        debug!(name = %name, category = %category, "Inserting product");

        let id = sqlx::query(
            r#"
            INSERT INTO products (
                name, category, description, sku, stock, min_stock,
                price_buy_cents, price_sell_cents
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&name)
        .bind(&category)
        .bind(&description)
        .bind(&sku)
        .bind(product.stock)
        .bind(product.min_stock)
        .bind(product.price_buy)
        .bind(product.price_sell)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        Ok(Product {
            id,
            name,
            category,
            description,
            sku,
            stock: product.stock,
            min_stock: product.min_stock,
            price_buy: product.price_buy,
            price_sell: product.price_sell,
        })
    }

    /// Applies a partial update and returns the stored result.
    ///
    /// Runs as one statement: fields absent from the update keep whatever the
    /// row holds at write time, so a stock adjustment committed between the
    /// client's read and this write is not overwritten.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Updated product
    /// * `Ok(None)` - No product with that id
    pub async fn update(&self, id: i64, update: &ProductUpdate) -> DbResult<Option<Product>> {
        debug!(id = id, "Updating product");

        let description = update.description.as_ref().map(|d| non_blank(d.as_deref()));
        let sku = update.sku.as_ref().map(|s| non_blank(s.as_deref()));

        let product = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET
                name             = COALESCE(?2, name),
                category         = COALESCE(?3, category),
                description      = CASE WHEN ?4 THEN ?5 ELSE description END,
                sku              = CASE WHEN ?6 THEN ?7 ELSE sku END,
                stock            = COALESCE(?8, stock),
                min_stock        = COALESCE(?9, min_stock),
                price_buy_cents  = COALESCE(?10, price_buy_cents),
                price_sell_cents = COALESCE(?11, price_sell_cents)
            WHERE id = ?1
            RETURNING
                id, name, category, description, sku, stock, min_stock,
                price_buy_cents AS price_buy,
                price_sell_cents AS price_sell
            "#,
        )
        .bind(id)
        .bind(update.name.as_deref().map(str::trim))
        .bind(update.category.as_deref().map(str::trim))
        .bind(description.is_some())
        .bind(description.flatten())
        .bind(sku.is_some())
        .bind(sku.flatten())
        .bind(update.stock)
        .bind(update.min_stock)
        .bind(update.price_buy)
        .bind(update.price_sell)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Deletes a product. Transaction items that reference it keep their
    /// copied description and prices.
    ///
    /// ## Returns
    /// `true` if a row was removed.
    pub async fn delete(&self, id: i64) -> DbResult<bool> {
        debug!(id = id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts total products.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Applies a signed stock delta inside the caller's unit of work.
    ///
    /// Takes a connection rather than the pool so it composes with an open
    /// SQL transaction (`&mut *tx`).
    ///
    /// ## Policy
    /// ```text
    /// ┌──────────────────┬─────────────────────────────────────────────────┐
    /// │ AllowNegative    │ stock = stock + delta, always                   │
    /// │ RejectNegative   │ increments always apply; a decrement that would │
    /// │                  │ end below zero → DbError::InsufficientStock     │
    /// └──────────────────┴─────────────────────────────────────────────────┘
    /// ```
    /// Under either policy a delta that would overflow the column leaves the
    /// row untouched and reports [`StockAdjustment::OutOfRange`]; SQLite would
    /// otherwise silently promote the value to REAL.
    ///
    /// The checks and the write are the same statement, so two concurrent
    /// decrements can never both pass the check on the same stale value.
    pub async fn adjust_stock(
        conn: &mut SqliteConnection,
        product_id: i64,
        delta: i64,
        policy: StockPolicy,
    ) -> DbResult<StockAdjustment> {
        let sql = match policy {
            StockPolicy::AllowNegative => {
                "UPDATE products SET stock = stock + ?2 \
                 WHERE id = ?1 \
                 AND (?2 <= 0 OR stock <= ?3 - ?2) \
                 AND (?2 >= 0 OR stock >= ?4 - ?2) \
                 RETURNING stock"
            }
            StockPolicy::RejectNegative => {
                "UPDATE products SET stock = stock + ?2 \
                 WHERE id = ?1 \
                 AND (?2 <= 0 OR stock <= ?3 - ?2) \
                 AND (?2 >= 0 OR stock >= ?4 - ?2) \
                 AND (?2 >= 0 OR stock + ?2 >= 0) \
                 RETURNING stock"
            }
        };

        let new_stock: Option<i64> = sqlx::query_scalar(sql)
            .bind(product_id)
            .bind(delta)
            .bind(i64::MAX)
            .bind(i64::MIN)
            .fetch_optional(&mut *conn)
            .await?;

        if let Some(new_stock) = new_stock {
            debug!(product_id, delta, new_stock, "Stock adjusted");
            return Ok(StockAdjustment::Applied { new_stock });
        }

        // Nothing updated: the product is gone, the value would overflow, or the floor held
        let available: Option<i64> = sqlx::query_scalar("SELECT stock FROM products WHERE id = ?1")
            .bind(product_id)
            .fetch_optional(&mut *conn)
            .await?;

        match available {
            None => Ok(StockAdjustment::ProductMissing),
            Some(stock) if stock.checked_add(delta).is_none() => {
                Ok(StockAdjustment::OutOfRange { stock })
            }
            Some(available) => Err(DbError::InsufficientStock {
                product_id,
                available,
                requested: delta.saturating_neg(),
            }),
        }
    }
}

/// `abc` → `%abc%`, with LIKE wildcards in the input escaped.
fn like_pattern(search: &str) -> String {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for c in search.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

// =============================================================================
// Unit Tests
// =============================================================================
