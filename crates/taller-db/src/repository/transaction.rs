//! # Transaction Repository
//!
//! Persists sales and purchases and reads the history back.
//!
//! ## Atomic Unit
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  create(draft, policy)                                                  │
//! │                                                                         │
//! │  BEGIN                                                                 │
//! │   ├── INSERT transactions (header, stored total)                       │
//! │   ├── for each line, in submitted order:                               │
//! │   │     ├── INSERT transaction_items                                   │
//! │   │     └── product line?  UPDATE products SET stock = stock + delta   │
//! │   │                          ├── applied         → continue            │
//! │   │                          ├── product missing → warn, continue      │
//! │   │                          ├── out of range    → error ──┤           │
//! │   │                          └── floor refused   → error ──┤           │
//! │   │                                                        │           │
//! │  COMMIT  ◄── every step succeeded                          │           │
//! │  ROLLBACK ◄── any error (sqlx::Transaction dropped) ◄──────┘           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{SubsecRound, Utc};
use sqlx::SqlitePool;
use std::collections::HashMap;
use tracing::{debug, info, warn};

use super::product::{ProductRepository, StockAdjustment};
use super::to_db_timestamp;
use crate::error::{DbError, DbResult};
use taller_core::{StockPolicy, Transaction, TransactionDraft, TransactionItem, TransactionWithItems};

/// Repository for transaction database operations.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    pool: SqlitePool,
}

impl TransactionRepository {
    /// Creates a new TransactionRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TransactionRepository { pool }
    }

    /// Writes the header, its items and the stock adjustments as one unit.
    ///
    /// Either everything commits or nothing does: any error returns early,
    /// dropping the open `sqlx::Transaction`, which rolls it back.
    pub async fn create(
        &self,
        draft: &TransactionDraft,
        policy: StockPolicy,
    ) -> DbResult<TransactionWithItems> {
        let date = Utc::now().trunc_subsecs(6);

        let mut tx = self.pool.begin().await?;

        let transaction_id = sqlx::query(
            r#"
            INSERT INTO transactions (
                customer_name, type, date, total_cents, payment_status, notes
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&draft.customer_name)
        .bind(draft.kind)
        .bind(to_db_timestamp(date))
        .bind(draft.total)
        .bind(draft.payment_status)
        .bind(&draft.notes)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        debug!(transaction_id, lines = draft.lines.len(), "Transaction header inserted");

        let mut items = Vec::with_capacity(draft.lines.len());

        for (index, line) in draft.lines.iter().enumerate() {
            let item_id = sqlx::query(
                r#"
                INSERT INTO transaction_items (
                    transaction_id, product_id, description, quantity,
                    unit_price_cents, subtotal_cents, is_service
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
            )
            .bind(transaction_id)
            .bind(line.product_id)
            .bind(&line.description)
            .bind(line.quantity)
            .bind(line.unit_price)
            .bind(line.subtotal)
            .bind(line.is_service)
            .execute(&mut *tx)
            .await?
            .last_insert_rowid();

            if let Some(product_id) = line.product_id.filter(|_| line.affects_stock()) {
                let delta = draft.kind.stock_delta(line.quantity);
                let outcome =
                    ProductRepository::adjust_stock(&mut *tx, product_id, delta, policy).await?;

                match outcome {
                    StockAdjustment::Applied { .. } => {}
                    StockAdjustment::ProductMissing => {
                        // Items for deleted products are still recorded
                        warn!(
                            transaction_id,
                            product_id,
                            delta,
                            "Product not found, stock adjustment skipped"
                        );
                    }
                    StockAdjustment::OutOfRange { stock } => {
                        warn!(product_id, stock, delta, "Stock adjustment out of range");
                        return Err(DbError::StockOutOfRange {
                            product_id,
                            line: index,
                        });
                    }
                }
            }

            items.push(TransactionItem {
                id: item_id,
                transaction_id,
                product_id: line.product_id,
                description: line.description.clone(),
                quantity: line.quantity,
                unit_price: line.unit_price,
                subtotal: line.subtotal,
                is_service: line.is_service,
            });
        }

        tx.commit().await?;

        info!(
            transaction_id,
            kind = %draft.kind,
            total = %draft.total,
            items = items.len(),
            "Transaction committed"
        );

        Ok(TransactionWithItems {
            transaction: Transaction {
                id: transaction_id,
                customer_name: draft.customer_name.clone(),
                kind: draft.kind,
                date,
                total_amount: draft.total,
                payment_status: draft.payment_status,
                notes: draft.notes.clone(),
            },
            items,
        })
    }

    /// Gets a transaction header by id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Transaction>> {
        let transaction = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT
                id, customer_name, type AS kind, date,
                total_cents AS total_amount, payment_status, notes
            FROM transactions
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(transaction)
    }

    /// Items of one transaction, in the order they were submitted.
    pub async fn items_for(&self, transaction_id: i64) -> DbResult<Vec<TransactionItem>> {
        let items = sqlx::query_as::<_, TransactionItem>(
            r#"
            SELECT
                id, transaction_id, product_id, description, quantity,
                unit_price_cents AS unit_price,
                subtotal_cents AS subtotal,
                is_service
            FROM transaction_items
            WHERE transaction_id = ?1
            ORDER BY id
            "#,
        )
        .bind(transaction_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Full history, newest first, each transaction with its items inlined.
    ///
    /// Two queries regardless of history length: headers, then every item
    /// grouped in memory.
    pub async fn list_with_items(&self) -> DbResult<Vec<TransactionWithItems>> {
        let transactions = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT
                id, customer_name, type AS kind, date,
                total_cents AS total_amount, payment_status, notes
            FROM transactions
            ORDER BY date DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let items = sqlx::query_as::<_, TransactionItem>(
            r#"
            SELECT
                id, transaction_id, product_id, description, quantity,
                unit_price_cents AS unit_price,
                subtotal_cents AS subtotal,
                is_service
            FROM transaction_items
            ORDER BY transaction_id, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut by_transaction: HashMap<i64, Vec<TransactionItem>> = HashMap::new();
        for item in items {
            by_transaction.entry(item.transaction_id).or_default().push(item);
        }

        let history: Vec<TransactionWithItems> = transactions
            .into_iter()
            .map(|transaction| TransactionWithItems {
                items: by_transaction.remove(&transaction.id).unwrap_or_default(),
                transaction,
            })
            .collect();

        debug!(count = history.len(), "Listed transactions");
        Ok(history)
    }

    /// Counts recorded transactions.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM transactions")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use taller_core::{
        Money, NewProduct, NewTransaction, NewTransactionItem, PaymentStatus, TransactionType,
    };

    async fn setup() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn insert_product(db: &Database, name: &str, stock: i64) -> i64 {
        db.products()
            .insert(&NewProduct {
                name: name.to_string(),
                category: "Filtros".to_string(),
                description: None,
                sku: None,
                stock,
                min_stock: 10,
                price_buy: Money::from_cents(350),
                price_sell: Money::from_cents(800),
            })
            .await
            .unwrap()
            .id
    }

    fn line(product_id: Option<i64>, quantity: i64, cents: i64) -> NewTransactionItem {
        NewTransactionItem {
            product_id,
            description: "Filtro".to_string(),
            quantity,
            unit_price: Money::from_cents(cents),
            is_service: false,
        }
    }

    fn draft(kind: TransactionType, items: Vec<NewTransactionItem>) -> TransactionDraft {
        TransactionDraft::prepare(&NewTransaction {
            customer_name: None,
            kind,
            payment_status: None,
            notes: None,
            items,
        })
        .unwrap()
    }

    async fn stock_of(db: &Database, id: i64) -> i64 {
        db.products().get_by_id(id).await.unwrap().unwrap().stock
    }

    #[tokio::test]
    async fn test_create_persists_header_items_and_stock() {
        let db = setup().await;
        let filtro = insert_product(&db, "Filtro", 3).await;
        let repo = db.transactions();

        let created = repo
            .create(
                &draft(TransactionType::Sale, vec![line(Some(filtro), 2, 800)]),
                StockPolicy::AllowNegative,
            )
            .await
            .unwrap();

        assert_eq!(created.transaction.total_amount, Money::from_cents(1600));
        assert_eq!(created.items[0].subtotal, Money::from_cents(1600));
        assert_eq!(stock_of(&db, filtro).await, 1);

        let stored = repo.get_by_id(created.transaction.id).await.unwrap().unwrap();
        assert_eq!(stored, created.transaction);
        assert_eq!(stored.payment_status, PaymentStatus::Paid);

        let items = repo.items_for(stored.id).await.unwrap();
        assert_eq!(items, created.items);
    }

    #[tokio::test]
    async fn test_missing_product_is_skipped_not_fatal() {
        let db = setup().await;
        let filtro = insert_product(&db, "Filtro", 3).await;

        let created = db
            .transactions()
            .create(
                &draft(
                    TransactionType::Sale,
                    vec![line(Some(9999), 1, 100), line(Some(filtro), 1, 800)],
                ),
                StockPolicy::RejectNegative,
            )
            .await
            .unwrap();

        assert_eq!(created.items.len(), 2);
        assert_eq!(created.items[0].product_id, Some(9999));
        assert_eq!(stock_of(&db, filtro).await, 2);
    }

    #[tokio::test]
    async fn test_rejected_line_rolls_back_everything() {
        let db = setup().await;
        let aceite = insert_product(&db, "Aceite", 12).await;
        let filtro = insert_product(&db, "Filtro", 1).await;
        let repo = db.transactions();

        let result = repo
            .create(
                &draft(
                    TransactionType::Sale,
                    vec![line(Some(aceite), 2, 4500), line(Some(filtro), 5, 800)],
                ),
                StockPolicy::RejectNegative,
            )
            .await;

        assert!(matches!(
            result,
            Err(DbError::InsufficientStock { available: 1, requested: 5, .. })
        ));
        assert_eq!(stock_of(&db, aceite).await, 12);
        assert_eq!(stock_of(&db, filtro).await, 1);
        assert_eq!(repo.count().await.unwrap(), 0);

        let orphans: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM transaction_items")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(orphans, 0);
    }

    #[tokio::test]
    async fn test_history_newest_first_with_items() {
        let db = setup().await;
        let filtro = insert_product(&db, "Filtro", 10).await;
        let repo = db.transactions();

        let first = repo
            .create(
                &draft(TransactionType::Purchase, vec![line(Some(filtro), 5, 350)]),
                StockPolicy::AllowNegative,
            )
            .await
            .unwrap();
        let second = repo
            .create(
                &draft(
                    TransactionType::Sale,
                    vec![line(Some(filtro), 1, 800), line(None, 1, 2000)],
                ),
                StockPolicy::AllowNegative,
            )
            .await
            .unwrap();

        let history = repo.list_with_items().await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].transaction.id, second.transaction.id);
        assert_eq!(history[1].transaction.id, first.transaction.id);
        assert_eq!(history[0].items.len(), 2);
        assert_eq!(history[1].items.len(), 1);
        assert_eq!(history[0].items[1].product_id, None);
        assert_eq!(stock_of(&db, filtro).await, 14);
    }
}
