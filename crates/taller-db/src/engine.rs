//! # Transaction Engine
//!
//! Entry point for recording a sale or purchase.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  create_transaction(request)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  TransactionDraft::prepare(request)        taller-core, no I/O         │
//! │       │  └── invalid → EngineError::Validation (nothing written)       │
//! │       ▼                                                                 │
//! │  TransactionRepository::create(draft, policy)   one SQL transaction    │
//! │       │  ├── floor refused → EngineError::InsufficientStock (rollback) │
//! │       │  └── other failure → EngineError::Database (rollback)          │
//! │       ▼                                                                 │
//! │  TransactionWithItems                                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::error::DbError;
use crate::pool::Database;
use taller_core::{NewTransaction, StockPolicy, TransactionDraft, TransactionWithItems, ValidationError};

/// Why a transaction was not recorded.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The request was rejected before anything was written.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A sale would oversell while `StockPolicy::RejectNegative` is active.
    #[error("Insufficient stock for product {product_id}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: i64,
        available: i64,
        requested: i64,
    },

    /// The store failed; the unit was rolled back.
    #[error(transparent)]
    Database(DbError),
}

impl From<DbError> for EngineError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::InsufficientStock {
                product_id,
                available,
                requested,
            } => EngineError::InsufficientStock {
                product_id,
                available,
                requested,
            },
            DbError::StockOutOfRange { line, .. } => {
                EngineError::Validation(ValidationError::Overflow {
                    field: format!("items[{line}].quantity"),
                })
            }
            other => EngineError::Database(other),
        }
    }
}

/// Validates, prices and atomically records transactions.
///
/// Holds the injected [`Database`] and the configured [`StockPolicy`].
/// Cheap to clone.
#[derive(Debug, Clone)]
pub struct TransactionEngine {
    db: Database,
    policy: StockPolicy,
}

impl TransactionEngine {
    pub fn new(db: Database, policy: StockPolicy) -> Self {
        TransactionEngine { db, policy }
    }

    pub fn policy(&self) -> StockPolicy {
        self.policy
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Records a sale or purchase.
    pub async fn create_transaction(
        &self,
        request: &NewTransaction,
    ) -> Result<TransactionWithItems, EngineError> {
        let draft = TransactionDraft::prepare(request).inspect_err(|e| {
            debug!(error = %e, "Transaction request rejected");
        })?;

        debug!(
            kind = %draft.kind,
            total = %draft.total,
            lines = draft.lines.len(),
            stock_adjustments = draft.stock_adjustments().len(),
            policy = ?self.policy,
            "Transaction prepared"
        );

        match self.db.transactions().create(&draft, self.policy).await {
            Ok(created) => {
                info!(
                    transaction_id = created.transaction.id,
                    customer = %created.transaction.customer_name,
                    total = %created.transaction.total_amount,
                    "Transaction recorded"
                );
                Ok(created)
            }
            Err(err) => {
                warn!(error = %err, kind = %draft.kind, "Transaction rolled back");
                Err(err.into())
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
