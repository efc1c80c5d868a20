//! # taller-db: Database Layer for Taller POS
//!
//! Database access for Taller POS: SQLite through sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Taller POS Data Flow                             │
//! │                                                                         │
//! │  HTTP handler (POST /api/transactions)                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     taller-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Engine      │    │  Repositories │    │   Database   │  │   │
//! │  │   │  (engine.rs)  │───►│ ProductRepo   │───►│  (pool.rs)   │  │   │
//! │  │   │               │    │ TransactionRe │    │  SqlitePool  │  │   │
//! │  │   │ policy, logs  │    │ StatsRepo     │    │  migrations  │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database (./data/taller.db)          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`repository`] - Product ledger, transactions, statistics
//! - [`engine`] - Atomic transaction creation
//! - [`seed`] - Demo catalogue
//! - [`error`] - Database error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use taller_db::{Database, DbConfig, TransactionEngine};
//! use taller_core::StockPolicy;
//!
//! let db = Database::new(DbConfig::new("./data/taller.db")).await?;
//! let engine = TransactionEngine::new(db.clone(), StockPolicy::AllowNegative);
//!
//! let created = engine.create_transaction(&request).await?;
//! let stats = db.stats().get_stats(&chrono::Local::now()).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod engine;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod seed;

// =============================================================================
// Re-exports
// =============================================================================

pub use engine::{EngineError, TransactionEngine};
pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::product::{ProductRepository, StockAdjustment};
pub use repository::stats::StatsRepository;
pub use repository::transaction::TransactionRepository;
