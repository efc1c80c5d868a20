//! # taller-core: Pure Business Logic for Taller POS
//!
//! Domain types and rules for a repair shop's point of sale and parts
//! inventory. Nothing in this crate performs I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Taller POS Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Browser UI                                   │   │
//! │  │    Dashboard ──► Inventory ──► New Sale ──► History            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ HTTP/JSON                              │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    apps/server (axum)                           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ taller-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌─────────────┐ ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │ transaction │ │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │   Draft     │ │   rules   │  │   │
//! │  │   │  Stats    │  │  (cents)  │  │  planning   │ │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └─────────────┘ └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    taller-db (Database Layer)                   │   │
//! │  │        SQLite queries, migrations, ledger, engine, stats        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Transaction, Stats, ...)
//! - [`money`] - Money type with integer arithmetic
//! - [`transaction`] - Validation and totals for a new transaction
//! - [`validation`] - Field-level business rules
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use taller_core::Money;
//!
//! let price = Money::parse("8.00").unwrap();
//! let subtotal = price.checked_times(2).unwrap();
//! assert_eq!(subtotal.to_string(), "16.00");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod transaction;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use transaction::{DraftLine, StockAdjustmentPlan, TransactionDraft};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Customer name recorded when the counter leaves it blank.
pub const DEFAULT_CUSTOMER_NAME: &str = "Cliente General";

/// Reorder threshold for products created without one.
pub const DEFAULT_MIN_STOCK: i64 = 5;
