//! # Repository Module
//!
//! Database repository implementations for Taller POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  HTTP handler                                                          │
//! │       │                                                                 │
//! │       │  db.products().list(&filter)                                   │
//! │       ▼                                                                 │
//! │  ProductRepository       TransactionRepository     StatsRepository     │
//! │  ├── list                ├── create (atomic)       ├── daily_sales     │
//! │  ├── get_by_id           ├── get_by_id             ├── low_stock_count │
//! │  ├── insert / update     ├── items_for             ├── pending_count   │
//! │  ├── delete              └── list_with_items       └── get_stats       │
//! │  └── adjust_stock ◄──────────── used inside create                     │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`](product::ProductRepository) - Product ledger
//! - [`TransactionRepository`](transaction::TransactionRepository) - Sales and purchases
//! - [`StatsRepository`](stats::StatsRepository) - Dashboard aggregates

use chrono::{DateTime, SecondsFormat, Utc};

pub mod product;
pub mod stats;
pub mod transaction;

/// Renders a timestamp the way the `transactions.date` column stores it.
///
/// Fixed width (microseconds, `Z` suffix) so that text comparison in SQL
/// orders the same as time.
pub fn to_db_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_is_fixed_width() {
        let whole = DateTime::parse_from_rfc3339("2026-10-16T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let fractional = DateTime::parse_from_rfc3339("2026-10-16T09:59:59.5Z")
            .unwrap()
            .with_timezone(&Utc);

        assert_eq!(to_db_timestamp(whole), "2026-10-16T10:00:00.000000Z");
        assert!(to_db_timestamp(fractional) < to_db_timestamp(whole));
    }
}
