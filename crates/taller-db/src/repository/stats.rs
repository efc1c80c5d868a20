//! # Statistics Repository
//!
//! Dashboard figures, recomputed from the store on every call.
//!
//! ```text
//! ┌───────────────────┬─────────────────────────────────────────────────────┐
//! │ dailySales        │ Σ total of sales dated within today (local day)    │
//! │ lowStockCount     │ products with stock <= min_stock                    │
//! │ pendingServices   │ transactions with payment_status = 'pending'        │
//! └───────────────────┴─────────────────────────────────────────────────────┘
//! ```
//!
//! Each figure is its own query. Under concurrent writes they may describe
//! slightly different instants, which is fine for a dashboard refresh.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use super::to_db_timestamp;
use crate::error::DbResult;
use taller_core::{Money, Stats};

/// Repository for aggregate queries.
#[derive(Debug, Clone)]
pub struct StatsRepository {
    pool: SqlitePool,
}

impl StatsRepository {
    /// Creates a new StatsRepository.
    pub fn new(pool: SqlitePool) -> Self {
        StatsRepository { pool }
    }

    /// Sum of sale totals with `start <= date < end`. Purchases are excluded.
    pub async fn daily_sales(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> DbResult<Money> {
        let cents: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(total_cents), 0)
            FROM transactions
            WHERE type = 'sale' AND date >= ?1 AND date < ?2
            "#,
        )
        .bind(to_db_timestamp(start))
        .bind(to_db_timestamp(end))
        .fetch_one(&self.pool)
        .await?;

        Ok(Money::from_cents(cents))
    }

    /// Products at or below their reorder threshold.
    pub async fn low_stock_count(&self) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE stock <= min_stock")
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    /// Transactions of any date still awaiting payment.
    pub async fn pending_count(&self) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM transactions WHERE payment_status = 'pending'")
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    /// All dashboard figures, with "today" taken from `now`'s time zone.
    ///
    /// The server passes `Local::now()`, so the day runs from the shop's
    /// midnight to the next.
    pub async fn get_stats<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> DbResult<Stats> {
        let (start, end) = day_bounds(now);

        let stats = Stats {
            daily_sales: self.daily_sales(start, end).await?,
            low_stock_count: self.low_stock_count().await?,
            pending_services: self.pending_count().await?,
        };

        debug!(
            daily_sales = %stats.daily_sales,
            low_stock_count = stats.low_stock_count,
            pending_services = stats.pending_services,
            "Computed stats"
        );

        Ok(stats)
    }
}

/// Calendar day containing `now`, in `now`'s zone, as a half-open UTC range.
pub fn day_bounds<Tz: TimeZone>(now: &DateTime<Tz>) -> (DateTime<Utc>, DateTime<Utc>) {
    let tz = now.timezone();
    let day = now.date_naive();

    let start = midnight(&tz, day);
    let end = day
        .succ_opt()
        .map(|next| midnight(&tz, next))
        .unwrap_or(DateTime::<Utc>::MAX_UTC);

    (start, end)
}

/// First instant of `day` in `tz`.
///
/// Where a DST jump skips midnight, the day starts at the first valid
/// local time after it.
fn midnight<Tz: TimeZone>(tz: &Tz, day: NaiveDate) -> DateTime<Utc> {
    let local = day.and_time(NaiveTime::MIN);

    (0..=2)
        .find_map(|hours| {
            tz.from_local_datetime(&(local + Duration::hours(hours)))
                .earliest()
        })
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&local))
}

// =============================================================================
// Unit Tests
// =============================================================================
