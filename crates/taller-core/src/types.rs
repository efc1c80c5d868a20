//! # Domain Types
//!
//! Core domain types used throughout Taller POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │  Transaction    │   │ TransactionItem │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  transaction_id │       │
//! │  │  stock          │   │  kind           │   │  product_id?    │       │
//! │  │  min_stock      │   │  total_amount   │   │  subtotal       │       │
//! │  │  price_buy/sell │   │  payment_status │   │  is_service     │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ TransactionType │   │  PaymentStatus  │   │  StockPolicy    │       │
//! │  │  Sale           │   │  Paid           │   │  AllowNegative  │       │
//! │  │  Purchase       │   │  Pending        │   │  RejectNegative │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! A transaction item copies its description, unit price and subtotal at
//! creation time. Editing or deleting the product later never rewrites history,
//! and the header total is stored rather than recomputed on read.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::money::Money;
use crate::DEFAULT_MIN_STOCK;

// =============================================================================
// Product
// =============================================================================

/// A part or product held in the shop's ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    pub id: i64,

    /// Display name shown at the counter.
    pub name: String,

    /// Free-form label ("Aceites", "Filtros", ...). The UI suggests a
    /// closed set, the server accepts anything non-blank.
    pub category: String,

    pub description: Option<String>,

    /// Optional shop code, e.g. "OIL-5W30".
    pub sku: Option<String>,

    /// Units on hand. May go negative when overselling is permitted.
    pub stock: i64,

    /// Reorder threshold.
    pub min_stock: i64,

    #[ts(type = "string")]
    pub price_buy: Money,

    #[ts(type = "string")]
    pub price_sell: Money,
}

impl Product {
    /// A product is low on stock when it is at or below its threshold.
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.stock <= self.min_stock
    }
}

/// Fields for creating a product.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewProduct {
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub stock: i64,
    #[serde(default = "default_min_stock")]
    pub min_stock: i64,
    #[ts(type = "string")]
    pub price_buy: Money,
    #[ts(type = "string")]
    pub price_sell: Money,
}

fn default_min_stock() -> i64 {
    DEFAULT_MIN_STOCK
}

/// Partial product update.
///
/// An absent field keeps the stored value. For the nullable columns
/// (`description`, `sku`) an explicit `null` clears the value, hence the
/// nested `Option`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "present")]
    #[ts(optional)]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    #[ts(optional)]
    pub sku: Option<Option<String>>,
    #[serde(default)]
    pub stock: Option<i64>,
    #[serde(default)]
    pub min_stock: Option<i64>,
    #[serde(default)]
    #[ts(type = "string | null")]
    pub price_buy: Option<Money>,
    #[serde(default)]
    #[ts(type = "string | null")]
    pub price_sell: Option<Money>,
}

impl ProductUpdate {
    /// True when the update would change nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category.is_none()
            && self.description.is_none()
            && self.sku.is_none()
            && self.stock.is_none()
            && self.min_stock.is_none()
            && self.price_buy.is_none()
            && self.price_sell.is_none()
    }
}

/// Marks a field as present so `null` and "missing" stay distinguishable.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Query filters for the product list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    /// Case-insensitive match on name, SKU or description.
    pub search: Option<String>,
    /// Exact category.
    pub category: Option<String>,
    /// Only products at or below their threshold.
    pub low_stock: bool,
}

// =============================================================================
// Transaction Type
// =============================================================================

/// Direction of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum TransactionType {
    /// Goods leave the shop: stock goes down.
    Sale,
    /// Goods arrive from a supplier: stock goes up.
    Purchase,
}

impl TransactionType {
    /// Signed stock change for `quantity` units.
    ///
    /// ```rust
    /// use taller_core::TransactionType;
    ///
    /// assert_eq!(TransactionType::Sale.stock_delta(2), -2);
    /// assert_eq!(TransactionType::Purchase.stock_delta(2), 2);
    /// ```
    #[inline]
    pub const fn stock_delta(&self, quantity: i64) -> i64 {
        match self {
            TransactionType::Sale => -quantity,
            TransactionType::Purchase => quantity,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Sale => "sale",
            TransactionType::Purchase => "purchase",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Payment Status
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum PaymentStatus {
    #[default]
    Paid,
    /// Work delivered, money still owed. Counted on the dashboard.
    Pending,
}

impl PaymentStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Paid => "paid",
            PaymentStatus::Pending => "pending",
        }
    }
}

// =============================================================================
// Stock Policy
// =============================================================================

/// What to do when a sale would push stock below zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockPolicy {
    /// Record the sale, stock goes negative.
    #[default]
    AllowNegative,
    /// Reject the whole transaction.
    RejectNegative,
}

impl FromStr for StockPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "allow_negative" => Ok(StockPolicy::AllowNegative),
            "reject_negative" => Ok(StockPolicy::RejectNegative),
            other => Err(format!(
                "unknown stock policy '{other}', expected allow_negative or reject_negative"
            )),
        }
    }
}

// =============================================================================
// Transaction
// =============================================================================

/// Header of a sale or purchase. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Transaction {
    pub id: i64,
    pub customer_name: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// Server-assigned creation time.
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    /// Sum of item subtotals at creation time.
    #[ts(type = "string")]
    pub total_amount: Money,
    pub payment_status: PaymentStatus,
    pub notes: Option<String>,
}

/// A line item. Owned by exactly one transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TransactionItem {
    pub id: i64,
    pub transaction_id: i64,
    /// Absent for labour and other manual lines.
    pub product_id: Option<i64>,
    /// Copied at creation time (frozen).
    pub description: String,
    pub quantity: i64,
    #[ts(type = "string")]
    pub unit_price: Money,
    /// quantity × unit_price, stored.
    #[ts(type = "string")]
    pub subtotal: Money,
    /// Services never touch stock.
    pub is_service: bool,
}

/// A transaction with its items inlined, as listed in the history view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TransactionWithItems {
    #[serde(flatten)]
    pub transaction: Transaction,
    pub items: Vec<TransactionItem>,
}

// =============================================================================
// Transaction Request
// =============================================================================

/// Request to record a sale or purchase.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewTransaction {
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    #[serde(default)]
    pub payment_status: Option<PaymentStatus>,
    #[serde(default)]
    pub notes: Option<String>,
    pub items: Vec<NewTransactionItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewTransactionItem {
    #[serde(default)]
    pub product_id: Option<i64>,
    pub description: String,
    pub quantity: i64,
    #[ts(type = "string | number")]
    pub unit_price: Money,
    #[serde(default)]
    pub is_service: bool,
}

// =============================================================================
// Statistics
// =============================================================================

/// Dashboard figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stats {
    /// Sum of today's sale totals (purchases excluded).
    pub daily_sales: Money,
    /// Products with stock <= min_stock.
    pub low_stock_count: i64,
    /// Transactions of any day still awaiting payment.
    pub pending_services: i64,
}

// =============================================================================
// Unit Tests
// =============================================================================
