//! # Transaction Planning
//!
//! Turns a [`NewTransaction`] request into a fully computed draft before
//! anything touches the database.
//!
//! ## Where This Sits
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Create Transaction Flow                              │
//! │                                                                         │
//! │  POST /api/transactions                                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  TransactionDraft::prepare()  ← THIS MODULE (pure)                     │
//! │  ├── validate every item (first failure wins)                          │
//! │  ├── subtotal = quantity × unitPrice   (checked, integer cents)        │
//! │  ├── total    = Σ subtotal             (checked)                       │
//! │  ├── apply defaults (customer name, payment status)                    │
//! │  └── plan stock adjustments (non-service lines with a product)         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  TransactionRepository::create()  (taller-db, one SQL transaction)     │
//! │  ├── INSERT header                                                     │
//! │  ├── INSERT items in submitted order                                   │
//! │  └── UPDATE products SET stock = stock + delta                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The draft is the only thing the storage layer persists, so the stored
//! total always equals the sum of the stored subtotals.

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{NewTransaction, PaymentStatus, TransactionType};
use crate::validation::{
    validate_description, validate_quantity, validate_unit_price, ValidationResult,
};
use crate::DEFAULT_CUSTOMER_NAME;

/// One computed line, ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftLine {
    pub product_id: Option<i64>,
    pub description: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub subtotal: Money,
    pub is_service: bool,
}

impl DraftLine {
    /// Whether this line moves stock.
    #[inline]
    pub fn affects_stock(&self) -> bool {
        self.product_id.is_some() && !self.is_service
    }
}

/// A signed stock change for one product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockAdjustmentPlan {
    /// Position of the originating line.
    pub line: usize,
    pub product_id: i64,
    pub delta: i64,
}

/// A validated transaction with all derived values computed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionDraft {
    pub customer_name: String,
    pub kind: TransactionType,
    pub payment_status: PaymentStatus,
    pub notes: Option<String>,
    pub total: Money,
    pub lines: Vec<DraftLine>,
}

impl TransactionDraft {
    /// Validates the request and computes subtotals and the total.
    ///
    /// ## Example
    /// ```rust
    /// use taller_core::{Money, NewTransaction, NewTransactionItem, TransactionType};
    /// use taller_core::transaction::TransactionDraft;
    ///
    /// let request = NewTransaction {
    ///     customer_name: None,
    ///     kind: TransactionType::Sale,
    ///     payment_status: None,
    ///     notes: None,
    ///     items: vec![NewTransactionItem {
    ///         product_id: Some(1),
    ///         description: "Filtro".to_string(),
    ///         quantity: 2,
    ///         unit_price: Money::from_cents(800),
    ///         is_service: false,
    ///     }],
    /// };
    ///
    /// let draft = TransactionDraft::prepare(&request).unwrap();
    /// assert_eq!(draft.total.to_string(), "16.00");
    /// assert_eq!(draft.customer_name, "Cliente General");
    /// ```
    pub fn prepare(request: &NewTransaction) -> ValidationResult<Self> {
        if request.items.is_empty() {
            return Err(ValidationError::Empty {
                field: "items".to_string(),
            });
        }

        let mut lines = Vec::with_capacity(request.items.len());
        let mut total = Money::zero();

        for (index, item) in request.items.iter().enumerate() {
            validate_description(&item.description, &format!("items[{index}].description"))?;
            validate_quantity(item.quantity, &format!("items[{index}].quantity"))?;
            validate_unit_price(item.unit_price, &format!("items[{index}].unitPrice"))?;

            let subtotal = item.unit_price.checked_times(item.quantity).ok_or_else(|| {
                ValidationError::Overflow {
                    field: format!("items[{index}].quantity"),
                }
            })?;

            total = total
                .checked_add(subtotal)
                .ok_or_else(|| ValidationError::Overflow {
                    field: "items".to_string(),
                })?;

            lines.push(DraftLine {
                product_id: item.product_id,
                description: item.description.trim().to_string(),
                quantity: item.quantity,
                unit_price: item.unit_price,
                subtotal,
                is_service: item.is_service,
            });
        }

        let customer_name = request
            .customer_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_CUSTOMER_NAME)
            .to_string();

        let notes = request
            .notes
            .as_deref()
            .map(str::trim)
            .filter(|notes| !notes.is_empty())
            .map(str::to_string);

        Ok(Self {
            customer_name,
            kind: request.kind,
            payment_status: request.payment_status.unwrap_or_default(),
            notes,
            total,
            lines,
        })
    }

    /// Stock changes in submitted order, one per qualifying line.
    ///
    /// A product listed on two lines gets two adjustments.
    pub fn stock_adjustments(&self) -> Vec<StockAdjustmentPlan> {
        self.lines
            .iter()
            .enumerate()
            .filter_map(|(line, item)| {
                let product_id = item.product_id.filter(|_| !item.is_service)?;
                Some(StockAdjustmentPlan {
                    line,
                    product_id,
                    delta: self.kind.stock_delta(item.quantity),
                })
            })
            .collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
