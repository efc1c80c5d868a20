//! # Validation Module
//!
//! Input validation for Taller POS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Browser form                                                 │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: HTTP boundary (axum Json extractor)                          │
//! │  ├── Shape and type validation (deserialization)                       │
//! │  └── THIS MODULE: Business rule validation                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every validator takes the field name it reports, so that a failure deep
//! inside an item list reads `items[1].quantity` instead of `quantity`.
//! The first failing rule wins.
//!
//! ## Usage
//! ```rust
//! use taller_core::validation::{validate_product_name, validate_quantity};
//!
//! assert!(validate_product_name("Filtro de Aceite").is_ok());
//! assert!(validate_quantity(0, "items[0].quantity").is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{NewProduct, ProductUpdate};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_NAME_LEN: usize = 200;
const MAX_CATEGORY_LEN: usize = 100;
const MAX_SEARCH_LEN: usize = 100;

// =============================================================================
// String Validators
// =============================================================================

fn require_text(value: &str, field: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates a product name.
///
/// ## Rules
/// - Must not be blank
/// - At most 200 characters
///
/// ```rust
/// use taller_core::validation::validate_product_name;
///
/// assert!(validate_product_name("Aceite Sintético 5W-30").is_ok());
/// assert!(validate_product_name("   ").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    require_text(name, "name", MAX_NAME_LEN)
}

/// Validates a product category. Any non-blank label is accepted.
pub fn validate_category(category: &str) -> ValidationResult<()> {
    require_text(category, "category", MAX_CATEGORY_LEN)
}

/// Validates a line item description.
///
/// Blank is allowed (a bare labour line); only the length is bounded.
pub fn validate_description(description: &str, field: &str) -> ValidationResult<()> {
    if description.trim().chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }
    Ok(())
}

/// Validates a search query.
///
/// ## Returns
/// The trimmed query, or `None` when it is blank (no filtering).
pub fn validate_search_query(query: &str) -> ValidationResult<Option<String>> {
    let query = query.trim();

    if query.chars().count() > MAX_SEARCH_LEN {
        return Err(ValidationError::TooLong {
            field: "search".to_string(),
            max: MAX_SEARCH_LEN,
        });
    }

    if query.is_empty() {
        Ok(None)
    } else {
        Ok(Some(query.to_string()))
    }
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line item quantity.
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  New Sale: item row 2                                                   │
/// │                                                                         │
/// │  User enters quantity: 0                                               │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_quantity(0, "items[1].quantity") ← THIS FUNCTION             │
/// │       │                                                                 │
/// │       ├── qty < 1? → 400 "items[1].quantity must be at least 1"        │
/// │       │                                                                 │
/// │       └── OK → line subtotal is computed                               │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_quantity(qty: i64, field: &str) -> ValidationResult<()> {
    if qty < 1 {
        return Err(ValidationError::TooSmall {
            field: field.to_string(),
            min: 1,
        });
    }

    Ok(())
}

/// Validates a line item unit price. Zero is allowed (free labour, warranty parts).
pub fn validate_unit_price(price: Money, field: &str) -> ValidationResult<()> {
    validate_price(price, field)
}

/// Validates a buy or sell price.
///
/// ```rust
/// use taller_core::money::Money;
/// use taller_core::validation::validate_price;
///
/// assert!(validate_price(Money::from_cents(0), "priceSell").is_ok());
/// assert!(validate_price(Money::from_cents(-1), "priceSell").is_err());
/// ```
pub fn validate_price(price: Money, field: &str) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a reorder threshold.
pub fn validate_min_stock(min_stock: i64) -> ValidationResult<()> {
    if min_stock < 0 {
        return Err(ValidationError::Negative {
            field: "minStock".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Product Validators
// =============================================================================

/// Validates a create request. Stock itself is not bounded: a shop may
/// register a part it already owes a customer.
pub fn validate_new_product(product: &NewProduct) -> ValidationResult<()> {
    validate_product_name(&product.name)?;
    validate_category(&product.category)?;
    validate_min_stock(product.min_stock)?;
    validate_price(product.price_buy, "priceBuy")?;
    validate_price(product.price_sell, "priceSell")?;
    Ok(())
}

/// Validates the fields present in a partial update.
pub fn validate_product_update(update: &ProductUpdate) -> ValidationResult<()> {
    if let Some(name) = &update.name {
        validate_product_name(name)?;
    }
    if let Some(category) = &update.category {
        validate_category(category)?;
    }
    if let Some(min_stock) = update.min_stock {
        validate_min_stock(min_stock)?;
    }
    if let Some(price) = update.price_buy {
        validate_price(price, "priceBuy")?;
    }
    if let Some(price) = update.price_sell {
        validate_price(price, "priceSell")?;
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
