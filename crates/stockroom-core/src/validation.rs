//! # Validation Module
//!
//! Field rules for products and sales, plus the string parsers the forms
//! and the legacy importer share.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Presentation (form widgets)                                  │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: forms / import                                               │
//! │  └── THIS MODULE: raw text → typed values (parse_*)                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: ProductLedger / SalesLedger                                  │
//! │  └── THIS MODULE: typed values → accepted (validate_*)                 │
//! │                                                                         │
//! │  A failure at any layer leaves the ledgers untouched.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use stockroom_core::validation::{parse_price, validate_product_name};
//!
//! assert_eq!(parse_price("price", "28,90").unwrap(), 2890);
//! assert_eq!(validate_product_name("  Rice 5kg ").unwrap(), "Rice 5kg");
//! ```

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::error::ValidationError;
use crate::{
    MAX_CUSTOMER_NAME_LEN, MAX_PRODUCT_NAME_LEN, MAX_QUANTITY_ON_HAND, MAX_UNIT_PRICE_CENTS,
};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name and returns it trimmed.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most MAX_PRODUCT_NAME_LEN (200) characters
///
/// ## Example
/// ```rust
/// use stockroom_core::validation::validate_product_name;
///
/// assert!(validate_product_name("Milk 1L").is_ok());
/// assert!(validate_product_name("   ").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_PRODUCT_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_PRODUCT_NAME_LEN,
        });
    }

    Ok(name.to_string())
}

/// Normalizes an optional customer name: blank becomes `None`.
pub fn validate_customer_name(name: Option<&str>) -> ValidationResult<Option<String>> {
    let name = match name.map(str::trim) {
        Some(n) if !n.is_empty() => n,
        _ => return Ok(None),
    };

    if name.chars().count() > MAX_CUSTOMER_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "customer_name".to_string(),
            max: MAX_CUSTOMER_NAME_LEN,
        });
    }

    Ok(Some(name.to_string()))
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a unit price in cents. Zero is allowed (giveaways).
///
/// ## Example
/// ```rust
/// use stockroom_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents(1099).is_ok());
/// assert!(validate_price_cents(0).is_ok());
/// assert!(validate_price_cents(-100).is_err());
/// assert!(validate_price_cents(100_000_001).is_err());
/// ```
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    check_range("unit_price", cents, MAX_UNIT_PRICE_CENTS)
}

/// Validates a quantity on hand. Zero is allowed (sold-out batch).
pub fn validate_quantity_on_hand(quantity: i64) -> ValidationResult<()> {
    check_range("quantity_on_hand", quantity, MAX_QUANTITY_ON_HAND)
}

/// Checks `0 <= value <= max`.
pub(crate) fn check_range(field: &str, value: i64, max: i64) -> ValidationResult<()> {
    if !(0..=max).contains(&value) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max,
        });
    }

    Ok(())
}

// =============================================================================
// Temporal Validators
// =============================================================================

/// Checks that a batch does not leave stock before it entered.
pub fn validate_stock_window(
    entry: DateTime<Utc>,
    exit: Option<DateTime<Utc>>,
) -> ValidationResult<()> {
    match exit {
        Some(exit) if exit < entry => Err(ValidationError::OutOfOrder {
            field: "exit_timestamp".to_string(),
            earlier_field: "entry_timestamp".to_string(),
        }),
        _ => Ok(()),
    }
}

// =============================================================================
// Parsers
// =============================================================================

/// Parses a decimal price into cents.
///
/// ## Accepted Forms
/// ```text
/// "28.90"     → 2890      "28,90"     → 2890
/// "28"        → 2800      "1.234,56"  → 123456
/// "$ 3.5"     → 350       "1,234.56"  → 123456
/// ```
/// When both `.` and `,` appear, the last one is the decimal separator and
/// the other one groups thousands. At most two decimal places.
pub fn parse_price(field: &str, raw: &str) -> ValidationResult<i64> {
    let cleaned = raw
        .trim()
        .trim_start_matches("R$")
        .trim_start_matches('$')
        .trim();

    if cleaned.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if cleaned.starts_with('-') {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_UNIT_PRICE_CENTS,
        });
    }

    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: reason.to_string(),
    };

    let decimal_separator = match (cleaned.rfind('.'), cleaned.rfind(',')) {
        (Some(dot), Some(comma)) => Some(if dot > comma { '.' } else { ',' }),
        (Some(_), None) => Some('.'),
        (None, Some(_)) => Some(','),
        (None, None) => None,
    };

    let (whole, fraction) = match decimal_separator.and_then(|sep| cleaned.rsplit_once(sep)) {
        Some((whole, fraction)) => (whole, fraction),
        None => (cleaned, ""),
    };

    let whole: String = whole.chars().filter(|c| *c != '.' && *c != ',').collect();

    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid("not a number"));
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid("not a number"));
    }
    if fraction.len() > 2 {
        return Err(invalid("at most two decimal places"));
    }

    let whole_value: i64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| invalid("too large"))?
    };
    let fraction_value: i64 = match fraction.len() {
        0 => 0,
        1 => fraction.parse::<i64>().map_err(|_| invalid("not a number"))? * 10,
        _ => fraction.parse().map_err(|_| invalid("not a number"))?,
    };

    let cents = whole_value
        .checked_mul(100)
        .and_then(|cents| cents.checked_add(fraction_value))
        .ok_or_else(|| invalid("too large"))?;
    check_range(field, cents, MAX_UNIT_PRICE_CENTS)?;

    Ok(cents)
}

/// Parses a whole, non-negative quantity.
pub fn parse_quantity(field: &str, raw: &str) -> ValidationResult<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    let quantity: i64 = raw.parse().map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be a whole number".to_string(),
    })?;

    check_range(field, quantity, MAX_QUANTITY_ON_HAND)?;

    Ok(quantity)
}

/// Parses a calendar date in `YYYY-MM-DD` or `DD/MM/YYYY` form.
pub fn parse_date(field: &str, raw: &str) -> ValidationResult<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%d/%m/%Y"))
        .map_err(|_| ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "expected YYYY-MM-DD or DD/MM/YYYY".to_string(),
        })
}

/// Parses a timestamp.
///
/// RFC 3339 keeps its offset. Forms without an offset
/// (`YYYY-MM-DDTHH:MM[:SS]`, `T` or a space between) are read as UTC.
pub fn parse_timestamp(field: &str, raw: &str) -> ValidationResult<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }

    const NAIVE_FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];

    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "expected an ISO 8601 timestamp".to_string(),
        })
}

// =============================================================================
// Unit Tests
// =============================================================================
