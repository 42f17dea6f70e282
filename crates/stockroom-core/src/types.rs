//! # Domain Types
//!
//! Core domain types used throughout Stockroom.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Sale       │   │     Alert       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (u64)       │   │  id (u64)       │   │  product_id     │       │
//! │  │  name           │   │  product_id     │   │  severity       │       │
//! │  │  price_cents    │   │  quantity       │   │  message        │       │
//! │  │  quantity       │   │  total_cents    │   │  (derived only) │       │
//! │  │  expiry_date    │   │  payment_method │   │                 │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  ExpiryStatus   │   │ AlertSeverity   │   │ PaymentMethod   │       │
//! │  │  Expired        │   │  Critical       │   │  Cash           │       │
//! │  │  Critical       │   │  Warning        │   │  Card           │       │
//! │  │  Warning / Ok   │   └─────────────────┘   │  InstantTransfer│       │
//! │  └─────────────────┘                         └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Products and sales are identified by integers assigned by their ledgers.
//! Alerts are never stored: they are recomputed from the ledger on every read.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A stock batch on the shelf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    /// Ledger-assigned id, never reused after deletion.
    pub id: u64,

    /// Display name.
    pub name: String,

    /// Unit price in cents.
    pub unit_price_cents: i64,

    /// Units currently on hand.
    pub quantity_on_hand: i64,

    /// When the batch entered stock. Immutable after creation.
    #[ts(as = "String")]
    pub entry_timestamp: DateTime<Utc>,

    /// When the batch left stock. Set means "sold out / removed".
    #[ts(as = "Option<String>")]
    pub exit_timestamp: Option<DateTime<Utc>>,

    /// Calendar date after which the product is expired.
    #[ts(as = "String")]
    pub expiry_date: NaiveDate,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the unit price as a Money type.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Value of the units on hand (`unit price × quantity`).
    #[inline]
    pub fn stock_value(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity_on_hand)
    }

    /// True once the batch has left stock.
    #[inline]
    pub fn is_sold_out(&self) -> bool {
        self.exit_timestamp.is_some()
    }

    /// Whole days between entry and `now` (or the exit, if the batch left).
    pub fn days_in_stock(&self, now: DateTime<Utc>) -> i64 {
        let until = self.exit_timestamp.unwrap_or(now);
        (until - self.entry_timestamp).num_days().max(0)
    }

    /// Checks if `quantity` units can be sold from this batch.
    pub fn can_sell(&self, quantity: i64) -> bool {
        quantity >= 1 && self.quantity_on_hand >= quantity
    }
}

/// Validated input for creating or editing a product.
///
/// `entry_timestamp` is only read on add; editing keeps the stored value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductDraft {
    pub name: String,
    pub unit_price_cents: i64,
    pub quantity_on_hand: i64,
    #[ts(as = "Option<String>")]
    pub entry_timestamp: Option<DateTime<Utc>>,
    #[ts(as = "Option<String>")]
    pub exit_timestamp: Option<DateTime<Utc>>,
    #[ts(as = "String")]
    pub expiry_date: NaiveDate,
}

impl ProductDraft {
    /// Creates a draft for a batch still in stock.
    pub fn new(
        name: impl Into<String>,
        unit_price: Money,
        quantity_on_hand: i64,
        expiry_date: NaiveDate,
    ) -> Self {
        ProductDraft {
            name: name.into(),
            unit_price_cents: unit_price.cents(),
            quantity_on_hand,
            entry_timestamp: None,
            exit_timestamp: None,
            expiry_date,
        }
    }

    /// Sets the stock entry timestamp.
    pub fn entered_at(mut self, entry: DateTime<Utc>) -> Self {
        self.entry_timestamp = Some(entry);
        self
    }

    /// Marks the batch as having left stock.
    pub fn exited_at(mut self, exit: DateTime<Utc>) -> Self {
        self.exit_timestamp = Some(exit);
        self
    }
}

// =============================================================================
// Expiry Status
// =============================================================================

/// Status bucket produced by the expiration classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ExpiryStatus {
    /// `days <= 0`.
    Expired,
    /// `1..=7` days left.
    Critical,
    /// `8..=30` days left.
    Warning,
    /// More than 30 days left.
    Ok,
}

impl ExpiryStatus {
    /// Every bucket, most urgent first.
    pub const ALL: [ExpiryStatus; 4] = [
        ExpiryStatus::Expired,
        ExpiryStatus::Critical,
        ExpiryStatus::Warning,
        ExpiryStatus::Ok,
    ];

    /// True for the buckets that raise an alert.
    #[inline]
    pub fn is_urgent(&self) -> bool {
        matches!(self, ExpiryStatus::Expired | ExpiryStatus::Critical)
    }
}

impl fmt::Display for ExpiryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpiryStatus::Expired => write!(f, "expired"),
            ExpiryStatus::Critical => write!(f, "critical"),
            ExpiryStatus::Warning => write!(f, "warning"),
            ExpiryStatus::Ok => write!(f, "ok"),
        }
    }
}

// =============================================================================
// Alert
// =============================================================================

/// Alert severity. Expired products are `Critical`; products inside the
/// 7-day window are `Warning`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum AlertSeverity {
    Critical,
    Warning,
}

/// A derived alert for one product. Recomputed on every read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Alert {
    pub product_id: u64,
    pub product_name: String,
    pub message: String,
    pub severity: AlertSeverity,
    pub days_until_expiry: i64,
    #[ts(as = "String")]
    pub expiry_date: NaiveDate,
    /// Date the alert was computed for.
    #[ts(as = "String")]
    pub generated_on: NaiveDate,
}

// =============================================================================
// Payment Method
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum PaymentMethod {
    /// Physical cash payment.
    Cash,
    /// Card payment on a terminal.
    Card,
    /// Instant bank transfer (e.g. PIX).
    InstantTransfer,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 3] = [
        PaymentMethod::Cash,
        PaymentMethod::Card,
        PaymentMethod::InstantTransfer,
    ];
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentMethod::Cash => write!(f, "cash"),
            PaymentMethod::Card => write!(f, "card"),
            PaymentMethod::InstantTransfer => write!(f, "instant_transfer"),
        }
    }
}

/// Accepts canonical names and the legacy labels still found in old exports.
impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cash" | "dinheiro" => Ok(PaymentMethod::Cash),
            "card" | "cartao" | "cartão" => Ok(PaymentMethod::Card),
            "instant_transfer" | "instant-transfer" | "pix" => Ok(PaymentMethod::InstantTransfer),
            _ => Err(ValidationError::NotAllowed {
                field: "payment_method".to_string(),
                allowed: PaymentMethod::ALL.iter().map(|m| m.to_string()).collect(),
            }),
        }
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A recorded sale. Immutable once created; only deletion is allowed.
///
/// Product name and unit price are snapshots taken at sale time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Sale {
    pub id: u64,
    pub product_id: u64,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    /// `quantity × unit_price_cents`.
    pub total_price_cents: i64,
    #[ts(as = "String")]
    pub sale_timestamp: DateTime<Utc>,
    pub customer_name: Option<String>,
    pub payment_method: PaymentMethod,
}

impl Sale {
    /// Returns the sale total as Money.
    #[inline]
    pub fn total_price(&self) -> Money {
        Money::from_cents(self.total_price_cents)
    }

    /// Returns the unit price at sale time as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }
}

/// Input for recording a sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaleRequest {
    pub product_id: u64,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub customer_name: Option<String>,
    pub payment_method: PaymentMethod,
}

impl SaleRequest {
    pub fn new(product_id: u64, quantity: i64, unit_price: Money, payment_method: PaymentMethod) -> Self {
        SaleRequest {
            product_id,
            quantity,
            unit_price_cents: unit_price.cents(),
            customer_name: None,
            payment_method,
        }
    }

    pub fn with_customer(mut self, name: impl Into<String>) -> Self {
        self.customer_name = Some(name.into());
        self
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn product(quantity: i64) -> Product {
        let entered = Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).unwrap();
        Product {
            id: 1,
            name: "Rice 5kg".to_string(),
            unit_price_cents: 2890,
            quantity_on_hand: quantity,
            entry_timestamp: entered,
            exit_timestamp: None,
            expiry_date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            created_at: entered,
            updated_at: entered,
        }
    }

    #[test]
    fn test_stock_value() {
        assert_eq!(product(4).stock_value().cents(), 11560);
        assert_eq!(product(0).stock_value().cents(), 0);
    }

    #[test]
    fn test_days_in_stock() {
        let mut p = product(1);
        let now = Utc.with_ymd_and_hms(2025, 1, 11, 7, 0, 0).unwrap();
        assert_eq!(p.days_in_stock(now), 9);

        p.exit_timestamp = Some(Utc.with_ymd_and_hms(2025, 1, 4, 8, 0, 0).unwrap());
        assert_eq!(p.days_in_stock(now), 3);
        assert!(p.is_sold_out());
    }

    #[test]
    fn test_can_sell() {
        let p = product(3);
        assert!(p.can_sell(3));
        assert!(!p.can_sell(4));
        assert!(!p.can_sell(0));
    }

    #[test]
    fn test_payment_method_parsing() {
        assert_eq!("cash".parse::<PaymentMethod>().unwrap(), PaymentMethod::Cash);
        assert_eq!("dinheiro".parse::<PaymentMethod>().unwrap(), PaymentMethod::Cash);
        assert_eq!("cartao".parse::<PaymentMethod>().unwrap(), PaymentMethod::Card);
        assert_eq!("PIX".parse::<PaymentMethod>().unwrap(), PaymentMethod::InstantTransfer);
        assert!("cheque".parse::<PaymentMethod>().is_err());
    }

    #[test]
    fn test_expiry_status_urgency() {
        assert!(ExpiryStatus::Expired.is_urgent());
        assert!(ExpiryStatus::Critical.is_urgent());
        assert!(!ExpiryStatus::Warning.is_urgent());
        assert!(!ExpiryStatus::Ok.is_urgent());
    }
}
