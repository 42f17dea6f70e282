//! # stockroom-core: Pure Business Logic for Stockroom
//!
//! This crate is the **heart** of Stockroom. It holds the product ledger and
//! every number the dashboard shows, as pure functions with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stockroom Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Dashboard (apps/dashboard)                   │   │
//! │  │    add_product ──► record_sale ──► get_snapshot ──► insights   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ stockroom-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │ inventory │  │  expiry   │  │  alerts   │  │  pricing  │  │   │
//! │  │   │  Product  │  │ classify  │  │ aggregate │  │ discount  │  │   │
//! │  │   │  Ledger   │  │  buckets  │  │ snapshot  │  │  blend    │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   sales   │  │   money   │  │   forms   │  │  import   │  │   │
//! │  │   │  Ledger   │  │   cents   │  │  parsing  │  │  legacy   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO WALL CLOCK • PURE FUNCTIONS         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             stockroom-narrative (AI collaborator)               │   │
//! │  │          consumes the same numbers, falls back to them          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Sale, Alert, statuses)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Field-level rules and string parsing
//! - [`expiry`] - Expiration Classifier
//! - [`alerts`] - Alert/Metrics Aggregator
//! - [`pricing`] - Discount Pricing Calculator
//! - [`inventory`] - Product Ledger
//! - [`sales`] - Sales Ledger and summaries
//! - [`forms`] - Raw user input → validated drafts
//! - [`import`] - Legacy record normalization
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::{NaiveDate, TimeZone, Utc};
//! use stockroom_core::inventory::ProductLedger;
//! use stockroom_core::types::{ExpiryStatus, ProductDraft};
//! use stockroom_core::Money;
//!
//! let today = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
//! let now = Utc.with_ymd_and_hms(2025, 1, 10, 9, 0, 0).unwrap();
//!
//! let mut ledger = ProductLedger::new();
//! ledger
//!     .add(
//!         ProductDraft::new("Milk 1L", Money::from_cents(1000), 5, today + chrono::Days::new(3)),
//!         now,
//!     )
//!     .unwrap();
//!
//! let snapshot = ledger.snapshot(today);
//! assert_eq!(snapshot.total_value.cents(), 5000);
//! assert_eq!(snapshot.alerts.len(), 1);
//! assert_eq!(snapshot.status_histogram.get(ExpiryStatus::Critical), 1);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod alerts;
pub mod error;
pub mod expiry;
pub mod forms;
pub mod import;
pub mod inventory;
pub mod money;
pub mod pricing;
pub mod sales;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Last day-count (inclusive) that still classifies as `Critical`.
///
/// Products within this window are reported as alerts.
pub const CRITICAL_WINDOW_DAYS: i64 = 7;

/// Last day-count (inclusive) that still classifies as `Warning`.
pub const WARNING_WINDOW_DAYS: i64 = 30;

/// Number of products reported in a sales summary's top list.
pub const TOP_PRODUCTS_LIMIT: usize = 5;

/// Maximum length of a product name.
pub const MAX_PRODUCT_NAME_LEN: usize = 200;

/// Maximum length of a customer name on a sale.
pub const MAX_CUSTOMER_NAME_LEN: usize = 100;

/// Highest unit price accepted, in cents ($1,000,000.00).
///
/// Together with `MAX_QUANTITY_ON_HAND` this keeps every line value and
/// stock value well inside `i64`.
pub const MAX_UNIT_PRICE_CENTS: i64 = 100_000_000;

/// Highest quantity a single product batch may hold.
pub const MAX_QUANTITY_ON_HAND: i64 = 1_000_000;
