//! # Alert/Metrics Aggregator
//!
//! Derives everything the dashboard tiles show from the product ledger.
//!
//! ## Derivation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  &[Product] + today                                                     │
//! │       │                                                                 │
//! │       ├──► classify each ──► status_histogram (all products)            │
//! │       │         │                                                       │
//! │       │         └──► days <= 7 ──► alerts (sorted: days asc, id asc)    │
//! │       │                                                                 │
//! │       └──► current stock only ──► total_value, value_at_risk            │
//! │                                                                         │
//! │  One O(n) pass per read. Nothing is cached between reads.               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! "Current stock" means products without an exit timestamp: a batch that
//! has left the shelf no longer contributes to stock value.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::expiry::{classify_product, Classification};
use crate::money::Money;
use crate::types::{Alert, AlertSeverity, ExpiryStatus, Product};

// =============================================================================
// Status Histogram
// =============================================================================

/// Product count per status bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StatusHistogram {
    pub expired: usize,
    pub critical: usize,
    pub warning: usize,
    pub ok: usize,
}

impl StatusHistogram {
    /// Count for one bucket.
    pub fn get(&self, status: ExpiryStatus) -> usize {
        match status {
            ExpiryStatus::Expired => self.expired,
            ExpiryStatus::Critical => self.critical,
            ExpiryStatus::Warning => self.warning,
            ExpiryStatus::Ok => self.ok,
        }
    }

    fn record(&mut self, status: ExpiryStatus) {
        match status {
            ExpiryStatus::Expired => self.expired += 1,
            ExpiryStatus::Critical => self.critical += 1,
            ExpiryStatus::Warning => self.warning += 1,
            ExpiryStatus::Ok => self.ok += 1,
        }
    }

    /// Sum over all buckets.
    pub fn total(&self) -> usize {
        self.expired + self.critical + self.warning + self.ok
    }
}

// =============================================================================
// Inventory Snapshot
// =============================================================================

/// Aggregated view of the ledger for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct InventorySnapshot {
    /// Expired and 7-day-window products, most urgent first.
    pub alerts: Vec<Alert>,

    /// `Σ unit_price × quantity` over current stock.
    pub total_value: Money,

    /// Always `alerts.len()`.
    pub expiring_or_low_stock_count: usize,

    /// Per-bucket product counts over the whole ledger.
    pub status_histogram: StatusHistogram,

    /// Value of current stock that is already expired.
    pub value_at_risk: Money,

    #[ts(as = "String")]
    pub generated_on: NaiveDate,
}

impl InventorySnapshot {
    /// The `n` most urgent alerts.
    pub fn top_urgent(&self, n: usize) -> &[Alert] {
        &self.alerts[..n.min(self.alerts.len())]
    }
}

// =============================================================================
// Aggregation
// =============================================================================

/// Computes the full snapshot in one pass over `products`.
///
/// ## Example
/// ```rust
/// use chrono::{NaiveDate, TimeZone, Utc};
/// use stockroom_core::alerts::aggregate;
/// use stockroom_core::inventory::ProductLedger;
/// use stockroom_core::{Money, ProductDraft};
///
/// let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
/// let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
/// let far = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
///
/// let mut ledger = ProductLedger::new();
/// ledger.add(ProductDraft::new("Beans", Money::from_cents(1000), 5, far), now).unwrap();
/// ledger.add(ProductDraft::new("Salt", Money::from_cents(250), 4, far), now).unwrap();
///
/// let snapshot = aggregate(ledger.products(), today);
/// assert_eq!(snapshot.total_value, Money::from_cents(6000));
/// assert!(snapshot.alerts.is_empty());
/// ```
pub fn aggregate(products: &[Product], today: NaiveDate) -> InventorySnapshot {
    let mut histogram = StatusHistogram::default();
    let mut urgent: Vec<(&Product, Classification)> = Vec::new();
    let mut total_value = Money::zero();
    let mut value_at_risk = Money::zero();

    for product in products {
        let classification = classify_product(product, today);
        histogram.record(classification.status);

        if classification.status.is_urgent() {
            urgent.push((product, classification));
        }

        if !product.is_sold_out() {
            total_value += product.stock_value();
            if classification.status == ExpiryStatus::Expired {
                value_at_risk += product.stock_value();
            }
        }
    }

    urgent.sort_by_key(|(product, c)| (c.days_until_expiry, product.id));

    let alerts: Vec<Alert> = urgent
        .into_iter()
        .map(|(product, c)| build_alert(product, c, today))
        .collect();

    InventorySnapshot {
        expiring_or_low_stock_count: alerts.len(),
        alerts,
        total_value,
        status_histogram: histogram,
        value_at_risk,
        generated_on: today,
    }
}

/// Alert list only (same ordering as [`aggregate`]).
pub fn alerts(products: &[Product], today: NaiveDate) -> Vec<Alert> {
    aggregate(products, today).alerts
}

/// Value of current stock.
pub fn total_value(products: &[Product]) -> Money {
    products
        .iter()
        .filter(|p| !p.is_sold_out())
        .map(Product::stock_value)
        .sum()
}

/// Histogram only.
pub fn status_histogram(products: &[Product], today: NaiveDate) -> StatusHistogram {
    let mut histogram = StatusHistogram::default();
    for product in products {
        histogram.record(classify_product(product, today).status);
    }
    histogram
}

fn build_alert(product: &Product, classification: Classification, today: NaiveDate) -> Alert {
    let (severity, message) = if classification.status == ExpiryStatus::Expired {
        (
            AlertSeverity::Critical,
            format!(
                "Product expired: {} (expired on {})",
                product.name,
                product.expiry_date.format("%Y-%m-%d")
            ),
        )
    } else {
        (
            AlertSeverity::Warning,
            format!(
                "Product nearing expiry: {} (expires in {} days)",
                product.name, classification.days_until_expiry
            ),
        )
    };

    Alert {
        product_id: product.id,
        product_name: product.name.clone(),
        message,
        severity,
        days_until_expiry: classification.days_until_expiry,
        expiry_date: product.expiry_date,
        generated_on: today,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Days, TimeZone, Utc};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 16).unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 16, 10, 0, 0).unwrap()
    }

    fn product(id: u64, name: &str, price_cents: i64, qty: i64, days: i64) -> Product {
        let expiry_date = if days >= 0 {
            today() + Days::new(days as u64)
        } else {
            today() - Days::new(days.unsigned_abs())
        };
        Product {
            id,
            name: name.to_string(),
            unit_price_cents: price_cents,
            quantity_on_hand: qty,
            entry_timestamp: now(),
            exit_timestamp: None,
            expiry_date,
            created_at: now(),
            updated_at: now(),
        }
    }

    #[test]
    fn test_total_value_example() {
        let products = vec![
            product(1, "A", 1000, 5, 100),
            product(2, "B", 250, 4, 100),
        ];
        let snapshot = aggregate(&products, today());
        assert_eq!(snapshot.total_value.cents(), 6000);
        assert_eq!(total_value(&products).cents(), 6000);
    }

    #[test]
    fn test_sold_out_batches_excluded_from_value() {
        let mut sold = product(2, "B", 250, 4, 100);
        sold.exit_timestamp = Some(now());
        let products = vec![product(1, "A", 1000, 5, 100), sold];

        let snapshot = aggregate(&products, today());
        assert_eq!(snapshot.total_value.cents(), 5000);
        // Still counted in the histogram
        assert_eq!(snapshot.status_histogram.total(), 2);
    }

    #[test]
    fn test_alert_ordering_and_severity() {
        let products = vec![
            product(1, "Cheese", 900, 1, 5),
            product(2, "Milk", 580, 2, -1),
            product(3, "Bread", 1020, 3, 5),
            product(4, "Rice", 2890, 1, 8),
            product(5, "Yogurt", 300, 6, 0),
        ];

        let snapshot = aggregate(&products, today());
        let ids: Vec<u64> = snapshot.alerts.iter().map(|a| a.product_id).collect();
        assert_eq!(ids, vec![2, 5, 1, 3]);
        assert_eq!(snapshot.expiring_or_low_stock_count, 4);

        assert_eq!(snapshot.alerts[0].severity, AlertSeverity::Critical);
        assert_eq!(snapshot.alerts[1].severity, AlertSeverity::Critical);
        assert_eq!(snapshot.alerts[2].severity, AlertSeverity::Warning);
    }

    #[test]
    fn test_alert_messages() {
        let products = vec![product(1, "Milk", 580, 2, -1), product(2, "Cheese", 900, 1, 5)];
        let alerts = alerts(&products, today());

        assert_eq!(alerts[0].message, "Product expired: Milk (expired on 2025-01-15)");
        assert_eq!(
            alerts[1].message,
            "Product nearing expiry: Cheese (expires in 5 days)"
        );
        assert_eq!(alerts[0].generated_on, today());
    }

    #[test]
    fn test_histogram_covers_every_product() {
        let products = vec![
            product(1, "A", 100, 1, -3),
            product(2, "B", 100, 1, 3),
            product(3, "C", 100, 1, 20),
            product(4, "D", 100, 1, 200),
            product(5, "E", 100, 1, 400),
        ];

        let histogram = status_histogram(&products, today());
        assert_eq!(histogram.get(ExpiryStatus::Expired), 1);
        assert_eq!(histogram.get(ExpiryStatus::Critical), 1);
        assert_eq!(histogram.get(ExpiryStatus::Warning), 1);
        assert_eq!(histogram.get(ExpiryStatus::Ok), 2);
        assert_eq!(histogram, aggregate(&products, today()).status_histogram);
    }

    #[test]
    fn test_value_at_risk() {
        let products = vec![product(1, "Milk", 580, 2, -1), product(2, "Rice", 2890, 1, 90)];
        let snapshot = aggregate(&products, today());
        assert_eq!(snapshot.value_at_risk.cents(), 1160);
    }

    #[test]
    fn test_top_urgent() {
        let products = vec![product(1, "A", 100, 1, 1), product(2, "B", 100, 1, 2)];
        let snapshot = aggregate(&products, today());
        assert_eq!(snapshot.top_urgent(1).len(), 1);
        assert_eq!(snapshot.top_urgent(10).len(), 2);
    }

    #[test]
    fn test_empty_ledger() {
        let snapshot = aggregate(&[], today());
        assert!(snapshot.alerts.is_empty());
        assert!(snapshot.total_value.is_zero());
        assert_eq!(snapshot.status_histogram.total(), 0);
    }

    #[test]
    fn test_idempotent() {
        let products = vec![product(1, "A", 100, 1, 1), product(2, "B", 100, 1, 60)];
        assert_eq!(aggregate(&products, today()), aggregate(&products, today()));
    }
}
