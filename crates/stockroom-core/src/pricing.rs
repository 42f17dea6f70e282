//! # Discount Pricing Calculator
//!
//! Suggests a markdown for a batch from how soon it expires and how much of
//! it is left.
//!
//! ## Algorithm
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  urgency factor (days until expiry)       stock factor (quantity)       │
//! │                                                                         │
//! │  1.0 ┤────╮                              1.0 ┤─╮                        │
//! │      │     ╲                                 │  ╲                       │
//! │  0.0 ┤      ╲─────────                   0.0 ┤   ╲────────              │
//! │      └──┬────────┬────                       └─┬──────┬─────            │
//! │        15       120  days                      5     100  units         │
//! │                                                                         │
//! │  weighted = 0.7 × urgency + 0.3 × stock                                 │
//! │  discount = clamp(round(5 + 25 × weighted), 5, 30)   (whole percent)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Expiry dominates 70/30: spoilage costs more than a slow-moving shelf.
//! Every function here is total; there are no error cases.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::expiry::days_until_expiry;
use crate::money::Money;
use crate::types::Product;

/// At or below this many days the urgency factor is 1.0.
pub const FULL_URGENCY_DAYS: i64 = 15;
/// At or beyond this many days the urgency factor is 0.0.
pub const NO_URGENCY_DAYS: i64 = 120;
/// At or below this quantity the stock factor is 1.0.
pub const FULL_STOCK_QUANTITY: i64 = 5;
/// At or beyond this quantity the stock factor is 0.0.
pub const NO_STOCK_QUANTITY: i64 = 100;

/// Share of the urgency factor in the weighted discount signal.
pub const URGENCY_WEIGHT: f64 = 0.7;
/// Share of the stock factor in the weighted discount signal.
pub const STOCK_WEIGHT: f64 = 0.3;

/// Smallest suggested discount, in percent.
pub const MIN_DISCOUNT_PERCENT: u32 = 5;
/// Largest suggested discount, in percent.
pub const MAX_DISCOUNT_PERCENT: u32 = 30;

// =============================================================================
// Factors
// =============================================================================

/// 1.0 at or below `full`, 0.0 at or beyond `none`, linear in between.
fn linear_decay(value: i64, full: i64, none: i64) -> f64 {
    if value <= full {
        1.0
    } else if value >= none {
        0.0
    } else {
        let factor = (none - value) as f64 / (none - full) as f64;
        factor.clamp(0.0, 1.0)
    }
}

/// Expiry urgency signal in `[0, 1]`.
pub fn urgency_factor(days_until_expiry: i64) -> f64 {
    linear_decay(days_until_expiry, FULL_URGENCY_DAYS, NO_URGENCY_DAYS)
}

/// Low-stock signal in `[0, 1]`.
pub fn stock_factor(quantity_on_hand: i64) -> f64 {
    linear_decay(quantity_on_hand, FULL_STOCK_QUANTITY, NO_STOCK_QUANTITY)
}

/// Suggested discount in whole percent, always within `[5, 30]`.
///
/// ## Example
/// ```rust
/// use stockroom_core::pricing::suggest_discount;
///
/// assert_eq!(suggest_discount(15, 5), 30);
/// assert_eq!(suggest_discount(120, 100), 5);
/// ```
pub fn suggest_discount(days_until_expiry: i64, quantity_on_hand: i64) -> u32 {
    let weighted = URGENCY_WEIGHT * urgency_factor(days_until_expiry)
        + STOCK_WEIGHT * stock_factor(quantity_on_hand);
    let raw = (MIN_DISCOUNT_PERCENT as f64
        + (MAX_DISCOUNT_PERCENT - MIN_DISCOUNT_PERCENT) as f64 * weighted)
        .round() as i64;
    raw.clamp(MIN_DISCOUNT_PERCENT as i64, MAX_DISCOUNT_PERCENT as i64) as u32
}

/// Applies `discount_percent` to `current_price`, rounded to the cent, and
/// never below `cost_floor` when one is given.
pub fn suggested_price(current_price: Money, discount_percent: u32, cost_floor: Option<Money>) -> Money {
    let discounted = current_price.apply_percentage_discount(discount_percent);
    match cost_floor {
        Some(floor) => discounted.max(floor),
        None => discounted,
    }
}

// =============================================================================
// Per-product suggestion
// =============================================================================

/// Discount suggestion for one product, with the inputs that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DiscountSuggestion {
    pub product_id: u64,
    pub days_until_expiry: i64,
    pub quantity_on_hand: i64,
    pub urgency_factor: f64,
    pub stock_factor: f64,
    pub discount_percent: u32,
    pub current_price: Money,
    pub suggested_price: Money,
}

/// Builds the discount suggestion for `product` as of `today`.
pub fn suggest_for_product(
    product: &Product,
    today: NaiveDate,
    cost_floor: Option<Money>,
) -> DiscountSuggestion {
    let days = days_until_expiry(product.expiry_date, today);
    let discount = suggest_discount(days, product.quantity_on_hand);

    DiscountSuggestion {
        product_id: product.id,
        days_until_expiry: days,
        quantity_on_hand: product.quantity_on_hand,
        urgency_factor: urgency_factor(days),
        stock_factor: stock_factor(product.quantity_on_hand),
        discount_percent: discount,
        current_price: product.unit_price(),
        suggested_price: suggested_price(product.unit_price(), discount, cost_floor),
    }
}

// =============================================================================
// Strategy classification
// =============================================================================

/// Pricing strategy label shown next to a suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum PricingStrategy {
    Urgent,
    Promotional,
    Competitive,
    Premium,
    Normal,
}

/// How soon the price change should happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Urgency {
    Low,
    Medium,
    High,
}

/// Rule-based strategy for a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrategyAdvice {
    pub strategy: PricingStrategy,
    pub urgency: Urgency,
    pub reason: &'static str,
}

/// Quantity above which a batch counts as overstocked.
pub const OVERSTOCK_QUANTITY: i64 = 100;

/// Picks a strategy from the expiry window first, then stock level.
///
/// ```text
/// days <= 3    → Urgent      / High
/// days <= 7    → Promotional / High
/// days <= 30   → Promotional / Medium
/// qty  > 100   → Promotional / Medium
/// otherwise    → Normal      / Low
/// ```
pub fn classify_strategy(days_until_expiry: i64, quantity_on_hand: i64) -> StrategyAdvice {
    if days_until_expiry <= 3 {
        StrategyAdvice {
            strategy: PricingStrategy::Urgent,
            urgency: Urgency::High,
            reason: "Expiry is imminent: mark down now to avoid a total loss",
        }
    } else if days_until_expiry <= 7 {
        StrategyAdvice {
            strategy: PricingStrategy::Promotional,
            urgency: Urgency::High,
            reason: "Expires within a week: run a promotion to speed up sales",
        }
    } else if days_until_expiry <= 30 {
        StrategyAdvice {
            strategy: PricingStrategy::Promotional,
            urgency: Urgency::Medium,
            reason: "Expires within a month: a small preventive discount",
        }
    } else if quantity_on_hand > OVERSTOCK_QUANTITY {
        StrategyAdvice {
            strategy: PricingStrategy::Promotional,
            urgency: Urgency::Medium,
            reason: "High stock level: encourage turnover",
        }
    } else {
        StrategyAdvice {
            strategy: PricingStrategy::Normal,
            urgency: Urgency::Low,
            reason: "Price kept",
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
