//! # Narrative Contract
//!
//! Request and response shapes exchanged with the generative text service.
//!
//! ## Message Flow
//! ```text
//! ┌──────────────────┐   InventoryRequest   ┌──────────────────────────┐
//! │                  │ ───────────────────► │                          │
//! │  NarrativeAdvisor│   PricingRequest     │  NarrativeService        │
//! │                  │ ───────────────────► │  (HTTP or fallback)      │
//! │                  │   SalesRequest       │                          │
//! │                  │ ───────────────────► │                          │
//! │                  │ ◄─────────────────── │  InventoryAnalysis       │
//! │                  │                      │  PricingSuggestion       │
//! │                  │                      │  SalesAnalysis           │
//! └──────────────────┘                      └──────────────────────────┘
//! ```
//!
//! Every amount on the wire is an integer number of cents, the same as
//! [`Money`] everywhere else. Field names are camelCase.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use stockroom_core::expiry::days_until_expiry;
use stockroom_core::pricing::{PricingStrategy, Urgency};
use stockroom_core::sales::TopProduct;
use stockroom_core::{Money, Product, Sale};

// =============================================================================
// Task
// =============================================================================

/// What the service is asked to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NarrativeTask {
    InventoryAnalysis,
    PricingSuggestion,
    SalesAnalysis,
}

impl fmt::Display for NarrativeTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NarrativeTask::InventoryAnalysis => write!(f, "inventory_analysis"),
            NarrativeTask::PricingSuggestion => write!(f, "pricing_suggestion"),
            NarrativeTask::SalesAnalysis => write!(f, "sales_analysis"),
        }
    }
}

// =============================================================================
// Inventory Analysis
// =============================================================================

/// Products to analyze, as of `today`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryRequest {
    pub today: NaiveDate,
    pub products: Vec<Product>,
}

impl InventoryRequest {
    pub fn new(products: &[Product], today: NaiveDate) -> Self {
        InventoryRequest {
            today,
            products: products.to_vec(),
        }
    }
}

/// Alert category in a generated analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    /// Expired stock.
    Critical,
    /// Expires within 7 days.
    Warning,
    /// Expires within 30 days, or low stock.
    Notice,
    /// General remark.
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrativeAlert {
    pub kind: AlertKind,
    pub title: String,
    pub message: String,
    pub action: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryMetrics {
    pub expired: usize,
    pub critical: usize,
    pub warning: usize,
    pub low_stock: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryAnalysis {
    pub summary: String,
    #[serde(default)]
    pub alerts: Vec<NarrativeAlert>,
    #[serde(default)]
    pub metrics: InventoryMetrics,
    #[serde(default)]
    pub value_at_risk: Money,
}

// =============================================================================
// Pricing Suggestion
// =============================================================================

/// One product to price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingRequest {
    pub product_id: u64,
    pub product_name: String,
    pub current_price: Money,
    /// Unit cost; the suggestion never goes below it.
    pub cost_price: Option<Money>,
    pub quantity_on_hand: i64,
    pub days_until_expiry: i64,
    pub units_sold_last_30_days: Option<i64>,
    #[serde(default)]
    pub competitor_prices: Vec<Money>,
}

impl PricingRequest {
    /// Builds a request from a ledger product.
    pub fn for_product(product: &Product, today: NaiveDate, cost_price: Option<Money>) -> Self {
        PricingRequest {
            product_id: product.id,
            product_name: product.name.clone(),
            current_price: product.unit_price(),
            cost_price,
            quantity_on_hand: product.quantity_on_hand,
            days_until_expiry: days_until_expiry(product.expiry_date, today),
            units_sold_last_30_days: None,
            competitor_prices: Vec::new(),
        }
    }

    pub fn with_recent_sales(mut self, units: i64) -> Self {
        self.units_sold_last_30_days = Some(units);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingSuggestion {
    /// Filled from the request, whatever the service answers.
    #[serde(default)]
    pub current_price: Money,
    pub suggested_price: Money,
    pub strategy: PricingStrategy,
    pub reason: String,
    #[serde(default)]
    pub estimated_impact: String,
    /// May carry a fraction when generated.
    pub discount_percent: f64,
    pub urgency: Urgency,
}

// =============================================================================
// Sales Analysis
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesRequest {
    pub today: NaiveDate,
    pub sales: Vec<Sale>,
}

impl SalesRequest {
    pub fn new(sales: &[Sale], today: NaiveDate) -> Self {
        SalesRequest {
            today,
            sales: sales.to_vec(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesMetrics {
    pub total_sales: usize,
    pub units_sold: i64,
    pub total_revenue: Money,
    pub average_ticket: Money,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Rising,
    #[default]
    Stable,
    Falling,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesForecast {
    pub next_week: Money,
    pub next_month: Money,
    pub trend: Trend,
    /// 0-100.
    pub confidence_percent: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesAnalysis {
    pub summary: String,
    #[serde(default)]
    pub metrics: SalesMetrics,
    #[serde(default)]
    pub top_products: Vec<TopProduct>,
    #[serde(default)]
    pub forecast: SalesForecast,
}
