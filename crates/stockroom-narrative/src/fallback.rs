//! # Rule-Based Fallbacks
//!
//! Deterministic answers built from the core computations. The advisor
//! serves these whenever the narrative service is off or fails.
//!
//! ```text
//! inventory_fallback ── alerts::aggregate ──────────────► InventoryAnalysis
//! pricing_fallback   ── pricing::suggest_discount
//!                       pricing::classify_strategy ─────► PricingSuggestion
//! sales_fallback     ── sales::summarize ───────────────► SalesAnalysis
//! ```

use stockroom_core::alerts::aggregate;
use stockroom_core::pricing::{classify_strategy, suggest_discount, suggested_price, PricingStrategy};
use stockroom_core::sales::summarize;
use stockroom_core::{AlertSeverity, Money};

use crate::contract::{
    AlertKind, InventoryAnalysis, InventoryMetrics, InventoryRequest, NarrativeAlert,
    PricingRequest, PricingSuggestion, SalesAnalysis, SalesForecast, SalesMetrics, SalesRequest,
    Trend,
};

/// Batches with fewer units than this count as low stock.
pub const LOW_STOCK_THRESHOLD: i64 = 10;

/// Next-week revenue estimate as a share of revenue so far.
pub const NEXT_WEEK_PERCENT: u32 = 25;

/// Next-month revenue estimate as a share of revenue so far.
pub const NEXT_MONTH_PERCENT: u32 = 110;

/// Confidence reported for rule-based forecasts.
pub const FALLBACK_CONFIDENCE_PERCENT: u8 = 75;

// =============================================================================
// Inventory
// =============================================================================

pub fn inventory_fallback(request: &InventoryRequest) -> InventoryAnalysis {
    let snapshot = aggregate(&request.products, request.today);
    let histogram = snapshot.status_histogram;

    let low_stock = request
        .products
        .iter()
        .filter(|p| !p.is_sold_out() && p.quantity_on_hand < LOW_STOCK_THRESHOLD)
        .count();

    let metrics = InventoryMetrics {
        expired: histogram.expired,
        critical: histogram.critical,
        warning: histogram.warning,
        low_stock,
    };

    let mut alerts = Vec::new();

    if metrics.expired > 0 {
        let names: Vec<&str> = snapshot
            .alerts
            .iter()
            .filter(|a| a.severity == AlertSeverity::Critical)
            .map(|a| a.product_name.as_str())
            .collect();
        alerts.push(NarrativeAlert {
            kind: AlertKind::Critical,
            title: format!("{} product(s) expired", metrics.expired),
            message: names.join(", "),
            action: "Remove from stock".to_string(),
        });
    }

    if metrics.critical > 0 {
        alerts.push(NarrativeAlert {
            kind: AlertKind::Warning,
            title: format!("{} product(s) expiring within 7 days", metrics.critical),
            message: "Sell these batches first".to_string(),
            action: "Mark down or promote".to_string(),
        });
    }

    if metrics.warning > 0 {
        alerts.push(NarrativeAlert {
            kind: AlertKind::Notice,
            title: format!("{} product(s) expiring within 30 days", metrics.warning),
            message: "Keep an eye on turnover".to_string(),
            action: "Plan promotions".to_string(),
        });
    }

    if metrics.low_stock > 0 {
        alerts.push(NarrativeAlert {
            kind: AlertKind::Notice,
            title: format!("{} product(s) low on stock", metrics.low_stock),
            message: format!("Fewer than {} units left", LOW_STOCK_THRESHOLD),
            action: "Reorder".to_string(),
        });
    }

    let summary = if request.products.is_empty() {
        "No products in stock.".to_string()
    } else {
        format!(
            "{} products analyzed: {} expired, {} expiring within 7 days, {} within 30 days. Stock value {}.",
            histogram.total(),
            metrics.expired,
            metrics.critical,
            metrics.warning,
            snapshot.total_value
        )
    };

    InventoryAnalysis {
        summary,
        alerts,
        metrics,
        value_at_risk: snapshot.value_at_risk,
    }
}

// =============================================================================
// Pricing
// =============================================================================

pub fn pricing_fallback(request: &PricingRequest) -> PricingSuggestion {
    let advice = classify_strategy(request.days_until_expiry, request.quantity_on_hand);

    let percent = if advice.strategy == PricingStrategy::Normal {
        0
    } else {
        suggest_discount(request.days_until_expiry, request.quantity_on_hand)
    };
    let suggested = suggested_price(request.current_price, percent, request.cost_price);

    let estimated_impact = if suggested == request.current_price {
        "No change expected"
    } else {
        "Faster turnover before expiry at a lower margin"
    };

    PricingSuggestion {
        current_price: request.current_price,
        suggested_price: suggested,
        strategy: advice.strategy,
        reason: advice.reason.to_string(),
        estimated_impact: estimated_impact.to_string(),
        discount_percent: effective_discount(request.current_price, suggested),
        urgency: advice.urgency,
    }
}

/// Discount actually applied once the cost floor is taken into account,
/// to one decimal place.
fn effective_discount(current: Money, suggested: Money) -> f64 {
    if current.cents() <= 0 {
        return 0.0;
    }
    let percent = (current - suggested).cents() as f64 * 100.0 / current.cents() as f64;
    (percent * 10.0).round() / 10.0
}

// =============================================================================
// Sales
// =============================================================================

pub fn sales_fallback(request: &SalesRequest) -> SalesAnalysis {
    let summary = summarize(&request.sales);
    let units_sold: i64 = request.sales.iter().map(|s| s.quantity).sum();

    let text = match summary.top_products.first() {
        None => "No sales recorded yet.".to_string(),
        Some(best) => format!(
            "{} sales totaling {}, average ticket {}. Best seller: {} ({} units).",
            summary.total_sales, summary.total_revenue, summary.average_ticket, best.name, best.units_sold
        ),
    };

    SalesAnalysis {
        summary: text,
        metrics: SalesMetrics {
            total_sales: summary.total_sales,
            units_sold,
            total_revenue: summary.total_revenue,
            average_ticket: summary.average_ticket,
        },
        forecast: SalesForecast {
            next_week: summary.total_revenue.percent_of(NEXT_WEEK_PERCENT),
            next_month: summary.total_revenue.percent_of(NEXT_MONTH_PERCENT),
            trend: Trend::Stable,
            confidence_percent: FALLBACK_CONFIDENCE_PERCENT,
        },
        top_products: summary.top_products,
    }
}
