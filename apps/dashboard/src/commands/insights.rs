//! # Insight Commands
//!
//! Narrative panels. These never fail because of the narrative service:
//! when it is off or misbehaves the advisor answers with an estimate, and
//! the response says so through its `provenance`.

use chrono::Duration;
use tracing::debug;

use stockroom_narrative::{
    InventoryAnalysis, InventoryRequest, Narrative, PricingRequest, PricingSuggestion,
    SalesAnalysis, SalesRequest,
};

use crate::commands::product::parse_cost_price;
use crate::error::{ApiError, ApiResult};
use crate::state::Dashboard;

/// Window used for the "recent sales" figure sent with pricing requests.
pub const RECENT_SALES_DAYS: i64 = 30;

pub async fn inventory_insights(dashboard: &Dashboard) -> Narrative<InventoryAnalysis> {
    let request = InventoryRequest::new(dashboard.products.products(), dashboard.today());
    let narrative = dashboard.advisor.inventory_insights(&request).await;
    debug!(provenance = ?narrative.provenance, "inventory_insights command");
    narrative
}

/// Pricing advice for one product. `cost_price` is the raw form value.
pub async fn pricing_insights(
    dashboard: &Dashboard,
    product_id: u64,
    cost_price: Option<&str>,
) -> ApiResult<Narrative<PricingSuggestion>> {
    let cost_floor = parse_cost_price(cost_price)?;
    let product = dashboard
        .products
        .get(product_id)
        .ok_or_else(|| ApiError::not_found("Product", product_id))?;

    let now = dashboard.now();
    let recent_units: i64 = dashboard
        .sales
        .between(now - Duration::days(RECENT_SALES_DAYS), now)
        .into_iter()
        .filter(|s| s.product_id == product_id)
        .map(|s| s.quantity)
        .sum();

    let request = PricingRequest::for_product(product, dashboard.today(), cost_floor)
        .with_recent_sales(recent_units);
    let narrative = dashboard.advisor.pricing_insights(&request).await;
    debug!(product_id, provenance = ?narrative.provenance, "pricing_insights command");
    Ok(narrative)
}

pub async fn sales_insights(dashboard: &Dashboard) -> Narrative<SalesAnalysis> {
    let request = SalesRequest::new(dashboard.sales.sales(), dashboard.today());
    let narrative = dashboard.advisor.sales_insights(&request).await;
    debug!(provenance = ?narrative.provenance, "sales_insights command");
    narrative
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::product::add_product;
    use crate::commands::sale::record_sale;
    use crate::config::DashboardConfig;
    use crate::error::ErrorCode;
    use crate::state::BoxedNarrative;
    use chrono::{TimeZone, Utc};
    use std::sync::{Arc, Mutex};
    use stockroom_core::forms::{ProductForm, SaleForm};
    use stockroom_core::pricing::PricingStrategy;
    use stockroom_core::Money;
    use stockroom_narrative::{NarrativeError, NarrativeResult, NarrativeService, Provenance};

    /// Records the pricing requests it sees and always fails.
    #[derive(Default)]
    struct RecordingService {
        seen: Arc<Mutex<Vec<PricingRequest>>>,
    }

    #[async_trait::async_trait]
    impl NarrativeService for RecordingService {
        async fn analyze_inventory(&self, _: &InventoryRequest) -> NarrativeResult<InventoryAnalysis> {
            Err(NarrativeError::GenerationFailed("offline".into()))
        }

        async fn suggest_pricing(&self, request: &PricingRequest) -> NarrativeResult<PricingSuggestion> {
            if let Ok(mut seen) = self.seen.lock() {
                seen.push(request.clone());
            }
            Err(NarrativeError::GenerationFailed("offline".into()))
        }

        async fn analyze_sales(&self, _: &SalesRequest) -> NarrativeResult<SalesAnalysis> {
            Err(NarrativeError::GenerationFailed("offline".into()))
        }
    }

    fn seeded(service: BoxedNarrative) -> Dashboard {
        let mut dashboard = Dashboard::with_service(DashboardConfig::default(), service);
        dashboard.pin_clock(Utc.with_ymd_and_hms(2025, 1, 16, 10, 0, 0).unwrap());

        add_product(
            &mut dashboard,
            ProductForm {
                name: "Yogurt".to_string(),
                unit_price: "3.50".to_string(),
                quantity_on_hand: "20".to_string(),
                expiry_date: "2025-01-18".to_string(),
                ..Default::default()
            },
        )
        .unwrap();
        record_sale(
            &mut dashboard,
            SaleForm {
                product_id: 1,
                quantity: "4".to_string(),
                payment_method: "card".to_string(),
                ..Default::default()
            },
        )
        .unwrap();
        dashboard
    }

    #[tokio::test]
    async fn test_insights_fall_back_when_disabled() {
        let dashboard = seeded(Box::new(stockroom_narrative::DisabledNarrative));

        let inventory = inventory_insights(&dashboard).await;
        assert_eq!(inventory.provenance, Provenance::Estimated);
        assert_eq!(inventory.body.metrics.critical, 1);

        let sales = sales_insights(&dashboard).await;
        assert_eq!(sales.body.metrics.total_revenue, Money::from_cents(1400));
    }

    #[tokio::test]
    async fn test_pricing_insights_sends_recent_sales() {
        let service = RecordingService::default();
        let seen = Arc::clone(&service.seen);
        let dashboard = seeded(Box::new(service));

        let narrative = pricing_insights(&dashboard, 1, Some("2,00")).await.unwrap();
        assert_eq!(narrative.provenance, Provenance::Estimated);
        assert_eq!(narrative.body.strategy, PricingStrategy::Urgent);
        assert!(narrative.body.suggested_price >= Money::from_cents(200));

        let seen = seen.lock().unwrap();
        assert_eq!(seen[0].units_sold_last_30_days, Some(4));
        assert_eq!(seen[0].quantity_on_hand, 16);
        assert_eq!(seen[0].cost_price, Some(Money::from_cents(200)));
    }

    #[tokio::test]
    async fn test_pricing_insights_unknown_product() {
        let dashboard = seeded(Box::new(stockroom_narrative::DisabledNarrative));
        let err = pricing_insights(&dashboard, 42, None).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
