//! # Narrative Advisor
//!
//! Wraps a [`NarrativeService`] so the dashboard always gets an answer.
//!
//! ## Fallback Discipline
//! ```text
//!   request
//!      │
//!      ▼
//! ┌───────────────────────────┐   Ok(body)    ┌────────────────────────────┐
//! │ timeout(service.call(..)) │ ────────────► │ Narrative { Generated, .. }│
//! └─────────────┬─────────────┘               └────────────────────────────┘
//!               │ Err(_) / elapsed
//!               ▼
//!        warn!(task, error)
//!               │
//!               ▼
//! ┌───────────────────────────┐               ┌────────────────────────────┐
//! │ fallback::*(request)      │ ────────────► │ Narrative { Estimated, .. }│
//! └───────────────────────────┘               └────────────────────────────┘
//! ```

use serde::Serialize;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

use crate::contract::{
    InventoryAnalysis, InventoryRequest, NarrativeTask, PricingRequest, PricingSuggestion,
    SalesAnalysis, SalesRequest,
};
use crate::error::{NarrativeError, NarrativeResult};
use crate::fallback::{inventory_fallback, pricing_fallback, sales_fallback};
use crate::service::NarrativeService;

/// Where a narrative came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Produced by the narrative service.
    Generated,
    /// Rule-based fallback.
    Estimated,
}

/// A narrative body tagged with its provenance.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Narrative<T> {
    pub provenance: Provenance,
    pub body: T,
}

impl<T> Narrative<T> {
    pub fn is_generated(&self) -> bool {
        self.provenance == Provenance::Generated
    }
}

pub struct NarrativeAdvisor<S> {
    service: S,
    timeout: Duration,
}

impl<S: NarrativeService> NarrativeAdvisor<S> {
    pub fn new(service: S, timeout: Duration) -> Self {
        NarrativeAdvisor { service, timeout }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn inventory_insights(&self, request: &InventoryRequest) -> Narrative<InventoryAnalysis> {
        let outcome = self.bounded(self.service.analyze_inventory(request)).await;
        resolve(NarrativeTask::InventoryAnalysis, outcome, || inventory_fallback(request))
    }

    pub async fn pricing_insights(&self, request: &PricingRequest) -> Narrative<PricingSuggestion> {
        let outcome = self.bounded(self.service.suggest_pricing(request)).await;
        let mut narrative = resolve(NarrativeTask::PricingSuggestion, outcome, || pricing_fallback(request));
        narrative.body.current_price = request.current_price;
        narrative
    }

    pub async fn sales_insights(&self, request: &SalesRequest) -> Narrative<SalesAnalysis> {
        let outcome = self.bounded(self.service.analyze_sales(request)).await;
        resolve(NarrativeTask::SalesAnalysis, outcome, || sales_fallback(request))
    }

    async fn bounded<T, F>(&self, call: F) -> NarrativeResult<T>
    where
        F: Future<Output = NarrativeResult<T>>,
    {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(NarrativeError::Timeout(self.timeout.as_secs())),
        }
    }
}

fn resolve<T>(
    task: NarrativeTask,
    outcome: NarrativeResult<T>,
    fallback: impl FnOnce() -> T,
) -> Narrative<T> {
    match outcome {
        Ok(body) => {
            debug!(%task, "Using generated narrative");
            Narrative {
                provenance: Provenance::Generated,
                body,
            }
        }
        Err(NarrativeError::Disabled) => Narrative {
            provenance: Provenance::Estimated,
            body: fallback(),
        },
        Err(e) => {
            warn!(%task, error = %e, "Narrative generation failed, using estimate");
            Narrative {
                provenance: Provenance::Estimated,
                body: fallback(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::{InventoryMetrics, Trend};
    use crate::service::DisabledNarrative;
    use async_trait::async_trait;
    use chrono::{NaiveDate, TimeZone, Utc};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use stockroom_core::pricing::{PricingStrategy, Urgency};
    use stockroom_core::{Money, Product};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 16).unwrap()
    }

    fn product() -> Product {
        let at = Utc.with_ymd_and_hms(2025, 1, 10, 8, 0, 0).unwrap();
        Product {
            id: 1,
            name: "Fresh Cheese".to_string(),
            unit_price_cents: 1590,
            quantity_on_hand: 8,
            entry_timestamp: at,
            exit_timestamp: None,
            expiry_date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            created_at: at,
            updated_at: at,
        }
    }

    struct FailingService;

    #[async_trait]
    impl NarrativeService for FailingService {
        async fn analyze_inventory(&self, _: &InventoryRequest) -> NarrativeResult<InventoryAnalysis> {
            Err(NarrativeError::GenerationFailed("connection refused".into()))
        }

        async fn suggest_pricing(&self, _: &PricingRequest) -> NarrativeResult<PricingSuggestion> {
            Err(NarrativeError::MalformedResponse("not json".into()))
        }

        async fn analyze_sales(&self, _: &SalesRequest) -> NarrativeResult<SalesAnalysis> {
            Err(NarrativeError::GenerationFailed("503".into()))
        }
    }

    struct SlowService;

    #[async_trait]
    impl NarrativeService for SlowService {
        async fn analyze_inventory(&self, _: &InventoryRequest) -> NarrativeResult<InventoryAnalysis> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Err(NarrativeError::GenerationFailed("unreachable".into()))
        }

        async fn suggest_pricing(&self, _: &PricingRequest) -> NarrativeResult<PricingSuggestion> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Err(NarrativeError::GenerationFailed("unreachable".into()))
        }

        async fn analyze_sales(&self, _: &SalesRequest) -> NarrativeResult<SalesAnalysis> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Err(NarrativeError::GenerationFailed("unreachable".into()))
        }
    }

    #[derive(Default)]
    struct ScriptedService {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl NarrativeService for ScriptedService {
        async fn analyze_inventory(&self, _: &InventoryRequest) -> NarrativeResult<InventoryAnalysis> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(InventoryAnalysis {
                summary: "One batch needs attention".to_string(),
                alerts: Vec::new(),
                metrics: InventoryMetrics {
                    expired: 1,
                    ..InventoryMetrics::default()
                },
                value_at_risk: Money::from_cents(12720),
            })
        }

        async fn suggest_pricing(&self, _: &PricingRequest) -> NarrativeResult<PricingSuggestion> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(PricingSuggestion {
                current_price: Money::zero(),
                suggested_price: Money::from_cents(990),
                strategy: PricingStrategy::Urgent,
                reason: "Clear it today".to_string(),
                estimated_impact: "Sells out by closing".to_string(),
                discount_percent: 37.7,
                urgency: Urgency::High,
            })
        }

        async fn analyze_sales(&self, _: &SalesRequest) -> NarrativeResult<SalesAnalysis> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(NarrativeError::Timeout(15))
        }
    }

    #[tokio::test]
    async fn test_failure_falls_back_to_estimate() {
        let advisor = NarrativeAdvisor::new(FailingService, Duration::from_secs(5));
        let products = vec![product()];

        let inventory = advisor
            .inventory_insights(&InventoryRequest::new(&products, today()))
            .await;
        assert_eq!(inventory.provenance, Provenance::Estimated);
        assert_eq!(inventory.body.metrics.expired, 1);

        let pricing = advisor
            .pricing_insights(&PricingRequest::for_product(&products[0], today(), None))
            .await;
        assert!(!pricing.is_generated());
        assert_eq!(pricing.body.strategy, PricingStrategy::Urgent);

        let sales = advisor.sales_insights(&SalesRequest::new(&[], today())).await;
        assert_eq!(sales.provenance, Provenance::Estimated);
        assert_eq!(sales.body.forecast.trend, Trend::Stable);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_service_times_out() {
        let advisor = NarrativeAdvisor::new(SlowService, Duration::from_secs(2));
        let products = vec![product()];

        let inventory = advisor
            .inventory_insights(&InventoryRequest::new(&products, today()))
            .await;
        assert_eq!(inventory.provenance, Provenance::Estimated);
        assert_eq!(inventory.body.value_at_risk, Money::from_cents(1590 * 8));
    }

    #[tokio::test]
    async fn test_generated_narrative_is_used() {
        let advisor = NarrativeAdvisor::new(ScriptedService::default(), Duration::from_secs(5));
        let products = vec![product()];

        let inventory = advisor
            .inventory_insights(&InventoryRequest::new(&products, today()))
            .await;
        assert!(inventory.is_generated());
        assert_eq!(inventory.body.summary, "One batch needs attention");

        let pricing = advisor
            .pricing_insights(&PricingRequest::for_product(&products[0], today(), None))
            .await;
        assert!(pricing.is_generated());
        assert_eq!(pricing.body.current_price, Money::from_cents(1590));
        assert_eq!(pricing.body.suggested_price, Money::from_cents(990));

        // A failing call on the same service still degrades gracefully.
        let sales = advisor.sales_insights(&SalesRequest::new(&[], today())).await;
        assert_eq!(sales.provenance, Provenance::Estimated);
        assert_eq!(advisor.service().calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_disabled_and_boxed_services() {
        let boxed: Box<dyn NarrativeService> = Box::new(DisabledNarrative);
        let advisor = NarrativeAdvisor::new(boxed, Duration::from_secs(1));

        let pricing = advisor
            .pricing_insights(&PricingRequest::for_product(&product(), today(), None))
            .await;
        assert_eq!(pricing.provenance, Provenance::Estimated);
        assert_eq!(pricing.body.urgency, Urgency::High);
    }

    #[test]
    fn test_narrative_wire_shape() {
        let narrative = Narrative {
            provenance: Provenance::Estimated,
            body: 42,
        };
        let value = serde_json::to_value(&narrative).unwrap();
        assert_eq!(value["provenance"], "estimated");
        assert_eq!(value["body"], 42);
    }
}
