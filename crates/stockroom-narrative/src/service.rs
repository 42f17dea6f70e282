//! # Narrative Service Trait
//!
//! The seam between the dashboard and whatever produces narratives.
//!
//! ```text
//!                     ┌──────────────────────────────┐
//!                     │  trait NarrativeService      │
//!                     └──────────────┬───────────────┘
//!              ┌─────────────────────┼─────────────────────┐
//!              ▼                     ▼                     ▼
//!   HttpNarrativeClient      DisabledNarrative        test stubs
//!   (generation endpoint)    (always Disabled)
//! ```

use async_trait::async_trait;

use crate::contract::{
    InventoryAnalysis, InventoryRequest, PricingRequest, PricingSuggestion, SalesAnalysis,
    SalesRequest,
};
use crate::error::{NarrativeError, NarrativeResult};

/// Produces narratives for the three dashboard panels.
///
/// Implementations may fail in any way; callers go through
/// [`NarrativeAdvisor`](crate::advisor::NarrativeAdvisor), which never does.
#[async_trait]
pub trait NarrativeService: Send + Sync {
    async fn analyze_inventory(&self, request: &InventoryRequest) -> NarrativeResult<InventoryAnalysis>;

    async fn suggest_pricing(&self, request: &PricingRequest) -> NarrativeResult<PricingSuggestion>;

    async fn analyze_sales(&self, request: &SalesRequest) -> NarrativeResult<SalesAnalysis>;
}

/// Service used when generation is turned off.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledNarrative;

#[async_trait]
impl NarrativeService for DisabledNarrative {
    async fn analyze_inventory(&self, _request: &InventoryRequest) -> NarrativeResult<InventoryAnalysis> {
        Err(NarrativeError::Disabled)
    }

    async fn suggest_pricing(&self, _request: &PricingRequest) -> NarrativeResult<PricingSuggestion> {
        Err(NarrativeError::Disabled)
    }

    async fn analyze_sales(&self, _request: &SalesRequest) -> NarrativeResult<SalesAnalysis> {
        Err(NarrativeError::Disabled)
    }
}

#[async_trait]
impl<S: NarrativeService + ?Sized> NarrativeService for Box<S> {
    async fn analyze_inventory(&self, request: &InventoryRequest) -> NarrativeResult<InventoryAnalysis> {
        (**self).analyze_inventory(request).await
    }

    async fn suggest_pricing(&self, request: &PricingRequest) -> NarrativeResult<PricingSuggestion> {
        (**self).suggest_pricing(request).await
    }

    async fn analyze_sales(&self, request: &SalesRequest) -> NarrativeResult<SalesAnalysis> {
        (**self).analyze_sales(request).await
    }
}
