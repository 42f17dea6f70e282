//! # Dashboard State
//!
//! The caller-owned state every command works on.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           Dashboard                                     │
//! │                                                                         │
//! │  ┌──────────────┐ ┌──────────────┐ ┌──────────────┐ ┌───────────────┐  │
//! │  │ProductLedger │ │ SalesLedger  │ │DashboardConfig│ │NarrativeAdvisor│ │
//! │  │ products     │ │ sales        │ │ store, flags │ │ Box<dyn ..>   │  │
//! │  └──────────────┘ └──────────────┘ └──────────────┘ └───────────────┘  │
//! │                                                                         │
//! │  Mutating commands take `&mut Dashboard`; reads take `&Dashboard`.     │
//! │  There is exactly one writer, so no locks.                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{info, warn};

use stockroom_core::inventory::ProductLedger;
use stockroom_core::sales::SalesLedger;
use stockroom_narrative::{DisabledNarrative, HttpNarrativeClient, NarrativeAdvisor, NarrativeService};

use crate::config::DashboardConfig;

pub type BoxedNarrative = Box<dyn NarrativeService>;

pub struct Dashboard {
    pub(crate) products: ProductLedger,
    pub(crate) sales: SalesLedger,
    pub(crate) config: DashboardConfig,
    pub(crate) advisor: NarrativeAdvisor<BoxedNarrative>,
    pinned_now: Option<DateTime<Utc>>,
}

impl Dashboard {
    /// Builds an empty dashboard, wiring the HTTP narrative client when enabled.
    pub fn new(config: DashboardConfig) -> Self {
        let service: BoxedNarrative = if config.narrative.enabled {
            match HttpNarrativeClient::new(config.narrative.clone()) {
                Ok(client) => {
                    info!(endpoint = %config.narrative.endpoint, "Narrative service enabled");
                    Box::new(client)
                }
                Err(e) => {
                    warn!("Narrative client unavailable: {}. Using estimates only.", e);
                    Box::new(DisabledNarrative)
                }
            }
        } else {
            Box::new(DisabledNarrative)
        };

        Self::with_service(config, service)
    }

    /// Builds an empty dashboard around a given narrative service.
    pub fn with_service(config: DashboardConfig, service: BoxedNarrative) -> Self {
        let advisor = NarrativeAdvisor::new(service, config.narrative.timeout());
        Dashboard {
            products: ProductLedger::new(),
            sales: SalesLedger::new(config.inventory.restock_on_sale_deletion),
            config,
            advisor,
            pinned_now: None,
        }
    }

    /// Freezes the clock at `at`.
    pub fn pin_clock(&mut self, at: DateTime<Utc>) {
        self.pinned_now = Some(at);
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.pinned_now.unwrap_or_else(Utc::now)
    }

    pub fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }

    pub fn products(&self) -> &ProductLedger {
        &self.products
    }

    pub fn sales(&self) -> &SalesLedger {
        &self.sales
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Ledger pair for seeding.
    pub fn ledgers_mut(&mut self) -> (&mut ProductLedger, &mut SalesLedger) {
        (&mut self.products, &mut self.sales)
    }
}
