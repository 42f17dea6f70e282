//! # stockroom-narrative: AI Narrative Collaborator for Stockroom
//!
//! Turns ledger numbers into short natural-language insights by calling an
//! external text-generation endpoint, and falls back to rule-based answers
//! whenever that endpoint is off, slow, or wrong.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Dashboard (apps/dashboard)                           │
//! │        inventory_insights / pricing_insights / sales_insights           │
//! └───────────────────────────────┬─────────────────────────────────────────┘
//!                                 │
//! ┌───────────────────────────────▼─────────────────────────────────────────┐
//! │               ★ stockroom-narrative (THIS CRATE) ★                      │
//! │                                                                         │
//! │   NarrativeAdvisor ──timeout──► dyn NarrativeService                    │
//! │        │                           ├── HttpNarrativeClient ──► endpoint │
//! │        │ on any failure            └── DisabledNarrative                │
//! │        ▼                                                                │
//! │   fallback::{inventory, pricing, sales}_fallback                        │
//! └───────────────────────────────┬─────────────────────────────────────────┘
//!                                 │
//! ┌───────────────────────────────▼─────────────────────────────────────────┐
//! │                 stockroom-core (aggregate, pricing, summarize)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`contract`] - Request/response shapes
//! - [`service`] - The `NarrativeService` trait
//! - [`client`] - HTTP implementation
//! - [`fallback`] - Deterministic answers
//! - [`advisor`] - Timeout + fallback wrapper
//! - [`config`] - `[narrative]` settings
//! - [`error`] - Error types

pub mod advisor;
pub mod client;
pub mod config;
pub mod contract;
pub mod error;
pub mod fallback;
pub mod service;

pub use advisor::{Narrative, NarrativeAdvisor, Provenance};
pub use client::HttpNarrativeClient;
pub use config::NarrativeConfig;
pub use contract::*;
pub use error::{NarrativeError, NarrativeResult};
pub use service::{DisabledNarrative, NarrativeService};
