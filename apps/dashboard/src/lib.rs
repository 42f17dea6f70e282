//! # Stockroom Dashboard Library
//!
//! The application layer: owns the ledgers, exposes the commands the
//! presentation layer calls, and wires configuration, logging and the
//! narrative advisor together.
//!
//! ## Module Organization
//! ```text
//! stockroom_dashboard/
//! ├── lib.rs          ◄─── You are here (logging setup, exports)
//! ├── main.rs         ◄─── Binary: seed demo data, print the dashboard
//! ├── state.rs        ◄─── Dashboard (ledgers + config + advisor)
//! ├── config.rs       ◄─── stockroom.toml + STOCKROOM_* overrides
//! ├── commands/
//! │   ├── product.rs  ◄─── Product CRUD, snapshot, discounts, import
//! │   ├── sale.rs     ◄─── Sales ledger commands
//! │   └── insights.rs ◄─── Narrative panels
//! ├── demo.rs         ◄─── Reproducible sample data
//! └── error.rs        ◄─── ApiError for command results
//! ```

pub mod commands;
pub mod config;
pub mod demo;
pub mod error;
pub mod state;

use tracing_subscriber::EnvFilter;

pub use config::DashboardConfig;
pub use error::{ApiError, ApiResult, ErrorCode};
pub use state::Dashboard;

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=stockroom_narrative=trace` - Trace the narrative client only
/// - Default: INFO, DEBUG for the stockroom crates
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,stockroom=debug"));

    // A second call (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
