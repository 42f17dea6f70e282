//! # Stockroom Dashboard Entry Point
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Initialize logging (RUST_LOG or "info,stockroom=debug")             │
//! │  2. Load config (path from argv[1], else platform config dir)           │
//! │  3. Build the Dashboard (HTTP narrative client only when enabled)       │
//! │  4. Seed demo products and sales                                        │
//! │  5. Print snapshot, sales summary and insights as JSON                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Environment
//! - `STOCKROOM_DEMO_SEED` - seed for the demo data (default 42)

use serde_json::json;
use std::path::PathBuf;
use tracing::info;

use stockroom_dashboard::commands::{
    get_sales_summary, get_snapshot, inventory_insights, pricing_insights, sales_insights,
};
use stockroom_dashboard::{demo, init_tracing, Dashboard, DashboardConfig};

const DEMO_PRODUCTS: usize = 24;
const DEMO_SALES: usize = 30;
const DEFAULT_DEMO_SEED: u64 = 42;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    info!("Starting Stockroom dashboard");

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = DashboardConfig::load_or_default(config_path);
    let seed = std::env::var("STOCKROOM_DEMO_SEED")
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(DEFAULT_DEMO_SEED);

    let mut dashboard = Dashboard::new(config);
    let now = dashboard.now();

    let (products, sales) = dashboard.ledgers_mut();
    for draft in demo::generate_products(DEMO_PRODUCTS, seed, now.date_naive()) {
        products.add(draft, now)?;
    }
    let recorded = demo::generate_sales(products, sales, DEMO_SALES, seed, now)?;
    info!(products = DEMO_PRODUCTS, sales = recorded, seed, "Demo data seeded");

    let snapshot = get_snapshot(&dashboard);
    let summary = get_sales_summary(&dashboard);
    info!(
        store = %dashboard.config().store.name,
        stock_value = %dashboard.config().format_currency(snapshot.total_value),
        revenue = %dashboard.config().format_currency(summary.total_revenue),
        alerts = snapshot.alerts.len(),
        "Dashboard ready"
    );

    let pricing = match snapshot.top_urgent(1).first() {
        Some(alert) => Some(pricing_insights(&dashboard, alert.product_id, None).await?),
        None => None,
    };

    let output = json!({
        "store": dashboard.config().store.name,
        "snapshot": snapshot,
        "salesSummary": summary,
        "insights": {
            "inventory": inventory_insights(&dashboard).await,
            "pricing": pricing,
            "sales": sales_insights(&dashboard).await,
        },
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
