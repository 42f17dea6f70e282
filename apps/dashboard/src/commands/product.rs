//! # Product Commands
//!
//! Product CRUD, the inventory snapshot, discount suggestions, and legacy
//! imports.
//!
//! ## Eager Recomputation
//! ```text
//! add_product / update_product / delete_product / import_products
//!       │
//!       ▼
//! ProductLedger mutation ──► aggregate(products, today) ──► response.snapshot
//! ```
//! The presentation layer never has to ask for a fresh snapshot after a
//! mutation; it comes back with the result.

use serde::Serialize;
use std::time::Instant;
use tracing::{debug, info};

use stockroom_core::alerts::InventorySnapshot;
use stockroom_core::forms::ProductForm;
use stockroom_core::import::import_legacy_json;
use stockroom_core::pricing::DiscountSuggestion;
use stockroom_core::validation::parse_price;
use stockroom_core::{Money, Product};

use crate::error::ApiResult;
use crate::state::Dashboard;

/// A product mutation together with the recomputed snapshot.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductMutation {
    pub product: Product,
    pub snapshot: InventorySnapshot,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportOutcome {
    pub imported: Vec<Product>,
    pub snapshot: InventorySnapshot,
}

pub fn add_product(dashboard: &mut Dashboard, form: ProductForm) -> ApiResult<ProductMutation> {
    let now = dashboard.now();
    let draft = form.into_draft().map_err(stockroom_core::CoreError::from)?;
    let product = dashboard.products.add(draft, now)?.clone();

    info!(product_id = product.id, name = %product.name, "Product added");
    Ok(ProductMutation {
        snapshot: dashboard.products.snapshot(dashboard.today()),
        product,
    })
}

pub fn update_product(dashboard: &mut Dashboard, id: u64, form: ProductForm) -> ApiResult<ProductMutation> {
    let now = dashboard.now();
    let draft = form.into_draft().map_err(stockroom_core::CoreError::from)?;
    let product = dashboard.products.edit(id, draft, now)?.clone();

    info!(product_id = id, "Product updated");
    Ok(ProductMutation {
        snapshot: dashboard.products.snapshot(dashboard.today()),
        product,
    })
}

/// Returns the deleted product. Sales that reference it stay in the ledger.
pub fn delete_product(dashboard: &mut Dashboard, id: u64) -> ApiResult<ProductMutation> {
    let product = dashboard.products.delete(id)?;

    info!(product_id = id, name = %product.name, "Product deleted");
    Ok(ProductMutation {
        snapshot: dashboard.products.snapshot(dashboard.today()),
        product,
    })
}

pub fn list_products(dashboard: &Dashboard) -> Vec<Product> {
    dashboard.products.products().to_vec()
}

pub fn get_snapshot(dashboard: &Dashboard) -> InventorySnapshot {
    let start = Instant::now();
    let snapshot = dashboard.products.snapshot(dashboard.today());
    debug!(
        products = dashboard.products.len(),
        alerts = snapshot.alerts.len(),
        elapsed_us = start.elapsed().as_micros() as u64,
        "Snapshot computed"
    );
    snapshot
}

/// Discount suggestion for one product. `cost_price` is the raw form value;
/// blank means no floor.
pub fn suggest_discount(
    dashboard: &Dashboard,
    id: u64,
    cost_price: Option<&str>,
) -> ApiResult<DiscountSuggestion> {
    let cost_floor = parse_cost_price(cost_price)?;
    Ok(dashboard
        .products
        .suggest_discount(id, dashboard.today(), cost_floor)?)
}

/// Imports legacy product records. Either every record lands or none does.
pub fn import_products(dashboard: &mut Dashboard, json: &str) -> ApiResult<ImportOutcome> {
    let now = dashboard.now();
    let drafts = import_legacy_json(json)?;

    let mut staged = dashboard.products.clone();
    let mut imported = Vec::with_capacity(drafts.len());
    for draft in drafts {
        imported.push(staged.add(draft, now)?.clone());
    }
    dashboard.products = staged;

    info!(count = imported.len(), "Legacy products imported");
    Ok(ImportOutcome {
        imported,
        snapshot: dashboard.products.snapshot(dashboard.today()),
    })
}

pub(crate) fn parse_cost_price(raw: Option<&str>) -> ApiResult<Option<Money>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => {
            let cents = parse_price("cost_price", raw).map_err(stockroom_core::CoreError::from)?;
            Ok(Some(Money::from_cents(cents)))
        }
        None => Ok(None),
    }
}
