//! # Sale Commands

use serde::Serialize;
use tracing::{debug, info};

use stockroom_core::alerts::InventorySnapshot;
use stockroom_core::forms::SaleForm;
use stockroom_core::sales::SalesSummary;
use stockroom_core::Sale;

use crate::error::ApiResult;
use crate::state::Dashboard;

/// A sale mutation together with the recomputed inventory snapshot.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleMutation {
    pub sale: Sale,
    pub snapshot: InventorySnapshot,
}

/// Records a sale and decrements the product's stock.
pub fn record_sale(dashboard: &mut Dashboard, form: SaleForm) -> ApiResult<SaleMutation> {
    let now = dashboard.now();
    let request = form.into_request(&dashboard.products)?;
    debug!(
        product_id = request.product_id,
        quantity = request.quantity,
        "record_sale command"
    );

    let sale = dashboard
        .sales
        .record_sale(&mut dashboard.products, request, now)?
        .clone();

    info!(
        sale_id = sale.id,
        product_id = sale.product_id,
        total = %sale.total_price(),
        "Sale recorded"
    );
    Ok(SaleMutation {
        snapshot: dashboard.products.snapshot(dashboard.today()),
        sale,
    })
}

/// Deletes a sale. Stock only comes back when the restock policy is on.
pub fn delete_sale(dashboard: &mut Dashboard, id: u64) -> ApiResult<SaleMutation> {
    let now = dashboard.now();
    let sale = dashboard.sales.delete_sale(id, &mut dashboard.products, now)?;

    info!(
        sale_id = id,
        restocked = dashboard.sales.restock_on_deletion(),
        "Sale deleted"
    );
    Ok(SaleMutation {
        snapshot: dashboard.products.snapshot(dashboard.today()),
        sale,
    })
}

pub fn list_sales(dashboard: &Dashboard) -> Vec<Sale> {
    dashboard.sales.sales().to_vec()
}

pub fn get_sales_summary(dashboard: &Dashboard) -> SalesSummary {
    dashboard.sales.summary()
}
