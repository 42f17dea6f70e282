//! # Dashboard Commands
//!
//! Every operation the presentation layer can invoke.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here (exports)
//! ├── product.rs   ◄─── add/update/delete/list products, snapshot,
//! │                     discount suggestion, legacy import
//! ├── sale.rs      ◄─── record/delete/list sales, sales summary
//! └── insights.rs  ◄─── inventory/pricing/sales narratives (async)
//! ```
//!
//! ## Calling Convention
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Presentation layer                                                     │
//! │    add_product(&mut dashboard, ProductForm { .. })                      │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ProductForm::into_draft ──► ProductLedger::add ──► snapshot(today)     │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Ok(ProductMutation { product, snapshot }) | Err(ApiError { code, .. }) │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Mutations take `&mut Dashboard`, reads take `&Dashboard`.

pub mod insights;
pub mod product;
pub mod sale;

pub use insights::{inventory_insights, pricing_insights, sales_insights};
pub use product::{
    add_product, delete_product, get_snapshot, import_products, list_products, suggest_discount,
    update_product, ImportOutcome, ProductMutation,
};
pub use sale::{delete_sale, get_sales_summary, list_sales, record_sale, SaleMutation};
