//! # Sales Ledger
//!
//! Records stock-depleting sales against the product ledger and summarizes
//! them.
//!
//! ## Sale Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  record_sale(request)                                                   │
//! │       │                                                                 │
//! │       ├── quantity < 1            ──► InvalidQuantity                   │
//! │       ├── unknown product         ──► ProductNotFound                   │
//! │       ├── quantity > on hand      ──► InsufficientStock                 │
//! │       ├── qty × price overflows   ──► Validation (total_price)          │
//! │       │                                (both ledgers untouched)         │
//! │       ▼                                                                 │
//! │  decrement quantity_on_hand ──► reached 0? set exit_timestamp           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  append Sale { name + unit price snapshot, total = qty × price }        │
//! │                                                                         │
//! │  delete_sale(id)                                                        │
//! │       ├── restock_on_deletion = false ──► remove record only            │
//! │       └── restock_on_deletion = true  ──► remove + credit stock back    │
//! │                                   (clears exit only if a sale set it)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Deleting a sale does not touch stock unless the ledger was built with
//! `restock_on_deletion`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::inventory::ProductLedger;
use crate::money::Money;
use crate::types::{PaymentMethod, Sale, SaleRequest};
use crate::validation::{validate_customer_name, validate_price_cents, validate_quantity_on_hand};
use crate::TOP_PRODUCTS_LIMIT;

// =============================================================================
// Sales Ledger
// =============================================================================

/// Ordered list of recorded sales, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesLedger {
    sales: Vec<Sale>,
    last_issued_id: u64,
    restock_on_deletion: bool,
    /// Exit timestamps this ledger set when a sale sold a product out.
    #[serde(default)]
    depleted_at: HashMap<u64, DateTime<Utc>>,
}

impl SalesLedger {
    /// Creates an empty ledger with the given sale-deletion policy.
    pub fn new(restock_on_deletion: bool) -> Self {
        SalesLedger {
            sales: Vec::new(),
            last_issued_id: 0,
            restock_on_deletion,
            depleted_at: HashMap::new(),
        }
    }

    pub fn restock_on_deletion(&self) -> bool {
        self.restock_on_deletion
    }

    /// Records a sale and decrements the product's stock.
    ///
    /// ## Errors
    /// - `InvalidQuantity` when `quantity < 1`
    /// - `ProductNotFound` when the product is not in `products`
    /// - `InsufficientStock` when `quantity` exceeds what is on hand
    /// - `Validation` for a price outside `0..=MAX_UNIT_PRICE_CENTS`, an
    ///   over-long customer name, or a total that does not fit in `i64`
    ///
    /// On error neither ledger changes.
    pub fn record_sale(
        &mut self,
        products: &mut ProductLedger,
        request: SaleRequest,
        now: DateTime<Utc>,
    ) -> CoreResult<&Sale> {
        if request.quantity < 1 {
            return Err(CoreError::InvalidQuantity {
                requested: request.quantity,
            });
        }
        validate_price_cents(request.unit_price_cents)?;
        let customer_name = validate_customer_name(request.customer_name.as_deref())?;

        let product = products
            .get_mut(request.product_id)
            .ok_or(CoreError::ProductNotFound(request.product_id))?;

        if !product.can_sell(request.quantity) {
            return Err(CoreError::InsufficientStock {
                product: product.name.clone(),
                available: product.quantity_on_hand,
                requested: request.quantity,
            });
        }

        let unit_price = Money::from_cents(request.unit_price_cents);
        let total = unit_price
            .checked_multiply_quantity(request.quantity)
            .ok_or_else(|| ValidationError::OutOfRange {
                field: "total_price".to_string(),
                min: 0,
                max: i64::MAX,
            })?;

        product.quantity_on_hand -= request.quantity;
        product.updated_at = now;
        if product.quantity_on_hand == 0 && product.exit_timestamp.is_none() {
            let exit = now.max(product.entry_timestamp);
            product.exit_timestamp = Some(exit);
            self.depleted_at.insert(product.id, exit);
        }

        let id = self.last_issued_id + 1;
        self.last_issued_id = id;
        self.sales.push(Sale {
            id,
            product_id: product.id,
            product_name: product.name.clone(),
            quantity: request.quantity,
            unit_price_cents: unit_price.cents(),
            total_price_cents: total.cents(),
            sale_timestamp: now,
            customer_name,
            payment_method: request.payment_method,
        });

        let index = self.sales.len() - 1;
        Ok(&self.sales[index])
    }

    /// Removes sale `id` and returns it.
    ///
    /// With `restock_on_deletion`, the sold units go back to the product if
    /// it still exists. A batch this ledger sold out returns to current
    /// stock; an exit timestamp set through an edit is kept.
    ///
    /// ## Errors
    /// - `SaleNotFound` when `id` is unknown
    /// - `Validation` when the restock would push the product past
    ///   `MAX_QUANTITY_ON_HAND`
    ///
    /// On error neither ledger changes.
    pub fn delete_sale(
        &mut self,
        id: u64,
        products: &mut ProductLedger,
        now: DateTime<Utc>,
    ) -> CoreResult<Sale> {
        let index = self
            .sales
            .iter()
            .position(|s| s.id == id)
            .ok_or(CoreError::SaleNotFound(id))?;
        let product_id = self.sales[index].product_id;
        let quantity = self.sales[index].quantity;

        let restock = match products.get_mut(product_id) {
            Some(product) if self.restock_on_deletion => {
                let restocked = product
                    .quantity_on_hand
                    .checked_add(quantity)
                    .unwrap_or(i64::MAX);
                validate_quantity_on_hand(restocked)?;
                Some((product, restocked))
            }
            _ => None,
        };

        if let Some((product, restocked)) = restock {
            let sold_out_here = product.exit_timestamp.is_some()
                && product.exit_timestamp == self.depleted_at.get(&product_id).copied();
            if product.quantity_on_hand == 0 && sold_out_here {
                product.exit_timestamp = None;
                self.depleted_at.remove(&product_id);
            }
            product.quantity_on_hand = restocked;
            product.updated_at = now;
        }

        Ok(self.sales.remove(index))
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// All sales in recording order.
    pub fn sales(&self) -> &[Sale] {
        &self.sales
    }

    pub fn get(&self, id: u64) -> Option<&Sale> {
        self.sales.iter().find(|s| s.id == id)
    }

    pub fn len(&self) -> usize {
        self.sales.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sales.is_empty()
    }

    /// Sales of one product.
    pub fn for_product(&self, product_id: u64) -> Vec<&Sale> {
        self.sales
            .iter()
            .filter(|s| s.product_id == product_id)
            .collect()
    }

    /// Sales with `from <= sale_timestamp <= to`.
    pub fn between(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> Vec<&Sale> {
        self.sales
            .iter()
            .filter(|s| s.sale_timestamp >= from && s.sale_timestamp <= to)
            .collect()
    }

    /// Summary over every recorded sale.
    pub fn summary(&self) -> SalesSummary {
        summarize(&self.sales)
    }
}

// =============================================================================
// Summary
// =============================================================================

/// Revenue ranking entry, grouped by product name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TopProduct {
    pub name: String,
    pub units_sold: i64,
    pub revenue: Money,
}

/// Sales count and revenue for one payment method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PaymentBreakdown {
    pub method: PaymentMethod,
    pub sales: usize,
    pub revenue: Money,
}

/// Aggregate figures for a set of sales.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SalesSummary {
    pub total_sales: usize,
    pub total_revenue: Money,
    /// `total_revenue / total_sales`, zero for no sales.
    pub average_ticket: Money,
    /// One entry per payment method, in `PaymentMethod::ALL` order.
    pub by_payment_method: Vec<PaymentBreakdown>,
    /// Up to five names, revenue descending, name ascending on ties.
    pub top_products: Vec<TopProduct>,
}

/// Summarizes `sales`. Total for any input, including an empty slice.
///
/// ## Example
/// ```rust
/// use stockroom_core::sales::summarize;
///
/// let summary = summarize(&[]);
/// assert_eq!(summary.total_sales, 0);
/// assert!(summary.average_ticket.is_zero());
/// ```
pub fn summarize(sales: &[Sale]) -> SalesSummary {
    let total_revenue: Money = sales.iter().map(Sale::total_price).sum();
    let average_ticket = total_revenue.divide_rounded(sales.len() as i64);

    let by_payment_method = PaymentMethod::ALL
        .iter()
        .map(|method| {
            let matching = sales.iter().filter(|s| s.payment_method == *method);
            PaymentBreakdown {
                method: *method,
                sales: matching.clone().count(),
                revenue: matching.map(Sale::total_price).sum(),
            }
        })
        .collect();

    let mut by_name: HashMap<&str, (i64, Money)> = HashMap::new();
    for sale in sales {
        let entry = by_name
            .entry(sale.product_name.as_str())
            .or_insert((0, Money::zero()));
        entry.0 += sale.quantity;
        entry.1 += sale.total_price();
    }

    let mut top_products: Vec<TopProduct> = by_name
        .into_iter()
        .map(|(name, (units_sold, revenue))| TopProduct {
            name: name.to_string(),
            units_sold,
            revenue,
        })
        .collect();
    top_products.sort_by(|a, b| b.revenue.cmp(&a.revenue).then_with(|| a.name.cmp(&b.name)));
    top_products.truncate(TOP_PRODUCTS_LIMIT);

    SalesSummary {
        total_sales: sales.len(),
        total_revenue,
        average_ticket,
        by_payment_method,
        top_products,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
