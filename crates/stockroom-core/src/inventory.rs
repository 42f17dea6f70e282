//! # Product Ledger
//!
//! The in-memory, ordered system of record for stock batches.
//!
//! ## Mutation Points
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         ProductLedger                                   │
//! │                                                                         │
//! │   add(draft)        ──► validate ──► assign id ──► append               │
//! │   edit(id, draft)   ──► validate ──► replace fields, refresh updated_at │
//! │   delete(id)        ──► remove (no tombstone)                           │
//! │   SalesLedger       ──► decrement / credit quantity (crate-internal)    │
//! │                                                                         │
//! │   Everything else is a read: get, products, snapshot, suggest_discount  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Ids come from a high-water mark: `max(existing ids, highest ever
//! issued) + 1`, so an id freed by a delete is never handed out again.
//! A failed mutation leaves the ledger exactly as it was.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::alerts::{aggregate, InventorySnapshot};
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::pricing::{suggest_for_product, DiscountSuggestion};
use crate::types::{Product, ProductDraft};
use crate::validation::{
    validate_price_cents, validate_product_name, validate_quantity_on_hand, validate_stock_window,
};

/// Ordered collection of products, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductLedger {
    products: Vec<Product>,
    /// Highest id ever issued by this ledger.
    last_issued_id: u64,
}

/// Draft fields after validation.
struct CheckedDraft {
    name: String,
    unit_price_cents: i64,
    quantity_on_hand: i64,
    exit_timestamp: Option<DateTime<Utc>>,
    expiry_date: NaiveDate,
}

fn check_draft(draft: ProductDraft, entry: DateTime<Utc>) -> CoreResult<CheckedDraft> {
    let name = validate_product_name(&draft.name)?;
    validate_price_cents(draft.unit_price_cents)?;
    validate_quantity_on_hand(draft.quantity_on_hand)?;
    validate_stock_window(entry, draft.exit_timestamp)?;

    Ok(CheckedDraft {
        name,
        unit_price_cents: draft.unit_price_cents,
        quantity_on_hand: draft.quantity_on_hand,
        exit_timestamp: draft.exit_timestamp,
        expiry_date: draft.expiry_date,
    })
}

impl ProductLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a ledger from existing records, e.g. a saved export.
    ///
    /// Rejects duplicate ids and records that break the product invariants.
    pub fn from_products(products: Vec<Product>) -> CoreResult<Self> {
        let mut seen = std::collections::HashSet::with_capacity(products.len());
        for product in &products {
            if !seen.insert(product.id) {
                return Err(ValidationError::Duplicate {
                    field: "id".to_string(),
                    value: product.id.to_string(),
                }
                .into());
            }
            validate_product_name(&product.name)?;
            validate_price_cents(product.unit_price_cents)?;
            validate_quantity_on_hand(product.quantity_on_hand)?;
            validate_stock_window(product.entry_timestamp, product.exit_timestamp)?;
        }

        let last_issued_id = products.iter().map(|p| p.id).max().unwrap_or(0);
        Ok(ProductLedger {
            products,
            last_issued_id,
        })
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Validates `draft` and appends it with a fresh id.
    ///
    /// The entry timestamp is the draft's, or `now` when the draft has none.
    pub fn add(&mut self, draft: ProductDraft, now: DateTime<Utc>) -> CoreResult<&Product> {
        let entry = draft.entry_timestamp.unwrap_or(now);
        let checked = check_draft(draft, entry)?;

        let id = self.next_id();
        self.last_issued_id = id;
        self.products.push(Product {
            id,
            name: checked.name,
            unit_price_cents: checked.unit_price_cents,
            quantity_on_hand: checked.quantity_on_hand,
            entry_timestamp: entry,
            exit_timestamp: checked.exit_timestamp,
            expiry_date: checked.expiry_date,
            created_at: now,
            updated_at: now,
        });

        let index = self.products.len() - 1;
        Ok(&self.products[index])
    }

    /// Replaces every editable field of product `id`.
    ///
    /// `id`, `created_at` and the entry timestamp are kept; `updated_at`
    /// becomes `now`.
    pub fn edit(&mut self, id: u64, draft: ProductDraft, now: DateTime<Utc>) -> CoreResult<&Product> {
        let index = self.index_of(id)?;
        let checked = check_draft(draft, self.products[index].entry_timestamp)?;

        let product = &mut self.products[index];
        product.name = checked.name;
        product.unit_price_cents = checked.unit_price_cents;
        product.quantity_on_hand = checked.quantity_on_hand;
        product.exit_timestamp = checked.exit_timestamp;
        product.expiry_date = checked.expiry_date;
        product.updated_at = now;

        Ok(&self.products[index])
    }

    /// Removes product `id` and returns it.
    ///
    /// Sales that reference it keep their name and price snapshots.
    pub fn delete(&mut self, id: u64) -> CoreResult<Product> {
        let index = self.index_of(id)?;
        Ok(self.products.remove(index))
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub fn get(&self, id: u64) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// All products in insertion order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Dashboard snapshot for `today`. See [`aggregate`].
    pub fn snapshot(&self, today: NaiveDate) -> InventorySnapshot {
        aggregate(&self.products, today)
    }

    /// Discount suggestion for product `id`.
    pub fn suggest_discount(
        &self,
        id: u64,
        today: NaiveDate,
        cost_floor: Option<Money>,
    ) -> CoreResult<DiscountSuggestion> {
        let product = self.get(id).ok_or(CoreError::ProductNotFound(id))?;
        Ok(suggest_for_product(product, today, cost_floor))
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn next_id(&self) -> u64 {
        let max_existing = self.products.iter().map(|p| p.id).max().unwrap_or(0);
        max_existing.max(self.last_issued_id) + 1
    }

    fn index_of(&self, id: u64) -> CoreResult<usize> {
        self.products
            .iter()
            .position(|p| p.id == id)
            .ok_or(CoreError::ProductNotFound(id))
    }

    /// Mutable access for the sales ledger.
    pub(crate) fn get_mut(&mut self, id: u64) -> Option<&mut Product> {
        self.products.iter_mut().find(|p| p.id == id)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Days, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 16, 10, 0, 0).unwrap()
    }

    fn today() -> NaiveDate {
        now().date_naive()
    }

    fn draft(name: &str, price_cents: i64, qty: i64) -> ProductDraft {
        ProductDraft::new(name, Money::from_cents(price_cents), qty, today() + Days::new(90))
    }

    #[test]
    fn test_add_assigns_sequential_ids() {
        let mut ledger = ProductLedger::new();
        let a = ledger.add(draft("A", 100, 1), now()).unwrap().id;
        let b = ledger.add(draft("B", 100, 1), now()).unwrap().id;

        assert_eq!((a, b), (1, 2));
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.get(1).unwrap().entry_timestamp, now());
    }

    #[test]
    fn test_ids_are_not_reused() {
        let mut ledger = ProductLedger::new();
        ledger.add(draft("A", 100, 1), now()).unwrap();
        ledger.add(draft("B", 100, 1), now()).unwrap();
        ledger.delete(2).unwrap();

        let c = ledger.add(draft("C", 100, 1), now()).unwrap().id;
        assert_eq!(c, 3);
    }

    #[test]
    fn test_add_rejects_invalid_drafts() {
        let mut ledger = ProductLedger::new();

        let err = ledger.add(draft("  ", 100, 1), now()).unwrap_err();
        assert!(matches!(err, CoreError::Validation(ValidationError::Required { .. })));

        assert!(ledger.add(draft("A", -1, 1), now()).is_err());
        assert!(ledger.add(draft("A", 100, -1), now()).is_err());

        let backwards = draft("A", 100, 1)
            .entered_at(now())
            .exited_at(now() - chrono::Duration::hours(1));
        assert!(ledger.add(backwards, now()).is_err());

        assert!(ledger.is_empty());
    }

    #[test]
    fn test_add_and_edit_reject_oversized_amounts() {
        let mut ledger = ProductLedger::new();
        let err = ledger
            .add(draft("Bulk", 10_000_000_000, 10_000_000_000), now())
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(ValidationError::OutOfRange { .. })));
        assert!(ledger.add(draft("Bulk", crate::MAX_UNIT_PRICE_CENTS + 1, 1), now()).is_err());
        assert!(ledger.add(draft("Bulk", 100, crate::MAX_QUANTITY_ON_HAND + 1), now()).is_err());

        ledger
            .add(draft("Bulk", crate::MAX_UNIT_PRICE_CENTS, crate::MAX_QUANTITY_ON_HAND), now())
            .unwrap();
        assert!(ledger.edit(1, draft("Bulk", 100, i64::MAX), now()).is_err());

        let snapshot = ledger.snapshot(today());
        assert_eq!(
            snapshot.total_value.cents(),
            crate::MAX_UNIT_PRICE_CENTS * crate::MAX_QUANTITY_ON_HAND
        );
    }

    #[test]
    fn test_edit_keeps_identity_and_entry() {
        let mut ledger = ProductLedger::new();
        let entered = now() - chrono::Duration::days(3);
        ledger.add(draft("Milk", 580, 10).entered_at(entered), entered).unwrap();

        let later = now();
        let edited = ledger
            .edit(1, draft("Milk 1L", 600, 8).entered_at(later), later)
            .unwrap();

        assert_eq!(edited.id, 1);
        assert_eq!(edited.name, "Milk 1L");
        assert_eq!(edited.unit_price_cents, 600);
        assert_eq!(edited.entry_timestamp, entered);
        assert_eq!(edited.created_at, entered);
        assert_eq!(edited.updated_at, later);
    }

    #[test]
    fn test_edit_failure_leaves_ledger_unchanged() {
        let mut ledger = ProductLedger::new();
        ledger.add(draft("Milk", 580, 10), now()).unwrap();
        let before = ledger.clone();

        assert!(ledger.edit(1, draft("", 580, 10), now()).is_err());
        assert!(matches!(
            ledger.edit(9, draft("X", 1, 1), now()),
            Err(CoreError::ProductNotFound(9))
        ));
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_delete_unknown_id() {
        let mut ledger = ProductLedger::new();
        assert!(matches!(ledger.delete(1), Err(CoreError::ProductNotFound(1))));
    }

    #[test]
    fn test_total_value_tracks_add_and_delete() {
        let mut ledger = ProductLedger::new();
        ledger.add(draft("A", 1000, 5), now()).unwrap();
        let before = ledger.snapshot(today()).total_value;

        ledger.add(draft("B", 250, 4), now()).unwrap();
        assert_eq!(ledger.snapshot(today()).total_value - before, Money::from_cents(1000));

        ledger.delete(2).unwrap();
        assert_eq!(ledger.snapshot(today()).total_value, before);
    }

    #[test]
    fn test_from_products() {
        let mut source = ProductLedger::new();
        source.add(draft("A", 100, 1), now()).unwrap();
        source.add(draft("B", 100, 1), now()).unwrap();

        let mut restored = ProductLedger::from_products(source.products().to_vec()).unwrap();
        assert_eq!(restored.add(draft("C", 1, 1), now()).unwrap().id, 3);

        let mut duplicated = source.products().to_vec();
        duplicated.push(duplicated[0].clone());
        assert!(ProductLedger::from_products(duplicated).is_err());
    }

    #[test]
    fn test_suggest_discount_by_id() {
        let mut ledger = ProductLedger::new();
        ledger
            .add(
                ProductDraft::new("Yogurt", Money::from_cents(300), 2, today() + Days::new(5)),
                now(),
            )
            .unwrap();

        let suggestion = ledger.suggest_discount(1, today(), None).unwrap();
        assert_eq!(suggestion.discount_percent, 30);
        assert_eq!(suggestion.suggested_price.cents(), 210);

        assert!(ledger.suggest_discount(2, today(), None).is_err());
    }
}
