//! # Form Input
//!
//! Raw text as typed into the add/edit product form and the sale form,
//! turned into validated drafts and requests.
//!
//! ```text
//! ProductForm { "Milk 1L", "5,80", "12", "2025-03-01", ... }
//!      │  parse_price / parse_quantity / parse_date / parse_timestamp
//!      ▼
//! ProductDraft ──► ProductLedger::add / edit (field rules)
//! ```
//!
//! Every failure is a `ValidationError` naming the form field.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::inventory::ProductLedger;
use crate::types::{PaymentMethod, ProductDraft, SaleRequest};
use crate::validation::{
    parse_date, parse_price, parse_quantity, parse_timestamp, validate_product_name,
    ValidationResult,
};

/// Product form fields, unparsed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct ProductForm {
    pub name: String,
    pub unit_price: String,
    pub quantity_on_hand: String,
    /// Blank means "now" on add.
    pub entry_timestamp: Option<String>,
    pub exit_timestamp: Option<String>,
    pub expiry_date: String,
}

fn optional(raw: &Option<String>) -> Option<&str> {
    raw.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl ProductForm {
    /// Parses every field into a draft.
    ///
    /// ## Example
    /// ```rust
    /// use stockroom_core::forms::ProductForm;
    ///
    /// let form = ProductForm {
    ///     name: "Rice 5kg".into(),
    ///     unit_price: "28,90".into(),
    ///     quantity_on_hand: "12".into(),
    ///     expiry_date: "15/01/2026".into(),
    ///     ..Default::default()
    /// };
    /// let draft = form.into_draft().unwrap();
    /// assert_eq!(draft.unit_price_cents, 2890);
    /// ```
    pub fn into_draft(self) -> ValidationResult<ProductDraft> {
        let name = validate_product_name(&self.name)?;
        let unit_price_cents = parse_price("unit_price", &self.unit_price)?;
        let quantity_on_hand = parse_quantity("quantity_on_hand", &self.quantity_on_hand)?;
        let expiry_date = parse_date("expiry_date", &self.expiry_date)?;

        let entry_timestamp = optional(&self.entry_timestamp)
            .map(|raw| parse_timestamp("entry_timestamp", raw))
            .transpose()?;
        let exit_timestamp = optional(&self.exit_timestamp)
            .map(|raw| parse_timestamp("exit_timestamp", raw))
            .transpose()?;

        Ok(ProductDraft {
            name,
            unit_price_cents,
            quantity_on_hand,
            entry_timestamp,
            exit_timestamp,
            expiry_date,
        })
    }
}

/// Sale form fields, unparsed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct SaleForm {
    pub product_id: u64,
    pub quantity: String,
    /// Blank means the product's current price.
    pub unit_price: Option<String>,
    pub customer_name: Option<String>,
    pub payment_method: String,
}

impl SaleForm {
    /// Parses the form against the current product ledger.
    pub fn into_request(self, products: &ProductLedger) -> CoreResult<SaleRequest> {
        let product = products
            .get(self.product_id)
            .ok_or(CoreError::ProductNotFound(self.product_id))?;

        let raw_quantity = self.quantity.trim();
        let quantity: i64 = raw_quantity
            .parse()
            .map_err(|_| ValidationError::InvalidFormat {
                field: "quantity".to_string(),
                reason: "must be a whole number".to_string(),
            })?;

        let unit_price_cents = match optional(&self.unit_price) {
            Some(raw) => parse_price("unit_price", raw)?,
            None => product.unit_price_cents,
        };

        let payment_method: PaymentMethod = self.payment_method.parse()?;

        Ok(SaleRequest {
            product_id: product.id,
            quantity,
            unit_price_cents,
            customer_name: self.customer_name,
            payment_method,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
