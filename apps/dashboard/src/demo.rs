//! # Demo Data
//!
//! Reproducible sample data for local runs and tests. Everything is derived
//! from arithmetic on `seed` and the item index, so the same inputs always
//! give the same ledger.
//!
//! ## Generated Products
//! - Names drawn from dairy, bakery, produce, grocery and beverage lists
//! - Price: $0.99 - $39.98
//! - Stock: 0 - 119 units
//! - Expiry spread round-robin over expired / critical / warning / ok
//!
//! ## Generated Sales
//! - 1 - 3 units of an in-stock product, spread over the last 72 hours
//! - Payment method and customer name vary with the index

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};

use stockroom_core::inventory::ProductLedger;
use stockroom_core::sales::SalesLedger;
use stockroom_core::{CoreResult, Money, PaymentMethod, ProductDraft, SaleRequest};

const CATALOG: &[(&str, &[&str])] = &[
    (
        "Dairy",
        &["Whole Milk 1L", "Greek Yogurt", "Fresh Cheese", "Butter 200g", "Cream 300ml"],
    ),
    (
        "Bakery",
        &["French Bread", "Whole Wheat Loaf", "Cheese Bread", "Croissant", "Corn Cake"],
    ),
    (
        "Produce",
        &["Bananas 1kg", "Tomatoes 1kg", "Lettuce", "Apples 1kg", "Carrots 1kg"],
    ),
    (
        "Grocery",
        &["Rice 5kg", "Black Beans 1kg", "Pasta 500g", "Coffee 500g", "Sugar 1kg"],
    ),
    (
        "Beverages",
        &["Orange Juice 1L", "Sparkling Water", "Iced Tea", "Cola 2L", "Coconut Water"],
    ),
];

const CUSTOMERS: &[&str] = &["Ana Souza", "Bruno Lima", "Carla Dias", "Diego Alves"];

/// Days-until-expiry ranges cycled through, one per status bucket.
const EXPIRY_BANDS: [(i64, i64); 4] = [(-10, 0), (1, 7), (8, 30), (31, 180)];

/// Spreads `index` and `seed` into a well-mixed value.
fn mix(seed: u64, index: u64) -> u64 {
    let mut x = seed ^ index.wrapping_mul(0x9E37_79B9_7F4A_7C15);
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    x ^ (x >> 31)
}

fn pick(value: u64, lo: i64, hi: i64) -> i64 {
    lo + (value % (hi - lo + 1) as u64) as i64
}

/// Generates `count` product drafts that entered stock before `today`.
pub fn generate_products(count: usize, seed: u64, today: NaiveDate) -> Vec<ProductDraft> {
    let names: Vec<&str> = CATALOG.iter().flat_map(|(_, items)| items.iter().copied()).collect();
    let opening = NaiveTime::from_hms_opt(8, 0, 0).unwrap_or(NaiveTime::MIN);

    (0..count)
        .map(|i| {
            let value = mix(seed, i as u64);
            let name = names[(value % names.len() as u64) as usize];
            let (lo, hi) = EXPIRY_BANDS[i % EXPIRY_BANDS.len()];

            let price = Money::from_cents(99 + ((value >> 8) % 3_900) as i64);
            let quantity = ((value >> 20) % 120) as i64;
            let expiry = today + Duration::days(pick(value >> 32, lo, hi));
            let entered = (today - Duration::days(pick(value >> 40, 4, 20))).and_time(opening).and_utc();

            ProductDraft::new(name, price, quantity, expiry).entered_at(entered)
        })
        .collect()
}

/// Records up to `count` sales against `products`, ending at `now`.
///
/// Returns the number recorded; stops early when nothing is left in stock.
pub fn generate_sales(
    products: &mut ProductLedger,
    sales: &mut SalesLedger,
    count: usize,
    seed: u64,
    now: DateTime<Utc>,
) -> CoreResult<usize> {
    let mut recorded = 0;

    for i in 0..count {
        let in_stock: Vec<(u64, i64, Money)> = products
            .products()
            .iter()
            .filter(|p| p.quantity_on_hand > 0)
            .map(|p| (p.id, p.quantity_on_hand, p.unit_price()))
            .collect();
        if in_stock.is_empty() {
            break;
        }

        let value = mix(seed.wrapping_add(1), i as u64);
        let (product_id, on_hand, price) = in_stock[(value % in_stock.len() as u64) as usize];
        let quantity = pick(value >> 16, 1, 3).min(on_hand);
        let method = PaymentMethod::ALL[((value >> 24) % PaymentMethod::ALL.len() as u64) as usize];
        let at = now - Duration::hours(pick(value >> 32, 0, 71));

        let mut request = SaleRequest::new(product_id, quantity, price, method);
        if (value >> 40) % 3 == 0 {
            request = request.with_customer(CUSTOMERS[((value >> 44) % CUSTOMERS.len() as u64) as usize]);
        }

        sales.record_sale(products, request, at)?;
        recorded += 1;
    }

    Ok(recorded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use stockroom_core::ExpiryStatus;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 16, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_products_are_reproducible() {
        let a = generate_products(12, 7, now().date_naive());
        let b = generate_products(12, 7, now().date_naive());
        let c = generate_products(12, 8, now().date_naive());
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_products_cover_every_bucket() {
        let mut ledger = ProductLedger::new();
        for draft in generate_products(20, 42, now().date_naive()) {
            ledger.add(draft, now()).unwrap();
        }

        let histogram = ledger.snapshot(now().date_naive()).status_histogram;
        for status in ExpiryStatus::ALL {
            assert_eq!(histogram.get(status), 5, "{} bucket", status);
        }
    }

    #[test]
    fn test_sales_are_reproducible_and_conserve_stock() {
        let build = || {
            let mut products = ProductLedger::new();
            for draft in generate_products(10, 3, now().date_naive()) {
                products.add(draft, now()).unwrap();
            }
            let before: i64 = products.products().iter().map(|p| p.quantity_on_hand).sum();
            let mut sales = SalesLedger::new(false);
            let recorded = generate_sales(&mut products, &mut sales, 15, 3, now()).unwrap();
            (products, sales, recorded, before)
        };

        let (products, sales, recorded, before) = build();
        let (_, again, _, _) = build();
        assert_eq!(sales.sales(), again.sales());
        assert_eq!(sales.len(), recorded);

        let after: i64 = products.products().iter().map(|p| p.quantity_on_hand).sum();
        let sold: i64 = sales.sales().iter().map(|s| s.quantity).sum();
        assert_eq!(before - after, sold);
    }
}
