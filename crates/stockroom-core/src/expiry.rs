//! # Expiration Classifier
//!
//! Maps an expiry date and "today" to a day count and a status bucket.
//!
//! ## Buckets
//! ```text
//!   days_until_expiry:  ... -1   0 │ 1 ... 7 │ 8 ... 30 │ 31 ...
//!                       ───────────┼─────────┼──────────┼────────
//!   status:               Expired  │Critical │ Warning  │  Ok
//! ```
//!
//! Both sides are calendar dates, so the time of day never changes the
//! result: a product expiring yesterday is always `-1` days, whether it is
//! 00:01 or 23:59 now.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::{ExpiryStatus, Product};
use crate::{CRITICAL_WINDOW_DAYS, WARNING_WINDOW_DAYS};

/// Result of classifying one expiry date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Classification {
    pub days_until_expiry: i64,
    pub status: ExpiryStatus,
}

/// Whole calendar days from `today` to `expiry_date` (negative once past).
#[inline]
pub fn days_until_expiry(expiry_date: NaiveDate, today: NaiveDate) -> i64 {
    (expiry_date - today).num_days()
}

/// Status bucket for a day count.
pub fn status_for_days(days_until_expiry: i64) -> ExpiryStatus {
    match days_until_expiry {
        d if d <= 0 => ExpiryStatus::Expired,
        d if d <= CRITICAL_WINDOW_DAYS => ExpiryStatus::Critical,
        d if d <= WARNING_WINDOW_DAYS => ExpiryStatus::Warning,
        _ => ExpiryStatus::Ok,
    }
}

/// Classifies an expiry date relative to `today`.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use stockroom_core::expiry::classify;
/// use stockroom_core::ExpiryStatus;
///
/// let today = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
/// let c = classify(NaiveDate::from_ymd_opt(2025, 3, 8).unwrap(), today);
/// assert_eq!(c.days_until_expiry, 7);
/// assert_eq!(c.status, ExpiryStatus::Critical);
/// ```
pub fn classify(expiry_date: NaiveDate, today: NaiveDate) -> Classification {
    let days = days_until_expiry(expiry_date, today);
    Classification {
        days_until_expiry: days,
        status: status_for_days(days),
    }
}

/// Classifies against an instant, normalizing it to its UTC calendar date.
pub fn classify_at(expiry_date: NaiveDate, now: DateTime<Utc>) -> Classification {
    classify(expiry_date, now.date_naive())
}

/// Classifies a product by its expiry date.
#[inline]
pub fn classify_product(product: &Product, today: NaiveDate) -> Classification {
    classify(product.expiry_date, today)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Days, TimeZone};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 16).unwrap()
    }

    fn in_days(n: i64) -> NaiveDate {
        if n >= 0 {
            today() + Days::new(n as u64)
        } else {
            today() - Days::new(n.unsigned_abs())
        }
    }

    #[test]
    fn test_boundaries() {
        let cases = [
            (-1, ExpiryStatus::Expired),
            (0, ExpiryStatus::Expired),
            (1, ExpiryStatus::Critical),
            (7, ExpiryStatus::Critical),
            (8, ExpiryStatus::Warning),
            (30, ExpiryStatus::Warning),
            (31, ExpiryStatus::Ok),
        ];

        for (days, expected) in cases {
            let c = classify(in_days(days), today());
            assert_eq!(c.days_until_expiry, days);
            assert_eq!(c.status, expected, "days = {}", days);
        }
    }

    #[test]
    fn test_expired_yesterday_is_minus_one() {
        let c = classify(in_days(-1), today());
        assert_eq!(c.days_until_expiry, -1);
        assert_eq!(c.status, ExpiryStatus::Expired);
    }

    #[test]
    fn test_time_of_day_does_not_flip_status() {
        let expiry = NaiveDate::from_ymd_opt(2025, 1, 23).unwrap();
        let morning = Utc.with_ymd_and_hms(2025, 1, 16, 0, 1, 0).unwrap();
        let night = Utc.with_ymd_and_hms(2025, 1, 16, 23, 59, 0).unwrap();

        assert_eq!(classify_at(expiry, morning), classify_at(expiry, night));
        assert_eq!(classify_at(expiry, night).days_until_expiry, 7);
    }

    #[test]
    fn test_far_dates() {
        let c = classify(NaiveDate::from_ymd_opt(2030, 8, 1).unwrap(), today());
        assert_eq!(c.status, ExpiryStatus::Ok);

        let c = classify(NaiveDate::from_ymd_opt(1999, 1, 1).unwrap(), today());
        assert_eq!(c.status, ExpiryStatus::Expired);
    }
}
