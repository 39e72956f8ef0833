//! # Display Formatting
//!
//! Currency and date/time strings exactly as the pages render them.
//!
//! ## Conventions
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CURRENCY (ar-MA conventions, any ISO code)                            │
//! │    1250 centimes, MAD  →  "12,50 د.م."                                 │
//! │    123456 centimes, EUR →  "1.234,56 €"                                │
//! │    decimal ","  grouping "."  symbol after the amount                  │
//! │                                                                         │
//! │  DATE/TIME (en-US conventions)                                         │
//! │    2026-10-19T14:30Z  →  "Oct 19, 2026, 02:30 PM"                      │
//! │                       →  "02:30 PM"            (time only)             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use std::fmt::Display;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::DEFAULT_CURRENCY;

// =============================================================================
// Currency
// =============================================================================

const DECIMAL_SEPARATOR: char = ',';
const GROUP_SEPARATOR: char = '.';

/// Display symbol for an ISO 4217 code. Unknown codes render as the code.
pub fn currency_symbol(currency: &str) -> &str {
    match currency {
        "MAD" => "د.م.",
        "EUR" => "€",
        "USD" => "US$",
        "GBP" => "UK£",
        other => other,
    }
}

/// Formats an amount with two decimals using Moroccan Arabic conventions.
///
/// ## Example
/// ```rust
/// use dinetab_core::format::format_currency;
/// use dinetab_core::money::Money;
///
/// assert_eq!(format_currency(Money::from_minor(1250), "MAD"), "12,50 د.م.");
/// assert_eq!(format_currency(Money::zero(), "MAD"), "0,00 د.م.");
/// assert_eq!(format_currency(Money::from_minor(123456), "EUR"), "1.234,56 €");
/// ```
pub fn format_currency(amount: Money, currency: &str) -> String {
    let sign = if amount.is_negative() { "-" } else { "" };
    let whole = group_thousands(amount.major().unsigned_abs());
    format!(
        "{sign}{whole}{DECIMAL_SEPARATOR}{:02} {}",
        amount.minor_part(),
        currency_symbol(currency)
    )
}

/// [`format_currency`] in the house currency.
pub fn format_currency_default(amount: Money) -> String {
    format_currency(amount, DEFAULT_CURRENCY)
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(GROUP_SEPARATOR);
        }
        out.push(ch);
    }
    out
}

// =============================================================================
// Date / Time
// =============================================================================

/// `"Oct 19, 2026, 02:30 PM"`
pub fn format_date_time<Tz: TimeZone>(dt: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    dt.format("%b %-d, %Y, %I:%M %p").to_string()
}

/// `"02:30 PM"`
pub fn format_time<Tz: TimeZone>(dt: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    dt.format("%I:%M %p").to_string()
}

/// Parses a timestamp the way rows and pages hand them over.
///
/// Accepts RFC 3339 (`2026-10-19T14:30:00+01:00`), offset-less ISO
/// timestamps (read as UTC) and bare dates (UTC midnight).
pub fn parse_timestamp(value: &str) -> CoreResult<DateTime<FixedOffset>> {
    let raw = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt);
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(Utc.from_utc_datetime(&naive).fixed_offset());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&midnight).fixed_offset());
        }
    }

    Err(CoreError::InvalidTimestamp {
        value: value.to_string(),
        reason: "expected RFC 3339, ISO date-time or YYYY-MM-DD".to_string(),
    })
}

/// [`format_date_time`] for a timestamp string.
pub fn format_date_time_str(value: &str) -> CoreResult<String> {
    parse_timestamp(value).map(|dt| format_date_time(&dt))
}

/// [`format_time`] for a timestamp string.
pub fn format_time_str(value: &str) -> CoreResult<String> {
    parse_timestamp(value).map(|dt| format_time(&dt))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_mad() {
        assert_eq!(format_currency(Money::from_minor(1250), "MAD"), "12,50 د.م.");
        assert_eq!(format_currency_default(Money::from_minor(1250)), "12,50 د.م.");
    }

    #[test]
    fn test_currency_zero() {
        assert_eq!(format_currency(Money::zero(), "MAD"), "0,00 د.م.");
    }

    #[test]
    fn test_currency_grouping_and_sign() {
        assert_eq!(
            format_currency(Money::from_minor(123_456_789), "MAD"),
            "1.234.567,89 د.م."
        );
        assert_eq!(format_currency(Money::from_minor(-505), "EUR"), "-5,05 €");
        assert_eq!(format_currency(Money::from_minor(100_000), "USD"), "1.000,00 US$");
    }

    #[test]
    fn test_currency_unknown_code() {
        assert_eq!(format_currency(Money::from_minor(999), "CHF"), "9,99 CHF");
    }

    #[test]
    fn test_date_time_formatting() {
        let dt = Utc.with_ymd_and_hms(2026, 10, 19, 14, 30, 0).unwrap();
        assert_eq!(format_date_time(&dt), "Oct 19, 2026, 02:30 PM");
        assert_eq!(format_time(&dt), "02:30 PM");

        let morning = Utc.with_ymd_and_hms(2026, 3, 5, 9, 5, 0).unwrap();
        assert_eq!(format_date_time(&morning), "Mar 5, 2026, 09:05 AM");
    }

    #[test]
    fn test_string_variants() {
        assert_eq!(
            format_date_time_str("2026-10-19T14:30:00+00:00").unwrap(),
            "Oct 19, 2026, 02:30 PM"
        );
        assert_eq!(format_time_str("2026-10-19T20:15:00.123456").unwrap(), "08:15 PM");
        assert_eq!(
            format_date_time_str("2026-10-19").unwrap(),
            "Oct 19, 2026, 12:00 AM"
        );
    }

    #[test]
    fn test_offset_is_preserved() {
        // Rendered in the offset the timestamp carries
        assert_eq!(format_time_str("2026-10-19T14:30:00+01:00").unwrap(), "02:30 PM");
    }

    #[test]
    fn test_invalid_timestamp() {
        let err = format_date_time_str("yesterday").unwrap_err();
        assert!(matches!(err, CoreError::InvalidTimestamp { .. }));
    }
}
