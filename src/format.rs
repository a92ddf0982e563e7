//! Display formatting for money, quantities and time.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

/// `$1,234.57`, negative as `-$1,234.57`.
pub fn currency(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}${}", group_thousands(&format!("{:.2}", rounded.abs())))
}

/// Like [`currency`] but keeps significant digits for sub-dollar prices.
pub fn price(value: Decimal) -> String {
    if value.abs() >= Decimal::ONE || value.is_zero() {
        return currency(value);
    }
    let trimmed = value
        .round_dp_with_strategy(8, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    let sign = if trimmed.is_sign_negative() { "-" } else { "" };
    format!("{sign}${}", trimmed.abs())
}

/// A coin quantity with up to eight decimals, optionally suffixed with the symbol.
pub fn crypto(amount: Decimal, symbol: &str) -> String {
    let rounded = amount
        .round_dp_with_strategy(8, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    let formatted = group_thousands(&rounded.to_string());
    if symbol.is_empty() {
        formatted
    } else {
        format!("{formatted} {}", symbol.to_uppercase())
    }
}

/// Thousands separators, value otherwise untouched.
pub fn number(value: Decimal) -> String {
    group_thousands(&value.normalize().to_string())
}

/// `+1.23%` / `-0.50%`.
pub fn percentage(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("{rounded:.2}%")
    } else {
        format!("+{:.2}%", rounded.abs())
    }
}

/// Dollar amount with a T/B/M/K suffix above a thousand.
pub fn compact(value: Decimal) -> String {
    const UNITS: [(i64, &str); 4] = [
        (1_000_000_000_000, "T"),
        (1_000_000_000, "B"),
        (1_000_000, "M"),
        (1_000, "K"),
    ];

    for (scale, suffix) in UNITS {
        let scale = Decimal::from(scale);
        if value >= scale {
            let scaled =
                (value / scale).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
            return format!("${scaled:.2}{suffix}");
        }
    }
    currency(value)
}

/// `Mar 1, 2024`.
pub fn date(at: DateTime<Utc>) -> String {
    at.format("%b %-d, %Y").to_string()
}

/// `5 minutes ago`, bucketed like a calendar with 30-day months.
pub fn relative_time(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - at).num_seconds().max(0);
    let steps: [(i64, &str); 5] = [
        (60, "second"),
        (60, "minute"),
        (24, "hour"),
        (30, "day"),
        (12, "month"),
    ];

    let mut amount = seconds;
    for (limit, unit) in steps {
        if amount < limit {
            return plural(amount, unit);
        }
        amount /= limit;
    }
    plural(amount, "year")
}

/// Date column helper for optional timestamps.
pub fn optional_date(at: Option<DateTime<Utc>>) -> String {
    at.map(date).unwrap_or_else(|| "-".to_string())
}

fn plural(amount: i64, unit: &str) -> String {
    let s = if amount == 1 { "" } else { "s" };
    format!("{amount} {unit}{s} ago")
}

/// Insert commas into the integer part of a plain decimal string.
fn group_thousands(raw: &str) -> String {
    let (sign, unsigned) = match raw.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", raw),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_currency() {
        assert_eq!(currency(dec!(1234.567)), "$1,234.57");
        assert_eq!(currency(dec!(0)), "$0.00");
        assert_eq!(currency(dec!(-1500)), "-$1,500.00");
        assert_eq!(currency(dec!(999999.995)), "$1,000,000.00");
    }

    #[test]
    fn test_price_keeps_small_values() {
        assert_eq!(price(dec!(0.00001234)), "$0.00001234");
        assert_eq!(price(dec!(64000.5)), "$64,000.50");
    }

    #[test]
    fn test_crypto() {
        assert_eq!(crypto(dec!(0.123456789), "btc"), "0.12345679 BTC");
        assert_eq!(crypto(dec!(12500), ""), "12,500");
        assert_eq!(crypto(dec!(1.50), "eth"), "1.5 ETH");
    }

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(dec!(1.234)), "+1.23%");
        assert_eq!(percentage(dec!(-0.5)), "-0.50%");
        assert_eq!(percentage(dec!(0)), "+0.00%");
    }

    #[test]
    fn test_compact() {
        assert_eq!(compact(dec!(1260000000000)), "$1.26T");
        assert_eq!(compact(dec!(45000000)), "$45.00M");
        assert_eq!(compact(dec!(1500)), "$1.50K");
        assert_eq!(compact(dec!(999)), "$999.00");
    }

    #[test]
    fn test_number() {
        assert_eq!(number(dec!(19700000)), "19,700,000");
        assert_eq!(number(dec!(-1234.50)), "-1,234.5");
    }

    #[test]
    fn test_dates() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        assert_eq!(date(at), "Mar 1, 2024");
        assert_eq!(optional_date(None), "-");

        assert_eq!(relative_time(at, at + Duration::seconds(1)), "1 second ago");
        assert_eq!(relative_time(at, at + Duration::minutes(5)), "5 minutes ago");
        assert_eq!(relative_time(at, at + Duration::hours(3)), "3 hours ago");
        assert_eq!(relative_time(at, at + Duration::days(1)), "1 day ago");
        assert_eq!(relative_time(at, at + Duration::days(65)), "2 months ago");
        assert_eq!(relative_time(at, at + Duration::days(800)), "2 years ago");
        assert_eq!(relative_time(at, at - Duration::days(1)), "0 seconds ago");
    }
}
