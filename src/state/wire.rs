//! Lenient field decoders shared by the backend models.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// A decimal that treats `null` like a missing field.
pub(crate) fn decimal_or_zero<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Decimal>::deserialize(deserializer)?.unwrap_or_default())
}

/// A timestamp in any shape the backend emits: RFC 3339, a naive
/// date-time, a plain date, epoch seconds, or a `[y, m, d, h, m, s]` array.
/// Unparseable values become `None`.
pub(crate) fn timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(timestamp_from_value))
}

fn timestamp_from_value(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_timestamp(s),
        Value::Number(n) => {
            let secs = n.as_f64()?;
            DateTime::from_timestamp(secs.trunc() as i64, (secs.fract() * 1e9) as u32)
        }
        Value::Array(parts) => {
            let mut nums = parts.iter().filter_map(Value::as_i64);
            let date = NaiveDate::from_ymd_opt(
                nums.next()? as i32,
                nums.next()? as u32,
                nums.next()? as u32,
            )?;
            let h = nums.next().unwrap_or(0) as u32;
            let m = nums.next().unwrap_or(0) as u32;
            let s = nums.next().unwrap_or(0) as u32;
            date.and_hms_opt(h, m, s).map(|dt| dt.and_utc())
        }
        _ => None,
    }
}

/// Parse a textual timestamp.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|dt| dt.and_utc())
        })
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|dt| dt.and_utc())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use rust_decimal_macros::dec;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "decimal_or_zero")]
        amount: Decimal,
        #[serde(default, deserialize_with = "timestamp")]
        at: Option<DateTime<Utc>>,
    }

    fn probe(json: &str) -> Probe {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_decimal_null_and_missing() {
        assert_eq!(probe(r#"{"amount":null}"#).amount, Decimal::ZERO);
        assert_eq!(probe("{}").amount, Decimal::ZERO);
        assert_eq!(probe(r#"{"amount":12.5}"#).amount, dec!(12.5));
    }

    #[test]
    fn test_timestamp_shapes() {
        let rfc = probe(r#"{"at":"2024-03-01T12:30:00Z"}"#).at.unwrap();
        assert_eq!((rfc.month(), rfc.hour(), rfc.minute()), (3, 12, 30));

        let naive = probe(r#"{"at":"2024-03-01T08:15:00.123"}"#).at.unwrap();
        assert_eq!(naive.hour(), 8);

        let date = probe(r#"{"at":"2024-03-01"}"#).at.unwrap();
        assert_eq!((date.day(), date.hour()), (1, 0));

        let array = probe(r#"{"at":[2024,3,1,9,5]}"#).at.unwrap();
        assert_eq!((array.hour(), array.minute()), (9, 5));

        let epoch = probe(r#"{"at":1709251200}"#).at.unwrap();
        assert_eq!(epoch.year(), 2024);

        assert!(probe(r#"{"at":"yesterday"}"#).at.is_none());
        assert!(probe(r#"{"at":null}"#).at.is_none());
    }
}
