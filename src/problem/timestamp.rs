//! Timestamp encoding for persisted problem items
//!
//! Timestamps are written as RFC 3339 strings. Reading also accepts a plain
//! number of seconds since 2001-01-01T00:00:00Z, which is how the mobile app
//! wrote its blobs, so those collections load without conversion.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, de};

/// Offset between the Unix epoch and 2001-01-01T00:00:00Z, in seconds
const REFERENCE_DATE_OFFSET: i64 = 978_307_200;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Text(String),
    ReferenceSeconds(f64),
}

impl RawTimestamp {
    fn into_datetime<E: de::Error>(self) -> Result<DateTime<Utc>, E> {
        match self {
            RawTimestamp::Text(text) => DateTime::parse_from_rfc3339(&text)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| E::custom(format!("invalid timestamp '{}': {}", text, e))),
            RawTimestamp::ReferenceSeconds(seconds) => from_reference_seconds(seconds)
                .ok_or_else(|| E::custom(format!("timestamp {} out of range", seconds))),
        }
    }
}

/// Convert seconds since 2001-01-01T00:00:00Z into a UTC timestamp
pub fn from_reference_seconds(seconds: f64) -> Option<DateTime<Utc>> {
    if !seconds.is_finite() {
        return None;
    }
    let whole = seconds.floor();
    let nanos = ((seconds - whole) * 1_000_000_000.0).round() as u32;
    // Rounding the fraction can land exactly on the next second
    let (whole, nanos) = if nanos >= 1_000_000_000 {
        (whole + 1.0, 0)
    } else {
        (whole, nanos)
    };
    // `i64::MAX as f64` rounds up to 2^63, which is already out of range
    if whole < i64::MIN as f64 || whole >= i64::MAX as f64 {
        return None;
    }
    let unix_seconds = (whole as i64).checked_add(REFERENCE_DATE_OFFSET)?;
    DateTime::from_timestamp(unix_seconds, nanos)
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    RawTimestamp::deserialize(deserializer)?.into_datetime()
}

pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<RawTimestamp>::deserialize(deserializer)? {
        Some(raw) => raw.into_datetime().map(Some),
        None => Ok(None),
    }
}
