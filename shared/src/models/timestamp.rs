//! `created_at` wire format
//!
//! Always written as an RFC 3339 string. Read back from any of:
//! - RFC 3339 string (unparsable text means "no timestamp")
//! - `{ "seconds", "nanoseconds" }` object, or `_seconds` / `_nanoseconds`
//! - epoch milliseconds as a JSON number
//! - `null`
//!
//! Use with `#[serde(default, with = "crate::models::timestamp")]`.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum WireTimestamp {
    Text(String),
    Millis(i64),
    FloatMillis(f64),
    Seconds {
        #[serde(alias = "_seconds")]
        seconds: i64,
        #[serde(default, alias = "_nanoseconds")]
        nanoseconds: u32,
    },
}

impl WireTimestamp {
    fn into_datetime(self) -> Option<DateTime<Utc>> {
        match self {
            WireTimestamp::Text(s) => parse_text(&s),
            WireTimestamp::Millis(ms) => Utc.timestamp_millis_opt(ms).single(),
            WireTimestamp::FloatMillis(ms) if ms.is_finite() => {
                Utc.timestamp_millis_opt(ms.trunc() as i64).single()
            }
            WireTimestamp::FloatMillis(_) => None,
            WireTimestamp::Seconds {
                seconds,
                nanoseconds,
            } => Utc.timestamp_opt(seconds, nanoseconds).single(),
        }
    }
}

/// Parse a textual timestamp. Accepts RFC 3339 and a bare
/// `YYYY-MM-DDTHH:MM:SS[.fff]` taken as UTC.
pub fn parse_text(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Render a timestamp the way it is stored and exported
pub fn format(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(dt) => serializer.serialize_str(&format(dt)),
        None => serializer.serialize_none(),
    }
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let wire = Option::<WireTimestamp>::deserialize(deserializer)?;
    Ok(wire.and_then(WireTimestamp::into_datetime))
}
