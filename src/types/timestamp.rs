//! Wire timestamps for `createdAt` / `updatedAt`.
//!
//! Accepts RFC 3339 strings, naive `YYYY-MM-DD HH:MM:SS[.fff]` strings (read as
//! UTC) and epoch milliseconds. Always emits RFC 3339 UTC with millisecond
//! precision.

use std::fmt;

use chrono::{DateTime, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A UTC instant truncated to millisecond precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Current wall-clock time, truncated to milliseconds.
    pub fn now() -> Self {
        Self::from_millis(Utc::now().timestamp_millis())
    }

    /// Builds a timestamp from stored epoch milliseconds. Out-of-range values
    /// clamp to the epoch; use [`Timestamp::try_from_millis`] for untrusted input.
    pub fn from_millis(millis: i64) -> Self {
        Self::try_from_millis(millis).unwrap_or(Self(DateTime::<Utc>::UNIX_EPOCH))
    }

    /// Builds a timestamp from epoch milliseconds, or `None` outside chrono's range.
    pub fn try_from_millis(millis: i64) -> Option<Self> {
        Utc.timestamp_millis_opt(millis).single().map(Self)
    }

    pub fn as_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    /// Parses any of the accepted textual forms.
    pub fn parse(input: &str) -> Result<Self, String> {
        let trimmed = input.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(Self::from_millis(dt.with_timezone(&Utc).timestamp_millis()));
        }
        for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, fmt) {
                return Ok(Self::from_millis(naive.and_utc().timestamp_millis()));
            }
        }
        Err(format!("invalid timestamp: {}", input))
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::from_millis(dt.timestamp_millis())
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

const OUT_OF_RANGE: &str = "epoch milliseconds out of range";

struct TimestampVisitor;

impl<'de> Visitor<'de> for TimestampVisitor {
    type Value = Timestamp;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an RFC 3339 timestamp string or epoch milliseconds")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Timestamp, E> {
        Timestamp::parse(v).map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Timestamp, E> {
        Timestamp::try_from_millis(v).ok_or_else(|| E::custom(OUT_OF_RANGE))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Timestamp, E> {
        let millis = i64::try_from(v).map_err(|_| E::custom(OUT_OF_RANGE))?;
        self.visit_i64(millis)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Timestamp, E> {
        if !v.is_finite() {
            return Err(E::custom("epoch milliseconds must be finite"));
        }
        let millis = v.trunc();
        // i64::MAX as f64 rounds up to 2^63, which does not fit
        if millis < i64::MIN as f64 || millis >= i64::MAX as f64 {
            return Err(E::custom(OUT_OF_RANGE));
        }
        self.visit_i64(millis as i64)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(TimestampVisitor)
    }
}
