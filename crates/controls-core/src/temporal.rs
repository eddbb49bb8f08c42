//! # UTC Timestamps
//!
//! Defines `Timestamp`, a UTC-only timestamp truncated to seconds
//! precision. Manifest output is diffed and checked byte-for-byte, so the
//! `generated_at` stamp must render identically wherever it is produced:
//! always `YYYY-MM-DDTHH:MM:SSZ`, no sub-seconds, no offset notation.
//!
//! Inputs are lenient. Operators pin timestamps through a CLI flag or
//! `SOURCE_DATE_EPOCH`, and both paths convert to UTC and truncate before
//! the value reaches a manifest.

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// A UTC timestamp with seconds precision.
///
/// # Construction
///
/// - [`Timestamp::now()`] current UTC time, truncated.
/// - [`Timestamp::parse_rfc3339()`] from an RFC 3339 string, any offset.
/// - [`Timestamp::from_epoch_secs()`] from a Unix epoch timestamp.
/// - [`Timestamp::from_utc()`] from a `DateTime<Utc>`, truncating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a timestamp from the current UTC time, truncated to seconds.
    pub fn now() -> Self {
        Self(truncate_to_seconds(Utc::now()))
    }

    /// Create a timestamp from a `chrono::DateTime<Utc>`, truncating
    /// sub-seconds.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(truncate_to_seconds(dt))
    }

    /// Parse a timestamp from an RFC 3339 string.
    ///
    /// Accepts any timezone offset and converts to UTC, so operators can
    /// pin `--generated-at` in local time. Sub-seconds are truncated.
    ///
    /// # Errors
    ///
    /// Returns the underlying `chrono` error when the string is not valid
    /// RFC 3339.
    pub fn parse_rfc3339(s: &str) -> Result<Self, chrono::ParseError> {
        let dt = DateTime::parse_from_rfc3339(s)?;
        Ok(Self(truncate_to_seconds(dt.with_timezone(&Utc))))
    }

    /// Create a timestamp from a Unix epoch timestamp (seconds), the
    /// `SOURCE_DATE_EPOCH` convention. Returns `None` when the value is
    /// out of chrono's representable range.
    pub fn from_epoch_secs(secs: i64) -> Option<Self> {
        DateTime::from_timestamp(secs, 0).map(Self)
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Render as ISO8601 with Z suffix (e.g. `2026-01-15T12:00:00Z`).
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

/// Truncate a `DateTime<Utc>` to seconds precision (discard nanoseconds).
fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}
