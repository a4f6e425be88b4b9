//! # Temporal Types: Wire-Faithful UTC Timestamps
//!
//! Defines `Timestamp`, an RFC 3339 timestamp that remembers both the UTC
//! instant it denotes and the exact text it was parsed from.
//!
//! ## Invariants
//!
//! - Comparison and ordering use the UTC instant at full nanosecond
//!   precision. Two credentials one microsecond apart are ordered.
//! - Serialization writes the original text back unchanged, so a decoded
//!   and re-encoded credential keeps the byte sequence an external signer
//!   computed its proof over.
//!
//! ## Parsing Policies
//!
//! - [`Timestamp::parse()`] is strict: only the `Z` suffix is accepted.
//! - [`Timestamp::parse_lenient()`] accepts any RFC 3339 offset and
//!   converts the instant to UTC (the text is still kept verbatim).

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

/// Why a string could not be read as a [`Timestamp`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimestampError {
    /// Not RFC 3339.
    #[error("invalid RFC 3339 timestamp {input:?}: {reason}")]
    Invalid {
        /// The rejected input.
        input: String,
        /// Parser diagnostic.
        reason: String,
    },

    /// Valid RFC 3339 but not `Z`-suffixed, under the strict policy.
    #[error("timestamp must use Z suffix (UTC only), got: {0:?}")]
    NonUtc(String),
}

/// A UTC instant together with its source text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Timestamp {
    instant: DateTime<Utc>,
    text: String,
}

impl Timestamp {
    /// The current UTC time, rendered with the shortest exact sub-second
    /// precision and a `Z` suffix.
    pub fn now() -> Self {
        Self::from_utc(Utc::now())
    }

    /// Create a timestamp from a `chrono::DateTime<Utc>`.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self {
            instant: dt,
            text: dt.to_rfc3339_opts(SecondsFormat::AutoSi, true),
        }
    }

    /// Parse a timestamp, accepting only the `Z` suffix.
    ///
    /// Even `+00:00` is rejected.
    pub fn parse(s: &str) -> Result<Self, TimestampError> {
        if !s.ends_with('Z') {
            return Err(TimestampError::NonUtc(s.to_string()));
        }
        Self::parse_lenient(s)
    }

    /// Parse a timestamp with any RFC 3339 offset.
    pub fn parse_lenient(s: &str) -> Result<Self, TimestampError> {
        let dt = DateTime::parse_from_rfc3339(s).map_err(|e| TimestampError::Invalid {
            input: s.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            instant: dt.with_timezone(&Utc),
            text: s.to_string(),
        })
    }

    /// Access the UTC instant.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.instant
    }

    /// The source text, exactly as parsed.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Returns the Unix epoch timestamp in seconds.
    pub fn epoch_secs(&self) -> i64 {
        self.instant.timestamp()
    }

    /// Returns `true` if `self` denotes a strictly later instant than `other`.
    pub fn is_after(&self, other: &Timestamp) -> bool {
        self.instant > other.instant
    }
}

impl PartialOrd for Timestamp {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Timestamp {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.instant
            .cmp(&other.instant)
            .then_with(|| self.text.cmp(&other.text))
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.text)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse_lenient(&raw).map_err(serde::de::Error::custom)
    }
}
