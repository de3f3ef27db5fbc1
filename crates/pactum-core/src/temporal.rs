//! # Timestamps
//!
//! Invoices carry `created_at`/`last_updated`; messages and attachments
//! carry `time`. All of them end up inside canonical bytes, so a
//! [`Timestamp`] has exactly one textual form: `YYYY-MM-DDTHH:MM:SSZ`.
//! Sub-second precision is dropped when a value is created and offsets
//! other than `Z` are refused on input, including when deserializing a
//! transition received from a counterparty.

use std::str::FromStr;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::PactumError;

const FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    pub fn now() -> Self {
        Self::from_utc(Utc::now())
    }

    pub fn from_utc(at: DateTime<Utc>) -> Self {
        Self(at.trunc_subsecs(0))
    }

    /// Parse the `Z`-suffixed RFC 3339 form. A fractional second is
    /// accepted and dropped; `+00:00` is refused.
    pub fn parse(s: &str) -> Result<Self, PactumError> {
        if !s.ends_with('Z') {
            return Err(PactumError::InvalidValue(format!(
                "timestamp {s:?} is not UTC; expected a trailing Z"
            )));
        }
        DateTime::parse_from_rfc3339(s)
            .map(|at| Self::from_utc(at.with_timezone(&Utc)))
            .map_err(|e| PactumError::InvalidValue(format!("timestamp {s:?}: {e}")))
    }

    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }
}

impl FromStr for Timestamp {
    type Err = PactumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format(FORMAT))
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
