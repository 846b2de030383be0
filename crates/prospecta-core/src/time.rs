// SPDX-FileCopyrightText: 2026 Prospecta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Timestamp helpers.
//!
//! All persisted timestamps are RFC 3339 strings in UTC with millisecond
//! precision, matching the store's `strftime('%Y-%m-%dT%H:%M:%fZ', 'now')`
//! defaults, so values written by Rust and by SQL compare and parse the same
//! way.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::ProspectaError;

/// Current UTC time as an RFC 3339 string.
pub fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Whole seconds elapsed between two stored timestamps.
pub fn seconds_between(start: &str, end: &str) -> Result<i64, ProspectaError> {
    let start = parse(start)?;
    let end = parse(end)?;
    Ok(end.signed_duration_since(start).num_seconds())
}

fn parse(value: &str) -> Result<DateTime<chrono::FixedOffset>, ProspectaError> {
    DateTime::parse_from_rfc3339(value)
        .map_err(|e| ProspectaError::Internal(format!("bad timestamp `{value}`: {e}")))
}
