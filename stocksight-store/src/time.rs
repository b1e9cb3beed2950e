//! Timestamp encoding for TEXT columns.
//!
//! Every timestamp is written as RFC 3339 UTC with millisecond precision and a `Z` suffix
//! (`2024-03-10T14:30:00.000Z`), so lexical order in SQL equals chronological order.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::StoreError;

pub(crate) fn encode(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub(crate) fn decode(s: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::Corrupt(format!("bad timestamp {s:?}: {e}")))
}

pub(crate) fn span(d: std::time::Duration) -> Result<chrono::Duration, StoreError> {
    chrono::Duration::from_std(d).map_err(|e| StoreError::Config(format!("{d:?}: {e}")))
}
