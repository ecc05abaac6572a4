//! Lazy TTL expiry
//!
//! Expired records are never swept in the background. Read paths filter them
//! out, and `upsert` drops them from what it writes back.

use chrono::{DateTime, Duration, Utc};

use crate::memory::types::MemoryRecord;

/// Instant at which a record expires, or `None` if it never does.
///
/// A TTL too large to represent as a timestamp offset never expires.
pub fn expires_at(record: &MemoryRecord) -> Option<DateTime<Utc>> {
    let ttl_ms = i64::try_from(record.ttl_ms?).ok()?;
    record
        .created_at
        .checked_add_signed(Duration::try_milliseconds(ttl_ms)?)
}

/// A record is expired once `created_at + ttl <= now`.
pub fn is_expired(record: &MemoryRecord, now: DateTime<Utc>) -> bool {
    expires_at(record).is_some_and(|deadline| deadline <= now)
}

/// Keep only records that are still live at `now`, preserving order.
pub fn filter_expired(records: Vec<MemoryRecord>, now: DateTime<Utc>) -> Vec<MemoryRecord> {
    records
        .into_iter()
        .filter(|record| !is_expired(record, now))
        .collect()
}
