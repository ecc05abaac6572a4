//! Memory record types
//!
//! Defines the stored fact (`MemoryRecord`), the write input for `add`
//! (`NewMemory`), and the text normalization that dedupe and scoring share.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::session::SessionKey;

/// Well-known labels. The vocabulary is open; any other string is legal.
pub mod labels {
    pub const NAME: &str = "name";
    pub const PREFERENCE: &str = "preference";
    pub const FACT: &str = "fact";
    pub const CONVERSATION: &str = "conversation";
}

/// Lower-case and trim a piece of text.
///
/// Two texts that differ only in surface casing or surrounding whitespace
/// normalize to the same string.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// A single remembered fact belonging to one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryRecord {
    /// Unique identifier, never reused or mutated
    pub id: Uuid,
    /// The owning session
    pub session_key: SessionKey,
    /// Category such as "name", "preference", "fact", "conversation"
    pub label: String,
    /// The fact itself
    pub text: String,
    /// When this record was first written
    pub created_at: DateTime<Utc>,
    /// When this record was last written or refreshed
    pub updated_at: DateTime<Utc>,
    /// Optional time-to-live in milliseconds, measured from `created_at`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl_ms: Option<u64>,
}

impl MemoryRecord {
    /// Create a fresh record stamped at `now`
    pub fn new(
        session_key: SessionKey,
        label: String,
        text: String,
        ttl_ms: Option<u64>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            session_key,
            label,
            text,
            created_at: now,
            updated_at: now,
            ttl_ms,
        }
    }

    /// The `(label, normalized text)` pair that dedupe collapses on
    pub fn dedupe_key(&self) -> DedupeKey {
        DedupeKey::new(&self.label, &self.text)
    }

    /// Whether this record matches the given label and text after normalization
    pub fn matches(&self, label: &str, text: &str) -> bool {
        self.dedupe_key() == DedupeKey::new(label, text)
    }

    /// Refresh `updated_at` and optionally replace the TTL.
    ///
    /// A `None` ttl keeps the existing one.
    pub fn touch(&mut self, now: DateTime<Utc>, ttl_ms: Option<u64>) {
        // Monotonic even if the wall clock steps back; updated_at >= created_at already
        self.updated_at = now.max(self.updated_at);
        if ttl_ms.is_some() {
            self.ttl_ms = ttl_ms;
        }
    }
}

/// Identity of a record for dedupe purposes.
///
/// Labels are compared verbatim; text is compared after [`normalize`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupeKey {
    label: String,
    text: String,
}

impl DedupeKey {
    pub fn new(label: &str, text: &str) -> Self {
        Self {
            label: label.to_string(),
            text: normalize(text),
        }
    }
}

/// A record without id or timestamps, as passed to `add`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMemory {
    pub label: String,
    pub text: String,
    #[serde(default)]
    pub ttl_ms: Option<u64>,
}

impl NewMemory {
    pub fn new(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            text: text.into(),
            ttl_ms: None,
        }
    }

    /// Set a time-to-live in milliseconds
    pub fn with_ttl_ms(mut self, ttl_ms: u64) -> Self {
        self.ttl_ms = Some(ttl_ms);
        self
    }
}

/// Whether an upsert refreshed an existing record or created a new one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpsertOutcome {
    Created,
    Updated,
}

/// Result of an upsert: the record itself plus what happened to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Upserted {
    pub record: MemoryRecord,
    pub outcome: UpsertOutcome,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn key() -> SessionKey {
        SessionKey::try_from("s1").unwrap()
    }

    fn at(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).unwrap()
    }

    #[test]
    fn test_normalize_trims_and_lowercases() {
        assert_eq!(normalize("  Likes TEA \n"), "likes tea");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn test_normalize_keeps_inner_whitespace() {
        assert_eq!(normalize("likes  tea"), "likes  tea");
    }

    #[test]
    fn test_new_record_timestamps_match() {
        let record = MemoryRecord::new(key(), "fact".into(), "x".into(), None, at(1_000));
        assert_eq!(record.created_at, record.updated_at);
        assert_eq!(record.created_at, at(1_000));
        assert!(record.ttl_ms.is_none());
    }

    #[test]
    fn test_dedupe_key_normalizes_text_not_label() {
        let a = MemoryRecord::new(key(), "fact".into(), "Likes Tea".into(), None, at(0));
        assert!(a.matches("fact", "  likes tea "));
        assert!(!a.matches("Fact", "likes tea"));
        assert!(!a.matches("preference", "likes tea"));
    }

    #[test]
    fn test_touch_keeps_ttl_when_none_given() {
        let mut record = MemoryRecord::new(key(), "fact".into(), "x".into(), Some(500), at(0));
        record.touch(at(100), None);
        assert_eq!(record.updated_at, at(100));
        assert_eq!(record.ttl_ms, Some(500));

        record.touch(at(200), Some(900));
        assert_eq!(record.updated_at, at(200));
        assert_eq!(record.ttl_ms, Some(900));
    }

    #[test]
    fn test_touch_never_moves_updated_before_created() {
        let mut record = MemoryRecord::new(key(), "fact".into(), "x".into(), None, at(1_000));
        record.touch(at(10), None);
        assert_eq!(record.updated_at, at(1_000));
    }

    #[test]
    fn test_touch_never_moves_updated_backwards() {
        let mut record = MemoryRecord::new(key(), "fact".into(), "x".into(), None, at(1_000));
        record.touch(at(5_000), None);
        record.touch(at(3_000), None);
        assert_eq!(record.updated_at, at(5_000));
    }

    #[test]
    fn test_record_serialization_roundtrip() {
        let record = MemoryRecord::new(
            key(),
            "preference".into(),
            "Dark mode".into(),
            Some(60_000),
            Utc::now(),
        );

        let json = serde_json::to_string(&record).expect("Failed to serialize record");
        let back: MemoryRecord = serde_json::from_str(&json).expect("Failed to deserialize");
        assert_eq!(record, back);
    }

    #[test]
    fn test_missing_ttl_deserializes_as_none() {
        let json = r#"{
            "id": "67e55044-10b1-426f-9247-bb680e5fe0c8",
            "session_key": "s1",
            "label": "fact",
            "text": "x",
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        }"#;
        let record: MemoryRecord = serde_json::from_str(json).unwrap();
        assert!(record.ttl_ms.is_none());
    }
}
