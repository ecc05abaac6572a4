//! Memory records and the pure algorithms over them
//!
//! Everything here is storage-agnostic: expiry filtering, dedupe, relevance
//! scoring and fact extraction operate on in-memory record sequences.

pub mod expiry;
pub mod extraction;
pub mod merge;
pub mod scoring;
pub mod types;

pub use expiry::{expires_at, filter_expired, is_expired};
pub use extraction::{FactExtractor, VerbatimExtractor};
pub use merge::dedupe;
pub use scoring::{DEFAULT_SEARCH_LIMIT, ScoredRecord, label_priority, rank, score};
pub use types::{DedupeKey, MemoryRecord, NewMemory, UpsertOutcome, Upserted, labels, normalize};
