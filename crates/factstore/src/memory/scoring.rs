//! Relevance scoring for search
//!
//! Scores are small non-negative integers built from substring containment,
//! token overlap and a per-label priority bonus. A score of zero means the
//! record is not a match.

use std::collections::HashSet;

use crate::memory::types::{MemoryRecord, labels, normalize};

/// Default number of results returned by search
pub const DEFAULT_SEARCH_LIMIT: usize = 5;

const TEXT_CONTAINS_QUERY: u32 = 5;
const QUERY_CONTAINS_TEXT: u32 = 3;

/// Fixed bonus for a label. Unknown labels get the lowest bonus.
pub fn label_priority(label: &str) -> u32 {
    match label {
        labels::NAME => 10,
        labels::PREFERENCE => 6,
        labels::FACT => 4,
        _ => 2,
    }
}

/// Score a record against an already-normalized query.
///
/// Returns 0 when either the query or the record text is empty after
/// normalization; otherwise the label bonus alone guarantees a positive score.
pub fn score(normalized_query: &str, record: &MemoryRecord) -> u32 {
    let text = normalize(&record.text);
    if normalized_query.is_empty() || text.is_empty() {
        return 0;
    }

    let mut score = 0;
    if text.contains(normalized_query) {
        score += TEXT_CONTAINS_QUERY;
    }
    if normalized_query.contains(text.as_str()) {
        score += QUERY_CONTAINS_TEXT;
    }
    score += token_overlap(normalized_query, &text);
    score + label_priority(&record.label)
}

/// Number of distinct whitespace-delimited tokens present in both strings
fn token_overlap(a: &str, b: &str) -> u32 {
    let left: HashSet<&str> = a.split_whitespace().collect();
    let right: HashSet<&str> = b.split_whitespace().collect();
    left.intersection(&right).count() as u32
}

/// A record paired with its relevance score
#[derive(Debug, Clone)]
pub struct ScoredRecord {
    pub record: MemoryRecord,
    pub score: u32,
}

/// Score, filter and rank `records` against `query`.
///
/// Records scoring 0 are dropped. The rest are ordered by score descending;
/// equal scores keep their input order. At most `limit` results are returned.
pub fn rank(query: &str, records: Vec<MemoryRecord>, limit: usize) -> Vec<ScoredRecord> {
    let query = normalize(query);

    let mut scored: Vec<ScoredRecord> = records
        .into_iter()
        .map(|record| ScoredRecord {
            score: score(&query, &record),
            record,
        })
        .filter(|scored| scored.score > 0)
        .collect();

    // sort_by is stable, which keeps input order among equal scores
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored.truncate(limit);
    scored
}
