//! Merge/dedupe engine
//!
//! Collapses records that share a `(label, normalized text)` key down to the
//! most recently updated one, then restores `created_at` order.

use std::collections::HashMap;

use crate::memory::types::{DedupeKey, MemoryRecord};

/// Collapse duplicates, keeping the greatest `updated_at` per key.
///
/// On an `updated_at` tie the record seen later in `records` wins. The output
/// is stably sorted by `created_at` ascending, so records created at the same
/// instant keep the relative order in which their key was first seen.
pub fn dedupe(records: Vec<MemoryRecord>) -> Vec<MemoryRecord> {
    let mut slots: HashMap<DedupeKey, usize> = HashMap::with_capacity(records.len());
    let mut survivors: Vec<MemoryRecord> = Vec::with_capacity(records.len());

    for record in records {
        match slots.get(&record.dedupe_key()) {
            Some(&slot) => {
                if survivors[slot].updated_at <= record.updated_at {
                    survivors[slot] = record;
                }
            }
            None => {
                slots.insert(record.dedupe_key(), survivors.len());
                survivors.push(record);
            }
        }
    }

    survivors.sort_by_key(|record| record.created_at);
    survivors
}
