//! Free-text search over record attributes
//!
//! A record matches when any attribute's string form contains the query,
//! case-insensitively. Attributes are not limited to displayed columns.

use crate::record::{Record, display_string};

/// Whether `record` matches an already-lowercased, non-empty query
pub fn matches<R: Record>(record: &R, query_lower: &str) -> bool {
    let Ok(properties) = record.properties() else {
        return false;
    };
    properties
        .values()
        .any(|value| display_string(value).to_lowercase().contains(query_lower))
}

/// Positions of matching records, in collection order
///
/// An empty query matches everything.
pub fn filter_indices<R: Record>(records: &[R], query: &str) -> Vec<usize> {
    if query.is_empty() {
        return (0..records.len()).collect();
    }
    let query_lower = query.to_lowercase();
    records
        .iter()
        .enumerate()
        .filter(|(_, record)| matches(*record, &query_lower))
        .map(|(i, _)| i)
        .collect()
}

/// Matching records, cloned, in collection order
pub fn filter<R: Record>(records: &[R], query: &str) -> Vec<R> {
    filter_indices(records, query)
        .into_iter()
        .map(|i| records[i].clone())
        .collect()
}
