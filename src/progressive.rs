//! Cumulative step fragments
//!
//! A multi-step workflow keeps one fragment per step and, at step `i`,
//! works with the reduction of fragments `0..=i`. The usual reduction is a
//! shallow key overwrite; [`cumulative_deep`] uses the recursive merge
//! instead.

use plainmerge_classifier::{Record, Value};
use tracing::debug;

use crate::merge::{MergeError, Merger};

/// Shallow key overwrite: every key of `source` replaces the target's.
pub fn assign(target: &mut Record, source: &Record) {
    for (key, value) in source {
        target.insert(key.clone(), value.clone());
    }
}

/// Shallow prefix reductions, one per fragment.
pub fn cumulative<I>(fragments: I) -> Vec<Record>
where
    I: IntoIterator<Item = Record>,
{
    let mut acc = Record::new();
    fragments
        .into_iter()
        .map(|fragment| {
            assign(&mut acc, &fragment);
            acc.clone()
        })
        .collect()
}

/// Recursive prefix reductions, one per fragment.
pub fn cumulative_deep<I>(fragments: I, merger: &Merger) -> Result<Vec<Record>, MergeError>
where
    I: IntoIterator<Item = Record>,
{
    let mut acc = Record::new();
    let mut steps = Vec::new();
    for (step, fragment) in fragments.into_iter().enumerate() {
        debug!(step, keys = fragment.len(), "folding step fragment");
        merger.merge_records(&mut acc, fragment)?;
        steps.push(acc.clone());
    }
    Ok(steps)
}

/// Split a document into step fragments: a top-level array of records.
/// Non-record elements contribute an empty fragment.
pub fn fragments_from(value: Value) -> Vec<Record> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::Record(record) => record,
                _ => Record::new(),
            })
            .collect(),
        Value::Record(record) => vec![record],
        _ => Vec::new(),
    }
}
