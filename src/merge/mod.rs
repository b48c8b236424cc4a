//! Recursive merge of plain data
//!
//! For each key of the source, in order:
//! - Plain objects: merged into the target's record at that key, creating
//!   one when the slot is vacant
//! - Everything else (scalars, null, arrays, opaque handles): overwrite,
//!   source wins, no cloning
//!
//! Arrays are leaves and are never combined element-wise.

mod error;
mod options;

pub use error::MergeError;
pub use options::{MergeOptions, Vacancy, DEFAULT_MAX_DEPTH};

use plainmerge_classifier::{classify, is_plain_object, KeyPath, Record, Value};
use tracing::{debug, trace, warn};

/// Merges values under a fixed set of options.
#[derive(Debug, Clone, Copy, Default)]
pub struct Merger {
    options: MergeOptions,
}

impl Merger {
    pub fn new(options: MergeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &MergeOptions {
        &self.options
    }

    /// Merge `source` into `target` and hand the target back.
    pub fn merge(&self, mut target: Value, source: Value) -> Result<Value, MergeError> {
        self.merge_into(&mut target, source)?;
        Ok(target)
    }

    /// Merge `source` into `target` in place.
    ///
    /// A source that is not a record has no keys to contribute and leaves
    /// the target untouched. A target that is not a record is only an error
    /// when the source actually has keys.
    pub fn merge_into(&self, target: &mut Value, source: Value) -> Result<(), MergeError> {
        let source = match source {
            Value::Record(record) => record,
            other => {
                warn!(kind = ?classify(&other), "source is not a record, nothing to merge");
                return Ok(());
            }
        };
        if source.is_empty() {
            return Ok(());
        }

        match target {
            Value::Record(record) => self.merge_records(record, source),
            other => Err(MergeError::IncompatibleTarget {
                path: KeyPath::root(),
                found: classify(other),
            }),
        }
    }

    /// Merge two records in place.
    pub fn merge_records(&self, target: &mut Record, source: Record) -> Result<(), MergeError> {
        debug!(
            target_keys = target.len(),
            source_keys = source.len(),
            vacancy = %self.options.vacancy,
            "merging records"
        );
        let mut path = KeyPath::root();
        self.merge_level(target, source, &mut path, 1)?;
        debug!(merged_keys = target.len(), "merge complete");
        Ok(())
    }

    fn merge_level(
        &self,
        target: &mut Record,
        source: Record,
        path: &mut KeyPath,
        depth: usize,
    ) -> Result<(), MergeError> {
        if depth > self.options.max_depth {
            return Err(MergeError::DepthLimitExceeded {
                path: path.clone(),
                limit: self.options.max_depth,
            });
        }

        for (key, value) in source {
            let plain = is_plain_object(&value);
            match value {
                Value::Record(child) if plain => {
                    path.push_key(key.clone());
                    let slot = target.entry(key).or_insert(Value::Null);
                    if self.options.vacancy.is_vacant(slot) {
                        trace!(path = %path, "vacant slot, starting a fresh record");
                        *slot = Value::Record(Record::new());
                    }
                    match slot {
                        Value::Record(existing) => {
                            trace!(path = %path, "recursing");
                            self.merge_level(existing, child, path, depth + 1)?;
                        }
                        other => {
                            return Err(MergeError::IncompatibleTarget {
                                path: path.clone(),
                                found: classify(other),
                            });
                        }
                    }
                    path.pop();
                }
                other => {
                    trace!(path = %path.child(key.as_str()), "overwriting");
                    target.insert(key, other);
                }
            }
        }
        Ok(())
    }
}

/// Merge `source` into `target` with default options and return the target.
pub fn merge(target: Value, source: Value) -> Result<Value, MergeError> {
    Merger::default().merge(target, source)
}

/// In-place form of [`merge`].
pub fn merge_into(target: &mut Value, source: Value) -> Result<(), MergeError> {
    Merger::default().merge_into(target, source)
}

/// Merge layers in order, first is base, last has highest precedence.
pub fn merge_layers<I>(layers: I) -> Result<Value, MergeError>
where
    I: IntoIterator<Item = Value>,
{
    Merger::default().merge_layers(layers)
}

impl Merger {
    /// Fold `layers` into a fresh record.
    pub fn merge_layers<I>(&self, layers: I) -> Result<Value, MergeError>
    where
        I: IntoIterator<Item = Value>,
    {
        layers
            .into_iter()
            .try_fold(Value::Record(Record::new()), |acc, layer| self.merge(acc, layer))
    }
}
