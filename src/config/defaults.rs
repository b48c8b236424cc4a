//! Built-in defaults (layer 1)

use plainmerge_classifier::{Record, Value};
use serde::{Deserialize, Serialize};

use crate::merge::{Vacancy, DEFAULT_MAX_DEPTH};

/// Built-in default configuration values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltinDefaults {
    /// Deepest record nesting a merge descends into (default: 128)
    pub max_depth: usize,

    /// Vacancy policy (default: "absent_or_null")
    pub vacancy: Vacancy,

    /// Pretty-print JSON output (default: true)
    pub pretty: bool,

    /// Sort keys in JSON output (default: false)
    pub sort_keys: bool,
}

impl Default for BuiltinDefaults {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            vacancy: Vacancy::AbsentOrNull,
            pretty: true,
            sort_keys: false,
        }
    }
}

impl BuiltinDefaults {
    /// Convert to a Value for merging
    pub fn to_value(&self) -> Value {
        let output: Record = [
            ("pretty", Value::Bool(self.pretty)),
            ("sort_keys", Value::Bool(self.sort_keys)),
        ]
        .into_iter()
        .collect();

        [
            ("max_depth", Value::from(self.max_depth as u64)),
            ("vacancy", Value::from(self.vacancy.as_str())),
            ("output", Value::Record(output)),
        ]
        .into_iter()
        .collect()
    }
}
