//! Merge options.

use plainmerge_classifier::Value;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default bound on record nesting.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Which target slots are replaced by a fresh record before recursing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Vacancy {
    /// Only a missing key or `null`.
    #[default]
    AbsentOrNull,
    /// Any falsy value: also `false`, `0`, `NaN` and `""`.
    Falsy,
}

impl Vacancy {
    /// Whether an existing slot counts as vacant. Missing keys always do.
    pub fn is_vacant(self, slot: &Value) -> bool {
        match self {
            Vacancy::AbsentOrNull => slot.is_null(),
            Vacancy::Falsy => slot.is_falsy(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Vacancy::AbsentOrNull => "absent_or_null",
            Vacancy::Falsy => "falsy",
        }
    }
}

impl fmt::Display for Vacancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Vacancy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "absent_or_null" | "absent-or-null" => Ok(Vacancy::AbsentOrNull),
            "falsy" => Ok(Vacancy::Falsy),
            other => Err(format!(
                "unknown vacancy policy '{}' (expected absent_or_null or falsy)",
                other
            )),
        }
    }
}

/// Options for [`Merger`](super::Merger).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeOptions {
    /// Deepest record nesting the merge will descend into.
    pub max_depth: usize,

    pub vacancy: Vacancy,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            vacancy: Vacancy::default(),
        }
    }
}
