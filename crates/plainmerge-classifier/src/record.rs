//! Plain data records.

use indexmap::map::{self, IndexMap};
use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Direct prototype of a record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Prototype {
    /// Literal `{}`: the base prototype, which is itself the terminal ancestor.
    #[default]
    Base,
    /// Created with a null prototype: no ancestry at all.
    Null,
}

/// Insertion-ordered mapping from string keys to values.
///
/// Equality ignores key order; iteration and serialization preserve it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    entries: IndexMap<String, Value>,
    prototype: Prototype,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty record with no prototype.
    pub fn with_null_prototype() -> Self {
        Self {
            entries: IndexMap::new(),
            prototype: Prototype::Null,
        }
    }

    pub fn prototype(&self) -> Prototype {
        self.prototype
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries.get_mut(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Insert or overwrite `key`. An overwritten key keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    /// Remove `key`, keeping the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.shift_remove(key)
    }

    pub fn entry(&mut self, key: String) -> map::Entry<'_, String, Value> {
        self.entries.entry(key)
    }

    pub fn keys(&self) -> map::Keys<'_, String, Value> {
        self.entries.keys()
    }

    pub fn values(&self) -> map::Values<'_, String, Value> {
        self.entries.values()
    }

    pub fn iter(&self) -> map::Iter<'_, String, Value> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> map::IterMut<'_, String, Value> {
        self.entries.iter_mut()
    }

    /// Sort entries by key, recursively.
    pub fn sort_keys(&mut self) {
        self.entries.sort_keys();
        for value in self.entries.values_mut() {
            value.sort_keys();
        }
    }
}

impl IntoIterator for Record {
    type Item = (String, Value);
    type IntoIter = map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Record {
    type Item = (&'a String, &'a Value);
    type IntoIter = map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            prototype: Prototype::Base,
        }
    }
}

impl<K: Into<String>, V: Into<Value>> Extend<(K, V)> for Record {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.entries
            .extend(iter.into_iter().map(|(k, v)| (k.into(), v.into())));
    }
}
