//! Tagged value model and plain-object classifier.
//!
//! A value is *object-like* when it is a non-null object other than a
//! function. It is a *plain object* when its tag is the generic `Object` tag
//! and its direct prototype is the terminal ancestor of its chain (or it has
//! no prototype at all). Both checks are needed: an instance of an empty
//! class carries the generic tag and is only told apart by its ancestry.

mod convert;
mod explain;
mod opaque;
mod path;
mod record;
mod tag;
mod value;

pub use convert::ConvertError;
pub use explain::ClassifyReport;
pub use opaque::Opaque;
pub use path::{KeyPath, Segment};
pub use record::{Prototype, Record};
pub use tag::ObjectTag;
pub use value::Value;

use serde::{Deserialize, Serialize};

/// Conceptual category of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Nullish,
    Primitive,
    Array,
    PlainObject,
    /// Built-ins with a specialised tag, class instances, host objects and
    /// functions.
    OtherObject,
}

/// The universal `[object X]` tag of `value`.
pub fn object_tag(value: &Value) -> ObjectTag {
    match value {
        Value::Null => ObjectTag::Null,
        Value::Bool(_) => ObjectTag::Boolean,
        Value::Number(_) => ObjectTag::Number,
        Value::String(_) => ObjectTag::String,
        Value::Array(_) => ObjectTag::Array,
        Value::Record(_) => ObjectTag::Object,
        Value::Opaque(handle) => handle.tag().clone(),
    }
}

/// Non-null and of runtime type "object". Functions are excluded.
pub fn is_object_like(value: &Value) -> bool {
    match value {
        Value::Array(_) | Value::Record(_) => true,
        Value::Opaque(handle) => !handle.is_function(),
        _ => false,
    }
}

/// Prototype links from `value` to the terminal ancestor of its chain.
///
/// `None` for primitives and for null-prototype records, which have no
/// ancestry at all. A literal record is one hop away; an instance sits one
/// hop further per class in its lineage.
pub fn prototype_hops(value: &Value) -> Option<usize> {
    match value {
        Value::Record(record) => match record.prototype() {
            Prototype::Base => Some(1),
            Prototype::Null => None,
        },
        // Array.prototype, then the base prototype.
        Value::Array(_) => Some(2),
        Value::Opaque(handle) => Some(handle.prototype_hops()),
        _ => None,
    }
}

/// Whether `value` is plain data.
pub fn is_plain_object(value: &Value) -> bool {
    if !is_object_like(value) || object_tag(value) != ObjectTag::Object {
        return false;
    }

    if let Value::Record(record) = value {
        if record.prototype() == Prototype::Null {
            return true;
        }
    }

    // The direct prototype must be the terminal ancestor itself.
    prototype_hops(value) == Some(1)
}

pub fn classify(value: &Value) -> ValueKind {
    match value {
        Value::Null => ValueKind::Nullish,
        Value::Bool(_) | Value::Number(_) | Value::String(_) => ValueKind::Primitive,
        Value::Array(_) => ValueKind::Array,
        _ if is_plain_object(value) => ValueKind::PlainObject,
        _ => ValueKind::OtherObject,
    }
}
