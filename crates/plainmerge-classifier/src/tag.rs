//! Internal class tags.
//!
//! Every value answers the universal `[object X]` tag query. Primitives report
//! their boxed type, objects report their built-in class. Class instances
//! report the generic `Object` tag, which is why the tag alone cannot tell a
//! plain record from an instance of an empty class.

use serde::{Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;

/// The `[object X]` tag of a value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ObjectTag {
    Null,
    Boolean,
    Number,
    String,
    /// Records and class instances.
    Object,
    Array,
    Date,
    RegExp,
    Map,
    Set,
    WeakMap,
    WeakSet,
    Error,
    Promise,
    Function,
    /// Host-defined tag (`Symbol.toStringTag` or an embedder class).
    Host(Cow<'static, str>),
}

impl ObjectTag {
    /// The bare class name, without the `[object ]` wrapper.
    pub fn name(&self) -> &str {
        match self {
            ObjectTag::Null => "Null",
            ObjectTag::Boolean => "Boolean",
            ObjectTag::Number => "Number",
            ObjectTag::String => "String",
            ObjectTag::Object => "Object",
            ObjectTag::Array => "Array",
            ObjectTag::Date => "Date",
            ObjectTag::RegExp => "RegExp",
            ObjectTag::Map => "Map",
            ObjectTag::Set => "Set",
            ObjectTag::WeakMap => "WeakMap",
            ObjectTag::WeakSet => "WeakSet",
            ObjectTag::Error => "Error",
            ObjectTag::Promise => "Promise",
            ObjectTag::Function => "Function",
            ObjectTag::Host(name) => name.as_ref(),
        }
    }

    /// Tags carried by primitives rather than objects.
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            ObjectTag::Null | ObjectTag::Boolean | ObjectTag::Number | ObjectTag::String
        )
    }
}

impl fmt::Display for ObjectTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[object {}]", self.name())
    }
}

impl Serialize for ObjectTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
