//! Opaque object handles.
//!
//! Anything that is an object but not plain data lives behind an [`Opaque`]
//! handle: built-ins with a specialised tag, class instances, host objects
//! and functions. Handles are reference counted; cloning one shares the same
//! underlying object, and equality is identity.

use chrono::{DateTime, FixedOffset};
use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::tag::ObjectTag;

/// Shared handle to a non-plain object.
#[derive(Clone)]
pub struct Opaque(Arc<Handle>);

struct Handle {
    tag: ObjectTag,
    /// Custom prototypes between the object and the base prototype,
    /// most-derived first. Empty for built-ins.
    lineage: Vec<String>,
    payload: Option<Box<dyn Any + Send + Sync>>,
}

impl Opaque {
    fn from_parts(
        tag: ObjectTag,
        lineage: Vec<String>,
        payload: Option<Box<dyn Any + Send + Sync>>,
    ) -> Self {
        Self(Arc::new(Handle {
            tag,
            lineage,
            payload,
        }))
    }

    /// A built-in object with a specialised tag (Map, Set, RegExp, ...).
    pub fn builtin(tag: ObjectTag) -> Self {
        Self::from_parts(tag, Vec::new(), None)
    }

    /// A built-in object carrying host data.
    pub fn builtin_with_payload<T: Any + Send + Sync>(tag: ObjectTag, payload: T) -> Self {
        Self::from_parts(tag, Vec::new(), Some(Box::new(payload)))
    }

    /// A `Date` holding `at`.
    pub fn date(at: DateTime<FixedOffset>) -> Self {
        Self::builtin_with_payload(ObjectTag::Date, at)
    }

    /// A host object reporting a custom tag.
    pub fn host(tag: impl Into<Cow<'static, str>>) -> Self {
        Self::builtin(ObjectTag::Host(tag.into()))
    }

    /// A function value.
    pub fn function(name: impl Into<String>) -> Self {
        Self::from_parts(ObjectTag::Function, vec![name.into()], None)
    }

    /// An instance of `class`, which extends the base prototype directly.
    pub fn instance(class: impl Into<String>) -> Self {
        Self::from_parts(ObjectTag::Object, vec![class.into()], None)
    }

    /// An instance of `class`, whose ancestors are given most-derived first.
    pub fn instance_with_lineage<I, S>(class: impl Into<String>, ancestors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut lineage = vec![class.into()];
        lineage.extend(ancestors.into_iter().map(Into::into));
        Self::from_parts(ObjectTag::Object, lineage, None)
    }

    /// An instance of `class` carrying host data.
    pub fn instance_with_payload<T: Any + Send + Sync>(class: impl Into<String>, payload: T) -> Self {
        Self::from_parts(ObjectTag::Object, vec![class.into()], Some(Box::new(payload)))
    }

    pub fn tag(&self) -> &ObjectTag {
        &self.0.tag
    }

    /// Class lineage, most-derived first. For functions this is the
    /// function name.
    pub fn lineage(&self) -> &[String] {
        &self.0.lineage
    }

    /// Name of the most-derived class, if this is a class instance.
    pub fn class_name(&self) -> Option<&str> {
        match self.0.tag {
            ObjectTag::Object => self.0.lineage.first().map(String::as_str),
            _ => None,
        }
    }

    pub fn is_function(&self) -> bool {
        self.0.tag == ObjectTag::Function
    }

    /// Number of prototype links from this object to the terminal ancestor.
    ///
    /// Built-ins sit two links away (their own prototype, then the base
    /// prototype). Instances sit one link per class plus the base. A handle
    /// is never one link away, so it never classifies as plain.
    pub fn prototype_hops(&self) -> usize {
        match self.0.tag {
            ObjectTag::Object if !self.0.lineage.is_empty() => self.0.lineage.len() + 1,
            _ => 2,
        }
    }

    /// Borrow the payload if it has type `T`.
    pub fn payload<T: Any>(&self) -> Option<&T> {
        self.0.payload.as_ref().and_then(|p| p.downcast_ref::<T>())
    }

    /// The timestamp of a `Date` handle.
    pub fn as_date(&self) -> Option<&DateTime<FixedOffset>> {
        match self.0.tag {
            ObjectTag::Date => self.payload::<DateTime<FixedOffset>>(),
            _ => None,
        }
    }

    /// Whether both handles point at the same object.
    pub fn ptr_eq(&self, other: &Opaque) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Number of live handles sharing this object.
    pub fn share_count(&self) -> usize {
        Arc::strong_count(&self.0)
    }
}

impl PartialEq for Opaque {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for Opaque {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.class_name() {
            Some(class) => write!(f, "Opaque({} instance)", class),
            None => write!(f, "Opaque({})", self.0.tag),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clone_shares_handle() {
        let a = Opaque::instance("Foo");
        let b = a.clone();
        assert!(a.ptr_eq(&b));
        assert_eq!(a, b);
        assert_eq!(a.share_count(), 2);
    }

    #[test]
    fn test_distinct_handles_are_not_equal() {
        assert_ne!(Opaque::instance("Foo"), Opaque::instance("Foo"));
    }

    #[test]
    fn test_prototype_hops() {
        assert_eq!(Opaque::instance("Foo").prototype_hops(), 2);
        assert_eq!(
            Opaque::instance_with_lineage("Bar", ["Foo"]).prototype_hops(),
            3
        );
        assert_eq!(Opaque::builtin(ObjectTag::Map).prototype_hops(), 2);
        assert_eq!(Opaque::builtin(ObjectTag::Object).prototype_hops(), 2);
    }

    #[test]
    fn test_date_payload() {
        let at = DateTime::parse_from_rfc3339("2024-05-01T12:00:00+02:00").unwrap();
        let date = Opaque::date(at);
        assert_eq!(date.tag(), &ObjectTag::Date);
        assert_eq!(date.as_date(), Some(&at));
        assert!(date.class_name().is_none());
    }

    #[test]
    fn test_instance_payload_downcast() {
        let handle = Opaque::instance_with_payload("Counter", 7u32);
        assert_eq!(handle.payload::<u32>(), Some(&7));
        assert_eq!(handle.payload::<String>(), None);
        assert_eq!(handle.class_name(), Some("Counter"));
    }

    #[test]
    fn test_debug_names_class() {
        assert_eq!(format!("{:?}", Opaque::instance("Foo")), "Opaque(Foo instance)");
        assert_eq!(
            format!("{:?}", Opaque::builtin(ObjectTag::Set)),
            "Opaque([object Set])"
        );
    }
}
