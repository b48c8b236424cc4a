//! plainmerge - plain-object classification and recursive deep merge
//!
//! The classifier and value model live in `plainmerge-classifier`; this
//! crate adds the merge engine, cumulative step fragments, document loading
//! and the layered configuration used by the `plainmerge` binary.

pub mod config;
pub mod document;
pub mod merge;
pub mod progressive;

pub use merge::{merge, merge_into, merge_layers, MergeError, MergeOptions, Merger, Vacancy};
pub use plainmerge_classifier::{
    classify, is_object_like, is_plain_object, object_tag, prototype_hops, ClassifyReport,
    ConvertError, KeyPath, ObjectTag, Opaque, Prototype, Record, Value, ValueKind,
};
