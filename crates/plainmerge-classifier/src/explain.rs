//! Structured and human-readable classification reports.

use serde::Serialize;

use crate::{
    classify, is_object_like, is_plain_object, object_tag, prototype_hops, ObjectTag, Value,
    ValueKind,
};

/// Why a value did or did not classify as plain.
#[derive(Debug, Clone, Serialize)]
pub struct ClassifyReport {
    /// Location of the value in its document (JSON pointer)
    pub pointer: String,

    pub kind: ValueKind,

    /// `[object X]` tag
    pub tag: ObjectTag,

    pub object_like: bool,

    pub plain: bool,

    /// Hops to the terminal ancestor; absent for primitives and
    /// null-prototype records
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prototype_hops: Option<usize>,

    /// Own key count for records, element count for arrays
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<usize>,

    /// Human-readable explanation
    pub explanation: String,
}

impl ClassifyReport {
    pub fn new(pointer: impl Into<String>, value: &Value) -> Self {
        let kind = classify(value);
        let tag = object_tag(value);
        let object_like = is_object_like(value);
        let plain = is_plain_object(value);
        let hops = prototype_hops(value);
        let size = match value {
            Value::Record(record) => Some(record.len()),
            Value::Array(items) => Some(items.len()),
            _ => None,
        };
        let explanation = Self::generate_explanation(&tag, object_like, plain, hops);

        Self {
            pointer: pointer.into(),
            kind,
            tag,
            object_like,
            plain,
            prototype_hops: hops,
            size,
            explanation,
        }
    }

    fn generate_explanation(
        tag: &ObjectTag,
        object_like: bool,
        plain: bool,
        hops: Option<usize>,
    ) -> String {
        if !object_like {
            return format!("{} is not object-like", tag);
        }
        if *tag != ObjectTag::Object {
            return format!("{} is object-like but carries a specialised tag", tag);
        }
        match (plain, hops) {
            (true, None) => "null prototype: plain by definition".to_string(),
            (true, _) => "direct prototype is the terminal ancestor".to_string(),
            (false, Some(h)) => format!(
                "{} prototype links to the terminal ancestor: instance of a class",
                h
            ),
            (false, None) => "not plain".to_string(),
        }
    }

    /// Format as JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Format as human-readable text
    pub fn to_human(&self) -> String {
        let location = if self.pointer.is_empty() {
            "(document)"
        } else {
            self.pointer.as_str()
        };
        let mut lines = vec![
            format!("Value: {}", location),
            format!("Kind: {:?}", self.kind),
            format!("Tag: {}", self.tag),
            format!("Plain: {}", if self.plain { "yes" } else { "no" }),
        ];
        if let Some(size) = self.size {
            lines.push(format!("Size: {}", size));
        }
        lines.push(String::new());
        lines.push(self.explanation.clone());
        lines.join("\n")
    }
}
