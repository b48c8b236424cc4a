//! Merge behaviour corpus tests
//!
//! Concrete (target, source, expected) cases plus the error surface.

use plainmerge::{
    classify, merge, merge_into, KeyPath, MergeError, MergeOptions, Merger, ObjectTag, Opaque,
    Record, Vacancy, Value, ValueKind,
};
use serde_json::json;

fn v(json: serde_json::Value) -> Value {
    Value::from(json)
}

fn check(target: serde_json::Value, source: serde_json::Value, expected: serde_json::Value) {
    let result = merge(v(target.clone()), v(source.clone()))
        .unwrap_or_else(|e| panic!("merge({target}, {source}) failed: {e}"));
    assert_eq!(result, v(expected), "merge({target}, {source})");
}

// =============================================================================
// Category 1: Combination
// =============================================================================

#[test]
fn test_disjoint_keys_union() {
    check(json!({"a": 1}), json!({"b": 2}), json!({"a": 1, "b": 2}));
}

#[test]
fn test_source_wins_on_scalars() {
    check(json!({"a": 1}), json!({"a": "one"}), json!({"a": "one"}));
    check(json!({"a": true}), json!({"a": null}), json!({"a": null}));
}

#[test]
fn test_nested_records_combine() {
    check(
        json!({"a": 1, "b": {"x": 1}}),
        json!({"b": {"y": 2}, "c": 3}),
        json!({"a": 1, "b": {"x": 1, "y": 2}, "c": 3}),
    );
}

#[test]
fn test_array_replaces_record() {
    check(json!({"a": {"x": 1}}), json!({"a": [1, 2]}), json!({"a": [1, 2]}));
}

#[test]
fn test_record_replaces_nothing_but_fills_missing() {
    check(json!({}), json!({"a": {"b": {"c": 1}}}), json!({"a": {"b": {"c": 1}}}));
}

#[test]
fn test_scalar_replaces_record() {
    check(json!({"a": {"x": 1}}), json!({"a": 5}), json!({"a": 5}));
}

#[test]
fn test_arrays_of_records_are_not_merged() {
    check(
        json!({"rules": [{"min": 1}, {"max": 9}]}),
        json!({"rules": [{"pattern": "x"}]}),
        json!({"rules": [{"pattern": "x"}]}),
    );
}

#[test]
fn test_wizard_step_schemas() {
    // Per-step rule fragments folded into one cumulative schema.
    let steps = [
        json!({"name": {"type": "string", "required": true}}),
        json!({"email": {"type": "email"}}),
        json!({"name": {"max": 40}, "email": {"required": true}}),
    ];
    let mut schema = v(json!({}));
    for step in steps {
        merge_into(&mut schema, v(step)).unwrap();
    }
    assert_eq!(
        schema,
        v(json!({
            "name": {"type": "string", "required": true, "max": 40},
            "email": {"type": "email", "required": true}
        }))
    );
}

// =============================================================================
// Category 2: Identity and ownership
// =============================================================================

#[test]
fn test_empty_source_returns_target() {
    check(json!({"a": [1], "b": {"c": 2}}), json!({}), json!({"a": [1], "b": {"c": 2}}));
}

#[test]
fn test_idempotent_after_empty_merge() {
    let once = merge(v(json!({"a": {"x": 1}})), v(json!({"a": {"y": 2}, "b": 3}))).unwrap();
    let twice = merge(once.clone(), v(json!({}))).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn test_opaque_handles_shared_not_copied() {
    let handle = Opaque::instance("Validator");
    let mut nested = Record::new();
    nested.insert("validator", handle.clone());
    let source: Value = [("field", Value::Record(nested))].into_iter().collect();

    let result = merge(v(json!({"field": {"label": "Name"}})), source).unwrap();

    let stored = result
        .pointer("/field/validator")
        .and_then(Value::as_opaque)
        .unwrap();
    assert!(stored.ptr_eq(&handle));
    assert_eq!(result.pointer("/field/label"), Some(&Value::from("Name")));
}

#[test]
fn test_class_instance_in_source_is_not_recursed() {
    let handle = Opaque::instance_with_payload("Point", (1, 2));
    let source: Value = [("p", Value::Opaque(handle.clone()))].into_iter().collect();
    let result = merge(v(json!({"p": {"x": 0}})), source).unwrap();
    assert_eq!(result.get("p"), Some(&Value::Opaque(handle)));
}

#[test]
fn test_generic_builtin_in_source_is_not_recursed() {
    // Tagged `Object` but not a record: classified and merged as a leaf.
    let handle = Opaque::builtin(ObjectTag::Object);
    assert_eq!(
        classify(&Value::Opaque(handle.clone())),
        ValueKind::OtherObject
    );

    let source: Value = [("p", Value::Opaque(handle.clone()))].into_iter().collect();
    let result = merge(v(json!({"p": {"x": 0}})), source).unwrap();
    assert_eq!(result.get("p"), Some(&Value::Opaque(handle)));
    assert_eq!(result.pointer("/p/x"), None);
}

// =============================================================================
// Category 3: Misuse
// =============================================================================

#[test]
fn test_incompatible_nested_target() {
    let err = merge(v(json!({"a": {"b": "text"}})), v(json!({"a": {"b": {"c": 1}}}))).unwrap_err();
    assert_eq!(
        err,
        MergeError::IncompatibleTarget {
            path: KeyPath::root().child("a").child("b"),
            found: ValueKind::Primitive,
        }
    );
}

#[test]
fn test_instance_target_is_incompatible() {
    let target: Value = [("p", Value::Opaque(Opaque::instance("Point")))]
        .into_iter()
        .collect();
    let err = merge(target, v(json!({"p": {"x": 1}}))).unwrap_err();
    assert!(matches!(
        err,
        MergeError::IncompatibleTarget {
            found: ValueKind::OtherObject,
            ..
        }
    ));
}

#[test]
fn test_array_target_keeps_its_items() {
    let mut target = v(json!({"tags": ["a", "b"]}));
    let err = merge_into(&mut target, v(json!({"tags": {"extra": true}}))).unwrap_err();
    assert_eq!(err.path().to_string(), "tags");
    assert!(matches!(
        err,
        MergeError::IncompatibleTarget {
            found: ValueKind::Array,
            ..
        }
    ));
    assert_eq!(target, v(json!({"tags": ["a", "b"]})));
}

#[test]
fn test_loose_vacancy_replaces_falsy_values() {
    let merger = Merger::new(MergeOptions {
        vacancy: Vacancy::Falsy,
        ..Default::default()
    });
    let result = merger
        .merge(
            v(json!({"a": 0, "b": false, "c": "", "d": null})),
            v(json!({"a": {"x": 1}, "b": {"x": 1}, "c": {"x": 1}, "d": {"x": 1}})),
        )
        .unwrap();
    assert_eq!(
        result,
        v(json!({"a": {"x": 1}, "b": {"x": 1}, "c": {"x": 1}, "d": {"x": 1}}))
    );
}

#[test]
fn test_deep_nesting_hits_limit_instead_of_overflowing() {
    let mut source = v(json!(1));
    for _ in 0..500 {
        source = [("n", source)].into_iter().collect();
    }
    let err = merge(v(json!({})), source).unwrap_err();
    match err {
        MergeError::DepthLimitExceeded { path, limit } => {
            assert_eq!(limit, 128);
            assert_eq!(path.segments().len(), 128);
        }
        other => panic!("unexpected error: {other}"),
    }
}
