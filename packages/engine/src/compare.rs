//! Loose structural equality for round-trip verification.
//!
//! Two records are loosely equal when every scalar field matches by value,
//! sequences match element-wise in order, sets match as multisets, and
//! embedded records match recursively. Identity is compared only when both
//! sides carry one, so a pre-save record compares equal to its post-load
//! copy.

use crate::{FieldMap, FieldValue, Model};

/// Compare two records loosely.
///
/// Returns whether they match and, on mismatch, the path of the first
/// differing field (e.g. `"Inner.Count"`) for test-failure reporting.
pub fn loose_equals<M: Model>(a: &M, b: &M) -> (bool, Option<String>) {
    if !a.id().is_empty() && !b.id().is_empty() && a.id() != b.id() {
        return (false, Some("Id".to_string()));
    }
    match first_difference(&a.encode_fields(), &b.encode_fields(), "") {
        Some(path) => (false, Some(path)),
        None => (true, None),
    }
}

fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}

fn first_difference(a: &FieldMap, b: &FieldMap, prefix: &str) -> Option<String> {
    for (name, left) in a {
        let path = join(prefix, name);
        let Some(right) = b.get(name) else {
            return Some(path);
        };
        if let Some(diff) = value_difference(left, right, &path) {
            return Some(diff);
        }
    }
    // fields present only on the right side
    b.keys()
        .find(|name| !a.contains_key(name.as_str()))
        .map(|name| join(prefix, name))
}

fn value_difference(left: &FieldValue, right: &FieldValue, path: &str) -> Option<String> {
    match (left, right) {
        (FieldValue::Scalar(a), FieldValue::Scalar(b)) => (a != b).then(|| path.to_string()),
        (FieldValue::OptionalScalar(a), FieldValue::OptionalScalar(b)) => {
            (a != b).then(|| path.to_string())
        }
        (FieldValue::Sequence(a), FieldValue::Sequence(b)) => {
            // order matters
            (a != b).then(|| path.to_string())
        }
        (FieldValue::Set(a), FieldValue::Set(b)) => {
            // multiset comparison over canonical string forms
            let mut a: Vec<String> = a.iter().map(|s| s.to_store_string()).collect();
            let mut b: Vec<String> = b.iter().map(|s| s.to_store_string()).collect();
            a.sort();
            b.sort();
            (a != b).then(|| path.to_string())
        }
        (FieldValue::Embedded(a), FieldValue::Embedded(b)) => first_difference(a, b, path),
        (FieldValue::OptionalEmbedded(a), FieldValue::OptionalEmbedded(b)) => match (a, b) {
            (None, None) => None,
            (Some(a), Some(b)) => first_difference(a, b, path),
            _ => Some(path.to_string()),
        },
        _ => Some(path.to_string()),
    }
}
