// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Field resolution over arbitrary record shapes.
//!
//! Records are [`serde_json::Value`] trees, so the engine works against any
//! object shape without a schema. Two operations live here: walking a dotted
//! path to the string it addresses, and discovering every string-valued leaf
//! path in a record up to a depth bound.
//!
//! Absence is data, not an error. A missing segment, a non-object
//! intermediate, a non-string leaf - all of these resolve to "no value" and
//! contribute nothing to scoring.

use serde_json::Value;

/// Recursion bound for [`auto_detect`]: paths may be at most this many
/// segments deep.
pub const DEFAULT_MAX_DEPTH: usize = 3;

/// Resolve a dotted path against a record.
///
/// Returns the non-empty string at that path, or `None` if any segment is
/// missing, an intermediate value is not an object, or the leaf is not a
/// non-empty string. Never panics, never errors.
pub fn extract<'a>(record: &'a Value, path: &str) -> Option<&'a str> {
    let mut node = record;
    for segment in path.split('.') {
        node = node.as_object()?.get(segment)?;
    }
    match node {
        Value::String(text) if !text.is_empty() => Some(text.as_str()),
        _ => None,
    }
}

/// Auto-discover the string-valued leaf paths of a record, in declared key
/// order.
///
/// Non-empty string properties are detected at their dotted path; nested
/// objects are recursed into with `max_depth - 1`; arrays are never
/// descended into - their elements are not searchable automatically. At
/// `max_depth == 0` the walk stops and contributes no fields.
///
/// Detection order is the record's own key order (we build on
/// `serde_json`'s `preserve_order` feature), so repeated calls on the same
/// record are stable and deterministic.
pub fn auto_detect(record: &Value, max_depth: usize) -> Vec<String> {
    let mut fields = Vec::new();
    collect(record, None, max_depth, &mut fields);
    fields
}

fn collect(node: &Value, prefix: Option<&str>, depth: usize, out: &mut Vec<String>) {
    if depth == 0 {
        return;
    }
    let Some(map) = node.as_object() else {
        return;
    };
    for (key, value) in map {
        let path = match prefix {
            Some(prefix) => format!("{prefix}.{key}"),
            None => key.clone(),
        };
        match value {
            Value::String(text) if !text.is_empty() => out.push(path),
            Value::Object(_) => collect(value, Some(&path), depth - 1, out),
            // Arrays, numbers, booleans, nulls, empty strings: not searchable.
            _ => {}
        }
    }
}
