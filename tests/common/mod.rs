//! Shared test fixtures.

#![allow(dead_code)]

use serde_json::{json, Value};

/// The canonical three-person corpus: one prefix hit, one miss, one
/// substring hit for the query "john".
pub fn people() -> Vec<Value> {
    vec![
        json!({"name": "John Doe"}),
        json!({"name": "Jane Smith"}),
        json!({"name": "Bob Johnson"}),
    ]
}

/// A small nested corpus with title/description/author shapes.
pub fn articles() -> Vec<Value> {
    vec![
        json!({
            "title": "Getting Started with Rust",
            "description": "A beginner's guide to the language",
            "author": {"name": "Jane Doe"}
        }),
        json!({
            "title": "Async Patterns",
            "description": "Streams, executors, and where rust fits in",
            "author": {"name": "John Smith"}
        }),
        json!({
            "title": "Systems Programming",
            "description": "Memory, concurrency, performance",
            "author": {"name": "Ada Lovelace"}
        }),
    ]
}

/// `total` synthetic records; every second one contains the literal word
/// "target" in its name. Deterministic by construction.
pub fn synthetic(total: usize) -> Vec<Value> {
    (0..total)
        .map(|i| {
            if i % 2 == 0 {
                json!({ "name": format!("record {i} target entry") })
            } else {
                json!({ "name": format!("record {i} plain entry") })
            }
        })
        .collect()
}
