//! Scan-based relevance ranking: search without an index.
//!
//! Given any collection of JSON-shaped records and a free-text query, rank
//! the records by relevance with per-field match diagnostics. Nothing is
//! indexed and nothing persists: every call is a full scan with field
//! auto-detection, weighting, three-tier match classification, and ranking.
//! The sweet spot is in-process search over collections that change often
//! or live for one request - configuration lists, API responses, UI tables -
//! where building an index would cost more than scanning ever will.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────┐
//! │  fields.rs  │────▶│  scoring.rs  │────▶│  search.rs   │
//! │ (extract,   │     │ (weights,    │     │ (SearchEngine│
//! │ auto_detect)│     │  match tiers,│     │  scan loop)  │
//! └─────────────┘     │  ranking)    │     └──────────────┘
//!        │            └──────┬───────┘            │
//!        │                   ▼                    ▼
//!        │          ┌────────────────┐    ┌──────────────┐
//!        │          │ levenshtein.rs │    │   cache.rs   │
//!        │          │ (edit distance)│    │ (optional    │
//!        │          └────────────────┘    │  memoization)│
//!        └────────────────────────────────┴──────────────┘
//! ```
//!
//! # Match tiers
//!
//! Each field of each record is classified exactly once, first tier wins:
//!
//! | Tier      | Fires when                           | Score                                  |
//! |-----------|--------------------------------------|----------------------------------------|
//! | Prefix    | field starts with query              | `weight x 20`                          |
//! | Substring | query occurs inside field            | `weight x (10 + bonus - penalty)`, floored at `weight` |
//! | Fuzzy     | a word is within edit tolerance      | `weight x similarity x short-text bonus` |
//!
//! # Usage
//!
//! ```
//! use serde_json::json;
//! use scour::SearchEngine;
//!
//! let records = vec![
//!     json!({"title": "Rust in Action", "author": {"name": "Jane"}}),
//!     json!({"title": "Advanced Python", "author": {"name": "John Rustad"}}),
//! ];
//!
//! let engine = SearchEngine::new();
//! let results = engine.search(&records, "rust").unwrap();
//!
//! assert_eq!(results.len(), 2);
//! // The title prefix outranks the substring inside the author name.
//! assert_eq!(results[0].index, 0);
//! ```

// Module declarations
mod cache;
mod config;
mod fields;
mod levenshtein;
mod scoring;
mod search;
mod types;

// Re-exports for public API
pub use cache::{CacheStats, SearchCache, DEFAULT_LOWERCASE_CAP};
pub use config::{
    SearchConfig, SearchOverrides, DEFAULT_FUZZY_THRESHOLD, DEFAULT_LIMIT, DEFAULT_MIN_FUZZY_LENGTH,
};
pub use fields::{auto_detect, extract, DEFAULT_MAX_DEPTH};
pub use levenshtein::distance;
pub use scoring::{
    compare_results, estimate_field, match_field, BODY_FIELD_WEIGHT, PREFIX_SCORE_MULTIPLIER,
    SUBSTRING_BASE_SCORE, SUMMARY_FIELD_WEIGHT, TITLE_FIELD_WEIGHT, WEIGHT_SAMPLE_SIZE,
};
pub use search::{search, SearchEngine};
pub use types::{
    CollectionTag, FieldStats, Match, MatchKind, SearchError, SearchResult,
};
