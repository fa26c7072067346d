// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The building blocks of a search call.
//!
//! Everything here is created during one `search` invocation and handed to
//! the caller; the engine keeps no result state between calls. Records stay
//! owned by the caller - a [`SearchResult`] points back into the input slice
//! by index rather than borrowing or cloning the record.
//!
//! # Invariants (the stuff that breaks if you ignore it)
//!
//! - **Match**: exactly one [`MatchKind`] per (record, field) pair.
//!   Classification is first-match-wins in Prefix > Substring > Fuzzy order,
//!   so a field can never register as two kinds at once.
//! - **SearchResult**: `score` is the sum of `matches[i].score`. For a
//!   non-empty query, `matches` is non-empty. For the empty-query
//!   pass-through, `score == 0.0` and `matches` is empty.
//! - **CollectionTag**: equality means "same collection contents". The tag
//!   never observes the collection - the caller bumps the generation when
//!   the underlying data changes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

// =============================================================================
// MATCH CLASSIFICATION
// =============================================================================

/// How a field matched the query.
///
/// The three kinds are mutually exclusive per field and checked in this
/// order. Prefix is the top tier regardless of any other factor; fuzzy is
/// only attempted when neither literal tier fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    /// The field value starts with the query.
    Prefix,
    /// The query occurs somewhere inside the field value.
    Substring,
    /// A word in the field value is within edit-distance tolerance of the query.
    Fuzzy,
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Prefix => write!(f, "prefix"),
            Self::Substring => write!(f, "substring"),
            Self::Fuzzy => write!(f, "fuzzy"),
        }
    }
}

/// One field-level hit. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    /// Dotted path of the field that matched, e.g. `"author.name"`.
    pub field: String,
    /// The field's original (un-normalized) text.
    pub value: String,
    /// Weighted score contributed by this field.
    pub score: f64,
    /// Which tier classified the hit.
    pub kind: MatchKind,
    /// Character offset of the hit: `Some(0)` for prefix, first occurrence
    /// for substring, `None` for fuzzy (word-level, no single offset).
    pub position: Option<usize>,
}

/// One record's aggregate outcome for a search call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Index of the record in the caller's collection.
    pub index: usize,
    /// Sum of all match scores for this record.
    pub score: f64,
    /// Per-field hits, in resolved field order.
    pub matches: Vec<Match>,
}

// =============================================================================
// DERIVED FIELD STATISTICS
// =============================================================================

/// Per-field aggregate derived from a bounded sample of the collection.
///
/// Computed once per distinct (collection, field set) pair and never mutated
/// in place - a changed collection gets a fresh set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldStats {
    /// Dotted path of the field.
    pub path: String,
    /// Mean character length across sampled records with a non-empty value.
    pub average_length: f64,
    /// Inferred importance weight (name heuristic x length multiplier).
    pub weight: f64,
}

// =============================================================================
// COLLECTION IDENTITY
// =============================================================================

/// Caller-held identity handle for a collection, used as a cache key.
///
/// There is no reliable way to observe "same collection as last time" from
/// a borrowed slice, so identity is explicit: create one tag per logical
/// collection, pass it to [`search_tagged`](crate::SearchEngine::search_tagged),
/// and call [`bumped`](Self::bumped) whenever the underlying data changes.
/// Stale generations simply stop matching cache entries; no guessing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CollectionTag {
    id: u64,
    generation: u64,
}

impl CollectionTag {
    /// A fresh tag with a process-unique id and generation 0.
    pub fn new() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(0);
        Self {
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
            generation: 0,
        }
    }

    /// The same collection identity, next generation. Entries keyed by the
    /// previous generation no longer match, which is all invalidation means.
    #[must_use]
    pub fn bumped(self) -> Self {
        Self {
            id: self.id,
            generation: self.generation + 1,
        }
    }

    /// Current generation counter.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Default for CollectionTag {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// ERRORS
// =============================================================================

/// The one error kind the engine surfaces.
///
/// Missing fields, null records, absent paths, and empty inputs are data
/// conditions, handled by empty/absent values in the scoring loop. Only a
/// caller contract violation - a malformed configuration - is rejected, and
/// always before any scoring work begins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// Malformed configuration or override set.
    InvalidInput(String),
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput(reason) => write!(f, "invalid input: {reason}"),
        }
    }
}

impl std::error::Error for SearchError {}
