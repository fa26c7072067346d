// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The math behind relevance: field weights, match classification, ranking.
//!
//! Classification is strict first-match-wins across three tiers. If the
//! query is a literal prefix of the field, nothing else is even evaluated;
//! substring is only tried after prefix fails; fuzzy only after both literal
//! tiers fail. A field therefore contributes at most one [`Match`] per
//! record, and its kind is unambiguous.
//!
//! # Key invariant: prefix dominance
//!
//! Prefix is the top tier by priority, not by arithmetic: a field that
//! starts with the query is classified prefix before the substring formula
//! is ever evaluated. Its score is `weight x 20`, double the substring base
//! of `weight x 10`.
//!
//! # Substring score floor
//!
//! Every substring match scores at least the field weight: the position
//! penalty can push `10 + bonus - penalty` below 1, but the floor clamps the
//! final score at `weight`.

use crate::config::SearchConfig;
use crate::fields;
use crate::levenshtein;
use crate::types::{FieldStats, Match, MatchKind, SearchResult};
use serde_json::Value;
use std::cmp::Ordering;

// =============================================================================
// WEIGHT INFERENCE CONSTANTS
// =============================================================================

/// Records sampled per collection when inferring field weights. Fixed cap,
/// independent of collection size, so inference stays cheap on large inputs.
pub const WEIGHT_SAMPLE_SIZE: usize = 100;

/// Base weight for title-like fields (`title`, `name`, `heading`).
pub const TITLE_FIELD_WEIGHT: f64 = 5.0;

/// Base weight for summary-like fields (`description`, `summary`, `subtitle`).
pub const SUMMARY_FIELD_WEIGHT: f64 = 3.0;

/// Base weight for body-like fields (`content`, `body`, `text`) and anything
/// unrecognized.
pub const BODY_FIELD_WEIGHT: f64 = 1.0;

// Length multipliers: shorter fields are denser. A 30-char title says more
// per character than a 5000-char body, even when both carry a body-like name.
const SHORT_FIELD_MULTIPLIER: f64 = 2.0; // avg < 50 chars
const MEDIUM_FIELD_MULTIPLIER: f64 = 1.5; // avg < 100 chars
const LONG_FIELD_MULTIPLIER: f64 = 1.2; // avg < 300 chars

// =============================================================================
// MATCH SCORING CONSTANTS
// =============================================================================

/// Prefix matches score `weight x 20` - the top tier, always.
pub const PREFIX_SCORE_MULTIPLIER: f64 = 20.0;

/// Substring base term before length bonus and position penalty.
pub const SUBSTRING_BASE_SCORE: f64 = 10.0;

/// Score lost per character of match position within the field.
const POSITION_PENALTY_PER_CHAR: f64 = 0.1;

/// Words shorter than this never enter fuzzy comparison.
const MIN_FUZZY_WORD_LENGTH: usize = 3;

/// Fuzzy base term; the short-text bonus is added on top.
const FUZZY_BASE_SCORE: f64 = 2.0;

// =============================================================================
// FIELD WEIGHT INFERENCE
// =============================================================================

/// Derive a field's importance from its name and its average text length
/// across a bounded sample of the collection.
///
/// The name heuristic looks only at the last path segment, case-insensitively:
/// `author.name` weighs like `name`. Fields that are absent or empty in every
/// sampled record get `average_length` 0, which lands in the shortest bucket.
pub fn estimate_field(sample: &[Value], path: &str) -> FieldStats {
    let mut total_chars = 0usize;
    let mut populated = 0usize;
    for record in sample.iter().take(WEIGHT_SAMPLE_SIZE) {
        if let Some(text) = fields::extract(record, path) {
            total_chars += text.chars().count();
            populated += 1;
        }
    }
    let average_length = if populated > 0 {
        total_chars as f64 / populated as f64
    } else {
        0.0
    };
    FieldStats {
        path: path.to_string(),
        average_length,
        weight: base_weight(path) * length_multiplier(average_length),
    }
}

/// Name heuristic over the last path segment.
fn base_weight(path: &str) -> f64 {
    let leaf = path.rsplit('.').next().unwrap_or(path);
    match leaf.to_ascii_lowercase().as_str() {
        "title" | "name" | "heading" => TITLE_FIELD_WEIGHT,
        "description" | "summary" | "subtitle" => SUMMARY_FIELD_WEIGHT,
        "content" | "body" | "text" => BODY_FIELD_WEIGHT,
        _ => BODY_FIELD_WEIGHT,
    }
}

/// Density multiplier by average field length.
fn length_multiplier(average_length: f64) -> f64 {
    if average_length < 50.0 {
        SHORT_FIELD_MULTIPLIER
    } else if average_length < 100.0 {
        MEDIUM_FIELD_MULTIPLIER
    } else if average_length < 300.0 {
        LONG_FIELD_MULTIPLIER
    } else {
        1.0
    }
}

// =============================================================================
// MATCH CLASSIFICATION
// =============================================================================

/// Classify one field's text against the query.
///
/// Returns the single best match for the field, or `None` when no tier
/// fires. Both `text` and `query` must be non-empty; empty either is no
/// match. Unless `case_sensitive` is set, both sides are lowercased before
/// comparison. The returned [`Match`] has an empty `field` - the engine tags
/// it with the field path.
pub fn match_field(text: &str, query: &str, weight: f64, config: &SearchConfig) -> Option<Match> {
    if text.is_empty() || query.is_empty() {
        return None;
    }
    if config.case_sensitive {
        classify(text, text, query, weight, config)
    } else {
        let text_lowered = text.to_lowercase();
        let query_lowered = query.to_lowercase();
        classify(text, &text_lowered, &query_lowered, weight, config)
    }
}

/// The tier cascade over pre-normalized strings.
///
/// `value` is the original text (kept verbatim in the match); `text` and
/// `query` are the comparison forms - lowercased unless the call is
/// case-sensitive. Split out from [`match_field`] so the engine can feed it
/// memoized lowercase transforms without changing behavior.
pub(crate) fn classify(
    value: &str,
    text: &str,
    query: &str,
    weight: f64,
    config: &SearchConfig,
) -> Option<Match> {
    // Tier 1: prefix. Maximum priority regardless of any other factor.
    if text.starts_with(query) {
        return Some(Match {
            field: String::new(),
            value: value.to_string(),
            score: weight * PREFIX_SCORE_MULTIPLIER,
            kind: MatchKind::Prefix,
            position: Some(0),
        });
    }

    let text_len = text.chars().count();

    // Tier 2: substring, scored by first occurrence.
    if let Some(position) = char_position(text, query) {
        let length_bonus = (100.0 / text_len as f64).max(1.0);
        let position_penalty = position as f64 * POSITION_PENALTY_PER_CHAR;
        let score = (weight * (SUBSTRING_BASE_SCORE + length_bonus - position_penalty)).max(weight);
        return Some(Match {
            field: String::new(),
            value: value.to_string(),
            score,
            kind: MatchKind::Substring,
            position: Some(position),
        });
    }

    // Tier 3: fuzzy, word by word, best candidate wins.
    let query_len = query.chars().count();
    if query_len < config.min_fuzzy_length {
        return None;
    }

    let short_text_bonus = FUZZY_BASE_SCORE + (50.0 / text_len as f64).max(1.0);
    let mut best_score: Option<f64> = None;
    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if word_len < MIN_FUZZY_WORD_LENGTH {
            continue;
        }
        let max_len = word_len.max(query_len);
        // Length difference is a lower bound on edit distance, so the best
        // similarity this word could reach is already known. Same division,
        // same rounding as the acceptance test below - skipping here can
        // never reject a word the full computation would have accepted.
        let reachable = (max_len - word_len.abs_diff(query_len)) as f64 / max_len as f64;
        if reachable < config.fuzzy_threshold {
            continue;
        }
        let dist = levenshtein::distance(word, query);
        let similarity = (max_len - dist) as f64 / max_len as f64;
        if similarity < config.fuzzy_threshold {
            continue;
        }
        let score = weight * similarity * short_text_bonus;
        if best_score.is_none_or(|best| score > best) {
            best_score = Some(score);
        }
    }

    best_score.map(|score| Match {
        field: String::new(),
        value: value.to_string(),
        score,
        kind: MatchKind::Fuzzy,
        position: None,
    })
}

/// First occurrence of `query` in `text`, as a character offset.
fn char_position(text: &str, query: &str) -> Option<usize> {
    text.find(query)
        .map(|byte_index| text[..byte_index].chars().count())
}

// =============================================================================
// RANKING
// =============================================================================

/// Compare two results for ranking.
///
/// Sort order:
/// 1. **Total score** - descending.
/// 2. **Matched text length** - ascending. On exact score ties, the record
///    whose matched field values are shorter in aggregate ranks first; less
///    text producing the same score is the more specific hit.
///
/// Used with a stable sort, full ties keep collection order, which makes
/// repeated calls byte-for-byte deterministic.
pub fn compare_results(a: &SearchResult, b: &SearchResult) -> Ordering {
    match b.score.partial_cmp(&a.score) {
        Some(ordering) if ordering != Ordering::Equal => ordering,
        _ => matched_text_length(a).cmp(&matched_text_length(b)),
    }
}

fn matched_text_length(result: &SearchResult) -> usize {
    result
        .matches
        .iter()
        .map(|m| m.value.chars().count())
        .sum()
}
