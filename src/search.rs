// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The scan-scoring loop: no index, every call walks the whole collection.
//!
//! One `search` call is a pure function of (collection, query, config):
//! resolve the field set (explicit or auto-detected), infer weights once per
//! field set, classify every field of every record, aggregate per record,
//! sort, truncate. Caches only move work around; they never change what
//! comes back.
//!
//! The per-record loop is embarrassingly parallel once field stats are
//! fixed, so with the `parallel` feature large collections fan out across
//! the rayon pool. The fan-out preserves input order on collect and the
//! final sort is stable, so worker scheduling can never leak into results.

use crate::cache::{CacheStats, SearchCache};
use crate::config::{SearchConfig, SearchOverrides};
use crate::fields::{self, DEFAULT_MAX_DEPTH};
use crate::scoring;
use crate::types::{CollectionTag, FieldStats, SearchError, SearchResult};
use serde_json::Value;
use std::borrow::Cow;
use tracing::{debug, trace};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Record count below which fanning out costs more than it saves.
#[cfg(feature = "parallel")]
const PARALLEL_THRESHOLD: usize = 512;

/// The relevance engine: a validated configuration plus optional caches.
///
/// Stateless between calls apart from the caches, which are performance-only.
/// Construction is the "factory" surface: build one engine around a base
/// configuration and reuse it, overriding per call with
/// [`search_with`](Self::search_with).
pub struct SearchEngine {
    config: SearchConfig,
    cache: Option<SearchCache>,
}

impl SearchEngine {
    /// An engine with the default configuration and no caches.
    pub fn new() -> Self {
        Self {
            config: SearchConfig::default(),
            cache: None,
        }
    }

    /// An engine closed over `config`. Rejects malformed configurations
    /// before any search runs.
    pub fn with_config(config: SearchConfig) -> Result<Self, SearchError> {
        config.validate()?;
        Ok(Self {
            config,
            cache: None,
        })
    }

    /// An engine with memoization attached. The cache is owned by the
    /// engine; use [`cache_stats`](Self::cache_stats) and
    /// [`clear_cache`](Self::clear_cache) to inspect and reset it.
    pub fn with_cache(config: SearchConfig, cache: SearchCache) -> Result<Self, SearchError> {
        config.validate()?;
        Ok(Self {
            config,
            cache: Some(cache),
        })
    }

    /// The configuration this engine was built around.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Rank `records` against `query` with the engine's base configuration.
    ///
    /// An empty (or whitespace-only) query is pass-through mode: one
    /// zero-score result per record, in collection order, no matching
    /// machinery involved. Otherwise only records with at least one field
    /// match come back, best first.
    pub fn search(&self, records: &[Value], query: &str) -> Result<Vec<SearchResult>, SearchError> {
        self.run(records, query, &self.config, None)
    }

    /// Like [`search`](Self::search), but keyed by a caller-held
    /// [`CollectionTag`] so field detection and weight inference can be
    /// reused across calls on the same collection. Pass a
    /// [`bumped`](CollectionTag::bumped) tag after changing the data.
    pub fn search_tagged(
        &self,
        tag: CollectionTag,
        records: &[Value],
        query: &str,
    ) -> Result<Vec<SearchResult>, SearchError> {
        self.run(records, query, &self.config, Some(tag))
    }

    /// Like [`search`](Self::search), with per-invocation overrides merged
    /// over the base configuration. Override keys replace base keys; the
    /// merged result is re-validated.
    pub fn search_with(
        &self,
        records: &[Value],
        query: &str,
        overrides: &SearchOverrides,
    ) -> Result<Vec<SearchResult>, SearchError> {
        let merged = self.config.merged(overrides);
        merged.validate()?;
        self.run(records, query, &merged, None)
    }

    /// The matched records themselves, rank order, scores and match lists
    /// dropped.
    pub fn matching_records<'a>(
        &self,
        records: &'a [Value],
        query: &str,
    ) -> Result<Vec<&'a Value>, SearchError> {
        Ok(self
            .search(records, query)?
            .iter()
            .map(|result| &records[result.index])
            .collect())
    }

    /// Cache occupancy, or `None` when the engine runs cacheless.
    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.as_ref().map(SearchCache::stats)
    }

    /// Drop all cached state. Safe at any time; only latency changes.
    pub fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.clear();
        }
    }

    fn run(
        &self,
        records: &[Value],
        query: &str,
        config: &SearchConfig,
        tag: Option<CollectionTag>,
    ) -> Result<Vec<SearchResult>, SearchError> {
        if query.trim().is_empty() {
            trace!(records = records.len(), "empty query, pass-through");
            return Ok(records
                .iter()
                .enumerate()
                .map(|(index, _)| SearchResult {
                    index,
                    score: 0.0,
                    matches: Vec::new(),
                })
                .collect());
        }

        let field_paths = self.resolve_fields(records, config, tag);
        let stats = self.resolve_stats(records, &field_paths, tag);
        debug!(
            records = records.len(),
            fields = field_paths.len(),
            "scoring pass"
        );

        // Weight resolution happens once per field, not once per record:
        // explicit override first, inferred stats otherwise.
        let weights: Vec<f64> = field_paths
            .iter()
            .zip(&stats)
            .map(|(path, stat)| {
                config
                    .field_weights
                    .get(path)
                    .copied()
                    .unwrap_or(stat.weight)
            })
            .collect();

        let query_cmp: Cow<'_, str> = if config.case_sensitive {
            Cow::Borrowed(query)
        } else {
            Cow::Owned(query.to_lowercase())
        };

        let mut results =
            self.score_all(records, &field_paths, &weights, &query_cmp, config);

        results.sort_by(scoring::compare_results);

        if let Some(limit) = config.limit {
            if limit > 0 {
                results.truncate(limit);
            }
        }
        Ok(results)
    }

    /// The ordered field set: explicit from config, else auto-detected from
    /// the first record. An empty collection has no fields to detect.
    fn resolve_fields(
        &self,
        records: &[Value],
        config: &SearchConfig,
        tag: Option<CollectionTag>,
    ) -> Vec<String> {
        if let Some(fields) = &config.fields {
            return fields.clone();
        }
        let Some(first) = records.first() else {
            return Vec::new();
        };
        match (tag, &self.cache) {
            (Some(tag), Some(cache)) => {
                cache.field_list(tag, || fields::auto_detect(first, DEFAULT_MAX_DEPTH))
            }
            _ => fields::auto_detect(first, DEFAULT_MAX_DEPTH),
        }
    }

    fn resolve_stats(
        &self,
        records: &[Value],
        field_paths: &[String],
        tag: Option<CollectionTag>,
    ) -> Vec<FieldStats> {
        let estimate = || {
            field_paths
                .iter()
                .map(|path| scoring::estimate_field(records, path))
                .collect::<Vec<_>>()
        };
        match (tag, &self.cache) {
            (Some(tag), Some(cache)) => cache.field_stats(tag, field_paths, estimate),
            _ => estimate(),
        }
    }

    #[cfg(feature = "parallel")]
    fn score_all(
        &self,
        records: &[Value],
        field_paths: &[String],
        weights: &[f64],
        query_cmp: &str,
        config: &SearchConfig,
    ) -> Vec<SearchResult> {
        if records.len() >= PARALLEL_THRESHOLD {
            // Order-preserving collect: the fan-out is invisible in the output.
            records
                .par_iter()
                .enumerate()
                .filter_map(|(index, record)| {
                    self.score_record(index, record, field_paths, weights, query_cmp, config)
                })
                .collect()
        } else {
            records
                .iter()
                .enumerate()
                .filter_map(|(index, record)| {
                    self.score_record(index, record, field_paths, weights, query_cmp, config)
                })
                .collect()
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn score_all(
        &self,
        records: &[Value],
        field_paths: &[String],
        weights: &[f64],
        query_cmp: &str,
        config: &SearchConfig,
    ) -> Vec<SearchResult> {
        records
            .iter()
            .enumerate()
            .filter_map(|(index, record)| {
                self.score_record(index, record, field_paths, weights, query_cmp, config)
            })
            .collect()
    }

    /// Score one record across the resolved field set. `None` when nothing
    /// matched - including for null records, which are skipped, not errors.
    fn score_record(
        &self,
        index: usize,
        record: &Value,
        field_paths: &[String],
        weights: &[f64],
        query_cmp: &str,
        config: &SearchConfig,
    ) -> Option<SearchResult> {
        if record.is_null() {
            return None;
        }
        let mut matches = Vec::new();
        let mut total = 0.0;
        for (path, weight) in field_paths.iter().zip(weights) {
            let Some(value) = fields::extract(record, path) else {
                continue;
            };
            let text_cmp: Cow<'_, str> = if config.case_sensitive {
                Cow::Borrowed(value)
            } else if let Some(cache) = &self.cache {
                Cow::Owned(cache.lowered(value))
            } else {
                Cow::Owned(value.to_lowercase())
            };
            if let Some(mut field_match) =
                scoring::classify(value, &text_cmp, query_cmp, *weight, config)
            {
                field_match.field = path.clone();
                total += field_match.score;
                matches.push(field_match);
            }
        }
        if matches.is_empty() {
            None
        } else {
            Some(SearchResult {
                index,
                score: total,
                matches,
            })
        }
    }
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// One-shot search with the default configuration. Minimal ceremony:
///
/// ```
/// use serde_json::json;
///
/// let records = vec![json!({"name": "John Doe"}), json!({"name": "Jane Smith"})];
/// let results = scour::search(&records, "john").unwrap();
/// assert_eq!(results.len(), 1);
/// ```
pub fn search(records: &[Value], query: &str) -> Result<Vec<SearchResult>, SearchError> {
    SearchEngine::new().search(records, query)
}
