//! Search configuration: the recognized options for one search call.
//!
//! A [`SearchConfig`] is validated once, up front, and then treated as
//! immutable for the duration of a call. Per-invocation tweaks go through
//! [`SearchOverrides`], a shallow merge where every `Some` replaces the base
//! value wholesale - no deep merging of weight maps or field lists.

use crate::types::SearchError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Minimum normalized similarity for a fuzzy match, unless overridden.
pub const DEFAULT_FUZZY_THRESHOLD: f64 = 0.7;

/// Minimum query length before fuzzy matching is attempted.
pub const DEFAULT_MIN_FUZZY_LENGTH: usize = 3;

/// Default cap on returned results.
pub const DEFAULT_LIMIT: usize = 100;

/// Immutable option set for a search call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Fields to search, in order. `None` auto-detects from the first record.
    pub fields: Option<Vec<String>>,
    /// Explicit per-field weight overrides. Always win over inference.
    pub field_weights: HashMap<String, f64>,
    /// Minimum normalized similarity in `[0, 1]` to accept a fuzzy match.
    pub fuzzy_threshold: f64,
    /// Minimum query length (chars) before fuzzy matching is attempted.
    pub min_fuzzy_length: usize,
    /// Result cap. `None` or `Some(0)` disables the cap.
    pub limit: Option<usize>,
    /// Compare raw strings instead of lowercasing both sides first.
    pub case_sensitive: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            fields: None,
            field_weights: HashMap::new(),
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
            min_fuzzy_length: DEFAULT_MIN_FUZZY_LENGTH,
            limit: Some(DEFAULT_LIMIT),
            case_sensitive: false,
        }
    }
}

impl SearchConfig {
    /// A configuration with all defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject malformed option sets before any scoring work begins.
    ///
    /// This is the only place the engine hard-fails. Everything past
    /// validation treats oddities as data.
    pub fn validate(&self) -> Result<(), SearchError> {
        if !self.fuzzy_threshold.is_finite() || !(0.0..=1.0).contains(&self.fuzzy_threshold) {
            return Err(SearchError::InvalidInput(format!(
                "fuzzy_threshold must be in [0, 1], got {}",
                self.fuzzy_threshold
            )));
        }
        if self.min_fuzzy_length < 1 {
            return Err(SearchError::InvalidInput(
                "min_fuzzy_length must be at least 1".to_string(),
            ));
        }
        for (path, weight) in &self.field_weights {
            if !weight.is_finite() || *weight <= 0.0 {
                return Err(SearchError::InvalidInput(format!(
                    "field weight for {path:?} must be a positive number, got {weight}"
                )));
            }
        }
        if let Some(fields) = &self.fields {
            if fields.iter().any(|path| path.is_empty()) {
                return Err(SearchError::InvalidInput(
                    "field paths must be non-empty".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// The base configuration with `overrides` applied on top.
    ///
    /// Override keys replace base keys; an absent key keeps the base value.
    #[must_use]
    pub fn merged(&self, overrides: &SearchOverrides) -> SearchConfig {
        let mut merged = self.clone();
        if let Some(fields) = &overrides.fields {
            merged.fields = Some(fields.clone());
        }
        if let Some(weights) = &overrides.field_weights {
            merged.field_weights = weights.clone();
        }
        if let Some(threshold) = overrides.fuzzy_threshold {
            merged.fuzzy_threshold = threshold;
        }
        if let Some(min_len) = overrides.min_fuzzy_length {
            merged.min_fuzzy_length = min_len;
        }
        if let Some(limit) = overrides.limit {
            merged.limit = Some(limit);
        }
        if let Some(case_sensitive) = overrides.case_sensitive {
            merged.case_sensitive = case_sensitive;
        }
        merged
    }
}

/// Per-invocation configuration overrides.
///
/// Every field mirrors [`SearchConfig`]; `None` keeps the base value. To
/// disable the result cap per call, override `limit` to `Some(0)`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOverrides {
    pub fields: Option<Vec<String>>,
    pub field_weights: Option<HashMap<String, f64>>,
    pub fuzzy_threshold: Option<f64>,
    pub min_fuzzy_length: Option<usize>,
    pub limit: Option<usize>,
    pub case_sensitive: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SearchConfig::default();
        assert_eq!(config.fuzzy_threshold, DEFAULT_FUZZY_THRESHOLD);
        assert_eq!(config.min_fuzzy_length, DEFAULT_MIN_FUZZY_LENGTH);
        assert_eq!(config.limit, Some(DEFAULT_LIMIT));
        assert!(!config.case_sensitive);
        assert!(config.fields.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range_threshold() {
        let config = SearchConfig {
            fuzzy_threshold: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = SearchConfig {
            fuzzy_threshold: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_min_fuzzy_length() {
        let config = SearchConfig {
            min_fuzzy_length: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_positive_weight() {
        let mut config = SearchConfig::default();
        config.field_weights.insert("title".into(), 0.0);
        assert!(config.validate().is_err());

        config.field_weights.insert("title".into(), -2.0);
        assert!(config.validate().is_err());

        config.field_weights.insert("title".into(), 2.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_field_path() {
        let config = SearchConfig {
            fields: Some(vec!["title".into(), String::new()]),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_merge_replaces_only_overridden_keys() {
        let base = SearchConfig {
            fuzzy_threshold: 0.8,
            case_sensitive: true,
            ..Default::default()
        };
        let overrides = SearchOverrides {
            fuzzy_threshold: Some(0.5),
            ..Default::default()
        };
        let merged = base.merged(&overrides);
        assert_eq!(merged.fuzzy_threshold, 0.5);
        assert!(merged.case_sensitive); // untouched
        assert_eq!(merged.limit, Some(DEFAULT_LIMIT)); // untouched
    }

    #[test]
    fn test_merge_weight_map_is_shallow() {
        let mut base = SearchConfig::default();
        base.field_weights.insert("title".into(), 5.0);
        base.field_weights.insert("body".into(), 1.0);

        let mut new_weights = HashMap::new();
        new_weights.insert("title".into(), 2.0);
        let overrides = SearchOverrides {
            field_weights: Some(new_weights),
            ..Default::default()
        };

        // The whole map is replaced, not merged key-by-key.
        let merged = base.merged(&overrides);
        assert_eq!(merged.field_weights.get("title"), Some(&2.0));
        assert_eq!(merged.field_weights.get("body"), None);
    }

    #[test]
    fn test_merge_limit_zero_disables_cap() {
        let base = SearchConfig::default();
        let overrides = SearchOverrides {
            limit: Some(0),
            ..Default::default()
        };
        assert_eq!(base.merged(&overrides).limit, Some(0));
    }

    #[test]
    fn test_config_roundtrips_through_json() {
        let mut config = SearchConfig::default();
        config.fields = Some(vec!["title".into(), "author.name".into()]);
        config.field_weights.insert("title".into(), 5.0);

        let json = serde_json::to_string(&config).unwrap();
        let back: SearchConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.fields, config.fields);
        assert_eq!(back.fuzzy_threshold, config.fuzzy_threshold);
    }
}
