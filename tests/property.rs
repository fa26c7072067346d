//! Property-based tests using proptest.
//!
//! These pin the contracts that hold for arbitrary inputs: determinism,
//! the limit contract, case handling, and the edit-distance bounds the
//! fuzzy tier leans on.

mod common;

use proptest::prelude::*;
use scour::{
    distance, match_field, search, CollectionTag, MatchKind, SearchCache, SearchConfig,
    SearchEngine,
};
use serde_json::{json, Value};

// ============================================================================
// STRATEGIES
// ============================================================================

fn word_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z]{1,8}").unwrap()
}

fn sentence_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(word_strategy(), 1..6).prop_map(|words| words.join(" "))
}

/// Records over a small fixed key set, so field auto-detection has
/// something consistent to find.
fn record_strategy() -> impl Strategy<Value = Value> {
    (sentence_strategy(), sentence_strategy(), sentence_strategy()).prop_map(
        |(name, description, body)| {
            json!({
                "name": name,
                "description": description,
                "body": body,
            })
        },
    )
}

fn corpus_strategy() -> impl Strategy<Value = Vec<Value>> {
    prop::collection::vec(record_strategy(), 1..20)
}

// ============================================================================
// ENGINE PROPERTIES
// ============================================================================

proptest! {
    #[test]
    fn search_is_deterministic(records in corpus_strategy(), query in word_strategy()) {
        let engine = SearchEngine::new();
        let first = engine.search(&records, &query).unwrap();
        let second = engine.search(&records, &query).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn cache_state_never_changes_results(records in corpus_strategy(), query in word_strategy()) {
        let cacheless = SearchEngine::new().search(&records, &query).unwrap();

        let engine = SearchEngine::with_cache(SearchConfig::default(), SearchCache::new()).unwrap();
        let tag = CollectionTag::new();
        let cold = engine.search_tagged(tag, &records, &query).unwrap();
        let warm = engine.search_tagged(tag, &records, &query).unwrap();

        prop_assert_eq!(&cacheless, &cold);
        prop_assert_eq!(&cold, &warm);
    }

    #[test]
    fn limit_returns_head_of_unbounded_ranking(
        records in corpus_strategy(),
        query in word_strategy(),
        limit in 1usize..10,
    ) {
        let unbounded = SearchEngine::with_config(SearchConfig {
            limit: None,
            ..Default::default()
        })
        .unwrap()
        .search(&records, &query)
        .unwrap();

        let limited = SearchEngine::with_config(SearchConfig {
            limit: Some(limit),
            ..Default::default()
        })
        .unwrap()
        .search(&records, &query)
        .unwrap();

        prop_assert!(limited.len() <= limit);
        let expected = &unbounded[..unbounded.len().min(limit)];
        prop_assert_eq!(expected, &limited[..]);
    }

    #[test]
    fn query_casing_is_irrelevant_by_default(
        records in corpus_strategy(),
        query in word_strategy(),
    ) {
        let lower = search(&records, &query).unwrap();
        let upper = search(&records, &query.to_uppercase()).unwrap();
        prop_assert_eq!(lower, upper);
    }

    #[test]
    fn empty_query_echoes_collection(records in corpus_strategy()) {
        let results = search(&records, "").unwrap();
        prop_assert_eq!(results.len(), records.len());
        for (position, result) in results.iter().enumerate() {
            prop_assert_eq!(result.index, position);
            prop_assert_eq!(result.score, 0.0);
            prop_assert!(result.matches.is_empty());
        }
    }

    #[test]
    fn scores_ranked_descending(records in corpus_strategy(), query in word_strategy()) {
        let results = search(&records, &query).unwrap();
        for pair in results.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
        }
    }
}

// ============================================================================
// MATCHER PROPERTIES
// ============================================================================

proptest! {
    #[test]
    fn planted_substring_always_scores_at_least_weight(
        prefix in "[a-z]{1,10}",
        suffix in "[a-z ]{0,20}",
        query in "[a-z]{2,6}",
        weight in 1.0f64..10.0,
    ) {
        // Plant the query mid-text; "z" padding keeps it off position zero.
        let text = format!("z{prefix} {query}{suffix}");
        let config = SearchConfig::default();
        let matched = match_field(&text, &query, weight, &config);
        prop_assert!(matched.is_some());
        prop_assert!(matched.unwrap().score >= weight);
    }

    #[test]
    fn fuzzy_matches_respect_the_threshold(
        text in sentence_strategy(),
        query in "[a-z]{3,8}",
        threshold in 0.5f64..1.0,
    ) {
        let config = SearchConfig {
            fuzzy_threshold: threshold,
            ..Default::default()
        };
        if let Some(m) = match_field(&text, &query, 1.0, &config) {
            if m.kind == MatchKind::Fuzzy {
                // Recompute the best word similarity independently; the
                // matcher must not have accepted anything below threshold.
                let query_len = query.chars().count();
                let best = text
                    .split_whitespace()
                    .filter(|word| word.chars().count() >= 3)
                    .map(|word| {
                        let max_len = word.chars().count().max(query_len);
                        (max_len - distance(word, &query)) as f64 / max_len as f64
                    })
                    .fold(0.0f64, f64::max);
                prop_assert!(best >= threshold);
            }
        }
    }
}

// ============================================================================
// EDIT DISTANCE PROPERTIES
// ============================================================================

proptest! {
    #[test]
    fn distance_is_symmetric(a in word_strategy(), b in word_strategy()) {
        prop_assert_eq!(distance(&a, &b), distance(&b, &a));
    }

    #[test]
    fn distance_bounds(a in word_strategy(), b in word_strategy()) {
        let d = distance(&a, &b);
        let a_len = a.chars().count();
        let b_len = b.chars().count();
        prop_assert!(d <= a_len.max(b_len));
        prop_assert!(d >= a_len.abs_diff(b_len));
    }

    #[test]
    fn distance_zero_iff_equal(a in word_strategy(), b in word_strategy()) {
        prop_assert_eq!(distance(&a, &b) == 0, a == b);
    }

    #[test]
    fn single_substitution_is_distance_one(word in "[a-z]{2,8}") {
        let mut chars: Vec<char> = word.chars().collect();
        let original = chars[0];
        chars[0] = if original == 'x' { 'y' } else { 'x' };
        let mutated: String = chars.into_iter().collect();
        prop_assume!(mutated != word);
        prop_assert_eq!(distance(&word, &mutated), 1);
    }
}
