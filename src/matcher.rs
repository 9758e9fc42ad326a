//! Coverage matching between structural keys and format keys.
//!
//! A structural key matches a format key when their token sort ratio reaches
//! [`SIMILARITY_THRESHOLD`], or when it reaches the threshold against any
//! synonym of the format key. A mapping *covers* a set of format keys when
//! every format key is matched by at least one of its keys.

use serde_json::{Map, Value};

use crate::error::{Result, ShapeseekError};
use crate::similarity::{process_and_sort, ratio, token_sort_ratio};
use crate::synonym::{SynonymOverrides, SynonymResolver};

/// Minimum token sort ratio (0-100) for two keys to be considered equal.
pub const SIMILARITY_THRESHOLD: u8 = 70;

/// Decides whether keys match, resolving synonyms on demand.
#[derive(Debug, Clone, Default)]
pub struct CoverageMatcher {
    resolver: SynonymResolver,
}

impl CoverageMatcher {
    pub fn new(resolver: SynonymResolver) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &SynonymResolver {
        &self.resolver
    }

    /// Whether `structural_key` matches `format_key` directly or through one
    /// of its synonyms.
    pub fn key_matches(
        &self,
        structural_key: &str,
        format_key: &str,
        overrides: &SynonymOverrides,
    ) -> bool {
        if token_sort_ratio(structural_key, format_key) >= SIMILARITY_THRESHOLD {
            return true;
        }

        self.resolver
            .resolve(format_key, overrides)
            .iter()
            .any(|synonym| token_sort_ratio(structural_key, synonym) >= SIMILARITY_THRESHOLD)
    }

    /// Resolve every format key's synonyms once, for use across a whole
    /// extraction.
    ///
    /// Empty format keys are rejected; duplicates are collapsed keeping the
    /// first occurrence.
    pub fn plan<S: AsRef<str>>(
        &self,
        format_keys: &[S],
        overrides: &SynonymOverrides,
    ) -> Result<CoveragePlan> {
        let mut keys: Vec<FormatKey> = Vec::with_capacity(format_keys.len());

        for key in format_keys {
            let key = key.as_ref();
            if key.is_empty() {
                return Err(ShapeseekError::invalid_argument(
                    "format keys must not be empty strings",
                ));
            }
            if keys.iter().any(|k| k.key == key) {
                continue;
            }

            let mut synonyms: Vec<String> = self
                .resolver
                .resolve(key, overrides)
                .iter()
                .map(|s| process_and_sort(s))
                .collect();
            synonyms.sort_unstable();
            synonyms.dedup();

            keys.push(FormatKey {
                key: key.to_string(),
                processed: process_and_sort(key),
                synonyms,
            });
        }

        Ok(CoveragePlan { keys })
    }
}

/// A format key with its synonyms, pre-processed for comparison.
#[derive(Debug, Clone)]
pub struct FormatKey {
    key: String,
    processed: String,
    synonyms: Vec<String>,
}

impl FormatKey {
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Number of distinct processed synonyms.
    pub fn synonym_count(&self) -> usize {
        self.synonyms.len()
    }

    /// Match against a structural key already run through
    /// [`process_and_sort`].
    fn matches_processed(&self, structural: &str) -> bool {
        ratio(structural, &self.processed) >= SIMILARITY_THRESHOLD
            || self
                .synonyms
                .iter()
                .any(|synonym| ratio(structural, synonym) >= SIMILARITY_THRESHOLD)
    }
}

/// Result of evaluating one mapping node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoverageOutcome {
    pub covered: bool,
    /// Structural/format key pairs compared before coverage was decided.
    pub comparisons: u64,
}

/// Format keys prepared for evaluating many mapping nodes.
#[derive(Debug, Clone)]
pub struct CoveragePlan {
    keys: Vec<FormatKey>,
}

impl CoveragePlan {
    pub fn keys(&self) -> &[FormatKey] {
        &self.keys
    }

    /// Evaluate whether `mapping` covers every format key.
    ///
    /// An empty plan covers every mapping.
    pub fn evaluate(&self, mapping: &Map<String, Value>) -> CoverageOutcome {
        let mut matched = vec![false; self.keys.len()];
        let mut remaining = self.keys.len();
        let mut comparisons = 0;

        for structural_key in mapping.keys() {
            if remaining == 0 {
                break;
            }
            let structural = process_and_sort(structural_key);

            for (format_key, is_matched) in self.keys.iter().zip(matched.iter_mut()) {
                if *is_matched {
                    continue;
                }
                comparisons += 1;
                if format_key.matches_processed(&structural) {
                    *is_matched = true;
                    remaining -= 1;
                }
            }
        }

        CoverageOutcome {
            covered: remaining == 0,
            comparisons,
        }
    }

    pub fn covers(&self, mapping: &Map<String, Value>) -> bool {
        self.evaluate(mapping).covered
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::lexicon::InMemoryLexicon;

    fn matcher() -> CoverageMatcher {
        let lexicon = InMemoryLexicon::from_synonym_groups(vec![vec![
            "happy".to_string(),
            "joyful".to_string(),
        ]]);
        CoverageMatcher::new(SynonymResolver::new(Arc::new(lexicon)))
    }

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_direct_and_fuzzy_match() {
        let m = matcher();
        let none = SynonymOverrides::new();
        assert!(m.key_matches("name", "name", &none));
        assert!(m.key_matches("nam", "name", &none));
        assert!(m.key_matches("addr", "address", &none));
        assert!(!m.key_matches("city", "address", &none));
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let m = CoverageMatcher::default();
        let none = SynonymOverrides::new();

        assert_eq!(token_sort_ratio("abcdefgxyz", "abcdefghij"), SIMILARITY_THRESHOLD);
        assert!(m.key_matches("abcdefgxyz", "abcdefghij", &none));

        assert_eq!(
            token_sort_ratio("abcdefghijklmnopqrs", "abcdefghij"),
            SIMILARITY_THRESHOLD - 1
        );
        assert!(!m.key_matches("abcdefghijklmnopqrs", "abcdefghij", &none));

        let plan = m.plan(&["abcdefghij"], &none).unwrap();
        assert!(plan.covers(&object(json!({"abcdefgxyz": 1}))));
        assert!(!plan.covers(&object(json!({"abcdefghijklmnopqrs": 1}))));
    }

    #[test]
    fn test_synonym_match() {
        let m = matcher();
        let none = SynonymOverrides::new();
        assert!(token_sort_ratio("joyful", "happy") < SIMILARITY_THRESHOLD);
        assert!(m.key_matches("joyful", "happy", &none));
        assert!(m.key_matches("Joyful!", "happy", &none));
    }

    #[test]
    fn test_override_match() {
        let m = matcher();
        let overrides = SynonymOverrides::new().with("happy", ["elated"]);
        assert!(!m.key_matches("elated", "happy", &SynonymOverrides::new()));
        assert!(m.key_matches("elated", "happy", &overrides));
    }

    #[test]
    fn test_plan_rejects_empty_keys_and_dedups() {
        let m = matcher();
        let none = SynonymOverrides::new();
        assert!(m.plan(&["name", ""], &none).is_err());

        let plan = m.plan(&["name", "happy", "name"], &none).unwrap();
        assert_eq!(plan.keys().len(), 2);
        assert_eq!(plan.keys()[1].key(), "happy");
        assert_eq!(plan.keys()[1].synonym_count(), 2);
    }

    #[test]
    fn test_plan_agrees_with_key_matches() {
        let m = matcher();
        let overrides = SynonymOverrides::new().with("phone", ["tel"]);

        for key in ["joyful", "Tel", "telephone", "happiness", "zip"] {
            for format_key in ["happy", "phone"] {
                let plan = m.plan(&[format_key], &overrides).unwrap();
                let single = Map::from_iter([(key.to_string(), Value::Null)]);
                assert_eq!(
                    plan.covers(&single),
                    m.key_matches(key, format_key, &overrides),
                    "{key} vs {format_key}"
                );
            }
        }
    }

    #[test]
    fn test_coverage_requires_every_key() {
        let m = matcher();
        let plan = m.plan(&["name", "address"], &SynonymOverrides::new()).unwrap();

        assert!(plan.covers(&object(json!({"name": "John", "addr": "1 Main St"}))));
        assert!(!plan.covers(&object(json!({"name": "John", "city": "X"}))));
        assert!(!plan.covers(&object(json!({}))));
    }

    #[test]
    fn test_one_key_may_cover_several_format_keys() {
        let m = matcher();
        let plan = m.plan(&["name", "names"], &SynonymOverrides::new()).unwrap();
        assert!(plan.covers(&object(json!({"name": 1}))));
    }

    #[test]
    fn test_empty_plan_covers_everything() {
        let m = matcher();
        let keys: [&str; 0] = [];
        let plan = m.plan(&keys, &SynonymOverrides::new()).unwrap();
        let outcome = plan.evaluate(&object(json!({})));
        assert!(outcome.covered);
        assert_eq!(outcome.comparisons, 0);
    }

    #[test]
    fn test_evaluate_stops_once_covered() {
        let m = matcher();
        let plan = m.plan(&["name"], &SynonymOverrides::new()).unwrap();
        let outcome = plan.evaluate(&object(json!({"name": 1, "age": 2, "city": 3})));
        assert!(outcome.covered);
        assert_eq!(outcome.comparisons, 1);
    }
}
