//! Nearest-scenario matching.
//!
//! The corpus is small (tens to low thousands of scenarios), so matching is a
//! linear cosine-similarity scan over a snapshot.

use signconnect_embeddings::similarity::{cosine_similarity, top_k};
use tracing::{debug, warn};

use crate::error::{Result, StoreError};
use crate::record::{ScenarioId, ScenarioRecord};

/// Default acceptance threshold. A match must score strictly above it.
pub const DEFAULT_MATCH_THRESHOLD: f32 = 0.6;

/// Outcome of a nearest-scenario lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    /// Matched scenario, `None` when nothing cleared the threshold.
    pub scenario_id: Option<ScenarioId>,

    /// Label of the matched scenario.
    pub label: Option<String>,

    /// Best score observed, in [-1, 1]. 0.0 when there were no candidates.
    pub score: f32,
}

impl MatchResult {
    fn no_match(score: f32) -> Self {
        Self {
            scenario_id: None,
            label: None,
            score,
        }
    }

    /// Whether a scenario was accepted.
    pub fn is_match(&self) -> bool {
        self.scenario_id.is_some()
    }
}

/// Position and score of the best candidate, or `None` if nothing scored.
fn best_position(query: &[f32], candidates: &[ScenarioRecord]) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;

    for (position, candidate) in candidates.iter().enumerate() {
        let score = match cosine_similarity(query, &candidate.vector) {
            Ok(score) => score,
            Err(e) => {
                warn!(scenario = %candidate.label, "Skipping scenario: {e}");
                continue;
            }
        };

        // Strict `>`: ties keep the first-seen candidate.
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((position, score)),
        }
    }

    best
}

/// Find the candidate most similar to `query`, accepting it only if its
/// score is strictly above `threshold`.
pub fn best_match(query: &[f32], candidates: &[ScenarioRecord], threshold: f32) -> MatchResult {
    match best_position(query, candidates) {
        Some((position, score)) if score > threshold => {
            let record = &candidates[position];
            MatchResult {
                scenario_id: Some(record.id),
                label: Some(record.label.clone()),
                score,
            }
        }
        Some((_, score)) => MatchResult::no_match(score),
        None => MatchResult::no_match(0.0),
    }
}

/// An immutable snapshot of scenarios plus the acceptance threshold.
#[derive(Debug, Clone)]
pub struct SimilarityIndex {
    records: Vec<ScenarioRecord>,
    threshold: f32,
}

impl SimilarityIndex {
    /// Build an index over a snapshot with the default threshold.
    pub fn new(records: Vec<ScenarioRecord>) -> Self {
        Self {
            records,
            threshold: DEFAULT_MATCH_THRESHOLD,
        }
    }

    /// Override the acceptance threshold.
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    /// The acceptance threshold.
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Number of scenarios in the snapshot.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the snapshot is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up a scenario by ID.
    pub fn get(&self, id: ScenarioId) -> Option<&ScenarioRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Fail when the snapshot is non-empty but no scenario has `dimension`,
    /// which means every lookup would be skipped. Usually the scenario file
    /// was seeded with a different embedding model.
    pub fn check_dimension(&self, dimension: usize) -> Result<()> {
        match self.records.first() {
            Some(first) if self.records.iter().all(|r| r.vector.len() != dimension) => {
                Err(StoreError::DimensionMismatch {
                    label: first.label.clone(),
                    expected: dimension,
                    actual: first.vector.len(),
                })
            }
            _ => Ok(()),
        }
    }

    /// Best match for `query` under this index's threshold.
    pub fn best_match(&self, query: &[f32]) -> MatchResult {
        let result = best_match(query, &self.records, self.threshold);
        debug!(
            candidates = self.records.len(),
            score = result.score,
            matched = ?result.label,
            "Scenario lookup"
        );
        result
    }

    /// Best match for `query` together with the matched record.
    pub fn resolve(&self, query: &[f32]) -> (MatchResult, Option<&ScenarioRecord>) {
        let result = self.best_match(query);
        let record = result.scenario_id.and_then(|id| self.get(id));
        (result, record)
    }

    /// The `k` highest-scoring scenarios regardless of threshold, best first.
    pub fn rank(&self, query: &[f32], k: usize) -> Vec<(&ScenarioRecord, f32)> {
        let candidates = self
            .records
            .iter()
            .filter(|r| r.vector.len() == query.len())
            .map(|r| (r, r.vector.as_slice()));

        match top_k(query, candidates, k, -1.0) {
            Ok(ranked) => ranked,
            Err(e) => {
                warn!("Ranking failed: {e}");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// A unit vector in the (x, y) plane whose cosine with [1, 0, 0] is `score`.
    fn with_score(score: f32) -> Vec<f32> {
        vec![score, (1.0 - score * score).sqrt(), 0.0]
    }

    #[test]
    fn test_empty_candidates_never_match() {
        let result = best_match(&[1.0, 0.0, 0.0], &[], DEFAULT_MATCH_THRESHOLD);
        assert!(!result.is_match());
        assert_eq!(result.label, None);
        assert_eq!(result.score, 0.0);
    }

    #[test]
    fn test_higher_score_wins() {
        let candidates = vec![
            ScenarioRecord::new("Low", "", with_score(0.9)),
            ScenarioRecord::new("High", "", with_score(0.95)),
        ];
        let result = best_match(&[1.0, 0.0, 0.0], &candidates, DEFAULT_MATCH_THRESHOLD);
        assert_eq!(result.label.as_deref(), Some("High"));
        assert_eq!(result.scenario_id, Some(candidates[1].id));
        assert!((result.score - 0.95).abs() < 1e-5);
    }

    #[test]
    fn test_tie_keeps_first_in_input_order() {
        let candidates = vec![
            ScenarioRecord::new("First", "", vec![0.0, 1.0, 0.0]),
            ScenarioRecord::new("Second", "", vec![0.0, 1.0, 0.0]),
        ];
        let result = best_match(&[0.0, 1.0, 0.0], &candidates, DEFAULT_MATCH_THRESHOLD);
        assert_eq!(result.label.as_deref(), Some("First"));
    }

    #[test]
    fn test_score_at_or_below_threshold_is_rejected() {
        let candidates = vec![
            ScenarioRecord::new("Exact", "", vec![0.6, 0.8, 0.0]),
            ScenarioRecord::new("Below", "", with_score(0.4)),
        ];
        for threshold in [0.6, 0.7] {
            let result = best_match(&[1.0, 0.0, 0.0], &candidates, threshold);
            assert!(!result.is_match(), "threshold {threshold}");
            assert!(result.score <= threshold);
        }
    }

    #[test]
    fn test_never_accepts_score_at_or_below_threshold() {
        let query = [1.0, 0.0, 0.0];
        for step in 0..=20 {
            let score = -1.0 + step as f32 * 0.1;
            let candidates = vec![ScenarioRecord::new("Only", "", with_score(score.clamp(-1.0, 1.0)))];
            let result = best_match(&query, &candidates, DEFAULT_MATCH_THRESHOLD);
            if result.is_match() {
                assert!(result.score > DEFAULT_MATCH_THRESHOLD);
            }
        }
    }

    #[test]
    fn test_unnormalized_vectors_are_scored_by_direction() {
        let candidates = vec![ScenarioRecord::new("Scaled", "", vec![10.0, 0.0, 0.0])];
        let result = best_match(&[0.5, 0.0, 0.0], &candidates, DEFAULT_MATCH_THRESHOLD);
        assert!(result.is_match());
        assert!((result.score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_vector_candidate_scores_zero() {
        let candidates = vec![ScenarioRecord::new("Zero", "", vec![0.0, 0.0, 0.0])];
        let result = best_match(&[1.0, 0.0, 0.0], &candidates, -0.5);
        assert!(result.is_match());
        assert_eq!(result.score, 0.0);
    }

    #[test]
    fn test_mismatched_dimension_is_skipped() {
        let candidates = vec![
            ScenarioRecord::new("Wrong", "", vec![1.0, 0.0]),
            ScenarioRecord::new("Right", "", with_score(0.8)),
        ];
        let result = best_match(&[1.0, 0.0, 0.0], &candidates, DEFAULT_MATCH_THRESHOLD);
        assert_eq!(result.label.as_deref(), Some("Right"));
    }

    #[test]
    fn test_check_dimension_flags_incomparable_snapshot() {
        let index = SimilarityIndex::new(vec![
            ScenarioRecord::new("Coffee Shop", "", vec![1.0, 0.0]),
            ScenarioRecord::new("Medical", "", vec![0.0, 1.0]),
        ]);

        let err = index.check_dimension(3).unwrap_err();
        assert_eq!(
            err.to_string(),
            "scenario \"Coffee Shop\" has dimension 2, expected 3"
        );
        assert!(index.check_dimension(2).is_ok());
        assert!(SimilarityIndex::new(Vec::new()).check_dimension(3).is_ok());

        let mixed = SimilarityIndex::new(vec![
            ScenarioRecord::new("Old", "", vec![1.0, 0.0]),
            ScenarioRecord::new("New", "", with_score(0.5)),
        ]);
        assert!(mixed.check_dimension(3).is_ok());
    }

    #[test]
    fn test_index_resolve_returns_record() {
        let coffee = ScenarioRecord::new("Coffee Shop", "latte", with_score(0.82));
        let medical = ScenarioRecord::new("Medical", "doctor", vec![0.1, 0.0, (1.0f32 - 0.01).sqrt()]);
        let index = SimilarityIndex::new(vec![coffee.clone(), medical]);

        let (result, record) = index.resolve(&[1.0, 0.0, 0.0]);
        assert!(result.is_match());
        assert_eq!(record, Some(&coffee));
    }

    #[test]
    fn test_index_threshold_override() {
        let index = SimilarityIndex::new(vec![ScenarioRecord::new("Weak", "", with_score(0.5))])
            .with_threshold(0.3);
        assert_eq!(index.threshold(), 0.3);
        assert!(index.best_match(&[1.0, 0.0, 0.0]).is_match());
    }

    #[test]
    fn test_rank_orders_by_score() {
        let index = SimilarityIndex::new(vec![
            ScenarioRecord::new("Greeting", "", with_score(0.2)),
            ScenarioRecord::new("Coffee Shop", "", with_score(0.9)),
            ScenarioRecord::new("Medical", "", with_score(0.5)),
        ]);

        let ranked = index.rank(&[1.0, 0.0, 0.0], 2);
        let labels: Vec<&str> = ranked.iter().map(|(r, _)| r.label.as_str()).collect();
        assert_eq!(labels, vec!["Coffee Shop", "Medical"]);
    }
}
