//! Similarity ranking over a loaded candidate set.
//!
//! Scores every candidate against the query with cosine similarity, drops the
//! ones under `min_score`, orders by score (ties go to the lower id) and keeps
//! the first `top_k`.

use serde::Serialize;
use std::cmp::Ordering;

use crate::domain::entities::vector_record::{ScoredRecord, VectorRecord};
use crate::domain::error::DomainError;
use crate::domain::values::similarity::cosine_similarity;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankParams {
    pub top_k: usize,
    pub min_score: f64,
}

impl Default for RankParams {
    fn default() -> Self {
        Self {
            top_k: 5,
            min_score: 0.0,
        }
    }
}

/// Score distribution over every candidate that was checked.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RankStats {
    pub total_candidates: usize,
    pub passed_min_score: usize,
    pub min_score_threshold: f64,
    pub max_score: f64,
    pub min_score: f64,
    pub avg_score: f64,
}

#[derive(Debug, Clone)]
pub struct Ranking {
    pub matches: Vec<ScoredRecord>,
    pub stats: RankStats,
}

pub fn rank(
    query: &[f32],
    candidates: Vec<VectorRecord>,
    params: RankParams,
) -> Result<Vec<ScoredRecord>, DomainError> {
    rank_with_stats(query, candidates, params).map(|r| r.matches)
}

pub fn rank_with_stats(
    query: &[f32],
    candidates: Vec<VectorRecord>,
    params: RankParams,
) -> Result<Ranking, DomainError> {
    if let Some(bad) = candidates.iter().find(|c| c.vector.len() != query.len()) {
        return Err(DomainError::DimensionMismatch {
            expected: query.len(),
            actual: bad.vector.len(),
        });
    }

    let scores: Vec<f64> = candidates
        .iter()
        .map(|c| cosine_similarity(query, &c.vector))
        .collect();
    let stats = summarize(&scores, params.min_score);

    let mut matches: Vec<ScoredRecord> = candidates
        .into_iter()
        .zip(scores)
        .filter(|(_, score)| *score >= params.min_score)
        .map(|(record, score)| ScoredRecord { record, score })
        .collect();

    matches.sort_by(compare_ranked);
    matches.truncate(params.top_k);

    tracing::debug!(
        candidates = stats.total_candidates,
        passed = stats.passed_min_score,
        returned = matches.len(),
        max_score = stats.max_score,
        "ranked candidates"
    );

    Ok(Ranking { matches, stats })
}

fn compare_ranked(a: &ScoredRecord, b: &ScoredRecord) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.record.id.cmp(&b.record.id))
}

fn summarize(scores: &[f64], threshold: f64) -> RankStats {
    if scores.is_empty() {
        return RankStats {
            min_score_threshold: threshold,
            ..RankStats::default()
        };
    }
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = scores.iter().copied().fold(f64::INFINITY, f64::min);
    RankStats {
        total_candidates: scores.len(),
        passed_min_score: scores.iter().filter(|s| **s >= threshold).count(),
        min_score_threshold: threshold,
        max_score: max,
        min_score: min,
        avg_score: scores.iter().sum::<f64>() / scores.len() as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(id: u64, vector: Vec<f32>) -> VectorRecord {
        VectorRecord {
            id,
            jira_key: Some(format!("PROJ-{id}")),
            summary: format!("Issue {id}"),
            description: None,
            vector,
            indexed_at: Utc::now(),
        }
    }

    fn ids(matches: &[ScoredRecord]) -> Vec<u64> {
        matches.iter().map(|m| m.record.id).collect()
    }

    #[test]
    fn test_empty_candidates() {
        let ranking = rank_with_stats(&[1.0, 0.0], vec![], RankParams::default()).unwrap();
        assert!(ranking.matches.is_empty());
        assert_eq!(ranking.stats.total_candidates, 0);
        assert_eq!(ranking.stats.max_score, 0.0);
    }

    #[test]
    fn test_self_similarity() {
        let v = vec![0.6_f32, 0.8, 0.0];
        let out = rank(&v, vec![record(1, v.clone())], RankParams::default()).unwrap();
        assert_eq!(out.len(), 1);
        assert!((out[0].score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_sorted_descending() {
        let candidates = vec![
            record(1, vec![0.0, 1.0]),
            record(2, vec![1.0, 0.0]),
            record(3, vec![1.0, 1.0]),
        ];
        let out = rank(&[1.0, 0.0], candidates, RankParams::default()).unwrap();
        assert_eq!(ids(&out), vec![2, 3, 1]);
    }

    #[test]
    fn test_ties_broken_by_ascending_id() {
        let candidates = vec![
            record(7, vec![1.0, 0.0]),
            record(3, vec![2.0, 0.0]),
            record(5, vec![0.5, 0.0]),
        ];
        for _ in 0..3 {
            let out = rank(&[1.0, 0.0], candidates.clone(), RankParams::default()).unwrap();
            assert_eq!(ids(&out), vec![3, 5, 7]);
        }
    }

    #[test]
    fn test_min_score_filters_strictly_below() {
        let candidates = vec![
            record(1, vec![1.0, 0.0]),
            record(2, vec![0.0, 1.0]),
            record(3, vec![1.0, 1.0]),
        ];
        let params = RankParams {
            top_k: 10,
            min_score: 0.5,
        };
        let ranking = rank_with_stats(&[1.0, 0.0], candidates, params).unwrap();
        assert_eq!(ids(&ranking.matches), vec![1, 3]);
        assert!(ranking.matches.iter().all(|m| m.score >= 0.5));
        assert_eq!(ranking.stats.total_candidates, 3);
        assert_eq!(ranking.stats.passed_min_score, 2);
    }

    #[test]
    fn test_score_equal_to_threshold_is_kept() {
        let params = RankParams {
            top_k: 5,
            min_score: 1.0,
        };
        let out = rank(&[1.0, 0.0], vec![record(1, vec![3.0, 0.0])], params).unwrap();
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_top_k_keeps_highest_scores() {
        let candidates: Vec<VectorRecord> = (1..=10)
            .map(|i| record(i, vec![i as f32, 10.0]))
            .collect();
        let params = RankParams {
            top_k: 3,
            min_score: 0.0,
        };
        let out = rank(&[1.0, 0.0], candidates, params).unwrap();
        assert_eq!(ids(&out), vec![10, 9, 8]);
    }

    #[test]
    fn test_top_k_zero_is_empty() {
        let params = RankParams {
            top_k: 0,
            min_score: 0.0,
        };
        let out = rank(&[1.0], vec![record(1, vec![1.0])], params).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_zero_vector_candidate_scores_zero() {
        let out = rank(&[1.0, 0.0], vec![record(1, vec![0.0, 0.0])], RankParams::default()).unwrap();
        assert_eq!(out[0].score, 0.0);
    }

    #[test]
    fn test_dimension_mismatch() {
        let candidates = vec![record(1, vec![1.0, 0.0]), record(2, vec![1.0, 0.0, 0.0])];
        let err = rank(&[1.0, 0.0], candidates, RankParams::default()).unwrap_err();
        assert!(matches!(
            err,
            DomainError::DimensionMismatch {
                expected: 2,
                actual: 3
            }
        ));
    }

    #[test]
    fn test_stats_summary() {
        let candidates = vec![record(1, vec![1.0, 0.0]), record(2, vec![0.0, 1.0])];
        let ranking = rank_with_stats(&[1.0, 0.0], candidates, RankParams::default()).unwrap();
        assert!((ranking.stats.max_score - 1.0).abs() < 1e-9);
        assert_eq!(ranking.stats.min_score, 0.0);
        assert!((ranking.stats.avg_score - 0.5).abs() < 1e-9);
    }
}
