//! Seed ranking: every film ordered by similarity to a seed film.

use crate::error::Result;
use crate::index::SimilarityOracle;
use data_loader::FilmId;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A film in the ranking, with its similarity to the seed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub film_id: FilmId,
    pub score: f32,
}

impl Candidate {
    pub fn new(film_id: FilmId, score: f32) -> Self {
        Self { film_id, score }
    }
}

/// Order catalog positions by descending score.
///
/// `scores[i]` is the score of film `i`. Equal scores keep ascending catalog
/// order (the sort is stable). NaN is ranked as 0 and `-0.0` ties with `0.0`.
pub fn rank_scores(scores: &[f32]) -> Vec<Candidate> {
    let mut candidates: Vec<Candidate> = scores
        .iter()
        .enumerate()
        .map(|(id, &score)| Candidate::new(id, normalize_score(score)))
        .collect();
    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
    candidates
}

fn normalize_score(score: f32) -> f32 {
    if score.is_nan() {
        0.0
    } else {
        // total_cmp orders -0.0 below 0.0
        score + 0.0
    }
}

/// Full ranking of the catalog against `seed`, the seed itself included.
pub fn rank_by_similarity(oracle: &dyn SimilarityOracle, seed: FilmId) -> Result<Vec<Candidate>> {
    let row = oracle.similarity_row(seed)?;
    let ranking = rank_scores(&row);
    debug!("Ranked {} films against seed {}", ranking.len(), seed);
    Ok(ranking)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::SimilarityMatrix;

    fn ids(candidates: &[Candidate]) -> Vec<FilmId> {
        candidates.iter().map(|c| c.film_id).collect()
    }

    #[test]
    fn test_rank_scores_descending() {
        let ranking = rank_scores(&[0.1, 0.9, 0.5]);
        assert_eq!(ids(&ranking), vec![1, 2, 0]);
    }

    #[test]
    fn test_rank_scores_ties_keep_catalog_order() {
        let ranking = rank_scores(&[0.3, 0.7, 0.3, 0.7, 0.3]);
        assert_eq!(ids(&ranking), vec![1, 3, 0, 2, 4]);
    }

    #[test]
    fn test_rank_scores_nan_as_zero() {
        let ranking = rank_scores(&[f32::NAN, 0.2, 0.0]);
        assert_eq!(ids(&ranking), vec![1, 0, 2]);
        assert_eq!(ranking[1].score, 0.0);
    }

    #[test]
    fn test_rank_scores_negative_zero_ties_with_zero() {
        let ranking = rank_scores(&[1.0, -0.0, 0.0, -0.0]);

        assert_eq!(ids(&ranking), vec![0, 1, 2, 3]);
        assert!(ranking.iter().all(|c| c.score.is_sign_positive()));
    }

    #[test]
    fn test_rank_by_similarity_negative_zero_keeps_catalog_order() {
        let matrix = SimilarityMatrix::from_rows(vec![
            vec![1.0, -0.0, 0.0],
            vec![-0.0, 1.0, 0.0],
            vec![0.0, 0.0, 1.0],
        ])
        .unwrap();

        let ranking = rank_by_similarity(&matrix, 0).unwrap();
        assert_eq!(ids(&ranking), vec![0, 1, 2]);
    }

    #[test]
    fn test_rank_by_similarity() {
        let matrix = SimilarityMatrix::from_rows(vec![
            vec![1.0, 0.2, 0.8],
            vec![0.2, 1.0, 0.1],
            vec![0.8, 0.1, 1.0],
        ])
        .unwrap();

        let ranking = rank_by_similarity(&matrix, 0).unwrap();
        assert_eq!(ids(&ranking), vec![0, 2, 1]);
        assert_eq!(ranking[1].score, 0.8);
    }

    #[test]
    fn test_rank_by_similarity_unknown_seed() {
        let matrix = SimilarityMatrix::from_rows(vec![vec![1.0]]).unwrap();
        assert!(rank_by_similarity(&matrix, 5).is_err());
    }
}
