//! # Recommendation Engine
//!
//! Produces up to N films similar to a seed film:
//! 1. Resolve the seed title to its catalog position
//! 2. Rank the whole catalog by similarity to the seed
//! 3. Walk the ranking, skipping the seed, keeping films every filter accepts
//! 4. Stop once `limit` films are kept or the ranking runs out
//!
//! Ranking happens before any filtering and the seed is skipped during the
//! walk, so the seed never costs a result slot.
//!
//! The engine holds only immutable shared state; `recommend` takes `&self`
//! and can be called from any number of threads at once.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, instrument, warn};

use data_loader::{Catalog, FilmId};
use pipeline::FilterSet;
use similarity::{
    ensure_aligned, rank_by_similarity, Candidate, SimilarityIndex, SimilarityOracle,
};

use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::request::{FilmRecommendation, RecommendationRequest};

/// Catalog and similarity index bundled into one service object
#[derive(Clone)]
pub struct RecommendationEngine {
    catalog: Arc<Catalog>,
    index: Arc<dyn SimilarityOracle>,
    config: EngineConfig,
}

impl RecommendationEngine {
    /// Pair a catalog with a similarity index, using the default config.
    ///
    /// Fails when the index does not have exactly one row per catalog film.
    pub fn new(catalog: Arc<Catalog>, index: Arc<dyn SimilarityOracle>) -> Result<Self> {
        Self::with_config(catalog, index, EngineConfig::default())
    }

    pub fn with_config(
        catalog: Arc<Catalog>,
        index: Arc<dyn SimilarityOracle>,
        config: EngineConfig,
    ) -> Result<Self> {
        ensure_aligned(index.as_ref(), &catalog)?;
        info!(
            "Recommendation engine ready: {} films, default limit {}",
            catalog.len(),
            config.default_limit
        );
        Ok(Self {
            catalog,
            index,
            config,
        })
    }

    /// Build the TF-IDF index from the catalog descriptions at startup.
    pub fn build(catalog: Arc<Catalog>, config: EngineConfig) -> Result<Self> {
        let start = Instant::now();
        let index = SimilarityIndex::from_catalog(&catalog, config.tfidf.clone());
        info!("Built similarity index in {:.2?}", start.elapsed());
        Self::with_config(catalog, Arc::new(index), config)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Recommend up to `limit` films similar to `seed_title`.
    ///
    /// An unknown title yields an empty result, as does a filter set nothing
    /// passes.
    #[instrument(skip(self, filters), fields(filters = ?filters.describe()))]
    pub fn recommend(
        &self,
        seed_title: &str,
        filters: &FilterSet,
        limit: usize,
    ) -> Vec<FilmRecommendation> {
        match self.catalog.find_by_title(seed_title) {
            Some(seed) => self.recommend_by_id(seed, filters, limit),
            None => {
                info!("Seed title '{}' is not in the catalog", seed_title);
                Vec::new()
            }
        }
    }

    /// Same as [`recommend`](Self::recommend) with the seed given by position.
    pub fn recommend_by_id(
        &self,
        seed: FilmId,
        filters: &FilterSet,
        limit: usize,
    ) -> Vec<FilmRecommendation> {
        if limit == 0 {
            return Vec::new();
        }
        let start_time = Instant::now();

        let ranking = match rank_by_similarity(self.index.as_ref(), seed) {
            Ok(ranking) => ranking,
            Err(e) => {
                warn!("Cannot rank seed {}: {}", seed, e);
                return Vec::new();
            }
        };

        let recommendations = self.select(ranking, seed, filters, limit);
        info!(
            "Selected {} of {} requested recommendations for seed {} in {:.2?}",
            recommendations.len(),
            limit,
            seed,
            start_time.elapsed()
        );
        recommendations
    }

    /// Serve a presentation-layer request.
    ///
    /// Errors are limited to malformed requests: an unknown duration bucket,
    /// or a missing genre when `require_genre` is set.
    pub fn handle(&self, request: &RecommendationRequest) -> Result<Vec<FilmRecommendation>> {
        if self.config.require_genre && !request.has_genre() {
            return Err(EngineError::GenreRequired);
        }
        let filters = request.filter_set()?;
        let limit = request.limit.unwrap_or(self.config.default_limit);
        Ok(self.recommend(&request.seed_title, &filters, limit))
    }

    /// Walk the ranking, keeping the first `limit` accepted non-seed films.
    fn select(
        &self,
        ranking: Vec<Candidate>,
        seed: FilmId,
        filters: &FilterSet,
        limit: usize,
    ) -> Vec<FilmRecommendation> {
        let mut selected = Vec::with_capacity(limit.min(ranking.len()));
        let mut examined = 0usize;

        for candidate in ranking {
            if selected.len() >= limit {
                break;
            }
            if candidate.film_id == seed {
                continue;
            }
            examined += 1;
            let Some(film) = self.catalog.get_film(candidate.film_id) else {
                continue;
            };
            if filters.accepts(film) {
                selected.push(FilmRecommendation::from_film(film, candidate.score));
            }
        }

        debug!(
            "Examined {} candidates, kept {} (limit {})",
            examined,
            selected.len(),
            limit
        );
        selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::{DuplicateTitlePolicy, Film};
    use pipeline::filters::GenreFilter;
    use similarity::SimilarityMatrix;

    // ============================================================================
    // Test fixtures
    // ============================================================================

    /// A(Drama), B(Comedy), C(Drama), D(Drama)
    fn test_catalog() -> Arc<Catalog> {
        let films = vec![
            Film::new("A", "x").with_genres(["Drama"]),
            Film::new("B", "x").with_genres(["Comedy"]),
            Film::new("C", "y").with_genres(["Drama"]),
            Film::new("D", "z").with_genres(["Drama"]),
        ];
        Arc::new(Catalog::from_films(films, DuplicateTitlePolicy::FirstWins).unwrap())
    }

    /// Hand-set scores: from A, B ranks first and C ties with D
    fn test_matrix() -> Arc<SimilarityMatrix> {
        let matrix = SimilarityMatrix::from_rows(vec![
            vec![1.0, 0.9, 0.5, 0.5],
            vec![0.9, 1.0, 0.2, 0.1],
            vec![0.5, 0.2, 1.0, 0.3],
            vec![0.5, 0.1, 0.3, 1.0],
        ])
        .unwrap();
        Arc::new(matrix)
    }

    fn build_test_engine() -> RecommendationEngine {
        RecommendationEngine::new(test_catalog(), test_matrix()).unwrap()
    }

    fn titles(recs: &[FilmRecommendation]) -> Vec<&str> {
        recs.iter().map(|r| r.title.as_str()).collect()
    }

    // ============================================================================
    // Unit Tests: recommend
    // ============================================================================

    #[test]
    fn test_genre_filter_skips_higher_ranked_mismatch() {
        let engine = build_test_engine();
        let filters = FilterSet::new().add_filter(GenreFilter::new(["Drama"]));

        let recs = engine.recommend("A", &filters, 5);

        // B ranks first but is a comedy; C and D tie and keep catalog order
        assert_eq!(titles(&recs), vec!["C", "D"]);
    }

    #[test]
    fn test_no_filters_returns_top_by_similarity() {
        let engine = build_test_engine();

        let recs = engine.recommend("A", &FilterSet::new(), 2);

        assert_eq!(titles(&recs), vec!["B", "C"]);
        assert_eq!(recs[0].score, 0.9);
    }

    #[test]
    fn test_seed_never_takes_a_slot() {
        let engine = build_test_engine();

        let recs = engine.recommend("A", &FilterSet::new(), 3);

        assert_eq!(titles(&recs), vec!["B", "C", "D"]);
    }

    #[test]
    fn test_unknown_seed_is_empty() {
        let engine = build_test_engine();
        assert!(engine.recommend("Z", &FilterSet::new(), 5).is_empty());
    }

    #[test]
    fn test_zero_limit_is_empty() {
        let engine = build_test_engine();
        assert!(engine.recommend("A", &FilterSet::new(), 0).is_empty());
    }

    #[test]
    fn test_out_of_range_seed_id_is_empty() {
        let engine = build_test_engine();
        assert!(engine.recommend_by_id(99, &FilterSet::new(), 5).is_empty());
    }

    // ============================================================================
    // Unit Tests: construction and handle
    // ============================================================================

    #[test]
    fn test_misaligned_index_is_fatal() {
        let catalog = Catalog::from_films(
            vec![Film::new("A", "x"), Film::new("B", "y")],
            DuplicateTitlePolicy::FirstWins,
        )
        .unwrap();
        let matrix = SimilarityMatrix::from_rows(vec![vec![1.0]]).unwrap();

        let result = RecommendationEngine::new(Arc::new(catalog), Arc::new(matrix));
        assert!(matches!(result, Err(EngineError::Index(_))));
    }

    #[test]
    fn test_handle_uses_default_limit() {
        let films = (0..8)
            .map(|i| Film::new(format!("Film {}", i), "same words"))
            .collect();
        let catalog = Catalog::from_films(films, DuplicateTitlePolicy::FirstWins).unwrap();
        let engine =
            RecommendationEngine::build(Arc::new(catalog), EngineConfig::default()).unwrap();

        let recs = engine.handle(&RecommendationRequest::new("Film 0")).unwrap();

        assert_eq!(recs.len(), 5);
        assert_eq!(titles(&recs), vec!["Film 1", "Film 2", "Film 3", "Film 4", "Film 5"]);
    }

    #[test]
    fn test_handle_require_genre() {
        let config = EngineConfig {
            require_genre: true,
            ..EngineConfig::default()
        };
        let strict =
            RecommendationEngine::with_config(test_catalog(), test_matrix(), config).unwrap();

        let err = strict.handle(&RecommendationRequest::new("A")).unwrap_err();
        assert!(matches!(err, EngineError::GenreRequired));

        let recs = strict
            .handle(&RecommendationRequest::new("A").with_genres(["Comedy"]))
            .unwrap();
        assert_eq!(titles(&recs), vec!["B"]);
    }

    #[test]
    fn test_handle_rejects_unknown_bucket() {
        let engine = build_test_engine();
        let request = RecommendationRequest::new("A").with_duration_buckets(["a while"]);

        assert!(matches!(engine.handle(&request), Err(EngineError::Filter(_))));
    }
}
