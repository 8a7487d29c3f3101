//! Request and response records exchanged with the presentation layer.

use crate::error::Result;
use data_loader::{Film, FilmId};
use pipeline::FilterSet;
use serde::{Deserialize, Serialize};

/// A seed title plus the user's selections.
///
/// Deserializes from JSON with every field but `seed_title` optional:
/// `{"seed_title": "Roma", "genres": ["Dramas"], "limit": 3}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationRequest {
    pub seed_title: String,
    pub genres: Vec<String>,
    pub years: Vec<u16>,
    pub age_ratings: Vec<String>,
    /// Bucket keys or labels, e.g. "1-2h" or "~1 hour"
    pub duration_buckets: Vec<String>,
    /// Falls back to `EngineConfig::default_limit`
    pub limit: Option<usize>,
}

impl RecommendationRequest {
    pub fn new(seed_title: impl Into<String>) -> Self {
        Self {
            seed_title: seed_title.into(),
            ..Self::default()
        }
    }

    pub fn with_genres<I, S>(mut self, genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.genres = genres.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_years(mut self, years: impl IntoIterator<Item = u16>) -> Self {
        self.years = years.into_iter().collect();
        self
    }

    pub fn with_age_ratings<I, S>(mut self, ratings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.age_ratings = ratings.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_duration_buckets<I, S>(mut self, buckets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.duration_buckets = buckets.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Whether any non-blank genre was selected
    pub fn has_genre(&self) -> bool {
        self.genres.iter().any(|g| !g.trim().is_empty())
    }

    /// Turn the selections into filters. Fails on an unknown duration bucket.
    pub fn filter_set(&self) -> Result<FilterSet> {
        Ok(FilterSet::from_selections(
            &self.genres,
            self.years.iter().copied(),
            &self.age_ratings,
            &self.duration_buckets,
        )?)
    }
}

/// Display record for one recommended film.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilmRecommendation {
    pub film_id: FilmId,
    /// Similarity to the seed film
    pub score: f32,
    pub title: String,
    pub genres: Vec<String>,
    pub year: Option<u16>,
    pub rating: Option<String>,
    /// Raw duration text as in the catalog
    pub duration: Option<String>,
    pub duration_minutes: u32,
    pub description: String,
    pub image: Option<String>,
}

impl FilmRecommendation {
    pub fn from_film(film: &Film, score: f32) -> Self {
        Self {
            film_id: film.id,
            score,
            title: film.title.clone(),
            genres: film.genres.clone(),
            year: film.year,
            rating: film.rating.clone(),
            duration: film.duration_text.clone(),
            duration_minutes: film.duration_minutes,
            description: film.description.clone(),
            image: film.image.clone(),
        }
    }
}
