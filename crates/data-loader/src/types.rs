//! Core domain types for the film catalog.
//!
//! A film's position in the catalog is its identity: the similarity index
//! stores one row per film in exactly the same order, so `FilmId` doubles as
//! the row number of both.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

// =============================================================================
// Type Aliases
// =============================================================================

/// Row position of a film in the catalog (0-based, dense)
pub type FilmId = usize;

// =============================================================================
// Film
// =============================================================================

/// A single catalog row.
///
/// Only `title` is mandatory. Every other attribute may be absent when the
/// source file lacks the column or leaves the cell empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Film {
    pub id: FilmId,
    pub show_id: Option<String>,
    /// "Movie" or "TV Show" in Netflix exports
    pub kind: Option<String>,
    pub title: String,
    pub director: Option<String>,
    pub cast: Option<String>,
    pub country: Option<String>,
    pub date_added: Option<String>,
    pub year: Option<u16>,
    /// Age rating code as it appears in the source (e.g. "TV-MA", "PG-13")
    pub rating: Option<String>,
    /// Raw duration text, e.g. "90 min" or "2 Seasons"
    pub duration_text: Option<String>,
    /// First integer found in `duration_text`, 0 when there is none
    pub duration_minutes: u32,
    /// Genre tags in first-seen order, without duplicates
    pub genres: Vec<String>,
    pub description: String,
    pub synopsis: Option<String>,
    /// Poster or thumbnail reference
    pub image: Option<String>,
}

impl Film {
    /// Minimal film with only the fields the engine reads.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: 0,
            show_id: None,
            kind: None,
            title: title.into(),
            director: None,
            cast: None,
            country: None,
            date_added: None,
            year: None,
            rating: None,
            duration_text: None,
            duration_minutes: 0,
            genres: Vec::new(),
            description: description.into(),
            synopsis: None,
            image: None,
        }
    }

    /// Set the genre tags, trimmed and without repeats.
    pub fn with_genres<I, S>(mut self, genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.genres = crate::parser::normalize_genres(genres);
        self
    }

    pub fn with_year(mut self, year: u16) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_rating(mut self, rating: impl Into<String>) -> Self {
        self.rating = Some(rating.into());
        self
    }

    /// Set the raw duration text and derive `duration_minutes` from it.
    pub fn with_duration(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.duration_minutes = crate::parser::duration_minutes(Some(&text));
        self.duration_text = Some(text);
        self
    }

    pub fn has_genre(&self, genre: &str) -> bool {
        self.genres.iter().any(|g| g == genre)
    }

    /// Age rating in its comparison form, see [`normalize_rating`].
    pub fn normalized_rating(&self) -> Option<String> {
        self.rating.as_deref().map(normalize_rating)
    }
}

/// Canonical form used when comparing age-rating codes.
pub fn normalize_rating(rating: &str) -> String {
    rating.trim().to_uppercase()
}

// =============================================================================
// Load policy
// =============================================================================

/// What to do when two catalog rows share a title.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateTitlePolicy {
    /// Title lookups resolve to the first row; later rows stay in the
    /// catalog (and in the similarity index) but are only reachable by id.
    #[default]
    FirstWins,
    /// Fail the load.
    Reject,
}

// =============================================================================
// Catalog - read-only film table
// =============================================================================

/// Ordered film table with lookup indices.
///
/// Built once at startup, then shared behind an `Arc` and never mutated.
#[derive(Debug, Default)]
pub struct Catalog {
    pub(crate) films: Vec<Film>,

    /// Title -> first row carrying it
    pub(crate) title_index: HashMap<String, FilmId>,
    /// Rows whose title was already taken: (title, first id, this id)
    pub(crate) duplicate_titles: Vec<(String, FilmId, FilmId)>,

    // Secondary indices, filled by `build_secondary_indices`
    pub(crate) genre_index: BTreeMap<String, Vec<FilmId>>,
    pub(crate) year_index: BTreeMap<u16, Vec<FilmId>>,
    /// Keyed by normalized rating
    pub(crate) rating_index: BTreeMap<String, Vec<FilmId>>,
}

impl Catalog {
    /// Creates a new, empty Catalog
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.films.len()
    }

    pub fn is_empty(&self) -> bool {
        self.films.is_empty()
    }

    /// All films in catalog order
    pub fn films(&self) -> &[Film] {
        &self.films
    }

    /// Get a film by id
    pub fn get_film(&self, id: FilmId) -> Option<&Film> {
        self.films.get(id)
    }

    /// Resolve a title to its catalog position.
    ///
    /// Matching is exact after trimming surrounding whitespace.
    pub fn find_by_title(&self, title: &str) -> Option<FilmId> {
        self.title_index.get(title.trim()).copied()
    }

    pub fn contains_title(&self, title: &str) -> bool {
        self.find_by_title(title).is_some()
    }

    /// Descriptions in catalog order, the input of the similarity index
    pub fn descriptions(&self) -> Vec<&str> {
        self.films.iter().map(|f| f.description.as_str()).collect()
    }

    /// Films sharing an earlier film's title
    pub fn duplicate_titles(&self) -> &[(String, FilmId, FilmId)] {
        &self.duplicate_titles
    }

    pub fn get_films_by_genre(&self, genre: &str) -> &[FilmId] {
        self.genre_index
            .get(genre)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn get_films_by_year(&self, year: u16) -> &[FilmId] {
        self.year_index
            .get(&year)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn get_films_by_rating(&self, rating: &str) -> &[FilmId] {
        self.rating_index
            .get(&normalize_rating(rating))
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Distinct genres, sorted
    pub fn genres(&self) -> Vec<&str> {
        self.genre_index.keys().map(String::as_str).collect()
    }

    /// Distinct release years, newest first
    pub fn years(&self) -> Vec<u16> {
        self.year_index.keys().rev().copied().collect()
    }

    /// Distinct normalized age ratings, sorted
    pub fn age_ratings(&self) -> Vec<&str> {
        self.rating_index.keys().map(String::as_str).collect()
    }

    /// Append a film, assigning it the next catalog position.
    ///
    /// The title index keeps the first row for a repeated title; the repeat
    /// is recorded so `validate` can apply the load policy.
    pub fn insert_film(&mut self, mut film: Film) -> FilmId {
        let id = self.films.len();
        film.id = id;
        let key = film.title.trim().to_string();
        match self.title_index.get(&key) {
            Some(&first) => self.duplicate_titles.push((key, first, id)),
            None => {
                self.title_index.insert(key, id);
            }
        }
        self.films.push(film);
        id
    }

    /// Case-insensitive title search.
    ///
    /// Exact matches come first, then substring matches; each group keeps
    /// catalog order.
    pub fn search_titles(&self, query: &str) -> Vec<FilmId> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }
        let mut exact = Vec::new();
        let mut partial = Vec::new();
        for film in &self.films {
            let title = film.title.to_lowercase();
            if title == query {
                exact.push(film.id);
            } else if title.contains(&query) {
                partial.push(film.id);
            }
        }
        exact.extend(partial);
        exact
    }
}
