//! # Data Loader Crate
//!
//! Loads the film catalog (a Netflix-style CSV export) into an ordered,
//! read-only [`Catalog`].
//!
//! ## Main Components
//!
//! - **types**: `Film`, `Catalog`, `DuplicateTitlePolicy`
//! - **parser**: CSV rows into films, duration/year/genre field parsing
//! - **index**: catalog assembly, secondary indices and validation
//! - **error**: error types for catalog loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::{Catalog, DuplicateTitlePolicy};
//! use std::path::Path;
//!
//! let catalog = Catalog::load_from_file(
//!     Path::new("data/netflix_titles.csv"),
//!     DuplicateTitlePolicy::FirstWins,
//! )?;
//!
//! let id = catalog.find_by_title("Dick Johnson Is Dead").unwrap();
//! println!("{:?}", catalog.get_film(id));
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod index;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use types::{normalize_rating, Catalog, DuplicateTitlePolicy, Film, FilmId};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_creation() {
        let catalog = Catalog::new();

        assert_eq!(catalog.len(), 0);
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_insert_film_assigns_positions() {
        let mut catalog = Catalog::new();

        let a = catalog.insert_film(Film::new("A", "first"));
        let b = catalog.insert_film(Film::new("B", "second"));

        assert_eq!((a, b), (0, 1));
        assert_eq!(catalog.get_film(1).unwrap().title, "B");
        assert_eq!(catalog.descriptions(), vec!["first", "second"]);
    }

    #[test]
    fn test_find_by_title_trims() {
        let mut catalog = Catalog::new();
        catalog.insert_film(Film::new("The Crown", "royals"));

        assert_eq!(catalog.find_by_title("  The Crown "), Some(0));
        assert_eq!(catalog.find_by_title("the crown"), None);
    }

    #[test]
    fn test_search_titles_orders_exact_first() {
        let mut catalog = Catalog::new();
        catalog.insert_film(Film::new("Love Actually", ""));
        catalog.insert_film(Film::new("Love", ""));
        catalog.insert_film(Film::new("Lovesick", ""));
        catalog.insert_film(Film::new("Hate", ""));

        assert_eq!(catalog.search_titles("LOVE"), vec![1, 0, 2]);
        assert!(catalog.search_titles("  ").is_empty());
    }

    #[test]
    fn test_film_builders() {
        let film = Film::new("Roma", "a year in the life")
            .with_genres(["Dramas", "International Movies"])
            .with_year(2018)
            .with_rating("r ")
            .with_duration("135 min");

        assert!(film.has_genre("Dramas"));
        assert!(!film.has_genre("dramas"));
        assert_eq!(film.normalized_rating().as_deref(), Some("R"));
        assert_eq!(film.duration_minutes, 135);
    }

    #[test]
    fn test_with_genres_trims_and_dedups() {
        let film =
            Film::new("Roma", "").with_genres([" Dramas", "Dramas ", "", "Independent Movies"]);

        assert_eq!(film.genres, vec!["Dramas", "Independent Movies"]);
        assert!(film.has_genre("Dramas"));
    }

    #[test]
    fn test_empty_queries() {
        let catalog = Catalog::new();

        assert!(catalog.get_film(0).is_none());
        assert!(catalog.find_by_title("missing").is_none());
        assert!(catalog.get_films_by_genre("Dramas").is_empty());
        assert!(catalog.get_films_by_year(2020).is_empty());
        assert!(catalog.genres().is_empty());
    }
}
