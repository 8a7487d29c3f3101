//! Catalog building and indexing logic.
//!
//! - Parse the catalog file into films (catalog order = file order)
//! - Build the title index while inserting
//! - Build secondary indices (genre, year, age rating)
//! - Validate the title policy

use crate::error::{DataLoadError, Result};
use crate::parser;
use crate::types::*;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

impl Catalog {
    /// Load a catalog CSV file.
    ///
    /// Steps:
    /// 1. Parse all rows
    /// 2. Insert them in file order (title index built on the way)
    /// 3. Build secondary indices
    /// 4. Apply the duplicate-title policy
    pub fn load_from_file(path: &Path, policy: DuplicateTitlePolicy) -> Result<Self> {
        info!("Loading film catalog from {:?}", path);
        let films = parser::parse_films(path)?;
        Self::from_films(films, policy)
    }

    /// Load a catalog from CSV held in any reader.
    pub fn load_from_reader<R: Read>(
        reader: R,
        source: &str,
        policy: DuplicateTitlePolicy,
    ) -> Result<Self> {
        let films = parser::parse_films_from_reader(reader, source)?;
        Self::from_films(films, policy)
    }

    /// Build a catalog from already parsed films, keeping their order.
    pub fn from_films(films: Vec<Film>, policy: DuplicateTitlePolicy) -> Result<Self> {
        let mut catalog = Catalog::new();
        for film in films {
            catalog.insert_film(film);
        }
        catalog.build_secondary_indices();
        catalog.validate(policy)?;

        info!(
            "Catalog ready: {} films, {} genres, {} years, {} age ratings",
            catalog.len(),
            catalog.genre_index.len(),
            catalog.year_index.len(),
            catalog.rating_index.len()
        );
        Ok(catalog)
    }

    /// Build the genre, year and age-rating indices.
    ///
    /// Safe to call again after more inserts; indices are rebuilt from scratch.
    pub fn build_secondary_indices(&mut self) {
        self.genre_index.clear();
        self.year_index.clear();
        self.rating_index.clear();

        for film in &self.films {
            for genre in &film.genres {
                self.genre_index
                    .entry(genre.clone())
                    .or_insert_with(Vec::new)
                    .push(film.id);
            }

            if let Some(year) = film.year {
                self.year_index
                    .entry(year)
                    .or_insert_with(Vec::new)
                    .push(film.id);
            }

            if let Some(rating) = film.normalized_rating() {
                self.rating_index
                    .entry(rating)
                    .or_insert_with(Vec::new)
                    .push(film.id);
            }
        }
    }

    /// Check the catalog against the duplicate-title policy.
    ///
    /// Under `FirstWins` duplicates are only logged.
    pub fn validate(&self, policy: DuplicateTitlePolicy) -> Result<()> {
        for (title, first, second) in &self.duplicate_titles {
            match policy {
                DuplicateTitlePolicy::Reject => {
                    return Err(DataLoadError::DuplicateTitle {
                        title: title.clone(),
                        first: *first,
                        second: *second,
                    });
                }
                DuplicateTitlePolicy::FirstWins => {
                    warn!(
                        "Duplicate title '{}' at row {}, lookups resolve to row {}",
                        title, second, first
                    );
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const CATALOG: &str = "\
title,release_year,rating,duration,listed_in,description
Alpha,2020,TV-MA,95 min,\"Dramas, Thrillers\",a tense drama
Beta,2019,pg-13,80 min,Comedies,a light comedy
Gamma,2020,PG-13,1 Season,\"Dramas\",another drama
";

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", CATALOG).unwrap();

        let catalog =
            Catalog::load_from_file(file.path(), DuplicateTitlePolicy::FirstWins).unwrap();

        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.find_by_title("Beta"), Some(1));
        assert_eq!(catalog.get_films_by_genre("Dramas"), &[0, 2]);
        assert_eq!(catalog.get_films_by_year(2020), &[0, 2]);
        assert_eq!(catalog.years(), vec![2020, 2019]);
    }

    #[test]
    fn test_missing_file() {
        let err = Catalog::load_from_file(
            Path::new("/definitely/not/here.csv"),
            DuplicateTitlePolicy::FirstWins,
        )
        .unwrap_err();
        assert!(matches!(err, DataLoadError::FileNotFound { .. }));
    }

    #[test]
    fn test_rating_index_is_normalized() {
        let catalog =
            Catalog::load_from_reader(CATALOG.as_bytes(), "mem", DuplicateTitlePolicy::FirstWins)
                .unwrap();

        assert_eq!(catalog.age_ratings(), vec!["PG-13", "TV-MA"]);
        assert_eq!(catalog.get_films_by_rating(" pg-13 "), &[1, 2]);
    }

    #[test]
    fn test_duplicate_titles_first_wins() {
        let csv = "title,description\nTwin,first\nOther,x\nTwin,second\n";
        let catalog =
            Catalog::load_from_reader(csv.as_bytes(), "mem", DuplicateTitlePolicy::FirstWins)
                .unwrap();

        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.find_by_title("Twin"), Some(0));
        assert_eq!(catalog.duplicate_titles().len(), 1);
    }

    #[test]
    fn test_duplicate_titles_rejected() {
        let csv = "title,description\nTwin,first\nTwin,second\n";
        let err = Catalog::load_from_reader(csv.as_bytes(), "mem", DuplicateTitlePolicy::Reject)
            .unwrap_err();

        assert!(matches!(
            err,
            DataLoadError::DuplicateTitle { first: 0, second: 1, .. }
        ));
    }
}
