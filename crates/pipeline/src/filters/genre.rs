//! Filter to keep only films tagged with one of the selected genres.

use crate::traits::Filter;
use data_loader::Film;
use std::collections::BTreeSet;

/// Keeps candidates whose genre set intersects the selection.
///
/// ## Algorithm
/// Selecting "Comedies, Horror Movies" keeps a film tagged with either one
/// (OR within the category). An empty selection keeps everything.
#[derive(Debug, Clone, Default)]
pub struct GenreFilter {
    genres: BTreeSet<String>,
}

impl GenreFilter {
    /// Create a new GenreFilter. Selections are trimmed; blanks are dropped.
    pub fn new<I, S>(genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let genres = genres
            .into_iter()
            .map(|g| g.as_ref().trim().to_string())
            .filter(|g| !g.is_empty())
            .collect();
        Self { genres }
    }

    pub fn genres(&self) -> &BTreeSet<String> {
        &self.genres
    }
}

impl Filter for GenreFilter {
    fn name(&self) -> &str {
        "GenreFilter"
    }

    fn is_active(&self) -> bool {
        !self.genres.is_empty()
    }

    fn matches(&self, film: &Film) -> bool {
        !self.is_active() || film.genres.iter().any(|genre| self.genres.contains(genre))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genre_filter_is_or_within_category() {
        let filter = GenreFilter::new(["Comedies", "Horror Movies"]);

        let comedy = Film::new("Laughs", "").with_genres(["Comedies"]);
        let horror = Film::new("Screams", "").with_genres(["Horror Movies", "Thrillers"]);
        let drama = Film::new("Tears", "").with_genres(["Dramas"]);

        assert!(filter.matches(&comedy));
        assert!(filter.matches(&horror));
        assert!(!filter.matches(&drama));
    }

    #[test]
    fn test_empty_selection_is_vacuous() {
        let filter = GenreFilter::new(Vec::<String>::new());
        let untagged = Film::new("Nothing", "");

        assert!(!filter.is_active());
        assert!(filter.matches(&untagged));
    }

    #[test]
    fn test_selection_is_trimmed() {
        let filter = GenreFilter::new([" Dramas ", "  "]);

        assert_eq!(filter.genres().len(), 1);
        assert!(filter.matches(&Film::new("Tears", "").with_genres(["Dramas"])));
    }
}
