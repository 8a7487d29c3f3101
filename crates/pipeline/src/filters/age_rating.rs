//! Filter on age rating.
//!
//! Codes are compared in normalized form, so "pg-13 " selects "PG-13".

use crate::traits::Filter;
use data_loader::{normalize_rating, Film};
use std::collections::BTreeSet;

/// Keeps candidates whose age rating is one of the selected codes.
#[derive(Debug, Clone, Default)]
pub struct AgeRatingFilter {
    ratings: BTreeSet<String>,
}

impl AgeRatingFilter {
    pub fn new<I, S>(ratings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let ratings = ratings
            .into_iter()
            .map(|r| normalize_rating(r.as_ref()))
            .filter(|r| !r.is_empty())
            .collect();
        Self { ratings }
    }
}

impl Filter for AgeRatingFilter {
    fn name(&self) -> &str {
        "AgeRatingFilter"
    }

    fn is_active(&self) -> bool {
        !self.ratings.is_empty()
    }

    fn matches(&self, film: &Film) -> bool {
        if !self.is_active() {
            return true;
        }
        film.normalized_rating()
            .is_some_and(|rating| self.ratings.contains(&rating))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_age_rating_filter_normalizes() {
        let filter = AgeRatingFilter::new(["pg-13 ", "TV-MA"]);

        assert!(filter.matches(&Film::new("A", "").with_rating("PG-13")));
        assert!(filter.matches(&Film::new("B", "").with_rating(" tv-ma")));
        assert!(!filter.matches(&Film::new("C", "").with_rating("R")));
        assert!(!filter.matches(&Film::new("D", "")));
    }

    #[test]
    fn test_age_rating_filter_no_selection() {
        let filter = AgeRatingFilter::new(Vec::<&str>::new());
        assert!(filter.matches(&Film::new("D", "")));
    }
}
