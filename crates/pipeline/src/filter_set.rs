//! The FilterSet combines category filters.
//!
//! A candidate is accepted when every filter in the set matches it (AND
//! across categories). Inactive filters match everything, so a set built
//! from empty selections accepts every film.

use crate::duration::DurationBucket;
use crate::error::Result;
use crate::filters::{AgeRatingFilter, DurationFilter, GenreFilter, ReleaseYearFilter};
use crate::traits::Filter;
use data_loader::Film;
use std::fmt;

/// Chains filters together.
///
/// ## Usage
/// ```ignore
/// let filters = FilterSet::new()
///     .add_filter(GenreFilter::new(["Dramas"]))
///     .add_filter(ReleaseYearFilter::new([2019, 2020]));
///
/// let keep = filters.accepts(&film);
/// ```
pub struct FilterSet {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterSet {
    /// Create a new empty FilterSet.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// Build the standard four-category set from raw selections.
    ///
    /// Fails only when a duration bucket name is unknown.
    pub fn from_selections<G, R, D>(
        genres: G,
        years: impl IntoIterator<Item = u16>,
        ratings: R,
        duration_buckets: D,
    ) -> Result<Self>
    where
        G: IntoIterator,
        G::Item: AsRef<str>,
        R: IntoIterator,
        R::Item: AsRef<str>,
        D: IntoIterator,
        D::Item: AsRef<str>,
    {
        let buckets = duration_buckets
            .into_iter()
            .map(|name| DurationBucket::resolve(name.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::new()
            .add_filter(GenreFilter::new(genres))
            .add_filter(ReleaseYearFilter::new(years))
            .add_filter(AgeRatingFilter::new(ratings))
            .add_filter(DurationFilter::new(buckets)))
    }

    /// Add a filter to the set (builder pattern).
    ///
    /// # Arguments
    /// * `filter` - Any type implementing the Filter trait
    ///
    /// # Returns
    /// Self for method chaining
    pub fn add_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// True when no filter in the set is active.
    pub fn is_empty(&self) -> bool {
        !self.filters.iter().any(|f| f.is_active())
    }

    /// Names of the active filters, in insertion order.
    pub fn describe(&self) -> Vec<&str> {
        self.filters
            .iter()
            .filter(|f| f.is_active())
            .map(|f| f.name())
            .collect()
    }

    /// Evaluate every filter against `film`, stopping at the first miss.
    pub fn accepts(&self, film: &Film) -> bool {
        let accepted = self.filters.iter().all(|filter| filter.matches(film));
        tracing::trace!("Film {} '{}' accepted={}", film.id, film.title, accepted);
        accepted
    }
}

impl Default for FilterSet {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FilterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterSet")
            .field("active", &self.describe())
            .finish()
    }
}
