//! Filter on release year.

use crate::traits::Filter;
use data_loader::Film;
use std::collections::BTreeSet;

/// Keeps candidates released in one of the selected years.
///
/// A film without a known year never matches an active selection.
#[derive(Debug, Clone, Default)]
pub struct ReleaseYearFilter {
    years: BTreeSet<u16>,
}

impl ReleaseYearFilter {
    pub fn new(years: impl IntoIterator<Item = u16>) -> Self {
        Self {
            years: years.into_iter().collect(),
        }
    }
}

impl Filter for ReleaseYearFilter {
    fn name(&self) -> &str {
        "ReleaseYearFilter"
    }

    fn is_active(&self) -> bool {
        !self.years.is_empty()
    }

    fn matches(&self, film: &Film) -> bool {
        if !self.is_active() {
            return true;
        }
        film.year.is_some_and(|year| self.years.contains(&year))
    }
}
