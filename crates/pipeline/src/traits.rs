//! Core traits for the filtering pipeline.
//!
//! This module defines the Filter trait: one predicate per filter category,
//! evaluated on a single film at a time so the engine can stop walking the
//! ranking as soon as it has enough matches.

use data_loader::Film;

/// A category filter.
///
/// ## Design Note
/// - `Send + Sync` lets one filter set be read from several threads
/// - A filter built from an empty selection is inactive and must accept
///   every film
pub trait Filter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// Whether the user selected anything in this category
    fn is_active(&self) -> bool;

    /// True when `film` satisfies at least one selection of this category
    /// (or the filter is inactive)
    fn matches(&self, film: &Film) -> bool;
}
