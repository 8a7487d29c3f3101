//! Pipeline for filtering ranked film candidates.
//!
//! This crate provides:
//! - Filter trait and one implementation per selection category
//! - FilterSet for combining filters
//! - Duration buckets expressed as data (range kind + bounds)
//!
//! ## Semantics
//! Within a category the selections are ORed (a film tagged "Comedies"
//! passes a "Comedies, Horror Movies" selection). Across categories the
//! filters are ANDed. A category with no selection never excludes a film.
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::FilterSet;
//!
//! let filters = FilterSet::from_selections(
//!     ["Dramas"],
//!     [2019, 2020],
//!     ["TV-MA"],
//!     ["1-2h"],
//! )?;
//!
//! if filters.accepts(&film) { /* keep */ }
//! ```

pub mod error;
pub mod traits;
pub mod duration;
pub mod filters;
pub mod filter_set;

// Re-export main types
pub use error::{FilterError, Result};
pub use traits::Filter;
pub use duration::{DurationBucket, DurationRange};
pub use filter_set::FilterSet;
