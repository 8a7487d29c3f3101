//! Filter implementations, one per selection category.
//!
//! Each filter is an OR over its own selections and vacuously true when
//! nothing is selected; a FilterSet ANDs them together.

pub mod age_rating;
pub mod duration;
pub mod genre;
pub mod release_year;

// Re-export for convenience
pub use age_rating::AgeRatingFilter;
pub use duration::DurationFilter;
pub use genre::GenreFilter;
pub use release_year::ReleaseYearFilter;
