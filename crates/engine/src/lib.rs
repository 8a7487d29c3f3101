//! Engine crate for the film recommender.
//!
//! Bundles the catalog and similarity index into a [`RecommendationEngine`]
//! that turns a seed title plus filter selections into ranked film records.

pub mod config;
pub mod engine;
pub mod error;
pub mod request;

pub use config::{EngineConfig, DEFAULT_LIMIT};
pub use engine::RecommendationEngine;
pub use error::{EngineError, Result};
pub use request::{FilmRecommendation, RecommendationRequest};
