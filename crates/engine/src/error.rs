//! Engine errors.
//!
//! An unknown seed title or an empty filtered ranking are not errors: both
//! produce an empty result. What remains here are startup faults and
//! malformed requests.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    /// Startup fault: the index cannot be paired with the catalog
    #[error("Similarity index error: {0}")]
    Index(#[from] similarity::IndexError),

    #[error("Invalid filter selection: {0}")]
    Filter(#[from] pipeline::FilterError),

    /// Raised by `handle` when the config requires a genre selection
    #[error("At least one genre must be selected")]
    GenreRequired,

    #[error("Failed to read config: {0}")]
    ConfigIo(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
