//! Errors raised while building, loading or querying a similarity index.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid index artifact: {0}")]
    Artifact(#[from] serde_json::Error),

    /// The artifact parsed but its vocabulary or weights are inconsistent
    #[error("Invalid index model: {reason}")]
    InvalidModel { reason: String },

    #[error("Invalid index row {row}: {reason}")]
    InvalidRow { row: usize, reason: String },

    /// Index rows and catalog rows disagree. Serving with this index would
    /// rank every request against the wrong films.
    #[error("Similarity index has {index_rows} rows but the catalog has {catalog_rows} films")]
    Misaligned {
        index_rows: usize,
        catalog_rows: usize,
    },

    /// Same row count, but the index was built from other films
    #[error("Similarity index row {row} belongs to '{found}', the catalog has '{expected}'")]
    CatalogMismatch {
        row: usize,
        expected: String,
        found: String,
    },

    /// A dense matrix whose rows are not all `size` long
    #[error("Similarity matrix row {row} has {found} columns, expected {expected}")]
    NotSquare {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Film {id} is outside the index ({len} rows)")]
    OutOfRange { id: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, IndexError>;
