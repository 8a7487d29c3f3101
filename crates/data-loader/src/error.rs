//! Error types for the data-loader crate.
//!
//! Only faults that make the catalog unusable are errors here. Malformed
//! optional fields (an unparseable duration, a missing display column) are
//! recovered during parsing and never surface as a `DataLoadError`.

use thiserror::Error;

/// Errors that can occur while loading the film catalog
///
/// The `#[derive(Error)]` macro from thiserror implements `std::error::Error`
/// and `Display` from the `#[error(...)]` attributes.
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV record couldn't be decoded
    ///
    /// `line` is the 1-based line in the source file, when the reader knows it
    #[error("Parse error at line {line} in {file}: {reason}")]
    ParseError {
        file: String,
        line: u64,
        reason: String,
    },

    /// A column the catalog cannot do without is absent from the header
    #[error("Missing required column '{column}' in {file}")]
    MissingColumn { column: String, file: String },

    /// A row has an empty title
    #[error("Empty title at line {line} in {file}")]
    EmptyTitle { file: String, line: u64 },

    /// Two rows share a title and the load policy forbids it
    #[error("Duplicate title '{title}' at rows {first} and {second}")]
    DuplicateTitle {
        title: String,
        first: usize,
        second: usize,
    },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
