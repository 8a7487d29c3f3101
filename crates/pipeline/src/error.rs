//! Errors raised while turning user selections into filters.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// A duration bucket name matched neither a bucket key nor its label
    #[error("Unknown duration bucket '{name}' (expected one of: {available})")]
    UnknownDurationBucket { name: String, available: String },
}

pub type Result<T> = std::result::Result<T, FilterError>;
