//! # Similarity Crate
//!
//! Content similarity between catalog films, computed from their
//! descriptions.
//!
//! ## Components
//!
//! ### TF-IDF vectorizer
//! Tokenizes descriptions, learns a vocabulary with smoothed IDF weights and
//! encodes each description as a unit-length sparse vector.
//!
//! ### Similarity oracles
//! - [`SimilarityIndex`]: sparse rows, cosine similarity on demand, can be
//!   saved to and loaded from a JSON artifact
//! - [`SimilarityMatrix`]: dense precomputed scores
//!
//! Both implement [`SimilarityOracle`] and keep one row per catalog film in
//! catalog order.
//!
//! ### Ranking
//! [`rank_by_similarity`] orders the whole catalog by similarity to a seed
//! film, ties in catalog order.
//!
//! ## Example Usage
//!
//! ```ignore
//! use similarity::{rank_by_similarity, SimilarityIndex, TfIdfConfig};
//!
//! let index = SimilarityIndex::from_catalog(&catalog, TfIdfConfig::default());
//! let ranking = rank_by_similarity(&index, seed_id)?;
//! ```

// Public modules
pub mod error;
pub mod tokenize;
pub mod tfidf;
pub mod index;
pub mod ranking;

// Re-export commonly used types
pub use error::{IndexError, Result};
pub use tfidf::{SparseVector, TfIdfConfig, TfIdfModel};
pub use index::{ensure_aligned, SimilarityIndex, SimilarityMatrix, SimilarityOracle};
pub use ranking::{rank_by_similarity, rank_scores, Candidate};
