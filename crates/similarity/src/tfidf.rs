//! TF-IDF vectorizer for film descriptions.
//!
//! ## Weighting
//! - term frequency: raw count of the term in the description
//! - inverse document frequency: `ln((1 + n) / (1 + df)) + 1` (smoothed, so
//!   a term present in every document still keeps weight 1)
//! - each document vector is L2-normalized, which turns cosine similarity
//!   into a plain dot product

use crate::tokenize::tokenize;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Vectorizer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TfIdfConfig {
    /// Drop common English function words
    pub stop_words: bool,
    /// Ignore terms that appear in fewer documents than this
    pub min_df: usize,
    /// Shortest token kept, in characters
    pub min_token_len: usize,
}

impl Default for TfIdfConfig {
    fn default() -> Self {
        Self {
            stop_words: false,
            min_df: 1,
            min_token_len: 2,
        }
    }
}

/// Sparse vector with strictly increasing term ids.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparseVector {
    pub indices: Vec<u32>,
    pub values: Vec<f32>,
}

impl SparseVector {
    /// Build from unordered (term, weight) pairs.
    pub fn from_pairs(mut pairs: Vec<(u32, f32)>) -> Self {
        pairs.sort_unstable_by_key(|&(term, _)| term);
        let (indices, values) = pairs.into_iter().unzip();
        Self { indices, values }
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    pub fn norm(&self) -> f32 {
        self.values.iter().map(|v| v * v).sum::<f32>().sqrt()
    }

    /// Scale to unit length. A zero vector stays zero.
    pub fn normalize(&mut self) {
        let norm = self.norm();
        if norm > 0.0 {
            for v in &mut self.values {
                *v /= norm;
            }
        }
    }

    /// Check the invariants `dot` relies on: one weight per index, indices
    /// strictly increasing and below `dims`, weights finite.
    pub fn check(&self, dims: usize) -> Result<(), String> {
        if self.indices.len() != self.values.len() {
            return Err(format!(
                "{} indices but {} values",
                self.indices.len(),
                self.values.len()
            ));
        }
        if let Some(pair) = self.indices.windows(2).find(|w| w[0] >= w[1]) {
            return Err(format!("indices not increasing at {} -> {}", pair[0], pair[1]));
        }
        if let Some(&last) = self.indices.last() {
            if last as usize >= dims {
                return Err(format!("term {} outside vocabulary of {}", last, dims));
            }
        }
        if self.values.iter().any(|v| !v.is_finite()) {
            return Err("non-finite weight".to_string());
        }
        Ok(())
    }

    /// Dot product by merging the two sorted index lists.
    pub fn dot(&self, other: &SparseVector) -> f32 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.indices.len() && j < other.indices.len() {
            match self.indices[i].cmp(&other.indices[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += self.values[i] * other.values[j];
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }
}

/// Fitted vocabulary and IDF weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfIdfModel {
    config: TfIdfConfig,
    /// Sorted; a term's position is its id
    vocabulary: Vec<String>,
    /// `idf[id]` for each vocabulary term
    idf: Vec<f32>,
    n_documents: usize,
}

impl TfIdfModel {
    /// Learn vocabulary and document frequencies from `documents`.
    pub fn fit(documents: &[&str], config: TfIdfConfig) -> Self {
        let tokenized: Vec<Vec<String>> = documents
            .par_iter()
            .map(|doc| tokenize(doc, &config))
            .collect();

        let mut df: HashMap<&str, usize> = HashMap::new();
        for tokens in &tokenized {
            let unique: HashSet<&str> = tokens.iter().map(String::as_str).collect();
            for term in unique {
                *df.entry(term).or_insert(0) += 1;
            }
        }

        let mut vocabulary: Vec<String> = df
            .iter()
            .filter(|&(_, &count)| count >= config.min_df)
            .map(|(&term, _)| term.to_string())
            .collect();
        vocabulary.sort_unstable();

        let n = documents.len() as f32;
        let idf = vocabulary
            .iter()
            .map(|term| {
                let doc_freq = df[term.as_str()] as f32;
                ((1.0 + n) / (1.0 + doc_freq)).ln() + 1.0
            })
            .collect();

        debug!(
            "Fitted TF-IDF over {} documents, vocabulary size {}",
            documents.len(),
            vocabulary.len()
        );

        Self {
            config,
            vocabulary,
            idf,
            n_documents: documents.len(),
        }
    }

    pub fn config(&self) -> &TfIdfConfig {
        &self.config
    }

    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn n_documents(&self) -> usize {
        self.n_documents
    }

    /// Check that the vocabulary is sorted without repeats and has one IDF
    /// weight per term.
    pub fn check(&self) -> Result<(), String> {
        if self.idf.len() != self.vocabulary.len() {
            return Err(format!(
                "{} idf weights for {} terms",
                self.idf.len(),
                self.vocabulary.len()
            ));
        }
        if let Some(pair) = self.vocabulary.windows(2).find(|w| w[0] >= w[1]) {
            return Err(format!("vocabulary not sorted at '{}'", pair[1]));
        }
        if self.idf.iter().any(|w| !w.is_finite()) {
            return Err("non-finite idf weight".to_string());
        }
        Ok(())
    }

    pub fn term_id(&self, term: &str) -> Option<u32> {
        self.vocabulary
            .binary_search_by(|t| t.as_str().cmp(term))
            .ok()
            .map(|id| id as u32)
    }

    pub fn idf(&self, term: &str) -> Option<f32> {
        self.term_id(term).map(|id| self.idf[id as usize])
    }

    /// Encode one document as a unit-length TF-IDF vector.
    ///
    /// Terms outside the vocabulary are ignored; a document with no known
    /// terms yields the zero vector.
    pub fn transform(&self, document: &str) -> SparseVector {
        let mut counts: HashMap<u32, u32> = HashMap::new();
        for token in tokenize(document, &self.config) {
            if let Some(id) = self.term_id(&token) {
                *counts.entry(id).or_insert(0) += 1;
            }
        }
        let pairs = counts
            .into_iter()
            .map(|(id, count)| (id, count as f32 * self.idf[id as usize]))
            .collect();
        let mut vector = SparseVector::from_pairs(pairs);
        vector.normalize();
        vector
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idf_down_weights_common_terms() {
        let docs = ["space pirates", "space cowboys", "pirate ship"];
        let model = TfIdfModel::fit(&docs, TfIdfConfig::default());

        let space = model.idf("space").unwrap();
        let cowboys = model.idf("cowboys").unwrap();
        assert!(space < cowboys);
        // ln(4/3) + 1 and ln(4/2) + 1
        assert!((cowboys - ((4.0f32 / 2.0).ln() + 1.0)).abs() < 1e-6);
        assert!((space - ((4.0f32 / 3.0).ln() + 1.0)).abs() < 1e-6);
    }

    #[test]
    fn test_vocabulary_is_sorted() {
        let docs = ["zebra apple mango"];
        let model = TfIdfModel::fit(&docs, TfIdfConfig::default());

        assert_eq!(model.vocabulary(), &["apple", "mango", "zebra"]);
        assert_eq!(model.term_id("mango"), Some(1));
        assert_eq!(model.term_id("kiwi"), None);
    }

    #[test]
    fn test_min_df_prunes_rare_terms() {
        let docs = ["war drama", "war comedy", "romance"];
        let config = TfIdfConfig {
            min_df: 2,
            ..TfIdfConfig::default()
        };
        let model = TfIdfModel::fit(&docs, config);

        assert_eq!(model.vocabulary(), &["war"]);
        assert!(model.transform("romance").is_empty());
    }

    #[test]
    fn test_transform_is_unit_length() {
        let docs = ["a detective hunts a killer", "a killer hunts"];
        let model = TfIdfModel::fit(&docs, TfIdfConfig::default());
        let v = model.transform(docs[0]);

        assert!((v.norm() - 1.0).abs() < 1e-5);
        assert!(v.indices.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_sparse_dot() {
        let a = SparseVector::from_pairs(vec![(3, 1.0), (1, 2.0)]);
        let b = SparseVector::from_pairs(vec![(1, 0.5), (2, 9.0), (3, 4.0)]);

        assert_eq!(a.dot(&b), 2.0 * 0.5 + 1.0 * 4.0);
        assert_eq!(a.dot(&SparseVector::default()), 0.0);
    }

    #[test]
    fn test_normalize_zero_vector() {
        let mut v = SparseVector::default();
        v.normalize();
        assert!(v.is_empty());
        assert_eq!(v.norm(), 0.0);
    }

    #[test]
    fn test_sparse_check() {
        let good = SparseVector::from_pairs(vec![(0, 0.6), (4, 0.8)]);
        assert!(good.check(5).is_ok());
        assert!(good.check(4).is_err());

        let short = SparseVector {
            indices: vec![0, 1],
            values: vec![0.7],
        };
        assert!(short.check(5).is_err());

        let unordered = SparseVector {
            indices: vec![2, 2],
            values: vec![0.5, 0.5],
        };
        assert!(unordered.check(5).is_err());
    }

    #[test]
    fn test_fitted_model_passes_check() {
        let model = TfIdfModel::fit(&["night train", "train heist"], TfIdfConfig::default());
        assert!(model.check().is_ok());
    }
}
