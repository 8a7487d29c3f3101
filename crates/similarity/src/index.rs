//! Similarity oracles over catalog films.
//!
//! Row `i` of every oracle belongs to catalog film `i`. Nothing here knows
//! the catalog itself, so [`ensure_aligned`] must be checked before an
//! oracle is paired with a catalog.

use crate::error::{IndexError, Result};
use crate::tfidf::{SparseVector, TfIdfConfig, TfIdfModel};
use data_loader::{Catalog, FilmId};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::{info, instrument};

/// Pairwise similarity in `[0, 1]`, symmetric, fixed for the process lifetime.
pub trait SimilarityOracle: Send + Sync {
    /// Number of rows (= films)
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Similarity of films `i` and `j`. Both must be `< len()`.
    fn similarity(&self, i: FilmId, j: FilmId) -> f32;

    /// Similarity of `seed` against every film, in catalog order.
    fn similarity_row(&self, seed: FilmId) -> Result<Vec<f32>> {
        check_bounds(seed, self.len())?;
        Ok((0..self.len()).map(|j| self.similarity(seed, j)).collect())
    }

    /// Titles of the films the rows were built from, when known
    fn catalog_titles(&self) -> Option<&[String]> {
        None
    }
}

fn check_bounds(id: FilmId, len: usize) -> Result<()> {
    if id < len {
        Ok(())
    } else {
        Err(IndexError::OutOfRange { id, len })
    }
}

/// Fail unless the oracle has exactly one row per catalog film.
///
/// Oracles that remember their source titles must also list the catalog's
/// titles in the same order.
pub fn ensure_aligned(oracle: &dyn SimilarityOracle, catalog: &Catalog) -> Result<()> {
    if oracle.len() != catalog.len() {
        return Err(IndexError::Misaligned {
            index_rows: oracle.len(),
            catalog_rows: catalog.len(),
        });
    }
    let Some(titles) = oracle.catalog_titles() else {
        return Ok(());
    };
    for (row, (found, film)) in titles.iter().zip(catalog.films()).enumerate() {
        if *found != film.title {
            return Err(IndexError::CatalogMismatch {
                row,
                expected: film.title.clone(),
                found: found.clone(),
            });
        }
    }
    Ok(())
}

// =============================================================================
// SimilarityIndex - sparse TF-IDF rows
// =============================================================================

/// TF-IDF model plus one unit-length row per film.
///
/// Cosine similarity is computed on demand as a sparse dot product, so memory
/// stays linear in the catalog size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityIndex {
    model: TfIdfModel,
    rows: Vec<SparseVector>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    titles: Option<Vec<String>>,
}

impl SimilarityIndex {
    /// Fit the vectorizer on `descriptions` and encode each of them.
    #[instrument(skip(descriptions), fields(documents = descriptions.len()))]
    pub fn build(descriptions: &[&str], config: TfIdfConfig) -> Self {
        let model = TfIdfModel::fit(descriptions, config);
        let rows: Vec<SparseVector> = descriptions
            .par_iter()
            .map(|doc| model.transform(doc))
            .collect();

        let empty_rows = rows.iter().filter(|r| r.is_empty()).count();
        info!(
            "Built similarity index: {} rows, vocabulary {}, {} empty rows",
            rows.len(),
            model.vocabulary_size(),
            empty_rows
        );
        Self {
            model,
            rows,
            titles: None,
        }
    }

    /// Build from a catalog's descriptions, in catalog order. The titles are
    /// kept so a saved artifact can be matched against its catalog.
    pub fn from_catalog(catalog: &Catalog, config: TfIdfConfig) -> Self {
        let mut index = Self::build(&catalog.descriptions(), config);
        index.titles = Some(catalog.films().iter().map(|f| f.title.clone()).collect());
        index
    }

    pub fn model(&self) -> &TfIdfModel {
        &self.model
    }

    pub fn row(&self, id: FilmId) -> Option<&SparseVector> {
        self.rows.get(id)
    }

    /// Write the index as a JSON artifact.
    pub fn save(&self, path: &Path) -> Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(writer, self)?;
        info!("Saved similarity index ({} rows) to {:?}", self.rows.len(), path);
        Ok(())
    }

    /// Read a JSON artifact written by [`SimilarityIndex::save`].
    ///
    /// The artifact is checked in full here so a damaged file fails at
    /// startup rather than inside a request.
    pub fn load(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let index: Self = serde_json::from_reader(reader)?;
        index.validate()?;
        info!("Loaded similarity index ({} rows) from {:?}", index.rows.len(), path);
        Ok(index)
    }

    fn validate(&self) -> Result<()> {
        self.model
            .check()
            .map_err(|reason| IndexError::InvalidModel { reason })?;
        let dims = self.model.vocabulary_size();
        for (row, vector) in self.rows.iter().enumerate() {
            vector
                .check(dims)
                .map_err(|reason| IndexError::InvalidRow { row, reason })?;
        }
        if let Some(titles) = &self.titles {
            if titles.len() != self.rows.len() {
                return Err(IndexError::InvalidModel {
                    reason: format!("{} titles for {} rows", titles.len(), self.rows.len()),
                });
            }
        }
        Ok(())
    }

    fn score(&self, i: FilmId, j: FilmId) -> f32 {
        if i == j && !self.rows[i].is_empty() {
            return 1.0;
        }
        self.rows[i].dot(&self.rows[j]).clamp(0.0, 1.0)
    }
}

impl SimilarityOracle for SimilarityIndex {
    fn len(&self) -> usize {
        self.rows.len()
    }

    fn similarity(&self, i: FilmId, j: FilmId) -> f32 {
        self.score(i, j)
    }

    fn similarity_row(&self, seed: FilmId) -> Result<Vec<f32>> {
        check_bounds(seed, self.rows.len())?;
        Ok((0..self.rows.len())
            .into_par_iter()
            .map(|j| self.score(seed, j))
            .collect())
    }

    fn catalog_titles(&self) -> Option<&[String]> {
        self.titles.as_deref()
    }
}

// =============================================================================
// SimilarityMatrix - dense precomputed scores
// =============================================================================

/// Fully precomputed square matrix, row-major.
///
/// Quadratic in memory; meant for small catalogs or when the scores come
/// from elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityMatrix {
    size: usize,
    values: Vec<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    titles: Option<Vec<String>>,
}

impl SimilarityMatrix {
    /// Evaluate every pair of `index`.
    pub fn from_index(index: &SimilarityIndex) -> Self {
        let size = index.len();
        let values = (0..size)
            .into_par_iter()
            .flat_map_iter(|i| (0..size).map(move |j| index.score(i, j)))
            .collect();
        Self {
            size,
            values,
            titles: index.titles.clone(),
        }
    }

    /// Take externally computed rows. Scores are clamped into `[0, 1]`, with
    /// NaN and `-0.0` stored as `0.0`.
    pub fn from_rows(rows: Vec<Vec<f32>>) -> Result<Self> {
        let size = rows.len();
        let mut values = Vec::with_capacity(size * size);
        for (row, scores) in rows.into_iter().enumerate() {
            if scores.len() != size {
                return Err(IndexError::NotSquare {
                    row,
                    expected: size,
                    found: scores.len(),
                });
            }
            values.extend(scores.into_iter().map(clamp_score));
        }
        Ok(Self {
            size,
            values,
            titles: None,
        })
    }
}

impl SimilarityOracle for SimilarityMatrix {
    fn len(&self) -> usize {
        self.size
    }

    fn similarity(&self, i: FilmId, j: FilmId) -> f32 {
        self.values[i * self.size + j]
    }

    fn similarity_row(&self, seed: FilmId) -> Result<Vec<f32>> {
        check_bounds(seed, self.size)?;
        let start = seed * self.size;
        Ok(self.values[start..start + self.size].to_vec())
    }

    fn catalog_titles(&self) -> Option<&[String]> {
        self.titles.as_deref()
    }
}

fn clamp_score(score: f32) -> f32 {
    if score.is_nan() {
        0.0
    } else {
        // adding +0.0 turns -0.0 into +0.0
        (score + 0.0).clamp(0.0, 1.0)
    }
}
