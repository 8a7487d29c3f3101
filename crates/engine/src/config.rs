//! Engine configuration.
//!
//! Every field has a default, so an empty JSON object is a valid config.

use crate::error::Result;
use data_loader::DuplicateTitlePolicy;
use serde::{Deserialize, Serialize};
use similarity::TfIdfConfig;
use std::path::Path;
use tracing::info;

/// Number of recommendations returned when a request names no limit
pub const DEFAULT_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub default_limit: usize,
    /// Reject requests that select no genre
    pub require_genre: bool,
    pub duplicate_titles: DuplicateTitlePolicy,
    /// Vectorizer settings used when the index is built at startup
    pub tfidf: TfIdfConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
            require_genre: false,
            duplicate_titles: DuplicateTitlePolicy::default(),
            tfidf: TfIdfConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Read a JSON config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        info!("Loaded engine config from {:?}", path);
        Ok(config)
    }
}
