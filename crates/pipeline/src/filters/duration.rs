//! Filter on duration buckets.

use crate::duration::DurationBucket;
use crate::traits::Filter;
use data_loader::Film;

/// Keeps candidates whose derived duration falls in any selected bucket.
///
/// Films without a parseable duration count as 0 minutes, so they only
/// pass a "less than" bucket.
#[derive(Debug, Clone, Default)]
pub struct DurationFilter {
    buckets: Vec<DurationBucket>,
}

impl DurationFilter {
    pub fn new(buckets: impl IntoIterator<Item = DurationBucket>) -> Self {
        Self {
            buckets: buckets.into_iter().collect(),
        }
    }

    pub fn buckets(&self) -> &[DurationBucket] {
        &self.buckets
    }
}

impl Filter for DurationFilter {
    fn name(&self) -> &str {
        "DurationFilter"
    }

    fn is_active(&self) -> bool {
        !self.buckets.is_empty()
    }

    fn matches(&self, film: &Film) -> bool {
        !self.is_active()
            || self
                .buckets
                .iter()
                .any(|bucket| bucket.contains(film.duration_minutes))
    }
}
