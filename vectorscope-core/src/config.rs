use std::ops::RangeInclusive;

use serde::{Serialize, Deserialize};
use crate::distance::DistanceMetric;
use crate::error::{ScopeResult, ScopeError};

/// Accepted range for `m`.
pub const M_RANGE: RangeInclusive<usize> = 1..=100;
/// Accepted range for `ef_construction` and `ef_search`.
pub const EF_RANGE: RangeInclusive<usize> = 1..=1000;
/// Highest level a node can be assigned.
pub const MAX_LEVEL: usize = 10;

/// Configuration parameters for the HNSW algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HnswConfig {
    /// The maximum number of neighbors selected per node per layer on insertion.
    pub m: usize,
    /// The size of the candidate pool during index construction.
    /// Higher means better quality and a slower build.
    pub ef_construction: usize,
    /// The size of the candidate pool during search (higher means better recall, slower search).
    pub ef_search: usize,
    /// Metric used for every distance the graph computes.
    #[serde(default)]
    pub metric: DistanceMetric,
    /// Seed for the random number generator used for level assignment. If None, uses random seed.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn check_range(name: &str, value: usize, range: &RangeInclusive<usize>) -> ScopeResult<()> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(ScopeError::InvalidParameter(format!(
            "{} must be in {}..={}, got {}",
            name,
            range.start(),
            range.end(),
            value
        )))
    }
}

impl HnswConfig {
    /// Creates a new HNSW configuration with the Euclidean metric and a random seed.
    pub fn new(m: usize, ef_construction: usize, ef_search: usize) -> Self {
        HnswConfig {
            m,
            ef_construction,
            ef_search,
            metric: DistanceMetric::Euclidean,
            seed: None,
        }
    }

    pub fn with_metric(mut self, metric: DistanceMetric) -> Self {
        self.metric = metric;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration parameters.
    pub fn validate(&self) -> ScopeResult<()> {
        check_range("m", self.m, &M_RANGE)?;
        check_range("ef_construction", self.ef_construction, &EF_RANGE)?;
        check_range("ef_search", self.ef_search, &EF_RANGE)?;
        Ok(())
    }

    /// Returns a copy with `update` applied, or an error if any supplied value is out of range.
    /// `self` is never modified, so a rejected update leaves the caller's config intact.
    pub fn merged(&self, update: &ConfigUpdate) -> ScopeResult<Self> {
        let mut next = *self;
        if let Some(m) = update.m {
            next.m = m;
        }
        if let Some(ef_construction) = update.ef_construction {
            next.ef_construction = ef_construction;
        }
        if let Some(ef_search) = update.ef_search {
            next.ef_search = ef_search;
        }
        next.validate()?;
        Ok(next)
    }
}

impl Default for HnswConfig {
    fn default() -> Self {
        HnswConfig {
            m: 4,
            ef_construction: 100,
            ef_search: 10,
            metric: DistanceMetric::Euclidean,
            seed: None,
        }
    }
}

/// Partial update of the tunable HNSW parameters. Absent fields keep their current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigUpdate {
    pub ef_search: Option<usize>,
    pub ef_construction: Option<usize>,
    pub m: Option<usize>,
}

impl ConfigUpdate {
    pub fn ef_search(value: usize) -> Self {
        ConfigUpdate { ef_search: Some(value), ..Default::default() }
    }

    pub fn ef_construction(value: usize) -> Self {
        ConfigUpdate { ef_construction: Some(value), ..Default::default() }
    }

    pub fn m(value: usize) -> Self {
        ConfigUpdate { m: Some(value), ..Default::default() }
    }
}
