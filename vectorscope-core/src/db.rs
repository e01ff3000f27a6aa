//! Single entry point that pairs the exact scanner with the HNSW index over one store.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::brute_force::{BruteForceIndex, BruteForceStats};
use crate::config::HnswConfig;
use crate::distance::DistanceMetric;
use crate::error::{ScopeError, ScopeResult};
use crate::index::{HnswIndex, HnswStats};
use crate::vector::{Embedding, SearchResult, VectorId};

/// Which engine answers a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMethod {
    #[default]
    BruteForce,
    Hnsw,
}

impl SearchMethod {
    pub fn name(&self) -> &'static str {
        match self {
            SearchMethod::BruteForce => "brute_force",
            SearchMethod::Hnsw => "hnsw",
        }
    }
}

impl fmt::Display for SearchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SearchMethod {
    type Err = ScopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "brute_force" | "brute-force" | "bruteforce" => Ok(SearchMethod::BruteForce),
            "hnsw" => Ok(SearchMethod::Hnsw),
            other => Err(ScopeError::InvalidParameter(format!(
                "unknown search method '{}'",
                other
            ))),
        }
    }
}

/// Statistics for whichever engine was asked about.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EngineStats {
    BruteForce(BruteForceStats),
    Hnsw(HnswStats),
}

/// Vector collection searchable either exactly or through the HNSW graph.
///
/// The HNSW index owns the store, so both engines always see the same live
/// vectors under the same ids.
#[derive(Debug)]
pub struct VectorDb {
    index: HnswIndex,
    brute_force: BruteForceIndex,
}

impl VectorDb {
    pub fn new(dimension: usize, config: HnswConfig) -> ScopeResult<Self> {
        Ok(Self {
            index: HnswIndex::new(dimension, config)?,
            brute_force: BruteForceIndex::new(),
        })
    }

    pub fn dimensions(&self) -> usize {
        self.index.dimensions()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn add(&mut self, vector: Embedding) -> ScopeResult<VectorId> {
        self.index.insert(vector)
    }

    pub fn get(&self, id: VectorId) -> ScopeResult<&Embedding> {
        self.index.store().get(id)
    }

    pub fn update(&mut self, id: VectorId, vector: Embedding) -> ScopeResult<()> {
        self.index.update(id, vector)
    }

    pub fn remove(&mut self, id: VectorId) -> ScopeResult<()> {
        self.index.remove(id)
    }

    /// Live vectors in id order.
    pub fn all_vectors(&self) -> Vec<(VectorId, Embedding)> {
        self.index.store().all_vectors()
    }

    /// Drops every vector and the graph. Ids start again from 0.
    pub fn clear(&mut self) -> ScopeResult<()> {
        let dimension = self.index.dimensions();
        let config = self.index.config();
        self.index = HnswIndex::new(dimension, config)?;
        info!(dimension, "Cleared vector database");
        Ok(())
    }

    /// Runs a kNN query on the chosen engine.
    ///
    /// HNSW always measures with the metric its graph was built for; asking for
    /// another one fails with [`ScopeError::UnsupportedMetric`].
    pub fn search(
        &mut self,
        query: &Embedding,
        k: usize,
        metric: DistanceMetric,
        method: SearchMethod,
    ) -> ScopeResult<Vec<SearchResult>> {
        debug!(k, %metric, %method, "Vector database search");
        match method {
            SearchMethod::BruteForce => {
                self.brute_force.search(self.index.store(), query, k, metric)
            }
            SearchMethod::Hnsw => {
                let built_with = self.index.distance_metric();
                if metric != built_with {
                    return Err(ScopeError::UnsupportedMetric(format!(
                        "HNSW index is built for {}, not {}",
                        built_with, metric
                    )));
                }
                self.index.search(query, k)
            }
        }
    }

    pub fn stats(&self, method: SearchMethod) -> EngineStats {
        match method {
            SearchMethod::BruteForce => {
                EngineStats::BruteForce(self.brute_force.stats(self.index.store()))
            }
            SearchMethod::Hnsw => EngineStats::Hnsw(self.index.stats()),
        }
    }

    pub fn index(&self) -> &HnswIndex {
        &self.index
    }

    /// Mutable access for reconfiguration and graph maintenance.
    pub fn index_mut(&mut self) -> &mut HnswIndex {
        &mut self.index
    }
}
