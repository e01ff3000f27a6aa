//! Exact k-nearest-neighbor search by scanning every live vector.

use std::cmp::Ordering;

use serde::Serialize;
use tracing::debug;

use crate::distance::{self, DistanceMetric};
use crate::error::ScopeResult;
use crate::storage::VectorStore;
use crate::vector::{validate_embedding, Embedding, SearchResult};

/// Summary of what the exact scanner works over.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BruteForceStats {
    pub total_vectors: usize,
    pub dimensions: usize,
    pub supported_metrics: Vec<DistanceMetric>,
    pub search_type: &'static str,
}

/// Linear-scan kNN. Holds no state; every call reads the store it is given.
#[derive(Debug, Clone, Copy, Default)]
pub struct BruteForceIndex;

/// Orders results by ascending distance, breaking ties by ascending id.
pub(crate) fn compare_results(a: &SearchResult, b: &SearchResult) -> Ordering {
    a.distance.total_cmp(&b.distance).then_with(|| a.id.cmp(&b.id))
}

impl BruteForceIndex {
    pub fn new() -> Self {
        BruteForceIndex
    }

    /// Returns the `k` live vectors closest to `query`, nearest first.
    ///
    /// `similarity` is filled in only for [`DistanceMetric::Cosine`].
    pub fn search(
        &self,
        store: &VectorStore,
        query: &Embedding,
        k: usize,
        metric: DistanceMetric,
    ) -> ScopeResult<Vec<SearchResult>> {
        validate_embedding(store.dimension(), query)?;
        if store.is_empty() || k == 0 {
            return Ok(Vec::new());
        }

        let mut results = Vec::with_capacity(store.size());
        for (id, vector) in store.iter() {
            let (distance, similarity) = match metric {
                DistanceMetric::Euclidean => {
                    (distance::euclidean(query.view(), vector.view())?, None)
                }
                DistanceMetric::Cosine => {
                    let similarity = distance::cosine_similarity(query.view(), vector.view())?;
                    (1.0 - similarity, Some(similarity))
                }
            };
            results.push(SearchResult {
                id,
                vector: vector.clone(),
                distance,
                similarity,
            });
        }

        results.sort_by(compare_results);
        results.truncate(k);
        debug!(k, %metric, scanned = store.size(), returned = results.len(), "Brute-force search completed");
        Ok(results)
    }

    pub fn stats(&self, store: &VectorStore) -> BruteForceStats {
        BruteForceStats {
            total_vectors: store.size(),
            dimensions: store.dimension(),
            supported_metrics: DistanceMetric::ALL.to_vec(),
            search_type: "brute_force",
        }
    }
}
