//! Thread-safe handle around an [`HnswIndex`].

use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

use crate::config::{ConfigUpdate, HnswConfig};
use crate::error::ScopeResult;
use crate::hnsw::SearchTrace;
use crate::index::{HnswIndex, HnswStats};
use crate::vector::{Embedding, SearchResult, VectorId};

/// Cloneable handle to one index. Searches share a read lock and run in
/// parallel; inserts, removals and reconfiguration take the write lock.
///
/// Searches through this handle do not touch the index's stored trace; use
/// [`SharedHnswIndex::search_traced`] to get the trace of a particular query.
#[derive(Debug, Clone)]
pub struct SharedHnswIndex {
    inner: Arc<RwLock<HnswIndex>>,
}

impl SharedHnswIndex {
    pub fn new(dimension: usize, config: HnswConfig) -> ScopeResult<Self> {
        Ok(Self::from_index(HnswIndex::new(dimension, config)?))
    }

    pub fn from_index(index: HnswIndex) -> Self {
        Self { inner: Arc::new(RwLock::new(index)) }
    }

    pub fn insert(&self, vector: Embedding) -> ScopeResult<VectorId> {
        self.inner.write().insert(vector)
    }

    pub fn remove(&self, id: VectorId) -> ScopeResult<()> {
        self.inner.write().remove(id)
    }

    pub fn update(&self, id: VectorId, vector: Embedding) -> ScopeResult<()> {
        self.inner.write().update(id, vector)
    }

    pub fn configure(&self, update: &ConfigUpdate) -> ScopeResult<()> {
        self.inner.write().configure(update)
    }

    pub fn search(&self, query: &Embedding, k: usize) -> ScopeResult<Vec<SearchResult>> {
        self.search_traced(query, k).map(|(results, _)| results)
    }

    pub fn search_traced(
        &self,
        query: &Embedding,
        k: usize,
    ) -> ScopeResult<(Vec<SearchResult>, SearchTrace)> {
        let index = self.inner.read();
        debug!(k, vectors = index.len(), "Searching shared HNSW index");
        index.search_traced(query, k)
    }

    pub fn get(&self, id: VectorId) -> ScopeResult<Embedding> {
        self.inner.read().store().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    pub fn stats(&self) -> HnswStats {
        self.inner.read().stats()
    }

    /// Read access for introspection calls not mirrored on the handle.
    pub fn read(&self) -> RwLockReadGuard<'_, HnswIndex> {
        self.inner.read()
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, HnswIndex> {
        self.inner.write()
    }
}
