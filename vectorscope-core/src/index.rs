use crate::config::{ConfigUpdate, HnswConfig, MAX_LEVEL};
use crate::distance::DistanceMetric;
use crate::error::{ScopeError, ScopeResult};
use crate::hnsw::node::{live_node, reaches_layer};
use crate::hnsw::{self, Neighbor, Node, NodeSlot, SearchTrace, TraceStats};
use crate::storage::VectorStore;
use crate::utils::{create_rng, generate_random_level};
use crate::vector::{validate_embedding, Embedding, SearchResult, VectorId};

use rand::rngs::StdRng;
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

/// Summary numbers for an [`HnswIndex`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HnswStats {
    /// Live nodes in the graph.
    pub total_vectors: usize,
    pub max_level: usize,
    /// Mean count of distinct live neighbors (over all layers) per live node.
    pub average_neighbors: f64,
    pub entry_point: Option<VectorId>,
}

/// Approximate kNN index over a layered proximity graph.
///
/// The index owns its [`VectorStore`]; node `i` in the graph always describes
/// the vector stored under id `i`.
#[derive(Debug, Clone)]
pub struct HnswIndex {
    config: HnswConfig,
    store: VectorStore,
    nodes: Vec<NodeSlot>,
    entry_point: Option<VectorId>,
    last_trace: SearchTrace,
    rng: StdRng,
}

impl HnswIndex {
    /// Creates an empty index over vectors of `dimension` elements.
    pub fn new(dimension: usize, config: HnswConfig) -> ScopeResult<Self> {
        config.validate()?;
        let store = VectorStore::new(dimension)?;
        info!(dimension, m = config.m, ef_construction = config.ef_construction, ef_search = config.ef_search, metric = %config.metric, "Creating new HNSW index");
        Ok(Self {
            config,
            store,
            nodes: Vec::new(),
            entry_point: None,
            last_trace: SearchTrace::default(),
            rng: create_rng(config.seed),
        })
    }

    /// Builds an index over an existing store, inserting its live vectors in id order.
    /// Removed slots stay removed, so ids carry over unchanged.
    pub fn from_store(store: VectorStore, config: HnswConfig) -> ScopeResult<Self> {
        config.validate()?;
        let capacity = store.capacity();
        let mut index = Self {
            config,
            store,
            nodes: Vec::with_capacity(capacity),
            entry_point: None,
            last_trace: SearchTrace::default(),
            rng: create_rng(config.seed),
        };
        for id in 0..capacity {
            if index.store.is_live(id) {
                let level = generate_random_level(MAX_LEVEL, &mut index.rng);
                index.nodes.push(NodeSlot::Live(Node::new(level)));
                index.link_node(id, level)?;
            } else {
                index.nodes.push(NodeSlot::Removed);
            }
        }
        info!(vectors = index.len(), max_level = index.max_level(), "Built HNSW index from existing store");
        Ok(index)
    }

    pub fn config(&self) -> HnswConfig {
        self.config
    }

    /// Applies a partial parameter update. Nothing changes if any value is out of range.
    /// Existing edges are left as they are; new values only affect later operations.
    pub fn configure(&mut self, update: &ConfigUpdate) -> ScopeResult<()> {
        let next = self.config.merged(update)?;
        info!(m = next.m, ef_construction = next.ef_construction, ef_search = next.ef_search, "Reconfigured HNSW index");
        self.config = next;
        Ok(())
    }

    pub fn store(&self) -> &VectorStore {
        &self.store
    }

    pub fn distance_metric(&self) -> DistanceMetric {
        self.config.metric
    }

    pub fn dimensions(&self) -> usize {
        self.store.dimension()
    }

    /// Number of live vectors.
    pub fn len(&self) -> usize {
        self.store.size()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn entry_point(&self) -> Option<VectorId> {
        self.entry_point
    }

    /// Level of the entry point, or 0 for an empty graph.
    pub fn max_level(&self) -> usize {
        self.entry_point
            .and_then(|id| live_node(&self.nodes, id))
            .map_or(0, Node::level)
    }

    /// The live node stored under `id`.
    pub fn node(&self, id: VectorId) -> Option<&Node> {
        live_node(&self.nodes, id)
    }

    /// Stores `vector`, assigns it a random level and links it into the graph.
    pub fn insert(&mut self, vector: Embedding) -> ScopeResult<VectorId> {
        let id = self.store.add(vector)?;
        let level = generate_random_level(MAX_LEVEL, &mut self.rng);
        self.nodes.push(NodeSlot::Live(Node::new(level)));
        self.link_node(id, level)?;
        debug!(id, level, entry_point = ?self.entry_point, "Inserted vector into HNSW index");
        Ok(id)
    }

    /// Connects an already-stored node to the graph. The node must have no edges yet.
    fn link_node(&mut self, id: VectorId, level: usize) -> ScopeResult<()> {
        let Some(entry_point) = self.entry_point else {
            self.entry_point = Some(id);
            debug!(id, level, "Set new node as the first entry point");
            return Ok(());
        };

        let current_max_level = self.max_level();
        let query = self.store.get(id)?.clone();

        for layer in (0..=level.min(current_max_level)).rev() {
            let candidates = hnsw::search_layer(
                query.view(),
                entry_point,
                self.config.ef_construction,
                layer,
                &self.store,
                &self.nodes,
                self.config.metric,
                None,
            )?;
            for neighbor_id in hnsw::select_neighbors(&candidates, self.config.m) {
                self.connect(id, neighbor_id, layer);
            }
        }

        if level > current_max_level {
            self.entry_point = Some(id);
            debug!(id, level, previous = entry_point, "Updated graph entry point to new node");
        }
        Ok(())
    }

    /// Adds an undirected edge at `layer`. The far side is not pruned back to `m`.
    fn connect(&mut self, a: VectorId, b: VectorId, layer: usize) {
        for (from, to) in [(a, b), (b, a)] {
            match self.nodes.get_mut(from).and_then(NodeSlot::as_live_mut) {
                Some(node) => {
                    node.link(layer, to);
                }
                None => warn!(from, to, layer, "Skipping edge from a node that is not live"),
            }
        }
    }

    /// Searches for the `k` nearest neighbors of `query` and records the trace
    /// returned by [`HnswIndex::search_trace`].
    pub fn search(&mut self, query: &Embedding, k: usize) -> ScopeResult<Vec<SearchResult>> {
        let (results, search_trace) = self.search_traced(query, k)?;
        self.last_trace = search_trace;
        Ok(results)
    }

    /// Same traversal as [`HnswIndex::search`], but hands the trace back instead of
    /// storing it, so it only needs shared access to the index.
    pub fn search_traced(
        &self,
        query: &Embedding,
        k: usize,
    ) -> ScopeResult<(Vec<SearchResult>, SearchTrace)> {
        validate_embedding(self.store.dimension(), query)?;
        let mut search_trace = SearchTrace::default();

        let Some(entry_point) = self.entry_point else {
            debug!("Search called on an empty index");
            return Ok((Vec::new(), search_trace));
        };

        let ef_search = self.config.ef_search;
        let mut current_ep_id = entry_point;
        for layer in (1..=self.max_level()).rev() {
            let candidates = hnsw::search_layer(
                query.view(),
                current_ep_id,
                ef_search,
                layer,
                &self.store,
                &self.nodes,
                self.config.metric,
                Some(&mut search_trace),
            )?;
            if let Some(best) = candidates.first() {
                current_ep_id = best.id;
            }
        }

        let candidates = hnsw::search_layer(
            query.view(),
            current_ep_id,
            ef_search,
            0,
            &self.store,
            &self.nodes,
            self.config.metric,
            Some(&mut search_trace),
        )?;

        let results = candidates
            .into_iter()
            .take(k)
            .map(|neighbor| self.to_search_result(neighbor))
            .collect::<ScopeResult<Vec<_>>>()?;

        debug!(k, ef_search, layers = search_trace.layers.len(), num_results = results.len(), "HNSW search completed");
        Ok((results, search_trace))
    }

    fn to_search_result(&self, neighbor: Neighbor) -> ScopeResult<SearchResult> {
        let similarity = match self.config.metric {
            DistanceMetric::Cosine => Some(1.0 - neighbor.distance),
            DistanceMetric::Euclidean => None,
        };
        Ok(SearchResult {
            id: neighbor.id,
            vector: self.store.get(neighbor.id)?.clone(),
            distance: neighbor.distance,
            similarity,
        })
    }

    /// Trace of the most recent [`HnswIndex::search`]; empty before the first one.
    pub fn search_trace(&self) -> &SearchTrace {
        &self.last_trace
    }

    pub fn search_trace_stats(&self) -> Option<TraceStats> {
        self.last_trace.stats()
    }

    /// Tombstones `id` in the graph and the store. Edges pointing at it from
    /// other nodes stay in place and are skipped during traversal.
    pub fn remove(&mut self, id: VectorId) -> ScopeResult<()> {
        if self.node(id).is_none() {
            return Err(ScopeError::NotFound(id));
        }
        self.store.remove(id)?;
        self.nodes[id] = NodeSlot::Removed;

        if self.entry_point == Some(id) {
            self.entry_point = self.select_entry_point();
            debug!(removed = id, new_entry_point = ?self.entry_point, "Entry point removed, picked a replacement");
        }
        debug!(id, remaining = self.len(), "Removed vector from HNSW index");
        Ok(())
    }

    /// Replaces the vector under `id` and relinks its node with a freshly drawn level.
    pub fn update(&mut self, id: VectorId, vector: Embedding) -> ScopeResult<()> {
        let Some(node) = self.node(id) else {
            return Err(ScopeError::NotFound(id));
        };
        let old_neighbors = node.all_neighbors();
        self.store.update(id, vector)?;

        for neighbor_id in old_neighbors {
            let slot = self.nodes.get_mut(neighbor_id);
            if let Some(neighbor) = slot.and_then(NodeSlot::as_live_mut) {
                neighbor.unlink(id);
            }
        }
        self.nodes[id] = NodeSlot::Removed;
        if self.entry_point == Some(id) {
            self.entry_point = self.select_entry_point();
        }

        let level = generate_random_level(MAX_LEVEL, &mut self.rng);
        self.nodes[id] = NodeSlot::Live(Node::new(level));
        self.link_node(id, level)?;
        debug!(id, level, entry_point = ?self.entry_point, "Updated vector in HNSW index");
        Ok(())
    }

    /// Lowest-id live node at the highest live level.
    fn select_entry_point(&self) -> Option<VectorId> {
        let mut best: Option<(VectorId, usize)> = None;
        for (id, slot) in self.nodes.iter().enumerate() {
            if let NodeSlot::Live(node) = slot {
                if !best.is_some_and(|(_, level)| node.level() <= level) {
                    best = Some((id, node.level()));
                }
            }
        }
        best.map(|(id, _)| id)
    }

    fn live_nodes(&self) -> impl Iterator<Item = (VectorId, &Node)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(id, slot)| slot.as_live().map(|node| (id, node)))
    }

    pub fn stats(&self) -> HnswStats {
        let mut live = 0usize;
        let mut total_neighbors = 0usize;
        for (_, node) in self.live_nodes() {
            live += 1;
            total_neighbors += node
                .all_neighbors()
                .into_iter()
                .filter(|&neighbor_id| self.node(neighbor_id).is_some())
                .count();
        }
        HnswStats {
            total_vectors: live,
            max_level: self.max_level(),
            average_neighbors: if live > 0 { total_neighbors as f64 / live as f64 } else { 0.0 },
            entry_point: self.entry_point,
        }
    }

    /// Number of live nodes assigned to each level, `0..=max_level`.
    pub fn level_distribution(&self) -> Vec<usize> {
        let mut counts = vec![0usize; self.max_level() + 1];
        for (_, node) in self.live_nodes() {
            if let Some(count) = counts.get_mut(node.level()) {
                *count += 1;
            }
        }
        counts
    }

    /// Live ids whose level is at least `level`, ascending.
    pub fn level_nodes(&self, level: usize) -> Vec<VectorId> {
        self.live_nodes()
            .filter(|(_, node)| node.level() >= level)
            .map(|(id, _)| id)
            .collect()
    }

    /// Undirected edges between live nodes at `level`, each reported once as `(low, high)`.
    pub fn level_connections(&self, level: usize) -> Vec<(VectorId, VectorId)> {
        let mut edges = BTreeSet::new();
        for (id, node) in self.live_nodes() {
            let Some(neighbors) = node.neighbors(level) else {
                continue;
            };
            for &neighbor_id in neighbors {
                if neighbor_id != id && reaches_layer(&self.nodes, neighbor_id, level) {
                    edges.insert((id.min(neighbor_id), id.max(neighbor_id)));
                }
            }
        }
        edges.into_iter().collect()
    }

    /// Live neighbors of `node_id` at `level` with their distance to it.
    /// Empty when the node does not reach `level`.
    pub fn current_node_neighbors(
        &self,
        node_id: VectorId,
        level: usize,
    ) -> ScopeResult<Vec<Neighbor>> {
        let node = self.node(node_id).ok_or(ScopeError::NotFound(node_id))?;
        let Some(neighbors) = node.neighbors(level) else {
            return Ok(Vec::new());
        };
        let origin = self.store.get(node_id)?;
        neighbors
            .iter()
            .copied()
            .filter(|&neighbor_id| reaches_layer(&self.nodes, neighbor_id, level))
            .map(|neighbor_id| -> ScopeResult<Neighbor> {
                let vector = self.store.get(neighbor_id)?;
                Ok(Neighbor {
                    id: neighbor_id,
                    distance: self.config.metric.distance(origin.view(), vector.view())?,
                })
            })
            .collect()
    }

    /// Drops every stored edge that traversal would skip anyway: edges to removed
    /// nodes and edges at layers the neighbor does not reach. Returns how many were dropped.
    pub fn rebuild_level_neighbors(&mut self) -> usize {
        let keep: Vec<Option<usize>> = self
            .nodes
            .iter()
            .map(|slot| slot.as_live().map(Node::level))
            .collect();

        let mut dropped = 0;
        for slot in &mut self.nodes {
            if let Some(node) = slot.as_live_mut() {
                dropped += node.retain(|layer, neighbor_id| {
                    keep.get(neighbor_id).copied().flatten().is_some_and(|level| level >= layer)
                });
            }
        }
        info!(dropped, live = self.len(), "Rebuilt per-layer neighbor lists");
        dropped
    }
}
