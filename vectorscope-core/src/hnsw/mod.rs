pub mod node;
pub mod trace;

pub use node::{Node, NodeSlot};
pub use trace::{LayerTrace, SearchTrace, TraceStats, TraceStep};

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashSet};

use ndarray::ArrayView1;
use serde::Serialize;
use tracing::trace;

use crate::distance::DistanceMetric;
use crate::error::ScopeResult;
use crate::storage::VectorStore;
use crate::vector::VectorId;
use node::{live_node, reaches_layer};

// --- Data Structures for Search ---

/// A node id paired with its distance to the current query.
/// Ordered by distance, then by id, so equal distances resolve deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Neighbor {
    pub id: VectorId,
    pub distance: f32,
}

impl Eq for Neighbor {}

impl Ord for Neighbor {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then_with(|| self.id.cmp(&other.id))
    }
}

impl PartialOrd for Neighbor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Neighbors of `node_id` that traversal may follow at `layer`: live, and
/// reaching `layer` themselves. Empty if `node_id` does not reach `layer`.
fn followable_neighbors<'a>(
    nodes: &'a [NodeSlot],
    node_id: VectorId,
    layer: usize,
) -> impl Iterator<Item = VectorId> + 'a {
    live_node(nodes, node_id)
        .and_then(|node| node.neighbors(layer))
        .into_iter()
        .flatten()
        .copied()
        .filter(move |&id| reaches_layer(nodes, id, layer))
}

// --- Search Algorithms ---

/// Best-first exploration of one layer starting at `entry_point_id`.
///
/// The candidate pool holds at most `ef` entries; when it overflows the
/// farthest candidate is dropped. The returned list is every node visited,
/// not only the surviving pool, sorted nearest first.
///
/// When `search_trace` is given, a [`LayerTrace`] for this run is appended to it.
#[allow(clippy::too_many_arguments)]
pub(crate) fn search_layer(
    query_vector: ArrayView1<f32>,
    entry_point_id: VectorId,
    ef: usize,
    layer: usize,
    vector_storage: &VectorStore,
    nodes: &[NodeSlot],
    distance_metric: DistanceMetric,
    search_trace: Option<&mut SearchTrace>,
) -> ScopeResult<Vec<Neighbor>> {
    let recording = search_trace.is_some();

    let entry_vector = vector_storage.get(entry_point_id)?;
    let entry = Neighbor {
        id: entry_point_id,
        distance: distance_metric.distance(query_vector, entry_vector.view())?,
    };

    let mut visited_ids: HashSet<VectorId> = HashSet::from([entry_point_id]);
    let mut visited_order: Vec<Neighbor> = vec![entry];
    let mut candidates: BTreeSet<Neighbor> = BTreeSet::from([entry]);
    let mut steps = Vec::new();

    while let Some(current) = candidates.pop_first() {
        let snapshot = recording.then(|| {
            (
                candidates.iter().map(|n| n.id).collect::<Vec<_>>(),
                visited_order.iter().map(|n| n.id).collect::<Vec<_>>(),
            )
        });

        let mut checked_neighbors = Vec::new();
        for neighbor_id in followable_neighbors(nodes, current.id, layer) {
            if !visited_ids.insert(neighbor_id) {
                continue;
            }
            let neighbor_vector = vector_storage.get(neighbor_id)?;
            let neighbor = Neighbor {
                id: neighbor_id,
                distance: distance_metric.distance(query_vector, neighbor_vector.view())?,
            };
            visited_order.push(neighbor);
            candidates.insert(neighbor);
            if recording {
                checked_neighbors.push(neighbor);
            }
            if candidates.len() > ef {
                candidates.pop_last();
            }
        }

        if let Some((candidate_ids, visited_snapshot)) = snapshot {
            steps.push(TraceStep {
                step: steps.len() + 1,
                current_node: current.id,
                current_distance: current.distance,
                candidates: candidate_ids,
                visited: visited_snapshot,
                checked_neighbors,
            });
        }
    }

    let mut results = visited_order;
    results.sort();
    trace!(layer, entry_point_id, ef, visited = results.len(), "Layer search finished");

    if let Some(search_trace) = search_trace {
        search_trace.layers.push(LayerTrace {
            level: layer,
            entry_point: entry_point_id,
            ef,
            steps,
            final_results: results.clone(),
        });
    }
    Ok(results)
}

/// Picks the `m` closest candidates. `candidates` must already be sorted nearest first.
pub(crate) fn select_neighbors(candidates: &[Neighbor], m: usize) -> Vec<VectorId> {
    candidates.iter().take(m).map(|n| n.id).collect()
}
