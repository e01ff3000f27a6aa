//! Step-by-step record of a graph search, kept for visualization.

use serde::Serialize;

use super::Neighbor;
use crate::error::ScopeResult;
use crate::vector::VectorId;

/// One iteration of the layer search loop.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceStep {
    /// 1-based iteration number within the layer.
    pub step: usize,
    pub current_node: VectorId,
    pub current_distance: f32,
    /// Candidate ids after `current_node` was popped, nearest first.
    pub candidates: Vec<VectorId>,
    /// Ids visited before this step expanded any neighbors, in visit order.
    pub visited: Vec<VectorId>,
    /// Neighbors first reached in this step, with their distance to the query.
    pub checked_neighbors: Vec<Neighbor>,
}

/// The record of one `search_layer` run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerTrace {
    pub level: usize,
    pub entry_point: VectorId,
    pub ef: usize,
    pub steps: Vec<TraceStep>,
    /// Everything visited on this layer, sorted by distance.
    pub final_results: Vec<Neighbor>,
}

/// Per-layer records of the most recent search, top layer first.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchTrace {
    pub layers: Vec<LayerTrace>,
}

/// Aggregate numbers over a [`SearchTrace`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TraceStats {
    pub total_levels: usize,
    pub final_level_steps: usize,
    pub total_visited_nodes: usize,
}

impl SearchTrace {
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// The layer-0 record, which produced the search results.
    pub fn final_layer(&self) -> Option<&LayerTrace> {
        self.layers.last()
    }

    pub fn stats(&self) -> Option<TraceStats> {
        let last = self.final_layer()?;
        Some(TraceStats {
            total_levels: self.layers.len(),
            final_level_steps: last.steps.len(),
            total_visited_nodes: last.final_results.len(),
        })
    }

    pub fn to_json(&self) -> ScopeResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}
