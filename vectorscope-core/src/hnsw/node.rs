use std::collections::BTreeSet;

use crate::vector::VectorId;

/// A live graph node: its assigned level and one neighbor set per layer `0..=level`.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    level: usize,
    neighbors: Vec<BTreeSet<VectorId>>,
}

impl Node {
    pub(crate) fn new(level: usize) -> Self {
        Node {
            level,
            neighbors: vec![BTreeSet::new(); level + 1],
        }
    }

    pub fn level(&self) -> usize {
        self.level
    }

    /// Neighbor ids at `layer`, or `None` if the node does not reach that layer.
    /// Ids may include removed nodes; traversal filters them.
    pub fn neighbors(&self, layer: usize) -> Option<&BTreeSet<VectorId>> {
        self.neighbors.get(layer)
    }

    /// Distinct neighbor ids over every layer.
    pub fn all_neighbors(&self) -> BTreeSet<VectorId> {
        self.neighbors.iter().flatten().copied().collect()
    }

    /// Adds `id` at `layer`. Returns false if the node does not reach `layer`
    /// or the edge already existed.
    pub(crate) fn link(&mut self, layer: usize, id: VectorId) -> bool {
        match self.neighbors.get_mut(layer) {
            Some(set) => set.insert(id),
            None => false,
        }
    }

    /// Drops `id` from every layer.
    pub(crate) fn unlink(&mut self, id: VectorId) {
        for set in &mut self.neighbors {
            set.remove(&id);
        }
    }

    /// Keeps only the neighbors at each layer for which `keep(layer, id)` holds.
    /// Returns how many entries were dropped.
    pub(crate) fn retain(&mut self, mut keep: impl FnMut(usize, VectorId) -> bool) -> usize {
        let mut dropped = 0;
        for (layer, set) in self.neighbors.iter_mut().enumerate() {
            let before = set.len();
            set.retain(|&id| keep(layer, id));
            dropped += before - set.len();
        }
        dropped
    }
}

/// Arena slot for a node. Removed slots keep their position so ids stay stable.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeSlot {
    Live(Node),
    Removed,
}

impl NodeSlot {
    pub fn as_live(&self) -> Option<&Node> {
        match self {
            NodeSlot::Live(node) => Some(node),
            NodeSlot::Removed => None,
        }
    }

    pub(crate) fn as_live_mut(&mut self) -> Option<&mut Node> {
        match self {
            NodeSlot::Live(node) => Some(node),
            NodeSlot::Removed => None,
        }
    }
}

/// Looks up a live node in the arena.
pub(crate) fn live_node(nodes: &[NodeSlot], id: VectorId) -> Option<&Node> {
    nodes.get(id).and_then(NodeSlot::as_live)
}

/// True if `id` is live and takes part in `layer`.
pub(crate) fn reaches_layer(nodes: &[NodeSlot], id: VectorId, layer: usize) -> bool {
    live_node(nodes, id).is_some_and(|node| node.level() >= layer)
}
