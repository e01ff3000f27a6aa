use tracing::trace;

use crate::error::{ScopeError, ScopeResult};
use crate::vector::{validate_embedding, Embedding, VectorId};

/// One storage slot. Removed slots are kept so ids stay stable.
#[derive(Debug, Clone, PartialEq)]
enum Slot {
    Live(Embedding),
    Removed,
}

/// Fixed-dimension vector container keyed by insertion-order ids.
///
/// Removal tombstones the slot instead of compacting, so an id handed out
/// once always refers to the same vector (or to nothing).
#[derive(Debug, Clone)]
pub struct VectorStore {
    dimension: usize,
    slots: Vec<Slot>,
    live_count: usize,
}

impl VectorStore {
    /// Creates an empty store. `dimension` must be greater than 0.
    pub fn new(dimension: usize) -> ScopeResult<Self> {
        if dimension == 0 {
            return Err(ScopeError::InvalidParameter(
                "dimension must be greater than 0".to_string(),
            ));
        }
        Ok(Self {
            dimension,
            slots: Vec::new(),
            live_count: 0,
        })
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of live vectors.
    pub fn size(&self) -> usize {
        self.live_count
    }

    pub fn is_empty(&self) -> bool {
        self.live_count == 0
    }

    /// Number of slots ever allocated, live or removed. The next id handed out.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn is_live(&self, id: VectorId) -> bool {
        matches!(self.slots.get(id), Some(Slot::Live(_)))
    }

    /// Appends a vector and returns its id.
    pub fn add(&mut self, vector: Embedding) -> ScopeResult<VectorId> {
        validate_embedding(self.dimension, &vector)?;
        let id = self.slots.len();
        self.slots.push(Slot::Live(vector));
        self.live_count += 1;
        trace!(id, live = self.live_count, "Stored vector");
        Ok(id)
    }

    pub fn get(&self, id: VectorId) -> ScopeResult<&Embedding> {
        match self.slots.get(id) {
            Some(Slot::Live(vector)) => Ok(vector),
            _ => Err(ScopeError::NotFound(id)),
        }
    }

    /// Replaces the vector stored under a live id.
    pub fn update(&mut self, id: VectorId, vector: Embedding) -> ScopeResult<()> {
        validate_embedding(self.dimension, &vector)?;
        match self.slots.get_mut(id) {
            Some(slot) if matches!(slot, Slot::Live(_)) => {
                *slot = Slot::Live(vector);
                trace!(id, "Updated vector");
                Ok(())
            }
            _ => Err(ScopeError::NotFound(id)),
        }
    }

    /// Tombstones a live id. The slot is never reused.
    pub fn remove(&mut self, id: VectorId) -> ScopeResult<()> {
        match self.slots.get_mut(id) {
            Some(slot) if matches!(slot, Slot::Live(_)) => {
                *slot = Slot::Removed;
                self.live_count -= 1;
                trace!(id, live = self.live_count, "Tombstoned vector");
                Ok(())
            }
            _ => Err(ScopeError::NotFound(id)),
        }
    }

    /// Live vectors in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (VectorId, &Embedding)> + '_ {
        self.slots.iter().enumerate().filter_map(|(id, slot)| match slot {
            Slot::Live(vector) => Some((id, vector)),
            Slot::Removed => None,
        })
    }

    /// Owned snapshot of every live vector, ordered by id.
    pub fn all_vectors(&self) -> Vec<(VectorId, Embedding)> {
        self.iter().map(|(id, vector)| (id, vector.clone())).collect()
    }
}
