pub mod brute_force;
pub mod config;
pub mod db;
pub mod distance;
pub mod error;
pub mod hnsw;
pub mod index;
pub mod shared;
pub mod storage;
pub mod utils; // Public so benchmarks can build seeded RNGs
pub mod vector;


// Re-export key types for easier use
pub use brute_force::{BruteForceIndex, BruteForceStats};
pub use config::{ConfigUpdate, HnswConfig};
pub use db::{EngineStats, SearchMethod, VectorDb};
pub use distance::DistanceMetric;
pub use error::{ScopeError, ScopeResult};
pub use hnsw::{Neighbor, SearchTrace, TraceStats};
pub use index::{HnswIndex, HnswStats};
pub use shared::SharedHnswIndex;
pub use storage::VectorStore;
pub use vector::{Embedding, SearchResult, VectorId};
