// In-memory vector storage with tombstoned deletion.
pub mod vector_store;

pub use vector_store::VectorStore;

#[cfg(test)]
mod vector_store_tests;
