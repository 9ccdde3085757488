//! Per-user similarity index abstractions.
//!
//! - `RetrievalStore`: RPITIT trait for vector index backends
//! - `BoxRetrievalStore`: object-safe wrapper so the index can be optional at runtime
//! - `Embedder`: text-to-vector conversion used by index backends

pub mod box_store;
pub mod embedder;
pub mod store;
