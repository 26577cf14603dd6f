//! Vector store abstraction over per-project collections.
//!
//! [`QdrantOps`] talks to a Qdrant server over gRPC; [`InMemoryVectorStore`]
//! implements the same [`VectorStore`] contract in process for tests and
//! local experiments.

pub mod in_memory_store;
pub mod qdrant_ops;
pub mod vector_store;

pub use in_memory_store::InMemoryVectorStore;
pub use qdrant_ops::QdrantOps;
pub use vector_store::{
    Payload, RetrievedVectorPoint, ScoredVectorPoint, VectorPoint, VectorStore, VectorStoreError,
};
