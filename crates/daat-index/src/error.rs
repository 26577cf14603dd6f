//! Error types for daat-index.

use std::path::PathBuf;

use daat_store::VectorStoreError;

/// Errors that can occur while indexing or searching project documents.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// The resolved document path does not exist.
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("file too large: {0} bytes")]
    FileTooLarge(u64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed or unclosed front-matter block.
    #[error("front-matter parse failed: {0}")]
    FrontMatter(String),

    /// Listing or creating the project collection failed.
    #[error("failed to initialize collection {collection}: {source}")]
    CollectionInit {
        collection: String,
        source: VectorStoreError,
    },

    /// Embedding provider error while indexing.
    #[error("embedding failed: {0}")]
    Embedding(#[from] daat_llm::LlmError),

    /// Embedding length does not match the collection dimension.
    #[error("embedding has dimension {actual}, collection expects {expected}")]
    DimensionMismatch { expected: u64, actual: usize },

    /// Query embedding or similarity search failed.
    #[error("failed to search in project {project_id}: {reason}")]
    Search { project_id: String, reason: String },

    #[error("upsert into {collection} failed: {source}")]
    Upsert {
        collection: String,
        source: VectorStoreError,
    },
}

/// Result type alias using `IndexError`.
pub type Result<T> = std::result::Result<T, IndexError>;
