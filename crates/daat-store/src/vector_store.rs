use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

#[derive(Debug, thiserror::Error)]
pub enum VectorStoreError {
    #[error("connection error: {0}")]
    Connection(String),
    #[error("collection error: {0}")]
    Collection(String),
    #[error("upsert error: {0}")]
    Upsert(String),
    #[error("search error: {0}")]
    Search(String),
    #[error("retrieve error: {0}")]
    Retrieve(String),
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Point payload as JSON values keyed by field name.
pub type Payload = HashMap<String, serde_json::Value>;

#[derive(Debug, Clone)]
pub struct VectorPoint {
    pub id: u64,
    pub vector: Vec<f32>,
    pub payload: Payload,
}

#[derive(Debug, Clone)]
pub struct ScoredVectorPoint {
    pub id: u64,
    pub score: f32,
    pub payload: Payload,
}

#[derive(Debug, Clone)]
pub struct RetrievedVectorPoint {
    pub id: u64,
    pub payload: Payload,
}

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait VectorStore: Send + Sync {
    fn list_collections(&self) -> BoxFuture<'_, Result<Vec<String>, VectorStoreError>>;

    /// Create a cosine-distance collection. Fails if it already exists.
    fn create_collection(
        &self,
        collection: &str,
        vector_size: u64,
    ) -> BoxFuture<'_, Result<(), VectorStoreError>>;

    /// Insert or overwrite points by id, returning once the write is acknowledged.
    fn upsert(
        &self,
        collection: &str,
        points: Vec<VectorPoint>,
    ) -> BoxFuture<'_, Result<(), VectorStoreError>>;

    /// Nearest points by cosine similarity, best match first, with payloads.
    fn search(
        &self,
        collection: &str,
        vector: Vec<f32>,
        limit: u64,
    ) -> BoxFuture<'_, Result<Vec<ScoredVectorPoint>, VectorStoreError>>;

    fn retrieve(
        &self,
        collection: &str,
        ids: Vec<u64>,
    ) -> BoxFuture<'_, Result<Vec<RetrievedVectorPoint>, VectorStoreError>>;
}
