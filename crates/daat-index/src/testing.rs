use std::future::Future;
use std::pin::Pin;

use daat_store::{
    RetrievedVectorPoint, ScoredVectorPoint, VectorPoint, VectorStore, VectorStoreError,
};

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

fn refused<T>() -> Result<T, VectorStoreError> {
    Err(VectorStoreError::Connection("connection refused".into()))
}

/// Store that fails every call.
pub struct Unreachable;

impl VectorStore for Unreachable {
    fn list_collections(&self) -> BoxFuture<'_, Result<Vec<String>, VectorStoreError>> {
        Box::pin(async { refused() })
    }

    fn create_collection(
        &self,
        _collection: &str,
        _vector_size: u64,
    ) -> BoxFuture<'_, Result<(), VectorStoreError>> {
        Box::pin(async { refused() })
    }

    fn upsert(
        &self,
        _collection: &str,
        _points: Vec<VectorPoint>,
    ) -> BoxFuture<'_, Result<(), VectorStoreError>> {
        Box::pin(async { refused() })
    }

    fn search(
        &self,
        _collection: &str,
        _vector: Vec<f32>,
        _limit: u64,
    ) -> BoxFuture<'_, Result<Vec<ScoredVectorPoint>, VectorStoreError>> {
        Box::pin(async { refused() })
    }

    fn retrieve(
        &self,
        _collection: &str,
        _ids: Vec<u64>,
    ) -> BoxFuture<'_, Result<Vec<RetrievedVectorPoint>, VectorStoreError>> {
        Box::pin(async { refused() })
    }
}

/// Store whose collections all exist but whose reads and writes fail.
pub struct BrokenCollections(pub Vec<String>);

impl VectorStore for BrokenCollections {
    fn list_collections(&self) -> BoxFuture<'_, Result<Vec<String>, VectorStoreError>> {
        let names = self.0.clone();
        Box::pin(async move { Ok(names) })
    }

    fn create_collection(
        &self,
        _collection: &str,
        _vector_size: u64,
    ) -> BoxFuture<'_, Result<(), VectorStoreError>> {
        Box::pin(async { Ok(()) })
    }

    fn upsert(
        &self,
        collection: &str,
        _points: Vec<VectorPoint>,
    ) -> BoxFuture<'_, Result<(), VectorStoreError>> {
        let msg = format!("{collection} is read-only");
        Box::pin(async move { Err(VectorStoreError::Upsert(msg)) })
    }

    fn search(
        &self,
        collection: &str,
        _vector: Vec<f32>,
        _limit: u64,
    ) -> BoxFuture<'_, Result<Vec<ScoredVectorPoint>, VectorStoreError>> {
        let msg = format!("{collection} index unavailable");
        Box::pin(async move { Err(VectorStoreError::Search(msg)) })
    }

    fn retrieve(
        &self,
        _collection: &str,
        _ids: Vec<u64>,
    ) -> BoxFuture<'_, Result<Vec<RetrievedVectorPoint>, VectorStoreError>> {
        Box::pin(async { refused() })
    }
}
