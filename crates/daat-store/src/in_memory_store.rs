use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::RwLock;

use crate::vector_store::{
    Payload, RetrievedVectorPoint, ScoredVectorPoint, VectorPoint, VectorStore, VectorStoreError,
};

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

struct StoredPoint {
    vector: Vec<f32>,
    payload: Payload,
}

struct InMemoryCollection {
    vector_size: u64,
    points: HashMap<u64, StoredPoint>,
}

/// Process-local [`VectorStore`] with cosine scoring.
///
/// Upserts are all-or-nothing: a batch with any wrongly sized vector is
/// rejected before a single point is written.
pub struct InMemoryVectorStore {
    collections: RwLock<HashMap<String, InMemoryCollection>>,
}

impl InMemoryVectorStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
        }
    }

    /// Number of points in `collection`, or `None` if it does not exist.
    #[must_use]
    pub fn point_count(&self, collection: &str) -> Option<usize> {
        self.collections
            .read()
            .ok()?
            .get(collection)
            .map(|c| c.points.len())
    }
}

impl Default for InMemoryVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InMemoryVectorStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryVectorStore")
            .finish_non_exhaustive()
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

impl VectorStore for InMemoryVectorStore {
    fn list_collections(&self) -> BoxFuture<'_, Result<Vec<String>, VectorStoreError>> {
        Box::pin(async move {
            let cols = self
                .collections
                .read()
                .map_err(|e| VectorStoreError::Connection(e.to_string()))?;
            Ok(cols.keys().cloned().collect())
        })
    }

    fn create_collection(
        &self,
        collection: &str,
        vector_size: u64,
    ) -> BoxFuture<'_, Result<(), VectorStoreError>> {
        let collection = collection.to_owned();
        Box::pin(async move {
            let mut cols = self
                .collections
                .write()
                .map_err(|e| VectorStoreError::Collection(e.to_string()))?;
            if cols.contains_key(&collection) {
                return Err(VectorStoreError::Collection(format!(
                    "collection {collection} already exists"
                )));
            }
            cols.insert(
                collection,
                InMemoryCollection {
                    vector_size,
                    points: HashMap::new(),
                },
            );
            Ok(())
        })
    }

    fn upsert(
        &self,
        collection: &str,
        points: Vec<VectorPoint>,
    ) -> BoxFuture<'_, Result<(), VectorStoreError>> {
        let collection = collection.to_owned();
        Box::pin(async move {
            let mut cols = self
                .collections
                .write()
                .map_err(|e| VectorStoreError::Upsert(e.to_string()))?;
            let col = cols.get_mut(&collection).ok_or_else(|| {
                VectorStoreError::Upsert(format!("collection {collection} not found"))
            })?;
            if let Some(bad) = points
                .iter()
                .find(|p| p.vector.len() as u64 != col.vector_size)
            {
                return Err(VectorStoreError::Upsert(format!(
                    "point {} has dimension {}, collection {collection} expects {}",
                    bad.id,
                    bad.vector.len(),
                    col.vector_size
                )));
            }
            for p in points {
                col.points.insert(
                    p.id,
                    StoredPoint {
                        vector: p.vector,
                        payload: p.payload,
                    },
                );
            }
            Ok(())
        })
    }

    fn search(
        &self,
        collection: &str,
        vector: Vec<f32>,
        limit: u64,
    ) -> BoxFuture<'_, Result<Vec<ScoredVectorPoint>, VectorStoreError>> {
        let collection = collection.to_owned();
        Box::pin(async move {
            let cols = self
                .collections
                .read()
                .map_err(|e| VectorStoreError::Search(e.to_string()))?;
            let col = cols.get(&collection).ok_or_else(|| {
                VectorStoreError::Search(format!("collection {collection} not found"))
            })?;

            let mut scored: Vec<ScoredVectorPoint> = col
                .points
                .iter()
                .map(|(id, sp)| ScoredVectorPoint {
                    id: *id,
                    score: cosine_similarity(&vector, &sp.vector),
                    payload: sp.payload.clone(),
                })
                .collect();

            scored.sort_by(|a, b| {
                b.score
                    .partial_cmp(&a.score)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then(a.id.cmp(&b.id))
            });
            scored.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
            Ok(scored)
        })
    }

    fn retrieve(
        &self,
        collection: &str,
        ids: Vec<u64>,
    ) -> BoxFuture<'_, Result<Vec<RetrievedVectorPoint>, VectorStoreError>> {
        let collection = collection.to_owned();
        Box::pin(async move {
            let cols = self
                .collections
                .read()
                .map_err(|e| VectorStoreError::Retrieve(e.to_string()))?;
            let col = cols.get(&collection).ok_or_else(|| {
                VectorStoreError::Retrieve(format!("collection {collection} not found"))
            })?;
            Ok(ids
                .into_iter()
                .filter_map(|id| {
                    col.points.get(&id).map(|sp| RetrievedVectorPoint {
                        id,
                        payload: sp.payload.clone(),
                    })
                })
                .collect())
        })
    }
}
