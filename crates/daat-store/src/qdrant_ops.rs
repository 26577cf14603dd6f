//! Qdrant backend for [`VectorStore`].

use std::collections::HashMap;

use qdrant_client::Qdrant;
use qdrant_client::qdrant::point_id::PointIdOptions;
use qdrant_client::qdrant::{
    CreateCollectionBuilder, Distance, GetPointsBuilder, PointId, PointStruct, ScoredPoint,
    SearchPointsBuilder, UpsertPointsBuilder, VectorParamsBuilder, value::Kind,
};

use crate::vector_store::{
    Payload, RetrievedVectorPoint, ScoredVectorPoint, VectorPoint, VectorStore, VectorStoreError,
};

type QdrantResult<T> = Result<T, Box<qdrant_client::QdrantError>>;

/// Thin wrapper over [`Qdrant`] client encapsulating common collection operations.
#[derive(Clone)]
pub struct QdrantOps {
    client: Qdrant,
}

impl std::fmt::Debug for QdrantOps {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QdrantOps").finish_non_exhaustive()
    }
}

impl QdrantOps {
    /// Create a new `QdrantOps` connected to the given URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the Qdrant client cannot be created.
    pub fn new(url: &str, api_key: Option<String>) -> QdrantResult<Self> {
        let client = Qdrant::from_url(url)
            .api_key(api_key)
            .build()
            .map_err(Box::new)?;
        Ok(Self { client })
    }

    /// Names of all collections on the server.
    ///
    /// # Errors
    ///
    /// Returns an error if Qdrant cannot be reached.
    pub async fn list_collections(&self) -> QdrantResult<Vec<String>> {
        let response = self.client.list_collections().await.map_err(Box::new)?;
        Ok(response.collections.into_iter().map(|c| c.name).collect())
    }

    /// Create a collection with cosine distance vectors.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection exists already or creation fails.
    pub async fn create_collection(&self, collection: &str, vector_size: u64) -> QdrantResult<()> {
        self.client
            .create_collection(
                CreateCollectionBuilder::new(collection)
                    .vectors_config(VectorParamsBuilder::new(vector_size, Distance::Cosine)),
            )
            .await
            .map_err(Box::new)?;
        Ok(())
    }

    /// Upsert points into a collection and wait for the write to be applied.
    ///
    /// # Errors
    ///
    /// Returns an error if the upsert fails.
    pub async fn upsert(&self, collection: &str, points: Vec<PointStruct>) -> QdrantResult<()> {
        self.client
            .upsert_points(UpsertPointsBuilder::new(collection, points).wait(true))
            .await
            .map_err(Box::new)?;
        Ok(())
    }

    /// Search for similar vectors, returning scored points with payloads.
    ///
    /// # Errors
    ///
    /// Returns an error if the search fails.
    pub async fn search(
        &self,
        collection: &str,
        vector: Vec<f32>,
        limit: u64,
    ) -> QdrantResult<Vec<ScoredPoint>> {
        let builder = SearchPointsBuilder::new(collection, vector, limit).with_payload(true);
        let results = self.client.search_points(builder).await.map_err(Box::new)?;
        Ok(results.result)
    }

    /// Fetch points by id with payloads and without vectors.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    pub async fn retrieve(
        &self,
        collection: &str,
        ids: Vec<PointId>,
    ) -> QdrantResult<Vec<qdrant_client::qdrant::RetrievedPoint>> {
        let builder = GetPointsBuilder::new(collection, ids)
            .with_payload(true)
            .with_vectors(false);
        let response = self.client.get_points(builder).await.map_err(Box::new)?;
        Ok(response.result)
    }

    /// Convert a JSON value to a Qdrant payload map.
    ///
    /// # Errors
    ///
    /// Returns a JSON error if deserialization fails.
    pub fn json_to_payload(
        value: serde_json::Value,
    ) -> Result<HashMap<String, qdrant_client::qdrant::Value>, serde_json::Error> {
        serde_json::from_value(value)
    }
}

impl VectorStore for QdrantOps {
    fn list_collections(
        &self,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Vec<String>, VectorStoreError>> + Send + '_>,
    > {
        Box::pin(async move {
            self.list_collections()
                .await
                .map_err(|e| VectorStoreError::Connection(e.to_string()))
        })
    }

    fn create_collection(
        &self,
        collection: &str,
        vector_size: u64,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<(), VectorStoreError>> + Send + '_>,
    > {
        let collection = collection.to_owned();
        Box::pin(async move {
            self.create_collection(&collection, vector_size)
                .await
                .map_err(|e| VectorStoreError::Collection(e.to_string()))
        })
    }

    fn upsert(
        &self,
        collection: &str,
        points: Vec<VectorPoint>,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<(), VectorStoreError>> + Send + '_>,
    > {
        let collection = collection.to_owned();
        Box::pin(async move {
            let qdrant_points = points
                .into_iter()
                .map(|p| {
                    let payload = Self::json_to_payload(serde_json::Value::Object(
                        p.payload.into_iter().collect(),
                    ))
                    .map_err(|e| VectorStoreError::Serialization(e.to_string()))?;
                    Ok(PointStruct::new(p.id, p.vector, payload))
                })
                .collect::<Result<Vec<_>, VectorStoreError>>()?;
            self.upsert(&collection, qdrant_points)
                .await
                .map_err(|e| VectorStoreError::Upsert(e.to_string()))
        })
    }

    fn search(
        &self,
        collection: &str,
        vector: Vec<f32>,
        limit: u64,
    ) -> std::pin::Pin<
        Box<
            dyn std::future::Future<Output = Result<Vec<ScoredVectorPoint>, VectorStoreError>>
                + Send
                + '_,
        >,
    > {
        let collection = collection.to_owned();
        Box::pin(async move {
            let results = self
                .search(&collection, vector, limit)
                .await
                .map_err(|e| VectorStoreError::Search(e.to_string()))?;
            Ok(results
                .into_iter()
                .filter_map(scored_point_to_vector)
                .collect())
        })
    }

    fn retrieve(
        &self,
        collection: &str,
        ids: Vec<u64>,
    ) -> std::pin::Pin<
        Box<
            dyn std::future::Future<Output = Result<Vec<RetrievedVectorPoint>, VectorStoreError>>
                + Send
                + '_,
        >,
    > {
        let collection = collection.to_owned();
        Box::pin(async move {
            let point_ids: Vec<PointId> = ids.into_iter().map(PointId::from).collect();
            let points = self
                .retrieve(&collection, point_ids)
                .await
                .map_err(|e| VectorStoreError::Retrieve(e.to_string()))?;
            Ok(points
                .into_iter()
                .filter_map(|p| {
                    Some(RetrievedVectorPoint {
                        id: numeric_id(p.id)?,
                        payload: payload_to_json(p.payload),
                    })
                })
                .collect())
        })
    }
}

fn numeric_id(id: Option<PointId>) -> Option<u64> {
    match id.and_then(|pid| pid.point_id_options) {
        Some(PointIdOptions::Num(n)) => Some(n),
        Some(PointIdOptions::Uuid(u)) => {
            tracing::debug!(uuid = %u, "skipping point with non-numeric id");
            None
        }
        None => None,
    }
}

fn scored_point_to_vector(point: ScoredPoint) -> Option<ScoredVectorPoint> {
    Some(ScoredVectorPoint {
        id: numeric_id(point.id)?,
        score: point.score,
        payload: payload_to_json(point.payload),
    })
}

fn payload_to_json(payload: HashMap<String, qdrant_client::qdrant::Value>) -> Payload {
    payload
        .into_iter()
        .map(|(k, v)| (k, value_to_json(v)))
        .collect()
}

fn value_to_json(value: qdrant_client::qdrant::Value) -> serde_json::Value {
    match value.kind {
        None | Some(Kind::NullValue(_)) => serde_json::Value::Null,
        Some(Kind::BoolValue(b)) => serde_json::Value::Bool(b),
        Some(Kind::IntegerValue(i)) => serde_json::Value::Number(i.into()),
        Some(Kind::DoubleValue(d)) => serde_json::Number::from_f64(d)
            .map_or(serde_json::Value::Null, serde_json::Value::Number),
        Some(Kind::StringValue(s)) => serde_json::Value::String(s),
        Some(Kind::ListValue(list)) => {
            serde_json::Value::Array(list.values.into_iter().map(value_to_json).collect())
        }
        Some(Kind::StructValue(st)) => serde_json::Value::Object(
            st.fields
                .into_iter()
                .map(|(k, v)| (k, value_to_json(v)))
                .collect(),
        ),
    }
}
