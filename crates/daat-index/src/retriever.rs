//! Similarity search over a project's chunks.

use std::sync::Arc;

use daat_llm::LlmProvider;
use daat_store::{ScoredVectorPoint, VectorStore};
use serde::Serialize;
use serde_json::Value;

use crate::collection::CollectionManager;
use crate::error::{IndexError, Result};
use crate::frontmatter::Metadata;

pub const DEFAULT_SEARCH_LIMIT: u64 = 5;

/// A chunk matched by a query, best matches first.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub content: String,
    pub file_path: String,
    pub chunk_index: u64,
    pub metadata: Metadata,
    pub score: f32,
}

impl SearchResult {
    /// Build from a stored point; `None` when `content` or `filePath` is missing.
    #[must_use]
    pub fn from_point(point: ScoredVectorPoint) -> Option<Self> {
        let mut payload = point.payload;
        let Some(Value::String(content)) = payload.remove("content") else {
            return None;
        };
        let Some(Value::String(file_path)) = payload.remove("filePath") else {
            return None;
        };
        let chunk_index = payload
            .get("chunkIndex")
            .and_then(Value::as_u64)
            .unwrap_or_default();
        let metadata = match payload.remove("metadata") {
            Some(Value::Object(map)) => map,
            _ => Metadata::new(),
        };
        Some(Self {
            content,
            file_path,
            chunk_index,
            metadata,
            score: point.score,
        })
    }
}

pub struct DocumentRetriever<P: LlmProvider> {
    collections: CollectionManager,
    store: Arc<dyn VectorStore>,
    provider: Arc<P>,
}

impl<P: LlmProvider> std::fmt::Debug for DocumentRetriever<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentRetriever")
            .field("provider", &self.provider.name())
            .finish_non_exhaustive()
    }
}

impl<P: LlmProvider> DocumentRetriever<P> {
    #[must_use]
    pub fn new(collections: CollectionManager, store: Arc<dyn VectorStore>, provider: Arc<P>) -> Self {
        Self {
            collections,
            store,
            provider,
        }
    }

    /// Up to `limit` chunks of `project_id` closest to `query`.
    ///
    /// A project that has never been indexed has no collection and yields an
    /// empty list without calling the embedding provider.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::CollectionInit`] if collections cannot be listed
    /// and [`IndexError::Search`] if embedding the query or the search fails.
    pub async fn search(&self, project_id: &str, query: &str, limit: u64) -> Result<Vec<SearchResult>> {
        if !self.collections.exists(project_id).await? {
            tracing::debug!(project_id, "no collection for project, returning no results");
            return Ok(Vec::new());
        }

        let search_error = |reason: String| IndexError::Search {
            project_id: project_id.to_owned(),
            reason,
        };

        let vector = self
            .provider
            .embed(query)
            .await
            .map_err(|e| search_error(e.to_string()))?;
        let collection = crate::collection::collection_name(project_id);
        let points = self
            .store
            .search(&collection, vector, limit)
            .await
            .map_err(|e| search_error(e.to_string()))?;

        let total = points.len();
        let results: Vec<SearchResult> = points
            .into_iter()
            .filter_map(SearchResult::from_point)
            .collect();
        if results.len() < total {
            tracing::warn!(
                project_id,
                skipped = total - results.len(),
                "skipped points without content or filePath"
            );
        }
        tracing::debug!(project_id, limit, hits = results.len(), "search complete");
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use daat_llm::mock::MockProvider;
    use daat_store::InMemoryVectorStore;

    use super::*;
    use crate::testing::Unreachable;

    fn scored(payload: Value, score: f32) -> ScoredVectorPoint {
        let Value::Object(map) = payload else {
            panic!("payload must be an object");
        };
        ScoredVectorPoint {
            id: 1,
            score,
            payload: map.into_iter().collect(),
        }
    }

    fn retriever(store: Arc<dyn VectorStore>, provider: MockProvider) -> DocumentRetriever<MockProvider> {
        DocumentRetriever::new(
            CollectionManager::new(Arc::clone(&store), 4),
            store,
            Arc::new(provider),
        )
    }

    #[test]
    fn from_point_maps_payload() {
        let point = scored(
            serde_json::json!({
                "projectId": "p",
                "filePath": "docs/a.md",
                "chunkIndex": 2,
                "content": "alpha",
                "metadata": {"title": "A"},
            }),
            0.75,
        );
        let result = SearchResult::from_point(point).unwrap();
        assert_eq!(result.content, "alpha");
        assert_eq!(result.file_path, "docs/a.md");
        assert_eq!(result.chunk_index, 2);
        assert_eq!(result.metadata["title"], "A");
        assert!((result.score - 0.75).abs() < f32::EPSILON);
    }

    #[test]
    fn from_point_skips_missing_content() {
        let point = scored(serde_json::json!({"filePath": "a.md"}), 1.0);
        assert!(SearchResult::from_point(point).is_none());
    }

    #[test]
    fn from_point_defaults_missing_metadata() {
        let point = scored(serde_json::json!({"filePath": "a.md", "content": "x"}), 1.0);
        let result = SearchResult::from_point(point).unwrap();
        assert!(result.metadata.is_empty());
        assert_eq!(result.chunk_index, 0);
    }

    #[test]
    fn serializes_camel_case() {
        let point = scored(serde_json::json!({"filePath": "a.md", "content": "x", "chunkIndex": 1}), 0.5);
        let json = serde_json::to_value(SearchResult::from_point(point).unwrap()).unwrap();
        assert_eq!(json["filePath"], "a.md");
        assert_eq!(json["chunkIndex"], 1);
    }

    #[tokio::test]
    async fn missing_collection_returns_empty_without_embedding() {
        let provider = MockProvider::default();
        let r = retriever(Arc::new(InMemoryVectorStore::new()), provider.clone());
        assert!(r.search("never-indexed", "anything", 5).await.unwrap().is_empty());
        assert_eq!(provider.embed_calls(), 0);
    }

    #[tokio::test]
    async fn embed_failure_is_search_error() {
        let store = Arc::new(InMemoryVectorStore::new());
        store.create_collection("project_p", 4).await.unwrap();
        let r = retriever(store, MockProvider::failing());

        let err = r.search("p", "q", 5).await.unwrap_err();
        assert!(matches!(err, IndexError::Search { ref project_id, .. } if project_id == "p"));
        assert!(err.to_string().contains("failed to search in project p"));
    }

    #[tokio::test]
    async fn store_failure_is_collection_init() {
        let r = retriever(Arc::new(Unreachable), MockProvider::default());
        let err = r.search("p", "q", 5).await.unwrap_err();
        assert!(matches!(err, IndexError::CollectionInit { .. }));
    }

    #[tokio::test]
    async fn hits_map_to_results() {
        let store = Arc::new(InMemoryVectorStore::new());
        store.create_collection("project_p", 4).await.unwrap();
        store
            .upsert(
                "project_p",
                vec![daat_store::VectorPoint {
                    id: 1,
                    vector: vec![1.0, 0.0, 0.0, 0.0],
                    payload: [
                        ("content".to_owned(), Value::from("x")),
                        ("filePath".to_owned(), Value::from("a.md")),
                    ]
                    .into_iter()
                    .collect(),
                }],
            )
            .await
            .unwrap();
        let r = retriever(store, MockProvider::with_embedding(vec![1.0, 0.0, 0.0, 0.0]));
        let hits = r.search("p", "q", 5).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].file_path, "a.md");
        assert!((hits[0].score - 1.0).abs() < 1e-6);
    }
}
