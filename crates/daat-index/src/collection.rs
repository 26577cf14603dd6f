//! Per-project collection lifecycle.

use std::sync::Arc;

use daat_store::VectorStore;

use crate::error::{IndexError, Result};

pub const COLLECTION_PREFIX: &str = "project_";

/// Collection holding the chunks of `project_id`.
#[must_use]
pub fn collection_name(project_id: &str) -> String {
    format!("{COLLECTION_PREFIX}{project_id}")
}

/// Creates project collections on first use.
#[derive(Clone)]
pub struct CollectionManager {
    store: Arc<dyn VectorStore>,
    vector_size: u64,
}

impl std::fmt::Debug for CollectionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectionManager")
            .field("vector_size", &self.vector_size)
            .finish_non_exhaustive()
    }
}

impl CollectionManager {
    #[must_use]
    pub fn new(store: Arc<dyn VectorStore>, vector_size: u64) -> Self {
        Self { store, vector_size }
    }

    #[must_use]
    pub fn vector_size(&self) -> u64 {
        self.vector_size
    }

    /// Make sure the project's collection exists, creating it with cosine
    /// distance and the configured dimension when absent.
    ///
    /// A create that loses a race against another writer is accepted once the
    /// collection shows up in a fresh listing.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::CollectionInit`] if listing or creation fails.
    pub async fn ensure_collection(&self, project_id: &str) -> Result<String> {
        let name = collection_name(project_id);
        if self.contains(&name).await? {
            return Ok(name);
        }

        match self.store.create_collection(&name, self.vector_size).await {
            Ok(()) => {
                tracing::info!(collection = %name, vector_size = self.vector_size, "created collection");
                Ok(name)
            }
            Err(source) => {
                if self.contains(&name).await? {
                    tracing::debug!(collection = %name, "collection created concurrently");
                    Ok(name)
                } else {
                    Err(IndexError::CollectionInit {
                        collection: name,
                        source,
                    })
                }
            }
        }
    }

    /// Whether the project's collection exists.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::CollectionInit`] if the collections cannot be listed.
    pub async fn exists(&self, project_id: &str) -> Result<bool> {
        self.contains(&collection_name(project_id)).await
    }

    async fn contains(&self, name: &str) -> Result<bool> {
        let names = self
            .store
            .list_collections()
            .await
            .map_err(|source| IndexError::CollectionInit {
                collection: name.to_owned(),
                source,
            })?;
        Ok(names.iter().any(|n| n == name))
    }
}

#[cfg(test)]
mod tests {
    use daat_store::InMemoryVectorStore;

    use super::*;
    use crate::testing::Unreachable;

    #[test]
    fn name_has_project_prefix() {
        assert_eq!(collection_name("42"), "project_42");
    }

    #[tokio::test]
    async fn ensure_creates_once() {
        let store = Arc::new(InMemoryVectorStore::new());
        let manager = CollectionManager::new(store.clone(), 4);

        assert!(!manager.exists("p").await.unwrap());
        assert_eq!(manager.ensure_collection("p").await.unwrap(), "project_p");
        assert_eq!(manager.ensure_collection("p").await.unwrap(), "project_p");
        assert!(manager.exists("p").await.unwrap());
        assert_eq!(store.list_collections().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn concurrent_ensure_both_succeed() {
        let store = Arc::new(InMemoryVectorStore::new());
        let manager = CollectionManager::new(store.clone(), 4);

        let (a, b) = tokio::join!(manager.ensure_collection("p"), manager.ensure_collection("p"));
        assert_eq!(a.unwrap(), "project_p");
        assert_eq!(b.unwrap(), "project_p");
        assert_eq!(store.point_count("project_p"), Some(0));
    }

    #[tokio::test]
    async fn listing_failure_is_collection_init() {
        let manager = CollectionManager::new(Arc::new(Unreachable), 4);
        let err = manager.ensure_collection("p").await.unwrap_err();
        assert!(matches!(err, IndexError::CollectionInit { ref collection, .. } if collection == "project_p"));
    }
}
