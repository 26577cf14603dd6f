//! Markdown ingestion into a project collection.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use daat_llm::LlmProvider;
use daat_store::{Payload, VectorPoint, VectorStore};
use futures::{StreamExt, TryStreamExt, stream};
use serde::Serialize;
use serde_json::Value;

use crate::chunker::{DEFAULT_CHUNK_SIZE, chunk_text};
use crate::collection::CollectionManager;
use crate::error::{IndexError, Result};
use crate::frontmatter::split_front_matter;
use crate::hash::{IdScheme, point_id};

pub const DEFAULT_MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;
pub const DEFAULT_EMBED_CONCURRENCY: usize = 8;

#[derive(Debug, Clone)]
pub struct IndexerConfig {
    /// Maximum words per chunk.
    pub chunk_size: usize,
    /// Base directory for relative document paths.
    pub docs_root: PathBuf,
    pub max_file_size: u64,
    pub id_scheme: IdScheme,
    /// Embedding requests in flight per document.
    pub embed_concurrency: usize,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            docs_root: PathBuf::from("."),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            id_scheme: IdScheme::default(),
            embed_concurrency: DEFAULT_EMBED_CONCURRENCY,
        }
    }
}

/// Outcome of a successful [`DocumentIndexer::index_document`] call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexReport {
    pub project_id: String,
    pub file_path: String,
    pub collection: String,
    /// Number of chunks written.
    pub chunks: usize,
}

pub struct DocumentIndexer<P: LlmProvider> {
    collections: CollectionManager,
    store: Arc<dyn VectorStore>,
    provider: Arc<P>,
    config: IndexerConfig,
}

impl<P: LlmProvider> std::fmt::Debug for DocumentIndexer<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentIndexer")
            .field("provider", &self.provider.name())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<P: LlmProvider> DocumentIndexer<P> {
    #[must_use]
    pub fn new(
        collections: CollectionManager,
        store: Arc<dyn VectorStore>,
        provider: Arc<P>,
        config: IndexerConfig,
    ) -> Self {
        Self {
            collections,
            store,
            provider,
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &IndexerConfig {
        &self.config
    }

    /// Absolute or docs-root-relative location of `file_path`.
    #[must_use]
    pub fn resolve_path(&self, file_path: &str) -> PathBuf {
        let path = Path::new(file_path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.config.docs_root.join(path)
        }
    }

    /// Index one markdown file into the project's collection.
    ///
    /// The file's front-matter becomes the `metadata` of every chunk. Chunks
    /// are embedded with at most `embed_concurrency` requests in flight and
    /// written in a single upsert once every embedding has succeeded, so an
    /// embedding failure writes nothing. Point ids derive from `file_path` as
    /// given (not the resolved path), so re-indexing a file overwrites its
    /// previous chunks. Chunks beyond the new count from an earlier, longer
    /// version of the file are left in place. Whether a failed upsert leaves
    /// some points behind depends on the store backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be initialized, the file is
    /// missing, too large or unreadable, the front-matter is malformed, any
    /// embedding fails or has the wrong dimension, or the upsert fails.
    pub async fn index_document(&self, file_path: &str, project_id: &str) -> Result<IndexReport> {
        let collection = self.collections.ensure_collection(project_id).await?;

        let path = self.resolve_path(file_path);
        let meta = match tokio::fs::metadata(&path).await {
            Ok(meta) => meta,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(IndexError::NotFound(path));
            }
            Err(e) => return Err(e.into()),
        };
        if meta.len() > self.config.max_file_size {
            return Err(IndexError::FileTooLarge(meta.len()));
        }

        let text = tokio::fs::read_to_string(&path).await?;
        let document = split_front_matter(&text)?;
        let chunks = chunk_text(&document.body, self.config.chunk_size);

        tracing::info!(
            project_id,
            file_path,
            collection = %collection,
            chunks = chunks.len(),
            "indexing document"
        );

        if chunks.is_empty() {
            return Ok(IndexReport {
                project_id: project_id.to_owned(),
                file_path: file_path.to_owned(),
                collection,
                chunks: 0,
            });
        }

        let embeds: Vec<_> = chunks.iter().map(|c| self.provider.embed(c)).collect();
        let vectors: Vec<Vec<f32>> = stream::iter(embeds)
            .buffered(self.config.embed_concurrency.max(1))
            .try_collect()
            .await?;

        let expected = self.collections.vector_size();
        if let Some(bad) = vectors.iter().find(|v| v.len() as u64 != expected) {
            return Err(IndexError::DimensionMismatch {
                expected,
                actual: bad.len(),
            });
        }

        let metadata = Value::Object(document.metadata);
        let points: Vec<VectorPoint> = chunks
            .into_iter()
            .zip(vectors)
            .enumerate()
            .map(|(index, (content, vector))| VectorPoint {
                id: point_id(self.config.id_scheme, project_id, file_path, index),
                vector,
                payload: chunk_payload(project_id, file_path, index, content, metadata.clone()),
            })
            .collect();
        let count = points.len();

        self.store
            .upsert(&collection, points)
            .await
            .map_err(|source| IndexError::Upsert {
                collection: collection.clone(),
                source,
            })?;

        tracing::info!(project_id, file_path, chunks = count, "document indexed");

        Ok(IndexReport {
            project_id: project_id.to_owned(),
            file_path: file_path.to_owned(),
            collection,
            chunks: count,
        })
    }
}

fn chunk_payload(
    project_id: &str,
    file_path: &str,
    index: usize,
    content: String,
    metadata: Value,
) -> Payload {
    HashMap::from([
        ("projectId".to_owned(), Value::from(project_id)),
        ("filePath".to_owned(), Value::from(file_path)),
        ("chunkIndex".to_owned(), Value::from(index)),
        ("content".to_owned(), Value::String(content)),
        ("metadata".to_owned(), metadata),
    ])
}
