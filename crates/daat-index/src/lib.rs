//! Per-project document indexing and retrieval.
//!
//! Markdown files are split into front-matter and body, the body is cut into
//! fixed-size word chunks, each chunk is embedded and upserted into the
//! project's vector collection under a deterministic id. At chat time the
//! retriever embeds the user text, searches the same collection and the
//! context assembler turns the hits into a block for the system prompt.

pub mod chunker;
pub mod collection;
pub mod context;
pub mod error;
pub mod frontmatter;
pub mod hash;
pub mod indexer;
pub mod retriever;
#[cfg(test)]
mod testing;

use std::sync::Arc;

use daat_llm::LlmProvider;
use daat_store::VectorStore;

pub use context::ContextAssembler;
pub use error::{IndexError, Result};
pub use indexer::{DocumentIndexer, IndexReport, IndexerConfig};
pub use retriever::{DocumentRetriever, SearchResult};

/// Indexer, retriever and context assembler sharing one store and provider.
pub struct ProjectIndex<P: LlmProvider> {
    pub indexer: DocumentIndexer<P>,
    pub retriever: Arc<DocumentRetriever<P>>,
    pub assembler: ContextAssembler<P>,
}

impl<P: LlmProvider> ProjectIndex<P> {
    #[must_use]
    pub fn new(
        store: Arc<dyn VectorStore>,
        provider: Arc<P>,
        vector_size: u64,
        config: IndexerConfig,
    ) -> Self {
        let collections = collection::CollectionManager::new(Arc::clone(&store), vector_size);
        let retriever = Arc::new(DocumentRetriever::new(
            collections.clone(),
            Arc::clone(&store),
            Arc::clone(&provider),
        ));
        Self {
            indexer: DocumentIndexer::new(collections, store, provider, config),
            assembler: ContextAssembler::new(Arc::clone(&retriever)),
            retriever,
        }
    }
}
