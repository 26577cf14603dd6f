//! Retrieval context for chat prompts.

use std::fmt::Write as _;
use std::sync::Arc;

use daat_llm::LlmProvider;

use crate::retriever::{DocumentRetriever, SearchResult};

pub const DEFAULT_CONTEXT_CHUNKS: u64 = 3;

const CONTEXT_HEADER: &str = "\n\nRelevant documentation:\n";
const SYSTEM_PREAMBLE: &str = "You are a helpful assistant. ";

/// Render search hits as a bulleted documentation block.
///
/// Returns an empty string when there are no hits.
#[must_use]
pub fn format_context(results: &[SearchResult]) -> String {
    if results.is_empty() {
        return String::new();
    }
    let mut out = String::from(CONTEXT_HEADER);
    for (i, result) in results.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = write!(out, "- {} (from {})", result.content, result.file_path);
    }
    out
}

/// System prompt for a chat turn, with `context` appended when non-empty.
#[must_use]
pub fn system_prompt(context: &str) -> String {
    if context.is_empty() {
        SYSTEM_PREAMBLE.to_owned()
    } else {
        format!("{SYSTEM_PREAMBLE}Use this documentation context when relevant: {context}")
    }
}

pub struct ContextAssembler<P: LlmProvider> {
    retriever: Arc<DocumentRetriever<P>>,
}

impl<P: LlmProvider> ContextAssembler<P> {
    #[must_use]
    pub fn new(retriever: Arc<DocumentRetriever<P>>) -> Self {
        Self { retriever }
    }

    /// Documentation block for the top `k` chunks matching `user_text`.
    ///
    /// Never fails: retrieval errors are logged and produce an empty block so
    /// the chat turn can proceed without grounding.
    pub async fn build_context(&self, project_id: &str, user_text: &str, k: u64) -> String {
        match self.retriever.search(project_id, user_text, k).await {
            Ok(results) => format_context(&results),
            Err(e) => {
                tracing::warn!(project_id, "context retrieval failed: {e:#}");
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use daat_llm::mock::MockProvider;
    use daat_store::{InMemoryVectorStore, VectorStore};

    use super::*;
    use crate::collection::CollectionManager;
    use crate::testing::{BrokenCollections, Unreachable};

    fn hit(content: &str, file_path: &str) -> SearchResult {
        SearchResult {
            content: content.into(),
            file_path: file_path.into(),
            chunk_index: 0,
            metadata: crate::frontmatter::Metadata::new(),
            score: 0.9,
        }
    }

    fn assembler(store: Arc<dyn VectorStore>) -> ContextAssembler<MockProvider> {
        assembler_with(store, MockProvider::default())
    }

    fn assembler_with(
        store: Arc<dyn VectorStore>,
        provider: MockProvider,
    ) -> ContextAssembler<MockProvider> {
        let retriever = DocumentRetriever::new(
            CollectionManager::new(Arc::clone(&store), 4),
            store,
            Arc::new(provider),
        );
        ContextAssembler::new(Arc::new(retriever))
    }

    #[test]
    fn empty_results_give_empty_context() {
        assert_eq!(format_context(&[]), "");
    }

    #[test]
    fn bullets_joined_by_newline() {
        let ctx = format_context(&[hit("X", "a.md"), hit("Y", "b.md")]);
        assert_eq!(
            ctx,
            "\n\nRelevant documentation:\n- X (from a.md)\n- Y (from b.md)"
        );
    }

    #[test]
    fn system_prompt_without_context() {
        assert_eq!(system_prompt(""), "You are a helpful assistant. ");
    }

    #[test]
    fn system_prompt_with_context() {
        let ctx = format_context(&[hit("X", "a.md")]);
        assert_eq!(
            system_prompt(&ctx),
            "You are a helpful assistant. Use this documentation context when relevant: \
             \n\nRelevant documentation:\n- X (from a.md)"
        );
    }

    #[tokio::test]
    async fn unindexed_project_gives_empty_context() {
        let a = assembler(Arc::new(InMemoryVectorStore::new()));
        assert_eq!(a.build_context("p", "hello", 3).await, "");
    }

    #[tokio::test]
    async fn store_failure_degrades_to_empty_context() {
        let a = assembler(Arc::new(Unreachable));
        assert_eq!(a.build_context("p", "hello", 3).await, "");
    }

    #[tokio::test]
    async fn embedding_failure_degrades_to_empty_context() {
        let store = Arc::new(InMemoryVectorStore::new());
        store.create_collection("project_p", 4).await.unwrap();
        let mut provider = MockProvider::with_embedding(vec![1.0, 0.0, 0.0, 0.0]);
        provider.fail_embed = true;

        let a = assembler_with(store, provider.clone());
        assert_eq!(a.build_context("p", "hello", 3).await, "");
        assert_eq!(provider.embed_calls(), 1);
    }

    #[tokio::test]
    async fn search_failure_degrades_to_empty_context() {
        let store = Arc::new(BrokenCollections(vec!["project_p".into()]));
        let a = assembler_with(store, MockProvider::with_embedding(vec![1.0, 0.0, 0.0, 0.0]));
        assert_eq!(a.build_context("p", "hello", 3).await, "");
    }
}
