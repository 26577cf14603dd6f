use std::path::PathBuf;

use daat_index::hash::IdScheme;
use serde::{Deserialize, Serialize};

use crate::vault::Secret;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub qdrant: QdrantConfig,
    #[serde(default)]
    pub index: IndexConfig,
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(skip)]
    pub secrets: ResolvedSecrets,
}

/// OpenAI-compatible endpoint used for both embeddings and chat.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LlmConfig {
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,
    #[serde(default = "default_chat_model")]
    pub chat_model: String,
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Per-request deadline for embedding and chat calls.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_llm_base_url() -> String {
    "https://api.openai.com/v1".into()
}

fn default_chat_model() -> String {
    "gpt-4o-mini".into()
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".into()
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_request_timeout_secs() -> u64 {
    daat_llm::http::REQUEST_TIMEOUT.as_secs()
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_llm_base_url(),
            chat_model: default_chat_model(),
            embedding_model: default_embedding_model(),
            max_tokens: default_max_tokens(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QdrantConfig {
    /// gRPC endpoint.
    #[serde(default = "default_qdrant_url")]
    pub url: String,
}

fn default_qdrant_url() -> String {
    "http://localhost:6334".into()
}

impl Default for QdrantConfig {
    fn default() -> Self {
        Self {
            url: default_qdrant_url(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IndexConfig {
    /// Embedding dimension; must match the embedding model.
    #[serde(default = "default_vector_size")]
    pub vector_size: u64,
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    #[serde(default = "default_docs_root")]
    pub docs_root: PathBuf,
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
    #[serde(default)]
    pub id_scheme: IdScheme,
    #[serde(default = "default_search_limit")]
    pub search_limit: u64,
    /// Chunks placed in the chat system prompt.
    #[serde(default = "default_context_chunks")]
    pub context_chunks: u64,
    /// Embedding requests in flight per document.
    #[serde(default = "default_embed_concurrency")]
    pub embed_concurrency: usize,
}

fn default_vector_size() -> u64 {
    1536
}

fn default_chunk_size() -> usize {
    daat_index::chunker::DEFAULT_CHUNK_SIZE
}

fn default_docs_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_max_file_size() -> u64 {
    daat_index::indexer::DEFAULT_MAX_FILE_SIZE
}

fn default_search_limit() -> u64 {
    daat_index::retriever::DEFAULT_SEARCH_LIMIT
}

fn default_context_chunks() -> u64 {
    daat_index::context::DEFAULT_CONTEXT_CHUNKS
}

fn default_embed_concurrency() -> usize {
    daat_index::indexer::DEFAULT_EMBED_CONCURRENCY
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            vector_size: default_vector_size(),
            chunk_size: default_chunk_size(),
            docs_root: default_docs_root(),
            max_file_size: default_max_file_size(),
            id_scheme: IdScheme::default(),
            search_limit: default_search_limit(),
            context_chunks: default_context_chunks(),
            embed_concurrency: default_embed_concurrency(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GatewayConfig {
    #[serde(default = "default_gateway_bind")]
    pub bind: String,
    #[serde(default = "default_gateway_port")]
    pub port: u16,
    #[serde(default)]
    pub auth_token: Option<String>,
    /// Requests per minute per client IP.
    #[serde(default = "default_gateway_rate_limit")]
    pub rate_limit: u32,
    #[serde(default = "default_gateway_max_body")]
    pub max_body_size: usize,
    #[serde(default = "default_chat_timeout")]
    pub chat_timeout_secs: u64,
}

fn default_gateway_bind() -> String {
    "127.0.0.1".into()
}

fn default_gateway_port() -> u16 {
    8090
}

fn default_gateway_rate_limit() -> u32 {
    120
}

fn default_gateway_max_body() -> usize {
    1_048_576
}

fn default_chat_timeout() -> u64 {
    30
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bind: default_gateway_bind(),
            port: default_gateway_port(),
            auth_token: None,
            rate_limit: default_gateway_rate_limit(),
            max_body_size: default_gateway_max_body(),
            chat_timeout_secs: default_chat_timeout(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ResolvedSecrets {
    pub openai_api_key: Option<Secret>,
    pub qdrant_api_key: Option<Secret>,
}
