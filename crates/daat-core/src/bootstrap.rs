//! Builds the provider, vector store and project index from a [`Config`].

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use daat_index::{IndexerConfig, ProjectIndex};
use daat_llm::LlmProvider;
use daat_llm::any::AnyProvider;
use daat_llm::http::build_client;
use daat_llm::openai::OpenAiProvider;
use daat_store::{QdrantOps, VectorStore};

use crate::config::Config;
use crate::vault::{EnvVaultProvider, VaultProvider};

/// Load, resolve secrets and validate the configuration at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be parsed, the vault fails or
/// validation rejects a value.
pub async fn load_config(path: &Path) -> anyhow::Result<Config> {
    load_config_with_vault(path, &EnvVaultProvider).await
}

/// Same as [`load_config`] with an explicit secret source.
///
/// # Errors
///
/// See [`load_config`].
pub async fn load_config_with_vault(
    path: &Path,
    vault: &dyn VaultProvider,
) -> anyhow::Result<Config> {
    let mut config = Config::load(path)?;
    config.resolve_secrets(vault).await?;
    config.validate()?;
    Ok(config)
}

/// OpenAI-compatible provider for embeddings and chat.
///
/// # Errors
///
/// Returns an error if no API key was resolved or the HTTP client cannot be
/// built.
pub fn create_provider(config: &Config) -> anyhow::Result<AnyProvider> {
    let api_key = config
        .secrets
        .openai_api_key
        .as_ref()
        .context("DAAT_OPENAI_API_KEY is required for the embedding provider")?;
    let client = build_client(Duration::from_secs(config.llm.request_timeout_secs))
        .context("failed to build HTTP client for the embedding provider")?;
    let provider = OpenAiProvider::new(
        api_key.expose().to_owned(),
        config.llm.base_url.clone(),
        config.llm.chat_model.clone(),
        config.llm.max_tokens,
        Some(config.llm.embedding_model.clone()),
    )
    .with_client(client);
    Ok(AnyProvider::OpenAi(provider))
}

/// Qdrant-backed vector store.
///
/// # Errors
///
/// Returns an error if the Qdrant client cannot be built from the URL.
pub fn create_store(config: &Config) -> anyhow::Result<Arc<dyn VectorStore>> {
    let api_key = config
        .secrets
        .qdrant_api_key
        .as_ref()
        .map(|k| k.expose().to_owned());
    let ops = QdrantOps::new(&config.qdrant.url, api_key)
        .map_err(|e| anyhow::anyhow!("failed to create Qdrant client for {}: {e}", config.qdrant.url))?;
    tracing::debug!(url = %config.qdrant.url, "qdrant client created");
    Ok(Arc::new(ops))
}

#[must_use]
pub fn indexer_config(config: &Config) -> IndexerConfig {
    IndexerConfig {
        chunk_size: config.index.chunk_size,
        docs_root: config.index.docs_root.clone(),
        max_file_size: config.index.max_file_size,
        id_scheme: config.index.id_scheme,
        embed_concurrency: config.index.embed_concurrency,
    }
}

#[must_use]
pub fn create_project_index<P: LlmProvider>(
    config: &Config,
    store: Arc<dyn VectorStore>,
    provider: Arc<P>,
) -> ProjectIndex<P> {
    ProjectIndex::new(
        store,
        provider,
        config.index.vector_size,
        indexer_config(config),
    )
}
