mod env;
mod types;


pub use types::*;

use std::path::Path;

use anyhow::{Context, bail};

use crate::vault::{Secret, VaultProvider};

impl Config {
    /// Load configuration from a TOML file with env var overrides.
    ///
    /// Falls back to defaults when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str::<Self>(&content).context("failed to parse config file")?
        } else {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Resolve API keys and the gateway token through the vault.
    ///
    /// # Errors
    ///
    /// Returns an error if the vault backend fails.
    pub async fn resolve_secrets(&mut self, vault: &dyn VaultProvider) -> anyhow::Result<()> {
        if let Some(val) = vault.get_secret("DAAT_OPENAI_API_KEY").await? {
            self.secrets.openai_api_key = Some(Secret::new(val));
        }
        if let Some(val) = vault.get_secret("DAAT_QDRANT_API_KEY").await? {
            self.secrets.qdrant_api_key = Some(Secret::new(val));
        }
        if let Some(val) = vault.get_secret("DAAT_GATEWAY_TOKEN").await? {
            self.gateway.auth_token = Some(val);
        }
        Ok(())
    }

    /// Reject values the pipeline cannot run with.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first invalid field.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.index.vector_size == 0 {
            bail!("index.vector_size must be greater than 0");
        }
        if self.index.chunk_size == 0 {
            bail!("index.chunk_size must be greater than 0");
        }
        if self.index.search_limit == 0 {
            bail!("index.search_limit must be greater than 0");
        }
        if self.index.context_chunks == 0 {
            bail!("index.context_chunks must be greater than 0");
        }
        if self.index.embed_concurrency == 0 {
            bail!("index.embed_concurrency must be greater than 0");
        }
        if self.llm.request_timeout_secs == 0 {
            bail!("llm.request_timeout_secs must be greater than 0");
        }
        if self.index.max_file_size == 0 {
            bail!("index.max_file_size must be greater than 0");
        }
        if !self.qdrant.url.starts_with("http://") && !self.qdrant.url.starts_with("https://") {
            bail!("qdrant.url must be an http(s) URL, got {:?}", self.qdrant.url);
        }
        if self.llm.base_url.trim().is_empty() {
            bail!("llm.base_url must not be empty");
        }
        if self.llm.embedding_model.trim().is_empty() {
            bail!("llm.embedding_model must not be empty");
        }
        if self.gateway.max_body_size == 0 {
            bail!("gateway.max_body_size must be greater than 0");
        }
        if self.gateway.chat_timeout_secs == 0 {
            bail!("gateway.chat_timeout_secs must be greater than 0");
        }
        if self.gateway.auth_token.as_deref().is_some_and(str::is_empty) {
            bail!("gateway.auth_token must not be empty when set");
        }
        Ok(())
    }
}
