use std::path::PathBuf;

use super::Config;

impl Config {
    pub(crate) fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("DAAT_QDRANT_URL") {
            self.qdrant.url = v;
        }
        if let Ok(v) = std::env::var("DAAT_LLM_BASE_URL") {
            self.llm.base_url = v;
        }
        if let Ok(v) = std::env::var("DAAT_LLM_CHAT_MODEL") {
            self.llm.chat_model = v;
        }
        if let Ok(v) = std::env::var("DAAT_LLM_EMBEDDING_MODEL") {
            self.llm.embedding_model = v;
        }
        if let Ok(v) = std::env::var("DAAT_INDEX_VECTOR_SIZE") {
            if let Ok(size) = v.parse::<u64>() {
                self.index.vector_size = size;
            } else {
                tracing::warn!("ignoring invalid DAAT_INDEX_VECTOR_SIZE value: {v}");
            }
        }
        if let Ok(v) = std::env::var("DAAT_INDEX_CHUNK_SIZE") {
            if let Ok(size) = v.parse::<usize>() {
                self.index.chunk_size = size;
            } else {
                tracing::warn!("ignoring invalid DAAT_INDEX_CHUNK_SIZE value: {v}");
            }
        }
        if let Ok(v) = std::env::var("DAAT_INDEX_DOCS_ROOT") {
            self.index.docs_root = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var("DAAT_INDEX_ID_SCHEME") {
            match v.parse() {
                Ok(scheme) => self.index.id_scheme = scheme,
                Err(e) => tracing::warn!("ignoring DAAT_INDEX_ID_SCHEME: {e}"),
            }
        }
        if let Ok(v) = std::env::var("DAAT_GATEWAY_BIND") {
            self.gateway.bind = v;
        }
        if let Ok(v) = std::env::var("DAAT_GATEWAY_PORT")
            && let Ok(port) = v.parse::<u16>()
        {
            self.gateway.port = port;
        }
    }
}
