use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use daat_index::ProjectIndex;
use daat_llm::any::AnyProvider;
use tokio::sync::watch;

use crate::error::GatewayError;
use crate::router::build_router;

#[derive(Clone)]
pub(crate) struct AppState {
    pub index: Arc<ProjectIndex<AnyProvider>>,
    pub provider: Arc<AnyProvider>,
    pub search_limit: u64,
    pub context_chunks: u64,
    pub chat_timeout: Duration,
    pub started_at: Instant,
}

pub struct GatewayServer {
    addr: SocketAddr,
    auth_token: Option<String>,
    rate_limit: u32,
    max_body_size: usize,
    search_limit: u64,
    context_chunks: u64,
    chat_timeout: Duration,
    index: Arc<ProjectIndex<AnyProvider>>,
    provider: Arc<AnyProvider>,
    shutdown_rx: watch::Receiver<bool>,
}

impl GatewayServer {
    #[must_use]
    pub fn new(
        bind: &str,
        port: u16,
        index: Arc<ProjectIndex<AnyProvider>>,
        provider: Arc<AnyProvider>,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Self {
        let addr: SocketAddr = format!("{bind}:{port}").parse().unwrap_or_else(|e| {
            tracing::warn!("invalid bind '{bind}': {e}, falling back to 127.0.0.1:{port}");
            SocketAddr::from(([127, 0, 0, 1], port))
        });

        if bind == "0.0.0.0" {
            tracing::warn!("gateway binding to 0.0.0.0, reachable from every interface");
        }

        Self {
            addr,
            auth_token: None,
            rate_limit: 120,
            max_body_size: 1_048_576,
            search_limit: daat_index::retriever::DEFAULT_SEARCH_LIMIT,
            context_chunks: daat_index::context::DEFAULT_CONTEXT_CHUNKS,
            chat_timeout: Duration::from_secs(30),
            index,
            provider,
            shutdown_rx,
        }
    }

    #[must_use]
    pub fn with_auth(mut self, token: Option<String>) -> Self {
        self.auth_token = token;
        self
    }

    #[must_use]
    pub fn with_rate_limit(mut self, limit: u32) -> Self {
        self.rate_limit = limit;
        self
    }

    #[must_use]
    pub fn with_max_body_size(mut self, size: usize) -> Self {
        self.max_body_size = size;
        self
    }

    /// Default `limit` for search requests that omit it.
    #[must_use]
    pub fn with_search_limit(mut self, limit: u64) -> Self {
        self.search_limit = limit;
        self
    }

    /// Number of chunks retrieved into each chat turn's system prompt.
    #[must_use]
    pub fn with_context_chunks(mut self, k: u64) -> Self {
        self.context_chunks = k;
        self
    }

    #[must_use]
    pub fn with_chat_timeout(mut self, timeout: Duration) -> Self {
        self.chat_timeout = timeout;
        self
    }

    /// Start the HTTP gateway server.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind or encounters a fatal I/O error.
    pub async fn serve(self) -> Result<(), GatewayError> {
        let state = AppState {
            index: self.index,
            provider: self.provider,
            search_limit: self.search_limit,
            context_chunks: self.context_chunks,
            chat_timeout: self.chat_timeout,
            started_at: Instant::now(),
        };

        let router = build_router(state, self.auth_token, self.rate_limit, self.max_body_size);

        let listener = tokio::net::TcpListener::bind(self.addr)
            .await
            .map_err(|e| GatewayError::Bind(self.addr.to_string(), e))?;
        tracing::info!("gateway listening on {}", self.addr);

        let mut shutdown_rx = self.shutdown_rx;
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(async move {
            while !*shutdown_rx.borrow_and_update() {
                if shutdown_rx.changed().await.is_err() {
                    std::future::pending::<()>().await;
                }
            }
            tracing::info!("gateway shutting down");
        })
        .await
        .map_err(|e| GatewayError::Server(format!("{e}")))?;

        Ok(())
    }
}
