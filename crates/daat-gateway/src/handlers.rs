use std::path::{Component, Path as FsPath};

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use daat_index::SearchResult;
use daat_index::context::system_prompt;
use daat_llm::LlmProvider;
use daat_llm::provider::{Message, Role};
use serde::{Deserialize, Serialize};

use super::error::ApiError;
use super::server::AppState;

const MAX_SEARCH_LIMIT: u64 = 100;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct IndexRequest {
    pub file_path: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IndexResponse {
    status: &'static str,
    project_id: String,
    file_path: String,
    chunks: usize,
}

#[derive(Deserialize)]
pub(crate) struct SearchParams {
    pub q: String,
    #[serde(default)]
    pub limit: Option<u64>,
}

#[derive(Serialize)]
struct SearchResponse {
    results: Vec<SearchResult>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ChatParams {
    #[serde(default)]
    pub project_id: Option<String>,
}

#[derive(Deserialize)]
pub(crate) struct ChatRequest {
    pub messages: Vec<Message>,
}

#[derive(Serialize)]
struct ChatResponse {
    reply: String,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    uptime_secs: u64,
}

/// Paths from clients must stay under the docs root.
fn is_contained(file_path: &str) -> bool {
    let path = FsPath::new(file_path);
    !file_path.is_empty()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

pub(crate) async fn index_handler(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
    Json(req): Json<IndexRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if !is_contained(&req.file_path) {
        return Err(ApiError::invalid_path(&project_id, &req.file_path));
    }

    match state
        .index
        .indexer
        .index_document(&req.file_path, &project_id)
        .await
    {
        Ok(report) => Ok(Json(IndexResponse {
            status: "indexed",
            project_id: report.project_id,
            file_path: report.file_path,
            chunks: report.chunks,
        })),
        Err(e) => {
            tracing::error!(
                project_id = %project_id,
                file_path = %req.file_path,
                "indexing failed: {e}"
            );
            Err(ApiError::index(&e, &project_id, &req.file_path))
        }
    }
}

pub(crate) async fn search_handler(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
    Query(params): Query<SearchParams>,
) -> Result<impl IntoResponse, ApiError> {
    let limit = params
        .limit
        .unwrap_or(state.search_limit)
        .clamp(1, MAX_SEARCH_LIMIT);

    match state
        .index
        .retriever
        .search(&project_id, &params.q, limit)
        .await
    {
        Ok(results) => Ok(Json(SearchResponse { results })),
        Err(e) => {
            tracing::error!(project_id = %project_id, "search failed: {e}");
            Err(ApiError::search(&e, &project_id))
        }
    }
}

pub(crate) async fn chat_handler(
    State(state): State<AppState>,
    Query(params): Query<ChatParams>,
    Json(req): Json<ChatRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.messages.is_empty() {
        return Err(ApiError::bad_request("messages must not be empty"));
    }

    let secs = state.chat_timeout.as_secs();
    let turn = run_chat_turn(&state, params.project_id.as_deref(), req.messages);
    match tokio::time::timeout(state.chat_timeout, turn).await {
        Ok(Ok(reply)) => Ok(Json(ChatResponse { reply })),
        Ok(Err(e)) => {
            tracing::error!("chat completion failed: {e}");
            Err(ApiError::chat(&e.to_string()))
        }
        Err(_) => {
            tracing::warn!(timeout_secs = secs, "chat turn timed out");
            Err(ApiError::timeout(secs))
        }
    }
}

async fn run_chat_turn(
    state: &AppState,
    project_id: Option<&str>,
    messages: Vec<Message>,
) -> Result<String, daat_llm::LlmError> {
    let context = match (project_id, messages.last()) {
        (Some(project_id), Some(last)) if last.role == Role::User => {
            state
                .index
                .assembler
                .build_context(project_id, &last.content, state.context_chunks)
                .await
        }
        _ => String::new(),
    };

    let mut prompt = Vec::with_capacity(messages.len() + 1);
    prompt.push(Message::system(system_prompt(&context)));
    prompt.extend(messages);
    state.provider.chat(&prompt).await
}

pub(crate) async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        uptime_secs: state.started_at.elapsed().as_secs(),
    })
}
