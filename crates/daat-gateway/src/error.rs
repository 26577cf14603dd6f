use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use daat_index::IndexError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("failed to bind {0}: {1}")]
    Bind(String, std::io::Error),
    #[error("server error: {0}")]
    Server(String),
}

/// JSON error response for `/api/*` routes.
#[derive(Debug)]
pub(crate) struct ApiError {
    status: StatusCode,
    body: serde_json::Value,
}

impl ApiError {
    pub(crate) fn index(err: &IndexError, project_id: &str, file_path: &str) -> Self {
        Self {
            status: index_status(err),
            body: serde_json::json!({
                "error": err.to_string(),
                "projectId": project_id,
                "filePath": file_path,
            }),
        }
    }

    pub(crate) fn invalid_path(project_id: &str, file_path: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: serde_json::json!({
                "error": "filePath must be relative to the docs root",
                "projectId": project_id,
                "filePath": file_path,
            }),
        }
    }

    pub(crate) fn search(err: &IndexError, project_id: &str) -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            body: serde_json::json!({
                "error": err.to_string(),
                "projectId": project_id,
            }),
        }
    }

    pub(crate) fn bad_request(message: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: serde_json::json!({ "error": message }),
        }
    }

    pub(crate) fn chat(message: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: serde_json::json!({ "error": message }),
        }
    }

    pub(crate) fn timeout(secs: u64) -> Self {
        Self {
            status: StatusCode::GATEWAY_TIMEOUT,
            body: serde_json::json!({ "error": format!("chat turn exceeded {secs}s") }),
        }
    }

    #[cfg(test)]
    pub(crate) fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

fn index_status(err: &IndexError) -> StatusCode {
    match err {
        IndexError::NotFound(_) => StatusCode::NOT_FOUND,
        IndexError::FrontMatter(_) | IndexError::FileTooLarge(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        IndexError::CollectionInit { .. }
        | IndexError::Embedding(_)
        | IndexError::DimensionMismatch { .. }
        | IndexError::Search { .. }
        | IndexError::Upsert { .. } => StatusCode::BAD_GATEWAY,
        IndexError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn index_status_mapping() {
        assert_eq!(
            index_status(&IndexError::NotFound(PathBuf::from("x.md"))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            index_status(&IndexError::FrontMatter("unclosed".into())),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            index_status(&IndexError::FileTooLarge(1)),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            index_status(&IndexError::Embedding(daat_llm::LlmError::RateLimited)),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            index_status(&IndexError::Io(std::io::Error::other("disk"))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn index_error_body_names_document() {
        let err = ApiError::index(&IndexError::NotFound(PathBuf::from("/d/x.md")), "p", "x.md");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.body["projectId"], "p");
        assert_eq!(err.body["filePath"], "x.md");
        assert!(err.body["error"].as_str().unwrap().contains("file not found"));
    }
}
