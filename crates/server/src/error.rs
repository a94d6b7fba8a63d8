use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

pub type ServerResult<T> = Result<T, ServerError>;

/// HTTP-adapter error type. Wraps `EngineError` and adds the
/// request-validation failures that only make sense at the HTTP boundary
/// (docs/ARCHITECTURE.md §7's translation table).
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("collection does not exist: {0}")]
    UnknownCollection(String),

    #[error("failed to persist documents: {0}")]
    PersistFailed(engine::EngineError),

    #[error("internal server error: {0}")]
    Internal(engine::EngineError),

    #[error("not found")]
    NotFound,
}

impl From<engine::EngineError> for ServerError {
    /// Collection-lookup failures become the dedicated 400 variant, as do
    /// unknown tokenizer/filter identifiers supplied when creating a
    /// collection (a validation failure, not an internal error); every
    /// other engine error is 500 unless the call site overrides it (insert
    /// persistence failures are mapped to 422 explicitly in the handler).
    fn from(err: engine::EngineError) -> Self {
        match err {
            engine::EngineError::NotFoundCollection(name) => ServerError::UnknownCollection(name),
            engine::EngineError::Config(e) => ServerError::BadRequest(e.to_string()),
            other => ServerError::Internal(other),
        }
    }
}

impl ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::UnknownCollection(_) => StatusCode::BAD_REQUEST,
            ServerError::PersistFailed(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServerError::NotFound => StatusCode::NOT_FOUND,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            ServerError::BadRequest(_) => "BAD_REQUEST",
            ServerError::UnknownCollection(_) => "UNKNOWN_COLLECTION",
            ServerError::PersistFailed(_) => "PERSIST_FAILED",
            ServerError::Internal(_) => "INTERNAL_ERROR",
            ServerError::NotFound => "NOT_FOUND",
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({
            "error": {
                "code": self.error_code(),
                "message": self.to_string(),
            }
        }));
        tracing::warn!(status = %status, error = %self, "request failed");
        (status, body).into_response()
    }
}
