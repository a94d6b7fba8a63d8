//! `/api/:collection/documents` routes (docs/ARCHITECTURE.md §6.1).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use engine::{RawData, ResponseData};
use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct IngestRequest {
    pub documents: Vec<RawData>,
}

#[derive(Debug, Deserialize)]
pub struct QueryParams {
    pub q: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// `POST /api/:collection/documents`: ingest a batch of documents.
///
/// An empty `documents` array is accepted and returns 200 with the payload
/// unchanged (the processor is never called, docs/ARCHITECTURE.md §6.1).
pub async fn ingest(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    Json(req): Json<IngestRequest>,
) -> ServerResult<(StatusCode, Json<IngestRequest>)> {
    if req.documents.is_empty() {
        return Ok((StatusCode::OK, Json(req)));
    }

    for doc in &req.documents {
        if doc.url.0.trim().is_empty() {
            return Err(ServerError::BadRequest("document url must not be empty".into()));
        }
        if doc.data.is_empty() {
            return Err(ServerError::BadRequest("document data must not be empty".into()));
        }
    }

    let processor = state.manager.get_processor(&collection)?;
    processor
        .insert(req.documents.clone())
        .await
        .map_err(ServerError::PersistFailed)?;

    Ok((StatusCode::CREATED, Json(req)))
}

/// `GET /api/:collection/documents?q=&limit=&offset=`: ranked keyword query.
///
/// `q` is required; a negative `limit`/`offset` is a validation failure at
/// this boundary (the core's own `limit < 1` / `offset < 0` defaulting,
/// docs/ARCHITECTURE.md §4.3.2, only ever sees non-negative values from
/// here).
pub async fn query(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    Query(params): Query<QueryParams>,
) -> ServerResult<Json<Vec<ResponseData>>> {
    let q = params
        .q
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ServerError::BadRequest("missing query parameter `q`".into()))?;

    let limit = params.limit.unwrap_or(10);
    let offset = params.offset.unwrap_or(0);
    if limit < 0 {
        return Err(ServerError::BadRequest("`limit` must not be negative".into()));
    }
    if offset < 0 {
        return Err(ServerError::BadRequest("`offset` must not be negative".into()));
    }

    let processor = state.manager.get_processor(&collection)?;
    let results = processor
        .query(&q, limit, offset)
        .await
        .map_err(ServerError::Internal)?;
    Ok(Json(results))
}
