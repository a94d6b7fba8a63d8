//! `/api/collections` routes (docs/ARCHITECTURE.md §6.1).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use engine::Metadata;
use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateCollectionRequest {
    pub name: String,
    pub metadata: Metadata,
}

#[derive(Debug, Serialize)]
pub struct CollectionInfo {
    pub name: String,
    pub metadata: Metadata,
}

/// `POST /api/collections`: create and register a new collection.
pub async fn create_collection(
    State(state): State<AppState>,
    Json(req): Json<CreateCollectionRequest>,
) -> ServerResult<(StatusCode, Json<CollectionInfo>)> {
    if req.name.trim().is_empty() {
        return Err(ServerError::BadRequest("collection name must not be empty".into()));
    }

    let processor = state.manager.init_new_proc(
        req.name.clone(),
        req.metadata.tokenizer.clone(),
        req.metadata.col_filters.clone(),
    )?;
    state.manager.add_processor(processor);

    Ok((
        StatusCode::CREATED,
        Json(CollectionInfo {
            name: req.name,
            metadata: req.metadata,
        }),
    ))
}

/// `GET /api/collections`: list every registered collection's metadata,
/// sorted by name for a deterministic response.
pub async fn list_collections(State(state): State<AppState>) -> ServerResult<Json<Vec<CollectionInfo>>> {
    let collections = state.manager.list_collections()?;
    let mut out: Vec<CollectionInfo> = collections
        .into_iter()
        .map(|(name, metadata)| CollectionInfo { name, metadata })
        .collect();
    out.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(Json(out))
}
