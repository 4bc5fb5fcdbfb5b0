use std::sync::Arc;

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use retouch_core::constants::API_PREFIX;
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactEntry {
    pub filename: String,
    pub size: u64,
    pub modified: DateTime<Utc>,
    pub download_url: String,
}

#[derive(Serialize, ToSchema)]
pub struct ListResponse {
    pub success: bool,
    pub files: Vec<ArtifactEntry>,
    pub count: usize,
}

#[utoipa::path(
    get,
    path = "/api/list",
    tag = "artifacts",
    responses(
        (status = 200, description = "Available artifacts, newest first", body = ListResponse),
        (status = 500, description = "Enumeration failed", body = ErrorResponse)
    )
)]
pub async fn list_outputs(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ListResponse>, HttpAppError> {
    let artifacts = state.artifacts.list().await?;

    let files: Vec<ArtifactEntry> = artifacts
        .into_iter()
        .map(|a| ArtifactEntry {
            download_url: format!("{}/download/{}", API_PREFIX, a.filename),
            filename: a.filename,
            size: a.size_bytes,
            modified: a.modified_at,
        })
        .collect();

    let count = files.len();
    Ok(Json(ListResponse {
        success: true,
        files,
        count,
    }))
}
