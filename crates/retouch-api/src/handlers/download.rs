use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use retouch_core::AppError;
use retouch_storage::StorageError;
use tokio_util::io::ReaderStream;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/download/{filename}",
    tag = "artifacts",
    params(
        ("filename" = String, Path, description = "Artifact filename")
    ),
    responses(
        (status = 200, description = "Enhanced image file", content_type = "image/png"),
        (status = 404, description = "File not found", body = ErrorResponse)
    )
)]
pub async fn download_file(
    Path(filename): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    // Traversal attempts and unknown names both present as 404: the store
    // never resolves a request outside the output directory, and we don't
    // reveal which names were rejected versus absent.
    let (file, artifact) = state.artifacts.open(&filename).await.map_err(|e| match e {
        StorageError::NotFound(_) | StorageError::InvalidKey(_) => {
            AppError::NotFound("File not found".to_string())
        }
        other => HttpAppError::from(other).0,
    })?;

    tracing::debug!(filename = %artifact.filename, size_bytes = artifact.size_bytes, "Serving artifact");

    let stream = ReaderStream::new(file);

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "image/png")
        .header(header::CONTENT_LENGTH, artifact.size_bytes)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", artifact.filename),
        )
        .body(Body::from_stream(stream))
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to build response");
            AppError::Internal(e.to_string())
        })?;

    Ok(response)
}
