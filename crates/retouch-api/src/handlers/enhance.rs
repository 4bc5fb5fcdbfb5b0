//! Enhance handler: the per-request orchestrator.
//!
//! Sequential state machine: extract, validate, store input, invoke the
//! pipeline, resolve the artifact, respond. The stored input file is held
//! by a guard and deleted on every exit path: success, every failure
//! branch, and a request future dropped by a disconnecting client. No
//! input file outlives its request.

use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    Json,
};
use retouch_core::constants::API_PREFIX;
use retouch_pipeline::ProcessingMode;
use retouch_storage::InputRecord;
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::utils::upload::{extract_multipart, sanitize_filename, validate_file_extension};

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnhanceResponse {
    pub success: bool,
    pub message: String,
    pub download_url: String,
    pub filename: String,
    pub skip_esrgan: bool,
}

/// Enhance an uploaded image with the restoration pipeline.
///
/// Form data:
/// - `file`: image to enhance
/// - `skipEsrgan`: optional, `"true"` to skip the super-resolution stage
#[utoipa::path(
    post,
    path = "/api/enhance",
    tag = "enhance",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Image enhanced successfully", body = EnhanceResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 500, description = "Pipeline failed or output missing", body = ErrorResponse),
        (status = 504, description = "Pipeline timed out", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "enhance"))]
pub async fn enhance_image(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<EnhanceResponse>, HttpAppError> {
    let asset = extract_multipart(multipart).await?;
    validate_file_extension(&asset.filename, &state.config.allowed_extensions)?;
    let safe_filename = sanitize_filename(&asset.filename)?;
    let mode = ProcessingMode::from_skip_esrgan(asset.skip_esrgan);

    // Nothing has touched the filesystem before this point; rejected uploads
    // leave no trace.
    let record = state.inputs.store(&safe_filename, &asset.data).await?;
    // The guard deletes the input even if this future is dropped mid-pipeline.
    let guard = state.inputs.guard(record);

    let result = run_pipeline(&state, guard.record(), mode).await;

    // Cleanup invariant: the input file is removed before any response is
    // produced, regardless of outcome.
    let input_path = guard.record().path.clone();
    if let Err(cleanup_err) = guard.remove().await {
        tracing::warn!(
            error = %cleanup_err,
            path = %input_path.display(),
            "Failed to clean up input file after request"
        );
    }

    let filename = result?;
    Ok(Json(EnhanceResponse {
        success: true,
        message: "Image enhanced successfully".to_string(),
        download_url: format!("{}/download/{}", API_PREFIX, filename),
        filename,
        skip_esrgan: mode.skips_esrgan(),
    }))
}

/// The fallible section: invoke the pipeline and resolve its artifact.
/// Kept separate so the caller can run cleanup on every exit path.
async fn run_pipeline(
    state: &AppState,
    record: &InputRecord,
    mode: ProcessingMode,
) -> Result<String, HttpAppError> {
    state.invoker.run(&record.path, mode).await?;

    let artifact = state.resolver.resolve(&record.stored_filename, mode).await?;

    tracing::info!(
        filename = %artifact.filename,
        size_bytes = artifact.size_bytes,
        "Enhancement completed"
    );
    Ok(artifact.filename)
}
