//! HTTP error response conversion
//!
//! This module provides HTTP-specific error response conversion for AppError.
//!
//! **Preferred handler pattern:** Return `Result<impl IntoResponse, HttpAppError>`. Use
//! `AppError` (or types that implement `Into<AppError>`) for errors and `.map_err(Into::into)`
//! so they become `HttpAppError` and render consistently (status, body, logging).

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use retouch_core::{AppError, ErrorMetadata, LogLevel};
use retouch_pipeline::PipelineError;
use retouch_storage::StorageError;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Whether this error is recoverable (can be retried)
    pub recoverable: bool,
}

/// Wrapper type for AppError to implement IntoResponse
/// This is necessary because of Rust's orphan rules - we can't implement
/// IntoResponse (external trait) for AppError (external type from retouch-core)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        })
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type = error_type, "Error occurred");
        }
    }
}

fn is_production_env() -> bool {
    std::env::var("ENVIRONMENT")
        .or_else(|_| std::env::var("APP_ENV"))
        .map(|env| env.to_lowercase() == "production" || env.to_lowercase() == "prod")
        .unwrap_or(false)
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        // Always hide details in production for security; in non-production, only show details for non-sensitive errors.
        let details = if is_production_env() || app_error.is_sensitive() {
            None
        } else {
            Some(app_error.detailed_message())
        };

        let body = Json(ErrorResponse {
            error: app_error.client_message(),
            details,
            code: app_error.error_code().to_string(),
            recoverable: app_error.is_recoverable(),
        });

        (status, body).into_response()
    }
}

// Convert domain errors to HttpAppError (avoids orphan rule: we impl for local HttpAppError)

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        let app = match err {
            StorageError::NotFound(msg) => AppError::NotFound(msg),
            StorageError::InvalidKey(msg) => AppError::InvalidInput(msg),
            StorageError::WriteFailed(msg) => AppError::Storage(msg),
            StorageError::ReadFailed(msg) => AppError::Storage(msg),
            StorageError::DeleteFailed(msg) => AppError::Storage(msg),
            StorageError::IoError(e) => AppError::Internal(format!("IO error: {}", e)),
        };
        HttpAppError(app)
    }
}

impl From<PipelineError> for HttpAppError {
    fn from(err: PipelineError) -> Self {
        let app = match err {
            PipelineError::TimedOut { seconds } => AppError::PipelineTimeout { seconds },
            PipelineError::Failed { exit_code, stderr } => AppError::PipelineFailed {
                details: format!("exit status {:?}: {}", exit_code, stderr.trim()),
            },
            PipelineError::ArtifactMissing { expected } => AppError::ArtifactMissing { expected },
            PipelineError::Spawn(e) => {
                AppError::Internal(format!("Failed to start pipeline: {}", e))
            }
            PipelineError::Io(e) => AppError::Internal(format!("Pipeline IO error: {}", e)),
        };
        HttpAppError(app)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_storage_error_not_found() {
        let storage_err = StorageError::NotFound("cat.png".to_string());
        let HttpAppError(app_err) = storage_err.into();
        match app_err {
            AppError::NotFound(msg) => assert_eq!(msg, "cat.png"),
            _ => panic!("Expected NotFound variant"),
        }
    }

    #[test]
    fn test_from_storage_error_write_failed() {
        let storage_err = StorageError::WriteFailed("disk full".to_string());
        let HttpAppError(app_err) = storage_err.into();
        match app_err {
            AppError::Storage(msg) => assert_eq!(msg, "disk full"),
            _ => panic!("Expected Storage variant"),
        }
    }

    #[test]
    fn test_from_pipeline_error_timeout() {
        let pipeline_err = PipelineError::TimedOut { seconds: 300 };
        let HttpAppError(app_err) = pipeline_err.into();
        assert_eq!(app_err.http_status_code(), 504);
    }

    #[test]
    fn test_from_pipeline_error_failed_carries_stderr() {
        let pipeline_err = PipelineError::Failed {
            exit_code: Some(1),
            stderr: "CUDA out of memory\n".to_string(),
        };
        let HttpAppError(app_err) = pipeline_err.into();
        match app_err {
            AppError::PipelineFailed { details } => {
                assert!(details.contains("CUDA out of memory"));
            }
            _ => panic!("Expected PipelineFailed variant"),
        }
    }

    #[test]
    fn test_from_pipeline_error_artifact_missing() {
        let pipeline_err = PipelineError::ArtifactMissing {
            expected: "x_cat_enhanced.png".to_string(),
        };
        let HttpAppError(app_err) = pipeline_err.into();
        assert_eq!(app_err.error_code(), "ARTIFACT_MISSING");
        assert_eq!(app_err.client_message(), "Output file not found");
    }

    /// Verifies the public error response contract: serialized ErrorResponse has "error",
    /// "code", "recoverable", and optionally "details".
    #[test]
    fn test_error_response_shape() {
        let response = ErrorResponse {
            error: "Output file not found".to_string(),
            details: Some("expected x_cat_enhanced.png".to_string()),
            code: "ARTIFACT_MISSING".to_string(),
            recoverable: false,
        };
        let json = serde_json::to_value(&response).expect("serialize");
        assert!(json.get("error").and_then(|v| v.as_str()).is_some());
        assert_eq!(
            json.get("code").and_then(|v| v.as_str()),
            Some("ARTIFACT_MISSING")
        );
        assert!(json.get("recoverable").and_then(|v| v.as_bool()).is_some());
    }
}
