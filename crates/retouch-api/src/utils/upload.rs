//! Common utilities for the upload handler: multipart extraction, filename
//! sanitization and extension validation.

use axum::extract::Multipart;
use retouch_core::AppError;

/// The parsed multipart form: file bytes, declared filename, and flags.
#[derive(Debug)]
pub struct UploadedAsset {
    pub data: Vec<u8>,
    pub filename: String,
    pub skip_esrgan: bool,
}

/// Extract the `file` field and the optional `skipEsrgan` flag from a
/// multipart form. Only one field named "file" is accepted; multiple file
/// fields are rejected.
pub async fn extract_multipart(mut multipart: Multipart) -> Result<UploadedAsset, AppError> {
    let mut file_data: Option<Vec<u8>> = None;
    let mut filename: Option<String> = None;
    let mut skip_esrgan = false;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Failed to read multipart: {}", e)))?
    {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();

        match field_name.as_str() {
            "file" => {
                if file_data.is_some() {
                    return Err(AppError::InvalidInput(
                        "Multiple file fields are not allowed; send exactly one field named 'file'"
                            .to_string(),
                    ));
                }
                filename = field.file_name().map(|s: &str| s.to_string());

                let data = field.bytes().await.map_err(|e| {
                    AppError::InvalidInput(format!("Failed to read file data: {}", e))
                })?;
                file_data = Some(data.to_vec());
            }
            "skipEsrgan" => {
                let value = field.text().await.map_err(|e| {
                    AppError::InvalidInput(format!("Failed to read skipEsrgan field: {}", e))
                })?;
                skip_esrgan = value.trim().eq_ignore_ascii_case("true");
            }
            _ => {}
        }
    }

    let data = file_data.ok_or_else(|| AppError::InvalidInput("No file provided".to_string()))?;
    if data.is_empty() {
        return Err(AppError::InvalidInput("No file provided".to_string()));
    }

    let filename = filename.unwrap_or_default();
    if filename.is_empty() {
        return Err(AppError::InvalidInput("No file selected".to_string()));
    }

    Ok(UploadedAsset {
        data,
        filename,
        skip_esrgan,
    })
}

/// Validate file extension against the configured allowlist (case-insensitive).
pub fn validate_file_extension(
    filename: &str,
    allowed_extensions: &[String],
) -> Result<String, AppError> {
    let extension = match filename.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => ext.to_lowercase(),
        _ => String::new(),
    };

    if !allowed_extensions.contains(&extension) {
        return Err(AppError::InvalidInput(format!(
            "Invalid file type. Allowed types: {}",
            allowed_extensions.join(", ")
        )));
    }

    Ok(extension)
}

/// Sanitize filename to prevent path traversal and invalid characters.
/// Returns an error if the filename contains path traversal attempts.
pub fn sanitize_filename(filename: &str) -> Result<String, AppError> {
    const MAX_FILENAME_LENGTH: usize = 255;

    if filename.contains("..") {
        return Err(AppError::InvalidInput(
            "Filename contains invalid path traversal".to_string(),
        ));
    }

    let path = std::path::Path::new(filename);
    let filename_only = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(filename);

    let sanitized: String = filename_only
        .chars()
        .take(MAX_FILENAME_LENGTH)
        .map(|c| {
            if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.trim().is_empty() || sanitized.len() < 3 {
        return Ok("file".to_string());
    }

    Ok(sanitized)
}
