//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Retouch API",
        version = "0.1.0",
        description = "Image restoration API. Uploads are run through an external \
        restoration pipeline (optionally skipping the super-resolution stage) and \
        the produced artifacts are served from the output directory."
    ),
    paths(
        handlers::health::health_check,
        handlers::enhance::enhance_image,
        handlers::download::download_file,
        handlers::list::list_outputs,
    ),
    components(schemas(
        error::ErrorResponse,
        handlers::health::HealthResponse,
        handlers::enhance::EnhanceResponse,
        handlers::list::ArtifactEntry,
        handlers::list::ListResponse,
    )),
    tags(
        (name = "health", description = "Service health"),
        (name = "enhance", description = "Image enhancement"),
        (name = "artifacts", description = "Produced output artifacts")
    )
)]
pub struct ApiDoc;
