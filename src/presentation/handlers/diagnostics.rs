use axum::{extract::State, http::StatusCode, response::Json};
use serde_json::{json, Value};

use super::AppState;

/// Download the configured diagnostic object to the local filesystem
///
/// Reports the failure detail in the body; this route exists to debug bucket access.
pub async fn download_image(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match state.storage.download(&state.diagnostic_key, &state.download_path).await {
        Ok(bytes) => {
            tracing::info!(
                key = %state.diagnostic_key,
                path = %state.download_path.display(),
                bytes,
                "Diagnostic image downloaded"
            );
            (StatusCode::OK, Json(json!({ "message": "Image downloaded successfully" })))
        }
        Err(e) => {
            tracing::error!(key = %state.diagnostic_key, "Diagnostic download failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "message": format!("Failed to download image: {e}") })),
            )
        }
    }
}

/// List every object in the bucket
pub async fn check_s3(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match state.storage.list().await {
        Ok(objects) => (
            StatusCode::OK,
            Json(json!({
                "bucket": state.storage.bucket(),
                "key_count": objects.len(),
                "objects": objects,
            })),
        ),
        Err(e) => {
            tracing::error!(bucket = state.storage.bucket(), "Bucket listing failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": e.to_string() })))
        }
    }
}
