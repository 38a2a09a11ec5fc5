use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};

use crate::{
    infrastructure::http::{health_check, readiness_check},
    presentation::{
        handlers::{diagnostics, labels, AppState},
        middleware::auth::{require_matching_username, require_token},
    },
};

/// Create all application routes with application state
pub fn create_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(identity_scoped_routes(&app_state))
        .merge(token_routes(&app_state))
        .merge(diagnostic_routes())
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .with_state(app_state)
}

/// Routes where the token must belong to the `username` being queried
fn identity_scoped_routes(app_state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/get-user-labels", get(labels::get_user_labels))
        .route_layer(from_fn_with_state(app_state.jwt.clone(), require_matching_username))
}

/// Routes that need any valid token
fn token_routes(app_state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/search-labels", get(labels::search_labels))
        .route("/create-label", post(labels::create_label))
        .route_layer(from_fn_with_state(app_state.jwt.clone(), require_token))
}

/// Unauthenticated bucket checks
fn diagnostic_routes() -> Router<AppState> {
    Router::new()
        .route("/download-image", get(diagnostics::download_image))
        .route("/check-s3", get(diagnostics::check_s3))
}
