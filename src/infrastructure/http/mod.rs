use axum::{
    extract::{DefaultBodyLimit, State},
    http::{header, Method, StatusCode},
    response::Json,
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{error, info, warn};

use crate::infrastructure::{
    config::AppConfig,
    persistence::{Database, MongoLabelRepository},
    storage::S3ObjectStorage,
};
use crate::presentation::{handlers::AppState, routes};

const SERVICE_NAME: &str = "label-image-service";

/// Create the main application router
pub fn create_app(config: &AppConfig, state: AppState) -> Router {
    let middleware_stack = ServiceBuilder::new()
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.server.request_timeout_seconds),
        ))
        .layer(create_cors_layer())
        .layer(DefaultBodyLimit::max(
            usize::try_from(config.server.max_upload_size).unwrap_or(usize::MAX),
        ));

    Router::new()
        .merge(routes::create_routes(state))
        .fallback(not_found_handler)
        .layer(middleware_stack)
}

/// Liveness probe
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "service": SERVICE_NAME
    }))
}

/// Readiness probe: the metadata store and the bucket must both answer
pub async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let (database, storage) =
        tokio::join!(state.labels.health_check(), state.storage.health_check());

    let database_status = match &database {
        Ok(()) => "ok",
        Err(e) => {
            warn!("Readiness: metadata store check failed: {}", e);
            "unavailable"
        }
    };
    let storage_status = match &storage {
        Ok(()) => "ok",
        Err(e) => {
            warn!("Readiness: object store check failed: {}", e);
            "unavailable"
        }
    };

    let ready = database.is_ok() && storage.is_ok();
    let status = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };

    (
        status,
        Json(json!({
            "status": if ready { "ready" } else { "not_ready" },
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "checks": {
                "database": database_status,
                "storage": storage_status
            }
        })),
    )
}

/// Handler for 404 not found
async fn not_found_handler() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Not Found",
            "message": "The requested resource was not found"
        })),
    )
}

fn create_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(3600))
}

/// Start the HTTP server
///
/// # Errors
/// Returns an error if the metadata store is unreachable, the address is invalid,
/// or the listener cannot bind
pub async fn start_server(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let database = Database::connect(&config.database).await.map_err(|e| {
        error!("Failed to connect to MongoDB: {}", e);
        e
    })?;
    let repository = MongoLabelRepository::new(database.clone(), &config.database.collection);
    let storage = S3ObjectStorage::from_config(&config.storage).await;

    info!(bucket = %config.storage.bucket, "Object storage configured");

    let state = AppState::new(&config, Arc::new(repository), Arc::new(storage));
    let app = create_app(&config, state);
    let addr = config.server.socket_addr()?;

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    database.close().await;
    info!("Server shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}
