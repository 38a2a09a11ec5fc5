pub mod diagnostics;
pub mod labels;

use std::path::PathBuf;
use std::sync::Arc;

use crate::domain::repositories::LabelRepository;
use crate::infrastructure::{
    config::{AppConfig, MissingImagePolicy},
    storage::ObjectStorage,
};
use crate::presentation::middleware::{auth::JwtService, error::AppError};

/// Label repository shared by every handler
pub type SharedLabelRepository = Arc<dyn LabelRepository<Error = AppError>>;

/// Object storage shared by every handler
pub type SharedObjectStorage = Arc<dyn ObjectStorage>;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub labels: SharedLabelRepository,
    pub storage: SharedObjectStorage,
    pub jwt: JwtService,
    pub missing_image_policy: MissingImagePolicy,
    pub diagnostic_key: String,
    pub download_path: PathBuf,
}

impl AppState {
    /// Build state from configuration and connected stores
    pub fn new(
        config: &AppConfig,
        labels: SharedLabelRepository,
        storage: SharedObjectStorage,
    ) -> Self {
        Self {
            labels,
            storage,
            jwt: JwtService::new(&config.auth.secret_key),
            missing_image_policy: config.labels.missing_image_policy,
            diagnostic_key: config.storage.diagnostic_key.clone(),
            download_path: PathBuf::from(&config.storage.download_path),
        }
    }
}
