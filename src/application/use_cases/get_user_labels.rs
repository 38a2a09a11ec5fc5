use std::sync::Arc;

use super::label_images::load_label_images;
use crate::{
    application::dto::LabeledImageDto,
    domain::repositories::LabelRepository,
    infrastructure::{config::MissingImagePolicy, storage::ObjectStorage},
    presentation::middleware::error::AppError,
};

/// Use case for listing every label a user owns, with image bytes
pub struct GetUserLabelsUseCase<R, S>
where
    R: LabelRepository + ?Sized,
    S: ObjectStorage + ?Sized,
{
    repository: Arc<R>,
    storage: Arc<S>,
    missing_image_policy: MissingImagePolicy,
}

impl<R, S> GetUserLabelsUseCase<R, S>
where
    R: LabelRepository + ?Sized,
    S: ObjectStorage + ?Sized,
{
    pub fn new(
        repository: Arc<R>,
        storage: Arc<S>,
        missing_image_policy: MissingImagePolicy,
    ) -> Self {
        Self { repository, storage, missing_image_policy }
    }

    pub async fn execute(&self, username: &str) -> Result<Vec<LabeledImageDto>, AppError> {
        tracing::info!("Getting labels for user: {}", username);

        let labels = self.repository.find_by_username(username).await.map_err(|e| {
            AppError::Database { message: format!("Failed to query labels by username: {e}") }
        })?;

        let images =
            load_label_images(self.storage.as_ref(), labels, self.missing_image_policy).await?;

        tracing::info!("Found {} labels for user: {}", images.len(), username);
        Ok(images)
    }
}
