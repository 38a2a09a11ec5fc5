use std::sync::Arc;

use super::label_images::load_label_images;
use crate::{
    application::dto::LabeledImageDto,
    domain::repositories::LabelRepository,
    infrastructure::{config::MissingImagePolicy, storage::ObjectStorage},
    presentation::middleware::error::AppError,
};

/// Use case for finding labels by name across all users
pub struct SearchLabelsUseCase<R, S>
where
    R: LabelRepository + ?Sized,
    S: ObjectStorage + ?Sized,
{
    repository: Arc<R>,
    storage: Arc<S>,
    missing_image_policy: MissingImagePolicy,
}

impl<R, S> SearchLabelsUseCase<R, S>
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

    pub async fn execute(&self, label_name: &str) -> Result<Vec<LabeledImageDto>, AppError> {
        tracing::info!("Searching labels named: {}", label_name);

        let labels = self.repository.find_by_label_name(label_name).await.map_err(|e| {
            AppError::Database { message: format!("Failed to query labels by name: {e}") }
        })?;

        let images =
            load_label_images(self.storage.as_ref(), labels, self.missing_image_policy).await?;

        tracing::info!("Found {} labels named: {}", images.len(), label_name);
        Ok(images)
    }
}
