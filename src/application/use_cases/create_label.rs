use bytes::Bytes;
use std::sync::Arc;

use crate::{
    application::dto::NewLabel,
    domain::{
        entities::{Label, LABEL_IMAGE_CONTENT_TYPE},
        repositories::LabelRepository,
    },
    infrastructure::storage::{ObjectStorage, StorageError},
    presentation::middleware::error::AppError,
};

/// Use case for storing a label image and recording its metadata
pub struct CreateLabelUseCase<R, S>
where
    R: LabelRepository + ?Sized,
    S: ObjectStorage + ?Sized,
{
    repository: Arc<R>,
    storage: Arc<S>,
}

impl<R, S> CreateLabelUseCase<R, S>
where
    R: LabelRepository + ?Sized,
    S: ObjectStorage + ?Sized,
{
    pub fn new(repository: Arc<R>, storage: Arc<S>) -> Self {
        Self { repository, storage }
    }

    /// Write the image, then the metadata document
    ///
    /// The metadata insert only happens after the object write succeeded. If the
    /// insert fails, the object under the key is put back the way it was found:
    /// earlier bytes are restored, a newly created object is deleted.
    pub async fn execute(&self, new_label: NewLabel) -> Result<Label, AppError> {
        let NewLabel { username, label_name, image_content, image_data } = new_label;
        let label = Label::new(username, label_name, image_content);
        let key = label.image_url.as_str();

        tracing::info!("Creating label {} for user {}", label.label_name, label.username);

        let previous = match self.storage.get(key).await {
            Ok(data) => Some(data),
            Err(StorageError::NotFound { .. }) => None,
            Err(e) => {
                return Err(AppError::Storage {
                    message: format!("Failed to read existing label image: {e}"),
                });
            }
        };

        self.storage.put(key, image_data, LABEL_IMAGE_CONTENT_TYPE).await.map_err(|e| {
            AppError::Storage { message: format!("Failed to store label image: {e}") }
        })?;

        if let Err(e) = self.repository.insert(&label).await {
            self.roll_back_image(key, previous).await;

            return Err(AppError::Database {
                message: format!("Failed to save label metadata: {e}"),
            });
        }

        tracing::info!("Label created successfully at key: {}", key);
        Ok(label)
    }

    async fn roll_back_image(&self, key: &str, previous: Option<Bytes>) {
        let result = match previous {
            Some(data) => self.storage.put(key, data, LABEL_IMAGE_CONTENT_TYPE).await,
            None => self.storage.delete(key).await,
        };

        match result {
            Ok(()) => tracing::info!(key, "Rolled back label image after failed metadata insert"),
            Err(e) => tracing::error!(key, "Failed to roll back label image: {}", e),
        }
    }
}
