use crate::{
    application::dto::LabeledImageDto,
    domain::entities::Label,
    infrastructure::{config::MissingImagePolicy, storage::ObjectStorage},
    presentation::middleware::error::AppError,
};

/// Fetch the image for every label, in order
///
/// Reads are sequential. A failed read either aborts the whole result or drops
/// the entry, depending on `policy`.
pub(crate) async fn load_label_images<S>(
    storage: &S,
    labels: Vec<Label>,
    policy: MissingImagePolicy,
) -> Result<Vec<LabeledImageDto>, AppError>
where
    S: ObjectStorage + ?Sized,
{
    let mut images = Vec::with_capacity(labels.len());

    for label in labels {
        match storage.get(label.image_url.as_str()).await {
            Ok(data) => images.push(LabeledImageDto::new(label, &data)),
            Err(e) if policy == MissingImagePolicy::Skip => {
                tracing::warn!(
                    username = %label.username,
                    label_name = %label.label_name,
                    key = %label.image_url,
                    "Skipping label with unreadable image: {}",
                    e
                );
            }
            Err(e) => {
                tracing::error!(key = %label.image_url, "Failed to read label image: {}", e);
                return Err(e.into());
            }
        }
    }

    Ok(images)
}
