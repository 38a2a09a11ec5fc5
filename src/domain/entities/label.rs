use serde::{Deserialize, Serialize};

use crate::domain::value_objects::ObjectKey;

/// Content type recorded for every uploaded label image
pub const LABEL_IMAGE_CONTENT_TYPE: &str = "image/jpg";

/// A labeled image owned by a user
///
/// Labels are immutable once created. Several labels may share the same
/// `(username, label_name)` pair and therefore the same object key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub username: String,
    pub label_name: String,
    pub image_url: ObjectKey,
    pub image_content: String,
}

impl Label {
    /// Create a new label whose image lives under `{username}/{label_name}`
    #[must_use]
    pub fn new(username: String, label_name: String, image_content: String) -> Self {
        let image_url = ObjectKey::for_label(&username, &label_name);
        Self { username, label_name, image_url, image_content }
    }

    /// Create a label from stored fields, keeping the recorded image key
    #[must_use]
    pub fn from_parts(
        username: String,
        label_name: String,
        image_url: ObjectKey,
        image_content: String,
    ) -> Self {
        Self { username, label_name, image_url, image_content }
    }
}
