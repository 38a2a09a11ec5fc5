use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::entities::Label;
use crate::presentation::middleware::error::AppError;

/// A label together with its base64-encoded image bytes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledImageDto {
    pub label_name: String,
    pub image_content: String,
    pub image_data: String,
}

impl LabeledImageDto {
    /// Pair a label with the bytes read from its object key
    #[must_use]
    pub fn new(label: Label, image: &[u8]) -> Self {
        Self {
            label_name: label.label_name,
            image_content: label.image_content,
            image_data: STANDARD.encode(image),
        }
    }
}

/// Response for `GET /get-user-labels`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserLabelsResponse {
    pub labeled_images: Vec<LabeledImageDto>,
}

/// Response for `GET /search-labels`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingLabelsResponse {
    pub matching_labels: Vec<LabeledImageDto>,
}

/// Plain message response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// Query parameters for `GET /get-user-labels`
#[derive(Debug, Clone, Deserialize)]
pub struct UserLabelsQuery {
    pub username: String,
}

/// Query parameters for `GET /search-labels`
#[derive(Debug, Clone, Deserialize)]
pub struct SearchLabelsQuery {
    #[serde(rename = "labelName")]
    pub label_name: Option<String>,
}

/// Image bytes as sent by the client
///
/// A JSON string is stored as its UTF-8 bytes, a JSON array of numbers as raw bytes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ImagePayload {
    Text(String),
    Raw(Vec<u8>),
}

impl ImagePayload {
    #[must_use]
    pub fn into_bytes(self) -> Bytes {
        match self {
            ImagePayload::Text(text) => Bytes::from(text),
            ImagePayload::Raw(raw) => Bytes::from(raw),
        }
    }
}

/// Body of `POST /create-label` before validation
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateLabelRequest {
    pub username: Option<String>,
    pub label_name: Option<String>,
    pub image_content: Option<String>,
    pub image_data: Option<ImagePayload>,
}

/// A create-label request that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLabel {
    pub username: String,
    pub label_name: String,
    pub image_content: String,
    pub image_data: Bytes,
}

impl CreateLabelRequest {
    /// Parse a raw request body
    ///
    /// # Errors
    /// Returns `AppError::BadRequest` if the body is not a JSON object of the expected shape
    pub fn from_slice(body: &[u8]) -> Result<Self, AppError> {
        Ok(serde_json::from_slice(body)?)
    }

    /// Check required fields, collecting every problem
    ///
    /// # Errors
    /// Returns `AppError::Validation` mapping each bad field to its problem
    pub fn validate(self) -> Result<NewLabel, AppError> {
        let mut errors = BTreeMap::new();

        let username = required_name("username", self.username, &mut errors);
        let label_name = required_name("label_name", self.label_name, &mut errors);

        if self.image_content.is_none() {
            errors.insert("image_content".to_string(), "field is required".to_string());
        }

        let image_data = match self.image_data.map(ImagePayload::into_bytes) {
            Some(data) if data.is_empty() => {
                errors.insert("image_data".to_string(), "must not be empty".to_string());
                None
            }
            Some(data) => Some(data),
            None => {
                errors.insert("image_data".to_string(), "field is required".to_string());
                None
            }
        };

        match (username, label_name, self.image_content, image_data) {
            (Some(username), Some(label_name), Some(image_content), Some(image_data))
                if errors.is_empty() =>
            {
                Ok(NewLabel { username, label_name, image_content, image_data })
            }
            _ => Err(AppError::Validation { errors }),
        }
    }
}

fn required_name(
    field: &str,
    value: Option<String>,
    errors: &mut BTreeMap<String, String>,
) -> Option<String> {
    match value {
        Some(value) if value.trim().is_empty() => {
            errors.insert(field.to_string(), "must not be empty".to_string());
            None
        }
        Some(value) => Some(value),
        None => {
            errors.insert(field.to_string(), "field is required".to_string());
            None
        }
    }
}
