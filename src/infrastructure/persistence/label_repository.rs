use crate::presentation::middleware::error::AppError;
use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, Document},
    Collection,
};
use serde::{Deserialize, Serialize};

use super::Database;
use crate::domain::entities::Label;
use crate::domain::repositories::LabelRepository;
use crate::domain::value_objects::ObjectKey;

/// Stored shape of a label in the `labelsInfo` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub username: String,
    pub label_name: String,
    pub image_url: String,
    pub image_content: String,
}

impl From<&Label> for LabelDocument {
    fn from(label: &Label) -> Self {
        Self {
            id: None,
            username: label.username.clone(),
            label_name: label.label_name.clone(),
            image_url: label.image_url.as_str().to_string(),
            image_content: label.image_content.clone(),
        }
    }
}

impl From<LabelDocument> for Label {
    fn from(document: LabelDocument) -> Self {
        Label::from_parts(
            document.username,
            document.label_name,
            ObjectKey::from(document.image_url),
            document.image_content,
        )
    }
}

/// MongoDB implementation of `LabelRepository`
#[derive(Clone)]
pub struct MongoLabelRepository {
    database: Database,
    collection: Collection<LabelDocument>,
}

impl MongoLabelRepository {
    /// Create a repository over the named collection
    #[must_use]
    pub fn new(database: Database, collection_name: &str) -> Self {
        let collection = database.database().collection::<LabelDocument>(collection_name);
        Self { database, collection }
    }

    async fn find(&self, filter: Document) -> Result<Vec<Label>, AppError> {
        let documents: Vec<LabelDocument> =
            self.collection.find(filter).await?.try_collect().await?;
        Ok(documents.into_iter().map(Label::from).collect())
    }
}

#[async_trait]
impl LabelRepository for MongoLabelRepository {
    type Error = AppError;

    async fn insert(&self, label: &Label) -> Result<(), Self::Error> {
        let result = self.collection.insert_one(LabelDocument::from(label)).await?;
        tracing::debug!(inserted_id = %result.inserted_id, "Inserted label document");
        Ok(())
    }

    async fn find_by_username(&self, username: &str) -> Result<Vec<Label>, Self::Error> {
        self.find(doc! { "username": username }).await
    }

    async fn find_by_label_name(&self, label_name: &str) -> Result<Vec<Label>, Self::Error> {
        self.find(doc! { "label_name": label_name }).await
    }

    async fn health_check(&self) -> Result<(), Self::Error> {
        self.database.health_check().await.map_err(AppError::from)
    }
}
