use crate::domain::entities::Label;
use async_trait::async_trait;

/// Repository trait for label metadata persistence
#[async_trait]
pub trait LabelRepository: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Insert a label document
    async fn insert(&self, label: &Label) -> Result<(), Self::Error>;

    /// Find every label owned by a user, without limit
    async fn find_by_username(&self, username: &str) -> Result<Vec<Label>, Self::Error>;

    /// Find every label with the given name across all users
    async fn find_by_label_name(&self, label_name: &str) -> Result<Vec<Label>, Self::Error>;

    /// Health check for repository connectivity
    async fn health_check(&self) -> Result<(), Self::Error>;
}
