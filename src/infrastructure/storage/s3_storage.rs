use async_trait::async_trait;
use aws_config::{timeout::TimeoutConfig, BehaviorVersion, Region};
use aws_sdk_s3::{error::DisplayErrorContext, primitives::ByteStream, Client};
use bytes::Bytes;
use std::path::Path;
use std::time::Duration;

use super::{write_download, ObjectStorage, ObjectSummary, StorageError};
use crate::infrastructure::config::StorageConfig;

/// S3-backed object storage bound to a single bucket
#[derive(Clone)]
pub struct S3ObjectStorage {
    client: Client,
    bucket: String,
}

impl S3ObjectStorage {
    /// Build a client from the ambient AWS configuration plus service overrides
    pub async fn from_config(config: &StorageConfig) -> Self {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .load()
            .await;

        let timeouts = TimeoutConfig::builder()
            .operation_timeout(Duration::from_secs(config.operation_timeout_seconds))
            .connect_timeout(Duration::from_secs(config.operation_timeout_seconds.min(10)))
            .build();

        let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config)
            .timeout_config(timeouts)
            .force_path_style(config.force_path_style);

        if let Some(endpoint) = &config.endpoint_url {
            tracing::info!(endpoint = %endpoint, "Using custom S3 endpoint");
            builder = builder.endpoint_url(endpoint);
        }

        Self::new(Client::from_conf(builder.build()), config.bucket.clone())
    }

    /// Wrap an existing client
    #[must_use]
    pub fn new(client: Client, bucket: String) -> Self {
        Self { client, bucket }
    }
}

fn backend_error<E>(operation: &str, error: E) -> StorageError
where
    E: std::error::Error + Send + Sync + 'static,
{
    StorageError::Backend { message: format!("{operation}: {}", DisplayErrorContext(error)) }
}

fn format_timestamp(timestamp: &aws_sdk_s3::primitives::DateTime) -> Option<String> {
    chrono::DateTime::from_timestamp(timestamp.secs(), timestamp.subsec_nanos())
        .map(|t| t.to_rfc3339())
}

#[async_trait]
impl ObjectStorage for S3ObjectStorage {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> Result<(), StorageError> {
        let size = data.len();

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(data))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| backend_error("put_object", e.into_service_error()))?;

        tracing::debug!(bucket = %self.bucket, key, size, "Stored object");
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Bytes, StorageError> {
        let output =
            self.client.get_object().bucket(&self.bucket).key(key).send().await.map_err(|e| {
                let service_error = e.into_service_error();
                if service_error.is_no_such_key() {
                    StorageError::NotFound { key: key.to_string() }
                } else {
                    backend_error("get_object", service_error)
                }
            })?;

        let data = output
            .body
            .collect()
            .await
            .map_err(|e| backend_error("get_object body", e))?
            .into_bytes();

        tracing::debug!(bucket = %self.bucket, key, size = data.len(), "Fetched object");
        Ok(data)
    }

    async fn list(&self) -> Result<Vec<ObjectSummary>, StorageError> {
        let mut objects = Vec::new();
        let mut continuation_token = None;

        loop {
            let response = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .set_continuation_token(continuation_token.take())
                .send()
                .await
                .map_err(|e| backend_error("list_objects_v2", e.into_service_error()))?;

            objects.extend(response.contents().iter().map(|object| ObjectSummary {
                key: object.key().unwrap_or_default().to_string(),
                size: object.size().unwrap_or_default(),
                last_modified: object.last_modified().and_then(format_timestamp),
                e_tag: object.e_tag().map(ToOwned::to_owned),
            }));

            if response.is_truncated() != Some(true) {
                break;
            }
            continuation_token = response.next_continuation_token().map(ToOwned::to_owned);
            if continuation_token.is_none() {
                break;
            }
        }

        tracing::debug!(bucket = %self.bucket, count = objects.len(), "Listed objects");
        Ok(objects)
    }

    async fn download(&self, key: &str, destination: &Path) -> Result<u64, StorageError> {
        let data = self.get(key).await?;
        write_download(destination, &data).await
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| backend_error("delete_object", e.into_service_error()))?;

        tracing::info!(bucket = %self.bucket, key, "Deleted object");
        Ok(())
    }

    async fn health_check(&self) -> Result<(), StorageError> {
        self.client
            .head_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .map_err(|e| backend_error("head_bucket", e.into_service_error()))?;
        Ok(())
    }
}
