#[cfg(test)]
pub mod mocks {
    use async_trait::async_trait;
    use bytes::Bytes;
    use std::collections::HashMap;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use crate::domain::{entities::Label, repositories::LabelRepository};
    use crate::infrastructure::storage::{
        write_download, ObjectStorage, ObjectSummary, StorageError,
    };
    use crate::presentation::middleware::error::AppError;

    /// In-memory label repository with failure injection
    #[derive(Clone, Default)]
    pub struct InMemoryLabelRepository {
        labels: Arc<Mutex<Vec<Label>>>,
        fail_inserts: bool,
        fail_queries: bool,
        queries: Arc<AtomicUsize>,
    }

    impl InMemoryLabelRepository {
        pub fn new() -> Self {
            Self::default()
        }

        /// # Panics
        /// Panics if the internal mutex is poisoned
        #[must_use]
        pub fn with_label(self, label: Label) -> Self {
            self.labels.lock().unwrap().push(label);
            self
        }

        #[must_use]
        pub fn failing_inserts(mut self) -> Self {
            self.fail_inserts = true;
            self
        }

        #[must_use]
        pub fn failing_queries(mut self) -> Self {
            self.fail_queries = true;
            self
        }

        /// # Panics
        /// Panics if the internal mutex is poisoned
        pub fn labels(&self) -> Vec<Label> {
            self.labels.lock().unwrap().clone()
        }

        /// Number of find calls served so far
        pub fn query_count(&self) -> usize {
            self.queries.load(Ordering::SeqCst)
        }

        fn find(&self, predicate: impl Fn(&Label) -> bool) -> Result<Vec<Label>, AppError> {
            self.queries.fetch_add(1, Ordering::SeqCst);
            if self.fail_queries {
                return Err(AppError::Database { message: "query failed".to_string() });
            }
            let labels = self.labels.lock().unwrap();
            Ok(labels.iter().filter(|l| predicate(l)).cloned().collect())
        }
    }

    #[async_trait]
    impl LabelRepository for InMemoryLabelRepository {
        type Error = AppError;

        async fn insert(&self, label: &Label) -> Result<(), Self::Error> {
            if self.fail_inserts {
                return Err(AppError::Database { message: "insert failed".to_string() });
            }
            self.labels.lock().unwrap().push(label.clone());
            Ok(())
        }

        async fn find_by_username(&self, username: &str) -> Result<Vec<Label>, Self::Error> {
            self.find(|label| label.username == username)
        }

        async fn find_by_label_name(&self, label_name: &str) -> Result<Vec<Label>, Self::Error> {
            self.find(|label| label.label_name == label_name)
        }

        async fn health_check(&self) -> Result<(), Self::Error> {
            if self.fail_queries {
                return Err(AppError::Database { message: "ping failed".to_string() });
            }
            Ok(())
        }
    }

    /// Object stored by `InMemoryObjectStorage`
    #[derive(Debug, Clone)]
    pub struct StoredObject {
        pub data: Bytes,
        pub content_type: String,
    }

    /// In-memory object storage with failure injection
    #[derive(Clone, Default)]
    pub struct InMemoryObjectStorage {
        objects: Arc<Mutex<HashMap<String, StoredObject>>>,
        fail_writes: bool,
        unavailable: bool,
        read_delay: Option<Duration>,
    }

    impl InMemoryObjectStorage {
        pub fn new() -> Self {
            Self::default()
        }

        /// # Panics
        /// Panics if the internal mutex is poisoned
        #[must_use]
        pub fn with_object(self, key: &str, data: Bytes) -> Self {
            self.objects.lock().unwrap().insert(
                key.to_string(),
                StoredObject { data, content_type: "application/octet-stream".to_string() },
            );
            self
        }

        #[must_use]
        pub fn failing_writes(mut self) -> Self {
            self.fail_writes = true;
            self
        }

        /// Reads stall for `delay` before answering
        #[must_use]
        pub fn with_read_delay(mut self, delay: Duration) -> Self {
            self.read_delay = Some(delay);
            self
        }

        /// Every operation fails as if the bucket were unreachable
        #[must_use]
        pub fn unavailable(mut self) -> Self {
            self.unavailable = true;
            self
        }

        /// # Panics
        /// Panics if the internal mutex is poisoned
        pub fn object(&self, key: &str) -> Option<StoredObject> {
            self.objects.lock().unwrap().get(key).cloned()
        }

        fn check_available(&self) -> Result<(), StorageError> {
            if self.unavailable {
                return Err(StorageError::Backend { message: "bucket unreachable".to_string() });
            }
            Ok(())
        }
    }

    #[async_trait]
    impl ObjectStorage for InMemoryObjectStorage {
        fn bucket(&self) -> &str {
            "labelsimages"
        }

        async fn put(
            &self,
            key: &str,
            data: Bytes,
            content_type: &str,
        ) -> Result<(), StorageError> {
            self.check_available()?;
            if self.fail_writes {
                return Err(StorageError::Backend { message: "write rejected".to_string() });
            }
            self.objects.lock().unwrap().insert(
                key.to_string(),
                StoredObject { data, content_type: content_type.to_string() },
            );
            Ok(())
        }

        async fn get(&self, key: &str) -> Result<Bytes, StorageError> {
            if let Some(delay) = self.read_delay {
                tokio::time::sleep(delay).await;
            }
            self.check_available()?;
            self.object(key)
                .map(|object| object.data)
                .ok_or_else(|| StorageError::NotFound { key: key.to_string() })
        }

        async fn list(&self) -> Result<Vec<ObjectSummary>, StorageError> {
            self.check_available()?;
            let objects = self.objects.lock().unwrap();
            let mut summaries: Vec<ObjectSummary> = objects
                .iter()
                .map(|(key, object)| ObjectSummary {
                    key: key.clone(),
                    size: object.data.len() as i64,
                    last_modified: None,
                    e_tag: None,
                })
                .collect();
            summaries.sort_by(|a, b| a.key.cmp(&b.key));
            Ok(summaries)
        }

        async fn download(&self, key: &str, destination: &Path) -> Result<u64, StorageError> {
            let data = self.get(key).await?;
            write_download(destination, &data).await
        }

        async fn delete(&self, key: &str) -> Result<(), StorageError> {
            self.check_available()?;
            self.objects.lock().unwrap().remove(key);
            Ok(())
        }

        async fn health_check(&self) -> Result<(), StorageError> {
            self.check_available()
        }
    }
}
