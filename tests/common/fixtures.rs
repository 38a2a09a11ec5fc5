use async_trait::async_trait;
use bytes::Bytes;
use label_image_service::{
    domain::{entities::Label, repositories::LabelRepository},
    infrastructure::{
        config::{
            AppConfig, AuthConfig, DatabaseConfig, LabelsConfig, LogFormat, LoggingConfig,
            MissingImagePolicy, RuntimeMode, ServerConfig, StorageConfig,
        },
        http::create_app,
        storage::{write_download, ObjectStorage, ObjectSummary, StorageError},
    },
    presentation::{
        handlers::AppState,
        middleware::{auth::Claims, error::AppError, JwtService},
    },
};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::test_app::TestApp;

pub const SECRET: &str = "integration-secret";
pub const DIAGNOSTIC_KEY: &str = "make-04-00043-g008-550.jpg";

pub fn test_config(download_path: &Path, policy: MissingImagePolicy) -> AppConfig {
    AppConfig {
        mode: RuntimeMode::Local,
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            max_upload_size: 1_000_000,
            request_timeout_seconds: 5,
        },
        auth: AuthConfig { secret_key: SECRET.to_string() },
        database: DatabaseConfig {
            uri: "mongodb://localhost:27017".to_string(),
            name: "labels".to_string(),
            collection: "labelsInfo".to_string(),
            timeout_seconds: 5,
        },
        storage: StorageConfig {
            bucket: "labelsimages".to_string(),
            region: "us-east-1".to_string(),
            endpoint_url: None,
            force_path_style: false,
            operation_timeout_seconds: 5,
            diagnostic_key: DIAGNOSTIC_KEY.to_string(),
            download_path: download_path.to_string_lossy().into_owned(),
        },
        labels: LabelsConfig { missing_image_policy: policy },
        logging: LoggingConfig { level: "debug".to_string(), format: LogFormat::Pretty },
    }
}

/// Bearer header value for a token that is valid for an hour
pub fn bearer(username: &str) -> String {
    format!("Bearer {}", token(username))
}

pub fn token(username: &str) -> String {
    JwtService::new(SECRET).encode_claims(&Claims::new(username, 3600)).unwrap()
}

pub fn expired_token(username: &str) -> String {
    let claims = Claims { username: username.to_string(), exp: Some(1_000), iat: Some(0) };
    JwtService::new(SECRET).encode_claims(&claims).unwrap()
}

pub fn label(username: &str, label_name: &str, image_content: &str) -> Label {
    Label::new(username.to_string(), label_name.to_string(), image_content.to_string())
}

#[derive(Clone, Default)]
pub struct FakeLabelStore {
    labels: Arc<Mutex<Vec<Label>>>,
    calls: Arc<AtomicUsize>,
    fail_inserts: bool,
    fail_queries: bool,
}

impl FakeLabelStore {
    pub fn with_labels(labels: Vec<Label>) -> Self {
        Self { labels: Arc::new(Mutex::new(labels)), ..Self::default() }
    }

    pub fn failing_inserts(mut self) -> Self {
        self.fail_inserts = true;
        self
    }

    pub fn failing_queries(mut self) -> Self {
        self.fail_queries = true;
        self
    }

    pub fn labels(&self) -> Vec<Label> {
        self.labels.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn matching(&self, predicate: impl Fn(&Label) -> bool) -> Result<Vec<Label>, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_queries {
            return Err(AppError::Database { message: "server selection timeout".to_string() });
        }
        Ok(self.labels.lock().unwrap().iter().filter(|l| predicate(l)).cloned().collect())
    }
}

#[async_trait]
impl LabelRepository for FakeLabelStore {
    type Error = AppError;

    async fn insert(&self, label: &Label) -> Result<(), Self::Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_inserts {
            return Err(AppError::Database { message: "write concern error".to_string() });
        }
        self.labels.lock().unwrap().push(label.clone());
        Ok(())
    }

    async fn find_by_username(&self, username: &str) -> Result<Vec<Label>, Self::Error> {
        self.matching(|l| l.username == username)
    }

    async fn find_by_label_name(&self, label_name: &str) -> Result<Vec<Label>, Self::Error> {
        self.matching(|l| l.label_name == label_name)
    }

    async fn health_check(&self) -> Result<(), Self::Error> {
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct FakeBucket {
    objects: Arc<Mutex<BTreeMap<String, (Bytes, String)>>>,
    calls: Arc<AtomicUsize>,
    fail_writes: bool,
}

impl FakeBucket {
    pub fn with_object(self, key: &str, data: &[u8]) -> Self {
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), (Bytes::copy_from_slice(data), "image/jpg".to_string()));
        self
    }

    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn object(&self, key: &str) -> Option<(Bytes, String)> {
        self.objects.lock().unwrap().get(key).cloned()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn touch(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ObjectStorage for FakeBucket {
    fn bucket(&self) -> &str {
        "labelsimages"
    }

    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> Result<(), StorageError> {
        self.touch();
        if self.fail_writes {
            return Err(StorageError::Backend { message: "AccessDenied".to_string() });
        }
        self.objects.lock().unwrap().insert(key.to_string(), (data, content_type.to_string()));
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Bytes, StorageError> {
        self.touch();
        self.object(key)
            .map(|(data, _)| data)
            .ok_or_else(|| StorageError::NotFound { key: key.to_string() })
    }

    async fn list(&self) -> Result<Vec<ObjectSummary>, StorageError> {
        self.touch();
        Ok(self
            .objects
            .lock()
            .unwrap()
            .iter()
            .map(|(key, (data, _))| ObjectSummary {
                key: key.clone(),
                size: i64::try_from(data.len()).unwrap(),
                last_modified: Some("2024-01-01T00:00:00+00:00".to_string()),
                e_tag: Some("\"etag\"".to_string()),
            })
            .collect())
    }

    async fn download(&self, key: &str, destination: &Path) -> Result<u64, StorageError> {
        let data = self.get(key).await?;
        write_download(destination, &data).await
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.touch();
        self.objects.lock().unwrap().remove(key);
        Ok(())
    }

    async fn health_check(&self) -> Result<(), StorageError> {
        Ok(())
    }
}

/// A full router over fake stores, plus handles to inspect them
pub struct Fixture {
    pub app: TestApp,
    pub labels: FakeLabelStore,
    pub bucket: FakeBucket,
    pub download_dir: tempfile::TempDir,
}

impl Fixture {
    pub fn new(labels: FakeLabelStore, bucket: FakeBucket) -> Self {
        Self::with_policy(labels, bucket, MissingImagePolicy::Fail)
    }

    pub fn with_policy(
        labels: FakeLabelStore,
        bucket: FakeBucket,
        policy: MissingImagePolicy,
    ) -> Self {
        let download_dir = tempfile::tempdir().unwrap();
        let config = test_config(&download_dir.path().join("downloaded_image.jpg"), policy);
        let state =
            AppState::new(&config, Arc::new(labels.clone()), Arc::new(bucket.clone()));

        Self { app: TestApp::new(create_app(&config, state)), labels, bucket, download_dir }
    }

    pub fn downloaded_file(&self) -> std::path::PathBuf {
        self.download_dir.path().join("downloaded_image.jpg")
    }
}
