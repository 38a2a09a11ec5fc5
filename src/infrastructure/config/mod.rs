use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::SocketAddr;

/// Runtime mode for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeMode {
    Local,
    Production,
}

impl std::fmt::Display for RuntimeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Production => write!(f, "production"),
        }
    }
}

impl std::str::FromStr for RuntimeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" | "prod" => Ok(Self::Production),
            _ => Err(format!("Invalid runtime mode: {s}. Valid values: local, production")),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub mode: RuntimeMode,
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub labels: LabelsConfig,
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_upload_size: u64, // bytes
    pub request_timeout_seconds: u64,
}

/// Token verification settings
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub secret_key: String,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig").field("secret_key", &"<redacted>").finish()
    }
}

/// Metadata store (MongoDB) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub uri: String,
    pub name: String,
    pub collection: String,
    pub timeout_seconds: u64,
}

/// Object store (S3) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub bucket: String,
    pub region: String,
    pub endpoint_url: Option<String>,
    pub force_path_style: bool,
    pub operation_timeout_seconds: u64,
    /// Object fetched by the `/download-image` smoke test
    pub diagnostic_key: String,
    pub download_path: String,
}

/// What to do when a label's image cannot be read back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingImagePolicy {
    /// Fail the whole request
    #[default]
    Fail,
    /// Omit the entry and log a warning
    Skip,
}

/// Label query behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelsConfig {
    pub missing_image_policy: MissingImagePolicy,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Unprefixed variables accepted for compatibility with existing deployments
const LEGACY_VARIABLES: &[(&str, &str)] = &[
    ("SECRET_KEY", "auth.secret_key"),
    ("MONGO_URI", "database.uri"),
    ("MONGO_DB_NAME", "database.name"),
    ("S3_BUCKET", "storage.bucket"),
    ("AWS_REGION", "storage.region"),
    ("S3_ENDPOINT_URL", "storage.endpoint_url"),
];

impl AppConfig {
    /// Load configuration based on runtime mode
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or invalid
    pub fn load() -> Result<Self, config::ConfigError> {
        let mode = std::env::var("RUN_MODE")
            .unwrap_or_else(|_| "local".to_string())
            .parse::<RuntimeMode>()
            .map_err(config::ConfigError::Message)?;

        Self::load_for_mode(mode)
    }

    /// Load configuration for a specific runtime mode
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or invalid
    pub fn load_for_mode(mode: RuntimeMode) -> Result<Self, config::ConfigError> {
        Self::load_with_variables(mode, None)
    }

    /// Load from an explicit variable set, or the process environment when `None`
    fn load_with_variables(
        mode: RuntimeMode,
        variables: Option<HashMap<String, String>>,
    ) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        if mode == RuntimeMode::Local {
            builder = builder.add_source(config::File::with_name(".env.local").required(false));
        }

        let legacy: Vec<(&str, Option<String>)> = LEGACY_VARIABLES
            .iter()
            .map(|(variable, key)| {
                let value = match &variables {
                    Some(variables) => variables.get(*variable).cloned(),
                    None => std::env::var(variable).ok(),
                };
                (*key, value)
            })
            .collect();

        // LABEL_SERVICE_SERVER__PORT -> server.port
        builder = builder.add_source(
            config::Environment::with_prefix("LABEL_SERVICE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(variables),
        );

        for (key, value) in legacy {
            builder = builder.set_override_option(key, value)?;
        }

        let log_format = match mode {
            RuntimeMode::Local => "pretty",
            RuntimeMode::Production => "json",
        };

        let settings = builder
            .set_default("mode", mode.to_string())?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 5001)?
            .set_default("server.max_upload_size", 25_000_000)? // 25MB
            .set_default("server.request_timeout_seconds", 30)?
            .set_default("auth.secret_key", "")?
            .set_default("database.uri", "")?
            .set_default("database.name", "labels")?
            .set_default("database.collection", "labelsInfo")?
            .set_default("database.timeout_seconds", 10)?
            .set_default("storage.bucket", "labelsimages")?
            .set_default("storage.region", "us-east-1")?
            .set_default("storage.endpoint_url", None::<String>)?
            .set_default("storage.force_path_style", false)?
            .set_default("storage.operation_timeout_seconds", 20)?
            .set_default("storage.diagnostic_key", "make-04-00043-g008-550.jpg")?
            .set_default("storage.download_path", "downloaded_image.jpg")?
            .set_default("labels.missing_image_policy", "fail")?
            .set_default("logging.level", "info")?
            .set_default("logging.format", log_format)?
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the service cannot start with
    ///
    /// # Errors
    /// Returns an error naming the first missing required value
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.auth.secret_key.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "SECRET_KEY (auth.secret_key) must be set".to_string(),
            ));
        }
        if self.database.uri.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "MONGO_URI (database.uri) must be set".to_string(),
            ));
        }
        if self.storage.bucket.trim().is_empty() {
            return Err(config::ConfigError::Message("storage.bucket must not be empty".to_string()));
        }
        Ok(())
    }
}

impl ServerConfig {
    /// Get the socket address for binding
    ///
    /// # Errors
    /// Returns an error if the host/port pair is not a valid socket address
    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}
