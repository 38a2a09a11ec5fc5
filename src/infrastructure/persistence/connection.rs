use crate::infrastructure::config::DatabaseConfig;
use mongodb::{bson::doc, options::ClientOptions, Client};
use std::time::Duration;
use tracing::info;

/// MongoDB client bound to the configured database
#[derive(Clone)]
pub struct Database {
    client: Client,
    database: mongodb::Database,
}

impl Database {
    /// Connect to MongoDB and verify the deployment answers a ping
    ///
    /// # Errors
    /// Returns an error if the URI is invalid or the server is unreachable
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, mongodb::error::Error> {
        let mut options = ClientOptions::parse(config.uri.as_str()).await?;
        let timeout = Duration::from_secs(config.timeout_seconds);
        options.connect_timeout = Some(timeout);
        options.server_selection_timeout = Some(timeout);
        if options.app_name.is_none() {
            options.app_name = Some("label-image-service".to_string());
        }

        let client = Client::with_options(options)?;
        let database = client.database(&config.name);

        info!(database = %config.name, "Connecting to MongoDB");
        database.run_command(doc! { "ping": 1 }).await?;
        info!(database = %config.name, "Successfully connected to MongoDB");

        Ok(Self { client, database })
    }

    /// Get a handle to the configured database
    #[must_use]
    pub fn database(&self) -> &mongodb::Database {
        &self.database
    }

    /// Check if the deployment is reachable
    ///
    /// # Errors
    /// Returns an error if the ping command fails
    pub async fn health_check(&self) -> Result<(), mongodb::error::Error> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    /// Shut down the client, waiting for in-flight operations
    pub async fn close(self) {
        info!("Closing MongoDB client");
        self.client.shutdown().await;
    }
}
