use crate::models::Order;
use mongodb::{bson::doc, options::ClientOptions, Client as MongoClient, Collection, Database};
use service_core::error::AppError;
use std::time::Duration;

const APP_NAME: &str = "invoice-service";
// Readiness probes and lookups should fail fast when no server is reachable.
const SERVER_SELECTION_TIMEOUT: Duration = Duration::from_secs(5);

/// Read-only handle on the orders database.
#[derive(Clone)]
pub struct MongoDb {
    db: Database,
}

impl MongoDb {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        tracing::info!(database = %database, "Connecting to MongoDB");

        let mut options = ClientOptions::parse(uri).await.map_err(|e| {
            tracing::error!(error = %e, "Invalid MongoDB connection string");
            AppError::from(e)
        })?;
        options.app_name = Some(APP_NAME.to_string());
        options.server_selection_timeout = Some(SERVER_SELECTION_TIMEOUT);

        let client = MongoClient::with_options(options)?;
        tracing::info!(database = %database, "MongoDB client ready");

        Ok(Self {
            db: client.database(database),
        })
    }

    /// Round-trip a `ping` to the configured database.
    pub async fn ping(&self) -> Result<(), AppError> {
        self.db
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "MongoDB ping failed");
                AppError::from(e)
            })?;
        Ok(())
    }

    pub fn orders(&self, collection: &str) -> Collection<Order> {
        self.db.collection(collection)
    }
}
