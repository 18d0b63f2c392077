use std::sync::Arc;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sqlx::postgres::PgPool;

use crate::config::Config;
use crate::sdk::{HttpTransport, SdkTransport, ShimoSdk};
use crate::services::{
    ApiTester, BatchTester, LocalPlaceholderStore, PlaceholderStore, ProgressHandle, RunRegistry,
    Signer,
};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// SeaORM database connection (primary for queries)
    pub db: Arc<DatabaseConnection>,
    pub config: Config,
    pub sdk: ShimoSdk,
    pub signer: Signer,
    pub storage: Arc<dyn PlaceholderStore>,
    /// Progress of background batch runs
    pub runs: RunRegistry,
}

impl AppState {
    /// Connect to the database, run migrations and build the vendor client
    pub async fn new(config: Config) -> Result<Self, AppStateError> {
        // Connect to PostgreSQL with SQLx (for migrations)
        let pg_pool = PgPool::connect(&config.database.url)
            .await
            .map_err(|e| AppStateError::Postgres(e.to_string()))?;

        // Run migrations
        sqlx::migrate!("./migrations")
            .run(&pg_pool)
            .await
            .map_err(|e| AppStateError::Migration(e.to_string()))?;

        // Connect to PostgreSQL with SeaORM
        let mut opt = ConnectOptions::new(&config.database.url);
        opt.max_connections(config.database.max_connections)
            .min_connections(1)
            .sqlx_logging(true);

        let db = Database::connect(opt)
            .await
            .map_err(|e| AppStateError::Postgres(e.to_string()))?;

        let transport = HttpTransport::new(config.shimo_sdk.request_timeout())
            .map_err(|e| AppStateError::Sdk(e.to_string()))?;
        let storage = Arc::new(LocalPlaceholderStore::new(&config.sdkctl.storage_dir));

        Ok(Self::with_parts(config, db, Arc::new(transport), storage))
    }

    /// Assemble state from existing parts (for testing)
    pub fn with_parts(
        config: Config,
        db: DatabaseConnection,
        transport: Arc<dyn SdkTransport>,
        storage: Arc<dyn PlaceholderStore>,
    ) -> Self {
        let sdk = ShimoSdk::new(&config.shimo_sdk.host, &config.shimo_sdk.app_id, transport);
        let signer = Signer::new(&config);

        Self {
            db: Arc::new(db),
            config,
            sdk,
            signer,
            storage,
            runs: RunRegistry::new(),
        }
    }

    pub fn api_tester(&self) -> ApiTester {
        ApiTester::new(
            self.sdk.clone(),
            self.signer.clone(),
            self.storage.clone(),
            &self.config,
        )
    }

    /// Batch tester reporting into the given progress handle
    pub fn batch_tester(&self, progress: ProgressHandle) -> BatchTester {
        BatchTester::new(self.api_tester(), &self.config.sdkctl, progress)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppStateError {
    #[error("PostgreSQL connection error: {0}")]
    Postgres(String),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("SDK client error: {0}")]
    Sdk(String),
}
