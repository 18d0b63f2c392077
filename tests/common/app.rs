use std::sync::Arc;

use async_trait::async_trait;
use axum_test::TestServer;
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
use tempfile::TempDir;

use sdk_demo::build_router;
use sdk_demo::config::Config;
use sdk_demo::sdk::ScriptedTransport;
use sdk_demo::services::{
    BatchTester, LocalPlaceholderStore, PlaceholderStore, ProgressHandle, StorageError,
};
use sdk_demo::state::AppState;

/// Test configuration; seat calls are not paced
pub fn test_config() -> Config {
    Config::from_toml_str(
        r#"
[server]
host = "127.0.0.1"
port = 0

[shimoSDK]
host = "http://sdk.test"
appId = "test-app"
appSecret = "test-app-secret"
callbackVersion = "v2"

[jwt]
secret = "test-jwt-secret-that-is-at-least-32-characters-long"

[sdkctl]
userId = 7
resourcesDir = "resources"
importTimeoutSecs = 5
exportTimeoutSecs = 5
systemCallIntervalMs = 0
seatTestUserIds = ["seat-user-1"]
"#,
    )
    .expect("Failed to parse test config")
}

/// Test application wrapper
#[allow(dead_code)]
pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
    pub transport: ScriptedTransport,
    pub storage_dir: TempDir,
}

#[allow(dead_code)]
impl TestApp {
    /// Application backed by an empty mock database
    pub fn new() -> Self {
        Self::with_db(MockDatabase::new(DatabaseBackend::Postgres).into_connection())
    }

    /// Application backed by a prepared mock database
    pub fn with_db(db: DatabaseConnection) -> Self {
        let storage_dir = TempDir::new().expect("Failed to create storage dir");
        let storage = Arc::new(LocalPlaceholderStore::new(storage_dir.path()));
        Self::build(db, storage, storage_dir)
    }

    /// Application whose placeholder store rejects every write
    pub fn with_failing_storage() -> Self {
        let storage_dir = TempDir::new().expect("Failed to create storage dir");
        Self::build(
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
            Arc::new(FailingStore),
            storage_dir,
        )
    }

    fn build(
        db: DatabaseConnection,
        storage: Arc<dyn PlaceholderStore>,
        storage_dir: TempDir,
    ) -> Self {
        let transport = ScriptedTransport::new();
        let state = AppState::with_parts(test_config(), db, Arc::new(transport.clone()), storage);

        let router = build_router(state.clone());
        let server = TestServer::new(router).expect("Failed to create test server");

        Self {
            server,
            state,
            transport,
            storage_dir,
        }
    }

    /// Batch tester wired to the scripted vendor
    pub fn batch_tester(&self) -> BatchTester {
        self.state.batch_tester(ProgressHandle::new())
    }
}

/// Placeholder store whose disk is always full
pub struct FailingStore;

#[async_trait]
impl PlaceholderStore for FailingStore {
    async fn put_placeholder(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Io(std::io::Error::other("disk full")))
    }
}
