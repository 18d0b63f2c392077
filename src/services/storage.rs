use std::path::PathBuf;

use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Registers an object for a freshly created file before it can be previewed
#[async_trait]
pub trait PlaceholderStore: Send + Sync {
    async fn put_placeholder(&self, key: &str) -> Result<(), StorageError>;
}

/// Writes empty placeholder objects under a local directory
pub struct LocalPlaceholderStore {
    root: PathBuf,
}

impl LocalPlaceholderStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl PlaceholderStore for LocalPlaceholderStore {
    async fn put_placeholder(&self, key: &str) -> Result<(), StorageError> {
        if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
            return Err(StorageError::InvalidKey(key.to_string()));
        }

        tokio::fs::create_dir_all(&self.root).await?;
        tokio::fs::write(self.root.join(key), b"").await?;

        tracing::debug!(key, "Stored placeholder object");
        Ok(())
    }
}
