//! Progress of background batch runs, scoped per run id.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;
use uuid::Uuid;

/// Count of suites a run has finished
#[derive(Debug, Clone, Default)]
pub struct ProgressHandle(Arc<AtomicU32>);

impl ProgressHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    pub fn value(&self) -> f64 {
        f64::from(self.0.load(Ordering::SeqCst))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunSnapshot {
    pub status: RunStatus,
    pub progress: f64,
    pub error: Option<String>,
}

struct RunEntry {
    status: RunStatus,
    progress: ProgressHandle,
    error: Option<String>,
}

#[derive(Clone, Default)]
pub struct RunRegistry {
    runs: Arc<Mutex<HashMap<Uuid, RunEntry>>>,
}

impl RunRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a new run and hand back its progress counter
    pub async fn register(&self, run_id: Uuid) -> ProgressHandle {
        let progress = ProgressHandle::new();
        let mut runs = self.runs.lock().await;
        runs.insert(
            run_id,
            RunEntry {
                status: RunStatus::Running,
                progress: progress.clone(),
                error: None,
            },
        );
        progress
    }

    /// Forget a run whose rows are persisted; its results live in the table
    pub async fn remove(&self, run_id: Uuid) -> bool {
        let mut runs = self.runs.lock().await;
        runs.remove(&run_id).is_some()
    }

    pub async fn fail(&self, run_id: Uuid, message: impl Into<String>) {
        let mut runs = self.runs.lock().await;
        if let Some(entry) = runs.get_mut(&run_id) {
            entry.status = RunStatus::Failed;
            entry.error = Some(message.into());
        }
    }

    pub async fn get(&self, run_id: Uuid) -> Option<RunSnapshot> {
        let runs = self.runs.lock().await;
        runs.get(&run_id).map(|entry| RunSnapshot {
            status: entry.status,
            progress: entry.progress.value(),
            error: entry.error.clone(),
        })
    }
}
