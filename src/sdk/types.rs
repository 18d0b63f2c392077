use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Per-call credentials
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Auth {
    pub token: String,
    pub signature: String,
    /// Only sent for callback version v2
    pub user_uuid: Option<String>,
}

/// Body of an async task response (import, export)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskResponse {
    #[serde(default)]
    pub status: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: TaskData,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskData {
    #[serde(default)]
    pub task_id: String,
    #[serde(default)]
    pub progress: i64,
    #[serde(default)]
    pub download_url: String,
}

/// App details; unknown fields are kept so they can be compared untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppDetail {
    #[serde(default)]
    pub app_id: String,
    #[serde(default)]
    pub endpoint_url: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Import from a local file or a remote URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportSource {
    Path(PathBuf),
    Url(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct SheetValues {
    pub range: String,
    pub resource: SheetResource,
}

#[derive(Debug, Clone, Serialize)]
pub struct SheetResource {
    pub values: Vec<Vec<Value>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replacement {
    pub bookmark: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

impl Replacement {
    pub fn text(bookmark: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            bookmark: bookmark.into(),
            kind: "text".to_string(),
            value: value.into(),
        }
    }
}
