use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::test_api;

/// Suite a persisted row belongs to, keyed the way the web UI groups results
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Suite {
    #[serde(rename = "BaseTestResMap")]
    Base,
    #[serde(rename = "FileIOResMap")]
    FileIo,
    #[serde(rename = "SpreadsheetRes")]
    Spreadsheet,
    #[serde(rename = "DocumentProRes")]
    DocumentPro,
    #[serde(rename = "TableRes")]
    Table,
    #[serde(rename = "SystemRes")]
    System,
}

impl Suite {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Base => "BaseTestResMap",
            Self::FileIo => "FileIOResMap",
            Self::Spreadsheet => "SpreadsheetRes",
            Self::DocumentPro => "DocumentProRes",
            Self::Table => "TableRes",
            Self::System => "SystemRes",
        }
    }
}

/// Status reported by the progress endpoint, serialized as its number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TestStatus {
    Finished = 0,
    Processing = 1,
    Error = 2,
}

impl Serialize for TestStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(*self as u8)
    }
}

/// Persisted, flattened test result
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TestApi {
    pub id: Uuid,
    pub test_id: Uuid,
    pub test_type: String,
    pub api_name: String,
    pub success: bool,
    pub http_code: i32,
    pub http_resp: String,
    pub err_msg: String,
    pub path_str: String,
    pub body_req: String,
    pub query: String,
    pub form_data: String,
    pub file_ext: String,
    pub time_consuming: String,
    pub start_time: i64,
    #[schema(value_type = String)]
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<test_api::Model> for TestApi {
    fn from(model: test_api::Model) -> Self {
        Self {
            id: model.id,
            test_id: model.test_id,
            test_type: model.test_type,
            api_name: model.api_name,
            success: model.success,
            http_code: model.http_code,
            http_resp: model.http_resp,
            err_msg: model.err_msg,
            path_str: model.path_str,
            body_req: model.body_req,
            query: model.query,
            form_data: model.form_data,
            file_ext: model.file_ext,
            time_consuming: model.time_consuming,
            start_time: model.start_time,
            created_at: model.created_at,
        }
    }
}

/// Row to insert at the end of a run
#[derive(Debug, Clone, PartialEq)]
pub struct NewTestApi {
    pub test_id: Uuid,
    pub test_type: Suite,
    pub api_name: String,
    pub success: bool,
    pub http_code: i32,
    pub http_resp: String,
    pub err_msg: String,
    pub path_str: String,
    pub body_req: String,
    pub query: String,
    pub form_data: String,
    pub file_ext: String,
    pub time_consuming: String,
    pub start_time: i64,
}
