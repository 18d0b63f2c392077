use serde_json::json;
use uuid::Uuid;

use sdk_demo::entity::test_api::Model;
use sdk_demo::models::Suite;
use sdk_demo::sdk::{Reply, ScriptedTransport, ShimoSdkApi};

/// Scripts common vendor behaviour
pub struct Vendor<'a> {
    transport: &'a ScriptedTransport,
}

#[allow(dead_code)]
impl<'a> Vendor<'a> {
    pub fn new(transport: &'a ScriptedTransport) -> Self {
        Self { transport }
    }

    /// Imports accept the upload and finish on the first progress check
    pub async fn imports_succeed(&self) {
        self.transport
            .on(
                ShimoSdkApi::ImportFile,
                vec![Reply::ok(json!({"status": 0, "data": {"taskId": "import-task"}}))],
            )
            .await;
        self.transport
            .on(
                ShimoSdkApi::ImportFileProgress,
                vec![Reply::ok(json!({"status": 0, "data": {"progress": 100}}))],
            )
            .await;
    }

    /// Every listed operation answers 200 with an empty object
    pub async fn accept(&self, apis: &[ShimoSdkApi]) {
        for api in apis {
            self.transport.on(*api, vec![Reply::ok(json!({}))]).await;
        }
    }

    /// Successive sheet reads answer with these first cells of rows 0..n
    pub async fn sheet_reads(&self, reads: &[&[&str]]) {
        let replies = reads
            .iter()
            .map(|rows| {
                let values: Vec<_> = rows.iter().map(|cell| json!([cell, "", ""])).collect();
                Reply::ok(json!({ "values": values }))
            })
            .collect();
        self.transport.on(ShimoSdkApi::GetTableContent, replies).await;
    }

    pub async fn app_detail(&self, endpoint_url: &str) {
        self.transport
            .on(
                ShimoSdkApi::GetAppDetail,
                vec![Reply::ok(json!({
                    "appId": "test-app",
                    "endpointUrl": endpoint_url,
                    "activatedUserCount": 3
                }))],
            )
            .await;
    }
}

/// Persisted row as the mock database would return it
#[allow(dead_code)]
pub fn test_api_row(test_id: Uuid, suite: Suite, api_name: &str, success: bool) -> Model {
    Model {
        id: Uuid::new_v4(),
        test_id,
        test_type: suite.as_str().to_string(),
        api_name: api_name.to_string(),
        success,
        http_code: if success { 200 } else { 500 },
        http_resp: "{}".to_string(),
        err_msg: if success { String::new() } else { "boom".to_string() },
        path_str: "http://sdk.test/sdk/v2/api/files".to_string(),
        body_req: String::new(),
        query: String::new(),
        form_data: String::new(),
        file_ext: String::new(),
        time_consuming: "12ms".to_string(),
        start_time: 1_700_000_000_000,
        created_at: time::OffsetDateTime::now_utc(),
    }
}
