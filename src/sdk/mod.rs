//! Client facade for the vendor document-collaboration API.
//!
//! Every operation returns an [`SdkCall`]: the decoded outcome plus a
//! [`CallTrace`] of what was sent and received, so callers can record a
//! result whether or not the call succeeded.

pub mod api;
pub mod scripted;
pub mod transport;
pub mod types;

pub use api::ShimoSdkApi;
pub use scripted::{RecordedRequest, Reply, ScriptedTransport};
pub use transport::{FormField, HttpTransport, RawResponse, SdkBody, SdkRequest, SdkTransport};
pub use types::{AppDetail, Auth, ImportSource, Replacement, TaskData, TaskResponse};

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::models::FileType;
use crate::sdk::types::{SheetResource, SheetValues};

#[derive(Debug, Clone, thiserror::Error)]
pub enum SdkError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("IO error: {0}")]
    Io(String),
}

/// What was sent and what came back
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallTrace {
    pub method: String,
    pub url: String,
    pub query: String,
    pub body: String,
    pub form: String,
    /// 0 when no response arrived
    pub status: u16,
    pub response: String,
}

#[derive(Debug, Clone)]
pub struct SdkCall<T> {
    pub outcome: Result<T, SdkError>,
    pub trace: CallTrace,
}

impl<T> SdkCall<T> {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn error_message(&self) -> Option<String> {
        self.outcome.as_ref().err().map(|e| match e {
            SdkError::Status { body, .. } => body.clone(),
            other => other.to_string(),
        })
    }
}

/// Vendor API facade over a pluggable transport
#[derive(Clone)]
pub struct ShimoSdk {
    host: String,
    app_id: String,
    transport: Arc<dyn SdkTransport>,
}

impl ShimoSdk {
    pub fn new(host: &str, app_id: &str, transport: Arc<dyn SdkTransport>) -> Self {
        Self {
            host: host.trim_end_matches('/').to_string(),
            app_id: app_id.to_string(),
            transport,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    fn request(
        &self,
        api: ShimoSdkApi,
        params: &[(&str, &str)],
        query: Vec<(String, String)>,
        body: SdkBody,
        auth: &Auth,
    ) -> SdkRequest {
        let path = api.path(params);
        SdkRequest {
            api,
            method: api.method(),
            url: format!("{}{}", self.host, path),
            path,
            query,
            body,
            auth: auth.clone(),
        }
    }

    /// Send and keep the body as text
    async fn call_raw(&self, request: SdkRequest) -> SdkCall<String> {
        let mut trace = trace_of(&request);

        tracing::debug!(api = request.api.name(), url = %trace.url, "Calling vendor API");

        let outcome = match self.transport.send(&request).await {
            Ok(response) => {
                trace.status = response.status;
                trace.response = response.body.clone();
                if (200..300).contains(&response.status) {
                    Ok(response.body)
                } else {
                    Err(SdkError::Status {
                        status: response.status,
                        body: response.body,
                    })
                }
            }
            Err(e) => Err(e),
        };

        if let Err(e) = &outcome {
            tracing::warn!(api = request.api.name(), error = %e, "Vendor API call failed");
        }

        SdkCall { outcome, trace }
    }

    /// Send and decode the JSON body; an empty body decodes as `null`
    async fn call<T: DeserializeOwned>(&self, request: SdkRequest) -> SdkCall<T> {
        let SdkCall { outcome, trace } = self.call_raw(request).await;
        let outcome = outcome.and_then(|body| {
            let body = if body.trim().is_empty() { "null" } else { body.as_str() };
            serde_json::from_str(body).map_err(|e| SdkError::Decode(e.to_string()))
        });
        SdkCall { outcome, trace }
    }

    // ============ Files ============

    pub async fn create_file(
        &self,
        auth: &Auth,
        file_id: &str,
        file_type: FileType,
        lang: Option<&str>,
    ) -> SdkCall<Value> {
        let mut body = json!({ "fileId": file_id, "fileType": file_type.as_str() });
        if let Some(lang) = lang.filter(|l| !l.is_empty()) {
            body["lang"] = json!(lang);
        }
        let request = self.request(ShimoSdkApi::CreateFile, &[], Vec::new(), SdkBody::Json(body), auth);
        self.call(request).await
    }

    pub async fn create_file_copy(
        &self,
        auth: &Auth,
        origin_file_id: &str,
        target_file_id: &str,
    ) -> SdkCall<Value> {
        let request = self.request(
            ShimoSdkApi::CreateFileCopy,
            &[("fileId", origin_file_id)],
            Vec::new(),
            SdkBody::Json(json!({ "targetFileId": target_file_id })),
            auth,
        );
        self.call(request).await
    }

    pub async fn delete_file(&self, auth: &Auth, file_id: &str) -> SdkCall<Value> {
        let request = self.request(
            ShimoSdkApi::DeleteFile,
            &[("fileId", file_id)],
            Vec::new(),
            SdkBody::Empty,
            auth,
        );
        self.call(request).await
    }

    pub async fn create_preview(&self, auth: &Auth, file_id: &str) -> SdkCall<Value> {
        let request = self.request(
            ShimoSdkApi::CreatePreview,
            &[("fileId", file_id)],
            Vec::new(),
            SdkBody::Empty,
            auth,
        );
        self.call(request).await
    }

    /// Load the rendered preview page; credentials travel in the query
    pub async fn open_preview(&self, auth: &Auth, file_id: &str, lang: &str) -> SdkCall<String> {
        let query = vec![
            ("lang".to_string(), lang.to_string()),
            ("appId".to_string(), self.app_id.clone()),
            ("token".to_string(), auth.token.clone()),
            ("signature".to_string(), auth.signature.clone()),
        ];
        let request = self.request(
            ShimoSdkApi::GetPreview,
            &[("fileId", file_id)],
            query,
            SdkBody::Empty,
            auth,
        );
        self.call_raw(request).await
    }

    pub async fn history_list(
        &self,
        auth: &Auth,
        file_id: &str,
        page_size: u32,
        count: u32,
    ) -> SdkCall<Value> {
        let query = vec![
            ("pageSize".to_string(), page_size.to_string()),
            ("count".to_string(), count.to_string()),
        ];
        let request = self.request(
            ShimoSdkApi::GetHistoryList,
            &[("fileId", file_id)],
            query,
            SdkBody::Empty,
            auth,
        );
        self.call(request).await
    }

    /// Plain GET on a per-file resource
    async fn file_get(&self, api: ShimoSdkApi, auth: &Auth, file_id: &str) -> SdkCall<Value> {
        let request = self.request(api, &[("fileId", file_id)], Vec::new(), SdkBody::Empty, auth);
        self.call(request).await
    }

    pub async fn revision_list(&self, auth: &Auth, file_id: &str) -> SdkCall<Value> {
        self.file_get(ShimoSdkApi::GetRevisionList, auth, file_id).await
    }

    pub async fn plain_text(&self, auth: &Auth, file_id: &str) -> SdkCall<Value> {
        self.file_get(ShimoSdkApi::GetPlainText, auth, file_id).await
    }

    pub async fn plain_text_word_count(&self, auth: &Auth, file_id: &str) -> SdkCall<Value> {
        self.file_get(ShimoSdkApi::GetPlainTextWordCount, auth, file_id).await
    }

    pub async fn mention_at_list(&self, auth: &Auth, file_id: &str) -> SdkCall<Value> {
        self.file_get(ShimoSdkApi::GetMentionAt, auth, file_id).await
    }

    pub async fn comment_count(&self, auth: &Auth, file_id: &str) -> SdkCall<Value> {
        self.file_get(ShimoSdkApi::GetCommentCount, auth, file_id).await
    }

    // ============ Import / Export ============

    pub async fn import_file(
        &self,
        auth: &Auth,
        file_id: &str,
        file_type: FileType,
        source: &ImportSource,
        file_name: &str,
    ) -> SdkCall<TaskResponse> {
        let mut fields = vec![
            FormField::Text {
                name: "fileId".to_string(),
                value: file_id.to_string(),
            },
            FormField::Text {
                name: "type".to_string(),
                value: file_type.as_str().to_string(),
            },
            FormField::Text {
                name: "fileName".to_string(),
                value: file_name.to_string(),
            },
        ];
        fields.push(match source {
            ImportSource::Path(path) => FormField::File {
                name: "file".to_string(),
                path: path.clone(),
                file_name: path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| file_name.to_string()),
            },
            ImportSource::Url(url) => FormField::Text {
                name: "fileUrl".to_string(),
                value: url.clone(),
            },
        });

        let request = self.request(
            ShimoSdkApi::ImportFile,
            &[],
            Vec::new(),
            SdkBody::Multipart(fields),
            auth,
        );
        self.call(request).await
    }

    pub async fn import_progress(&self, auth: &Auth, task_id: &str) -> SdkCall<TaskResponse> {
        let request = self.request(
            ShimoSdkApi::ImportFileProgress,
            &[],
            vec![("taskId".to_string(), task_id.to_string())],
            SdkBody::Empty,
            auth,
        );
        self.call(request).await
    }

    pub async fn export_file(
        &self,
        auth: &Auth,
        file_id: &str,
        export_type: &str,
    ) -> SdkCall<TaskResponse> {
        let request = self.request(
            ShimoSdkApi::ExportFile,
            &[("fileId", file_id)],
            Vec::new(),
            SdkBody::Json(json!({ "type": export_type })),
            auth,
        );
        self.call(request).await
    }

    pub async fn export_progress(&self, auth: &Auth, task_id: &str) -> SdkCall<TaskResponse> {
        let request = self.request(
            ShimoSdkApi::ExportFileProgress,
            &[],
            vec![("taskId".to_string(), task_id.to_string())],
            SdkBody::Empty,
            auth,
        );
        self.call(request).await
    }

    pub async fn export_table_sheets(&self, auth: &Auth, file_id: &str) -> SdkCall<Value> {
        let request = self.request(
            ShimoSdkApi::ExportTableSheets,
            &[("fileId", file_id)],
            Vec::new(),
            SdkBody::Empty,
            auth,
        );
        self.call(request).await
    }

    // ============ Spreadsheet ============

    pub async fn table_content(&self, auth: &Auth, file_id: &str, range: &str) -> SdkCall<Value> {
        let request = self.request(
            ShimoSdkApi::GetTableContent,
            &[("fileId", file_id)],
            vec![("range".to_string(), range.to_string())],
            SdkBody::Empty,
            auth,
        );
        self.call(request).await
    }

    fn sheet_values_body(range: &str, values: Vec<Vec<Value>>) -> SdkBody {
        let body = SheetValues {
            range: range.to_string(),
            resource: SheetResource { values },
        };
        SdkBody::Json(serde_json::to_value(body).unwrap_or(Value::Null))
    }

    pub async fn update_table_content(
        &self,
        auth: &Auth,
        file_id: &str,
        range: &str,
        values: Vec<Vec<Value>>,
    ) -> SdkCall<Value> {
        let request = self.request(
            ShimoSdkApi::UpdateTableContent,
            &[("fileId", file_id)],
            Vec::new(),
            Self::sheet_values_body(range, values),
            auth,
        );
        self.call(request).await
    }

    pub async fn append_table_content(
        &self,
        auth: &Auth,
        file_id: &str,
        range: &str,
        values: Vec<Vec<Value>>,
    ) -> SdkCall<Value> {
        let request = self.request(
            ShimoSdkApi::AppendTableContent,
            &[("fileId", file_id)],
            Vec::new(),
            Self::sheet_values_body(range, values),
            auth,
        );
        self.call(request).await
    }

    pub async fn delete_table_rows(
        &self,
        auth: &Auth,
        file_id: &str,
        sheet_name: &str,
        index: u32,
        count: u32,
    ) -> SdkCall<Value> {
        let index = index.to_string();
        let request = self.request(
            ShimoSdkApi::DeleteTableRow,
            &[("fileId", file_id), ("sheetName", sheet_name), ("index", index.as_str())],
            vec![("count".to_string(), count.to_string())],
            SdkBody::Empty,
            auth,
        );
        self.call(request).await
    }

    pub async fn add_table_sheet(&self, auth: &Auth, file_id: &str, name: &str) -> SdkCall<Value> {
        let request = self.request(
            ShimoSdkApi::AddTableSheet,
            &[("fileId", file_id)],
            Vec::new(),
            SdkBody::Json(json!({ "name": name })),
            auth,
        );
        self.call(request).await
    }

    // ============ Document pro ============

    pub async fn read_bookmarks(
        &self,
        auth: &Auth,
        file_id: &str,
        bookmarks: &[String],
    ) -> SdkCall<Value> {
        let request = self.request(
            ShimoSdkApi::ReadBookmarkContent,
            &[("fileId", file_id)],
            Vec::new(),
            SdkBody::Json(json!({ "bookmarks": bookmarks })),
            auth,
        );
        self.call(request).await
    }

    pub async fn replace_bookmarks(
        &self,
        auth: &Auth,
        file_id: &str,
        replacements: &[Replacement],
    ) -> SdkCall<Value> {
        let request = self.request(
            ShimoSdkApi::ReplaceBookmarkContent,
            &[("fileId", file_id)],
            Vec::new(),
            SdkBody::Json(json!({ "replacements": replacements })),
            auth,
        );
        self.call(request).await
    }

    // ============ App and seats ============

    pub async fn app_detail(&self, auth: &Auth, app_id: &str) -> SdkCall<AppDetail> {
        let request = self.request(
            ShimoSdkApi::GetAppDetail,
            &[("appId", app_id)],
            Vec::new(),
            SdkBody::Empty,
            auth,
        );
        self.call(request).await
    }

    pub async fn update_endpoint_url(&self, auth: &Auth, app_id: &str, url: &str) -> SdkCall<Value> {
        let request = self.request(
            ShimoSdkApi::UpdateEndpointUrl,
            &[("appId", app_id)],
            Vec::new(),
            SdkBody::Json(json!({ "url": url })),
            auth,
        );
        self.call(request).await
    }

    pub async fn users_with_status(&self, auth: &Auth, page: u32, size: u32) -> SdkCall<Value> {
        let query = vec![
            ("page".to_string(), page.to_string()),
            ("size".to_string(), size.to_string()),
        ];
        let request = self.request(
            ShimoSdkApi::GetUsersWithStatus,
            &[],
            query,
            SdkBody::Empty,
            auth,
        );
        self.call(request).await
    }

    pub async fn activate_users(&self, auth: &Auth, user_ids: &[String]) -> SdkCall<Value> {
        let request = self.request(
            ShimoSdkApi::ActivateUserSeat,
            &[],
            Vec::new(),
            SdkBody::Json(json!({ "userIds": user_ids })),
            auth,
        );
        self.call(request).await
    }

    pub async fn deactivate_users(&self, auth: &Auth, user_ids: &[String]) -> SdkCall<Value> {
        let request = self.request(
            ShimoSdkApi::CancelUserSeat,
            &[],
            Vec::new(),
            SdkBody::Json(json!({ "userIds": user_ids })),
            auth,
        );
        self.call(request).await
    }

    pub async fn batch_set_user_status(
        &self,
        auth: &Auth,
        user_ids: &[String],
        status: i32,
    ) -> SdkCall<Value> {
        let request = self.request(
            ShimoSdkApi::BatchSetUserSeat,
            &[],
            Vec::new(),
            SdkBody::Json(json!({ "userIds": user_ids, "status": status })),
            auth,
        );
        self.call(request).await
    }
}

fn trace_of(request: &SdkRequest) -> CallTrace {
    let query = request
        .query
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    let (body, form) = match &request.body {
        SdkBody::Empty => (String::new(), String::new()),
        SdkBody::Json(value) => (value.to_string(), String::new()),
        SdkBody::Multipart(fields) => {
            let form: serde_json::Map<String, Value> = fields
                .iter()
                .map(|field| match field {
                    FormField::Text { name, value } => (name.clone(), json!(value)),
                    FormField::File { name, path, .. } => {
                        (name.clone(), json!(path.display().to_string()))
                    }
                })
                .collect();
            (String::new(), Value::Object(form).to_string())
        }
    };

    CallTrace {
        method: request.method.to_string(),
        url: request.url.clone(),
        query,
        body,
        form,
        status: 0,
        response: String::new(),
    }
}
