use reqwest::Method;

/// Vendor operations exercised by the harness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShimoSdkApi {
    CreateFile,
    CreateFileCopy,
    DeleteFile,
    CreatePreview,
    GetPreview,
    GetHistoryList,
    GetRevisionList,
    GetPlainText,
    GetPlainTextWordCount,
    GetMentionAt,
    GetCommentCount,
    ImportFile,
    ImportFileProgress,
    ExportFile,
    ExportFileProgress,
    ExportTableSheets,
    GetTableContent,
    UpdateTableContent,
    AppendTableContent,
    DeleteTableRow,
    AddTableSheet,
    ReadBookmarkContent,
    ReplaceBookmarkContent,
    GetAppDetail,
    UpdateEndpointUrl,
    GetUsersWithStatus,
    ActivateUserSeat,
    CancelUserSeat,
    BatchSetUserSeat,
}

impl ShimoSdkApi {
    /// Display name stored with every result
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateFile => "create file",
            Self::CreateFileCopy => "create file copy",
            Self::DeleteFile => "delete file",
            Self::CreatePreview => "create preview",
            Self::GetPreview => "open preview",
            Self::GetHistoryList => "get history list",
            Self::GetRevisionList => "get revision list",
            Self::GetPlainText => "get plain text",
            Self::GetPlainTextWordCount => "get plain text word count",
            Self::GetMentionAt => "get mention list",
            Self::GetCommentCount => "get comment count",
            Self::ImportFile => "import file",
            Self::ImportFileProgress => "import progress",
            Self::ExportFile => "export file",
            Self::ExportFileProgress => "export progress",
            Self::ExportTableSheets => "export table as sheets",
            Self::GetTableContent => "get sheet values",
            Self::UpdateTableContent => "update sheet values",
            Self::AppendTableContent => "append sheet values",
            Self::DeleteTableRow => "delete sheet rows",
            Self::AddTableSheet => "add sheet",
            Self::ReadBookmarkContent => "read bookmark content",
            Self::ReplaceBookmarkContent => "replace bookmark content",
            Self::GetAppDetail => "get app details",
            Self::UpdateEndpointUrl => "update endpoint url",
            Self::GetUsersWithStatus => "get users with seat status",
            Self::ActivateUserSeat => "activate user seats",
            Self::CancelUserSeat => "deactivate user seats",
            Self::BatchSetUserSeat => "batch set seat status",
        }
    }

    pub fn method(&self) -> Method {
        match self {
            Self::CreateFile
            | Self::CreateFileCopy
            | Self::CreatePreview
            | Self::ImportFile
            | Self::ExportFile
            | Self::ExportTableSheets
            | Self::AppendTableContent
            | Self::AddTableSheet
            | Self::ReadBookmarkContent
            | Self::ActivateUserSeat
            | Self::CancelUserSeat => Method::POST,
            Self::UpdateTableContent | Self::ReplaceBookmarkContent | Self::UpdateEndpointUrl => {
                Method::PUT
            }
            Self::BatchSetUserSeat => Method::PATCH,
            Self::DeleteFile | Self::DeleteTableRow => Method::DELETE,
            Self::GetPreview
            | Self::GetHistoryList
            | Self::GetRevisionList
            | Self::GetPlainText
            | Self::GetPlainTextWordCount
            | Self::GetMentionAt
            | Self::GetCommentCount
            | Self::ImportFileProgress
            | Self::ExportFileProgress
            | Self::GetTableContent
            | Self::GetAppDetail
            | Self::GetUsersWithStatus => Method::GET,
        }
    }

    /// Path relative to the vendor host; `{name}` segments are filled per call
    pub fn path_template(&self) -> &'static str {
        match self {
            Self::CreateFile => "/sdk/v2/api/files",
            Self::CreateFileCopy => "/sdk/v2/api/files/{fileId}/copy",
            Self::DeleteFile => "/sdk/v2/api/files/{fileId}",
            Self::CreatePreview => "/sdk/v2/api/cloud-files/{fileId}/preview",
            Self::GetPreview => "/api/cloud-files/{fileId}/page",
            Self::GetHistoryList => "/sdk/v2/api/files/{fileId}/doc-sidebar-info",
            Self::GetRevisionList => "/sdk/v2/api/files/{fileId}/revision",
            Self::GetPlainText => "/sdk/v2/api/files/{fileId}/plain-text",
            Self::GetPlainTextWordCount => "/sdk/v2/api/files/{fileId}/plain-text/wc",
            Self::GetMentionAt => "/sdk/v2/api/files/{fileId}/mention-at-list",
            Self::GetCommentCount => "/sdk/v2/api/files/{fileId}/comment-count",
            Self::ImportFile => "/sdk/v2/api/files/import",
            Self::ImportFileProgress => "/sdk/v2/api/files/import/progress",
            Self::ExportFile => "/sdk/v2/api/files/{fileId}/export",
            Self::ExportFileProgress => "/sdk/v2/api/files/export/progress",
            Self::ExportTableSheets => "/sdk/v2/api/files/{fileId}/export/table-sheets",
            Self::GetTableContent
            | Self::UpdateTableContent
            | Self::AppendTableContent => "/sdk/v2/api/files/{fileId}/sheets/values",
            Self::DeleteTableRow => "/sdk/v2/api/files/{fileId}/sheets/{sheetName}/rows/{index}",
            Self::AddTableSheet => "/sdk/v2/api/files/{fileId}/sheets",
            Self::ReadBookmarkContent => "/sdk/v2/api/files/{fileId}/doc-pro/bookmark/content",
            Self::ReplaceBookmarkContent => "/sdk/v2/api/files/{fileId}/doc-pro/bookmark/replace",
            Self::GetAppDetail => "/sdk/v2/api/license/apps/{appId}",
            Self::UpdateEndpointUrl => "/sdk/v2/api/license/apps/{appId}/endpoint-url",
            Self::GetUsersWithStatus => "/sdk/v2/api/license/users",
            Self::ActivateUserSeat => "/sdk/v2/api/license/users/activate",
            Self::CancelUserSeat => "/sdk/v2/api/license/users/deactivate",
            Self::BatchSetUserSeat => "/sdk/v2/api/license/users/set-status",
        }
    }

    /// Fill `{name}` segments of the path template
    pub fn path(&self, params: &[(&str, &str)]) -> String {
        let mut path = self.path_template().to_string();
        for (name, value) in params {
            path = path.replace(&format!("{{{}}}", name), value);
        }
        path
    }
}

/// Match a concrete path against a template, `{..}` segments match anything
pub fn path_matches(template: &str, path: &str) -> bool {
    let template: Vec<&str> = template.trim_matches('/').split('/').collect();
    let path: Vec<&str> = path.trim_matches('/').split('/').collect();

    template.len() == path.len()
        && template
            .iter()
            .zip(path.iter())
            .all(|(t, p)| (t.starts_with('{') && t.ends_with('}')) || t == p)
}
