//! Suite orchestration for a batch run.
//!
//! Suites run strictly in sequence and never fail as a whole: every suite
//! returns a complete result structure, using synthetic failures for the
//! steps a failed precondition made impossible. Each suite advances the
//! run's progress exactly once.

use std::collections::BTreeMap;
use std::time::Duration;

use serde_json::{json, Value};

use crate::config::SdkctlConfig;
use crate::models::{
    AllApiTestRes, BaseTestRes, CommonTestRes, DocumentProRes, ExportFileRes, FileIoRes, FileType,
    ParseFileTypeError, SingleApiTestRes, SpreadsheetRes, SystemRes, TableRes,
};
use crate::sdk::{ImportSource, Replacement, ShimoSdkApi};
use crate::services::api_tests::ApiTester;
use crate::services::run_registry::ProgressHandle;
use crate::services::validator::Validator;

pub const SHEET_RANGE: &str = "Sheet1!A1:C5";
pub const SHEET_NAME: &str = "Sheet1";
pub const NEW_SHEET_NAME: &str = "新工作表";
pub const BOOKMARK: &str = "我是书签";
pub const BOOKMARK_REPLACEMENT: &str = "我是替换后的内容";

/// Parse `all`, a single file type, or a comma separated list
pub fn file_types_from_str(input: &str) -> Result<Vec<FileType>, ParseFileTypeError> {
    FileType::parse_list(input)
}

fn initial_sheet_values() -> Vec<Vec<Value>> {
    vec![
        vec![json!("姓名"), json!("年龄"), json!("性别")],
        vec![json!("小红"), json!("25"), json!("女")],
        vec![json!("小强"), json!("30"), json!("男")],
    ]
}

fn appended_sheet_values() -> Vec<Vec<Value>> {
    vec![vec![json!("追加姓名"), json!("35"), json!("男")]]
}

/// A failed verification marks the mutation before it as failed
fn downgrade(mutation: &mut SingleApiTestRes, check: &SingleApiTestRes, step: &str) {
    if mutation.success && !check.success {
        tracing::warn!(api = %mutation.api_name, "Sheet {} did not take effect", step);
        mutation.success = false;
        mutation.err_msg = check.err_msg.clone();
    }
}

fn failures(apis: &[ShimoSdkApi], reason: &str) -> Vec<SingleApiTestRes> {
    apis.iter()
        .map(|api| SingleApiTestRes::failure(api.name(), reason))
        .collect()
}

/// Base result for a file type whose sequence stopped after file creation
fn skipped_base(file_type: FileType, create_file_res: SingleApiTestRes, reason: &str) -> BaseTestRes {
    let fail = |api: ShimoSdkApi| SingleApiTestRes::failure(api.name(), reason);
    BaseTestRes {
        create_file_res,
        create_copy_res: fail(ShimoSdkApi::CreateFileCopy),
        delete_file_res: fail(ShimoSdkApi::DeleteFile),
        create_preview_res: fail(ShimoSdkApi::CreatePreview),
        get_preview_res: fail(ShimoSdkApi::GetPreview),
        get_history_list_res: fail(ShimoSdkApi::GetHistoryList),
        get_revision_list_res: fail(ShimoSdkApi::GetRevisionList),
        get_plain_text_res: file_type
            .supports_plain_text()
            .then(|| fail(ShimoSdkApi::GetPlainText)),
        get_plain_text_word_count_res: file_type
            .supports_plain_text()
            .then(|| fail(ShimoSdkApi::GetPlainTextWordCount)),
        get_mention_at_list_res: file_type
            .supports_mentions()
            .then(|| fail(ShimoSdkApi::GetMentionAt)),
    }
}

fn spreadsheet_failure(reason: &str) -> SpreadsheetRes {
    let mut res = failures(
        &[
            ShimoSdkApi::GetTableContent,
            ShimoSdkApi::UpdateTableContent,
            ShimoSdkApi::AppendTableContent,
            ShimoSdkApi::DeleteTableRow,
            ShimoSdkApi::AddTableSheet,
            ShimoSdkApi::GetCommentCount,
        ],
        reason,
    )
    .into_iter();

    SpreadsheetRes {
        get_table_content_res: res.next().unwrap_or_default(),
        update_table_content_res: res.next().unwrap_or_default(),
        append_table_content_res: res.next().unwrap_or_default(),
        delete_table_row_res: res.next().unwrap_or_default(),
        add_table_sheet_res: res.next().unwrap_or_default(),
        get_comment_count_res: res.next().unwrap_or_default(),
    }
}

fn system_failure(reason: &str) -> SystemRes {
    let fail = |api: ShimoSdkApi| SingleApiTestRes::failure(api.name(), reason);
    SystemRes {
        get_app_detail_res: fail(ShimoSdkApi::GetAppDetail),
        update_endpoint_url_res: fail(ShimoSdkApi::UpdateEndpointUrl),
        get_user_list_and_seat_status_res: fail(ShimoSdkApi::GetUsersWithStatus),
        activate_user_seat_res: fail(ShimoSdkApi::ActivateUserSeat),
        cancel_user_seat_res: fail(ShimoSdkApi::CancelUserSeat),
        batch_set_user_seat_res: fail(ShimoSdkApi::BatchSetUserSeat),
    }
}

#[derive(Clone)]
pub struct BatchTester {
    tester: ApiTester,
    progress: ProgressHandle,
    import_timeout: Duration,
    export_timeout: Duration,
    system_call_interval: Duration,
    seat_user_ids: Vec<String>,
}

impl BatchTester {
    pub fn new(tester: ApiTester, settings: &SdkctlConfig, progress: ProgressHandle) -> Self {
        Self {
            tester,
            progress,
            import_timeout: settings.import_timeout(),
            export_timeout: settings.export_timeout(),
            system_call_interval: settings.system_call_interval(),
            seat_user_ids: settings.seat_test_user_ids.clone(),
        }
    }

    pub fn progress(&self) -> &ProgressHandle {
        &self.progress
    }

    /// Every suite, in order: Base, FileIO, Spreadsheet, DocumentPro, Table, System
    pub async fn test_all(&self, file_types: &[FileType]) -> AllApiTestRes {
        tracing::info!(file_types = ?file_types, "Starting full batch test");

        let res = AllApiTestRes {
            base_test_res_map: self.test_base(file_types).await,
            file_io_res_map: self.test_file_io(file_types).await,
            spreadsheet_res: self.test_spreadsheet().await,
            document_pro_res: self.test_document_pro().await,
            table_res: self.test_table().await,
            system_res: self.test_system().await,
        };

        tracing::info!(progress = self.progress.value(), "Full batch test finished");
        res
    }

    /// Base and FileIO suites
    pub async fn test_common(&self, file_types: &[FileType]) -> CommonTestRes {
        CommonTestRes {
            base_test_res_map: self.test_base(file_types).await,
            file_io_res_map: self.test_file_io(file_types).await,
        }
    }

    // ============ Base ============

    pub async fn test_base(&self, file_types: &[FileType]) -> BTreeMap<FileType, BaseTestRes> {
        tracing::info!(suite = "base", "Suite started");

        let mut results = BTreeMap::new();
        for &file_type in file_types {
            let res = self.base_for(file_type).await;
            results.insert(file_type, res);
        }

        self.progress.advance();
        tracing::info!(suite = "base", "Suite finished");
        results
    }

    async fn base_for(&self, file_type: FileType) -> BaseTestRes {
        let (create_file_res, file_id) = self.tester.create_file(file_type, None).await;
        if !create_file_res.success {
            let reason = format!("create file failed, step skipped: {}", create_file_res.err_msg);
            tracing::error!(file_type = %file_type, "Create file failed, skipping base sequence");
            return skipped_base(file_type, create_file_res, &reason);
        }

        let (create_copy_res, _) = self.tester.create_file_copy(&file_id).await;

        if let Err(e) = self.tester.store_placeholder(&file_id).await {
            let reason = format!("placeholder storage failed, step skipped: {}", e);
            tracing::error!(file_type = %file_type, error = %e, "Placeholder storage failed");
            let mut res = skipped_base(file_type, create_file_res, &reason);
            res.create_copy_res = create_copy_res;
            return res;
        }

        let create_preview_res = self.tester.create_preview(&file_id).await;
        let get_preview_res = self.tester.open_preview(&file_id).await;
        let history_validators = [
            Validator::new("length(histories)", "equal", 1, "one history entry"),
            Validator::new("isLastPage", "equal", true, "single page of history"),
            Validator::new("users", "not_equal", "", "history users present"),
        ];
        let get_history_list_res = self
            .tester
            .history_list(&file_id, 0, 0, &history_validators)
            .await;
        let get_revision_list_res = self.tester.revision_list(&file_id).await;

        let (get_plain_text_res, get_plain_text_word_count_res) =
            if file_type.supports_plain_text() {
                let (text, count) = self.plain_text_checks(file_type).await;
                (Some(text), Some(count))
            } else {
                (None, None)
            };

        let get_mention_at_list_res = if file_type.supports_mentions() {
            Some(self.tester.mention_at_list(&file_id).await)
        } else {
            None
        };

        let delete_file_res = self.tester.delete_file(&file_id).await;

        BaseTestRes {
            create_file_res,
            create_copy_res,
            delete_file_res,
            create_preview_res,
            get_preview_res,
            get_history_list_res,
            get_revision_list_res,
            get_plain_text_res,
            get_plain_text_word_count_res,
            get_mention_at_list_res,
        }
    }

    /// Plain text needs real content, so these run against an imported sample
    async fn plain_text_checks(&self, file_type: FileType) -> (SingleApiTestRes, SingleApiTestRes) {
        let Some(ext) = file_type.import_exts().first() else {
            let reason = format!("no import sample for {}", file_type);
            return (
                SingleApiTestRes::failure(ShimoSdkApi::GetPlainText.name(), &reason),
                SingleApiTestRes::failure(ShimoSdkApi::GetPlainTextWordCount.name(), &reason),
            );
        };

        let sample = ImportSource::Path(self.tester.sample_path(ext));
        let import = self
            .tester
            .import_once(&sample, file_type, self.import_timeout)
            .await;
        if !import.success {
            let reason = format!("precondition import failed: {}", import.err_msg);
            tracing::error!(file_type = %file_type, "Import failed, cannot test plain text");
            return (
                SingleApiTestRes::failure(ShimoSdkApi::GetPlainText.name(), &reason),
                SingleApiTestRes::failure(ShimoSdkApi::GetPlainTextWordCount.name(), &reason),
            );
        }

        let text = self
            .tester
            .plain_text(
                &import.file_guid,
                &[Validator::new("content", "not_equal", "", "plain text present")],
            )
            .await;
        let count = self
            .tester
            .plain_text_word_count(
                &import.file_guid,
                &[Validator::new("wordCount", "not_equal", "", "word count present")],
            )
            .await;

        let cleanup = self.tester.delete_file(&import.file_guid).await;
        if !cleanup.success {
            tracing::warn!(file_id = %import.file_guid, "Failed to delete imported sample");
        }

        (text, count)
    }

    // ============ FileIO ============

    /// Import every source format and export to every target format.
    /// Application tables are skipped.
    pub async fn test_file_io(&self, file_types: &[FileType]) -> BTreeMap<FileType, FileIoRes> {
        tracing::info!(suite = "file_io", "Suite started");

        let mut results = BTreeMap::new();
        for &file_type in file_types.iter().filter(|ft| ft.supports_file_io()) {
            let import_file_res = self
                .tester
                .import_all_formats(file_type, self.import_timeout)
                .await;
            let export_file_res = self.export_after_import(file_type).await;
            results.insert(
                file_type,
                FileIoRes {
                    import_file_res,
                    export_file_res,
                },
            );
        }

        self.progress.advance();
        tracing::info!(suite = "file_io", "Suite finished");
        results
    }

    async fn export_after_import(&self, file_type: FileType) -> BTreeMap<String, ExportFileRes> {
        let Some(ext) = file_type.import_exts().first() else {
            return BTreeMap::new();
        };

        let sample = self.tester.sample_path(ext);
        let import = self
            .tester
            .import_once(&ImportSource::Path(sample.clone()), file_type, self.import_timeout)
            .await;

        if !import.success {
            let reason = format!(
                "precondition import failed: {}, file: {}",
                import.err_msg,
                sample.display()
            );
            tracing::error!(file_type = %file_type, "Import failed, cannot export");
            return file_type
                .export_exts()
                .iter()
                .map(|ext| {
                    let res = ExportFileRes {
                        http_code: import.http_code,
                        err_msg: reason.clone(),
                        ..Default::default()
                    };
                    (ext.to_string(), res)
                })
                .collect();
        }

        self.tester
            .export_all_formats(file_type, &import.file_guid, self.export_timeout)
            .await
    }

    // ============ Spreadsheet ============

    pub async fn test_spreadsheet(&self) -> SpreadsheetRes {
        tracing::info!(suite = "spreadsheet", "Suite started");
        let res = self.spreadsheet_sequence().await;
        self.progress.advance();
        tracing::info!(suite = "spreadsheet", "Suite finished");
        res
    }

    async fn spreadsheet_sequence(&self) -> SpreadsheetRes {
        let sample = ImportSource::Path(self.tester.sample_path("xlsx"));
        let import = self
            .tester
            .import_once(&sample, FileType::Spreadsheet, self.import_timeout)
            .await;
        if !import.success {
            tracing::error!("Import failed, cannot test spreadsheet");
            return spreadsheet_failure(&format!(
                "import failed, cannot test spreadsheet: {}",
                import.err_msg
            ));
        }
        let file_id = import.file_guid.as_str();

        let get_table_content_res = self
            .tester
            .table_content(
                file_id,
                SHEET_RANGE,
                &[Validator::new("values[1][0]", "equal", "saf", "sheet content")],
            )
            .await;

        let mut update_table_content_res = self
            .tester
            .update_table_content(file_id, SHEET_RANGE, initial_sheet_values())
            .await;
        let check = self
            .tester
            .table_content(
                file_id,
                SHEET_RANGE,
                &[
                    Validator::new("values[1][0]", "equal", "小红", "updated content"),
                    Validator::new("values[2][0]", "equal", "小强", "updated content"),
                ],
            )
            .await;
        downgrade(&mut update_table_content_res, &check, "update");

        let mut append_table_content_res = self
            .tester
            .append_table_content(file_id, SHEET_RANGE, appended_sheet_values())
            .await;
        let check = self
            .tester
            .table_content(
                file_id,
                SHEET_RANGE,
                &[Validator::new("values[4][0]", "equal", "追加姓名", "appended content")],
            )
            .await;
        downgrade(&mut append_table_content_res, &check, "append");

        let mut delete_table_row_res = self.tester.delete_table_rows(file_id, SHEET_NAME, 1, 1).await;
        let check = self
            .tester
            .table_content(
                file_id,
                SHEET_RANGE,
                &[Validator::new("values[1][0]", "not_contains", "小红", "deleted row")],
            )
            .await;
        downgrade(&mut delete_table_row_res, &check, "row deletion");

        let add_table_sheet_res = self.tester.add_table_sheet(file_id, NEW_SHEET_NAME).await;
        let get_comment_count_res = self.tester.comment_count(file_id).await;

        SpreadsheetRes {
            get_table_content_res,
            update_table_content_res,
            append_table_content_res,
            delete_table_row_res,
            add_table_sheet_res,
            get_comment_count_res,
        }
    }

    // ============ DocumentPro ============

    pub async fn test_document_pro(&self) -> DocumentProRes {
        tracing::info!(suite = "document_pro", "Suite started");

        let sample = ImportSource::Path(self.tester.sample_path("docx"));
        let import = self
            .tester
            .import_once(&sample, FileType::DocumentPro, self.import_timeout)
            .await;

        let res = if import.success {
            let bookmarks = [BOOKMARK.to_string()];
            let replacements = [Replacement::text(BOOKMARK, BOOKMARK_REPLACEMENT)];
            DocumentProRes {
                read_bookmark_content_res: self
                    .tester
                    .read_bookmarks(&import.file_guid, &bookmarks)
                    .await,
                replace_bookmark_content_res: self
                    .tester
                    .replace_bookmarks(&import.file_guid, &replacements)
                    .await,
            }
        } else {
            tracing::error!("Import failed, cannot test document pro");
            let reason = format!("import failed, cannot test document pro: {}", import.err_msg);
            DocumentProRes {
                read_bookmark_content_res: SingleApiTestRes::failure(
                    ShimoSdkApi::ReadBookmarkContent.name(),
                    &reason,
                ),
                replace_bookmark_content_res: SingleApiTestRes::failure(
                    ShimoSdkApi::ReplaceBookmarkContent.name(),
                    &reason,
                ),
            }
        };

        self.progress.advance();
        tracing::info!(suite = "document_pro", "Suite finished");
        res
    }

    // ============ Table ============

    pub async fn test_table(&self) -> TableRes {
        tracing::info!(suite = "table", file_name = "应用表格转表格", "Suite started");

        let (create, file_id) = self.tester.create_file(FileType::Table, None).await;
        let res = if create.success {
            TableRes {
                sheet_export_to_excel_res: self.tester.export_table_sheets(&file_id).await,
            }
        } else {
            tracing::error!("Create file failed, cannot test table");
            TableRes {
                sheet_export_to_excel_res: SingleApiTestRes::failure(
                    ShimoSdkApi::ExportTableSheets.name(),
                    format!("create file failed, cannot test table: {}", create.err_msg),
                ),
            }
        };

        self.progress.advance();
        tracing::info!(suite = "table", "Suite finished");
        res
    }

    // ============ System ============

    /// App details and the seat lifecycle. Calls are spaced by the
    /// configured interval; the vendor rejects repeated identical signatures.
    pub async fn test_system(&self) -> SystemRes {
        tracing::info!(suite = "system", "Suite started");

        let (detail_res, detail) = self.tester.app_detail().await;
        let res = match detail {
            None => {
                tracing::error!(error = %detail_res.err_msg, "Failed to get app details");
                system_failure(&format!(
                    "failed to get app details, cannot test system APIs: {}",
                    detail_res.err_msg
                ))
            }
            Some(detail) if detail.endpoint_url.is_empty() => {
                tracing::error!("App endpoint url is empty");
                system_failure("app endpoint url is empty, cannot test system APIs")
            }
            Some(detail) => self.seat_lifecycle(detail_res, &detail.endpoint_url).await,
        };

        self.progress.advance();
        tracing::info!(suite = "system", "Suite finished");
        res
    }

    async fn pace(&self) {
        if !self.system_call_interval.is_zero() {
            tokio::time::sleep(self.system_call_interval).await;
        }
    }

    async fn seat_lifecycle(&self, get_app_detail_res: SingleApiTestRes, endpoint_url: &str) -> SystemRes {
        let ids = &self.seat_user_ids;

        self.pace().await;
        // Writing the current URL back leaves the app unchanged
        let update_endpoint_url_res = self.tester.update_endpoint_url(endpoint_url).await;
        self.pace().await;

        let get_user_list_and_seat_status_res = self.tester.users_with_status(0, 0).await;
        self.pace().await;

        let cancel_user_seat_res = self.tester.deactivate_users(ids).await;
        self.pace().await;

        let activate_user_seat_res = self.tester.activate_users(ids).await;
        self.pace().await;

        let deactivate = self.tester.batch_set_user_status(ids, -1).await;
        if !deactivate.success {
            tracing::warn!(error = %deactivate.err_msg, "Batch deactivation failed");
        }
        self.pace().await;

        let batch_set_user_seat_res = self.tester.batch_set_user_status(ids, 1).await;
        self.pace().await;

        SystemRes {
            get_app_detail_res,
            update_endpoint_url_res,
            get_user_list_and_seat_status_res,
            activate_user_seat_res,
            cancel_user_seat_res,
            batch_set_user_seat_res,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_types_from_str() {
        assert_eq!(file_types_from_str("all").unwrap().len(), FileType::ALL.len());
        assert_eq!(
            file_types_from_str("document, spreadsheet").unwrap(),
            vec![FileType::Document, FileType::Spreadsheet]
        );
        assert!(file_types_from_str("bogus").is_err());
    }

    #[test]
    fn test_downgrade_only_successful_mutation() {
        let mut mutation = SingleApiTestRes {
            api_name: "update sheet values".to_string(),
            success: true,
            http_code: 200,
            ..Default::default()
        };
        let check = SingleApiTestRes::failure("get sheet values", "assertion failed");

        downgrade(&mut mutation, &check, "update");
        assert!(!mutation.success);
        assert_eq!(mutation.http_code, 200);
        assert_eq!(mutation.err_msg, "assertion failed");

        let mut failed = SingleApiTestRes::failure("append sheet values", "500");
        downgrade(&mut failed, &check, "append");
        assert_eq!(failed.err_msg, "500");
    }

    #[test]
    fn test_skipped_base_shape_follows_file_type() {
        let create = SingleApiTestRes::failure("create file", "boom");

        let document = skipped_base(FileType::Document, create.clone(), "skipped");
        assert!(document.get_plain_text_res.is_some());
        assert!(document.get_mention_at_list_res.is_some());
        assert!(!document.delete_file_res.success);

        let presentation = skipped_base(FileType::Presentation, create.clone(), "skipped");
        assert!(presentation.get_mention_at_list_res.is_none());

        let table = skipped_base(FileType::Table, create, "skipped");
        assert!(table.get_plain_text_res.is_none());
        assert!(table.get_plain_text_word_count_res.is_none());
    }

    #[test]
    fn test_system_failure_covers_every_field() {
        let res = system_failure("no endpoint");
        for field in [
            &res.get_app_detail_res,
            &res.update_endpoint_url_res,
            &res.get_user_list_and_seat_status_res,
            &res.activate_user_seat_res,
            &res.cancel_user_seat_res,
            &res.batch_set_user_seat_res,
        ] {
            assert!(!field.success);
            assert_eq!(field.err_msg, "no endpoint");
        }
    }
}
