use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use time::macros::format_description;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::models::{
    AllApiTestRes, ExportFileRes, FileType, ImportFileRes, NewTestApi, SingleApiTestRes, Suite,
    TestApi,
};

fn import_row(file_type: FileType, ext: &str, res: &ImportFileRes) -> SingleApiTestRes {
    SingleApiTestRes {
        api_name: format!("import file-{}", file_type),
        success: res.success,
        http_code: res.http_code,
        err_msg: res.err_msg.clone(),
        path_str: res.path_str.clone(),
        form_data: res.form_data.clone(),
        file_ext: ext.to_string(),
        time_consuming: res.time_consuming.clone(),
        start_time: res.start_time,
        ..Default::default()
    }
}

fn export_row(file_type: FileType, ext: &str, res: &ExportFileRes) -> SingleApiTestRes {
    SingleApiTestRes {
        api_name: format!("export file-{}", file_type),
        success: res.success,
        http_code: res.http_code,
        err_msg: res.err_msg.clone(),
        path_str: res.path_str.clone(),
        body_req: res.body_req.clone(),
        file_ext: ext.to_string(),
        time_consuming: res.time_consuming.clone(),
        start_time: res.start_time,
        ..Default::default()
    }
}

/// Flatten a run into suite-tagged results, in execution order.
/// Base rows carry their file type in `file_ext`.
pub fn flatten(res: &AllApiTestRes) -> Vec<(Suite, SingleApiTestRes)> {
    let mut rows = Vec::new();

    for (file_type, base) in &res.base_test_res_map {
        let optional = [
            &base.get_plain_text_res,
            &base.get_plain_text_word_count_res,
            &base.get_mention_at_list_res,
        ];
        let fixed = [
            &base.create_file_res,
            &base.create_copy_res,
            &base.create_preview_res,
            &base.get_preview_res,
            &base.get_history_list_res,
            &base.get_revision_list_res,
        ];

        let entries = fixed
            .into_iter()
            .chain(optional.into_iter().flatten())
            .chain(std::iter::once(&base.delete_file_res));
        for entry in entries {
            let mut row = entry.clone();
            row.file_ext = file_type.as_str().to_string();
            rows.push((Suite::Base, row));
        }
    }

    for (file_type, io) in &res.file_io_res_map {
        for (ext, import) in &io.import_file_res {
            rows.push((Suite::FileIo, import_row(*file_type, ext, import)));
        }
        for (ext, export) in &io.export_file_res {
            rows.push((Suite::FileIo, export_row(*file_type, ext, export)));
        }
    }

    let sheet = &res.spreadsheet_res;
    for entry in [
        &sheet.get_table_content_res,
        &sheet.update_table_content_res,
        &sheet.append_table_content_res,
        &sheet.delete_table_row_res,
        &sheet.add_table_sheet_res,
        &sheet.get_comment_count_res,
    ] {
        rows.push((Suite::Spreadsheet, entry.clone()));
    }

    let doc_pro = &res.document_pro_res;
    for entry in [
        &doc_pro.read_bookmark_content_res,
        &doc_pro.replace_bookmark_content_res,
    ] {
        rows.push((Suite::DocumentPro, entry.clone()));
    }

    rows.push((Suite::Table, res.table_res.sheet_export_to_excel_res.clone()));

    let system = &res.system_res;
    for entry in [
        &system.get_app_detail_res,
        &system.update_endpoint_url_res,
        &system.get_user_list_and_seat_status_res,
        &system.cancel_user_seat_res,
        &system.activate_user_seat_res,
        &system.batch_set_user_seat_res,
    ] {
        rows.push((Suite::System, entry.clone()));
    }

    rows
}

/// Rows to persist for one run
pub fn to_rows(run_id: Uuid, res: &AllApiTestRes) -> Vec<NewTestApi> {
    flatten(res)
        .into_iter()
        .map(|(suite, row)| NewTestApi {
            test_id: run_id,
            test_type: suite,
            api_name: row.api_name,
            success: row.success,
            http_code: i32::from(row.http_code),
            http_resp: row.http_resp,
            err_msg: row.err_msg,
            path_str: row.path_str,
            body_req: row.body_req,
            query: row.query,
            form_data: row.form_data,
            file_ext: row.file_ext,
            time_consuming: row.time_consuming,
            start_time: row.start_time,
        })
        .collect()
}

/// Persisted rows keyed by suite name
pub fn group_by_suite(rows: Vec<TestApi>) -> BTreeMap<String, Vec<TestApi>> {
    let mut grouped: BTreeMap<String, Vec<TestApi>> = BTreeMap::new();
    for row in rows {
        grouped.entry(row.test_type.clone()).or_default().push(row);
    }
    grouped
}

/// Write the run as pretty JSON under `<dir>/<YYYY_MM_DD>/`
pub async fn write_json_report(dir: &Path, res: &AllApiTestRes) -> std::io::Result<PathBuf> {
    let now = OffsetDateTime::now_utc();
    let day = now
        .format(format_description!("[year]_[month]_[day]"))
        .map_err(std::io::Error::other)?;
    let stamp = now
        .format(format_description!(
            "[year]_[month]_[day]_[hour]_[minute]_[second]"
        ))
        .map_err(std::io::Error::other)?;

    let folder = dir.join(day);
    tokio::fs::create_dir_all(&folder).await?;

    let path = folder.join(format!("sdk_test_all_{}.json", stamp));
    let body = serde_json::to_vec_pretty(res)?;
    tokio::fs::write(&path, body).await?;

    tracing::info!(path = %path.display(), "Report written");
    Ok(path)
}
