use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use sdk_demo::config::{Config, CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH};
use sdk_demo::models::FileType;
use sdk_demo::sdk::{HttpTransport, ImportSource, Replacement, ShimoSdk};
use sdk_demo::services::report::write_json_report;
use sdk_demo::services::{
    file_types_from_str, ApiTester, BatchTester, LocalPlaceholderStore, ProgressHandle, Signer,
};

#[derive(Parser)]
#[command(name = "sdkctl")]
#[command(about = "Exercise the collaborative document SDK", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file
    #[arg(short, long, global = true, env = CONFIG_PATH_ENV, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Preview language
    #[arg(long, global = true)]
    lang: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Suite {
    Base,
    Common,
    System,
    All,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a test suite
    BatchTest {
        #[arg(value_enum)]
        suite: Suite,

        /// `all`, a file type, or a comma separated list
        #[arg(value_name = "FILE_TYPE", default_value = "document")]
        file_type: String,
    },

    /// Create a file
    CreateFile {
        #[arg(short = 't', long, default_value = "document")]
        file_type: FileType,
    },

    /// Copy a file under a new id
    CreateFileCopy {
        #[arg(short, long)]
        file_id: String,
    },

    /// Delete a file
    DeleteFile {
        #[arg(short, long)]
        file_id: String,
    },

    /// Create a preview of a file
    CreatePreview {
        #[arg(short, long)]
        file_id: String,
    },

    /// Open the preview of a file
    OpenPreview {
        #[arg(short, long)]
        file_id: String,
    },

    /// List file histories
    HistoryList {
        #[arg(short, long)]
        file_id: String,

        #[arg(long, default_value_t = 1)]
        page: u32,

        #[arg(long, default_value_t = 10)]
        size: u32,
    },

    /// List file revisions
    RevisionList {
        #[arg(short, long)]
        file_id: String,
    },

    /// Fetch the plain text of a file
    PlainText {
        #[arg(short, long)]
        file_id: String,
    },

    /// Count the words of a file
    PlainTextWordCount {
        #[arg(short, long)]
        file_id: String,
    },

    /// List mentions in a file
    MentionAtList {
        #[arg(short, long)]
        file_id: String,
    },

    /// Count comments in a file
    CommentCount {
        #[arg(short, long)]
        file_id: String,
    },

    /// Import a local file or a URL and wait for it to finish
    ImportFile {
        #[arg(short = 't', long, default_value = "document")]
        file_type: FileType,

        /// Local file to upload
        #[arg(short = 'p', long, conflicts_with = "url")]
        file_path: Option<PathBuf>,

        /// Remote file to import
        #[arg(short, long)]
        url: Option<String>,

        /// Seconds to wait for the import
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Query an import task
    ImportProgress {
        #[arg(long)]
        task_id: String,
    },

    /// Export a file and wait for it to finish
    ExportFile {
        #[arg(short, long)]
        file_id: String,

        #[arg(short = 't', long, default_value = "document")]
        file_type: FileType,

        /// Target format
        #[arg(short, long)]
        export_type: String,

        /// Seconds to wait for the export
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Query an export task
    ExportProgress {
        #[arg(long)]
        task_id: String,
    },

    /// Export application table sheets
    ExportTableSheets {
        #[arg(short, long)]
        file_id: String,
    },

    /// Read a spreadsheet range
    GetTableContent {
        #[arg(short, long)]
        file_id: String,

        #[arg(short, long)]
        range: String,
    },

    /// Overwrite a spreadsheet range
    UpdateTableContent {
        #[arg(short, long)]
        file_id: String,

        #[arg(short, long)]
        range: String,

        /// One JSON array per row, repeatable
        #[arg(long = "value", required = true)]
        values: Vec<String>,
    },

    /// Append rows after a spreadsheet range
    AppendTableContent {
        #[arg(short, long)]
        file_id: String,

        #[arg(short, long)]
        range: String,

        /// One JSON array per row, repeatable
        #[arg(long = "value", required = true)]
        values: Vec<String>,
    },

    /// Delete spreadsheet rows
    DeleteTableRow {
        #[arg(short, long)]
        file_id: String,

        #[arg(short, long)]
        sheet_name: String,

        #[arg(short, long)]
        index: u32,

        #[arg(short = 'n', long, default_value_t = 1)]
        count: u32,
    },

    /// Add a sheet to a spreadsheet
    AddTableSheet {
        #[arg(short, long)]
        file_id: String,

        #[arg(short, long)]
        sheet_name: String,
    },

    /// Read bookmark content from a document pro file
    ReadBookmarkContent {
        #[arg(short, long)]
        file_id: String,

        #[arg(short, long = "bookmark", required = true)]
        bookmarks: Vec<String>,
    },

    /// Replace bookmark content in a document pro file
    ReplaceBookmarkContent {
        #[arg(short, long)]
        file_id: String,

        #[arg(short, long)]
        bookmark: String,

        #[arg(long)]
        value: String,
    },

    /// Show app details
    GetAppDetail,

    /// Set the app callback endpoint
    UpdateCallbackUrl {
        #[arg(short, long)]
        url: String,
    },

    /// List users with their seat status
    GetUserAndStatus {
        #[arg(long, default_value_t = 1)]
        page: u32,

        #[arg(long, default_value_t = 10)]
        size: u32,
    },

    /// Activate user seats
    ActivateUserSeat {
        #[arg(long = "user-id", required = true)]
        user_ids: Vec<String>,
    },

    /// Deactivate user seats
    CancelUserSeat {
        #[arg(long = "user-id", required = true)]
        user_ids: Vec<String>,
    },

    /// Set user seat status in bulk
    BatchSetUserSeat {
        #[arg(long = "user-id", required = true)]
        user_ids: Vec<String>,

        /// 1 to activate, -1 to deactivate
        #[arg(long, allow_hyphen_values = true)]
        status: i32,
    },
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn parse_rows(rows: &[String]) -> anyhow::Result<Vec<Vec<Value>>> {
    rows.iter()
        .map(|row| {
            serde_json::from_str::<Vec<Value>>(row)
                .with_context(|| format!("row must be a JSON array: {}", row))
        })
        .collect()
}

fn build_tester(config: &Config) -> anyhow::Result<ApiTester> {
    let transport = HttpTransport::new(config.shimo_sdk.request_timeout())?;
    let sdk = ShimoSdk::new(
        &config.shimo_sdk.host,
        &config.shimo_sdk.app_id,
        Arc::new(transport),
    );
    let signer = Signer::new(config);
    let storage = Arc::new(LocalPlaceholderStore::new(&config.sdkctl.storage_dir));

    Ok(ApiTester::new(sdk, signer, storage, config))
}

async fn batch_test(config: &Config, tester: ApiTester, suite: Suite, input: &str) -> anyhow::Result<()> {
    let batch = BatchTester::new(tester, &config.sdkctl, ProgressHandle::new());

    match suite {
        Suite::Base => {
            let file_types = file_types_from_str(input)?;
            print_json(&batch.test_base(&file_types).await)
        }
        Suite::Common => {
            let file_types = file_types_from_str(input).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Falling back to every file type");
                FileType::ALL.to_vec()
            });
            print_json(&batch.test_common(&file_types).await)
        }
        Suite::System => print_json(&batch.test_system().await),
        Suite::All => {
            let file_types = file_types_from_str(input)?;
            let res = batch.test_all(&file_types).await;
            write_json_report(&config.sdkctl.report_dir, &res)
                .await
                .context("failed to write report")?;
            print_json(&res)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::from_path(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    let mut tester = build_tester(&config)?;
    if let Some(lang) = &cli.lang {
        tester = tester.with_lang(lang);
    }

    let import_timeout = |secs: Option<u64>| {
        secs.map(Duration::from_secs)
            .unwrap_or_else(|| config.sdkctl.import_timeout())
    };
    let export_timeout = |secs: Option<u64>| {
        secs.map(Duration::from_secs)
            .unwrap_or_else(|| config.sdkctl.export_timeout())
    };

    match cli.command {
        Commands::BatchTest { suite, file_type } => {
            return batch_test(&config, tester, suite, &file_type).await;
        }
        Commands::CreateFile { file_type } => {
            let (res, file_id) = tester.create_file(file_type, cli.lang.as_deref()).await;
            tracing::info!(file_id = %file_id, "File id");
            print_json(&res)
        }
        Commands::CreateFileCopy { file_id } => {
            let (res, copy_id) = tester.create_file_copy(&file_id).await;
            tracing::info!(file_id = %copy_id, "Copy id");
            print_json(&res)
        }
        Commands::DeleteFile { file_id } => print_json(&tester.delete_file(&file_id).await),
        Commands::CreatePreview { file_id } => print_json(&tester.create_preview(&file_id).await),
        Commands::OpenPreview { file_id } => print_json(&tester.open_preview(&file_id).await),
        Commands::HistoryList { file_id, page, size } => {
            print_json(&tester.history_list(&file_id, page, size, &[]).await)
        }
        Commands::RevisionList { file_id } => print_json(&tester.revision_list(&file_id).await),
        Commands::PlainText { file_id } => print_json(&tester.plain_text(&file_id, &[]).await),
        Commands::PlainTextWordCount { file_id } => {
            print_json(&tester.plain_text_word_count(&file_id, &[]).await)
        }
        Commands::MentionAtList { file_id } => print_json(&tester.mention_at_list(&file_id).await),
        Commands::CommentCount { file_id } => print_json(&tester.comment_count(&file_id).await),
        Commands::ImportFile {
            file_type,
            file_path,
            url,
            timeout,
        } => {
            let source = match (file_path, url) {
                (Some(path), _) => ImportSource::Path(path),
                (None, Some(url)) => ImportSource::Url(url),
                (None, None) => anyhow::bail!("either --file-path or --url is required"),
            };
            let res = tester
                .import_once(&source, file_type, import_timeout(timeout))
                .await;
            print_json(&res)
        }
        Commands::ImportProgress { task_id } => print_json(&tester.import_progress(&task_id).await),
        Commands::ExportFile {
            file_id,
            file_type,
            export_type,
            timeout,
        } => {
            let res = tester
                .export_once(file_type, &export_type, &file_id, export_timeout(timeout))
                .await;
            print_json(&res)
        }
        Commands::ExportProgress { task_id } => print_json(&tester.export_progress(&task_id).await),
        Commands::ExportTableSheets { file_id } => {
            print_json(&tester.export_table_sheets(&file_id).await)
        }
        Commands::GetTableContent { file_id, range } => {
            print_json(&tester.table_content(&file_id, &range, &[]).await)
        }
        Commands::UpdateTableContent {
            file_id,
            range,
            values,
        } => {
            let rows = parse_rows(&values)?;
            print_json(&tester.update_table_content(&file_id, &range, rows).await)
        }
        Commands::AppendTableContent {
            file_id,
            range,
            values,
        } => {
            let rows = parse_rows(&values)?;
            print_json(&tester.append_table_content(&file_id, &range, rows).await)
        }
        Commands::DeleteTableRow {
            file_id,
            sheet_name,
            index,
            count,
        } => print_json(
            &tester
                .delete_table_rows(&file_id, &sheet_name, index, count)
                .await,
        ),
        Commands::AddTableSheet {
            file_id,
            sheet_name,
        } => print_json(&tester.add_table_sheet(&file_id, &sheet_name).await),
        Commands::ReadBookmarkContent { file_id, bookmarks } => {
            print_json(&tester.read_bookmarks(&file_id, &bookmarks).await)
        }
        Commands::ReplaceBookmarkContent {
            file_id,
            bookmark,
            value,
        } => {
            let replacements = [Replacement::text(bookmark, value)];
            print_json(&tester.replace_bookmarks(&file_id, &replacements).await)
        }
        Commands::GetAppDetail => {
            let (res, detail) = tester.app_detail().await;
            if let Some(detail) = detail {
                tracing::info!(endpoint = %detail.endpoint_url, "App detail");
            }
            print_json(&res)
        }
        Commands::UpdateCallbackUrl { url } => print_json(&tester.update_endpoint_url(&url).await),
        Commands::GetUserAndStatus { page, size } => {
            print_json(&tester.users_with_status(page, size).await)
        }
        Commands::ActivateUserSeat { user_ids } => {
            print_json(&tester.activate_users(&user_ids).await)
        }
        Commands::CancelUserSeat { user_ids } => {
            print_json(&tester.deactivate_users(&user_ids).await)
        }
        Commands::BatchSetUserSeat { user_ids, status } => {
            print_json(&tester.batch_set_user_status(&user_ids, status).await)
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .init();

    run(cli).await
}
