use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Collaborative file kinds the vendor supports
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "camelCase")]
pub enum FileType {
    Document,
    Spreadsheet,
    DocumentPro,
    Presentation,
    Table,
}

impl FileType {
    pub const ALL: [FileType; 5] = [
        FileType::Document,
        FileType::Spreadsheet,
        FileType::DocumentPro,
        FileType::Presentation,
        FileType::Table,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::Spreadsheet => "spreadsheet",
            Self::DocumentPro => "documentPro",
            Self::Presentation => "presentation",
            Self::Table => "table",
        }
    }

    /// Source extensions accepted by the import endpoint
    pub fn import_exts(&self) -> &'static [&'static str] {
        match self {
            Self::Document => &["docx", "doc", "md", "txt"],
            Self::Spreadsheet => &["xlsx", "xls", "csv", "xlsm"],
            Self::DocumentPro => &["docx", "doc", "wps"],
            Self::Presentation => &["pptx", "ppt"],
            Self::Table => &[],
        }
    }

    /// Target formats accepted by the export endpoint
    pub fn export_exts(&self) -> &'static [&'static str] {
        match self {
            Self::Document => &["docx", "pdf", "jpg", "md"],
            Self::Spreadsheet => &["xlsx"],
            Self::DocumentPro => &["docx", "pdf", "wps"],
            Self::Presentation => &["pptx", "pdf"],
            Self::Table => &[],
        }
    }

    /// Application tables have no generic import/export
    pub fn supports_file_io(&self) -> bool {
        !matches!(self, Self::Table)
    }

    pub fn supports_plain_text(&self) -> bool {
        !matches!(self, Self::Table)
    }

    pub fn supports_mentions(&self) -> bool {
        !matches!(self, Self::Presentation | Self::Table)
    }

    /// Parse `all`, a single name, or a comma separated list
    pub fn parse_list(input: &str) -> Result<Vec<FileType>, ParseFileTypeError> {
        let input = input.trim();
        if input == "all" {
            return Ok(Self::ALL.to_vec());
        }

        let mut types = Vec::new();
        for name in input.split(',') {
            let file_type: FileType = name.trim().parse()?;
            if !types.contains(&file_type) {
                types.push(file_type);
            }
        }
        Ok(types)
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileType {
    type Err = ParseFileTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ParseFileTypeError(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid file type: {0:?}")]
pub struct ParseFileTypeError(pub String);
