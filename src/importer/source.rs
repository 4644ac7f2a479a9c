// ==========================================
// Agro Asociados - import sources
// ==========================================
// Stage: Reading (source -> UTF-8 text)
// ==========================================

use crate::importer::error::{ImportError, ImporterResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const UTF8_BOM: char = '\u{feff}';

/// Where the data of one run comes from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ImportSource {
    /// Delimited text file on disk
    File { path: PathBuf },
    /// Delimited text already in memory (e.g. an uploaded file)
    Bytes { file_name: String, data: Vec<u8> },
    /// Pasted JSON text
    Json { text: String },
}

impl ImportSource {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        ImportSource::File { path: path.into() }
    }

    pub fn bytes(file_name: impl Into<String>, data: Vec<u8>) -> Self {
        ImportSource::Bytes {
            file_name: file_name.into(),
            data,
        }
    }

    pub fn json(text: impl Into<String>) -> Self {
        ImportSource::Json { text: text.into() }
    }

    pub fn is_json(&self) -> bool {
        matches!(self, ImportSource::Json { .. })
    }

    /// Short label for logs and summaries
    pub fn label(&self) -> String {
        match self {
            ImportSource::File { path } => path.display().to_string(),
            ImportSource::Bytes { file_name, .. } => file_name.clone(),
            ImportSource::Json { .. } => "json".to_string(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ImportSource::File { .. } => "file",
            ImportSource::Bytes { .. } => "bytes",
            ImportSource::Json { .. } => "json",
        }
    }

    /// Load the full text of the source.
    ///
    /// # Returns
    /// - Err(FileNotFound): path does not exist
    /// - Err(ReadError): I/O failure or bytes that are not UTF-8
    pub async fn read_text(&self) -> ImporterResult<String> {
        let text = match self {
            ImportSource::File { path } => {
                if !path.exists() {
                    return Err(ImportError::FileNotFound(path.display().to_string()));
                }
                let data = tokio::fs::read(path).await?;
                String::from_utf8(data)?
            }
            ImportSource::Bytes { data, .. } => String::from_utf8(data.clone())?,
            ImportSource::Json { text } => text.clone(),
        };

        Ok(strip_bom(text))
    }
}

fn strip_bom(text: String) -> String {
    match text.strip_prefix(UTF8_BOM) {
        Some(rest) => rest.to_string(),
        None => text,
    }
}
