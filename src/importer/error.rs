// ==========================================
// Agro Asociados - importer error types
// ==========================================
// Tool: thiserror derive
// FormatError / ReadError abort a run; PersistenceError is per record
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

/// Importer error type
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== Reading =====
    #[error("file not found: {0}")]
    FileNotFound(String),

    #[error("could not read input: {0}")]
    ReadError(String),

    // ===== Parsing =====
    #[error("{0}")]
    FormatError(String),

    // ===== Persisting =====
    #[error("record {row}: {message}")]
    PersistenceError { row: usize, message: String },

    #[error("a member with national ID {national_id} already exists")]
    DuplicateError { national_id: String },

    #[error("invalid record: {0}")]
    ValidationError(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    // ===== Generic =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ImportError {
    /// Empty input or no valid lines
    pub fn empty_input() -> Self {
        ImportError::FormatError("empty or no valid lines".to_string())
    }

    /// Every build tier came back empty
    pub fn no_records() -> Self {
        ImportError::FormatError("no records could be extracted".to_string())
    }
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => ImportError::FileNotFound(err.to_string()),
            _ => ImportError::ReadError(err.to_string()),
        }
    }
}

impl From<std::string::FromUtf8Error> for ImportError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        ImportError::ReadError(format!("input is not valid UTF-8 text: {}", err))
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::FormatError(err.to_string())
    }
}

impl From<serde_json::Error> for ImportError {
    fn from(err: serde_json::Error) -> Self {
        ImportError::FormatError(format!("invalid JSON: {}", err))
    }
}

/// Result alias
pub type ImporterResult<T> = Result<T, ImportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_messages_are_verbatim() {
        assert_eq!(
            ImportError::empty_input().to_string(),
            "empty or no valid lines"
        );
        assert_eq!(
            ImportError::no_records().to_string(),
            "no records could be extracted"
        );
    }

    #[test]
    fn test_io_not_found_maps_to_file_not_found() {
        let err: ImportError =
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing.csv").into();
        assert!(matches!(err, ImportError::FileNotFound(_)));

        let err: ImportError =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "locked").into();
        assert!(matches!(err, ImportError::ReadError(_)));
    }

    #[test]
    fn test_invalid_utf8_is_read_error() {
        let err: ImportError = String::from_utf8(vec![0xff, 0xfe, 0x00]).unwrap_err().into();
        assert!(matches!(err, ImportError::ReadError(_)));
    }
}
