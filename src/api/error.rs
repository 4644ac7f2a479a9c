// ==========================================
// Agro Asociados - API error types
// ==========================================
// Responsibility: map repository / importer errors to
// user-facing categories; every variant carries its reason
// ==========================================

use crate::importer::error::ImportError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API error type
#[derive(Error, Debug)]
pub enum ApiError {
    // ===== Session =====
    #[error("not signed in")]
    Unauthenticated,

    #[error("access denied: {0}")]
    Forbidden(String),

    // ===== Business rules =====
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("duplicate: {0}")]
    Duplicate(String),

    #[error("import failed: {0}")]
    ImportFailed(String),

    // ===== Data access =====
    #[error("database error: {0}")]
    DatabaseError(String),

    // ===== Generic =====
    #[error("internal error: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{} (id={})", entity, id))
            }
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseError(format!("could not acquire database lock: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::UniqueConstraintViolation(msg) => ApiError::Duplicate(msg),
            RepositoryError::ValidationError(msg) => ApiError::InvalidInput(msg),
            RepositoryError::SerializationError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::DuplicateError { national_id } => ApiError::Duplicate(format!(
                "{} ({})",
                crate::i18n::t("member.duplicate"),
                national_id
            )),
            ImportError::ValidationError(msg) => ApiError::InvalidInput(msg),
            ImportError::Repository(err) => err.into(),
            ImportError::Other(err) => ApiError::Other(err),
            err @ (ImportError::FileNotFound(_)
            | ImportError::ReadError(_)
            | ImportError::FormatError(_)
            | ImportError::PersistenceError { .. }) => ApiError::ImportFailed(err.to_string()),
        }
    }
}

/// Result alias
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_conversion() {
        let api_err: ApiError = RepositoryError::not_found("asociado", "A1").into();
        match api_err {
            ApiError::NotFound(msg) => {
                assert!(msg.contains("asociado"));
                assert!(msg.contains("A1"));
            }
            other => panic!("expected NotFound, got {:?}", other),
        }

        let api_err: ApiError =
            RepositoryError::UniqueConstraintViolation("usuarios.email".to_string()).into();
        assert!(matches!(api_err, ApiError::Duplicate(_)));
    }

    #[test]
    fn test_import_error_conversion() {
        let api_err: ApiError = ImportError::empty_input().into();
        match api_err {
            ApiError::ImportFailed(msg) => assert_eq!(msg, "empty or no valid lines"),
            other => panic!("expected ImportFailed, got {:?}", other),
        }

        let api_err: ApiError = ImportError::DuplicateError {
            national_id: "001-3".to_string(),
        }
        .into();
        assert!(matches!(api_err, ApiError::Duplicate(ref msg) if msg.contains("001-3")));

        let api_err: ApiError =
            ImportError::Repository(RepositoryError::LockError("poisoned".to_string())).into();
        assert!(matches!(api_err, ApiError::DatabaseError(_)));
    }
}
