// ==========================================
// Agro Asociados - import configuration reader
// ==========================================
// Responsibility: configuration the importer needs (read only)
// ==========================================

use crate::repository::error::RepositoryResult;
use async_trait::async_trait;

// ==========================================
// ImportConfigReader Trait
// ==========================================
// Implementor: ConfigManager (config_kv table)
#[async_trait]
pub trait ImportConfigReader: Send + Sync {
    /// Log a progress line every N persisted attempts
    ///
    /// # Defaults
    /// - 5
    async fn get_progress_log_every(&self) -> RepositoryResult<usize>;

    /// Apply the character filter to JSON-sourced values
    ///
    /// # Defaults
    /// - true
    async fn get_sanitize_json_values(&self) -> RepositoryResult<bool>;

    /// Records returned by an import preview
    ///
    /// # Defaults
    /// - 3
    async fn get_preview_rows(&self) -> RepositoryResult<usize>;
}
