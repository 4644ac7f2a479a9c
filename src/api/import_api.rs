// ==========================================
// Agro Asociados - import API
// ==========================================
// Responsibility: bulk import entry points (file, upload, pasted JSON)
// Access: admin only
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::app::session::SessionContext;
use crate::domain::import::{ImportPreview, ImportSummary};
use crate::importer::{ImportSource, MemberImporter};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument};

/// Import API
pub struct ImportApi {
    importer: Arc<dyn MemberImporter>,
}

impl ImportApi {
    pub fn new(importer: Arc<dyn MemberImporter>) -> Self {
        Self { importer }
    }

    /// Run one import.
    ///
    /// A run that completes with zero stored records is still Ok;
    /// the summary message says so. Reading/parsing failures are Err.
    #[instrument(skip(self, session, source), fields(source_kind = source.kind()))]
    pub async fn import(
        &self,
        session: &SessionContext,
        source: ImportSource,
    ) -> ApiResult<ImportSummary> {
        let user = session.require_admin()?;
        info!(user = %user.email, source = %source.label(), "import requested");

        let summary = self.importer.import(source).await?;
        Ok(summary)
    }

    /// Import a delimited text file from disk
    pub async fn import_file(
        &self,
        session: &SessionContext,
        path: impl AsRef<Path>,
    ) -> ApiResult<ImportSummary> {
        self.import(session, ImportSource::file(path.as_ref())).await
    }

    /// Import an uploaded file's bytes
    pub async fn import_bytes(
        &self,
        session: &SessionContext,
        file_name: &str,
        data: Vec<u8>,
    ) -> ApiResult<ImportSummary> {
        self.import(session, ImportSource::bytes(file_name, data)).await
    }

    /// Import pasted JSON text (array of objects or a single object)
    pub async fn import_json(
        &self,
        session: &SessionContext,
        text: &str,
    ) -> ApiResult<ImportSummary> {
        if text.trim().is_empty() {
            return Err(ApiError::InvalidInput("JSON text is empty".to_string()));
        }
        self.import(session, ImportSource::json(text)).await
    }

    /// Parse without persisting; returns the first rows for review
    pub async fn preview(
        &self,
        session: &SessionContext,
        source: ImportSource,
    ) -> ApiResult<ImportPreview> {
        session.require_admin()?;
        Ok(self.importer.preview(source).await?)
    }
}
