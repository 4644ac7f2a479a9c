// ==========================================
// Agro Asociados - duplicate guard
// ==========================================
// Manual-entry path only; bulk imports skip it.
// Check-then-act: two concurrent entries with the same national ID
// can both pass. Closing that needs a unique index on
// asociados.national_id, which bulk imports would then trip over.
// ==========================================

use crate::domain::member::MemberField;
use crate::importer::error::{ImportError, ImporterResult};
use crate::repository::member_repo::MemberRepository;
use tracing::{debug, warn};

pub struct DuplicateGuard;

impl DuplicateGuard {
    /// Reject a national ID that is already stored.
    ///
    /// An empty (or blank) ID cannot be checked and is allowed.
    ///
    /// # Returns
    /// - Err(DuplicateError): at least one stored record has this ID
    pub async fn ensure_unique<R>(&self, repo: &R, national_id: &str) -> ImporterResult<()>
    where
        R: MemberRepository + ?Sized,
    {
        let national_id = national_id.trim();
        if national_id.is_empty() {
            debug!("empty national ID, duplicate check skipped");
            return Ok(());
        }

        let matches = repo
            .find_by_field(MemberField::NationalId, national_id)
            .await?;

        if !matches.is_empty() {
            warn!(
                national_id = national_id,
                existing = matches.len(),
                "duplicate national ID rejected"
            );
            return Err(ImportError::DuplicateError {
                national_id: national_id.to_string(),
            });
        }

        Ok(())
    }
}
