// ==========================================
// Agro Asociados - member API (asociados)
// ==========================================
// Responsibility: list / search / paginate, manual registration,
// update, delete
// Access: signed-in users; delete_all requires admin
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::app::session::SessionContext;
use crate::config::ConfigManager;
use crate::domain::member::{MemberRecord, StoredMember};
use crate::importer::{MemberImporter, MISSING_KEY_FIELDS_REASON};
use crate::repository::MemberRepository;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};

/// One page of a listing (1-based)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    /// Cut one page out of an already filtered and sorted list.
    /// A page past the end has no items.
    pub fn slice(all: Vec<T>, page: usize, page_size: usize) -> Self {
        let page_size = page_size.max(1);
        let total_items = all.len();
        let total_pages = total_items.div_ceil(page_size);
        let skip = page.saturating_sub(1).saturating_mul(page_size);
        let items = all.into_iter().skip(skip).take(page_size).collect();

        Self {
            items,
            page,
            page_size,
            total_items,
            total_pages,
        }
    }
}

/// Outcome of a write, with the localised confirmation text
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberWriteResponse {
    pub id: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAllResponse {
    pub deleted: usize,
    pub message: String,
}

/// Member API
pub struct MemberApi {
    member_repo: Arc<dyn MemberRepository>,
    importer: Arc<dyn MemberImporter>,
    config: Arc<ConfigManager>,
}

impl MemberApi {
    /// # Arguments
    /// - member_repo: member storage
    /// - importer: manual registration goes through its duplicate guard
    /// - config: listing page size
    pub fn new(
        member_repo: Arc<dyn MemberRepository>,
        importer: Arc<dyn MemberImporter>,
        config: Arc<ConfigManager>,
    ) -> Self {
        Self {
            member_repo,
            importer,
            config,
        }
    }

    /// List members sorted by surname then name.
    ///
    /// # Arguments
    /// - query: case-insensitive substring on name, surname, national ID, sector
    /// - page: 1-based
    /// - page_size: None uses `members.page_size`
    #[instrument(skip(self, session))]
    pub async fn list(
        &self,
        session: &SessionContext,
        query: &str,
        page: usize,
        page_size: Option<usize>,
    ) -> ApiResult<Page<StoredMember>> {
        session.require_signed_in()?;
        if page == 0 {
            return Err(ApiError::InvalidInput("page numbers start at 1".to_string()));
        }
        let page_size = match page_size {
            Some(0) => {
                return Err(ApiError::InvalidInput(
                    "page size must be positive".to_string(),
                ))
            }
            Some(size) => size,
            None => self.config.get_members_page_size()?,
        };

        let mut members: Vec<StoredMember> = self
            .member_repo
            .list_all()
            .await?
            .into_iter()
            .filter(|m| m.record.matches_search(query))
            .collect();
        members.sort_by(|a, b| {
            a.record
                .surname
                .to_lowercase()
                .cmp(&b.record.surname.to_lowercase())
                .then_with(|| a.record.name.to_lowercase().cmp(&b.record.name.to_lowercase()))
        });

        Ok(Page::slice(members, page, page_size))
    }

    pub async fn get(&self, session: &SessionContext, id: &str) -> ApiResult<StoredMember> {
        session.require_signed_in()?;
        self.member_repo
            .get(id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("asociado (id={})", id)))
    }

    /// Manual entry: validated and checked for a duplicate national ID
    #[instrument(skip(self, session, record))]
    pub async fn register(
        &self,
        session: &SessionContext,
        record: MemberRecord,
    ) -> ApiResult<MemberWriteResponse> {
        session.require_signed_in()?;
        let id = self.importer.register(record).await?;

        Ok(MemberWriteResponse {
            id,
            message: crate::i18n::t("member.created"),
        })
    }

    /// Replace a stored record; the national ID is not re-checked
    #[instrument(skip(self, session, record))]
    pub async fn update(
        &self,
        session: &SessionContext,
        id: &str,
        record: MemberRecord,
    ) -> ApiResult<MemberWriteResponse> {
        session.require_signed_in()?;
        let record = record.trimmed();
        if !record.has_key_fields() {
            return Err(ApiError::InvalidInput(MISSING_KEY_FIELDS_REASON.to_string()));
        }

        self.member_repo.update(id, &record).await?;
        info!(id = id, "member updated");

        Ok(MemberWriteResponse {
            id: id.to_string(),
            message: crate::i18n::t("member.updated"),
        })
    }

    #[instrument(skip(self, session))]
    pub async fn delete(&self, session: &SessionContext, id: &str) -> ApiResult<String> {
        session.require_signed_in()?;
        self.member_repo.delete(id).await?;
        info!(id = id, "member deleted");
        Ok(crate::i18n::t("member.deleted"))
    }

    /// Remove every member record
    #[instrument(skip(self, session))]
    pub async fn delete_all(&self, session: &SessionContext) -> ApiResult<DeleteAllResponse> {
        let user = session.require_admin()?;
        let deleted = self.member_repo.delete_all().await?;
        info!(user = %user.email, deleted, "all members deleted");

        Ok(DeleteAllResponse {
            deleted,
            message: crate::i18n::t_with_args(
                "member.deleted_all",
                &[("count", deleted.to_string().as_str())],
            ),
        })
    }
}
