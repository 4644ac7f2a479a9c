// ==========================================
// Agro Asociados - board API (directiva)
// ==========================================
// Responsibility: board officer listing and maintenance
// Access: reads for signed-in users, writes for admins
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::app::session::SessionContext;
use crate::domain::board::{BoardMember, BoardPosition};
use crate::repository::BoardMemberRepository;
use chrono::Local;
use std::sync::Arc;
use tracing::{info, instrument};

/// Board API
pub struct BoardApi {
    board_repo: Arc<BoardMemberRepository>,
}

impl BoardApi {
    pub fn new(board_repo: Arc<BoardMemberRepository>) -> Self {
        Self { board_repo }
    }

    /// Create (empty id) or overwrite an officer.
    ///
    /// The position may be given as slug or title and is stored as the title.
    ///
    /// # Defaults
    /// - start_date: today when not given
    ///
    /// # Returns
    /// The stored officer's id
    #[instrument(skip(self, session, member), fields(position = %member.position))]
    pub fn save(&self, session: &SessionContext, mut member: BoardMember) -> ApiResult<String> {
        session.require_admin()?;

        let missing = member.missing_required_fields();
        if !missing.is_empty() {
            return Err(ApiError::InvalidInput(format!(
                "required fields missing: {}",
                missing.join(", ")
            )));
        }

        let position = BoardPosition::parse(&member.position).ok_or_else(|| {
            ApiError::InvalidInput(format!("unknown board position: {}", member.position))
        })?;
        member.position = position.title().to_string();
        member.name = member.name.trim().to_string();
        member.surname = member.surname.trim().to_string();
        member.national_id = member.national_id.trim().to_string();
        if member.start_date.is_none() {
            member.start_date = Some(Local::now().date_naive());
        }

        if member.id.trim().is_empty() {
            let id = self.board_repo.create(&member)?;
            info!(id = %id, "board member created");
            Ok(id)
        } else {
            self.board_repo.update(&member)?;
            info!(id = %member.id, "board member updated");
            Ok(member.id)
        }
    }

    /// All officers, sorted by position title
    pub fn list(&self, session: &SessionContext) -> ApiResult<Vec<BoardMember>> {
        session.require_signed_in()?;
        let mut members = self.board_repo.list_all()?;
        members.sort_by(|a, b| a.position.cmp(&b.position));
        Ok(members)
    }

    pub fn get(&self, session: &SessionContext, id: &str) -> ApiResult<BoardMember> {
        session.require_signed_in()?;
        self.board_repo
            .find_by_id(id)?
            .ok_or_else(|| ApiError::NotFound(format!("directiva (id={})", id)))
    }

    /// Current holder of a position, looked up by slug
    pub fn find_active_by_position(
        &self,
        session: &SessionContext,
        slug: &str,
    ) -> ApiResult<BoardMember> {
        session.require_signed_in()?;
        let position = BoardPosition::from_slug(slug)
            .ok_or_else(|| ApiError::InvalidInput(format!("unknown board position: {}", slug)))?;

        self.board_repo
            .find_active_by_position(position.title())?
            .ok_or_else(|| ApiError::NotFound(format!("active {}", position.title())))
    }

    #[instrument(skip(self, session))]
    pub fn delete(&self, session: &SessionContext, id: &str) -> ApiResult<()> {
        session.require_admin()?;
        self.board_repo.delete(id)?;
        info!(id = id, "board member deleted");
        Ok(())
    }
}
