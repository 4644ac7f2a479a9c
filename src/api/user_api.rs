// ==========================================
// Agro Asociados - user API (usuarios)
// ==========================================
// Responsibility: user and role maintenance
// Access: admin only
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::app::session::SessionContext;
use crate::domain::user::UserAccount;
use crate::repository::UserRepository;
use std::sync::Arc;
use tracing::{info, instrument};

pub struct UserApi {
    user_repo: Arc<UserRepository>,
}

impl UserApi {
    pub fn new(user_repo: Arc<UserRepository>) -> Self {
        Self { user_repo }
    }

    /// Users whose name or email contains `search` (case-insensitive)
    pub fn list(&self, session: &SessionContext, search: &str) -> ApiResult<Vec<UserAccount>> {
        session.require_admin()?;
        let users = self
            .user_repo
            .list_all()?
            .into_iter()
            .filter(|u| u.matches_search(search))
            .collect();
        Ok(users)
    }

    #[instrument(skip(self, session, user), fields(email = %user.email))]
    pub fn create(&self, session: &SessionContext, user: UserAccount) -> ApiResult<String> {
        session.require_admin()?;
        let user = Self::validated(user)?;

        if self.user_repo.find_by_email(&user.email)?.is_some() {
            return Err(ApiError::Duplicate(format!(
                "a user with email {} already exists",
                user.email
            )));
        }

        let id = self.user_repo.create(&user)?;
        info!(id = %id, role = %user.role, "user created");
        Ok(id)
    }

    #[instrument(skip(self, session, user), fields(id = %user.id))]
    pub fn update(&self, session: &SessionContext, user: UserAccount) -> ApiResult<()> {
        session.require_admin()?;
        let user = Self::validated(user)?;

        if let Some(existing) = self.user_repo.find_by_email(&user.email)? {
            if existing.id != user.id {
                return Err(ApiError::Duplicate(format!(
                    "a user with email {} already exists",
                    user.email
                )));
            }
        }

        self.user_repo.update(&user)?;
        info!(role = %user.role, "user updated");
        Ok(())
    }

    #[instrument(skip(self, session))]
    pub fn delete(&self, session: &SessionContext, id: &str) -> ApiResult<()> {
        session.require_admin()?;
        self.user_repo.delete(id)?;
        info!("user deleted");
        Ok(())
    }

    fn validated(mut user: UserAccount) -> ApiResult<UserAccount> {
        user.name = user.name.trim().to_string();
        user.email = user.email.trim().to_string();
        if user.name.is_empty() {
            return Err(ApiError::InvalidInput("name is required".to_string()));
        }
        if !user.email.contains('@') {
            return Err(ApiError::InvalidInput(format!(
                "invalid email: {}",
                user.email
            )));
        }
        Ok(user)
    }
}
