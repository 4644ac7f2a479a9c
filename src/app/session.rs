// ==========================================
// Agro Asociados - session context
// ==========================================
// Responsibility: explicit per-session identity and role,
// passed into every API call instead of global state
// Lifecycle: acquired at sign-in, consumed by release() at sign-out
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::user::{Role, UserAccount};
use crate::repository::UserRepository;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Identity reported by the authentication provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub uid: String,
    pub email: String,
    pub display_name: Option<String>,
}

// ==========================================
// AuthProvider Trait
// ==========================================
// External collaborator; credentials never pass through this crate.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Currently signed-in identity, None when signed out
    async fn current_identity(&self) -> anyhow::Result<Option<Identity>>;

    async fn sign_out(&self) -> anyhow::Result<()>;
}

// ==========================================
// SessionContext
// ==========================================
#[derive(Debug, Clone)]
pub struct SessionContext {
    identity: Option<Identity>,
    user: Option<UserAccount>,
}

impl SessionContext {
    /// Context of a visitor that has not signed in
    pub fn signed_out() -> Self {
        Self {
            identity: None,
            user: None,
        }
    }

    /// Build the context from the auth provider plus the role stored in `usuarios`.
    ///
    /// # Returns
    /// - Err(Unauthenticated): nobody is signed in
    /// - Err(Forbidden): signed in, but not registered as a user
    pub async fn acquire(auth: &dyn AuthProvider, users: &UserRepository) -> ApiResult<Self> {
        let identity = auth
            .current_identity()
            .await
            .map_err(ApiError::Other)?
            .ok_or(ApiError::Unauthenticated)?;

        let user = users.find_by_email(&identity.email)?.ok_or_else(|| {
            warn!(email = %identity.email, "signed-in identity has no user record");
            ApiError::Forbidden(format!("{} is not a registered user", identity.email))
        })?;

        info!(email = %identity.email, role = %user.role, "session acquired");
        Ok(Self {
            identity: Some(identity),
            user: Some(user),
        })
    }

    /// Context for an already-resolved user
    pub fn for_user(identity: Identity, user: UserAccount) -> Self {
        Self {
            identity: Some(identity),
            user: Some(user),
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|u| u.role)
    }

    pub fn is_admin(&self) -> bool {
        self.role() == Some(Role::Admin)
    }

    /// Any registered user
    pub fn require_signed_in(&self) -> ApiResult<&UserAccount> {
        self.user.as_ref().ok_or(ApiError::Unauthenticated)
    }

    /// Registered user with the admin role
    pub fn require_admin(&self) -> ApiResult<&UserAccount> {
        let user = self.require_signed_in()?;
        if user.role != Role::Admin {
            return Err(ApiError::Forbidden(format!(
                "{} does not have the admin role",
                user.email
            )));
        }
        Ok(user)
    }

    /// Sign out with the provider; the context is consumed
    pub async fn release(self, auth: &dyn AuthProvider) -> ApiResult<()> {
        auth.sign_out().await.map_err(ApiError::Other)?;
        if let Some(identity) = &self.identity {
            info!(email = %identity.email, "session released");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    struct FakeAuth {
        identity: Option<Identity>,
        signed_out: AtomicBool,
    }

    impl FakeAuth {
        fn signed_in_as(email: &str) -> Self {
            Self {
                identity: Some(Identity {
                    uid: "uid-1".to_string(),
                    email: email.to_string(),
                    display_name: None,
                }),
                signed_out: AtomicBool::new(false),
            }
        }
    }

    #[async_trait]
    impl AuthProvider for FakeAuth {
        async fn current_identity(&self) -> anyhow::Result<Option<Identity>> {
            Ok(self.identity.clone())
        }

        async fn sign_out(&self) -> anyhow::Result<()> {
            self.signed_out.store(true, Ordering::SeqCst);
            Ok(())
        }
    }

    fn setup_users() -> UserRepository {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::init_schema(&conn).unwrap();
        let repo = UserRepository::from_connection(Arc::new(Mutex::new(conn)));
        repo.create(&UserAccount::new("Admin", "admin@coop.org", Role::Admin))
            .unwrap();
        repo.create(&UserAccount::new("Editor", "editor@coop.org", Role::Editor))
            .unwrap();
        repo
    }

    #[tokio::test]
    async fn test_acquire_admin_and_release() {
        let users = setup_users();
        let auth = FakeAuth::signed_in_as("admin@coop.org");

        let session = SessionContext::acquire(&auth, &users).await.unwrap();
        assert!(session.is_admin());
        assert!(session.require_admin().is_ok());

        session.release(&auth).await.unwrap();
        assert!(auth.signed_out.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_editor_is_not_admin() {
        let users = setup_users();
        let auth = FakeAuth::signed_in_as("editor@coop.org");

        let session = SessionContext::acquire(&auth, &users).await.unwrap();
        assert!(session.require_signed_in().is_ok());
        assert!(matches!(session.require_admin(), Err(ApiError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_unknown_or_missing_identity_rejected() {
        let users = setup_users();

        let auth = FakeAuth::signed_in_as("stranger@coop.org");
        let err = SessionContext::acquire(&auth, &users).await.unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));

        let auth = FakeAuth {
            identity: None,
            signed_out: AtomicBool::new(false),
        };
        let err = SessionContext::acquire(&auth, &users).await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthenticated));

        assert!(matches!(
            SessionContext::signed_out().require_signed_in(),
            Err(ApiError::Unauthenticated)
        ));
    }
}
