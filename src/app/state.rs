// ==========================================
// Agro Asociados - application state
// ==========================================
// Responsibility: wire repositories, config and importer
// into the API instances shared by every screen
// ==========================================

use std::sync::{Arc, Mutex};

use crate::api::{ApiError, ApiResult, BoardApi, ImportApi, MemberApi, UserApi};
use crate::app::session::{AuthProvider, SessionContext};
use crate::config::ConfigManager;
use crate::domain::user::{Role, UserAccount};
use crate::importer::{ImportObserver, MemberImporter, MemberImporterImpl, NoOpImportObserver};
use crate::repository::{
    BoardMemberRepository, MemberRepository, MemberRepositoryImpl, RepositoryError,
    UserRepository,
};

/// Environment variable overriding the database location
pub const DB_PATH_ENV: &str = "AGRO_ASOCIADOS_DB_PATH";

/// Application state: one shared connection, every API instance
pub struct AppState {
    pub db_path: String,

    pub member_api: Arc<MemberApi>,

    pub import_api: Arc<ImportApi>,

    pub board_api: Arc<BoardApi>,

    pub user_api: Arc<UserApi>,

    pub config_manager: Arc<ConfigManager>,

    /// Role lookup for session acquisition
    user_repo: Arc<UserRepository>,
}

impl AppState {
    /// # Arguments
    /// - db_path: SQLite file (":memory:" works for throwaway state)
    pub fn new(db_path: &str) -> ApiResult<Self> {
        Self::with_import_observer(db_path, Arc::new(NoOpImportObserver))
    }

    /// Same as `new`, with an observer attached to every import run
    pub fn with_import_observer(
        db_path: &str,
        observer: Arc<dyn ImportObserver>,
    ) -> ApiResult<Self> {
        tracing::info!(db_path = db_path, "initialising application state");
        crate::i18n::ensure_default_locale();

        let conn = crate::db::open_sqlite_connection(db_path).map_err(RepositoryError::from)?;
        crate::db::init_schema(&conn).map_err(RepositoryError::from)?;
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // Repositories and config
        // ==========================================
        let member_repo: Arc<dyn MemberRepository> =
            Arc::new(MemberRepositoryImpl::from_connection(conn.clone()));
        let board_repo = Arc::new(BoardMemberRepository::from_connection(conn.clone()));
        let user_repo = Arc::new(UserRepository::from_connection(conn.clone()));
        let config_manager = Arc::new(ConfigManager::from_connection(conn.clone())?);

        // ==========================================
        // Importer
        // ==========================================
        let importer: Arc<dyn MemberImporter> = Arc::new(
            MemberImporterImpl::with_default_components(
                MemberRepositoryImpl::from_connection(conn.clone()),
                ConfigManager::from_connection(conn)?,
            )
            .with_observer(observer),
        );

        // ==========================================
        // APIs
        // ==========================================
        let member_api = Arc::new(MemberApi::new(
            member_repo,
            importer.clone(),
            config_manager.clone(),
        ));
        let import_api = Arc::new(ImportApi::new(importer));
        let board_api = Arc::new(BoardApi::new(board_repo));
        let user_api = Arc::new(UserApi::new(user_repo.clone()));

        tracing::info!("application state ready");

        Ok(Self {
            db_path: db_path.to_string(),
            member_api,
            import_api,
            board_api,
            user_api,
            config_manager,
            user_repo,
        })
    }

    /// Resolve the signed-in identity into a session context
    pub async fn open_session(&self, auth: &dyn AuthProvider) -> ApiResult<SessionContext> {
        SessionContext::acquire(auth, &self.user_repo).await
    }

    /// First-run bootstrap: create an admin when `usuarios` is empty.
    ///
    /// # Returns
    /// - Ok(Some(id)): admin created
    /// - Ok(None): users already exist, nothing done
    pub fn ensure_admin(&self, name: &str, email: &str) -> ApiResult<Option<String>> {
        if !self.user_repo.list_all()?.is_empty() {
            return Ok(None);
        }
        if !email.contains('@') {
            return Err(ApiError::InvalidInput(format!("invalid email: {}", email)));
        }

        let id = self
            .user_repo
            .create(&UserAccount::new(name.trim(), email.trim(), Role::Admin))?;
        tracing::info!(email = email, "bootstrap admin created");
        Ok(Some(id))
    }
}

/// Default database path.
///
/// `AGRO_ASOCIADOS_DB_PATH` wins when set; otherwise the per-user data
/// directory, falling back to the working directory.
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./asociados.db");
    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("agro-asociados");
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("asociados.db");
        }
    }

    path.to_string_lossy().to_string()
}
