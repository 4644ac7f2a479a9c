// ==========================================
// Agro Asociados - application layer
// ==========================================
// Responsibility: shared state and session context
// ==========================================

pub mod session;
pub mod state;

pub use session::{AuthProvider, Identity, SessionContext};
pub use state::{get_default_db_path, AppState, DB_PATH_ENV};
