// ==========================================
// Agro Asociados - API layer
// ==========================================
// Responsibility: operations behind each screen, gated by the
// caller's SessionContext
// ==========================================

pub mod board_api;
pub mod error;
pub mod import_api;
pub mod member_api;
pub mod user_api;

pub use board_api::BoardApi;
pub use error::{ApiError, ApiResult};
pub use import_api::ImportApi;
pub use member_api::{DeleteAllResponse, MemberApi, MemberWriteResponse, Page};
pub use user_api::UserApi;
