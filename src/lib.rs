// ==========================================
// Agro Asociados - core library
// ==========================================
// Stack: Rust + SQLite
// Scope: member (asociados) registry, board officers (directiva),
//        system users with roles, and tolerant bulk data import
// ==========================================

// i18n bootstrap (locales/*.yml)
rust_i18n::i18n!("locales", fallback = "es");

// ==========================================
// Modules
// ==========================================

// Domain layer - entities and value types
pub mod domain;

// Repository layer - data access
pub mod repository;

// Import layer - external data ingestion
pub mod importer;

// Configuration layer
pub mod config;

// Database plumbing (connection setup / schema)
pub mod db;

// Logging
pub mod logging;

// Internationalisation
pub mod i18n;

// API layer - operations used by the screens
pub mod api;

// Application layer - shared state and session context
pub mod app;

// ==========================================
// Re-exports
// ==========================================

pub use domain::{
    BoardMember, BoardPosition, BuildTier, CanonicalField, ImportPreview, ImportProgress,
    ImportResult, ImportState, ImportSummary, MemberField, MemberRecord, Role, StoredMember,
    UserAccount,
};

pub use importer::{ImportError, ImportSource, MemberImporter, MemberImporterImpl};

pub use api::{ApiError, ApiResult, BoardApi, ImportApi, MemberApi, Page, UserApi};

pub use app::{AppState, AuthProvider, Identity, SessionContext};

// ==========================================
// Constants
// ==========================================

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const APP_NAME: &str = "Agro Asociados";

/// Collection (table) holding member records
pub const MEMBERS_COLLECTION: &str = "asociados";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
