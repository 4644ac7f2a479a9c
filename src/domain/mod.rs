// ==========================================
// Agro Asociados - domain layer
// ==========================================
// Responsibility: entities and value types
// No data access, no import logic
// ==========================================

pub mod board;
pub mod import;
pub mod member;
pub mod user;

pub use board::{BoardMember, BoardPosition};
pub use import::{
    BuildTier, ImportPreview, ImportProgress, ImportResult, ImportState, ImportSummary,
};
pub use member::{CanonicalField, MemberField, MemberRecord, StoredMember};
pub use user::{Role, UserAccount};
