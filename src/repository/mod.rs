// ==========================================
// Agro Asociados - repository layer
// ==========================================
// Responsibility: data access, database details stay here
// All queries are parameterised
// ==========================================

pub mod board_repo;
pub mod error;
pub mod member_repo;
pub mod member_repo_impl;
pub mod user_repo;

pub use board_repo::BoardMemberRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use member_repo::MemberRepository;
pub use member_repo_impl::MemberRepositoryImpl;
pub use user_repo::UserRepository;
