// ==========================================
// Agro Asociados - member repository trait
// ==========================================
// Storage collaborator of the import core: insert, exact-match query,
// enumerate, delete. No business rules here.
// ==========================================

use crate::domain::member::{MemberField, MemberRecord, StoredMember};
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;

// ==========================================
// MemberRepository Trait
// ==========================================
// Implementor: MemberRepositoryImpl (rusqlite)
#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// Insert a record.
    ///
    /// # Returns
    /// - Ok(String): generated identifier
    async fn insert(&self, record: &MemberRecord) -> RepositoryResult<String>;

    /// Records whose `field` equals `value` exactly
    async fn find_by_field(
        &self,
        field: MemberField,
        value: &str,
    ) -> RepositoryResult<Vec<StoredMember>>;

    /// Every stored record, insertion order
    async fn list_all(&self) -> RepositoryResult<Vec<StoredMember>>;

    async fn get(&self, id: &str) -> RepositoryResult<Option<StoredMember>>;

    /// Replace the record stored under `id`
    ///
    /// # Returns
    /// - Err(NotFound): no such id
    async fn update(&self, id: &str, record: &MemberRecord) -> RepositoryResult<()>;

    /// # Returns
    /// - Err(NotFound): no such id
    async fn delete(&self, id: &str) -> RepositoryResult<()>;

    /// # Returns
    /// - Ok(usize): number of deleted records
    async fn delete_all(&self) -> RepositoryResult<usize>;

    async fn count(&self) -> RepositoryResult<usize>;
}
