// ==========================================
// Agro Asociados - member repository (rusqlite)
// ==========================================
// Table: asociados
// Passthrough columns are kept as JSON in extra_json
// ==========================================

use crate::domain::member::{MemberField, MemberRecord, StoredMember};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::member_repo::MemberRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

const SELECT_COLUMNS: &str = "id, name, surname, national_id, phone, address, \
     sector_or_neighborhood, land_area, livestock_count, extra_json, created_at, updated_at";

/// Row as stored, before timestamp / JSON decoding
struct MemberRow {
    id: String,
    fields: [String; 8], // MemberField::DEFAULT_ORDER
    extra_json: String,
    created_at: String,
    updated_at: String,
}

impl MemberRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            fields: [
                row.get(1)?,
                row.get(2)?,
                row.get(3)?,
                row.get(4)?,
                row.get(5)?,
                row.get(6)?,
                row.get(7)?,
                row.get(8)?,
            ],
            extra_json: row.get(9)?,
            created_at: row.get(10)?,
            updated_at: row.get(11)?,
        })
    }

    fn into_stored(self) -> RepositoryResult<StoredMember> {
        let [name, surname, national_id, phone, address, sector_or_neighborhood, land_area, livestock_count] =
            self.fields;
        let extra: BTreeMap<String, String> = serde_json::from_str(&self.extra_json)?;

        Ok(StoredMember {
            id: self.id,
            record: MemberRecord {
                name,
                surname,
                national_id,
                phone,
                address,
                sector_or_neighborhood,
                land_area,
                livestock_count,
                extra,
            },
            created_at: parse_timestamp(&self.created_at)?,
            updated_at: parse_timestamp(&self.updated_at)?,
        })
    }
}

fn parse_timestamp(raw: &str) -> RepositoryResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::SerializationError(format!("timestamp '{}': {}", raw, e)))
}

// ==========================================
// MemberRepositoryImpl
// ==========================================
pub struct MemberRepositoryImpl {
    conn: Arc<Mutex<Connection>>,
}

impl MemberRepositoryImpl {
    /// Open a database file and make sure the schema exists
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = crate::db::open_sqlite_connection(db_path)?;
        crate::db::init_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Share an existing connection
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn query_members(
        conn: &Connection,
        sql: &str,
        params: &[&dyn rusqlite::ToSql],
    ) -> RepositoryResult<Vec<StoredMember>> {
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt
            .query_map(params, MemberRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(MemberRow::into_stored).collect()
    }
}

#[async_trait]
impl MemberRepository for MemberRepositoryImpl {
    async fn insert(&self, record: &MemberRecord) -> RepositoryResult<String> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();
        let extra_json = serde_json::to_string(&record.extra)?;

        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO asociados (
                id, name, surname, national_id, phone, address,
                sector_or_neighborhood, land_area, livestock_count,
                extra_json, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?11)
            "#,
            params![
                id,
                record.name,
                record.surname,
                record.national_id,
                record.phone,
                record.address,
                record.sector_or_neighborhood,
                record.land_area,
                record.livestock_count,
                extra_json,
                now,
            ],
        )?;
        Ok(id)
    }

    async fn find_by_field(
        &self,
        field: MemberField,
        value: &str,
    ) -> RepositoryResult<Vec<StoredMember>> {
        // column names come from a closed enum
        let sql = format!(
            "SELECT {} FROM asociados WHERE {} = ?1 ORDER BY rowid",
            SELECT_COLUMNS,
            field.column()
        );
        let conn = self.get_conn()?;
        Self::query_members(&conn, &sql, &[&value])
    }

    async fn list_all(&self) -> RepositoryResult<Vec<StoredMember>> {
        let sql = format!("SELECT {} FROM asociados ORDER BY rowid", SELECT_COLUMNS);
        let conn = self.get_conn()?;
        Self::query_members(&conn, &sql, &[])
    }

    async fn get(&self, id: &str) -> RepositoryResult<Option<StoredMember>> {
        let sql = format!("SELECT {} FROM asociados WHERE id = ?1", SELECT_COLUMNS);
        let conn = self.get_conn()?;
        Ok(Self::query_members(&conn, &sql, &[&id])?.into_iter().next())
    }

    async fn update(&self, id: &str, record: &MemberRecord) -> RepositoryResult<()> {
        let now = Utc::now().to_rfc3339();
        let extra_json = serde_json::to_string(&record.extra)?;

        let conn = self.get_conn()?;
        let changed = conn.execute(
            r#"
            UPDATE asociados SET
                name = ?2, surname = ?3, national_id = ?4, phone = ?5, address = ?6,
                sector_or_neighborhood = ?7, land_area = ?8, livestock_count = ?9,
                extra_json = ?10, updated_at = ?11
            WHERE id = ?1
            "#,
            params![
                id,
                record.name,
                record.surname,
                record.national_id,
                record.phone,
                record.address,
                record.sector_or_neighborhood,
                record.land_area,
                record.livestock_count,
                extra_json,
                now,
            ],
        )?;

        if changed == 0 {
            return Err(RepositoryError::not_found("asociado", id));
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let changed = conn.execute("DELETE FROM asociados WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(RepositoryError::not_found("asociado", id));
        }
        Ok(())
    }

    async fn delete_all(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let deleted = conn.execute("DELETE FROM asociados", [])?;
        Ok(deleted)
    }

    async fn count(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM asociados", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_repo() -> MemberRepositoryImpl {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::init_schema(&conn).unwrap();
        MemberRepositoryImpl::from_connection(Arc::new(Mutex::new(conn)))
    }

    #[tokio::test]
    async fn test_insert_and_get_with_extras() {
        let repo = setup_repo();
        let mut record = MemberRecord::new("Ana", "Ruiz", "001-2");
        record.extra.insert("finca".to_string(), "La Loma".to_string());

        let id = repo.insert(&record).await.unwrap();
        let stored = repo.get(&id).await.unwrap().unwrap();

        assert_eq!(stored.id, id);
        assert_eq!(stored.record, record);
        assert_eq!(stored.created_at, stored.updated_at);
    }

    #[tokio::test]
    async fn test_find_by_field_exact_match() {
        let repo = setup_repo();
        repo.insert(&MemberRecord::new("Ana", "Ruiz", "001-2"))
            .await
            .unwrap();
        repo.insert(&MemberRecord::new("Juan", "Perez", "001-22"))
            .await
            .unwrap();

        let found = repo
            .find_by_field(MemberField::NationalId, "001-2")
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].record.name, "Ana");
    }

    #[tokio::test]
    async fn test_repeated_national_ids_are_accepted() {
        let repo = setup_repo();
        let record = MemberRecord::new("Ana", "Ruiz", "001-2");
        repo.insert(&record).await.unwrap();
        repo.insert(&record).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let repo = setup_repo();
        let id = repo
            .insert(&MemberRecord::new("Ana", "Ruiz", ""))
            .await
            .unwrap();

        let mut changed = MemberRecord::new("Ana", "Ruiz", "001-7");
        changed.phone = "809".to_string();
        repo.update(&id, &changed).await.unwrap();
        assert_eq!(repo.get(&id).await.unwrap().unwrap().record.phone, "809");

        repo.delete(&id).await.unwrap();
        assert!(repo.get(&id).await.unwrap().is_none());

        let err = repo.delete(&id).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound { .. }));
        let err = repo.update("missing", &changed).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_all_returns_count() {
        let repo = setup_repo();
        for i in 0..3 {
            repo.insert(&MemberRecord::new("N", "S", &format!("00{}", i)))
                .await
                .unwrap();
        }
        assert_eq!(repo.delete_all().await.unwrap(), 3);
        assert_eq!(repo.list_all().await.unwrap().len(), 0);
    }
}
