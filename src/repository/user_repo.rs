// ==========================================
// Agro Asociados - user repository
// ==========================================
// Table: usuarios
// ==========================================

use crate::domain::user::{Role, UserAccount};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};
use tracing::warn;
use uuid::Uuid;

pub struct UserRepository {
    conn: Arc<Mutex<Connection>>,
}

impl UserRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = crate::db::open_sqlite_connection(db_path)?;
        crate::db::init_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<UserAccount> {
        let raw_role: String = row.get(3)?;
        let role = raw_role.parse::<Role>().unwrap_or_else(|e| {
            warn!(role = %raw_role, error = %e, "unknown stored role, treating as editor");
            Role::Editor
        });
        Ok(UserAccount {
            id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
            role,
        })
    }

    pub fn create(&self, user: &UserAccount) -> RepositoryResult<String> {
        let id = Uuid::new_v4().to_string();
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO usuarios (id, name, email, role) VALUES (?1, ?2, ?3, ?4)",
            params![id, user.name, user.email, user.role.as_str()],
        )?;
        Ok(id)
    }

    pub fn update(&self, user: &UserAccount) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let changed = conn.execute(
            "UPDATE usuarios SET name = ?2, email = ?3, role = ?4 WHERE id = ?1",
            params![user.id, user.name, user.email, user.role.as_str()],
        )?;
        if changed == 0 {
            return Err(RepositoryError::not_found("usuario", &user.id));
        }
        Ok(())
    }

    pub fn find_by_id(&self, id: &str) -> RepositoryResult<Option<UserAccount>> {
        let conn = self.get_conn()?;
        let user = conn
            .query_row(
                "SELECT id, name, email, role FROM usuarios WHERE id = ?1",
                params![id],
                Self::map_row,
            )
            .optional()?;
        Ok(user)
    }

    /// Case-insensitive lookup by email
    pub fn find_by_email(&self, email: &str) -> RepositoryResult<Option<UserAccount>> {
        let conn = self.get_conn()?;
        let user = conn
            .query_row(
                "SELECT id, name, email, role FROM usuarios WHERE lower(email) = lower(?1) \
                 ORDER BY rowid LIMIT 1",
                params![email.trim()],
                Self::map_row,
            )
            .optional()?;
        Ok(user)
    }

    pub fn list_all(&self) -> RepositoryResult<Vec<UserAccount>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("SELECT id, name, email, role FROM usuarios ORDER BY name")?;
        let users = stmt
            .query_map([], Self::map_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(users)
    }

    pub fn delete(&self, id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let changed = conn.execute("DELETE FROM usuarios WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(RepositoryError::not_found("usuario", id));
        }
        Ok(())
    }
}
