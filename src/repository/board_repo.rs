// ==========================================
// Agro Asociados - board officer repository
// ==========================================
// Table: directiva
// Data access only
// ==========================================

use crate::domain::board::BoardMember;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

const DATE_FORMAT: &str = "%Y-%m-%d";

const SELECT_COLUMNS: &str = "id, name, surname, national_id, phone, email, photo, position, \
     start_date, end_date, active, biography";

pub struct BoardMemberRepository {
    conn: Arc<Mutex<Connection>>,
}

impl BoardMemberRepository {
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

    fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<BoardMember> {
        Ok(BoardMember {
            id: row.get(0)?,
            name: row.get(1)?,
            surname: row.get(2)?,
            national_id: row.get(3)?,
            phone: row.get(4)?,
            email: row.get(5)?,
            photo: row.get(6)?,
            position: row.get(7)?,
            start_date: row
                .get::<_, Option<String>>(8)?
                .and_then(|s| NaiveDate::parse_from_str(&s, DATE_FORMAT).ok()),
            end_date: row
                .get::<_, Option<String>>(9)?
                .and_then(|s| NaiveDate::parse_from_str(&s, DATE_FORMAT).ok()),
            active: row.get::<_, i64>(10)? != 0,
            biography: row.get(11)?,
        })
    }

    /// Insert a new officer; returns the generated id
    pub fn create(&self, member: &BoardMember) -> RepositoryResult<String> {
        let id = Uuid::new_v4().to_string();
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO directiva (
                id, name, surname, national_id, phone, email, photo,
                position, start_date, end_date, active, biography
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
            params![
                id,
                member.name,
                member.surname,
                member.national_id,
                member.phone,
                member.email,
                member.photo,
                member.position,
                member.start_date.map(|d| d.format(DATE_FORMAT).to_string()),
                member.end_date.map(|d| d.format(DATE_FORMAT).to_string()),
                member.active as i64,
                member.biography,
            ],
        )?;
        Ok(id)
    }

    /// Overwrite an officer by id
    pub fn update(&self, member: &BoardMember) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let changed = conn.execute(
            r#"
            UPDATE directiva SET
                name = ?2, surname = ?3, national_id = ?4, phone = ?5, email = ?6,
                photo = ?7, position = ?8, start_date = ?9, end_date = ?10,
                active = ?11, biography = ?12
            WHERE id = ?1
            "#,
            params![
                member.id,
                member.name,
                member.surname,
                member.national_id,
                member.phone,
                member.email,
                member.photo,
                member.position,
                member.start_date.map(|d| d.format(DATE_FORMAT).to_string()),
                member.end_date.map(|d| d.format(DATE_FORMAT).to_string()),
                member.active as i64,
                member.biography,
            ],
        )?;
        if changed == 0 {
            return Err(RepositoryError::not_found("directiva", &member.id));
        }
        Ok(())
    }

    pub fn find_by_id(&self, id: &str) -> RepositoryResult<Option<BoardMember>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM directiva WHERE id = ?1", SELECT_COLUMNS);
        let member = conn
            .query_row(&sql, params![id], Self::map_row)
            .optional()?;
        Ok(member)
    }

    /// First active officer holding `position` (stored display title)
    pub fn find_active_by_position(&self, position: &str) -> RepositoryResult<Option<BoardMember>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM directiva WHERE position = ?1 AND active = 1 ORDER BY rowid LIMIT 1",
            SELECT_COLUMNS
        );
        let member = conn
            .query_row(&sql, params![position], Self::map_row)
            .optional()?;
        Ok(member)
    }

    pub fn list_all(&self) -> RepositoryResult<Vec<BoardMember>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM directiva ORDER BY rowid", SELECT_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let members = stmt
            .query_map([], Self::map_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(members)
    }

    pub fn delete(&self, id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let changed = conn.execute("DELETE FROM directiva WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(RepositoryError::not_found("directiva", id));
        }
        Ok(())
    }
}
