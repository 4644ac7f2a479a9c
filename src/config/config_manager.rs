// ==========================================
// Agro Asociados - configuration manager
// ==========================================
// Responsibility: read overrides from config_kv (scope 'global'),
// fall back to the defaults fixed in code
// ==========================================

use crate::config::import_config_trait::ImportConfigReader;
use crate::db::open_sqlite_connection;
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use tracing::warn;

const GLOBAL_SCOPE: &str = "global";

// ==========================================
// ConfigManager
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// # Arguments
    /// - db_path: database file path
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        crate::db::init_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Share an existing connection (PRAGMAs re-applied, idempotent)
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            crate::db::configure_sqlite_connection(&guard)?;
        }
        Ok(Self { conn })
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// Raw global value, None when not overridden
    pub fn get_global_config_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = ?1 AND key = ?2",
                params![GLOBAL_SCOPE, key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Write (upsert) a global override
    pub fn set_global(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES (?1, ?2, ?3)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?3, updated_at = datetime('now')",
            params![GLOBAL_SCOPE, key, value],
        )?;
        Ok(())
    }

    /// All global overrides as a JSON object string
    pub fn get_config_snapshot(&self) -> RepositoryResult<String> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = ?1 ORDER BY key")?;

        let config_map: BTreeMap<String, String> = stmt
            .query_map(params![GLOBAL_SCOPE], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<Result<_, _>>()?;

        Ok(serde_json::to_string(&config_map)?)
    }

    /// Parsed value with default; unparsable overrides fall back with a warning
    fn get_parsed_or_default<T>(&self, key: &str, default: T) -> RepositoryResult<T>
    where
        T: FromStr + Display,
    {
        let Some(raw) = self.get_global_config_value(key)? else {
            return Ok(default);
        };

        match raw.trim().parse::<T>() {
            Ok(value) => Ok(value),
            Err(_) => {
                warn!(
                    config_key = key,
                    raw_value = %raw,
                    default = %default,
                    "invalid config value, using default"
                );
                Ok(default)
            }
        }
    }

    /// Default page size of member listings
    pub fn get_members_page_size(&self) -> RepositoryResult<usize> {
        let size = self.get_parsed_or_default(config_keys::MEMBERS_PAGE_SIZE, defaults::PAGE_SIZE)?;
        Ok(size.max(1))
    }
}

// ==========================================
// ImportConfigReader implementation
// ==========================================
#[async_trait]
impl ImportConfigReader for ConfigManager {
    async fn get_progress_log_every(&self) -> RepositoryResult<usize> {
        let every = self.get_parsed_or_default(
            config_keys::PROGRESS_LOG_EVERY,
            defaults::PROGRESS_LOG_EVERY,
        )?;
        Ok(every.max(1))
    }

    async fn get_sanitize_json_values(&self) -> RepositoryResult<bool> {
        self.get_parsed_or_default(
            config_keys::SANITIZE_JSON_VALUES,
            defaults::SANITIZE_JSON_VALUES,
        )
    }

    async fn get_preview_rows(&self) -> RepositoryResult<usize> {
        self.get_parsed_or_default(config_keys::PREVIEW_ROWS, defaults::PREVIEW_ROWS)
    }
}

// ==========================================
// Config keys
// ==========================================
pub mod config_keys {
    pub const PROGRESS_LOG_EVERY: &str = "import.progress_log_every";
    pub const SANITIZE_JSON_VALUES: &str = "import.sanitize_json_values";
    pub const PREVIEW_ROWS: &str = "import.preview_rows";
    pub const MEMBERS_PAGE_SIZE: &str = "members.page_size";
}

/// Built-in defaults
pub mod defaults {
    pub const PROGRESS_LOG_EVERY: usize = 5;
    pub const SANITIZE_JSON_VALUES: bool = true;
    pub const PREVIEW_ROWS: usize = 3;
    pub const PAGE_SIZE: usize = 10;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_manager() -> ConfigManager {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::init_schema(&conn).unwrap();
        ConfigManager::from_connection(Arc::new(Mutex::new(conn))).unwrap()
    }

    #[tokio::test]
    async fn test_defaults_without_overrides() {
        let manager = setup_manager();
        assert_eq!(manager.get_progress_log_every().await.unwrap(), 5);
        assert!(manager.get_sanitize_json_values().await.unwrap());
        assert_eq!(manager.get_preview_rows().await.unwrap(), 3);
        assert_eq!(manager.get_members_page_size().unwrap(), 10);
        assert_eq!(manager.get_config_snapshot().unwrap(), "{}");
    }

    #[tokio::test]
    async fn test_overrides_and_snapshot() {
        let manager = setup_manager();
        manager.set_global(config_keys::PREVIEW_ROWS, "7").unwrap();
        manager
            .set_global(config_keys::SANITIZE_JSON_VALUES, "false")
            .unwrap();
        manager.set_global(config_keys::PREVIEW_ROWS, "8").unwrap();

        assert_eq!(manager.get_preview_rows().await.unwrap(), 8);
        assert!(!manager.get_sanitize_json_values().await.unwrap());

        let snapshot: BTreeMap<String, String> =
            serde_json::from_str(&manager.get_config_snapshot().unwrap()).unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[config_keys::PREVIEW_ROWS], "8");
    }

    #[tokio::test]
    async fn test_invalid_value_falls_back_to_default() {
        let manager = setup_manager();
        manager
            .set_global(config_keys::PROGRESS_LOG_EVERY, "often")
            .unwrap();
        manager.set_global(config_keys::MEMBERS_PAGE_SIZE, "0").unwrap();

        assert_eq!(manager.get_progress_log_every().await.unwrap(), 5);
        assert_eq!(manager.get_members_page_size().unwrap(), 1);
    }
}
