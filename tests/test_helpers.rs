// ==========================================
// Test helpers
// ==========================================
// Temp database, application state, sessions, sample inputs
// ==========================================
#![allow(dead_code)]

use agro_asociados::app::{AuthProvider, Identity, SessionContext};
use agro_asociados::domain::{ImportProgress, ImportState, Role, UserAccount};
use agro_asociados::importer::ImportObserver;
use agro_asociados::AppState;
use async_trait::async_trait;
use std::error::Error;
use std::io::Write;
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;

pub const ADMIN_EMAIL: &str = "admin@coop.org";
pub const EDITOR_EMAIL: &str = "editor@coop.org";

/// Header row in Spanish, comma separated
pub const CSV_WITH_HEADER: &str = "nombre,apellido,cedula,telefono,sector\n\
Ana,Ruiz,001-1,8095550001,Los Pinos\n\
Luis,Gomez,001-2,8095550002,El Cerro\n\
Maria,Santos,001-3,8095550003,Los Pinos\n";

/// Semicolon export with quoted values and a BOM
pub const CSV_SEMICOLON_QUOTED: &str =
    "\u{feff}\"Nombre\";\"Apellidos\";\"Cédula\";\"Dirección\"\n\"Pedro\";\"Mena\";\"002-1\";\"Calle 1\"\n";

/// Create a temp SQLite file and initialise the schema
///
/// # Returns
/// - NamedTempFile: keep alive for the duration of the test
/// - String: database path
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file
        .path()
        .to_str()
        .ok_or("temp path is not UTF-8")?
        .to_string();

    agro_asociados::logging::init_test();
    let conn = agro_asociados::db::open_sqlite_connection(&db_path)?;
    agro_asociados::db::init_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// AppState on a fresh temp database, with one admin and one editor
pub fn create_test_state() -> (NamedTempFile, AppState) {
    let (temp_file, db_path) = create_test_db().expect("create test db");
    let state = AppState::new(&db_path).expect("build app state");
    seed_users(&state);
    (temp_file, state)
}

/// Same as `create_test_state`, recording every import callback
pub fn create_observed_state() -> (NamedTempFile, AppState, Arc<RecordingObserver>) {
    let (temp_file, db_path) = create_test_db().expect("create test db");
    let observer = Arc::new(RecordingObserver::default());
    let state = AppState::with_import_observer(&db_path, observer.clone()).expect("build app state");
    seed_users(&state);
    (temp_file, state, observer)
}

fn seed_users(state: &AppState) {
    state
        .ensure_admin("Administrador", ADMIN_EMAIL)
        .expect("bootstrap admin");
    let admin = bootstrap_admin_session();
    state
        .user_api
        .create(&admin, UserAccount::new("Editora", EDITOR_EMAIL, Role::Editor))
        .expect("create editor");
}

fn bootstrap_admin_session() -> SessionContext {
    let identity = Identity {
        uid: "uid-admin".to_string(),
        email: ADMIN_EMAIL.to_string(),
        display_name: None,
    };
    SessionContext::for_user(
        identity,
        UserAccount::new("Administrador", ADMIN_EMAIL, Role::Admin),
    )
}

pub async fn admin_session(state: &AppState) -> SessionContext {
    state
        .open_session(&FakeAuthProvider::signed_in(ADMIN_EMAIL))
        .await
        .expect("admin session")
}

pub async fn editor_session(state: &AppState) -> SessionContext {
    state
        .open_session(&FakeAuthProvider::signed_in(EDITOR_EMAIL))
        .await
        .expect("editor session")
}

/// Write `contents` to a temp file with the given suffix
pub fn write_temp_file(contents: &[u8], suffix: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("create temp file");
    file.write_all(contents).expect("write temp file");
    file.flush().expect("flush temp file");
    file
}

// ==========================================
// FakeAuthProvider
// ==========================================
pub struct FakeAuthProvider {
    identity: Mutex<Option<Identity>>,
}

impl FakeAuthProvider {
    pub fn signed_in(email: &str) -> Self {
        Self {
            identity: Mutex::new(Some(Identity {
                uid: format!("uid-{}", email),
                email: email.to_string(),
                display_name: None,
            })),
        }
    }

    pub fn signed_out() -> Self {
        Self {
            identity: Mutex::new(None),
        }
    }
}

#[async_trait]
impl AuthProvider for FakeAuthProvider {
    async fn current_identity(&self) -> anyhow::Result<Option<Identity>> {
        Ok(self.identity.lock().unwrap().clone())
    }

    async fn sign_out(&self) -> anyhow::Result<()> {
        *self.identity.lock().unwrap() = None;
        Ok(())
    }
}

// ==========================================
// RecordingObserver
// ==========================================
#[derive(Default)]
pub struct RecordingObserver {
    pub transitions: Mutex<Vec<(ImportState, ImportState)>>,
    pub progress: Mutex<Vec<ImportProgress>>,
}

impl RecordingObserver {
    pub fn states_reached(&self) -> Vec<ImportState> {
        self.transitions
            .lock()
            .unwrap()
            .iter()
            .map(|(_, to)| *to)
            .collect()
    }

    pub fn clear(&self) {
        self.transitions.lock().unwrap().clear();
        self.progress.lock().unwrap().clear();
    }
}

impl ImportObserver for RecordingObserver {
    fn on_state_change(&self, _run_id: &str, from: ImportState, to: ImportState) {
        self.transitions.lock().unwrap().push((from, to));
    }

    fn on_progress(&self, _run_id: &str, progress: ImportProgress) {
        self.progress.lock().unwrap().push(progress);
    }
}
