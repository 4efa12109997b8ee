//! Shared application state.
//!
//! `CoreState` is built once at startup, wrapped in `Arc`, and shared by
//! every request handler. It owns the store location, the change hub,
//! the generative-model seam, and the admin allow-list. Handlers open a
//! fresh SQLite connection per request — the store itself is the only
//! authority; nothing here caches records.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rusqlite::Connection;

use crate::db::{self, DatabaseError};
use crate::events::StoreHub;
use crate::genai::GenerativeModel;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The backing store is not configured or not reachable. Detected
    /// at startup; surfaced as a blocking configuration error.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

pub struct CoreState {
    db_path: PathBuf,
    pub hub: StoreHub,
    pub genai: Arc<dyn GenerativeModel>,
    admin_emails: Vec<String>,
}

impl std::fmt::Debug for CoreState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoreState")
            .field("db_path", &self.db_path)
            .field("admin_emails", &self.admin_emails)
            .finish_non_exhaustive()
    }
}

impl CoreState {
    /// Open (and migrate) the store, then build the shared state.
    ///
    /// Fails with `StoreUnavailable` when the data directory cannot be
    /// created or the database cannot be opened — the service refuses
    /// to start rather than limping along without persistence.
    pub fn initialize(
        data_dir: &Path,
        genai: Arc<dyn GenerativeModel>,
        admin_emails: Vec<String>,
    ) -> Result<Self, CoreError> {
        std::fs::create_dir_all(data_dir)
            .map_err(|e| CoreError::StoreUnavailable(format!("{}: {e}", data_dir.display())))?;

        let db_path = data_dir.join("clinic.db");
        let conn = db::sqlite::open_database(&db_path)
            .map_err(|e| CoreError::StoreUnavailable(e.to_string()))?;
        drop(conn);

        tracing::info!(db = %db_path.display(), "store ready");
        Ok(Self {
            db_path,
            hub: StoreHub::new(),
            genai,
            admin_emails,
        })
    }

    /// Open a connection to the clinic store for one request.
    pub fn open_db(&self) -> Result<Connection, CoreError> {
        db::sqlite::open_database(&self.db_path)
            .map_err(|e| CoreError::StoreUnavailable(e.to_string()))
    }

    pub fn admin_emails(&self) -> &[String] {
        &self.admin_emails
    }
}
