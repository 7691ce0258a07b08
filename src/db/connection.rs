/// Store handle and database wrapper
///
/// `StoreHandle` owns the single live connection to a notes store file.
/// `Database` is what record operations run against: the connection plus
/// the clock and id sources used when rows are created.

use crate::core::{Clock, IdGenerator};
use crate::db::schema::SQLITE_INIT;
use crate::error::{NotesError, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::ConnectOptions;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// One connection, one owner
const MAX_CONNECTIONS: u32 = 1;

/// Lifecycle of a `StoreHandle`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleState {
    Unopened,
    Open,
    Closed,
}

struct OpenStore {
    pool: SqlitePool,
    path: PathBuf,
}

/// Owns at most one open connection, keyed by the store file path
pub struct StoreHandle {
    current: Option<OpenStore>,
    state: HandleState,
}

impl Default for StoreHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreHandle {
    pub fn new() -> Self {
        Self {
            current: None,
            state: HandleState::Unopened,
        }
    }

    /// Get a connection to the store at `path`
    ///
    /// Reuses the open connection when it was opened for the same path.
    /// Otherwise the old connection is closed first and a new read-write
    /// connection is opened. The file must already exist.
    ///
    /// # Returns
    /// * `Ok(SqlitePool)` - Connection to the store
    /// * `Err(NotesError::StoreNotFound)` - No file at `path`
    /// * `Err(NotesError::Database)` - The driver failed to open it
    pub async fn obtain<P: AsRef<Path>>(&mut self, path: P) -> Result<SqlitePool> {
        let path = path.as_ref();

        if let Some(open) = &self.current {
            if open.path == path {
                debug!(path = %path.display(), "reusing open notes store");
                return Ok(open.pool.clone());
            }
            info!(
                from = %open.path.display(),
                to = %path.display(),
                "store path changed, reconnecting"
            );
        }

        self.release().await;

        if !path.exists() {
            warn!(path = %path.display(), "notes store file does not exist");
            return Err(NotesError::StoreNotFound(path.to_path_buf()));
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(false)
            .read_only(false)
            .disable_statement_logging();

        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        info!(path = %path.display(), "opened notes store");

        self.current = Some(OpenStore {
            pool: pool.clone(),
            path: path.to_path_buf(),
        });
        self.state = HandleState::Open;

        Ok(pool)
    }

    /// Close the connection if one is open
    ///
    /// Never fails; shutting the pool down waits for in-flight statements.
    pub async fn release(&mut self) {
        if let Some(open) = self.current.take() {
            open.pool.close().await;
            info!(path = %open.path.display(), "closed notes store");
            self.state = HandleState::Closed;
        }
    }

    pub fn state(&self) -> HandleState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == HandleState::Open
    }

    /// Path of the open store, if any
    pub fn path(&self) -> Option<&Path> {
        self.current.as_ref().map(|open| open.path.as_path())
    }
}

/// Create a store file with the notes/folders tables
///
/// Existing tables are left untouched.
pub async fn initialize_store<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();

    // Create parent directory if it doesn't exist
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .disable_statement_logging();

    let pool = SqlitePoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect_with(options)
        .await?;

    let applied = apply_schema(&pool).await;
    pool.close().await;
    applied?;

    info!(path = %path.display(), "initialized notes store");
    Ok(())
}

async fn apply_schema(pool: &SqlitePool) -> Result<()> {
    // sqlx::query runs one statement at a time
    for statement in SQLITE_INIT.split(';') {
        let trimmed = statement.trim();
        if !trimmed.is_empty() {
            sqlx::query(trimmed).execute(pool).await?;
        }
    }
    Ok(())
}

/// Record operations run against this
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl Database {
    /// Wrap a connection with explicit time and id sources
    pub fn with_sources(
        pool: SqlitePool,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self { pool, clock, ids }
    }

    /// Create a test database in memory
    ///
    /// Used for testing. Creates a fresh database with the schema applied.
    #[cfg(test)]
    pub async fn new_test(clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Result<Self> {
        use std::str::FromStr;

        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;

        // A single connection that never recycles, or the in-memory db is lost
        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        apply_schema(&pool).await?;

        Ok(Self::with_sources(pool, clock, ids))
    }

    /// Get reference to the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub(crate) fn now(&self) -> i64 {
        self.clock.now_millis()
    }

    pub(crate) fn next_id(&self) -> String {
        self.ids.next_id()
    }

    /// Row counts, for status output
    pub async fn stats(&self) -> Result<DatabaseStats> {
        let note_count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM notes")
            .fetch_one(&self.pool)
            .await?;

        let folder_count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM folders")
            .fetch_one(&self.pool)
            .await?;

        Ok(DatabaseStats {
            total_notes: note_count.0,
            total_folders: folder_count.0,
        })
    }
}

/// Database statistics
#[derive(Debug, Clone)]
pub struct DatabaseStats {
    pub total_notes: i64,
    pub total_folders: i64,
}
