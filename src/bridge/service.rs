/// Request handlers exposed to the UI
///
/// Wraps the store handle and the record operations. Every handler returns a
/// plain value: failures are logged and collapse to `None` or an empty list,
/// so "not found", "not connected" and "store error" look the same to the UI.

use crate::bridge::request::{Reply, Request};
use crate::config::Config;
use crate::core::{
    Clock, IdGenerator, Searcher, SystemClock, UuidGenerator, DEFAULT_SEARCH_LIMIT,
};
use crate::db::{
    Database, DatabaseStats, Folder, Note, NoteChanges, NoteInput, Status, StoreHandle,
};
use crate::error::{NotesError, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info};

pub struct NotesService {
    handle: StoreHandle,
    db: Option<Database>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    searcher: Searcher,
}

impl Default for NotesService {
    fn default() -> Self {
        Self::new()
    }
}

impl NotesService {
    /// A disconnected service using the wall clock and random UUIDs
    pub fn new() -> Self {
        Self::with_sources(Arc::new(SystemClock), Arc::new(UuidGenerator))
    }

    pub fn with_sources(clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            handle: StoreHandle::new(),
            db: None,
            clock,
            ids,
            searcher: Searcher::new(),
        }
    }

    /// Start up from configuration
    ///
    /// Without a store path the service stays disconnected. A store that
    /// fails to open is logged and the service stays disconnected too.
    pub async fn from_config(config: &Config) -> Self {
        let mut service = Self::new();

        match config.db_path.as_deref() {
            Some(path) => {
                if let Err(e) = service.connect(path).await {
                    error!(
                        path = %path.display(),
                        error = %e,
                        "notes storage unavailable: {}",
                        e.user_message()
                    );
                }
            }
            None => info!("no store path configured, running without persistence"),
        }

        service
    }

    /// Open (or keep) the store at `path`
    ///
    /// Startup failures propagate. On failure the service is left
    /// disconnected.
    pub async fn connect<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        match self.handle.obtain(path).await {
            Ok(pool) => {
                self.db = Some(Database::with_sources(
                    pool,
                    self.clock.clone(),
                    self.ids.clone(),
                ));
                Ok(())
            }
            Err(e) => {
                self.db = None;
                Err(e)
            }
        }
    }

    pub fn status(&self) -> Status {
        match (&self.db, self.handle.path()) {
            (Some(_), Some(path)) => Status {
                connected: true,
                path: Some(path.display().to_string()),
            },
            _ => Status::disconnected(),
        }
    }

    pub async fn stats(&self) -> Option<DatabaseStats> {
        let db = self.connected("stats")?;
        collapse_one("stats", db.stats().await)
    }

    pub async fn get_all_notes(&self) -> Vec<Note> {
        let Some(db) = self.connected("getAllNotes") else {
            return Vec::new();
        };
        collapse_many("getAllNotes", db.get_all_notes().await)
    }

    pub async fn get_note_by_id(&self, id: &str) -> Option<Note> {
        let db = self.connected("getNoteById")?;
        collapse_optional("getNoteById", db.get_note_by_id(id).await)
    }

    pub async fn create_note(
        &self,
        title: String,
        body: String,
        folder_id: Option<String>,
    ) -> Option<Note> {
        let db = self.connected("createNote")?;
        let input = NoteInput {
            title,
            body,
            folder_id,
        };
        collapse_one("createNote", db.create_note(input).await)
    }

    pub async fn update_note(&self, id: &str, title: String, body: String) -> Option<Note> {
        self.apply_update("updateNote", id, NoteChanges::title_and_body(title, body))
            .await
    }

    pub async fn update_note_title(&self, id: &str, title: String) -> Option<Note> {
        self.apply_update("updateNoteTitle", id, NoteChanges::title(title))
            .await
    }

    pub async fn update_note_body(&self, id: &str, body: String) -> Option<Note> {
        self.apply_update("updateNoteBody", id, NoteChanges::body(body))
            .await
    }

    async fn apply_update(
        &self,
        op: &'static str,
        id: &str,
        changes: NoteChanges,
    ) -> Option<Note> {
        let db = self.connected(op)?;
        collapse_one(op, db.update_note(id, changes).await)
    }

    pub async fn create_folder(
        &self,
        title: String,
        parent_id: Option<String>,
    ) -> Option<Folder> {
        let db = self.connected("createFolder")?;
        collapse_one("createFolder", db.create_folder(title, parent_id).await)
    }

    pub async fn get_all_folders(&self) -> Vec<Folder> {
        let Some(db) = self.connected("getAllFolders") else {
            return Vec::new();
        };
        collapse_many("getAllFolders", db.get_all_folders().await)
    }

    pub async fn get_folder_by_id(&self, id: &str) -> Option<Folder> {
        let db = self.connected("getFolderById")?;
        collapse_optional("getFolderById", db.get_folder_by_id(id).await)
    }

    pub async fn get_notes_in_folder(&self, folder_id: &str) -> Vec<Note> {
        let Some(db) = self.connected("getNotesInFolder") else {
            return Vec::new();
        };
        collapse_many("getNotesInFolder", db.get_notes_in_folder(folder_id).await)
    }

    pub async fn search_notes(&self, query: &str, limit: usize) -> Vec<Note> {
        let Some(db) = self.connected("searchNotes") else {
            return Vec::new();
        };
        let results = self.searcher.search(db, query, limit).await;
        collapse_many("searchNotes", results)
            .into_iter()
            .map(|r| r.note)
            .collect()
    }

    /// Release the store. Later requests report "not connected".
    pub async fn close(&mut self) {
        self.db = None;
        self.handle.release().await;
    }

    /// Dispatch one bridge request
    pub async fn handle(&mut self, request: Request) -> Reply {
        debug!(op = request.name(), "handling request");

        match request {
            Request::GetStatus => Reply::Status(self.status()),
            Request::GetAllNotes => Reply::Notes(self.get_all_notes().await),
            Request::GetNoteById { id } => Reply::Note(self.get_note_by_id(&id).await),
            Request::CreateNote {
                title,
                body,
                folder_id,
            } => Reply::Note(self.create_note(title, body, folder_id).await),
            Request::UpdateNote { id, title, body } => {
                Reply::Note(self.update_note(&id, title, body).await)
            }
            Request::UpdateNoteTitle { id, title } => {
                Reply::Note(self.update_note_title(&id, title).await)
            }
            Request::UpdateNoteBody { id, body } => {
                Reply::Note(self.update_note_body(&id, body).await)
            }
            Request::CreateFolder { title, parent_id } => {
                Reply::Folder(self.create_folder(title, parent_id).await)
            }
            Request::GetAllFolders => Reply::Folders(self.get_all_folders().await),
            Request::GetFolderById { id } => Reply::Folder(self.get_folder_by_id(&id).await),
            Request::GetNotesInFolder { folder_id } => {
                Reply::Notes(self.get_notes_in_folder(&folder_id).await)
            }
            Request::SearchNotes { query, limit } => Reply::Notes(
                self.search_notes(&query, limit.unwrap_or(DEFAULT_SEARCH_LIMIT))
                    .await,
            ),
            Request::Close => {
                self.close().await;
                Reply::Closed
            }
        }
    }

    fn connected(&self, op: &'static str) -> Option<&Database> {
        if self.db.is_none() {
            debug!(op, "{}", NotesError::NotConnected);
        }
        self.db.as_ref()
    }
}

fn log_failure(op: &'static str, e: &NotesError) {
    if e.is_not_found() {
        debug!(op, error = %e, "request found nothing");
    } else {
        error!(op, error = %e, "request failed");
    }
}

fn collapse_one<T>(op: &'static str, result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            log_failure(op, &e);
            None
        }
    }
}

fn collapse_optional<T>(op: &'static str, result: Result<Option<T>>) -> Option<T> {
    collapse_one(op, result).flatten()
}

fn collapse_many<T>(op: &'static str, result: Result<Vec<T>>) -> Vec<T> {
    collapse_one(op, result).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::{FixedClock, SequenceIds};
    use crate::db::initialize_store;
    use std::collections::HashSet;
    use std::path::PathBuf;
    use tempfile::TempDir;

    async fn connected_service(
        ids: SequenceIds,
    ) -> (NotesService, Arc<FixedClock>, TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.sqlite");
        initialize_store(&path).await.unwrap();

        let clock = Arc::new(FixedClock::new(1_000_000));
        let mut service = NotesService::with_sources(clock.clone(), Arc::new(ids));
        service.connect(&path).await.unwrap();

        (service, clock, dir, path)
    }

    #[tokio::test]
    async fn test_disconnected_service_returns_empty() {
        let service = NotesService::new();

        assert_eq!(service.status(), Status::disconnected());
        assert!(service.get_all_notes().await.is_empty());
        assert!(service.get_note_by_id("x").await.is_none());
        assert!(service
            .create_note("t".into(), "b".into(), None)
            .await
            .is_none());
        assert!(service.create_folder("f".into(), None).await.is_none());
        assert!(service.stats().await.is_none());
    }

    #[tokio::test]
    async fn test_connect_missing_store_propagates() {
        let dir = TempDir::new().unwrap();
        let mut service = NotesService::new();

        let result = service.connect(dir.path().join("missing.sqlite")).await;

        assert!(matches!(result, Err(NotesError::StoreNotFound(_))));
        assert!(!service.status().connected);
    }

    #[tokio::test]
    async fn test_from_config_without_path() {
        let config = Config {
            db_path: None,
            log_level: "info".to_string(),
        };

        let service = NotesService::from_config(&config).await;
        assert!(!service.status().connected);
    }

    #[tokio::test]
    async fn test_from_config_with_bad_path_keeps_running() {
        let dir = TempDir::new().unwrap();
        let config = Config {
            db_path: Some(dir.path().join("missing.sqlite")),
            log_level: "info".to_string(),
        };

        let service = NotesService::from_config(&config).await;
        assert!(!service.status().connected);
        assert!(service.get_all_notes().await.is_empty());
    }

    #[tokio::test]
    async fn test_status_reports_path() {
        let (service, _, _dir, path) = connected_service(SequenceIds::default()).await;

        let status = service.status();
        assert!(status.connected);
        assert_eq!(status.path, Some(path.display().to_string()));
    }

    #[tokio::test]
    async fn test_create_note_ids_are_unique() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.sqlite");
        initialize_store(&path).await.unwrap();

        let mut service = NotesService::new();
        service.connect(&path).await.unwrap();

        let mut ids = HashSet::new();
        for i in 0..20 {
            let note = service
                .create_note(format!("note {}", i), "body".into(), None)
                .await
                .unwrap();
            assert_eq!(note.user_created_time, note.user_updated_time);
            ids.insert(note.id);
        }
        assert_eq!(ids.len(), 20);
    }

    #[tokio::test]
    async fn test_update_missing_note_returns_none() {
        let (service, _, _dir, _) = connected_service(SequenceIds::default()).await;

        assert!(service
            .update_note("ghost", "t".into(), "b".into())
            .await
            .is_none());
        assert!(service.update_note_title("ghost", "t".into()).await.is_none());
        assert!(service.update_note_body("ghost", "b".into()).await.is_none());
        assert!(service.get_all_notes().await.is_empty());
    }

    #[tokio::test]
    async fn test_update_sets_update_time() {
        let (service, clock, _dir, _) = connected_service(SequenceIds::new(["n1"])).await;

        service
            .create_note("T".into(), "B".into(), Some("f1".into()))
            .await
            .unwrap();
        clock.set(1_500_000);

        let updated = service.update_note_body("n1", "B2".into()).await.unwrap();
        assert_eq!(updated.title, "T");
        assert_eq!(updated.body, "B2");
        assert_eq!(updated.parent_id, "f1");
        assert_eq!(updated.user_created_time, 1_000_000);
        assert_eq!(updated.user_updated_time, 1_500_000);
    }

    #[tokio::test]
    async fn test_store_errors_collapse_to_empty() {
        let (service, _, _dir, _) = connected_service(SequenceIds::default()).await;

        // Break the schema out from under the service
        let pool = service.db.as_ref().unwrap().pool();
        for statement in ["DROP TABLE notes", "DROP TABLE folders"] {
            sqlx::query(statement).execute(pool).await.unwrap();
        }

        assert!(service.get_all_notes().await.is_empty());
        assert!(service.get_note_by_id("x").await.is_none());
        assert!(service
            .create_note("t".into(), "b".into(), None)
            .await
            .is_none());
        assert!(service
            .update_note("x", "t".into(), "b".into())
            .await
            .is_none());
        assert!(service.search_notes("t", 10).await.is_empty());
        assert!(service.get_notes_in_folder("").await.is_empty());
        assert!(service.create_folder("f".into(), None).await.is_none());
        assert!(service.get_all_folders().await.is_empty());
        assert!(service.get_folder_by_id("f").await.is_none());
        // Still connected; only the operations failed
        assert!(service.status().connected);
    }

    #[tokio::test]
    async fn test_update_with_no_rows_changed_returns_none() {
        let (service, _, _dir, _) = connected_service(SequenceIds::default()).await;
        let note = service
            .create_note("kept".into(), "body".into(), None)
            .await
            .unwrap();

        sqlx::query(
            "CREATE TRIGGER skip_note_updates BEFORE UPDATE ON notes \
             BEGIN SELECT RAISE(IGNORE); END",
        )
        .execute(service.db.as_ref().unwrap().pool())
        .await
        .unwrap();

        assert!(service
            .update_note_title(&note.id, "lost".into())
            .await
            .is_none());
        assert_eq!(service.get_note_by_id(&note.id).await, Some(note));
    }

    #[tokio::test]
    async fn test_close_disconnects() {
        let (mut service, _, _dir, _) = connected_service(SequenceIds::default()).await;

        let reply = service.handle(Request::Close).await;
        assert_eq!(reply, Reply::Closed);
        assert_eq!(service.status(), Status::disconnected());
        assert!(service.get_all_notes().await.is_empty());

        // Closing twice is harmless
        service.close().await;
    }

    #[tokio::test]
    async fn test_handle_dispatch() {
        let (mut service, _, _dir, _) =
            connected_service(SequenceIds::new(["folder-1", "note-1"])).await;

        let folder = service
            .handle(Request::CreateFolder {
                title: "Inbox".into(),
                parent_id: None,
            })
            .await
            .into_folder()
            .unwrap();
        assert_eq!(folder.id, "folder-1");

        let note = service
            .handle(Request::CreateNote {
                title: "Hello".into(),
                body: "World".into(),
                folder_id: Some(folder.id.clone()),
            })
            .await
            .into_note()
            .unwrap();
        assert_eq!(note.id, "note-1");

        let in_folder = service
            .handle(Request::GetNotesInFolder {
                folder_id: "folder-1".into(),
            })
            .await
            .into_notes();
        assert_eq!(in_folder.len(), 1);

        let found = service
            .handle(Request::SearchNotes {
                query: "hello".into(),
                limit: None,
            })
            .await
            .into_notes();
        assert_eq!(found, vec![note]);

        let folders = service.handle(Request::GetAllFolders).await.into_folders();
        assert_eq!(folders, vec![folder]);
    }
}
