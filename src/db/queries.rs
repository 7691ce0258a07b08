/// SQL query functions for notes and folders
///
/// Every operation is a single prepared statement, except note updates which
/// read the row before writing it.

use crate::db::models::*;
use crate::db::Database;
use crate::error::{NotesError, Result};

const NOTE_COLUMNS: &str = "id, title, body, parent_id, user_created_time, user_updated_time";
const FOLDER_COLUMNS: &str = "id, title, parent_id, user_created_time, user_updated_time";

impl Database {
    /// Insert a new note and hand back what was stored
    ///
    /// # Arguments
    /// * `input` - Title, body and optional folder (root when `None`)
    ///
    /// # Returns
    /// * `Ok(Note)` - The constructed note, with created == updated
    /// * `Err(NotesError)` - If the insert fails
    pub async fn create_note(&self, input: NoteInput) -> Result<Note> {
        let now = self.now();
        let note = Note {
            id: self.next_id(),
            title: input.title,
            body: input.body,
            parent_id: input.folder_id.unwrap_or_else(|| ROOT_PARENT_ID.to_string()),
            user_created_time: now,
            user_updated_time: now,
        };

        sqlx::query(
            r#"
            INSERT INTO notes (id, title, body, parent_id, user_created_time, user_updated_time)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&note.id)
        .bind(&note.title)
        .bind(&note.body)
        .bind(&note.parent_id)
        .bind(note.user_created_time)
        .bind(note.user_updated_time)
        .execute(self.pool())
        .await?;

        Ok(note)
    }

    /// All notes, most recently updated first
    pub async fn get_all_notes(&self) -> Result<Vec<Note>> {
        let notes = sqlx::query_as::<_, Note>(&format!(
            "SELECT {} FROM notes ORDER BY user_updated_time DESC, rowid DESC",
            NOTE_COLUMNS
        ))
        .fetch_all(self.pool())
        .await?;

        Ok(notes)
    }

    /// Get note by ID
    pub async fn get_note_by_id(&self, id: &str) -> Result<Option<Note>> {
        let note = sqlx::query_as::<_, Note>(&format!(
            "SELECT {} FROM notes WHERE id = ?",
            NOTE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        Ok(note)
    }

    /// Notes filed directly under a folder (`""` for the root)
    pub async fn get_notes_in_folder(&self, folder_id: &str) -> Result<Vec<Note>> {
        let notes = sqlx::query_as::<_, Note>(&format!(
            "SELECT {} FROM notes WHERE parent_id = ? \
             ORDER BY user_updated_time DESC, rowid DESC",
            NOTE_COLUMNS
        ))
        .bind(folder_id)
        .fetch_all(self.pool())
        .await?;

        Ok(notes)
    }

    /// Update a note's title and/or body
    ///
    /// Reads the existing row first so untouched fields, `parent_id` and
    /// `user_created_time` carry over. The read and the write are separate
    /// statements: a writer outside this process can slip in between.
    ///
    /// # Returns
    /// * `Ok(Note)` - The note as it now reads
    /// * `Err(NotesError::NotFound)` - No note with this id
    /// * `Err(NotesError::NoRowsChanged)` - The row vanished before the write
    pub async fn update_note(&self, id: &str, changes: NoteChanges) -> Result<Note> {
        let existing = self
            .get_note_by_id(id)
            .await?
            .ok_or_else(|| NotesError::NotFound(id.to_string()))?;

        let updated = Note {
            title: changes.title.unwrap_or(existing.title),
            body: changes.body.unwrap_or(existing.body),
            user_updated_time: self.now(),
            ..existing
        };

        let result = sqlx::query(
            "UPDATE notes SET title = ?, body = ?, user_updated_time = ? WHERE id = ?",
        )
        .bind(&updated.title)
        .bind(&updated.body)
        .bind(updated.user_updated_time)
        .bind(id)
        .execute(self.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(NotesError::NoRowsChanged(id.to_string()));
        }

        Ok(updated)
    }

    /// Insert a new folder and hand back what was stored
    pub async fn create_folder(
        &self,
        title: String,
        parent_id: Option<String>,
    ) -> Result<Folder> {
        let now = self.now();
        let folder = Folder {
            id: self.next_id(),
            title,
            parent_id: parent_id.unwrap_or_else(|| ROOT_PARENT_ID.to_string()),
            user_created_time: now,
            user_updated_time: now,
        };

        sqlx::query(
            r#"
            INSERT INTO folders (id, title, parent_id, user_created_time, user_updated_time)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&folder.id)
        .bind(&folder.title)
        .bind(&folder.parent_id)
        .bind(folder.user_created_time)
        .bind(folder.user_updated_time)
        .execute(self.pool())
        .await?;

        Ok(folder)
    }

    /// All folders, most recently updated first
    pub async fn get_all_folders(&self) -> Result<Vec<Folder>> {
        let folders = sqlx::query_as::<_, Folder>(&format!(
            "SELECT {} FROM folders ORDER BY user_updated_time DESC, rowid DESC",
            FOLDER_COLUMNS
        ))
        .fetch_all(self.pool())
        .await?;

        Ok(folders)
    }

    /// Get folder by ID
    pub async fn get_folder_by_id(&self, id: &str) -> Result<Option<Folder>> {
        let folder = sqlx::query_as::<_, Folder>(&format!(
            "SELECT {} FROM folders WHERE id = ?",
            FOLDER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        Ok(folder)
    }
}
