/// Data models for database entities
///
/// Field order matches the column order the UI side expects on the wire.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Parent id used for notes and folders sitting at the root
pub const ROOT_PARENT_ID: &str = "";

/// A persisted note
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Note {
    pub id: String,
    pub title: String,
    pub body: String,
    pub parent_id: String,
    pub user_created_time: i64, // ms since Unix epoch
    pub user_updated_time: i64, // ms since Unix epoch
}

/// A persisted folder. Folders nest through `parent_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Folder {
    pub id: String,
    pub title: String,
    pub parent_id: String,
    pub user_created_time: i64,
    pub user_updated_time: i64,
}

impl Folder {
    /// True when the folder is not nested in another folder
    pub fn is_at_root(&self) -> bool {
        self.parent_id == ROOT_PARENT_ID
    }
}

/// Input for creating a note
#[derive(Debug, Clone, Default)]
pub struct NoteInput {
    pub title: String,
    pub body: String,
    pub folder_id: Option<String>,
}

/// Fields a note update may touch. `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct NoteChanges {
    pub title: Option<String>,
    pub body: Option<String>,
}

impl NoteChanges {
    pub fn title_and_body(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            body: Some(body.into()),
        }
    }

    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            body: None,
        }
    }

    pub fn body(body: impl Into<String>) -> Self {
        Self {
            title: None,
            body: Some(body.into()),
        }
    }
}

/// Connection status reported to the UI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub connected: bool,
    pub path: Option<String>,
}

impl Status {
    pub fn disconnected() -> Self {
        Self {
            connected: false,
            path: None,
        }
    }
}
