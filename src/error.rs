/// Error types for notes-store
///
/// Record operations return these internally; the request layer decides
/// whether a caller sees the error or a null/empty result.
/// Uses thiserror for ergonomic error handling.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for notes-store operations
#[derive(Error, Debug)]
pub enum NotesError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O errors (file operations, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Store file missing at the requested path
    #[error("Store file not found: {}", .0.display())]
    StoreNotFound(PathBuf),

    /// No note or folder with this id
    #[error("Record not found: {0}")]
    NotFound(String),

    /// An update statement matched nothing
    #[error("No rows changed for record: {0}")]
    NoRowsChanged(String),

    /// Persistence was never initialized or has been closed
    #[error("Store is not connected")]
    NotConnected,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The bridge worker has stopped
    #[error("Request bridge is closed")]
    BridgeClosed,
}

/// Result type alias for notes-store operations
pub type Result<T> = std::result::Result<T, NotesError>;

/// Convert NotesError to a user-friendly error message
impl NotesError {
    pub fn user_message(&self) -> String {
        match self {
            NotesError::Database(e) => {
                format!("Database error occurred. Please try again. Details: {}", e)
            }
            NotesError::Io(e) => {
                format!("File system error. Check permissions. Details: {}", e)
            }
            NotesError::StoreNotFound(path) => {
                format!("No notes database at {}", path.display())
            }
            NotesError::NotFound(id) => format!("Note or folder '{}' does not exist", id),
            NotesError::NoRowsChanged(id) => format!("Nothing was saved for '{}'", id),
            NotesError::NotConnected => {
                "Notes storage is unavailable. Set NOTES_DB_PATH and restart.".to_string()
            }
            NotesError::Config(msg) => format!("Configuration issue: {}", msg),
            NotesError::Serialization(e) => format!("Data format error: {}", e),
            NotesError::BridgeClosed => "Notes service has shut down".to_string(),
        }
    }

    /// True for the "nothing there" kinds, as opposed to store failures
    pub fn is_not_found(&self) -> bool {
        matches!(self, NotesError::NotFound(_) | NotesError::NoRowsChanged(_))
    }
}
