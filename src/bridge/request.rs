/// Requests the UI can send and the replies it gets back
///
/// Operation names and argument names are camelCase on the wire, e.g.
/// `{"op": "createNote", "title": "T", "body": "B", "folderId": "f1"}`.

use crate::db::{Folder, Note, Status};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Request {
    GetStatus,
    GetAllNotes,
    GetNoteById {
        id: String,
    },
    CreateNote {
        title: String,
        body: String,
        #[serde(default)]
        folder_id: Option<String>,
    },
    UpdateNote {
        id: String,
        title: String,
        body: String,
    },
    UpdateNoteTitle {
        id: String,
        title: String,
    },
    UpdateNoteBody {
        id: String,
        body: String,
    },
    CreateFolder {
        title: String,
        #[serde(default)]
        parent_id: Option<String>,
    },
    GetAllFolders,
    GetFolderById {
        id: String,
    },
    GetNotesInFolder {
        folder_id: String,
    },
    SearchNotes {
        query: String,
        #[serde(default)]
        limit: Option<usize>,
    },
    Close,
}

impl Request {
    /// Operation name as it appears on the wire
    pub fn name(&self) -> &'static str {
        match self {
            Request::GetStatus => "getStatus",
            Request::GetAllNotes => "getAllNotes",
            Request::GetNoteById { .. } => "getNoteById",
            Request::CreateNote { .. } => "createNote",
            Request::UpdateNote { .. } => "updateNote",
            Request::UpdateNoteTitle { .. } => "updateNoteTitle",
            Request::UpdateNoteBody { .. } => "updateNoteBody",
            Request::CreateFolder { .. } => "createFolder",
            Request::GetAllFolders => "getAllFolders",
            Request::GetFolderById { .. } => "getFolderById",
            Request::GetNotesInFolder { .. } => "getNotesInFolder",
            Request::SearchNotes { .. } => "searchNotes",
            Request::Close => "close",
        }
    }
}

/// Reply payload. Serializes as the bare value (`null` for a missing record).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Reply {
    Status(Status),
    Note(Option<Note>),
    Notes(Vec<Note>),
    Folder(Option<Folder>),
    Folders(Vec<Folder>),
    Closed,
}

impl Reply {
    pub fn into_note(self) -> Option<Note> {
        match self {
            Reply::Note(note) => note,
            _ => None,
        }
    }

    pub fn into_notes(self) -> Vec<Note> {
        match self {
            Reply::Notes(notes) => notes,
            _ => Vec::new(),
        }
    }

    pub fn into_folder(self) -> Option<Folder> {
        match self {
            Reply::Folder(folder) => folder,
            _ => None,
        }
    }

    pub fn into_folders(self) -> Vec<Folder> {
        match self {
            Reply::Folders(folders) => folders,
            _ => Vec::new(),
        }
    }

    pub fn into_status(self) -> Option<Status> {
        match self {
            Reply::Status(status) => Some(status),
            _ => None,
        }
    }
}
