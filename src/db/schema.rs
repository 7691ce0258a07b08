/// Table layout the record operations expect.
///
/// Record operations never run this; it is applied only when a new store
/// file is initialized.
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS notes (
    id TEXT PRIMARY KEY NOT NULL,
    title TEXT NOT NULL DEFAULT '',
    body TEXT NOT NULL DEFAULT '',
    parent_id TEXT NOT NULL DEFAULT '',
    user_created_time INTEGER NOT NULL DEFAULT 0,
    user_updated_time INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_notes_parent_id ON notes(parent_id);

CREATE TABLE IF NOT EXISTS folders (
    id TEXT PRIMARY KEY NOT NULL,
    title TEXT NOT NULL DEFAULT '',
    parent_id TEXT NOT NULL DEFAULT '',
    user_created_time INTEGER NOT NULL DEFAULT 0,
    user_updated_time INTEGER NOT NULL DEFAULT 0
);
"#;
