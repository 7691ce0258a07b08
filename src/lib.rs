/// notes-store library
///
/// Persistence core for a desktop notes app and the bridge the UI talks to.

pub mod bridge;
pub mod config;
pub mod core;
pub mod db;
pub mod error;
pub mod logging;

// Re-exports for convenience
pub use bridge::{BridgeHandle, NotesService};
pub use config::Config;
pub use db::{Database, Folder, Note, StoreHandle};
pub use error::{NotesError, Result};
