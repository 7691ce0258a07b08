/// Database module for notes-store
///
/// Handles the store connection and all record operations using SQLite and sqlx.

pub mod connection;
pub mod models;
pub mod queries;
pub mod schema;

pub use connection::{initialize_store, Database, DatabaseStats, HandleState, StoreHandle};
pub use models::*;
