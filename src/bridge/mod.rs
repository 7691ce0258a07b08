/// UI request bridge
///
/// Record operations registered as request handlers, served one at a time
/// by a worker task and reachable in-process or over line-delimited JSON.

pub mod actor;
pub mod request;
pub mod service;
pub mod stdio;

pub use actor::{spawn, BridgeHandle};
pub use request::{Reply, Request};
pub use service::NotesService;
