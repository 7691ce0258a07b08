// Async request bridge between the UI and the notes service
//
// A single worker task owns the service and serves requests strictly in
// arrival order, so the store connection is never entered twice at once.
// Each request gets exactly one reply through its own oneshot channel.

use crate::bridge::request::{Reply, Request};
use crate::bridge::service::NotesService;
use crate::db::{Folder, Note, Status};
use crate::error::{NotesError, Result};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info};

// Requests waiting for the worker before senders start to wait
const REQUEST_QUEUE_SIZE: usize = 64;

struct Call {
    request: Request,
    reply: oneshot::Sender<Reply>,
}

/// Handle for sending requests to the bridge worker
#[derive(Clone)]
pub struct BridgeHandle {
    tx: mpsc::Sender<Call>,
}

/// Start the worker. It runs until every handle is dropped, then closes
/// the store.
pub fn spawn(service: NotesService) -> (BridgeHandle, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel(REQUEST_QUEUE_SIZE);
    let worker = tokio::spawn(run(service, rx));
    (BridgeHandle { tx }, worker)
}

async fn run(mut service: NotesService, mut rx: mpsc::Receiver<Call>) {
    info!("request bridge started");

    while let Some(Call { request, reply }) = rx.recv().await {
        let op = request.name();
        let result = service.handle(request).await;
        if reply.send(result).is_err() {
            debug!(op, "caller went away before the reply");
        }
    }

    service.close().await;
    info!("request bridge stopped");
}

impl BridgeHandle {
    /// Send one request and wait for its reply
    pub async fn call(&self, request: Request) -> Result<Reply> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Call { request, reply })
            .await
            .map_err(|_| NotesError::BridgeClosed)?;
        rx.await.map_err(|_| NotesError::BridgeClosed)
    }

    pub async fn get_status(&self) -> Result<Status> {
        let reply = self.call(Request::GetStatus).await?;
        Ok(reply.into_status().unwrap_or_else(Status::disconnected))
    }

    pub async fn get_all_notes(&self) -> Result<Vec<Note>> {
        Ok(self.call(Request::GetAllNotes).await?.into_notes())
    }

    pub async fn get_note_by_id(&self, id: impl Into<String>) -> Result<Option<Note>> {
        let request = Request::GetNoteById { id: id.into() };
        Ok(self.call(request).await?.into_note())
    }

    pub async fn create_note(
        &self,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Result<Option<Note>> {
        let request = Request::CreateNote {
            title: title.into(),
            body: body.into(),
            folder_id: None,
        };
        Ok(self.call(request).await?.into_note())
    }

    pub async fn update_note(
        &self,
        id: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Result<Option<Note>> {
        let request = Request::UpdateNote {
            id: id.into(),
            title: title.into(),
            body: body.into(),
        };
        Ok(self.call(request).await?.into_note())
    }

    pub async fn update_note_title(
        &self,
        id: impl Into<String>,
        title: impl Into<String>,
    ) -> Result<Option<Note>> {
        let request = Request::UpdateNoteTitle {
            id: id.into(),
            title: title.into(),
        };
        Ok(self.call(request).await?.into_note())
    }

    pub async fn update_note_body(
        &self,
        id: impl Into<String>,
        body: impl Into<String>,
    ) -> Result<Option<Note>> {
        let request = Request::UpdateNoteBody {
            id: id.into(),
            body: body.into(),
        };
        Ok(self.call(request).await?.into_note())
    }

    pub async fn create_folder(
        &self,
        title: impl Into<String>,
        parent_id: Option<String>,
    ) -> Result<Option<Folder>> {
        let request = Request::CreateFolder {
            title: title.into(),
            parent_id,
        };
        Ok(self.call(request).await?.into_folder())
    }

    pub async fn close(&self) -> Result<()> {
        self.call(Request::Close).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::{FixedClock, SequenceIds};
    use crate::db::initialize_store;
    use std::sync::Arc;
    use tempfile::TempDir;

    async fn bridge(ids: SequenceIds) -> (BridgeHandle, JoinHandle<()>, TempDir) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.sqlite");
        initialize_store(&path).await.unwrap();

        let mut service =
            NotesService::with_sources(Arc::new(FixedClock::new(1_000_000)), Arc::new(ids));
        service.connect(&path).await.unwrap();

        let (handle, worker) = spawn(service);
        (handle, worker, dir)
    }

    #[tokio::test]
    async fn test_round_trip_through_bridge() {
        let (bridge, _worker, _dir) = bridge(SequenceIds::new(["test-uuid-123"])).await;

        let note = bridge
            .create_note("Test Note", "This is a test note")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(note.id, "test-uuid-123");
        assert_eq!(note.user_created_time, 1_000_000);

        let fetched = bridge.get_note_by_id("test-uuid-123").await.unwrap();
        assert_eq!(fetched, Some(note));
        assert!(bridge.get_note_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_concurrent_callers_each_get_one_reply() {
        let (bridge, _worker, _dir) = bridge(SequenceIds::default()).await;

        let mut tasks = Vec::new();
        for i in 0..16 {
            let bridge = bridge.clone();
            tasks.push(tokio::spawn(async move {
                bridge.create_note(format!("note {}", i), "").await
            }));
        }

        for task in tasks {
            let note = task.await.unwrap().unwrap();
            assert!(note.is_some());
        }
        assert_eq!(bridge.get_all_notes().await.unwrap().len(), 16);
    }

    #[tokio::test]
    async fn test_close_then_not_connected() {
        let (bridge, _worker, _dir) = bridge(SequenceIds::default()).await;

        assert!(bridge.get_status().await.unwrap().connected);
        bridge.close().await.unwrap();

        let status = bridge.get_status().await.unwrap();
        assert!(!status.connected);
        assert!(status.path.is_none());
        assert!(bridge.create_note("t", "b").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_worker_stops_when_handles_dropped() {
        let (bridge, worker, _dir) = bridge(SequenceIds::default()).await;

        drop(bridge);
        worker.await.unwrap();
    }
}
