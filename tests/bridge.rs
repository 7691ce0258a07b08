use notes_store_lib::bridge::{self, Request};
use notes_store_lib::core::testing::{FixedClock, SequenceIds};
use notes_store_lib::db::initialize_store;
use notes_store_lib::{Config, NotesService};
use std::sync::Arc;
use tempfile::TempDir;

#[tokio::test]
async fn test_notes_lifecycle_through_bridge() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("notes.sqlite");
    initialize_store(&path).await.unwrap();

    let clock = Arc::new(FixedClock::new(1_000_000));
    let mut service = NotesService::with_sources(
        clock.clone(),
        Arc::new(SequenceIds::new(["folder-1", "uuid-1", "uuid-2"])),
    );
    service.connect(&path).await.unwrap();
    let (handle, worker) = bridge::spawn(service);

    let folder = handle.create_folder("Inbox", None).await.unwrap().unwrap();
    let first = handle.create_note("one", "first body").await.unwrap().unwrap();
    let second = handle.create_note("two", "second body").await.unwrap().unwrap();
    assert_eq!(first.id, "uuid-1");
    assert_eq!(second.id, "uuid-2");

    clock.advance(5_000);
    let updated = handle
        .update_note("uuid-1", "one (edited)", "new body")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.user_created_time, 1_000_000);
    assert_eq!(updated.user_updated_time, 1_005_000);
    assert_eq!(updated.parent_id, "");

    let all = handle.get_all_notes().await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].id, "uuid-1");

    let folders = handle
        .call(Request::GetAllFolders)
        .await
        .unwrap()
        .into_folders();
    assert_eq!(folders, vec![folder]);

    assert!(handle
        .update_note("missing", "t", "b")
        .await
        .unwrap()
        .is_none());

    drop(handle);
    worker.await.unwrap();

    // Data survives a reopen
    let mut reopened = NotesService::new();
    reopened.connect(&path).await.unwrap();
    let note = reopened.get_note_by_id("uuid-1").await.unwrap();
    assert_eq!(note.title, "one (edited)");
    assert_eq!(note.body, "new body");
    reopened.close().await;
}

#[tokio::test]
async fn test_unconfigured_store_reports_not_connected() {
    let config = Config::from_lookup(|_| None);
    let service = NotesService::from_config(&config).await;
    let (handle, _worker) = bridge::spawn(service);

    let status = handle.get_status().await.unwrap();
    assert!(!status.connected);
    assert!(status.path.is_none());
    assert!(handle.get_all_notes().await.unwrap().is_empty());
    assert!(handle.create_note("T", "B").await.unwrap().is_none());
}

#[tokio::test]
async fn test_switching_store_paths() {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("a.sqlite");
    let b = dir.path().join("b.sqlite");
    initialize_store(&a).await.unwrap();
    initialize_store(&b).await.unwrap();

    let mut service = NotesService::new();
    service.connect(&a).await.unwrap();
    let note = service
        .create_note("only in a".into(), String::new(), None)
        .await
        .unwrap();

    service.connect(&b).await.unwrap();
    assert_eq!(service.status().path, Some(b.display().to_string()));
    assert!(service.get_note_by_id(&note.id).await.is_none());

    service.connect(&a).await.unwrap();
    assert!(service.get_note_by_id(&note.id).await.is_some());
    service.close().await;
}
