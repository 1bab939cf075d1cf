use std::path::PathBuf;
use wallmark_core::annotation::{AnnotationKind, WallAnnotation};
use wallmark_core::geom::Vec2;
use wallmark_core::room::WallId;
use wallmark_store::{
    AnnotationRepository, AnnotationStore, JsonFileStore, MemoryStore, PersistenceWorker, Result, StoreError,
    WriteOutcome,
};

fn sample() -> WallAnnotation {
    WallAnnotation::from_corners(WallId::Floor, Vec2::new(0.1, 0.1), Vec2::new(0.4, 0.3), AnnotationKind::SandArea)
}

/// Backend that rejects every write.
struct BrokenStore;

impl AnnotationStore for BrokenStore {
    fn insert(&mut self, _annotation: WallAnnotation) -> Result<u64> {
        Err(StoreError::WorkerClosed)
    }

    fn update(&mut self, annotation: &WallAnnotation) -> Result<()> {
        Err(StoreError::NotFound(annotation.id.unwrap_or_default()))
    }

    fn delete(&mut self, id: u64) -> Result<()> {
        Err(StoreError::NotFound(id))
    }

    fn get(&self, _id: u64) -> Result<Option<WallAnnotation>> {
        Ok(None)
    }

    fn list_all(&self) -> Result<Vec<WallAnnotation>> {
        Ok(Vec::new())
    }
}

#[test]
fn writes_land_after_drop() {
    let dir = std::env::temp_dir().join(format!("wallmark-worker-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    let path: PathBuf = dir.join("annotations.json");

    {
        let store = JsonFileStore::open(&path).unwrap();
        let worker = PersistenceWorker::spawn(AnnotationRepository::new(store)).unwrap();
        worker.insert(1, sample());
        worker.insert(2, sample().with_notes("edge"));
    }

    let rows = JsonFileStore::open(&path).unwrap().list_all().unwrap();
    assert_eq!(2, rows.len());
    assert_eq!(Some("edge".to_string()), rows[1].notes);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn outcomes_report_generated_ids() {
    let worker = PersistenceWorker::spawn(AnnotationRepository::new(MemoryStore::new())).unwrap();
    worker.insert(41, sample());
    worker.delete(1);
    worker.flush().unwrap();

    match worker.try_recv_outcome() {
        Some(WriteOutcome::Inserted { ticket, annotation }) => {
            assert_eq!(41, ticket);
            assert_eq!(Some(1), annotation.id);
        }
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(Some(WriteOutcome::Deleted(1)), worker.try_recv_outcome());
    assert_eq!(None, worker.try_recv_outcome());
}

#[test]
fn failures_are_swallowed() {
    let worker = PersistenceWorker::spawn(AnnotationRepository::new(BrokenStore)).unwrap();
    assert!(worker.insert(1, sample()));
    assert!(worker.delete(5));
    worker.flush().unwrap();
    // Only the failed insert is reported, so its ticket stops waiting for an id.
    assert_eq!(Some(WriteOutcome::InsertFailed { ticket: 1 }), worker.try_recv_outcome());
    assert_eq!(None, worker.try_recv_outcome());

    // Invalid rows never reach the backend and do not stop the worker.
    let mut bad = sample();
    bad.x2 = 7.0;
    worker.insert(2, bad);
    worker.flush().unwrap();
    assert_eq!(Some(WriteOutcome::InsertFailed { ticket: 2 }), worker.try_recv_outcome());
    assert_eq!(None, worker.try_recv_outcome());
}
