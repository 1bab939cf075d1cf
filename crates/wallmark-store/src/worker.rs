use crate::error::{Result, StoreError};
use crate::repository::AnnotationRepository;
use crate::store::AnnotationStore;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};
use tracing::{debug, warn};
use wallmark_core::annotation::WallAnnotation;

/// Caller-chosen key for matching an insert with its generated id.
pub type Ticket = u64;

#[derive(Debug)]
pub enum WriteTask {
    Insert { ticket: Ticket, annotation: WallAnnotation },
    Update(WallAnnotation),
    Delete(u64),
    /// Acknowledged once every earlier task has been handled.
    Flush(Sender<()>),
}

/// Write results, reported back for front ends that want ids.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOutcome {
    Inserted { ticket: Ticket, annotation: WallAnnotation },
    /// The insert was logged and dropped. Lets a caller stop waiting for an id.
    InsertFailed { ticket: Ticket },
    Updated(u64),
    Deleted(u64),
}

/// Fire-and-forget persistence on a dedicated writer thread. Failed writes
/// are logged and dropped; nothing is retried and the caller never waits.
pub struct PersistenceWorker {
    task_sender: Option<Sender<WriteTask>>,
    result_receiver: Receiver<WriteOutcome>,
    thread_handle: Option<JoinHandle<()>>,
}

impl PersistenceWorker {
    pub fn spawn<S>(repository: AnnotationRepository<S>) -> Result<Self>
    where
        S: AnnotationStore + 'static,
    {
        let (task_sender, task_receiver) = mpsc::channel::<WriteTask>();
        let (result_sender, result_receiver) = mpsc::channel::<WriteOutcome>();

        let thread_handle = thread::Builder::new()
            .name("wallmark-persist".to_string())
            .spawn(move || run(repository, task_receiver, result_sender))
            .map_err(StoreError::Spawn)?;

        Ok(Self {
            task_sender: Some(task_sender),
            result_receiver,
            thread_handle: Some(thread_handle),
        })
    }

    pub fn insert(&self, ticket: Ticket, annotation: WallAnnotation) -> bool {
        self.submit(WriteTask::Insert { ticket, annotation })
    }

    pub fn update(&self, annotation: WallAnnotation) -> bool {
        self.submit(WriteTask::Update(annotation))
    }

    pub fn delete(&self, id: u64) -> bool {
        self.submit(WriteTask::Delete(id))
    }

    /// `false` when the task could not be queued.
    pub fn submit(&self, task: WriteTask) -> bool {
        let Some(sender) = self.task_sender.as_ref() else {
            return false;
        };
        if sender.send(task).is_err() {
            warn!("persistence worker is gone; write dropped");
            return false;
        }
        true
    }

    /// Block until every task submitted so far has been handled.
    pub fn flush(&self) -> Result<()> {
        let (ack, done) = mpsc::channel();
        let sender = self.task_sender.as_ref().ok_or(StoreError::WorkerClosed)?;
        sender.send(WriteTask::Flush(ack)).map_err(|_| StoreError::WorkerClosed)?;
        done.recv().map_err(|_| StoreError::WorkerClosed)
    }

    pub fn try_recv_outcome(&self) -> Option<WriteOutcome> {
        self.result_receiver.try_recv().ok()
    }
}

impl Drop for PersistenceWorker {
    fn drop(&mut self) {
        // Closing the channel lets the thread drain what is queued and exit.
        self.task_sender.take();
        if let Some(handle) = self.thread_handle.take() {
            if handle.join().is_err() {
                warn!("persistence worker panicked");
            }
        }
    }
}

fn run<S: AnnotationStore>(
    mut repository: AnnotationRepository<S>,
    tasks: Receiver<WriteTask>,
    results: Sender<WriteOutcome>,
) {
    for task in tasks {
        let outcome = match task {
            WriteTask::Insert { ticket, annotation } => match repository.add_annotation(annotation) {
                Ok(annotation) => Ok(WriteOutcome::Inserted { ticket, annotation }),
                Err(err) => {
                    warn!(error = %err, ticket, "annotation insert failed");
                    let _ = results.send(WriteOutcome::InsertFailed { ticket });
                    continue;
                }
            },
            WriteTask::Update(annotation) => {
                let id = annotation.id.unwrap_or_default();
                repository.update_annotation(&annotation).map(|()| WriteOutcome::Updated(id))
            }
            WriteTask::Delete(id) => repository.delete_annotation(id).map(|()| WriteOutcome::Deleted(id)),
            WriteTask::Flush(ack) => {
                let _ = ack.send(());
                continue;
            }
        };
        match outcome {
            // Nobody listening is fine.
            Ok(outcome) => {
                let _ = results.send(outcome);
            }
            Err(err) => warn!(error = %err, "annotation write failed"),
        }
    }
    debug!("persistence worker stopped");
}
