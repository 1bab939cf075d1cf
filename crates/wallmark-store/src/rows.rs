use crate::worker::{Ticket, WriteOutcome};
use wallmark_core::annotation::WallAnnotation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowState {
    /// Loaded from the store or confirmed by the writer.
    Stored,
    /// Queued; waiting for the writer to report an id.
    Pending(Ticket),
    /// The writer dropped the insert. The row only lives in memory.
    Unsaved,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocalRow {
    pub annotation: WallAnnotation,
    pub state: RowState,
}

/// The render thread's copy of the annotation list, reconciled with the
/// outcomes a [`crate::PersistenceWorker`] sends back.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocalRows {
    rows: Vec<LocalRow>,
}

impl LocalRows {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_stored(annotations: Vec<WallAnnotation>) -> Self {
        let rows = annotations
            .into_iter()
            .map(|annotation| LocalRow {
                annotation,
                state: RowState::Stored,
            })
            .collect();
        Self { rows }
    }

    pub fn push_pending(&mut self, ticket: Ticket, annotation: WallAnnotation) {
        self.rows.push(LocalRow {
            annotation,
            state: RowState::Pending(ticket),
        });
    }

    pub fn push_unsaved(&mut self, annotation: WallAnnotation) {
        self.rows.push(LocalRow {
            annotation,
            state: RowState::Unsaved,
        });
    }

    /// Apply one writer outcome. Returns whether a row changed.
    pub fn apply(&mut self, outcome: &WriteOutcome) -> bool {
        let (ticket, id) = match outcome {
            WriteOutcome::Inserted { ticket, annotation } => (*ticket, annotation.id),
            WriteOutcome::InsertFailed { ticket } => (*ticket, None),
            WriteOutcome::Updated(_) | WriteOutcome::Deleted(_) => return false,
        };
        let Some(row) = self.rows.iter_mut().find(|r| r.state == RowState::Pending(ticket)) else {
            return false;
        };
        match id {
            Some(id) => {
                row.annotation.id = Some(id);
                row.state = RowState::Stored;
            }
            None => row.state = RowState::Unsaved,
        }
        true
    }

    /// Remove a row locally. Any row can be removed, whatever its state.
    pub fn remove(&mut self, index: usize) -> Option<LocalRow> {
        (index < self.rows.len()).then(|| self.rows.remove(index))
    }

    pub fn has_pending(&self) -> bool {
        self.rows.iter().any(|r| matches!(r.state, RowState::Pending(_)))
    }

    pub fn rows(&self) -> &[LocalRow] {
        &self.rows
    }

    pub fn annotations(&self) -> Vec<WallAnnotation> {
        self.rows.iter().map(|r| r.annotation.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
