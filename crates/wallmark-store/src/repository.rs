use crate::error::Result;
use crate::store::AnnotationStore;
use tracing::info;
use wallmark_core::annotation::WallAnnotation;

/// Validating front door to a store. Corners are re-ordered before anything
/// reaches the backend, so stored rows always satisfy `x1 <= x2, y1 <= y2`.
#[derive(Debug)]
pub struct AnnotationRepository<S> {
    store: S,
}

impl<S: AnnotationStore> AnnotationRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns the stored row, id included.
    pub fn add_annotation(&mut self, mut annotation: WallAnnotation) -> Result<WallAnnotation> {
        annotation.order_corners();
        annotation.validate()?;
        let id = self.store.insert(annotation.clone())?;
        annotation.id = Some(id);
        info!(id, wall = annotation.wall.index(), kind = annotation.kind.label(), "annotation stored");
        Ok(annotation)
    }

    pub fn update_annotation(&mut self, annotation: &WallAnnotation) -> Result<()> {
        let mut row = annotation.clone();
        row.order_corners();
        row.validate()?;
        self.store.update(&row)?;
        info!(id = ?row.id, "annotation updated");
        Ok(())
    }

    pub fn delete_annotation(&mut self, id: u64) -> Result<()> {
        self.store.delete(id)?;
        info!(id, "annotation deleted");
        Ok(())
    }

    pub fn annotation(&self, id: u64) -> Result<Option<WallAnnotation>> {
        self.store.get(id)
    }

    pub fn all_annotations(&self) -> Result<Vec<WallAnnotation>> {
        self.store.list_all()
    }

    pub fn annotations_for_room(&self, room_id: u64) -> Result<Vec<WallAnnotation>> {
        self.store.list_for_room(room_id)
    }
}
