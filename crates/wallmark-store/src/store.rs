use crate::error::Result;
use wallmark_core::annotation::WallAnnotation;

/// Persistence backend for annotations. Only insert, update and delete
/// mutate; reads are whole-table or per-room scans.
pub trait AnnotationStore: Send {
    /// Store a new row and return its generated id. Any id on the input is
    /// ignored.
    fn insert(&mut self, annotation: WallAnnotation) -> Result<u64>;

    /// Replace the row with the same id.
    fn update(&mut self, annotation: &WallAnnotation) -> Result<()>;

    fn delete(&mut self, id: u64) -> Result<()>;

    fn get(&self, id: u64) -> Result<Option<WallAnnotation>>;

    fn list_all(&self) -> Result<Vec<WallAnnotation>>;

    fn list_for_room(&self, room_id: u64) -> Result<Vec<WallAnnotation>> {
        Ok(self
            .list_all()?
            .into_iter()
            .filter(|a| a.room_id == room_id)
            .collect())
    }
}
