use crate::error::Result;
use crate::store::AnnotationStore;
use crate::table::AnnotationTable;
use wallmark_core::annotation::WallAnnotation;

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    table: AnnotationTable,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(&self) -> &AnnotationTable {
        &self.table
    }
}

impl AnnotationStore for MemoryStore {
    fn insert(&mut self, annotation: WallAnnotation) -> Result<u64> {
        Ok(self.table.insert(annotation))
    }

    fn update(&mut self, annotation: &WallAnnotation) -> Result<()> {
        self.table.update(annotation)
    }

    fn delete(&mut self, id: u64) -> Result<()> {
        self.table.delete(id).map(|_| ())
    }

    fn get(&self, id: u64) -> Result<Option<WallAnnotation>> {
        Ok(self.table.get(id).cloned())
    }

    fn list_all(&self) -> Result<Vec<WallAnnotation>> {
        Ok(self.table.annotations.clone())
    }

    fn list_for_room(&self, room_id: u64) -> Result<Vec<WallAnnotation>> {
        Ok(self.table.for_room(room_id))
    }
}
