use crate::error::{Result, StoreError};
use serde::{Deserialize, Serialize};
use wallmark_core::annotation::WallAnnotation;

/// One table of annotations keyed by an auto-generated id. Ids start at 1
/// and are never reused, even after deletes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationTable {
    pub next_id: u64,
    #[serde(default)]
    pub annotations: Vec<WallAnnotation>,
}

impl Default for AnnotationTable {
    fn default() -> Self {
        Self {
            next_id: 1,
            annotations: Vec::new(),
        }
    }
}

impl AnnotationTable {
    /// Repair `next_id` so it stays above every stored id.
    pub fn fix_next_id(&mut self) {
        let max = self.annotations.iter().filter_map(|a| a.id).max().unwrap_or(0);
        self.next_id = self.next_id.max(max + 1).max(1);
    }

    pub fn insert(&mut self, mut annotation: WallAnnotation) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        annotation.id = Some(id);
        self.annotations.push(annotation);
        id
    }

    pub fn get(&self, id: u64) -> Option<&WallAnnotation> {
        self.annotations.iter().find(|a| a.id == Some(id))
    }

    pub fn update(&mut self, annotation: &WallAnnotation) -> Result<()> {
        let id = annotation.id.ok_or(StoreError::MissingId)?;
        let row = self
            .annotations
            .iter_mut()
            .find(|a| a.id == Some(id))
            .ok_or(StoreError::NotFound(id))?;
        *row = annotation.clone();
        Ok(())
    }

    pub fn delete(&mut self, id: u64) -> Result<WallAnnotation> {
        let pos = self
            .annotations
            .iter()
            .position(|a| a.id == Some(id))
            .ok_or(StoreError::NotFound(id))?;
        Ok(self.annotations.remove(pos))
    }

    pub fn for_room(&self, room_id: u64) -> Vec<WallAnnotation> {
        self.annotations.iter().filter(|a| a.room_id == room_id).cloned().collect()
    }
}
