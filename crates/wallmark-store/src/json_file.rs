use crate::error::{Result, StoreError};
use crate::store::AnnotationStore;
use crate::table::AnnotationTable;
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use wallmark_core::annotation::WallAnnotation;
use wallmark_core::normalize::{normalize_in_place, NormalizeConfig};

/// Annotation table persisted as a single JSON document. Every mutation
/// rewrites the file through a temp file and a rename, so a crash leaves
/// either the old or the new table on disk.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    table: AnnotationTable,
}

impl JsonFileStore {
    /// Open `path`, starting from an empty table if it does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let table = if path.exists() {
            load_table(&path)?
        } else {
            debug!(path = %path.display(), "annotation store does not exist yet");
            AnnotationTable::default()
        };
        Ok(Self { path, table })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn commit(&mut self, table: AnnotationTable) -> Result<()> {
        write_table(&self.path, &table)?;
        self.table = table;
        Ok(())
    }
}

/// On-disk table with rows left undecoded, so one bad row does not make the
/// whole file unreadable.
#[derive(Deserialize)]
struct RawTable {
    next_id: u64,
    #[serde(default)]
    annotations: Vec<Value>,
}

fn load_table(path: &Path) -> Result<AnnotationTable> {
    let text = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let raw: RawTable = serde_json::from_str(&text).map_err(|source| StoreError::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    // Ids of rows dropped below are never handed out again.
    let max_seen = raw
        .annotations
        .iter()
        .filter_map(|row| row.get("id").and_then(Value::as_u64))
        .max()
        .unwrap_or(0);
    let mut undecodable = 0;
    let annotations = raw
        .annotations
        .into_iter()
        .enumerate()
        .filter_map(|(index, row)| match serde_json::from_value::<WallAnnotation>(row) {
            Ok(annotation) => Some(annotation),
            Err(err) => {
                debug!(path = %path.display(), index, error = %err, "undecodable annotation row");
                undecodable += 1;
                None
            }
        })
        .collect();
    let mut table = AnnotationTable {
        next_id: raw.next_id.max(max_seen.saturating_add(1)),
        annotations,
    };
    table.fix_next_id();

    let stats = normalize_in_place(&mut table.annotations, &NormalizeConfig::default());
    if stats.reordered > 0 || stats.removed_invalid > 0 || undecodable > 0 {
        warn!(
            path = %path.display(),
            reordered = stats.reordered,
            removed = stats.removed_invalid + undecodable,
            "repaired annotation store on load"
        );
    }
    debug!(path = %path.display(), rows = table.annotations.len(), next_id = table.next_id, "loaded annotation store");
    Ok(table)
}

fn write_table(path: &Path, table: &AnnotationTable) -> Result<()> {
    let io_err = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
    }
    let json = serde_json::to_string_pretty(table).map_err(StoreError::Encode)?;

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    std::fs::write(&tmp, json).map_err(io_err)?;
    std::fs::rename(&tmp, path).map_err(io_err)?;
    Ok(())
}

impl AnnotationStore for JsonFileStore {
    fn insert(&mut self, annotation: WallAnnotation) -> Result<u64> {
        let mut next = self.table.clone();
        let id = next.insert(annotation);
        self.commit(next)?;
        Ok(id)
    }

    fn update(&mut self, annotation: &WallAnnotation) -> Result<()> {
        let mut next = self.table.clone();
        next.update(annotation)?;
        self.commit(next)
    }

    fn delete(&mut self, id: u64) -> Result<()> {
        let mut next = self.table.clone();
        next.delete(id)?;
        self.commit(next)
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
