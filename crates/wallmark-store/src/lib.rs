pub mod error;
pub mod json_file;
pub mod memory;
pub mod repository;
pub mod rows;
pub mod store;
pub mod table;
pub mod worker;

pub use error::{Result, StoreError};
pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use repository::AnnotationRepository;
pub use rows::{LocalRow, LocalRows, RowState};
pub use store::AnnotationStore;
pub use worker::{PersistenceWorker, WriteOutcome};
