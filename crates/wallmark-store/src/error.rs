use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("annotation store {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("decode annotation store {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("encode annotation store: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("no annotation with id {0}")]
    NotFound(u64),

    #[error("annotation has no id")]
    MissingId,

    #[error("invalid annotation: {0}")]
    Invalid(#[from] wallmark_core::Error),

    #[error("persistence worker has shut down")]
    WorkerClosed,

    #[error("start persistence worker: {0}")]
    Spawn(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;
