use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("wall index {0} does not name a room surface (expected 0, 2, 3, 4 or 5)")]
    InvalidWallIndex(u8),

    #[error("unknown annotation kind: {0:?}")]
    UnknownKind(String),

    #[error("wall coordinate {name}={value} is outside [0, 1]")]
    CoordinateOutOfRange { name: &'static str, value: f32 },

    #[error("annotation corners are not ordered (need x1 <= x2 and y1 <= y2)")]
    UnorderedCorners,

    #[error("room dimensions must be positive and finite, got {width} x {height} x {depth}")]
    InvalidRoom { width: f32, height: f32, depth: f32 },

    #[error("invalid {name} range: min {min} > max {max}")]
    InvalidRange { name: &'static str, min: f32, max: f32 },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("read config {path}: {source}")]
    ConfigIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config {path}: {source}")]
    ConfigParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
