pub mod annotation;
pub mod camera;
pub mod config;
pub mod error;
pub mod geom;
pub mod normalize;
pub mod report;
pub mod room;
pub mod surface;

pub use error::{Error, Result};
