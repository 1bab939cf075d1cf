use crate::annotation::{AnnotationKind, WallAnnotation};
use crate::camera::{CameraState, InteractionMode};
use crate::geom::{Vec2, Vec3};
use crate::room::WallId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Warning {
    pub code: String,
    pub message: String,
}

impl Warning {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WallHitReport {
    pub wall_index: u8,
    pub wall: String,
    pub uv: Vec2,
    pub world: Vec3,
    pub distance: f32,
}

impl WallHitReport {
    pub fn new(wall: WallId, uv: Vec2, world: Vec3, distance: f32) -> Self {
        Self {
            wall_index: wall.index(),
            wall: wall.name().to_string(),
            uv,
            world,
            distance,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnnotationStats {
    pub total: usize,
    /// Keyed by wall index.
    pub per_wall: BTreeMap<u8, usize>,
    pub per_kind: BTreeMap<String, usize>,
    /// Summed wall-local area, in normalized units.
    pub covered_area: f32,
}

impl AnnotationStats {
    pub fn collect<'a>(annotations: impl IntoIterator<Item = &'a WallAnnotation>) -> Self {
        let mut stats = Self::default();
        for a in annotations {
            stats.total += 1;
            *stats.per_wall.entry(a.wall.index()).or_default() += 1;
            *stats.per_kind.entry(kind_key(a.kind).to_string()).or_default() += 1;
            stats.covered_area += a.area();
        }
        stats
    }
}

fn kind_key(kind: AnnotationKind) -> &'static str {
    match kind {
        AnnotationKind::SprayArea => "SPRAY_AREA",
        AnnotationKind::SandArea => "SAND_AREA",
        AnnotationKind::Obstacle => "OBSTACLE",
    }
}

/// Outcome of replaying a gesture script.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    pub camera: CameraState,
    pub mode: InteractionMode,
    pub edit_mode: bool,
    pub annotations: Vec<WallAnnotation>,
    pub stats: AnnotationStats,
    pub warnings: Vec<Warning>,
}
