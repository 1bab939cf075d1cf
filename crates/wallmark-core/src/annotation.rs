use crate::error::{Error, Result};
use crate::geom::{BBox2, Vec2};
use crate::room::WallId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnnotationKind {
    #[default]
    SprayArea,
    SandArea,
    Obstacle,
}

impl AnnotationKind {
    pub const ALL: [AnnotationKind; 3] = [
        AnnotationKind::SprayArea,
        AnnotationKind::SandArea,
        AnnotationKind::Obstacle,
    ];

    pub fn label(self) -> &'static str {
        match self {
            AnnotationKind::SprayArea => "Spray area",
            AnnotationKind::SandArea => "Sand area",
            AnnotationKind::Obstacle => "Obstacle",
        }
    }

    /// Overlay colour as linear RGBA.
    pub fn rgba(self) -> [f32; 4] {
        match self {
            AnnotationKind::SprayArea => [1.0, 0.0, 0.0, 0.7],
            AnnotationKind::SandArea => [0.0, 1.0, 0.0, 0.7],
            AnnotationKind::Obstacle => [0.0, 0.0, 1.0, 0.7],
        }
    }
}

impl FromStr for AnnotationKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "spray" | "spray_area" | "paint" => Ok(AnnotationKind::SprayArea),
            "sand" | "sand_area" => Ok(AnnotationKind::SandArea),
            "obstacle" => Ok(AnnotationKind::Obstacle),
            _ => Err(Error::UnknownKind(s.to_string())),
        }
    }
}

impl fmt::Display for AnnotationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A labelled rectangle on one wall, in wall-local normalized coordinates.
/// Corners are ordered: `x1 <= x2` and `y1 <= y2`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallAnnotation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default)]
    pub room_id: u64,
    #[serde(rename = "wall_index")]
    pub wall: WallId,
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    #[serde(default)]
    pub kind: AnnotationKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl WallAnnotation {
    /// Build an annotation from two drag corners in any order.
    pub fn from_corners(wall: WallId, a: Vec2, b: Vec2, kind: AnnotationKind) -> Self {
        let rect = BBox2::from_corners(a, b);
        Self {
            id: None,
            room_id: 0,
            wall,
            x1: rect.min.x,
            y1: rect.min.y,
            x2: rect.max.x,
            y2: rect.max.y,
            kind,
            notes: None,
        }
    }

    pub fn with_room(mut self, room_id: u64) -> Self {
        self.room_id = room_id;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        let notes = notes.into();
        self.notes = if notes.is_empty() { None } else { Some(notes) };
        self
    }

    pub fn rect(&self) -> BBox2 {
        BBox2::new(Vec2::new(self.x1, self.y1), Vec2::new(self.x2, self.y2))
    }

    pub fn area(&self) -> f32 {
        self.rect().width() * self.rect().height()
    }

    /// Swap corners where needed so the ordering invariant holds.
    /// Returns whether anything changed.
    pub fn order_corners(&mut self) -> bool {
        let mut changed = false;
        if self.x1 > self.x2 {
            std::mem::swap(&mut self.x1, &mut self.x2);
            changed = true;
        }
        if self.y1 > self.y2 {
            std::mem::swap(&mut self.y1, &mut self.y2);
            changed = true;
        }
        changed
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [("x1", self.x1), ("y1", self.y1), ("x2", self.x2), ("y2", self.y2)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::CoordinateOutOfRange { name, value });
            }
        }
        if self.x1 > self.x2 || self.y1 > self.y2 {
            return Err(Error::UnorderedCorners);
        }
        Ok(())
    }
}
