use crate::picking::WallPicker;
use crate::projection::CameraMatrices;
use serde::{Deserialize, Serialize};
use tracing::debug;
use wallmark_core::annotation::{AnnotationKind, WallAnnotation};
use wallmark_core::geom::{BBox2, Vec2};
use wallmark_core::room::WallId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    None,
    Selecting,
}

/// An in-progress drag on one wall.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallSelection {
    pub wall: WallId,
    pub start: Vec2,
    pub end: Vec2,
}

impl WallSelection {
    pub fn rect(&self) -> BBox2 {
        BBox2::from_corners(self.start, self.end)
    }

    pub fn to_annotation(&self, kind: AnnotationKind) -> WallAnnotation {
        WallAnnotation::from_corners(self.wall, self.start, self.end, kind)
    }
}

/// NONE -> SELECTING -> NONE. The drag stays pinned to the wall it started on.
#[derive(Debug, Clone, Default)]
pub struct WallSelector {
    active: Option<WallSelection>,
}

impl WallSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> SelectionMode {
        if self.active.is_some() {
            SelectionMode::Selecting
        } else {
            SelectionMode::None
        }
    }

    pub fn is_selecting(&self) -> bool {
        self.active.is_some()
    }

    pub fn current(&self) -> Option<&WallSelection> {
        self.active.as_ref()
    }

    /// Begin a selection on the closest wall under `screen`. Returns whether
    /// a wall was hit; a miss leaves any previous state untouched.
    pub fn start_selection(&mut self, picker: &WallPicker, matrices: &CameraMatrices, screen: Vec2) -> bool {
        let Some(hit) = picker.pick_screen(screen, matrices) else {
            return false;
        };
        debug!(wall = hit.wall.index(), "selection started");
        self.active = Some(WallSelection {
            wall: hit.wall,
            start: hit.uv,
            end: hit.uv,
        });
        true
    }

    /// Move the end point. Off-wall positions are ignored.
    pub fn update_selection(&mut self, picker: &WallPicker, matrices: &CameraMatrices, screen: Vec2) -> bool {
        let Some(sel) = self.active.as_mut() else {
            return false;
        };
        match picker.pick_wall_screen(screen, matrices, sel.wall) {
            Some(hit) => {
                sel.end = hit.uv;
                true
            }
            None => false,
        }
    }

    /// Start a selection from known wall-local coordinates.
    pub fn start_uv(&mut self, wall: WallId, uv: Vec2) -> bool {
        if !uv.is_finite() {
            return false;
        }
        let uv = Vec2::new(uv.x.clamp(0.0, 1.0), uv.y.clamp(0.0, 1.0));
        self.active = Some(WallSelection { wall, start: uv, end: uv });
        true
    }

    pub fn finish_selection(&mut self, kind: AnnotationKind) -> Option<WallAnnotation> {
        let sel = self.active.take()?;
        Some(sel.to_annotation(kind))
    }

    pub fn cancel_selection(&mut self) {
        if self.active.take().is_some() {
            debug!("selection cancelled");
        }
    }
}
