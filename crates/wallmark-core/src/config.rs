use crate::camera::CameraConfig;
use crate::error::{Error, Result};
use crate::room::RoomDimensions;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Degrees of rotation per pixel of drag.
    pub rotation_sensitivity: f32,
    /// World units of pan per pixel of drag.
    pub pan_sensitivity: f32,
    pub long_press_ms: u64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            rotation_sensitivity: 0.5,
            pan_sensitivity: 0.01,
            long_press_ms: 500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickConfig {
    /// Rays with |N·D| below this are treated as parallel to a wall.
    pub parallel_epsilon: f32,
    /// Tolerance when checking a hit against the wall's bounds.
    pub bounds_epsilon: f32,
    /// Skip walls seen from outside the room. Off by default so the
    /// closest wall along the ray always wins.
    pub cull_back_faces: bool,
}

impl Default for PickConfig {
    fn default() -> Self {
        Self {
            parallel_epsilon: 1e-4,
            bounds_epsilon: 1e-3,
            cull_back_faces: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub room: RoomDimensions,
    pub camera: CameraConfig,
    pub gesture: GestureConfig,
    pub pick: PickConfig,
    /// Room id stamped on new annotations.
    pub room_id: u64,
}

impl ViewerConfig {
    /// Load a JSON config. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| Error::ConfigIo {
            path: path.display().to_string(),
            source,
        })?;
        let cfg: Self = serde_json::from_str(&text).map_err(|source| Error::ConfigParse {
            path: path.display().to_string(),
            source,
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        self.room.validate()?;
        self.camera.validate()?;
        if !(self.pick.parallel_epsilon >= 0.0 && self.pick.bounds_epsilon >= 0.0) {
            return Err(Error::InvalidConfig("pick epsilons must be non-negative".to_string()));
        }
        if !self.gesture.rotation_sensitivity.is_finite() || !self.gesture.pan_sensitivity.is_finite() {
            return Err(Error::InvalidConfig("gesture sensitivities must be finite".to_string()));
        }
        Ok(())
    }
}
