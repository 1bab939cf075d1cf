use crate::error::{Error, Result};
use crate::geom::Vec3;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionMode {
    #[default]
    Rotation,
    Pan,
    Zoom,
}

impl InteractionMode {
    pub fn label(self) -> &'static str {
        match self {
            InteractionMode::Rotation => "Rotation Mode",
            InteractionMode::Pan => "Pan Mode",
            InteractionMode::Zoom => "Zoom Mode",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f32,
    pub max: f32,
}

impl Range {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn clamp(&self, v: f32) -> f32 {
        v.clamp(self.min, self.max)
    }

    pub fn contains(&self, v: f32) -> bool {
        v >= self.min && v <= self.max
    }

    pub fn validate(&self, name: &'static str) -> Result<()> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min > self.max {
            return Err(Error::InvalidRange {
                name,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Pitch limits in degrees. Yaw is unbounded.
    pub pitch_range: Range,
    pub zoom_range: Range,
    pub default_pitch: f32,
    pub default_yaw: f32,
    pub default_zoom: f32,
    /// Distance from the orbit target at zoom 0.
    pub base_distance: f32,
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            pitch_range: Range::new(-80.0, 80.0),
            zoom_range: Range::new(1.0, 10.0),
            default_pitch: 0.0,
            default_yaw: 0.0,
            default_zoom: 7.0,
            base_distance: 5.0,
            fov_y_degrees: 45.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl CameraConfig {
    pub fn validate(&self) -> Result<()> {
        self.pitch_range.validate("pitch")?;
        self.zoom_range.validate("zoom")?;
        if self.pitch_range.min <= -90.0 || self.pitch_range.max >= 90.0 {
            return Err(Error::InvalidConfig(format!(
                "pitch range must stay inside (-90, 90) degrees, got [{}, {}]",
                self.pitch_range.min, self.pitch_range.max
            )));
        }
        if self.base_distance + self.zoom_range.min <= 0.0 {
            return Err(Error::InvalidConfig(
                "base_distance + minimum zoom must be positive".to_string(),
            ));
        }
        if !(self.fov_y_degrees > 0.0 && self.fov_y_degrees < 180.0) {
            return Err(Error::InvalidConfig(format!(
                "fov_y_degrees must be in (0, 180), got {}",
                self.fov_y_degrees
            )));
        }
        if !(self.near > 0.0 && self.far > self.near) {
            return Err(Error::InvalidConfig(format!(
                "clip planes must satisfy 0 < near < far, got near={} far={}",
                self.near, self.far
            )));
        }
        Ok(())
    }
}

/// Orbit camera parameters. Angles are in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraState {
    pub pitch: f32,
    pub yaw: f32,
    pub zoom: f32,
    pub pan_x: f32,
    pub pan_y: f32,
}

/// Camera state plus the limits that every mutation is clamped to.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    config: CameraConfig,
    state: CameraState,
}

impl Camera {
    pub fn new(config: CameraConfig) -> Self {
        let state = CameraState {
            pitch: config.pitch_range.clamp(config.default_pitch),
            yaw: config.default_yaw,
            zoom: config.zoom_range.clamp(config.default_zoom),
            pan_x: 0.0,
            pan_y: 0.0,
        };
        Self { config, state }
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    pub fn state(&self) -> CameraState {
        self.state
    }

    /// Non-finite input is ignored.
    pub fn set_rotation(&mut self, pitch: f32, yaw: f32) {
        if !pitch.is_finite() || !yaw.is_finite() {
            return;
        }
        self.state.pitch = self.config.pitch_range.clamp(pitch);
        self.state.yaw = yaw;
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        if !zoom.is_finite() {
            return;
        }
        self.state.zoom = self.config.zoom_range.clamp(zoom);
    }

    pub fn set_pan(&mut self, x: f32, y: f32) {
        if !x.is_finite() || !y.is_finite() {
            return;
        }
        self.state.pan_x = x;
        self.state.pan_y = y;
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.config.clone());
    }

    /// Orbit target: the pan offset on the z=0 plane.
    pub fn target(&self) -> Vec3 {
        Vec3::new(self.state.pan_x, self.state.pan_y, 0.0)
    }

    pub fn distance(&self) -> f32 {
        self.config.base_distance + self.state.zoom
    }

    pub fn eye(&self) -> Vec3 {
        let pitch = self.state.pitch.to_radians();
        let yaw = self.state.yaw.to_radians();
        let dir = Vec3::new(yaw.sin() * pitch.cos(), pitch.sin(), yaw.cos() * pitch.cos());
        self.target().add(dir.scale(self.distance()))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(CameraConfig::default())
    }
}
