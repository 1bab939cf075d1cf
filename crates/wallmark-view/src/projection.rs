use nalgebra::{Matrix4, Point3, Vector3, Vector4};
use serde::{Deserialize, Serialize};
use wallmark_core::camera::Camera;
use wallmark_core::geom::{Vec2, Vec3};

/// Drawing surface size in pixels. Screen Y grows downwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

pub(crate) fn to_point(v: Vec3) -> Point3<f32> {
    Point3::new(v.x, v.y, v.z)
}

pub(crate) fn to_vector(v: Vec3) -> Vector3<f32> {
    Vector3::new(v.x, v.y, v.z)
}

pub(crate) fn from_vector(v: &Vector3<f32>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

/// View and projection matrices for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraMatrices {
    pub view: Matrix4<f32>,
    pub projection: Matrix4<f32>,
    pub viewport: Viewport,
}

impl CameraMatrices {
    /// `None` for an empty viewport.
    pub fn from_camera(camera: &Camera, viewport: Viewport) -> Option<Self> {
        if !viewport.is_valid() {
            return None;
        }
        Some(Self {
            view: view_matrix(camera),
            projection: projection_matrix(camera, viewport),
            viewport,
        })
    }

    /// Project a world point to screen pixels. `None` when the point is
    /// behind the camera.
    pub fn project(&self, world: Vec3) -> Option<Vec2> {
        let p = Vector4::new(world.x, world.y, world.z, 1.0);
        let clip = self.projection * self.view * p;
        if clip.w <= f32::EPSILON {
            return None;
        }
        let ndc_x = clip.x / clip.w;
        let ndc_y = clip.y / clip.w;
        Some(Vec2::new(
            (ndc_x + 1.0) * 0.5 * self.viewport.width,
            (1.0 - ndc_y) * 0.5 * self.viewport.height,
        ))
    }

    /// Camera position, read from the inverse view matrix.
    pub fn eye(&self) -> Option<Vec3> {
        let inv = self.view.try_inverse()?;
        Some(Vec3::new(inv[(0, 3)], inv[(1, 3)], inv[(2, 3)]))
    }

    /// Depth of a world point along the view axis; larger is further away.
    pub fn view_depth(&self, world: Vec3) -> f32 {
        let p = self.view.transform_point(&to_point(world));
        -p.z
    }
}

pub fn view_matrix(camera: &Camera) -> Matrix4<f32> {
    let eye = to_point(camera.eye());
    let target = to_point(camera.target());
    Matrix4::look_at_rh(&eye, &target, &Vector3::y())
}

pub fn projection_matrix(camera: &Camera, viewport: Viewport) -> Matrix4<f32> {
    let cfg = camera.config();
    Matrix4::new_perspective(viewport.aspect(), cfg.fov_y_degrees.to_radians(), cfg.near, cfg.far)
}
