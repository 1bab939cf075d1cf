use crate::projection::CameraMatrices;
use nalgebra::{Point3, Vector3, Vector4};
use wallmark_core::geom::Vec2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Point3<f32>,
    /// Unit length.
    pub direction: Vector3<f32>,
}

impl Ray {
    pub fn new(origin: Point3<f32>, direction: Vector3<f32>) -> Option<Self> {
        let direction = direction.try_normalize(f32::EPSILON)?;
        Some(Self { origin, direction })
    }

    pub fn at(&self, t: f32) -> Point3<f32> {
        self.origin + self.direction * t
    }
}

/// Turn a screen point into a world-space ray starting at the camera.
///
/// Returns `None` for an empty viewport or a singular matrix.
pub fn unproject(screen: Vec2, matrices: &CameraMatrices) -> Option<Ray> {
    let vp = matrices.viewport;
    if !vp.is_valid() || !screen.is_finite() {
        return None;
    }
    let ndc_x = 2.0 * screen.x / vp.width - 1.0;
    let ndc_y = 1.0 - 2.0 * screen.y / vp.height;

    let inv_projection = matrices.projection.try_inverse()?;
    let inv_view = matrices.view.try_inverse()?;

    let clip = Vector4::new(ndc_x, ndc_y, -1.0, 1.0);
    let eye = inv_projection * clip;
    // Keep only the direction: point it down the view axis.
    let eye = Vector4::new(eye.x, eye.y, -1.0, 0.0);
    let world = inv_view * eye;

    let origin = Point3::new(inv_view[(0, 3)], inv_view[(1, 3)], inv_view[(2, 3)]);
    Ray::new(origin, world.xyz())
}
