use crate::projection::{from_vector, to_vector, CameraMatrices};
use crate::ray::{unproject, Ray};
use tracing::debug;
use wallmark_core::config::PickConfig;
use wallmark_core::geom::{Vec2, Vec3};
use wallmark_core::report::WallHitReport;
use wallmark_core::room::{Room, WallId};

/// A ray hitting a wall inside its bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallHit {
    pub wall: WallId,
    /// Wall-local normalized coordinates, inside [0, 1] on both axes.
    pub uv: Vec2,
    pub world: Vec3,
    /// Ray parameter `t`; the ray direction is unit length so this is a distance.
    pub distance: f32,
}

impl WallHit {
    pub fn report(&self) -> WallHitReport {
        WallHitReport::new(self.wall, self.uv, self.world, self.distance)
    }
}

/// Ray/wall intersection against a fixed room.
#[derive(Debug, Clone)]
pub struct WallPicker {
    room: Room,
    config: PickConfig,
}

impl WallPicker {
    pub fn new(room: Room, config: PickConfig) -> Self {
        Self { room, config }
    }

    pub fn room(&self) -> &Room {
        &self.room
    }

    pub fn config(&self) -> &PickConfig {
        &self.config
    }

    /// Intersect `ray` with a single wall.
    pub fn intersect(&self, ray: &Ray, id: WallId) -> Option<WallHit> {
        let wall = self.room.wall(id);
        let c0 = to_vector(wall.corners[0]);
        let edge_x = to_vector(wall.corners[1]) - c0;
        let edge_y = to_vector(wall.corners[3]) - c0;
        let normal = edge_x.cross(&edge_y).try_normalize(f32::EPSILON)?;
        let d = -normal.dot(&c0);

        let denom = normal.dot(&ray.direction);
        if denom.abs() < self.config.parallel_epsilon {
            return None;
        }
        if self.config.cull_back_faces && to_vector(id.inward_normal()).dot(&ray.direction) > 0.0 {
            return None;
        }

        let t = -(normal.dot(&ray.origin.coords) + d) / denom;
        if !t.is_finite() || t < 0.0 {
            return None;
        }

        let world = from_vector(&ray.at(t).coords);
        if !wall.bounds.expand(self.config.bounds_epsilon).contains(world) {
            return None;
        }

        let uv = self.room.world_to_wall(id, world);
        // Hits inside the tolerance band may overshoot the edge slightly.
        let uv = Vec2::new(uv.x.clamp(0.0, 1.0), uv.y.clamp(0.0, 1.0));
        Some(WallHit {
            wall: id,
            uv,
            world,
            distance: t,
        })
    }

    /// Closest wall hit along `ray`.
    pub fn pick(&self, ray: &Ray) -> Option<WallHit> {
        WallId::ALL
            .iter()
            .filter_map(|&id| self.intersect(ray, id))
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    pub fn pick_screen(&self, screen: Vec2, matrices: &CameraMatrices) -> Option<WallHit> {
        let ray = unproject(screen, matrices)?;
        let hit = self.pick(&ray);
        match &hit {
            Some(h) => debug!(wall = h.wall.index(), u = h.uv.x, v = h.uv.y, t = h.distance, "wall hit"),
            None => debug!(x = screen.x, y = screen.y, "no wall under pointer"),
        }
        hit
    }

    /// Re-test one specific wall, ignoring every other surface.
    pub fn pick_wall_screen(&self, screen: Vec2, matrices: &CameraMatrices, id: WallId) -> Option<WallHit> {
        let ray = unproject(screen, matrices)?;
        self.intersect(&ray, id)
    }
}
