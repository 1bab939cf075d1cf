use crate::error::{Error, Result};
use crate::geom::{BBox3, Vec2, Vec3};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the five modelled room surfaces. The numeric index is the stored
/// wall index; `1` (ceiling) is reserved and has no surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum WallId {
    Floor,
    Left,
    Right,
    Front,
    Back,
}

impl WallId {
    pub const ALL: [WallId; 5] = [
        WallId::Floor,
        WallId::Left,
        WallId::Right,
        WallId::Front,
        WallId::Back,
    ];

    pub fn index(self) -> u8 {
        match self {
            WallId::Floor => 0,
            WallId::Left => 2,
            WallId::Right => 3,
            WallId::Front => 4,
            WallId::Back => 5,
        }
    }

    pub fn from_index(index: u8) -> Result<Self> {
        match index {
            0 => Ok(WallId::Floor),
            2 => Ok(WallId::Left),
            3 => Ok(WallId::Right),
            4 => Ok(WallId::Front),
            5 => Ok(WallId::Back),
            other => Err(Error::InvalidWallIndex(other)),
        }
    }

    /// Position in [`WallId::ALL`].
    fn slot(self) -> usize {
        match self {
            WallId::Floor => 0,
            WallId::Left => 1,
            WallId::Right => 2,
            WallId::Front => 3,
            WallId::Back => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            WallId::Floor => "floor",
            WallId::Left => "left",
            WallId::Right => "right",
            WallId::Front => "front",
            WallId::Back => "back",
        }
    }

    /// Unit normal pointing into the room.
    pub fn inward_normal(self) -> Vec3 {
        match self {
            WallId::Floor => Vec3::new(0.0, 1.0, 0.0),
            WallId::Left => Vec3::new(1.0, 0.0, 0.0),
            WallId::Right => Vec3::new(-1.0, 0.0, 0.0),
            WallId::Front => Vec3::new(0.0, 0.0, 1.0),
            WallId::Back => Vec3::new(0.0, 0.0, -1.0),
        }
    }
}

impl TryFrom<u8> for WallId {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        WallId::from_index(value)
    }
}

impl From<WallId> for u8 {
    fn from(id: WallId) -> u8 {
        id.index()
    }
}

impl fmt::Display for WallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.index())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomDimensions {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
}

impl Default for RoomDimensions {
    fn default() -> Self {
        Self {
            width: 3.0,
            height: 2.0,
            depth: 3.0,
        }
    }
}

impl RoomDimensions {
    pub fn validate(&self) -> Result<()> {
        let ok = |v: f32| v.is_finite() && v > 0.0;
        if ok(self.width) && ok(self.height) && ok(self.depth) {
            Ok(())
        } else {
            Err(Error::InvalidRoom {
                width: self.width,
                height: self.height,
                depth: self.depth,
            })
        }
    }
}

/// A static wall quad. Corners are in wall-local order (0,0), (1,0), (1,1),
/// (0,1), so `corners[1] - corners[0]` is the local X axis and
/// `corners[3] - corners[0]` the local Y axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Wall {
    pub id: WallId,
    pub corners: [Vec3; 4],
    pub bounds: BBox3,
}

impl Wall {
    pub fn inward_normal(&self) -> Vec3 {
        self.id.inward_normal()
    }

    pub fn center(&self) -> Vec3 {
        self.bounds.center()
    }
}

/// Axis-aligned room box centred on the origin. Built once and never
/// mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    dims: RoomDimensions,
    walls: Vec<Wall>,
}

impl Room {
    pub fn new(dims: RoomDimensions) -> Result<Self> {
        dims.validate()?;
        Ok(Self::from_valid(dims))
    }

    fn from_valid(dims: RoomDimensions) -> Self {
        let walls = WallId::ALL
            .iter()
            .map(|&id| {
                let corners = [
                    wall_to_world(&dims, id, Vec2::new(0.0, 0.0)),
                    wall_to_world(&dims, id, Vec2::new(1.0, 0.0)),
                    wall_to_world(&dims, id, Vec2::new(1.0, 1.0)),
                    wall_to_world(&dims, id, Vec2::new(0.0, 1.0)),
                ];
                Wall {
                    id,
                    corners,
                    bounds: BBox3::from_points(corners.iter()),
                }
            })
            .collect();
        Self { dims, walls }
    }

    pub fn dimensions(&self) -> RoomDimensions {
        self.dims
    }

    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    pub fn wall(&self, id: WallId) -> &Wall {
        &self.walls[id.slot()]
    }

    pub fn world_to_wall(&self, id: WallId, point: Vec3) -> Vec2 {
        world_to_wall(&self.dims, id, point)
    }

    pub fn wall_to_world(&self, id: WallId, uv: Vec2) -> Vec3 {
        wall_to_world(&self.dims, id, uv)
    }
}

impl Default for Room {
    fn default() -> Self {
        Self::from_valid(RoomDimensions::default())
    }
}

/// Map a point on a wall plane to wall-local normalized coordinates.
pub fn world_to_wall(dims: &RoomDimensions, id: WallId, p: Vec3) -> Vec2 {
    let hw = dims.width / 2.0;
    let hh = dims.height / 2.0;
    let hd = dims.depth / 2.0;
    match id {
        WallId::Floor => Vec2::new((p.x + hw) / dims.width, (p.z + hd) / dims.depth),
        WallId::Left => Vec2::new((p.z + hd) / dims.depth, (p.y + hh) / dims.height),
        // Facing -X: local X runs towards -Z.
        WallId::Right => Vec2::new((hd - p.z) / dims.depth, (p.y + hh) / dims.height),
        WallId::Front => Vec2::new((p.x + hw) / dims.width, (p.y + hh) / dims.height),
        // Facing -Z: local X runs towards -X.
        WallId::Back => Vec2::new((hw - p.x) / dims.width, (p.y + hh) / dims.height),
    }
}

/// Inverse of [`world_to_wall`].
pub fn wall_to_world(dims: &RoomDimensions, id: WallId, uv: Vec2) -> Vec3 {
    let hw = dims.width / 2.0;
    let hh = dims.height / 2.0;
    let hd = dims.depth / 2.0;
    match id {
        WallId::Floor => Vec3::new(-hw + uv.x * dims.width, -hh, -hd + uv.y * dims.depth),
        WallId::Left => Vec3::new(-hw, -hh + uv.y * dims.height, -hd + uv.x * dims.depth),
        WallId::Right => Vec3::new(hw, -hh + uv.y * dims.height, hd - uv.x * dims.depth),
        WallId::Front => Vec3::new(-hw + uv.x * dims.width, -hh + uv.y * dims.height, -hd),
        WallId::Back => Vec3::new(hw - uv.x * dims.width, -hh + uv.y * dims.height, hd),
    }
}
