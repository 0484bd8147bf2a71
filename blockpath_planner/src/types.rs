// Core spatial types shared across the planner.
//
// Defines the integer grid coordinate (`Vec3i`), the six block faces
// (`BlockFace`) used when describing placement targets, and the horizontal
// compass directions movement templates are keyed by. All types are plain
// `Copy` values and derive `Serialize`/`Deserialize` so routes can be handed
// to the execution layer as JSON.
//
// Axis conventions follow the game world:
// - X: east  (positive) / west  (negative)
// - Y: up    (positive) / down  (negative)
// - Z: south (positive) / north (negative)
//
// See also: `block.rs` for what lives at a coordinate, `movement/` for the
// templates that step between coordinates.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

// ---------------------------------------------------------------------------
// Spatial types
// ---------------------------------------------------------------------------

/// A block position in the voxel grid. Each component is in block units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Vec3i {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Vec3i {
    pub const ZERO: Vec3i = Vec3i::new(0, 0, 0);

    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Component-wise offset.
    pub const fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    pub const fn up(self, n: i32) -> Self {
        self.offset(0, n, 0)
    }

    pub const fn down(self, n: i32) -> Self {
        self.offset(0, -n, 0)
    }

    /// Manhattan distance between two coordinates.
    pub fn manhattan_distance(self, other: Self) -> u32 {
        ((self.x - other.x).unsigned_abs())
            + ((self.y - other.y).unsigned_abs())
            + ((self.z - other.z).unsigned_abs())
    }

    pub fn distance_squared(self, other: Self) -> f64 {
        let dx = f64::from(self.x - other.x);
        let dy = f64::from(self.y - other.y);
        let dz = f64::from(self.z - other.z);
        dx * dx + dy * dy + dz * dz
    }

    /// Euclidean distance.
    pub fn distance(self, other: Self) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// Euclidean distance ignoring the Y axis.
    pub fn horizontal_distance(self, other: Self) -> f64 {
        let dx = f64::from(self.x - other.x);
        let dz = f64::from(self.z - other.z);
        (dx * dx + dz * dz).sqrt()
    }
}

impl Add for Vec3i {
    type Output = Vec3i;

    fn add(self, rhs: Vec3i) -> Vec3i {
        self.offset(rhs.x, rhs.y, rhs.z)
    }
}

impl Sub for Vec3i {
    type Output = Vec3i;

    fn sub(self, rhs: Vec3i) -> Vec3i {
        self.offset(-rhs.x, -rhs.y, -rhs.z)
    }
}

impl fmt::Display for Vec3i {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

// ---------------------------------------------------------------------------
// Faces and compass directions
// ---------------------------------------------------------------------------

/// A face of a block, as seen when clicking it to place another block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockFace {
    Bottom,
    Top,
    North,
    South,
    West,
    East,
}

/// The four horizontal compass directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Cardinal {
    North,
    East,
    South,
    West,
}

impl Cardinal {
    pub const ALL: [Cardinal; 4] = [
        Cardinal::North,
        Cardinal::East,
        Cardinal::South,
        Cardinal::West,
    ];

    pub const fn offset(self) -> Vec3i {
        match self {
            Cardinal::North => Vec3i::new(0, 0, -1),
            Cardinal::East => Vec3i::new(1, 0, 0),
            Cardinal::South => Vec3i::new(0, 0, 1),
            Cardinal::West => Vec3i::new(-1, 0, 0),
        }
    }

    pub const fn opposite(self) -> Cardinal {
        match self {
            Cardinal::North => Cardinal::South,
            Cardinal::East => Cardinal::West,
            Cardinal::South => Cardinal::North,
            Cardinal::West => Cardinal::East,
        }
    }

    /// Left-hand side when facing this direction.
    pub const fn left(self) -> Cardinal {
        match self {
            Cardinal::North => Cardinal::West,
            Cardinal::East => Cardinal::North,
            Cardinal::South => Cardinal::East,
            Cardinal::West => Cardinal::South,
        }
    }

    pub const fn right(self) -> Cardinal {
        self.left().opposite()
    }

    /// The face of a neighbouring block that points back toward us when the
    /// neighbour lies in this direction.
    pub const fn facing_face(self) -> BlockFace {
        match self {
            Cardinal::North => BlockFace::South,
            Cardinal::East => BlockFace::West,
            Cardinal::South => BlockFace::North,
            Cardinal::West => BlockFace::East,
        }
    }
}
