// Block types, resolved block states, and the read-only world interface.
//
// A `BlockState` is a small `Copy` value: the `BlockType` plus its resolved
// `BlockProperties` (collision shape, hazard flags, mining data). Every
// predicate the movement templates need ("can I walk through this", "is it
// safe to stand on", "can I replace it with a placed block") is a method on
// `BlockState`, so templates never consult a global table.
//
// Properties come from a `BlockRegistry` (see `registry.rs`) that callers
// construct once and share through an `Arc`. The world itself is supplied by
// the execution layer through the `BlockAccessor` trait.
//
// `BlockType::VoidAir` is the sentinel returned for positions that have no
// data: below the build floor, or inside build height but not loaded. The
// graph treats the second case as "reached the edge of what we know".
//
// See also: `registry.rs` for the vanilla property table, `world.rs` for the
// in-memory `VoxelWorld` accessor, `level.rs` for the projected overlay.

use crate::item::{ItemType, ToolKind, ToolTier};
use crate::types::Vec3i;
use serde::{Deserialize, Serialize};

/// The kind of block occupying a grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BlockType {
    Air,
    CaveAir,
    /// No data: below the world, or an unloaded chunk.
    VoidAir,
    Stone,
    Cobblestone,
    Dirt,
    GrassBlock,
    ShortGrass,
    Sand,
    Gravel,
    OakLog,
    OakPlanks,
    OakSlab,
    OakStairs,
    OakFence,
    Glass,
    Obsidian,
    IronOre,
    DiamondOre,
    Bedrock,
    Barrier,
    Water,
    Lava,
    MagmaBlock,
    Cactus,
    SweetBerryBush,
    Campfire,
}

impl BlockType {
    pub const ALL: [BlockType; 27] = [
        BlockType::Air,
        BlockType::CaveAir,
        BlockType::VoidAir,
        BlockType::Stone,
        BlockType::Cobblestone,
        BlockType::Dirt,
        BlockType::GrassBlock,
        BlockType::ShortGrass,
        BlockType::Sand,
        BlockType::Gravel,
        BlockType::OakLog,
        BlockType::OakPlanks,
        BlockType::OakSlab,
        BlockType::OakStairs,
        BlockType::OakFence,
        BlockType::Glass,
        BlockType::Obsidian,
        BlockType::IronOre,
        BlockType::DiamondOre,
        BlockType::Bedrock,
        BlockType::Barrier,
        BlockType::Water,
        BlockType::Lava,
        BlockType::MagmaBlock,
        BlockType::Cactus,
        BlockType::SweetBerryBush,
        BlockType::Campfire,
    ];

    pub fn is_air(self) -> bool {
        matches!(self, BlockType::Air | BlockType::CaveAir | BlockType::VoidAir)
    }
}

/// Coarse classification of a block's collision box.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionShape {
    /// Nothing to collide with (air, grass, fluids).
    Empty,
    /// Collides but does not fill the cell (slabs, stairs, fences, cactus).
    Partial,
    /// A full 1x1x1 cube.
    Full,
}

/// Everything the planner knows about one block type.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlockProperties {
    pub shape: CollisionShape,
    /// The top face is a full square an agent can stand on.
    pub top_face_full: bool,
    pub fluid_source: bool,
    /// Affected by gravity (sand, gravel).
    pub falling: bool,
    /// Damages an agent standing on it (magma, campfire).
    pub hurt_when_stood_on: bool,
    /// Damages an agent brushing against its side (cactus, berry bush).
    pub hurt_on_touch_side: bool,
    /// A placed block may overwrite it without mining first.
    pub replaceable: bool,
    /// Can be mined at all. Bedrock and barriers cannot.
    pub diggable: bool,
    pub stairs: bool,
    /// Hardness; negative means unbreakable.
    pub destroy_time: f32,
    /// Tool category that speeds up mining.
    pub preferred_tool: Option<ToolKind>,
    /// Minimum tier required for the block to drop anything. `None` means
    /// the block drops regardless of tool.
    pub required_tier: Option<ToolTier>,
    /// Item dropped when broken with an adequate tool.
    pub drop: Option<ItemType>,
}

/// A block type together with its resolved properties.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlockState {
    block_type: BlockType,
    properties: BlockProperties,
}

impl BlockState {
    pub fn new(block_type: BlockType, properties: BlockProperties) -> Self {
        Self {
            block_type,
            properties,
        }
    }

    pub fn block_type(&self) -> BlockType {
        self.block_type
    }

    pub fn properties(&self) -> &BlockProperties {
        &self.properties
    }

    pub fn is_void(&self) -> bool {
        self.block_type == BlockType::VoidAir
    }

    pub fn collision_shape(&self) -> CollisionShape {
        self.properties.shape
    }

    pub fn has_no_collisions(&self) -> bool {
        self.properties.shape == CollisionShape::Empty
    }

    pub fn is_full_block(&self) -> bool {
        self.properties.shape == CollisionShape::Full
    }

    pub fn blocks_motion(&self) -> bool {
        self.properties.shape != CollisionShape::Empty
    }

    pub fn is_top_face_full(&self) -> bool {
        self.properties.top_face_full
    }

    pub fn is_fluid_source(&self) -> bool {
        self.properties.fluid_source
    }

    pub fn is_falling(&self) -> bool {
        self.properties.falling
    }

    pub fn is_hurt_when_stood_on(&self) -> bool {
        self.properties.hurt_when_stood_on
    }

    pub fn is_hurt_on_touch_side(&self) -> bool {
        self.properties.hurt_on_touch_side
    }

    pub fn can_be_replaced(&self) -> bool {
        self.properties.replaceable
    }

    pub fn is_diggable(&self) -> bool {
        self.properties.diggable && self.properties.destroy_time >= 0.0
    }

    pub fn is_stairs(&self) -> bool {
        self.properties.stairs
    }

    /// An agent's body can occupy this cell: nothing to collide with and no
    /// fluid to swim in. Side hazards (berry bushes) still count as free;
    /// they only block diagonal corners.
    pub fn is_free(&self) -> bool {
        self.has_no_collisions() && !self.is_fluid_source()
    }

    /// A landing/standing surface: full top face that does not hurt.
    pub fn is_safe_to_stand_on(&self) -> bool {
        self.is_top_face_full() && !self.is_hurt_when_stood_on()
    }
}

/// Read-only view of world block data, supplied by the execution layer.
///
/// Implementations must return a consistent point-in-time view for the
/// duration of a search. Positions without data return a `VoidAir` state.
pub trait BlockAccessor: Send + Sync {
    fn block_state(&self, pos: Vec3i) -> BlockState;

    fn is_outside_build_height(&self, y: i32) -> bool;
}
