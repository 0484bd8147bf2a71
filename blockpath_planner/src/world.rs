// Sparse in-memory voxel world.
//
// `VoxelWorld` is the reference `BlockAccessor`: a `FxHashMap` from block
// position to `BlockType`, with every unset position inside the loaded area
// reading as `Air`. It is what tests and benchmarks build fixtures with, and
// what a caller can fill from a live connection to hand the planner an owned
// point-in-time snapshot.
//
// Two windows bound the data:
// - Build height `[min_y, max_y)`. Outside it every read is `VoidAir` and
//   `is_outside_build_height` reports true.
// - Optional loaded horizontal bounds (inclusive). Outside them reads are
//   `VoidAir` while `is_outside_build_height` stays false, which is exactly
//   how an unloaded chunk looks to the planner.
// Writes outside either window are no-ops.
//
// See also: `block.rs` for the `BlockAccessor` trait, `level.rs` for the
// projected overlay the search puts on top of this.

use crate::block::{BlockAccessor, BlockState, BlockType};
use crate::registry::BlockRegistry;
use crate::types::Vec3i;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Inclusive horizontal rectangle of loaded terrain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadedBounds {
    pub min_x: i32,
    pub min_z: i32,
    pub max_x: i32,
    pub max_z: i32,
}

impl LoadedBounds {
    pub fn contains(&self, pos: Vec3i) -> bool {
        pos.x >= self.min_x && pos.x <= self.max_x && pos.z >= self.min_z && pos.z <= self.max_z
    }
}

#[derive(Clone, Debug)]
pub struct VoxelWorld {
    registry: Arc<BlockRegistry>,
    blocks: FxHashMap<Vec3i, BlockType>,
    min_y: i32,
    max_y: i32,
    loaded: Option<LoadedBounds>,
}

impl VoxelWorld {
    /// Create an all-air world with build height `[min_y, max_y)`.
    pub fn new(registry: Arc<BlockRegistry>, min_y: i32, max_y: i32) -> Self {
        Self {
            registry,
            blocks: FxHashMap::default(),
            min_y,
            max_y,
            loaded: None,
        }
    }

    /// Restrict loaded terrain to a horizontal rectangle.
    pub fn with_loaded_bounds(mut self, bounds: LoadedBounds) -> Self {
        self.loaded = Some(bounds);
        self
    }

    pub fn registry(&self) -> &Arc<BlockRegistry> {
        &self.registry
    }

    pub fn is_loaded(&self, pos: Vec3i) -> bool {
        !self.is_outside_build_height(pos.y) && self.loaded.is_none_or(|b| b.contains(pos))
    }

    /// Read a block type. `VoidAir` outside build height or loaded bounds.
    pub fn get(&self, pos: Vec3i) -> BlockType {
        if !self.is_loaded(pos) {
            return BlockType::VoidAir;
        }
        self.blocks.get(&pos).copied().unwrap_or(BlockType::Air)
    }

    /// Write a block type. No-op outside build height or loaded bounds.
    pub fn set(&mut self, pos: Vec3i, block: BlockType) {
        if !self.is_loaded(pos) {
            return;
        }
        if block == BlockType::Air {
            self.blocks.remove(&pos);
        } else {
            self.blocks.insert(pos, block);
        }
    }

    /// Fill the inclusive box spanned by `a` and `b`.
    pub fn fill(&mut self, a: Vec3i, b: Vec3i, block: BlockType) {
        for x in a.x.min(b.x)..=a.x.max(b.x) {
            for y in a.y.min(b.y)..=a.y.max(b.y) {
                for z in a.z.min(b.z)..=a.z.max(b.z) {
                    self.set(Vec3i::new(x, y, z), block);
                }
            }
        }
    }

    /// Number of explicitly stored (non-air) blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl BlockAccessor for VoxelWorld {
    fn block_state(&self, pos: Vec3i) -> BlockState {
        self.registry.state(self.get(pos))
    }

    fn is_outside_build_height(&self, y: i32) -> bool {
        y < self.min_y || y >= self.max_y
    }
}
