// Projected world view: the real world plus the hypothetical edits of a plan.
//
// Each search node needs to see the world "as if" every block it broke or
// placed on the way there had already changed. Copying the world per node is
// out of the question, so `ProjectedLevel` is a persistent parent-pointer
// chain: each fork allocates one `ChangeLink` that points at the parent's
// chain, and lookups walk the chain newest-first before falling back to the
// underlying `BlockAccessor`. Forking is O(1); lookups are O(edits on this
// path), which stays small because breaking and placing are expensive.
//
// The accessor and the registry are shared `Arc`s; forks never copy them.
//
// See also: `inventory.rs` for the matching inventory overlay, `graph.rs`
// which reads through a `ProjectedLevel` per node.

use crate::block::{BlockAccessor, BlockState, BlockType};
use crate::registry::BlockRegistry;
use crate::types::Vec3i;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

struct ChangeLink {
    pos: Vec3i,
    block: BlockType,
    parent: Option<Arc<ChangeLink>>,
}

#[derive(Clone)]
pub struct ProjectedLevel {
    accessor: Arc<dyn BlockAccessor>,
    registry: Arc<BlockRegistry>,
    head: Option<Arc<ChangeLink>>,
}

impl ProjectedLevel {
    pub fn new(accessor: Arc<dyn BlockAccessor>, registry: Arc<BlockRegistry>) -> Self {
        Self {
            accessor,
            registry,
            head: None,
        }
    }

    pub fn registry(&self) -> &Arc<BlockRegistry> {
        &self.registry
    }

    /// The block at `pos` with every projected edit applied.
    pub fn block_state(&self, pos: Vec3i) -> BlockState {
        let mut link = self.head.as_deref();
        while let Some(change) = link {
            if change.pos == pos {
                return self.registry.state(change.block);
            }
            link = change.parent.as_deref();
        }
        self.accessor.block_state(pos)
    }

    pub fn is_outside_build_height(&self, y: i32) -> bool {
        self.accessor.is_outside_build_height(y)
    }

    /// A fork in which `pos` reads as air.
    pub fn with_change_to_air(&self, pos: Vec3i) -> Self {
        self.with_change(pos, BlockType::Air)
    }

    /// A fork in which `pos` reads as `block`.
    pub fn with_placed_block(&self, pos: Vec3i, block: BlockType) -> Self {
        self.with_change(pos, block)
    }

    fn with_change(&self, pos: Vec3i, block: BlockType) -> Self {
        Self {
            accessor: Arc::clone(&self.accessor),
            registry: Arc::clone(&self.registry),
            head: Some(Arc::new(ChangeLink {
                pos,
                block,
                parent: self.head.clone(),
            })),
        }
    }

    /// Effective edits relative to the real world, keyed by position.
    pub fn changes(&self) -> BTreeMap<Vec3i, BlockType> {
        let mut out = BTreeMap::new();
        let mut link = self.head.as_deref();
        while let Some(change) = link {
            out.entry(change.pos).or_insert(change.block);
            link = change.parent.as_deref();
        }
        out
    }

    pub fn change_count(&self) -> usize {
        let mut count = 0;
        let mut link = self.head.as_deref();
        while let Some(change) = link {
            count += 1;
            link = change.parent.as_deref();
        }
        count
    }
}

impl PartialEq for ProjectedLevel {
    /// Two projections are equal when they overlay the same world with the
    /// same effective edits.
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.accessor, &other.accessor) && self.changes() == other.changes()
    }
}

impl fmt::Debug for ProjectedLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProjectedLevel")
            .field("changes", &self.changes())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::VoxelWorld;

    fn stone_floor() -> ProjectedLevel {
        let registry = Arc::new(BlockRegistry::vanilla());
        let mut world = VoxelWorld::new(Arc::clone(&registry), -64, 320);
        world.set(Vec3i::new(0, 0, 0), BlockType::Stone);
        world.set(Vec3i::new(1, 0, 0), BlockType::Stone);
        ProjectedLevel::new(Arc::new(world), registry)
    }

    #[test]
    fn reads_fall_back_to_the_world() {
        let level = stone_floor();
        assert_eq!(level.block_state(Vec3i::new(0, 0, 0)).block_type(), BlockType::Stone);
        assert_eq!(level.block_state(Vec3i::new(0, 1, 0)).block_type(), BlockType::Air);
    }

    #[test]
    fn forks_do_not_affect_parent() {
        let level = stone_floor();
        let mined = level.with_change_to_air(Vec3i::new(0, 0, 0));
        assert_eq!(mined.block_state(Vec3i::new(0, 0, 0)).block_type(), BlockType::Air);
        assert_eq!(level.block_state(Vec3i::new(0, 0, 0)).block_type(), BlockType::Stone);
    }

    #[test]
    fn newest_edit_wins() {
        let level = stone_floor();
        let pos = Vec3i::new(1, 0, 0);
        let forked = level
            .with_change_to_air(pos)
            .with_placed_block(pos, BlockType::Dirt);
        assert_eq!(forked.block_state(pos).block_type(), BlockType::Dirt);
        assert_eq!(forked.changes().len(), 1);
        assert_eq!(forked.change_count(), 2);
    }

    #[test]
    fn equality_compares_effective_edits() {
        let level = stone_floor();
        let a = level.with_change_to_air(Vec3i::new(0, 0, 0));
        let b = level.with_change_to_air(Vec3i::new(0, 0, 0));
        assert_eq!(a, b);
        assert_ne!(a, level);
    }
}
