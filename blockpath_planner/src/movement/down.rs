// Dig down: mine the block under the feet and drop onto the first safe
// surface within three blocks.
//
// The scan below the mined block stops at the first non-free cell. If that
// cell is safe to stand on it becomes the landing; anything else (a fluid, a
// slab, magma) makes the edge infeasible, as does running out of scan depth.
// The mined block's horizontal neighbours must not hold fluid sources, or
// the shaft would flood.

use super::{BlockReader, EdgeBuilder, EdgeResolution, PlannedBreak};
use crate::costs;
use crate::error::OutOfLevel;
use crate::types::Cardinal;

/// Deepest landing below the feet, counted in blocks below the feet.
const MAX_LANDING_DEPTH: i32 = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DownMovement;

impl DownMovement {
    pub(super) fn resolve(
        &self,
        blocks: &mut BlockReader<'_>,
    ) -> Result<Option<EdgeResolution>, OutOfLevel> {
        let node = blocks.node();
        let feet = node.position;
        let mined = feet.down(1);
        let state = blocks.get(mined)?;
        if state.is_free() || !state.is_diggable() {
            return Ok(None);
        }
        let Some(mining) = node.inventory.best_tool_for(&state) else {
            return Ok(None);
        };
        for side in Cardinal::ALL {
            if blocks.get(mined + side.offset())?.is_fluid_source() {
                return Ok(None);
            }
        }

        let mut landing = None;
        for depth in 2..=MAX_LANDING_DEPTH {
            let below = blocks.get(feet.down(depth))?;
            if below.is_safe_to_stand_on() {
                landing = Some(depth);
                break;
            }
            if !below.is_free() {
                return Ok(None);
            }
        }
        let Some(depth) = landing else {
            return Ok(None);
        };
        // Landing on the block at `depth` puts the feet one above it.
        let fallen = u8::try_from(depth - 1).unwrap_or(u8::MAX);
        let Some(fall_cost) = costs::fall_cost(fallen) else {
            return Ok(None);
        };

        let mut builder = EdgeBuilder::new(node, fall_cost);
        builder.break_block(&PlannedBreak {
            pos: mined,
            state,
            mining,
        });
        Ok(Some(builder.finish(feet.down(depth - 1))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockType;
    use crate::inventory::ProjectedInventory;
    use crate::item::{InventorySnapshot, ItemStack, ItemType, ToolKind, ToolTier};
    use crate::level::ProjectedLevel;
    use crate::node::NodeState;
    use crate::registry::BlockRegistry;
    use crate::types::Vec3i;
    use crate::world::VoxelWorld;
    use std::sync::Arc;

    fn dig(
        column: &[(i32, BlockType)],
        inventory: InventorySnapshot,
    ) -> (NodeState, Option<EdgeResolution>) {
        let registry = Arc::new(BlockRegistry::vanilla());
        let mut world = VoxelWorld::new(Arc::clone(&registry), -64, 320);
        for &(y, block) in column {
            world.set(Vec3i::new(0, y, 0), block);
        }
        let node = NodeState::new(
            Vec3i::new(0, 1, 0),
            ProjectedLevel::new(Arc::new(world), Arc::clone(&registry)),
            ProjectedInventory::new(Arc::new(inventory), registry),
        );
        let edge = {
            let mut blocks = BlockReader::new(&node);
            DownMovement.resolve(&mut blocks).unwrap()
        };
        (node, edge)
    }

    fn pickaxe() -> InventorySnapshot {
        InventorySnapshot::new().with_stack(ItemStack::tool(ToolKind::Pickaxe, ToolTier::Diamond))
    }

    #[test]
    fn lands_on_the_first_safe_block() {
        let (_, edge) = dig(&[(0, BlockType::Stone), (-2, BlockType::Dirt)], pickaxe());
        let edge = edge.unwrap();
        assert_eq!(edge.next.position, Vec3i::new(0, -1, 0));
        let mining = 6.0 / costs::TICKS_PER_BLOCK + costs::BREAK_BLOCK_ADDITION;
        assert!((edge.cost - (costs::FALL_2 + mining)).abs() < 1e-9);
        assert_eq!(edge.actions.len(), 1);
    }

    #[test]
    fn gains_the_drop() {
        let (node, edge) = dig(&[(0, BlockType::Stone), (-1, BlockType::Stone)], pickaxe());
        let cobble = ItemType::Block(BlockType::Cobblestone);
        assert_eq!(edge.unwrap().next.inventory.count(cobble), node.inventory.count(cobble) + 1);
    }

    #[test]
    fn hazards_below_block_the_dig() {
        for hazard in [BlockType::Lava, BlockType::MagmaBlock, BlockType::OakSlab] {
            let column = [(0, BlockType::Stone), (-1, hazard), (-2, BlockType::Stone)];
            let (_, edge) = dig(&column, pickaxe());
            assert!(edge.is_none(), "{hazard:?}");
        }
    }

    #[test]
    fn too_deep_is_infeasible() {
        let (_, edge) = dig(&[(0, BlockType::Stone), (-4, BlockType::Stone)], pickaxe());
        assert!(edge.is_none());
        let (_, edge) = dig(&[(0, BlockType::Stone), (-3, BlockType::Stone)], pickaxe());
        assert_eq!(edge.unwrap().next.position, Vec3i::new(0, -2, 0));
    }

    #[test]
    fn bedrock_cannot_be_dug() {
        let (_, edge) = dig(&[(0, BlockType::Bedrock), (-1, BlockType::Stone)], pickaxe());
        assert!(edge.is_none());
    }
}
