// Gap jump: leap over one unsafe block onto a floor two blocks away.
//
// Only generated when the block in between is *not* safe to stand on (air,
// fluid, magma); if it were, a plain step would be cheaper. Parkour never
// mines or places, so every cell the jump arc passes through must already be
// free.

use super::{BlockReader, EdgeBuilder, EdgeResolution};
use crate::action::WorldAction;
use crate::costs;
use crate::error::OutOfLevel;
use crate::types::{Cardinal, Vec3i};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParkourMovement {
    pub direction: Cardinal,
}

impl ParkourMovement {
    pub fn new(direction: Cardinal) -> Self {
        Self { direction }
    }

    pub(super) fn resolve(
        &self,
        blocks: &mut BlockReader<'_>,
    ) -> Result<Option<EdgeResolution>, OutOfLevel> {
        let node = blocks.node();
        let feet = node.position;
        let step = self.direction.offset();
        let gap = feet + step;
        let target = gap + step;

        let arc: [Vec3i; 7] = [
            feet.up(2),
            gap,
            gap.up(1),
            gap.up(2),
            target,
            target.up(1),
            target.up(2),
        ];
        for cell in arc {
            if !blocks.get(cell)?.is_free() {
                return Ok(None);
            }
        }
        if blocks.get(gap.down(1))?.is_safe_to_stand_on() {
            return Ok(None);
        }
        if !blocks.get(target.down(1))?.is_safe_to_stand_on() {
            return Ok(None);
        }

        let mut builder = EdgeBuilder::new(node, costs::ONE_GAP_JUMP);
        builder.push(WorldAction::GapJump { pos: target });
        Ok(Some(builder.finish(target)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockType;
    use crate::inventory::ProjectedInventory;
    use crate::item::InventorySnapshot;
    use crate::level::ProjectedLevel;
    use crate::node::NodeState;
    use crate::registry::BlockRegistry;
    use crate::world::VoxelWorld;
    use std::sync::Arc;

    fn jump_over(gap_floor: BlockType) -> Option<EdgeResolution> {
        let registry = Arc::new(BlockRegistry::vanilla());
        let mut world = VoxelWorld::new(Arc::clone(&registry), -64, 320);
        world.set(Vec3i::new(0, 0, 0), BlockType::Stone);
        world.set(Vec3i::new(1, 0, 0), gap_floor);
        world.set(Vec3i::new(2, 0, 0), BlockType::Stone);
        let node = NodeState::new(
            Vec3i::new(0, 1, 0),
            ProjectedLevel::new(Arc::new(world), Arc::clone(&registry)),
            ProjectedInventory::new(Arc::new(InventorySnapshot::new()), registry),
        );
        let mut blocks = BlockReader::new(&node);
        ParkourMovement::new(Cardinal::East).resolve(&mut blocks).unwrap()
    }

    #[test]
    fn jumps_over_air_and_hazards() {
        for gap in [BlockType::Air, BlockType::Lava, BlockType::MagmaBlock] {
            let edge = jump_over(gap).unwrap_or_else(|| panic!("{gap:?}"));
            assert_eq!(edge.next.position, Vec3i::new(2, 1, 0));
            assert_eq!(edge.cost, costs::ONE_GAP_JUMP);
            assert_eq!(
                edge.actions.as_slice(),
                &[WorldAction::GapJump {
                    pos: Vec3i::new(2, 1, 0)
                }]
            );
        }
    }

    #[test]
    fn does_not_jump_over_solid_floor() {
        assert!(jump_over(BlockType::Stone).is_none());
    }
}
