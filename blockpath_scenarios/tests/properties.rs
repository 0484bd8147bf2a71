// Randomized invariants over generated edges.
//
// Columns of random blocks are stacked under a stone block the agent stands
// on, and every edge the graph offers from that node is checked: nothing may
// leave the agent standing on a surface that is missing or hurts.

use std::sync::Arc;

use blockpath_planner::graph::MovementGraph;
use blockpath_planner::inventory::ProjectedInventory;
use blockpath_planner::level::ProjectedLevel;
use blockpath_planner::movement::ActionKind;
use blockpath_planner::node::NodeState;
use blockpath_planner::{
    BlockRegistry, BlockType, InventorySnapshot, ItemStack, PlannerConfig, ToolKind, ToolTier,
    Vec3i, VoxelWorld,
};
use blockpath_scenarios::ORIGIN_FEET;
use proptest::prelude::*;

fn column_block() -> impl Strategy<Value = BlockType> {
    prop_oneof![
        Just(BlockType::Air),
        Just(BlockType::Stone),
        Just(BlockType::Dirt),
        Just(BlockType::Sand),
        Just(BlockType::Water),
        Just(BlockType::Lava),
        Just(BlockType::MagmaBlock),
        Just(BlockType::OakSlab),
        Just(BlockType::Cactus),
        Just(BlockType::Campfire),
        Just(BlockType::ShortGrass),
        Just(BlockType::Glass),
    ]
}

fn node_over(column: &[BlockType], extra: Option<(Vec3i, BlockType)>) -> NodeState {
    let registry = Arc::new(BlockRegistry::vanilla());
    let mut world = VoxelWorld::new(Arc::clone(&registry), -64, 320);
    world.set(Vec3i::ZERO, BlockType::Stone);
    for (depth, &block) in column.iter().enumerate() {
        world.set(Vec3i::new(0, -1 - depth as i32, 0), block);
    }
    if let Some((pos, block)) = extra {
        world.set(pos, block);
    }
    let inventory = InventorySnapshot::new()
        .with_stack(ItemStack::tool(ToolKind::Pickaxe, ToolTier::Diamond))
        .with_stack(ItemStack::tool(ToolKind::Shovel, ToolTier::Iron))
        .with_stack(ItemStack::blocks(BlockType::Cobblestone, 2));
    NodeState::new(
        ORIGIN_FEET,
        ProjectedLevel::new(Arc::new(world), Arc::clone(&registry)),
        ProjectedInventory::new(Arc::new(inventory), registry),
    )
}

proptest! {
    #[test]
    fn down_edges_land_on_safe_blocks(
        column in proptest::collection::vec(column_block(), 3),
    ) {
        let node = node_over(&column, None);
        let graph = MovementGraph::new(PlannerConfig::default());
        let edges = graph.edges(&node).unwrap();
        for edge in edges.iter().filter(|e| e.action.kind() == ActionKind::Down) {
            let next = &edge.resolution.next;
            let landing = next.level.block_state(next.position.down(1));
            prop_assert!(
                landing.is_safe_to_stand_on(),
                "landed on {:?} over column {:?}",
                landing.block_type(),
                column
            );
            prop_assert!(next.position.y < ORIGIN_FEET.y);
            prop_assert!(next.level.block_state(Vec3i::ZERO).is_free());
        }
    }

    #[test]
    fn every_edge_ends_on_a_safe_floor(
        column in proptest::collection::vec(column_block(), 3),
        side in column_block(),
        x in -1i32..=1,
        z in -1i32..=1,
    ) {
        let node = node_over(&column, Some((Vec3i::new(x, 0, z), side)));
        let graph = MovementGraph::new(PlannerConfig::default());
        for edge in graph.edges(&node).unwrap() {
            let next = &edge.resolution.next;
            let floor = next.level.block_state(next.position.down(1));
            prop_assert!(
                floor.is_safe_to_stand_on(),
                "{:?} left the agent on {:?}",
                edge.action,
                floor.block_type()
            );
            prop_assert!(edge.resolution.cost > 0.0);
        }
    }
}
