// Cost model: movement constants and the mining-time formula.
//
// Costs are expressed in "blocks walked": one straight step costs 1.0, and
// every other action is converted into the equivalent walking distance via
// `TICKS_PER_BLOCK` (how many game ticks it takes to walk one block at
// normal speed). Breaking and placing carry fixed surcharges on top so the
// search prefers walking around obstacles over tunnelling through them.
//
// Mining time follows the game's rules: a matching tool multiplies speed by
// its tier, efficiency adds `level^2 + 1`, and the resulting damage per tick
// is divided by 30 when the tool can harvest the block and by 100 otherwise.
//
// See also: `inventory.rs` (`best_tool_for`) which picks the tool that
// minimizes these ticks, `action.rs` which turns ticks into execution
// budgets.

use crate::block::BlockState;
use crate::item::ItemStack;

/// One straight step to an adjacent block.
pub const STRAIGHT: f64 = 1.0;
/// One diagonal step.
pub const DIAGONAL: f64 = std::f64::consts::SQRT_2;
/// Surcharge for breaking any block.
pub const BREAK_BLOCK_ADDITION: f64 = 2.0;
/// Surcharge for placing any block.
pub const PLACE_BLOCK: f64 = 5.0;
pub const TICKS_PER_SECOND: f64 = 20.0;
/// Normal walking speed.
pub const BLOCKS_PER_SECOND: f64 = 4.317;
pub const TICKS_PER_BLOCK: f64 = TICKS_PER_SECOND / BLOCKS_PER_SECOND;
/// Jumping onto a block one higher takes about 9 ticks.
pub const JUMP_UP_BLOCK: f64 = 9.0 / TICKS_PER_BLOCK;
/// Jump, place a block below, land on it.
pub const TOWER_COST: f64 = JUMP_UP_BLOCK + PLACE_BLOCK;
/// Jumping and landing at the same height takes about 12 ticks.
pub const JUMP_LAND_GROUND: f64 = 12.0 / TICKS_PER_BLOCK;
/// Clearing a one-block gap is a full jump plus two blocks of travel.
pub const ONE_GAP_JUMP: f64 = JUMP_LAND_GROUND + STRAIGHT + STRAIGHT;
pub const FALL_1: f64 = 5.63 / TICKS_PER_BLOCK;
pub const FALL_2: f64 = 7.79 / TICKS_PER_BLOCK;
pub const FALL_3: f64 = 9.48 / TICKS_PER_BLOCK;
/// Sliding along a corner is about as long as two straight steps.
pub const CORNER_SLIDE: f64 = 2.0 - DIAGONAL;

/// Cost of falling `blocks` blocks after stepping off an edge.
pub fn fall_cost(blocks: u8) -> Option<f64> {
    match blocks {
        1 => Some(FALL_1),
        2 => Some(FALL_2),
        3 => Some(FALL_3),
        _ => None,
    }
}

/// Mining time for one block with one (optional) item in hand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickResult {
    pub ticks: u32,
    /// The item in hand satisfies the block's harvest requirement.
    pub correct_tool: bool,
}

/// Ticks needed to break `block` holding `held`, or `None` for blocks that
/// cannot be mined at all.
pub fn required_mining_ticks(held: Option<&ItemStack>, block: &BlockState) -> Option<TickResult> {
    if !block.is_diggable() {
        return None;
    }
    let props = block.properties();
    let tool = held.and_then(|stack| stack.item.as_tool());

    let mut speed = match tool {
        Some(tool) if Some(tool.kind) == props.preferred_tool => tool.tier.speed(),
        _ => 1.0,
    };
    if speed > 1.0 {
        let efficiency = held.map_or(0, |stack| stack.efficiency);
        if efficiency > 0 {
            let level = f32::from(efficiency);
            speed += level * level + 1.0;
        }
    }

    let correct_tool = match props.required_tier {
        None => true,
        Some(required) => tool.is_some_and(|t| t.can_harvest(props.preferred_tool, required)),
    };

    if props.destroy_time <= 0.0 {
        return Some(TickResult {
            ticks: 0,
            correct_tool,
        });
    }

    let damage = speed / props.destroy_time / if correct_tool { 30.0 } else { 100.0 };
    let ticks = if damage > 1.0 {
        0
    } else {
        (1.0 / damage).ceil() as u32
    };
    Some(TickResult {
        ticks,
        correct_tool,
    })
}

/// Resolved cost of breaking one block with the best available tool.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MiningCost {
    /// Planner cost units, including `BREAK_BLOCK_ADDITION`.
    pub cost: f64,
    pub ticks: u32,
    /// Inventory slot of the tool to hold; `None` for bare hand.
    pub tool_slot: Option<usize>,
    /// The block drops an item the projected inventory should gain.
    pub will_drop: bool,
}

impl MiningCost {
    pub fn from_ticks(ticks: u32, tool_slot: Option<usize>, will_drop: bool) -> Self {
        Self {
            cost: f64::from(ticks) / TICKS_PER_BLOCK + BREAK_BLOCK_ADDITION,
            ticks,
            tool_slot,
            will_drop,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockType;
    use crate::item::{ToolKind, ToolTier};
    use crate::registry::BlockRegistry;
    use proptest::prelude::*;

    #[test]
    fn derived_constants() {
        assert!((TICKS_PER_BLOCK - 4.632847).abs() < 1e-5);
        assert!((CORNER_SLIDE - 0.585786).abs() < 1e-5);
        assert!(DIAGONAL < 2.0 * STRAIGHT);
        assert!(ONE_GAP_JUMP > 2.0 * STRAIGHT);
        assert!(FALL_1 < FALL_2 && FALL_2 < FALL_3);
        assert_eq!(fall_cost(4), None);
    }

    #[test]
    fn stone_by_hand_is_slow_and_drops_nothing() {
        let registry = BlockRegistry::vanilla();
        let stone = registry.state(BlockType::Stone);
        let result = required_mining_ticks(None, &stone).unwrap();
        // 1 / 1.5 / 100 damage per tick.
        assert_eq!(result.ticks, 150);
        assert!(!result.correct_tool);
    }

    #[test]
    fn diamond_pickaxe_on_stone() {
        let registry = BlockRegistry::vanilla();
        let stone = registry.state(BlockType::Stone);
        let pick = ItemStack::tool(ToolKind::Pickaxe, ToolTier::Diamond);
        let result = required_mining_ticks(Some(&pick), &stone).unwrap();
        // 8 / 1.5 / 30 = 0.1778 -> ceil(5.625)
        assert_eq!(result.ticks, 6);
        assert!(result.correct_tool);
    }

    #[test]
    fn efficiency_speeds_up_matching_tools_only() {
        let registry = BlockRegistry::vanilla();
        let stone = registry.state(BlockType::Stone);
        let plain = ItemStack::tool(ToolKind::Pickaxe, ToolTier::Iron);
        let enchanted = plain.with_efficiency(3);
        let slow = required_mining_ticks(Some(&plain), &stone).unwrap().ticks;
        let fast = required_mining_ticks(Some(&enchanted), &stone).unwrap().ticks;
        assert!(fast < slow);

        let shovel = ItemStack::tool(ToolKind::Shovel, ToolTier::Iron).with_efficiency(5);
        let by_shovel = required_mining_ticks(Some(&shovel), &stone).unwrap();
        assert_eq!(by_shovel.ticks, 150);
    }

    #[test]
    fn soft_blocks_can_be_instant() {
        let registry = BlockRegistry::vanilla();
        let grass = registry.state(BlockType::ShortGrass);
        assert_eq!(required_mining_ticks(None, &grass).unwrap().ticks, 0);

        let dirt = registry.state(BlockType::Dirt);
        let shovel = ItemStack::tool(ToolKind::Shovel, ToolTier::Gold).with_efficiency(5);
        // (12 + 26) / 0.5 / 30 > 1
        assert_eq!(required_mining_ticks(Some(&shovel), &dirt).unwrap().ticks, 0);
    }

    #[test]
    fn unbreakable_blocks_have_no_ticks() {
        let registry = BlockRegistry::vanilla();
        assert!(required_mining_ticks(None, &registry.state(BlockType::Bedrock)).is_none());
        assert!(required_mining_ticks(None, &registry.state(BlockType::Water)).is_none());
    }

    fn any_tool() -> impl Strategy<Value = ItemStack> {
        let kind = prop_oneof![
            Just(ToolKind::Pickaxe),
            Just(ToolKind::Shovel),
            Just(ToolKind::Axe)
        ];
        let tier = prop_oneof![
            Just(ToolTier::Wood),
            Just(ToolTier::Gold),
            Just(ToolTier::Stone),
            Just(ToolTier::Iron),
            Just(ToolTier::Diamond),
            Just(ToolTier::Netherite)
        ];
        (kind, tier, 0u8..=5).prop_map(|(kind, tier, efficiency)| {
            ItemStack::tool(kind, tier).with_efficiency(efficiency)
        })
    }

    proptest! {
        #[test]
        fn tools_never_mine_slower_than_bare_hand(
            tool in any_tool(),
            index in 0..BlockType::ALL.len(),
        ) {
            let registry = BlockRegistry::vanilla();
            let block = registry.state(BlockType::ALL[index]);
            let hand = required_mining_ticks(None, &block);
            let held = required_mining_ticks(Some(&tool), &block);
            prop_assert_eq!(hand.is_some(), held.is_some());
            if let (Some(hand), Some(held)) = (hand, held) {
                prop_assert!(held.ticks <= hand.ticks);
                prop_assert!(held.correct_tool || !hand.correct_tool);
            }
        }
    }

    #[test]
    fn mining_cost_includes_surcharge() {
        let cost = MiningCost::from_ticks(0, None, false);
        assert_eq!(cost.cost, BREAK_BLOCK_ADDITION);
    }
}
