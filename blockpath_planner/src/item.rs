// Items, tools, and the caller-supplied inventory snapshot.
//
// The planner only needs to know two things about an inventory: which tools
// it holds (for mining time) and how many blocks it could place. Items are
// therefore modelled coarsely: a tool is a `ToolKind` x `ToolTier` pair, a
// block item names the `BlockType` it places, and a handful of loot items
// exist so that breaking ores yields something that is *not* placeable.
//
// Whether a block item can be used as scaffolding is decided by the
// `BlockRegistry`, not here (see `BlockRegistry::is_placeable_item`).
//
// See also: `inventory.rs` for the projected overlay the search forks per
// edge, `costs.rs` for the mining-speed formula that consumes tool tiers.

use crate::block::BlockType;
use serde::{Deserialize, Serialize};

/// Tool category. A tool only speeds up blocks whose preferred tool matches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ToolKind {
    Pickaxe,
    Shovel,
    Axe,
}

/// Tool material. Ordered by harvest level, with gold sharing wood's level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ToolTier {
    Wood,
    Gold,
    Stone,
    Iron,
    Diamond,
    Netherite,
}

impl ToolTier {
    /// Harvest level used to decide whether a block drops anything.
    pub fn level(self) -> u8 {
        match self {
            ToolTier::Wood | ToolTier::Gold => 0,
            ToolTier::Stone => 1,
            ToolTier::Iron => 2,
            ToolTier::Diamond => 3,
            ToolTier::Netherite => 4,
        }
    }

    /// Mining speed multiplier applied when the tool kind matches the block.
    pub fn speed(self) -> f32 {
        match self {
            ToolTier::Wood => 2.0,
            ToolTier::Stone => 4.0,
            ToolTier::Iron => 6.0,
            ToolTier::Diamond => 8.0,
            ToolTier::Netherite => 9.0,
            ToolTier::Gold => 12.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Tool {
    pub kind: ToolKind,
    pub tier: ToolTier,
}

impl Tool {
    pub const fn new(kind: ToolKind, tier: ToolTier) -> Self {
        Self { kind, tier }
    }

    /// Meets the harvest requirement of a block that prefers `kind` and
    /// needs at least `required` to drop.
    pub fn can_harvest(self, kind: Option<ToolKind>, required: ToolTier) -> bool {
        kind == Some(self.kind) && self.tier.level() >= required.level()
    }
}

/// Anything that can occupy an inventory slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ItemType {
    Tool(Tool),
    /// A block item; placing it puts the named block into the world.
    Block(BlockType),
    Diamond,
    RawIron,
    Stick,
}

impl ItemType {
    pub fn as_tool(self) -> Option<Tool> {
        match self {
            ItemType::Tool(tool) => Some(tool),
            _ => None,
        }
    }

    pub fn as_block(self) -> Option<BlockType> {
        match self {
            ItemType::Block(block) => Some(block),
            _ => None,
        }
    }
}

/// One occupied inventory slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    pub item: ItemType,
    pub count: u32,
    /// Efficiency enchantment level. Only meaningful on tools.
    #[serde(default)]
    pub efficiency: u8,
}

impl ItemStack {
    pub fn new(item: ItemType, count: u32) -> Self {
        Self {
            item,
            count,
            efficiency: 0,
        }
    }

    pub fn tool(kind: ToolKind, tier: ToolTier) -> Self {
        Self::new(ItemType::Tool(Tool::new(kind, tier)), 1)
    }

    pub fn blocks(block: BlockType, count: u32) -> Self {
        Self::new(ItemType::Block(block), count)
    }

    pub fn with_efficiency(mut self, level: u8) -> Self {
        self.efficiency = level;
        self
    }
}

/// A point-in-time copy of the agent's inventory.
///
/// Slot order matters: when two tools mine a block equally fast, the one in
/// the lower slot wins.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySnapshot {
    slots: Vec<Option<ItemStack>>,
}

impl InventorySnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_slots(slots: Vec<Option<ItemStack>>) -> Self {
        Self { slots }
    }

    /// Appends a stack to the next slot.
    pub fn with_stack(mut self, stack: ItemStack) -> Self {
        self.slots.push(Some(stack));
        self
    }

    pub fn slots(&self) -> &[Option<ItemStack>] {
        &self.slots
    }

    /// Occupied slots with their indices, in slot order.
    pub fn stacks(&self) -> impl Iterator<Item = (usize, &ItemStack)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(slot, stack)| stack.as_ref().map(|s| (slot, s)))
            .filter(|(_, s)| s.count > 0)
    }

    pub fn count(&self, item: ItemType) -> u32 {
        self.stacks()
            .filter(|(_, s)| s.item == item)
            .map(|(_, s)| s.count)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_levels_are_monotonic_except_gold() {
        assert_eq!(ToolTier::Gold.level(), ToolTier::Wood.level());
        assert!(ToolTier::Stone.level() < ToolTier::Iron.level());
        assert!(ToolTier::Diamond.level() < ToolTier::Netherite.level());
        assert!(ToolTier::Gold.speed() > ToolTier::Netherite.speed());
    }

    #[test]
    fn harvest_requires_matching_kind_and_level() {
        let iron_pick = Tool::new(ToolKind::Pickaxe, ToolTier::Iron);
        assert!(iron_pick.can_harvest(Some(ToolKind::Pickaxe), ToolTier::Stone));
        assert!(!iron_pick.can_harvest(Some(ToolKind::Pickaxe), ToolTier::Diamond));
        assert!(!iron_pick.can_harvest(Some(ToolKind::Shovel), ToolTier::Wood));
    }

    #[test]
    fn snapshot_counts_across_slots() {
        let inv = InventorySnapshot::new()
            .with_stack(ItemStack::blocks(BlockType::Cobblestone, 10))
            .with_stack(ItemStack::tool(ToolKind::Pickaxe, ToolTier::Stone))
            .with_stack(ItemStack::blocks(BlockType::Cobblestone, 5));
        assert_eq!(inv.count(ItemType::Block(BlockType::Cobblestone)), 15);
        assert_eq!(inv.count(ItemType::Block(BlockType::Dirt)), 0);
    }

    #[test]
    fn empty_slots_are_skipped() {
        let inv = InventorySnapshot::from_slots(vec![
            None,
            Some(ItemStack::blocks(BlockType::Dirt, 0)),
            Some(ItemStack::blocks(BlockType::Dirt, 3)),
        ]);
        let occupied: Vec<_> = inv.stacks().map(|(slot, _)| slot).collect();
        assert_eq!(occupied, vec![2]);
    }

    #[test]
    fn snapshot_deserializes_without_efficiency() {
        let json = r#"{"slots":[{"item":{"Block":"Dirt"},"count":4},null]}"#;
        let inv: InventorySnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(inv.count(ItemType::Block(BlockType::Dirt)), 4);
        assert_eq!(inv.slots().len(), 2);
    }
}
