// Projected inventory: the real snapshot plus the items a plan has gained
// and spent.
//
// A plan that bridges a gap consumes a block item; a plan that mines through
// stone with a pickaxe picks up cobblestone it can place later. The search
// has to see those effects per node, so `ProjectedInventory` keeps the
// caller's `InventorySnapshot` behind an `Arc` and layers a small signed
// delta map on top. Forking clones the `Arc`s and, only when an item count
// actually changes, the delta map (a handful of entries at most).
//
// Tools are never consumed (durability is not modelled), so tool selection
// always scans the real snapshot.
//
// See also: `costs.rs` for the per-tool mining formula, `level.rs` for the
// matching world overlay.

use crate::block::BlockState;
use crate::costs::{self, MiningCost};
use crate::item::{InventorySnapshot, ItemStack, ItemType};
use crate::registry::BlockRegistry;
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct ProjectedInventory {
    snapshot: Arc<InventorySnapshot>,
    registry: Arc<BlockRegistry>,
    delta: Arc<BTreeMap<ItemType, i64>>,
}

impl ProjectedInventory {
    pub fn new(snapshot: Arc<InventorySnapshot>, registry: Arc<BlockRegistry>) -> Self {
        Self {
            snapshot,
            registry,
            delta: Arc::new(BTreeMap::new()),
        }
    }

    pub fn snapshot(&self) -> &InventorySnapshot {
        &self.snapshot
    }

    /// Projected count of `item`.
    pub fn count(&self, item: ItemType) -> u32 {
        let base = i64::from(self.snapshot.count(item));
        let delta = self.delta.get(&item).copied().unwrap_or(0);
        u32::try_from((base + delta).max(0)).unwrap_or(u32::MAX)
    }

    /// Placeable block items in preference order: snapshot slot order
    /// first, then items only gained during the plan.
    fn placeable_items(&self) -> Vec<ItemType> {
        let mut items: Vec<ItemType> = Vec::new();
        let candidates = self
            .snapshot
            .stacks()
            .map(|(_, stack)| stack.item)
            .chain(self.delta.keys().copied());
        for item in candidates {
            if self.registry.is_placeable_item(item) && !items.contains(&item) {
                items.push(item);
            }
        }
        items
    }

    /// Total projected number of blocks the agent could place.
    pub fn usable_block_count(&self) -> u32 {
        self.placeable_items()
            .into_iter()
            .map(|item| self.count(item))
            .sum()
    }

    pub fn has_placeable_block(&self) -> bool {
        self.next_placeable_block().is_some()
    }

    /// The block item the next placement would use.
    pub fn next_placeable_block(&self) -> Option<ItemType> {
        self.placeable_items()
            .into_iter()
            .find(|item| self.count(*item) > 0)
    }

    pub fn with_one_more_block(&self, item: ItemType) -> Self {
        self.with_delta(item, 1)
    }

    pub fn with_one_fewer_block(&self, item: ItemType) -> Self {
        self.with_delta(item, -1)
    }

    fn with_delta(&self, item: ItemType, amount: i64) -> Self {
        let mut delta = Arc::clone(&self.delta);
        let map = Arc::make_mut(&mut delta);
        let count = map.entry(item).or_insert(0);
        *count += amount;
        if *count == 0 {
            map.remove(&item);
        }
        Self {
            snapshot: Arc::clone(&self.snapshot),
            registry: Arc::clone(&self.registry),
            delta,
        }
    }

    /// Tool stacks with their slots, in slot order.
    pub fn usable_tools(&self) -> impl Iterator<Item = (usize, &ItemStack)> {
        self.snapshot
            .stacks()
            .filter(|(_, stack)| stack.item.as_tool().is_some())
    }

    /// The fastest way to mine `block`: bare hand unless some tool is
    /// strictly faster, lower slots winning ties. `None` if the block cannot
    /// be mined.
    pub fn best_tool_for(&self, block: &BlockState) -> Option<MiningCost> {
        let hand = costs::required_mining_ticks(None, block)?;
        let mut best = (hand, None);
        for (slot, stack) in self.usable_tools() {
            if let Some(result) = costs::required_mining_ticks(Some(stack), block)
                && result.ticks < best.0.ticks
            {
                best = (result, Some(slot));
            }
        }
        let (result, tool_slot) = best;
        let will_drop = result.correct_tool
            && block
                .properties()
                .drop
                .is_some_and(|item| self.registry.is_placeable_item(item));
        Some(MiningCost::from_ticks(result.ticks, tool_slot, will_drop))
    }

    /// The inventory after breaking `block` as described by `mining`.
    pub fn with_broken_block(&self, block: &BlockState, mining: &MiningCost) -> Self {
        match block.properties().drop {
            Some(item) if mining.will_drop => self.with_one_more_block(item),
            _ => self.clone(),
        }
    }
}

impl PartialEq for ProjectedInventory {
    fn eq(&self, other: &Self) -> bool {
        (Arc::ptr_eq(&self.snapshot, &other.snapshot) || self.snapshot == other.snapshot)
            && self.delta == other.delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockType;
    use crate::item::{ToolKind, ToolTier};

    fn inventory(snapshot: InventorySnapshot) -> ProjectedInventory {
        ProjectedInventory::new(Arc::new(snapshot), Arc::new(BlockRegistry::vanilla()))
    }

    const COBBLE: ItemType = ItemType::Block(BlockType::Cobblestone);

    #[test]
    fn counts_combine_snapshot_and_delta() {
        let inv = inventory(
            InventorySnapshot::new().with_stack(ItemStack::blocks(BlockType::Cobblestone, 2)),
        );
        let spent = inv.with_one_fewer_block(COBBLE);
        assert_eq!(spent.count(COBBLE), 1);
        assert_eq!(inv.count(COBBLE), 2);
        let gained = spent.with_one_more_block(COBBLE);
        assert_eq!(gained, inv);
    }

    #[test]
    fn sand_is_not_scaffolding() {
        let inv =
            inventory(InventorySnapshot::new().with_stack(ItemStack::blocks(BlockType::Sand, 64)));
        assert!(!inv.has_placeable_block());
        assert_eq!(inv.usable_block_count(), 0);
    }

    #[test]
    fn next_block_follows_slot_order_then_gains() {
        let inv = inventory(
            InventorySnapshot::new()
                .with_stack(ItemStack::blocks(BlockType::Dirt, 1))
                .with_stack(ItemStack::blocks(BlockType::OakPlanks, 1)),
        );
        let dirt = ItemType::Block(BlockType::Dirt);
        assert_eq!(inv.next_placeable_block(), Some(dirt));
        let inv = inv.with_one_fewer_block(dirt);
        assert_eq!(inv.next_placeable_block(), Some(ItemType::Block(BlockType::OakPlanks)));
        let inv = inv
            .with_one_fewer_block(ItemType::Block(BlockType::OakPlanks))
            .with_one_more_block(COBBLE);
        assert_eq!(inv.next_placeable_block(), Some(COBBLE));
        assert_eq!(inv.usable_block_count(), 1);
    }

    #[test]
    fn best_tool_prefers_strictly_faster_lower_slot() {
        let inv = inventory(
            InventorySnapshot::new()
                .with_stack(ItemStack::tool(ToolKind::Shovel, ToolTier::Diamond))
                .with_stack(ItemStack::tool(ToolKind::Pickaxe, ToolTier::Iron))
                .with_stack(ItemStack::tool(ToolKind::Pickaxe, ToolTier::Iron)),
        );
        let stone = BlockRegistry::vanilla().state(BlockType::Stone);
        let mining = inv.best_tool_for(&stone).unwrap();
        assert_eq!(mining.tool_slot, Some(1));
        assert_eq!(mining.ticks, 8);
        assert!(mining.will_drop);
    }

    #[test]
    fn bare_hand_when_no_tool_helps() {
        let inv = inventory(
            InventorySnapshot::new().with_stack(ItemStack::tool(ToolKind::Axe, ToolTier::Wood)),
        );
        let stone = BlockRegistry::vanilla().state(BlockType::Stone);
        let mining = inv.best_tool_for(&stone).unwrap();
        assert_eq!(mining.tool_slot, None);
        assert_eq!(mining.ticks, 150);
        assert!(!mining.will_drop);
    }

    #[test]
    fn breaking_with_correct_tool_gains_the_drop() {
        let inv = inventory(
            InventorySnapshot::new().with_stack(ItemStack::tool(ToolKind::Pickaxe, ToolTier::Wood)),
        );
        let stone = BlockRegistry::vanilla().state(BlockType::Stone);
        let mining = inv.best_tool_for(&stone).unwrap();
        let after = inv.with_broken_block(&stone, &mining);
        assert_eq!(after.count(COBBLE), 1);
        assert!(after.has_placeable_block());
    }

    #[test]
    fn ore_drops_are_not_counted_as_blocks() {
        let inv = inventory(
            InventorySnapshot::new()
                .with_stack(ItemStack::tool(ToolKind::Pickaxe, ToolTier::Diamond)),
        );
        let ore = BlockRegistry::vanilla().state(BlockType::DiamondOre);
        let mining = inv.best_tool_for(&ore).unwrap();
        assert!(!mining.will_drop);
        assert_eq!(inv.with_broken_block(&ore, &mining), inv);
    }

    #[test]
    fn unbreakable_block_has_no_cost() {
        let inv = inventory(InventorySnapshot::new());
        let bedrock = BlockRegistry::vanilla().state(BlockType::Bedrock);
        assert!(inv.best_tool_for(&bedrock).is_none());
    }
}
