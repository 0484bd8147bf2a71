// Block property table shared by every search.
//
// `BlockRegistry` maps each `BlockType` to its `BlockProperties`. The
// built-in table (`vanilla_properties`) is a `match` so it is total: every
// block type always resolves. Callers may layer per-type overrides on top,
// either programmatically (`with_override`) or from JSON, for servers whose
// blocks behave differently.
//
// The registry is constructed once, wrapped in an `Arc`, and threaded
// through the graph and the inventory projection. Nothing in the planner
// reads block data from process-wide state.

use crate::block::{BlockProperties, BlockState, BlockType, CollisionShape};
use crate::error::{PlanError, Result};
use crate::item::{ItemType, ToolKind, ToolTier};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockRegistry {
    /// Entries that replace the built-in properties for a block type.
    #[serde(default)]
    overrides: BTreeMap<BlockType, BlockProperties>,
}

impl BlockRegistry {
    /// The built-in table with no overrides.
    pub fn vanilla() -> Self {
        Self::default()
    }

    /// Parse a registry (overrides only) from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(PlanError::ConfigParse)
    }

    pub fn with_override(mut self, block: BlockType, properties: BlockProperties) -> Self {
        self.overrides.insert(block, properties);
        self
    }

    pub fn properties(&self, block: BlockType) -> BlockProperties {
        self.overrides
            .get(&block)
            .copied()
            .unwrap_or_else(|| vanilla_properties(block))
    }

    pub fn state(&self, block: BlockType) -> BlockState {
        BlockState::new(block, self.properties(block))
    }

    /// A block item the planner may use for bridging and towering: a full,
    /// solid, non-falling, harmless cube.
    pub fn is_placeable_item(&self, item: ItemType) -> bool {
        let Some(block) = item.as_block() else {
            return false;
        };
        let props = self.properties(block);
        props.shape == CollisionShape::Full
            && props.top_face_full
            && !props.falling
            && !props.fluid_source
            && !props.hurt_when_stood_on
            && !props.hurt_on_touch_side
    }
}

// ---------------------------------------------------------------------------
// Built-in table
// ---------------------------------------------------------------------------

const fn empty(replaceable: bool) -> BlockProperties {
    BlockProperties {
        shape: CollisionShape::Empty,
        top_face_full: false,
        fluid_source: false,
        falling: false,
        hurt_when_stood_on: false,
        hurt_on_touch_side: false,
        replaceable,
        diggable: false,
        stairs: false,
        destroy_time: 0.0,
        preferred_tool: None,
        required_tier: None,
        drop: None,
    }
}

const fn solid(
    destroy_time: f32,
    preferred_tool: Option<ToolKind>,
    required_tier: Option<ToolTier>,
    drop: Option<ItemType>,
) -> BlockProperties {
    BlockProperties {
        shape: CollisionShape::Full,
        top_face_full: true,
        fluid_source: false,
        falling: false,
        hurt_when_stood_on: false,
        hurt_on_touch_side: false,
        replaceable: false,
        diggable: true,
        stairs: false,
        destroy_time,
        preferred_tool,
        required_tier,
        drop,
    }
}

const fn fluid(hurts: bool) -> BlockProperties {
    BlockProperties {
        fluid_source: true,
        hurt_on_touch_side: hurts,
        destroy_time: 100.0,
        ..empty(true)
    }
}

const fn unbreakable() -> BlockProperties {
    BlockProperties {
        diggable: false,
        destroy_time: -1.0,
        ..solid(0.0, None, None, None)
    }
}

const PICKAXE: Option<ToolKind> = Some(ToolKind::Pickaxe);
const SHOVEL: Option<ToolKind> = Some(ToolKind::Shovel);
const AXE: Option<ToolKind> = Some(ToolKind::Axe);

const fn block_item(block: BlockType) -> Option<ItemType> {
    Some(ItemType::Block(block))
}

/// Built-in properties for a block type.
pub fn vanilla_properties(block: BlockType) -> BlockProperties {
    use BlockType::*;
    match block {
        Air | CaveAir => empty(true),
        VoidAir => empty(false),
        Stone => solid(1.5, PICKAXE, Some(ToolTier::Wood), block_item(Cobblestone)),
        Cobblestone => solid(2.0, PICKAXE, Some(ToolTier::Wood), block_item(Cobblestone)),
        Dirt => solid(0.5, SHOVEL, None, block_item(Dirt)),
        GrassBlock => solid(0.6, SHOVEL, None, block_item(Dirt)),
        ShortGrass => BlockProperties {
            diggable: true,
            ..empty(true)
        },
        Sand => BlockProperties {
            falling: true,
            ..solid(0.5, SHOVEL, None, block_item(Sand))
        },
        Gravel => BlockProperties {
            falling: true,
            ..solid(0.6, SHOVEL, None, block_item(Gravel))
        },
        OakLog => solid(2.0, AXE, None, block_item(OakLog)),
        OakPlanks => solid(2.0, AXE, None, block_item(OakPlanks)),
        OakSlab => BlockProperties {
            shape: CollisionShape::Partial,
            top_face_full: false,
            ..solid(2.0, AXE, None, None)
        },
        OakStairs => BlockProperties {
            shape: CollisionShape::Partial,
            top_face_full: false,
            stairs: true,
            ..solid(2.0, AXE, None, None)
        },
        OakFence => BlockProperties {
            shape: CollisionShape::Partial,
            top_face_full: false,
            ..solid(2.0, AXE, None, None)
        },
        Glass => solid(0.3, None, None, None),
        Obsidian => solid(50.0, PICKAXE, Some(ToolTier::Diamond), block_item(Obsidian)),
        IronOre => solid(3.0, PICKAXE, Some(ToolTier::Stone), Some(ItemType::RawIron)),
        DiamondOre => solid(3.0, PICKAXE, Some(ToolTier::Iron), Some(ItemType::Diamond)),
        Bedrock | Barrier => unbreakable(),
        Water => fluid(false),
        Lava => fluid(true),
        MagmaBlock => BlockProperties {
            hurt_when_stood_on: true,
            ..solid(0.5, PICKAXE, Some(ToolTier::Wood), None)
        },
        Cactus => BlockProperties {
            shape: CollisionShape::Partial,
            top_face_full: false,
            hurt_when_stood_on: true,
            hurt_on_touch_side: true,
            ..solid(0.4, None, None, None)
        },
        SweetBerryBush => BlockProperties {
            hurt_on_touch_side: true,
            diggable: true,
            ..empty(false)
        },
        Campfire => BlockProperties {
            shape: CollisionShape::Partial,
            top_face_full: false,
            hurt_when_stood_on: true,
            ..solid(2.0, AXE, None, None)
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_block_type_resolves() {
        let registry = BlockRegistry::vanilla();
        for block in BlockType::ALL {
            assert_eq!(registry.state(block).block_type(), block);
        }
    }

    #[test]
    fn override_replaces_builtin_entry() {
        let registry = BlockRegistry::vanilla().with_override(
            BlockType::Glass,
            BlockProperties {
                hurt_when_stood_on: true,
                ..vanilla_properties(BlockType::Glass)
            },
        );
        assert!(!registry.state(BlockType::Glass).is_safe_to_stand_on());
        assert!(registry.state(BlockType::Stone).is_safe_to_stand_on());
    }

    #[test]
    fn placeable_items_exclude_falling_and_loot() {
        let registry = BlockRegistry::vanilla();
        assert!(registry.is_placeable_item(ItemType::Block(BlockType::Cobblestone)));
        assert!(registry.is_placeable_item(ItemType::Block(BlockType::Dirt)));
        assert!(!registry.is_placeable_item(ItemType::Block(BlockType::Sand)));
        assert!(!registry.is_placeable_item(ItemType::Block(BlockType::MagmaBlock)));
        assert!(!registry.is_placeable_item(ItemType::Diamond));
        assert!(!registry.is_placeable_item(ItemType::Tool(crate::item::Tool::new(
            ToolKind::Pickaxe,
            ToolTier::Iron
        ))));
    }

    #[test]
    fn registry_loads_overrides_from_json() {
        let original = BlockRegistry::vanilla().with_override(
            BlockType::Dirt,
            BlockProperties {
                destroy_time: 5.0,
                ..vanilla_properties(BlockType::Dirt)
            },
        );
        let json = serde_json::to_string(&original).unwrap();
        let restored = BlockRegistry::from_json_str(&json).unwrap();
        assert_eq!(restored.properties(BlockType::Dirt).destroy_time, 5.0);
        assert_eq!(restored, original);
    }

    #[test]
    fn empty_json_is_vanilla() {
        let registry = BlockRegistry::from_json_str("{}").unwrap();
        assert_eq!(registry, BlockRegistry::vanilla());
    }
}
