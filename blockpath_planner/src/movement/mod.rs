// Movement templates: the edge generators of the search graph.
//
// A `GraphAction` is a stateless template keyed by a relative offset pattern
// (a compass direction plus a height modifier, a gap jump, towering up, or
// digging down). Evaluating one against a `NodeState` happens in two
// phases:
//
// 1. `impossible(config)`: a hard check that depends only on the template
//    and the path constraints (e.g. parkour disabled). Templates that fail
//    it are skipped without reading a single block.
// 2. `resolve(blocks, config)`: reads the node's projected world through a
//    `BlockReader` and either rejects the edge (`Ok(None)`) or returns an
//    immutable `EdgeResolution` carrying the cost, the next `NodeState`, and
//    the world actions to execute. Templates are never mutated, so the same
//    template table is shared by every expansion and every thread.
//
// Reading a position that has no data (unloaded terrain inside build height)
// aborts the whole expansion with `OutOfLevel`; the search driver turns that
// into a partial route.
//
// See also: `simple.rs`, `parkour.rs`, `up.rs`, `down.rs` for the four
// template kinds, `graph.rs` for the adjacency function that runs them all.

mod down;
mod parkour;
mod simple;
mod up;

pub use down::DownMovement;
pub use parkour::ParkourMovement;
pub use simple::SimpleMovement;
pub use up::UpMovement;

use crate::action::WorldAction;
use crate::block::BlockState;
use crate::config::PlannerConfig;
use crate::costs::{self, MiningCost};
use crate::error::OutOfLevel;
use crate::inventory::ProjectedInventory;
use crate::item::ItemType;
use crate::level::ProjectedLevel;
use crate::node::NodeState;
use crate::types::{BlockFace, Cardinal, Vec3i};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

// ---------------------------------------------------------------------------
// Directions and modifiers
// ---------------------------------------------------------------------------

/// The eight horizontal directions a simple movement can take.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementDirection {
    North,
    East,
    South,
    West,
    NorthEast,
    SouthEast,
    SouthWest,
    NorthWest,
}

impl MovementDirection {
    pub const ALL: [MovementDirection; 8] = [
        MovementDirection::North,
        MovementDirection::East,
        MovementDirection::South,
        MovementDirection::West,
        MovementDirection::NorthEast,
        MovementDirection::SouthEast,
        MovementDirection::SouthWest,
        MovementDirection::NorthWest,
    ];

    /// The cardinal components: one for straight directions, two for
    /// diagonals.
    pub fn components(self) -> (Cardinal, Option<Cardinal>) {
        use MovementDirection::*;
        match self {
            North => (Cardinal::North, None),
            East => (Cardinal::East, None),
            South => (Cardinal::South, None),
            West => (Cardinal::West, None),
            NorthEast => (Cardinal::North, Some(Cardinal::East)),
            SouthEast => (Cardinal::South, Some(Cardinal::East)),
            SouthWest => (Cardinal::South, Some(Cardinal::West)),
            NorthWest => (Cardinal::North, Some(Cardinal::West)),
        }
    }

    pub fn is_diagonal(self) -> bool {
        self.components().1.is_some()
    }

    /// The direction as a cardinal, for straight movements.
    pub fn as_cardinal(self) -> Option<Cardinal> {
        match self.components() {
            (cardinal, None) => Some(cardinal),
            _ => None,
        }
    }

    pub fn offset(self) -> Vec3i {
        match self.components() {
            (a, None) => a.offset(),
            (a, Some(b)) => a.offset() + b.offset(),
        }
    }
}

/// Height change applied on top of a horizontal step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementModifier {
    Normal,
    /// Step up onto a block one higher.
    JumpUp,
    Fall1,
    Fall2,
    Fall3,
}

impl MovementModifier {
    pub const ALL: [MovementModifier; 5] = [
        MovementModifier::Normal,
        MovementModifier::JumpUp,
        MovementModifier::Fall1,
        MovementModifier::Fall2,
        MovementModifier::Fall3,
    ];

    pub fn dy(self) -> i32 {
        match self {
            MovementModifier::Normal => 0,
            MovementModifier::JumpUp => 1,
            MovementModifier::Fall1 => -1,
            MovementModifier::Fall2 => -2,
            MovementModifier::Fall3 => -3,
        }
    }

    /// Number of blocks fallen after leaving the edge.
    pub fn fall_blocks(self) -> u8 {
        match self {
            MovementModifier::Fall1 => 1,
            MovementModifier::Fall2 => 2,
            MovementModifier::Fall3 => 3,
            MovementModifier::Normal | MovementModifier::JumpUp => 0,
        }
    }

    pub fn extra_cost(self) -> f64 {
        match self {
            MovementModifier::Normal => 0.0,
            MovementModifier::JumpUp => costs::JUMP_UP_BLOCK,
            _ => costs::fall_cost(self.fall_blocks()).unwrap_or(0.0),
        }
    }

    /// Whether a straight movement with this modifier may mine and place.
    pub fn allows_block_actions(self) -> bool {
        matches!(
            self,
            MovementModifier::Normal | MovementModifier::JumpUp | MovementModifier::Fall1
        )
    }
}

// ---------------------------------------------------------------------------
// Template union
// ---------------------------------------------------------------------------

/// Which kind of template produced an edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    Straight,
    Diagonal,
    Parkour,
    Up,
    Down,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GraphAction {
    Straight(SimpleMovement),
    Diagonal(SimpleMovement),
    Parkour(ParkourMovement),
    Up(UpMovement),
    Down(DownMovement),
}

impl GraphAction {
    /// Every template, in the fixed order the graph evaluates them.
    pub fn all() -> Vec<GraphAction> {
        let mut actions = Vec::with_capacity(46);
        for direction in MovementDirection::ALL {
            for modifier in MovementModifier::ALL {
                let movement = SimpleMovement::new(direction, modifier);
                actions.push(if direction.is_diagonal() {
                    GraphAction::Diagonal(movement)
                } else {
                    GraphAction::Straight(movement)
                });
            }
        }
        for direction in Cardinal::ALL {
            actions.push(GraphAction::Parkour(ParkourMovement::new(direction)));
        }
        actions.push(GraphAction::Down(DownMovement));
        actions.push(GraphAction::Up(UpMovement));
        actions
    }

    pub fn kind(&self) -> ActionKind {
        match self {
            GraphAction::Straight(_) => ActionKind::Straight,
            GraphAction::Diagonal(_) => ActionKind::Diagonal,
            GraphAction::Parkour(_) => ActionKind::Parkour,
            GraphAction::Up(_) => ActionKind::Up,
            GraphAction::Down(_) => ActionKind::Down,
        }
    }

    /// Rejected by the path constraints alone, before reading any block.
    pub fn impossible(&self, config: &PlannerConfig) -> bool {
        match self {
            GraphAction::Straight(_) | GraphAction::Diagonal(_) => false,
            GraphAction::Parkour(_) => !config.allow_parkour,
            GraphAction::Up(_) => !config.allow_place_blocks,
            GraphAction::Down(_) => !config.allow_break_blocks,
        }
    }

    /// Evaluate the template against the node behind `blocks`.
    pub fn resolve(
        &self,
        blocks: &mut BlockReader<'_>,
        config: &PlannerConfig,
    ) -> Result<Option<EdgeResolution>, OutOfLevel> {
        match self {
            GraphAction::Straight(m) | GraphAction::Diagonal(m) => m.resolve(blocks, config),
            GraphAction::Parkour(m) => m.resolve(blocks),
            GraphAction::Up(m) => m.resolve(blocks, config),
            GraphAction::Down(m) => m.resolve(blocks),
        }
    }
}

/// A feasible edge: where it leads, what it costs, what to execute.
#[derive(Clone, Debug)]
pub struct EdgeResolution {
    pub next: NodeState,
    pub cost: f64,
    pub actions: SmallVec<[WorldAction; 4]>,
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Cached block lookups for one node expansion.
pub struct BlockReader<'a> {
    node: &'a NodeState,
    cache: FxHashMap<Vec3i, BlockState>,
}

impl<'a> BlockReader<'a> {
    pub fn new(node: &'a NodeState) -> Self {
        Self {
            node,
            cache: FxHashMap::default(),
        }
    }

    pub fn node(&self) -> &'a NodeState {
        self.node
    }

    /// The projected block at `pos`, or `OutOfLevel` for unloaded terrain.
    pub fn get(&mut self, pos: Vec3i) -> Result<BlockState, OutOfLevel> {
        if let Some(state) = self.cache.get(&pos) {
            return Ok(*state);
        }
        let level = &self.node.level;
        let state = level.block_state(pos);
        if state.is_void() && !level.is_outside_build_height(pos.y) {
            return Err(OutOfLevel { pos });
        }
        self.cache.insert(pos, state);
        Ok(state)
    }
}

/// A block that must be mined for an edge, with its resolved cost.
#[derive(Clone, Copy, Debug)]
struct PlannedBreak {
    pos: Vec3i,
    state: BlockState,
    mining: MiningCost,
}

/// Mining `state` at `pos` is allowed and will not flood the tunnel or drop
/// a block on the agent. `protected` cells above are being mined in the same
/// edge and may therefore hold anything.
fn plan_break(
    blocks: &mut BlockReader<'_>,
    config: &PlannerConfig,
    pos: Vec3i,
    state: BlockState,
    protected: &[Vec3i],
) -> Result<Option<PlannedBreak>, OutOfLevel> {
    if !config.allow_break_blocks || !state.is_diggable() {
        return Ok(None);
    }
    let Some(mining) = blocks.node().inventory.best_tool_for(&state) else {
        return Ok(None);
    };
    for side in Cardinal::ALL {
        if blocks.get(pos + side.offset())?.is_fluid_source() {
            return Ok(None);
        }
    }
    let above = pos.up(1);
    if !protected.contains(&above) {
        let state = blocks.get(above)?;
        if state.is_falling() || state.is_fluid_source() {
            return Ok(None);
        }
    }
    Ok(Some(PlannedBreak { pos, state, mining }))
}

/// Accumulates the effects of one edge onto the parent's projections.
struct EdgeBuilder {
    level: ProjectedLevel,
    inventory: ProjectedInventory,
    cost: f64,
    actions: SmallVec<[WorldAction; 4]>,
}

impl EdgeBuilder {
    fn new(node: &NodeState, base_cost: f64) -> Self {
        Self {
            level: node.level.clone(),
            inventory: node.inventory.clone(),
            cost: base_cost,
            actions: SmallVec::new(),
        }
    }

    fn add_cost(&mut self, cost: f64) {
        self.cost += cost;
    }

    fn break_block(&mut self, planned: &PlannedBreak) {
        self.cost += planned.mining.cost;
        self.actions.push(WorldAction::Break {
            pos: planned.pos,
            mining_ticks: planned.mining.ticks,
            tool_slot: planned.mining.tool_slot,
        });
        self.level = self.level.with_change_to_air(planned.pos);
        self.inventory = self.inventory.with_broken_block(&planned.state, &planned.mining);
    }

    /// Spend one block item on `pos`. Returns `false` if nothing is left to
    /// place.
    fn place_block(&mut self, pos: Vec3i, action: WorldAction) -> bool {
        let Some(item) = self.inventory.next_placeable_block() else {
            return false;
        };
        let ItemType::Block(block) = item else {
            return false;
        };
        self.cost += costs::PLACE_BLOCK;
        self.actions.push(action);
        self.level = self.level.with_placed_block(pos, block);
        self.inventory = self.inventory.with_one_fewer_block(item);
        true
    }

    fn push(&mut self, action: WorldAction) {
        self.actions.push(action);
    }

    fn finish(self, target: Vec3i) -> EdgeResolution {
        EdgeResolution {
            next: NodeState::new(target, self.level, self.inventory),
            cost: self.cost,
            actions: self.actions,
        }
    }
}

/// Candidate supports for placing a block at `floor`, in preference order.
fn placement_supports(
    floor: Vec3i,
    forward: Cardinal,
    modifier: MovementModifier,
) -> SmallVec<[(Vec3i, BlockFace); 5]> {
    let mut out = SmallVec::new();
    out.push((floor.down(1), BlockFace::Top));
    out.push((floor + forward.offset(), forward.facing_face()));
    if modifier == MovementModifier::Normal {
        let back = forward.opposite();
        out.push((floor + back.offset(), back.facing_face()));
    }
    for side in [forward.left(), forward.right()] {
        out.push((floor + side.offset(), side.facing_face()));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_table_is_complete() {
        let all = GraphAction::all();
        assert_eq!(all.len(), 46);
        let count = |kind| all.iter().filter(|a| a.kind() == kind).count();
        assert_eq!(count(ActionKind::Straight), 20);
        assert_eq!(count(ActionKind::Diagonal), 20);
        assert_eq!(count(ActionKind::Parkour), 4);
        assert_eq!(count(ActionKind::Up), 1);
        assert_eq!(count(ActionKind::Down), 1);
    }

    #[test]
    fn direction_offsets() {
        assert_eq!(MovementDirection::NorthEast.offset(), Vec3i::new(1, 0, -1));
        assert_eq!(MovementDirection::SouthWest.offset(), Vec3i::new(-1, 0, 1));
        assert_eq!(MovementDirection::West.as_cardinal(), Some(Cardinal::West));
        assert_eq!(MovementDirection::NorthWest.as_cardinal(), None);
        for direction in MovementDirection::ALL {
            let o = direction.offset();
            assert_eq!(o.y, 0);
            assert_eq!(direction.is_diagonal(), o.x != 0 && o.z != 0);
        }
    }

    #[test]
    fn modifiers_that_allow_block_actions() {
        let allowed: Vec<_> = MovementModifier::ALL
            .into_iter()
            .filter(|m| m.allows_block_actions())
            .collect();
        assert_eq!(
            allowed,
            vec![
                MovementModifier::Normal,
                MovementModifier::JumpUp,
                MovementModifier::Fall1
            ]
        );
        assert_eq!(MovementModifier::Fall3.extra_cost(), costs::FALL_3);
    }

    #[test]
    fn hard_checks_follow_constraints() {
        let strict = PlannerConfig {
            allow_break_blocks: false,
            allow_place_blocks: false,
            allow_parkour: false,
            ..PlannerConfig::default()
        };
        let impossible: Vec<_> = GraphAction::all()
            .into_iter()
            .filter(|a| a.impossible(&strict))
            .map(|a| a.kind())
            .collect();
        assert_eq!(impossible.len(), 6);
        assert!(!impossible.contains(&ActionKind::Straight));
    }

    #[test]
    fn bridging_supports_include_behind_only_when_level() {
        let floor = Vec3i::new(1, 0, 0);
        let normal = placement_supports(floor, Cardinal::East, MovementModifier::Normal);
        assert_eq!(normal.len(), 5);
        assert_eq!(normal[0], (Vec3i::new(1, -1, 0), BlockFace::Top));
        assert_eq!(normal[2], (Vec3i::new(0, 0, 0), BlockFace::East));
        let jump = placement_supports(floor, Cardinal::East, MovementModifier::JumpUp);
        assert_eq!(jump.len(), 4);
    }
}
