// Executable world actions: the planner's output.
//
// A route is an ordered list of `WorldAction`s. The execution layer drives
// the live agent through them one at a time and uses `allowed_ticks` as the
// per-action timeout: an action that has not completed within its budget is
// considered stuck and the caller re-plans.
//
// See also: `movement/` for the templates that emit these, `pathfinding.rs`
// which concatenates them into a `Route`.

use crate::types::{BlockFace, Vec3i};
use serde::{Deserialize, Serialize};

/// Budget for walking to an adjacent block (5 seconds).
pub const MOVE_ALLOWED_TICKS: u32 = 100;
/// Budget for placing a block (3 seconds).
pub const PLACE_ALLOWED_TICKS: u32 = 60;
/// Upper bound on any break budget (20 seconds).
pub const BREAK_MAX_ALLOWED_TICKS: u32 = 400;
const BREAK_MIN_ALLOWED_TICKS: u32 = 40;
const BREAK_SLACK_TICKS: u32 = 20;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum WorldAction {
    /// Walk (or jump/fall) until standing centred on `pos`.
    MoveTo { pos: Vec3i, diagonal: bool },
    /// Sprint-jump over a one-block gap, landing on `pos`.
    GapJump { pos: Vec3i },
    /// Mine the block at `pos`, holding the tool in `tool_slot` (bare hand
    /// when `None`).
    Break {
        pos: Vec3i,
        mining_ticks: u32,
        tool_slot: Option<usize>,
    },
    /// Place a block at `pos` by clicking `face` of the block at `against`.
    Place {
        pos: Vec3i,
        against: Vec3i,
        face: BlockFace,
    },
    /// Jump and place a block at `pos` (the cell just vacated below).
    JumpAndPlaceBelow { pos: Vec3i },
    /// The route ends at the edge of loaded terrain; plan again from here.
    Recalculate,
}

impl WorldAction {
    /// Ticks the execution layer should allow before declaring the action
    /// stuck.
    pub fn allowed_ticks(&self) -> u32 {
        match self {
            WorldAction::MoveTo { .. } | WorldAction::GapJump { .. } => MOVE_ALLOWED_TICKS,
            WorldAction::Place { .. } | WorldAction::JumpAndPlaceBelow { .. } => {
                PLACE_ALLOWED_TICKS
            }
            WorldAction::Break { mining_ticks, .. } => mining_ticks
                .saturating_mul(2)
                .saturating_add(BREAK_SLACK_TICKS)
                .clamp(BREAK_MIN_ALLOWED_TICKS, BREAK_MAX_ALLOWED_TICKS),
            WorldAction::Recalculate => 0,
        }
    }

    /// The block position the action works on.
    pub fn target(&self) -> Option<Vec3i> {
        match self {
            WorldAction::MoveTo { pos, .. }
            | WorldAction::GapJump { pos }
            | WorldAction::Break { pos, .. }
            | WorldAction::Place { pos, .. }
            | WorldAction::JumpAndPlaceBelow { pos } => Some(*pos),
            WorldAction::Recalculate => None,
        }
    }
}
