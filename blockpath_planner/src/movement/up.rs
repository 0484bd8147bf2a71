// Tower up: jump and place a block into the cell just vacated.
//
// Needs room to jump (the cell above the head), mining it first when it is
// obstructed and safe to break, and one placeable block item. A block mined
// from the ceiling counts toward that item when it drops something
// placeable, so a pickaxe alone can tower through a stone ceiling.

use super::{BlockReader, EdgeBuilder, EdgeResolution, plan_break};
use crate::action::WorldAction;
use crate::config::PlannerConfig;
use crate::costs;
use crate::error::OutOfLevel;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UpMovement;

impl UpMovement {
    pub(super) fn resolve(
        &self,
        blocks: &mut BlockReader<'_>,
        config: &PlannerConfig,
    ) -> Result<Option<EdgeResolution>, OutOfLevel> {
        let node = blocks.node();
        let feet = node.position;
        let mut builder = EdgeBuilder::new(node, costs::JUMP_UP_BLOCK);

        let ceiling = feet.up(2);
        let ceiling_state = blocks.get(ceiling)?;
        if !ceiling_state.is_free() {
            match plan_break(blocks, config, ceiling, ceiling_state, &[])? {
                Some(planned) => builder.break_block(&planned),
                None => return Ok(None),
            }
        }

        if !builder.place_block(feet, WorldAction::JumpAndPlaceBelow { pos: feet }) {
            return Ok(None);
        }
        Ok(Some(builder.finish(feet.up(1))))
    }
}
