// Straight and diagonal steps, optionally jumping up one block or falling
// up to three.
//
// For a step in direction `d` with height change `dy` from feet position
// `P`, the target is `T = P + d + dy`. The edge is feasible when:
// - every body cell along the way is free (or, for straight steps with
//   Normal/JumpUp/Fall1, can be mined safely),
// - for diagonals, neither side corner holds a full block or a block that
//   hurts on touch (partial blocks only cost a corner slide),
// - the floor under `T` is safe to stand on, or can be bridged by placing a
//   block against a full neighbour (same modifiers as mining).
//
// Mining happens top-down before the step; placement happens after mining
// so blocks picked up while tunnelling are already available.

use super::{
    BlockReader, EdgeBuilder, EdgeResolution, MovementDirection, MovementModifier, PlannedBreak,
    placement_supports, plan_break,
};
use crate::action::WorldAction;
use crate::block::BlockState;
use crate::config::PlannerConfig;
use crate::costs;
use crate::error::OutOfLevel;
use crate::types::Vec3i;
use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SimpleMovement {
    pub direction: MovementDirection,
    pub modifier: MovementModifier,
}

/// What a diagonal corner cell means for the step.
enum Corner {
    Clear,
    Slide,
    Blocked,
}

fn classify_corner(state: &BlockState) -> Corner {
    if state.is_free() {
        Corner::Clear
    } else if state.is_hurt_on_touch_side() || state.is_full_block() {
        Corner::Blocked
    } else {
        Corner::Slide
    }
}

impl SimpleMovement {
    pub fn new(direction: MovementDirection, modifier: MovementModifier) -> Self {
        Self {
            direction,
            modifier,
        }
    }

    pub fn is_diagonal(&self) -> bool {
        self.direction.is_diagonal()
    }

    /// Whether this template may mine obstructions and bridge gaps.
    pub fn allows_block_actions(&self) -> bool {
        !self.is_diagonal() && self.modifier.allows_block_actions()
    }

    /// Target feet position relative to the current feet position.
    pub fn target_offset(&self) -> Vec3i {
        self.direction.offset().up(self.modifier.dy())
    }

    fn base_cost(&self) -> f64 {
        let step = if self.is_diagonal() {
            costs::DIAGONAL
        } else {
            costs::STRAIGHT
        };
        step + self.modifier.extra_cost()
    }

    /// Cells that must be free for the body to pass, in mining order
    /// (top-down).
    fn required_free_cells(&self, feet: Vec3i) -> SmallVec<[Vec3i; 8]> {
        let mut cells = SmallVec::new();
        let lift = i32::from(self.modifier == MovementModifier::JumpUp);
        if lift == 1 {
            cells.push(feet.up(1));
            cells.push(feet.up(2));
        }
        let edge = feet + self.direction.offset();
        cells.push(edge.up(1 + lift));
        cells.push(edge.up(lift));
        for k in 1..=i32::from(self.modifier.fall_blocks()) {
            cells.push(edge.down(k));
        }
        cells
    }

    pub(super) fn resolve(
        &self,
        blocks: &mut BlockReader<'_>,
        config: &PlannerConfig,
    ) -> Result<Option<EdgeResolution>, OutOfLevel> {
        let node = blocks.node();
        let feet = node.position;
        let target = feet + self.target_offset();
        let lift = i32::from(self.modifier == MovementModifier::JumpUp);
        let mut builder = EdgeBuilder::new(node, self.base_cost());

        // Corners first: they are cheap and reject most blocked diagonals.
        if let (first, Some(second)) = self.direction.components() {
            let mut slide = false;
            for side in [first, second] {
                let corner = feet + side.offset();
                for cell in [corner.up(lift), corner.up(1 + lift)] {
                    match classify_corner(&blocks.get(cell)?) {
                        Corner::Clear => {}
                        Corner::Slide => slide = true,
                        Corner::Blocked => return Ok(None),
                    }
                }
            }
            if slide {
                builder.add_cost(costs::CORNER_SLIDE);
            }
        }

        let cells = self.required_free_cells(feet);
        let mut breaks: SmallVec<[PlannedBreak; 4]> = SmallVec::new();
        for (i, &cell) in cells.iter().enumerate() {
            let state = blocks.get(cell)?;
            if state.is_free() {
                continue;
            }
            if !self.allows_block_actions() {
                return Ok(None);
            }
            // Cells listed before this one sit above it in the same column.
            match plan_break(blocks, config, cell, state, &cells[..i])? {
                Some(planned) => breaks.push(planned),
                None => return Ok(None),
            }
        }
        for planned in &breaks {
            builder.break_block(planned);
        }

        let floor = target.down(1);
        let floor_state = blocks.get(floor)?;
        if !floor_state.is_safe_to_stand_on() {
            if !config.allow_place_blocks
                || !self.allows_block_actions()
                || !floor_state.can_be_replaced()
            {
                return Ok(None);
            }
            let Some(forward) = self.direction.as_cardinal() else {
                return Ok(None);
            };
            let mut support = None;
            for (against, face) in placement_supports(floor, forward, self.modifier) {
                if blocks.get(against)?.is_full_block() {
                    support = Some((against, face));
                    break;
                }
            }
            let Some((against, face)) = support else {
                return Ok(None);
            };
            let placed = builder.place_block(
                floor,
                WorldAction::Place {
                    pos: floor,
                    against,
                    face,
                },
            );
            if !placed {
                return Ok(None);
            }
        }

        builder.push(WorldAction::MoveTo {
            pos: target,
            diagonal: self.is_diagonal(),
        });
        Ok(Some(builder.finish(target)))
    }
}
