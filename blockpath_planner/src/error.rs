// Error types for the planner.
//
// Only malformed input is an error. Everything a search can legitimately end
// with (no route, budget exhausted, cancelled, partial route at the edge of
// loaded terrain) is a `RouteOutcome` value in `pathfinding.rs`, and an
// infeasible edge is simply left out of the adjacency list.
//
// `OutOfLevel` is an internal signal raised by the graph when an expansion
// reads unloaded terrain inside build height. The search driver turns it
// into a partial route; it never escapes the crate as an error.

use crate::types::Vec3i;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("start position {0} is outside build height")]
    StartOutsideWorld(Vec3i),

    #[error("start position {0} is inside a solid block")]
    StartInsideSolid(Vec3i),

    #[error("terrain at start position {0} is not loaded")]
    StartUnloaded(Vec3i),

    #[error("invalid planner config: {0}")]
    InvalidConfig(String),

    #[error("failed to parse JSON: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PlanError>;

/// Raised when a node expansion reads a position with no block data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutOfLevel {
    pub pos: Vec3i,
}
