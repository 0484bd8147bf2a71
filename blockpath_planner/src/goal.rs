// Goal scorers: the heuristic and the termination test of a search.
//
// `score` estimates the remaining cost from a position and feeds the `h`
// term of the search's `f = g + weight * h`. `is_finished` is the
// authoritative stop test and is independent of the score reaching zero: an
// escape goal, for instance, finishes as soon as the agent is far enough
// away. All goals are `Send + Sync` so a search can run on a worker thread.
//
// See also: `pathfinding.rs`, the only consumer of these.

use crate::node::NodeState;
use crate::types::Vec3i;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

pub trait GoalScorer: Send + Sync {
    /// Estimated remaining cost from `pos` to the goal.
    fn score(&self, pos: Vec3i) -> f64;

    fn is_finished(&self, node: &NodeState) -> bool;
}

/// Stand on exactly one block position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PosGoal {
    pub target: Vec3i,
}

impl PosGoal {
    pub fn new(target: Vec3i) -> Self {
        Self { target }
    }
}

impl GoalScorer for PosGoal {
    fn score(&self, pos: Vec3i) -> f64 {
        pos.distance(self.target)
    }

    fn is_finished(&self, node: &NodeState) -> bool {
        node.position == self.target
    }
}

/// Reach a column at any height.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct XzGoal {
    pub x: i32,
    pub z: i32,
}

impl XzGoal {
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }
}

impl GoalScorer for XzGoal {
    fn score(&self, pos: Vec3i) -> f64 {
        pos.horizontal_distance(Vec3i::new(self.x, pos.y, self.z))
    }

    fn is_finished(&self, node: &NodeState) -> bool {
        node.position.x == self.x && node.position.z == self.z
    }
}

/// Reach a height anywhere.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct YGoal {
    pub y: i32,
}

impl YGoal {
    pub fn new(y: i32) -> Self {
        Self { y }
    }
}

impl GoalScorer for YGoal {
    fn score(&self, pos: Vec3i) -> f64 {
        f64::from((pos.y - self.y).abs())
    }

    fn is_finished(&self, node: &NodeState) -> bool {
        node.position.y == self.y
    }
}

/// Get at least `radius` blocks away from `origin`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AwayFromPosGoal {
    pub origin: Vec3i,
    pub radius: f64,
}

impl AwayFromPosGoal {
    pub fn new(origin: Vec3i, radius: f64) -> Self {
        Self { origin, radius }
    }
}

impl GoalScorer for AwayFromPosGoal {
    fn score(&self, pos: Vec3i) -> f64 {
        (self.radius - pos.distance(self.origin)).max(0.0)
    }

    fn is_finished(&self, node: &NodeState) -> bool {
        node.position.distance(self.origin) >= self.radius
    }
}

pub type GoalFactory = Arc<dyn Fn() -> Box<dyn GoalScorer> + Send + Sync>;

/// A goal rebuilt from external context on every call, e.g. following a
/// moving entity. The search never sees the mutability behind the factory.
#[derive(Clone)]
pub struct DynamicGoal {
    factory: GoalFactory,
}

impl DynamicGoal {
    pub fn new(factory: impl Fn() -> Box<dyn GoalScorer> + Send + Sync + 'static) -> Self {
        Self {
            factory: Arc::new(factory),
        }
    }
}

impl GoalScorer for DynamicGoal {
    fn score(&self, pos: Vec3i) -> f64 {
        (self.factory)().score(pos)
    }

    fn is_finished(&self, node: &NodeState) -> bool {
        (self.factory)().is_finished(node)
    }
}

impl fmt::Debug for DynamicGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicGoal").finish_non_exhaustive()
    }
}
